// src/crawl/pool.rs
// =============================================================================
// A bounded set of in-flight page tasks.
//
// Each dispatched URL becomes one tokio task inside a JoinSet. The JoinSet is
// both the slot counter and the completion signal:
// - a slot is taken when a task is spawned
// - a slot is freed only when the coordinator has joined the finished task,
//   so a slot is never reused before its result was read
// - the task's return value is its result slot; it can only be read after
//   the task has finished
//
// The pool also counts in-flight tasks per depth so the coordinator can hold
// back deeper URLs until the current depth is done.
// =============================================================================

use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;
use tokio::task::{JoinError, JoinSet};

use crate::crawl::worker::{CrawlTask, PageProcessor, TaskResult};

pub struct WorkerPool {
    tasks: JoinSet<TaskResult>,
    capacity: usize,
    processor: PageProcessor,
    // depth -> number of tasks in flight at that depth
    depths: BTreeMap<usize, usize>,
}

impl WorkerPool {
    // capacity is clamped to at least 1 so the pool can always make progress
    pub fn new(capacity: usize, processor: PageProcessor) -> Self {
        Self {
            tasks: JoinSet::new(),
            capacity: capacity.max(1),
            processor,
            depths: BTreeMap::new(),
        }
    }

    pub fn has_free_slot(&self) -> bool {
        self.tasks.len() < self.capacity
    }

    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_idle(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Depth of the shallowest task still in flight
    pub fn shallowest_in_flight(&self) -> Option<usize> {
        self.depths.keys().next().copied()
    }

    /// Starts fetching `task` on a free slot.
    ///
    /// Callers check `has_free_slot` first; the pool never grows past its
    /// capacity.
    pub fn dispatch(&mut self, task: CrawlTask) {
        debug_assert!(self.has_free_slot(), "dispatch on a full pool");

        *self.depths.entry(task.depth).or_insert(0) += 1;

        let processor = self.processor.clone();
        self.tasks.spawn(async move {
            let fallback = task.clone();
            // A panicking page still hands back a result, so its slot and
            // depth count are always released through collect_finished
            match AssertUnwindSafe(processor.process(task)).catch_unwind().await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!("crawl task for {} panicked", fallback.url);
                    TaskResult::empty(&fallback, None)
                }
            }
        });
    }

    /// Waits up to `wait` for at least one task to finish, then also takes
    /// every other task that is already done.
    ///
    /// Returns an empty Vec if nothing finished in time.
    pub async fn collect_finished(&mut self, wait: Duration) -> Vec<TaskResult> {
        let mut finished = Vec::new();

        if self.tasks.is_empty() {
            return finished;
        }

        match tokio::time::timeout(wait, self.tasks.join_next()).await {
            Ok(Some(joined)) => finished.extend(self.unpack(joined)),
            Ok(None) | Err(_) => return finished,
        }

        // A zero timeout still polls join_next once, which picks up tasks
        // that already completed without waiting for running ones.
        while let Ok(Some(joined)) =
            tokio::time::timeout(Duration::ZERO, self.tasks.join_next()).await
        {
            finished.extend(self.unpack(joined));
        }

        finished
    }

    /// Cancels every task still running and frees all slots.
    pub async fn shutdown(&mut self) {
        self.tasks.shutdown().await;
        self.depths.clear();
    }

    fn unpack(&mut self, joined: Result<TaskResult, JoinError>) -> Option<TaskResult> {
        match joined {
            Ok(result) => {
                if let Some(count) = self.depths.get_mut(&result.depth) {
                    *count -= 1;
                    if *count == 0 {
                        self.depths.remove(&result.depth);
                    }
                }
                Some(result)
            }
            Err(e) => {
                // Only reachable for aborted tasks; shutdown clears the counts
                tracing::warn!("crawl task did not finish: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::extract::HtmlLinkExtractor;
    use crate::crawl::normalize::LinkPolicy;
    use crate::crawl::testing::FakeSite;
    use std::sync::Arc;
    use url::Url;

    fn pool(site: FakeSite, capacity: usize) -> WorkerPool {
        let seed = Url::parse("http://example.com/").unwrap();
        let processor = PageProcessor::new(
            Arc::new(site),
            Arc::new(HtmlLinkExtractor),
            LinkPolicy::from_seed(&seed, false).unwrap(),
        );
        WorkerPool::new(capacity, processor)
    }

    fn task(url: &str) -> CrawlTask {
        CrawlTask {
            url: url.to_string(),
            depth: 0,
        }
    }

    #[tokio::test]
    async fn test_slots_freed_only_after_collect() {
        let site = FakeSite::new().page("http://example.com/", &["/a"]);
        let mut pool = pool(site, 1);

        pool.dispatch(task("http://example.com/"));
        assert!(!pool.has_free_slot());

        // Even once the task has finished, its slot stays taken until joined
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(pool.in_flight(), 1);

        let finished = pool.collect_finished(Duration::from_secs(1)).await;
        assert_eq!(finished.len(), 1);
        assert_eq!(finished[0].discovered, vec!["http://example.com/a"]);
        assert!(pool.has_free_slot());
        assert!(pool.is_idle());
    }

    #[tokio::test]
    async fn test_collect_times_out_on_slow_tasks() {
        let site = FakeSite::new()
            .page("http://example.com/", &[])
            .with_delay(Duration::from_secs(5));
        let mut pool = pool(site, 2);

        pool.dispatch(task("http://example.com/"));
        let finished = pool.collect_finished(Duration::from_millis(10)).await;
        assert!(finished.is_empty());
        assert_eq!(pool.in_flight(), 1);

        pool.shutdown().await;
        assert!(pool.is_idle());
    }

    #[tokio::test]
    async fn test_collect_gathers_all_ready_tasks() {
        let site = FakeSite::new()
            .page("http://example.com/a", &[])
            .page("http://example.com/b", &[])
            .page("http://example.com/c", &[]);
        let mut pool = pool(site, 3);

        pool.dispatch(task("http://example.com/a"));
        pool.dispatch(task("http://example.com/b"));
        pool.dispatch(task("http://example.com/c"));
        tokio::time::sleep(Duration::from_millis(50)).await;

        let finished = pool.collect_finished(Duration::from_secs(1)).await;
        assert_eq!(finished.len(), 3);
        assert!(pool.is_idle());
    }

    #[tokio::test]
    async fn test_tracks_shallowest_depth_in_flight() {
        let site = FakeSite::new()
            .page("http://example.com/a", &[])
            .page("http://example.com/b", &[])
            .with_delay(Duration::from_millis(20));
        let mut pool = pool(site, 2);
        assert_eq!(pool.shallowest_in_flight(), None);

        pool.dispatch(CrawlTask {
            url: "http://example.com/a".to_string(),
            depth: 2,
        });
        pool.dispatch(CrawlTask {
            url: "http://example.com/b".to_string(),
            depth: 1,
        });
        assert_eq!(pool.shallowest_in_flight(), Some(1));

        let mut finished = Vec::new();
        while !pool.is_idle() {
            finished.extend(pool.collect_finished(Duration::from_secs(1)).await);
        }
        assert_eq!(finished.len(), 2);
        assert_eq!(pool.shallowest_in_flight(), None);
    }

    #[tokio::test]
    async fn test_collect_on_idle_pool_returns_immediately() {
        let mut pool = pool(FakeSite::new(), 1);
        let finished = pool.collect_finished(Duration::from_secs(60)).await;
        assert!(finished.is_empty());
    }
}
