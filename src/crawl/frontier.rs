// src/crawl/frontier.rs
// =============================================================================
// The frontier: every URL the crawl knows about lives in exactly one of two
// places.
//
// - pending: discovered but not yet handed to a worker
// - visited: already handed to a worker, in dispatch order, never removed
//
// The frontier is the only place that decides whether a URL is new. Both
// operations that touch the sets do their check and their insert under one
// lock, so two callers racing on the same URL can never both win.
//
// Pending order depends on the depth limit:
// - no limit:   a stack (LIFO), depth is informational only
// - with limit: a queue kept sorted by depth, so the shallowest URL is
//               always handed out first (breadth-first)
//
// Rust concepts:
// - Mutex: interior mutability shared between threads (&self methods)
// - HashSet + VecDeque: fast membership checks plus a stable order
// =============================================================================

use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

// A URL waiting in the frontier, with its link distance from the seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: String,
    pub depth: usize,
}

#[derive(Debug, Default)]
struct FrontierState {
    pending: VecDeque<FrontierEntry>,
    pending_urls: HashSet<String>,
    visited: Vec<String>,
    visited_urls: HashSet<String>,
}

#[derive(Debug)]
pub struct Frontier {
    state: Mutex<FrontierState>,
    max_depth: usize,
}

impl Frontier {
    // Creates an empty frontier
    //
    // max_depth: URLs further than this many links from the seed are refused.
    //            0 means no limit.
    pub fn new(max_depth: usize) -> Self {
        Self {
            state: Mutex::new(FrontierState::default()),
            max_depth,
        }
    }

    /// True when a depth limit is set and URLs come out shallowest first
    pub fn is_breadth_first(&self) -> bool {
        self.max_depth > 0
    }

    // The state is only mutated inside short, non-panicking sections, so a
    // poisoned lock still holds consistent sets.
    fn lock(&self) -> MutexGuard<'_, FrontierState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds `url` to the pending set if it has never been seen.
    ///
    /// Returns true only for the call that actually inserted it. If `url` is
    /// already pending at a greater depth, its depth is lowered to `depth`
    /// (the call still returns false).
    pub fn try_enqueue(&self, url: &str, depth: usize) -> bool {
        if self.is_breadth_first() && depth > self.max_depth {
            return false;
        }

        let mut state = self.lock();
        if state.visited_urls.contains(url) {
            return false;
        }

        if state.pending_urls.contains(url) {
            self.lower_pending_depth(&mut state, url, depth);
            return false;
        }

        state.pending_urls.insert(url.to_string());
        let entry = FrontierEntry {
            url: url.to_string(),
            depth,
        };
        self.insert_pending(&mut state, entry);
        true
    }

    fn lower_pending_depth(&self, state: &mut FrontierState, url: &str, depth: usize) {
        let position = match state.pending.iter().position(|e| e.url == url) {
            Some(position) => position,
            None => return,
        };
        if state.pending[position].depth <= depth {
            return;
        }

        if self.is_breadth_first() {
            // Re-insert so the queue stays sorted by depth
            if let Some(mut entry) = state.pending.remove(position) {
                entry.depth = depth;
                self.insert_pending(state, entry);
            }
        } else {
            state.pending[position].depth = depth;
        }
    }

    fn insert_pending(&self, state: &mut FrontierState, entry: FrontierEntry) {
        if self.is_breadth_first() {
            // After every entry of the same or smaller depth (FIFO per depth)
            let at = state.pending.partition_point(|e| e.depth <= entry.depth);
            state.pending.insert(at, entry);
        } else {
            state.pending.push_back(entry);
        }
    }

    /// Takes one pending URL and marks it visited in the same step.
    ///
    /// None only means nothing is pending right now; in-flight pages may
    /// still add more.
    pub fn try_dequeue(&self) -> Option<FrontierEntry> {
        self.try_dequeue_up_to(None)
    }

    /// Like `try_dequeue`, but only hands out a URL whose depth is at most
    /// `ceiling` (no ceiling = any depth).
    ///
    /// The coordinator passes the shallowest in-flight depth here, so depth
    /// d + 1 never starts while depth d is still being fetched.
    pub fn try_dequeue_up_to(&self, ceiling: Option<usize>) -> Option<FrontierEntry> {
        let mut state = self.lock();

        let next = if self.is_breadth_first() {
            state.pending.front()?
        } else {
            state.pending.back()?
        };
        if let Some(ceiling) = ceiling {
            if next.depth > ceiling {
                return None;
            }
        }

        let entry = if self.is_breadth_first() {
            state.pending.pop_front()?
        } else {
            state.pending.pop_back()?
        };

        state.pending_urls.remove(&entry.url);
        state.visited_urls.insert(entry.url.clone());
        state.visited.push(entry.url.clone());
        Some(entry)
    }

    pub fn is_empty(&self) -> bool {
        self.lock().pending.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.lock().pending.len()
    }

    pub fn visited_count(&self) -> usize {
        self.lock().visited.len()
    }

    /// Snapshot of the visited URLs in dispatch order
    pub fn visited(&self) -> Vec<String> {
        self.lock().visited.clone()
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why is there a HashSet next to each list?
//    - The lists keep order (pending hand-out order, dispatch order)
//    - HashSet answers "have we seen this?" in O(1)
//    - Searching the lists instead would make every enqueue O(n)
//
// 2. Why do the methods take &self and not &mut self?
//    - The frontier is shared between tasks through an Arc
//    - Arc only hands out shared references
//    - The Mutex gives us mutation behind a shared reference
//
// 3. What is `?` doing in try_dequeue_up_to?
//    - front() and pop_front() return an Option
//    - `?` on an Option returns None from the function early
//    - Same idea as `?` on a Result, just for "nothing there"
// -----------------------------------------------------------------------------
