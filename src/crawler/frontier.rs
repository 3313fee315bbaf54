//! Crawl frontier: the visited set and the queue of pending targets
//!
//! This module handles:
//! - Deduplication: a URL is enqueued at most once per crawl
//! - Depth limiting: targets deeper than the maximum are refused
//! - FIFO scheduling, which yields breadth-first traversal order
//! - Termination detection: empty queue and no worker in flight
//! - Cooperative stop
//!
//! Every operation takes the internal lock for a constant amount of work and
//! never across an await point.

use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;
use url::Url;

/// A URL scheduled for fetching, with its distance from the seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    url: Url,
    depth: u32,
}

impl CrawlTarget {
    /// Creates a target; `url` is expected to be normalized already
    pub fn new(url: Url, depth: u32) -> Self {
        Self { url, depth }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Number of link hops from the seed
    pub fn depth(&self) -> u32 {
        self.depth
    }
}

/// Normalized URL strings that have been enqueued at some point
pub type VisitedSet = HashSet<String>;

#[derive(Debug, Default)]
struct FrontierState {
    visited: VisitedSet,
    pending: VecDeque<CrawlTarget>,
    in_flight: usize,
    stopped: bool,
    drained: bool,
}

/// Shared frontier of a single crawl
///
/// The frontier owns the visited set and the pending queue. Workers only
/// interact with it through [`enqueue`](Frontier::enqueue) and
/// [`dequeue`](Frontier::dequeue); a dequeued target is returned as a
/// [`Lease`] that keeps the worker counted as in flight until dropped.
#[derive(Debug)]
pub struct Frontier {
    max_depth: u32,
    state: Mutex<FrontierState>,
    changed: Notify,
}

impl Frontier {
    /// Creates an empty frontier for a crawl limited to `max_depth` hops
    pub fn new(max_depth: u32) -> Self {
        Self {
            max_depth,
            state: Mutex::new(FrontierState::default()),
            changed: Notify::new(),
        }
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Whether a target at `depth` may be crawled
    pub fn depth_allows(&self, depth: u32) -> bool {
        depth <= self.max_depth
    }

    /// Adds a target unless its URL was seen before
    ///
    /// A target deeper than the maximum is refused before the seen check, so
    /// it is not recorded as seen. Once the frontier has stopped or drained,
    /// nothing more is accepted.
    ///
    /// # Returns
    ///
    /// * `true` - The URL was new and is now queued
    /// * `false` - Already seen, too deep, or the crawl is over
    pub fn enqueue(&self, target: CrawlTarget) -> bool {
        if !self.depth_allows(target.depth) {
            tracing::trace!(
                "Not queueing {} at depth {} (max {})",
                target.url,
                target.depth,
                self.max_depth
            );
            return false;
        }

        {
            let mut state = self.lock();
            if state.stopped || state.drained {
                return false;
            }
            if !state.visited.insert(target.url.as_str().to_string()) {
                return false;
            }
            tracing::trace!("Queued {} at depth {}", target.url, target.depth);
            state.pending.push_back(target);
        }

        self.changed.notify_waiters();
        true
    }

    /// Takes the next pending target
    ///
    /// Waits while the queue is empty but some worker is still in flight,
    /// since that worker may discover new links.
    ///
    /// # Returns
    ///
    /// * `Some(Lease)` - A target to fetch; drop the lease when done
    /// * `None` - The crawl has drained or was stopped
    pub async fn dequeue(&self) -> Option<Lease<'_>> {
        self.dequeue_with(|_| Some(())).await.map(|(lease, ())| lease)
    }

    /// Takes the oldest pending target that `reserve` accepts
    ///
    /// `reserve` is offered pending targets in FIFO order and returns
    /// `Some` for the first one it can take right now, typically by grabbing
    /// a per-host slot. Targets it refuses keep their place in the queue, so
    /// a saturated host never holds back targets on other hosts. When every
    /// pending target is refused the call waits for [`wake`](Frontier::wake)
    /// or any other frontier change and scans again.
    ///
    /// `reserve` runs under the frontier lock and must not block.
    pub async fn dequeue_with<P>(
        &self,
        mut reserve: impl FnMut(&CrawlTarget) -> Option<P>,
    ) -> Option<(Lease<'_>, P)> {
        loop {
            let notified = self.changed.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut state = self.lock();
                if state.stopped || state.drained {
                    return None;
                }

                let picked = state
                    .pending
                    .iter()
                    .enumerate()
                    .find_map(|(index, target)| reserve(target).map(|slot| (index, slot)));

                if let Some((index, slot)) = picked {
                    if let Some(target) = state.pending.remove(index) {
                        state.in_flight += 1;
                        let lease = Lease {
                            frontier: self,
                            target,
                        };
                        return Some((lease, slot));
                    }
                }

                if state.pending.is_empty() && state.in_flight == 0 {
                    Self::mark_drained(&mut state);
                    drop(state);
                    self.changed.notify_waiters();
                    return None;
                }
            }

            notified.await;
        }
    }

    /// Wakes workers waiting in [`dequeue_with`](Frontier::dequeue_with)
    ///
    /// Call after releasing whatever `reserve` was waiting on.
    pub fn wake(&self) {
        self.changed.notify_waiters();
    }

    /// Requests a cooperative stop
    ///
    /// Pending targets are discarded and waiting workers are released.
    /// Targets already leased stay in flight until their leases drop.
    pub fn stop(&self) {
        {
            let mut state = self.lock();
            if !state.stopped {
                tracing::info!(
                    "Stopping crawl, discarding {} pending targets",
                    state.pending.len()
                );
                state.stopped = true;
                state.pending.clear();
                if state.in_flight == 0 {
                    Self::mark_drained(&mut state);
                }
            }
        }

        self.changed.notify_waiters();
    }

    /// Resolves once [`stop`](Frontier::stop) has been called
    pub async fn wait_stopped(&self) {
        loop {
            let notified = self.changed.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.lock().stopped {
                return;
            }

            notified.await;
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.lock().stopped
    }

    /// Whether the crawl has finished: nothing pending and nothing in flight
    pub fn is_drained(&self) -> bool {
        self.lock().drained
    }

    /// Number of targets waiting to be fetched
    pub fn pending_len(&self) -> usize {
        self.lock().pending.len()
    }

    /// Number of distinct URLs enqueued so far
    pub fn visited_len(&self) -> usize {
        self.lock().visited.len()
    }

    /// Number of leases currently held by workers
    pub fn in_flight(&self) -> usize {
        self.lock().in_flight
    }

    /// Whether a URL has already been enqueued
    pub fn has_seen(&self, url: &Url) -> bool {
        self.lock().visited.contains(url.as_str())
    }

    fn complete(&self) {
        let became_drained = {
            let mut state = self.lock();
            state.in_flight = state.in_flight.saturating_sub(1);
            if state.in_flight == 0 && state.pending.is_empty() {
                Self::mark_drained(&mut state)
            } else {
                false
            }
        };

        if became_drained {
            self.changed.notify_waiters();
        }
    }

    /// Flips the drained flag; returns true only for the first transition
    fn mark_drained(state: &mut FrontierState) -> bool {
        if state.drained {
            return false;
        }
        state.drained = true;
        tracing::info!(
            "Frontier drained after {} distinct URLs",
            state.visited.len()
        );
        true
    }

    fn lock(&self) -> MutexGuard<'_, FrontierState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A dequeued target, counted as in flight until dropped
#[derive(Debug)]
pub struct Lease<'a> {
    frontier: &'a Frontier,
    target: CrawlTarget,
}

impl Lease<'_> {
    pub fn target(&self) -> &CrawlTarget {
        &self.target
    }
}

impl Drop for Lease<'_> {
    fn drop(&mut self) {
        self.frontier.complete();
    }
}
