//! Per-host concurrency limiting
//!
//! Each host gets its own semaphore, created lazily the first time a request
//! for that host is scheduled. A permit is held for the duration of one
//! fetch (jitter included) and released before links are extracted.
//!
//! Slots are only ever taken with [`HostLimiter::try_acquire`]: the frontier
//! offers a worker the oldest target whose host has a free slot, so no
//! worker sits parked on a busy host while other hosts have work queued.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Errors raised by the host limiter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LimiterError {
    #[error("per-host limit must be between 1 and {max}, got {got}")]
    InvalidCapacity { got: usize, max: usize },
}

/// Bounds the number of concurrent fetches per host
#[derive(Debug)]
pub struct HostLimiter {
    per_host: usize,
    hosts: Mutex<HashMap<String, Arc<Semaphore>>>,
}

impl HostLimiter {
    /// Creates a limiter allowing `per_host` concurrent fetches per host
    ///
    /// # Returns
    ///
    /// * `Ok(HostLimiter)` - Limiter ready for use
    /// * `Err(LimiterError)` - `per_host` is zero or exceeds the semaphore maximum
    pub fn new(per_host: usize) -> Result<Self, LimiterError> {
        if per_host == 0 || per_host > Semaphore::MAX_PERMITS {
            return Err(LimiterError::InvalidCapacity {
                got: per_host,
                max: Semaphore::MAX_PERMITS,
            });
        }

        Ok(Self {
            per_host,
            hosts: Mutex::new(HashMap::new()),
        })
    }

    /// Takes a slot on `host` if one is free
    ///
    /// Returns `None` when `host` already has `per_host` fetches in flight.
    /// Semaphores are never closed, so that is the only refusal.
    pub fn try_acquire(&self, host: &str) -> Option<OwnedSemaphorePermit> {
        self.semaphore(host).try_acquire_owned().ok()
    }

    /// Number of fetches currently holding a slot on `host`
    pub fn in_flight(&self, host: &str) -> usize {
        self.lock()
            .get(host)
            .map(|s| self.per_host - s.available_permits())
            .unwrap_or(0)
    }

    /// Number of distinct hosts seen so far
    pub fn host_count(&self) -> usize {
        self.lock().len()
    }

    pub fn per_host(&self) -> usize {
        self.per_host
    }

    fn semaphore(&self, host: &str) -> Arc<Semaphore> {
        let mut hosts = self.lock();
        Arc::clone(
            hosts
                .entry(host.to_string())
                .or_insert_with(|| Arc::new(Semaphore::new(self.per_host))),
        )
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<Semaphore>>> {
        self.hosts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            HostLimiter::new(0),
            Err(LimiterError::InvalidCapacity { got: 0, .. })
        ));
    }

    #[test]
    fn test_permits_counted_per_host() {
        let limiter = HostLimiter::new(2).unwrap();

        let a1 = limiter.try_acquire("a.test:80").unwrap();
        let _a2 = limiter.try_acquire("a.test:80").unwrap();
        let _b1 = limiter.try_acquire("b.test:80").unwrap();

        assert_eq!(limiter.in_flight("a.test:80"), 2);
        assert_eq!(limiter.in_flight("b.test:80"), 1);
        assert_eq!(limiter.in_flight("c.test:80"), 0);
        assert_eq!(limiter.host_count(), 2);

        drop(a1);
        assert_eq!(limiter.in_flight("a.test:80"), 1);
    }

    #[test]
    fn test_saturated_host_refuses_without_affecting_others() {
        let limiter = HostLimiter::new(1).unwrap();
        let held = limiter.try_acquire("a.test:80").unwrap();

        assert!(limiter.try_acquire("a.test:80").is_none());
        assert!(limiter.try_acquire("b.test:80").is_some());

        drop(held);
        assert!(limiter.try_acquire("a.test:80").is_some());
    }
}
