//! Per-port mutual exclusion for read-check-write allocation
//!
//! Two submissions that validate against the same port must not both see the
//! same free VLAN. A [`PortLease`] is held from the usage lookup until the
//! caller has committed its claim. Validators share one process-wide
//! registry unless given their own.

use dashmap::DashMap;
use once_cell::sync::Lazy;
use parking_lot::lock_api::ArcMutexGuard;
use parking_lot::{Mutex, RawMutex};
use portclaim_lifecycle::SubscriptionId;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

type PortMutex = Arc<Mutex<()>>;

static SHARED: Lazy<PortLocks> = Lazy::new(PortLocks::new);

/// Registry of port locks, shared by cloning
#[derive(Debug, Clone, Default)]
pub struct PortLocks {
    inner: Arc<DashMap<SubscriptionId, PortMutex>>,
}

impl PortLocks {
    /// Empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle on the process-wide registry
    #[must_use]
    pub fn shared() -> Self {
        SHARED.clone()
    }

    fn mutex(&self, port: SubscriptionId) -> PortMutex {
        // Clone out so the shard guard is released before blocking.
        self.inner.entry(port).or_default().clone()
    }

    /// Blocks until `port` is free
    #[must_use]
    pub fn acquire(&self, port: SubscriptionId) -> PortLease {
        let guard = self.mutex(port).lock_arc();
        trace!(%port, "port lock acquired");
        PortLease { port, _guard: guard }
    }

    /// Takes the lock on `port` if nobody holds it
    #[must_use]
    pub fn try_acquire(&self, port: SubscriptionId) -> Option<PortLease> {
        self.mutex(port)
            .try_lock_arc()
            .map(|guard| PortLease { port, _guard: guard })
    }

    /// Whether someone currently holds the lock on `port`
    #[must_use]
    pub fn is_locked(&self, port: SubscriptionId) -> bool {
        self.inner.get(&port).is_some_and(|mutex| mutex.is_locked())
    }

    /// Number of ports that have been locked at least once
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether no port has been locked yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Exclusive hold on one port, released on drop
pub struct PortLease {
    port: SubscriptionId,
    _guard: ArcMutexGuard<RawMutex, ()>,
}

impl PortLease {
    /// Locked port
    #[must_use]
    pub fn port(&self) -> SubscriptionId {
        self.port
    }
}

impl fmt::Debug for PortLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortLease").field("port", &self.port).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn test_lease_is_exclusive() {
        let locks = PortLocks::new();
        let port = SubscriptionId::new();
        let lease = locks.acquire(port);
        assert_eq!(lease.port(), port);
        assert!(locks.is_locked(port));
        assert!(locks.try_acquire(port).is_none());
        assert!(locks.try_acquire(SubscriptionId::new()).is_some());
        drop(lease);
        assert!(!locks.is_locked(port));
        assert!(locks.try_acquire(port).is_some());
    }

    #[test]
    fn test_threads_serialize_on_port() {
        let locks = PortLocks::new();
        let port = SubscriptionId::new();
        let inside = Arc::new(AtomicUsize::new(0));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let locks = locks.clone();
                let inside = Arc::clone(&inside);
                thread::spawn(move || {
                    for _ in 0..50 {
                        let _lease = locks.acquire(port);
                        assert_eq!(inside.fetch_add(1, Ordering::SeqCst), 0);
                        inside.fetch_sub(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(locks.len(), 1);
    }

    #[test]
    fn test_shared_handles_see_one_registry() {
        let port = SubscriptionId::new();
        let lease = PortLocks::shared().acquire(port);
        assert!(PortLocks::shared().is_locked(port));
        assert!(PortLocks::shared().try_acquire(port).is_none());
        assert!(!PortLocks::new().is_locked(port));
        drop(lease);
        assert!(PortLocks::shared().try_acquire(port).is_some());
    }
}
