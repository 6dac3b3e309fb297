//! Per-key async locks for coalescing concurrent cache misses.
//!
//! Callers that miss on the same key queue on one lock. The first holder
//! generates and writes back; the rest re-probe the cache once they get the
//! lock and usually find the leader's result. The lock only orders callers.
//! If the leader fails, the next holder simply generates itself.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockTable = HashMap<String, Arc<AsyncMutex<()>>>;

/// Table of per-key locks. Entries exist only while someone holds or waits
/// on them.
#[derive(Debug, Default)]
pub struct SingleFlight {
    locks: Arc<Mutex<LockTable>>,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`.
    pub async fn acquire(&self, key: &str) -> KeyGuard {
        let lock = {
            let mut locks = lock_table(&self.locks);
            Arc::clone(locks.entry(key.to_string()).or_default())
        };
        let guard = lock.lock_owned().await;
        KeyGuard {
            guard: Some(guard),
            key: key.to_string(),
            locks: Arc::clone(&self.locks),
        }
    }

    /// Number of keys currently locked or waited on.
    pub fn in_flight(&self) -> usize {
        lock_table(&self.locks).len()
    }
}

fn lock_table(locks: &Mutex<LockTable>) -> MutexGuard<'_, LockTable> {
    // Poison only means a holder panicked; the map itself is intact.
    locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Exclusive access to one key; released on drop.
#[derive(Debug)]
pub struct KeyGuard {
    guard: Option<OwnedMutexGuard<()>>,
    key: String,
    locks: Arc<Mutex<LockTable>>,
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        // Release first so our own Arc is gone before counting holders.
        drop(self.guard.take());
        let mut locks = lock_table(&self.locks);
        if let Some(lock) = locks.get(&self.key)
            && Arc::strong_count(lock) == 1
        {
            locks.remove(&self.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn entry_removed_after_release() {
        let sf = SingleFlight::new();
        {
            let _guard = sf.acquire("a").await;
            assert_eq!(sf.in_flight(), 1);
        }
        assert_eq!(sf.in_flight(), 0);
    }

    #[tokio::test]
    async fn distinct_keys_do_not_block() {
        let sf = SingleFlight::new();
        let _a = sf.acquire("a").await;
        let b = tokio::time::timeout(Duration::from_millis(100), sf.acquire("b")).await;
        assert!(b.is_ok());
        assert_eq!(sf.in_flight(), 2);
    }

    #[tokio::test]
    async fn same_key_is_serialized() {
        let sf = Arc::new(SingleFlight::new());
        let active = Arc::new(AtomicUsize::new(0));
        let max_active = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let sf = Arc::clone(&sf);
            let active = Arc::clone(&active);
            let max_active = Arc::clone(&max_active);
            handles.push(tokio::spawn(async move {
                let _guard = sf.acquire("k").await;
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                max_active.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                active.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(max_active.load(Ordering::SeqCst), 1);
        assert_eq!(sf.in_flight(), 0);
    }
}
