//! In-process document store.
//!
//! Keeps the whole database as one JSON tree and broadcasts the path of
//! every write to subscribers. Used by tests and by local demos; it also
//! supports simulating an unreachable backend and slow writes.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_stream::stream;
use futures::future::BoxFuture;
use serde_json::Value;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::debug;

use super::error::StoreError;
use super::{DocumentStore, ValueStream, tree};

/// Capacity of the change broadcast channel.
const CHANGE_CHANNEL_CAPACITY: usize = 256;

/// In-memory [`DocumentStore`].
///
/// Cheaply cloneable; clones share the same tree, so two synchronizers built
/// on clones behave like two clients of one database.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<MemoryStoreInner>,
}

struct MemoryStoreInner {
    root: Mutex<Value>,
    changes: broadcast::Sender<Vec<String>>,
    offline: AtomicBool,
    read_only: AtomicBool,
    writes: AtomicUsize,
    write_delay_ms: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(MemoryStoreInner {
                root: Mutex::new(Value::Null),
                changes,
                offline: AtomicBool::new(false),
                read_only: AtomicBool::new(false),
                writes: AtomicUsize::new(0),
                write_delay_ms: AtomicU64::new(0),
            }),
        }
    }

    /// Create a store that already holds `value` at `path`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidPath` if the path is malformed.
    pub fn with_document(path: &str, value: Value) -> Result<Self, StoreError> {
        let store = Self::new();
        let keys = tree::segments(path)?;
        tree::set(&mut store.inner.lock_root(), &keys, value);
        Ok(store)
    }

    /// Read a path without going through the async API.
    #[must_use]
    pub fn snapshot(&self, path: &str) -> Option<Value> {
        let keys = tree::segments(path).ok()?;
        self.inner.read(&keys)
    }

    /// Make every read, write and new subscription fail until set back.
    pub fn set_offline(&self, offline: bool) {
        self.inner.offline.store(offline, Ordering::SeqCst);
    }

    /// Reject every write while reads and subscriptions keep working.
    pub fn set_read_only(&self, read_only: bool) {
        self.inner.read_only.store(read_only, Ordering::SeqCst);
    }

    /// Delay every write by `delay` before it is applied.
    pub fn set_write_delay(&self, delay: Duration) {
        let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.inner.write_delay_ms.store(millis, Ordering::SeqCst);
    }

    /// Number of writes applied so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.inner.writes.load(Ordering::SeqCst)
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.inner.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is offline".to_string()));
        }
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("offline", &self.inner.offline.load(Ordering::SeqCst))
            .field("writes", &self.write_count())
            .finish_non_exhaustive()
    }
}

impl MemoryStoreInner {
    fn lock_root(&self) -> std::sync::MutexGuard<'_, Value> {
        self.root.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read(&self, keys: &[String]) -> Option<Value> {
        tree::get(&self.lock_root(), keys).cloned()
    }
}

impl DocumentStore for MemoryStore {
    fn get<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<Option<Value>, StoreError>> {
        Box::pin(async move {
            self.check_online()?;
            let keys = tree::segments(path)?;
            Ok(self.inner.read(&keys))
        })
    }

    fn set<'a>(&'a self, path: &'a str, value: &'a Value) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            self.check_online()?;
            if self.inner.read_only.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("memory store is read-only".to_string()));
            }
            let keys = tree::segments(path)?;

            let delay = self.inner.write_delay_ms.load(Ordering::SeqCst);
            if delay > 0 {
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }

            tree::set(&mut self.inner.lock_root(), &keys, value.clone());
            self.inner.writes.fetch_add(1, Ordering::SeqCst);
            debug!(path, "memory store write");

            // No receivers is fine: nobody is subscribed yet.
            let _ = self.inner.changes.send(keys);
            Ok(())
        })
    }

    fn subscribe<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<ValueStream, StoreError>> {
        Box::pin(async move {
            self.check_online()?;
            let keys = tree::segments(path)?;

            // Subscribe before the initial read so no write falls in between.
            let mut changes = self.inner.changes.subscribe();
            let inner = Arc::clone(&self.inner);
            let initial = inner.read(&keys);

            let values: ValueStream = Box::pin(stream! {
                yield Ok(initial);
                loop {
                    match changes.recv().await {
                        Ok(changed) => {
                            if tree::overlaps(&changed, &keys) {
                                yield Ok(inner.read(&keys));
                            }
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            debug!(skipped, "subscriber lagged, resynchronizing");
                            yield Ok(inner.read(&keys));
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
            });
            Ok(values)
        })
    }
}
