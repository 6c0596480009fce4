//! Remote document store abstraction.
//!
//! The settings synchronizer needs three primitives from its backing
//! database: a point read, a point write, and a live subscription to a path.
//! [`DocumentStore`] names exactly those, so the synchronizer can run
//! against the Firebase Realtime Database in production and an in-process
//! tree in tests.

mod error;
pub mod firebase;
pub mod memory;
pub mod tree;

pub use error::{ApiErrorResponse, StoreError};
pub use firebase::FirebaseStore;
pub use memory::MemoryStore;

use futures::future::BoxFuture;
use futures::stream::BoxStream;
use serde_json::Value;

/// Live values of a subscribed path.
///
/// The first item is the value at subscription time; each later item is the
/// value after a change. `None` means the path holds no data. Dropping the
/// stream ends the subscription.
pub type ValueStream = BoxStream<'static, Result<Option<Value>, StoreError>>;

/// A JSON document database addressed by `/`-separated paths.
pub trait DocumentStore: Send + Sync {
    /// Read the value at `path`, `None` if nothing is stored there.
    fn get<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<Option<Value>, StoreError>>;

    /// Replace the value at `path`.
    fn set<'a>(&'a self, path: &'a str, value: &'a Value) -> BoxFuture<'a, Result<(), StoreError>>;

    /// Subscribe to the value at `path`.
    fn subscribe<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<ValueStream, StoreError>>;
}
