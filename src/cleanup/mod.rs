//! Tracked Resource Cleanup
//!
//! Tests that create server-side resources register the ids here and let
//! teardown delete them afterwards. Teardown attempts every tracked id
//! exactly once, in insertion order, and keeps going past individual
//! failures; it reports what happened instead of failing the test.
//!
//! # Example
//!
//! ```no_run
//! # use cartwright::cleanup::{with_cleanup, ResourceDeleter};
//! # async fn example<D: ResourceDeleter<Id = u64>>(api: &D) {
//! let (_, report) = with_cleanup(api, |tracker| async move {
//!     // ... create a resource through the API ...
//!     tracker.track(42);
//! })
//! .await;
//! assert!(report.is_clean());
//! # }
//! ```

use async_trait::async_trait;
use futures::FutureExt;
use parking_lot::Mutex;
use std::fmt::Display;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// Deleter trait
///
/// Releases one resource by id. Implementations return `Err` for transport
/// failures and for servers that refuse the deletion; teardown treats both
/// the same way.
#[async_trait]
pub trait ResourceDeleter: Send + Sync {
    /// Identifier for the resources this deleter releases
    type Id: Send + Sync;

    /// Delete a single resource
    async fn delete(&self, id: &Self::Id) -> anyhow::Result<()>;
}

/// Outcome of one deletion attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// The deleter returned success
    Deleted,
    /// The deleter returned an error (message preserved)
    Failed(String),
}

/// One id/outcome pair from a teardown pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupAttempt<I> {
    pub id: I,
    pub outcome: CleanupOutcome,
}

/// Structured result of a teardown pass, in attempt order
#[derive(Debug, Clone)]
pub struct CleanupReport<I> {
    attempts: Vec<CleanupAttempt<I>>,
}

impl<I> CleanupReport<I> {
    /// All attempts, in the order they ran
    pub fn attempts(&self) -> &[CleanupAttempt<I>] {
        &self.attempts
    }

    /// Number of deletion attempts made
    pub fn attempted(&self) -> usize {
        self.attempts.len()
    }

    /// Number of successful deletions
    pub fn deleted(&self) -> usize {
        self.attempts
            .iter()
            .filter(|a| a.outcome == CleanupOutcome::Deleted)
            .count()
    }

    /// Number of failed deletions
    pub fn failed(&self) -> usize {
        self.attempted() - self.deleted()
    }

    /// True when every attempt succeeded (trivially true for zero attempts)
    pub fn is_clean(&self) -> bool {
        self.failed() == 0
    }

    /// Ids whose deletion failed, in attempt order
    pub fn failed_ids(&self) -> Vec<&I> {
        self.attempts
            .iter()
            .filter(|a| a.outcome != CleanupOutcome::Deleted)
            .map(|a| &a.id)
            .collect()
    }
}

impl<I> Default for CleanupReport<I> {
    fn default() -> Self {
        Self {
            attempts: Vec::new(),
        }
    }
}

/// Registry of resource ids created by a test.
///
/// Cloning yields another handle to the same registry, so a test body and
/// its teardown can share one. All methods take `&self`; the id list lives
/// behind a mutex.
pub struct ResourceTracker<I> {
    ids: Arc<Mutex<Vec<I>>>,
}

impl<I> Clone for ResourceTracker<I> {
    fn clone(&self) -> Self {
        Self {
            ids: Arc::clone(&self.ids),
        }
    }
}

impl<I> Default for ResourceTracker<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> ResourceTracker<I> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            ids: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Register a resource id for deletion at teardown
    pub fn track(&self, id: I) {
        self.ids.lock().push(id);
    }

    /// Register several ids at once, preserving their order
    pub fn extend<T>(&self, ids: T)
    where
        T: IntoIterator<Item = I>,
    {
        self.ids.lock().extend(ids);
    }

    /// Drop every tracked id without deleting anything.
    ///
    /// Escape hatch for tests that delete their resources inline and must
    /// not have teardown try again.
    pub fn clear(&self) {
        self.ids.lock().clear();
    }

    /// Number of ids currently tracked
    pub fn len(&self) -> usize {
        self.ids.lock().len()
    }

    /// True when nothing is tracked
    pub fn is_empty(&self) -> bool {
        self.ids.lock().is_empty()
    }

    fn take_ids(&self) -> Vec<I> {
        std::mem::take(&mut *self.ids.lock())
    }
}

impl<I: Clone> ResourceTracker<I> {
    /// Snapshot of the tracked ids, in insertion order
    pub fn tracked(&self) -> Vec<I> {
        self.ids.lock().clone()
    }
}

impl<I: Display + Send + Sync> ResourceTracker<I> {
    /// Delete every tracked id through `deleter` and drain the registry.
    ///
    /// Ids are attempted sequentially in insertion order, one attempt each.
    /// A failed attempt is logged and recorded; the remaining ids are still
    /// attempted. The registry is drained exactly once: a second call (or a
    /// call after [`clear`](Self::clear)) makes zero attempts.
    pub async fn teardown<D>(&self, deleter: &D) -> CleanupReport<I>
    where
        D: ResourceDeleter<Id = I> + ?Sized,
    {
        let ids = self.take_ids();
        let mut attempts = Vec::with_capacity(ids.len());

        for id in ids {
            let outcome = match deleter.delete(&id).await {
                Ok(()) => {
                    tracing::debug!(resource = %id, "Deleted tracked resource");
                    CleanupOutcome::Deleted
                }
                Err(e) => {
                    tracing::warn!(
                        resource = %id,
                        error = %e,
                        "Failed to delete tracked resource"
                    );
                    CleanupOutcome::Failed(e.to_string())
                }
            };
            attempts.push(CleanupAttempt { id, outcome });
        }

        CleanupReport { attempts }
    }
}

/// Run a test body with a fresh registry and guaranteed teardown.
///
/// The body receives a registry handle and may clone it freely. Teardown
/// runs when the body finishes, whether it returns or panics; on panic the
/// original panic is resumed after cleanup, so the test still fails for the
/// right reason.
pub async fn with_cleanup<D, F, Fut, T>(deleter: &D, body: F) -> (T, CleanupReport<D::Id>)
where
    D: ResourceDeleter + ?Sized,
    D::Id: Display + Send + Sync,
    F: FnOnce(ResourceTracker<D::Id>) -> Fut,
    Fut: Future<Output = T>,
{
    let tracker = ResourceTracker::new();
    let handle = tracker.clone();

    // The closure call sits inside the catch too, so a panic raised while
    // building the future is treated like a panic inside it.
    let outcome = AssertUnwindSafe(async { body(tracker).await })
        .catch_unwind()
        .await;
    let report = handle.teardown(deleter).await;

    match outcome {
        Ok(value) => (value, report),
        Err(panic) => {
            if !report.is_clean() {
                tracing::warn!(
                    failed = report.failed(),
                    "Cleanup failures while unwinding a panicking test"
                );
            }
            std::panic::resume_unwind(panic)
        }
    }
}
