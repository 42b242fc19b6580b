//! Generic repository trait for the file-backed collections.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::traits::record::Record;

/// Generic CRUD repository trait.
///
/// Each collection implements this with its own validation. Entity-specific
/// query methods are defined on the concrete repository structs.
#[async_trait]
pub trait Repository<T: Record>: Send + Sync + 'static {
    /// Snapshot of every record in listing order.
    async fn find_all(&self) -> Vec<T>;

    /// Find a record by identifier. `NotFound` if absent.
    async fn find_by_id(&self, id: &T::Id) -> AppResult<T>;

    /// Validate, assign a fresh identifier, append, and persist.
    async fn create(&self, entity: T) -> AppResult<T>;

    /// Validate and replace the record with the same identifier.
    async fn update(&self, entity: T) -> AppResult<T>;

    /// Delete according to the kind's [`DeletionPolicy`](crate::traits::DeletionPolicy).
    async fn delete(&self, id: &T::Id) -> AppResult<()>;

    /// Number of records, including retired ones.
    async fn count(&self) -> usize;
}
