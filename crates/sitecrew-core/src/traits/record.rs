//! The contract every stored entity kind fulfils.

use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// What `Delete` does for a given entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionPolicy {
    /// The record is removed from the collection.
    Physical,
    /// The record stays listed but is marked retired.
    SoftRetire,
}

/// A record held in a file-backed collection.
///
/// Implementors describe their identity, how a raw record is normalized
/// before it is validated or stored, and how the collection orders them.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Typed identifier. `Default` yields a fresh random identifier.
    type Id: Clone + Eq + Hash + Default + fmt::Display + Send + Sync + 'static;

    /// Human-readable kind name used in messages and logs.
    const KIND: &'static str;

    /// Deletion behaviour for this kind.
    const DELETION: DeletionPolicy;

    /// The record identifier.
    fn id(&self) -> &Self::Id;

    /// Replace the identifier. Only the store calls this.
    fn set_id(&mut self, id: Self::Id);

    /// Trim strings and coerce out-of-range values to their defaults.
    fn normalize(&mut self);

    /// Deterministic listing order.
    fn ordering(a: &Self, b: &Self) -> Ordering;

    /// Mark the record retired. Only called for [`DeletionPolicy::SoftRetire`].
    fn retire(&mut self, _at: DateTime<Utc>) {}

    /// Whether the record has been retired.
    fn is_retired(&self) -> bool {
        false
    }
}
