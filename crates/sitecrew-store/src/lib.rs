//! # sitecrew-store
//!
//! Concurrent, file-backed record store. Each entity kind lives in its own
//! [`Collection`](collection::Collection): an in-memory vector guarded by a
//! reader/writer lock and mirrored to a pretty-printed JSON file that is
//! rewritten in full on every mutation. The in-memory copy is the source of
//! truth; the file is only read at startup.

pub mod collection;
pub mod mirror;
pub mod repositories;
pub mod security_log;
pub mod stores;

pub use collection::Collection;
pub use security_log::{SecurityEvent, SecurityLog, SecurityLogEntry};
pub use stores::Stores;
