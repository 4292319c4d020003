//! Business logic services.

pub mod event_broadcaster;
pub mod shipments;
pub mod storage;
pub mod upload;

pub use event_broadcaster::EventBroadcaster;
pub use storage::{MemoryStore, ObjectStore, S3Store, Storage, StorageError};
