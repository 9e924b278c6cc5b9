//! Document model and the on-disk object store.

pub mod errors;
pub mod object;
pub mod store;

pub use errors::{StorageError, StorageResult};
pub use object::{Object, Objects, Scalar};
pub use store::ObjectStore;
