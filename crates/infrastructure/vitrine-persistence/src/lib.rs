mod error;
mod maintenance;
mod redb_store;

pub use error::{StorageError, StorageErrorKind};
pub use redb_store::{RedbCatalogStore, CURRENT_SCHEMA, VITRINE_REDB_FILENAME};
