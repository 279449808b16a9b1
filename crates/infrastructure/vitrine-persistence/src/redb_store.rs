use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use redb::{Database, ReadableTable, TableDefinition};
use vitrine_core::Collection;

use crate::maintenance::quarantine_corrupt_file;
use crate::StorageError;

pub const VITRINE_REDB_FILENAME: &str = "vitrine.redb";
pub const CURRENT_SCHEMA: u32 = 1;

const META: TableDefinition<&str, &str> = TableDefinition::new("meta");
const PRODUCTS: TableDefinition<&str, &[u8]> = TableDefinition::new("products");
const SERVICES: TableDefinition<&str, &[u8]> = TableDefinition::new("services");
const PROJECTS: TableDefinition<&str, &[u8]> = TableDefinition::new("projects");
const CONTACT_INFO: TableDefinition<&str, &[u8]> = TableDefinition::new("contact_info");

const META_FORMAT_KEY: &str = "format";
const META_FORMAT_VALUE: &str = "vitrine-redb";
const META_SCHEMA_VERSION: &str = "schema_version";
const META_CREATED_AT: &str = "created_at";

fn table_for(collection: Collection) -> TableDefinition<'static, &'static str, &'static [u8]> {
    match collection {
        Collection::Products => PRODUCTS,
        Collection::Services => SERVICES,
        Collection::Projects => PROJECTS,
        Collection::ContactInfo => CONTACT_INFO,
    }
}

/// Single-file document store holding the four catalog collections. Each
/// mutation is one write transaction; atomicity is strictly per document.
#[derive(Debug)]
pub struct RedbCatalogStore {
    db: Arc<Database>,
}

impl RedbCatalogStore {
    fn is_corrupt_open_error(err: &redb::DatabaseError) -> bool {
        match err {
            redb::DatabaseError::Storage(storage) => match storage {
                redb::StorageError::Corrupted(_) => true,
                redb::StorageError::Io(ioe) => matches!(
                    ioe.kind(),
                    std::io::ErrorKind::InvalidData | std::io::ErrorKind::UnexpectedEof
                ),
                _ => false,
            },
            _ => false,
        }
    }

    fn db_cache() -> &'static Mutex<HashMap<Utf8PathBuf, Arc<Database>>> {
        static CACHE: OnceLock<Mutex<HashMap<Utf8PathBuf, Arc<Database>>>> = OnceLock::new();
        CACHE.get_or_init(|| Mutex::new(HashMap::new()))
    }

    pub fn path_for_root(root: &Utf8Path) -> Utf8PathBuf {
        root.join(VITRINE_REDB_FILENAME)
    }

    /// Open (or create) the store under `root`. Handles are cached process-
    /// wide per path so a second open in the same process shares the
    /// database instead of failing.
    pub fn open(root: &Utf8Path) -> Result<Self, StorageError> {
        let path = Self::path_for_root(root);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut cache = Self::db_cache().lock().expect("db cache lock poisoned");
        if let Some(existing) = cache.get(&path) {
            if !path.exists() {
                cache.remove(&path);
            } else {
                return Ok(Self {
                    db: existing.clone(),
                });
            }
        }

        let db = if path.exists() {
            match Database::open(path.as_std_path()) {
                Ok(db) => db,
                Err(redb::DatabaseError::DatabaseAlreadyOpen) => {
                    return Err(StorageError::DatabaseAlreadyOpen);
                }
                Err(e) if Self::is_corrupt_open_error(&e) => {
                    let _ = quarantine_corrupt_file(&path);
                    return Err(StorageError::Corrupt);
                }
                Err(e) => return Err(e.into()),
            }
        } else {
            Database::create(path.as_std_path())?
        };

        if let Err(e) = Self::ensure_schema(&db) {
            drop(db);
            if matches!(e, StorageError::Corrupt) {
                let _ = quarantine_corrupt_file(&path);
            }
            return Err(e);
        }
        let db = Arc::new(db);
        cache.insert(path, db.clone());
        Ok(Self { db })
    }

    fn ensure_schema(db: &Database) -> Result<(), StorageError> {
        // Create tables and required meta keys on first open.
        let write_tx = db.begin_write()?;
        {
            let mut meta = write_tx.open_table(META)?;
            let format: Option<String> = meta.get(META_FORMAT_KEY)?.map(|g| g.value().to_string());
            if format.is_none() {
                let schema_version = CURRENT_SCHEMA.to_string();
                let created_at = Utc::now().to_rfc3339();
                meta.insert(META_FORMAT_KEY, META_FORMAT_VALUE)?;
                meta.insert(META_SCHEMA_VERSION, schema_version.as_str())?;
                meta.insert(META_CREATED_AT, created_at.as_str())?;
            } else if format.as_deref() != Some(META_FORMAT_VALUE) {
                return Err(StorageError::Corrupt);
            }
        }
        let _ = write_tx.open_table(PRODUCTS)?;
        let _ = write_tx.open_table(SERVICES)?;
        let _ = write_tx.open_table(PROJECTS)?;
        let _ = write_tx.open_table(CONTACT_INFO)?;
        write_tx.commit()?;

        // Validate schema version.
        let read_tx = db.begin_read()?;
        let meta = read_tx.open_table(META)?;
        let schema_version = meta
            .get(META_SCHEMA_VERSION)?
            .and_then(|g| g.value().parse::<u32>().ok())
            .unwrap_or(0);
        if schema_version == 0 {
            return Err(StorageError::Corrupt);
        }
        if schema_version > CURRENT_SCHEMA {
            return Err(StorageError::NewerSchema {
                found: schema_version,
                supported: CURRENT_SCHEMA,
            });
        }
        if schema_version != CURRENT_SCHEMA {
            return Err(StorageError::Corrupt);
        }
        Ok(())
    }

    pub fn get_doc(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Vec<u8>>, StorageError> {
        let read_tx = self.db.begin_read()?;
        let table = read_tx.open_table(table_for(collection))?;
        Ok(table.get(id)?.map(|guard| guard.value().to_vec()))
    }

    pub fn list_docs(&self, collection: Collection) -> Result<Vec<Vec<u8>>, StorageError> {
        let read_tx = self.db.begin_read()?;
        let table = read_tx.open_table(table_for(collection))?;
        let mut docs = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            docs.push(value.value().to_vec());
        }
        Ok(docs)
    }

    pub fn put_doc(
        &self,
        collection: Collection,
        id: &str,
        doc: &[u8],
    ) -> Result<(), StorageError> {
        let write_tx = self.db.begin_write()?;
        {
            let mut table = write_tx.open_table(table_for(collection))?;
            table.insert(id, doc)?;
        }
        write_tx.commit()?;
        Ok(())
    }

    pub fn delete_doc(&self, collection: Collection, id: &str) -> Result<bool, StorageError> {
        let write_tx = self.db.begin_write()?;
        let removed = {
            let mut table = write_tx.open_table(table_for(collection))?;
            let was_present = table.remove(id)?.is_some();
            was_present
        };
        write_tx.commit()?;
        Ok(removed)
    }
}

impl vitrine_catalog::DocumentStore for RedbCatalogStore {
    fn get(&self, collection: Collection, id: &str) -> anyhow::Result<Option<Vec<u8>>> {
        Ok(self.get_doc(collection, id)?)
    }

    fn list(&self, collection: Collection) -> anyhow::Result<Vec<Vec<u8>>> {
        Ok(self.list_docs(collection)?)
    }

    fn put(&self, collection: Collection, id: &str, doc: &[u8]) -> anyhow::Result<()> {
        Ok(self.put_doc(collection, id, doc)?)
    }

    fn delete(&self, collection: Collection, id: &str) -> anyhow::Result<bool> {
        Ok(self.delete_doc(collection, id)?)
    }
}
