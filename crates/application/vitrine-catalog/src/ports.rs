use bytes::Bytes;
use vitrine_core::Collection;

/// Raw document persistence. Values are opaque encoded documents keyed by
/// the application-generated id; the store guarantees per-document atomicity
/// and nothing more.
pub trait DocumentStore: Send + Sync + 'static {
    fn get(&self, collection: Collection, id: &str) -> anyhow::Result<Option<Vec<u8>>>;
    fn list(&self, collection: Collection) -> anyhow::Result<Vec<Vec<u8>>>;
    fn put(&self, collection: Collection, id: &str, doc: &[u8]) -> anyhow::Result<()>;
    /// Returns whether a document was actually removed.
    fn delete(&self, collection: Collection, id: &str) -> anyhow::Result<bool>;
}

/// Object storage for gallery images. Public URLs are derived, not stored.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<()>;
    /// Deleting an absent object is not an error.
    async fn delete_object(&self, key: &str) -> anyhow::Result<()>;
    fn public_url(&self, key: &str) -> String;
}
