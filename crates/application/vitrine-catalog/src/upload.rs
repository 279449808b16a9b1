use bytes::Bytes;
use vitrine_core::{storage_key, EntityId, EntityKind};

use crate::ports::ObjectStore;

/// An image file submitted with a create/update mutation.
#[derive(Debug, Clone)]
pub struct NewImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
    pub is_main: bool,
}

#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub index: usize,
    pub key: String,
    pub is_main: bool,
}

/// Upload `files` for one entity in fixed-size batches.
///
/// Files within a batch go out concurrently; the next batch starts only once
/// the whole batch has settled, bounding peak outbound storage connections.
/// Concurrent completion order is not meaningful, so results are re-sorted
/// on their explicit index after each join.
pub async fn upload_in_batches<O: ObjectStore>(
    objects: &O,
    kind: EntityKind,
    id: &EntityId,
    timestamp_ms: i64,
    files: Vec<NewImage>,
    batch_size: usize,
) -> anyhow::Result<Vec<UploadedImage>> {
    let batch_size = batch_size.max(1);
    let items: Vec<(usize, NewImage)> = files.into_iter().enumerate().collect();
    let mut uploaded: Vec<UploadedImage> = Vec::with_capacity(items.len());

    for batch in items.chunks(batch_size) {
        let joined = futures::future::join_all(batch.iter().map(|(index, file)| {
            let key = storage_key(kind, id, timestamp_ms, *index, &file.file_name);
            async move {
                objects
                    .put_object(&key, file.bytes.clone(), &file.content_type)
                    .await
                    .map(|_| UploadedImage {
                        index: *index,
                        key,
                        is_main: file.is_main,
                    })
            }
        }))
        .await;

        let mut batch_results = Vec::with_capacity(joined.len());
        for res in joined {
            batch_results.push(res?);
        }
        batch_results.sort_by_key(|img| img.index);
        uploaded.extend(batch_results);
    }

    Ok(uploaded)
}
