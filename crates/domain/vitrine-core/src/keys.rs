use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::EntityId;

/// Entity families sharing one object-storage namespace each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Product,
    Service,
    Project,
    Contact,
}

impl EntityKind {
    pub fn key_prefix(&self) -> &'static str {
        match self {
            EntityKind::Product => "products",
            EntityKind::Service => "services",
            EntityKind::Project => "projects",
            EntityKind::Contact => "contact",
        }
    }
}

/// Characters beyond the URL-path safe set that must be escaped in derived
/// public URLs. Keys themselves only ever contain what `storage_key` emits,
/// but uploaded file extensions are caller input.
const KEY_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'?')
    .add(b'%')
    .add(b'<')
    .add(b'>');

/// Derive the storage key for one uploaded gallery file:
/// `{kind}/{entity_id}/{timestamp_ms}-{index}.{ext}`.
///
/// Timestamp plus batch index keeps keys unique within an entity even when a
/// whole batch lands on the same millisecond.
pub fn storage_key(
    kind: EntityKind,
    id: &EntityId,
    timestamp_ms: i64,
    index: usize,
    file_name: &str,
) -> String {
    format!(
        "{}/{}/{}-{}.{}",
        kind.key_prefix(),
        id.as_str(),
        timestamp_ms,
        index,
        file_extension(file_name)
    )
}

/// The public URL for a stored object is derived, never persisted: bucket,
/// region and key fully determine it.
pub fn public_url(bucket: &str, region: &str, key: &str) -> String {
    let escaped = utf8_percent_encode(key, KEY_ESCAPE);
    format!("https://{bucket}.s3.{region}.amazonaws.com/{escaped}")
}

fn file_extension(file_name: &str) -> &str {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
        .unwrap_or("bin")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_key_embeds_kind_id_timestamp_and_index() {
        let id = EntityId::from("abc-123");
        let key = storage_key(EntityKind::Product, &id, 1700000000000, 2, "photo.JPG");
        assert_eq!(key, "products/abc-123/1700000000000-2.JPG");
    }

    #[test]
    fn extension_defaults_to_bin_when_missing() {
        let id = EntityId::from("abc");
        let key = storage_key(EntityKind::Service, &id, 5, 0, "noext");
        assert!(key.ends_with("5-0.bin"));
    }

    #[test]
    fn public_url_is_deterministic_and_escaped() {
        let url = public_url("acme-media", "ap-southeast-1", "products/x/1-0.png");
        assert_eq!(
            url,
            "https://acme-media.s3.ap-southeast-1.amazonaws.com/products/x/1-0.png"
        );
        let odd = public_url("b", "r", "products/x/1-0.a b");
        assert!(odd.ends_with("1-0.a%20b"));
    }
}
