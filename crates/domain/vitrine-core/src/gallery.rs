use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One stored image of an entity's ordered gallery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImage {
    pub storage_key: String,
    pub is_main: bool,
    pub uploaded_at: DateTime<Utc>,
}

/// The designated cover image: the flagged one, else the first.
pub fn main_image(gallery: &[GalleryImage]) -> Option<&GalleryImage> {
    gallery.iter().find(|img| img.is_main).or_else(|| gallery.first())
}

/// Ensure exactly one image carries the main flag. The first flagged image
/// wins; an unflagged gallery promotes its first entry.
pub fn normalize_main_flag(gallery: &mut [GalleryImage]) {
    let main_ix = gallery.iter().position(|img| img.is_main).unwrap_or(0);
    for (ix, img) in gallery.iter_mut().enumerate() {
        img.is_main = ix == main_ix;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn img(key: &str, is_main: bool) -> GalleryImage {
        GalleryImage {
            storage_key: key.to_string(),
            is_main,
            uploaded_at: Utc::now(),
        }
    }

    #[test]
    fn main_image_falls_back_to_first_when_nothing_is_flagged() {
        let gallery = vec![img("a", false), img("b", false)];
        assert_eq!(main_image(&gallery).unwrap().storage_key, "a");
    }

    #[test]
    fn normalize_keeps_first_flagged_and_clears_the_rest() {
        let mut gallery = vec![img("a", false), img("b", true), img("c", true)];
        normalize_main_flag(&mut gallery);
        let flags: Vec<bool> = gallery.iter().map(|i| i.is_main).collect();
        assert_eq!(flags, vec![false, true, false]);
    }

    #[test]
    fn normalize_promotes_first_entry_of_unflagged_gallery() {
        let mut gallery = vec![img("a", false), img("b", false)];
        normalize_main_flag(&mut gallery);
        assert!(gallery[0].is_main);
        assert!(!gallery[1].is_main);
    }
}
