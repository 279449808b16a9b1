use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod gallery;
pub mod keys;
pub mod validate;

pub use catalog::{
    ContactDraft, ContactInfo, Product, ProductDraft, ProductStatus, Project, ProjectDraft,
    ProjectStatus, Service, ServiceDraft, Visibility,
};
pub use gallery::GalleryImage;
pub use keys::{public_url, storage_key, EntityKind};

/// Application-generated opaque document id. Never the store's native key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Vi,
    En,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Vi => "vi",
            Locale::En => "en",
        }
    }

    /// Resolve a locale from the leading segment of a request path
    /// (`/vi/products` -> `Vi`). Unprefixed paths fall back to the default.
    pub fn from_path_prefix(segment: &str) -> Option<Self> {
        match segment {
            "vi" => Some(Locale::Vi),
            "en" => Some(Locale::En),
            _ => None,
        }
    }
}

/// A text value carried in both site languages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub vi: String,
    pub en: String,
}

impl LocalizedText {
    pub fn new(vi: impl Into<String>, en: impl Into<String>) -> Self {
        Self {
            vi: vi.into(),
            en: en.into(),
        }
    }

    pub fn get(&self, locale: Locale) -> &str {
        match locale {
            Locale::Vi => &self.vi,
            Locale::En => &self.en,
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.vi.trim().is_empty() && !self.en.trim().is_empty()
    }
}

/// Persisted document collections. Names match the on-disk table names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Products,
    Services,
    Projects,
    ContactInfo,
}

impl Collection {
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Products => "products",
            Collection::Services => "services",
            Collection::Projects => "projects",
            Collection::ContactInfo => "contact_info",
        }
    }
}
