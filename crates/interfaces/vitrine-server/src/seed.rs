use chrono::Utc;
use vitrine_core::{
    storage_key, Collection, ContactInfo, EntityId, EntityKind, GalleryImage, Product,
    ProductStatus, Project, ProjectStatus, Service, Visibility,
};
use vitrine_persistence::RedbCatalogStore;

use crate::content::{self, StaticItem};

#[derive(Debug)]
pub struct SeedReport {
    pub products: usize,
    pub services: usize,
    pub projects: usize,
    pub contact: bool,
}

fn seed_gallery(kind: EntityKind, id: &EntityId, now: chrono::DateTime<Utc>) -> Vec<GalleryImage> {
    vec![GalleryImage {
        storage_key: storage_key(kind, id, now.timestamp_millis(), 0, "cover.jpg"),
        is_main: true,
        uploaded_at: now,
    }]
}

fn put<T: serde::Serialize>(
    store: &RedbCatalogStore,
    collection: Collection,
    id: &EntityId,
    doc: &T,
) -> anyhow::Result<()> {
    let bytes = serde_json::to_vec(doc)?;
    store.put_doc(collection, id.as_str(), &bytes)?;
    Ok(())
}

/// Write the static demo content into the database. Ids derive from the
/// static slugs, so reseeding overwrites in place instead of duplicating.
pub fn seed(store: &RedbCatalogStore) -> anyhow::Result<SeedReport> {
    let now = Utc::now();

    let products = content::static_products();
    for item in &products {
        let id = EntityId::from(item.slug);
        let doc = Product {
            id: id.clone(),
            name: item.name.clone(),
            description: item.description.clone(),
            status: ProductStatus::Available,
            gallery: seed_gallery(EntityKind::Product, &id, now),
            created_at: now,
            updated_at: now,
        };
        put(store, Collection::Products, &id, &doc)?;
    }

    let services = content::static_services();
    for item in &services {
        let id = EntityId::from(item.slug);
        let doc = Service {
            id: id.clone(),
            name: item.name.clone(),
            description: item.description.clone(),
            visibility: Visibility::Published,
            gallery: seed_gallery(EntityKind::Service, &id, now),
            created_at: now,
            updated_at: now,
        };
        put(store, Collection::Services, &id, &doc)?;
    }

    let projects = content::static_projects();
    for item in &projects {
        let id = EntityId::from(item.slug);
        let doc = Project {
            id: id.clone(),
            name: item.name.clone(),
            description: item.description.clone(),
            status: project_status(item),
            gallery: seed_gallery(EntityKind::Project, &id, now),
            created_at: now,
            updated_at: now,
        };
        put(store, Collection::Projects, &id, &doc)?;
    }

    let contact = content::static_contact();
    let contact_id = EntityId::from(vitrine_core::catalog::CONTACT_INFO_ID);
    let doc = ContactInfo {
        id: contact_id.clone(),
        address: contact.address.clone(),
        phone: contact.phone.to_string(),
        email: contact.email.to_string(),
        gallery: Vec::new(),
        created_at: now,
        updated_at: now,
    };
    put(store, Collection::ContactInfo, &contact_id, &doc)?;

    Ok(SeedReport {
        products: products.len(),
        services: services.len(),
        projects: projects.len(),
        contact: true,
    })
}

fn project_status(item: &StaticItem) -> ProjectStatus {
    match item.status {
        "completed" => ProjectStatus::Completed,
        _ => ProjectStatus::Ongoing,
    }
}
