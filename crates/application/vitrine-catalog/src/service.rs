use std::sync::Arc;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use vitrine_core::validate::{
    validate_contact_draft, validate_product_draft, validate_project_draft, validate_service_draft,
    FieldErrors,
};
use vitrine_core::{
    gallery, Collection, ContactDraft, ContactInfo, EntityId, EntityKind, GalleryImage, Product,
    ProductDraft, Project, ProjectDraft, Service, ServiceDraft,
};

use crate::ports::{DocumentStore, ObjectStore};
use crate::upload::{upload_in_batches, NewImage};

/// Message used when infrastructure misbehaves; raw driver errors never
/// reach callers.
pub const GENERIC_FAILURE: &str = "The request could not be completed. Please try again later.";

/// Uniform result shape of every mutation entry point. Nothing thrown inside
/// a mutation escapes past this boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
}

impl MutationOutcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
            id: None,
        }
    }

    pub fn created(id: EntityId) -> Self {
        Self {
            success: true,
            error: None,
            id: Some(id),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
            id: None,
        }
    }

    fn infra_failure(operation: &str, err: anyhow::Error) -> Self {
        tracing::warn!("{operation} failed: {err:#}");
        Self::rejected(GENERIC_FAILURE)
    }
}

fn join_field_errors(errors: &FieldErrors) -> String {
    errors.values().cloned().collect::<Vec<_>>().join("; ")
}

/// Catalog documents share id/gallery/collection mechanics; everything else
/// stays per-entity.
trait Record: Serialize + DeserializeOwned + Clone + Send {
    const COLLECTION: Collection;
    fn id(&self) -> &EntityId;
    fn gallery(&self) -> &[GalleryImage];
    fn created_at(&self) -> DateTime<Utc>;
}

macro_rules! impl_record {
    ($ty:ty, $collection:expr) => {
        impl Record for $ty {
            const COLLECTION: Collection = $collection;
            fn id(&self) -> &EntityId {
                &self.id
            }
            fn gallery(&self) -> &[GalleryImage] {
                &self.gallery
            }
            fn created_at(&self) -> DateTime<Utc> {
                self.created_at
            }
        }
    };
}

impl_record!(Product, Collection::Products);
impl_record!(Service, Collection::Services);
impl_record!(Project, Collection::Projects);
impl_record!(ContactInfo, Collection::ContactInfo);

/// CRUD orchestration over the document store and object storage. Each
/// mutation is a single-document upsert/replace/delete; the only
/// cross-store interaction is the best-effort image cleanup around deletes.
pub struct CatalogService<D, O> {
    docs: Arc<D>,
    objects: Arc<O>,
    upload_batch_size: usize,
}

impl<D: DocumentStore, O: ObjectStore> CatalogService<D, O> {
    pub fn new(docs: Arc<D>, objects: Arc<O>, upload_batch_size: usize) -> Self {
        Self {
            docs,
            objects,
            upload_batch_size,
        }
    }

    pub fn image_url(&self, key: &str) -> String {
        self.objects.public_url(key)
    }

    // --- Generic document mechanics ---

    fn load<T: Record>(&self, id: &str) -> anyhow::Result<Option<T>> {
        match self.docs.get(T::COLLECTION, id)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn save<T: Record>(&self, doc: &T) -> anyhow::Result<()> {
        let bytes = serde_json::to_vec(doc)?;
        self.docs.put(T::COLLECTION, doc.id().as_str(), &bytes)
    }

    /// Read with the infrastructure-error boundary applied: failures are
    /// logged here and surfaced as a generic unavailability error. An absent
    /// document is a normal empty result, not an error.
    fn fetch<T: Record>(&self, id: &str) -> anyhow::Result<Option<T>> {
        self.load(id).map_err(|err| {
            tracing::warn!("document read failed: {err:#}");
            anyhow!("catalog temporarily unavailable")
        })
    }

    fn fetch_all<T: Record>(&self) -> anyhow::Result<Vec<T>> {
        let raw = self.docs.list(T::COLLECTION).map_err(|err| {
            tracing::warn!("document list failed: {err:#}");
            anyhow!("catalog temporarily unavailable")
        })?;
        let mut docs = Vec::with_capacity(raw.len());
        for bytes in raw {
            match serde_json::from_slice::<T>(&bytes) {
                Ok(doc) => docs.push(doc),
                Err(err) => tracing::warn!("skipping undecodable document: {err}"),
            }
        }
        docs.sort_by_key(|d| std::cmp::Reverse(d.created_at()));
        Ok(docs)
    }

    async fn upload_images(
        &self,
        kind: EntityKind,
        id: &EntityId,
        files: Vec<NewImage>,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Vec<GalleryImage>> {
        let uploaded = upload_in_batches(
            self.objects.as_ref(),
            kind,
            id,
            now.timestamp_millis(),
            files,
            self.upload_batch_size,
        )
        .await?;
        Ok(uploaded
            .into_iter()
            .map(|img| GalleryImage {
                storage_key: img.key,
                is_main: img.is_main,
                uploaded_at: now,
            })
            .collect())
    }

    async fn delete_images_best_effort(&self, images: &[GalleryImage]) {
        for image in images {
            if let Err(err) = self.objects.delete_object(&image.storage_key).await {
                tracing::warn!(
                    key = %image.storage_key,
                    "stored image cleanup failed, continuing: {err:#}"
                );
            }
        }
    }

    /// Shared delete flow: storage cleanup is attempted first and failures
    /// are logged but never block the metadata delete, trading possible
    /// orphaned objects for never leaving phantom records.
    async fn destroy<T: Record>(&self, id: &str, label: &str) -> MutationOutcome {
        let existing: T = match self.load(id) {
            Ok(Some(doc)) => doc,
            Ok(None) => return MutationOutcome::rejected(format!("{label} not found")),
            Err(err) => return MutationOutcome::infra_failure("delete lookup", err),
        };

        self.delete_images_best_effort(existing.gallery()).await;

        match self.docs.delete(T::COLLECTION, id) {
            Ok(true) => MutationOutcome::ok(),
            Ok(false) => MutationOutcome::rejected(format!("{label} not found")),
            Err(err) => MutationOutcome::infra_failure("delete", err),
        }
    }

    fn merged_gallery(
        retained: Vec<GalleryImage>,
        uploaded: Vec<GalleryImage>,
    ) -> Vec<GalleryImage> {
        let mut merged = retained;
        merged.extend(uploaded);
        gallery::normalize_main_flag(&mut merged);
        merged
    }

    // --- Products ---

    pub async fn create_product(
        &self,
        draft: ProductDraft,
        images: Vec<NewImage>,
    ) -> MutationOutcome {
        if let Err(errors) = validate_product_draft(&draft, images.len()) {
            return MutationOutcome::rejected(join_field_errors(&errors));
        }
        let id = EntityId::generate();
        let now = Utc::now();
        let mut images = match self.upload_images(EntityKind::Product, &id, images, now).await {
            Ok(images) => images,
            Err(err) => return MutationOutcome::infra_failure("product image upload", err),
        };
        gallery::normalize_main_flag(&mut images);

        let product = Product {
            id: id.clone(),
            name: draft.name,
            description: draft.description,
            status: draft.status,
            gallery: images,
            created_at: now,
            updated_at: now,
        };
        match self.save(&product) {
            Ok(()) => MutationOutcome::created(id),
            Err(err) => MutationOutcome::infra_failure("product create", err),
        }
    }

    pub async fn update_product(
        &self,
        id: &str,
        draft: ProductDraft,
        new_images: Vec<NewImage>,
        removed_keys: Vec<String>,
    ) -> MutationOutcome {
        let existing: Product = match self.load(id) {
            Ok(Some(p)) => p,
            Ok(None) => return MutationOutcome::rejected("product not found"),
            Err(err) => return MutationOutcome::infra_failure("product lookup", err),
        };

        let (retained, removed): (Vec<GalleryImage>, Vec<GalleryImage>) = existing
            .gallery
            .iter()
            .cloned()
            .partition(|img| !removed_keys.contains(&img.storage_key));

        if let Err(errors) = validate_product_draft(&draft, retained.len() + new_images.len()) {
            return MutationOutcome::rejected(join_field_errors(&errors));
        }

        let now = Utc::now();
        let uploaded = match self
            .upload_images(EntityKind::Product, &existing.id, new_images, now)
            .await
        {
            Ok(images) => images,
            Err(err) => return MutationOutcome::infra_failure("product image upload", err),
        };
        self.delete_images_best_effort(&removed).await;

        let product = Product {
            id: existing.id.clone(),
            name: draft.name,
            description: draft.description,
            status: draft.status,
            gallery: Self::merged_gallery(retained, uploaded),
            created_at: existing.created_at,
            updated_at: now,
        };
        match self.save(&product) {
            Ok(()) => MutationOutcome::ok(),
            Err(err) => MutationOutcome::infra_failure("product update", err),
        }
    }

    pub async fn delete_product(&self, id: &str) -> MutationOutcome {
        self.destroy::<Product>(id, "product").await
    }

    pub fn product(&self, id: &str) -> anyhow::Result<Option<Product>> {
        self.fetch(id)
    }

    pub fn products(&self) -> anyhow::Result<Vec<Product>> {
        self.fetch_all()
    }

    // --- Services ---

    pub async fn create_service(
        &self,
        draft: ServiceDraft,
        images: Vec<NewImage>,
    ) -> MutationOutcome {
        if let Err(errors) = validate_service_draft(&draft, images.len()) {
            return MutationOutcome::rejected(join_field_errors(&errors));
        }
        let id = EntityId::generate();
        let now = Utc::now();
        let mut images = match self.upload_images(EntityKind::Service, &id, images, now).await {
            Ok(images) => images,
            Err(err) => return MutationOutcome::infra_failure("service image upload", err),
        };
        gallery::normalize_main_flag(&mut images);

        let service = Service {
            id: id.clone(),
            name: draft.name,
            description: draft.description,
            visibility: draft.visibility,
            gallery: images,
            created_at: now,
            updated_at: now,
        };
        match self.save(&service) {
            Ok(()) => MutationOutcome::created(id),
            Err(err) => MutationOutcome::infra_failure("service create", err),
        }
    }

    pub async fn update_service(
        &self,
        id: &str,
        draft: ServiceDraft,
        new_images: Vec<NewImage>,
        removed_keys: Vec<String>,
    ) -> MutationOutcome {
        let existing: Service = match self.load(id) {
            Ok(Some(s)) => s,
            Ok(None) => return MutationOutcome::rejected("service not found"),
            Err(err) => return MutationOutcome::infra_failure("service lookup", err),
        };

        let (retained, removed): (Vec<GalleryImage>, Vec<GalleryImage>) = existing
            .gallery
            .iter()
            .cloned()
            .partition(|img| !removed_keys.contains(&img.storage_key));

        if let Err(errors) = validate_service_draft(&draft, retained.len() + new_images.len()) {
            return MutationOutcome::rejected(join_field_errors(&errors));
        }

        let now = Utc::now();
        let uploaded = match self
            .upload_images(EntityKind::Service, &existing.id, new_images, now)
            .await
        {
            Ok(images) => images,
            Err(err) => return MutationOutcome::infra_failure("service image upload", err),
        };
        self.delete_images_best_effort(&removed).await;

        let service = Service {
            id: existing.id.clone(),
            name: draft.name,
            description: draft.description,
            visibility: draft.visibility,
            gallery: Self::merged_gallery(retained, uploaded),
            created_at: existing.created_at,
            updated_at: now,
        };
        match self.save(&service) {
            Ok(()) => MutationOutcome::ok(),
            Err(err) => MutationOutcome::infra_failure("service update", err),
        }
    }

    pub async fn delete_service(&self, id: &str) -> MutationOutcome {
        self.destroy::<Service>(id, "service").await
    }

    pub fn service(&self, id: &str) -> anyhow::Result<Option<Service>> {
        self.fetch(id)
    }

    pub fn services(&self) -> anyhow::Result<Vec<Service>> {
        self.fetch_all()
    }

    // --- Projects ---

    pub async fn create_project(
        &self,
        draft: ProjectDraft,
        images: Vec<NewImage>,
    ) -> MutationOutcome {
        if let Err(errors) = validate_project_draft(&draft, images.len()) {
            return MutationOutcome::rejected(join_field_errors(&errors));
        }
        let id = EntityId::generate();
        let now = Utc::now();
        let mut images = match self.upload_images(EntityKind::Project, &id, images, now).await {
            Ok(images) => images,
            Err(err) => return MutationOutcome::infra_failure("project image upload", err),
        };
        gallery::normalize_main_flag(&mut images);

        let project = Project {
            id: id.clone(),
            name: draft.name,
            description: draft.description,
            status: draft.status,
            gallery: images,
            created_at: now,
            updated_at: now,
        };
        match self.save(&project) {
            Ok(()) => MutationOutcome::created(id),
            Err(err) => MutationOutcome::infra_failure("project create", err),
        }
    }

    pub async fn update_project(
        &self,
        id: &str,
        draft: ProjectDraft,
        new_images: Vec<NewImage>,
        removed_keys: Vec<String>,
    ) -> MutationOutcome {
        let existing: Project = match self.load(id) {
            Ok(Some(p)) => p,
            Ok(None) => return MutationOutcome::rejected("project not found"),
            Err(err) => return MutationOutcome::infra_failure("project lookup", err),
        };

        let (retained, removed): (Vec<GalleryImage>, Vec<GalleryImage>) = existing
            .gallery
            .iter()
            .cloned()
            .partition(|img| !removed_keys.contains(&img.storage_key));

        if let Err(errors) = validate_project_draft(&draft, retained.len() + new_images.len()) {
            return MutationOutcome::rejected(join_field_errors(&errors));
        }

        let now = Utc::now();
        let uploaded = match self
            .upload_images(EntityKind::Project, &existing.id, new_images, now)
            .await
        {
            Ok(images) => images,
            Err(err) => return MutationOutcome::infra_failure("project image upload", err),
        };
        self.delete_images_best_effort(&removed).await;

        let project = Project {
            id: existing.id.clone(),
            name: draft.name,
            description: draft.description,
            status: draft.status,
            gallery: Self::merged_gallery(retained, uploaded),
            created_at: existing.created_at,
            updated_at: now,
        };
        match self.save(&project) {
            Ok(()) => MutationOutcome::ok(),
            Err(err) => MutationOutcome::infra_failure("project update", err),
        }
    }

    pub async fn delete_project(&self, id: &str) -> MutationOutcome {
        self.destroy::<Project>(id, "project").await
    }

    pub fn project(&self, id: &str) -> anyhow::Result<Option<Project>> {
        self.fetch(id)
    }

    pub fn projects(&self) -> anyhow::Result<Vec<Project>> {
        self.fetch_all()
    }

    // --- Contact info (singleton document) ---

    pub fn contact_info(&self) -> anyhow::Result<Option<ContactInfo>> {
        self.fetch(vitrine_core::catalog::CONTACT_INFO_ID)
    }

    /// Upsert: the contact document is created on first write.
    pub async fn update_contact(
        &self,
        draft: ContactDraft,
        new_images: Vec<NewImage>,
        removed_keys: Vec<String>,
    ) -> MutationOutcome {
        if let Err(errors) = validate_contact_draft(&draft) {
            return MutationOutcome::rejected(join_field_errors(&errors));
        }

        let existing: Option<ContactInfo> =
            match self.load(vitrine_core::catalog::CONTACT_INFO_ID) {
                Ok(existing) => existing,
                Err(err) => return MutationOutcome::infra_failure("contact lookup", err),
            };

        let now = Utc::now();
        let id = EntityId::from(vitrine_core::catalog::CONTACT_INFO_ID);
        let (retained, removed): (Vec<GalleryImage>, Vec<GalleryImage>) = existing
            .as_ref()
            .map(|c| c.gallery.clone())
            .unwrap_or_default()
            .into_iter()
            .partition(|img| !removed_keys.contains(&img.storage_key));

        let uploaded = match self
            .upload_images(EntityKind::Contact, &id, new_images, now)
            .await
        {
            Ok(images) => images,
            Err(err) => return MutationOutcome::infra_failure("contact image upload", err),
        };
        self.delete_images_best_effort(&removed).await;

        let contact = ContactInfo {
            id,
            address: draft.address,
            phone: draft.phone,
            email: draft.email,
            gallery: Self::merged_gallery(retained, uploaded),
            created_at: existing.as_ref().map(|c| c.created_at).unwrap_or(now),
            updated_at: now,
        };
        match self.save(&contact) {
            Ok(()) => MutationOutcome::ok(),
            Err(err) => MutationOutcome::infra_failure("contact update", err),
        }
    }
}
