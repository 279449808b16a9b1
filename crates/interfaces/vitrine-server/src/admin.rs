use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use base64::Engine;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use vitrine_catalog::{MutationOutcome, NewImage};
use vitrine_core::{ContactDraft, ContactInfo, Product, ProductDraft, Project, ProjectDraft, Service, ServiceDraft};

use crate::AppContext;

fn unavailable(err: anyhow::Error) -> Response {
    tracing::warn!("admin catalog read failed: {err:#}");
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(serde_json::json!({ "error": "catalog temporarily unavailable" })),
    )
        .into_response()
}

/// File payload of an admin mutation: bytes travel base64-encoded inside the
/// JSON body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePayload {
    pub file_name: String,
    pub content_type: String,
    pub data: String,
    #[serde(default)]
    pub is_main: bool,
}

fn decode_images(payloads: Vec<ImagePayload>) -> Result<Vec<NewImage>, MutationOutcome> {
    let mut files = Vec::with_capacity(payloads.len());
    for payload in payloads {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload.data.as_bytes())
            .map_err(|_| {
                MutationOutcome::rejected(format!("invalid image payload: {}", payload.file_name))
            })?;
        files.push(NewImage {
            file_name: payload.file_name,
            content_type: payload.content_type,
            bytes: Bytes::from(bytes),
            is_main: payload.is_main,
        });
    }
    Ok(files)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    #[serde(flatten)]
    pub draft: ProductDraft,
    #[serde(default)]
    pub images: Vec<ImagePayload>,
    #[serde(default)]
    pub removed_keys: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceForm {
    #[serde(flatten)]
    pub draft: ServiceDraft,
    #[serde(default)]
    pub images: Vec<ImagePayload>,
    #[serde(default)]
    pub removed_keys: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectForm {
    #[serde(flatten)]
    pub draft: ProjectDraft,
    #[serde(default)]
    pub images: Vec<ImagePayload>,
    #[serde(default)]
    pub removed_keys: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    #[serde(flatten)]
    pub draft: ContactDraft,
    #[serde(default)]
    pub images: Vec<ImagePayload>,
    #[serde(default)]
    pub removed_keys: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub products: usize,
    pub services: usize,
    pub projects: usize,
    pub has_contact_info: bool,
}

pub async fn dashboard(State(ctx): State<AppContext>) -> Response {
    let counts = (|| -> anyhow::Result<DashboardView> {
        Ok(DashboardView {
            products: ctx.catalog.products()?.len(),
            services: ctx.catalog.services()?.len(),
            projects: ctx.catalog.projects()?.len(),
            has_contact_info: ctx.catalog.contact_info()?.is_some(),
        })
    })();
    match counts {
        Ok(view) => Json(view).into_response(),
        Err(err) => unavailable(err),
    }
}

/// Admin listings carry the raw document plus derived image URLs so the
/// back office can preview galleries without re-deriving storage layout.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminEntry<T> {
    #[serde(flatten)]
    pub doc: T,
    pub image_urls: Vec<String>,
}

fn with_urls<T>(ctx: &AppContext, doc: T, gallery: &[vitrine_core::GalleryImage]) -> AdminEntry<T> {
    AdminEntry {
        image_urls: gallery
            .iter()
            .map(|img| ctx.catalog.image_url(&img.storage_key))
            .collect(),
        doc,
    }
}

// --- Products ---

pub async fn list_products(State(ctx): State<AppContext>) -> Response {
    match ctx.catalog.products() {
        Ok(products) => Json(
            products
                .into_iter()
                .map(|p| {
                    let gallery = p.gallery.clone();
                    with_urls::<Product>(&ctx, p, &gallery)
                })
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(err) => unavailable(err),
    }
}

pub async fn create_product(
    State(ctx): State<AppContext>,
    Json(form): Json<ProductForm>,
) -> Json<MutationOutcome> {
    let images = match decode_images(form.images) {
        Ok(images) => images,
        Err(outcome) => return Json(outcome),
    };
    Json(ctx.catalog.create_product(form.draft, images).await)
}

pub async fn update_product(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    Json(form): Json<ProductForm>,
) -> Json<MutationOutcome> {
    let images = match decode_images(form.images) {
        Ok(images) => images,
        Err(outcome) => return Json(outcome),
    };
    Json(
        ctx.catalog
            .update_product(&id, form.draft, images, form.removed_keys)
            .await,
    )
}

pub async fn delete_product(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Json<MutationOutcome> {
    Json(ctx.catalog.delete_product(&id).await)
}

// --- Services ---

pub async fn list_services(State(ctx): State<AppContext>) -> Response {
    match ctx.catalog.services() {
        Ok(services) => Json(
            services
                .into_iter()
                .map(|s| {
                    let gallery = s.gallery.clone();
                    with_urls::<Service>(&ctx, s, &gallery)
                })
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(err) => unavailable(err),
    }
}

pub async fn create_service(
    State(ctx): State<AppContext>,
    Json(form): Json<ServiceForm>,
) -> Json<MutationOutcome> {
    let images = match decode_images(form.images) {
        Ok(images) => images,
        Err(outcome) => return Json(outcome),
    };
    Json(ctx.catalog.create_service(form.draft, images).await)
}

pub async fn update_service(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    Json(form): Json<ServiceForm>,
) -> Json<MutationOutcome> {
    let images = match decode_images(form.images) {
        Ok(images) => images,
        Err(outcome) => return Json(outcome),
    };
    Json(
        ctx.catalog
            .update_service(&id, form.draft, images, form.removed_keys)
            .await,
    )
}

pub async fn delete_service(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Json<MutationOutcome> {
    Json(ctx.catalog.delete_service(&id).await)
}

// --- Projects ---

pub async fn list_projects(State(ctx): State<AppContext>) -> Response {
    match ctx.catalog.projects() {
        Ok(projects) => Json(
            projects
                .into_iter()
                .map(|p| {
                    let gallery = p.gallery.clone();
                    with_urls::<Project>(&ctx, p, &gallery)
                })
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(err) => unavailable(err),
    }
}

pub async fn create_project(
    State(ctx): State<AppContext>,
    Json(form): Json<ProjectForm>,
) -> Json<MutationOutcome> {
    let images = match decode_images(form.images) {
        Ok(images) => images,
        Err(outcome) => return Json(outcome),
    };
    Json(ctx.catalog.create_project(form.draft, images).await)
}

pub async fn update_project(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    Json(form): Json<ProjectForm>,
) -> Json<MutationOutcome> {
    let images = match decode_images(form.images) {
        Ok(images) => images,
        Err(outcome) => return Json(outcome),
    };
    Json(
        ctx.catalog
            .update_project(&id, form.draft, images, form.removed_keys)
            .await,
    )
}

pub async fn delete_project(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Json<MutationOutcome> {
    Json(ctx.catalog.delete_project(&id).await)
}

// --- Contact info ---

pub async fn get_contact(State(ctx): State<AppContext>) -> Response {
    match ctx.catalog.contact_info() {
        Ok(Some(info)) => {
            let gallery = info.gallery.clone();
            Json(with_urls::<ContactInfo>(&ctx, info, &gallery)).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "not found" })),
        )
            .into_response(),
        Err(err) => unavailable(err),
    }
}

pub async fn update_contact(
    State(ctx): State<AppContext>,
    Json(form): Json<ContactForm>,
) -> Json<MutationOutcome> {
    let images = match decode_images(form.images) {
        Ok(images) => images,
        Err(outcome) => return Json(outcome),
    };
    Json(
        ctx.catalog
            .update_contact(form.draft, images, form.removed_keys)
            .await,
    )
}
