use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use vitrine_catalog::MutationOutcome;
use vitrine_core::validate::looks_like_email;
use vitrine_core::{Locale, LocalizedText};

use crate::content::{self, ContentSource, SectionView};
use crate::AppContext;

/// Infrastructure failures never leak driver errors to the public surface.
fn unavailable(err: anyhow::Error) -> Response {
    tracing::warn!("public content unavailable: {err:#}");
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(serde_json::json!({ "error": "content temporarily unavailable" })),
    )
        .into_response()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NotFoundView {
    error: &'static str,
    id: String,
}

/// A missing document renders as a dedicated not-found presentation, not a
/// page failure.
fn not_found(id: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundView {
            error: "not found",
            id: id.to_string(),
        }),
    )
        .into_response()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeView {
    pub locale: Locale,
    pub name: String,
    pub tagline: String,
    pub featured: SectionView,
}

pub async fn home(
    State(ctx): State<AppContext>,
    Extension(locale): Extension<Locale>,
    headers: HeaderMap,
) -> Response {
    let mut featured = match content::content_source(&headers) {
        ContentSource::Static => content::static_section(locale, &content::static_products()),
        ContentSource::Database => match content::db_products_section(&ctx.catalog, locale) {
            Ok(section) => section,
            Err(err) => return unavailable(err),
        },
    };
    featured.items.truncate(3);

    let tagline = LocalizedText::new(
        "Cơ khí chế tạo và kết cấu thép cho công nghiệp",
        "Fabrication and structural steel for industry",
    );
    Json(HomeView {
        locale,
        name: "Vitrine Mechanical".to_string(),
        tagline: tagline.get(locale).to_string(),
        featured,
    })
    .into_response()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutView {
    pub locale: Locale,
    pub name: String,
    pub profile: String,
}

pub async fn about(Extension(locale): Extension<Locale>) -> Json<AboutView> {
    let profile = LocalizedText::new(
        "Thành lập năm 2009, công ty chuyên gia công cơ khí, kết cấu thép \
         và lắp dựng nhà xưởng cho khách hàng công nghiệp phía Nam.",
        "Founded in 2009, the company fabricates machined parts and \
         structural steel and erects factory buildings for industrial \
         customers across the southern region.",
    );
    Json(AboutView {
        locale,
        name: "Vitrine Mechanical".to_string(),
        profile: profile.get(locale).to_string(),
    })
}

pub async fn products(
    State(ctx): State<AppContext>,
    Extension(locale): Extension<Locale>,
    headers: HeaderMap,
) -> Response {
    match content::content_source(&headers) {
        ContentSource::Static => {
            Json(content::static_section(locale, &content::static_products())).into_response()
        }
        ContentSource::Database => match content::db_products_section(&ctx.catalog, locale) {
            Ok(section) => Json(section).into_response(),
            Err(err) => unavailable(err),
        },
    }
}

pub async fn product_detail(
    State(ctx): State<AppContext>,
    Extension(locale): Extension<Locale>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    match content::content_source(&headers) {
        ContentSource::Static => {
            let items = content::static_products();
            match items.iter().find(|item| item.slug == id) {
                Some(item) => {
                    Json(content::static_section(locale, std::slice::from_ref(item)))
                        .into_response()
                }
                None => not_found(&id),
            }
        }
        ContentSource::Database => match ctx.catalog.product(&id) {
            Ok(Some(product)) => {
                Json(content::product_view(&ctx.catalog, locale, &product)).into_response()
            }
            Ok(None) => not_found(&id),
            Err(err) => unavailable(err),
        },
    }
}

pub async fn services(
    State(ctx): State<AppContext>,
    Extension(locale): Extension<Locale>,
    headers: HeaderMap,
) -> Response {
    match content::content_source(&headers) {
        ContentSource::Static => {
            Json(content::static_section(locale, &content::static_services())).into_response()
        }
        ContentSource::Database => match content::db_services_section(&ctx.catalog, locale) {
            Ok(section) => Json(section).into_response(),
            Err(err) => unavailable(err),
        },
    }
}

pub async fn projects(
    State(ctx): State<AppContext>,
    Extension(locale): Extension<Locale>,
    headers: HeaderMap,
) -> Response {
    match content::content_source(&headers) {
        ContentSource::Static => {
            Json(content::static_section(locale, &content::static_projects())).into_response()
        }
        ContentSource::Database => match content::db_projects_section(&ctx.catalog, locale) {
            Ok(section) => Json(section).into_response(),
            Err(err) => unavailable(err),
        },
    }
}

pub async fn project_detail(
    State(ctx): State<AppContext>,
    Extension(locale): Extension<Locale>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    match content::content_source(&headers) {
        ContentSource::Static => {
            let items = content::static_projects();
            match items.iter().find(|item| item.slug == id) {
                Some(item) => {
                    Json(content::static_section(locale, std::slice::from_ref(item)))
                        .into_response()
                }
                None => not_found(&id),
            }
        }
        ContentSource::Database => match ctx.catalog.project(&id) {
            Ok(Some(project)) => {
                Json(content::project_view(&ctx.catalog, locale, &project)).into_response()
            }
            Ok(None) => not_found(&id),
            Err(err) => unavailable(err),
        },
    }
}

pub async fn contact(
    State(ctx): State<AppContext>,
    Extension(locale): Extension<Locale>,
    headers: HeaderMap,
) -> Response {
    match content::content_source(&headers) {
        ContentSource::Static => Json(content::static_contact_view(locale)).into_response(),
        ContentSource::Database => match ctx.catalog.contact_info() {
            Ok(Some(info)) => Json(content::contact_view_from(
                &ctx.catalog,
                locale,
                ContentSource::Database,
                &info,
            ))
            .into_response(),
            // No contact document yet; the page still renders the static
            // fallback rather than failing.
            Ok(None) => Json(content::static_contact_view(locale)).into_response(),
            Err(err) => unavailable(err),
        },
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

pub async fn submit_contact(Json(form): Json<ContactMessage>) -> Json<MutationOutcome> {
    let mut problems = Vec::new();
    if form.name.trim().is_empty() {
        problems.push("name is required".to_string());
    }
    if !looks_like_email(&form.email) {
        problems.push("email address is not valid".to_string());
    }
    if form.message.trim().is_empty() {
        problems.push("message is required".to_string());
    }
    if !problems.is_empty() {
        return Json(MutationOutcome::rejected(problems.join("; ")));
    }

    tracing::info!(
        from = %form.email.trim(),
        name = %form.name.trim(),
        "contact form submission received"
    );
    Json(MutationOutcome::ok())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyView {
    pub locale: Locale,
    pub body: String,
}

pub async fn privacy_policy(Extension(locale): Extension<Locale>) -> Json<PolicyView> {
    let body = LocalizedText::new(
        "Chúng tôi chỉ lưu thông tin liên hệ bạn gửi qua biểu mẫu và không \
         chia sẻ cho bên thứ ba.",
        "We only keep the contact details you submit through the form and \
         never share them with third parties.",
    );
    Json(PolicyView {
        locale,
        body: body.get(locale).to_string(),
    })
}
