use axum::http::HeaderMap;
use serde::Serialize;
use vitrine_core::{
    ContactInfo, Locale, LocalizedText, Product, ProductStatus, Project, ProjectStatus, Service,
    Visibility,
};

use crate::auth::cookie_value;
use crate::Catalog;

/// Which variant of a public section is being served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentSource {
    Static,
    Database,
}

/// The `use_database_value` cookie switches each public content section
/// between the static variant and the live database variant. Default off.
pub fn content_source(headers: &HeaderMap) -> ContentSource {
    match cookie_value(headers, vitrine_config::FEATURE_FLAG_COOKIE) {
        Some(value) if vitrine_config::is_truthy_flag(&value) => ContentSource::Database,
        _ => ContentSource::Static,
    }
}

// --- View models (rendering is an external collaborator; handlers expose
// --- locale-resolved JSON) ---

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageView {
    pub src: String,
    pub alt: String,
    pub is_main: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItemView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: String,
    pub images: Vec<ImageView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionView {
    pub locale: Locale,
    pub source: ContentSource,
    pub items: Vec<CatalogItemView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactView {
    pub locale: Locale,
    pub source: ContentSource,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub images: Vec<ImageView>,
}

// --- Static variant ---

pub struct StaticItem {
    pub slug: &'static str,
    pub name: LocalizedText,
    pub description: LocalizedText,
    pub status: &'static str,
    pub image: &'static str,
}

impl StaticItem {
    fn new(
        slug: &'static str,
        name: (&str, &str),
        description: (&str, &str),
        status: &'static str,
        image: &'static str,
    ) -> Self {
        Self {
            slug,
            name: LocalizedText::new(name.0, name.1),
            description: LocalizedText::new(description.0, description.1),
            status,
            image,
        }
    }

    fn view(&self, locale: Locale) -> CatalogItemView {
        CatalogItemView {
            id: self.slug.to_string(),
            name: self.name.get(locale).to_string(),
            description: self.description.get(locale).to_string(),
            status: self.status.to_string(),
            images: vec![ImageView {
                src: self.image.to_string(),
                alt: self.name.get(locale).to_string(),
                is_main: true,
            }],
        }
    }
}

pub fn static_products() -> Vec<StaticItem> {
    vec![
        StaticItem::new(
            "cua-cuon-cong-nghiep",
            ("Cửa cuốn công nghiệp", "Industrial roller doors"),
            (
                "Cửa cuốn thép mạ kẽm cho nhà xưởng, vận hành bằng động cơ.",
                "Galvanized steel roller doors for workshops, motor driven.",
            ),
            "available",
            "/static/products/roller-door.jpg",
        ),
        StaticItem::new(
            "khung-nha-thep",
            ("Khung nhà thép tiền chế", "Pre-engineered steel frames"),
            (
                "Khung kèo thép tiền chế theo bản vẽ, lắp dựng tại công trình.",
                "Pre-engineered steel frames built to drawing, erected on site.",
            ),
            "available",
            "/static/products/steel-frame.jpg",
        ),
        StaticItem::new(
            "lan-can-inox",
            ("Lan can inox", "Stainless steel railings"),
            (
                "Lan can cầu thang và ban công bằng inox 304.",
                "Staircase and balcony railings in 304 stainless steel.",
            ),
            "available",
            "/static/products/railing.jpg",
        ),
    ]
}

pub fn static_services() -> Vec<StaticItem> {
    vec![
        StaticItem::new(
            "gia-cong-co-khi",
            ("Gia công cơ khí chính xác", "Precision machining"),
            (
                "Tiện, phay CNC theo bản vẽ với dung sai chặt.",
                "CNC turning and milling to drawing with tight tolerances.",
            ),
            "published",
            "/static/services/machining.jpg",
        ),
        StaticItem::new(
            "han-ket-cau",
            ("Hàn kết cấu thép", "Structural steel welding"),
            (
                "Hàn MIG/TIG kết cấu thép tại xưởng và công trình.",
                "MIG/TIG structural welding in-shop and on site.",
            ),
            "published",
            "/static/services/welding.jpg",
        ),
        StaticItem::new(
            "bao-tri-thiet-bi",
            ("Bảo trì thiết bị nhà máy", "Plant equipment maintenance"),
            (
                "Bảo trì định kỳ băng tải, máy nén và thiết bị nâng hạ.",
                "Scheduled maintenance of conveyors, compressors and lifting gear.",
            ),
            "published",
            "/static/services/maintenance.jpg",
        ),
    ]
}

pub fn static_projects() -> Vec<StaticItem> {
    vec![
        StaticItem::new(
            "nha-xuong-binh-duong",
            ("Nhà xưởng Bình Dương", "Binh Duong factory hall"),
            (
                "Thi công khung thép và mái cho nhà xưởng 2.400 m².",
                "Steel frame and roofing for a 2,400 m² factory hall.",
            ),
            "completed",
            "/static/projects/factory.jpg",
        ),
        StaticItem::new(
            "kho-lanh-long-an",
            ("Kho lạnh Long An", "Long An cold storage"),
            (
                "Lắp dựng kết cấu kho lạnh với panel cách nhiệt.",
                "Cold-storage structure with insulated panel walls.",
            ),
            "completed",
            "/static/projects/cold-storage.jpg",
        ),
        StaticItem::new(
            "cau-thang-van-phong",
            ("Cầu thang văn phòng Quận 7", "District 7 office staircase"),
            (
                "Cầu thang thép và lan can kính cho tòa văn phòng.",
                "Steel staircase with glass railing for an office building.",
            ),
            "ongoing",
            "/static/projects/staircase.jpg",
        ),
    ]
}

pub struct StaticContact {
    pub address: LocalizedText,
    pub phone: &'static str,
    pub email: &'static str,
}

pub fn static_contact() -> StaticContact {
    StaticContact {
        address: LocalizedText::new(
            "12 đường số 8, KCN Sóng Thần, Dĩ An, Bình Dương",
            "12 Street No. 8, Song Than Industrial Park, Di An, Binh Duong",
        ),
        phone: "+84 274 000 000",
        email: "contact@vitrine-mfg.vn",
    }
}

pub fn static_section(locale: Locale, items: &[StaticItem]) -> SectionView {
    SectionView {
        locale,
        source: ContentSource::Static,
        items: items.iter().map(|item| item.view(locale)).collect(),
    }
}

// --- Database variant ---

fn image_views(catalog: &Catalog, locale: Locale, name: &LocalizedText, gallery: &[vitrine_core::GalleryImage]) -> Vec<ImageView> {
    gallery
        .iter()
        .map(|img| ImageView {
            src: catalog.image_url(&img.storage_key),
            alt: name.get(locale).to_string(),
            is_main: img.is_main,
        })
        .collect()
}

pub fn product_status_label(status: ProductStatus) -> &'static str {
    match status {
        ProductStatus::Available => "available",
        ProductStatus::OutOfStock => "out_of_stock",
        ProductStatus::Discontinued => "discontinued",
    }
}

pub fn project_status_label(status: ProjectStatus) -> &'static str {
    match status {
        ProjectStatus::Ongoing => "ongoing",
        ProjectStatus::Completed => "completed",
    }
}

pub fn product_view(catalog: &Catalog, locale: Locale, product: &Product) -> CatalogItemView {
    CatalogItemView {
        id: product.id.to_string(),
        name: product.name.get(locale).to_string(),
        description: product.description.get(locale).to_string(),
        status: product_status_label(product.status).to_string(),
        images: image_views(catalog, locale, &product.name, &product.gallery),
    }
}

pub fn service_view(catalog: &Catalog, locale: Locale, service: &Service) -> CatalogItemView {
    CatalogItemView {
        id: service.id.to_string(),
        name: service.name.get(locale).to_string(),
        description: service.description.get(locale).to_string(),
        status: "published".to_string(),
        images: image_views(catalog, locale, &service.name, &service.gallery),
    }
}

pub fn project_view(catalog: &Catalog, locale: Locale, project: &Project) -> CatalogItemView {
    CatalogItemView {
        id: project.id.to_string(),
        name: project.name.get(locale).to_string(),
        description: project.description.get(locale).to_string(),
        status: project_status_label(project.status).to_string(),
        images: image_views(catalog, locale, &project.name, &project.gallery),
    }
}

pub fn db_products_section(catalog: &Catalog, locale: Locale) -> anyhow::Result<SectionView> {
    let items = catalog
        .products()?
        .iter()
        .map(|p| product_view(catalog, locale, p))
        .collect();
    Ok(SectionView {
        locale,
        source: ContentSource::Database,
        items,
    })
}

pub fn db_services_section(catalog: &Catalog, locale: Locale) -> anyhow::Result<SectionView> {
    let items = catalog
        .services()?
        .iter()
        .filter(|s| s.visibility == Visibility::Published)
        .map(|s| service_view(catalog, locale, s))
        .collect();
    Ok(SectionView {
        locale,
        source: ContentSource::Database,
        items,
    })
}

pub fn db_projects_section(catalog: &Catalog, locale: Locale) -> anyhow::Result<SectionView> {
    let items = catalog
        .projects()?
        .iter()
        .map(|p| project_view(catalog, locale, p))
        .collect();
    Ok(SectionView {
        locale,
        source: ContentSource::Database,
        items,
    })
}

pub fn contact_view_from(
    catalog: &Catalog,
    locale: Locale,
    source: ContentSource,
    contact: &ContactInfo,
) -> ContactView {
    ContactView {
        locale,
        source,
        address: contact.address.get(locale).to_string(),
        phone: contact.phone.clone(),
        email: contact.email.clone(),
        images: image_views(catalog, locale, &contact.address, &contact.gallery),
    }
}

pub fn static_contact_view(locale: Locale) -> ContactView {
    let contact = static_contact();
    ContactView {
        locale,
        source: ContentSource::Static,
        address: contact.address.get(locale).to_string(),
        phone: contact.phone.to_string(),
        email: contact.email.to_string(),
        images: Vec::new(),
    }
}
