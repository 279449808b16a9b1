pub mod admin;
pub mod auth;
pub mod content;
pub mod public;
pub mod seed;
pub mod seo;

use std::sync::Arc;

use axum::routing::{get, put};
use axum::{middleware, Extension, Router};
use vitrine_catalog::CatalogService;
use vitrine_config::ServerConfig;
use vitrine_core::Locale;
use vitrine_persistence::RedbCatalogStore;
use vitrine_storage::HttpObjectStore;

use auth::{AuthGateway, Sessions, UnconfiguredAuthGateway};

pub type Catalog = CatalogService<RedbCatalogStore, HttpObjectStore>;

#[derive(Clone)]
pub struct AppContext {
    pub catalog: Arc<Catalog>,
    pub config: Arc<ServerConfig>,
    pub sessions: Arc<dyn Sessions>,
    pub auth: Arc<dyn AuthGateway>,
}

impl AppContext {
    pub fn new(
        config: ServerConfig,
        sessions: Arc<dyn Sessions>,
        auth: Arc<dyn AuthGateway>,
    ) -> anyhow::Result<Self> {
        let docs = Arc::new(RedbCatalogStore::open(&config.data_dir)?);
        let client = vitrine_storage::default_client()?;
        let mut objects = HttpObjectStore::new(client, &config.bucket, &config.region);
        if let Some(endpoint) = &config.storage_endpoint {
            objects = objects.with_endpoint(endpoint);
        }
        let catalog = Arc::new(CatalogService::new(
            docs,
            Arc::new(objects),
            vitrine_config::UPLOAD_BATCH_SIZE,
        ));

        Ok(Self {
            catalog,
            config: Arc::new(config),
            sessions,
            auth,
        })
    }
}

fn localized_public_routes(locale: Locale) -> Router<AppContext> {
    Router::new()
        .route("/", get(public::home))
        .route("/about", get(public::about))
        .route("/products", get(public::products))
        .route("/products/:id", get(public::product_detail))
        .route("/services", get(public::services))
        .route("/projects", get(public::projects))
        .route("/projects/:id", get(public::project_detail))
        .route("/contact", get(public::contact).post(public::submit_contact))
        .route("/privacy-policy", get(public::privacy_policy))
        .layer(Extension(locale))
}

fn admin_routes(ctx: AppContext) -> Router<AppContext> {
    Router::new()
        .route("/admin", get(admin::dashboard))
        .route("/admin/products", get(admin::list_products).post(admin::create_product))
        .route(
            "/admin/products/:id",
            put(admin::update_product).delete(admin::delete_product),
        )
        .route("/admin/services", get(admin::list_services).post(admin::create_service))
        .route(
            "/admin/services/:id",
            put(admin::update_service).delete(admin::delete_service),
        )
        .route("/admin/projects", get(admin::list_projects).post(admin::create_project))
        .route(
            "/admin/projects/:id",
            put(admin::update_project).delete(admin::delete_project),
        )
        .route("/admin/contact", get(admin::get_contact).put(admin::update_contact))
        .layer(middleware::from_fn_with_state(ctx, auth::admin_guard))
}

pub fn build_router(ctx: AppContext) -> Router {
    Router::new()
        // Unprefixed routes serve the default locale; /vi and /en carry the
        // same pages with the locale fixed by the prefix.
        .merge(localized_public_routes(Locale::default()))
        .nest("/vi", localized_public_routes(Locale::Vi))
        .nest("/en", localized_public_routes(Locale::En))
        .route("/robots.txt", get(seo::robots))
        .route("/sitemap.xml", get(seo::sitemap))
        .route("/login", get(auth::login))
        .route("/unauthorized", get(auth::unauthorized))
        .route("/api/auth/*path", get(auth::oauth_callback).post(auth::oauth_callback))
        .merge(admin_routes(ctx.clone()))
        .with_state(ctx)
}

pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let sessions: Arc<dyn Sessions> = Arc::new(auth::InMemorySessions::default());
    let auth_gateway: Arc<dyn AuthGateway> = Arc::new(UnconfiguredAuthGateway);
    let ctx = AppContext::new(config, sessions, auth_gateway)?;

    let bind = ctx.config.bind.clone();
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!("vitrine listening on {}", listener.local_addr()?);
    axum::serve(listener, build_router(ctx)).await?;
    Ok(())
}
