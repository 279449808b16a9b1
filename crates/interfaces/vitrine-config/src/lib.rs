//! Central configuration constants and environment-derived settings.

use camino::Utf8PathBuf;

/// Gallery uploads go out in fixed-size concurrent batches of this many
/// files, bounding peak outbound storage connections.
pub const UPLOAD_BATCH_SIZE: usize = 4;

/// Cookie carrying the admin session id.
pub const SESSION_COOKIE: &str = "vitrine_session";

/// Cookie toggling public sections between static and database-backed
/// content. Off unless explicitly truthy.
pub const FEATURE_FLAG_COOKIE: &str = "use_database_value";

/// Auto-advance interval for public image carousels.
pub const GALLERY_CYCLE_MS: u64 = 5_000;

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_REGION: &str = "ap-southeast-1";

/// Truthy values of the feature-flag cookie.
pub fn is_truthy_flag(value: &str) -> bool {
    matches!(value, "true" | "1")
}

/// Parse the comma-separated admin allow-list environment value.
pub fn parse_allow_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|part| part.trim().to_ascii_lowercase())
        .filter(|part| !part.is_empty())
        .collect()
}

pub fn email_allowed(allow_list: &[String], email: &str) -> bool {
    let email = email.trim().to_ascii_lowercase();
    allow_list.iter().any(|allowed| *allowed == email)
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub data_dir: Utf8PathBuf,
    pub bucket: String,
    pub region: String,
    /// Override for the derived bucket URL (tests, self-hosted gateways).
    pub storage_endpoint: Option<String>,
    pub allowed_emails: Vec<String>,
    /// Absolute site origin used in sitemap/robots output.
    pub base_url: String,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let data_dir = match std::env::var("VITRINE_DATA_DIR") {
            Ok(dir) => Utf8PathBuf::from(dir),
            Err(_) => default_data_dir()?,
        };

        Ok(Self {
            bind: std::env::var("VITRINE_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string()),
            data_dir,
            bucket: std::env::var("VITRINE_BUCKET").unwrap_or_else(|_| "vitrine-media".to_string()),
            region: std::env::var("VITRINE_REGION").unwrap_or_else(|_| DEFAULT_REGION.to_string()),
            storage_endpoint: std::env::var("VITRINE_STORAGE_ENDPOINT").ok(),
            allowed_emails: parse_allow_list(
                &std::env::var("ADMIN_ALLOWED_EMAILS").unwrap_or_default(),
            ),
            base_url: std::env::var("VITRINE_BASE_URL")
                .unwrap_or_else(|_| "https://example.com".to_string()),
        })
    }
}

fn default_data_dir() -> anyhow::Result<Utf8PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "vitrine")
        .ok_or_else(|| anyhow::anyhow!("could not resolve a data directory"))?;
    Utf8PathBuf::from_path_buf(dirs.data_dir().to_path_buf())
        .map_err(|p| anyhow::anyhow!("data directory is not valid UTF-8: {}", p.display()))
}
