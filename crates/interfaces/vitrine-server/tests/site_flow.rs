use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::put;
use axum::Router;
use base64::Engine;
use camino::Utf8PathBuf;
use vitrine_config::ServerConfig;
use vitrine_server::auth::{AuthGateway, InMemorySessions, Sessions, UnconfiguredAuthGateway};
use vitrine_server::{build_router, AppContext};

const ADMIN_EMAIL: &str = "admin@acme.vn";

async fn start_bucket() -> SocketAddr {
    async fn accept() -> StatusCode {
        StatusCode::OK
    }
    let app = Router::new().route("/*key", put(accept).delete(accept));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

struct TestApp {
    base: String,
    _data_dir: tempfile::TempDir,
}

async fn start_app() -> TestApp {
    let data_dir = tempfile::tempdir().unwrap();
    let bucket = start_bucket().await;

    let config = ServerConfig {
        bind: "127.0.0.1:0".to_string(),
        data_dir: Utf8PathBuf::from_path_buf(data_dir.path().to_path_buf()).unwrap(),
        bucket: "test-media".to_string(),
        region: "ap-southeast-1".to_string(),
        storage_endpoint: Some(format!("http://{bucket}")),
        allowed_emails: vitrine_config::parse_allow_list(ADMIN_EMAIL),
        base_url: "https://example.com".to_string(),
    };

    let sessions = Arc::new(InMemorySessions::default());
    sessions.insert("admin-session", ADMIN_EMAIL);
    sessions.insert("guest-session", "guest@elsewhere.vn");

    let auth: Arc<dyn AuthGateway> = Arc::new(UnconfiguredAuthGateway);
    let ctx = AppContext::new(config, sessions as Arc<dyn Sessions>, auth).unwrap();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, build_router(ctx)).await.unwrap();
    });

    TestApp {
        base: format!("http://{addr}"),
        _data_dir: data_dir,
    }
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

fn session_cookie(id: &str) -> String {
    format!("{}={id}", vitrine_config::SESSION_COOKIE)
}

fn db_cookie() -> String {
    format!("{}=1", vitrine_config::FEATURE_FLAG_COOKIE)
}

fn product_body(name_en: &str) -> serde_json::Value {
    let data = base64::engine::general_purpose::STANDARD.encode(b"jpeg-bytes");
    serde_json::json!({
        "name": { "vi": "Bồn chứa inox", "en": name_en },
        "description": { "vi": "Bồn chứa 5000 lít", "en": "5000 litre tank" },
        "status": "available",
        "images": [{
            "fileName": "tank.jpg",
            "contentType": "image/jpeg",
            "data": data,
            "isMain": true
        }]
    })
}

#[tokio::test]
async fn admin_routes_are_gated_by_session_and_allow_list() {
    let app = start_app().await;
    let client = client();

    // No session: off to /login.
    let res = client
        .get(format!("{}/admin/products", app.base))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()["location"], "/login");

    // Authenticated but not on the allow-list: /unauthorized.
    let res = client
        .get(format!("{}/admin/products", app.base))
        .header("cookie", session_cookie("guest-session"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()["location"], "/unauthorized");

    // Allow-listed admin passes through.
    let res = client
        .get(format!("{}/admin/products", app.base))
        .header("cookie", session_cookie("admin-session"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn feature_flag_cookie_switches_content_source() {
    let app = start_app().await;
    let client = client();

    let body: serde_json::Value = client
        .get(format!("{}/products", app.base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["source"], "static");
    assert!(!body["items"].as_array().unwrap().is_empty());

    let body: serde_json::Value = client
        .get(format!("{}/products", app.base))
        .header("cookie", db_cookie())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["source"], "database");
    assert!(body["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn locale_prefix_selects_the_language() {
    let app = start_app().await;
    let client = client();

    let default: serde_json::Value = client
        .get(format!("{}/products", app.base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(default["locale"], "vi");

    let english: serde_json::Value = client
        .get(format!("{}/en/products", app.base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(english["locale"], "en");
    assert_eq!(
        english["items"][0]["name"],
        "Industrial roller doors"
    );
}

#[tokio::test]
async fn admin_create_then_public_read_then_delete() {
    let app = start_app().await;
    let client = client();

    let outcome: serde_json::Value = client
        .post(format!("{}/admin/products", app.base))
        .header("cookie", session_cookie("admin-session"))
        .json(&product_body("Stainless tank"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(outcome["success"], true, "create failed: {outcome}");
    let id = outcome["id"].as_str().unwrap().to_string();

    // Public detail via the database-backed variant.
    let detail: serde_json::Value = client
        .get(format!("{}/en/products/{id}", app.base))
        .header("cookie", db_cookie())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(detail["name"], "Stainless tank");
    let src = detail["images"][0]["src"].as_str().unwrap();
    assert!(src.contains("/products/"), "derived url: {src}");

    let outcome: serde_json::Value = client
        .delete(format!("{}/admin/products/{id}", app.base))
        .header("cookie", session_cookie("admin-session"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(outcome["success"], true);

    let res = client
        .get(format!("{}/en/products/{id}", app.base))
        .header("cookie", db_cookie())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_without_images_is_rejected_end_to_end() {
    let app = start_app().await;
    let client = client();

    let mut body = product_body("No images");
    body["images"] = serde_json::json!([]);

    let outcome: serde_json::Value = client
        .post(format!("{}/admin/products", app.base))
        .header("cookie", session_cookie("admin-session"))
        .json(&body)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(outcome["success"], false);
    assert_eq!(outcome["error"], "at least one image is required");

    // Nothing was written.
    let listing: serde_json::Value = client
        .get(format!("{}/admin/products", app.base))
        .header("cookie", session_cookie("admin-session"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(listing.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn contact_form_validates_before_accepting() {
    let app = start_app().await;
    let client = client();

    let bad: serde_json::Value = client
        .post(format!("{}/contact", app.base))
        .json(&serde_json::json!({
            "name": "Anh",
            "email": "not-an-email",
            "message": "Xin báo giá"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(bad["success"], false);

    let good: serde_json::Value = client
        .post(format!("{}/contact", app.base))
        .json(&serde_json::json!({
            "name": "Anh",
            "email": "anh@khachhang.vn",
            "message": "Xin báo giá khung thép"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(good["success"], true);
}

#[tokio::test]
async fn robots_and_sitemap_cover_the_public_surface() {
    let app = start_app().await;
    let client = client();

    let robots = client
        .get(format!("{}/robots.txt", app.base))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(robots.contains("Disallow: /admin"));
    assert!(robots.contains("Sitemap: https://example.com/sitemap.xml"));

    let sitemap = client
        .get(format!("{}/sitemap.xml", app.base))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(sitemap.contains("<loc>https://example.com/products</loc>"));
    assert!(sitemap.contains("<loc>https://example.com/en/products</loc>"));
    assert!(sitemap.contains("<loc>https://example.com/vi/contact</loc>"));
}
