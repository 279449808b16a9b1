use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;

use crate::AppContext;

const PUBLIC_PATHS: [&str; 7] = [
    "",
    "/about",
    "/products",
    "/services",
    "/projects",
    "/contact",
    "/privacy-policy",
];

const LOCALE_PREFIXES: [&str; 3] = ["", "/vi", "/en"];

pub async fn robots(State(ctx): State<AppContext>) -> impl IntoResponse {
    let body = format!(
        "User-agent: *\nDisallow: /admin\nDisallow: /api\n\nSitemap: {}/sitemap.xml\n",
        ctx.config.base_url
    );
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body)
}

pub async fn sitemap(State(ctx): State<AppContext>) -> impl IntoResponse {
    let base = ctx.config.base_url.trim_end_matches('/');
    let mut body = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for prefix in LOCALE_PREFIXES {
        for path in PUBLIC_PATHS {
            let loc = format!("{base}{prefix}{path}");
            body.push_str(&format!("  <url><loc>{loc}</loc></url>\n"));
        }
    }
    body.push_str("</urlset>\n");

    ([(header::CONTENT_TYPE, "application/xml")], body)
}
