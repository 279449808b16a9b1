use std::collections::HashMap;
use std::sync::Mutex;

use axum::extract::{Path, Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::Serialize;
use vitrine_config::{email_allowed, SESSION_COOKIE};

use crate::AppContext;

/// An authenticated identity resolved from a session cookie. The OAuth
/// exchange itself is a library concern behind [`AuthGateway`]; by the time a
/// request reaches the guard only the session remains.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub email: String,
}

/// Session resolution port.
pub trait Sessions: Send + Sync + 'static {
    fn resolve(&self, session_id: &str) -> Option<AuthenticatedUser>;
}

/// Library-provided OAuth handler mounted at the catch-all auth route.
#[async_trait::async_trait]
pub trait AuthGateway: Send + Sync + 'static {
    async fn handle(&self, path: &str) -> Response;
}

/// Session store for development and tests. A deployment substitutes the
/// session backend of its OAuth library here.
#[derive(Default)]
pub struct InMemorySessions {
    sessions: Mutex<HashMap<String, String>>,
}

impl InMemorySessions {
    pub fn insert(&self, session_id: impl Into<String>, email: impl Into<String>) {
        self.sessions
            .lock()
            .expect("session lock poisoned")
            .insert(session_id.into(), email.into());
    }
}

impl Sessions for InMemorySessions {
    fn resolve(&self, session_id: &str) -> Option<AuthenticatedUser> {
        self.sessions
            .lock()
            .expect("session lock poisoned")
            .get(session_id)
            .map(|email| AuthenticatedUser {
                email: email.clone(),
            })
    }
}

/// Placeholder gateway for builds where no OAuth provider is configured.
pub struct UnconfiguredAuthGateway;

#[async_trait::async_trait]
impl AuthGateway for UnconfiguredAuthGateway {
    async fn handle(&self, path: &str) -> Response {
        tracing::warn!(path, "auth route hit but no OAuth provider is configured");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "error": "authentication is not configured" })),
        )
            .into_response()
    }
}

/// Extract one cookie value from the request headers.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(header::COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .find_map(|pair| {
            let (k, v) = pair.trim().split_once('=')?;
            (k == name).then(|| v.to_string())
        })
}

/// Admin boundary: no session redirects to `/login`; a session whose email
/// is not on the allow-list redirects to `/unauthorized`.
pub async fn admin_guard(State(ctx): State<AppContext>, req: Request, next: Next) -> Response {
    let user = cookie_value(req.headers(), SESSION_COOKIE)
        .and_then(|sid| ctx.sessions.resolve(&sid));

    match user {
        None => Redirect::to("/login").into_response(),
        Some(user) if !email_allowed(&ctx.config.allowed_emails, &user.email) => {
            tracing::warn!(email = %user.email, "authenticated but not on the allow-list");
            Redirect::to("/unauthorized").into_response()
        }
        Some(_) => next.run(req).await,
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPageView {
    pub page: &'static str,
    pub sign_in_url: &'static str,
}

pub async fn login() -> Json<AuthPageView> {
    Json(AuthPageView {
        page: "login",
        sign_in_url: "/api/auth/signin",
    })
}

pub async fn unauthorized() -> (StatusCode, Json<AuthPageView>) {
    (
        StatusCode::FORBIDDEN,
        Json(AuthPageView {
            page: "unauthorized",
            sign_in_url: "/api/auth/signin",
        }),
    )
}

pub async fn oauth_callback(State(ctx): State<AppContext>, Path(path): Path<String>) -> Response {
    ctx.auth.handle(&path).await
}
