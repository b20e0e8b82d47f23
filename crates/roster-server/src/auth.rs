use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

/// Bot credential the chat transport must present.
///
/// When `token` is `None` the middleware is a transparent no-op.
#[derive(Clone, Default)]
pub struct BotAuth {
    pub token: Option<String>,
}

impl BotAuth {
    pub fn none() -> Self {
        Self { token: None }
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }
}

/// Paths reachable without the credential.
const PUBLIC_PATHS: &[&str] = &["/api/health"];

/// Axum middleware that gates requests behind `Authorization: Bearer <token>`.
///
/// 1. `token` is `None` → passthrough
/// 2. path is public (liveness) → passthrough
/// 3. bearer token matches → passthrough
/// 4. otherwise → 401 JSON
pub async fn auth_middleware(State(auth): State<Arc<BotAuth>>, req: Request, next: Next) -> Response {
    let Some(ref token) = auth.token else {
        return next.run(req).await;
    };

    if PUBLIC_PATHS.contains(&req.uri().path()) {
        return next.run(req).await;
    }

    let presented = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim);
    if presented == Some(token.as_str()) {
        return next.run(req).await;
    }

    tracing::warn!(path = %req.uri().path(), "rejected request without valid bot credential");
    Response::builder()
        .status(401)
        .header("Content-Type", "application/json")
        .body(Body::from(r#"{"error":"unauthorized"}"#))
        .expect("infallible: all header values are valid ASCII")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
