use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Header carrying the shared session password.
pub const ACCESS_HEADER: &str = "x-access-password";

/// Optional shared-secret check in front of the bonus tables. Without a
/// configured secret every caller is admitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessGate {
    secret: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessDenied {
    #[error("access password required")]
    Missing,
    #[error("access password rejected")]
    Mismatch,
}

impl AccessGate {
    /// Blank secrets are treated as "no secret".
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|value| !value.trim().is_empty()),
        }
    }

    pub fn open() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.secret.is_none()
    }

    pub fn verify(&self, candidate: Option<&str>) -> Result<(), AccessDenied> {
        let Some(secret) = self.secret.as_deref() else {
            return Ok(());
        };

        match candidate {
            None => Err(AccessDenied::Missing),
            Some(value) if value == secret => Ok(()),
            Some(_) => Err(AccessDenied::Mismatch),
        }
    }
}

/// Middleware rejecting requests whose `x-access-password` header does not
/// match the gate.
pub async fn require_access(
    State(gate): State<Arc<AccessGate>>,
    request: Request,
    next: Next,
) -> Response {
    let candidate = request
        .headers()
        .get(ACCESS_HEADER)
        .and_then(|value| value.to_str().ok());

    match gate.verify(candidate) {
        Ok(()) => next.run(request).await,
        Err(denied) => {
            tracing::warn!(reason = %denied, path = %request.uri().path(), "bonus api access denied");
            let payload = json!({
                "error": denied.to_string(),
            });
            (StatusCode::UNAUTHORIZED, Json(payload)).into_response()
        }
    }
}
