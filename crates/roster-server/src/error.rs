use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use roster_core::RosterError;

// ---------------------------------------------------------------------------
// AppError: unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 400 Bad Request error with the given message.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(RosterError::InvalidCommandArgument(msg.into()).into())
    }
}

fn status_for(e: &RosterError) -> StatusCode {
    match e {
        RosterError::NotFound(_) => StatusCode::NOT_FOUND,
        RosterError::InvalidCommandArgument(_) => StatusCode::BAD_REQUEST,
        RosterError::OracleUnreachable(_) | RosterError::OracleProtocolError(_) => {
            StatusCode::BAD_GATEWAY
        }
        RosterError::StorageUnavailable(_) | RosterError::HomeNotFound | RosterError::Config(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self
            .0
            .downcast_ref::<RosterError>()
            .map(status_for)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let err = AppError(RosterError::NotFound("Cafe X".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn bad_request_maps_to_400() {
        let err = AppError::bad_request("scope is required");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn oracle_errors_map_to_502() {
        for e in [
            RosterError::OracleUnreachable("timeout".into()),
            RosterError::OracleProtocolError("garbled".into()),
        ] {
            assert_eq!(AppError(e.into()).into_response().status(), StatusCode::BAD_GATEWAY);
        }
    }

    #[test]
    fn storage_error_maps_to_500() {
        let err = AppError(RosterError::StorageUnavailable("disk".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn foreign_error_maps_to_500() {
        let err = AppError(anyhow::anyhow!("task join error"));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
