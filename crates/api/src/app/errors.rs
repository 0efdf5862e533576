use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use orderflow_core::ErrorKind;
use orderflow_services::ServiceError;

/// Translate a service failure into an HTTP response.
///
/// Domain errors are expected and map to 4xx with their stable code name;
/// store failures are unexpected and surface as a generic server error.
pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::Domain(domain) => {
            let status = match domain.kind() {
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::InvalidTransition | ErrorKind::ResourceExhausted => StatusCode::CONFLICT,
                ErrorKind::PreconditionFailed => StatusCode::UNPROCESSABLE_ENTITY,
                ErrorKind::Validation => StatusCode::BAD_REQUEST,
            };
            json_error(status, domain.code(), domain.to_string())
        }
        ServiceError::Store(store) => {
            tracing::error!(error = %store, "store failure");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "store_error",
                store.to_string(),
            )
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
