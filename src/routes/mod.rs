//! JSON endpoints under `/api/v1`.
//!
//! Every response uses the same envelope:
//! `{ "success": bool, "data"?: ..., "pagination"?: {...}, "message"?: "..." }`.

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;

use crate::domain::pagination::{Page, PaginationMeta};
use crate::services::ServiceError;

pub mod discounts;
pub mod products;

/// Response envelope shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            pagination: None,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T: Serialize> From<Page<T>> for ApiResponse<Vec<T>> {
    fn from(page: Page<T>) -> Self {
        Self {
            success: true,
            data: Some(page.data),
            pagination: Some(page.pagination),
            message: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            pagination: None,
            message: Some(message.into()),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            ..Self::message(message)
        }
    }
}

/// Status code a service failure is reported with.
fn error_status(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
        ServiceError::NotFound => StatusCode::NOT_FOUND,
        ServiceError::Form(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ServiceError::Conflict => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Render a service failure. `action` names what was attempted for the log line.
pub fn error_response(err: ServiceError, action: &str) -> HttpResponse {
    let status = error_status(&err);

    let message = match err {
        ServiceError::Unauthorized => "Insufficient permissions.".to_string(),
        ServiceError::NotFound => "Resource not found.".to_string(),
        ServiceError::Form(message) => message,
        ServiceError::Conflict => "Resource already exists.".to_string(),
        err => {
            log::error!("Failed to {action}: {err}");
            "Internal server error.".to_string()
        }
    };

    HttpResponse::build(status).json(ApiResponse::failure(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    use crate::domain::pagination::{PageSpec, paginate};

    #[test]
    fn service_errors_map_to_statuses() {
        assert_eq!(
            error_status(&ServiceError::Unauthorized),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(error_status(&ServiceError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            error_status(&ServiceError::Form("bad".to_string())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(error_status(&ServiceError::Conflict), StatusCode::CONFLICT);
    }

    #[test]
    fn page_envelope_carries_pagination() {
        let page = paginate(vec![1, 2, 3], PageSpec::new(2, 1));

        let json = serde_json::to_value(ApiResponse::from(page)).expect("serialization");

        assert_eq!(json.get("success"), Some(&Value::Bool(true)));
        assert_eq!(json.get("data"), Some(&json!([1, 2])));
        assert_eq!(
            json.get("pagination"),
            Some(&json!({
                "total": 3,
                "per_page": 2,
                "current_page": 1,
                "last_page": 2,
                "from": 1,
                "to": 2
            }))
        );
        assert!(json.get("message").is_none());
    }

    #[test]
    fn failure_envelope_omits_data() {
        let json = serde_json::to_value(ApiResponse::failure("nope")).expect("serialization");

        assert_eq!(json, json!({ "success": false, "message": "nope" }));
    }
}
