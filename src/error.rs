use serde_json::{json, Value};
use thiserror::Error;
use warp::http::StatusCode;

use crate::sheets::StoreError;

/// Failures a request can end in.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    ConfigurationMissing(String),

    #[error("Missing required fields: {}", .missing.join(", "))]
    Validation { missing: Vec<String> },

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    UpstreamUnavailable(String),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::UpstreamUnavailable(e.to_string())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::ConfigurationMissing(_)
            | ApiError::Validation { .. }
            | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::UpstreamUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON body for this error. `details` carries the debug form and is
    /// only filled in development.
    pub fn body(&self, development: bool) -> Value {
        let mut body = json!({
            "success": false,
            "error": self.to_string(),
        });
        if let ApiError::Validation { missing } = self {
            body["missing_fields"] = json!(missing);
        }
        if development {
            body["details"] = json!(format!("{:?}", self));
        }
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::ConfigurationMissing("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Validation { missing: vec![] }.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(StoreError::Auth("bad key".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_body_lists_fields() {
        let err = ApiError::Validation {
            missing: vec!["Process".into(), "Role Reviewed".into()],
        };
        let body = err.body(false);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Missing required fields: Process, Role Reviewed");
        assert_eq!(body["missing_fields"], json!(["Process", "Role Reviewed"]));
        assert!(body.get("details").is_none());
    }

    #[test]
    fn test_details_only_in_development() {
        let err = ApiError::from(StoreError::Status {
            status: 403,
            message: "The caller does not have permission".into(),
        });
        assert!(err.body(false).get("details").is_none());
        let dev = err.body(true);
        assert!(dev["details"]
            .as_str()
            .unwrap()
            .contains("UpstreamUnavailable"));
        assert_eq!(
            dev["error"],
            "Google Sheets API error (403): The caller does not have permission"
        );
    }
}
