//! Envelope types for non-resource responses.

use serde::{Deserialize, Serialize};

/// Error body: `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    pub fn internal_error() -> Self {
        Self::new("Server error")
    }
}

/// Acknowledgement of a completed deletion: `{"success": true}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_shape() {
        let body = serde_json::to_value(ErrorResponse::new("Post not found")).unwrap();
        assert_eq!(body, serde_json::json!({ "error": "Post not found" }));
    }

    #[test]
    fn test_success_body_shape() {
        let body = serde_json::to_value(SuccessResponse::ok()).unwrap();
        assert_eq!(body, serde_json::json!({ "success": true }));
    }
}
