// API response models

use serde::{Deserialize, Serialize};

/// Generic envelope returned by every facade operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
        }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: Some(message.into()),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            message: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalSubmitResponse {
    pub session_id: String,
    pub proposal_id: i64,
    /// True when persistence is unconfigured and nothing was actually stored.
    pub mock: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCreateResponse {
    pub payment_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrateResponse {
    pub applied: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_omits_error_fields() {
        let v = serde_json::to_value(ApiResponse::ok(42)).unwrap();
        assert_eq!(v["success"], true);
        assert_eq!(v["data"], 42);
        assert!(v.get("error").is_none());
    }

    #[test]
    fn fail_carries_message_in_error() {
        let v = serde_json::to_value(ApiResponse::<()>::fail("nope")).unwrap();
        assert_eq!(v["success"], false);
        assert_eq!(v["error"], "nope");
        assert!(v.get("data").is_none());
    }
}
