use serde::{Deserialize, Serialize};

const STATUS_SUCCESS: &str = "success";
const STATUS_ERROR: &str = "error";

/// Standard envelope wrapping every backend response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn empty() -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            data: None,
            error: None,
            message: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.status.eq_ignore_ascii_case(STATUS_ERROR) || self.error.is_some()
    }

    /// Most specific human-readable explanation carried by the envelope.
    pub fn reason(&self) -> Option<&str> {
        self.error.as_deref().or(self.message.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_data_decodes_as_none() {
        let envelope: ApiResponse<Vec<u32>> =
            serde_json::from_str(r#"{"status":"success","message":"queued"}"#).unwrap();
        assert!(envelope.data.is_none());
        assert!(!envelope.is_error());
        assert_eq!(envelope.reason(), Some("queued"));
    }

    #[test]
    fn error_envelope_is_detected() {
        let envelope: ApiResponse<()> =
            serde_json::from_str(r#"{"status":"error","error":"queue busy"}"#).unwrap();
        assert!(envelope.is_error());
        assert_eq!(envelope.reason(), Some("queue busy"));
    }
}
