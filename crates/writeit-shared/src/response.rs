//! The uniform response envelope every handler converges on.

use serde::{Deserialize, Serialize};

/// `{status_code, message, success, data}` - the single response shape.
///
/// `data` is serialized as `null` when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status_code: u16,
    pub message: String,
    pub success: bool,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn new(message: impl Into<String>, status_code: u16, success: bool, data: Option<T>) -> Self {
        Self {
            status_code,
            message: message.into(),
            success,
            data,
        }
    }

    /// 200 success envelope carrying a payload.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self::new(message, 200, true, Some(data))
    }

    /// Success envelope with a payload-less body and a custom 2xx code.
    pub fn ok_empty(status_code: u16, message: impl Into<String>) -> Self {
        Self::new(message, status_code, true, None)
    }

    /// Failure envelope with no payload.
    pub fn error(status_code: u16, message: impl Into<String>) -> Self {
        Self::new(message, status_code, false, None)
    }

    /// Failure envelope that still carries a payload.
    pub fn error_with(status_code: u16, message: impl Into<String>, data: T) -> Self {
        Self::new(message, status_code, false, Some(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_envelope_shape() {
        let envelope = Envelope::ok("Posts successfully retrieved", vec![1, 2]);
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(
            value,
            json!({
                "status_code": 200,
                "message": "Posts successfully retrieved",
                "success": true,
                "data": [1, 2]
            })
        );
    }

    #[test]
    fn test_error_envelope_has_null_data() {
        let envelope: Envelope<()> = Envelope::error(404, "Post with id 3 not found");
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value["success"], false);
        assert_eq!(value["status_code"], 404);
        assert!(value["data"].is_null());
    }
}
