//! Request DTOs for the HTTP front-end
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Longest key accepted over HTTP, in bytes.
pub const MAX_KEY_LENGTH: usize = 256;

/// Request body for `PUT /set`
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    pub key: String,
    pub value: String,
}

impl SetRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        if self.key.len() > MAX_KEY_LENGTH {
            return Some(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            ));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(key: &str) -> SetRequest {
        SetRequest {
            key: key.to_string(),
            value: "v".to_string(),
        }
    }

    #[test]
    fn test_set_request_deserialize() {
        let json = r#"{"key": "test", "value": "hello"}"#;
        let req: SetRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.key, "test");
        assert_eq!(req.value, "hello");
    }

    #[test]
    fn test_set_request_requires_value() {
        let json = r#"{"key": "test"}"#;
        assert!(serde_json::from_str::<SetRequest>(json).is_err());
    }

    #[test]
    fn test_validate() {
        assert!(request("").validate().is_some());
        assert!(request(&"k".repeat(MAX_KEY_LENGTH + 1)).validate().is_some());
        assert!(request(&"k".repeat(MAX_KEY_LENGTH)).validate().is_none());
        assert!(request("valid key").validate().is_none());
    }
}
