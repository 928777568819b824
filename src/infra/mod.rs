//! HTTP clients for the remote rate backend, the gateway and the exchange provider.

pub mod exchange;
pub mod gateway;
pub mod rates;

use serde_json::Value;

pub const USER_AGENT: &str = concat!("intl-rates/", env!("CARGO_PKG_VERSION"));

/// Pulls a human-readable message out of a remote JSON error body.
///
/// FastAPI answers with `detail` (a string, or a list of validation errors);
/// our own gateway answers with `error`.
pub fn remote_message(body: &Value) -> Option<String> {
    ["detail", "error", "message"]
        .iter()
        .filter_map(|key| body.get(*key))
        .find_map(|value| match value {
            Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
            Value::Null | Value::String(_) => None,
            other => Some(other.to_string()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn detail_wins_over_other_fields() {
        let body = json!({ "detail": "Invalid file type", "message": "ignored" });
        assert_eq!(remote_message(&body).as_deref(), Some("Invalid file type"));
    }

    #[test]
    fn structured_detail_is_stringified() {
        let body = json!({ "detail": [{ "loc": ["body", "file"], "msg": "field required" }] });
        let message = remote_message(&body).unwrap();
        assert!(message.contains("field required"));
    }

    #[test]
    fn empty_bodies_have_no_message() {
        assert_eq!(remote_message(&json!({})), None);
        assert_eq!(remote_message(&json!({ "error": "" })), None);
        assert_eq!(remote_message(&json!("plain")), None);
    }
}
