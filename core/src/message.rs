//! Human-readable text for a failed call.

use serde_json::Value;

use crate::error::ApiError;

pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred";

/// Pick the most useful message out of an `ApiError`.
///
/// Order: a plain-string payload, the `detail` field (a string, or a list of
/// `{msg}` records joined with ", "), a `message` field, the error's own
/// text, then `DEFAULT_ERROR_MESSAGE`.
pub fn error_message(error: &ApiError) -> String {
    if let Some(body) = error.body() {
        if let Some(message) = message_from_body(body) {
            return message;
        }
    }
    let text = error.to_string();
    if text.is_empty() {
        DEFAULT_ERROR_MESSAGE.to_string()
    } else {
        text
    }
}

fn message_from_body(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    let value: Value = match serde_json::from_str(trimmed) {
        Ok(value) => value,
        // Not JSON: the server sent plain text.
        Err(_) => return Some(trimmed.to_string()),
    };

    match &value {
        Value::String(text) if !text.is_empty() => return Some(text.clone()),
        Value::Object(_) => {}
        _ => return None,
    }

    match value.get("detail") {
        Some(Value::String(detail)) if !detail.is_empty() => return Some(detail.clone()),
        Some(Value::Array(items)) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if !messages.is_empty() {
                return Some(messages.join(", "));
            }
        }
        _ => {}
    }

    match value.get("message") {
        Some(Value::String(message)) if !message.is_empty() => Some(message.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16, body: &str) -> ApiError {
        ApiError::Http {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn prefers_string_payload() {
        assert_eq!(error_message(&http(400, r#""Bad things""#)), "Bad things");
        assert_eq!(error_message(&http(502, "Bad Gateway")), "Bad Gateway");
    }

    #[test]
    fn uses_string_detail() {
        let err = ApiError::NotFound {
            body: r#"{"detail":"Client not found"}"#.to_string(),
        };
        assert_eq!(error_message(&err), "Client not found");
    }

    #[test]
    fn joins_validation_detail_list() {
        let body = r#"{"detail":[
            {"loc":["body","full_name"],"msg":"String should have at least 2 characters","type":"string_too_short"},
            {"loc":["body","age"],"msg":"Input should be less than or equal to 150","type":"less_than_equal"}
        ]}"#;
        assert_eq!(
            error_message(&http(422, body)),
            "String should have at least 2 characters, Input should be less than or equal to 150"
        );
    }

    #[test]
    fn falls_back_to_message_field() {
        let body = r#"{"message":"Maintenance window","code":17}"#;
        assert_eq!(error_message(&http(503, body)), "Maintenance window");
    }

    #[test]
    fn falls_back_to_error_text_without_usable_body() {
        assert_eq!(error_message(&http(500, "")), "request failed with status code 500");
        assert_eq!(
            error_message(&http(500, r#"{"other":1}"#)),
            "request failed with status code 500"
        );
        assert_eq!(error_message(&ApiError::Timeout), "request timed out");
        assert_eq!(
            error_message(&ApiError::Transport("connection refused".to_string())),
            "network error: connection refused"
        );
    }

    #[test]
    fn empty_detail_list_falls_through_to_message() {
        let body = r#"{"detail":[],"message":"nothing specific"}"#;
        assert_eq!(error_message(&http(400, body)), "nothing specific");
    }
}
