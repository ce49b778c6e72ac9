//! Response types for the chat socket and upload endpoint

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Verbatim evaluation output from the model.
///
/// The evaluation prompt asks for JSON, but the model is not guaranteed to
/// comply and the raw text is kept as returned — no parsing or validation.
/// On the wire the result is emitted as a JSON object when the text happens
/// to parse as one, otherwise as a plain string.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalResult(String);

impl EvalResult {
    /// Store the model output verbatim
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw model output
    pub fn raw(&self) -> &str {
        &self.0
    }
}

impl Serialize for EvalResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if let Ok(value) = serde_json::from_str::<Value>(&self.0) {
            if value.is_object() {
                return value.serialize(serializer);
            }
        }
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EvalResult {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let raw = match value {
            Value::String(s) => s,
            other => other.to_string(),
        };
        Ok(Self(raw))
    }
}

/// Request outcome reported over the chat socket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatStatus {
    Success,
    Error,
}

/// Reply sent for each chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Generated answer
    pub answer: String,
    /// Evaluation result (object when the model returned valid JSON)
    pub evaluation: EvalResult,
    /// The query this reply answers
    pub original_query: String,
    /// Outcome status
    pub status: ChatStatus,
}

impl ChatResponse {
    /// Successful reply
    pub fn success(answer: String, evaluation: EvalResult, original_query: String) -> Self {
        Self {
            answer,
            evaluation,
            original_query,
            status: ChatStatus::Success,
        }
    }

    /// Error reply with a generic answer and the failure detail as the
    /// evaluation payload. The connection stays open.
    pub fn error(original_query: impl Into<String>, detail: impl std::fmt::Display) -> Self {
        let payload = serde_json::json!({ "error": detail.to_string() });
        Self {
            answer: "An internal error occurred. Please check the backend logs for details."
                .to_string(),
            evaluation: EvalResult::new(payload.to_string()),
            original_query: original_query.into(),
            status: ChatStatus::Error,
        }
    }
}

/// Reply for a successful PDF upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Always "success" (failures surface as HTTP errors)
    pub status: String,
    /// Directory holding the rendered page images
    pub image_dir: String,
    /// Vision captions for every detected figure region
    pub captions: Vec<String>,
}

impl UploadResponse {
    /// Build a success response
    pub fn success(image_dir: String, captions: Vec<String>) -> Self {
        Self {
            status: "success".to_string(),
            image_dir,
            captions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eval_result_keeps_malformed_json_verbatim() {
        let eval = EvalResult::new("faithfulness: high, trust me");
        assert_eq!(eval.raw(), "faithfulness: high, trust me");

        let json = serde_json::to_value(&eval).unwrap();
        assert_eq!(json, Value::String("faithfulness: high, trust me".into()));
    }

    #[test]
    fn eval_result_emits_object_when_parseable() {
        let eval = EvalResult::new(r#"{"faithfulness": "0.9", "relevance": "0.8", "comment": "ok"}"#);
        let json = serde_json::to_value(&eval).unwrap();
        assert!(json.is_object());
        assert_eq!(json["faithfulness"], "0.9");
    }

    #[test]
    fn eval_result_keeps_non_object_json_as_string() {
        // A bare JSON array or number is still not the declared contract
        let eval = EvalResult::new("[1, 2, 3]");
        let json = serde_json::to_value(&eval).unwrap();
        assert_eq!(json, Value::String("[1, 2, 3]".into()));
    }

    #[test]
    fn chat_response_error_shape() {
        let response = ChatResponse::error("why?", "store unavailable");
        assert_eq!(response.status, ChatStatus::Error);
        assert!(!response.answer.is_empty());

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["original_query"], "why?");
        assert_eq!(json["evaluation"]["error"], "store unavailable");
    }

    #[test]
    fn chat_response_success_round_trip() {
        let response = ChatResponse::success(
            "It is a planning component.".to_string(),
            EvalResult::new("no evaluation"),
            "what is a plan agent?".to_string(),
        );
        let json = serde_json::to_string(&response).unwrap();
        let back: ChatResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(back.status, ChatStatus::Success);
        assert_eq!(back.answer, "It is a planning component.");
        assert_eq!(back.evaluation.raw(), "no evaluation");
    }
}
