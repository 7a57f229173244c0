use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Text placed in the `answer` field when the service could not be reached.
pub const FALLBACK_ANSWER_TEXT: &str = "AI service unavailable";

/// Confidence reported alongside a fallback answer.
pub const FALLBACK_CONFIDENCE: &str = "low";

/// An answer exactly as returned by the remote service.
///
/// The service owns this schema, so the object is kept opaque and handed
/// back to callers untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answer(Map<String, Value>);

impl Answer {
    /// Wraps a JSON object received from the service.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Returns the value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Borrows the underlying JSON object.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consumes the answer and returns the underlying JSON object.
    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }
}

/// Degraded-service reply built locally when an exchange fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackAnswer {
    pub answer: String,
    pub confidence: String,
    pub error: String,
}

impl FallbackAnswer {
    /// Creates a fallback carrying the given failure description.
    ///
    /// An empty description is replaced so `error` is never blank.
    pub fn new(error: impl Into<String>) -> Self {
        let mut error = error.into();
        if error.trim().is_empty() {
            error = "unknown error".to_string();
        }

        Self {
            answer: FALLBACK_ANSWER_TEXT.to_string(),
            confidence: FALLBACK_CONFIDENCE.to_string(),
            error,
        }
    }

    /// Creates a fallback from any error.
    ///
    /// The description is the error's `Display` text, followed by the
    /// innermost source when that adds something (e.g. "Connection refused").
    pub fn from_error(error: &dyn std::error::Error) -> Self {
        let mut description = error.to_string();

        let mut root = error.source();
        while let Some(next) = root.and_then(|e| e.source()) {
            root = Some(next);
        }

        if let Some(root) = root {
            let cause = root.to_string();
            if !cause.is_empty() && !description.contains(&cause) {
                description = format!("{}: {}", description, cause);
            }
        }

        Self::new(description)
    }
}

/// What a single ask produced: the service's answer or a local fallback.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerOutcome {
    Answered(Answer),
    Fallback(FallbackAnswer),
}

impl AnswerOutcome {
    /// Returns `true` if the remote service produced this outcome.
    pub fn is_answered(&self) -> bool {
        matches!(self, Self::Answered(_))
    }

    /// Returns `true` if this outcome was synthesized locally.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }

    /// Renders the outcome as the JSON object handed to callers.
    pub fn into_json(self) -> Value {
        match self {
            Self::Answered(answer) => Value::Object(answer.into_fields()),
            Self::Fallback(fallback) => serde_json::json!({
                "answer": fallback.answer,
                "confidence": fallback.confidence,
                "error": fallback.error,
            }),
        }
    }
}

impl From<Answer> for AnswerOutcome {
    fn from(answer: Answer) -> Self {
        Self::Answered(answer)
    }
}

impl From<FallbackAnswer> for AnswerOutcome {
    fn from(fallback: FallbackAnswer) -> Self {
        Self::Fallback(fallback)
    }
}

impl fmt::Display for AnswerOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Answered(_) => write!(f, "answered"),
            Self::Fallback(_) => write!(f, "fallback"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn answer_passes_fields_through_unchanged() {
        let body = json!({"answer": "X", "confidence": "high", "debug": {"plan": null}});
        let Value::Object(fields) = body.clone() else {
            panic!("expected object");
        };

        let outcome = AnswerOutcome::from(Answer::new(fields));
        assert_eq!(outcome.into_json(), body);
    }

    #[test]
    fn answer_serializes_transparently() {
        let mut fields = Map::new();
        fields.insert("answer".to_string(), json!("9-5"));
        let answer = Answer::new(fields);

        assert_eq!(serde_json::to_string(&answer).unwrap(), r#"{"answer":"9-5"}"#);
        assert_eq!(answer.get("answer"), Some(&json!("9-5")));
    }

    #[test]
    fn fallback_has_fixed_shape() {
        let fallback = FallbackAnswer::new("connection refused");
        let json = AnswerOutcome::from(fallback).into_json();

        assert_eq!(
            json,
            json!({
                "answer": "AI service unavailable",
                "confidence": "low",
                "error": "connection refused"
            })
        );
    }

    #[test]
    fn fallback_never_has_blank_error() {
        let fallback = FallbackAnswer::new("  ");
        assert_eq!(fallback.error, "unknown error");
    }

    #[test]
    fn fallback_from_error_uses_display_text() {
        let parse_error = serde_json::from_str::<Value>("oops").unwrap_err();
        let fallback = FallbackAnswer::from_error(&parse_error);

        assert_eq!(fallback.error, parse_error.to_string());
        assert_eq!(fallback.answer, FALLBACK_ANSWER_TEXT);
        assert_eq!(fallback.confidence, FALLBACK_CONFIDENCE);
    }

    #[test]
    fn fallback_from_error_appends_root_cause() {
        #[derive(Debug, thiserror::Error)]
        #[error("Connection refused (os error 111)")]
        struct Refused;

        #[derive(Debug, thiserror::Error)]
        #[error("error sending request")]
        struct Sending(#[source] Refused);

        #[derive(Debug, thiserror::Error)]
        #[error("Network error: {0}")]
        struct Network(#[source] Sending);

        let fallback = FallbackAnswer::from_error(&Network(Sending(Refused)));
        assert_eq!(
            fallback.error,
            "Network error: error sending request: Connection refused (os error 111)"
        );
    }

    #[test]
    fn outcome_predicates_and_display() {
        let answered = AnswerOutcome::from(Answer::new(Map::new()));
        let fallback = AnswerOutcome::from(FallbackAnswer::new("boom"));

        assert!(answered.is_answered());
        assert!(!answered.is_fallback());
        assert!(fallback.is_fallback());
        assert_eq!(format!("{}", answered), "answered");
        assert_eq!(format!("{}", fallback), "fallback");
    }
}
