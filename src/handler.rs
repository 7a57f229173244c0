//! Request handling for incoming store questions.
//!
//! `QuestionHandler` is the inbound edge: it rejects blank parameters,
//! otherwise asks the answer client and relays whatever it returns. The
//! result is a status code plus a JSON body, so any front end (the CLI, an
//! HTTP router) can render it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::ai_service::AnswerClient;

/// Error message returned when a parameter is missing or blank.
pub const MISSING_PARAMS_MESSAGE: &str = "store_id and question are required";

pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;

/// Raw request parameters, as extracted by the front end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionParams {
    pub store_id: Option<String>,
    pub question: Option<String>,
}

impl QuestionParams {
    /// Creates parameters with both values present.
    pub fn new(store_id: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            store_id: Some(store_id.into()),
            question: Some(question.into()),
        }
    }
}

/// Status code and JSON body to send back to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerResponse {
    pub status: u16,
    pub body: Value,
}

impl HandlerResponse {
    /// Returns `true` for a 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Validates question parameters and forwards them to an [`AnswerClient`].
#[derive(Clone)]
pub struct QuestionHandler {
    client: Arc<dyn AnswerClient>,
}

impl QuestionHandler {
    /// Creates a handler backed by `client`.
    pub fn new(client: Arc<dyn AnswerClient>) -> Self {
        Self { client }
    }

    /// Handles one question.
    ///
    /// Blank parameters produce a 400 without touching the client. Everything
    /// else is a 200 carrying the client's mapping verbatim, fallback included.
    pub fn handle(&self, params: &QuestionParams) -> HandlerResponse {
        let (Some(store_id), Some(question)) = (
            present(params.store_id.as_deref()),
            present(params.question.as_deref()),
        ) else {
            info!("rejecting question with missing parameters");
            return HandlerResponse {
                status: STATUS_BAD_REQUEST,
                body: serde_json::json!({ "error": MISSING_PARAMS_MESSAGE }),
            };
        };

        let outcome = self.client.ask(store_id, question);
        info!(store_id, outcome = %outcome, "question handled");

        HandlerResponse {
            status: STATUS_OK,
            body: outcome.into_json(),
        }
    }
}

/// Returns the value unless it is missing, empty, or whitespace-only.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
