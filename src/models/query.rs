use serde::{Deserialize, Serialize};

/// A store identifier paired with the question asked about that store.
///
/// Serializes to the exact body posted to the answer service:
/// `{"store_id": "...", "question": "..."}`. No validation happens here;
/// presence checks belong to whoever builds the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub store_id: String,
    pub question: String,
}

impl Query {
    /// Creates a new query.
    pub fn new(store_id: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            store_id: store_id.into(),
            question: question.into(),
        }
    }
}
