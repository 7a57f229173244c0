mod answer;
mod query;

pub use answer::{Answer, AnswerOutcome, FALLBACK_ANSWER_TEXT, FALLBACK_CONFIDENCE, FallbackAnswer};
pub use query::Query;
