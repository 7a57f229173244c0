pub mod ai_service;
pub mod config;
pub mod handler;
pub mod models;

pub use ai_service::{AiServiceClient, AiServiceClientBuilder, AiServiceError, AnswerClient};
pub use config::{ConfigError, ServiceConfig};
pub use handler::{HandlerResponse, QuestionHandler, QuestionParams};
pub use models::{Answer, AnswerOutcome, FallbackAnswer, Query};
