/// HTTP client for the remote question-answering service.
///
/// This module provides the blocking client that posts store questions to the
/// service, its error type, and the trait used to swap in test doubles.
mod client;

pub use client::{
    AiServiceClient, AiServiceClientBuilder, AiServiceError, AnswerClient, parse_answer,
};
