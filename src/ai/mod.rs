//! Outbound AI integration: translation and critique through a provider
//! wrapped in retry, timeout, and caching policy

mod cache;
mod error;
mod gateway;
mod gemini;
mod prompt;
mod provider;

pub use cache::TranslationCache;
pub use error::GatewayError;
pub use gateway::{AiGateway, RetryPolicy};
pub use gemini::GeminiClient;
pub use prompt::Critique;
pub use provider::{AiProvider, GenerationRequest, ResponseFormat};

#[cfg(test)]
pub use provider::MockAiProvider;
