//! Provider seam of the AI gateway
//!
//! A provider performs exactly one generation attempt. Retries, backoff,
//! deadlines, and caching belong to [`crate::ai::AiGateway`].

use async_trait::async_trait;

use super::GatewayError;

/// Shape the provider is asked to answer in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// Free-form text
    Text,
    /// JSON object matching the critique schema
    CritiqueJson,
}

/// A single prompt sent to the provider
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub temperature: f32,
    pub format: ResponseFormat,
}

/// Outbound large-language-model client
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Run one generation and return the reply text
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GatewayError>;
}
