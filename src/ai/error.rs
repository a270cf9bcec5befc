//! AI gateway error taxonomy

use std::time::Duration;

/// Failure of a translation or critique call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// Provider unreachable, 5xx, or transient failures that outlived the retry budget
    #[error("AI provider unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("AI provider did not answer within {0:?}")]
    UpstreamTimeout(Duration),

    #[error("AI provider is throttling requests")]
    RateLimited { retry_after: Option<Duration> },

    /// Deterministic rejection or a reply that cannot be decoded
    #[error("AI provider returned an unusable response: {0}")]
    UpstreamError(String),

    #[error("{0}")]
    InvalidInput(String),
}

impl GatewayError {
    /// Whether another attempt may succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::UpstreamUnavailable(_) | Self::UpstreamTimeout(_) | Self::RateLimited { .. }
        )
    }

    /// Stable machine-readable kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UpstreamUnavailable(_) => "upstream_unavailable",
            Self::UpstreamTimeout(_) => "upstream_timeout",
            Self::RateLimited { .. } => "rate_limited",
            Self::UpstreamError(_) => "upstream_error",
            Self::InvalidInput(_) => "validation_error",
        }
    }

    /// The failure without the variant prefix of its `Display`
    pub fn detail(&self) -> String {
        match self {
            Self::UpstreamUnavailable(detail)
            | Self::UpstreamError(detail)
            | Self::InvalidInput(detail) => detail.clone(),
            Self::UpstreamTimeout(after) => format!("no answer within {:?}", after),
            Self::RateLimited { retry_after: Some(after) } => {
                format!("throttled, retry after {:?}", after)
            }
            Self::RateLimited { retry_after: None } => "throttled".to_string(),
        }
    }

    /// Reason stored on a failed submission: `<kind>: <message>`
    pub fn failure_reason(&self) -> String {
        format!("{}: {}", self.kind(), self)
    }
}
