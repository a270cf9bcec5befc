//! AI gateway: the single boundary to the external translation/critique service
//!
//! Every public operation runs under one deadline covering all attempts and
//! backoff sleeps. Transient failures are retried with capped exponential
//! backoff; deterministic rejections surface immediately.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    config::AiConfig,
    constants::{CRITIQUE_TEMPERATURE, TRANSLATION_TEMPERATURE},
    utils::hash_string,
};

use super::{
    AiProvider, GatewayError, GenerationRequest, ResponseFormat, TranslationCache,
    prompt::{self, Critique},
};

/// Timeout and retry policy applied to every gateway operation
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Deadline for a whole operation, retries and backoff included
    pub timeout: Duration,
    /// Retries after the first attempt
    pub max_retries: u32,
    pub backoff_base: Duration,
    pub backoff_max: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &AiConfig) -> Self {
        Self {
            timeout: config.timeout,
            max_retries: config.max_retries,
            backoff_base: config.backoff_base,
            backoff_max: config.backoff_max,
        }
    }

    /// Delay before retry number `retry` (0-based): `base * 2^retry`, capped,
    /// with the upper half randomized
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        let ceiling = self
            .backoff_base
            .saturating_mul(2u32.saturating_pow(retry))
            .min(self.backoff_max);
        let floor = ceiling / 2;
        let spread = (ceiling - floor).as_millis() as u64;
        floor + Duration::from_millis(rand::rng().random_range(0..=spread))
    }

    /// Delay before the next attempt after `error`; a provider-supplied
    /// `Retry-After` is honored up to `backoff_max`
    fn delay_after(&self, retry: u32, error: &GatewayError) -> Duration {
        let backoff = self.backoff_delay(retry);
        match error {
            GatewayError::RateLimited { retry_after: Some(hint) } => {
                backoff.max(*hint).min(self.backoff_max)
            }
            _ => backoff,
        }
    }
}

/// Translation and critique client with retry, timeout, and caching policy
pub struct AiGateway {
    provider: Arc<dyn AiProvider>,
    policy: RetryPolicy,
    cache: TranslationCache,
}

impl AiGateway {
    pub fn new(provider: Arc<dyn AiProvider>, policy: RetryPolicy) -> Self {
        Self {
            provider,
            policy,
            cache: TranslationCache::new(),
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    /// Translate `text` into Uzbek (uncached)
    pub async fn translate(&self, text: &str) -> Result<String, GatewayError> {
        if text.trim().is_empty() {
            return Err(GatewayError::InvalidInput(
                "Text to translate cannot be empty".to_string(),
            ));
        }

        let request = GenerationRequest {
            prompt: prompt::translation_prompt(text),
            temperature: TRANSLATION_TEMPERATURE,
            format: ResponseFormat::Text,
        };

        let raw = self.call("translate", &request).await?;
        prompt::parse_translation(&raw)
    }

    /// Translate a problem statement, answering from the cache when the
    /// statement is unchanged since the last successful translation
    pub async fn translate_problem(
        &self,
        problem_id: Uuid,
        text: &str,
    ) -> Result<String, GatewayError> {
        let digest = hash_string(text);

        if let Some(hit) = self.cache.get(&problem_id, &digest).await {
            debug!(problem_id = %problem_id, "Translation cache hit");
            return Ok(hit);
        }

        let translated = self.translate(text).await?;
        self.cache
            .insert(problem_id, digest, translated.clone())
            .await;

        info!(problem_id = %problem_id, chars = translated.chars().count(), "Cached problem translation");
        Ok(translated)
    }

    /// Forget the cached translation of a problem
    pub async fn invalidate(&self, problem_id: &Uuid) {
        if self.cache.invalidate(problem_id).await {
            debug!(problem_id = %problem_id, "Invalidated cached translation");
        }
    }

    /// Critique submitted code against a problem statement (never cached)
    pub async fn critique(
        &self,
        problem_statement: &str,
        submitted_code: &str,
        language: &str,
    ) -> Result<Critique, GatewayError> {
        if problem_statement.trim().is_empty() {
            return Err(GatewayError::InvalidInput(
                "Problem statement cannot be empty".to_string(),
            ));
        }
        if submitted_code.trim().is_empty() {
            return Err(GatewayError::InvalidInput(
                "Submitted code cannot be empty".to_string(),
            ));
        }

        let request = GenerationRequest {
            prompt: prompt::critique_prompt(problem_statement, submitted_code, language),
            temperature: CRITIQUE_TEMPERATURE,
            format: ResponseFormat::CritiqueJson,
        };

        let raw = self.call("critique", &request).await?;
        prompt::parse_critique(&raw)
    }

    async fn call(
        &self,
        operation: &'static str,
        request: &GenerationRequest,
    ) -> Result<String, GatewayError> {
        match tokio::time::timeout(self.policy.timeout, self.call_with_retries(operation, request))
            .await
        {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    operation,
                    timeout_ms = self.policy.timeout.as_millis() as u64,
                    "AI provider deadline elapsed"
                );
                Err(GatewayError::UpstreamTimeout(self.policy.timeout))
            }
        }
    }

    async fn call_with_retries(
        &self,
        operation: &'static str,
        request: &GenerationRequest,
    ) -> Result<String, GatewayError> {
        let mut retry = 0;

        loop {
            let err = match self.provider.generate(request).await {
                Ok(reply) => {
                    debug!(operation, attempts = retry + 1, "AI provider call succeeded");
                    return Ok(reply);
                }
                Err(err) => err,
            };

            if !err.is_transient() {
                warn!(operation, error = %err, "AI provider rejected the request");
                return Err(err);
            }

            if retry >= self.policy.max_retries {
                warn!(operation, attempts = retry + 1, error = %err, "AI provider retries exhausted");
                return Err(GatewayError::UpstreamUnavailable(format!(
                    "gave up after {} attempt(s): {}",
                    retry + 1,
                    err.detail()
                )));
            }

            let delay = self.policy.delay_after(retry, &err);
            warn!(
                operation,
                attempt = retry + 1,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Transient AI provider failure, backing off"
            );
            tokio::time::sleep(delay).await;
            retry += 1;
        }
    }
}
