//! Google Gemini `generateContent` client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, header::RETRY_AFTER};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::AiConfig;

use super::{AiProvider, GatewayError, GenerationRequest, ResponseFormat, prompt};

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Gemini provider performing one HTTP round trip per call
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    timeout: Duration,
}

impl GeminiClient {
    pub fn new(config: &AiConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            endpoint: format!(
                "{}/v1beta/models/{}:generateContent",
                config.base_url, config.model
            ),
            api_key: config.api_key.clone(),
            timeout: config.timeout,
        })
    }

    fn map_send_error(&self, err: reqwest::Error) -> GatewayError {
        if err.is_timeout() {
            GatewayError::UpstreamTimeout(self.timeout)
        } else {
            GatewayError::UpstreamUnavailable(err.to_string())
        }
    }

    fn map_decode_error(&self, err: reqwest::Error) -> GatewayError {
        if err.is_timeout() {
            GatewayError::UpstreamTimeout(self.timeout)
        } else {
            GatewayError::UpstreamError(format!("undecodable Gemini response: {err}"))
        }
    }
}

#[async_trait]
impl AiProvider for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GatewayError> {
        let generation_config = match request.format {
            ResponseFormat::Text => GenerationConfig {
                temperature: request.temperature,
                response_mime_type: None,
                response_schema: None,
            },
            ResponseFormat::CritiqueJson => GenerationConfig {
                temperature: request.temperature,
                response_mime_type: Some("application/json"),
                response_schema: Some(prompt::critique_response_schema()),
            },
        };

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: &request.prompt }],
            }],
            generation_config,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        debug!(status = status.as_u16(), "Gemini responded");

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(GatewayError::RateLimited { retry_after });
        }

        if status.is_server_error() {
            return Err(GatewayError::UpstreamUnavailable(format!(
                "Gemini returned {status}"
            )));
        }

        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(GatewayError::UpstreamError(format!(
                "Gemini returned {status}: {}",
                detail.chars().take(300).collect::<String>()
            )));
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| self.map_decode_error(e))?;

        extract_text(payload)
    }
}

fn extract_text(payload: GenerateContentResponse) -> Result<String, GatewayError> {
    if let Some(reason) = payload.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(GatewayError::UpstreamError(format!(
            "prompt blocked: {reason}"
        )));
    }

    let text: String = payload
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(GatewayError::UpstreamError(
            "Gemini response carried no text".to_string(),
        ));
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json, Router,
        extract::State,
        http::{HeaderMap, StatusCode as AxumStatus},
        response::{IntoResponse, Response},
        routing::post,
    };
    use serde_json::json;
    use tokio::net::TcpListener;

    use super::*;

    #[derive(Clone)]
    struct Scripted {
        status: u16,
        body: Value,
        retry_after: Option<&'static str>,
        seen: Arc<Mutex<Vec<(Option<String>, Value)>>>,
    }

    async fn generate_handler(
        State(script): State<Scripted>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Response {
        let key = headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        script.seen.lock().unwrap().push((key, body));

        let status = AxumStatus::from_u16(script.status).unwrap();
        let mut response = (status, Json(script.body.clone())).into_response();
        if let Some(value) = script.retry_after {
            response
                .headers_mut()
                .insert("retry-after", value.parse().unwrap());
        }
        response
    }

    async fn serve(script: Scripted) -> String {
        let app = Router::new()
            .route(
                "/v1beta/models/{action}",
                post(generate_handler),
            )
            .with_state(script);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn config(base_url: String) -> AiConfig {
        AiConfig {
            api_key: "test-key".to_string(),
            model: "gemini-test".to_string(),
            base_url,
            timeout: Duration::from_secs(5),
            max_retries: 0,
            backoff_base: Duration::from_millis(10),
            backoff_max: Duration::from_millis(20),
        }
    }

    fn script(status: u16, body: Value) -> Scripted {
        Scripted {
            status,
            body,
            retry_after: None,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn text_request() -> GenerationRequest {
        GenerationRequest {
            prompt: "Translate: Hello".to_string(),
            temperature: 0.3,
            format: ResponseFormat::Text,
        }
    }

    #[tokio::test]
    async fn test_generate_returns_candidate_text() {
        let script = script(
            200,
            json!({"candidates":[{"content":{"parts":[{"text":"Salom"}]},"finishReason":"STOP"}]}),
        );
        let seen = script.seen.clone();
        let client = GeminiClient::new(&config(serve(script).await)).unwrap();

        let reply = client.generate(&text_request()).await.unwrap();
        assert_eq!(reply, "Salom");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0.as_deref(), Some("test-key"));
        assert_eq!(seen[0].1["contents"][0]["parts"][0]["text"], "Translate: Hello");
        assert!(seen[0].1["generationConfig"].get("responseSchema").is_none());
    }

    #[tokio::test]
    async fn test_critique_request_carries_schema() {
        let script = script(
            200,
            json!({"candidates":[{"content":{"parts":[{"text":"{}"}]}}]}),
        );
        let seen = script.seen.clone();
        let client = GeminiClient::new(&config(serve(script).await)).unwrap();

        let request = GenerationRequest {
            format: ResponseFormat::CritiqueJson,
            ..text_request()
        };
        client.generate(&request).await.unwrap();

        let seen = seen.lock().unwrap();
        let generation = &seen[0].1["generationConfig"];
        assert_eq!(generation["responseMimeType"], "application/json");
        assert_eq!(generation["responseSchema"]["type"], "OBJECT");
    }

    #[tokio::test]
    async fn test_status_codes_map_to_gateway_errors() {
        let mut throttled = script(429, json!({"error":{"message":"quota"}}));
        throttled.retry_after = Some("7");
        let client = GeminiClient::new(&config(serve(throttled).await)).unwrap();
        assert_eq!(
            client.generate(&text_request()).await.unwrap_err(),
            GatewayError::RateLimited { retry_after: Some(Duration::from_secs(7)) }
        );

        let client = GeminiClient::new(&config(serve(script(503, json!({}))).await)).unwrap();
        assert!(matches!(
            client.generate(&text_request()).await,
            Err(GatewayError::UpstreamUnavailable(_))
        ));

        let client = GeminiClient::new(&config(serve(script(400, json!({}))).await)).unwrap();
        assert!(matches!(
            client.generate(&text_request()).await,
            Err(GatewayError::UpstreamError(_))
        ));
    }

    #[tokio::test]
    async fn test_blocked_or_empty_reply_is_upstream_error() {
        let blocked = script(200, json!({"promptFeedback":{"blockReason":"SAFETY"}}));
        let client = GeminiClient::new(&config(serve(blocked).await)).unwrap();
        assert!(matches!(
            client.generate(&text_request()).await,
            Err(GatewayError::UpstreamError(msg)) if msg.contains("SAFETY")
        ));

        let empty = script(200, json!({"candidates":[]}));
        let client = GeminiClient::new(&config(serve(empty).await)).unwrap();
        assert!(matches!(
            client.generate(&text_request()).await,
            Err(GatewayError::UpstreamError(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_unavailable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = GeminiClient::new(&config(format!("http://{addr}"))).unwrap();
        assert!(matches!(
            client.generate(&text_request()).await,
            Err(GatewayError::UpstreamUnavailable(_))
        ));
    }
}
