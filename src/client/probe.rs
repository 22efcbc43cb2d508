//! Sends a single probe to the router and classifies the reply.

use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;

use super::types::{preview, ChatCompletionRequest, ChatCompletionResponse};
use crate::config::{ApiKey, RouterConfig};
use crate::error::{Error, Result};

/// Request header carrying a per-probe correlation ID (UUID v4).
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// What the router did with one probe.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    /// 200 with a readable completion.
    Routed { model: String, preview: String },
    /// Any status other than 200; `body` is the raw response text.
    Rejected { status: u16, body: String },
}

impl ProbeOutcome {
    pub fn is_routed(&self) -> bool {
        matches!(self, ProbeOutcome::Routed { .. })
    }
}

/// Client for the router's chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct RouterClient {
    http: reqwest::Client,
    url: String,
    api_key: Option<ApiKey>,
}

impl RouterClient {
    /// Build a client from router configuration.
    ///
    /// No request timeout is applied unless `timeout_secs` is set.
    pub fn new(config: &RouterConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("router-smoke/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        tracing::debug!(
            url = %config.url,
            timeout_secs = ?config.timeout_secs,
            authenticated = config.api_key.is_some(),
            "Created router client"
        );

        Ok(Self {
            http,
            url: config.url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Endpoint every probe is posted to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST `request` once and classify the response.
    ///
    /// Transport failures and unreadable 200 bodies are errors; every
    /// other status, including the rest of 2xx, is a `Rejected` outcome.
    pub async fn send(&self, request: &ChatCompletionRequest) -> Result<ProbeOutcome> {
        let request_id = uuid::Uuid::new_v4().to_string();

        tracing::debug!(
            request_id = %request_id,
            policy = ?request.routing.policy,
            strategy = ?request.routing.routing_strategy,
            model = %request.routing.model,
            "Sending probe"
        );

        let mut builder = self
            .http
            .post(&self.url)
            .header(REQUEST_ID_HEADER, &request_id)
            .json(request);

        if let Some(key) = &self.api_key {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", key.expose_secret()))
                .map_err(|_| {
                    Error::Config(crate::config::ConfigError::Validation(
                        "router.api_key contains characters not valid in a header".to_string(),
                    ))
                })?;
            value.set_sensitive(true);
            builder = builder.header(AUTHORIZATION, value);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(
            request_id = %request_id,
            status = status.as_u16(),
            bytes = body.len(),
            "Probe response received"
        );

        if status != StatusCode::OK {
            return Ok(ProbeOutcome::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body)?;
        let content = parsed
            .first_content()
            .map_err(|reason| Error::MalformedResponse(reason.to_string()))?;

        Ok(ProbeOutcome::Routed {
            model: parsed.model_name().to_string(),
            preview: preview(content).to_string(),
        })
    }
}
