//! Request and response types for the router's chat-completions endpoint.

use serde::{Deserialize, Deserializer, Serialize};

/// Number of characters of response content shown in the report.
pub const PREVIEW_CHARS: usize = 100;

/// Chat completion request (OpenAI-compatible) with the router extension.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ChatCompletionRequest {
    /// Left empty; the router fills it in from `routing`.
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub stream: bool,
    #[serde(rename = "nim-llm-router")]
    pub routing: RoutingParams,
}

impl ChatCompletionRequest {
    /// Single-turn, non-streaming request carrying `prompt` as the user message.
    pub fn single_turn(prompt: &str, max_tokens: u32, routing: RoutingParams) -> Self {
        Self {
            model: String::new(),
            messages: vec![Message::user(prompt)],
            max_tokens,
            stream: false,
            routing,
        }
    }
}

/// A chat message.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }
}

/// Routing policy the router applies when choosing a model.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RoutingPolicy {
    TaskRouter,
    AgenticRouter,
}

/// How the router resolves the target model.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RoutingStrategy {
    /// Classifier served by Triton picks the model.
    Triton,
    /// Caller names the model in `RoutingParams::model`.
    Manual,
}

/// The `nim-llm-router` object of a request.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RoutingParams {
    pub policy: RoutingPolicy,
    pub routing_strategy: RoutingStrategy,
    pub model: String,
}

impl RoutingParams {
    /// Automatic selection under `policy`.
    pub fn automatic(policy: RoutingPolicy) -> Self {
        Self {
            policy,
            routing_strategy: RoutingStrategy::Triton,
            model: String::new(),
        }
    }

    /// Manual selection of exactly `model`.
    pub fn manual(model: &str) -> Self {
        Self {
            policy: RoutingPolicy::TaskRouter,
            routing_strategy: RoutingStrategy::Manual,
            model: model.to_string(),
        }
    }
}

/// The subset of a chat completion response the report reads.
///
/// A missing field falls back to a default, but an explicit `null` where an
/// object or string is expected leaves nothing to read. Fields that need the
/// distinction are `Option<Option<T>>`: outer `None` is absent, inner `None`
/// is `null`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub choices: Option<Option<Vec<Choice>>>,
}

/// A completion choice.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Choice {
    #[serde(default, deserialize_with = "present")]
    pub message: Option<Option<ResponseMessage>>,
}

/// Assistant message inside a choice.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ResponseMessage {
    #[serde(default, deserialize_with = "present")]
    pub content: Option<Option<String>>,
}

/// Marks a field as present, keeping `null` as the inner `None`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl ChatCompletionResponse {
    /// Model the router reports, or `"Unknown"` when absent.
    pub fn model_name(&self) -> &str {
        self.model.as_deref().unwrap_or("Unknown")
    }

    /// Content of the first choice.
    ///
    /// Absent `choices`, `message` or `content` read as empty. An empty
    /// `choices` array, or `null` at any of those levels, is an error.
    pub fn first_content(&self) -> Result<&str, &'static str> {
        let choice = match &self.choices {
            None => return Ok(""),
            Some(None) => return Err("choices is null"),
            Some(Some(choices)) => choices.first().ok_or("response has no choices")?,
        };
        let message = match &choice.message {
            None => return Ok(""),
            Some(None) => return Err("message is null"),
            Some(Some(message)) => message,
        };
        match &message.content {
            None => Ok(""),
            Some(None) => Err("message content is null"),
            Some(Some(content)) => Ok(content.as_str()),
        }
    }
}

/// First `PREVIEW_CHARS` characters of `content`, split on a char boundary.
pub fn preview(content: &str) -> &str {
    match content.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => &content[..idx],
        None => content,
    }
}
