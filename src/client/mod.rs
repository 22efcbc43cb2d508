//! HTTP client for the router service.
//!
//! This module builds OpenAI-compatible chat completion requests extended
//! with the router's routing object, and classifies what comes back.

mod probe;
pub mod types;

pub use probe::{ProbeOutcome, RouterClient, REQUEST_ID_HEADER};
pub use types::{
    preview, ChatCompletionRequest, ChatCompletionResponse, Message, RoutingParams,
    RoutingPolicy, RoutingStrategy, PREVIEW_CHARS,
};
