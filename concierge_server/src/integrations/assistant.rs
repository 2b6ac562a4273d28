use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::AssistantConfig;

#[derive(Debug, Clone, Error)]
pub enum AssistantApiError {
    #[error("The assistant is not configured.")]
    NotConfigured,
    #[error("Could not initialize the assistant client. {0}")]
    Initialization(String),
    #[error("Assistant request failed. {0}")]
    RequestError(String),
    #[error("Assistant returned an error: status {status}, {message}")]
    QueryError { status: u16, message: String },
    #[error("Assistant response could not be parsed. {0}")]
    JsonError(String),
    #[error("Assistant returned an empty response.")]
    EmptyResponse,
}

/// Client for the chat-completion provider behind the guest assistant.
///
/// The provider is treated as an opaque function from (message, property context) to free text.
/// When no API key is configured the client is constructed in a disabled state and every call
/// reports [`AssistantApiError::NotConfigured`].
#[derive(Clone)]
pub struct AssistantApi {
    config: AssistantConfig,
    client: Option<Arc<Client>>,
}

impl AssistantApi {
    pub fn new(config: AssistantConfig) -> Result<Self, AssistantApiError> {
        if !config.is_configured() {
            warn!("🤖️ No assistant API key configured; the assistant endpoint will report unavailable.");
            return Ok(Self { config, client: None });
        }
        let mut headers = HeaderMap::with_capacity(2);
        let bearer = format!("Bearer {}", config.api_key.reveal());
        let val = HeaderValue::from_str(&bearer).map_err(|e| AssistantApiError::Initialization(e.to_string()))?;
        headers.insert("Authorization", val);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| AssistantApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Some(Arc::new(client)) })
    }

    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    /// Sends one guest message to the provider and returns the assistant's reply.
    pub async fn chat(&self, message: &str, property_context: Option<&str>) -> Result<String, AssistantApiError> {
        let client = self.client.as_ref().ok_or(AssistantApiError::NotConfigured)?;
        let body = json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": system_prompt(property_context) },
                { "role": "user", "content": message }
            ]
        });
        trace!("🤖️ Sending assistant request");
        let response = client
            .post(&self.config.api_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AssistantApiError::RequestError(e.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| AssistantApiError::RequestError(e.to_string()))?;
            return Err(AssistantApiError::QueryError { status, message });
        }
        let result: Value = response.json().await.map_err(|e| AssistantApiError::JsonError(e.to_string()))?;
        let reply = result["choices"][0]["message"]["content"].as_str().ok_or(AssistantApiError::EmptyResponse)?;
        trace!("🤖️ Assistant replied with {} characters", reply.len());
        Ok(reply.to_string())
    }
}

fn system_prompt(property_context: Option<&str>) -> String {
    let mut prompt = String::from(
        "You are a helpful concierge for a vacation-rental guest. Answer questions about the stay concisely and \
         accurately. If you do not know something about the property, say so instead of guessing.",
    );
    if let Some(context) = property_context {
        prompt.push(' ');
        prompt.push_str(context);
    }
    prompt
}
