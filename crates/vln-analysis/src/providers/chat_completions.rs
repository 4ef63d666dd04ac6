//! OpenAI-style `/chat/completions` adapter, shared by OpenAI and Perplexity.

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use super::{endpoint, http_client, send_json, GenerateFuture, ProviderKind, TextGenerator};
use crate::error::ProviderError;
use crate::types::ProviderDescriptor;

pub struct ChatCompletionsClient {
    client: Client,
    descriptor: ProviderDescriptor,
    api_key: String,
    url: Url,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionsClient {
    /// Client for `kind` against its production endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(kind: ProviderKind, api_key: &str, timeout_secs: u64) -> Result<Self, ProviderError> {
        Self::with_base_url(kind, api_key, timeout_secs, kind.default_base_url())
    }

    /// Client for `kind` against a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the `reqwest::Client` cannot be built
    /// or [`ProviderError::InvalidBaseUrl`] if `base_url` is not a valid URL.
    pub fn with_base_url(
        kind: ProviderKind,
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: http_client(timeout_secs)?,
            descriptor: kind.descriptor(true),
            api_key: api_key.to_owned(),
            url: endpoint(base_url, "chat/completions")?,
        })
    }

    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, ProviderError> {
        let body = ChatRequest {
            model: &self.descriptor.model_name,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens,
        };

        let request = self
            .client
            .post(self.url.clone())
            .bearer_auth(&self.api_key)
            .json(&body);
        let response: ChatResponse = send_json(request, &self.descriptor.display_name).await?;

        Ok(response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default())
    }
}

impl TextGenerator for ChatCompletionsClient {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    fn generate<'a>(&'a self, prompt: &'a str, max_tokens: u32) -> GenerateFuture<'a> {
        Box::pin(self.complete(prompt, max_tokens))
    }
}
