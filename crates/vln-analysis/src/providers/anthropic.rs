//! Anthropic Messages API adapter.

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use super::{endpoint, http_client, send_json, GenerateFuture, ProviderKind, TextGenerator};
use crate::error::ProviderError;
use crate::types::ProviderDescriptor;

const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicClient {
    client: Client,
    descriptor: ProviderDescriptor,
    api_key: String,
    url: Url,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicClient {
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, ProviderError> {
        Self::with_base_url(
            api_key,
            timeout_secs,
            ProviderKind::Anthropic.default_base_url(),
        )
    }

    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the `reqwest::Client` cannot be built
    /// or [`ProviderError::InvalidBaseUrl`] if `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: http_client(timeout_secs)?,
            descriptor: ProviderKind::Anthropic.descriptor(true),
            api_key: api_key.to_owned(),
            url: endpoint(base_url, "v1/messages")?,
        })
    }

    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, ProviderError> {
        let body = MessagesRequest {
            model: &self.descriptor.model_name,
            max_tokens,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        };

        let request = self
            .client
            .post(self.url.clone())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body);
        let response: MessagesResponse = send_json(request, &self.descriptor.display_name).await?;

        // Only text blocks carry prose; tool-use and other block types are skipped.
        Ok(response
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect::<String>())
    }
}

impl TextGenerator for AnthropicClient {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    fn generate<'a>(&'a self, prompt: &'a str, max_tokens: u32) -> GenerateFuture<'a> {
        Box::pin(self.complete(prompt, max_tokens))
    }
}
