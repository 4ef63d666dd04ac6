//! Text-generation backends.
//!
//! Every backend is exposed through the same [`TextGenerator`] capability so
//! the dispatcher never branches on which vendor it is talking to. A backend
//! is enabled purely by the presence of its credential.

mod anthropic;
mod chat_completions;
mod gemini;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use vln_core::AppConfig;

use crate::error::ProviderError;
use crate::types::ProviderDescriptor;

pub use anthropic::AnthropicClient;
pub use chat_completions::ChatCompletionsClient;
pub use gemini::GeminiClient;

/// Boxed future returned by [`TextGenerator::generate`].
pub type GenerateFuture<'a> = Pin<Box<dyn Future<Output = Result<String, ProviderError>> + Send + 'a>>;

/// A backend that turns a prompt into free text.
pub trait TextGenerator: Send + Sync {
    fn descriptor(&self) -> &ProviderDescriptor;

    /// Generate a reply of at most `max_tokens` output tokens.
    fn generate<'a>(&'a self, prompt: &'a str, max_tokens: u32) -> GenerateFuture<'a>;
}

/// The supported backends, in dispatch order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    Google,
    Perplexity,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::OpenAi,
        ProviderKind::Anthropic,
        ProviderKind::Google,
        ProviderKind::Perplexity,
    ];

    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Google => "google",
            ProviderKind::Perplexity => "perplexity",
        }
    }

    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "ChatGPT",
            ProviderKind::Anthropic => "Claude",
            ProviderKind::Google => "Gemini",
            ProviderKind::Perplexity => "Perplexity",
        }
    }

    #[must_use]
    pub fn model(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "gpt-4o-mini",
            ProviderKind::Anthropic => "claude-3-haiku-20240307",
            ProviderKind::Google => "gemini-1.5-flash",
            ProviderKind::Perplexity => "llama-3.1-sonar-small-128k-online",
        }
    }

    /// Environment variable holding this backend's credential.
    #[must_use]
    pub fn credential_var(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OPENAI_API_KEY",
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
            ProviderKind::Google => "GOOGLE_GENERATIVE_AI_API_KEY",
            ProviderKind::Perplexity => "PERPLEXITY_API_KEY",
        }
    }

    #[must_use]
    pub fn default_base_url(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "https://api.openai.com/v1",
            ProviderKind::Anthropic => "https://api.anthropic.com",
            ProviderKind::Google => "https://generativelanguage.googleapis.com",
            ProviderKind::Perplexity => "https://api.perplexity.ai",
        }
    }

    #[must_use]
    pub fn descriptor(self, enabled: bool) -> ProviderDescriptor {
        ProviderDescriptor {
            id: self.id().to_string(),
            display_name: self.display_name().to_string(),
            model_name: self.model().to_string(),
            enabled,
        }
    }
}

/// Credentials and transport settings for the provider registry.
#[derive(Clone, Default)]
pub struct ProviderConfig {
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub google_api_key: Option<String>,
    pub perplexity_api_key: Option<String>,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("enabled", &self.enabled_kinds())
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}

impl ProviderConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            openai_api_key: config.openai_api_key.clone(),
            anthropic_api_key: config.anthropic_api_key.clone(),
            google_api_key: config.google_api_key.clone(),
            perplexity_api_key: config.perplexity_api_key.clone(),
            timeout_secs: config.provider_timeout_secs,
        }
    }

    #[must_use]
    pub fn api_key(&self, kind: ProviderKind) -> Option<&str> {
        let key = match kind {
            ProviderKind::OpenAi => &self.openai_api_key,
            ProviderKind::Anthropic => &self.anthropic_api_key,
            ProviderKind::Google => &self.google_api_key,
            ProviderKind::Perplexity => &self.perplexity_api_key,
        };
        key.as_deref().filter(|k| !k.trim().is_empty())
    }

    #[must_use]
    pub fn enabled_kinds(&self) -> Vec<ProviderKind> {
        ProviderKind::ALL
            .into_iter()
            .filter(|&kind| self.api_key(kind).is_some())
            .collect()
    }

    /// All four backends with their `enabled` flags.
    #[must_use]
    pub fn descriptors(&self) -> Vec<ProviderDescriptor> {
        ProviderKind::ALL
            .into_iter()
            .map(|kind| kind.descriptor(self.api_key(kind).is_some()))
            .collect()
    }
}

/// Instantiate one adapter per enabled backend, in [`ProviderKind::ALL`] order.
///
/// # Errors
///
/// Returns [`ProviderError::Http`] if an HTTP client cannot be constructed.
pub fn build_providers(
    config: &ProviderConfig,
) -> Result<Vec<Box<dyn TextGenerator>>, ProviderError> {
    let mut providers: Vec<Box<dyn TextGenerator>> = Vec::new();

    for kind in ProviderKind::ALL {
        let Some(api_key) = config.api_key(kind) else {
            continue;
        };
        providers.push(build_provider(
            kind,
            api_key,
            config.timeout_secs,
            kind.default_base_url(),
        )?);
    }

    tracing::debug!(
        enabled = ?providers.iter().map(|p| p.descriptor().id.as_str()).collect::<Vec<_>>(),
        "provider registry built"
    );

    Ok(providers)
}

/// Build a single adapter against an explicit base URL.
///
/// # Errors
///
/// Returns [`ProviderError::Http`] if the HTTP client cannot be constructed, or
/// [`ProviderError::InvalidBaseUrl`] if `base_url` does not parse.
pub fn build_provider(
    kind: ProviderKind,
    api_key: &str,
    timeout_secs: u64,
    base_url: &str,
) -> Result<Box<dyn TextGenerator>, ProviderError> {
    let provider: Box<dyn TextGenerator> = match kind {
        ProviderKind::OpenAi | ProviderKind::Perplexity => Box::new(
            ChatCompletionsClient::with_base_url(kind, api_key, timeout_secs, base_url)?,
        ),
        ProviderKind::Anthropic => Box::new(AnthropicClient::with_base_url(
            api_key,
            timeout_secs,
            base_url,
        )?),
        ProviderKind::Google => Box::new(GeminiClient::with_base_url(
            api_key,
            timeout_secs,
            base_url,
        )?),
    };
    Ok(provider)
}

/// Longest error-body excerpt kept in [`ProviderError::UnexpectedStatus`].
const ERROR_BODY_LIMIT: usize = 512;

fn http_client(timeout_secs: u64) -> Result<Client, ProviderError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent("vln/0.1 (brand-visibility)")
        .build()?)
}

/// Join `path` onto `base_url`, normalising the trailing slash.
fn endpoint(base_url: &str, path: &str) -> Result<Url, ProviderError> {
    let joined = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Url::parse(&joined).map_err(|e| ProviderError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })
}

/// Send a prepared request, require a 2xx status and decode the JSON body.
async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
    provider: &str,
) -> Result<T, ProviderError> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(ProviderError::UnexpectedStatus {
            provider: provider.to_string(),
            status: status.as_u16(),
            body: body.chars().take(ERROR_BODY_LIMIT).collect(),
        });
    }

    serde_json::from_str(&body).map_err(|e| ProviderError::Deserialize {
        context: format!("{provider} response"),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptors_list_all_providers_in_order() {
        let config = ProviderConfig::default();
        let names: Vec<String> = config
            .descriptors()
            .into_iter()
            .map(|d| d.display_name)
            .collect();
        assert_eq!(names, vec!["ChatGPT", "Claude", "Gemini", "Perplexity"]);
    }

    #[test]
    fn credential_presence_enables_provider() {
        let config = ProviderConfig {
            anthropic_api_key: Some("key".to_string()),
            perplexity_api_key: Some("  ".to_string()),
            ..ProviderConfig::default()
        };
        assert_eq!(config.enabled_kinds(), vec![ProviderKind::Anthropic]);
        let enabled: Vec<bool> = config.descriptors().iter().map(|d| d.enabled).collect();
        assert_eq!(enabled, vec![false, true, false, false]);
    }

    #[test]
    fn build_providers_is_empty_without_credentials() {
        let providers = build_providers(&ProviderConfig {
            timeout_secs: 5,
            ..ProviderConfig::default()
        })
        .expect("registry");
        assert!(providers.is_empty());
    }

    #[test]
    fn build_providers_follows_fixed_order() {
        let config = ProviderConfig {
            openai_api_key: Some("a".to_string()),
            google_api_key: Some("b".to_string()),
            perplexity_api_key: Some("c".to_string()),
            timeout_secs: 5,
            ..ProviderConfig::default()
        };
        let providers = build_providers(&config).expect("registry");
        let ids: Vec<&str> = providers.iter().map(|p| p.descriptor().id.as_str()).collect();
        assert_eq!(ids, vec!["openai", "google", "perplexity"]);
        assert!(providers.iter().all(|p| p.descriptor().enabled));
    }

    #[test]
    fn endpoint_normalises_slashes() {
        let url = endpoint("https://api.example.com/v1/", "/chat/completions").expect("url");
        assert_eq!(url.as_str(), "https://api.example.com/v1/chat/completions");
    }

    #[test]
    fn endpoint_rejects_garbage_base_url() {
        let err = endpoint("not a url", "x").unwrap_err();
        assert!(matches!(err, ProviderError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn debug_does_not_leak_keys() {
        let config = ProviderConfig {
            openai_api_key: Some("sk-very-secret".to_string()),
            ..ProviderConfig::default()
        };
        assert!(!format!("{config:?}").contains("sk-very-secret"));
    }
}
