use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vln_core::AppConfig;

/// Coarse tone of a reply toward the brand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

/// Static facts about one text-generation backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDescriptor {
    pub id: String,
    pub display_name: String,
    pub model_name: String,
    /// True when a credential for this provider is configured.
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorMention {
    pub name: String,
    pub mentioned: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u8>,
}

/// Signals extracted from one raw reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseAnalysis {
    pub brand_mentioned: bool,
    /// 1-based rank in a numbered list, if the brand appeared in one.
    pub brand_position: Option<u8>,
    pub competitor_mentions: Vec<CompetitorMention>,
    pub sentiment: Sentiment,
    /// 50..=100 for analyzed replies.
    pub confidence: u8,
}

/// One (provider, prompt) outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderResponse {
    pub provider: String,
    pub model: String,
    pub prompt: String,
    pub response: String,
    pub brand_mentioned: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_position: Option<u8>,
    pub competitor_mentions: Vec<CompetitorMention>,
    pub sentiment: Sentiment,
    pub confidence: u8,
    pub timestamp: DateTime<Utc>,
}

impl ProviderResponse {
    /// Record for a reply that was received and analyzed.
    #[must_use]
    pub fn analyzed(
        descriptor: &ProviderDescriptor,
        prompt: &str,
        response: String,
        analysis: ResponseAnalysis,
    ) -> Self {
        Self {
            provider: descriptor.display_name.clone(),
            model: descriptor.model_name.clone(),
            prompt: prompt.to_string(),
            response,
            brand_mentioned: analysis.brand_mentioned,
            brand_position: analysis.brand_position,
            competitor_mentions: analysis.competitor_mentions,
            sentiment: analysis.sentiment,
            confidence: analysis.confidence,
            timestamp: Utc::now(),
        }
    }

    /// Placeholder record for a call that failed.
    #[must_use]
    pub fn degraded(descriptor: &ProviderDescriptor, prompt: &str, competitors: &[String]) -> Self {
        Self {
            provider: descriptor.display_name.clone(),
            model: descriptor.model_name.clone(),
            prompt: prompt.to_string(),
            response: format!(
                "Error: Unable to get response from {}",
                descriptor.display_name
            ),
            brand_mentioned: false,
            brand_position: None,
            competitor_mentions: competitors
                .iter()
                .map(|name| CompetitorMention {
                    name: name.clone(),
                    mentioned: false,
                    position: None,
                })
                .collect(),
            sentiment: Sentiment::Neutral,
            confidence: 0,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorComparison {
    pub competitor: String,
    pub visibility_score: u8,
    pub mention_count: usize,
    /// Rounded mean rank; 0 when the competitor was never ranked.
    pub average_position: u8,
    pub sentiment: Sentiment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMetadata {
    pub total_prompts_analyzed: usize,
    pub providers_queried: Vec<String>,
    pub analysis_timestamp: DateTime<Utc>,
}

/// Final answer for one analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandAnalysisResult {
    pub brand: String,
    pub competitors: Vec<String>,
    pub overall_visibility_score: u8,
    #[serde(rename = "aiProviderResponses")]
    pub responses: Vec<ProviderResponse>,
    pub competitor_comparison: Vec<CompetitorComparison>,
    #[serde(rename = "analysisMetadata")]
    pub metadata: AnalysisMetadata,
}

/// Knobs applied uniformly to every provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisSettings {
    pub max_output_tokens: u32,
    pub prompts_per_provider: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            max_output_tokens: 1000,
            prompts_per_provider: 3,
        }
    }
}

impl AnalysisSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_output_tokens: config.max_output_tokens,
            prompts_per_provider: config.prompts_per_provider,
        }
    }
}
