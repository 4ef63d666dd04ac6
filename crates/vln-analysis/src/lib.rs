//! Brand visibility analysis across hosted LLM providers.
//!
//! Generates a fixed battery of discovery prompts for a brand, sends the
//! leading prompts to every configured provider, scans each reply for brand
//! and competitor mentions, list ranks and lexicon sentiment, then folds the
//! records into visibility scores.

pub mod aggregate;
pub mod analyzer;
pub mod demo;
pub mod error;
pub mod pipeline;
pub mod prompts;
pub mod providers;
pub mod types;

pub use aggregate::build_result;
pub use analyzer::analyze_response;
pub use demo::{demo_analysis, generate_demo_analysis};
pub use error::ProviderError;
pub use pipeline::{dispatch_prompts, run_brand_analysis};
pub use prompts::generate_prompts;
pub use providers::{build_providers, ProviderConfig, ProviderKind, TextGenerator};
pub use types::{
    AnalysisMetadata, AnalysisSettings, BrandAnalysisResult, CompetitorComparison,
    CompetitorMention, ProviderDescriptor, ProviderResponse, ResponseAnalysis, Sentiment,
};
