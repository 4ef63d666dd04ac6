//! Visibility pipeline orchestration.

use vln_core::ValidatedRequest;

use crate::aggregate::build_result;
use crate::analyzer::analyze_response;
use crate::demo::demo_analysis;
use crate::prompts::generate_prompts;
use crate::providers::TextGenerator;
use crate::types::{AnalysisSettings, BrandAnalysisResult, ProviderResponse};

/// Query every provider with the leading prompts and analyze each reply.
///
/// Calls run one at a time: providers in order, and for each provider the
/// first `settings.prompts_per_provider` prompts in order. Exactly one
/// record is produced per (provider, prompt) pair. A failed call becomes a
/// degraded record and never stops the remaining calls.
pub async fn dispatch_prompts(
    providers: &[Box<dyn TextGenerator>],
    prompts: &[String],
    brand: &str,
    competitors: &[String],
    settings: &AnalysisSettings,
) -> Vec<ProviderResponse> {
    let per_provider = prompts.len().min(settings.prompts_per_provider);
    let mut responses = Vec::with_capacity(providers.len() * per_provider);

    for provider in providers {
        let descriptor = provider.descriptor();

        for prompt in &prompts[..per_provider] {
            let record = match provider.generate(prompt, settings.max_output_tokens).await {
                Ok(text) => {
                    let analysis = analyze_response(&text, brand, competitors);
                    tracing::debug!(
                        provider = %descriptor.display_name,
                        brand_mentioned = analysis.brand_mentioned,
                        position = ?analysis.brand_position,
                        "analyzed provider reply"
                    );
                    ProviderResponse::analyzed(descriptor, prompt, text, analysis)
                }
                Err(e) => {
                    tracing::warn!(
                        provider = %descriptor.display_name,
                        model = %descriptor.model_name,
                        error = %e,
                        "provider call failed; recording degraded response"
                    );
                    ProviderResponse::degraded(descriptor, prompt, competitors)
                }
            };
            responses.push(record);
        }
    }

    responses
}

/// Run the full visibility analysis for one validated request.
///
/// 1. Generate the prompt set.
/// 2. Dispatch the leading prompts to every enabled provider.
/// 3. Aggregate the per-response records.
///
/// With no providers enabled the dispatcher is skipped and a randomized demo
/// result of the same shape is returned instead.
pub async fn run_brand_analysis(
    providers: &[Box<dyn TextGenerator>],
    request: &ValidatedRequest,
    settings: &AnalysisSettings,
) -> BrandAnalysisResult {
    if providers.is_empty() {
        tracing::info!(
            brand = %request.brand,
            "no providers configured, returning demo analysis"
        );
        return demo_analysis(&request.brand, &request.competitors);
    }

    let prompts = generate_prompts(&request.brand, &request.competitors);
    let responses = dispatch_prompts(
        providers,
        &prompts,
        &request.brand,
        &request.competitors,
        settings,
    )
    .await;

    let providers_queried = providers
        .iter()
        .map(|p| p.descriptor().display_name.clone())
        .collect();

    let result = build_result(
        &request.brand,
        &request.competitors,
        responses,
        providers_queried,
    );

    tracing::info!(
        brand = %result.brand,
        responses = result.responses.len(),
        visibility = result.overall_visibility_score,
        "brand analysis complete"
    );

    result
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
