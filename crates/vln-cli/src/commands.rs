//! Command handlers. Results go to stdout; logs go to stderr.

use rand::{rngs::StdRng, SeedableRng};
use vln_analysis::{
    build_providers, demo_analysis, generate_demo_analysis, generate_prompts, run_brand_analysis,
    AnalysisSettings, BrandAnalysisResult, ProviderConfig,
};
use vln_core::{validate_analysis_request, AppConfig, ValidatedRequest};

fn validate(brand: &str, competitors: &[String]) -> anyhow::Result<ValidatedRequest> {
    validate_analysis_request(brand, competitors).map_err(|e| {
        anyhow::anyhow!(
            "invalid analysis request:\n  - {}",
            e.details.join("\n  - ")
        )
    })
}

/// Run one analysis and print the result as pretty JSON.
///
/// # Errors
///
/// Returns an error if validation fails, a provider client cannot be built,
/// or the result cannot be serialized.
pub(crate) async fn run_analyze(
    config: &AppConfig,
    brand: &str,
    competitors: &[String],
    demo: bool,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let request = validate(brand, competitors)?;
    tracing::info!(
        brand = %request.brand,
        competitors = request.competitors.len(),
        demo,
        "running brand analysis"
    );

    let result: BrandAnalysisResult = if demo {
        match seed {
            Some(seed) => generate_demo_analysis(
                &mut StdRng::seed_from_u64(seed),
                &request.brand,
                &request.competitors,
            ),
            None => demo_analysis(&request.brand, &request.competitors),
        }
    } else {
        let providers = build_providers(&ProviderConfig::from_app_config(config))?;
        let settings = AnalysisSettings::from_app_config(config);
        run_brand_analysis(&providers, &request, &settings).await
    };

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

pub(crate) fn run_providers(config: &AppConfig) {
    let provider_config = ProviderConfig::from_app_config(config);
    println!("{:<12} {:<12} {:<36} ENABLED", "ID", "NAME", "MODEL");
    for descriptor in provider_config.descriptors() {
        println!(
            "{:<12} {:<12} {:<36} {}",
            descriptor.id,
            descriptor.display_name,
            descriptor.model_name,
            if descriptor.enabled { "yes" } else { "no" }
        );
    }
}

/// # Errors
///
/// Returns an error if the brand or competitor domains fail validation.
pub(crate) fn run_prompts(brand: &str, competitors: &[String]) -> anyhow::Result<()> {
    let request = validate(brand, competitors)?;
    for (i, prompt) in generate_prompts(&request.brand, &request.competitors)
        .iter()
        .enumerate()
    {
        println!("{}. {prompt}", i + 1);
    }
    Ok(())
}
