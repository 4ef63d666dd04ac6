//! Randomized stand-in result for deployments with no provider credentials.
//!
//! Values are plausible-looking noise. Only the shape of the result is
//! meaningful.

use chrono::{TimeDelta, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::aggregate::build_result;
use crate::types::{BrandAnalysisResult, CompetitorMention, ProviderResponse, Sentiment};

/// (display name, model) for each simulated provider.
const DEMO_PROVIDERS: [(&str, &str); 4] = [
    ("ChatGPT", "gpt-4o-mini"),
    ("Claude", "claude-3-haiku"),
    ("Gemini", "gemini-1.5-flash"),
    ("Perplexity", "llama-3.1-sonar"),
];

/// Names used when there are too few real companies to fill a canned reply.
const FILLER_COMPANIES: [&str; 3] = [
    "Industry Challenger Inc",
    "Market Leader Pro",
    "Emerging Solutions Co",
];

#[derive(Clone, Copy)]
enum DemoPrompt {
    TopCompanies,
    Compare,
}

/// Demo result using the thread-local RNG.
#[must_use]
pub fn demo_analysis(brand: &str, competitors: &[String]) -> BrandAnalysisResult {
    generate_demo_analysis(&mut rand::rng(), brand, competitors)
}

/// Demo result drawn from `rng`: four providers × two prompts.
pub fn generate_demo_analysis<R: Rng + ?Sized>(
    rng: &mut R,
    brand: &str,
    competitors: &[String],
) -> BrandAnalysisResult {
    let now = Utc::now();
    let prompts = [
        (
            DemoPrompt::TopCompanies,
            format!("What are the top 5 companies in the same industry as {brand}? Please rank them by market leadership and innovation."),
        ),
        (
            DemoPrompt::Compare,
            format!(
                "Compare {brand} with {}. Which company offers the best solution and why?",
                competitors
                    .iter()
                    .take(2)
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        ),
    ];

    let mut responses = Vec::with_capacity(DEMO_PROVIDERS.len() * prompts.len());

    for (provider, model) in DEMO_PROVIDERS {
        for (kind, prompt) in &prompts {
            let brand_mentioned = rng.random_bool(0.7);
            let brand_position = (brand_mentioned && rng.random_bool(0.5))
                .then(|| rng.random_range(1..=5));

            let competitor_mentions = competitors
                .iter()
                .map(|name| CompetitorMention {
                    name: name.clone(),
                    mentioned: rng.random_bool(0.6),
                    position: rng.random_bool(0.4).then(|| rng.random_range(1..=5)),
                })
                .collect();

            let sentiment = if !brand_mentioned {
                Sentiment::Neutral
            } else if rng.random_bool(0.3) {
                Sentiment::Negative
            } else if rng.random_bool(0.7) {
                Sentiment::Positive
            } else {
                Sentiment::Neutral
            };

            let response = canned_reply(rng, *kind, brand, competitors);
            let age = TimeDelta::milliseconds(rng.random_range(0..3_600_000));

            responses.push(ProviderResponse {
                provider: provider.to_string(),
                model: model.to_string(),
                prompt: prompt.clone(),
                response,
                brand_mentioned,
                brand_position,
                competitor_mentions,
                sentiment,
                confidence: rng.random_range(70..100),
                timestamp: now - age,
            });
        }
    }

    let providers_queried = DEMO_PROVIDERS
        .iter()
        .map(|(name, _)| (*name).to_string())
        .collect();

    build_result(brand, competitors, responses, providers_queried)
}

fn canned_reply<R: Rng + ?Sized>(
    rng: &mut R,
    kind: DemoPrompt,
    brand: &str,
    competitors: &[String],
) -> String {
    match kind {
        DemoPrompt::TopCompanies => {
            let mut companies: Vec<&str> = std::iter::once(brand)
                .chain(competitors.iter().take(3).map(String::as_str))
                .collect();
            companies.shuffle(rng);
            let pick = |i: usize| companies.get(i).copied().unwrap_or(FILLER_COMPANIES[i]);
            format!(
                "Based on market analysis, here are the top companies in this industry:\n\n\
                 1. {} - Market leader with innovative solutions\n\
                 2. {} - Strong customer base and reliable service\n\
                 3. {} - Growing rapidly with competitive pricing\n\
                 4. Industry Pioneer Corp - Established player with legacy systems\n\
                 5. Innovation Labs Inc - Emerging technology focus\n\n\
                 Each company has unique strengths in different market segments.",
                pick(0),
                pick(1),
                pick(2)
            )
        }
        DemoPrompt::Compare => {
            let first = competitors.first().map_or("Competitor A", String::as_str);
            let second = competitors.get(1).map_or("Competitor B", String::as_str);
            let budget = competitors.first().map_or("alternatives", String::as_str);
            format!(
                "When comparing these solutions:\n\n\
                 {brand} offers excellent user experience and robust features, making it ideal for businesses seeking comprehensive functionality. \
                 {first} provides competitive pricing and good customer support. \
                 {second} focuses on enterprise-grade security and scalability.\n\n\
                 For most use cases, I'd recommend evaluating based on your specific needs: \
                 {brand} for feature richness, {budget} for budget-conscious decisions."
            )
        }
    }
}
