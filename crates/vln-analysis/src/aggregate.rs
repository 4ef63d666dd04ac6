//! Fold per-response records into brand and competitor scores.

use chrono::Utc;

use crate::types::{
    AnalysisMetadata, BrandAnalysisResult, CompetitorComparison, ProviderResponse, Sentiment,
};

/// `round(100 * count / total)`, or 0 for an empty response set.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn percentage(count: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (count as f64 / total as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

/// Share of responses that mention the brand, as a 0–100 score.
///
/// Returns 0 when there are no responses.
#[must_use]
pub fn overall_visibility_score(responses: &[ProviderResponse]) -> u8 {
    let mentioned = responses.iter().filter(|r| r.brand_mentioned).count();
    percentage(mentioned, responses.len())
}

/// One comparison row per competitor, in input order.
///
/// Sentiment is not rolled up at this level and is always neutral.
#[must_use]
pub fn compare_competitors(
    competitors: &[String],
    responses: &[ProviderResponse],
) -> Vec<CompetitorComparison> {
    let total = responses.len();

    competitors
        .iter()
        .map(|competitor| {
            let mention_count = responses
                .iter()
                .filter(|r| {
                    r.competitor_mentions
                        .iter()
                        .any(|m| &m.name == competitor && m.mentioned)
                })
                .count();

            let positions: Vec<u8> = responses
                .iter()
                .flat_map(|r| r.competitor_mentions.iter())
                .filter(|m| &m.name == competitor)
                .filter_map(|m| m.position)
                .collect();

            CompetitorComparison {
                competitor: competitor.clone(),
                visibility_score: percentage(mention_count, total),
                mention_count,
                average_position: average_position(&positions),
                sentiment: Sentiment::Neutral,
            }
        })
        .collect()
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn average_position(positions: &[u8]) -> u8 {
    if positions.is_empty() {
        return 0;
    }
    let sum: u32 = positions.iter().map(|&p| u32::from(p)).sum();
    (f64::from(sum) / positions.len() as f64).round() as u8
}

/// Assemble the terminal result for one request.
#[must_use]
pub fn build_result(
    brand: &str,
    competitors: &[String],
    responses: Vec<ProviderResponse>,
    providers_queried: Vec<String>,
) -> BrandAnalysisResult {
    let overall_visibility_score = overall_visibility_score(&responses);
    let competitor_comparison = compare_competitors(competitors, &responses);

    BrandAnalysisResult {
        brand: brand.to_string(),
        competitors: competitors.to_vec(),
        overall_visibility_score,
        competitor_comparison,
        metadata: AnalysisMetadata {
            total_prompts_analyzed: responses.len(),
            providers_queried,
            analysis_timestamp: Utc::now(),
        },
        responses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CompetitorMention;

    fn response(brand_mentioned: bool, mentions: &[(&str, bool, Option<u8>)]) -> ProviderResponse {
        ProviderResponse {
            provider: "ChatGPT".to_string(),
            model: "gpt-4o-mini".to_string(),
            prompt: "prompt".to_string(),
            response: "reply".to_string(),
            brand_mentioned,
            brand_position: None,
            competitor_mentions: mentions
                .iter()
                .map(|&(name, mentioned, position)| CompetitorMention {
                    name: name.to_string(),
                    mentioned,
                    position,
                })
                .collect(),
            sentiment: Sentiment::Neutral,
            confidence: 50,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn empty_response_set_scores_zero() {
        assert_eq!(overall_visibility_score(&[]), 0);
        let rows = compare_competitors(&["a.com".to_string()], &[]);
        assert_eq!(rows[0].visibility_score, 0);
        assert_eq!(rows[0].mention_count, 0);
        assert_eq!(rows[0].average_position, 0);
    }

    #[test]
    fn overall_score_rounds_share_of_mentions() {
        let responses = vec![
            response(true, &[]),
            response(false, &[]),
            response(false, &[]),
        ];
        // 1/3 = 33.33…
        assert_eq!(overall_visibility_score(&responses), 33);

        let responses = vec![
            response(true, &[]),
            response(true, &[]),
            response(false, &[]),
        ];
        // 2/3 = 66.67…
        assert_eq!(overall_visibility_score(&responses), 67);
    }

    #[test]
    fn overall_score_is_one_hundred_when_always_mentioned() {
        let responses = vec![response(true, &[]), response(true, &[])];
        assert_eq!(overall_visibility_score(&responses), 100);
    }

    #[test]
    fn competitor_rows_count_mentions_and_average_positions() {
        let responses = vec![
            response(false, &[("a.com", true, Some(1)), ("b.com", false, None)]),
            response(false, &[("a.com", true, Some(2)), ("b.com", true, None)]),
            response(false, &[("a.com", false, None), ("b.com", false, None)]),
            response(false, &[("a.com", true, Some(2)), ("b.com", false, None)]),
        ];
        let rows = compare_competitors(&["a.com".to_string(), "b.com".to_string()], &responses);

        assert_eq!(rows[0].competitor, "a.com");
        assert_eq!(rows[0].mention_count, 3);
        assert_eq!(rows[0].visibility_score, 75);
        // (1 + 2 + 2) / 3 = 1.67
        assert_eq!(rows[0].average_position, 2);
        assert_eq!(rows[0].sentiment, Sentiment::Neutral);

        assert_eq!(rows[1].mention_count, 1);
        assert_eq!(rows[1].visibility_score, 25);
        assert_eq!(rows[1].average_position, 0);
    }

    #[test]
    fn half_average_rounds_up() {
        let responses = vec![
            response(false, &[("a.com", true, Some(1))]),
            response(false, &[("a.com", true, Some(2))]),
        ];
        let rows = compare_competitors(&["a.com".to_string()], &responses);
        assert_eq!(rows[0].average_position, 2);
    }

    #[test]
    fn aggregation_ignores_response_order() {
        let mut responses = vec![
            response(true, &[("a.com", true, Some(3))]),
            response(false, &[("a.com", false, None)]),
            response(true, &[("a.com", true, Some(1))]),
        ];
        let competitors = vec!["a.com".to_string()];
        let forward = (
            overall_visibility_score(&responses),
            compare_competitors(&competitors, &responses),
        );
        responses.reverse();
        let backward = (
            overall_visibility_score(&responses),
            compare_competitors(&competitors, &responses),
        );
        assert_eq!(forward, backward);
    }

    #[test]
    fn build_result_fills_metadata() {
        let responses = vec![response(true, &[]), response(false, &[])];
        let result = build_result(
            "acme.com",
            &["a.com".to_string()],
            responses,
            vec!["ChatGPT".to_string()],
        );
        assert_eq!(result.overall_visibility_score, 50);
        assert_eq!(result.metadata.total_prompts_analyzed, 2);
        assert_eq!(result.metadata.providers_queried, vec!["ChatGPT"]);
        assert_eq!(result.competitor_comparison.len(), 1);
        assert_eq!(result.responses.len(), 2);
    }

    #[test]
    fn result_serializes_with_dashboard_field_names() {
        let result = build_result("acme.com", &[], vec![response(true, &[])], vec![]);
        let json = serde_json::to_value(&result).expect("serialize");
        assert_eq!(json["overallVisibilityScore"], 100);
        assert!(json["aiProviderResponses"].is_array());
        assert!(json["analysisMetadata"]["totalPromptsAnalyzed"].is_number());
        assert_eq!(json["aiProviderResponses"][0]["brandMentioned"], true);
        assert!(json["aiProviderResponses"][0].get("brandPosition").is_none());
        assert_eq!(json["aiProviderResponses"][0]["sentiment"], "neutral");
    }
}
