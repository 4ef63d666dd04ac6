//! Heuristic extraction of mentions, ranks and tone from a free-text reply.
//!
//! This is text scraping, not parsing: numbered-list ranks come from five
//! fixed `N. ...` patterns and tone from a small word lexicon.

use std::sync::LazyLock;

use regex::Regex;
use vln_core::brand_label;

use crate::types::{CompetitorMention, ResponseAnalysis, Sentiment};

pub(crate) const POSITIVE_WORDS: &[&str] = &[
    "best",
    "excellent",
    "great",
    "outstanding",
    "superior",
    "leading",
    "innovative",
    "recommended",
];

pub(crate) const NEGATIVE_WORDS: &[&str] = &[
    "worst",
    "poor",
    "bad",
    "inferior",
    "limited",
    "lacking",
    "problematic",
];

/// Shortest leading label that is matched as a bare word.
const MIN_LABEL_MATCH_LEN: usize = 3;

/// Placeholder substituted for brand occurrences before counting tone words.
const BRAND_MARKER: &str = " BRAND ";

/// `1. ...` through `5. ...`, each capturing up to the next period or newline.
static RANKING_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    (1..=5)
        .map(|rank| Regex::new(&format!(r"{rank}\.\s*([^.\n]+)")).expect("valid ranking regex"))
        .collect()
});

static POSITIVE_RE: LazyLock<Regex> = LazyLock::new(|| word_set_regex(POSITIVE_WORDS));
static NEGATIVE_RE: LazyLock<Regex> = LazyLock::new(|| word_set_regex(NEGATIVE_WORDS));

fn word_set_regex(words: &[&str]) -> Regex {
    Regex::new(&format!(r"\b(?:{})\b", words.join("|"))).expect("valid lexicon regex")
}

/// Ways a domain can show up in lower-cased reply text.
struct MentionMatcher {
    /// Plain substrings: the domain and the domain without dots.
    substrings: Vec<String>,
    /// Leading label as a whole word, e.g. `acme` for `acme.com`.
    label: Option<Regex>,
}

impl MentionMatcher {
    fn new(domain: &str) -> Self {
        let domain = domain.to_lowercase();
        let dotless = domain.replace('.', "");

        let mut substrings = Vec::with_capacity(2);
        for term in [domain.clone(), dotless] {
            if !term.is_empty() && !substrings.contains(&term) {
                substrings.push(term);
            }
        }

        let label = brand_label(&domain);
        let label = (domain.contains('.') && label.len() >= MIN_LABEL_MATCH_LEN)
            .then(|| Regex::new(&format!(r"\b{}\b", regex::escape(label))).ok())
            .flatten();

        Self { substrings, label }
    }

    fn matches(&self, text: &str) -> bool {
        self.substrings.iter().any(|term| text.contains(term.as_str()))
            || self.label.as_ref().is_some_and(|re| re.is_match(text))
    }

    /// Rank from the numbered-list patterns. Patterns are scanned 1..=5 and
    /// matches in text order; the last hit wins.
    fn position(&self, text: &str) -> Option<u8> {
        let mut position = None;
        for (rank, pattern) in (1u8..).zip(RANKING_PATTERNS.iter()) {
            for captures in pattern.captures_iter(text) {
                if captures.get(1).is_some_and(|m| self.matches(m.as_str())) {
                    position = Some(rank);
                }
            }
        }
        position
    }
}

/// Analyze one raw provider reply.
///
/// Pure and total: identical inputs always give identical output, and every
/// string (including the empty one) yields a well-formed result.
#[must_use]
pub fn analyze_response(response: &str, brand: &str, competitors: &[String]) -> ResponseAnalysis {
    let text = response.to_lowercase();

    let brand_matcher = MentionMatcher::new(brand);
    let brand_mentioned = brand_matcher.matches(&text);
    let brand_position = brand_matcher.position(&text);

    let competitor_mentions = competitors
        .iter()
        .map(|competitor| {
            let matcher = MentionMatcher::new(competitor);
            CompetitorMention {
                name: competitor.clone(),
                mentioned: matcher.matches(&text),
                position: matcher.position(&text),
            }
        })
        .collect();

    let (sentiment, confidence) = score_sentiment(&text, &brand.to_lowercase());

    ResponseAnalysis {
        brand_mentioned,
        brand_position,
        competitor_mentions,
        sentiment,
        confidence,
    }
}

/// Count lexicon words around the brand and turn them into a tone plus a
/// confidence in `50..=100`.
fn score_sentiment(text: &str, brand_lower: &str) -> (Sentiment, u8) {
    let context = if brand_lower.is_empty() {
        text.to_string()
    } else {
        text.replace(brand_lower, BRAND_MARKER)
    };

    let positive = POSITIVE_RE.find_iter(&context).count();
    let negative = NEGATIVE_RE.find_iter(&context).count();

    let sentiment = match positive.cmp(&negative) {
        std::cmp::Ordering::Greater => Sentiment::Positive,
        std::cmp::Ordering::Less => Sentiment::Negative,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    };

    let raw = (positive + negative).saturating_mul(20).saturating_add(50);
    let confidence = u8::try_from(raw.clamp(50, 100)).unwrap_or(100);

    (sentiment, confidence)
}

#[cfg(test)]
#[path = "analyzer_test.rs"]
mod tests;
