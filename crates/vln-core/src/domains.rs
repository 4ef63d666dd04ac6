//! Domain normalization and analysis-request validation.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Upper bound on competitor domains per analysis.
pub const MAX_COMPETITORS: usize = 10;

const MAX_DOMAIN_LEN: usize = 253;

static DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)*[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?$")
        .expect("valid domain regex")
});

/// Inbound analysis payload, as posted by the dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default)]
    pub brand: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub competitors: Vec<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<Vec<String>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// An analysis request whose domains are normalized, valid and pairwise distinct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub brand: String,
    pub competitors: Vec<String>,
}

/// Normalize a user-entered domain.
///
/// Trims whitespace, lower-cases, strips an `http://`/`https://` scheme and a
/// leading `www.`, and drops any path.
#[must_use]
pub fn normalize_domain(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let without_scheme = lowered
        .strip_prefix("https://")
        .or_else(|| lowered.strip_prefix("http://"))
        .unwrap_or(&lowered);
    let without_www = without_scheme
        .strip_prefix("www.")
        .unwrap_or(without_scheme);
    without_www
        .split('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Validate one domain and return its normalized form.
///
/// # Errors
///
/// Returns every rule the domain breaks as a human-readable message.
pub fn validate_domain(raw: &str) -> Result<String, Vec<String>> {
    let domain = normalize_domain(raw);
    if domain.is_empty() {
        return Err(vec!["Domain is required".to_string()]);
    }

    let mut errors = Vec::new();

    if domain.len() > MAX_DOMAIN_LEN {
        errors.push("Domain is too long".to_string());
    }
    if !DOMAIN_RE.is_match(&domain) {
        errors.push("Please enter a valid domain (e.g., example.com)".to_string());
    }
    if !domain.contains('.') {
        errors.push("Domain must include a top-level domain (e.g., .com, .org)".to_string());
    }
    if has_invalid_shape(&domain) {
        errors.push("Domain contains invalid characters or format".to_string());
    }
    if let Some(tld) = domain.rsplit('.').next() {
        if domain.contains('.') && tld.len() < 2 {
            errors.push("Top-level domain must be at least 2 characters".to_string());
        }
    }

    if errors.is_empty() {
        Ok(domain)
    } else {
        Err(errors)
    }
}

fn has_invalid_shape(domain: &str) -> bool {
    domain.starts_with('.')
        || domain.ends_with('.')
        || domain.contains("..")
        || domain.starts_with('-')
        || domain.ends_with('-')
        || domain
            .chars()
            .any(|c| !(c.is_ascii_alphanumeric() || c == '.' || c == '-'))
}

/// Validate a brand plus its competitors.
///
/// Blank competitor entries are dropped before validation. All syntax
/// problems are reported together; the duplicate check only runs once every
/// domain is individually valid.
///
/// # Errors
///
/// Returns [`ValidationError`] listing each problem found.
pub fn validate_analysis_request(
    brand: &str,
    competitors: &[String],
) -> Result<ValidatedRequest, ValidationError> {
    let mut errors = Vec::new();

    let clean_brand = match validate_domain(brand) {
        Ok(domain) => Some(domain),
        Err(messages) => {
            errors.push(format!("brand: {}", messages.join(", ")));
            None
        }
    };

    let provided: Vec<&String> = competitors.iter().filter(|c| !c.trim().is_empty()).collect();
    if provided.len() > MAX_COMPETITORS {
        errors.push(format!(
            "competitors: Maximum {MAX_COMPETITORS} competitors allowed"
        ));
    }

    let mut clean_competitors = Vec::with_capacity(provided.len());
    for (index, competitor) in provided.iter().enumerate() {
        match validate_domain(competitor) {
            Ok(domain) => clean_competitors.push(domain),
            Err(messages) => {
                errors.push(format!("competitors.{index}: {}", messages.join(", ")));
            }
        }
    }

    let Some(clean_brand) = clean_brand.filter(|_| errors.is_empty()) else {
        return Err(ValidationError::new(errors));
    };

    let mut seen = HashSet::new();
    let all_unique = std::iter::once(&clean_brand)
        .chain(clean_competitors.iter())
        .all(|domain| seen.insert(domain.as_str()));
    if !all_unique {
        return Err(ValidationError::new(vec![
            "Duplicate domains detected. Each domain should be unique.".to_string(),
        ]));
    }

    Ok(ValidatedRequest {
        brand: clean_brand,
        competitors: clean_competitors,
    })
}

/// Leading label of a domain, e.g. `acme` for `acme.com`.
#[must_use]
pub fn brand_label(domain: &str) -> &str {
    domain.split('.').next().unwrap_or(domain)
}

#[cfg(test)]
#[path = "domains_test.rs"]
mod tests;
