//! Natural-language prompts sent to every provider.

/// Build the fixed, ordered prompt set for a brand and its competitors.
///
/// Domains are interpolated verbatim. Templates that name a specific
/// competitor fall back to a generic phrase when the list is empty.
#[must_use]
pub fn generate_prompts(brand: &str, competitors: &[String]) -> Vec<String> {
    let all_companies: Vec<&str> = std::iter::once(brand)
        .chain(competitors.iter().map(String::as_str))
        .collect();

    let compared = if competitors.is_empty() {
        "their main competitors".to_string()
    } else {
        competitors
            .iter()
            .take(3)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };
    let first_competitor = competitors
        .first()
        .map_or("their main competitor", String::as_str);
    let shortlist = all_companies
        .iter()
        .take(4)
        .copied()
        .collect::<Vec<_>>()
        .join(", ");

    vec![
        format!("What are the top 5 companies in the same industry as {brand}? Please rank them by market leadership and innovation."),
        format!("Compare {brand} with {compared}. Which company offers the best solution and why?"),
        format!("I'm looking for alternatives to {brand}. What are the best competing solutions available?"),
        format!(
            "Rank these companies by customer satisfaction and product quality: {}.",
            all_companies.join(", ")
        ),
        format!("Which company between {brand} and {first_competitor} would you recommend for a business solution?"),
        format!("What are the pros and cons of {brand} compared to its main competitors?"),
        format!("List the market leaders in {brand}'s industry and explain their competitive advantages."),
        format!("If I had to choose between {shortlist}, which would be the best option and why?"),
    ]
}
