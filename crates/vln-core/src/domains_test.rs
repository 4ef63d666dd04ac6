use super::*;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

#[test]
fn normalize_strips_scheme_www_and_path() {
    assert_eq!(normalize_domain("  HTTPS://www.Example.com/pricing "), "example.com");
    assert_eq!(normalize_domain("http://shop.io"), "shop.io");
    assert_eq!(normalize_domain("acme.com/"), "acme.com");
}

#[test]
fn normalize_keeps_non_www_subdomains() {
    assert_eq!(normalize_domain("app.acme.com"), "app.acme.com");
}

#[test]
fn validate_domain_accepts_plain_domain() {
    assert_eq!(validate_domain("Acme.com"), Ok("acme.com".to_string()));
}

#[test]
fn validate_domain_rejects_empty() {
    assert_eq!(
        validate_domain("   "),
        Err(vec!["Domain is required".to_string()])
    );
}

#[test]
fn validate_domain_requires_tld() {
    let errors = validate_domain("localhost").unwrap_err();
    assert!(
        errors.iter().any(|e| e.contains("top-level domain")),
        "expected TLD error, got {errors:?}"
    );
}

#[test]
fn validate_domain_rejects_consecutive_dots() {
    let errors = validate_domain("acme..com").unwrap_err();
    assert!(errors.iter().any(|e| e.contains("invalid characters or format")));
}

#[test]
fn validate_domain_rejects_invalid_characters() {
    let errors = validate_domain("ac_me.com").unwrap_err();
    assert!(errors.iter().any(|e| e.contains("invalid characters or format")));
}

#[test]
fn validate_domain_rejects_leading_hyphen_label() {
    assert!(validate_domain("-acme.com").is_err());
}

#[test]
fn validate_domain_rejects_single_char_tld() {
    let errors = validate_domain("acme.c").unwrap_err();
    assert!(errors.iter().any(|e| e.contains("at least 2 characters")));
}

#[test]
fn validate_domain_rejects_overlong_domain() {
    let long = format!("{}.com", "a".repeat(260));
    let errors = validate_domain(&long).unwrap_err();
    assert!(errors.iter().any(|e| e == "Domain is too long"));
}

#[test]
fn validate_request_normalizes_all_domains() {
    let result =
        validate_analysis_request("https://www.Acme.com", &strings(&["Beta.io", "http://gamma.co"]))
            .expect("valid request");
    assert_eq!(result.brand, "acme.com");
    assert_eq!(result.competitors, vec!["beta.io", "gamma.co"]);
}

#[test]
fn path_after_domain_is_dropped() {
    assert_eq!(normalize_domain("acme.com/pricing"), "acme.com");
    assert_eq!(validate_domain("acme.com/pricing"), Ok("acme.com".to_string()));

    let result = validate_analysis_request("acme.com/pricing", &strings(&["beta.io/blog?x=1"]))
        .expect("path is ignored, not rejected");
    assert_eq!(result.brand, "acme.com");
    assert_eq!(result.competitors, vec!["beta.io"]);
}

#[test]
fn validate_request_drops_blank_competitors() {
    let result = validate_analysis_request("acme.com", &strings(&["", "  ", "beta.io"]))
        .expect("valid request");
    assert_eq!(result.competitors, vec!["beta.io"]);
}

#[test]
fn validate_request_rejects_brand_listed_as_competitor() {
    let err = validate_analysis_request("shop.io", &strings(&["a.com", "b.com", "shop.io"]))
        .unwrap_err();
    assert_eq!(
        err.details,
        vec!["Duplicate domains detected. Each domain should be unique.".to_string()]
    );
}

#[test]
fn validate_request_detects_duplicates_after_normalization() {
    let err = validate_analysis_request("acme.com", &strings(&["www.beta.io", "BETA.io"]))
        .unwrap_err();
    assert!(err.details[0].starts_with("Duplicate domains"));
}

#[test]
fn validate_request_rejects_more_than_ten_competitors() {
    let competitors: Vec<String> = (0..11).map(|i| format!("c{i}.com")).collect();
    let err = validate_analysis_request("acme.com", &competitors).unwrap_err();
    assert!(err
        .details
        .contains(&"competitors: Maximum 10 competitors allowed".to_string()));
}

#[test]
fn validate_request_accepts_exactly_ten_competitors() {
    let competitors: Vec<String> = (0..10).map(|i| format!("c{i}.com")).collect();
    let result = validate_analysis_request("acme.com", &competitors).expect("ten is allowed");
    assert_eq!(result.competitors.len(), 10);
}

#[test]
fn validate_request_reports_field_paths() {
    let err = validate_analysis_request("nodot", &strings(&["ok.com", "bad_domain"])).unwrap_err();
    assert!(err.details.iter().any(|d| d.starts_with("brand: ")));
    assert!(err.details.iter().any(|d| d.starts_with("competitors.1: ")));
}

#[test]
fn validation_error_display_joins_details() {
    let err = ValidationError::new(strings(&["first", "second"]));
    assert_eq!(err.to_string(), "validation failed: first; second");
}

#[test]
fn analysis_request_defaults_missing_competitors() {
    let req: AnalysisRequest = serde_json::from_str(r#"{"brand":"acme.com"}"#).expect("parse");
    assert_eq!(req.brand, "acme.com");
    assert!(req.competitors.is_empty());
}

#[test]
fn analysis_request_treats_null_competitors_as_empty() {
    let req: AnalysisRequest =
        serde_json::from_str(r#"{"brand":"acme.com","competitors":null}"#).expect("parse");
    assert!(req.competitors.is_empty());
}

#[test]
fn brand_label_returns_leading_label() {
    assert_eq!(brand_label("acme.com"), "acme");
    assert_eq!(brand_label("shop.acme.co.uk"), "shop");
    assert_eq!(brand_label("plain"), "plain");
}
