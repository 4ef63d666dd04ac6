use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["vln-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_analyze_with_repeated_competitors() {
    let cli = Cli::try_parse_from([
        "vln-cli",
        "analyze",
        "--brand",
        "acme.com",
        "--competitor",
        "beta.io",
        "--competitor",
        "gamma.dev",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Some(Commands::Analyze {
            brand,
            competitors,
            demo,
            seed,
        }) => {
            assert_eq!(brand, "acme.com");
            assert_eq!(competitors, vec!["beta.io", "gamma.dev"]);
            assert!(!demo);
            assert!(seed.is_none());
        }
        other => panic!("expected analyze command, got {other:?}"),
    }
}

#[test]
fn parses_analyze_demo_with_seed() {
    let cli = Cli::try_parse_from([
        "vln-cli", "analyze", "--brand", "acme.com", "--demo", "--seed", "42",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Analyze {
            demo: true,
            seed: Some(42),
            ..
        })
    ));
}

#[test]
fn seed_requires_demo() {
    let result = Cli::try_parse_from(["vln-cli", "analyze", "--brand", "acme.com", "--seed", "1"]);
    assert!(result.is_err());
}

#[test]
fn analyze_requires_brand() {
    assert!(Cli::try_parse_from(["vln-cli", "analyze"]).is_err());
}

#[test]
fn parses_providers_command() {
    let cli = Cli::try_parse_from(["vln-cli", "providers"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Providers)));
}

#[test]
fn parses_prompts_command() {
    let cli = Cli::try_parse_from(["vln-cli", "prompts", "--brand", "acme.com"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Prompts { ref competitors, .. }) if competitors.is_empty()
    ));
}

#[test]
fn prompts_command_rejects_invalid_brand() {
    assert!(commands::run_prompts("not a domain", &[]).is_err());
}
