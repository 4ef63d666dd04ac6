mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "vln-cli")]
#[command(about = "Brand visibility across LLM providers")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyze how visible a brand is in provider answers
    Analyze {
        /// Brand domain (e.g., acme.com)
        #[arg(long)]
        brand: String,

        /// Competitor domain; repeat for several
        #[arg(long = "competitor")]
        competitors: Vec<String>,

        /// Return randomized demo data without calling any provider
        #[arg(long)]
        demo: bool,

        /// Seed for the demo generator, for reproducible output
        #[arg(long, requires = "demo")]
        seed: Option<u64>,
    },
    /// List known providers and whether each one has a credential
    Providers,
    /// Print the prompts that would be sent for a brand
    Prompts {
        /// Brand domain (e.g., acme.com)
        #[arg(long)]
        brand: String,

        /// Competitor domain; repeat for several
        #[arg(long = "competitor")]
        competitors: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = vln_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Analyze {
            brand,
            competitors,
            demo,
            seed,
        }) => commands::run_analyze(&config, &brand, &competitors, demo, seed).await?,
        Some(Commands::Providers) => commands::run_providers(&config),
        Some(Commands::Prompts { brand, competitors }) => {
            commands::run_prompts(&brand, &competitors)?;
        }
        None => println!("vln-cli: try `vln-cli analyze --brand example.com`"),
    }

    Ok(())
}

#[cfg(test)]
mod tests;
