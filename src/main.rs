//! Bargain CLI binary

use bargain::cli::{BargainApp, Cli, Commands};
use bargain::persona::Persona;
use bargain::report::{describe, BatchSummary};
use bargain::Product;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            name,
            base,
            min,
            budget,
            overrides,
            quiet,
        } => {
            let config = BargainApp::load_config(cli.config.as_deref(), &overrides)?;
            let app = BargainApp::new(config);
            let product = Product::new(name, base, min, budget)?;

            let transcript = app.negotiate(product)?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&transcript)?);
            } else {
                if !quiet {
                    for line in &transcript.lines {
                        println!("{}", line);
                    }
                    println!();
                }
                println!("{}", describe(&transcript.outcome.result));
                println!("   Transcript: {}", transcript.digest);
            }
        }

        Commands::Bench { overrides } => {
            let config = BargainApp::load_config(cli.config.as_deref(), &overrides)?;
            let app = BargainApp::new(config);

            let outcomes = app.bench().await?;
            let summary = BatchSummary::from_results(outcomes.iter().map(|o| &o.outcome.result));

            if cli.json {
                let body = serde_json::json!({ "runs": outcomes, "summary": summary });
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                println!("{}", "=".repeat(60));
                for outcome in &outcomes {
                    println!("\nTest: {} - {} scenario", outcome.product, outcome.difficulty);
                    println!("{}", describe(&outcome.outcome.result));
                }
                println!("\n{}", "=".repeat(60));
                println!("{}", summary.render());
                println!("{}", "=".repeat(60));
            }
        }

        Commands::Personas => {
            for persona in [Persona::diplomatic_buyer(), Persona::data_driven_seller()] {
                println!("== {}\n{}\n", persona.name, persona.summary());
            }
        }
    }

    Ok(())
}
