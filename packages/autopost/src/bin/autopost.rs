//! Autopost CLI
//!
//! Generates one illustrated post for a topic and publishes it as a private
//! WikiDocs blog entry. Exits non-zero when the run fails.

use anyhow::{Context, Result};
use autopost::kernel::PipelineDeps;
use autopost::{Config, Orchestrator};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_TOPIC: &str = "봄날의 산책";
const DEFAULT_CONTENTS: &str = "따뜻한 봄 햇살 아래 공원을 걷는 평화로운 순간";

#[derive(Parser)]
#[command(name = "autopost")]
#[command(about = "Generate an illustrated post and publish it to a WikiDocs blog")]
struct Cli {
    /// Topic of the post
    #[arg(long, default_value = DEFAULT_TOPIC)]
    topic: String,

    /// Ideas the post should build on
    #[arg(long, default_value = DEFAULT_CONTENTS)]
    contents: String,

    /// Print the full run report as JSON instead of the summary
    #[arg(long)]
    json: bool,
}

fn print_rule() {
    println!("{}", "=".repeat(50));
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,autopost=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        model = %config.anthropic_model,
        poll_interval_secs = config.poll_interval.as_secs(),
        max_poll_attempts = config.max_poll_attempts,
        "Configuration loaded"
    );

    let deps = PipelineDeps::from_config(&config).context("Failed to build API clients")?;
    let orchestrator = Orchestrator::new(deps, config.pipeline_settings());

    if !cli.json {
        print_rule();
        println!("Autopost");
        print_rule();
        println!("Topic: {}", cli.topic);
        println!("Contents: {}", cli.contents);
        print_rule();
    }

    let report = orchestrator.run(&cli.topic, &cli.contents).await;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize run report")?
        );
    } else {
        print_rule();
        println!("{}", report.summary());
        print_rule();
    }

    if !report.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
