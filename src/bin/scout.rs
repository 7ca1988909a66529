//! DealScout CLI - runs one analysis without the dashboard
//!
//! Prints the comparison tables, optionally writes them to disk and asks the
//! shopping assistant a single question about the results.
//!
//! # Usage
//! ```sh
//! MODE=mock cargo run --bin scout -- "silver ring" --export-dir out --ask "best deal?"
//! ```

use anyhow::{Context, Result, bail};
use clap::Parser;
use dealscout::application::agents::chat::prepare_context;
use dealscout::application::system::Application;
use dealscout::config::{Config, Mode};
use dealscout::domain::reports::AnalysisOutcome;
use dealscout::infrastructure::export;
use dealscout::interfaces::format::{format_change_pct, format_inr, format_pct, truncate};
use std::path::PathBuf;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(author, version, about = "Product price comparison from the command line", long_about = None)]
struct Cli {
    /// Product to search for (defaults to DEFAULT_PRODUCT_QUERY)
    query: Option<String>,

    /// SerpApi key (defaults to SERPAPI_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Groq key for --ask (defaults to GROQ_API_KEY)
    #[arg(long)]
    groq_key: Option<String>,

    /// Use the offline mock providers
    #[arg(long)]
    mock: bool,

    /// Write CSV reports and a JSON snapshot into this directory
    #[arg(short, long)]
    export_dir: Option<PathBuf>,

    /// Ask the shopping assistant about the results
    #[arg(long)]
    ask: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env().context("Failed to load configuration")?;
    if cli.mock {
        config.mode = Mode::Mock;
    }
    info!("DealScout CLI {} (Mode: {:?})", env!("CARGO_PKG_VERSION"), config.mode);

    let app = Application::build(config).await?;
    let defaults = app.defaults();
    let query = cli.query.unwrap_or(defaults.query);
    let api_key = cli.api_key.unwrap_or(defaults.serpapi_key);

    let outcome = match app.pipeline.run(&query, &api_key, |_| {}).await {
        Ok(outcome) => outcome,
        Err(e) => bail!("{}", e),
    };

    print_report(&outcome);

    if let Some(dir) = &cli.export_dir {
        let files = export::export_csv(&outcome, dir)?;
        let snapshot = export::export_json(&outcome, dir)?;
        println!(
            "\nSaved {} CSV file(s) and {}",
            files.len(),
            snapshot.display()
        );
    }

    if let Some(question) = &cli.ask {
        let groq_key = cli.groq_key.unwrap_or(defaults.groq_key);
        let context = prepare_context(&outcome.clean, &outcome.deals, &outcome.cheapest);
        let reply = app.assistant.ask(question, &context, &groq_key, &[])
            .await;
        println!("\n🤖 {}\n{}", question, reply);
    }

    Ok(())
}

fn print_report(outcome: &AnalysisOutcome) {
    println!("{}", "=".repeat(80));
    println!(
        "Query: '{}' | {} scraped, {} usable",
        outcome.query,
        outcome.raw.len(),
        outcome.clean.len()
    );
    println!("{}", "=".repeat(80));

    println!("\n💰 Top 10 Cheapest Listings");
    for row in &outcome.cheapest {
        println!(
            "  {:>12}  {:<20} {}",
            format_inr(row.price),
            truncate(&row.seller, 20),
            truncate(&row.title, 44)
        );
    }

    println!("\n🏪 Seller Report");
    println!(
        "  {:<20} {:>5} {:>12} {:>12} {:>12}",
        "Seller", "Count", "Min", "Avg", "Max"
    );
    for row in &outcome.seller_report {
        println!(
            "  {:<20} {:>5} {:>12} {:>12} {:>12}",
            truncate(&row.seller, 20),
            row.num_listings,
            format_inr(row.min_price),
            format_inr(row.avg_price),
            format_inr(row.max_price)
        );
    }

    println!("\n📈 Price History Deals");
    for row in &outcome.historic_report {
        println!(
            "  {:>12} avg {:>12} saving {:>7} 24h {:>7}  {}",
            format_inr(row.price),
            format_inr(row.historic_avg_price),
            format_pct(row.historical_saving_pct),
            format_change_pct(row.price_change_24h_pct),
            truncate(&row.title, 36)
        );
    }

    println!("\n💎 Potential Deals (AI)");
    if outcome.deals.is_empty() {
        println!("  Not enough data to build a model.");
    }
    for row in outcome.deals.iter().take(10) {
        println!(
            "  {:>12} predicted {:>12} gap {:>12}  {}",
            format_inr(row.price),
            format_inr(row.predicted_price),
            format_inr(row.price_difference),
            truncate(&row.title, 36)
        );
    }
    if let Some(quality) = outcome.model_quality {
        println!(
            "  Model: {} train / {} test rows, RMSE {}, R² {}",
            quality.train_rows,
            quality.test_rows,
            format_inr(quality.rmse),
            quality
                .r_squared
                .map(|r| format!("{:.3}", r))
                .unwrap_or_else(|| "n/a".to_string())
        );
    }
}
