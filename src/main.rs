//! Apiary - Options-Flow Signal Ranking Engine
//!
//! Filters raw options-flow events, validates them against strategy
//! rules, classifies them by market-bias alignment, scores them and
//! emits a ranked list of trade ideas.

mod adapters;
mod application;
mod config;
mod domain;
mod ports;
mod strategy;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

use crate::adapters::cli::{BenchmarkCmd, CliApp, Command, RunCmd, ScoreCmd};
use crate::adapters::console::ConsoleSink;
use crate::adapters::feed::read_events;
use crate::adapters::providers::{
    JsonlDailyBias, JsonlPriceHistory, NoHistory, SessionBiasProvider,
};
use crate::application::SignalEngine;
use crate::config::loader::{config_path, load_config, Config};
use crate::domain::{BiasContext, BiasLevel, MarketZone};
use crate::ports::bias::BiasProvider;
use crate::ports::market_data::{DailyBiasPort, PriceHistoryPort};
use crate::ports::sink::OutputSink;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present (operational overrides, not secrets)
    dotenvy::dotenv().ok();

    let app = CliApp::parse();
    init_logging(app.verbose, app.debug);

    match app.command {
        Command::Run(cmd) => run_command(cmd).await,
        Command::Score(cmd) => score_command(cmd).await,
        Command::Benchmark(cmd) => benchmark_command(cmd).await,
    }
}

fn init_logging(verbose: bool, debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::new("warn")
    };

    fmt().with_env_filter(filter).init();
}

fn parse_session(bias: &str, zone: &str) -> Result<(BiasLevel, MarketZone)> {
    let level = bias.parse::<BiasLevel>().map_err(anyhow::Error::msg)?;
    let zone = zone.parse::<MarketZone>().map_err(anyhow::Error::msg)?;
    Ok((level, zone))
}

fn build_engine(
    config: &Config,
    bias: Arc<dyn BiasProvider>,
    prices: Arc<dyn PriceHistoryPort>,
    bias_days: Arc<dyn DailyBiasPort>,
    sink: Arc<dyn OutputSink>,
) -> Result<SignalEngine> {
    SignalEngine::new(
        config.into(),
        config.into(),
        config.into(),
        config.profile_selector(),
        config.into(),
        bias,
        prices,
        bias_days,
        sink,
    )
    .context("Failed to build signal engine")
}

async fn run_command(cmd: RunCmd) -> Result<()> {
    let config = load_config(config_path(&cmd.config)).context("Failed to load configuration")?;
    let (level, zone) = parse_session(&cmd.bias, &cmd.zone)?;

    let sink = Arc::new(ConsoleSink::new());
    let engine = build_engine(
        &config,
        Arc::new(SessionBiasProvider::new(level, zone)),
        Arc::new(NoHistory),
        Arc::new(NoHistory),
        Arc::clone(&sink) as Arc<dyn OutputSink>,
    )?;

    let batch = read_events(&cmd.feed).context("Failed to read event feed")?;
    for (label, rejection) in &batch.rejected {
        tracing::warn!(%label, %rejection, "feed line dropped");
    }

    let ranked = engine.rank_feed(&batch.events).await;
    println!(
        "{} ideas from {} events ({} rejected)",
        ranked.ideas.len(),
        batch.events.len() + batch.rejected.len(),
        ranked.rejections.len() + batch.rejected.len()
    );
    sink.publish_ideas(&ranked.ideas)
        .await
        .context("Failed to publish ideas")?;

    for (ticker, rejection) in &ranked.rejections {
        println!("  dropped {}: {}", ticker, rejection);
    }
    Ok(())
}

async fn score_command(cmd: ScoreCmd) -> Result<()> {
    let config = load_config(config_path(&cmd.config)).context("Failed to load configuration")?;
    let (level, zone) = parse_session(&cmd.bias, &cmd.zone)?;

    let engine = build_engine(
        &config,
        Arc::new(SessionBiasProvider::new(level, zone)),
        Arc::new(NoHistory),
        Arc::new(NoHistory),
        Arc::new(ConsoleSink::new()),
    )?;

    let content = std::fs::read_to_string(&cmd.event).context("Failed to read event file")?;
    let event: domain::RawEvent = serde_json::from_str(&content).context("Failed to parse event")?;

    let bias = BiasContext::new(level, level.aligns_with(event.direction));
    match engine.evaluate(&event, &bias, zone).await {
        Ok(idea) => {
            println!(
                "{} {} {} score={} tier={} profile=(x{}, x{})",
                idea.ticker,
                idea.direction,
                idea.category,
                idea.score,
                idea.tier,
                idea.profile.stop_multiplier,
                idea.profile.target_multiplier
            );
        }
        Err(rejection) => println!("{}", rejection),
    }
    Ok(())
}

async fn benchmark_command(cmd: BenchmarkCmd) -> Result<()> {
    let config = load_config(config_path(&cmd.config)).context("Failed to load configuration")?;

    let mut sink = ConsoleSink::new();
    if let Some(archive) = cmd.archive {
        sink = sink.with_benchmark_archive(archive);
    }
    let engine = build_engine(
        &config,
        Arc::new(SessionBiasProvider::new(
            BiasLevel::Neutral,
            MarketZone::Chop,
        )),
        Arc::new(JsonlPriceHistory::new(cmd.prices)),
        Arc::new(JsonlDailyBias::new(cmd.signs)),
        Arc::new(sink),
    )?;

    match engine.run_benchmark().await? {
        Some(series) => {
            println!(
                "{}: buy-hold {:+.4}  bias-follow {:+.4}  risk-free {:+.4}  ({} days)",
                series.reference_ticker,
                series.buy_hold_return,
                series.bias_follow_return,
                series.risk_free_return,
                series.elapsed_days
            );
        }
        None => println!("benchmark run skipped: another run is in flight"),
    }
    Ok(())
}
