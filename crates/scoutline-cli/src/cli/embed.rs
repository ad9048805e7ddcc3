//! Enrichment run command.
//!
//! Resolves the API credential and model configuration, wires the pipeline
//! from its SQLite and HTTP implementations, runs one pass, and renders
//! the end-of-run report. A missing `OPENAI_API_KEY` is fatal before any
//! batch work starts, including dry runs; per-item failures only lower the
//! success count, never the exit code.

use std::time::Duration;

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use secrecy::SecretString;

use scoutline_core::pipeline::{EnrichmentPipeline, RunOptions};
use scoutline_infra::embed::openai::{OpenAiEmbedder, DEFAULT_MODEL};
use scoutline_infra::sqlite::embedding::SqliteEmbeddingRepository;
use scoutline_infra::sqlite::player::SqlitePlayerRepository;
use scoutline_types::report::{RunReport, SelectionMode};

use crate::state::AppState;

/// Run one enrichment pass over the player store.
pub async fn embed(
    state: &AppState,
    only_missing: bool,
    batch_size: u32,
    batch_delay: u64,
    dry_run: bool,
    json: bool,
    quiet: bool,
) -> Result<()> {
    // Credential check comes first so a misconfigured environment fails
    // fast instead of after a partial run.
    let api_key = std::env::var("OPENAI_API_KEY")
        .map(SecretString::from)
        .map_err(|_| {
            anyhow::anyhow!("OPENAI_API_KEY is not set; export it before running `scout embed`")
        })?;

    let model =
        std::env::var("SCOUTLINE_EMBED_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

    let mut embedder = OpenAiEmbedder::new(api_key, model.clone());
    if let Ok(base_url) = std::env::var("SCOUTLINE_EMBED_BASE_URL") {
        embedder = embedder.with_base_url(base_url);
    }

    let pipeline = EnrichmentPipeline::new(
        SqlitePlayerRepository::new(state.db_pool.clone()),
        embedder,
        SqliteEmbeddingRepository::new(state.db_pool.clone(), model),
    );

    let options = RunOptions {
        mode: if only_missing {
            SelectionMode::OnlyMissing
        } else {
            SelectionMode::All
        },
        batch_size: batch_size as usize,
        batch_delay: Duration::from_millis(batch_delay),
        dry_run,
    };

    let spinner = if json || quiet {
        None
    } else {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        spinner.set_message(if dry_run {
            "Dry run: normalizing profiles..."
        } else {
            "Embedding player profiles..."
        });
        spinner.enable_steady_tick(Duration::from_millis(80));
        Some(spinner)
    };

    let report = pipeline.run(&options).await;

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let report = report?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    if quiet {
        return Ok(());
    }

    render_report(&report);
    Ok(())
}

fn render_report(report: &RunReport) {
    println!();

    if report.processed == 0 {
        println!("  {} No players to process.", style("•").dim());
    } else if report.failed == 0 {
        println!(
            "  {} Processed {} player{} in {} batch{}",
            style("✓").green().bold(),
            style(report.processed).bold(),
            plural(report.processed),
            report.batches,
            if report.batches == 1 { "" } else { "es" },
        );
    } else {
        println!(
            "  {} Processed {} player{}: {} succeeded, {} failed",
            style("!").yellow().bold(),
            style(report.processed).bold(),
            plural(report.processed),
            style(report.succeeded).green(),
            style(report.failed).red(),
        );
        println!();
        for failure in &report.failures {
            println!(
                "    {} {}: {}",
                style("✗").red(),
                style(&failure.display_name).cyan(),
                failure.message
            );
        }
    }

    if report.dry_run {
        println!();
        println!(
            "  {}",
            style("Dry run: nothing was embedded or written.").dim()
        );
    }

    if let Some(coverage) = report.coverage {
        println!();
        println!(
            "  Coverage: {} of {} players embedded ({:.0}%)",
            style(coverage.embedded).bold(),
            coverage.total,
            coverage.ratio() * 100.0
        );
    }

    println!();
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}
