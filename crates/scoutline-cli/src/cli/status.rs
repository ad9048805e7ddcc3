//! Enrichment status dashboard command.

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use scoutline_core::repository::{EmbeddingRepository, PlayerRepository};
use scoutline_infra::embed::openai::DEFAULT_MODEL;
use scoutline_infra::sqlite::embedding::SqliteEmbeddingRepository;
use scoutline_infra::sqlite::player::SqlitePlayerRepository;
use scoutline_types::report::Coverage;

use crate::state::AppState;

/// Display enrichment coverage and database info.
pub async fn status(state: &AppState, json: bool) -> Result<()> {
    let model =
        std::env::var("SCOUTLINE_EMBED_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

    let players = SqlitePlayerRepository::new(state.db_pool.clone());
    let embeddings = SqliteEmbeddingRepository::new(state.db_pool.clone(), model.clone());

    let total = players.count().await?;
    let embedded = EmbeddingRepository::count(&embeddings).await?;
    let coverage = Coverage { embedded, total };

    if json {
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": state.data_dir.display().to_string(),
            "model": model,
            "players": total,
            "embedded": embedded,
            "coverage": coverage.ratio(),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Scoutline v{}",
        style("⚡").bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!();

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Metric").fg(Color::White),
        Cell::new("Value").fg(Color::White),
    ]);

    table.add_row(vec![
        Cell::new("Players"),
        Cell::new(total.to_string()),
    ]);
    table.add_row(vec![
        Cell::new("Embedded"),
        Cell::new(embedded.to_string()).fg(if embedded == total && total > 0 {
            Color::Green
        } else {
            Color::Yellow
        }),
    ]);
    table.add_row(vec![
        Cell::new("Coverage"),
        Cell::new(format!("{:.0}%", coverage.ratio() * 100.0)),
    ]);
    table.add_row(vec![Cell::new("Model"), Cell::new(&model)]);

    println!("{table}");
    println!();
    println!(
        "  Data dir: {}",
        style(state.data_dir.display()).dim()
    );
    println!(
        "  Database: {}",
        style("SQLite (WAL mode)").dim()
    );
    println!();

    Ok(())
}
