//! Batch enrichment orchestrator.
//!
//! [`EnrichmentPipeline`] drives one run end to end: select the working
//! set, partition it into fixed-size batches, fan out each batch's items
//! concurrently, sleep between batches, and aggregate the outcomes into a
//! [`RunReport`].
//!
//! Failure semantics: selector errors abort the run; embed and upsert
//! errors are scoped to their item. Each item future resolves to
//! `Result<(), ItemFailure>` and the batch join is `join_all` -- settle
//! all, discard none -- so one item's failure cannot cancel its siblings.
//! Counters are bumped only in the sequential collection loop after the
//! join settles, never from inside the item futures.

use std::time::Duration;

use futures_util::future;
use tracing::{debug, info, warn};

use scoutline_types::error::RepositoryError;
use scoutline_types::player::PlayerProfile;
use scoutline_types::report::{Coverage, ItemFailure, RunReport, SelectionMode};

use crate::embedder::Embedder;
use crate::normalize;
use crate::repository::{EmbeddingRepository, PlayerRepository};

/// Knobs for one pipeline invocation.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub mode: SelectionMode,
    /// Items per batch; the CLI enforces a minimum of 1.
    pub batch_size: usize,
    /// Pause between batches, skipped after the final batch.
    pub batch_delay: Duration,
    /// Validate normalization only; no embed calls, no writes.
    pub dry_run: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            mode: SelectionMode::All,
            batch_size: 10,
            batch_delay: Duration::from_millis(1000),
            dry_run: false,
        }
    }
}

/// The batch enrichment pipeline, generic over its three seams.
pub struct EnrichmentPipeline<P, E, S> {
    players: P,
    embedder: E,
    sink: S,
}

impl<P, E, S> EnrichmentPipeline<P, E, S>
where
    P: PlayerRepository,
    E: Embedder,
    S: EmbeddingRepository,
{
    pub fn new(players: P, embedder: E, sink: S) -> Self {
        Self {
            players,
            embedder,
            sink,
        }
    }

    /// Run one enrichment pass and return the summary report.
    ///
    /// Returns `Err` only for fatal conditions (selector or coverage
    /// queries failing); per-item failures are carried in the report and
    /// never bubble out.
    pub async fn run(&self, options: &RunOptions) -> Result<RunReport, RepositoryError> {
        let working_set = match options.mode {
            SelectionMode::All => self.players.list_all().await?,
            SelectionMode::OnlyMissing => self.players.list_missing_embedding().await?,
        };

        let mut report = RunReport {
            dry_run: options.dry_run,
            ..RunReport::default()
        };

        if working_set.is_empty() {
            info!("no players to process");
            if !options.dry_run {
                report.coverage = Some(self.coverage().await?);
            }
            return Ok(report);
        }

        let batch_size = options.batch_size.max(1);
        let total_batches = working_set.len().div_ceil(batch_size);
        info!(
            players = working_set.len(),
            batches = total_batches,
            batch_size,
            dry_run = options.dry_run,
            "starting enrichment run"
        );

        for (index, batch) in working_set.chunks(batch_size).enumerate() {
            info!(
                batch = index + 1,
                total = total_batches,
                size = batch.len(),
                "processing batch"
            );

            // Settle-all join: every item resolves to its own Result, so
            // a failure here is data, not control flow.
            let outcomes = future::join_all(
                batch
                    .iter()
                    .map(|player| self.process_one(player, options.dry_run)),
            )
            .await;

            for outcome in outcomes {
                report.processed += 1;
                match outcome {
                    Ok(()) => report.succeeded += 1,
                    Err(failure) => {
                        warn!(
                            player = %failure.display_name,
                            error = %failure.message,
                            "item failed"
                        );
                        report.failed += 1;
                        report.failures.push(failure);
                    }
                }
            }

            if index + 1 < total_batches && !options.batch_delay.is_zero() {
                tokio::time::sleep(options.batch_delay).await;
            }
        }

        report.batches = total_batches;
        if !options.dry_run {
            report.coverage = Some(self.coverage().await?);
        }

        Ok(report)
    }

    /// Normalize, embed, and upsert a single player.
    ///
    /// Everything that can go wrong past normalization is converted into
    /// an [`ItemFailure`] here, at the item boundary.
    async fn process_one(
        &self,
        player: &PlayerProfile,
        dry_run: bool,
    ) -> Result<(), ItemFailure> {
        let text = normalize::profile_text(player);

        if dry_run {
            debug!(
                player = %player.display_name(),
                chars = text.len(),
                "dry run, would embed"
            );
            return Ok(());
        }

        let vector = self
            .embedder
            .embed(&text)
            .await
            .map_err(|e| item_failure(player, e.to_string()))?;

        self.sink
            .upsert(player.id, &vector, &text)
            .await
            .map_err(|e| item_failure(player, e.to_string()))?;

        info!(
            player = %player.display_name(),
            dimensions = vector.len(),
            "embedded profile"
        );
        Ok(())
    }

    /// Fresh enrichment coverage from the store.
    pub async fn coverage(&self) -> Result<Coverage, RepositoryError> {
        let embedded = self.sink.count().await?;
        let total = self.players.count().await?;
        Ok(Coverage { embedded, total })
    }

    /// Model name of the configured embedder, for status display.
    pub fn model_name(&self) -> &str {
        self.embedder.model_name()
    }
}

fn item_failure(player: &PlayerProfile, message: String) -> ItemFailure {
    ItemFailure {
        player_id: player.id,
        display_name: player.display_name(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    use chrono::Utc;
    use uuid::Uuid;

    use scoutline_types::error::EmbedError;

    fn player(first: &str) -> PlayerProfile {
        PlayerProfile {
            id: Uuid::now_v7(),
            first_name: first.to_string(),
            last_name: "Tester".to_string(),
            city: None,
            state: None,
            bio: None,
            school: None,
            graduation_year: None,
            gpa: None,
            game_profiles: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    struct FakePlayers {
        all: Vec<PlayerProfile>,
        missing: Vec<PlayerProfile>,
    }

    impl PlayerRepository for FakePlayers {
        async fn list_all(&self) -> Result<Vec<PlayerProfile>, RepositoryError> {
            Ok(self.all.clone())
        }

        async fn list_missing_embedding(&self) -> Result<Vec<PlayerProfile>, RepositoryError> {
            Ok(self.missing.clone())
        }

        async fn count(&self) -> Result<u64, RepositoryError> {
            Ok(self.all.len() as u64)
        }
    }

    /// Fails any text containing `fail_marker`, simulating a per-item
    /// network error.
    struct FakeEmbedder {
        fail_marker: Option<String>,
    }

    impl Embedder for FakeEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
            if let Some(marker) = &self.fail_marker {
                if text.contains(marker) {
                    return Err(EmbedError::Api("simulated network error".to_string()));
                }
            }
            Ok(vec![0.1, 0.2, 0.3, 0.4])
        }

        fn model_name(&self) -> &str {
            "fake-embed"
        }

        fn dimension(&self) -> usize {
            4
        }
    }

    #[derive(Default)]
    struct FakeSink {
        rows: Mutex<HashMap<Uuid, (Vec<f32>, String)>>,
        fail_ids: HashSet<Uuid>,
    }

    impl EmbeddingRepository for FakeSink {
        async fn upsert(
            &self,
            player_id: Uuid,
            vector: &[f32],
            source_text: &str,
        ) -> Result<(), RepositoryError> {
            if self.fail_ids.contains(&player_id) {
                return Err(RepositoryError::Query("disk full".to_string()));
            }
            self.rows
                .lock()
                .unwrap()
                .insert(player_id, (vector.to_vec(), source_text.to_string()));
            Ok(())
        }

        async fn count(&self) -> Result<u64, RepositoryError> {
            Ok(self.rows.lock().unwrap().len() as u64)
        }
    }

    fn no_delay(mode: SelectionMode) -> RunOptions {
        RunOptions {
            mode,
            batch_size: 10,
            batch_delay: Duration::ZERO,
            dry_run: false,
        }
    }

    #[tokio::test]
    async fn test_23_players_3_embed_failures() {
        // 23 players, 3 of which trip the embedder: expect 3 batches,
        // 20 succeeded, 3 failed, 20 rows written.
        let mut all: Vec<PlayerProfile> = (0..20).map(|i| player(&format!("Ok{i}"))).collect();
        let flaky: Vec<PlayerProfile> = (0..3).map(|i| player(&format!("Flaky{i}"))).collect();
        let flaky_ids: HashSet<Uuid> = flaky.iter().map(|p| p.id).collect();
        all.extend(flaky);

        let pipeline = EnrichmentPipeline::new(
            FakePlayers {
                all,
                missing: vec![],
            },
            FakeEmbedder {
                fail_marker: Some("Flaky".to_string()),
            },
            FakeSink::default(),
        );

        let report = pipeline.run(&no_delay(SelectionMode::All)).await.unwrap();

        assert_eq!(report.batches, 3);
        assert_eq!(report.processed, 23);
        assert_eq!(report.succeeded, 20);
        assert_eq!(report.failed, 3);
        assert_eq!(report.failures.len(), 3);
        for failure in &report.failures {
            assert!(flaky_ids.contains(&failure.player_id));
            assert!(!failure.message.is_empty());
        }

        let coverage = report.coverage.unwrap();
        assert_eq!(coverage.embedded, 20);
        assert_eq!(coverage.total, 23);
    }

    #[tokio::test]
    async fn test_one_failure_does_not_disturb_batch_siblings() {
        let mut all: Vec<PlayerProfile> = (0..4).map(|i| player(&format!("Ok{i}"))).collect();
        all.insert(2, player("Flaky"));

        let pipeline = EnrichmentPipeline::new(
            FakePlayers {
                all,
                missing: vec![],
            },
            FakeEmbedder {
                fail_marker: Some("Flaky".to_string()),
            },
            FakeSink::default(),
        );

        // Single batch: all five in flight together.
        let report = pipeline.run(&no_delay(SelectionMode::All)).await.unwrap();

        assert_eq!(report.batches, 1);
        assert_eq!(report.succeeded, 4);
        assert_eq!(report.failed, 1);
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let all: Vec<PlayerProfile> = (0..7).map(|i| player(&format!("P{i}"))).collect();
        let pipeline = EnrichmentPipeline::new(
            FakePlayers {
                all,
                missing: vec![],
            },
            FakeEmbedder {
                // Would fail every item if it were called.
                fail_marker: Some("P".to_string()),
            },
            FakeSink::default(),
        );

        let options = RunOptions {
            dry_run: true,
            ..no_delay(SelectionMode::All)
        };
        let report = pipeline.run(&options).await.unwrap();

        assert!(report.dry_run);
        assert_eq!(report.succeeded, 7);
        assert_eq!(report.failed, 0);
        assert!(report.coverage.is_none());
        assert_eq!(pipeline.sink.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_only_missing_with_nothing_missing_is_a_clean_noop() {
        let all: Vec<PlayerProfile> = (0..5).map(|i| player(&format!("P{i}"))).collect();
        let pipeline = EnrichmentPipeline::new(
            FakePlayers {
                all,
                missing: vec![],
            },
            FakeEmbedder { fail_marker: None },
            FakeSink::default(),
        );

        let report = pipeline
            .run(&no_delay(SelectionMode::OnlyMissing))
            .await
            .unwrap();

        assert_eq!(report.processed, 0);
        assert_eq!(report.batches, 0);
        assert_eq!(report.failed, 0);
    }

    #[tokio::test]
    async fn test_upsert_failure_is_an_item_failure() {
        let all: Vec<PlayerProfile> = (0..3).map(|i| player(&format!("P{i}"))).collect();
        let victim = all[1].id;
        let sink = FakeSink {
            fail_ids: HashSet::from([victim]),
            ..FakeSink::default()
        };

        let pipeline = EnrichmentPipeline::new(
            FakePlayers {
                all,
                missing: vec![],
            },
            FakeEmbedder { fail_marker: None },
            sink,
        );

        let report = pipeline.run(&no_delay(SelectionMode::All)).await.unwrap();

        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.failures[0].player_id, victim);
        assert!(report.failures[0].message.contains("disk full"));
    }

    #[tokio::test]
    async fn test_batch_partitioning_is_ceil_of_n_over_b() {
        for (n, b, expected) in [(10usize, 10usize, 1usize), (11, 10, 2), (1, 10, 1), (30, 10, 3)] {
            let all: Vec<PlayerProfile> = (0..n).map(|i| player(&format!("P{i}"))).collect();
            let pipeline = EnrichmentPipeline::new(
                FakePlayers {
                    all,
                    missing: vec![],
                },
                FakeEmbedder { fail_marker: None },
                FakeSink::default(),
            );

            let options = RunOptions {
                batch_size: b,
                ..no_delay(SelectionMode::All)
            };
            let report = pipeline.run(&options).await.unwrap();
            assert_eq!(report.batches, expected, "n={n} b={b}");
            assert_eq!(report.succeeded + report.failed, n);
        }
    }
}
