//! Run reporting types.
//!
//! These exist only for the duration of one pipeline invocation; nothing
//! here is persisted. `RunReport` is serializable so the CLI can emit it
//! verbatim under `--json`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which players the selector fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionMode {
    /// Every player, unconditionally.
    All,
    /// Only players with no `player_embeddings` row (left anti-join).
    OnlyMissing,
}

/// One failed item, reduced to what the end-of-run report needs.
///
/// The originating error is swallowed after its message is extracted;
/// sibling items in the same batch are unaffected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemFailure {
    pub player_id: Uuid,
    pub display_name: String,
    pub message: String,
}

/// Enrichment coverage, queried fresh from the store after a real run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Coverage {
    pub embedded: u64,
    pub total: u64,
}

impl Coverage {
    /// Fraction of players with an embedding row, in `[0, 1]`.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.embedded as f64 / self.total as f64
        }
    }
}

/// Summary of one pipeline invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Number of batches issued: `ceil(processed / batch_size)`.
    pub batches: usize,
    pub dry_run: bool,
    pub failures: Vec<ItemFailure>,
    /// Populated on non-dry runs only.
    pub coverage: Option<Coverage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coverage_ratio() {
        let cov = Coverage {
            embedded: 20,
            total: 23,
        };
        assert!((cov.ratio() - 20.0 / 23.0).abs() < 1e-9);
    }

    #[test]
    fn test_coverage_ratio_empty_store() {
        let cov = Coverage {
            embedded: 0,
            total: 0,
        };
        assert_eq!(cov.ratio(), 0.0);
    }

    #[test]
    fn test_selection_mode_serde() {
        let json = serde_json::to_string(&SelectionMode::OnlyMissing).unwrap();
        assert_eq!(json, "\"only-missing\"");
    }

    #[test]
    fn test_run_report_serialize() {
        let report = RunReport {
            processed: 23,
            succeeded: 20,
            failed: 3,
            batches: 3,
            dry_run: false,
            failures: vec![ItemFailure {
                player_id: Uuid::now_v7(),
                display_name: "Sam Okafor".to_string(),
                message: "embedding API error: timeout".to_string(),
            }],
            coverage: Some(Coverage {
                embedded: 20,
                total: 23,
            }),
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"processed\":23"));
        assert!(json.contains("\"failed\":3"));
    }
}
