// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Appends one CSV row per training epoch to
// `<model_dir>/metrics.csv`:
//
//   epoch,train_loss,perplexity
//   1,5.412300,224.170000
//   2,4.981100,145.660000
//
// train_loss is the mean per-token negative log-likelihood, so
// perplexity = exp(train_loss). Rows from earlier runs are kept.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

const HEADER: &str = "epoch,train_loss,perplexity";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// Starts at 1
    pub epoch:      usize,
    /// Mean per-token loss over all batches of the epoch
    pub train_loss: f64,
    pub perplexity: f64,
}

impl EpochMetrics {
    pub fn new(epoch: usize, train_loss: f64) -> Self {
        Self { epoch, train_loss, perplexity: train_loss.exp() }
    }
}

pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Creates `dir` and writes the header if the file is new.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create '{}'", dir.display()))?;

        let csv_path = dir.join("metrics.csv");
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)
                .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
            writeln!(f, "{HEADER}")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        writeln!(f, "{},{:.6},{:.6}", m.epoch, m.train_loss, m.perplexity)?;

        tracing::debug!(
            "Logged epoch {} metrics: train_loss={:.4}, perplexity={:.2}",
            m.epoch,
            m.train_loss,
            m.perplexity,
        );
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perplexity_is_exp_of_loss() {
        let m = EpochMetrics::new(1, 2.0f64.ln());
        assert!((m.perplexity - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_rows_are_appended_across_loggers() {
        let dir = tempfile::tempdir().unwrap();

        let logger = MetricsLogger::new(dir.path().join("decoder")).unwrap();
        logger.log(&EpochMetrics::new(1, 0.0)).unwrap();

        // A second run must not rewrite the header.
        let logger = MetricsLogger::new(dir.path().join("decoder")).unwrap();
        logger.log(&EpochMetrics::new(2, 0.0)).unwrap();

        let text = fs::read_to_string(logger.csv_path()).unwrap();
        assert_eq!(
            text,
            "epoch,train_loss,perplexity\n1,0.000000,1.000000\n2,0.000000,1.000000\n"
        );
    }
}
