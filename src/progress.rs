//! # Progress Tracking and Statistics Module
//!
//! Questo modulo gestisce il progress tracking e le statistiche di conversione.
//!
//! ## Responsabilità:
//! - Progress bar visual con `indicatif` per feedback real-time
//! - Stampa delle righe per-file senza rompere la progress bar
//! - Accumulo delle statistiche della run (convertiti, saltati, errori, byte risparmiati)
//! - Riepilogo finale
//!
//! ## Componenti principali:
//! - `ProgressManager`: Gestisce la progress bar principale
//! - `OptimizationStats`: Accumulatore delle statistiche, passato per valore
//!   lungo la run (nessuno stato globale)
//!
//! ## Statistiche tracciate:
//! - **files_converted**: File convertiti con successo (originale rimosso)
//! - **files_skipped**: File saltati perché il target esisteva già
//! - **bytes_saved**: Byte totali risparmiati, negativo se i file sono cresciuti
//! - **errors**: Numero di file falliti
//!
//! ## Visual feedback:
//! ```text
//! ⠋ [00:00:12] [========================>---------------] 42/70 (60%) photo.jpg
//! ```

use crate::file_manager::FileManager;
use crate::optimizer::task_optimizer::ConversionOutcome;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::time::Duration;

/// Manages progress reporting for a conversion run
#[derive(Clone)]
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(total_files: u64) -> Self {
        let bar = ProgressBar::new(total_files);

        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Progress manager that never draws anything (JSON mode, tests)
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Show which file is being worked on
    pub fn set_message(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    /// Advance by one file
    pub fn inc(&self) {
        self.bar.inc(1);
    }

    /// Print a line above the bar; works when the bar is hidden too
    pub fn println(&self, line: &str) {
        self.bar.suspend(|| println!("{}", line));
    }

    /// Remove the bar from the terminal
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

/// Statistics tracker for conversion results
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct OptimizationStats {
    pub files_converted: usize,
    pub files_skipped: usize,
    pub bytes_saved: i64,
    pub errors: usize,
}

impl OptimizationStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one file outcome into the totals
    pub fn record(&mut self, outcome: &ConversionOutcome) {
        match outcome {
            ConversionOutcome::Converted { .. } => {
                self.files_converted += 1;
                self.bytes_saved += outcome.space_diff();
            }
            ConversionOutcome::Skipped(_) => self.files_skipped += 1,
            ConversionOutcome::Failed(_) => self.errors += 1,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Converted: {} | Skipped: {} | Errors: {} | Total saved: {}",
            self.files_converted,
            self.files_skipped,
            self.errors,
            FileManager::format_size(self.bytes_saved)
        )
    }
}

impl<'a> FromIterator<&'a ConversionOutcome> for OptimizationStats {
    fn from_iter<I: IntoIterator<Item = &'a ConversionOutcome>>(outcomes: I) -> Self {
        let mut stats = Self::new();
        for outcome in outcomes {
            stats.record(outcome);
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OptimizeError;
    use crate::optimizer::task_optimizer::SkipReason;
    use std::path::PathBuf;

    fn failed() -> ConversionOutcome {
        ConversionOutcome::Failed(OptimizeError::SizeQuery {
            path: PathBuf::from("x.jpg"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        })
    }

    #[test]
    fn test_stats_accumulate_signed_savings() {
        let outcomes = vec![
            ConversionOutcome::Converted {
                original_size: 500_000,
                new_size: 100_000,
            },
            ConversionOutcome::Converted {
                original_size: 1_000,
                new_size: 3_000,
            },
            ConversionOutcome::Skipped(SkipReason::TargetExists),
            failed(),
        ];

        let stats: OptimizationStats = outcomes.iter().collect();

        assert_eq!(stats.files_converted, 2);
        assert_eq!(stats.files_skipped, 1);
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.bytes_saved, 400_000 - 2_000);
        assert!(stats.has_errors());
    }

    #[test]
    fn test_stats_can_go_negative() {
        let mut stats = OptimizationStats::new();
        stats.record(&ConversionOutcome::Converted {
            original_size: 0,
            new_size: 1536,
        });

        assert_eq!(stats.bytes_saved, -1536);
        assert!(!stats.has_errors());
        assert!(stats.format_summary().contains("Total saved: -1.50KB"));
    }

    #[test]
    fn test_empty_stats() {
        let stats = OptimizationStats::new();
        assert_eq!(stats, OptimizationStats::default());
        assert_eq!(
            stats.format_summary(),
            "Converted: 0 | Skipped: 0 | Errors: 0 | Total saved: 0.00B"
        );
    }

    #[test]
    fn test_hidden_progress_manager_is_silent_noop() {
        let progress = ProgressManager::hidden();
        progress.set_message("photo.jpg");
        progress.inc();
        progress.finish();
    }
}
