//! # Progress Tracking Module
//!
//! Unifica progress bar e report per-file in un singolo tracker.
//! Gestisce sia output JSON che output testuale tradizionale.

use crate::{
    file_manager::{ConversionCandidate, FileManager},
    json_output::JsonMessage,
    optimizer::task_optimizer::ConversionOutcome,
    progress::ProgressManager,
};
use tracing::{debug, warn};

/// Tracker progress unificato: progress bar + righe per-file
pub struct ProgressTracker {
    pub total_files: usize,
    json_output: bool,
    progress_manager: ProgressManager,
}

impl ProgressTracker {
    /// Crea un nuovo tracker; in modalità JSON la progress bar non viene disegnata
    pub fn new(total_files: usize, json_output: bool) -> Self {
        let progress_manager = if json_output {
            ProgressManager::hidden()
        } else {
            ProgressManager::new(total_files as u64)
        };

        Self {
            total_files,
            json_output,
            progress_manager,
        }
    }

    /// Tracker senza progress bar: solo righe di report (dry run)
    pub fn without_bar(json_output: bool) -> Self {
        Self {
            total_files: 0,
            json_output,
            progress_manager: ProgressManager::hidden(),
        }
    }

    /// Tracker silenzioso, per i test
    pub fn hidden(total_files: usize) -> Self {
        Self {
            total_files,
            json_output: false,
            progress_manager: ProgressManager::hidden(),
        }
    }

    /// Segnala l'inizio di un file
    pub fn start_file(&self, candidate: &ConversionCandidate) {
        self.progress_manager.set_message(&candidate.file_name());
    }

    /// Riga per un file che verrebbe convertito (dry run)
    pub fn report_planned(&self, candidate: &ConversionCandidate) {
        if self.json_output {
            JsonMessage::planned(candidate).emit();
        } else {
            self.progress_manager.println(&format!(
                "📝 Would convert: {} -> {}",
                candidate.source.display(),
                candidate.target_name()
            ));
        }
    }

    /// Gestisce completamento file con report testuale o JSON
    pub fn handle_file_completion(&self, candidate: &ConversionCandidate, outcome: &ConversionOutcome) {
        self.progress_manager.inc();

        if self.json_output {
            JsonMessage::file_complete(candidate, outcome).emit();
            return;
        }

        for line in Self::format_outcome(candidate, outcome) {
            self.progress_manager.println(&line);
        }

        if let ConversionOutcome::Failed(e) = outcome {
            if e.is_delete_failure() {
                warn!(
                    "Both {} and {} are now on disk",
                    candidate.file_name(),
                    candidate.target_name()
                );
            }
            debug!("Failure detail for {}: {:?}", candidate.source.display(), e);
        }
    }

    /// Righe di output testuale per un file
    pub fn format_outcome(candidate: &ConversionCandidate, outcome: &ConversionOutcome) -> Vec<String> {
        match outcome {
            ConversionOutcome::Converted {
                original_size,
                new_size,
            } => vec![
                format!(
                    "✅ Converted: {} -> {}",
                    candidate.file_name(),
                    candidate.target_name()
                ),
                format!(
                    "   Saved: {} ({})",
                    FileManager::format_size(outcome.space_diff()),
                    FileManager::format_reduction(FileManager::calculate_reduction(*original_size, *new_size))
                ),
            ],
            ConversionOutcome::Skipped(reason) => vec![format!(
                "⏩ Skipped: {} ({})",
                candidate.file_name(),
                reason.description()
            )],
            ConversionOutcome::Failed(e) => vec![format!(
                "❌ Error processing {}: {}",
                candidate.file_name(),
                e
            )],
        }
    }

    /// Finalizza progress bar
    pub fn finish(&self) {
        self.progress_manager.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OptimizeError;
    use crate::optimizer::task_optimizer::SkipReason;
    use std::path::PathBuf;

    fn candidate() -> ConversionCandidate {
        ConversionCandidate {
            source: PathBuf::from("/media/photo.jpg"),
            target: PathBuf::from("/media/photo.webp"),
        }
    }

    #[test]
    fn test_format_converted() {
        let outcome = ConversionOutcome::Converted {
            original_size: 4096,
            new_size: 2560,
        };
        let lines = ProgressTracker::format_outcome(&candidate(), &outcome);
        assert_eq!(lines[0], "✅ Converted: photo.jpg -> photo.webp");
        assert_eq!(lines[1], "   Saved: 1.50KB (37.5%)");
    }

    #[test]
    fn test_format_converted_grew_and_zero_original() {
        let outcome = ConversionOutcome::Converted {
            original_size: 0,
            new_size: 1536,
        };
        let lines = ProgressTracker::format_outcome(&candidate(), &outcome);
        assert_eq!(lines[1], "   Saved: -1.50KB (N/A)");
    }

    #[test]
    fn test_format_failed_and_skipped() {
        let failed = ConversionOutcome::Failed(OptimizeError::Delete {
            path: PathBuf::from("/media/photo.jpg"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        });
        let lines = ProgressTracker::format_outcome(&candidate(), &failed);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("❌ Error processing photo.jpg: converted but could not delete original"));

        let skipped = ConversionOutcome::Skipped(SkipReason::TargetExists);
        let lines = ProgressTracker::format_outcome(&candidate(), &skipped);
        assert_eq!(lines, vec!["⏩ Skipped: photo.jpg (target already exists)".to_string()]);
    }
}
