//! # JSON Output Module
//!
//! Questo modulo gestisce l'output strutturato in JSON per uso programmatico.
//!
//! ## Responsabilità:
//! - Emette un oggetto JSON per riga su stdout, taggato dal campo `type`
//! - Distingue il tipo di errore per file (`decode`, `encode`, `size_query`, `delete`)
//!
//! ## Tipi di messaggi:
//! - `start`: Inizio della run (directory, formato, qualità, file pianificati)
//! - `planned`: File che verrebbe convertito (solo dry run)
//! - `file_complete`: Fine elaborazione di un file
//! - `complete`: Fine della run con statistiche finali
//! - `error`: Errore che ha impedito la run

use crate::config::Config;
use crate::file_manager::{ConversionCandidate, FileManager};
use crate::optimizer::task_optimizer::ConversionOutcome;
use crate::progress::OptimizationStats;
use serde::Serialize;
use std::path::PathBuf;

/// Tipo di messaggio JSON
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JsonMessage {
    /// Inizio della run
    Start {
        root: PathBuf,
        target_format: String,
        quality: u8,
        skip_existing: bool,
        dry_run: bool,
        total_files: usize,
    },

    /// File pianificato (dry run)
    Planned { path: PathBuf, target: PathBuf },

    /// Fine elaborazione di un file specifico
    FileComplete {
        path: PathBuf,
        target: PathBuf,
        status: FileStatus,
        original_size: Option<u64>,
        new_size: Option<u64>,
        bytes_saved: Option<i64>,
        reduction_percent: Option<f64>,
        error_kind: Option<String>,
        error: Option<String>,
    },

    /// Run completata
    Complete {
        #[serde(flatten)]
        stats: OptimizationStats,
        duration_seconds: f64,
    },

    /// Errore generale
    Error { message: String },
}

/// Esito di un file nel messaggio `file_complete`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Converted,
    Skipped,
    Failed,
}

impl JsonMessage {
    /// Emette il messaggio JSON su stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    /// Crea un messaggio di inizio
    pub fn start(root: PathBuf, config: &Config, total_files: usize) -> Self {
        Self::Start {
            root,
            target_format: config.target_format.name().to_string(),
            quality: config.quality,
            skip_existing: config.skip_existing,
            dry_run: config.dry_run,
            total_files,
        }
    }

    /// Crea un messaggio per un file pianificato
    pub fn planned(candidate: &ConversionCandidate) -> Self {
        Self::Planned {
            path: candidate.source.clone(),
            target: candidate.target.clone(),
        }
    }

    /// Crea un messaggio di completamento file
    pub fn file_complete(candidate: &ConversionCandidate, outcome: &ConversionOutcome) -> Self {
        let path = candidate.source.clone();
        let target = candidate.target.clone();

        match outcome {
            ConversionOutcome::Converted {
                original_size,
                new_size,
            } => Self::FileComplete {
                path,
                target,
                status: FileStatus::Converted,
                original_size: Some(*original_size),
                new_size: Some(*new_size),
                bytes_saved: Some(outcome.space_diff()),
                reduction_percent: FileManager::calculate_reduction(*original_size, *new_size),
                error_kind: None,
                error: None,
            },
            ConversionOutcome::Skipped(reason) => Self::FileComplete {
                path,
                target,
                status: FileStatus::Skipped,
                original_size: None,
                new_size: None,
                bytes_saved: None,
                reduction_percent: None,
                error_kind: None,
                error: Some(reason.description().to_string()),
            },
            ConversionOutcome::Failed(e) => Self::FileComplete {
                path,
                target,
                status: FileStatus::Failed,
                original_size: None,
                new_size: None,
                bytes_saved: None,
                reduction_percent: None,
                error_kind: Some(e.kind().to_string()),
                error: Some(e.to_string()),
            },
        }
    }

    /// Crea un messaggio di completamento generale
    pub fn complete(stats: &OptimizationStats, duration_seconds: f64) -> Self {
        Self::Complete {
            stats: stats.clone(),
            duration_seconds,
        }
    }

    /// Crea un messaggio di errore
    pub fn error(message: String) -> Self {
        Self::Error { message }
    }
}
