//! # Task Optimizer Module
//!
//! Worker per la conversione di singoli file.
//! Separato dal orchestratore principale per maggiore modularità: ogni file
//! produce esattamente un `ConversionOutcome`, senza toccare contatori globali.

use crate::{
    config::Config,
    error::OptimizeError,
    file_manager::{ConversionCandidate, FileManager},
    image_processor::ImageProcessor,
};
use tracing::debug;

/// Motivo per cui un file pianificato non è stato convertito
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Il target esiste già e la configurazione chiede di non sovrascriverlo
    TargetExists,
}

impl SkipReason {
    pub fn description(&self) -> &'static str {
        match self {
            Self::TargetExists => "target already exists",
        }
    }
}

/// Risultato della conversione di un singolo file
#[derive(Debug)]
pub enum ConversionOutcome {
    Converted { original_size: u64, new_size: u64 },
    Skipped(SkipReason),
    Failed(OptimizeError),
}

impl ConversionOutcome {
    /// Byte risparmiati (negativi se il file è cresciuto), zero se non convertito
    pub fn space_diff(&self) -> i64 {
        match self {
            Self::Converted { original_size, new_size } => *original_size as i64 - *new_size as i64,
            _ => 0,
        }
    }
}

/// Worker per elaborazione singoli file
pub struct TaskOptimizer {
    pub config: Config,
    pub image_processor: ImageProcessor,
}

impl TaskOptimizer {
    /// Crea nuovo task optimizer
    pub fn new(config: Config) -> Self {
        let image_processor = ImageProcessor::new(config.clone());

        Self {
            config,
            image_processor,
        }
    }

    /// Processa un singolo file: ogni errore resta confinato a questo file
    pub async fn process_single_file(&self, candidate: &ConversionCandidate) -> ConversionOutcome {
        if self.should_skip_file(candidate) {
            debug!(
                "[SKIP] Target already exists: {} -> {}",
                candidate.source.display(),
                candidate.target.display()
            );
            return ConversionOutcome::Skipped(SkipReason::TargetExists);
        }

        match self.convert(candidate).await {
            Ok((original_size, new_size)) => ConversionOutcome::Converted {
                original_size,
                new_size,
            },
            Err(e) => ConversionOutcome::Failed(e),
        }
    }

    /// Controlla se un file deve essere skippato
    fn should_skip_file(&self, candidate: &ConversionCandidate) -> bool {
        self.config.skip_existing && !candidate.is_in_place() && candidate.target.exists()
    }

    /// size → decode/encode → size → delete. Nessun rollback in caso di errore.
    async fn convert(&self, candidate: &ConversionCandidate) -> Result<(u64, u64), OptimizeError> {
        let original_size = FileManager::file_size(&candidate.source).await?;

        self.image_processor
            .convert(&candidate.source, &candidate.target)
            .await?;

        let new_size = FileManager::file_size(&candidate.target).await?;

        // Mai cancellare il file appena scritto
        if !candidate.is_in_place() {
            FileManager::remove_original(&candidate.source).await?;
        }

        debug!(
            "Converted {} ({} bytes) -> {} ({} bytes)",
            candidate.source.display(),
            original_size,
            candidate.target.display(),
            new_size
        );

        Ok((original_size, new_size))
    }
}
