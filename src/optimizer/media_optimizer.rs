//! # Main Optimizer Orchestrator Module
//!
//! Questo è il modulo principale che orchestra tutto il processo di conversione.
//!
//! ## Responsabilità:
//! - Coordinamento di tutti gli altri moduli
//! - Orchestrazione del flusso: discovery → conversione → statistiche
//! - Report iniziale e finale (testuale o JSON)
//!
//! ## API a due fasi:
//! 1. **`plan(root)`**: Walk della directory, filtro per estensione, calcolo dei
//!    target. Sola lettura: non modifica mai il filesystem
//! 2. **`execute(plan)`**: Converte i file pianificati uno alla volta e ritorna
//!    le statistiche accumulate
//!
//! La conferma interattiva non vive qui: è responsabilità del chiamante (CLI)
//! decidere se passare dal piano all'esecuzione.
//!
//! ## Processing pipeline per file:
//! 1. Skip se il target esiste e `skip_existing` è attivo
//! 2. Dimensione originale
//! 3. Decode + encode nel formato di destinazione
//! 4. Dimensione nuova
//! 5. Cancellazione dell'originale (mai se sorgente == target)
//!
//! ## Error handling:
//! - Errori per singoli file non bloccano l'operazione
//! - Ogni file viene tentato una sola volta, nessun retry
//! - Solo una directory radice illeggibile interrompe la run, prima di toccare file

use crate::{
    config::Config,
    error::OptimizeError,
    file_manager::{ConversionCandidate, FileManager},
    json_output::JsonMessage,
    optimizer::{path_resolver::PathResolver, progress_tracker::ProgressTracker, task_optimizer::TaskOptimizer},
    progress::OptimizationStats,
};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

const SEPARATOR_WIDTH: usize = 50;

/// Elenco dei file da convertire, prodotto da [`MediaOptimizer::plan`]
#[derive(Debug, Clone, Default)]
pub struct ConversionPlan {
    pub root: PathBuf,
    pub candidates: Vec<ConversionCandidate>,
}

impl ConversionPlan {
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConversionCandidate> {
        self.candidates.iter()
    }
}

/// Orchestratore principale
pub struct MediaOptimizer {
    config: Config,
    task_optimizer: TaskOptimizer,
}

impl MediaOptimizer {
    /// Crea nuova istanza dell'ottimizzatore
    pub fn new(config: Config) -> Result<Self, OptimizeError> {
        config.validate()?;
        let task_optimizer = TaskOptimizer::new(config.clone());

        Ok(Self {
            config,
            task_optimizer,
        })
    }

    /// Fase 1: trova le immagini convertibili e calcola i target. Sola lettura.
    pub fn plan(&self, root: &Path) -> Result<ConversionPlan, OptimizeError> {
        let files = FileManager::find_image_files(root, &self.config)?;

        let candidates = files
            .iter()
            .filter_map(|file| {
                let candidate = PathResolver::candidate(file, self.config.target_format);
                if candidate.is_none() {
                    warn!("Cannot compute target path for {}", file.display());
                }
                candidate
            })
            .collect();

        Ok(ConversionPlan {
            root: root.to_path_buf(),
            candidates,
        })
    }

    /// Fase 2: converte i file pianificati, uno alla volta
    pub async fn execute(&self, plan: &ConversionPlan, tracker: &ProgressTracker) -> OptimizationStats {
        let mut stats = OptimizationStats::new();

        for candidate in plan.iter() {
            tracker.start_file(candidate);
            let outcome = self.task_optimizer.process_single_file(candidate).await;
            tracker.handle_file_completion(candidate, &outcome);
            stats.record(&outcome);
        }

        stats
    }

    /// Esegue l'intera run: banner, piano, conversione (o dry run), statistiche finali
    pub async fn run(&self, root: &Path) -> Result<OptimizationStats, OptimizeError> {
        let start_time = Instant::now();

        if !self.config.json_output {
            self.print_banner(root);
        }

        let plan = self.plan(root)?;

        if self.config.json_output {
            JsonMessage::start(root.to_path_buf(), &self.config, plan.len()).emit();
        }
        info!("Found {} images to convert", plan.len());

        if self.config.dry_run {
            self.report_dry_run(&plan);
            return Ok(OptimizationStats::new());
        }

        let tracker = ProgressTracker::new(plan.len(), self.config.json_output);
        let stats = self.execute(&plan, &tracker).await;
        tracker.finish();

        self.print_final_stats(&stats, start_time.elapsed().as_secs_f64());

        Ok(stats)
    }

    /// Stampa il banner iniziale
    fn print_banner(&self, root: &Path) {
        println!("🚀 Starting optimization in: {}", root.display());
        println!(
            "🎯 Target Format: {} | Quality: {}",
            self.config.target_format.name().to_uppercase(),
            self.config.quality
        );
        if self.config.skip_existing {
            println!("⏩ Skip mode: files whose target already exists are left alone");
        }
        if self.config.dry_run {
            println!("📝 Dry run mode: no files will be modified");
        }
        println!("{}", "-".repeat(SEPARATOR_WIDTH));
    }

    /// Elenca cosa verrebbe convertito senza toccare nulla
    fn report_dry_run(&self, plan: &ConversionPlan) {
        let tracker = ProgressTracker::without_bar(self.config.json_output);
        for candidate in plan.iter() {
            tracker.report_planned(candidate);
        }
        tracker.finish();

        if !self.config.json_output {
            println!("{}", "-".repeat(SEPARATOR_WIDTH));
            println!("📝 Dry run complete: {} images would be converted", plan.len());
        }
    }

    /// Stampa statistiche finali
    fn print_final_stats(&self, stats: &OptimizationStats, duration: f64) {
        if self.config.json_output {
            JsonMessage::complete(stats, duration).emit();
            return;
        }

        println!("{}", "-".repeat(SEPARATOR_WIDTH));
        println!("✨ Optimization Complete");
        println!("🖼️  Images Processed: {}", stats.files_converted);
        println!("💾 Total Space Saved: {}", FileManager::format_size(stats.bytes_saved));
        if stats.files_skipped > 0 {
            println!("⏩ Images Skipped: {}", stats.files_skipped);
        }
        println!("⚠️ Errors encountered: {}", stats.errors);
        info!("{} in {:.2}s", stats.format_summary(), duration);
    }
}
