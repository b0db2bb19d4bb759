//! # Configuration Management Module
//!
//! Questo modulo gestisce tutta la configurazione dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce la struct `Config` con tutti i parametri di conversione
//! - Fornisce validazione dei parametri di input
//! - Fornisce valori di default sensati per tutti i parametri
//!
//! La configurazione arriva solo dalla command line: non esistono file di
//! configurazione. Senza argomenti si ottiene il comportamento storico
//! (WebP, qualità 80, sovrascrittura dei target esistenti).
//!
//! ## Parametri di configurazione:
//! - `target_format`: Formato di destinazione (default: WebP)
//! - `quality`: Qualità dell'encode lossy (0-100, default: 80)
//! - `skip_existing`: Salta i file il cui target esiste già (default: false = sovrascrive)
//! - `dry_run`: Mostra cosa verrebbe convertito senza toccare nulla (default: false)
//! - `json_output`: Output JSON line-based per uso programmatico (default: false)
//! - `exclude_dirs`: Nomi di directory da non attraversare (default: nessuna)
//!
//! ## Esempio:
//! ```rust,ignore
//! let config = Config {
//!     quality: 90,
//!     skip_existing: true,
//!     ..Default::default()
//! };
//! config.validate()?;
//! ```

use crate::error::OptimizeError;
use crate::image_processor::TargetFormat;
use serde::{Deserialize, Serialize};

/// Highest accepted encode quality
pub const MAX_QUALITY: u8 = 100;

/// Configuration for a conversion run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Format every eligible image is converted to
    pub target_format: TargetFormat,
    /// Encode quality (0-100)
    pub quality: u8,
    /// Skip files whose target already exists instead of overwriting it
    pub skip_existing: bool,
    /// Dry run - only report what would be converted
    pub dry_run: bool,
    /// Output progress and status as JSON for programmatic use
    pub json_output: bool,
    /// Directory names that are never descended into
    pub exclude_dirs: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_format: TargetFormat::WebP,
            quality: 80,
            skip_existing: false,
            dry_run: false,
            json_output: false,
            exclude_dirs: Vec::new(),
        }
    }
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), OptimizeError> {
        if self.quality > MAX_QUALITY {
            return Err(OptimizeError::Validation(format!(
                "Quality must be between 0 and {}, got {}",
                MAX_QUALITY, self.quality
            )));
        }

        for name in &self.exclude_dirs {
            if name.is_empty() || name.contains(|c: char| c == '/' || c == '\\') {
                return Err(OptimizeError::Validation(format!(
                    "Excluded directory must be a plain directory name: {:?}",
                    name
                )));
            }
        }

        Ok(())
    }

    /// True when a directory with this name must not be traversed
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.exclude_dirs.iter().any(|excluded| excluded == name)
    }
}
