//! # Path Resolution Module
//!
//! Centralizza la logica di calcolo del path di destinazione.
//! Il target vive sempre nella stessa directory del sorgente, con lo stesso
//! nome base e l'estensione del formato di destinazione.

use crate::file_manager::ConversionCandidate;
use crate::image_processor::TargetFormat;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Utility per calcolare i path di output in modo centralizzato
pub struct PathResolver;

impl PathResolver {
    /// Calcola il path di output per un file dato.
    ///
    /// Solo l'ultima estensione viene sostituita: `archive.tar.png` diventa
    /// `archive.tar.webp`. Ritorna `None` se il path non ha un nome file.
    pub fn get_output_path(input_path: &Path, format: TargetFormat) -> Option<PathBuf> {
        let file_stem = input_path.file_stem()?.to_string_lossy();
        let filename = format!("{}.{}", file_stem, format.extension());

        let output = input_path.with_file_name(filename);
        debug!("Resolved output path: {} -> {}", input_path.display(), output.display());
        Some(output)
    }

    /// Costruisce il candidato di conversione per un file sorgente
    pub fn candidate(input_path: &Path, format: TargetFormat) -> Option<ConversionCandidate> {
        Self::get_output_path(input_path, format).map(|target| ConversionCandidate {
            source: input_path.to_path_buf(),
            target,
        })
    }
}
