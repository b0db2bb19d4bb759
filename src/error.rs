//! # Error Types Module
//!
//! Questo modulo definisce tutti i tipi di errore custom dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce `OptimizeError` enum per categorizzare tutti gli errori possibili
//! - Distingue gli errori per singolo file da quelli che bloccano l'intera run
//! - Integra con `thiserror` per automatic error conversion
//! - Supporta error chaining per mantenere il contesto degli errori
//!
//! ## Errori per singolo file:
//! - `Decode`: Il file sorgente non è un'immagine leggibile (corrotto, troncato, etc.)
//! - `Encode`: Il codec non riesce a scrivere il formato di destinazione
//! - `SizeQuery`: Lettura dimensione fallita su sorgente o destinazione
//! - `Delete`: Rimozione dell'originale fallita dopo una conversione riuscita.
//!   Sorgente e destinazione restano entrambi su disco (storage doppio, nessun dato perso)
//!
//! ## Errori di run:
//! - `InvalidRoot`: La directory radice non esiste o non è una directory
//! - `Traversal`: La directory radice non è leggibile
//! - `Validation`: Parametri di configurazione non validi
//!
//! ## Esempio:
//! ```rust,ignore
//! match outcome {
//!     ConversionOutcome::Failed(e) if e.is_delete_failure() => warn!("doubled storage: {}", e),
//!     _ => {}
//! }
//! ```

use std::path::PathBuf;

/// Custom error types for image conversion
#[derive(thiserror::Error, Debug)]
pub enum OptimizeError {
    #[error("cannot decode image {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("cannot encode {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("cannot read size of {}: {source}", .path.display())]
    SizeQuery {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("converted but could not delete original {}: {source}", .path.display())]
    Delete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Not a readable directory: {}", .0.display())]
    InvalidRoot(PathBuf),

    #[error("Directory traversal error: {0}")]
    Traversal(#[from] walkdir::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}

impl OptimizeError {
    /// Short machine-friendly name of the error kind, used in JSON output
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Decode { .. } => "decode",
            Self::Encode { .. } => "encode",
            Self::SizeQuery { .. } => "size_query",
            Self::Delete { .. } => "delete",
            Self::InvalidRoot(_) => "invalid_root",
            Self::Traversal(_) => "traversal",
            Self::Validation(_) => "validation",
        }
    }

    /// True when the target was written but the original is still on disk
    pub fn is_delete_failure(&self) -> bool {
        matches!(self, Self::Delete { .. })
    }
}
