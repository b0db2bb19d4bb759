//! # File Management Module
//!
//! Questo modulo gestisce tutte le operazioni sui file e la discovery delle immagini.
//!
//! ## Responsabilità:
//! - Discovery ricorsiva (depth-first, via `walkdir`) delle immagini convertibili
//! - Filtro per estensione case-insensitive
//! - Esclusione di directory per nome
//! - Lettura dimensioni e cancellazione degli originali con errori tipizzati
//! - Formattazione human-readable delle dimensioni (anche negative)
//! - Calcolo della percentuale di riduzione
//!
//! ## Formati sorgente supportati:
//! JPG, JPEG, PNG, BMP, TIFF, TIF. Il formato di destinazione non fa mai parte
//! di questo insieme quando è WebP, quindi un file già convertito non viene
//! mai riprocessato.
//!
//! ## Esempio:
//! ```rust,ignore
//! let files = FileManager::find_image_files(Path::new("."), &config)?;
//! for file in files {
//!     let size = FileManager::file_size(&file).await?;
//!     println!("{} {}", file.display(), FileManager::format_size(size as i64));
//! }
//! ```

use crate::config::Config;
use crate::error::OptimizeError;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Source extensions eligible for conversion (lower-case, without the dot)
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif"];

/// A file selected for conversion together with its target path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionCandidate {
    pub source: PathBuf,
    pub target: PathBuf,
}

impl ConversionCandidate {
    /// Name of the source file, for reporting
    pub fn file_name(&self) -> String {
        Self::display_name(&self.source)
    }

    /// Name of the target file, for reporting
    pub fn target_name(&self) -> String {
        Self::display_name(&self.target)
    }

    /// True when the conversion rewrites the source in place
    pub fn is_in_place(&self) -> bool {
        self.source == self.target
    }

    fn display_name(path: &Path) -> String {
        path.file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned()
    }
}

/// Manages file operations and discovery
pub struct FileManager;

impl FileManager {
    /// Find all convertible images under `root`.
    ///
    /// Unreadable entries below the root are logged and skipped; an unreadable
    /// root is an error.
    pub fn find_image_files(root: &Path, config: &Config) -> Result<Vec<PathBuf>, OptimizeError> {
        if !root.is_dir() {
            return Err(OptimizeError::InvalidRoot(root.to_path_buf()));
        }

        let mut files = Vec::new();

        let walker = WalkDir::new(root)
            .into_iter()
            .filter_entry(|entry| !Self::is_excluded(entry, config));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Err(OptimizeError::Traversal(e)),
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if Self::is_supported_format(path) {
                files.push(path.to_path_buf());
            } else {
                debug!("Ignoring unsupported file: {}", path.display());
            }
        }

        Ok(files)
    }

    /// Excluded directories are pruned, the root itself never is
    fn is_excluded(entry: &DirEntry, config: &Config) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && config.is_excluded_dir(&entry.file_name().to_string_lossy())
    }

    /// Check if a file extension is one of the supported source formats
    pub fn is_supported_format(path: &Path) -> bool {
        if let Some(ext) = path.extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext_lower.as_str())
        } else {
            false
        }
    }

    /// Size of a file in bytes
    pub async fn file_size(path: &Path) -> Result<u64, OptimizeError> {
        fs::metadata(path)
            .await
            .map(|metadata| metadata.len())
            .map_err(|source| OptimizeError::SizeQuery {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Remove an original after its conversion succeeded
    pub async fn remove_original(path: &Path) -> Result<(), OptimizeError> {
        fs::remove_file(path)
            .await
            .map_err(|source| OptimizeError::Delete {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Get human-readable size, e.g. `1.50KB` or `-2.00MB`
    pub fn format_size(bytes: i64) -> String {
        const FACTOR: f64 = 1024.0;
        const UNITS: &[&str] = &["", "K", "M", "G", "T"];

        let sign = if bytes < 0 { "-" } else { "" };
        let mut size = bytes.unsigned_abs() as f64;

        for unit in UNITS {
            if size < FACTOR {
                return format!("{}{:.2}{}B", sign, size, unit);
            }
            size /= FACTOR;
        }

        format!("{}{:.2}PB", sign, size)
    }

    /// Calculate percentage reduction, `None` for an empty original
    pub fn calculate_reduction(original_size: u64, new_size: u64) -> Option<f64> {
        if original_size == 0 {
            None
        } else {
            Some(((original_size as f64 - new_size as f64) / original_size as f64) * 100.0)
        }
    }

    /// Render a reduction percentage, `N/A` when undefined
    pub fn format_reduction(reduction: Option<f64>) -> String {
        match reduction {
            Some(percent) => format!("{:.1}%", percent),
            None => "N/A".to_string(),
        }
    }
}
