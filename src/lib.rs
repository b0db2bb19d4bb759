//! # Space Image Converter Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare dell'applicazione
//! - Espone i tipi e le funzioni principali tramite re-exports
//! - Fornisce un'interfaccia pulita per il main.rs e per altri consumatori
//!
//! ## Architettura dei moduli:
//! - `config`: Gestione configurazione e validazione parametri
//! - `error`: Tipi di errore custom per singolo file e per la run
//! - `file_manager`: Discovery delle immagini e operazioni sui file
//! - `image_processor`: Decode/encode tramite la libreria `image`
//! - `optimizer`: Orchestratore principale del processo
//! - `progress`: Progress bar e statistiche
//! - `json_output`: Output JSON line-based
//!
//! ## Utilizzo:
//! ```rust,ignore
//! use space_image_converter::{Config, MediaOptimizer, ProgressTracker};
//!
//! let optimizer = MediaOptimizer::new(Config::default())?;
//! let plan = optimizer.plan(&path)?;
//! // ... conferma dell'utente ...
//! let stats = optimizer.execute(&plan, &ProgressTracker::new(plan.len(), false)).await;
//! ```

pub mod config;
pub mod error;
pub mod file_manager;
pub mod image_processor;
pub mod json_output;
pub mod optimizer;
pub mod progress;

pub use config::Config;
pub use error::OptimizeError;
pub use image_processor::TargetFormat;
pub use optimizer::{ConversionOutcome, ConversionPlan, MediaOptimizer, ProgressTracker};
pub use progress::OptimizationStats;
