//! # Optimizer Module
//!
//! Modulo che separa le responsabilità in sottomoduli:
//! - `media_optimizer`: Orchestratore principale (plan → execute)
//! - `task_optimizer`: Worker per singoli file
//! - `progress_tracker`: Gestione progress e report per-file unificata
//! - `path_resolver`: Logica di calcolo path centralizzata

pub mod media_optimizer;
pub mod task_optimizer;
pub mod progress_tracker;
pub mod path_resolver;

pub use media_optimizer::{ConversionPlan, MediaOptimizer};
pub use task_optimizer::{ConversionOutcome, SkipReason, TaskOptimizer};
pub use progress_tracker::ProgressTracker;
pub use path_resolver::PathResolver;
