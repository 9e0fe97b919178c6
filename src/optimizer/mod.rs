//! # Optimizer Module
//!
//! Modulo che separa le responsabilità in sottomoduli:
//! - `media_optimizer`: Orchestratore principale
//! - `directory_walker`: Visita ricorsiva e mirroring delle directory
//! - `transcoder`: Worker per singoli file
//! - `progress_tracker`: Gestione progress unificata

pub mod directory_walker;
pub mod media_optimizer;
pub mod progress_tracker;
pub mod transcoder;

pub use directory_walker::{DirectoryWalker, FailureKind, FailureRecord, RunReport};
pub use media_optimizer::MediaOptimizer;
pub use progress_tracker::ProgressTracker;
pub use transcoder::{SizeReport, TranscodeOutcome, Transcoder};
