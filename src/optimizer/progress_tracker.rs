//! # Progress Tracking Module
//!
//! Unifica progress bar e output JSON in un singolo tracker.
//! Il walker lo notifica a ogni file completato o fallito.

use crate::{
    json_output::JsonMessage,
    optimizer::directory_walker::{FailureRecord, RunReport},
    optimizer::transcoder::TranscodeOutcome,
    progress::ProgressManager,
};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Per-run progress sink
pub struct ProgressTracker {
    pub total_files: usize,
    current_file: AtomicUsize,
    json_output: bool,
    progress_manager: ProgressManager,
}

impl ProgressTracker {
    /// Crea un nuovo tracker
    pub fn new(total_files: usize, json_output: bool) -> Self {
        let progress_manager = if json_output {
            ProgressManager::hidden()
        } else {
            ProgressManager::new(total_files as u64)
        };

        Self {
            total_files,
            current_file: AtomicUsize::new(0),
            json_output,
            progress_manager,
        }
    }

    /// Tracker without any visible output
    pub fn silent(total_files: usize) -> Self {
        Self {
            total_files,
            current_file: AtomicUsize::new(0),
            json_output: false,
            progress_manager: ProgressManager::hidden(),
        }
    }

    /// Number of files seen so far
    pub fn current(&self) -> usize {
        self.current_file.load(Ordering::Relaxed)
    }

    fn advance(&self, message: &str) {
        let current = self.current_file.fetch_add(1, Ordering::Relaxed) + 1;
        self.progress_manager.update(message);
        if self.json_output {
            JsonMessage::progress(current, self.total_files).emit();
        }
    }

    pub fn on_file_complete(&self, outcome: &TranscodeOutcome) {
        if self.json_output {
            JsonMessage::file_complete(
                outcome.input.clone(),
                outcome.category,
                outcome.outputs.clone(),
                outcome.report.original_bytes,
                outcome.report.output_bytes,
                outcome.report.reduction_percent(),
                outcome.output_dimensions,
            )
            .emit();
        }

        let name = outcome
            .input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.advance(&name);
    }

    pub fn on_file_failed(&self, failure: &FailureRecord) {
        self.on_failure(failure);
        self.advance(&format!("✗ {}", failure.path.display()));
    }

    /// Directory failures do not move the bar
    pub fn on_failure(&self, failure: &FailureRecord) {
        if self.json_output {
            JsonMessage::error(failure.path.clone(), failure.message.clone()).emit();
        }
    }

    pub fn finish(&self, report: &RunReport, duration_seconds: f64) {
        self.progress_manager.finish(&report.stats.format_summary());
        if self.json_output {
            JsonMessage::complete(&report.stats, duration_seconds).emit();
        }
    }
}
