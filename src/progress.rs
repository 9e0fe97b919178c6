//! # Progress Tracking and Statistics Module
//!
//! Questo modulo gestisce il progress tracking e le statistiche di un run.
//!
//! ## Responsabilità:
//! - Progress bar visual con `indicatif` per feedback real-time
//! - Tracking statistiche (directory visitate, file transcodificati, saltati, errori)
//! - Calcolo percentuale di riduzione sull'output primario
//!
//! ## Visual feedback:
//! ```
//! ⠋ [00:00:04] [=========>------------------------------] 12/48 (25%) photo1.png
//! ```

use crate::file_manager::FileManager;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Manages progress reporting for a run
#[derive(Clone)]
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(total_files: u64) -> Self {
        let bar = ProgressBar::new(total_files);

        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        {
            bar.set_style(style.progress_chars("=>-"));
        }

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// A progress manager that never draws (JSON mode, tests)
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Update progress with a message
    pub fn update(&self, message: &str) {
        self.bar.inc(1);
        self.bar.set_message(message.to_string());
    }

    /// Current position of the bar
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Finish with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

/// Statistics for a single run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OptimizationStats {
    pub directories_visited: usize,
    pub files_transcoded: usize,
    pub files_skipped: usize,
    pub errors: usize,
    /// Sum of input sizes for transcoded files
    pub total_original_size: u64,
    /// Sum of primary output sizes for transcoded files
    pub total_optimized_size: u64,
}

impl OptimizationStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_directory(&mut self) {
        self.directories_visited += 1;
    }

    pub fn add_transcoded(&mut self, original_size: u64, new_size: u64) {
        self.files_transcoded += 1;
        self.total_original_size += original_size;
        self.total_optimized_size += new_size;
    }

    pub fn add_skipped(&mut self) {
        self.files_skipped += 1;
    }

    pub fn add_error(&mut self) {
        self.errors += 1;
    }

    pub fn total_bytes_saved(&self) -> u64 {
        self.total_original_size.saturating_sub(self.total_optimized_size)
    }

    pub fn overall_reduction_percent(&self) -> f64 {
        FileManager::calculate_reduction(self.total_original_size, self.total_optimized_size)
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Directories: {} | Optimized: {} | Skipped: {} | Errors: {} | Total saved: {} ({:.2}%)",
            self.directories_visited,
            self.files_transcoded,
            self.files_skipped,
            self.errors,
            FileManager::format_size(self.total_bytes_saved()),
            self.overall_reduction_percent()
        )
    }
}
