//! # Media Optimizer Main Orchestrator
//!
//! Orchestratore principale: valida la configurazione, controlla la root di
//! input, conta le immagini per la progress bar, lancia il walker e stampa
//! il riepilogo finale.

use crate::{
    config::Config,
    error::OptimizeError,
    file_manager::FileManager,
    json_output::{JsonConfig, JsonMessage},
    optimizer::{
        directory_walker::{DirectoryWalker, RunReport},
        progress_tracker::ProgressTracker,
        transcoder::Transcoder,
    },
};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Orchestratore principale
pub struct MediaOptimizer {
    transcoder: Transcoder,
    show_progress: bool,
}

impl MediaOptimizer {
    /// Crea nuova istanza dell'ottimizzatore
    pub fn new(config: Config) -> Result<Self, OptimizeError> {
        config.validate()?;
        Ok(Self {
            transcoder: Transcoder::new(config),
            show_progress: true,
        })
    }

    /// Disables the progress bar (useful when embedding or testing)
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    pub fn config(&self) -> &Config {
        self.transcoder.config()
    }

    /// Esegue il processo di ottimizzazione
    pub async fn run(&self) -> Result<RunReport, OptimizeError> {
        let start_time = Instant::now();
        let config = self.config();
        let input_dir = &config.input_dir;
        let output_dir = &config.output_dir;

        let (input_root, output_root) = self.resolve_roots().await?;
        let files = FileManager::find_images(&input_root, output_root.as_deref());

        self.emit_start_message(input_dir, output_dir, files.len());
        self.log_configuration(files.len());

        let tracker = if self.show_progress {
            ProgressTracker::new(files.len(), config.json_output)
        } else {
            ProgressTracker::silent(files.len())
        };

        let mut walker = DirectoryWalker::new(&self.transcoder, &tracker);
        if let Some(root) = output_root {
            walker = walker.with_output_root(root);
        }
        let report = walker.walk(input_dir, output_dir).await;

        tracker.finish(&report, start_time.elapsed().as_secs_f64());
        self.print_final_stats(&report);

        if config.strict && report.has_failures() {
            return Err(OptimizeError::IncompleteRun {
                failed: report.failures.len(),
            });
        }

        Ok(report)
    }

    /// Canonical input and output roots. An output that resolves to the input itself is rejected
    async fn resolve_roots(&self) -> Result<(PathBuf, Option<PathBuf>), OptimizeError> {
        let config = self.config();
        let is_dir = tokio::fs::metadata(&config.input_dir)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        if !is_dir {
            return Err(OptimizeError::MissingInput(config.input_dir.clone()));
        }

        let input_root = tokio::fs::canonicalize(&config.input_dir).await?;
        let output_root = Self::canonical_output_root(&config.output_dir).await;

        if output_root.as_deref() == Some(input_root.as_path()) {
            return Err(OptimizeError::Validation(format!(
                "Output directory {} resolves to the input directory {}",
                config.output_dir.display(),
                input_root.display()
            )));
        }

        Ok((input_root, output_root))
    }

    /// Canonical output path, created up front so it can be recognised inside the input tree
    async fn canonical_output_root(output_dir: &Path) -> Option<PathBuf> {
        if let Err(e) = tokio::fs::create_dir_all(output_dir).await {
            warn!("Cannot create output directory {}: {}", output_dir.display(), e);
            return None;
        }
        tokio::fs::canonicalize(output_dir).await.ok()
    }

    fn emit_start_message(&self, input_dir: &Path, output_dir: &Path, total_files: usize) {
        if self.config().json_output {
            JsonMessage::start(
                input_dir.to_path_buf(),
                output_dir.to_path_buf(),
                total_files,
                JsonConfig::new(self.config(), self.transcoder.uses_cjpeg()),
            )
            .emit();
        }

        info!("🖼️  Starting image optimization...");
        info!("Input: {}", input_dir.display());
        info!("Output: {}", output_dir.display());
    }

    fn log_configuration(&self, total_files: usize) {
        let config = self.config();
        info!(
            "WebP quality: {} | JPEG quality: {} | PNG compression level: {}",
            config.webp_quality, config.jpeg_quality, config.png_compression_level
        );
        if self.transcoder.uses_cjpeg() {
            info!("JPEG encoder: cjpeg (mozjpeg)");
        } else {
            info!("JPEG encoder: built-in");
        }
        info!("Found {} images to process", total_files);
    }

    fn print_final_stats(&self, report: &RunReport) {
        info!("{}", report.stats.format_summary());

        if report.has_failures() {
            warn!("{} item(s) could not be processed:", report.failures.len());
            for failure in &report.failures {
                warn!("  • {}: {}", failure.path.display(), failure.message);
            }
        }

        info!("✅ Image optimization complete!");
        info!("Next steps:");
        info!("1. Review the optimized images in {}", self.config().output_dir.display());
        info!("2. If satisfied, backup original images and replace with optimized versions");
        info!("3. Update image references in code to use .webp where supported");
    }
}
