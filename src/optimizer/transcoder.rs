//! # Transcoder Module
//!
//! Worker per l'ottimizzazione di un singolo file immagine.
//!
//! Pipeline lineare: classificazione → lettura → decode + resize → encode
//! dei due formati → scrittura → report della riduzione sull'output primario.
//!
//! | Input | Primario (riportato) | Secondario |
//! |-------|----------------------|------------|
//! | PNG   | `<nome>.webp`        | `<nome>.png` |
//! | JPEG  | `<nome>.jpg`         | `<nome>.webp` |

use crate::{
    category::Category,
    config::Config,
    error::OptimizeError,
    file_manager::{FileManager, SourceKind},
    image_processor::{ImageProcessor, OutputFormat, PreparedImage},
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Output formats for a source kind, primary first
pub fn plan_outputs(kind: SourceKind) -> [OutputFormat; 2] {
    match kind {
        SourceKind::Png => [OutputFormat::WebP, OutputFormat::Png],
        SourceKind::Jpeg => [OutputFormat::Jpeg, OutputFormat::WebP],
    }
}

/// Original and resulting size of one produced file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeReport {
    pub original_bytes: u64,
    pub output_bytes: u64,
}

impl SizeReport {
    pub fn original_kb(&self) -> u64 {
        FileManager::size_kb(self.original_bytes)
    }

    pub fn output_kb(&self) -> u64 {
        FileManager::size_kb(self.output_bytes)
    }

    /// Reduction rounded to the nearest integer; negative when the output is larger
    pub fn reduction_percent(&self) -> i64 {
        FileManager::calculate_reduction(self.original_bytes, self.output_bytes).round() as i64
    }

    /// `-76%` for a reduction, `+12%` for growth, `0%` for no change
    pub fn format_change(&self) -> String {
        let percent = self.reduction_percent();
        match percent.signum() {
            1 => format!("-{}%", percent),
            -1 => format!("+{}%", -percent),
            _ => "0%".to_string(),
        }
    }
}

/// Result of transcoding one input image
#[derive(Debug, Clone)]
pub struct TranscodeOutcome {
    pub input: PathBuf,
    pub kind: SourceKind,
    pub category: Category,
    /// Written files, primary first
    pub outputs: Vec<PathBuf>,
    pub report: SizeReport,
    pub source_dimensions: (u32, u32),
    pub output_dimensions: (u32, u32),
}

impl TranscodeOutcome {
    /// Human-readable one-line summary of the primary output
    pub fn summary_line(&self) -> String {
        let input_name = file_name(&self.input);
        let sizes = format!(
            "({}KB → {}KB, {})",
            self.report.original_kb(),
            self.report.output_kb(),
            self.report.format_change()
        );

        match self.kind {
            SourceKind::Png => {
                let primary = self.outputs.first().map(|p| file_name(p)).unwrap_or_default();
                format!("✓ {} → {} {}", input_name, primary, sizes)
            }
            SourceKind::Jpeg => format!("✓ {} {}", input_name, sizes),
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Resizes and re-encodes single images into an output directory
pub struct Transcoder {
    config: Config,
    processor: ImageProcessor,
}

impl Transcoder {
    pub fn new(config: Config) -> Self {
        let processor = ImageProcessor::new(&config);
        Self { config, processor }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn uses_cjpeg(&self) -> bool {
        self.processor.uses_cjpeg()
    }

    /// Transcodes `input_path` into `output_dir`, which must already exist
    pub async fn transcode(&self, input_path: &Path, output_dir: &Path) -> Result<TranscodeOutcome, OptimizeError> {
        let kind = FileManager::source_kind(input_path)
            .ok_or_else(|| OptimizeError::codec(input_path, "unsupported file extension"))?;
        let stem = input_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| OptimizeError::codec(input_path, "invalid file name"))?;

        let category = Category::classify(input_path, &self.config.input_dir, &self.config.max_widths);
        let max_width = self.config.max_width(category);

        let bytes = tokio::fs::read(input_path).await?;
        let original_bytes = bytes.len() as u64;

        let prepared = self
            .processor
            .prepare(bytes, max_width)
            .await
            .map_err(|e| OptimizeError::codec(input_path, format!("{:#}", e)))?;

        debug!(
            "{}: {} image {}x{} -> {}x{} (cap {})",
            input_path.display(),
            category,
            prepared.source_dimensions.0,
            prepared.source_dimensions.1,
            prepared.dimensions().0,
            prepared.dimensions().1,
            max_width
        );

        let [primary, secondary] = plan_outputs(kind);

        let (primary_path, primary_size) = self
            .write_variant(&prepared, primary, input_path, output_dir, &stem)
            .await?;

        let mut outcome = TranscodeOutcome {
            input: input_path.to_path_buf(),
            kind,
            category,
            outputs: vec![primary_path],
            report: SizeReport {
                original_bytes,
                output_bytes: primary_size,
            },
            source_dimensions: prepared.source_dimensions,
            output_dimensions: prepared.dimensions(),
        };
        info!("{}", outcome.summary_line());

        // Fallback format: written, not reported
        let (secondary_path, _) = self
            .write_variant(&prepared, secondary, input_path, output_dir, &stem)
            .await?;
        outcome.outputs.push(secondary_path);

        Ok(outcome)
    }

    /// Encodes one format and writes it as `<stem>.<ext>` into `output_dir`
    async fn write_variant(
        &self,
        prepared: &PreparedImage,
        format: OutputFormat,
        input_path: &Path,
        output_dir: &Path,
        stem: &str,
    ) -> Result<(PathBuf, u64), OptimizeError> {
        let encoded = self
            .processor
            .encode(prepared.image.clone(), format)
            .await
            .map_err(|e| OptimizeError::codec(input_path, format!("{:#}", e)))?;

        let output_path = output_dir.join(format!("{}.{}", stem, format.extension()));
        tokio::fs::write(&output_path, &encoded).await?;
        debug!("Wrote {} ({} bytes)", output_path.display(), encoded.len());

        Ok((output_path, encoded.len() as u64))
    }
}
