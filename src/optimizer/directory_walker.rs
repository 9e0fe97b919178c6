//! # Directory Walker Module
//!
//! Visita ricorsiva dell'albero di input, replicando la struttura delle
//! directory nell'albero di output.
//!
//! ## Regole
//! - La directory di output di ogni sottoalbero viene creata all'ingresso,
//!   anche se poi non contiene immagini
//! - Le entry vengono visitate in ordine di nome
//! - Solo `.png`, `.jpg`, `.jpeg` (case-insensitive) vanno al transcoder;
//!   gli altri file vengono saltati
//! - Symlink ignorati (né file né directory)
//! - Errori di directory e di file vengono loggati e registrati nel
//!   `RunReport`; il resto dell'albero continua
//! - Sequenziale: un file alla volta, un sottoalbero alla volta

use crate::{
    error::OptimizeError,
    file_manager::FileManager,
    optimizer::{progress_tracker::ProgressTracker, transcoder::Transcoder},
    progress::OptimizationStats,
};
use futures::future::{BoxFuture, FutureExt};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// What kind of failure was recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A subtree could not be created or listed
    DirectoryRead,
    /// A single image could not be decoded or encoded
    Codec,
    /// A single image could not be read or its outputs written
    Io,
}

/// One recovered failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    pub path: PathBuf,
    pub kind: FailureKind,
    pub message: String,
}

impl FailureRecord {
    pub fn from_error(path: &Path, error: &OptimizeError) -> Self {
        let kind = match error {
            OptimizeError::DirectoryRead { .. } => FailureKind::DirectoryRead,
            OptimizeError::Codec { .. } | OptimizeError::Image(_) => FailureKind::Codec,
            _ => FailureKind::Io,
        };

        Self {
            path: path.to_path_buf(),
            kind,
            message: error.to_string(),
        }
    }
}

/// Outcome of a complete walk
#[derive(Debug, Default, Clone)]
pub struct RunReport {
    pub stats: OptimizationStats,
    pub failures: Vec<FailureRecord>,
}

impl RunReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    fn record_failure(&mut self, failure: FailureRecord) {
        self.stats.add_error();
        self.failures.push(failure);
    }
}

/// Recursive walker dispatching eligible images to the transcoder
pub struct DirectoryWalker<'a> {
    transcoder: &'a Transcoder,
    tracker: &'a ProgressTracker,
    /// Never descended into, so an output tree nested in the input is not re-read
    output_root: Option<PathBuf>,
}

impl<'a> DirectoryWalker<'a> {
    pub fn new(transcoder: &'a Transcoder, tracker: &'a ProgressTracker) -> Self {
        Self {
            transcoder,
            tracker,
            output_root: None,
        }
    }

    /// Skips `output_root` (compared after canonicalization) during the walk
    pub fn with_output_root(mut self, output_root: PathBuf) -> Self {
        self.output_root = Some(output_root);
        self
    }

    /// Walks `input_dir`, mirroring it into `output_dir`
    pub async fn walk(&self, input_dir: &Path, output_dir: &Path) -> RunReport {
        let mut report = RunReport::default();
        self.process_directory(input_dir.to_path_buf(), output_dir.to_path_buf(), &mut report)
            .await;
        report
    }

    fn process_directory<'b>(
        &'b self,
        input_dir: PathBuf,
        output_dir: PathBuf,
        report: &'b mut RunReport,
    ) -> BoxFuture<'b, ()> {
        async move {
            if let Err(e) = self.process_entries(&input_dir, &output_dir, report).await {
                error!("Error processing directory {}: {}", input_dir.display(), e);
                let failure = FailureRecord::from_error(&input_dir, &e);
                self.tracker.on_failure(&failure);
                report.record_failure(failure);
            }
        }
        .boxed()
    }

    async fn process_entries(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        report: &mut RunReport,
    ) -> Result<(), OptimizeError> {
        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|source| OptimizeError::DirectoryRead {
                path: output_dir.to_path_buf(),
                source,
            })?;

        let read_error = |source| OptimizeError::DirectoryRead {
            path: input_dir.to_path_buf(),
            source,
        };

        let mut entries = Vec::new();
        let mut reader = tokio::fs::read_dir(input_dir).await.map_err(read_error)?;
        while let Some(entry) = reader.next_entry().await.map_err(read_error)? {
            entries.push(entry);
        }
        entries.sort_by_key(|entry| entry.file_name());

        report.stats.add_directory();
        debug!("Processing directory {} ({} entries)", input_dir.display(), entries.len());

        for entry in entries {
            let item_path = entry.path();
            let file_type = match entry.file_type().await {
                Ok(file_type) => file_type,
                Err(e) => {
                    error!("Error processing {}: {}", item_path.display(), e);
                    let failure = FailureRecord::from_error(&item_path, &OptimizeError::Io(e));
                    self.tracker.on_failure(&failure);
                    report.record_failure(failure);
                    continue;
                }
            };

            if file_type.is_dir() {
                if self.is_output_root(&item_path).await {
                    debug!("Skipping output directory {}", item_path.display());
                    continue;
                }
                self.process_directory(item_path, output_dir.join(entry.file_name()), report)
                    .await;
            } else if file_type.is_file() {
                if FileManager::is_supported_image(&item_path) {
                    self.process_file(&item_path, output_dir, report).await;
                } else {
                    debug!("Skipping non-image file {}", item_path.display());
                    report.stats.add_skipped();
                }
            } else {
                debug!("Skipping special entry {}", item_path.display());
            }
        }

        Ok(())
    }

    async fn process_file(&self, input_path: &Path, output_dir: &Path, report: &mut RunReport) {
        match self.transcoder.transcode(input_path, output_dir).await {
            Ok(outcome) => {
                report
                    .stats
                    .add_transcoded(outcome.report.original_bytes, outcome.report.output_bytes);
                self.tracker.on_file_complete(&outcome);
            }
            Err(e) => {
                error!("✗ Error processing {}: {}", input_path.display(), e);
                let failure = FailureRecord::from_error(input_path, &e);
                self.tracker.on_file_failed(&failure);
                report.record_failure(failure);
            }
        }
    }

    async fn is_output_root(&self, path: &Path) -> bool {
        match &self.output_root {
            Some(root) => tokio::fs::canonicalize(path)
                .await
                .map(|canonical| &canonical == root)
                .unwrap_or(false),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use tempfile::TempDir;
    use walkdir::WalkDir;

    fn save_image(path: &Path, width: u32, height: u32, format: ImageFormat) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([200, 40, 10])))
            .save_with_format(path, format)
            .unwrap();
    }

    /// Every path under `root`, relative and sorted
    fn tree(root: &Path) -> Vec<String> {
        WalkDir::new(root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .map(|e| {
                e.unwrap()
                    .path()
                    .strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    fn transcoder_for(input: &Path, output: &Path) -> Transcoder {
        Transcoder::new(Config {
            input_dir: input.to_path_buf(),
            output_dir: output.to_path_buf(),
            use_mozjpeg: false,
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_walk_mirrors_tree_and_filters_extensions() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("images");
        let output = temp.path().join("images-optimized");

        save_image(&input.join("gallery/photo1.png"), 1200, 900, ImageFormat::Png);
        save_image(&input.join("logo/brand.jpg"), 300, 100, ImageFormat::Jpeg);
        save_image(&input.join("hero/Banner.JPEG"), 2400, 800, ImageFormat::Jpeg);
        std::fs::write(input.join("gallery/notes.txt"), b"not an image").unwrap();
        std::fs::write(input.join("logo/icon.svg"), b"<svg/>").unwrap();
        std::fs::create_dir_all(input.join("empty/nested")).unwrap();

        let transcoder = transcoder_for(&input, &output);
        let tracker = ProgressTracker::silent(3);
        let report = DirectoryWalker::new(&transcoder, &tracker).walk(&input, &output).await;

        assert_eq!(
            tree(&output),
            vec![
                "empty",
                "empty/nested",
                "gallery",
                "gallery/photo1.png",
                "gallery/photo1.webp",
                "hero",
                "hero/Banner.jpg",
                "hero/Banner.webp",
                "logo",
                "logo/brand.jpg",
                "logo/brand.webp",
            ]
        );
        assert_eq!(report.stats.files_transcoded, 3);
        assert_eq!(report.stats.files_skipped, 2);
        assert_eq!(report.stats.directories_visited, 6);
        assert!(!report.has_failures());
        assert_eq!(tracker.current(), 3);

        assert_eq!(image::open(output.join("gallery/photo1.webp")).unwrap().width(), 800);
        assert_eq!(image::open(output.join("hero/Banner.jpg")).unwrap().width(), 1920);
        assert_eq!(image::open(output.join("logo/brand.webp")).unwrap().width(), 300);
    }

    #[tokio::test]
    async fn test_corrupt_image_does_not_stop_walk() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("images");
        let output = temp.path().join("out");

        save_image(&input.join("dumpsters/a.png"), 900, 300, ImageFormat::Png);
        std::fs::write(input.join("dumpsters/b.png"), b"garbage").unwrap();
        save_image(&input.join("dumpsters/c.jpg"), 700, 700, ImageFormat::Jpeg);

        let transcoder = transcoder_for(&input, &output);
        let tracker = ProgressTracker::silent(3);
        let report = DirectoryWalker::new(&transcoder, &tracker).walk(&input, &output).await;

        assert_eq!(
            tree(&output),
            vec!["dumpsters", "dumpsters/a.png", "dumpsters/a.webp", "dumpsters/c.jpg", "dumpsters/c.webp"]
        );
        assert_eq!(report.stats.files_transcoded, 2);
        assert_eq!(report.stats.errors, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, input.join("dumpsters/b.png"));
        assert_eq!(report.failures[0].kind, FailureKind::Codec);
        assert_eq!(image::open(output.join("dumpsters/a.webp")).unwrap().width(), 600);
        assert_eq!(image::open(output.join("dumpsters/c.jpg")).unwrap().width(), 600);
    }

    #[tokio::test]
    async fn test_missing_subtree_is_recorded_not_fatal() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("out");
        let missing = temp.path().join("does-not-exist");

        let transcoder = transcoder_for(&missing, &output);
        let tracker = ProgressTracker::silent(0);
        let report = DirectoryWalker::new(&transcoder, &tracker).walk(&missing, &output).await;

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].kind, FailureKind::DirectoryRead);
        assert_eq!(report.failures[0].path, missing);
    }

    #[tokio::test]
    async fn test_blocked_subtree_does_not_stop_siblings() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("images");
        let output = temp.path().join("out");

        save_image(&input.join("a/one.png"), 40, 20, ImageFormat::Png);
        save_image(&input.join("b/two.png"), 40, 20, ImageFormat::Png);
        save_image(&input.join("c/three.jpg"), 40, 20, ImageFormat::Jpeg);
        // a plain file where the mirrored `b` directory should go
        std::fs::create_dir_all(&output).unwrap();
        std::fs::write(output.join("b"), b"in the way").unwrap();

        let transcoder = transcoder_for(&input, &output);
        let tracker = ProgressTracker::silent(3);
        let report = DirectoryWalker::new(&transcoder, &tracker).walk(&input, &output).await;

        assert_eq!(report.stats.files_transcoded, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].kind, FailureKind::DirectoryRead);
        assert_eq!(report.failures[0].path, input.join("b"));
        assert!(output.join("a/one.webp").exists());
        assert!(output.join("c/three.jpg").exists());
        assert_eq!(std::fs::read(output.join("b")).unwrap(), b"in the way");
    }

    #[tokio::test]
    async fn test_nested_output_root_is_skipped() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("images");
        let output = input.join("optimized");

        save_image(&input.join("photo.png"), 50, 50, ImageFormat::Png);
        std::fs::create_dir_all(&output).unwrap();
        save_image(&output.join("stale.png"), 50, 50, ImageFormat::Png);

        let transcoder = transcoder_for(&input, &output);
        let tracker = ProgressTracker::silent(1);
        let canonical_output = std::fs::canonicalize(&output).unwrap();
        let report = DirectoryWalker::new(&transcoder, &tracker)
            .with_output_root(canonical_output)
            .walk(&input, &output)
            .await;

        assert_eq!(report.stats.files_transcoded, 1);
        assert_eq!(tree(&output), vec!["photo.png", "photo.webp", "stale.png"]);
    }

    #[test]
    fn test_failure_kind_mapping() {
        let codec = OptimizeError::codec("a.png", "bad");
        assert_eq!(FailureRecord::from_error(Path::new("a.png"), &codec).kind, FailureKind::Codec);

        let io = OptimizeError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
        let record = FailureRecord::from_error(Path::new("a.png"), &io);
        assert_eq!(record.kind, FailureKind::Io);
        assert!(record.message.contains("disk full"));
    }
}
