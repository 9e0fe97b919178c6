//! # File Management Module
//!
//! Questo modulo gestisce le operazioni sui file e la discovery delle immagini.
//!
//! ## Responsabilità:
//! - Allow-list delle estensioni supportate (case-insensitive)
//! - Conteggio ricorsivo delle immagini per dimensionare la progress bar
//! - Utilità per dimensioni in KB e percentuali di riduzione
//! - Formattazione human-readable delle dimensioni
//!
//! ## Formati supportati:
//! - **PNG**: `.png`
//! - **JPEG**: `.jpg`, `.jpeg`
//!
//! Tutti gli altri file vengono ignorati silenziosamente.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Source format of an eligible input image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Png,
    Jpeg,
}

/// Manages file operations and discovery
pub struct FileManager;

impl FileManager {
    /// Source kind for an allow-listed extension, `None` for everything else
    pub fn source_kind(path: &Path) -> Option<SourceKind> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();
        match ext.as_str() {
            "png" => Some(SourceKind::Png),
            "jpg" | "jpeg" => Some(SourceKind::Jpeg),
            _ => None,
        }
    }

    /// Check if a file is an image the transcoder accepts
    pub fn is_supported_image(path: &Path) -> bool {
        Self::source_kind(path).is_some()
    }

    /// Find all eligible images under a directory, skipping `exclude` and anything below it
    pub fn find_images(input_dir: &Path, exclude: Option<&Path>) -> Vec<PathBuf> {
        WalkDir::new(input_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| exclude.map_or(true, |excluded| e.path() != excluded))
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|path| Self::is_supported_image(path))
            .collect()
    }

    /// Bytes to kilobytes, rounded to the nearest integer
    pub fn size_kb(bytes: u64) -> u64 {
        (bytes + 512) / 1024
    }

    /// Get human-readable file size
    pub fn format_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    /// Calculate percentage reduction (negative when the file grew)
    pub fn calculate_reduction(original_size: u64, new_size: u64) -> f64 {
        if original_size == 0 {
            0.0
        } else {
            ((original_size as f64 - new_size as f64) / original_size as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_source_kind_is_case_insensitive() {
        assert_eq!(FileManager::source_kind(Path::new("a.png")), Some(SourceKind::Png));
        assert_eq!(FileManager::source_kind(Path::new("a.PNG")), Some(SourceKind::Png));
        assert_eq!(FileManager::source_kind(Path::new("a.jpg")), Some(SourceKind::Jpeg));
        assert_eq!(FileManager::source_kind(Path::new("a.JpEg")), Some(SourceKind::Jpeg));
        assert_eq!(FileManager::source_kind(Path::new("a.webp")), None);
        assert_eq!(FileManager::source_kind(Path::new("a.gif")), None);
        assert_eq!(FileManager::source_kind(Path::new("README")), None);
        assert_eq!(FileManager::source_kind(Path::new("png")), None);
    }

    #[test]
    fn test_find_images_filters_and_excludes() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        std::fs::create_dir_all(root.join("gallery")).unwrap();
        std::fs::create_dir_all(root.join("out")).unwrap();
        std::fs::write(root.join("gallery/a.png"), b"x").unwrap();
        std::fs::write(root.join("gallery/b.JPG"), b"x").unwrap();
        std::fs::write(root.join("gallery/notes.txt"), b"x").unwrap();
        std::fs::write(root.join("out/c.png"), b"x").unwrap();

        let found = FileManager::find_images(root, Some(&root.join("out")));
        assert_eq!(found, vec![root.join("gallery/a.png"), root.join("gallery/b.JPG")]);

        assert_eq!(FileManager::find_images(root, None).len(), 3);
    }

    #[test]
    fn test_size_kb_rounds() {
        assert_eq!(FileManager::size_kb(0), 0);
        assert_eq!(FileManager::size_kb(511), 0);
        assert_eq!(FileManager::size_kb(512), 1);
        assert_eq!(FileManager::size_kb(500 * 1024), 500);
        assert_eq!(FileManager::size_kb(1535), 1);
        assert_eq!(FileManager::size_kb(1536), 2);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(FileManager::format_size(512), "512 B");
        assert_eq!(FileManager::format_size(2048), "2.00 KB");
        assert_eq!(FileManager::format_size(3 * 1024 * 1024), "3.00 MB");
    }

    #[test]
    fn test_calculate_reduction() {
        assert_eq!(FileManager::calculate_reduction(0, 10), 0.0);
        assert_eq!(FileManager::calculate_reduction(100, 25), 75.0);
        assert_eq!(FileManager::calculate_reduction(100, 150), -50.0);
    }
}
