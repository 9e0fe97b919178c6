//! # Configuration Management Module
//!
//! Questo modulo gestisce tutta la configurazione dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce la struct `Config` con tutti i parametri di ottimizzazione
//! - Fornisce validazione dei parametri di input
//! - Supporta caricamento/salvataggio configurazione da/verso file JSON
//! - Fornisce valori di default sensati per tutti i parametri
//!
//! ## Parametri di configurazione:
//! - `input_dir`: Directory sorgente (default: `public/images`)
//! - `output_dir`: Directory di destinazione (default: `public/images-optimized`)
//! - `webp_quality`: Qualità WebP (1-100, default: 80)
//! - `jpeg_quality`: Qualità JPEG (1-100, default: 80)
//! - `png_compression_level`: Livello compressione PNG (0-9, default: 9)
//! - `max_widths`: Larghezza massima per categoria (gallery 800, dumpster 600,
//!   hero 1920, logo 400, default 1200)
//! - `resize_filter`: Filtro di resampling (`lanczos`, `catrom`, `triangle`; default: `lanczos`)
//! - `use_mozjpeg`: Usa `cjpeg` (mozjpeg) se presente nel PATH (default: true)
//! - `strict`: Exit code non-zero se qualche file fallisce (default: false)
//! - `json_output`: Eventi JSON su stdout (default: false)
//!
//! ## Esempio:
//! ```rust
//! let config = Config {
//!     webp_quality: 75,
//!     strict: true,
//!     ..Default::default()
//! };
//! config.validate()?;
//! ```

use crate::category::Category;
use crate::error::OptimizeError;
use crate::resize::ResizeAlgorithm;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Maximum output width, in pixels, for each image category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidthCaps {
    pub gallery: u32,
    pub dumpster: u32,
    pub hero: u32,
    pub logo: u32,
    pub default: u32,
}

impl Default for WidthCaps {
    fn default() -> Self {
        Self {
            gallery: 800,
            dumpster: 600,
            hero: 1920,
            logo: 400,
            default: 1200,
        }
    }
}

impl WidthCaps {
    /// Width cap for a category
    pub fn for_category(&self, category: Category) -> u32 {
        match category {
            Category::Gallery => self.gallery,
            Category::Dumpster => self.dumpster,
            Category::Hero => self.hero,
            Category::Logo => self.logo,
            Category::Default => self.default,
        }
    }
}

/// Configuration for a single optimization run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the source image tree
    pub input_dir: PathBuf,
    /// Root of the mirrored output tree
    pub output_dir: PathBuf,
    /// WebP quality (1-100)
    pub webp_quality: u8,
    /// JPEG quality (1-100)
    pub jpeg_quality: u8,
    /// PNG compression effort (0-9)
    pub png_compression_level: u8,
    /// Per-category width caps
    pub max_widths: WidthCaps,
    /// Resampling filter for downscaling
    pub resize_filter: ResizeAlgorithm,
    /// Prefer the external mozjpeg `cjpeg` encoder when it is installed
    pub use_mozjpeg: bool,
    /// Fail the run when any file or directory could not be processed
    pub strict: bool,
    /// Output progress and status as JSON for programmatic use
    pub json_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("public").join("images"),
            output_dir: PathBuf::from("public").join("images-optimized"),
            webp_quality: 80,
            jpeg_quality: 80,
            png_compression_level: 9,
            max_widths: WidthCaps::default(),
            resize_filter: ResizeAlgorithm::default(),
            use_mozjpeg: true,
            strict: false,
            json_output: false,
        }
    }
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), OptimizeError> {
        if self.webp_quality == 0 || self.webp_quality > 100 {
            return Err(OptimizeError::Validation(
                "WebP quality must be between 1 and 100".to_string(),
            ));
        }

        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(OptimizeError::Validation(
                "JPEG quality must be between 1 and 100".to_string(),
            ));
        }

        if self.png_compression_level > 9 {
            return Err(OptimizeError::Validation(
                "PNG compression level must be between 0 and 9".to_string(),
            ));
        }

        for category in Category::ALL {
            if self.max_widths.for_category(category) == 0 {
                return Err(OptimizeError::Validation(format!(
                    "Max width for {} images must be greater than 0",
                    category
                )));
            }
        }

        if self.input_dir == self.output_dir {
            return Err(OptimizeError::Validation(format!(
                "Output directory must differ from input directory: {}",
                self.input_dir.display()
            )));
        }

        Ok(())
    }

    /// Width cap for a category
    pub fn max_width(&self, category: Category) -> u32 {
        self.max_widths.for_category(category)
    }

    /// Load configuration from file, falling back to defaults when it is absent
    pub async fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}
