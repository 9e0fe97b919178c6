//! # JSON Output Module
//!
//! Questo modulo gestisce l'output strutturato in JSON (una riga per evento)
//! per chi vuole consumare il run da uno script di build.
//!
//! ## Tipi di messaggi:
//! - `start`: Inizio processo di ottimizzazione
//! - `progress`: Progresso corrente
//! - `file_complete`: Fine elaborazione di un file
//! - `error`: File o directory non elaborabile
//! - `complete`: Fine processo con statistiche finali

use crate::category::Category;
use crate::progress::OptimizationStats;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Tipo di messaggio JSON
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum JsonMessage {
    #[serde(rename = "start")]
    Start {
        input_dir: PathBuf,
        output_dir: PathBuf,
        total_files: usize,
        config: JsonConfig,
    },

    #[serde(rename = "progress")]
    Progress {
        current: usize,
        total: usize,
        percentage: f64,
    },

    #[serde(rename = "file_complete")]
    FileComplete {
        path: PathBuf,
        category: String,
        outputs: Vec<PathBuf>,
        original_size: u64,
        optimized_size: u64,
        reduction_percent: i64,
        width: u32,
        height: u32,
    },

    #[serde(rename = "error")]
    Error { path: PathBuf, message: String },

    #[serde(rename = "complete")]
    Complete {
        directories: usize,
        files_optimized: usize,
        files_skipped: usize,
        errors: usize,
        total_original_size: u64,
        total_optimized_size: u64,
        duration_seconds: f64,
    },
}

/// Configurazione per output JSON
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct JsonConfig {
    pub webp_quality: u8,
    pub jpeg_quality: u8,
    pub png_compression_level: u8,
    pub mozjpeg: bool,
}

impl JsonMessage {
    /// Emette il messaggio JSON su stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    pub fn start(input_dir: PathBuf, output_dir: PathBuf, total_files: usize, config: JsonConfig) -> Self {
        Self::Start {
            input_dir,
            output_dir,
            total_files,
            config,
        }
    }

    pub fn progress(current: usize, total: usize) -> Self {
        let percentage = if total > 0 {
            (current as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        Self::Progress {
            current,
            total,
            percentage,
        }
    }

    pub fn file_complete(
        path: PathBuf,
        category: Category,
        outputs: Vec<PathBuf>,
        original_size: u64,
        optimized_size: u64,
        reduction_percent: i64,
        (width, height): (u32, u32),
    ) -> Self {
        Self::FileComplete {
            path,
            category: category.to_string(),
            outputs,
            original_size,
            optimized_size,
            reduction_percent,
            width,
            height,
        }
    }

    pub fn error(path: PathBuf, message: String) -> Self {
        Self::Error { path, message }
    }

    pub fn complete(stats: &OptimizationStats, duration_seconds: f64) -> Self {
        Self::Complete {
            directories: stats.directories_visited,
            files_optimized: stats.files_transcoded,
            files_skipped: stats.files_skipped,
            errors: stats.errors,
            total_original_size: stats.total_original_size,
            total_optimized_size: stats.total_optimized_size,
            duration_seconds,
        }
    }
}

impl JsonConfig {
    /// Snapshot of the encoder settings; `uses_cjpeg` is whether `cjpeg` was actually resolved
    pub fn new(config: &crate::Config, uses_cjpeg: bool) -> Self {
        Self {
            webp_quality: config.webp_quality,
            jpeg_quality: config.jpeg_quality,
            png_compression_level: config.png_compression_level,
            mozjpeg: uses_cjpeg,
        }
    }
}
