//! # Error Types Module
//!
//! Questo modulo definisce tutti i tipi di errore custom dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce `OptimizeError` enum per categorizzare tutti gli errori possibili
//! - Distingue errori recuperabili (per file / per directory) da errori fatali
//! - Integra con `thiserror` per automatic error conversion
//!
//! ## Categorie di errori:
//! - `DirectoryRead`: Una sotto-directory non può essere creata o letta (recuperabile)
//! - `Codec`: Decode o encode di un singolo file fallito (recuperabile)
//! - `Io` / `Image`: Errori di basso livello dentro un singolo file (recuperabili)
//! - `MissingInput`: La directory di input radice non esiste (fatale)
//! - `Validation`: Configurazione non valida (fatale)
//! - `IncompleteRun`: Run terminato con fallimenti in modalità strict (fatale)
//!
//! ## Esempio:
//! ```rust
//! if !input_dir.is_dir() {
//!     return Err(OptimizeError::MissingInput(input_dir.to_path_buf()));
//! }
//! ```

use std::path::PathBuf;

/// Custom error types for image optimization
#[derive(thiserror::Error, Debug)]
pub enum OptimizeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Cannot read directory {}: {source}", path.display())]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{message}")]
    Codec {
        path: PathBuf,
        message: String,
    },

    #[error("Input directory does not exist: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("Configuration error: {0}")]
    Validation(String),

    #[error("Run finished with {failed} failed item(s)")]
    IncompleteRun { failed: usize },
}

impl OptimizeError {
    /// Wraps any codec-level failure for the given file
    pub fn codec(path: impl Into<PathBuf>, message: impl std::fmt::Display) -> Self {
        Self::Codec {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
