//! # Site Image Optimizer Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare dell'applicazione
//! - Espone i tipi e le funzioni principali tramite re-exports
//! - Fornisce un'interfaccia pulita per il main.rs e per i test
//!
//! ## Architettura dei moduli:
//! - `config`: Configurazione, limiti di larghezza e validazione parametri
//! - `error`: Tipi di errore custom
//! - `category`: Classificazione delle immagini dal percorso relativo
//! - `file_manager`: Discovery delle immagini e utility sulle dimensioni
//! - `resize`: Calcolo delle dimensioni e ridimensionamento
//! - `image_processor`: Decodifica e codifica WebP/PNG/JPEG
//! - `platform`: Risoluzione di strumenti esterni (cjpeg)
//! - `optimizer`: Orchestratore, walker ricorsivo e transcoder
//! - `progress`: Progress bar e statistiche
//! - `json_output`: Messaggi JSON line-delimited
//!
//! ## Utilizzo:
//! ```no_run
//! use site_image_optimizer::{Config, MediaOptimizer};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let optimizer = MediaOptimizer::new(Config::default())?;
//! let report = optimizer.run().await?;
//! println!("{}", report.stats.format_summary());
//! # Ok(())
//! # }
//! ```

pub mod category;
pub mod config;
pub mod error;
pub mod file_manager;
pub mod image_processor;
pub mod json_output;
pub mod optimizer;
pub mod platform;
pub mod progress;
pub mod resize;

pub use category::Category;
pub use config::{Config, WidthCaps};
pub use error::OptimizeError;
pub use optimizer::{MediaOptimizer, RunReport, Transcoder};
