//! # Site Image Optimizer - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing`
//! - Caricamento della configurazione e applicazione degli override CLI
//! - Avvio dell'optimizer
//!
//! ## Flusso di esecuzione:
//! 1. Parsa gli argomenti CLI
//! 2. Configura il logging (INFO o DEBUG a seconda del flag verbose, oppure `RUST_LOG`)
//! 3. Carica il file di configurazione se presente
//! 4. Applica gli override e valida
//! 5. Istanzia MediaOptimizer e avvia il processo di ottimizzazione
//!
//! ## Esempio di utilizzo:
//! ```bash
//! optimize-images --input public/images --output public/images-optimized --verbose
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use site_image_optimizer::{platform::PlatformCommands, Config, MediaOptimizer};

#[derive(Parser)]
#[command(name = "optimize-images")]
#[command(about = "Resize and re-encode the site's images into WebP, PNG and JPEG")]
struct Args {
    /// Source image tree (default: public/images)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Destination tree (default: public/images-optimized)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long, default_value = "image-optimizer.json")]
    config: PathBuf,

    /// Emit JSON lines on stdout instead of a progress bar
    #[arg(long)]
    json: bool,

    /// Exit with an error if any file or directory failed
    #[arg(long)]
    strict: bool,

    /// Never use the external cjpeg (mozjpeg) encoder
    #[arg(long)]
    no_mozjpeg: bool,

    /// Write the effective configuration to the --config path and exit
    #[arg(long)]
    save_config: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn apply_to(&self, config: &mut Config) {
        if let Some(ref input) = self.input {
            config.input_dir = input.clone();
        }
        if let Some(ref output) = self.output {
            config.output_dir = output.clone();
        }
        if self.json {
            config.json_output = true;
        }
        if self.strict {
            config.strict = true;
        }
        if self.no_mozjpeg {
            config.use_mozjpeg = false;
        }
    }
}

/// Defaults, then the config file, then CLI flags
async fn load_config(args: &Args) -> Result<Config> {
    let config = load_config(&args).await?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if args.json {
        // stdout is reserved for JSON lines
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }

    debug!("Running on {}", PlatformCommands::system_info());

    let mut config = Config::from_file(&args.config).await?;
    args.apply_to(&mut config);
    config.validate()?;

    if args.save_config {
        config.save_to_file(&args.config).await?;
        info!("Configuration saved to {}", args.config.display());
        return Ok(());
    }

    let optimizer = MediaOptimizer::new(config)?;
    optimizer.run().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(extra: &[&str]) -> Args {
        Args::parse_from(std::iter::once("optimize-images").chain(extra.iter().copied()))
    }

    #[tokio::test]
    async fn test_flags_override_file_over_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("image-optimizer.json");
        tokio::fs::write(
            &config_path,
            r#"{ "input_dir": "assets/img", "output_dir": "assets/img-out", "webp_quality": 70 }"#,
        )
        .await
        .unwrap();

        let config_arg = config_path.to_string_lossy().into_owned();
        let config = load_config(&args(&["--config", &config_arg, "--output", "dist/img", "--strict", "--no-mozjpeg"]))
            .await
            .unwrap();

        assert_eq!(config.input_dir, PathBuf::from("assets/img"));
        assert_eq!(config.output_dir, PathBuf::from("dist/img"));
        assert_eq!(config.webp_quality, 70);
        assert_eq!(config.jpeg_quality, 80);
        assert!(config.strict);
        assert!(!config.use_mozjpeg);
        assert!(!config.json_output);
    }

    #[tokio::test]
    async fn test_missing_file_uses_defaults_and_flags() {
        let temp_dir = TempDir::new().unwrap();
        let config_arg = temp_dir.path().join("none.json").to_string_lossy().into_owned();

        let config = load_config(&args(&["-c", &config_arg, "-i", "site/images", "--json"]))
            .await
            .unwrap();

        assert_eq!(config.input_dir, PathBuf::from("site/images"));
        assert_eq!(config.output_dir, Config::default().output_dir);
        assert!(config.json_output);
        assert!(config.use_mozjpeg);
    }

    #[tokio::test]
    async fn test_flags_cannot_make_input_equal_output() {
        let temp_dir = TempDir::new().unwrap();
        let config_arg = temp_dir.path().join("none.json").to_string_lossy().into_owned();

        let result = load_config(&args(&["-c", &config_arg, "-i", "img", "-o", "img"])).await;
        assert!(result.is_err());
    }
}
