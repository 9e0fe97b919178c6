//! # Image Processing Module
//!
//! Questo modulo gestisce decode, resize ed encode delle immagini.
//!
//! ## Formati di output
//!
//! | Formato | Encoder | Parametro |
//! |---------|---------|-----------|
//! | WebP    | libwebp (crate `webp`), lossy | `webp_quality` |
//! | PNG     | `image` + `oxipng`, lossless  | `png_compression_level` |
//! | JPEG    | `cjpeg` (mozjpeg) se presente, altrimenti `image` | `jpeg_quality` |
//!
//! ## Pipeline
//! 1. **Decode**: formato rilevato dai magic bytes, non dall'estensione
//! 2. **Resize**: limitato al cap della categoria, mai upscaling
//! 3. **Encode**: un buffer per formato richiesto
//!
//! Il lavoro CPU-bound gira sul blocking pool di Tokio e viene atteso subito,
//! quindi c'è sempre una sola immagine in lavorazione.
//!
//! ## Strategia JPEG
//! 1. **cjpeg**: `-quality Q -optimize -progressive`, input PPM via stdin
//! 2. **Fallback**: encoder in-process se `cjpeg` manca o fallisce

use crate::config::Config;
use crate::platform::{to_string_vec, PlatformCommands};
use crate::resize::{self, ResizeAlgorithm};
use anyhow::{anyhow, Result};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::{ColorType, DynamicImage, ImageEncoder};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

/// Encoded output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    WebP,
    Png,
    Jpeg,
}

impl OutputFormat {
    /// File extension written for this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::WebP => "webp",
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
        }
    }
}

/// Decoded image after the width cap has been applied
#[derive(Debug, Clone)]
pub struct PreparedImage {
    pub image: Arc<DynamicImage>,
    pub source_dimensions: (u32, u32),
}

impl PreparedImage {
    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    pub fn was_resized(&self) -> bool {
        self.dimensions() != self.source_dimensions
    }
}

/// Decodes, resizes and encodes images with the configured quality settings
pub struct ImageProcessor {
    webp_quality: u8,
    jpeg_quality: u8,
    png_compression_level: u8,
    algorithm: ResizeAlgorithm,
    /// Resolved `cjpeg` binary, when mozjpeg encoding is enabled and installed
    cjpeg: Option<PathBuf>,
}

impl ImageProcessor {
    /// Creates a processor, resolving the optional `cjpeg` tool once
    pub fn new(config: &Config) -> Self {
        let cjpeg = if config.use_mozjpeg {
            PlatformCommands::instance().resolve_tool("cjpeg")
        } else {
            None
        };

        Self {
            webp_quality: config.webp_quality,
            jpeg_quality: config.jpeg_quality,
            png_compression_level: config.png_compression_level,
            algorithm: config.resize_filter,
            cjpeg,
        }
    }

    /// Whether JPEG output goes through the external mozjpeg encoder
    pub fn uses_cjpeg(&self) -> bool {
        self.cjpeg.is_some()
    }

    /// Decodes `bytes` and limits the result to `max_width`
    pub async fn prepare(&self, bytes: Vec<u8>, max_width: u32) -> Result<PreparedImage> {
        let algorithm = self.algorithm;
        tokio::task::spawn_blocking(move || -> Result<PreparedImage> {
            let decoded = image::load_from_memory(&bytes)?;
            let source_dimensions = (decoded.width(), decoded.height());
            let image = resize::limit_width(decoded, max_width, algorithm);
            Ok(PreparedImage {
                image: Arc::new(image),
                source_dimensions,
            })
        })
        .await?
    }

    /// Encodes a prepared image into one output format
    pub async fn encode(&self, image: Arc<DynamicImage>, format: OutputFormat) -> Result<Vec<u8>> {
        if format == OutputFormat::Jpeg {
            if let Some(ref cjpeg) = self.cjpeg {
                match encode_jpeg_with_cjpeg(cjpeg, &image, self.jpeg_quality).await {
                    Ok(buffer) => return Ok(buffer),
                    Err(e) => warn!("cjpeg failed, using built-in JPEG encoder: {}", e),
                }
            }
        }

        let webp_quality = self.webp_quality;
        let jpeg_quality = self.jpeg_quality;
        let png_level = self.png_compression_level;

        tokio::task::spawn_blocking(move || match format {
            OutputFormat::WebP => encode_webp(&image, webp_quality),
            OutputFormat::Png => encode_png(&image, png_level),
            OutputFormat::Jpeg => encode_jpeg(&image, jpeg_quality),
        })
        .await?
    }
}

/// Lossy WebP encoding at `quality` (1-100)
pub fn encode_webp(image: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let encoded = if image.color().has_alpha() {
        let rgba = image.to_rgba8();
        webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height())
            .encode_simple(false, quality as f32)
    } else {
        let rgb = image.to_rgb8();
        webp::Encoder::from_rgb(rgb.as_raw(), rgb.width(), rgb.height())
            .encode_simple(false, quality as f32)
    };

    encoded
        .map(|memory| memory.to_vec())
        .map_err(|e| anyhow!("WebP encoding failed: {:?}", e))
}

/// Lossless PNG encoding; `level` (0-9) picks the deflate effort and the oxipng preset
pub fn encode_png(image: &DynamicImage, level: u8) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let encoder = PngEncoder::new_with_quality(
        &mut buffer,
        png_compression(level),
        PngFilterType::Adaptive,
    );

    if image.color().has_alpha() {
        let rgba = image.to_rgba8();
        encoder.write_image(rgba.as_raw(), rgba.width(), rgba.height(), ColorType::Rgba8)?;
    } else {
        let rgb = image.to_rgb8();
        encoder.write_image(rgb.as_raw(), rgb.width(), rgb.height(), ColorType::Rgb8)?;
    }

    let options = oxipng::Options::from_preset(oxipng_preset(level));
    oxipng::optimize_from_memory(&buffer, &options)
        .map_err(|e| anyhow!("PNG optimization failed: {}", e))
}

/// Lossy JPEG encoding with the built-in encoder
pub fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let rgb = image.to_rgb8();
    let mut buffer = Vec::new();
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
        encoder.encode(rgb.as_raw(), rgb.width(), rgb.height(), ColorType::Rgb8)?;
    }
    Ok(buffer)
}

/// Pipes the image as binary PPM into `cjpeg` and collects the JPEG from stdout
async fn encode_jpeg_with_cjpeg(tool: &Path, image: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let rgb = image.to_rgb8();
    let mut ppm = format!("P6\n{} {}\n255\n", rgb.width(), rgb.height()).into_bytes();
    ppm.extend_from_slice(rgb.as_raw());

    let args = to_string_vec(["-quality", &quality.to_string(), "-optimize", "-progressive"]);
    debug!("Command: {:?} {:?}", tool, args);

    let mut child = Command::new(tool)
        .args(&args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| anyhow!("cjpeg stdin not available"))?;

    let write = async move {
        stdin.write_all(&ppm).await?;
        stdin.shutdown().await
    };
    let (write_result, output) = tokio::join!(write, child.wait_with_output());
    let output = output?;

    if !output.status.success() {
        return Err(anyhow!(
            "cjpeg exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        ));
    }
    write_result?;

    if output.stdout.is_empty() {
        return Err(anyhow!("cjpeg produced no output"));
    }
    Ok(output.stdout)
}

fn png_compression(level: u8) -> CompressionType {
    match level {
        0..=3 => CompressionType::Fast,
        4..=6 => CompressionType::Default,
        _ => CompressionType::Best,
    }
}

/// Maps the 0-9 effort scale onto oxipng's 0-6 presets
fn oxipng_preset(level: u8) -> u8 {
    (level.min(9) as u32 * 6 / 9) as u8
}
