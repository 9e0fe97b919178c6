//! # Image Resize Module
//!
//! Questo modulo gestisce il ridimensionamento delle immagini prima dell'encoding.
//!
//! ## Caratteristiche
//! - **Solo larghezza**: la larghezza viene limitata al cap della categoria,
//!   l'altezza segue preservando l'aspect ratio
//! - **Nessun upscaling**: immagini più strette del cap restano invariate
//! - **In-process**: usa `image::imageops` senza tool esterni
//!
//! ## Esempio
//! ```text
//! 1200x900, cap 800  -> 800x600
//!  300x200, cap 400  -> 300x200 (nessun resize)
//! ```

use image::imageops::FilterType;
use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// Resampling filter used when downscaling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeAlgorithm {
    /// Lanczos3 - migliore qualità per downscaling
    #[default]
    Lanczos,
    /// Catmull-Rom, buona qualità generale
    Catrom,
    /// Triangle - veloce, qualità accettabile
    Triangle,
}

impl ResizeAlgorithm {
    pub fn filter(&self) -> FilterType {
        match self {
            ResizeAlgorithm::Lanczos => FilterType::Lanczos3,
            ResizeAlgorithm::Catrom => FilterType::CatmullRom,
            ResizeAlgorithm::Triangle => FilterType::Triangle,
        }
    }
}

/// Computes output dimensions for a width cap, or `None` when no resize is needed
pub fn target_dimensions(width: u32, height: u32, max_width: u32) -> Option<(u32, u32)> {
    if width <= max_width || width == 0 {
        return None;
    }

    let scaled = (height as f64 * max_width as f64 / width as f64).round() as u32;
    Some((max_width, scaled.clamp(1, height.max(1))))
}

/// Downscales `image` to `max_width` when it is wider, never enlarging it
pub fn limit_width(image: DynamicImage, max_width: u32, algorithm: ResizeAlgorithm) -> DynamicImage {
    match target_dimensions(image.width(), image.height(), max_width) {
        Some((width, height)) => image.resize_exact(width, height, algorithm.filter()),
        None => image,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn test_narrower_than_cap_is_noop() {
        assert_eq!(target_dimensions(300, 200, 400), None);
        assert_eq!(target_dimensions(400, 200, 400), None);
    }

    #[test]
    fn test_wider_than_cap_scales_to_cap() {
        assert_eq!(target_dimensions(1200, 900, 800), Some((800, 600)));
        assert_eq!(target_dimensions(4000, 1000, 1920), Some((1920, 480)));
    }

    #[test]
    fn test_height_rounds_and_never_collapses() {
        assert_eq!(target_dimensions(1000, 333, 500), Some((500, 167)));
        assert_eq!(target_dimensions(5000, 1, 100), Some((100, 1)));
    }

    #[test]
    fn test_limit_width_never_enlarges() {
        let small = DynamicImage::ImageRgb8(RgbImage::new(300, 150));
        let out = limit_width(small, 400, ResizeAlgorithm::default());
        assert_eq!((out.width(), out.height()), (300, 150));

        let large = DynamicImage::ImageRgb8(RgbImage::new(1200, 600));
        let out = limit_width(large, 800, ResizeAlgorithm::default());
        assert_eq!((out.width(), out.height()), (800, 400));
    }

    #[test]
    fn test_every_filter_hits_target_size() {
        for algorithm in [ResizeAlgorithm::Lanczos, ResizeAlgorithm::Catrom, ResizeAlgorithm::Triangle] {
            let large = DynamicImage::ImageRgb8(RgbImage::new(900, 300));
            let out = limit_width(large, 600, algorithm);
            assert_eq!((out.width(), out.height()), (600, 200));
        }
    }

    #[test]
    fn test_filter_names() {
        let parsed: ResizeAlgorithm = serde_json::from_str(r#""catrom""#).unwrap();
        assert_eq!(parsed, ResizeAlgorithm::Catrom);
        assert_eq!(parsed.filter(), FilterType::CatmullRom);
        assert_eq!(serde_json::to_string(&ResizeAlgorithm::Triangle).unwrap(), r#""triangle""#);
    }
}
