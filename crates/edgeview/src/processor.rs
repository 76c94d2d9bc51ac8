//! Frame edge processor
//!
//! Stateless engine that turns one 4:2:0 camera frame into a binary edge
//! map. Every call allocates its own intermediates, so a single processor
//! can be shared across threads without locking.

use std::io::Cursor;
use std::time::Instant;

use image::{GrayImage, ImageFormat};
use tracing::{debug, info, warn};

use crate::blur::gaussian_blur;
use crate::canny::canny;
use crate::error::Result;
use crate::frame::{self, RawFrame};
use crate::types::{EdgeConfig, ProcessingStats, EDGE_MARKER};

/// Binary edge map owned by the caller.
///
/// Exactly `width * height` bytes, row-major, each either 0 or 255.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeMap {
    image: GrayImage,
}

impl EdgeMap {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Number of pixels marked as edges.
    pub fn edge_count(&self) -> usize {
        self.as_bytes().iter().filter(|&&b| b == EDGE_MARKER).count()
    }

    /// Hand the flat buffer to the caller.
    pub fn into_bytes(self) -> Vec<u8> {
        self.image.into_raw()
    }

    pub fn into_image(self) -> GrayImage {
        self.image
    }

    /// Encode as an 8-bit grayscale PNG, the form the web viewer displays.
    pub fn to_png(&self) -> std::result::Result<Vec<u8>, image::ImageError> {
        let mut out = Cursor::new(Vec::new());
        self.image.write_to(&mut out, ImageFormat::Png)?;
        Ok(out.into_inner())
    }
}

/// Frame edge processing engine
#[derive(Debug)]
pub struct EdgeProcessor {
    config: EdgeConfig,
}

impl Default for EdgeProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeProcessor {
    /// Create a processor with the fixed camera pipeline parameters
    /// (5×5 Gaussian, σ = 1.5, Canny 50/150).
    pub fn new() -> Self {
        info!("EdgeProcessor initialized");
        Self {
            config: EdgeConfig::default(),
        }
    }

    /// Create a processor with custom parameters.
    ///
    /// # Returns
    /// * `Ok(EdgeProcessor)` - Parameters are valid
    /// * `Err(EdgeError::InvalidConfig)` - Even kernel, bad sigma or inverted thresholds
    pub fn with_config(config: EdgeConfig) -> Result<Self> {
        config.validate()?;
        info!(?config, "EdgeProcessor initialized");
        Ok(Self { config })
    }

    pub fn config(&self) -> &EdgeConfig {
        &self.config
    }

    /// Minimum buffer length for a frame of the given size, or `None` for
    /// invalid dimensions.
    pub fn expected_frame_size(width: i32, height: i32) -> Option<usize> {
        frame::expected_frame_size(width, height)
    }

    /// Process a single frame and return its edge map.
    ///
    /// # Arguments
    /// * `frame_data` - Luma plane followed by 4:2:0 chroma rows
    /// * `width` - Frame width in pixels
    /// * `height` - Frame height in pixels
    pub fn process_frame(&self, frame_data: &[u8], width: i32, height: i32) -> Result<EdgeMap> {
        self.process_frame_with_stats(frame_data, width, height)
            .map(|(edges, _)| edges)
    }

    /// Process a single frame and report per-stage timings.
    ///
    /// This is the hot path; nothing here outlives the call.
    pub fn process_frame_with_stats(
        &self,
        frame_data: &[u8],
        width: i32,
        height: i32,
    ) -> Result<(EdgeMap, ProcessingStats)> {
        let total_start = Instant::now();

        // === EXTRACTION ===
        let extract_start = Instant::now();
        let raw = RawFrame::new(frame_data, width, height).inspect_err(|e| {
            warn!(width, height, len = frame_data.len(), "rejected frame: {}", e);
        })?;
        let luma = raw.luma();
        let extract_us = extract_start.elapsed().as_micros() as u64;

        // === SMOOTHING ===
        let blur_start = Instant::now();
        let blurred = gaussian_blur(&luma, self.config.blur_kernel_size, self.config.blur_sigma)
            .inspect_err(|e| warn!("blur failed: {}", e))?;
        let blur_us = blur_start.elapsed().as_micros() as u64;

        // === EDGE DETECTION ===
        let canny_start = Instant::now();
        let edges = canny(
            &blurred,
            self.config.low_threshold,
            self.config.high_threshold,
        )
        .inspect_err(|e| warn!("edge detection failed: {}", e))?;
        let canny_us = canny_start.elapsed().as_micros() as u64;

        let edge_map = EdgeMap { image: edges };
        let stats = ProcessingStats {
            extract_us,
            blur_us,
            canny_us,
            total_us: total_start.elapsed().as_micros() as u64,
            frame_width: raw.width() as u32,
            frame_height: raw.height() as u32,
            edge_pixels: edge_map.edge_count() as u64,
        };

        debug!(
            resolution = %stats.resolution(),
            total_us = stats.total_us,
            edge_pixels = stats.edge_pixels,
            "processed frame"
        );

        Ok((edge_map, stats))
    }
}

impl Drop for EdgeProcessor {
    fn drop(&mut self) {
        info!("EdgeProcessor destroyed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EdgeError;

    fn nv21(width: usize, height: usize, luma: impl Fn(usize, usize) -> u8) -> Vec<u8> {
        let mut data = Vec::with_capacity(width * height * 3 / 2);
        for y in 0..height {
            for x in 0..width {
                data.push(luma(x, y));
            }
        }
        data.resize(width * height * 3 / 2, 128);
        data
    }

    #[test]
    fn test_processor_creation() {
        let processor = EdgeProcessor::new();
        assert_eq!(*processor.config(), EdgeConfig::default());
    }

    #[test]
    fn test_invalid_config() {
        let config = EdgeConfig {
            blur_kernel_size: 0,
            ..Default::default()
        };
        assert!(EdgeProcessor::with_config(config).is_err());
    }

    #[test]
    fn test_frame_size_calculation() {
        assert_eq!(
            EdgeProcessor::expected_frame_size(640, 480),
            Some(640 * 480 * 3 / 2)
        );
        assert_eq!(EdgeProcessor::expected_frame_size(0, 480), None);
    }

    #[test]
    fn test_black_frame_has_no_edges() {
        let processor = EdgeProcessor::new();
        let data = nv21(32, 24, |_, _| 0);
        let edges = processor.process_frame(&data, 32, 24).unwrap();
        assert_eq!(edges.as_bytes().len(), 32 * 24);
        assert_eq!(edges.edge_count(), 0);
    }

    #[test]
    fn test_stats_match_output() {
        let processor = EdgeProcessor::new();
        let data = nv21(40, 30, |x, _| if x < 20 { 0 } else { 255 });
        let (edges, stats) = processor.process_frame_with_stats(&data, 40, 30).unwrap();
        assert_eq!(stats.frame_width, 40);
        assert_eq!(stats.frame_height, 30);
        assert_eq!(stats.edge_pixels as usize, edges.edge_count());
        assert!(stats.edge_pixels > 0);
    }

    #[test]
    fn test_rejects_short_buffer() {
        let processor = EdgeProcessor::new();
        let data = vec![0u8; 10 * 10];
        let err = processor.process_frame(&data, 10, 10).unwrap_err();
        assert_eq!(
            err,
            EdgeError::BufferTooSmall {
                expected: 150,
                actual: 100
            }
        );
    }

    #[test]
    fn test_png_encoding() {
        let processor = EdgeProcessor::new();
        let data = nv21(16, 12, |x, _| if x < 8 { 0 } else { 255 });
        let edges = processor.process_frame(&data, 16, 12).unwrap();
        let png = edges.to_png().unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&png).unwrap().to_luma8();
        assert_eq!(decoded.dimensions(), (16, 12));
        assert_eq!(decoded.as_raw(), edges.as_bytes());
    }

    #[test]
    fn test_processor_is_shareable() {
        fn check<T: Send + Sync>() {}
        check::<EdgeProcessor>();
    }
}
