//! Core types for frame edge processing
//!
//! These types are used internally and converted to C-compatible
//! types in the FFI layer.

use serde::Serialize;

use crate::error::{EdgeError, Result};

/// Output byte for a pixel on an edge.
pub const EDGE_MARKER: u8 = 255;

/// Output byte for a pixel off any edge.
pub const NO_EDGE: u8 = 0;

/// Pipeline parameters.
///
/// The camera boundary always runs with [`EdgeConfig::default`]; other values
/// are only reachable from Rust callers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeConfig {
    /// Gaussian kernel side length (odd)
    pub blur_kernel_size: usize,
    /// Gaussian standard deviation, shared by both axes
    pub blur_sigma: f32,
    /// Gradient magnitudes at or below this are discarded
    pub low_threshold: f32,
    /// Gradient magnitudes above this seed edges
    pub high_threshold: f32,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            blur_kernel_size: 5,
            blur_sigma: 1.5,
            low_threshold: 50.0,
            high_threshold: 150.0,
        }
    }
}

impl EdgeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.blur_kernel_size == 0 || self.blur_kernel_size % 2 == 0 {
            return Err(EdgeError::InvalidConfig(format!(
                "blur_kernel_size must be odd and positive, got {}",
                self.blur_kernel_size
            )));
        }
        if !(self.blur_sigma.is_finite() && self.blur_sigma > 0.0) {
            return Err(EdgeError::InvalidConfig(format!(
                "blur_sigma must be positive, got {}",
                self.blur_sigma
            )));
        }
        if !(self.low_threshold >= 0.0 && self.low_threshold <= self.high_threshold) {
            return Err(EdgeError::InvalidConfig(format!(
                "thresholds must satisfy 0 <= low <= high, got {}/{}",
                self.low_threshold, self.high_threshold
            )));
        }
        Ok(())
    }
}

/// Processing statistics for performance monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingStats {
    /// Validation and luma view construction (microseconds)
    pub extract_us: u64,
    /// Gaussian smoothing (microseconds)
    pub blur_us: u64,
    /// Canny edge detection (microseconds)
    pub canny_us: u64,
    /// Total processing time (microseconds)
    pub total_us: u64,
    /// Frame width processed
    pub frame_width: u32,
    /// Frame height processed
    pub frame_height: u32,
    /// Number of output pixels marked as edges
    pub edge_pixels: u64,
}

impl ProcessingStats {
    /// Resolution as shown by the viewer, e.g. `640x480`.
    pub fn resolution(&self) -> String {
        format!("{}x{}", self.frame_width, self.frame_height)
    }

    /// Total processing time in milliseconds.
    pub fn processing_ms(&self) -> f64 {
        self.total_us as f64 / 1000.0
    }
}
