//! Error types for the frame edge pipeline

use std::collections::TryReserveError;

use thiserror::Error;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, EdgeError>;

/// Errors that can occur while processing a frame.
///
/// Every variant is raised before any output is produced; the pipeline never
/// returns a partial edge map.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EdgeError {
    /// Width or height is not strictly positive, or the frame size overflows
    #[error("invalid frame dimensions {width}x{height}")]
    InvalidDimensions { width: i64, height: i64 },

    /// Input buffer cannot hold the luma plane plus 4:2:0 chroma rows
    #[error("frame buffer too small: expected at least {expected} bytes, got {actual}")]
    BufferTooSmall { expected: usize, actual: usize },

    /// A per-call buffer could not be allocated
    #[error("failed to allocate {bytes} bytes")]
    AllocationFailure { bytes: usize },

    /// Pipeline parameters are out of range
    #[error("invalid edge configuration: {0}")]
    InvalidConfig(String),
}

impl EdgeError {
    /// Stable numeric code reported across the C ABI.
    pub fn code(&self) -> i32 {
        match self {
            EdgeError::InvalidDimensions { .. } => 1,
            EdgeError::BufferTooSmall { .. } => 2,
            EdgeError::AllocationFailure { .. } => 3,
            EdgeError::InvalidConfig(_) => 4,
        }
    }

    pub(crate) fn allocation(bytes: usize) -> impl FnOnce(TryReserveError) -> EdgeError {
        move |_| EdgeError::AllocationFailure { bytes }
    }
}

/// Allocate a zeroed byte buffer, surfacing allocator failure as an error.
pub(crate) fn try_zeroed<T: Copy + Default>(len: usize) -> Result<Vec<T>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(EdgeError::allocation(len.saturating_mul(std::mem::size_of::<T>())))?;
    buf.resize(len, T::default());
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_distinct() {
        let codes = [
            EdgeError::InvalidDimensions { width: 0, height: 1 }.code(),
            EdgeError::BufferTooSmall { expected: 6, actual: 4 }.code(),
            EdgeError::AllocationFailure { bytes: 1 }.code(),
            EdgeError::InvalidConfig("x".into()).code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            assert_ne!(*a, 0);
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_buffer_too_small_message() {
        let err = EdgeError::BufferTooSmall { expected: 150, actual: 100 };
        assert_eq!(
            err.to_string(),
            "frame buffer too small: expected at least 150 bytes, got 100"
        );
    }

    #[test]
    fn test_try_zeroed() {
        let buf: Vec<u8> = try_zeroed(16).unwrap();
        assert_eq!(buf.len(), 16);
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_try_zeroed_reports_allocation_failure() {
        let err = try_zeroed::<u8>(usize::MAX).unwrap_err();
        assert!(matches!(err, EdgeError::AllocationFailure { .. }));
    }
}
