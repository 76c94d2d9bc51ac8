//! C-compatible FFI interface for EdgeProcessor
//!
//! This module exposes the frame pipeline through a C ABI so the camera
//! app's native bridge can hand over a captured frame and receive the edge
//! map back.
//!
//! # Memory Ownership Rules
//!
//! - `edge_processor_new()` allocates on Rust heap, caller owns pointer
//! - `edge_processor_free()` must be called to deallocate
//! - `EdgeResultC` and its buffers are owned by caller after return
//! - `edge_result_free()` must be called to deallocate results
//! - The input frame is only borrowed for the duration of the call
//!
//! # Thread Safety
//!
//! The processor holds no mutable state. Multiple threads can call
//! `edge_processor_process_frame` concurrently on the same processor.
//!
//! # Safety
//!
//! All public FFI functions handle null pointer checks internally.
//! The caller is responsible for passing valid pointers as documented.

use std::os::raw::c_char;
use std::ptr;

use edgeview_ffi_common::{borrow_slice, free_boxed_slice, free_cstring, vec_into_raw, FfiResult};
use tracing::warn;

use crate::error::EdgeError;
use crate::processor::EdgeProcessor;
use crate::types::ProcessingStats;

// Safety limit against runaway dimensions from the caller
const MAX_FRAME_SIZE: usize = 100_000_000; // 100MB max frame

/// Error code for failures detected at the boundary itself (null pointers,
/// oversized frames). Pipeline errors use [`crate::EdgeError::code`].
pub const EDGE_ERR_BOUNDARY: i32 = 5;

/// C-compatible processing statistics
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessingStatsC {
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
    /// Number of edge pixels in the output
    pub edge_pixels: u64,
}

impl From<ProcessingStats> for ProcessingStatsC {
    fn from(stats: ProcessingStats) -> Self {
        Self {
            extract_us: stats.extract_us,
            blur_us: stats.blur_us,
            canny_us: stats.canny_us,
            total_us: stats.total_us,
            frame_width: stats.frame_width,
            frame_height: stats.frame_height,
            edge_pixels: stats.edge_pixels,
        }
    }
}

/// C-compatible result wrapper for process_frame
///
/// `success == true` with an all-zero `data` means "no edges"; any failure
/// sets `success == false`, a non-zero `error_code` and a null `data`.
#[repr(C)]
pub struct EdgeResultC {
    /// True if operation succeeded
    pub success: bool,
    /// 0 on success; 1 invalid dimensions, 2 buffer too small,
    /// 3 allocation failure, 5 boundary error
    pub error_code: i32,
    /// Error message if success is false (owned, must be freed)
    pub error_msg: *mut c_char,
    /// Edge map bytes, `width * height` long (owned, freed with edge_result_free)
    pub data: *mut u8,
    /// Number of bytes in `data`
    pub data_len: usize,
    /// Edge map width in pixels
    pub width: u32,
    /// Edge map height in pixels
    pub height: u32,
    /// Processing statistics
    pub stats: ProcessingStatsC,
}

impl EdgeResultC {
    fn success(data: Vec<u8>, stats: ProcessingStats) -> Self {
        let (data_ptr, data_len) = vec_into_raw(data);

        Self {
            success: true,
            error_code: 0,
            error_msg: ptr::null_mut(),
            data: data_ptr,
            data_len,
            width: stats.frame_width,
            height: stats.frame_height,
            stats: stats.into(),
        }
    }
}

impl FfiResult for EdgeResultC {
    const ERROR_FALLBACK: &'static str = "unknown error";

    fn error_fields(error_code: i32, error_msg: *mut c_char) -> Self {
        Self {
            success: false,
            error_code,
            error_msg,
            data: ptr::null_mut(),
            data_len: 0,
            width: 0,
            height: 0,
            stats: ProcessingStatsC::default(),
        }
    }
}

// ============================================================================
// Processor Lifecycle
// ============================================================================

/// Create a new EdgeProcessor with the fixed camera pipeline parameters.
///
/// # Returns
/// Pointer to EdgeProcessor. Caller owns the pointer and must call
/// `edge_processor_free` to deallocate.
#[no_mangle]
pub extern "C" fn edge_processor_new() -> *mut EdgeProcessor {
    Box::into_raw(Box::new(EdgeProcessor::new()))
}

edgeview_ffi_common::define_engine_free!(edge_processor_free, EdgeProcessor);

/// Install the tracing subscriber. Safe to call more than once.
#[no_mangle]
pub extern "C" fn edge_init_logging() {
    crate::logging::init();
}

// ============================================================================
// Frame Processing
// ============================================================================

/// Process a single camera frame and return its edge map.
///
/// # Arguments
/// - `processor`: Valid EdgeProcessor pointer
/// - `frame_data`: Pointer to the 4:2:0 frame (luma plane then chroma)
/// - `frame_len`: Length of frame data in bytes
/// - `width`: Frame width in pixels
/// - `height`: Frame height in pixels
///
/// # Returns
/// EdgeResultC with the edge map. Caller must call `edge_result_free`.
///
/// # Safety
/// - `processor` must be valid
/// - `frame_data` must point to at least `frame_len` bytes that are not
///   modified or freed until this call returns
/// - Dimensions are validated before `frame_data` is touched, so a null
///   pointer with a zero width still reports invalid dimensions
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn edge_processor_process_frame(
    processor: *const EdgeProcessor,
    frame_data: *const u8,
    frame_len: usize,
    width: i32,
    height: i32,
) -> EdgeResultC {
    if processor.is_null() {
        return EdgeResultC::error(EDGE_ERR_BOUNDARY, "null processor pointer");
    }
    let Some(expected) = EdgeProcessor::expected_frame_size(width, height) else {
        let err = EdgeError::InvalidDimensions {
            width: width.into(),
            height: height.into(),
        };
        return EdgeResultC::error(err.code(), &err.to_string());
    };
    if expected > MAX_FRAME_SIZE {
        warn!(expected, "frame exceeds maximum size");
        return EdgeResultC::error(EDGE_ERR_BOUNDARY, "frame size exceeds maximum");
    }
    // Only the frame itself is read; trailing bytes of a larger buffer are ignored.
    let Some(frame) = (unsafe { borrow_slice(frame_data, frame_len.min(expected)) }) else {
        return EdgeResultC::error(EDGE_ERR_BOUNDARY, "null frame data pointer");
    };

    let processor = unsafe { &*processor };

    match processor.process_frame_with_stats(frame, width, height) {
        Ok((edges, stats)) => EdgeResultC::success(edges.into_bytes(), stats),
        Err(e) => EdgeResultC::error(e.code(), &e.to_string()),
    }
}

/// Free an EdgeResultC and all contained data.
///
/// # Safety
/// - `result` must be from `edge_processor_process_frame`
/// - `result` must not be used after this call
#[no_mangle]
pub extern "C" fn edge_result_free(result: EdgeResultC) {
    unsafe {
        free_cstring(result.error_msg);
        free_boxed_slice(result.data, result.data_len);
    }
}

// ============================================================================
// Utilities
// ============================================================================

/// Get the minimum frame length for the given dimensions.
///
/// # Returns
/// `width * height * 3 / 2`, or 0 for non-positive dimensions.
#[no_mangle]
pub extern "C" fn edge_expected_frame_size(width: i32, height: i32) -> usize {
    EdgeProcessor::expected_frame_size(width, height).unwrap_or(0)
}

edgeview_ffi_common::define_version_fn!(edge_processor_version);

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    fn error_message(result: &EdgeResultC) -> String {
        unsafe { CStr::from_ptr(result.error_msg) }
            .to_str()
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_processor_lifecycle() {
        let processor = edge_processor_new();
        assert!(!processor.is_null());
        edge_processor_free(processor);
    }

    #[test]
    fn test_free_null_processor() {
        edge_processor_free(ptr::null_mut());
    }

    #[test]
    fn test_null_processor_handling() {
        let data = vec![0u8; 24];
        let result = edge_processor_process_frame(ptr::null(), data.as_ptr(), data.len(), 4, 4);
        assert!(!result.success);
        assert_eq!(result.error_code, EDGE_ERR_BOUNDARY);
        assert!(result.data.is_null());
        edge_result_free(result);
    }

    #[test]
    fn test_null_frame_handling() {
        let processor = edge_processor_new();
        let result = edge_processor_process_frame(processor, ptr::null(), 24, 4, 4);
        assert!(!result.success);
        assert_eq!(error_message(&result), "null frame data pointer");
        edge_result_free(result);
        edge_processor_free(processor);
    }

    #[test]
    fn test_frame_processing() {
        let processor = edge_processor_new();

        let width = 64i32;
        let height = 48i32;
        let frame_data = vec![0u8; edge_expected_frame_size(width, height)];

        let result = edge_processor_process_frame(
            processor,
            frame_data.as_ptr(),
            frame_data.len(),
            width,
            height,
        );

        assert!(result.success);
        assert_eq!(result.error_code, 0);
        assert!(result.error_msg.is_null());
        assert_eq!(result.data_len, (width * height) as usize);
        assert_eq!(result.width, 64);
        assert_eq!(result.height, 48);
        assert_eq!(result.stats.edge_pixels, 0);

        let bytes = unsafe { std::slice::from_raw_parts(result.data, result.data_len) };
        assert!(bytes.iter().all(|&b| b == 0));

        edge_result_free(result);
        edge_processor_free(processor);
    }

    #[test]
    fn test_error_codes() {
        let processor = edge_processor_new();
        let frame_data = vec![0u8; 100];

        let result = edge_processor_process_frame(processor, frame_data.as_ptr(), 100, 0, 10);
        assert!(!result.success);
        assert_eq!(result.error_code, 1);
        edge_result_free(result);

        let result = edge_processor_process_frame(processor, frame_data.as_ptr(), 100, 10, 10);
        assert!(!result.success);
        assert_eq!(result.error_code, 2);
        assert_eq!(
            error_message(&result),
            "frame buffer too small: expected at least 150 bytes, got 100"
        );
        edge_result_free(result);

        edge_processor_free(processor);
    }

    #[test]
    fn test_oversized_frame_rejected() {
        let processor = edge_processor_new();
        let data = [0u8; 1];
        // 10000x10000 needs 150MB; rejected before the pointer is read
        let result =
            edge_processor_process_frame(processor, data.as_ptr(), data.len(), 10_000, 10_000);
        assert!(!result.success);
        assert_eq!(result.error_code, EDGE_ERR_BOUNDARY);
        assert_eq!(error_message(&result), "frame size exceeds maximum");
        edge_result_free(result);
        edge_processor_free(processor);
    }

    #[test]
    fn test_frame_inside_larger_buffer() {
        let processor = edge_processor_new();
        let data = vec![0u8; MAX_FRAME_SIZE + 1];

        let result = edge_processor_process_frame(processor, data.as_ptr(), data.len(), 64, 48);
        assert!(result.success);
        assert_eq!(result.data_len, 64 * 48);
        edge_result_free(result);

        let result = edge_processor_process_frame(processor, data.as_ptr(), data.len(), 0, 48);
        assert!(!result.success);
        assert_eq!(result.error_code, 1);
        edge_result_free(result);

        edge_processor_free(processor);
    }

    #[test]
    fn test_invalid_dimensions_reported_before_null_data() {
        let processor = edge_processor_new();

        let result = edge_processor_process_frame(processor, ptr::null(), 0, 0, 10);
        assert!(!result.success);
        assert_eq!(result.error_code, 1);
        assert_eq!(error_message(&result), "invalid frame dimensions 0x10");
        edge_result_free(result);

        let result = edge_processor_process_frame(processor, ptr::null(), 0, 10, -3);
        assert_eq!(result.error_code, 1);
        edge_result_free(result);

        edge_processor_free(processor);
    }

    #[test]
    fn test_expected_frame_size() {
        assert_eq!(edge_expected_frame_size(640, 480), 640 * 480 * 3 / 2);
        assert_eq!(edge_expected_frame_size(0, 480), 0);
        assert_eq!(edge_expected_frame_size(-640, 480), 0);
    }

    #[test]
    fn test_version() {
        let version = unsafe { CStr::from_ptr(edge_processor_version()) };
        assert_eq!(version.to_str().unwrap(), env!("CARGO_PKG_VERSION"));
    }
}
