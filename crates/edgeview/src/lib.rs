//! Edgeview Frame Processing Library
//!
//! Turns camera frames into binary edge maps for live display.
//! Designed to be loaded by the camera app as a shared library and called
//! once per captured frame.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌───────────┐     ┌──────────┐     ┌─────────┐
//! │ NV21 frame   │────▶│ LumaPlane │────▶│ Gaussian │────▶│ Canny   │──▶ EdgeMap
//! │ (raw bytes)  │     │ (view)    │     │ 5x5 σ1.5 │     │ 50/150  │   (w*h bytes)
//! └──────────────┘     └───────────┘     └──────────┘     └─────────┘
//! ```
//!
//! ## Usage
//!
//! ```
//! use edgeview::EdgeProcessor;
//!
//! let (width, height) = (64, 48);
//! let frame = vec![0u8; width * height * 3 / 2];
//!
//! let processor = EdgeProcessor::new();
//! let edges = processor.process_frame(&frame, width as i32, height as i32).unwrap();
//! assert_eq!(edges.into_bytes().len(), width * height);
//! ```
//!
//! ## Memory Ownership
//!
//! - The input frame is borrowed for one call and never retained
//! - The returned `EdgeMap` is freshly allocated and owned by the caller
//! - Across the C ABI, results must be released with `edge_result_free()`

pub mod blur;
pub mod canny;
pub mod error;
pub mod ffi;
pub mod frame;
pub mod logging;
pub mod processor;
pub mod types;

// Re-export main types
pub use error::{EdgeError, Result};
pub use frame::{expected_frame_size, LumaPlane, RawFrame};
pub use processor::{EdgeMap, EdgeProcessor};
pub use types::{EdgeConfig, ProcessingStats, EDGE_MARKER, NO_EDGE};

// Re-export FFI types for C consumers
pub use ffi::{EdgeResultC, ProcessingStatsC};
