//! Bounds-checked views over caller-owned 4:2:0 frames.
//!
//! A [`RawFrame`] can only be built through [`RawFrame::new`], which checks
//! the dimensions and the buffer length before any pixel is touched. The
//! [`LumaPlane`] it hands out borrows exactly the first `height` rows, so
//! chroma bytes are unreachable from the rest of the pipeline.

use crate::error::{EdgeError, Result};

/// Minimum byte length of a 4:2:0 frame: full-resolution luma plus
/// half-resolution interleaved chroma.
///
/// Returns `None` when the dimensions are not strictly positive or the size
/// overflows `usize`.
pub fn expected_frame_size(width: i32, height: i32) -> Option<usize> {
    if width <= 0 || height <= 0 {
        return None;
    }
    let pixels = (width as usize).checked_mul(height as usize)?;
    pixels.checked_mul(3).map(|n| n / 2)
}

/// Immutable view over one caller-owned 4:2:0 frame.
#[derive(Debug, Clone, Copy)]
pub struct RawFrame<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
}

impl<'a> RawFrame<'a> {
    /// Validate `width`/`height` and the buffer length, then wrap `data`.
    ///
    /// Dimensions are checked first so an invalid size never leads to a
    /// length computation against the buffer.
    pub fn new(data: &'a [u8], width: i32, height: i32) -> Result<Self> {
        let expected = expected_frame_size(width, height).ok_or(EdgeError::InvalidDimensions {
            width: width.into(),
            height: height.into(),
        })?;
        if data.len() < expected {
            return Err(EdgeError::BufferTooSmall {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width: width as usize,
            height: height as usize,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of chroma rows following the luma plane.
    pub fn chroma_rows(&self) -> usize {
        self.height / 2
    }

    /// The top `height` rows as a single-channel plane.
    pub fn luma(&self) -> LumaPlane<'a> {
        LumaPlane {
            data: &self.data[..self.width * self.height],
            width: self.width,
            height: self.height,
        }
    }
}

/// Borrowed single-channel 8-bit plane, row-major with `stride == width`.
#[derive(Debug, Clone, Copy)]
pub struct LumaPlane<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
}

impl<'a> LumaPlane<'a> {
    /// Wrap a tightly packed grayscale buffer. Used for planes that did not
    /// come from a 4:2:0 frame (tests, already-extracted luma).
    pub fn from_gray(data: &'a [u8], width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(EdgeError::InvalidDimensions {
                width: width as i64,
                height: height as i64,
            });
        }
        let expected = width.checked_mul(height).ok_or(EdgeError::InvalidDimensions {
            width: width as i64,
            height: height as i64,
        })?;
        if data.len() < expected {
            return Err(EdgeError::BufferTooSmall {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data: &data[..expected],
            width,
            height,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn row(&self, y: usize) -> &'a [u8] {
        let start = y * self.width;
        &self.data[start..start + self.width]
    }

    pub fn as_slice(&self) -> &'a [u8] {
        self.data
    }
}
