//! Separable Gaussian smoothing for 8-bit planes.
//!
//! - Builds a normalized 1D kernel of odd length from `sigma`.
//! - Convolves rows then columns with reflect-101 borders (`dcb|abcd|cba`).
//! - Keeps the horizontal pass in `f32` and rounds once at the end, saturating
//!   to `u8`, so uniform regions stay exactly uniform.
//!
//! Complexity: O(W·H·K) per frame; memory: one float buffer + one byte plane.

use image::GrayImage;

use crate::error::{try_zeroed, EdgeError, Result};
use crate::frame::LumaPlane;

/// Normalized Gaussian taps `exp(-(i - r)^2 / 2σ²)` for `i in 0..size`.
pub fn gaussian_kernel(size: usize, sigma: f32) -> Vec<f32> {
    let radius = (size / 2) as f32;
    let denom = 2.0 * sigma * sigma;
    let mut taps: Vec<f32> = (0..size)
        .map(|i| {
            let d = i as f32 - radius;
            (-(d * d) / denom).exp()
        })
        .collect();
    let sum: f32 = taps.iter().sum();
    for t in &mut taps {
        *t /= sum;
    }
    taps
}

/// Map a possibly out-of-range index onto `0..n` with reflect-101 borders.
#[inline]
pub(crate) fn reflect_101(i: isize, n: usize) -> usize {
    if n == 1 {
        return 0;
    }
    let period = 2 * (n as isize - 1);
    let wrapped = i.rem_euclid(period);
    if wrapped >= n as isize {
        (period - wrapped) as usize
    } else {
        wrapped as usize
    }
}

/// Blur `plane` with a `size`×`size` Gaussian of standard deviation `sigma`.
pub fn gaussian_blur(plane: &LumaPlane<'_>, size: usize, sigma: f32) -> Result<GrayImage> {
    debug_assert!(size % 2 == 1, "kernel size must be odd");
    let w = plane.width();
    let h = plane.height();
    let kernel = gaussian_kernel(size, sigma);
    let radius = (size / 2) as isize;

    let mut horizontal: Vec<f32> = try_zeroed(w * h)?;
    let mut out: Vec<u8> = try_zeroed(w * h)?;

    // Column indices are the same for every row.
    let mut taps_x: Vec<usize> = try_zeroed(w * size)?;
    for (i, tap) in taps_x.iter_mut().enumerate() {
        let (x, k) = ((i / size) as isize, (i % size) as isize - radius);
        *tap = reflect_101(x + k, w);
    }
    let mut rows: Vec<usize> = try_zeroed(size)?;

    for y in 0..h {
        let src = plane.row(y);
        let dst = &mut horizontal[y * w..(y + 1) * w];
        for (x, px) in dst.iter_mut().enumerate() {
            let idx = &taps_x[x * size..(x + 1) * size];
            *px = idx
                .iter()
                .zip(&kernel)
                .map(|(&i, &k)| src[i] as f32 * k)
                .sum();
        }
    }

    for y in 0..h {
        for (k, row) in (-radius..=radius).zip(rows.iter_mut()) {
            *row = reflect_101(y as isize + k, h);
        }
        let dst = &mut out[y * w..(y + 1) * w];
        for (x, px) in dst.iter_mut().enumerate() {
            let v: f32 = rows
                .iter()
                .zip(&kernel)
                .map(|(&r, &k)| horizontal[r * w + x] * k)
                .sum();
            *px = v.round().clamp(0.0, 255.0) as u8;
        }
    }

    GrayImage::from_raw(w as u32, h as u32, out).ok_or(EdgeError::InvalidDimensions {
        width: w as i64,
        height: h as i64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_is_normalized_and_symmetric() {
        let k = gaussian_kernel(5, 1.5);
        assert_eq!(k.len(), 5);
        let sum: f32 = k.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!((k[0] - k[4]).abs() < 1e-7);
        assert!((k[1] - k[3]).abs() < 1e-7);
        assert!(k[2] > k[1] && k[1] > k[0]);
    }

    #[test]
    fn test_kernel_values_sigma_1_5() {
        // exp(-4/4.5), exp(-1/4.5), 1 normalized
        let k = gaussian_kernel(5, 1.5);
        assert!((k[0] - 0.1201).abs() < 1e-3);
        assert!((k[1] - 0.2339).abs() < 1e-3);
        assert!((k[2] - 0.2921).abs() < 1e-3);
    }

    #[test]
    fn test_reflect_101() {
        assert_eq!(reflect_101(-1, 5), 1);
        assert_eq!(reflect_101(-2, 5), 2);
        assert_eq!(reflect_101(5, 5), 3);
        assert_eq!(reflect_101(6, 5), 2);
        assert_eq!(reflect_101(2, 5), 2);
        assert_eq!(reflect_101(-2, 2), 0);
        assert_eq!(reflect_101(3, 1), 0);
    }

    #[test]
    fn test_uniform_plane_unchanged() {
        for value in [0u8, 77, 255] {
            let data = vec![value; 12 * 9];
            let plane = LumaPlane::from_gray(&data, 12, 9).unwrap();
            let blurred = gaussian_blur(&plane, 5, 1.5).unwrap();
            assert!(blurred.as_raw().iter().all(|&b| b == value));
        }
    }

    #[test]
    fn test_impulse_spreads_symmetrically() {
        let mut data = vec![0u8; 9 * 9];
        data[4 * 9 + 4] = 255;
        let plane = LumaPlane::from_gray(&data, 9, 9).unwrap();
        let blurred = gaussian_blur(&plane, 5, 1.5).unwrap();

        let center = blurred.get_pixel(4, 4)[0];
        assert!(center > 0 && center < 255);
        assert_eq!(blurred.get_pixel(3, 4)[0], blurred.get_pixel(5, 4)[0]);
        assert_eq!(blurred.get_pixel(4, 3)[0], blurred.get_pixel(4, 5)[0]);
        // outside the 5x5 support
        assert_eq!(blurred.get_pixel(1, 4)[0], 0);
        assert_eq!(blurred.get_pixel(4, 7)[0], 0);
    }

    #[test]
    fn test_tiny_plane() {
        let data = [10u8, 20];
        let plane = LumaPlane::from_gray(&data, 2, 1).unwrap();
        let blurred = gaussian_blur(&plane, 5, 1.5).unwrap();
        assert_eq!(blurred.dimensions(), (2, 1));
    }
}
