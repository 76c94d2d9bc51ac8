//! Canny edge detection on a smoothed 8-bit plane.
//!
//! Stages:
//! 1. 3×3 Sobel derivatives with replicated borders and L1 magnitude
//!    `|gx| + |gy|`.
//! 2. Non-maximum suppression along the gradient direction quantized to
//!    0°, 45°, 90° and 135°. Neighbors outside the image count as zero.
//! 3. Dual-threshold hysteresis: magnitudes `<= low` are dropped, `> high`
//!    seed edges, and anything in between survives only when 8-connected to
//!    a seed through other surviving pixels.
//!
//! The output is binary: [`EDGE_MARKER`] on edges, [`NO_EDGE`] elsewhere.

use image::GrayImage;

use crate::error::{try_zeroed, EdgeError, Result};
use crate::types::{EDGE_MARKER, NO_EDGE};

const TAN_22_5_DEG: f32 = 0.414_213_57;
const TAN_67_5_DEG: f32 = 2.414_213_6;

/// Per-pixel Sobel derivatives and L1 magnitude.
pub(crate) struct Gradients {
    pub w: usize,
    pub h: usize,
    pub gx: Vec<i32>,
    pub gy: Vec<i32>,
    pub mag: Vec<i32>,
}

impl Gradients {
    #[inline]
    fn mag_at(&self, x: isize, y: isize) -> i32 {
        if x < 0 || y < 0 || x >= self.w as isize || y >= self.h as isize {
            0
        } else {
            self.mag[y as usize * self.w + x as usize]
        }
    }
}

#[derive(Clone, Copy, Default, PartialEq, Eq)]
enum Mark {
    #[default]
    None,
    Weak,
    Strong,
}

pub(crate) fn sobel_l1(image: &GrayImage) -> Result<Gradients> {
    let (w, h) = (image.width() as usize, image.height() as usize);
    let src = image.as_raw();
    let mut gx = try_zeroed::<i32>(w * h)?;
    let mut gy = try_zeroed::<i32>(w * h)?;
    let mut mag = try_zeroed::<i32>(w * h)?;

    for y in 0..h {
        let rows = [
            &src[y.saturating_sub(1) * w..][..w],
            &src[y * w..][..w],
            &src[(y + 1).min(h - 1) * w..][..w],
        ];
        for x in 0..w {
            let (l, r) = (x.saturating_sub(1), (x + 1).min(w - 1));
            let px = |row: usize, col: usize| rows[row][col] as i32;

            let dx = (px(0, r) + 2 * px(1, r) + px(2, r)) - (px(0, l) + 2 * px(1, l) + px(2, l));
            let dy = (px(2, l) + 2 * px(2, x) + px(2, r)) - (px(0, l) + 2 * px(0, x) + px(0, r));

            let idx = y * w + x;
            gx[idx] = dx;
            gy[idx] = dy;
            mag[idx] = dx.abs() + dy.abs();
        }
    }

    Ok(Gradients { w, h, gx, gy, mag })
}

/// Thin the magnitude field to local maxima and classify survivors against
/// the two thresholds.
fn non_maximum_suppression(grad: &Gradients, low: f32, high: f32) -> Result<Vec<Mark>> {
    let mut marks = try_zeroed::<Mark>(grad.w * grad.h)?;

    for y in 0..grad.h {
        for x in 0..grad.w {
            let idx = y * grad.w + x;
            let m = grad.mag[idx];
            if m as f32 <= low {
                continue;
            }

            let (dx, dy) = (grad.gx[idx], grad.gy[idx]);
            let ax = dx.abs() as f32;
            let ay = dy.abs() as f32;
            let (xi, yi) = (x as isize, y as isize);

            let is_max = if ay < ax * TAN_22_5_DEG {
                m > grad.mag_at(xi - 1, yi) && m >= grad.mag_at(xi + 1, yi)
            } else if ay > ax * TAN_67_5_DEG {
                m > grad.mag_at(xi, yi - 1) && m >= grad.mag_at(xi, yi + 1)
            } else {
                let s: isize = if (dx ^ dy) < 0 { -1 } else { 1 };
                m > grad.mag_at(xi - s, yi - 1) && m > grad.mag_at(xi + s, yi + 1)
            };

            if is_max {
                marks[idx] = if m as f32 > high {
                    Mark::Strong
                } else {
                    Mark::Weak
                };
            }
        }
    }

    Ok(marks)
}

/// Promote weak pixels reachable from strong ones and drop the rest.
fn hysteresis(marks: &mut [Mark], w: usize, h: usize) -> Result<()> {
    // Each pixel is pushed at most once, so this never reallocates.
    let mut stack: Vec<usize> = Vec::new();
    let bytes = marks.len().saturating_mul(std::mem::size_of::<usize>());
    stack
        .try_reserve_exact(marks.len())
        .map_err(EdgeError::allocation(bytes))?;
    stack.extend(
        marks
            .iter()
            .enumerate()
            .filter(|(_, m)| **m == Mark::Strong)
            .map(|(i, _)| i),
    );

    while let Some(idx) = stack.pop() {
        let (x, y) = ((idx % w) as isize, (idx / w) as isize);
        for ny in y - 1..=y + 1 {
            for nx in x - 1..=x + 1 {
                if nx < 0 || ny < 0 || nx >= w as isize || ny >= h as isize {
                    continue;
                }
                let n = ny as usize * w + nx as usize;
                if marks[n] == Mark::Weak {
                    marks[n] = Mark::Strong;
                    stack.push(n);
                }
            }
        }
    }

    Ok(())
}

/// Run Canny on `image` and return a binary edge plane of the same size.
pub fn canny(image: &GrayImage, low: f32, high: f32) -> Result<GrayImage> {
    let (w, h) = (image.width() as usize, image.height() as usize);
    if w == 0 || h == 0 {
        return Err(EdgeError::InvalidDimensions {
            width: w as i64,
            height: h as i64,
        });
    }

    let grad = sobel_l1(image)?;
    let mut marks = non_maximum_suppression(&grad, low, high)?;
    drop(grad);
    hysteresis(&mut marks, w, h)?;

    let mut out = try_zeroed::<u8>(w * h)?;
    for (px, mark) in out.iter_mut().zip(&marks) {
        *px = if *mark == Mark::Strong {
            EDGE_MARKER
        } else {
            NO_EDGE
        };
    }

    GrayImage::from_raw(w as u32, h as u32, out).ok_or(EdgeError::InvalidDimensions {
        width: w as i64,
        height: h as i64,
    })
}
