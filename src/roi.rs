//! Forehead region-of-interest extraction.
//!
//! The forehead band carries the strongest photoplethysmographic signal
//! on a frontal face. Its rectangle is derived from the face box by
//! fixed fractional offsets, and all pixels inside it are reduced to a
//! single intensity scalar per frame.

use crate::capture::{Frame, Rect};
use thiserror::Error;

/// Horizontal center of the forehead, as a fraction of face width.
pub const FOREHEAD_FX: f64 = 0.5;
/// Vertical center of the forehead, as a fraction of face height.
pub const FOREHEAD_FY: f64 = 0.18;
/// Forehead width as a fraction of face width.
pub const FOREHEAD_FW: f64 = 0.25;
/// Forehead height as a fraction of face height.
pub const FOREHEAD_FH: f64 = 0.15;

/// Errors from region extraction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoiError {
    /// The region has zero width or height.
    #[error("degenerate region: {0:?}")]
    Degenerate(Rect),
    /// The region does not fit inside the frame.
    #[error("region {rect:?} outside {width}x{height} frame")]
    OutOfBounds {
        rect: Rect,
        width: u32,
        height: u32,
    },
}

/// Derives a sub-rectangle from a face box by fractional offsets.
///
/// `(fx, fy)` place the sub-rectangle's center relative to the face
/// origin; `(fw, fh)` size it relative to the face extents. Every
/// coordinate is truncated toward zero.
pub fn forehead_box(face: Rect, fx: f64, fy: f64, fw: f64, fh: f64) -> Rect {
    let (w, h) = (face.w as f64, face.h as f64);
    Rect::new(
        (face.x as f64 + w * fx - (w * fw) / 2.0) as i32,
        (face.y as f64 + h * fy - (h * fh) / 2.0) as i32,
        (w * fw) as i32,
        (h * fh) as i32,
    )
}

/// Derives the forehead box using the default fractional offsets.
pub fn default_forehead_box(face: Rect) -> Rect {
    forehead_box(face, FOREHEAD_FX, FOREHEAD_FY, FOREHEAD_FW, FOREHEAD_FH)
}

/// Averages pixel values over all color channels and pixels in `rect`.
///
/// On a spatially uniform region this equals the uniform value exactly.
/// A degenerate or out-of-bounds rectangle is a signaled failure; the
/// caller skips that frame's sample rather than reading out of bounds.
pub fn mean_intensity(frame: &Frame, rect: Rect) -> Result<f64, RoiError> {
    if rect.is_empty() {
        return Err(RoiError::Degenerate(rect));
    }
    if !rect.fits_within(frame.width(), frame.height()) || !frame.is_valid() {
        return Err(RoiError::OutOfBounds {
            rect,
            width: frame.width(),
            height: frame.height(),
        });
    }

    let pixels = frame.pixels();
    let width = frame.width() as usize;
    let mut sum = 0u64;
    for row in rect.y..rect.y + rect.h {
        let start = (row as usize * width + rect.x as usize) * 3;
        let end = start + rect.w as usize * 3;
        sum += pixels[start..end].iter().map(|&p| p as u64).sum::<u64>();
    }

    let count = (rect.area() * 3) as f64;
    Ok(sum as f64 / count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forehead_box_reference_face() {
        // Face at (10,10) sized 50x50 with the default offsets
        let face = Rect::new(10, 10, 50, 50);
        let forehead = forehead_box(face, 0.5, 0.18, 0.25, 0.15);
        assert_eq!(forehead, Rect::new(28, 15, 12, 7));
    }

    #[test]
    fn test_default_offsets_match_explicit() {
        let face = Rect::new(10, 10, 50, 50);
        assert_eq!(
            default_forehead_box(face),
            forehead_box(face, 0.5, 0.18, 0.25, 0.15)
        );
    }

    #[test]
    fn test_mean_intensity_uniform_exact() {
        let frame = Frame::filled(100, 100, [128; 3], 0.0, 1);
        let mean = mean_intensity(&frame, Rect::new(20, 20, 10, 10)).unwrap();
        assert_eq!(mean, 128.0);
    }

    #[test]
    fn test_mean_intensity_mixed_channels() {
        // Uniform per-channel values average across channels
        let frame = Frame::filled(10, 10, [30, 60, 90], 0.0, 1);
        let mean = mean_intensity(&frame, Rect::new(0, 0, 10, 10)).unwrap();
        assert_eq!(mean, 60.0);
    }

    #[test]
    fn test_degenerate_box_rejected() {
        let frame = Frame::filled(10, 10, [0; 3], 0.0, 1);
        assert!(matches!(
            mean_intensity(&frame, Rect::new(2, 2, 0, 5)),
            Err(RoiError::Degenerate(_))
        ));
    }

    #[test]
    fn test_out_of_bounds_box_rejected() {
        let frame = Frame::filled(10, 10, [0; 3], 0.0, 1);
        assert!(matches!(
            mean_intensity(&frame, Rect::new(8, 8, 5, 5)),
            Err(RoiError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_forehead_inside_reasonable_face() {
        let face = Rect::new(200, 120, 240, 240);
        let forehead = default_forehead_box(face);
        assert!(!forehead.is_empty());
        assert!(forehead.x > face.x && forehead.y > face.y);
        assert!(forehead.x + forehead.w < face.x + face.w);
    }
}
