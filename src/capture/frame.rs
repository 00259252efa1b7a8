//! Frame type representing a captured image with metadata.

/// An axis-aligned rectangle in frame pixel coordinates.
///
/// Used for both face bounding boxes and derived regions of interest.
/// Negative or zero extents mark a rectangle as empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    /// Left edge in pixels.
    pub x: i32,
    /// Top edge in pixels.
    pub y: i32,
    /// Width in pixels.
    pub w: i32,
    /// Height in pixels.
    pub h: i32,
}

impl Rect {
    /// Creates a new rectangle.
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Returns the area in pixels, zero for degenerate rectangles.
    #[inline]
    pub fn area(&self) -> i64 {
        (self.w.max(0) as i64) * (self.h.max(0) as i64)
    }

    /// Returns true if the rectangle has no interior.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Returns true if the rectangle lies fully inside a `width` x `height` frame.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        !self.is_empty()
            && self.x >= 0
            && self.y >= 0
            && (self.x as i64 + self.w as i64) <= width as i64
            && (self.y as i64 + self.h as i64) <= height as i64
    }
}

/// A single captured frame from the camera.
///
/// Holds interleaved RGB pixel data along with the metadata needed for
/// time-series accumulation and debugging. Timestamps are seconds since
/// the stream started, so consecutive frames from one source are
/// strictly increasing.
#[derive(Clone)]
pub struct Frame {
    /// Interleaved RGB pixel data (3 bytes per pixel).
    pixels: Vec<u8>,
    /// Frame width in pixels.
    width: u32,
    /// Frame height in pixels.
    height: u32,
    /// Capture timestamp in seconds since stream start.
    timestamp: f64,
    /// Monotonic sequence number.
    sequence: u64,
}

impl Frame {
    /// Creates a new frame with the given parameters.
    pub fn new(pixels: Vec<u8>, width: u32, height: u32, timestamp: f64, sequence: u64) -> Self {
        Self {
            pixels,
            width,
            height,
            timestamp,
            sequence,
        }
    }

    /// Creates a frame filled with a single RGB color.
    pub fn filled(width: u32, height: u32, color: [u8; 3], timestamp: f64, sequence: u64) -> Self {
        let mut pixels = Vec::with_capacity((width * height) as usize * 3);
        for _ in 0..(width * height) {
            pixels.extend_from_slice(&color);
        }
        Self::new(pixels, width, height, timestamp, sequence)
    }

    /// Returns a reference to the raw pixel data.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Returns the frame width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the frame height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the capture timestamp in seconds since stream start.
    #[inline]
    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    /// Returns the sequence number.
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Returns the total number of pixels (width * height).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Validates that the pixel buffer size matches dimensions.
    pub fn is_valid(&self) -> bool {
        self.pixels.len() == self.pixel_count() * 3
    }

    /// Returns a copy of the pixels inside `rect`, or `None` if the
    /// rectangle is empty or falls outside the frame.
    pub fn crop(&self, rect: Rect) -> Option<Frame> {
        if !rect.fits_within(self.width, self.height) || !self.is_valid() {
            return None;
        }
        let mut pixels = Vec::with_capacity((rect.w * rect.h) as usize * 3);
        for row in rect.y..rect.y + rect.h {
            let start = ((row as usize * self.width as usize) + rect.x as usize) * 3;
            let end = start + rect.w as usize * 3;
            pixels.extend_from_slice(&self.pixels[start..end]);
        }
        Some(Frame::new(
            pixels,
            rect.w as u32,
            rect.h as u32,
            self.timestamp,
            self.sequence,
        ))
    }

    /// Draws a one-pixel rectangle outline, clipped to the frame bounds.
    pub fn draw_rect(&mut self, rect: Rect, color: [u8; 3]) {
        if rect.is_empty() {
            return;
        }
        let (x0, y0) = (rect.x, rect.y);
        let (x1, y1) = (rect.x + rect.w - 1, rect.y + rect.h - 1);
        for x in x0..=x1 {
            self.put_pixel(x, y0, color);
            self.put_pixel(x, y1, color);
        }
        for y in y0..=y1 {
            self.put_pixel(x0, y, color);
            self.put_pixel(x1, y, color);
        }
    }

    fn put_pixel(&mut self, x: i32, y: i32, color: [u8; 3]) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = ((y as usize * self.width as usize) + x as usize) * 3;
        if idx + 3 <= self.pixels.len() {
            self.pixels[idx..idx + 3].copy_from_slice(&color);
        }
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("timestamp", &self.timestamp)
            .field("sequence", &self.sequence)
            .field("pixel_bytes", &self.pixels.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_creation() {
        let pixels = vec![0u8; 640 * 480 * 3];
        let frame = Frame::new(pixels, 640, 480, 0.0, 1);

        assert_eq!(frame.width(), 640);
        assert_eq!(frame.height(), 480);
        assert_eq!(frame.sequence(), 1);
        assert!(frame.is_valid());
    }

    #[test]
    fn test_frame_invalid_size() {
        let pixels = vec![0u8; 100]; // Wrong size
        let frame = Frame::new(pixels, 640, 480, 0.0, 1);

        assert!(!frame.is_valid());
    }

    #[test]
    fn test_crop_inside_bounds() {
        let frame = Frame::filled(10, 10, [7, 8, 9], 1.5, 3);
        let crop = frame.crop(Rect::new(2, 2, 4, 3)).unwrap();

        assert_eq!(crop.width(), 4);
        assert_eq!(crop.height(), 3);
        assert_eq!(crop.timestamp(), 1.5);
        assert!(crop.is_valid());
        assert!(crop.pixels().chunks(3).all(|p| p == [7, 8, 9]));
    }

    #[test]
    fn test_crop_out_of_bounds() {
        let frame = Frame::filled(10, 10, [0, 0, 0], 0.0, 1);
        assert!(frame.crop(Rect::new(8, 8, 4, 4)).is_none());
        assert!(frame.crop(Rect::new(0, 0, 0, 5)).is_none());
        assert!(frame.crop(Rect::new(-1, 0, 5, 5)).is_none());
    }

    #[test]
    fn test_draw_rect_clips() {
        let mut frame = Frame::filled(8, 8, [0, 0, 0], 0.0, 1);
        // Partially outside the frame, must not panic
        frame.draw_rect(Rect::new(-2, -2, 6, 6), [255, 0, 0]);
        assert_eq!(frame.pixels()[(3 * 8 + 3) * 3], 255); // corner at (3,3)
    }

    #[test]
    fn test_rect_area_and_empty() {
        assert_eq!(Rect::new(0, 0, 4, 5).area(), 20);
        assert_eq!(Rect::new(0, 0, -4, 5).area(), 0);
        assert!(Rect::new(0, 0, 0, 5).is_empty());
        assert!(!Rect::new(1, 1, 1, 1).is_empty());
    }
}
