use crate::foundation::error::{VeneerError, VeneerResult};

/// Pixel dimensions of a decoded image or synthesis surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    /// Construct validated dimensions. Zero on either axis is rejected so later
    /// ratio math can never divide by zero.
    pub fn new(width: u32, height: u32) -> VeneerResult<Self> {
        if width == 0 || height == 0 {
            return Err(VeneerError::validation("image dimensions must be > 0"));
        }
        Ok(Self { width, height })
    }

    pub fn min_dim(self) -> u32 {
        self.width.min(self.height)
    }

    pub fn max_dim(self) -> u32 {
        self.width.max(self.height)
    }

    /// Orientation-independent aspect ratio: `max(w/h, h/w)`, always >= 1.
    pub fn aspect_ratio(self) -> f64 {
        let w = f64::from(self.width);
        let h = f64::from(self.height);
        (w / h).max(h / w)
    }

    pub fn is_square(self) -> bool {
        self.width == self.height
    }

    pub fn pixel_count(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Integer pixel rectangle, origin top-left, end-exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RectPx {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl RectPx {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(self) -> u32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(self) -> u32 {
        self.y.saturating_add(self.height)
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn contains(self, x: u32, y: u32) -> bool {
        self.x <= x && x < self.right() && self.y <= y && y < self.bottom()
    }

    /// Clip the rectangle to a surface of the given size.
    pub fn clipped_to(self, size: PixelSize) -> RectPx {
        let x = self.x.min(size.width);
        let y = self.y.min(size.height);
        let right = self.right().min(size.width);
        let bottom = self.bottom().min(size.height);
        RectPx {
            x,
            y,
            width: right - x,
            height: bottom - y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_size_rejects_zero_dims() {
        assert!(PixelSize::new(0, 10).is_err());
        assert!(PixelSize::new(10, 0).is_err());
        assert!(PixelSize::new(1, 1).is_ok());
    }

    #[test]
    fn aspect_ratio_is_orientation_independent() {
        let wide = PixelSize::new(2000, 50).unwrap();
        let tall = PixelSize::new(50, 2000).unwrap();
        assert_eq!(wide.aspect_ratio(), tall.aspect_ratio());
        assert!(wide.aspect_ratio() >= 1.0);

        let square = PixelSize::new(640, 640).unwrap();
        assert_eq!(square.aspect_ratio(), 1.0);
    }

    #[test]
    fn rect_clips_to_surface() {
        let size = PixelSize::new(100, 50).unwrap();
        let r = RectPx::new(60, 10, 80, 80).clipped_to(size);
        assert_eq!(r, RectPx::new(60, 10, 40, 40));

        let outside = RectPx::new(200, 200, 5, 5).clipped_to(size);
        assert!(outside.is_empty());
    }

    #[test]
    fn rect_contains_is_end_exclusive() {
        let r = RectPx::new(2, 2, 3, 3);
        assert!(r.contains(2, 2));
        assert!(r.contains(4, 4));
        assert!(!r.contains(5, 5));
    }
}
