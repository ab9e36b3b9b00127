//! Rectangle type for UI layout

/// A rectangle defined by position and size
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Create from screen dimensions
    pub fn screen(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.w * 0.5
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.h * 0.5
    }

    /// Check if point is inside
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Shrink by padding on all sides
    pub fn pad(&self, padding: f32) -> Self {
        Self::new(
            self.x + padding,
            self.y + padding,
            (self.w - padding * 2.0).max(0.0),
            (self.h - padding * 2.0).max(0.0),
        )
    }

    /// Get a horizontal slice from the bottom
    pub fn slice_bottom(&self, height: f32) -> Self {
        let h = height.min(self.h);
        Self::new(self.x, self.bottom() - h, self.w, h)
    }

    /// Get remaining area after slicing bottom
    pub fn remaining_after_bottom(&self, height: f32) -> Self {
        let h = height.min(self.h);
        Self::new(self.x, self.y, self.w, self.h - h)
    }

    /// Get a vertical slice from the right
    pub fn slice_right(&self, width: f32) -> Self {
        let w = width.min(self.w);
        Self::new(self.right() - w, self.y, w, self.h)
    }

    /// Largest rect with the given aspect ratio (w / h), centered inside
    pub fn fit_aspect(&self, aspect: f32) -> Self {
        if self.h <= 0.0 || aspect <= 0.0 {
            return *self;
        }
        if self.w / self.h > aspect {
            let w = self.h * aspect;
            Self::new(self.x + (self.w - w) * 0.5, self.y, w, self.h)
        } else {
            let h = self.w / aspect;
            Self::new(self.x, self.y + (self.h - h) * 0.5, self.w, h)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert!(r.contains(50.0, 40.0));
        assert!(!r.contains(5.0, 40.0));
        assert!(!r.contains(50.0, 100.0));
    }

    #[test]
    fn test_slices() {
        let r = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert_eq!(r.slice_bottom(10.0), Rect::new(0.0, 40.0, 100.0, 10.0));
        assert_eq!(r.remaining_after_bottom(10.0), Rect::new(0.0, 0.0, 100.0, 40.0));
        assert_eq!(r.slice_right(30.0), Rect::new(70.0, 0.0, 30.0, 50.0));
    }

    #[test]
    fn test_fit_aspect_letterboxes() {
        let wide = Rect::new(0.0, 0.0, 200.0, 100.0).fit_aspect(1.0);
        assert_eq!(wide, Rect::new(50.0, 0.0, 100.0, 100.0));
        let tall = Rect::new(0.0, 0.0, 100.0, 200.0).fit_aspect(1.0);
        assert_eq!(tall, Rect::new(0.0, 50.0, 100.0, 100.0));
    }
}
