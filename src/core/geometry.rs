//! Screen-space rectangles for hit-testing.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle given by its centre and unscaled size.
///
/// Layout code writes `center` and `scale`; the base size is fixed when the
/// card is created.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub center_x: f32,
    pub center_y: f32,
    pub width: f32,
    pub height: f32,
    pub scale: f32,
}

impl Bounds {
    /// Unit-scale bounds centred at the origin.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            center_x: 0.0,
            center_y: 0.0,
            width,
            height,
            scale: 1.0,
        }
    }

    #[must_use]
    pub fn scaled_width(&self) -> f32 {
        self.width * self.scale
    }

    #[must_use]
    pub fn scaled_height(&self) -> f32 {
        self.height * self.scale
    }

    #[must_use]
    pub fn left(&self) -> f32 {
        self.center_x - self.scaled_width() / 2.0
    }

    #[must_use]
    pub fn top(&self) -> f32 {
        self.center_y - self.scaled_height() / 2.0
    }

    /// Inclusive point test: points on the edge are inside.
    #[must_use]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        let left = self.left();
        let top = self.top();
        x >= left && x <= left + self.scaled_width() && y >= top && y <= top + self.scaled_height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_centered() {
        let bounds = Bounds::new(48.0, 72.0);

        assert!(bounds.contains(0.0, 0.0));
        assert!(bounds.contains(24.0, 36.0));
        assert!(bounds.contains(-24.0, -36.0));
        assert!(!bounds.contains(24.5, 0.0));
        assert!(!bounds.contains(0.0, -36.5));
    }

    #[test]
    fn test_contains_scaled_and_moved() {
        let bounds = Bounds {
            center_x: 100.0,
            center_y: 200.0,
            scale: 2.0,
            ..Bounds::new(48.0, 72.0)
        };

        assert_eq!(bounds.left(), 52.0);
        assert_eq!(bounds.top(), 128.0);
        assert!(bounds.contains(147.0, 271.0));
        assert!(!bounds.contains(149.0, 200.0));
    }
}
