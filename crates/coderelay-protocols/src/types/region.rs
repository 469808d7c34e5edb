//! Screen capture rectangle.

use serde::{Deserialize, Serialize};

/// A rectangle in absolute screen coordinates.
///
/// `right` and `bottom` are exclusive, so the region always covers at least
/// one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureRegion {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl CaptureRegion {
    /// Build a region from two opposite corners given in any order.
    ///
    /// Returns `None` when the corners describe a zero-width or zero-height
    /// rectangle.
    pub fn from_corners(x1: i32, y1: i32, x2: i32, y2: i32) -> Option<Self> {
        let region = Self {
            left: x1.min(x2),
            top: y1.min(y2),
            right: x1.max(x2),
            bottom: y1.max(y2),
        };
        if region.width() == 0 || region.height() == 0 {
            return None;
        }
        Some(region)
    }

    pub fn width(&self) -> u32 {
        self.right.abs_diff(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.abs_diff(self.top)
    }

    /// Corners as `[left, top, right, bottom]`.
    pub fn to_array(&self) -> [i32; 4] {
        [self.left, self.top, self.right, self.bottom]
    }
}

impl std::fmt::Display for CaptureRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.left, self.top, self.right, self.bottom
        )
    }
}

#[cfg(test)]
#[path = "region_tests.rs"]
mod tests;
