use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in pixel coordinates. `x` and `y` give the top left corner and the
/// right and bottom edges are exclusive, so a 1x1 rect at (3, 4) covers exactly the pixel (3, 4).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    #[must_use]
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    // Edges are widened to i64 so that expanding or merging rects near the ends of the
    // i32 range cannot overflow.
    fn from_edges(left: i64, top: i64, right: i64, bottom: i64) -> Self {
        let clamp_coord = |v: i64| v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
        let clamp_len = |v: i64| v.clamp(0, i64::from(u32::MAX)) as u32;

        let x = clamp_coord(left);
        let y = clamp_coord(top);
        Self {
            x,
            y,
            width: clamp_len(right - i64::from(x)),
            height: clamp_len(bottom - i64::from(y)),
        }
    }

    pub fn left(&self) -> i64 {
        i64::from(self.x)
    }

    pub fn top(&self) -> i64 {
        i64::from(self.y)
    }

    pub fn right(&self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    pub fn bottom(&self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// The smallest rect that encloses both `self` and `other`.
    #[must_use]
    pub fn merged(&self, other: &Self) -> Self {
        Self::from_edges(
            self.left().min(other.left()),
            self.top().min(other.top()),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// This rect grown by `dist` pixels on every side.
    #[must_use]
    pub fn expanded(&self, dist: u32) -> Self {
        let d = i64::from(dist);
        Self::from_edges(
            self.left() - d,
            self.top() - d,
            self.right() + d,
            self.bottom() + d,
        )
    }

    /// True if the gap between the two rects is at most `dist` pixels on both axes. Touching or
    /// overlapping rects are always near, whatever `dist` is.
    ///
    /// Equivalent to expanding `self` by `dist` on every side and checking whether the expanded
    /// rect overlaps or touches `other`, so the test is symmetric in `self` and `other`.
    pub fn is_near(&self, other: &Self, dist: u32) -> bool {
        let d = i64::from(dist);

        let near_x = self.left() - d <= other.right() && other.left() <= self.right() + d;
        let near_y = self.top() - d <= other.bottom() && other.top() <= self.bottom() + d;

        near_x && near_y
    }

    /// True if the rects share at least one pixel.
    pub fn intersects(&self, other: &Self) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// True if every pixel of `other` is also in `self`.
    pub fn contains(&self, other: &Self) -> bool {
        self.left() <= other.left()
            && other.right() <= self.right()
            && self.top() <= other.top()
            && other.bottom() <= self.bottom()
    }
}
