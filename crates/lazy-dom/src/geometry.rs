//! Geometry types

/// DOM rect
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DOMRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DOMRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn top(&self) -> f64 { self.y }
    pub fn left(&self) -> f64 { self.x }
    pub fn right(&self) -> f64 { self.x + self.width }
    pub fn bottom(&self) -> f64 { self.y + self.height }

    /// Calculate intersection with another rect.
    ///
    /// Edge-adjacent rects intersect with an empty rect, matching the
    /// intersection observer's notion of "intersecting".
    pub fn intersect(&self, other: &DOMRect) -> Option<DOMRect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right >= x && bottom >= y {
            Some(DOMRect {
                x,
                y,
                width: right - x,
                height: bottom - y,
            })
        } else {
            None
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Grow the rect by `margin` on every side
    pub fn inflate(&self, margin: f64) -> DOMRect {
        DOMRect {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + margin * 2.0,
            height: self.height + margin * 2.0,
        }
    }
}
