use super::Vec2;

/// Rectangle in logical pixels, stored as top-left corner plus size.
///
/// Sizes may be negative; containment tests go through [`Rect::normalized`].
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { origin: Vec2::new(x, y), size: Vec2::new(w, h) }
    }

    #[inline]
    pub const fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Bottom-right corner.
    #[inline]
    pub fn max(self) -> Vec2 {
        self.origin + self.size
    }

    /// Zero or negative area.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    #[inline]
    pub fn translated(self, delta: Vec2) -> Self {
        Self { origin: self.origin + delta, size: self.size }
    }

    /// Same area with the origin moved so both sides are non-negative.
    pub fn normalized(self) -> Self {
        let (x, w) = if self.size.x < 0.0 {
            (self.origin.x + self.size.x, -self.size.x)
        } else {
            (self.origin.x, self.size.x)
        };
        let (y, h) = if self.size.y < 0.0 {
            (self.origin.y + self.size.y, -self.size.y)
        } else {
            (self.origin.y, self.size.y)
        };
        Rect::new(x, y, w, h)
    }

    /// Hit test with every edge counted as inside.
    #[inline]
    pub fn contains_inclusive(self, p: Vec2) -> bool {
        let r = self.normalized();
        let max = r.max();
        (r.origin.x..=max.x).contains(&p.x) && (r.origin.y..=max.y).contains(&p.y)
    }
}
