use glam::Vec2;

/// Axis-aligned box used both for probing rectangles and collider extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub center: Vec2,
    pub half_width: f32,
    pub half_height: f32,
}

impl Bounds {
    /// Probing rectangle of an object at `pos`.
    ///
    /// Effective size is `max(0, size + padding)` per axis; `offset` shifts the centre.
    pub fn compute(pos: Vec2, size: Vec2, offset: Vec2, padding: Vec2) -> Self {
        let effective = (size + padding).max(Vec2::ZERO);
        Self {
            center: pos + offset,
            half_width: effective.x * 0.5,
            half_height: effective.y * 0.5,
        }
    }

    pub fn from_center(center: Vec2, half_width: f32, half_height: f32) -> Self {
        Self {
            center,
            half_width: half_width.max(0.0),
            half_height: half_height.max(0.0),
        }
    }

    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        let lo = min.min(max);
        let hi = min.max(max);
        Self {
            center: (lo + hi) * 0.5,
            half_width: (hi.x - lo.x) * 0.5,
            half_height: (hi.y - lo.y) * 0.5,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - Vec2::new(self.half_width, self.half_height)
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + Vec2::new(self.half_width, self.half_height)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.center.x - self.half_width
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.center.x + self.half_width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.center.y - self.half_height
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.center.y + self.half_height
    }

    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            center: self.center + delta,
            ..*self
        }
    }

    /// Overlap test; touching edges count as overlapping.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.left() <= other.right()
            && other.left() <= self.right()
            && self.bottom() <= other.top()
            && other.bottom() <= self.top()
    }

    /// Whether `other` lies entirely inside `self`.
    pub fn contains(&self, other: &Bounds) -> bool {
        self.left() <= other.left()
            && other.right() <= self.right()
            && self.bottom() <= other.bottom()
            && other.top() <= self.top()
    }
}
