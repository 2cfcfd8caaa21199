/// Visible world extents, in world units.
pub const WORLD_LEFT: f64 = -9.0;
pub const WORLD_RIGHT: f64 = 9.0;
pub const WORLD_TOP: f64 = 5.0;
/// Top of the ground strip.
pub const GROUND_Y: f64 = -3.8;

/// Axis-aligned box in world units, y pointing up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub cx: f64,
    pub cy: f64,
    pub half_w: f64,
    pub half_h: f64,
}

impl Aabb {
    pub const fn new(cx: f64, cy: f64, half_w: f64, half_h: f64) -> Self {
        Self {
            cx,
            cy,
            half_w,
            half_h,
        }
    }

    pub fn left(&self) -> f64 {
        self.cx - self.half_w
    }

    pub fn right(&self) -> f64 {
        self.cx + self.half_w
    }

    pub fn bottom(&self) -> f64 {
        self.cy - self.half_h
    }

    pub fn top(&self) -> f64 {
        self.cy + self.half_h
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.bottom() < other.top()
            && other.bottom() < self.top()
    }
}

/// Which kind of entity a collider belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tag {
    Player,
    Obstacle,
}

/// Collision shape handed to trigger callbacks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Collider {
    pub bounds: Aabb,
    pub tag: Tag,
}

impl Collider {
    pub fn is_player(&self) -> bool {
        self.tag == Tag::Player
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap() {
        let a = Aabb::new(0.0, 0.0, 1.0, 1.0);
        assert!(a.overlaps(&Aabb::new(1.5, 0.5, 1.0, 1.0)));
        assert!(!a.overlaps(&Aabb::new(2.5, 0.0, 1.0, 1.0)));
        // Touching edges do not count
        assert!(!a.overlaps(&Aabb::new(2.0, 0.0, 1.0, 1.0)));
    }
}
