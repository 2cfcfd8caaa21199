use crate::geometry::{Aabb, Collider, Tag};

/// Horizontal position of the bird in world units.
pub const BIRD_X: f64 = -4.0;
pub const SPAWN_Y: f64 = 0.8;

const HALF_W: f64 = 0.45;
const HALF_H: f64 = 0.3;
// Terminal velocity when falling.
const MAX_FALL: f64 = -14.0;

/// The player entity.
#[derive(Clone, Debug)]
pub struct Bird {
    y: f64,
    vy: f64,
    gravity: f64,
    flap_velocity: f64,
    bob: f64,
}

impl Bird {
    pub fn new(gravity: f64, flap_velocity: f64) -> Self {
        Self {
            y: SPAWN_Y,
            vy: 0.0,
            gravity,
            flap_velocity,
            bob: 0.0,
        }
    }

    pub fn flap(&mut self) {
        self.vy = self.flap_velocity;
    }

    pub fn update(&mut self, dt: f64) {
        self.vy = (self.vy - self.gravity * dt).max(MAX_FALL);
        self.y += self.vy * dt;
    }

    /// Gentle hover used before the first flap.
    pub fn idle(&mut self, dt: f64) {
        self.bob += dt;
        self.y = SPAWN_Y + (self.bob * 2.5).sin() * 0.3;
        self.vy = 0.0;
    }

    pub fn reset(&mut self) {
        self.y = SPAWN_Y;
        self.vy = 0.0;
        self.bob = 0.0;
    }

    pub fn x(&self) -> f64 {
        BIRD_X
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn vy(&self) -> f64 {
        self.vy
    }

    pub fn collider(&self) -> Collider {
        Collider {
            bounds: Aabb::new(BIRD_X, self.y, HALF_W, HALF_H),
            tag: Tag::Player,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_falls_under_gravity() {
        let mut bird = Bird::new(10.0, 5.0);
        bird.update(0.1);
        assert!(bird.vy() < 0.0);
        assert!(bird.y() < SPAWN_Y);
    }

    #[test]
    fn test_flap_rises_then_reset() {
        let mut bird = Bird::new(10.0, 5.0);
        bird.flap();
        bird.update(0.1);
        assert!(bird.y() > SPAWN_Y);
        bird.reset();
        assert_eq!(bird.y(), SPAWN_Y);
        assert_eq!(bird.vy(), 0.0);
    }

    #[test]
    fn test_fall_speed_is_capped() {
        let mut bird = Bird::new(100.0, 5.0);
        for _ in 0..50 {
            bird.update(0.1);
        }
        assert_eq!(bird.vy(), MAX_FALL);
    }

    #[test]
    fn test_collider_is_player() {
        assert!(Bird::new(1.0, 1.0).collider().is_player());
    }
}
