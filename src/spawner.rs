use crate::geometry::{GROUND_Y, WORLD_TOP};
use crate::pipe::{PIPE_GAP, Pipe};

/// New pipes appear here, just off the right edge.
pub const SPAWN_X: f64 = 11.0;

// Range of gap centers, kept clear of ground and ceiling.
const GAP_MIN: f64 = GROUND_Y + PIPE_GAP / 2.0 + 0.4;
const GAP_MAX: f64 = WORLD_TOP - PIPE_GAP / 2.0 - 0.4;

/// Emits pipes on a fixed interval.
#[derive(Clone, Debug)]
pub struct PipeSpawner {
    interval: f64,
    speed: f64,
    timer: f64,
    count: u64,
    stopped: bool,
}

impl PipeSpawner {
    pub fn new(interval: f64, speed: f64) -> Self {
        Self {
            interval,
            speed,
            // First pipe right away
            timer: interval,
            count: 0,
            stopped: false,
        }
    }

    /// Advance the timer, returning a pipe when one is due.
    pub fn update(&mut self, dt: f64) -> Option<Pipe> {
        if self.stopped {
            return None;
        }
        self.timer += dt;
        if self.timer < self.interval {
            return None;
        }
        self.timer -= self.interval;
        self.count += 1;

        let center = GAP_MIN + pseudo_rand(self.count) * (GAP_MAX - GAP_MIN);
        let mut pipe = Pipe::new(SPAWN_X, center, self.speed);
        pipe.on_start();
        Some(pipe)
    }

    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn reset(&mut self) {
        self.timer = self.interval;
        self.count = 0;
        self.stopped = false;
    }

    pub fn spawned(&self) -> u64 {
        self.count
    }
}

fn pseudo_rand(seed: u64) -> f64 {
    let x = seed
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    let bits = (x >> 33) ^ x;
    (bits % 1000) as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipe::PipeState;

    #[test]
    fn test_spawns_on_interval() {
        let mut spawner = PipeSpawner::new(2.0, 1.0);
        let first = spawner.update(0.0).unwrap();
        assert_eq!(first.x(), SPAWN_X);
        assert!(first.trigger().is_some());
        assert_eq!(first.state(), PipeState::Active);

        assert!(spawner.update(1.0).is_none());
        assert!(spawner.update(1.0).is_some());
        assert_eq!(spawner.spawned(), 2);
    }

    #[test]
    fn test_gap_centers_stay_in_range() {
        let mut spawner = PipeSpawner::new(1.0, 1.0);
        for _ in 0..200 {
            let pipe = spawner.update(1.0).unwrap();
            assert!(pipe.gap_center() >= GAP_MIN && pipe.gap_center() <= GAP_MAX);
        }
    }

    #[test]
    fn test_stop_and_reset() {
        let mut spawner = PipeSpawner::new(1.0, 1.0);
        spawner.update(0.0);
        spawner.stop();
        assert!(spawner.update(5.0).is_none());
        spawner.reset();
        assert_eq!(spawner.spawned(), 0);
        assert!(spawner.update(0.0).is_some());
    }
}
