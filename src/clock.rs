/// Game time. The frame dispatcher checks `is_paused` before running any
/// per-frame update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Clock {
    paused: bool,
    elapsed: f64,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    pub const fn new() -> Self {
        Self {
            paused: false,
            elapsed: 0.0,
        }
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Advance by `dt` seconds. Returns the delta to apply, zero while paused.
    pub fn advance(&mut self, dt: f64) -> f64 {
        if self.paused {
            return 0.0;
        }
        self.elapsed += dt;
        dt
    }

    /// Unpaused seconds since creation.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}
