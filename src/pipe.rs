//! Scrolling pipe pair that scores a point when the bird flies through it.
use crate::geometry::{Aabb, Collider, Tag};
use crate::keeper::ScoreKeeper;

/// Pipes whose x drops below this are destroyed.
pub const DESTROY_X: f64 = -10.0;
pub const DEFAULT_SPEED: f64 = 2.0;
pub const PIPE_WIDTH: f64 = 1.4;
pub const PIPE_GAP: f64 = 3.4;

// Columns only need to reach past the visible world.
const COLUMN_LENGTH: f64 = 20.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipeState {
    Active,
    Stopped,
    Destroyed,
}

/// Detection-only region, positioned relative to the pipe's center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerZone {
    pub offset_x: f64,
    pub half_w: f64,
    pub half_h: f64,
    pub is_trigger: bool,
}

impl Default for TriggerZone {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            half_w: PIPE_WIDTH / 2.0,
            half_h: PIPE_GAP / 2.0,
            is_trigger: true,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Pipe {
    x: f64,
    gap_center: f64,
    speed: f64,
    state: PipeState,
    trigger: Option<TriggerZone>,
    contact: bool,
}

impl Pipe {
    pub fn new(x: f64, gap_center: f64, speed: f64) -> Self {
        Self {
            x,
            gap_center,
            speed,
            state: PipeState::Active,
            trigger: None,
            contact: false,
        }
    }

    /// Attach a custom trigger zone before `on_start` runs.
    pub fn with_trigger(mut self, zone: TriggerZone) -> Self {
        self.trigger = Some(zone);
        self
    }

    /// Install the default trigger zone if none exists and make it
    /// detection-only.
    pub fn on_start(&mut self) {
        let zone = self.trigger.get_or_insert_with(TriggerZone::default);
        zone.is_trigger = true;
    }

    pub fn on_frame_update(&mut self, dt: f64) -> PipeState {
        if self.state != PipeState::Active {
            return self.state;
        }

        self.x -= self.speed * dt;

        if self.x < DESTROY_X {
            tracing::trace!(x = self.x, "Pipe passed the left boundary");
            self.state = PipeState::Destroyed;
        }
        self.state
    }

    /// Called when `other` starts overlapping the trigger zone. Returns true
    /// when a passage was reported.
    pub fn on_trigger_enter(&self, other: &Collider, keeper: &mut ScoreKeeper) -> bool {
        if self.state == PipeState::Destroyed || !other.is_player() {
            return false;
        }
        tracing::debug!(x = self.x, "Bird passed through pipe");
        keeper.on_obstacle_passed();
        true
    }

    /// Track overlap between `other` and the trigger zone. True only on the
    /// frame the overlap begins.
    pub fn update_contact(&mut self, other: &Aabb) -> bool {
        let now = self
            .trigger_bounds()
            .is_some_and(|zone| zone.overlaps(other));
        let entered = now && !self.contact;
        self.contact = now;
        entered
    }

    /// Freeze this pipe. Destroyed pipes stay destroyed.
    pub fn stop(&mut self) {
        if self.state == PipeState::Active {
            self.state = PipeState::Stopped;
        }
    }

    pub fn state(&self) -> PipeState {
        self.state
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn gap_center(&self) -> f64 {
        self.gap_center
    }

    pub fn trigger(&self) -> Option<&TriggerZone> {
        self.trigger.as_ref()
    }

    pub fn trigger_bounds(&self) -> Option<Aabb> {
        self.trigger.map(|zone| {
            Aabb::new(
                self.x + zone.offset_x,
                self.gap_center,
                zone.half_w,
                zone.half_h,
            )
        })
    }

    /// Upper and lower columns.
    pub fn solid_colliders(&self) -> [Collider; 2] {
        let half_w = PIPE_WIDTH / 2.0;
        let half_len = COLUMN_LENGTH / 2.0;
        let gap_top = self.gap_center + PIPE_GAP / 2.0;
        let gap_bottom = self.gap_center - PIPE_GAP / 2.0;
        [
            Collider {
                bounds: Aabb::new(self.x, gap_top + half_len, half_w, half_len),
                tag: Tag::Obstacle,
            },
            Collider {
                bounds: Aabb::new(self.x, gap_bottom - half_len, half_w, half_len),
                tag: Tag::Obstacle,
            },
        ]
    }
}
