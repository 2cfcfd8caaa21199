//! Current and best score, their display, and the restart / game-over
//! transitions.
use crate::audio::{AudioOutput, AudioSource, SoundBank, SoundClip};
use crate::clock::Clock;
use crate::display::DisplayBinding;
use crate::error::{Collaborator, GameError};
use crate::prefs::{BEST_SCORE_KEY, PrefStore};
use crate::scene::{ReloadRequest, Scene};

/// Owned by the game driver for the whole process and handed to whatever
/// needs to report score events.
pub struct ScoreKeeper {
    score: u32,
    best: u32,
    display: DisplayBinding,
    sounds: SoundBank,
    audio: AudioSource,
    prefs: Box<dyn PrefStore>,
    listening: bool,
}

impl ScoreKeeper {
    /// Create the keeper and load the persisted best score (0 if none).
    pub fn new(prefs: Box<dyn PrefStore>, output: Box<dyn AudioOutput>, sounds: SoundBank) -> Self {
        let stored = prefs.get_int(BEST_SCORE_KEY, 0);
        let best = stored.clamp(0, u32::MAX as i64) as u32;
        tracing::info!(best, "Best score loaded");
        Self {
            score: 0,
            best,
            display: DisplayBinding::default(),
            sounds,
            audio: AudioSource::new(output),
            prefs,
            listening: false,
        }
    }

    /// Bind to the first scene, start listening for scene loads and show a
    /// fresh score.
    pub fn initialize(&mut self, scene: &Scene) {
        self.bind_displays(scene);
        self.enable();
        self.score = 0;
        self.refresh_score();
        self.refresh_best();
    }

    /// Scene reloads invalidate previous bindings.
    pub fn on_scene_loaded(&mut self, scene: &Scene) {
        self.bind_displays(scene);
        self.reset_score();
        self.refresh_best();
    }

    pub fn enable(&mut self) {
        self.listening = true;
    }

    pub fn disable(&mut self) {
        self.listening = false;
    }

    /// Whether scene-load notifications should be delivered.
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
        self.refresh_score();

        if self.score > self.best {
            self.best = self.score;
            self.save_best();
            self.refresh_best();
        }
    }

    pub fn on_obstacle_passed(&mut self) {
        self.add_score(1);
        let clip = self.sounds.point.clone();
        self.play_sound(clip.as_ref());
    }

    /// Reset the run and ask for the active scene to be reloaded.
    pub fn restart(&mut self, scene: &mut Scene, clock: &mut Clock) -> ReloadRequest {
        self.reset_score();

        match scene.bird.as_mut() {
            Some(bird) => bird.reset(),
            None => tracing::warn!("Restart skipped: {} not found", Collaborator::Player),
        }
        match scene.spawner.as_mut() {
            Some(spawner) => spawner.reset(),
            None => tracing::warn!("Restart skipped: {} not found", Collaborator::Spawner),
        }

        clock.resume();
        tracing::info!(scene = scene.name(), "Restarting");
        ReloadRequest {
            scene: scene.name().to_string(),
        }
    }

    /// Play the game-over sound, pause the clock and show the panel. A scene
    /// without a panel is reported as an error after pausing.
    pub fn show_game_over(&mut self, scene: &mut Scene, clock: &mut Clock) -> Result<(), GameError> {
        let clip = self.sounds.game_over.clone();
        self.play_sound(clip.as_ref());
        clock.pause();

        match scene.game_over.as_mut() {
            Some(panel) => {
                panel.show(self.score, self.best);
                tracing::info!(score = self.score, best = self.best, "Game over");
                Ok(())
            }
            None => {
                let missing = Collaborator::GameOverPresenter;
                tracing::error!("Cannot show game over: {missing} not found");
                Err(GameError::MissingCollaborator(missing))
            }
        }
    }

    /// Play `clip` on the keeper's output. `None` is a no-op.
    pub fn play_sound(&mut self, clip: Option<&SoundClip>) {
        let Some(clip) = clip else {
            return;
        };
        self.audio.set_clip(clip.clone());
        self.audio.play();
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best_score(&self) -> u32 {
        self.best
    }

    fn bind_displays(&mut self, scene: &Scene) {
        self.display = DisplayBinding::resolve(scene.labels());
        if !self.display.is_complete() {
            tracing::warn!(scene = scene.name(), "Score labels missing from scene");
        }
    }

    fn reset_score(&mut self) {
        self.score = 0;
        self.refresh_score();
    }

    fn refresh_score(&self) {
        if !self.display.show_score(self.score) {
            tracing::debug!("Score label unbound, display skipped");
        }
    }

    fn refresh_best(&self) {
        if !self.display.show_best(self.best) {
            tracing::debug!("Best score label unbound, display skipped");
        }
    }

    fn save_best(&mut self) {
        self.prefs.set_int(BEST_SCORE_KEY, self.best as i64);
        if let Err(e) = self.prefs.save() {
            tracing::warn!(best = self.best, "Failed to persist best score: {e}");
        }
    }
}
