//! Frame dispatcher: owns the score keeper, the active scene and the clock.
use crate::clock::Clock;
use crate::error::GameError;
use crate::geometry::{GROUND_Y, WORLD_TOP};
use crate::keeper::ScoreKeeper;
use crate::pipe::PipeState;
use crate::scene::{Scene, SceneLibrary};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Bird hovers until the first flap.
    Ready,
    Playing,
    Over,
}

pub struct Game {
    keeper: ScoreKeeper,
    library: SceneLibrary,
    scene: Scene,
    clock: Clock,
    phase: Phase,
}

impl Game {
    /// Load the configured scene and bind the keeper to it.
    pub fn new(library: SceneLibrary, mut keeper: ScoreKeeper) -> Result<Self, GameError> {
        let scene = library.load(&library.config().scene)?;
        keeper.initialize(&scene);
        Ok(Self {
            keeper,
            library,
            scene,
            clock: Clock::new(),
            phase: Phase::Ready,
        })
    }

    /// Run one frame. Nothing happens while the clock is paused.
    pub fn tick(&mut self, dt: f64) -> Result<(), GameError> {
        if self.clock.is_paused() {
            return Ok(());
        }
        let dt = self.clock.advance(dt);

        match self.phase {
            Phase::Ready => {
                if let Some(bird) = &mut self.scene.bird {
                    bird.idle(dt);
                }
                Ok(())
            }
            Phase::Playing => self.step(dt),
            Phase::Over => Ok(()),
        }
    }

    fn step(&mut self, dt: f64) -> Result<(), GameError> {
        let scene = &mut self.scene;

        if let Some(bird) = &mut scene.bird {
            bird.update(dt);
        }
        if let Some(pipe) = scene.spawner.as_mut().and_then(|s| s.update(dt)) {
            scene.pipes.push(pipe);
        }
        for pipe in &mut scene.pipes {
            pipe.on_frame_update(dt);
        }
        scene.pipes.retain(|p| p.state() != PipeState::Destroyed);

        let Some(bird) = scene.bird.as_ref().map(|b| b.collider()) else {
            return Ok(());
        };

        for pipe in &mut scene.pipes {
            if pipe.update_contact(&bird.bounds) {
                pipe.on_trigger_enter(&bird, &mut self.keeper);
            }
        }

        let hit_world = bird.bounds.bottom() <= GROUND_Y || bird.bounds.top() >= WORLD_TOP;
        let hit_pipe = scene.pipes.iter().any(|pipe| {
            pipe.solid_colliders()
                .iter()
                .any(|c| c.bounds.overlaps(&bird.bounds))
        });

        if hit_world || hit_pipe {
            return self.game_over();
        }
        Ok(())
    }

    fn game_over(&mut self) -> Result<(), GameError> {
        self.phase = Phase::Over;
        self.scene.stop_pipes();
        self.keeper.show_game_over(&mut self.scene, &mut self.clock)
    }

    /// Player input: starts the run, flaps, or restarts after game over.
    pub fn flap(&mut self) -> Result<(), GameError> {
        match self.phase {
            Phase::Ready => {
                self.phase = Phase::Playing;
                if let Some(bird) = &mut self.scene.bird {
                    bird.flap();
                }
                Ok(())
            }
            Phase::Playing => {
                if let Some(bird) = &mut self.scene.bird {
                    bird.flap();
                }
                Ok(())
            }
            Phase::Over => self.restart(),
        }
    }

    /// Reset the run and rebuild the active scene.
    pub fn restart(&mut self) -> Result<(), GameError> {
        let request = self.keeper.restart(&mut self.scene, &mut self.clock);
        self.load(&request.scene)
    }

    fn load(&mut self, name: &str) -> Result<(), GameError> {
        self.scene = self.library.load(name)?;
        self.phase = Phase::Ready;
        if self.keeper.is_listening() {
            self.keeper.on_scene_loaded(&self.scene);
        }
        Ok(())
    }

    /// Player pause. Has no effect once the run is over.
    pub fn toggle_pause(&mut self) {
        if self.phase == Phase::Over {
            return;
        }
        if self.clock.is_paused() {
            self.clock.resume();
        } else {
            self.clock.pause();
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn keeper(&self) -> &ScoreKeeper {
        &self.keeper
    }

    pub fn keeper_mut(&mut self) -> &mut ScoreKeeper {
        &mut self.keeper
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{RecordingOutput, SoundBank, SoundClip};
    use crate::bird::{Bird, SPAWN_Y};
    use crate::config::GameConfig;
    use crate::display::{BEST_SCORE_TEXT, SCORE_TEXT};
    use crate::pipe::Pipe;
    use crate::prefs::MemoryPrefs;

    fn game_with(config: GameConfig) -> (Game, RecordingOutput) {
        let audio = RecordingOutput::new();
        let sounds = SoundBank {
            point: Some(SoundClip::new("point", 44_100, vec![0.0; 4])),
            game_over: Some(SoundClip::new("game_over", 44_100, vec![0.0; 4])),
        };
        let keeper = ScoreKeeper::new(Box::new(MemoryPrefs::new()), Box::new(audio.clone()), sounds);
        let game = Game::new(SceneLibrary::new(config), keeper).unwrap();
        (game, audio)
    }

    /// Gravity-free bird and no spawner, so tests place pipes by hand.
    fn still_air() -> (Game, RecordingOutput) {
        let config = GameConfig {
            scene: "Still".to_string(),
            ..GameConfig::default()
        };
        let audio = RecordingOutput::new();
        let sounds = SoundBank {
            point: Some(SoundClip::new("point", 44_100, vec![0.0; 4])),
            game_over: None,
        };
        let keeper = ScoreKeeper::new(Box::new(MemoryPrefs::new()), Box::new(audio.clone()), sounds);
        let mut library = SceneLibrary::new(config);
        library.register("Still", |name, _| {
            crate::scene::standard_scene(name, &GameConfig::default())
                .with_bird(Bird::new(0.0, 0.0))
        });
        let mut game = Game::new(library, keeper).unwrap();
        game.scene_mut().spawner = None;
        (game, audio)
    }

    #[test]
    fn test_ready_phase_waits_for_flap() {
        let (mut game, _) = game_with(GameConfig::default());
        for _ in 0..30 {
            game.tick(0.1).unwrap();
        }
        assert_eq!(game.phase(), Phase::Ready);
        assert!(game.scene().pipes.is_empty());

        game.flap().unwrap();
        assert_eq!(game.phase(), Phase::Playing);
        game.tick(0.01).unwrap();
        assert_eq!(game.scene().pipes.len(), 1);
    }

    #[test]
    fn test_passing_through_gap_scores_once() {
        let (mut game, audio) = still_air();
        game.flap().unwrap();
        game.scene_mut().pipes.push({
            let mut pipe = Pipe::new(-2.5, SPAWN_Y, 2.0);
            pipe.on_start();
            pipe
        });

        for _ in 0..20 {
            game.tick(0.1).unwrap();
        }
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.keeper().score(), 1);
        assert_eq!(audio.count("point"), 1);
        assert_eq!(
            game.scene().label(SCORE_TEXT).unwrap().text(),
            "Score: 1"
        );
    }

    #[test]
    fn test_pipes_are_removed_past_boundary() {
        let (mut game, _) = still_air();
        game.flap().unwrap();
        // Already left of the bird
        game.scene_mut().pipes.push(Pipe::new(-9.0, SPAWN_Y, 2.0));
        game.tick(0.4).unwrap();
        assert_eq!(game.scene().pipes.len(), 1);
        game.tick(0.2).unwrap();
        assert!(game.scene().pipes.is_empty());
    }

    #[test]
    fn test_hitting_the_ground_ends_the_run() {
        let (mut game, audio) = game_with(GameConfig::default());
        game.flap().unwrap();
        for _ in 0..100 {
            game.tick(0.05).unwrap();
        }
        assert_eq!(game.phase(), Phase::Over);
        assert!(game.clock().is_paused());
        assert!(game.scene().game_over.as_ref().unwrap().is_visible());
        assert_eq!(audio.count("game_over"), 1);
        assert!(
            game.scene()
                .pipes
                .iter()
                .all(|p| p.state() == PipeState::Stopped)
        );
    }

    #[test]
    fn test_flap_after_game_over_restarts() {
        let (mut game, _) = game_with(GameConfig::default());
        game.flap().unwrap();
        for _ in 0..100 {
            game.tick(0.05).unwrap();
        }
        assert_eq!(game.phase(), Phase::Over);

        game.flap().unwrap();
        assert_eq!(game.phase(), Phase::Ready);
        assert!(!game.clock().is_paused());
        assert!(game.scene().pipes.is_empty());
        assert!(!game.scene().game_over.as_ref().unwrap().is_visible());
        assert_eq!(game.keeper().score(), 0);
        assert_eq!(
            game.scene().label(SCORE_TEXT).unwrap().text(),
            "Score: 0"
        );
    }

    #[test]
    fn test_missing_presenter_is_reported() {
        let (mut game, _) = game_with(GameConfig::default());
        game.scene_mut().game_over = None;
        game.flap().unwrap();
        let mut result = Ok(());
        for _ in 0..100 {
            result = result.and(game.tick(0.05));
        }
        assert!(matches!(result, Err(GameError::MissingCollaborator(_))));
        assert_eq!(game.phase(), Phase::Over);
    }

    #[test]
    fn test_pause_freezes_pipes() {
        let (mut game, _) = still_air();
        game.flap().unwrap();
        game.scene_mut().pipes.push(Pipe::new(5.0, SPAWN_Y, 2.0));
        game.toggle_pause();
        game.tick(1.0).unwrap();
        assert_eq!(game.scene().pipes[0].x(), 5.0);
        game.toggle_pause();
        game.tick(1.0).unwrap();
        assert_eq!(game.scene().pipes[0].x(), 3.0);
    }

    #[test]
    fn test_disabled_keeper_ignores_reload() {
        let (mut game, _) = game_with(GameConfig::default());
        let old_score = game.scene().label(SCORE_TEXT).unwrap().clone();
        game.keeper_mut().add_score(2);
        game.keeper_mut().disable();

        game.restart().unwrap();
        assert_eq!(old_score.text(), "Score: 0");
        assert!(!game.keeper().is_listening());
        assert_eq!(game.scene().label(SCORE_TEXT).unwrap().text(), "");
        assert_eq!(game.scene().label(BEST_SCORE_TEXT).unwrap().text(), "");

        // Still bound to the previous scene's labels
        game.keeper_mut().add_score(1);
        assert_eq!(old_score.text(), "Score: 1");
        assert_eq!(game.scene().label(SCORE_TEXT).unwrap().text(), "");

        game.keeper_mut().enable();
        game.restart().unwrap();
        assert_eq!(game.scene().label(SCORE_TEXT).unwrap().text(), "Score: 0");
        assert_eq!(
            game.scene().label(BEST_SCORE_TEXT).unwrap().text(),
            "Best Score: 2"
        );
    }
}
