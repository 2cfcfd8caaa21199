//! A loaded level: its text elements, collaborators and live pipes.
use std::collections::BTreeMap;

use crate::bird::Bird;
use crate::config::{DEFAULT_SCENE, GameConfig};
use crate::display::{BEST_SCORE_TEXT, SCORE_TEXT, TextLabel};
use crate::error::GameError;
use crate::pipe::Pipe;
use crate::spawner::PipeSpawner;

/// Overlay shown after the bird dies.
#[derive(Clone, Debug, Default)]
pub struct GameOverPanel {
    visible: bool,
    score: u32,
    best: u32,
}

impl GameOverPanel {
    pub fn show(&mut self, score: u32, best: u32) {
        self.visible = true;
        self.score = score;
        self.best = best;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best(&self) -> u32 {
        self.best
    }
}

#[derive(Clone, Debug)]
pub struct Scene {
    name: String,
    labels: Vec<TextLabel>,
    pub bird: Option<Bird>,
    pub spawner: Option<PipeSpawner>,
    pub game_over: Option<GameOverPanel>,
    pub pipes: Vec<Pipe>,
}

impl Scene {
    /// Empty scene with no labels or collaborators.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            labels: Vec::new(),
            bird: None,
            spawner: None,
            game_over: None,
            pipes: Vec::new(),
        }
    }

    pub fn with_label(mut self, name: &str) -> Self {
        self.labels.push(TextLabel::new(name));
        self
    }

    pub fn with_bird(mut self, bird: Bird) -> Self {
        self.bird = Some(bird);
        self
    }

    pub fn with_spawner(mut self, spawner: PipeSpawner) -> Self {
        self.spawner = Some(spawner);
        self
    }

    pub fn with_game_over(mut self, panel: GameOverPanel) -> Self {
        self.game_over = Some(panel);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn labels(&self) -> &[TextLabel] {
        &self.labels
    }

    pub fn label(&self, name: &str) -> Option<&TextLabel> {
        self.labels.iter().find(|l| l.name() == name)
    }

    /// Freeze every pipe and the spawner.
    pub fn stop_pipes(&mut self) {
        for pipe in &mut self.pipes {
            pipe.stop();
        }
        if let Some(spawner) = &mut self.spawner {
            spawner.stop();
        }
    }
}

/// The playable level: both score labels, a bird, a spawner and the
/// game-over panel.
pub fn standard_scene(name: &str, config: &GameConfig) -> Scene {
    Scene::new(name)
        .with_label(SCORE_TEXT)
        .with_label(BEST_SCORE_TEXT)
        .with_bird(Bird::new(config.gravity, config.flap_velocity))
        .with_spawner(PipeSpawner::new(config.spawn_interval, config.pipe_speed))
        .with_game_over(GameOverPanel::default())
}

type SceneBuilder = Box<dyn Fn(&str, &GameConfig) -> Scene>;

/// Builds scenes by name, both at startup and on reload.
pub struct SceneLibrary {
    config: GameConfig,
    builders: BTreeMap<String, SceneBuilder>,
}

impl SceneLibrary {
    /// Library with the standard scene registered under the default name.
    pub fn new(config: GameConfig) -> Self {
        let mut library = Self {
            config,
            builders: BTreeMap::new(),
        };
        library.register(DEFAULT_SCENE, standard_scene);
        library
    }

    pub fn register<F>(&mut self, name: &str, builder: F)
    where
        F: Fn(&str, &GameConfig) -> Scene + 'static,
    {
        self.builders.insert(name.to_string(), Box::new(builder));
    }

    pub fn load(&self, name: &str) -> Result<Scene, GameError> {
        let builder = self
            .builders
            .get(name)
            .ok_or_else(|| GameError::UnknownScene(name.to_string()))?;
        tracing::info!(scene = name, "Loading scene");
        Ok(builder(name, &self.config))
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

/// Ask the driver to rebuild the named scene.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReloadRequest {
    pub scene: String,
}
