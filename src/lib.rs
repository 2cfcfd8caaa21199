//! Flappy Bird style game: score keeping with a persisted best score,
//! scrolling pipes, and a terminal renderer.
pub mod audio;
pub mod bird;
pub mod clock;
pub mod config;
pub mod display;
pub mod error;
pub mod game;
pub mod geometry;
pub mod keeper;
pub mod pipe;
pub mod prefs;
pub mod render;
pub mod scene;
pub mod spawner;

pub use config::GameConfig;
pub use error::{Collaborator, GameError, PrefsError};
pub use game::{Game, Phase};
pub use keeper::ScoreKeeper;
