//! Runtime configuration read from the process environment.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::pipe::DEFAULT_SPEED;

/// Scene loaded at startup when `FLAPPY_SCENE` is not set.
pub const DEFAULT_SCENE: &str = "Main";

/// Tuning and storage options for a game session.
#[derive(Clone, Debug)]
pub struct GameConfig {
    pub pipe_speed: f64,
    pub spawn_interval: f64,
    pub gravity: f64,
    pub flap_velocity: f64,
    pub fps: u32,
    pub save_dir: Option<PathBuf>,
    pub mute: bool,
    pub scene: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            pipe_speed: DEFAULT_SPEED,
            spawn_interval: 2.2,
            gravity: 22.0,
            flap_velocity: 7.5,
            fps: 30,
            save_dir: None,
            mute: false,
            scene: DEFAULT_SCENE.to_string(),
        }
    }
}

impl GameConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `FLAPPY_PIPE_SPEED` - Pipe scroll speed in world units/s (default: 2.0)
    /// - `FLAPPY_SPAWN_INTERVAL` - Seconds between pipes (default: 2.2)
    /// - `FLAPPY_GRAVITY` - Downward acceleration of the bird (default: 22.0)
    /// - `FLAPPY_FLAP_VELOCITY` - Upward speed after a flap (default: 7.5)
    /// - `FLAPPY_FPS` - Frame rate of the terminal loop (default: 30)
    /// - `FLAPPY_SAVE_DIR` - Directory for the preference file (default: platform-specific)
    /// - `FLAPPY_MUTE` - Disable sound output (default: false)
    /// - `FLAPPY_SCENE` - Scene to load at startup (default: "Main")
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(speed) = read_env::<f64>("FLAPPY_PIPE_SPEED").filter(|v| *v > 0.0) {
            config.pipe_speed = speed;
        }
        if let Some(interval) = read_env::<f64>("FLAPPY_SPAWN_INTERVAL").filter(|v| *v > 0.0) {
            config.spawn_interval = interval;
        }
        if let Some(gravity) = read_env::<f64>("FLAPPY_GRAVITY").filter(|v| *v > 0.0) {
            config.gravity = gravity;
        }
        if let Some(flap) = read_env::<f64>("FLAPPY_FLAP_VELOCITY").filter(|v| *v > 0.0) {
            config.flap_velocity = flap;
        }
        if let Some(fps) = read_env::<u32>("FLAPPY_FPS") {
            config.fps = fps.clamp(1, 240);
        }

        config.save_dir = env::var("FLAPPY_SAVE_DIR").ok().map(PathBuf::from);

        if let Some(mute) = read_env::<bool>("FLAPPY_MUTE") {
            config.mute = mute;
        } else if env::var("FLAPPY_MUTE").is_ok() {
            // Accept a bare `FLAPPY_MUTE=` as "true"
            config.mute = true;
        }

        if let Ok(scene) = env::var("FLAPPY_SCENE")
            && !scene.trim().is_empty()
        {
            config.scene = scene;
        }

        config
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps.max(1) as f64)
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_original_tuning() {
        let config = GameConfig::default();
        assert_eq!(config.pipe_speed, DEFAULT_SPEED);
        assert_eq!(config.scene, DEFAULT_SCENE);
        assert!(!config.mute);
        assert!(config.save_dir.is_none());
    }

    #[test]
    fn test_frame_duration() {
        let config = GameConfig {
            fps: 50,
            ..GameConfig::default()
        };
        assert_eq!(config.frame_duration(), Duration::from_millis(20));
    }
}
