use std::{fmt, io};
use thiserror::Error;

/// Failures of the persistent preference store.
#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("preference store io: {0}")]
    Io(#[from] io::Error),
    #[error("preference file is not valid json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Scene collaborators the score keeper looks up while running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collaborator {
    Player,
    Spawner,
    GameOverPresenter,
}

impl fmt::Display for Collaborator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Collaborator::Player => "player",
            Collaborator::Spawner => "pipe spawner",
            Collaborator::GameOverPresenter => "game over presenter",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error("{0} is missing from the active scene")]
    MissingCollaborator(Collaborator),
    #[error("no scene named {0:?}")]
    UnknownScene(String),
    #[error(transparent)]
    Prefs(#[from] PrefsError),
    #[error("audio output unavailable: {0}")]
    Audio(String),
}
