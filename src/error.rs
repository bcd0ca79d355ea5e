use thiserror::Error;

/// Errors surfaced by persistence and configuration.  The simulation
/// itself never fails.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("high score file is malformed: {0}")]
    HighScoreFormat(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] ron::error::SpannedError),
}

pub type Result<T> = std::result::Result<T, GameError>;
