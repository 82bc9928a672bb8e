use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Player name must not be empty")]
    EmptyPlayerName,
    #[error("Unknown difficulty, expected one of: easy, medium, hard")]
    UnknownDifficulty,
}

pub type Result<T> = core::result::Result<T, GameError>;

/// Failures of a ranking persistence backend.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Could not access ranking storage")]
    Io(#[from] std::io::Error),
    #[error("Ranking record is not valid JSON")]
    Json(#[from] serde_json::Error),
}

pub type StoreResult<T> = core::result::Result<T, StoreError>;
