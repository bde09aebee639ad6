use thiserror::Error;

/// Failures of strict boundary conversions. Engine functions themselves
/// never fail; they fall back to well-defined defaults.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("difficulty {0} is outside [1, 5]")]
    DifficultyOutOfRange(i64),

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("unknown age group: {0}")]
    UnknownAgeGroup(String),

    #[error("unknown session: {0}")]
    UnknownSession(String),

    #[error("session {0} has no question awaiting an answer")]
    SessionFinished(String),

    #[error("invalid bank item '{prompt}': {reason}")]
    InvalidBankItem { prompt: String, reason: String },

    #[error("config error at {path}: {message}")]
    Config { path: String, message: String },
}
