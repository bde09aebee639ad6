//! Nouryoku: cognitive-training quiz engine.
//!
//! The engine half (`generators`, `scoring`, `difficulty`, `util`) is pure:
//! randomness and time come in through `rng::RandomSource` and `rng::Clock`.
//! The service half (`state`, `logic`, `routes`) wraps it in an Axum API with
//! in-memory sessions and per-user score books.

pub mod config;
pub mod difficulty;
pub mod domain;
pub mod error;
pub mod generators;
pub mod logic;
pub mod protocol;
pub mod rng;
pub mod routes;
pub mod scorebook;
pub mod scoring;
pub mod seeds;
pub mod session;
pub mod state;
pub mod telemetry;
pub mod util;

pub use difficulty::{adjust_difficulty, get_initial_difficulty, DifficultyProfile};
pub use domain::{
    Answer, AnswerValue, CategoryScore, Challenge, ChallengeCategory, DailyScore, DifficultyLevel, Question, Score,
    TestType, Trend,
};
pub use error::QuizError;
pub use generators::{generate_questions, QuestionGenerator};
pub use scoring::{calculate_accuracy, calculate_category_trend, calculate_raw_score, calculate_total_score};
pub use util::{generate_id, mean, moving_average, normalize_score, standard_deviation, trend_direction};
