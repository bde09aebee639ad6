//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::difficulty::DifficultyProfile;
use crate::domain::{Answer, AnswerValue, CategoryScore, Challenge, DailyScore, DifficultyLevel, Question};
use crate::scoring::CategoryTrend;
use crate::session::{GamePhase, Progress, SessionSummary};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    Generate {
        #[serde(rename = "testType")]
        test_type: String,
        difficulty: DifficultyLevel,
    },
    NewChallenge {
        #[serde(default, rename = "userId")]
        user_id: Option<String>,
        #[serde(default, rename = "testType")]
        test_type: Option<String>,
        #[serde(default)]
        difficulty: Option<DifficultyLevel>,
    },
    SubmitAnswer {
        #[serde(rename = "sessionId")]
        session_id: String,
        answer: AnswerValue,
        #[serde(default, rename = "responseTimeMs")]
        response_time_ms: f64,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Questions {
        questions: Vec<Question>,
    },
    Challenge {
        #[serde(rename = "sessionId")]
        session_id: String,
        challenge: Challenge,
    },
    AnswerResult {
        #[serde(flatten)]
        outcome: AnswerOut,
    },
    Error {
        message: String,
    },
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct QuestionsQuery {
    #[serde(rename = "type")]
    pub test_type: Option<String>,
    pub difficulty: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct QuestionsOut {
    pub questions: Vec<Question>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeIn {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default, rename = "type")]
    pub test_type: Option<String>,
    #[serde(default)]
    pub difficulty: Option<DifficultyLevel>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeOut {
    pub session_id: String,
    pub challenge: Challenge,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerIn {
    pub session_id: String,
    pub answer: AnswerValue,
    #[serde(default)]
    pub response_time_ms: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOut {
    pub correct: bool,
    pub expected: AnswerValue,
    pub progress: Progress,
    pub phase: GamePhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<SessionResult>,
}

/// Outcome of a finished session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResult {
    pub summary: SessionSummary,
    pub category_scores: Vec<CategoryScore>,
    pub total_score: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionQuery {
    pub session_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOut {
    pub phase: GamePhase,
    pub progress: Progress,
    pub time_remaining: u32,
    pub current_question: Option<Question>,
}

#[derive(Debug, Deserialize)]
pub struct RawScoreIn {
    pub answers: Vec<Answer>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawScoreOut {
    pub accuracy: f64,
    pub raw_score: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalScoreIn {
    pub category_scores: Vec<CategoryScore>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalScoreOut {
    pub total_score: u32,
}

#[derive(Debug, Deserialize)]
pub struct TrendIn {
    pub scores: Vec<f64>,
    #[serde(default)]
    pub window: Option<usize>,
}

pub type TrendOut = CategoryTrend;

pub type DifficultyIn = DifficultyProfile;

#[derive(Debug, Serialize)]
pub struct DifficultyOut {
    pub level: DifficultyLevel,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialDifficultyQuery {
    pub age_group: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    pub user_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportOut {
    pub category_scores: Vec<CategoryScore>,
    pub total_score: u32,
    pub streak_count: u32,
    pub best_streak: u32,
    pub weekly_average: u32,
    pub daily_scores: Vec<DailyScore>,
}

#[derive(Debug, Serialize)]
pub struct ErrorOut {
    pub error: String,
}
