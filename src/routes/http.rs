//! HTTP endpoint handlers. These are thin wrappers that forward to core logic
//! or straight to the engine functions for the stateless calls.

use std::sync::Arc;

use axum::{
  extract::{Query, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::difficulty::{adjust_difficulty, get_initial_difficulty};
use crate::domain::DifficultyLevel;
use crate::error::QuizError;
use crate::logic::*;
use crate::protocol::*;
use crate::scoring::{calculate_accuracy, calculate_category_trend, calculate_raw_score, calculate_total_score};
use crate::state::AppState;

impl IntoResponse for QuizError {
  fn into_response(self) -> Response {
    let status = match &self {
      QuizError::UnknownSession(_) => StatusCode::NOT_FOUND,
      QuizError::SessionFinished(_) => StatusCode::CONFLICT,
      _ => StatusCode::BAD_REQUEST,
    };
    warn!(target: "nouryoku", %status, error = %self, "Request rejected");
    (status, Json(ErrorOut { error: self.to_string() })).into_response()
  }
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_questions(
  State(state): State<Arc<AppState>>,
  Query(q): Query<QuestionsQuery>,
) -> impl IntoResponse {
  let test_type = q.test_type.unwrap_or_default();
  let difficulty = q.difficulty.map(DifficultyLevel::clamped).unwrap_or_default();
  let questions = generate(&state, &test_type, difficulty);
  info!(target: "quiz", %test_type, %difficulty, count = questions.len(), "HTTP questions served");
  Json(QuestionsOut { questions })
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_post_challenge(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ChallengeIn>,
) -> impl IntoResponse {
  let (session_id, challenge) =
    start_challenge(&state, body.user_id.as_deref(), body.test_type.as_deref(), body.difficulty).await;
  Json(ChallengeOut { session_id, challenge })
}

#[instrument(level = "info", skip(state, body), fields(session_id = %body.session_id))]
pub async fn http_post_answer(
  State(state): State<Arc<AppState>>,
  Json(body): Json<AnswerIn>,
) -> Result<Json<AnswerOut>, QuizError> {
  let out = submit_answer(&state, &body.session_id, body.answer, body.response_time_ms).await?;
  info!(target: "quiz", session_id = %body.session_id, correct = out.correct, "HTTP answer evaluated");
  Ok(Json(out))
}

#[instrument(level = "debug", skip(state))]
pub async fn http_get_session(
  State(state): State<Arc<AppState>>,
  Query(q): Query<SessionQuery>,
) -> Result<Json<SessionOut>, QuizError> {
  Ok(Json(session_status(&state, &q.session_id).await?))
}

#[instrument(level = "debug", skip(body), fields(answers = body.answers.len()))]
pub async fn http_post_raw_score(Json(body): Json<RawScoreIn>) -> impl IntoResponse {
  Json(RawScoreOut {
    accuracy: calculate_accuracy(&body.answers),
    raw_score: calculate_raw_score(&body.answers),
  })
}

#[instrument(level = "debug", skip(body), fields(categories = body.category_scores.len()))]
pub async fn http_post_total_score(Json(body): Json<TotalScoreIn>) -> impl IntoResponse {
  Json(TotalScoreOut { total_score: calculate_total_score(&body.category_scores) })
}

#[instrument(level = "debug", skip(state, body), fields(points = body.scores.len()))]
pub async fn http_post_trend(
  State(state): State<Arc<AppState>>,
  Json(body): Json<TrendIn>,
) -> Json<TrendOut> {
  let window = body.window.unwrap_or(state.config.trend_window);
  Json(calculate_category_trend(&body.scores, window))
}

#[instrument(level = "debug", skip(body), fields(category = %body.category))]
pub async fn http_post_difficulty(Json(body): Json<DifficultyIn>) -> impl IntoResponse {
  Json(DifficultyOut { level: adjust_difficulty(&body) })
}

#[instrument(level = "debug")]
pub async fn http_get_initial_difficulty(Query(q): Query<InitialDifficultyQuery>) -> impl IntoResponse {
  Json(DifficultyOut { level: get_initial_difficulty(&q.age_group) })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_report(
  State(state): State<Arc<AppState>>,
  Query(q): Query<ReportQuery>,
) -> impl IntoResponse {
  Json(report(&state, &q.user_id, Utc::now().date_naive()).await)
}
