//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Generating questions and starting challenge sessions
//!   - Grading a submitted answer and advancing the session
//!   - Turning a finished session into scores for the user's score book
//!   - Building the per-user report

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, instrument};

use crate::domain::{
    Answer, AnswerValue, CategoryScore, Challenge, ChallengeCategory, DifficultyLevel, Question, Score, TestType,
};
use crate::error::QuizError;
use crate::protocol::{AnswerOut, ReportOut, SessionOut, SessionResult};
use crate::scoring::{calculate_accuracy, calculate_raw_score, calculate_total_score, grade};
use crate::session::{GamePhase, GameSession};
use crate::state::AppState;
use crate::util::{generate_id, mean, normalize_score};

/// User id used when a client does not identify itself.
pub const ANONYMOUS_USER: &str = "current-user";

#[instrument(level = "info", skip(state))]
pub fn generate(state: &AppState, test_type: &str, difficulty: DifficultyLevel) -> Vec<Question> {
    state.generator().generate(test_type, difficulty)
}

/// Start a session. Without a test type the user gets the daily clinical
/// challenge at their per-category levels; with one, a single-type challenge
/// at the requested level or the user's current level for that category.
#[instrument(level = "info", skip(state))]
pub async fn start_challenge(
    state: &AppState,
    user_id: Option<&str>,
    test_type: Option<&str>,
    difficulty: Option<DifficultyLevel>,
) -> (String, Challenge) {
    let user_id = user_id.unwrap_or(ANONYMOUS_USER);
    let book = state.book_snapshot(user_id).await;
    let levels: HashMap<ChallengeCategory, DifficultyLevel> = book
        .levels(difficulty.unwrap_or_default(), state.config.accuracy_window)
        .into_iter()
        .collect();

    let mut generator = state.generator();
    let challenge = match test_type {
        None => generator.daily_challenge(&levels, state.config.seconds_per_question),
        Some(name) => {
            let resolved = TestType::from_name(name).unwrap_or(TestType::MentalMath);
            let level = difficulty
                .or_else(|| levels.get(&resolved.category()).copied())
                .unwrap_or_default();
            generator.challenge(resolved, level, state.config.seconds_per_question)
        }
    };

    let mut session = GameSession::new();
    session.start(challenge.clone());
    session.set_phase(GamePhase::Playing);
    let session_id = state.insert_session(user_id, session, Utc::now()).await;
    info!(
        target: "quiz",
        %user_id,
        %session_id,
        challenge = %challenge.id,
        questions = challenge.questions.len(),
        "Challenge started"
    );
    (session_id, challenge)
}

/// Grade `user_answer` against the current question, record it and advance.
/// Finishing the last question scores the session into the user's book.
#[instrument(level = "info", skip(state, user_answer))]
pub async fn submit_answer(
    state: &AppState,
    session_id: &str,
    user_answer: AnswerValue,
    response_time_ms: f64,
) -> Result<AnswerOut, QuizError> {
    let (user_id, finished_session, out) = {
        let mut sessions = state.sessions.write().await;
        let entry = sessions
            .get_mut(session_id)
            .ok_or_else(|| QuizError::UnknownSession(session_id.to_string()))?;
        let session = &mut entry.session;
        if session.phase() == GamePhase::Result {
            return Err(QuizError::SessionFinished(session_id.to_string()));
        }
        let question = session
            .current_question()
            .cloned()
            .ok_or_else(|| QuizError::SessionFinished(session_id.to_string()))?;

        let correct = grade(&question.correct_answer, &user_answer);
        session.answer_question(Answer {
            question_id: question.id.clone(),
            user_answer,
            is_correct: correct,
            response_time_ms: response_time_ms.max(0.0),
            answered_at: Utc::now(),
        });
        if session.is_last_question() {
            session.finish();
        } else {
            session.next_question();
        }
        debug!(target: "quiz", %session_id, question = %question.id, correct, "Answer graded");

        let out = AnswerOut {
            correct,
            expected: question.correct_answer.clone(),
            progress: session.progress(),
            phase: session.phase(),
            result: None,
        };
        let finished = (session.phase() == GamePhase::Result).then(|| session.clone());
        (entry.user_id.clone(), finished, out)
    };

    let Some(session) = finished_session else {
        return Ok(out);
    };
    let result = record_session(state, &user_id, &session).await;
    state.sessions.write().await.remove(session_id);
    Ok(AnswerOut { result: Some(result), ..out })
}

/// One `Score` per category the session touched, added to the user's book.
async fn record_session(state: &AppState, user_id: &str, session: &GameSession) -> SessionResult {
    let summary = session.summary();
    let scores = match session.challenge() {
        Some(challenge) => scores_for(user_id, challenge, session.answers()),
        None => Vec::new(),
    };

    let mut books = state.books.write().await;
    let book = books
        .entry(user_id.to_string())
        .or_insert_with(|| crate::scorebook::ScoreBook::new(state.config.trend_window));
    let mut touched = Vec::new();
    for score in scores {
        let category = score.category;
        book.add_score(score);
        if let Some(cs) = book.category_trend(category) {
            touched.push(cs.clone());
        }
    }
    let total_score = calculate_total_score(&touched);
    info!(
        target: "quiz",
        %user_id,
        raw_score = summary.raw_score,
        accuracy = summary.accuracy,
        total_score,
        streak = book.streak_count(),
        "Session scored"
    );
    SessionResult { summary, category_scores: touched, total_score }
}

/// Split the answer log by question category and score each part.
pub fn scores_for(user_id: &str, challenge: &Challenge, answers: &[Answer]) -> Vec<Score> {
    let by_id: HashMap<&str, &Question> = challenge.questions.iter().map(|q| (q.id.as_str(), q)).collect();
    let mut grouped: Vec<(ChallengeCategory, DifficultyLevel, Vec<Answer>)> = Vec::new();
    for answer in answers {
        let Some(question) = by_id.get(answer.question_id.as_str()) else {
            continue;
        };
        let category = question.category();
        let level = question
            .metadata
            .get("difficulty")
            .and_then(|v| v.as_i64())
            .map(DifficultyLevel::clamped)
            .or(challenge.difficulty)
            .unwrap_or_default();
        match grouped.iter_mut().find(|(c, _, _)| *c == category) {
            Some((_, _, list)) => list.push(answer.clone()),
            None => grouped.push((category, level, vec![answer.clone()])),
        }
    }

    let completed_at = Utc::now();
    let mut rng = rand::thread_rng();
    grouped
        .into_iter()
        .map(|(category, level, list)| {
            let raw = calculate_raw_score(&list);
            let times: Vec<f64> = list.iter().map(|a| a.response_time_ms).collect();
            Score {
                id: generate_id("sc", completed_at.timestamp_millis(), &mut rng),
                user_id: user_id.to_string(),
                challenge_id: challenge.id.clone(),
                category,
                raw_score: raw,
                normalized_score: normalize_score(raw as f64, 0.0, 100.0),
                accuracy: calculate_accuracy(&list),
                average_response_time: mean(&times),
                difficulty: level,
                completed_at,
            }
        })
        .collect()
}

#[instrument(level = "debug", skip(state))]
pub async fn session_status(state: &AppState, session_id: &str) -> Result<SessionOut, QuizError> {
    let sessions = state.sessions.read().await;
    let entry = sessions
        .get(session_id)
        .ok_or_else(|| QuizError::UnknownSession(session_id.to_string()))?;
    Ok(SessionOut {
        phase: entry.session.phase(),
        progress: entry.session.progress(),
        time_remaining: entry.session.time_remaining(),
        current_question: entry.session.current_question().cloned(),
    })
}

#[instrument(level = "debug", skip(state))]
pub async fn report(state: &AppState, user_id: &str, today: NaiveDate) -> ReportOut {
    let book = state.book_snapshot(user_id).await;
    let category_scores: Vec<CategoryScore> = book.category_scores().to_vec();
    ReportOut {
        total_score: book.total_score(),
        streak_count: book.streak_count(),
        best_streak: book.best_streak(),
        weekly_average: book.weekly_average(today),
        daily_scores: book.daily_scores(7, today),
        category_scores,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn daily_session_runs_to_a_recorded_result() {
        let state = AppState::default();
        let (session_id, challenge) = start_challenge(&state, Some("u1"), None, None).await;
        assert_eq!(challenge.questions.len(), 5);
        assert!(challenge.is_mixed());

        let mut last = None;
        for q in &challenge.questions {
            let out = submit_answer(&state, &session_id, q.correct_answer.clone(), 1200.0)
                .await
                .unwrap();
            assert!(out.correct);
            last = Some(out);
        }
        let last = last.unwrap();
        assert_eq!(last.phase, GamePhase::Result);
        let result = last.result.expect("finished session carries a result");
        assert_eq!(result.category_scores.len(), 5);
        assert_eq!(result.summary.accuracy, 1.0);
        assert!(result.category_scores.iter().all(|cs| cs.score == 100));
        assert_eq!(result.total_score, 100);

        let err = submit_answer(&state, &session_id, "x".into(), 0.0).await.unwrap_err();
        assert!(matches!(err, QuizError::UnknownSession(_)));

        let rep = report(&state, "u1", Utc::now().date_naive()).await;
        assert_eq!(rep.category_scores.len(), 5);
        assert_eq!(rep.streak_count, 1);
    }

    #[tokio::test]
    async fn typed_challenge_uses_requested_level() {
        let state = AppState::default();
        let (_, challenge) =
            start_challenge(&state, None, Some("mental-math"), Some(DifficultyLevel::clamped(4))).await;
        assert_eq!(challenge.questions.len(), 4);
        assert_eq!(challenge.category, Some(ChallengeCategory::Math));
        let (_, fallback) = start_challenge(&state, None, Some("no-such-test"), None).await;
        assert_eq!(fallback.test_type, Some(TestType::MentalMath));
    }

    #[tokio::test]
    async fn wrong_answer_is_reported_with_expected_value() {
        let state = AppState::default();
        let (session_id, challenge) =
            start_challenge(&state, Some("u2"), Some("mental-math"), Some(DifficultyLevel::clamped(3))).await;
        let out = submit_answer(&state, &session_id, "-1".into(), 3000.0).await.unwrap();
        assert!(!out.correct);
        assert_eq!(out.expected, challenge.questions[0].correct_answer);
        assert_eq!(out.progress.current, 2);
        let status = session_status(&state, &session_id).await.unwrap();
        assert_eq!(status.current_question.map(|q| q.id), Some(challenge.questions[1].id.clone()));
    }

    #[test]
    fn scores_split_by_category() {
        let mut g = crate::generators::QuestionGenerator::seeded(1, crate::rng::SystemClock);
        let challenge = g.daily_challenge(&HashMap::new(), 30);
        let answers: Vec<Answer> = challenge
            .questions
            .iter()
            .enumerate()
            .map(|(i, q)| Answer {
                question_id: q.id.clone(),
                user_answer: q.correct_answer.clone(),
                is_correct: i % 2 == 0,
                response_time_ms: 10_000.0,
                answered_at: Utc::now(),
            })
            .collect();
        let scores = scores_for("u", &challenge, &answers);
        assert_eq!(scores.len(), 5);
        let attention = scores.iter().find(|s| s.category == ChallengeCategory::Attention).unwrap();
        assert_eq!(attention.raw_score, 100);
        let memory = scores.iter().find(|s| s.category == ChallengeCategory::Memory).unwrap();
        assert_eq!(memory.raw_score, 0);
        assert!(scores.iter().all(|s| s.difficulty == DifficultyLevel::MIN));
    }
}
