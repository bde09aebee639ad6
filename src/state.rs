//! Application state: config, language bank, live sessions and per-user score books.
//!
//! Everything lives in memory for the lifetime of the process. Sessions are
//! keyed by id, score books by user id.

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::config::{load_quiz_config_from_env, QuizConfig};
use crate::generators::QuestionGenerator;
use crate::rng::SystemClock;
use crate::scorebook::ScoreBook;
use crate::seeds::LanguageItem;
use crate::session::GameSession;

/// Seconds a session outlives its challenge's time limit before it is dropped.
pub const SESSION_GRACE_SECS: i64 = 300;

/// A running session, the user it belongs to and when it started.
#[derive(Clone, Debug)]
pub struct SessionEntry {
    pub user_id: String,
    pub session: GameSession,
    pub started_at: DateTime<Utc>,
}

impl SessionEntry {
    /// Past the challenge time limit plus the grace period.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        let limit = self.session.challenge().map(|c| i64::from(c.time_limit)).unwrap_or(0);
        now > self.started_at + Duration::seconds(limit + SESSION_GRACE_SECS)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: QuizConfig,
    pub language_bank: Arc<Vec<LanguageItem>>,
    pub sessions: Arc<RwLock<HashMap<String, SessionEntry>>>,
    pub books: Arc<RwLock<HashMap<String, ScoreBook>>>,
}

impl AppState {
    /// Build state from env: load config and validate the extra language bank.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        Self::with_config(load_quiz_config_from_env())
    }

    pub fn with_config(config: QuizConfig) -> Self {
        let language_bank = config.language_bank();
        info!(
            target: "nouryoku",
            trend_window = config.trend_window,
            accuracy_window = config.accuracy_window,
            seconds_per_question = config.seconds_per_question,
            extra_language_items = language_bank.len(),
            "Quiz engine configured"
        );
        Self {
            config,
            language_bank: Arc::new(language_bank),
            sessions: Arc::new(RwLock::new(HashMap::new())),
            books: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Fresh OS-seeded generator carrying the configured language items.
    pub fn generator(&self) -> QuestionGenerator<rand::rngs::StdRng, SystemClock> {
        QuestionGenerator::from_entropy().with_language_items(self.language_bank.as_ref().clone())
    }

    /// Store a session started at `now`, dropping abandoned ones first.
    #[instrument(level = "debug", skip(self, session))]
    pub async fn insert_session(&self, user_id: &str, session: GameSession, now: DateTime<Utc>) -> String {
        let id = Uuid::new_v4().to_string();
        let entry = SessionEntry { user_id: user_id.to_string(), session, started_at: now };
        let mut sessions = self.sessions.write().await;
        evict_expired(&mut sessions, now);
        sessions.insert(id.clone(), entry);
        id
    }

    /// Drop every session that has expired at `now`; returns how many went.
    pub async fn evict_expired(&self, now: DateTime<Utc>) -> usize {
        evict_expired(&mut *self.sessions.write().await, now)
    }

    /// Clone of the user's score book, empty for unknown users.
    pub async fn book_snapshot(&self, user_id: &str) -> ScoreBook {
        self.books
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_else(|| ScoreBook::new(self.config.trend_window))
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_config(QuizConfig::default())
    }
}

fn evict_expired(sessions: &mut HashMap<String, SessionEntry>, now: DateTime<Utc>) -> usize {
    let before = sessions.len();
    sessions.retain(|_, entry| !entry.is_expired(now));
    let evicted = before - sessions.len();
    if evicted > 0 {
        debug!(target: "nouryoku", evicted, remaining = sessions.len(), "Expired sessions dropped");
    }
    evicted
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::domain::{DifficultyLevel, TestType};

    fn playing(state: &AppState) -> GameSession {
        let challenge = state.generator().challenge(TestType::MentalMath, DifficultyLevel::MIN, 30);
        let mut session = GameSession::new();
        session.start(challenge);
        session
    }

    #[tokio::test]
    async fn abandoned_sessions_are_dropped_on_the_next_start() {
        let state = AppState::default();
        let t0 = Utc::now();
        for _ in 0..50 {
            let session = playing(&state);
            state.insert_session("walkaway", session, t0).await;
        }
        assert_eq!(state.sessions.read().await.len(), 50);

        let limit = playing(&state).challenge().map(|c| i64::from(c.time_limit)).unwrap_or(0);
        assert!(limit > 0);
        let still_live = t0 + Duration::seconds(limit + SESSION_GRACE_SECS);
        let kept = state.insert_session("u", playing(&state), still_live).await;
        assert_eq!(state.sessions.read().await.len(), 51);

        let later = still_live + Duration::seconds(1);
        state.insert_session("u", playing(&state), later).await;
        let sessions = state.sessions.read().await;
        assert_eq!(sessions.len(), 2);
        assert!(sessions.contains_key(&kept));
    }

    #[tokio::test]
    async fn explicit_eviction_reports_count() {
        let state = AppState::default();
        let t0 = Utc::now();
        state.insert_session("a", playing(&state), t0).await;
        state.insert_session("b", playing(&state), t0).await;
        assert_eq!(state.evict_expired(t0).await, 0);
        assert_eq!(state.evict_expired(t0 + Duration::days(1)).await, 2);
        assert!(state.sessions.read().await.is_empty());
    }
}
