//! One player's run through a challenge: phase machine, countdown and answer log.

use serde::{Deserialize, Serialize};

use crate::domain::{Answer, Challenge, Question};
use crate::scoring::{calculate_accuracy, calculate_raw_score};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    #[default]
    Idle,
    Ready,
    Memorize,
    Playing,
    Paused,
    Result,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
    pub percent: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub raw_score: u32,
    pub accuracy: f64,
    pub answered: usize,
    pub correct: usize,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    challenge: Option<Challenge>,
    question_index: usize,
    answers: Vec<Answer>,
    phase: GamePhase,
    time_remaining: u32,
    timer_running: bool,
}

impl GameSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a challenge and wait in `Ready` with the full time limit.
    pub fn start(&mut self, challenge: Challenge) {
        self.time_remaining = challenge.time_limit;
        self.challenge = Some(challenge);
        self.question_index = 0;
        self.answers.clear();
        self.phase = GamePhase::Ready;
        self.timer_running = false;
    }

    /// The countdown runs only while memorizing or playing.
    pub fn set_phase(&mut self, phase: GamePhase) {
        self.timer_running = matches!(phase, GamePhase::Playing | GamePhase::Memorize);
        self.phase = phase;
    }

    pub fn answer_question(&mut self, answer: Answer) {
        self.answers.push(answer);
    }

    /// Advance; moving past the last question ends the session.
    pub fn next_question(&mut self) {
        let total = self.total();
        let next = self.question_index + 1;
        if next >= total {
            self.phase = GamePhase::Result;
            self.timer_running = false;
        } else {
            self.question_index = next;
        }
    }

    pub fn pause(&mut self) {
        self.phase = GamePhase::Paused;
        self.timer_running = false;
    }

    pub fn resume(&mut self) {
        self.phase = GamePhase::Playing;
        self.timer_running = true;
    }

    pub fn finish(&mut self) {
        self.phase = GamePhase::Result;
        self.timer_running = false;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn set_time_remaining(&mut self, seconds: u32) {
        self.time_remaining = seconds;
    }

    /// One second of countdown. Running out of time ends the session.
    pub fn tick(&mut self) {
        if self.time_remaining == 0 {
            self.time_remaining = 0;
            self.timer_running = false;
            self.phase = GamePhase::Result;
            return;
        }
        if self.timer_running {
            self.time_remaining -= 1;
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.challenge.as_ref()?.questions.get(self.question_index)
    }

    pub fn progress(&self) -> Progress {
        let total = self.total();
        let current = (self.question_index + 1).min(total);
        let percent = if total > 0 {
            (current as f64 / total as f64 * 100.0).round() as u32
        } else {
            0
        };
        Progress { current, total, percent }
    }

    pub fn is_last_question(&self) -> bool {
        match &self.challenge {
            Some(ch) => self.question_index + 1 >= ch.questions.len(),
            None => false,
        }
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            raw_score: calculate_raw_score(&self.answers),
            accuracy: calculate_accuracy(&self.answers),
            answered: self.answers.len(),
            correct: self.answers.iter().filter(|a| a.is_correct).count(),
        }
    }

    pub fn challenge(&self) -> Option<&Challenge> {
        self.challenge.as_ref()
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn is_timer_running(&self) -> bool {
        self.timer_running
    }

    fn total(&self) -> usize {
        self.challenge.as_ref().map(|c| c.questions.len()).unwrap_or(0)
    }
}
