//! Per-user score history: the explicit replacement for an ambient score store.
//!
//! A `ScoreBook` is plain data handed to whoever orchestrates sessions. It
//! keeps the score log, one aggregate per day, the current score per
//! category, and streaks.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::difficulty::{adjust_difficulty, DifficultyProfile};
use crate::domain::{CategoryScore, ChallengeCategory, DailyScore, DifficultyLevel, Score};
use crate::scoring::{calculate_category_trend, calculate_total_score, DEFAULT_TREND_WINDOW};
use crate::util::round_half_up;

/// How many recent session accuracies feed the difficulty controller.
pub const DEFAULT_ACCURACY_WINDOW: usize = 5;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBook {
    scores: Vec<Score>,
    daily_scores: Vec<DailyScore>,
    category_scores: Vec<CategoryScore>,
    streak_count: u32,
    best_streak: u32,
    #[serde(skip, default = "default_trend_window")]
    trend_window: usize,
}

fn default_trend_window() -> usize {
    DEFAULT_TREND_WINDOW
}

impl Default for ScoreBook {
    fn default() -> Self {
        Self::new(DEFAULT_TREND_WINDOW)
    }
}

impl ScoreBook {
    pub fn new(trend_window: usize) -> Self {
        Self {
            scores: Vec::new(),
            daily_scores: Vec::new(),
            category_scores: Vec::new(),
            streak_count: 0,
            best_streak: 0,
            trend_window,
        }
    }

    /// Record a finished session and refresh every aggregate it touches.
    pub fn add_score(&mut self, score: Score) {
        let date = score.completed_at.date_naive();
        let category = score.category;
        let normalized = score.normalized_score;
        self.scores.push(score);

        match self.daily_scores.iter_mut().find(|d| d.date == date) {
            Some(daily) => {
                let sum = daily.total_score as f64 * daily.challenge_count as f64 + normalized as f64;
                daily.challenge_count += 1;
                daily.total_score = round_half_up(sum / daily.challenge_count as f64) as u32;
            }
            None => self.daily_scores.push(DailyScore {
                date,
                total_score: normalized,
                category_scores: Vec::new(),
                challenge_count: 1,
            }),
        }

        let history: Vec<f64> = self
            .scores_by_category(category)
            .iter()
            .map(|s| s.normalized_score as f64)
            .collect();
        let trend = calculate_category_trend(&history, self.trend_window);
        let updated = CategoryScore {
            category,
            score: normalized,
            trend: trend.trend,
            change_percent: trend.change_percent,
        };
        match self.category_scores.iter_mut().find(|c| c.category == category) {
            Some(existing) => *existing = updated.clone(),
            None => self.category_scores.push(updated.clone()),
        }
        if let Some(daily) = self.daily_scores.iter_mut().find(|d| d.date == date) {
            match daily.category_scores.iter_mut().find(|c| c.category == category) {
                Some(existing) => *existing = updated,
                None => daily.category_scores.push(updated),
            }
        }

        let streak = self.streak_ending_at_latest_day();
        self.update_streak(streak);
        debug!(target: "quiz", %category, normalized, streak, "Score recorded");
    }

    /// Set the streak explicitly; the best streak never decreases.
    pub fn update_streak(&mut self, count: u32) {
        self.streak_count = count;
        self.best_streak = self.best_streak.max(count);
    }

    /// Consecutive days with at least one recorded session, counted back
    /// from the most recent such day.
    fn streak_ending_at_latest_day(&self) -> u32 {
        let mut days: Vec<NaiveDate> = self.daily_scores.iter().map(|d| d.date).collect();
        days.sort_unstable();
        days.dedup();
        let Some(mut cursor) = days.last().copied() else {
            return 0;
        };
        let mut streak = 0;
        for day in days.iter().rev() {
            if *day != cursor {
                break;
            }
            streak += 1;
            cursor -= Duration::days(1);
        }
        streak
    }

    /// Daily aggregates from `today - days` on, oldest first.
    pub fn daily_scores(&self, days: i64, today: NaiveDate) -> Vec<DailyScore> {
        let cutoff = today - Duration::days(days);
        let mut out: Vec<DailyScore> = self.daily_scores.iter().filter(|d| d.date >= cutoff).cloned().collect();
        out.sort_by_key(|d| d.date);
        out
    }

    pub fn category_trend(&self, category: ChallengeCategory) -> Option<&CategoryScore> {
        self.category_scores.iter().find(|c| c.category == category)
    }

    /// Rounded mean of the daily totals over the last seven days; `0` if none.
    pub fn weekly_average(&self, today: NaiveDate) -> u32 {
        let recent = self.daily_scores(7, today);
        if recent.is_empty() {
            return 0;
        }
        let sum: f64 = recent.iter().map(|d| d.total_score as f64).sum();
        round_half_up(sum / recent.len() as f64) as u32
    }

    pub fn latest_score(&self) -> Option<&Score> {
        self.scores.last()
    }

    pub fn scores_by_category(&self, category: ChallengeCategory) -> Vec<&Score> {
        self.scores.iter().filter(|s| s.category == category).collect()
    }

    pub fn total_score_for_date(&self, date: NaiveDate) -> u32 {
        self.daily_scores.iter().find(|d| d.date == date).map(|d| d.total_score).unwrap_or(0)
    }

    /// Weighted total over the current category scores.
    pub fn total_score(&self) -> u32 {
        calculate_total_score(&self.category_scores)
    }

    /// Profile for the difficulty controller: the last `window` session
    /// accuracies in this category, oldest first.
    pub fn difficulty_profile(
        &self,
        category: ChallengeCategory,
        current_level: DifficultyLevel,
        window: usize,
    ) -> DifficultyProfile {
        let all: Vec<f64> = self.scores_by_category(category).iter().map(|s| s.accuracy).collect();
        let start = all.len().saturating_sub(window);
        DifficultyProfile {
            category,
            current_level,
            recent_accuracies: all[start..].to_vec(),
        }
    }

    pub fn next_difficulty(
        &self,
        category: ChallengeCategory,
        current_level: DifficultyLevel,
        window: usize,
    ) -> DifficultyLevel {
        adjust_difficulty(&self.difficulty_profile(category, current_level, window))
    }

    /// Level to serve next for each category: the last played level run
    /// through the controller, or `fallback` for categories never played.
    pub fn levels(&self, fallback: DifficultyLevel, window: usize) -> Vec<(ChallengeCategory, DifficultyLevel)> {
        ChallengeCategory::ALL
            .into_iter()
            .map(|category| {
                let level = match self.scores_by_category(category).last() {
                    Some(last) => self.next_difficulty(category, last.difficulty, window),
                    None => fallback,
                };
                (category, level)
            })
            .collect()
    }

    pub fn scores(&self) -> &[Score] {
        &self.scores
    }

    pub fn category_scores(&self) -> &[CategoryScore] {
        &self.category_scores
    }

    pub fn streak_count(&self) -> u32 {
        self.streak_count
    }

    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }
}
