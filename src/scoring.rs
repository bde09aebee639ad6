//! Session scoring and category aggregation.

use serde::{Deserialize, Serialize};

use crate::domain::{Answer, AnswerValue, CategoryScore, Trend};
use crate::util::{mean, round_half_up, round_one_decimal, trend_direction};

/// Mean response time at which the speed bonus reaches zero.
const SPEED_BONUS_HORIZON_MS: f64 = 10_000.0;
const MAX_SPEED_BONUS: f64 = 0.2;
pub const DEFAULT_TREND_WINDOW: usize = 7;

/// Fraction of correct answers; `0.0` for no answers.
pub fn calculate_accuracy(answers: &[Answer]) -> f64 {
  if answers.is_empty() {
    return 0.0;
  }
  answers.iter().filter(|a| a.is_correct).count() as f64 / answers.len() as f64
}

/// Accuracy plus up to 20% speed bonus, as a percentage.
///
/// Not clamped: perfect accuracy with a quick mean response scores above 100.
pub fn calculate_raw_score(answers: &[Answer]) -> u32 {
  if answers.is_empty() {
    return 0;
  }
  let accuracy = calculate_accuracy(answers);
  let times: Vec<f64> = answers.iter().map(|a| a.response_time_ms).collect();
  let speed_bonus = (1.0 - mean(&times) / SPEED_BONUS_HORIZON_MS).max(0.0) * MAX_SPEED_BONUS;
  round_half_up((accuracy + speed_bonus) * 100.0).max(0.0) as u32
}

/// Weighted mean of the category scores present; missing categories add
/// neither weight nor score. `0` for no input.
pub fn calculate_total_score(category_scores: &[CategoryScore]) -> u32 {
  let mut weighted = 0.0;
  let mut total_weight = 0.0;
  for cs in category_scores {
    let weight = cs.category.weight();
    weighted += cs.score as f64 * weight;
    total_weight += weight;
  }
  if total_weight > 0.0 {
    round_half_up(weighted / total_weight) as u32
  } else {
    0
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTrend {
  pub trend: Trend,
  pub change_percent: f64,
}

/// Compare the mean of the last `window` scores with the `window` before
/// them, or with the very first score when history is shorter than that.
///
/// The label comes from `trend_direction` on the same history, not from the
/// sign of `change_percent`; near ±3% the two can disagree.
pub fn calculate_category_trend(scores: &[f64], window: usize) -> CategoryTrend {
  if scores.len() < 2 {
    return CategoryTrend { trend: Trend::Stable, change_percent: 0.0 };
  }
  let window = window.max(1);
  let len = scores.len();
  let recent = mean(&scores[len - window.min(len)..]);
  let previous = if len > window {
    mean(&scores[len.saturating_sub(window * 2)..len - window])
  } else {
    scores[0]
  };
  let change_percent = if previous > 0.0 { (recent - previous) / previous * 100.0 } else { 0.0 };
  CategoryTrend {
    trend: trend_direction(scores, window),
    change_percent: round_one_decimal(change_percent),
  }
}

/// Exact or membership match of a user answer against the correct one.
///
/// Single vs single compares strings; a single answer to a multi-valued
/// question counts when it is one of the values; multi vs multi must hold the
/// same set; multi vs single must consist of exactly the correct value.
pub fn grade(correct: &AnswerValue, user: &AnswerValue) -> bool {
  match (correct, user) {
    (AnswerValue::Single(c), AnswerValue::Single(u)) => c == u,
    (AnswerValue::Many(cs), AnswerValue::Single(u)) => cs.contains(u),
    (AnswerValue::Many(cs), AnswerValue::Many(us)) => {
      let mut a: Vec<&String> = cs.iter().collect();
      let mut b: Vec<&String> = us.iter().collect();
      a.sort();
      a.dedup();
      b.sort();
      b.dedup();
      a == b
    }
    (AnswerValue::Single(c), AnswerValue::Many(us)) => us.len() == 1 && us[0] == *c,
  }
}
