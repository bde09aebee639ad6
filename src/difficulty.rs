//! Per-category difficulty controller.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{AgeGroup, ChallengeCategory, DifficultyLevel};
use crate::util::mean;

const UPGRADE_THRESHOLD: f64 = 0.8;
const DOWNGRADE_THRESHOLD: f64 = 0.4;
const MIN_ATTEMPTS: usize = 3;

/// Input to [`adjust_difficulty`]. `recent_accuracies` is oldest first; the
/// caller decides the window length.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyProfile {
  pub category: ChallengeCategory,
  pub current_level: DifficultyLevel,
  pub recent_accuracies: Vec<f64>,
}

/// Advance at mean accuracy >= 0.8, retreat at <= 0.4, otherwise hold.
/// Fewer than three samples always hold. Never leaves `[1, 5]`.
pub fn adjust_difficulty(profile: &DifficultyProfile) -> DifficultyLevel {
  let current = profile.current_level;
  if profile.recent_accuracies.len() < MIN_ATTEMPTS {
    return current;
  }
  let avg = mean(&profile.recent_accuracies);
  let next = if avg >= UPGRADE_THRESHOLD && current < DifficultyLevel::MAX {
    current.harder()
  } else if avg <= DOWNGRADE_THRESHOLD && current > DifficultyLevel::MIN {
    current.easier()
  } else {
    current
  };
  if next != current {
    debug!(target: "quiz", category = %profile.category, from = %current, to = %next, avg, "Difficulty adjusted");
  }
  next
}

/// Starting level by age group; unknown groups start at 2.
pub fn get_initial_difficulty(age_group: &str) -> DifficultyLevel {
  match AgeGroup::parse(age_group) {
    Ok(group) => initial_difficulty_for(group),
    Err(_) => DifficultyLevel::clamped(2),
  }
}

pub fn initial_difficulty_for(group: AgeGroup) -> DifficultyLevel {
  DifficultyLevel::clamped(match group {
    AgeGroup::Child => 1,
    AgeGroup::Teen => 2,
    AgeGroup::Adult => 3,
    AgeGroup::Senior => 2,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn profile(level: i64, accuracies: &[f64]) -> DifficultyProfile {
    DifficultyProfile {
      category: ChallengeCategory::Memory,
      current_level: DifficultyLevel::clamped(level),
      recent_accuracies: accuracies.to_vec(),
    }
  }

  fn adjusted(level: i64, accuracies: &[f64]) -> u8 {
    adjust_difficulty(&profile(level, accuracies)).get()
  }

  #[test]
  fn advances_on_high_accuracy() {
    assert_eq!(adjusted(3, &[0.9, 0.8, 0.85]), 4);
    assert_eq!(adjusted(3, &[0.8, 0.8, 0.8]), 4);
  }

  #[test]
  fn retreats_on_low_accuracy() {
    assert_eq!(adjusted(3, &[0.2, 0.4, 0.3]), 2);
    assert_eq!(adjusted(3, &[0.5, 0.4, 0.3]), 2);
  }

  #[test]
  fn holds_in_the_middle() {
    assert_eq!(adjusted(3, &[0.5, 0.6, 0.7]), 3);
  }

  #[test]
  fn stays_within_bounds() {
    assert_eq!(adjusted(5, &[1.0, 1.0, 1.0]), 5);
    assert_eq!(adjusted(1, &[0.0, 0.1, 0.0]), 1);
  }

  #[test]
  fn needs_three_samples() {
    assert_eq!(adjusted(3, &[]), 3);
    assert_eq!(adjusted(3, &[1.0]), 3);
    assert_eq!(adjusted(3, &[0.0, 0.0]), 3);
  }

  #[test]
  fn initial_levels_by_age_group() {
    assert_eq!(get_initial_difficulty("child").get(), 1);
    assert_eq!(get_initial_difficulty("teen").get(), 2);
    assert_eq!(get_initial_difficulty("adult").get(), 3);
    assert_eq!(get_initial_difficulty("senior").get(), 2);
    assert_eq!(get_initial_difficulty("robot").get(), 2);
  }
}
