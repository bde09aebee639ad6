//! Category identification, odd-one-out and abstract commonality.

use serde_json::json;
use tracing::error;

use super::{meta, QuestionGenerator};
use crate::domain::{AnswerValue, DifficultyLevel, Question, TestType};
use crate::error::QuizError;
use crate::rng::{Clock, RandomSource};
use crate::seeds::{commonality_items, identify_items, odd_one_out_items, LanguageItem, LanguageKind};

impl<R: RandomSource, C: Clock> QuestionGenerator<R, C> {
  /// One item drawn uniformly from the applicable banks. Commonality items
  /// join the pool from level 3. Options keep their bank order.
  pub fn category_sort(&mut self, difficulty: DifficultyLevel) -> Vec<Question> {
    let mut pool = identify_items();
    pool.extend(odd_one_out_items());
    if difficulty.get() >= 3 {
      pool.extend(commonality_items());
    }
    pool.extend(
      self
        .extra_language_items
        .iter()
        .filter(|it| it.kind != LanguageKind::Commonality || difficulty.get() >= 3)
        .cloned(),
    );

    let Some(chosen) = self.rng.pick(&pool).cloned() else {
      return self.mental_math(difficulty);
    };
    let q = self.question(
      "lg",
      TestType::CategorySort,
      chosen.prompt,
      Some(chosen.options),
      AnswerValue::Single(chosen.answer),
      meta([("testSubtype", json!(chosen.kind.as_str()))]),
    );
    vec![q]
  }
}

/// Check a bank item: four distinct options holding the answer exactly once.
pub fn validate_language_item(item: &LanguageItem) -> Result<(), QuizError> {
  let invalid = |reason: &str| QuizError::InvalidBankItem { prompt: item.prompt.clone(), reason: reason.into() };
  if item.prompt.trim().is_empty() {
    return Err(invalid("empty prompt"));
  }
  if item.options.len() != 4 {
    return Err(invalid("expected exactly 4 options"));
  }
  let mut distinct = item.options.clone();
  distinct.sort();
  distinct.dedup();
  if distinct.len() != item.options.len() {
    return Err(invalid("duplicate options"));
  }
  if !item.options.contains(&item.answer) {
    return Err(invalid("answer is not among the options"));
  }
  Ok(())
}

/// Keep the valid items, logging and dropping the rest.
pub fn accept_language_items(items: Vec<LanguageItem>) -> Vec<LanguageItem> {
  items
    .into_iter()
    .filter(|it| match validate_language_item(it) {
      Ok(()) => true,
      Err(e) => {
        error!(target: "quiz", error = %e, "Skipping language bank item");
        false
      }
    })
    .collect()
}
