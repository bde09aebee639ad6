//! Pair-matching board. Scored on the client against the board itself.

use serde_json::json;

use super::{meta, QuestionGenerator};
use crate::domain::{AnswerValue, DifficultyLevel, Question, TestType};
use crate::rng::{Clock, RandomSource};
use crate::seeds::CARD_MATCH_ITEMS;

pub(crate) fn pair_count(difficulty: DifficultyLevel) -> usize {
  match difficulty.get() {
    1 => 3,
    2 => 4,
    3 => 6,
    4 => 8,
    _ => 10,
  }
}

impl<R: RandomSource, C: Clock> QuestionGenerator<R, C> {
  pub fn card_match(&mut self, difficulty: DifficultyLevel) -> Vec<Question> {
    let count = pair_count(difficulty);
    let selected: Vec<String> = self
      .rng
      .shuffle(&CARD_MATCH_ITEMS)
      .into_iter()
      .take(count)
      .map(String::from)
      .collect();
    let mut doubled = selected.clone();
    doubled.extend(selected.iter().cloned());
    let board = self.rng.shuffle(&doubled);

    let q = self.question(
      "cm",
      TestType::CardMatch,
      "おなじ えがらの ペアを みつけてね！".to_string(),
      None,
      AnswerValue::Many(selected),
      meta([("cards", json!(board)), ("pairCount", json!(count))]),
    );
    vec![q]
  }
}
