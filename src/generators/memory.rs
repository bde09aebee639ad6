//! Three-word recall, asked as a recognition item.

use serde_json::{json, Value};

use super::{meta, QuestionGenerator};
use crate::domain::{AnswerValue, DifficultyLevel, Question, TestType};
use crate::rng::{Clock, RandomSource};
use crate::seeds::{confusable_words, WORD_SETS};

impl<R: RandomSource, C: Clock> QuestionGenerator<R, C> {
  /// Picks one three-word set, then asks which of four same-category words
  /// was in it. Always exactly one question.
  pub fn word_memory(&mut self, difficulty: DifficultyLevel) -> Vec<Question> {
    let set = self.rng.pick(&WORD_SETS).copied().unwrap_or(WORD_SETS[0]);
    let target = self.rng.pick(&set).copied().unwrap_or(set[0]);

    let pool: Vec<&str> = confusable_words(target.hint)
      .iter()
      .copied()
      .filter(|word| *word != target.word)
      .collect();
    let mut options: Vec<String> = self.rng.shuffle(&pool).into_iter().take(3).map(String::from).collect();
    options.push(target.word.to_string());
    let options = self.rng.shuffle(&options);

    let words: Vec<Value> = set.iter().map(|mw| Value::String(mw.word.into())).collect();
    let metadata = meta([
      ("phase", json!("recall")),
      ("words", Value::Array(words)),
      ("hint", json!(target.hint)),
      ("displayTime", json!(3000 + difficulty.get() as u64 * 1000)),
      ("testSubtype", json!("three-word-recall")),
    ]);

    let q = self.question(
      "wm",
      TestType::WordMemory,
      format!("さっきおぼえた ことばのなかで「{}」はどれ？", target.hint),
      Some(options),
      AnswerValue::Single(target.word.to_string()),
      metadata,
    );
    vec![q]
  }
}

#[cfg(test)]
mod tests {
  use super::super::testing::*;
  use crate::domain::DifficultyLevel;
  use crate::seeds::WORD_SETS;

  #[test]
  fn one_recognition_question_with_four_options() {
    let mut g = generator(21);
    for seed_level in DifficultyLevel::all() {
      let qs = g.word_memory(seed_level);
      assert_eq!(qs.len(), 1);
      let q = &qs[0];
      assert_eq!(q.options.as_ref().map(Vec::len), Some(4));
      assert_options_sound(q);
    }
  }

  #[test]
  fn target_comes_from_the_shown_set_and_distractors_share_its_hint() {
    let mut g = generator(4);
    for _ in 0..30 {
      let q = g.word_memory(level(1)).remove(0);
      let target = q.correct_answer.primary().to_string();
      let set = WORD_SETS
        .iter()
        .find(|s| s.iter().any(|mw| mw.word == target))
        .expect("target belongs to a bank set");
      let hint = set.iter().find(|mw| mw.word == target).map(|mw| mw.hint).unwrap();
      assert_eq!(q.metadata["hint"], hint);
      let confusables = crate::seeds::confusable_words(hint);
      for o in q.options.as_ref().unwrap() {
        assert!(confusables.contains(&o.as_str()), "{o} is not a {hint}");
      }
    }
  }
}
