//! Serial 7s subtraction.

use serde_json::json;

use super::{meta, QuestionGenerator};
use crate::domain::{AnswerValue, DifficultyLevel, Question, TestType};
use crate::rng::{Clock, RandomSource};
use crate::seeds::SERIAL_SEVEN_CHAIN;

impl<R: RandomSource, C: Clock> QuestionGenerator<R, C> {
  /// Levels 1–2 ask only the first step (100 - 7). From level 3 the chain
  /// runs `min(difficulty, 5)` consecutive steps.
  pub fn mental_math(&mut self, difficulty: DifficultyLevel) -> Vec<Question> {
    let steps = if difficulty.get() <= 2 { 1 } else { (difficulty.get() as usize).min(5) };
    (0..steps).map(|step| self.serial_seven_step(step, steps)).collect()
  }

  fn serial_seven_step(&mut self, step: usize, total: usize) -> Question {
    let from = SERIAL_SEVEN_CHAIN[step];
    let answer = SERIAL_SEVEN_CHAIN[step + 1];
    let options = self.numeric_options(answer, |v| v >= 0);
    self.question(
      "mm",
      TestType::MentalMath,
      format!("{from} から 7 を ひくと いくつ？"),
      Some(options),
      AnswerValue::Single(answer.to_string()),
      meta([
        ("testSubtype", json!("serial-7")),
        ("step", json!(step + 1)),
        ("totalSteps", json!(total)),
      ]),
    )
  }
}
