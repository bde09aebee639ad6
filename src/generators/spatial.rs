//! Working-memory items: reversed digit span and next term of a progression.

use serde_json::json;

use super::{meta, QuestionGenerator};
use crate::domain::{AnswerValue, DifficultyLevel, Question, TestType};
use crate::rng::{Clock, RandomSource};
use crate::seeds::SEQUENCES;

impl<R: RandomSource, C: Clock> QuestionGenerator<R, C> {
  /// One item from either sub-test, chosen at random whatever the level.
  pub fn number_sequence(&mut self, _difficulty: DifficultyLevel) -> Vec<Question> {
    let q = if self.rng.next_int(0, 1) == 0 { self.reverse_digits() } else { self.next_term() };
    vec![q]
  }

  fn reverse_digits(&mut self) -> Question {
    let digits: Vec<u8> = self.rng.shuffle(&[0u8, 1, 2, 3, 4, 5, 6, 7, 8, 9]).into_iter().take(3).collect();
    let shown = spell(&digits);
    let reversed: Vec<u8> = digits.iter().rev().copied().collect();
    let answer = spell(&reversed);

    let wrong: Vec<String> = permutations(&digits)
      .iter()
      .map(|p| spell(p))
      .filter(|p| *p != answer)
      .collect();
    let mut options: Vec<String> = self.rng.shuffle(&wrong).into_iter().take(3).collect();
    options.push(answer.clone());
    let options = self.rng.shuffle(&options);

    self.question(
      "sp",
      TestType::NumberSequence,
      format!("「{shown}」を ぎゃくから いうと？"),
      Some(options),
      AnswerValue::Single(answer),
      meta([("testSubtype", json!("digit-span-reverse")), ("digits", json!(digits))]),
    )
  }

  fn next_term(&mut self) -> Question {
    let (terms, answer) = self.rng.pick(&SEQUENCES).copied().unwrap_or(SEQUENCES[0]);
    let shown = terms.iter().map(i64::to_string).collect::<Vec<_>>().join(", ");
    let options = self.numeric_options(answer, |v| v > 0);
    self.question(
      "sp",
      TestType::NumberSequence,
      format!("{shown}, ？ ― つぎの かずは？"),
      Some(options),
      AnswerValue::Single(answer.to_string()),
      meta([("testSubtype", json!("number-sequence")), ("terms", json!(terms))]),
    )
  }
}

/// Digits joined with the separator the prompt uses.
fn spell(digits: &[u8]) -> String {
  digits.iter().map(u8::to_string).collect::<Vec<_>>().join("・")
}

/// All orderings of three values.
fn permutations(d: &[u8]) -> Vec<[u8; 3]> {
  let (a, b, c) = (d[0], d[1], d[2]);
  vec![[a, b, c], [a, c, b], [b, a, c], [b, c, a], [c, a, b], [c, b, a]]
}

#[cfg(test)]
mod tests {
  use super::super::testing::*;
  use super::*;

  fn digits_of(s: &str) -> Vec<String> {
    let mut v: Vec<String> = s.split('・').map(String::from).collect();
    v.sort();
    v
  }

  #[test]
  fn both_subtests_appear_and_are_sound() {
    let mut g = generator(41);
    let mut subtypes = std::collections::HashSet::new();
    for _ in 0..60 {
      let qs = g.number_sequence(level(1));
      assert_eq!(qs.len(), 1);
      assert_options_sound(&qs[0]);
      assert_eq!(qs[0].options.as_ref().map(Vec::len), Some(4));
      subtypes.insert(qs[0].metadata["testSubtype"].to_string());
    }
    assert_eq!(subtypes.len(), 2);
  }

  #[test]
  fn reversal_options_are_permutations_of_the_shown_digits() {
    let mut g = generator(43);
    for _ in 0..40 {
      let q = g.number_sequence(level(3)).remove(0);
      if q.metadata["testSubtype"] != "digit-span-reverse" {
        continue;
      }
      let digits: Vec<u8> = serde_json::from_value(q.metadata["digits"].clone()).unwrap();
      let reversed: Vec<u8> = digits.iter().rev().copied().collect();
      assert_eq!(q.correct_answer.primary(), spell(&reversed));
      let answer_digits = digits_of(q.correct_answer.primary());
      for o in q.options.as_ref().unwrap() {
        assert_eq!(digits_of(o), answer_digits);
      }
    }
  }

  #[test]
  fn next_term_distractors_are_positive_and_close() {
    let mut g = generator(47);
    for _ in 0..40 {
      let q = g.number_sequence(level(2)).remove(0);
      if q.metadata["testSubtype"] != "number-sequence" {
        continue;
      }
      let answer: i64 = q.correct_answer.primary().parse().unwrap();
      for o in q.options.as_ref().unwrap() {
        let v: i64 = o.parse().unwrap();
        assert!(v > 0);
        assert!((v - answer).abs() <= 2);
      }
    }
  }
}
