//! Question generation.
//!
//! `QuestionGenerator` owns the random source and the clock; each submodule
//! adds one generator to it. Generators are independent of each other: every
//! call builds fresh questions from the item banks and the two injected
//! sources only.

use std::collections::HashMap;

use rand::{rngs::StdRng, SeedableRng};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::domain::{AnswerValue, Challenge, ChallengeCategory, DifficultyLevel, Question, TestType};
use crate::rng::{Clock, RandomSource, SystemClock};
use crate::seeds::LanguageItem;
use crate::util::generate_id;

mod card_match;
mod language;
mod math;
mod memory;
mod orientation;
mod spatial;

pub use language::{accept_language_items, validate_language_item};
pub use orientation::day_of_month_options;

/// Seconds a player gets per question in a challenge.
pub const DEFAULT_SECONDS_PER_QUESTION: u32 = 30;

pub struct QuestionGenerator<R = StdRng, C = SystemClock> {
  rng: R,
  clock: C,
  extra_language_items: Vec<LanguageItem>,
}

impl QuestionGenerator<StdRng, SystemClock> {
  /// OS-seeded randomness and the system clock.
  pub fn from_entropy() -> Self {
    QuestionGenerator::new(StdRng::from_entropy(), SystemClock)
  }
}

impl<C: Clock> QuestionGenerator<StdRng, C> {
  pub fn seeded(seed: u64, clock: C) -> Self {
    QuestionGenerator::new(StdRng::seed_from_u64(seed), clock)
  }
}

impl<R: RandomSource, C: Clock> QuestionGenerator<R, C> {
  pub fn new(rng: R, clock: C) -> Self {
    Self { rng, clock, extra_language_items: Vec::new() }
  }

  /// Extra language items (e.g. from the TOML config) joining the built-in banks.
  pub fn with_language_items(mut self, items: Vec<LanguageItem>) -> Self {
    self.extra_language_items = items;
    self
  }

  /// Dispatch by test-type name. Unknown names fall back to the arithmetic
  /// generator; the result is never empty.
  #[instrument(level = "debug", skip(self), fields(%difficulty))]
  pub fn generate(&mut self, test_type: &str, difficulty: DifficultyLevel) -> Vec<Question> {
    let resolved = TestType::from_name(test_type);
    if resolved.is_none() {
      debug!(target: "quiz", requested = %test_type, "Unknown test type; using mental-math");
    }
    self.generate_type(resolved.unwrap_or(TestType::MentalMath), difficulty)
  }

  pub fn generate_type(&mut self, test_type: TestType, difficulty: DifficultyLevel) -> Vec<Question> {
    let questions = match test_type {
      TestType::CardMatch => self.card_match(difficulty),
      TestType::WordMemory => self.word_memory(difficulty),
      TestType::Orientation => self.orientation(difficulty),
      TestType::MentalMath => self.mental_math(difficulty),
      TestType::CategorySort => self.category_sort(difficulty),
      TestType::NumberSequence => self.number_sequence(difficulty),
    };
    debug!(target: "quiz", test_type = %test_type, %difficulty, count = questions.len(), "Generated questions");
    questions
  }

  /// Challenge wrapping the questions of one test type.
  pub fn challenge(&mut self, test_type: TestType, difficulty: DifficultyLevel, seconds_per_question: u32) -> Challenge {
    let questions = self.generate_type(test_type, difficulty);
    let id = self.next_id("ch");
    Challenge {
      id,
      test_type: Some(test_type),
      category: Some(test_type.category()),
      difficulty: Some(difficulty),
      time_limit: questions.len() as u32 * seconds_per_question,
      questions,
      created_at: self.clock.now_utc(),
    }
  }

  /// One question per category in HDS-R administration order, each at that
  /// category's level (level 1 when missing). Only the first question of each
  /// generator is kept and stamped with its category and level.
  pub fn daily_challenge(
    &mut self,
    levels: &HashMap<ChallengeCategory, DifficultyLevel>,
    seconds_per_question: u32,
  ) -> Challenge {
    let mut questions = Vec::with_capacity(ChallengeCategory::CLINICAL_ORDER.len());
    for category in ChallengeCategory::CLINICAL_ORDER {
      let level = levels.get(&category).copied().unwrap_or_default();
      let first = self.generate_type(category.default_test_type(), level).into_iter().next();
      if let Some(mut q) = first {
        q.metadata.insert("category".into(), Value::String(category.as_str().into()));
        q.metadata.insert("difficulty".into(), Value::from(level.get()));
        questions.push(q);
      }
    }
    let id = self.next_id("daily");
    Challenge {
      id,
      test_type: None,
      category: None,
      difficulty: None,
      time_limit: questions.len() as u32 * seconds_per_question,
      questions,
      created_at: self.clock.now_utc(),
    }
  }

  pub(crate) fn next_id(&mut self, prefix: &str) -> String {
    let now = self.clock.now_millis();
    generate_id(prefix, now, &mut self.rng)
  }

  pub(crate) fn question(
    &mut self,
    prefix: &str,
    test_type: TestType,
    prompt: String,
    options: Option<Vec<String>>,
    correct_answer: AnswerValue,
    mut metadata: Map<String, Value>,
  ) -> Question {
    metadata
      .entry("category")
      .or_insert_with(|| Value::String(test_type.category().as_str().into()));
    Question {
      id: self.next_id(prefix),
      test_type,
      prompt,
      options,
      correct_answer,
      metadata,
    }
  }

  /// Four options around a numeric answer: deltas +1, -1, +2, -2 in that
  /// order, kept when `allowed`, deduplicated, never equal to the answer, the
  /// first three taken. Topped up with larger deltas when filtering left too
  /// few. Only the final order is random.
  pub(crate) fn numeric_options(&mut self, answer: i64, allowed: impl Fn(i64) -> bool) -> Vec<String> {
    let mut wrong: Vec<i64> = Vec::new();
    for delta in [1, -1, 2, -2] {
      let candidate = answer + delta;
      if allowed(candidate) && candidate != answer && !wrong.contains(&candidate) {
        wrong.push(candidate);
      }
    }
    wrong.truncate(3);
    let mut extra = 3;
    while wrong.len() < 3 {
      let candidate = answer + extra;
      if allowed(candidate) && !wrong.contains(&candidate) {
        wrong.push(candidate);
      }
      extra += 1;
    }
    let mut options = vec![answer.to_string()];
    options.extend(wrong.iter().map(|v| v.to_string()));
    self.rng.shuffle(&options)
  }
}

/// Generate with OS randomness and the system clock.
pub fn generate_questions(test_type: &str, difficulty: DifficultyLevel) -> Vec<Question> {
  QuestionGenerator::from_entropy().generate(test_type, difficulty)
}

pub(crate) fn meta(pairs: impl IntoIterator<Item = (&'static str, Value)>) -> Map<String, Value> {
  pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}
