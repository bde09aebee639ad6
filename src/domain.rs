//! Domain models: difficulty, categories, test types, questions, answers and scores.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::QuizError;

/// Difficulty level, always within `[1, 5]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct DifficultyLevel(u8);

impl DifficultyLevel {
  pub const MIN: DifficultyLevel = DifficultyLevel(1);
  pub const MAX: DifficultyLevel = DifficultyLevel(5);

  /// Lenient constructor used at every wire boundary: out-of-range values are
  /// pulled back into `[1, 5]`.
  pub fn clamped(level: i64) -> Self {
    DifficultyLevel(level.clamp(1, 5) as u8)
  }

  pub fn get(self) -> u8 { self.0 }

  /// One level harder, saturating at 5.
  pub fn harder(self) -> Self { DifficultyLevel::clamped(self.0 as i64 + 1) }

  /// One level easier, saturating at 1.
  pub fn easier(self) -> Self { DifficultyLevel::clamped(self.0 as i64 - 1) }

  pub fn display_name(self) -> &'static str {
    match self.0 {
      1 => "やさしい",
      2 => "ふつう",
      3 => "ちょっとむずかしい",
      4 => "むずかしい",
      _ => "チャレンジ",
    }
  }

  pub fn all() -> impl Iterator<Item = DifficultyLevel> {
    (1..=5).map(DifficultyLevel)
  }
}

impl Default for DifficultyLevel {
  fn default() -> Self { DifficultyLevel(1) }
}

impl TryFrom<u8> for DifficultyLevel {
  type Error = QuizError;

  fn try_from(level: u8) -> Result<Self, Self::Error> {
    if (1..=5).contains(&level) {
      Ok(DifficultyLevel(level))
    } else {
      Err(QuizError::DifficultyOutOfRange(level as i64))
    }
  }
}

impl From<i64> for DifficultyLevel {
  fn from(level: i64) -> Self { DifficultyLevel::clamped(level) }
}

impl From<DifficultyLevel> for u8 {
  fn from(level: DifficultyLevel) -> Self { level.0 }
}

impl fmt::Display for DifficultyLevel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// The five cognitive domains a session can train.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeCategory {
  Memory,
  Attention,
  Language,
  Math,
  Spatial,
}

impl ChallengeCategory {
  pub const ALL: [ChallengeCategory; 5] = [
    ChallengeCategory::Memory,
    ChallengeCategory::Attention,
    ChallengeCategory::Language,
    ChallengeCategory::Math,
    ChallengeCategory::Spatial,
  ];

  /// HDS-R administration order, used for the daily challenge.
  pub const CLINICAL_ORDER: [ChallengeCategory; 5] = [
    ChallengeCategory::Attention,
    ChallengeCategory::Memory,
    ChallengeCategory::Math,
    ChallengeCategory::Language,
    ChallengeCategory::Spatial,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      ChallengeCategory::Memory => "memory",
      ChallengeCategory::Attention => "attention",
      ChallengeCategory::Language => "language",
      ChallengeCategory::Math => "math",
      ChallengeCategory::Spatial => "spatial",
    }
  }

  /// Weight of this category in the total score.
  pub fn weight(self) -> f64 {
    match self {
      ChallengeCategory::Memory => 0.25,
      ChallengeCategory::Attention => 0.20,
      ChallengeCategory::Language => 0.20,
      ChallengeCategory::Math => 0.15,
      ChallengeCategory::Spatial => 0.20,
    }
  }

  /// Test type served for this category when no explicit type is requested.
  pub fn default_test_type(self) -> TestType {
    match self {
      ChallengeCategory::Memory => TestType::WordMemory,
      ChallengeCategory::Attention => TestType::Orientation,
      ChallengeCategory::Language => TestType::CategorySort,
      ChallengeCategory::Math => TestType::MentalMath,
      ChallengeCategory::Spatial => TestType::NumberSequence,
    }
  }

  pub fn info(self) -> CategoryInfo {
    match self {
      ChallengeCategory::Memory => CategoryInfo { name_ja: "記憶力", icon: "brain", color: "#3D8B5F" },
      ChallengeCategory::Attention => CategoryInfo { name_ja: "注意力", icon: "eye", color: "#E8845C" },
      ChallengeCategory::Language => CategoryInfo { name_ja: "言語力", icon: "message-circle", color: "#5B9BD5" },
      ChallengeCategory::Math => CategoryInfo { name_ja: "計算力", icon: "calculator", color: "#F2C94C" },
      ChallengeCategory::Spatial => CategoryInfo { name_ja: "空間認識", icon: "box", color: "#9B72CF" },
    }
  }
}

impl std::str::FromStr for ChallengeCategory {
  type Err = QuizError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    ChallengeCategory::ALL
      .into_iter()
      .find(|c| c.as_str() == s)
      .ok_or_else(|| QuizError::UnknownCategory(s.to_string()))
  }
}

impl fmt::Display for ChallengeCategory {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Display metadata for a category.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInfo {
  pub name_ja: &'static str,
  pub icon: &'static str,
  pub color: &'static str,
}

/// Presentation mechanism of a question. Wire names are the ones clients
/// already send; the orientation and category-sort tests kept the names of
/// the mechanics they replaced ("stroop", "anagram").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestType {
  #[serde(rename = "card-match")]
  CardMatch,
  #[serde(rename = "word-memory")]
  WordMemory,
  #[serde(rename = "stroop")]
  Orientation,
  #[serde(rename = "mental-math")]
  MentalMath,
  #[serde(rename = "anagram")]
  CategorySort,
  #[serde(rename = "number-sequence")]
  NumberSequence,
}

impl TestType {
  pub fn as_str(self) -> &'static str {
    match self {
      TestType::CardMatch => "card-match",
      TestType::WordMemory => "word-memory",
      TestType::Orientation => "stroop",
      TestType::MentalMath => "mental-math",
      TestType::CategorySort => "anagram",
      TestType::NumberSequence => "number-sequence",
    }
  }

  /// Resolve a requested test type. Accepts wire names, a few descriptive
  /// aliases and category names. `None` for anything else.
  pub fn from_name(name: &str) -> Option<TestType> {
    match name.trim() {
      "card-match" => Some(TestType::CardMatch),
      "word-memory" | "memory" => Some(TestType::WordMemory),
      "stroop" | "orientation" | "attention" => Some(TestType::Orientation),
      "mental-math" | "serial-seven" | "math" => Some(TestType::MentalMath),
      "anagram" | "category-sort" | "category" | "language" => Some(TestType::CategorySort),
      "number-sequence" | "digit-span" | "spatial" => Some(TestType::NumberSequence),
      _ => None,
    }
  }

  pub fn category(self) -> ChallengeCategory {
    match self {
      TestType::CardMatch | TestType::WordMemory => ChallengeCategory::Memory,
      TestType::Orientation => ChallengeCategory::Attention,
      TestType::MentalMath => ChallengeCategory::Math,
      TestType::CategorySort => ChallengeCategory::Language,
      TestType::NumberSequence => ChallengeCategory::Spatial,
    }
  }
}

impl fmt::Display for TestType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Answer payload: a single value, or an ordered set that must be recalled together.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
  Single(String),
  Many(Vec<String>),
}

impl AnswerValue {
  pub fn values(&self) -> Vec<&str> {
    match self {
      AnswerValue::Single(s) => vec![s.as_str()],
      AnswerValue::Many(v) => v.iter().map(String::as_str).collect(),
    }
  }

  /// Value shown to the user as "the" answer.
  pub fn primary(&self) -> &str {
    match self {
      AnswerValue::Single(s) => s,
      AnswerValue::Many(v) => v.first().map(String::as_str).unwrap_or(""),
    }
  }
}

impl From<&str> for AnswerValue {
  fn from(s: &str) -> Self { AnswerValue::Single(s.to_string()) }
}

impl From<String> for AnswerValue {
  fn from(s: String) -> Self { AnswerValue::Single(s) }
}

/// A generated test item. Built fresh per generation call and never mutated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
  pub id: String,
  #[serde(rename = "type")]
  pub test_type: TestType,
  pub prompt: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub options: Option<Vec<String>>,
  pub correct_answer: AnswerValue,
  #[serde(default)]
  pub metadata: Map<String, Value>,
}

impl Question {
  /// Category stamped into the metadata bag by the generator.
  pub fn category(&self) -> ChallengeCategory {
    self
      .metadata
      .get("category")
      .and_then(Value::as_str)
      .and_then(|s| s.parse().ok())
      .unwrap_or_else(|| self.test_type.category())
  }
}

/// One recorded response. `is_correct` is decided before scoring and trusted by it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
  pub question_id: String,
  pub user_answer: AnswerValue,
  pub is_correct: bool,
  pub response_time_ms: f64,
  pub answered_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
  Up,
  Down,
  #[default]
  Stable,
}

/// Current value per category, overwritten on every new data point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScore {
  pub category: ChallengeCategory,
  pub score: u32,
  #[serde(default)]
  pub trend: Trend,
  #[serde(default)]
  pub change_percent: f64,
}

/// Result of one finished session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
  pub id: String,
  pub user_id: String,
  pub challenge_id: String,
  pub category: ChallengeCategory,
  pub raw_score: u32,
  pub normalized_score: u32,
  pub accuracy: f64,
  pub average_response_time: f64,
  pub difficulty: DifficultyLevel,
  pub completed_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyScore {
  pub date: NaiveDate,
  pub total_score: u32,
  pub category_scores: Vec<CategoryScore>,
  pub challenge_count: u32,
}

/// A playable set of questions.
///
/// Type, category and difficulty are `None` on a mixed challenge (the daily
/// one), whose questions each carry their own in `metadata`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
  pub id: String,
  #[serde(rename = "type")]
  pub test_type: Option<TestType>,
  pub category: Option<ChallengeCategory>,
  pub difficulty: Option<DifficultyLevel>,
  pub questions: Vec<Question>,
  /// Seconds.
  pub time_limit: u32,
  pub created_at: DateTime<Utc>,
}

impl Challenge {
  pub fn is_mixed(&self) -> bool {
    self.test_type.is_none()
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeGroup {
  Senior,
  Adult,
  Teen,
  Child,
}

impl AgeGroup {
  pub fn parse(s: &str) -> Result<AgeGroup, QuizError> {
    match s {
      "senior" => Ok(AgeGroup::Senior),
      "adult" => Ok(AgeGroup::Adult),
      "teen" => Ok(AgeGroup::Teen),
      "child" => Ok(AgeGroup::Child),
      other => Err(QuizError::UnknownAgeGroup(other.to_string())),
    }
  }
}
