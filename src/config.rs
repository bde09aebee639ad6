//! Loading engine configuration (windows, timing, extra language items) from TOML.
//!
//! See `QuizConfig` for the expected schema.

use serde::Deserialize;
use tracing::{error, info};

use crate::error::QuizError;
use crate::generators::{accept_language_items, DEFAULT_SECONDS_PER_QUESTION};
use crate::scorebook::DEFAULT_ACCURACY_WINDOW;
use crate::scoring::DEFAULT_TREND_WINDOW;
use crate::seeds::{LanguageItem, LanguageKind};

#[derive(Clone, Debug, Deserialize)]
pub struct QuizConfig {
  #[serde(default = "default_trend_window")]
  pub trend_window: usize,
  #[serde(default = "default_accuracy_window")]
  pub accuracy_window: usize,
  #[serde(default = "default_seconds_per_question")]
  pub seconds_per_question: u32,
  #[serde(default)]
  pub language_items: Vec<LanguageItemCfg>,
}

fn default_trend_window() -> usize { DEFAULT_TREND_WINDOW }
fn default_accuracy_window() -> usize { DEFAULT_ACCURACY_WINDOW }
fn default_seconds_per_question() -> u32 { DEFAULT_SECONDS_PER_QUESTION }

impl Default for QuizConfig {
  fn default() -> Self {
    Self {
      trend_window: DEFAULT_TREND_WINDOW,
      accuracy_window: DEFAULT_ACCURACY_WINDOW,
      seconds_per_question: DEFAULT_SECONDS_PER_QUESTION,
      language_items: Vec::new(),
    }
  }
}

/// Language item entry accepted in TOML configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct LanguageItemCfg {
  pub kind: LanguageKind,
  pub prompt: String,
  pub options: Vec<String>,
  pub answer: String,
}

impl QuizConfig {
  pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
    toml::from_str(s)
  }

  /// Configured language items that pass validation; invalid ones are logged and dropped.
  pub fn language_bank(&self) -> Vec<LanguageItem> {
    let items = self
      .language_items
      .iter()
      .map(|c| LanguageItem {
        kind: c.kind,
        prompt: c.prompt.clone(),
        options: c.options.clone(),
        answer: c.answer.clone(),
      })
      .collect();
    accept_language_items(items)
  }
}

/// Read and parse a config file.
pub fn load_quiz_config(path: &str) -> Result<QuizConfig, QuizError> {
  let s = std::fs::read_to_string(path)
    .map_err(|e| QuizError::Config { path: path.to_string(), message: e.to_string() })?;
  QuizConfig::from_toml_str(&s).map_err(|e| QuizError::Config { path: path.to_string(), message: e.to_string() })
}

/// Attempt to load `QuizConfig` from QUIZ_CONFIG_PATH. Missing variable or any
/// IO/parse error yields the defaults.
pub fn load_quiz_config_from_env() -> QuizConfig {
  let Ok(path) = std::env::var("QUIZ_CONFIG_PATH") else {
    return QuizConfig::default();
  };
  match load_quiz_config(&path) {
    Ok(cfg) => {
      info!(target: "nouryoku", %path, language_items = cfg.language_items.len(), "Loaded quiz config (TOML)");
      cfg
    }
    Err(e) => {
      error!(target: "nouryoku", %path, error = %e, "Failed to load quiz config; using defaults");
      QuizConfig::default()
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_file_gives_defaults() {
    let cfg = QuizConfig::from_toml_str("").unwrap();
    assert_eq!(cfg.trend_window, 7);
    assert_eq!(cfg.accuracy_window, 5);
    assert_eq!(cfg.seconds_per_question, 30);
    assert!(cfg.language_items.is_empty());
  }

  #[test]
  fn parses_language_items_and_drops_invalid_ones() {
    let cfg = QuizConfig::from_toml_str(
      r#"
trend_window = 5
seconds_per_question = 20

[[language_items]]
kind = "identify"
prompt = "つぎのうち「さかな」はどれ？"
options = ["まぐろ", "からす", "もぐら", "へび"]
answer = "まぐろ"

[[language_items]]
kind = "odd_one_out"
prompt = "なかまはずれはどれ？"
options = ["a", "b", "c"]
answer = "a"
"#,
    )
    .unwrap();
    assert_eq!(cfg.trend_window, 5);
    assert_eq!(cfg.accuracy_window, 5);
    assert_eq!(cfg.seconds_per_question, 20);
    assert_eq!(cfg.language_items.len(), 2);
    let bank = cfg.language_bank();
    assert_eq!(bank.len(), 1);
    assert_eq!(bank[0].answer, "まぐろ");
  }

  #[test]
  fn missing_file_is_a_config_error() {
    let err = load_quiz_config("/nonexistent/quiz.toml").unwrap_err();
    assert!(matches!(err, QuizError::Config { .. }));
  }
}
