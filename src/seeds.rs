//! Built-in item banks for the generators.
//!
//! Content follows the clinical screening scales the tests are modelled on
//! (HDS-R three-word recall, serial 7s, digit span) and is written in
//! hiragana so it reads well for children and seniors alike.

/// A word to remember together with its semantic hint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoryWord {
  pub word: &'static str,
  pub hint: &'static str,
}

const fn w(word: &'static str, hint: &'static str) -> MemoryWord {
  MemoryWord { word, hint }
}

/// HDS-R style three-word sets: one plant, one animal, one vehicle.
pub const WORD_SETS: [[MemoryWord; 3]; 2] = [
  [w("さくら", "しょくぶつ"), w("ねこ", "どうぶつ"), w("でんしゃ", "のりもの")],
  [w("うめ", "しょくぶつ"), w("いぬ", "どうぶつ"), w("じどうしゃ", "のりもの")],
];

/// Same-category words that are easy to confuse with the target, keyed by hint.
pub fn confusable_words(hint: &str) -> &'static [&'static str] {
  match hint {
    "しょくぶつ" => &["さくら", "うめ", "ばら", "ゆり", "きく", "つばき", "もも"],
    "どうぶつ" => &["ねこ", "いぬ", "うさぎ", "うま", "さる", "くま", "きつね"],
    "のりもの" => &["でんしゃ", "じどうしゃ", "ばす", "ひこうき", "ふね", "じてんしゃ", "たくしー"],
    _ => &[],
  }
}

pub const WEEKDAYS: [&str; 7] = [
  "にちようび", "げつようび", "かようび", "すいようび", "もくようび", "きんようび", "どようび",
];

pub const SEASONS: [&str; 4] = ["はる", "なつ", "あき", "ふゆ"];

/// Serial 7s from 100; five steps end at 65 (MMSE length).
pub const SERIAL_SEVEN_CHAIN: [i64; 6] = [100, 93, 86, 79, 72, 65];

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LanguageKind {
  Identify,
  OddOneOut,
  Commonality,
}

impl LanguageKind {
  pub fn as_str(self) -> &'static str {
    match self {
      LanguageKind::Identify => "identify",
      LanguageKind::OddOneOut => "odd_one_out",
      LanguageKind::Commonality => "commonality",
    }
  }
}

/// A language item with four fixed options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LanguageItem {
  pub kind: LanguageKind,
  pub prompt: String,
  pub options: Vec<String>,
  pub answer: String,
}

fn item(kind: LanguageKind, prompt: &str, options: [&str; 4], answer: &str) -> LanguageItem {
  LanguageItem {
    kind,
    prompt: prompt.to_string(),
    options: options.iter().map(|s| s.to_string()).collect(),
    answer: answer.to_string(),
  }
}

/// "Which of these is a ...?"
pub fn identify_items() -> Vec<LanguageItem> {
  use LanguageKind::Identify;
  vec![
    item(Identify, "つぎのうち「やさい」はどれ？", ["だいこん", "りんご", "さかな", "つくえ"], "だいこん"),
    item(Identify, "つぎのうち「くだもの」はどれ？", ["にんじん", "みかん", "たまご", "こめ"], "みかん"),
    item(Identify, "つぎのうち「どうぶつ」はどれ？", ["さくら", "くるま", "きりん", "えんぴつ"], "きりん"),
    item(Identify, "つぎのうち「のりもの」はどれ？", ["ふね", "いす", "ぼうし", "とけい"], "ふね"),
    item(Identify, "つぎのうち「がっき」はどれ？", ["はさみ", "たいこ", "なべ", "くつ"], "たいこ"),
  ]
}

/// "Which one does not belong?"
pub fn odd_one_out_items() -> Vec<LanguageItem> {
  use LanguageKind::OddOneOut;
  vec![
    item(OddOneOut, "なかまはずれはどれ？", ["いぬ", "ねこ", "うさぎ", "ばなな"], "ばなな"),
    item(OddOneOut, "なかまはずれはどれ？", ["あか", "あお", "きいろ", "つくえ"], "つくえ"),
    item(OddOneOut, "なかまはずれはどれ？", ["でんしゃ", "ばす", "ひこうき", "りんご"], "りんご"),
    item(OddOneOut, "なかまはずれはどれ？", ["はる", "なつ", "ごぜん", "ふゆ"], "ごぜん"),
    item(OddOneOut, "なかまはずれはどれ？", ["えんぴつ", "けしごむ", "のーと", "すいか"], "すいか"),
  ]
}

/// "What do X and Y have in common?" Served from difficulty 3 up.
pub fn commonality_items() -> Vec<LanguageItem> {
  use LanguageKind::Commonality;
  vec![
    item(Commonality, "「みかん」と「ばなな」のおなじところは？", ["くだもの", "やさい", "のりもの", "どうぐ"], "くだもの"),
    item(Commonality, "「でんしゃ」と「じてんしゃ」のおなじところは？", ["たべもの", "のりもの", "どうぶつ", "きせつ"], "のりもの"),
    item(Commonality, "「つくえ」と「いす」のおなじところは？", ["かぐ", "がっき", "くだもの", "むし"], "かぐ"),
    item(Commonality, "「うた」と「え」のおなじところは？", ["げいじゅつ", "たべもの", "てんき", "からだ"], "げいじゅつ"),
  ]
}

/// Progressions for next-term prediction: shown terms and the answer.
pub const SEQUENCES: [(&[i64], i64); 8] = [
  (&[2, 4, 6, 8], 10),
  (&[3, 6, 9, 12], 15),
  (&[5, 10, 15, 20], 25),
  (&[10, 20, 30, 40], 50),
  (&[1, 2, 4, 8], 16),
  (&[1, 3, 9, 27], 81),
  (&[100, 90, 80, 70], 60),
  (&[2, 6, 18, 54], 162),
];

pub const CARD_MATCH_ITEMS: [&str; 24] = [
  "🍎", "🍊", "🍋", "🍇", "🍓", "🍑", "🌸", "🌻",
  "🐕", "🐈", "🐦", "🐟", "🌙", "⭐", "☀️", "🌈",
  "🏠", "🚗", "✈️", "🚢", "📚", "🎵", "🎨", "⚽",
];

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn every_target_has_at_least_three_confusables() {
    for set in WORD_SETS {
      for mw in set {
        let others: Vec<_> = confusable_words(mw.hint).iter().filter(|c| **c != mw.word).collect();
        assert!(others.len() >= 3, "{} has too few confusables", mw.word);
      }
    }
  }

  #[test]
  fn bank_items_carry_answer_once() {
    for it in identify_items().into_iter().chain(odd_one_out_items()).chain(commonality_items()) {
      assert_eq!(it.options.len(), 4);
      assert_eq!(it.options.iter().filter(|o| **o == it.answer).count(), 1, "{}", it.prompt);
    }
  }

  #[test]
  fn sequences_answers_are_positive() {
    for (terms, next) in SEQUENCES {
      assert_eq!(terms.len(), 4);
      assert!(next > 0);
    }
  }
}
