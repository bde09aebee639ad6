//! Orientation items: weekday, month, season and day of month, read from the clock.

use chrono::{Datelike, NaiveDate};
use serde_json::json;

use super::{meta, QuestionGenerator};
use crate::domain::{AnswerValue, DifficultyLevel, Question, TestType};
use crate::rng::{Clock, RandomSource};
use crate::seeds::{SEASONS, WEEKDAYS};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Item {
  Weekday,
  Month,
  Season,
  DayOfMonth,
}

const ITEMS: [Item; 4] = [Item::Weekday, Item::Month, Item::Season, Item::DayOfMonth];

impl<R: RandomSource, C: Clock> QuestionGenerator<R, C> {
  /// `min(difficulty + 1, 4)` distinct orientation items in random order.
  pub fn orientation(&mut self, difficulty: DifficultyLevel) -> Vec<Question> {
    let count = (difficulty.get() as usize + 1).min(ITEMS.len());
    let today = self.clock.now_local().date();
    let chosen: Vec<Item> = self.rng.shuffle(&ITEMS).into_iter().take(count).collect();
    chosen.into_iter().map(|item| self.orientation_item(item, today)).collect()
  }

  fn orientation_item(&mut self, item: Item, today: NaiveDate) -> Question {
    let (subtype, prompt, options, answer) = match item {
      Item::Weekday => {
        let answer = WEEKDAYS[today.weekday().num_days_from_sunday() as usize];
        let options: Vec<String> = WEEKDAYS.iter().map(|d| d.to_string()).collect();
        ("weekday", "きょうは なんようび？", options, answer.to_string())
      }
      Item::Month => {
        let month = today.month() as i64;
        let labels: Vec<String> = [-1, 0, 1, 2]
          .iter()
          .map(|offset| format!("{}がつ", (month - 1 + offset).rem_euclid(12) + 1))
          .collect();
        ("month", "いまは なんがつ？", self.rng.shuffle(&labels), format!("{month}がつ"))
      }
      Item::Season => {
        let answer = season_of(today.month());
        let options: Vec<String> = SEASONS.iter().map(|s| s.to_string()).collect();
        ("season", "いまの きせつは？", options, answer.to_string())
      }
      Item::DayOfMonth => {
        let options = day_of_month_options(today)
          .into_iter()
          .map(|d| format!("{d}にち"))
          .collect::<Vec<_>>();
        ("day", "きょうは なんにち？", self.rng.shuffle(&options), format!("{}にち", today.day()))
      }
    };
    self.question(
      "or",
      TestType::Orientation,
      prompt.to_string(),
      Some(options),
      AnswerValue::Single(answer),
      meta([("testSubtype", json!(subtype)), ("clinical", json!("hds-r"))]),
    )
  }
}

/// Mar–May spring, Jun–Aug summer, Sep–Nov autumn, Dec–Feb winter.
pub(crate) fn season_of(month: u32) -> &'static str {
  match month {
    3..=5 => SEASONS[0],
    6..=8 => SEASONS[1],
    9..=11 => SEASONS[2],
    _ => SEASONS[3],
  }
}

/// Today's day plus three neighbours (-1, +1, +2), unshuffled. A neighbour
/// below 1 jumps to day + 3; one past the month's last day mirrors below
/// today instead.
pub fn day_of_month_options(today: NaiveDate) -> Vec<u32> {
  let day = today.day() as i64;
  let last = days_in_month(today) as i64;
  let mut out = vec![day as u32];
  for offset in [-1i64, 1, 2] {
    let mut candidate = day + offset;
    if candidate < 1 {
      candidate = day + 3;
    } else if candidate > last {
      candidate = day - offset - 2;
    }
    out.push(candidate as u32);
  }
  out
}

fn days_in_month(date: NaiveDate) -> u32 {
  let (y, m) = if date.month() == 12 { (date.year() + 1, 1) } else { (date.year(), date.month() + 1) };
  NaiveDate::from_ymd_opt(y, m, 1)
    .and_then(|first| first.pred_opt())
    .map(|last| last.day())
    .unwrap_or(31)
}
