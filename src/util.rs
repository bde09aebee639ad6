//! Small statistics and id helpers used across modules.

use crate::domain::Trend;
use crate::rng::RandomSource;

/// Arithmetic mean; `0.0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
  if values.is_empty() {
    return 0.0;
  }
  values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by N); `0.0` below two values.
pub fn standard_deviation(values: &[f64]) -> f64 {
  if values.len() < 2 {
    return 0.0;
  }
  let avg = mean(values);
  let square_diffs: Vec<f64> = values.iter().map(|v| (v - avg).powi(2)).collect();
  mean(&square_diffs).sqrt()
}

/// Trailing-window means, one per valid end position.
///
/// Shorter input than the window degenerates to a single element holding the
/// overall mean. A zero window is treated as 1.
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
  let window = window.max(1);
  if values.len() < window {
    return vec![mean(values)];
  }
  values.windows(window).map(mean).collect()
}

/// Direction of the last step of the moving average: `Up` above +3%, `Down`
/// below -3%. A zero previous point divides by 1 instead.
pub fn trend_direction(values: &[f64], window: usize) -> Trend {
  if values.len() < 2 {
    return Trend::Stable;
  }
  let ma = moving_average(values, window.min(values.len()));
  if ma.len() < 2 {
    return Trend::Stable;
  }
  let recent = ma[ma.len() - 1];
  let previous = ma[ma.len() - 2];
  let denom = if previous == 0.0 { 1.0 } else { previous };
  let change = (recent - previous) / denom * 100.0;
  if change > 3.0 {
    Trend::Up
  } else if change < -3.0 {
    Trend::Down
  } else {
    Trend::Stable
  }
}

/// Linear map of `raw` from `[min, max]` onto 0–100, rounded and clamped.
/// A degenerate range is the neutral midpoint 50.
pub fn normalize_score(raw: f64, min: f64, max: f64) -> u32 {
  if max == min {
    return 50;
  }
  let normalized = (raw - min) / (max - min) * 100.0;
  round_half_up(normalized).clamp(0.0, 100.0) as u32
}

/// Rounds halves toward positive infinity (`-2.5 -> -2`, `2.5 -> 3`).
pub fn round_half_up(x: f64) -> f64 {
  (x + 0.5).floor()
}

/// Rounds to one decimal place, halves toward positive infinity.
pub fn round_one_decimal(x: f64) -> f64 {
  round_half_up(x * 10.0) / 10.0
}

/// `prefix-<base36 millis>-<6 base36 chars>`, or without the prefix part when
/// `prefix` is empty. No collision detection.
pub fn generate_id<R: RandomSource>(prefix: &str, now_millis: i64, rng: &mut R) -> String {
  let ts = to_base36(now_millis.max(0) as u64);
  let suffix: String = (0..6)
    .map(|_| {
      let d = rng.next_int(0, 35) as u32;
      std::char::from_digit(d, 36).unwrap_or('0')
    })
    .collect();
  if prefix.is_empty() {
    format!("{ts}-{suffix}")
  } else {
    format!("{prefix}-{ts}-{suffix}")
  }
}

fn to_base36(mut n: u64) -> String {
  if n == 0 {
    return "0".into();
  }
  let mut digits = Vec::new();
  while n > 0 {
    digits.push(std::char::from_digit((n % 36) as u32, 36).unwrap_or('0'));
    n /= 36;
  }
  digits.iter().rev().collect()
}
