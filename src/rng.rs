//! Randomness and wall-clock seams.
//!
//! Generators only need two things from the outside world: a uniform integer
//! source and the current time. Both sit behind small traits so tests can
//! pin them (seeded `StdRng`, `FixedClock`).

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use rand::{seq::SliceRandom, Rng};

/// Uniform integer source.
pub trait RandomSource {
  /// Uniform integer in the closed range `[min, max]`. `max < min` yields `min`.
  fn next_int(&mut self, min: i64, max: i64) -> i64;

  /// Shuffled copy; the input is left untouched.
  fn shuffle<T: Clone>(&mut self, items: &[T]) -> Vec<T>;

  /// One element chosen uniformly. `None` for an empty slice.
  fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T>;
}

impl<R: Rng> RandomSource for R {
  fn next_int(&mut self, min: i64, max: i64) -> i64 {
    if max <= min {
      return min;
    }
    self.gen_range(min..=max)
  }

  fn shuffle<T: Clone>(&mut self, items: &[T]) -> Vec<T> {
    let mut out = items.to_vec();
    SliceRandom::shuffle(out.as_mut_slice(), self);
    out
  }

  fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
    SliceRandom::choose(items, self)
  }
}

/// Source of "now" for orientation items, ids and timestamps.
pub trait Clock {
  /// Local wall-clock time; orientation questions ask about this date.
  fn now_local(&self) -> NaiveDateTime;

  fn now_utc(&self) -> DateTime<Utc>;

  fn now_millis(&self) -> i64 {
    self.now_utc().timestamp_millis()
  }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now_local(&self) -> NaiveDateTime { Local::now().naive_local() }

  fn now_utc(&self) -> DateTime<Utc> { Utc::now() }
}

/// Clock pinned to one instant (treated as both local and UTC).
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
  fn now_local(&self) -> NaiveDateTime { self.0 }

  fn now_utc(&self) -> DateTime<Utc> { Utc.from_utc_datetime(&self.0) }
}

impl<C: Clock + ?Sized> Clock for &C {
  fn now_local(&self) -> NaiveDateTime { (**self).now_local() }

  fn now_utc(&self) -> DateTime<Utc> { (**self).now_utc() }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::{rngs::StdRng, SeedableRng};

  #[test]
  fn next_int_stays_in_closed_range() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..500 {
      let v = rng.next_int(-2, 3);
      assert!((-2..=3).contains(&v));
    }
    assert_eq!(rng.next_int(4, 4), 4);
    assert_eq!(rng.next_int(4, 1), 4);
  }

  #[test]
  fn shuffle_leaves_input_untouched() {
    let mut rng = StdRng::seed_from_u64(1);
    let input = vec![1, 2, 3, 4, 5, 6];
    let out = rng.shuffle(&input);
    assert_eq!(input, vec![1, 2, 3, 4, 5, 6]);
    let mut sorted = out.clone();
    sorted.sort();
    assert_eq!(sorted, input);
  }

  #[test]
  fn pick_from_empty_is_none() {
    let mut rng = StdRng::seed_from_u64(1);
    let empty: [u8; 0] = [];
    assert!(rng.pick(&empty).is_none());
    assert_eq!(rng.pick(&[9]), Some(&9));
  }
}
