//! Property-based tests for generators, scoring and the difficulty controller.

use chrono::{Duration, NaiveDate, Utc};
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

use nouryoku::difficulty::{adjust_difficulty, DifficultyProfile};
use nouryoku::domain::{Answer, AnswerValue, ChallengeCategory, DifficultyLevel, TestType};
use nouryoku::generators::{day_of_month_options, QuestionGenerator};
use nouryoku::rng::{FixedClock, RandomSource};
use nouryoku::scoring::calculate_raw_score;
use nouryoku::util::normalize_score;

const TEST_TYPES: [TestType; 6] = [
    TestType::CardMatch,
    TestType::WordMemory,
    TestType::Orientation,
    TestType::MentalMath,
    TestType::CategorySort,
    TestType::NumberSequence,
];

/// Strategy: any date in this century at 09:00.
fn clock_strategy() -> impl Strategy<Value = FixedClock> {
    (0i64..36_500).prop_map(|offset| {
        let base = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
        FixedClock(base + Duration::days(offset))
    })
}

fn answers(correct: bool, times: &[f64]) -> Vec<Answer> {
    times
        .iter()
        .enumerate()
        .map(|(i, t)| Answer {
            question_id: format!("q{i}"),
            user_answer: AnswerValue::from("x"),
            is_correct: correct,
            response_time_ms: *t,
            answered_at: Utc::now(),
        })
        .collect()
}

proptest! {
    // 1. Every generator, at any requested level, returns questions whose
    //    options hold the correct answer exactly once and nothing twice.
    #[test]
    fn options_hold_the_answer_once(
        seed in any::<u64>(),
        clock in clock_strategy(),
        t in 0..TEST_TYPES.len(),
        level in -10i64..10,
    ) {
        let mut g = QuestionGenerator::seeded(seed, clock);
        let questions = g.generate_type(TEST_TYPES[t], DifficultyLevel::clamped(level));
        prop_assert!(!questions.is_empty());
        for q in &questions {
            prop_assert_eq!(q.test_type, TEST_TYPES[t]);
            if let Some(options) = &q.options {
                let correct = q.correct_answer.primary();
                prop_assert_eq!(options.iter().filter(|o| o.as_str() == correct).count(), 1);
                let mut dedup = options.clone();
                dedup.sort();
                dedup.dedup();
                prop_assert_eq!(dedup.len(), options.len());
            }
        }
    }

    // 2. Arithmetic distractors are never negative.
    #[test]
    fn math_options_non_negative(seed in any::<u64>(), level in 1u8..=5) {
        let mut g = QuestionGenerator::seeded(seed, FixedClock(Utc::now().naive_utc()));
        for q in g.mental_math(DifficultyLevel::try_from(level).unwrap()) {
            for o in q.options.unwrap_or_default() {
                prop_assert!(o.parse::<i64>().unwrap() >= 0);
            }
        }
    }

    // 3. Unknown test-type names never yield an empty result.
    #[test]
    fn dispatcher_never_empty(seed in any::<u64>(), name in "[a-z-]{0,16}", level in 1u8..=5) {
        let mut g = QuestionGenerator::seeded(seed, FixedClock(Utc::now().naive_utc()));
        prop_assert!(!g.generate(&name, DifficultyLevel::try_from(level).unwrap()).is_empty());
    }

    // 4. Day-of-month options are four distinct days, all >= 1.
    #[test]
    fn day_options_positive_and_distinct(clock in clock_strategy()) {
        let today = clock.0.date();
        let mut days = day_of_month_options(today);
        prop_assert_eq!(days.len(), 4);
        prop_assert!(days.iter().all(|d| *d >= 1));
        prop_assert!(days.contains(&chrono::Datelike::day(&today)));
        days.sort_unstable();
        days.dedup();
        prop_assert_eq!(days.len(), 4);
    }

    // 5. Clamping always lands in [1, 5].
    #[test]
    fn clamped_level_in_range(level in any::<i64>()) {
        let l = DifficultyLevel::clamped(level).get();
        prop_assert!((1..=5).contains(&l));
    }

    // 6. The controller moves at most one step and never leaves [1, 5].
    #[test]
    fn adjust_moves_one_step_at_most(
        level in 1u8..=5,
        accuracies in prop::collection::vec(0.0f64..=1.0, 0..10),
    ) {
        let current = DifficultyLevel::try_from(level).unwrap();
        let next = adjust_difficulty(&DifficultyProfile {
            category: ChallengeCategory::Spatial,
            current_level: current,
            recent_accuracies: accuracies.clone(),
        });
        prop_assert!((1..=5).contains(&next.get()));
        prop_assert!((next.get() as i16 - current.get() as i16).abs() <= 1);
        if accuracies.len() < 3 {
            prop_assert_eq!(next, current);
        }
    }

    // 7. Shuffling preserves length and multiset.
    #[test]
    fn shuffle_preserves_multiset(seed in any::<u64>(), items in prop::collection::vec(0i32..20, 0..30)) {
        let mut rng = StdRng::seed_from_u64(seed);
        let shuffled = rng.shuffle(&items);
        let mut a = items.clone();
        let mut b = shuffled;
        a.sort_unstable();
        b.sort_unstable();
        prop_assert_eq!(a, b);
    }

    // 8. Normalization stays within 0..=100.
    #[test]
    fn normalize_in_range(raw in -1e6f64..1e6, min in -1e3f64..1e3, span in 0.0f64..1e3) {
        let n = normalize_score(raw, min, min + span);
        prop_assert!(n <= 100);
    }

    // 9. Fast perfect answers score at least 100; slow wrong ones at most 20.
    #[test]
    fn raw_score_bounds(times in prop::collection::vec(0.0f64..=1500.0, 1..12)) {
        prop_assert!(calculate_raw_score(&answers(true, &times)) >= 100);
        let slow: Vec<f64> = times.iter().map(|t| t + 5000.0).collect();
        prop_assert!(calculate_raw_score(&answers(false, &slow)) <= 20);
    }
}
