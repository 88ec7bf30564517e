//! Questions and their multiple-choice answer sets.

use std::ops::RangeInclusive;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Number of options offered per question.
pub const ANSWER_OPTIONS: usize = 4;

/// Rejection-sampling attempts per option before switching to enumeration.
const MAX_ATTEMPTS_PER_OPTION: u32 = 32;

// ---------------------------------------------------------------------------
// Question
// ---------------------------------------------------------------------------

/// One multiplication question. `correct_answer == factor_a * factor_b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub factor_a: u32,
    pub factor_b: u32,
    pub correct_answer: u32,
}

impl Question {
    pub fn new(factor_a: u32, factor_b: u32) -> Self {
        Self {
            factor_a,
            factor_b,
            correct_answer: factor_a * factor_b,
        }
    }

    /// Draw both factors independently and uniformly from `table_range`.
    /// The two factors may be equal.
    ///
    /// # Panics
    /// Panics if `table_range` is empty. The presets never are.
    pub fn generate<R: Rng + ?Sized>(table_range: &RangeInclusive<u32>, rng: &mut R) -> Self {
        let factor_a = rng.random_range(table_range.clone());
        let factor_b = rng.random_range(table_range.clone());
        Self::new(factor_a, factor_b)
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} × {}", self.factor_a, self.factor_b)
    }
}

// ---------------------------------------------------------------------------
// AnswerSet
// ---------------------------------------------------------------------------

/// Four distinct positive options in random order, exactly one of which is
/// the correct answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSet {
    options: [u32; ANSWER_OPTIONS],
}

impl AnswerSet {
    /// Build the options for `correct`.
    ///
    /// Wrong options are `correct + v` with `v` drawn uniformly from
    /// `-variation..=variation`, rejecting non-positive values and
    /// duplicates. If an option cannot be found within a bounded number of
    /// draws, the remaining valid values in the window are enumerated and
    /// one is picked uniformly; an exhausted window is widened by
    /// `variation`. This always terminates, even for `correct == 1`.
    /// The final order is an unbiased Fisher–Yates shuffle.
    pub fn generate<R: Rng + ?Sized>(correct: u32, variation: u32, rng: &mut R) -> Self {
        let step = variation.max(1);
        let mut options = Vec::with_capacity(ANSWER_OPTIONS);
        options.push(correct);

        while options.len() < ANSWER_OPTIONS {
            let drawn = (0..MAX_ATTEMPTS_PER_OPTION).find_map(|_| {
                let offset = rng.random_range(-(step as i64)..=step as i64);
                let candidate = correct as i64 + offset;
                let candidate = u32::try_from(candidate).ok().filter(|c| *c > 0)?;
                (!options.contains(&candidate)).then_some(candidate)
            });

            let option = match drawn {
                Some(option) => option,
                None => pick_from_window(correct, step, &options, rng),
            };
            options.push(option);
        }

        options.shuffle(rng);

        let mut slots = [0; ANSWER_OPTIONS];
        slots.copy_from_slice(&options);
        Self { options: slots }
    }

    /// Options in display order.
    pub fn options(&self) -> &[u32; ANSWER_OPTIONS] {
        &self.options
    }

    pub fn contains(&self, value: u32) -> bool {
        self.options.contains(&value)
    }

    /// The value shown in 1-based `slot` (the keys 1–4).
    pub fn slot(&self, slot: usize) -> Option<u32> {
        slot.checked_sub(1).and_then(|i| self.options.get(i)).copied()
    }

    /// The 1-based slot holding `value`.
    pub fn slot_of(&self, value: u32) -> Option<usize> {
        self.options.iter().position(|v| *v == value).map(|i| i + 1)
    }
}

/// Enumerate every unused positive value within `correct ± window` and pick
/// one, widening the window until one exists.
fn pick_from_window<R: Rng + ?Sized>(correct: u32, step: u32, taken: &[u32], rng: &mut R) -> u32 {
    let mut window = step;
    loop {
        let low = correct.saturating_sub(window).max(1);
        let high = correct.saturating_add(window);
        let pool: Vec<u32> = (low..=high).filter(|v| !taken.contains(v)).collect();
        if !pool.is_empty() {
            return pool[rng.random_range(0..pool.len())];
        }
        window = window.saturating_add(step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn assert_well_formed(set: &AnswerSet, correct: u32) {
        let options = set.options();
        assert!(options.iter().all(|v| *v > 0), "non-positive option in {options:?}");
        assert_eq!(options.iter().filter(|v| **v == correct).count(), 1);
        for (i, a) in options.iter().enumerate() {
            for b in &options[i + 1..] {
                assert_ne!(a, b, "duplicate option in {options:?}");
            }
        }
    }

    #[test]
    fn test_question_product() {
        let q = Question::new(7, 8);
        assert_eq!(q.correct_answer, 56);
        assert_eq!(q.to_string(), "7 × 8");
    }

    #[test]
    fn test_generate_question_within_range() {
        let mut rng = rng();
        for _ in 0..1_000 {
            let q = Question::generate(&(1..=5), &mut rng);
            assert!((1..=5).contains(&q.factor_a));
            assert!((1..=5).contains(&q.factor_b));
            assert_eq!(q.correct_answer, q.factor_a * q.factor_b);
        }
    }

    #[test]
    fn test_answer_set_for_one_terminates() {
        let mut rng = rng();
        for _ in 0..1_000 {
            let set = AnswerSet::generate(1, 5, &mut rng);
            assert_well_formed(&set, 1);
        }
    }

    #[test]
    fn test_narrow_variation_widens_window() {
        // correct ± 1 only offers one positive alternative for 1.
        let mut rng = rng();
        let set = AnswerSet::generate(1, 1, &mut rng);
        assert_well_formed(&set, 1);
    }

    #[test]
    fn test_options_stay_near_correct_answer() {
        let mut rng = rng();
        for _ in 0..1_000 {
            let set = AnswerSet::generate(50, 5, &mut rng);
            assert!(set.options().iter().all(|v| (45..=55).contains(v)));
        }
    }

    #[test]
    fn test_correct_slot_is_roughly_uniform() {
        let mut rng = rng();
        let mut counts = [0u32; ANSWER_OPTIONS];
        for _ in 0..4_000 {
            let set = AnswerSet::generate(24, 5, &mut rng);
            let slot = set.slot_of(24).unwrap();
            counts[slot - 1] += 1;
        }
        for count in counts {
            assert!((800..=1_200).contains(&count), "skewed slots: {counts:?}");
        }
    }

    #[test]
    fn test_slot_lookup_is_one_based() {
        let set = AnswerSet::generate(12, 5, &mut rng());
        assert_eq!(set.slot(0), None);
        assert_eq!(set.slot(5), None);
        for slot in 1..=ANSWER_OPTIONS {
            let value = set.slot(slot).unwrap();
            assert_eq!(set.slot_of(value), Some(slot));
            assert!(set.contains(value));
        }
    }
}
