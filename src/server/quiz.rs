use std::collections::HashSet;

use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;

/// Category id meaning "questions from every category".
pub const ANY_CATEGORY: i64 = 0;

/// Picks uniformly among the `eligible` ids not in `seen`. `None` once everything has been
/// seen.
pub fn pick_unseen<R>(eligible: &[i64], seen: &HashSet<i64>, rng: &mut R) -> Option<i64>
where
    R: Rng + ?Sized,
{
    let unseen = eligible
        .iter()
        .copied()
        .filter(|id| !seen.contains(id))
        .collect_vec();
    unseen.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn never_returns_seen_ids() {
        let mut rng = StdRng::seed_from_u64(7);
        let eligible = [1, 2, 3, 4, 5];
        let seen: HashSet<i64> = [1, 2, 4, 5].into();
        for _ in 0..50 {
            assert_eq!(pick_unseen(&eligible, &seen, &mut rng), Some(3));
        }
    }

    #[test]
    fn drains_every_id_exactly_once() {
        let mut rng = StdRng::seed_from_u64(42);
        let eligible = [10, 20, 30, 40];
        let mut seen = HashSet::new();
        while let Some(id) = pick_unseen(&eligible, &seen, &mut rng) {
            assert!(seen.insert(id));
        }
        assert_eq!(seen, eligible.into_iter().collect());
    }

    #[test]
    fn exhausted_or_empty_sets_yield_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(pick_unseen(&[], &HashSet::new(), &mut rng), None);
        assert_eq!(pick_unseen(&[9], &[9].into(), &mut rng), None);
    }
}
