use crate::core::GameRng;

/// Shuffle a slice in place.
///
/// Walks `i` from the last index down to 1 and swaps with a uniformly
/// random `j` in `0..=i`.
pub fn shuffle<T>(rng: &mut GameRng, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = rng.up_to(i);
        items.swap(i, j);
    }
}

/// Shuffled copy of `items`; the input is left untouched.
#[must_use]
pub fn shuffled<T: Clone>(rng: &mut GameRng, items: &[T]) -> Vec<T> {
    let mut out = items.to_vec();
    shuffle(rng, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_shuffle_small_inputs() {
        let mut rng = GameRng::new(1);
        let mut empty: Vec<u8> = Vec::new();
        shuffle(&mut rng, &mut empty);
        assert!(empty.is_empty());

        let mut one = vec![9];
        shuffle(&mut rng, &mut one);
        assert_eq!(one, vec![9]);
    }

    #[test]
    fn test_shuffle_changes_order() {
        let mut rng = GameRng::new(42);
        let original: Vec<u32> = (0..20).collect();
        let out = shuffled(&mut rng, &original);
        assert_ne!(out, original);
    }

    proptest! {
        #[test]
        fn prop_shuffle_is_permutation(seed in any::<u64>(), items in proptest::collection::vec(0u8..10, 0..40)) {
            let mut rng = GameRng::new(seed);
            let mut out = shuffled(&mut rng, &items);
            let mut expected = items.clone();
            out.sort_unstable();
            expected.sort_unstable();
            prop_assert_eq!(out, expected);
        }
    }
}
