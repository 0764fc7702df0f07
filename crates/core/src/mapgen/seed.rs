//! Uniform draws on top of the generator's seeded ChaCha stream.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::Rng;

pub(super) fn random_below(rng: &mut ChaCha8Rng, bound: usize) -> usize {
    debug_assert!(bound > 0);
    (rng.next_u64() % bound as u64) as usize
}

/// First `take` entries of a Fisher-Yates shuffle of `0..len`.
pub(super) fn shuffled_prefix(rng: &mut ChaCha8Rng, len: usize, take: usize) -> Vec<usize> {
    debug_assert!(take <= len);
    let mut indices: Vec<usize> = (0..len).collect();
    for slot in 0..take {
        let pick = slot + random_below(rng, len - slot);
        indices.swap(slot, pick);
    }
    indices.truncate(take);
    indices
}
