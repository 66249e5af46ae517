//! Fisher-Yates shuffle of the number pool
//!
//! The only source of randomness in a draw. Each permutation of the pool is
//! equally likely as long as the RNG is uniform.

use rand::Rng;

/// Shuffle in place: walk i from the last index down to 1, swap with a
/// uniform j in [0, i].
pub fn fisher_yates<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// The numbers 1..=total in random order
pub fn shuffled_pool<R: Rng + ?Sized>(total: u32, rng: &mut R) -> Vec<u32> {
    let mut pool: Vec<u32> = (1..=total).collect();
    fisher_yates(&mut pool, rng);
    pool
}
