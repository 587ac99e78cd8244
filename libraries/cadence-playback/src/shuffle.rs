//! Shuffle policy for next-track selection
//!
//! Picks the next track uniformly at random among all tracks except the one
//! currently playing.

use rand::Rng;

/// Pick a random index in `[0, len)` different from `current`
///
/// Draws from the `len - 1` other slots and shifts past `current`, so every
/// other track is equally likely and the call always terminates. A catalog of
/// zero or one track returns `current`.
pub fn next_shuffled_index<R: Rng + ?Sized>(current: usize, len: usize, rng: &mut R) -> usize {
    if len <= 1 {
        return current;
    }

    let pick = rng.gen_range(0..len - 1);
    if pick >= current {
        pick + 1
    } else {
        pick
    }
}

/// Sequential successor, wrapping at the end
pub fn next_sequential_index(current: usize, len: usize) -> usize {
    if len == 0 {
        return current;
    }
    (current + 1) % len
}

/// Sequential predecessor, wrapping at the start
pub fn previous_index(current: usize, len: usize) -> usize {
    if len == 0 {
        return current;
    }
    (current + len - 1) % len
}
