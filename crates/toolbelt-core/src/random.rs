//! Cryptographically secure random string generation.

use rand::rngs::OsRng;
use rand::{Rng, TryRngCore};

/// Alphabet used for generated names: letters, digits, and punctuation.
const ALPHABET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*()-_=+";

/// Produce a string of exactly `length` characters drawn uniformly from
/// [`ALPHABET`] using the operating system's entropy source. Each character
/// is chosen independently; `random_range` rejection-samples, so the
/// selection carries no modulo bias.
pub fn random_string(length: usize) -> String {
    let mut rng = OsRng.unwrap_err();
    (0..length)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_is_exact() {
        for length in [0, 1, 10, 20, 25, 100] {
            assert_eq!(random_string(length).len(), length);
        }
    }

    #[test]
    fn only_alphabet_characters_appear() {
        let s = random_string(500);
        assert!(s.bytes().all(|b| ALPHABET.contains(&b)));
    }

    #[test]
    fn repeated_calls_do_not_collide() {
        // Statistical: 16 chars over a 76-char alphabet makes a collision
        // across a handful of draws astronomically unlikely.
        let mut seen = std::collections::HashSet::new();
        for _ in 0..32 {
            assert!(seen.insert(random_string(16)));
        }
    }
}
