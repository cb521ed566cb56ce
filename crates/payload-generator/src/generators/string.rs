//! Fixed-alphabet string generators.

use rand::Rng;

/// `[a-zA-Z]`
pub const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// `[a-fA-F0-9]`
pub const HEX_DIGITS: &[u8] = b"abcdefABCDEF0123456789";

/// Sample `length` characters uniformly, with replacement, from `alphabet`.
///
/// `alphabet` must be non-empty ASCII.
pub fn rand_string_with_alphabet<R: Rng + ?Sized>(rng: &mut R, alphabet: &[u8], length: usize) -> String {
    if alphabet.is_empty() {
        return String::new();
    }
    (0..length)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char)
        .collect()
}

/// Random letters.
pub fn rand_string<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    rand_string_with_alphabet(rng, LETTERS, length)
}

/// Random mixed-case hex digits.
pub fn rand_hex_string<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    rand_string_with_alphabet(rng, HEX_DIGITS, length)
}
