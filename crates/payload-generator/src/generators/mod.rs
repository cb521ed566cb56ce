//! Random value generators exposed to payload templates.
//!
//! - [`numeric`] - integer, float and digit draws
//! - [`string`] - fixed-alphabet strings
//! - [`hash`] - random BLAKE2b-256 digests (hex and bech32)
//! - [`pattern`] - domain-shaped query patterns built on the above
//!
//! Every generator takes the random source as `&mut R` so callers decide
//! whether it is a seeded [`StdRng`](rand::rngs::StdRng) in tests or the
//! shared [`RandomSource`](crate::RandomSource) at run time.

pub mod hash;
pub mod numeric;
pub mod pattern;
pub mod string;

pub use hash::{blake2b256, blake2b256_bech32, blake2b256_hex};
pub use numeric::{rand_digit, rand_float, rand_int};
pub use pattern::{
    address_pattern, alternate, asset_name_pattern, asset_pattern, credential_pattern,
    metadata_tag_pattern, output_index_pattern, output_reference_pattern, policy_id_pattern,
    transaction_id, WILDCARD,
};
pub use string::{rand_hex_string, rand_string, rand_string_with_alphabet};
