//! Domain-shaped query patterns for the indexer under test.
//!
//! Each pattern picks one of several shapes through [`alternate`]. Only the
//! chosen candidate is ever evaluated.

use crate::generators::hash::blake2b256_bech32;
use crate::generators::numeric::rand_digit;
use crate::generators::string::rand_hex_string;
use rand::seq::SliceRandom;
use rand::Rng;
use std::iter;

/// Matches any value.
pub const WILDCARD: &str = "*";

/// Hex length of a payment/stake credential hash.
pub const CREDENTIAL_HASH_LEN: usize = 64;

/// Hex length of a script or key hash (and policy ids).
pub const SCRIPT_HASH_LEN: usize = 56;

/// Longest asset name, in hex characters.
pub const MAX_ASSET_NAME_LEN: usize = 64;

/// Hex length of a transaction id.
pub const TRANSACTION_ID_LEN: usize = 64;

/// Exclusive upper bound of metadata tags.
pub const METADATA_TAG_BOUND: u32 = 9999;

/// Shuffle `candidates` and evaluate only the first one.
///
/// Returns an empty string when there are no candidates.
pub fn alternate<R, C>(rng: &mut R, candidates: &[C]) -> String
where
    R: Rng + ?Sized,
    C: Fn(&mut R) -> String,
{
    let mut order: Vec<&C> = candidates.iter().collect();
    order.shuffle(rng);
    match order.first() {
        Some(candidate) => candidate(rng),
        None => String::new(),
    }
}

/// `addr1<bech32>`, `stake1<bech32>` or `*`.
pub fn address_pattern<R: Rng + ?Sized>(rng: &mut R) -> String {
    let candidates: [&dyn Fn(&mut R) -> String; 3] = [
        &|rng: &mut R| format!("addr1{}", blake2b256_bech32(rng)),
        &|rng: &mut R| format!("stake1{}", blake2b256_bech32(rng)),
        &|_: &mut R| WILDCARD.to_string(),
    ];
    alternate(rng, &candidates)
}

/// `<X>/<Y>` where each side is 64 hex, 56 hex or `*`.
pub fn credential_pattern<R: Rng + ?Sized>(rng: &mut R) -> String {
    let candidates: [&dyn Fn(&mut R) -> String; 3] = [
        &|rng: &mut R| rand_hex_string(rng, CREDENTIAL_HASH_LEN),
        &|rng: &mut R| rand_hex_string(rng, SCRIPT_HASH_LEN),
        &|_: &mut R| WILDCARD.to_string(),
    ];
    let payment = alternate(rng, &candidates);
    let delegation = alternate(rng, &candidates);
    format!("{payment}/{delegation}")
}

/// 56 hex characters or `*`.
pub fn policy_id_pattern<R: Rng + ?Sized>(rng: &mut R) -> String {
    let candidates: [&dyn Fn(&mut R) -> String; 2] = [
        &|rng: &mut R| rand_hex_string(rng, SCRIPT_HASH_LEN),
        &|_: &mut R| WILDCARD.to_string(),
    ];
    alternate(rng, &candidates)
}

/// `*` or hex of any length in `0..=64`, each of the 66 shapes equally likely.
pub fn asset_name_pattern<R: Rng + ?Sized>(rng: &mut R) -> String {
    let candidates: Vec<_> = iter::once(None)
        .chain((0..=MAX_ASSET_NAME_LEN).map(Some))
        .map(|length: Option<usize>| {
            move |rng: &mut R| match length {
                Some(length) => rand_hex_string(rng, length),
                None => WILDCARD.to_string(),
            }
        })
        .collect();
    alternate(rng, &candidates)
}

/// `<policy>.<name>`.
pub fn asset_pattern<R: Rng + ?Sized>(rng: &mut R) -> String {
    let policy = policy_id_pattern(rng);
    let name = asset_name_pattern(rng);
    format!("{policy}.{name}")
}

/// Output index or `*`.
///
/// The index is built from three independently drawn digits and printed
/// without padding, so it is 1 to 3 digits long.
pub fn output_index_pattern<R: Rng + ?Sized>(rng: &mut R) -> String {
    let candidates: [&dyn Fn(&mut R) -> String; 2] = [
        &|rng: &mut R| {
            let hundreds = rand_digit(rng);
            let tens = rand_digit(rng);
            let ones = rand_digit(rng);
            (hundreds * 100 + tens * 10 + ones).to_string()
        },
        &|_: &mut R| WILDCARD.to_string(),
    ];
    alternate(rng, &candidates)
}

/// 64 hex characters.
pub fn transaction_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    rand_hex_string(rng, TRANSACTION_ID_LEN)
}

/// `<output-index>@<transaction-id>`.
pub fn output_reference_pattern<R: Rng + ?Sized>(rng: &mut R) -> String {
    let index = output_index_pattern(rng);
    let tx = transaction_id(rng);
    format!("{index}@{tx}")
}

/// `{n}` with `n` in `[0, 9999)`.
pub fn metadata_tag_pattern<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{{{}}}", rng.gen_range(0..METADATA_TAG_BOUND))
}
