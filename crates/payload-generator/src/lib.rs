//! Random value generators for blast-kupo payload templates.
//!
//! This crate provides the random primitives and domain pattern generators
//! that templates call, plus the [`builtin_registry`] that binds them to
//! template function names.
//!
//! # Architecture
//!
//! ```text
//!  Arc<RandomSource>  (seeded StdRng behind a mutex)
//!          │
//!          ▼
//! ┌──────────────────────┐
//! │  builtin_registry    │
//! │                      │
//! │  rand_int / float    │──► generators::numeric
//! │  rand_string         │──► generators::string
//! │  rand_datum_hash     │──► generators::hash
//! │  rand_address, ...   │──► generators::pattern
//! └──────────┬───────────┘
//!            │
//!            ▼
//!    FunctionRegistry  (handed to the template compiler)
//! ```
//!
//! # Example
//!
//! ```rust
//! use payload_generator::{builtin_registry, Profile, RandomSource};
//! use std::sync::Arc;
//!
//! let registry = builtin_registry(Arc::new(RandomSource::from_seed(42)), Profile::Standard);
//! let credential = registry.get("rand_credential").unwrap().call(&[]).unwrap();
//! assert!(credential.to_string().contains('/'));
//! ```
//!
//! # Builtin functions
//!
//! - `rand_int FROM TO` - integer in `[FROM, TO)`
//! - `rand_float FROM TO` - float in `[FROM, TO)`
//! - `rand_string N` - N letters from `[a-zA-Z]`
//! - `rand_datum_hash` - random BLAKE2b-256 digest, 64 lowercase hex chars
//! - `rand_address` - `addr1…`, `stake1…` or `*`
//! - `rand_credential` - `<hash-or-*>/<hash-or-*>`
//! - `rand_asset` - `<policy-or-*>.<name-or-*>`
//! - `rand_output_ref` - `<index-or-*>@<tx-id>`
//! - `rand_metadata_tag` - `{N}`
//!
//! The [`Profile::Extended`] profile adds `rand_blake2b256`,
//! `rand_blake2b256_bech32`, `rand_hex_string`, `rand_policy_id`,
//! `rand_asset_name`, `rand_output_index` and `rand_transaction_id`.

pub mod error;
pub mod generators;
pub mod namespace;
pub mod source;

// Re-exports for convenience
pub use error::GeneratorError;
pub use namespace::{builtin_registry, Profile, EXTENDED_FUNCTIONS, STANDARD_FUNCTIONS};
pub use source::RandomSource;
