//! Builtin function namespace for payload templates.
//!
//! Binds the generators of this crate to the names templates call them by,
//! all drawing from one shared [`RandomSource`].

use crate::generators::{hash, numeric, pattern, string};
use crate::source::RandomSource;
use payload_core::{FunctionRegistry, TemplateValue};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Which set of builtin names a registry exposes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    /// The names load-test specs have always used.
    #[default]
    Standard,
    /// Standard names plus the building blocks of each pattern.
    Extended,
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => f.write_str("standard"),
            Self::Extended => f.write_str("extended"),
        }
    }
}

/// Names available under [`Profile::Standard`].
pub const STANDARD_FUNCTIONS: &[&str] = &[
    "rand_int",
    "rand_float",
    "rand_string",
    "rand_datum_hash",
    "rand_address",
    "rand_credential",
    "rand_asset",
    "rand_output_ref",
    "rand_metadata_tag",
];

/// Names added by [`Profile::Extended`].
pub const EXTENDED_FUNCTIONS: &[&str] = &[
    "rand_blake2b256",
    "rand_blake2b256_bech32",
    "rand_hex_string",
    "rand_policy_id",
    "rand_asset_name",
    "rand_output_index",
    "rand_transaction_id",
];

/// Build the builtin registry for `profile`.
pub fn builtin_registry(source: Arc<RandomSource>, profile: Profile) -> FunctionRegistry {
    let mut registry = FunctionRegistry::new();

    let src = Arc::clone(&source);
    registry.register("rand_int", 2, move |args| {
        let (from, to) = (args.int(0)?, args.int(1)?);
        src.with_rng(|rng| numeric::rand_int(rng, from, to))
            .map(TemplateValue::Int)
            .map_err(|err| err.into_function_error("rand_int"))
    });

    let src = Arc::clone(&source);
    registry.register("rand_float", 2, move |args| {
        let (from, to) = (args.float(0)?, args.float(1)?);
        src.with_rng(|rng| numeric::rand_float(rng, from, to))
            .map(TemplateValue::Float)
            .map_err(|err| err.into_function_error("rand_float"))
    });

    let src = Arc::clone(&source);
    registry.register("rand_string", 1, move |args| {
        let length = args.length(0)?;
        Ok(src.with_rng(|rng| string::rand_string(rng, length)).into())
    });

    register_niladic(&mut registry, &source, "rand_datum_hash", |rng| {
        hash::blake2b256_hex(rng)
    });
    register_niladic(&mut registry, &source, "rand_address", |rng| {
        pattern::address_pattern(rng)
    });
    register_niladic(&mut registry, &source, "rand_credential", |rng| {
        pattern::credential_pattern(rng)
    });
    register_niladic(&mut registry, &source, "rand_asset", |rng| {
        pattern::asset_pattern(rng)
    });
    register_niladic(&mut registry, &source, "rand_output_ref", |rng| {
        pattern::output_reference_pattern(rng)
    });
    register_niladic(&mut registry, &source, "rand_metadata_tag", |rng| {
        pattern::metadata_tag_pattern(rng)
    });

    if profile == Profile::Extended {
        register_niladic(&mut registry, &source, "rand_blake2b256", |rng| {
            hash::blake2b256_hex(rng)
        });
        register_niladic(&mut registry, &source, "rand_blake2b256_bech32", |rng| {
            hash::blake2b256_bech32(rng)
        });
        register_niladic(&mut registry, &source, "rand_policy_id", |rng| {
            pattern::policy_id_pattern(rng)
        });
        register_niladic(&mut registry, &source, "rand_asset_name", |rng| {
            pattern::asset_name_pattern(rng)
        });
        register_niladic(&mut registry, &source, "rand_output_index", |rng| {
            pattern::output_index_pattern(rng)
        });
        register_niladic(&mut registry, &source, "rand_transaction_id", |rng| {
            pattern::transaction_id(rng)
        });

        let src = Arc::clone(&source);
        registry.register("rand_hex_string", 1, move |args| {
            let length = args.length(0)?;
            Ok(src.with_rng(|rng| string::rand_hex_string(rng, length)).into())
        });
    }

    registry
}

fn register_niladic<F>(registry: &mut FunctionRegistry, source: &Arc<RandomSource>, name: &str, generate: F)
where
    F: Fn(&mut dyn RngCore) -> String + Send + Sync + 'static,
{
    let source = Arc::clone(source);
    registry.register(name, 0, move |_| {
        Ok(TemplateValue::String(source.with_rng(|rng| generate(rng))))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use payload_core::FunctionError;

    fn registry(profile: Profile) -> FunctionRegistry {
        builtin_registry(Arc::new(RandomSource::from_seed(42)), profile)
    }

    fn call(registry: &FunctionRegistry, name: &str, args: &[TemplateValue]) -> TemplateValue {
        registry.get(name).unwrap().call(args).unwrap()
    }

    #[test]
    fn test_standard_profile_names() {
        let registry = registry(Profile::Standard);
        let mut expected = STANDARD_FUNCTIONS.to_vec();
        expected.sort_unstable();
        assert_eq!(registry.names(), expected);
    }

    #[test]
    fn test_extended_profile_names() {
        let registry = registry(Profile::Extended);
        assert_eq!(
            registry.len(),
            STANDARD_FUNCTIONS.len() + EXTENDED_FUNCTIONS.len()
        );
        for name in STANDARD_FUNCTIONS.iter().chain(EXTENDED_FUNCTIONS) {
            assert!(registry.contains(name), "missing {name}");
        }
    }

    #[test]
    fn test_rand_int_call() {
        let registry = registry(Profile::Standard);
        for _ in 0..100 {
            let TemplateValue::Int(v) =
                call(&registry, "rand_int", &[TemplateValue::Int(1), TemplateValue::Int(4)])
            else {
                panic!("Expected Int");
            };
            assert!((1..4).contains(&v));
        }
    }

    #[test]
    fn test_rand_int_empty_range_is_an_error() {
        let registry = registry(Profile::Standard);
        let err = registry
            .get("rand_int")
            .unwrap()
            .call(&[TemplateValue::Int(4), TemplateValue::Int(4)])
            .unwrap_err();
        assert!(matches!(err, FunctionError::Failed { ref function, .. } if function == "rand_int"));
    }

    #[test]
    fn test_rand_float_accepts_int_bounds() {
        let registry = registry(Profile::Standard);
        let TemplateValue::Float(v) =
            call(&registry, "rand_float", &[TemplateValue::Int(0), TemplateValue::Float(0.5)])
        else {
            panic!("Expected Float");
        };
        assert!((0.0..0.5).contains(&v));
    }

    #[test]
    fn test_rand_string_call() {
        let registry = registry(Profile::Standard);
        let value = call(&registry, "rand_string", &[TemplateValue::Int(12)]);
        let TemplateValue::String(s) = value else {
            panic!("Expected String");
        };
        assert_eq!(s.len(), 12);
        assert!(s.chars().all(|c| c.is_ascii_alphabetic()));
    }

    #[test]
    fn test_hash_aliases() {
        let registry = registry(Profile::Extended);
        for name in ["rand_datum_hash", "rand_blake2b256"] {
            let value = call(&registry, name, &[]).to_string();
            assert_eq!(value.len(), 64);
        }
        assert!(call(&registry, "rand_blake2b256_bech32", &[])
            .to_string()
            .starts_with("ed25519_pk1"));
    }

    #[test]
    fn test_datum_hash_survives_entropy_failure() {
        use crate::generators::hash::tests::FailingRng;

        let registry = builtin_registry(
            Arc::new(RandomSource::from_rng(FailingRng)),
            Profile::Standard,
        );
        let first = call(&registry, "rand_datum_hash", &[]);
        let second = call(&registry, "rand_datum_hash", &[]);
        assert_eq!(first.to_string().len(), 64);
        assert_eq!(first, second);
    }

    #[test]
    fn test_same_seed_same_output() {
        let a = registry(Profile::Standard);
        let b = registry(Profile::Standard);
        assert_eq!(
            call(&a, "rand_output_ref", &[]),
            call(&b, "rand_output_ref", &[])
        );
    }

    #[test]
    fn test_profile_deserializes_snake_case() {
        let profile: Profile = serde_yaml::from_str("extended").unwrap();
        assert_eq!(profile, Profile::Extended);
        assert_eq!(Profile::default(), Profile::Standard);
        assert_eq!(Profile::Extended.to_string(), "extended");
    }
}
