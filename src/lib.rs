//! blast-kupo payload generation
//!
//! Turns a declarative payload template into an endless supply of concrete,
//! randomized request bodies for load testing a Kupo indexer.
//!
//! # Crates
//!
//! - `payload_core` - value trees, render context and the function registry
//! - `payload_generator` - random primitives, pattern generators and the
//!   builtin function namespace
//! - `payload_template` - template language, compiler and renderer tree
//!
//! # Usage
//!
//! ```rust
//! use blast_kupo::{PayloadConfig, PayloadFactory, RenderContext};
//!
//! let config = PayloadConfig::from_yaml(
//!     r#"
//! seed: 42
//! payload:
//!   pattern: "{{ rand_address }}"
//!   limit: 10
//! "#,
//! )?;
//! let factory = PayloadFactory::new(&config)?;
//!
//! for payload in factory.payloads(&RenderContext::new(), 3) {
//!     let json = serde_json::Value::from(payload?);
//!     assert_eq!(json["limit"], 10);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod logging;
pub mod payload;

pub use config::{ConfigError, PayloadConfig};
pub use payload::{PayloadFactory, Payloads};

// Re-exports for convenience
pub use payload_core::{RawValue, RenderContext, RenderedValue};
pub use payload_generator::{Profile, RandomSource};
pub use payload_template::{CompileError, MissingVariable, RenderError};
