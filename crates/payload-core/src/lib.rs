//! Core types for the blast-kupo payload templating engine.
//!
//! This crate provides the foundational types shared by the generator,
//! the template compiler and the orchestration surface:
//!
//! - [`RawValue`] - Untyped declarative input decoded from JSON/YAML/TOML
//! - [`RenderedValue`] - Concrete payload produced by a render call
//! - [`RenderContext`] - Per-request string variables
//! - [`FunctionRegistry`] - Name → function table bound into templates
//!
//! # Architecture
//!
//! ```text
//! payload-core (this crate)
//!    │
//!    ├─── payload-generator  (random primitives, patterns, builtin registry)
//!    │
//!    └─── payload-template   (template language, compiler, renderer tree)
//! ```
//!
//! # Example
//!
//! ```rust
//! use payload_core::{FunctionRegistry, TemplateValue};
//!
//! let mut registry = FunctionRegistry::new();
//! registry.register("shout", 1, |args| {
//!     Ok(TemplateValue::from(args.string(0)?.to_uppercase()))
//! });
//!
//! let shout = registry.get("shout").unwrap();
//! assert_eq!(shout.call(&["kupo".into()]).unwrap().to_string(), "KUPO");
//! ```

pub mod context;
pub mod function;
pub mod values;

// Re-exports for convenience
pub use context::RenderContext;
pub use function::{Args, FunctionError, FunctionRegistry, TemplateFunction, TemplateValue};
pub use values::{RawValue, RenderedValue, ValueError};
