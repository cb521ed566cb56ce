//! Template compiler and renderer tree for blast-kupo payloads.
//!
//! A payload is declared as a tree of mappings, sequences and scalars.
//! Every string in it is a template. [`compile`] turns the tree into a
//! [`Slot`] once; rendering that slot produces a fresh concrete value each
//! time, re-evaluating every random function call.
//!
//! # Architecture
//!
//! ```text
//!   RawValue (from YAML / JSON / TOML)
//!          │
//!          ▼  compile(raw, &FunctionRegistry)
//! ┌─────────────────────────────┐
//! │  Slot                       │
//! │   ├─ Compiled(Renderer)     │
//! │   │    ├─ Map               │
//! │   │    ├─ Sequence          │
//! │   │    ├─ Template ─────────┼──► template::Template (parsed once)
//! │   │    └─ Native            │
//! │   └─ Passthrough(RawValue)  │
//! └──────────────┬──────────────┘
//!                │ render(&RenderContext)
//!                ▼
//!          RenderedValue
//! ```
//!
//! # Example
//!
//! ```rust
//! use payload_core::{FunctionRegistry, RawValue, RenderContext, TemplateValue};
//! use payload_template::compile;
//!
//! let mut registry = FunctionRegistry::new();
//! registry.register("greeting", 0, |_| Ok(TemplateValue::from("hello")));
//!
//! let raw: RawValue = serde_json::from_str(r#"{"msg": "{{ greeting }}, {{ .who }}", "n": 1}"#).unwrap();
//! let slot = compile(&raw, &registry).unwrap();
//!
//! let out = slot.render(&RenderContext::new().with("who", "kupo")).unwrap();
//! assert_eq!(out.get("msg").and_then(|v| v.as_str()), Some("hello, kupo"));
//! ```

pub mod compiler;
pub mod error;
pub mod renderer;
pub mod template;

// Re-exports for convenience
pub use compiler::{compile, compile_with, CompileOptions};
pub use error::{CompileError, ExecError, FieldPath, PathSegment, RenderError, SyntaxError};
pub use renderer::{NativeValue, Renderer, Slot, TemplateRenderer};
pub use template::{MissingVariable, Template};
