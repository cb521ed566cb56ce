//! The payload template language.
//!
//! Literal text with `{{ pipeline }}` actions, where a pipeline is one or
//! more commands separated by `|`.
//!
//! ```text
//! addr1{{ rand_string 8 }}            call with a literal argument
//! {{ .host }}                         context variable
//! {{ rand_int 1 10 | rand_string }}   piped value becomes the last argument
//! {{ rand_string (rand_int 1 4) }}    parenthesized pipeline
//! {{- /* comment */ -}}               comment, trimming surrounding space
//! ```
//!
//! Integers may be written in decimal, `0x`/`0o`/`0b` or leading-zero octal
//! form, with `_` between digits, or as a character constant (`'a'` is 97).
//! Hexadecimal floats and imaginary numbers are not supported.
//!
//! Control flow (`if`, `range`, `with`, …) and variables (`$x`) are not part
//! of the payload language and are rejected at parse time.
//! Parenthesized pipelines nest at most 100 deep.

mod exec;
mod lexer;
mod parse;

use crate::error::{ExecError, SyntaxError};
use exec::Executor;
use parse::Node;
use payload_core::{FunctionRegistry, RenderContext};
use serde::{Deserialize, Serialize};

/// What a reference to an absent context variable evaluates to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingVariable {
    /// Fail the render call.
    #[default]
    Error,
    /// Substitute the empty string.
    Empty,
}

/// A parsed template with its functions bound.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
    nodes: Vec<Node>,
    missing_variable: MissingVariable,
}

impl Template {
    /// Parse `source`, failing on missing variables at execution time.
    pub fn parse(source: &str, registry: &FunctionRegistry) -> Result<Self, SyntaxError> {
        Self::parse_with(source, registry, MissingVariable::default())
    }

    /// Parse `source` with an explicit missing-variable policy.
    pub fn parse_with(
        source: &str,
        registry: &FunctionRegistry,
        missing_variable: MissingVariable,
    ) -> Result<Self, SyntaxError> {
        Ok(Self {
            source: source.to_string(),
            nodes: parse::parse(source, registry)?,
            missing_variable,
        })
    }

    /// The original template text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// True when the template has no actions and always renders its source.
    pub fn is_static(&self) -> bool {
        self.nodes.iter().all(|node| matches!(node, Node::Text(_)))
    }

    /// Render the template against `ctx`.
    pub fn execute(&self, ctx: &RenderContext) -> Result<String, ExecError> {
        Executor {
            ctx,
            missing_variable: self.missing_variable,
        }
        .execute(&self.nodes)
    }
}
