//! Error types for the random generators.

use payload_core::FunctionError;

/// Errors raised by random primitives.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeneratorError {
    /// Integer range with no members
    #[error("empty integer range: to ({to}) must be greater than from ({from})")]
    EmptyIntRange { from: i64, to: i64 },

    /// Float range that is empty or not finite
    #[error("invalid float range: [{from}, {to}) must be finite and non-empty")]
    InvalidFloatRange { from: f64, to: f64 },
}

impl GeneratorError {
    /// Attribute this error to a template function call.
    pub fn into_function_error(self, function: &str) -> FunctionError {
        FunctionError::Failed {
            function: function.to_string(),
            message: self.to_string(),
        }
    }
}
