//! Template-callable functions and the registry that names them.
//!
//! A [`FunctionRegistry`] is handed to the template compiler, which binds
//! every function identifier it meets to the registered
//! [`TemplateFunction`]. Unknown names fail compilation, so a compiled
//! template never looks anything up again at render time.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Errors raised by a template function call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FunctionError {
    /// Called with the wrong number of arguments
    #[error("wrong number of args for {function}: want {expected} got {got}")]
    WrongArgumentCount {
        function: String,
        expected: usize,
        got: usize,
    },

    /// An argument has the wrong type
    #[error("wrong type for argument {index} of {function}: expected {expected}; got {got}")]
    WrongArgumentType {
        function: String,
        index: usize,
        expected: &'static str,
        got: &'static str,
    },

    /// An argument has the right type but an unusable value
    #[error("invalid argument for {function}: {message}")]
    InvalidArgument { function: String, message: String },

    /// The function itself failed
    #[error("error calling {function}: {message}")]
    Failed { function: String, message: String },
}

/// Runtime value flowing through a template pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl TemplateValue {
    /// Name of the value's type, as reported in errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
        }
    }
}

impl fmt::Display for TemplateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write_float(f, *x),
            Self::String(s) => f.write_str(s),
        }
    }
}

/// Shortest round-trip digits, switching to exponent form (`1.5e+21`,
/// `1e-05`) for magnitudes below 1e-4 or at least 1e21.
fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    if x.is_nan() {
        return f.write_str("NaN");
    }
    if x.is_infinite() {
        return f.write_str(if x > 0.0 { "+Inf" } else { "-Inf" });
    }
    let magnitude = x.abs();
    if magnitude == 0.0 || (1e-4..1e21).contains(&magnitude) {
        return write!(f, "{x}");
    }
    let scientific = format!("{x:e}");
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    write!(f, "{mantissa}e{sign}{digits:0>2}")
}

impl From<String> for TemplateValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for TemplateValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<i64> for TemplateValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for TemplateValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

/// Typed view over the arguments of one call.
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    function: &'a str,
    values: &'a [TemplateValue],
}

impl<'a> Args<'a> {
    pub fn new(function: &'a str, values: &'a [TemplateValue]) -> Self {
        Self { function, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn value(&self, index: usize) -> Result<&'a TemplateValue, FunctionError> {
        self.values
            .get(index)
            .ok_or_else(|| FunctionError::WrongArgumentCount {
                function: self.function.to_string(),
                expected: index + 1,
                got: self.values.len(),
            })
    }

    fn wrong_type(&self, index: usize, expected: &'static str, got: &TemplateValue) -> FunctionError {
        FunctionError::WrongArgumentType {
            function: self.function.to_string(),
            index,
            expected,
            got: got.type_name(),
        }
    }

    /// Integer argument. Floats are not truncated.
    pub fn int(&self, index: usize) -> Result<i64, FunctionError> {
        match self.value(index)? {
            TemplateValue::Int(i) => Ok(*i),
            other => Err(self.wrong_type(index, "int", other)),
        }
    }

    /// Float argument. Integers are widened.
    pub fn float(&self, index: usize) -> Result<f64, FunctionError> {
        match self.value(index)? {
            TemplateValue::Float(f) => Ok(*f),
            TemplateValue::Int(i) => Ok(*i as f64),
            other => Err(self.wrong_type(index, "float", other)),
        }
    }

    /// Non-negative integer argument, used for lengths.
    pub fn length(&self, index: usize) -> Result<usize, FunctionError> {
        let n = self.int(index)?;
        usize::try_from(n).map_err(|_| FunctionError::InvalidArgument {
            function: self.function.to_string(),
            message: format!("length must be non-negative, got {n}"),
        })
    }

    /// String argument.
    pub fn string(&self, index: usize) -> Result<&'a str, FunctionError> {
        match self.value(index)? {
            TemplateValue::String(s) => Ok(s),
            other => Err(self.wrong_type(index, "string", other)),
        }
    }
}

type Callback = dyn Fn(Args<'_>) -> Result<TemplateValue, FunctionError> + Send + Sync;

/// A named function callable from template text.
pub struct TemplateFunction {
    name: String,
    arity: usize,
    callback: Box<Callback>,
}

impl TemplateFunction {
    /// Create a function taking exactly `arity` arguments.
    pub fn new<F>(name: impl Into<String>, arity: usize, callback: F) -> Self
    where
        F: Fn(Args<'_>) -> Result<TemplateValue, FunctionError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            arity,
            callback: Box::new(callback),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Invoke the function after checking the argument count.
    pub fn call(&self, args: &[TemplateValue]) -> Result<TemplateValue, FunctionError> {
        if args.len() != self.arity {
            return Err(FunctionError::WrongArgumentCount {
                function: self.name.clone(),
                expected: self.arity,
                got: args.len(),
            });
        }
        (self.callback)(Args::new(&self.name, args))
    }
}

impl fmt::Debug for TemplateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Name → function mapping bound into templates at compile time.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, Arc<TemplateFunction>>,
}

impl FunctionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function, replacing any previous one with the same name.
    pub fn insert(&mut self, function: TemplateFunction) -> &mut Self {
        self.functions
            .insert(function.name.clone(), Arc::new(function));
        self
    }

    /// Register a closure under `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, arity: usize, callback: F) -> &mut Self
    where
        F: Fn(Args<'_>) -> Result<TemplateValue, FunctionError> + Send + Sync + 'static,
    {
        self.insert(TemplateFunction::new(name, arity, callback))
    }

    /// Get a function by name.
    pub fn get(&self, name: &str) -> Option<Arc<TemplateFunction>> {
        self.functions.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
