//! Error types for template compilation and rendering.

use std::fmt;

/// One step from a parent value to a child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a value inside the payload tree, printed as `$.outputs[2].address`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// The root of the tree.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Prepend a segment. Paths are built while an error unwinds, innermost first.
    pub(crate) fn push_front(&mut self, segment: PathSegment) {
        self.segments.insert(0, segment);
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.segments {
            match segment {
                PathSegment::Key(key) if is_plain_key(key) => write!(f, ".{key}")?,
                PathSegment::Key(key) => write!(f, "[{key:?}]")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

fn is_plain_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Malformed template source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{line}:{column}: {message}")]
pub struct SyntaxError {
    /// 1-based line of the offending position
    pub line: usize,
    /// 1-based column (in characters) of the offending position
    pub column: usize,
    pub message: String,
}

/// Failure while executing a parsed template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{line}:{column}: {message}")]
pub struct ExecError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

/// Error type for compiling a payload tree.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    /// A string leaf is not a valid template
    #[error("invalid template at {path}: {source}")]
    Template {
        path: FieldPath,
        #[source]
        source: SyntaxError,
    },
}

impl CompileError {
    /// Location of the offending field.
    pub fn path(&self) -> &FieldPath {
        match self {
            Self::Template { path, .. } => path,
        }
    }

    pub(crate) fn within(mut self, segment: PathSegment) -> Self {
        match &mut self {
            Self::Template { path, .. } => path.push_front(segment),
        }
        self
    }
}

/// Error type for rendering a compiled payload tree.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    /// A template leaf failed to execute
    #[error("failed to render template at {path}: {source}")]
    Template {
        path: FieldPath,
        #[source]
        source: ExecError,
    },
}

impl RenderError {
    /// Location of the failing field.
    pub fn path(&self) -> &FieldPath {
        match self {
            Self::Template { path, .. } => path,
        }
    }

    pub(crate) fn within(mut self, segment: PathSegment) -> Self {
        match &mut self {
            Self::Template { path, .. } => path.push_front(segment),
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_path_display() {
        let mut path = FieldPath::root();
        path.push_front(PathSegment::Key("address".to_string()));
        path.push_front(PathSegment::Index(2));
        path.push_front(PathSegment::Key("outputs".to_string()));
        assert_eq!(path.to_string(), "$.outputs[2].address");
    }

    #[test]
    fn test_field_path_quotes_odd_keys() {
        let mut path = FieldPath::root();
        path.push_front(PathSegment::Key("a b".to_string()));
        assert_eq!(path.to_string(), r#"$["a b"]"#);
        assert_eq!(FieldPath::root().to_string(), "$");
    }

    #[test]
    fn test_compile_error_message() {
        let err = CompileError::Template {
            path: FieldPath::root(),
            source: SyntaxError {
                line: 1,
                column: 7,
                message: "unclosed action".to_string(),
            },
        }
        .within(PathSegment::Key("to".to_string()));
        assert_eq!(err.to_string(), "invalid template at $.to: 1:7: unclosed action");
    }
}
