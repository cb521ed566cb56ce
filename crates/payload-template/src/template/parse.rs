//! Parser from tokens to the template syntax tree.
//!
//! Function identifiers are resolved against the registry while parsing,
//! so an unknown name is a syntax error and the resulting tree holds the
//! functions themselves.

use super::lexer::{position, syntax_error, tokenize, Token, TokenKind};
use crate::error::SyntaxError;
use payload_core::{FunctionRegistry, TemplateFunction, TemplateValue};
use std::sync::Arc;

/// Line/column of a syntax tree element, kept for execution errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Pos {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone)]
pub(crate) enum Node {
    Text(String),
    Action(Pipeline),
}

/// `command | command | …`; never empty.
#[derive(Debug, Clone)]
pub(crate) struct Pipeline {
    pub commands: Vec<Command>,
    pub pos: Pos,
}

#[derive(Debug, Clone)]
pub(crate) enum Command {
    /// Function call; a piped value is appended as the last argument.
    Call {
        function: Arc<TemplateFunction>,
        args: Vec<Operand>,
        pos: Pos,
    },
    /// A lone operand, only valid as the first stage of a pipeline.
    Operand(Operand),
}

#[derive(Debug, Clone)]
pub(crate) enum Operand {
    Literal(TemplateValue),
    Variable { name: String, pos: Pos },
    /// Function named as an argument; called with no arguments.
    Call {
        function: Arc<TemplateFunction>,
        pos: Pos,
    },
    Pipeline(Pipeline),
}

/// Deepest nesting of parenthesized pipelines a template may use.
pub(crate) const MAX_PAREN_DEPTH: usize = 100;

/// Which token ends the pipeline being parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Closing {
    Action,
    Paren,
}

pub(crate) fn parse(src: &str, registry: &FunctionRegistry) -> Result<Vec<Node>, SyntaxError> {
    let tokens = tokenize(src)?;
    let mut parser = Parser {
        src,
        tokens,
        index: 0,
        registry,
        depth: 0,
    };
    parser.parse_template()
}

struct Parser<'a> {
    src: &'a str,
    tokens: Vec<Token>,
    index: usize,
    registry: &'a FunctionRegistry,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> &Token {
        // The lexer always ends the stream with Eof.
        &self.tokens[self.index.min(self.tokens.len() - 1)]
    }

    fn next(&mut self) -> Token {
        let token = self.peek().clone();
        if self.index < self.tokens.len() {
            self.index += 1;
        }
        token
    }

    fn pos(&self, offset: usize) -> Pos {
        let (line, column) = position(self.src, offset);
        Pos { line, column }
    }

    fn error(&self, offset: usize, message: impl Into<String>) -> SyntaxError {
        syntax_error(self.src, offset, message)
    }

    fn parse_template(&mut self) -> Result<Vec<Node>, SyntaxError> {
        let mut nodes = Vec::new();
        loop {
            let token = self.next();
            match token.kind {
                TokenKind::Text(text) => nodes.push(Node::Text(text)),
                TokenKind::Open => {
                    nodes.push(Node::Action(self.parse_pipeline(token.offset, Closing::Action)?))
                }
                TokenKind::Eof => return Ok(nodes),
                other => {
                    return Err(self.error(
                        token.offset,
                        format!("unexpected {} outside action", other.describe()),
                    ))
                }
            }
        }
    }

    fn parse_pipeline(&mut self, start: usize, closing: Closing) -> Result<Pipeline, SyntaxError> {
        let mut commands = Vec::new();
        let mut stage_offsets = Vec::new();

        loop {
            stage_offsets.push(self.peek().offset);
            commands.push(self.parse_command()?);

            let token = self.next();
            match (token.kind, closing) {
                (TokenKind::Pipe, _) => continue,
                (TokenKind::Close, Closing::Action) | (TokenKind::RightParen, Closing::Paren) => {
                    break
                }
                (TokenKind::Close, Closing::Paren) => {
                    return Err(self.error(start, "unclosed left paren"))
                }
                (TokenKind::RightParen, Closing::Action) => {
                    return Err(self.error(token.offset, "unexpected right paren"))
                }
                (other, _) => {
                    return Err(self.error(
                        token.offset,
                        format!("unexpected {} in command", other.describe()),
                    ))
                }
            }
        }

        for (stage, command) in commands.iter().enumerate().skip(1) {
            if !matches!(command, Command::Call { .. }) {
                return Err(self.error(
                    stage_offsets[stage],
                    format!("non executable command in pipeline stage {}", stage + 1),
                ));
            }
        }

        Ok(Pipeline {
            commands,
            pos: self.pos(start),
        })
    }

    fn at_command_end(&self) -> bool {
        matches!(
            self.peek().kind,
            TokenKind::Pipe | TokenKind::Close | TokenKind::RightParen | TokenKind::Eof
        )
    }

    fn parse_command(&mut self) -> Result<Command, SyntaxError> {
        if self.at_command_end() {
            return Err(self.error(self.peek().offset, "missing value for command"));
        }

        if let TokenKind::Ident(name) = &self.peek().kind {
            let name = name.clone();
            let token = self.next();
            let function = self.lookup(&name, token.offset)?;
            let mut args = Vec::new();
            while !self.at_command_end() {
                args.push(self.parse_operand()?);
            }
            return Ok(Command::Call {
                function,
                args,
                pos: self.pos(token.offset),
            });
        }

        let first = self.peek().clone();
        let operand = self.parse_operand()?;
        if !self.at_command_end() {
            return Err(self.error(
                self.peek().offset,
                format!("can't give argument to non-function {}", first.kind.describe()),
            ));
        }
        Ok(Command::Operand(operand))
    }

    fn parse_operand(&mut self) -> Result<Operand, SyntaxError> {
        let token = self.next();
        let operand = match token.kind {
            TokenKind::Int(i) => Operand::Literal(TemplateValue::Int(i)),
            TokenKind::Float(f) => Operand::Literal(TemplateValue::Float(f)),
            TokenKind::Str(s) => Operand::Literal(TemplateValue::String(s)),
            TokenKind::Bool(b) => Operand::Literal(TemplateValue::Bool(b)),
            TokenKind::Field(name) => Operand::Variable {
                name,
                pos: self.pos(token.offset),
            },
            TokenKind::Ident(name) => Operand::Call {
                function: self.lookup(&name, token.offset)?,
                pos: self.pos(token.offset),
            },
            TokenKind::LeftParen => {
                if self.depth >= MAX_PAREN_DEPTH {
                    return Err(self.error(token.offset, "pipeline nested too deeply"));
                }
                self.depth += 1;
                let pipeline = self.parse_pipeline(token.offset, Closing::Paren);
                self.depth -= 1;
                Operand::Pipeline(pipeline?)
            }
            other => {
                return Err(self.error(
                    token.offset,
                    format!("unexpected {} in operand", other.describe()),
                ))
            }
        };
        Ok(operand)
    }

    fn lookup(&self, name: &str, offset: usize) -> Result<Arc<TemplateFunction>, SyntaxError> {
        self.registry
            .get(name)
            .ok_or_else(|| self.error(offset, format!("function {name:?} not defined")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> FunctionRegistry {
        let mut registry = FunctionRegistry::new();
        registry
            .register("now", 0, |_| Ok(TemplateValue::Int(0)))
            .register("upper", 1, |args| {
                Ok(TemplateValue::from(args.string(0)?.to_uppercase()))
            });
        registry
    }

    fn parse_err(src: &str) -> SyntaxError {
        parse(src, &registry()).unwrap_err()
    }

    #[test]
    fn test_parse_text_and_action() {
        let nodes = parse("a{{ upper .x }}b", &registry()).unwrap();
        assert_eq!(nodes.len(), 3);
        assert!(matches!(&nodes[0], Node::Text(t) if t == "a"));
        let Node::Action(pipeline) = &nodes[1] else {
            panic!("Expected Action");
        };
        assert_eq!(pipeline.commands.len(), 1);
        let Command::Call { function, args, .. } = &pipeline.commands[0] else {
            panic!("Expected Call");
        };
        assert_eq!(function.name(), "upper");
        assert!(matches!(&args[0], Operand::Variable { name, .. } if name == "x"));
    }

    #[test]
    fn test_parse_pipeline_and_parens() {
        let nodes = parse(r#"{{ "a" | upper }}{{ upper (upper now) }}"#, &registry()).unwrap();
        let Node::Action(first) = &nodes[0] else {
            panic!("Expected Action");
        };
        assert_eq!(first.commands.len(), 2);
        assert!(matches!(first.commands[0], Command::Operand(Operand::Literal(_))));

        let Node::Action(second) = &nodes[1] else {
            panic!("Expected Action");
        };
        let Command::Call { args, .. } = &second.commands[0] else {
            panic!("Expected Call");
        };
        let Operand::Pipeline(inner) = &args[0] else {
            panic!("Expected nested pipeline");
        };
        let Command::Call { args, .. } = &inner.commands[0] else {
            panic!("Expected Call");
        };
        assert!(matches!(&args[0], Operand::Call { function, .. } if function.name() == "now"));
    }

    #[test]
    fn test_unknown_function() {
        let err = parse_err("x{{ rand_nope 1 }}");
        assert_eq!(err.message, "function \"rand_nope\" not defined");
        assert_eq!((err.line, err.column), (1, 5));
    }

    #[test]
    fn test_syntax_errors() {
        for (src, message) in [
            ("{{ }}", "missing value for command"),
            ("{{ upper | }}", "missing value for command"),
            ("{{ 1 2 }}", "can't give argument to non-function number 1"),
            ("{{ upper \"a\" | .x }}", "non executable command in pipeline stage 2"),
            ("{{ upper (now }}", "unclosed left paren"),
            ("{{ now ) }}", "unexpected right paren"),
        ] {
            let err = parse_err(src);
            assert_eq!(err.message, message, "for source {src:?}");
        }
    }

    fn nested(depth: usize) -> String {
        format!("{{{{ upper {}\"a\"{} }}}}", "(".repeat(depth), ")".repeat(depth))
    }

    #[test]
    fn test_nesting_up_to_limit() {
        assert!(parse(&nested(MAX_PAREN_DEPTH), &registry()).is_ok());
    }

    #[test]
    fn test_deep_nesting_is_a_syntax_error() {
        let err = parse_err(&nested(MAX_PAREN_DEPTH + 1));
        assert_eq!(err.message, "pipeline nested too deeply");
        // "{{ upper " is 9 bytes; the offending paren follows the first 100.
        assert_eq!((err.line, err.column), (1, 10 + MAX_PAREN_DEPTH));

        let err = parse_err(&nested(10_000));
        assert_eq!(err.message, "pipeline nested too deeply");
    }
}
