//! Tokenizer for `{{ }}` template source.
//!
//! Text outside actions becomes a single [`TokenKind::Text`] token. Trim
//! markers (`{{- ` and ` -}}`) are applied here, so the parser never sees
//! them. Comments (`{{/* … */}}`) produce no tokens at all.

use crate::error::SyntaxError;
use std::num::IntErrorKind;

const LEFT_DELIM: &str = "{{";
const RIGHT_DELIM: &str = "}}";
const LEFT_TRIM: &str = "{{- ";
const RIGHT_TRIM: &str = "-}}";

const KEYWORDS: &[&str] = &[
    "if", "else", "end", "range", "with", "define", "template", "block", "break", "continue",
];

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Text(String),
    Open,
    Close,
    Ident(String),
    Field(String),
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Pipe,
    LeftParen,
    RightParen,
    Eof,
}

impl TokenKind {
    /// Short description used in error messages.
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Text(_) => "text".to_string(),
            Self::Open => format!("{LEFT_DELIM:?}"),
            Self::Close => format!("{RIGHT_DELIM:?}"),
            Self::Ident(name) => format!("identifier {name:?}"),
            Self::Field(name) => format!("field .{name}"),
            Self::Int(i) => format!("number {i}"),
            Self::Float(f) => format!("number {f}"),
            Self::Str(s) => format!("string {s:?}"),
            Self::Bool(b) => format!("{b}"),
            Self::Pipe => "\"|\"".to_string(),
            Self::LeftParen => "\"(\"".to_string(),
            Self::RightParen => "\")\"".to_string(),
            Self::Eof => "end of template".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    /// Byte offset into the source
    pub offset: usize,
}

/// 1-based line and column (in characters) of a byte offset.
pub(crate) fn position(src: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(src.len());
    let before = &src[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

pub(crate) fn syntax_error(src: &str, offset: usize, message: impl Into<String>) -> SyntaxError {
    let (line, column) = position(src, offset);
    SyntaxError {
        line,
        column,
        message: message.into(),
    }
}

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Every `_` in a number sits between two digits, or right after a radix prefix.
fn underscores_separate_digits(text: &str, radix: u32) -> bool {
    let chars: Vec<char> = text.chars().collect();
    chars.iter().enumerate().all(|(i, &c)| {
        if c != '_' {
            return true;
        }
        let before = i.checked_sub(1).map(|j| chars[j]);
        let after = chars.get(i + 1).copied();
        let prefix =
            radix != 10 && i == 2 && matches!(before, Some('x' | 'X' | 'o' | 'O' | 'b' | 'B'));
        (prefix || before.is_some_and(|b| b.is_digit(radix)))
            && after.is_some_and(|a| a.is_digit(radix))
    })
}

fn strip_underscores(digits: &str) -> String {
    digits.chars().filter(|&c| c != '_').collect()
}

/// Split `src` into tokens, ending with [`TokenKind::Eof`].
pub(crate) fn tokenize(src: &str) -> Result<Vec<Token>, SyntaxError> {
    let mut lexer = Lexer {
        src,
        pos: 0,
        tokens: Vec::new(),
        trim_next_text: false,
    };
    lexer.run()?;
    Ok(lexer.tokens)
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    tokens: Vec<Token>,
    trim_next_text: bool,
}

impl<'a> Lexer<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
    }

    fn emit(&mut self, kind: TokenKind, offset: usize) {
        self.tokens.push(Token { kind, offset });
    }

    fn error(&self, offset: usize, message: impl Into<String>) -> SyntaxError {
        syntax_error(self.src, offset, message)
    }

    fn emit_text(&mut self, offset: usize, mut text: &str) {
        if std::mem::take(&mut self.trim_next_text) {
            text = text.trim_start_matches(is_space);
        }
        if !text.is_empty() {
            self.emit(TokenKind::Text(text.to_string()), offset);
        }
    }

    fn run(&mut self) -> Result<(), SyntaxError> {
        let src = self.src;
        loop {
            let start = self.pos;
            let Some(found) = src[start..].find(LEFT_DELIM) else {
                self.emit_text(start, &src[start..]);
                self.pos = src.len();
                break;
            };

            let open = start + found;
            let trim_left = src[open..].starts_with(LEFT_TRIM)
                || src[open..].starts_with("{{-\t")
                || src[open..].starts_with("{{-\n")
                || src[open..].starts_with("{{-\r");
            let mut text = &src[start..open];
            if trim_left {
                text = text.trim_end_matches(is_space);
            }
            self.emit_text(start, text);

            self.pos = open + if trim_left { LEFT_TRIM.len() } else { LEFT_DELIM.len() };
            self.lex_action(open)?;
        }

        self.emit(TokenKind::Eof, src.len());
        Ok(())
    }

    fn at_right_delim(&self) -> Option<bool> {
        let rest = self.rest();
        if rest.starts_with(RIGHT_DELIM) {
            return Some(false);
        }
        let after_space = self.src[..self.pos].ends_with(is_space);
        if after_space && rest.starts_with(RIGHT_TRIM) {
            return Some(true);
        }
        None
    }

    fn close(&mut self, trim: bool) {
        let offset = self.pos;
        self.pos += if trim { RIGHT_TRIM.len() } else { RIGHT_DELIM.len() };
        self.trim_next_text = trim;
        self.emit(TokenKind::Close, offset);
    }

    fn lex_action(&mut self, open: usize) -> Result<(), SyntaxError> {
        if self.rest().starts_with("/*") {
            return self.lex_comment(open);
        }

        self.emit(TokenKind::Open, open);
        loop {
            self.eat_while(is_space);
            if let Some(trim) = self.at_right_delim() {
                self.close(trim);
                return Ok(());
            }

            let start = self.pos;
            let Some(c) = self.peek() else {
                return Err(self.error(open, "unclosed action"));
            };

            match c {
                '|' => {
                    self.bump();
                    self.emit(TokenKind::Pipe, start);
                }
                '(' => {
                    self.bump();
                    self.emit(TokenKind::LeftParen, start);
                }
                ')' => {
                    self.bump();
                    self.emit(TokenKind::RightParen, start);
                }
                '"' => self.lex_quote()?,
                '`' => self.lex_raw_quote()?,
                '\'' => self.lex_char()?,
                '.' if self.peek_second().is_some_and(|c| c.is_ascii_digit()) => self.lex_number()?,
                '.' => self.lex_field()?,
                '$' => return Err(self.error(start, "variables are not supported")),
                '+' | '-'
                    if self
                        .peek_second()
                        .is_some_and(|c| c.is_ascii_digit() || c == '.') =>
                {
                    self.lex_number()?
                }
                c if c.is_ascii_digit() => self.lex_number()?,
                c if c.is_alphabetic() || c == '_' => self.lex_identifier()?,
                c => return Err(self.error(start, format!("unexpected {c:?} in action"))),
            }
        }
    }

    fn lex_comment(&mut self, open: usize) -> Result<(), SyntaxError> {
        let body = self.pos + 2;
        let Some(end) = self.src[body..].find("*/") else {
            return Err(self.error(open, "unclosed comment"));
        };
        self.pos = body + end + 2;

        if self.rest().starts_with(" -}}") {
            self.pos += 1;
            self.close_silently(true);
        } else if self.rest().starts_with(RIGHT_DELIM) {
            self.close_silently(false);
        } else {
            return Err(self.error(self.pos, "comment ends before closing delimiter"));
        }
        Ok(())
    }

    fn close_silently(&mut self, trim: bool) {
        self.pos += if trim { RIGHT_TRIM.len() } else { RIGHT_DELIM.len() };
        self.trim_next_text = trim;
    }

    fn lex_identifier(&mut self) -> Result<(), SyntaxError> {
        let start = self.pos;
        self.eat_while(is_ident_char);
        let word = &self.src[start..self.pos];

        let kind = match word {
            "true" => TokenKind::Bool(true),
            "false" => TokenKind::Bool(false),
            "nil" => return Err(self.error(start, "nil is not a command")),
            w if KEYWORDS.contains(&w) => {
                return Err(self.error(start, format!("control keyword {w:?} is not supported")))
            }
            w => TokenKind::Ident(w.to_string()),
        };
        self.emit(kind, start);
        Ok(())
    }

    fn lex_field(&mut self) -> Result<(), SyntaxError> {
        let start = self.pos;
        self.bump();
        let name_start = self.pos;
        self.eat_while(is_ident_char);
        let name = &self.src[name_start..self.pos];

        if name.is_empty() {
            return Err(self.error(start, "bare \".\" is not supported; use .name"));
        }
        if self.peek() == Some('.') && self.peek_second().is_some_and(is_ident_char) {
            return Err(self.error(start, "nested field access is not supported"));
        }
        self.emit(TokenKind::Field(name.to_string()), start);
        Ok(())
    }

    fn lex_number(&mut self) -> Result<(), SyntaxError> {
        let start = self.pos;
        let negative = match self.peek() {
            Some(sign @ ('+' | '-')) => {
                self.bump();
                sign == '-'
            }
            _ => false,
        };
        let body_start = self.pos;

        let prefixed = match (self.peek(), self.peek_second()) {
            (Some('0'), Some('x' | 'X')) => Some(16),
            (Some('0'), Some('o' | 'O')) => Some(8),
            (Some('0'), Some('b' | 'B')) => Some(2),
            _ => None,
        };
        if let Some(radix) = prefixed {
            self.bump();
            self.bump();
            let digits_start = self.pos;
            self.eat_while(|c| c.is_digit(radix) || c == '_');
            self.reject_number_suffix(start)?;
            let body = &self.src[body_start..self.pos];
            let digits = &self.src[digits_start..self.pos];
            if !underscores_separate_digits(body, radix) {
                return Err(self.bad_number(start));
            }
            return self.emit_int(start, negative, &strip_underscores(digits), radix);
        }

        let is_digit = |c: char| c.is_ascii_digit() || c == '_';
        self.eat_while(is_digit);
        let mut is_float = false;
        if self.peek() == Some('.') {
            is_float = true;
            self.bump();
            self.eat_while(is_digit);
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            is_float = true;
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            self.eat_while(is_digit);
        }
        self.reject_number_suffix(start)?;

        let body = &self.src[body_start..self.pos];
        if !underscores_separate_digits(body, 10) {
            return Err(self.bad_number(start));
        }
        let digits = strip_underscores(body);
        if is_float {
            let value = digits
                .parse::<f64>()
                .map_err(|_| self.bad_number(start))?;
            self.emit(TokenKind::Float(if negative { -value } else { value }), start);
            return Ok(());
        }
        // A leading zero marks an octal integer.
        match digits.strip_prefix('0') {
            Some(octal) if !octal.is_empty() => self.emit_int(start, negative, octal, 8),
            _ => self.emit_int(start, negative, &digits, 10),
        }
    }

    /// Error out when letters or dots run straight on from a number.
    fn reject_number_suffix(&mut self, start: usize) -> Result<(), SyntaxError> {
        if self.peek().is_some_and(|c| is_ident_char(c) || c == '.') {
            self.eat_while(|c| is_ident_char(c) || c == '.');
            return Err(self.bad_number(start));
        }
        Ok(())
    }

    fn bad_number(&self, start: usize) -> SyntaxError {
        let text = &self.src[start..self.pos];
        self.error(start, format!("bad number syntax: {text:?}"))
    }

    fn emit_int(
        &mut self,
        start: usize,
        negative: bool,
        digits: &str,
        radix: u32,
    ) -> Result<(), SyntaxError> {
        if digits.is_empty() {
            return Err(self.bad_number(start));
        }
        let signed = if negative {
            format!("-{digits}")
        } else {
            digits.to_string()
        };
        let value = i64::from_str_radix(&signed, radix).map_err(|err| match err.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                let text = &self.src[start..self.pos];
                self.error(start, format!("number out of range: {text}"))
            }
            _ => self.bad_number(start),
        })?;
        self.emit(TokenKind::Int(value), start);
        Ok(())
    }

    /// `'a'` is the integer code point of the character.
    fn lex_char(&mut self) -> Result<(), SyntaxError> {
        let start = self.pos;
        self.bump();
        let escape_at = self.pos;
        let value = match self.bump() {
            Some('\\') => match self.bump() {
                Some(c) => self.unescape(c, escape_at)?,
                None => return Err(self.error(start, "unterminated character constant")),
            },
            Some('\'') => return Err(self.error(start, "empty character constant")),
            None | Some('\n') => return Err(self.error(start, "unterminated character constant")),
            Some(c) => c,
        };
        if self.bump() != Some('\'') {
            return Err(self.error(start, "unterminated character constant"));
        }
        self.emit(TokenKind::Int(i64::from(u32::from(value))), start);
        Ok(())
    }

    fn unescape(&self, c: char, escape_at: usize) -> Result<char, SyntaxError> {
        let escaped = match c {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            '\\' => '\\',
            '"' => '"',
            '\'' => '\'',
            other => {
                return Err(self.error(escape_at, format!("unknown escape sequence: \\{other}")))
            }
        };
        Ok(escaped)
    }

    fn lex_quote(&mut self) -> Result<(), SyntaxError> {
        let start = self.pos;
        self.bump();
        let mut value = String::new();

        loop {
            let escape_at = self.pos;
            match self.bump() {
                None | Some('\n') => return Err(self.error(start, "unterminated quoted string")),
                Some('"') => break,
                Some('\\') => match self.bump() {
                    Some(c) => value.push(self.unescape(c, escape_at)?),
                    None => return Err(self.error(start, "unterminated quoted string")),
                },
                Some(c) => value.push(c),
            }
        }

        self.emit(TokenKind::Str(value), start);
        Ok(())
    }

    fn lex_raw_quote(&mut self) -> Result<(), SyntaxError> {
        let start = self.pos;
        self.bump();
        let Some(end) = self.rest().find('`') else {
            return Err(self.error(start, "unterminated raw quoted string"));
        };
        let value = self.rest()[..end].to_string();
        self.pos += end + 1;
        self.emit(TokenKind::Str(value), start);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src)
            .unwrap()
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(
            kinds("addr1"),
            vec![TokenKind::Text("addr1".to_string()), TokenKind::Eof]
        );
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_action_tokens() {
        assert_eq!(
            kinds("addr1{{rand_string 8}}"),
            vec![
                TokenKind::Text("addr1".to_string()),
                TokenKind::Open,
                TokenKind::Ident("rand_string".to_string()),
                TokenKind::Int(8),
                TokenKind::Close,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_operands() {
        assert_eq!(
            kinds(r#"{{ f -3 1.5 2e3 "a\tb" `raw\n` true .host (g) | h }}"#),
            vec![
                TokenKind::Open,
                TokenKind::Ident("f".to_string()),
                TokenKind::Int(-3),
                TokenKind::Float(1.5),
                TokenKind::Float(2000.0),
                TokenKind::Str("a\tb".to_string()),
                TokenKind::Str("raw\\n".to_string()),
                TokenKind::Bool(true),
                TokenKind::Field("host".to_string()),
                TokenKind::LeftParen,
                TokenKind::Ident("g".to_string()),
                TokenKind::RightParen,
                TokenKind::Pipe,
                TokenKind::Ident("h".to_string()),
                TokenKind::Close,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_trim_markers() {
        assert_eq!(
            kinds("a  \n{{- f -}}\n  b"),
            vec![
                TokenKind::Text("a".to_string()),
                TokenKind::Open,
                TokenKind::Ident("f".to_string()),
                TokenKind::Close,
                TokenKind::Text("b".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_negative_number_is_not_a_trim_marker() {
        assert_eq!(
            kinds("{{-3}}"),
            vec![
                TokenKind::Open,
                TokenKind::Int(-3),
                TokenKind::Close,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_comment_is_dropped() {
        assert_eq!(
            kinds("a {{/* note\n spanning lines */}} b"),
            vec![
                TokenKind::Text("a ".to_string()),
                TokenKind::Text(" b".to_string()),
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            kinds("a {{- /* note */ -}} b"),
            vec![
                TokenKind::Text("a".to_string()),
                TokenKind::Text("b".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unclosed_action_position() {
        let err = tokenize("ok\nx {{ rand_int 1").unwrap_err();
        assert_eq!((err.line, err.column), (2, 3));
        assert_eq!(err.message, "unclosed action");
    }

    #[test]
    fn test_lexical_errors() {
        for (src, message) in [
            ("{{ \"open }}", "unterminated quoted string"),
            ("{{ `open }}", "unterminated raw quoted string"),
            ("{{ 12ab }}", "bad number syntax: \"12ab\""),
            ("{{ 99999999999999999999 }}", "number out of range: 99999999999999999999"),
            ("{{ . }}", "bare \".\" is not supported; use .name"),
            ("{{ .a.b }}", "nested field access is not supported"),
            ("{{ $x }}", "variables are not supported"),
            ("{{ if .a }}", "control keyword \"if\" is not supported"),
            ("{{ nil }}", "nil is not a command"),
            ("{{ # }}", "unexpected '#' in action"),
            ("{{/* open", "unclosed comment"),
            ("{{/* c */ f }}", "comment ends before closing delimiter"),
            (r#"{{ "\q" }}"#, "unknown escape sequence: \\q"),
        ] {
            let err = tokenize(src).unwrap_err();
            assert_eq!(err.message, message, "for source {src:?}");
        }
    }

    #[test]
    fn test_number_forms() {
        for (src, value) in [
            ("{{ 0x1F }}", 31),
            ("{{ -0X1f }}", -31),
            ("{{ 0o17 }}", 15),
            ("{{ 017 }}", 15),
            ("{{ 0b101 }}", 5),
            ("{{ 1_000_000 }}", 1_000_000),
            ("{{ 0x_FF_FF }}", 0xFFFF),
            ("{{ 0 }}", 0),
            ("{{ 'a' }}", 97),
            ("{{ '\\n' }}", 10),
            ("{{ 'é' }}", 233),
        ] {
            assert_eq!(
                kinds(src),
                vec![TokenKind::Open, TokenKind::Int(value), TokenKind::Close, TokenKind::Eof],
                "for source {src:?}"
            );
        }
        assert_eq!(kinds("{{ 1_0.2_5 }}")[1], TokenKind::Float(10.25));
    }

    #[test]
    fn test_bad_number_forms() {
        for (src, message) in [
            ("{{ 0x }}", "bad number syntax: \"0x\""),
            ("{{ 0xZZ }}", "bad number syntax: \"0xZZ\""),
            ("{{ 089 }}", "bad number syntax: \"089\""),
            ("{{ 1__0 }}", "bad number syntax: \"1__0\""),
            ("{{ 10_ }}", "bad number syntax: \"10_\""),
            ("{{ 1_.5 }}", "bad number syntax: \"1_.5\""),
            ("{{ 0x8000000000000000 }}", "number out of range: 0x8000000000000000"),
            ("{{ '' }}", "empty character constant"),
            ("{{ 'ab' }}", "unterminated character constant"),
            ("{{ 'a }}", "unterminated character constant"),
        ] {
            let err = tokenize(src).unwrap_err();
            assert_eq!(err.message, message, "for source {src:?}");
        }
    }

    #[test]
    fn test_position_counts_characters() {
        assert_eq!(position("äb\ncd", 0), (1, 1));
        assert_eq!(position("äb\ncd", 3), (1, 3));
        assert_eq!(position("äb\ncd", 5), (2, 2));
    }
}
