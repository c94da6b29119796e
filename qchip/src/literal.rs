//! A small parser and writer for Python-style list/dict literals.
//!
//! Grammar:
//!
//! ```text
//! value := list | dict | string | number | word
//! list  := '[' (value (',' value)* ','?)? ']'
//! dict  := '{' (string ':' value (',' string ':' value)* ','?)? '}'
//! word  := True | False | None | true | false | null
//! ```
//!
//! Strings may use either quote character and understand backslash escapes.

use crate::geometry::limits::{MAX_IMPORT_LEN, MAX_LITERAL_DEPTH};
use std::fmt::Write as _;

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Str(String),
    /// Numeric literal, kept as written.
    Num(String),
    Word(String),
    List(Vec<Literal>),
    Dict(Vec<(String, Literal)>),
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LiteralError {
    #[error("unexpected end of input")]
    Eof,
    #[error("unexpected character '{ch}' at offset {pos}")]
    Unexpected { ch: char, pos: usize },
    #[error("unterminated string starting at offset {0}")]
    Unterminated(usize),
    #[error("invalid number '{text}' at offset {pos}")]
    BadNumber { text: String, pos: usize },
    #[error("unknown word '{text}' at offset {pos}")]
    BadWord { text: String, pos: usize },
    #[error("trailing input at offset {0}")]
    Trailing(usize),
    #[error("nesting deeper than {0}")]
    TooDeep(usize),
    #[error("input longer than {0} bytes")]
    TooLong(usize),
}

const WORDS: [&str; 6] = ["True", "False", "None", "true", "false", "null"];

#[derive(Clone, Debug, PartialEq)]
enum Tok {
    Open(char),
    Close(char),
    Comma,
    Colon,
    Str(String),
    Num(String),
    Word(String),
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Lexer { src, pos: 0 }
    }

    fn peek_char(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek_char() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    /// Returns the next token with its starting offset.
    fn next(&mut self) -> Result<Option<(Tok, usize)>, LiteralError> {
        self.skip_ws();
        let start = self.pos;
        let Some(c) = self.peek_char() else { return Ok(None) };
        let tok = match c {
            '[' | '{' => {
                self.pos += 1;
                Tok::Open(c)
            }
            ']' | '}' => {
                self.pos += 1;
                Tok::Close(c)
            }
            ',' => {
                self.pos += 1;
                Tok::Comma
            }
            ':' => {
                self.pos += 1;
                Tok::Colon
            }
            '"' | '\'' => Tok::Str(self.string(c)?),
            '-' | '+' | '.' | '0'..='9' => Tok::Num(self.number()?),
            c if c.is_ascii_alphabetic() => {
                let text = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_');
                if !WORDS.contains(&text) {
                    return Err(LiteralError::BadWord { text: text.to_string(), pos: start });
                }
                Tok::Word(text.to_string())
            }
            ch => return Err(LiteralError::Unexpected { ch, pos: start }),
        };
        Ok(Some((tok, start)))
    }

    fn take_while(&mut self, f: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if !f(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        &self.src[start..self.pos]
    }

    fn string(&mut self, quote: char) -> Result<String, LiteralError> {
        let start = self.pos;
        self.pos += 1;
        let mut out = String::new();
        let src = self.src;
        let mut chars = src[self.pos..].char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                c if c == quote => {
                    self.pos += i + 1;
                    return Ok(out);
                }
                '\\' => {
                    let Some((_, e)) = chars.next() else { break };
                    match e {
                        'n' => out.push('\n'),
                        't' => out.push('\t'),
                        'r' => out.push('\r'),
                        '0' => out.push('\0'),
                        '\\' | '\'' | '"' => out.push(e),
                        // Python keeps unknown escapes verbatim
                        other => {
                            out.push('\\');
                            out.push(other);
                        }
                    }
                }
                c => out.push(c),
            }
        }
        Err(LiteralError::Unterminated(start))
    }

    fn number(&mut self) -> Result<String, LiteralError> {
        let start = self.pos;
        let text = self.take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.' | '_'));
        if is_number(text) {
            Ok(text.to_string())
        } else {
            Err(LiteralError::BadNumber { text: text.to_string(), pos: start })
        }
    }
}

/// Decimal integer or float: sign, digits, optional fraction and exponent.
pub fn is_number(text: &str) -> bool {
    let b = text.as_bytes();
    let mut i = 0;
    if i < b.len() && (b[i] == b'+' || b[i] == b'-') {
        i += 1;
    }
    let int_start = i;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;
    if i < b.len() && b[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        digits += i - frac_start;
    }
    if digits == 0 {
        return false;
    }
    if i < b.len() && (b[i] == b'e' || b[i] == b'E') {
        i += 1;
        if i < b.len() && (b[i] == b'+' || b[i] == b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }
    i == b.len()
}

struct Parser<'a> {
    lex: Lexer<'a>,
    peeked: Option<(Tok, usize)>,
}

impl<'a> Parser<'a> {
    fn bump(&mut self) -> Result<(Tok, usize), LiteralError> {
        if let Some(t) = self.peeked.take() {
            return Ok(t);
        }
        self.lex.next()?.ok_or(LiteralError::Eof)
    }

    fn peek(&mut self) -> Result<Option<&Tok>, LiteralError> {
        if self.peeked.is_none() {
            self.peeked = self.lex.next()?;
        }
        Ok(self.peeked.as_ref().map(|(t, _)| t))
    }

    fn unexpected(&self, pos: usize) -> LiteralError {
        match self.lex.src[pos..].chars().next() {
            Some(ch) => LiteralError::Unexpected { ch, pos },
            None => LiteralError::Eof,
        }
    }

    fn value(&mut self, depth: usize) -> Result<Literal, LiteralError> {
        if depth > MAX_LITERAL_DEPTH {
            return Err(LiteralError::TooDeep(MAX_LITERAL_DEPTH));
        }
        let (tok, pos) = self.bump()?;
        match tok {
            Tok::Str(s) => Ok(Literal::Str(s)),
            Tok::Num(n) => Ok(Literal::Num(n)),
            Tok::Word(w) => Ok(Literal::Word(w)),
            Tok::Open('[') => {
                let mut items = Vec::new();
                loop {
                    let closing = matches!(self.peek()?, Some(Tok::Close(']')));
                    if closing {
                        self.bump()?;
                        return Ok(Literal::List(items));
                    }
                    items.push(self.value(depth + 1)?);
                    let (sep, at) = self.bump()?;
                    match sep {
                        Tok::Comma => {}
                        Tok::Close(']') => return Ok(Literal::List(items)),
                        _ => return Err(self.unexpected(at)),
                    }
                }
            }
            Tok::Open(_) => {
                let mut entries = Vec::new();
                loop {
                    let (key, at) = self.bump()?;
                    let key = match key {
                        Tok::Close('}') => return Ok(Literal::Dict(entries)),
                        Tok::Str(k) => k,
                        _ => return Err(self.unexpected(at)),
                    };
                    let (colon, at) = self.bump()?;
                    if colon != Tok::Colon {
                        return Err(self.unexpected(at));
                    }
                    entries.push((key, self.value(depth + 1)?));
                    let (sep, at) = self.bump()?;
                    match sep {
                        Tok::Comma => {}
                        Tok::Close('}') => return Ok(Literal::Dict(entries)),
                        _ => return Err(self.unexpected(at)),
                    }
                }
            }
            _ => Err(self.unexpected(pos)),
        }
    }
}

pub fn parse(src: &str) -> Result<Literal, LiteralError> {
    if src.len() > MAX_IMPORT_LEN {
        return Err(LiteralError::TooLong(MAX_IMPORT_LEN));
    }
    let mut p = Parser { lex: Lexer::new(src), peeked: None };
    let v = p.value(0)?;
    match p.bump() {
        Err(LiteralError::Eof) => Ok(v),
        Ok((_, pos)) => Err(LiteralError::Trailing(pos)),
        Err(e) => Err(e),
    }
}

/// Double-quoted literal string with escapes.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

impl Literal {
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    fn render_into(&self, out: &mut String) {
        match self {
            Literal::Str(s) => out.push_str(&quote(s)),
            Literal::Num(n) | Literal::Word(n) => out.push_str(n),
            Literal::List(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    item.render_into(out);
                }
                out.push(']');
            }
            Literal::Dict(entries) => {
                out.push('{');
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    let _ = write!(out, "{}: ", quote(k));
                    v.render_into(out);
                }
                out.push('}');
            }
        }
    }

    /// Text stored as an element attribute: strings as-is, anything else as
    /// its literal source.
    pub fn into_attribute_text(self) -> String {
        match self {
            Literal::Str(s) => s,
            other => other.render(),
        }
    }
}

/// Renders a stored attribute for export. Text that is already a canonical
/// non-string literal (`5`, `-1e3`, `True`, `[1, 2]`) is emitted bare so it
/// reads back as the same text; anything else is quoted.
pub fn render_attribute(text: &str) -> String {
    match parse(text) {
        Ok(Literal::Str(_)) | Err(_) => quote(text),
        Ok(v) if v.render() == text => text.to_string(),
        Ok(_) => quote(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Literal {
        Literal::Str(v.to_string())
    }

    #[test]
    fn parses_flat_and_nested_lists() {
        assert_eq!(parse("[]").unwrap(), Literal::List(vec![]));
        assert_eq!(parse(" ['Q01', \"Q02\" ,] ").unwrap(), Literal::List(vec![s("Q01"), s("Q02")]));
        let nested = parse("[[\"Q01\"], []]").unwrap();
        assert_eq!(nested, Literal::List(vec![Literal::List(vec![s("Q01")]), Literal::List(vec![])]));
    }

    #[test]
    fn parses_dicts_with_mixed_values() {
        let v = parse("{'Q01': 5, \"Q02\": 'foo', 'Q03': -1.5e-3, 'Q04': None, 'Q05': [1, 2]}").unwrap();
        let Literal::Dict(entries) = v else { panic!("not a dict") };
        assert_eq!(entries[0], ("Q01".to_string(), Literal::Num("5".to_string())));
        assert_eq!(entries[1], ("Q02".to_string(), s("foo")));
        assert_eq!(entries[2].1, Literal::Num("-1.5e-3".to_string()));
        assert_eq!(entries[3].1, Literal::Word("None".to_string()));
        assert_eq!(entries[4].1.render(), "[1, 2]");
    }

    #[test]
    fn apostrophes_survive_inside_double_quotes() {
        let v = parse(r#"{"Q01": "it's", 'Q02': 'say \'hi\''}"#).unwrap();
        let Literal::Dict(entries) = v else { panic!("not a dict") };
        assert_eq!(entries[0].1, s("it's"));
        assert_eq!(entries[1].1, s("say 'hi'"));
    }

    #[test]
    fn reports_malformed_input() {
        assert_eq!(parse(""), Err(LiteralError::Eof));
        assert_eq!(parse("[\"Q01\""), Err(LiteralError::Eof));
        assert_eq!(parse("['Q01]"), Err(LiteralError::Unterminated(1)));
        assert_eq!(parse("[1 2]"), Err(LiteralError::Unexpected { ch: '2', pos: 3 }));
        assert_eq!(parse("{1: 2}"), Err(LiteralError::Unexpected { ch: '1', pos: 1 }));
        assert_eq!(parse("[] []"), Err(LiteralError::Trailing(3)));
        assert!(matches!(parse("[nope]"), Err(LiteralError::BadWord { .. })));
        assert!(matches!(parse("[1.2.3]"), Err(LiteralError::BadNumber { .. })));
        assert_eq!(parse(&"[".repeat(64)), Err(LiteralError::TooDeep(MAX_LITERAL_DEPTH)));
    }

    #[test]
    fn number_shapes() {
        for ok in ["0", "-3", "+2.5", ".5", "5.", "1e9", "2.5E-3"] {
            assert!(is_number(ok), "{}", ok);
        }
        for bad in ["", "-", ".", "1e", "1x", "--1", "1.2.3"] {
            assert!(!is_number(bad), "{}", bad);
        }
    }

    #[test]
    fn quoting_escapes() {
        assert_eq!(quote("a\"b\\c"), r#""a\"b\\c""#);
        assert_eq!(parse(&quote("it's \"x\"\n")).unwrap(), s("it's \"x\"\n"));
    }

    #[test]
    fn attribute_rendering() {
        assert_eq!(render_attribute("5"), "5");
        assert_eq!(render_attribute("-0.25"), "-0.25");
        assert_eq!(render_attribute(" 0.25 "), "\" 0.25 \"");
        assert_eq!(render_attribute("[1,2]"), "\"[1,2]\"");
        assert_eq!(render_attribute("True"), "True");
        assert_eq!(render_attribute("[1, 2]"), "[1, 2]");
        assert_eq!(render_attribute("foo"), "\"foo\"");
        assert_eq!(render_attribute("'foo'"), "\"'foo'\"");
        assert_eq!(render_attribute("it's"), "\"it's\"");
    }
}
