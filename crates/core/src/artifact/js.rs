// crates/core/src/artifact/js.rs
//! Parser for the one statement a published `config.js` contains:
//!
//! ```text
//! window.NAME = { KEY: "value", ... };
//! window.NAME = Object.freeze({ ... });
//! ```
//!
//! Accepts `//` and `/* */` comments, bare or quoted keys, single or double
//! quoted strings and trailing commas. Anything else is a syntax error.

use serde_json::{Map, Value};

use crate::error::ArtifactError;

const MAX_DEPTH: usize = 32;

/// Global objects a config may be attached to.
const GLOBAL_OBJECTS: &[&str] = &["window", "globalThis", "self"];

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Assignment {
    pub target: String,
    pub value: Value,
}

pub(crate) fn parse_assignment(src: &str) -> Result<Assignment, ArtifactError> {
    let mut p = Parser::new(src);
    p.skip_trivia()?;

    let root = p.ident()?;
    if !GLOBAL_OBJECTS.contains(&root.as_str()) {
        return Err(p.error(format!(
            "expected assignment to window, found {root:?}"
        )));
    }
    p.expect('.')?;
    let target = p.ident()?;
    p.expect('=')?;

    let value = if p.peek_ident("Object") {
        p.ident()?;
        p.expect('.')?;
        let method = p.ident()?;
        if method != "freeze" {
            return Err(p.error(format!("unsupported call Object.{method}")));
        }
        p.expect('(')?;
        let value = p.object(0)?;
        p.expect(')')?;
        value
    } else {
        p.object(0)?
    };

    p.skip_trivia()?;
    if p.peek() == Some(';') {
        p.bump();
    }
    p.skip_trivia()?;
    if let Some(c) = p.peek() {
        return Err(p.error(format!("unexpected {c:?} after assignment")));
    }
    Ok(Assignment { target, value })
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(src: &str) -> Self {
        Self {
            chars: src.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> ArtifactError {
        let before = &self.chars[..self.pos.min(self.chars.len())];
        let line = before.iter().filter(|&&c| c == '\n').count() + 1;
        let column = before.iter().rev().take_while(|&&c| c != '\n').count() + 1;
        ArtifactError::Syntax {
            line,
            column,
            message: message.into(),
        }
    }

    fn skip_trivia(&mut self) -> Result<(), ArtifactError> {
        loop {
            match (self.peek(), self.peek_at(1)) {
                (Some(c), _) if c.is_whitespace() => {
                    self.pos += 1;
                }
                (Some('/'), Some('/')) => {
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                (Some('/'), Some('*')) => {
                    let start = self.pos;
                    self.pos += 2;
                    loop {
                        match (self.peek(), self.peek_at(1)) {
                            (Some('*'), Some('/')) => {
                                self.pos += 2;
                                break;
                            }
                            (Some(_), _) => self.pos += 1,
                            (None, _) => {
                                self.pos = start;
                                return Err(self.error("unterminated block comment"));
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn expect(&mut self, want: char) -> Result<(), ArtifactError> {
        self.skip_trivia()?;
        match self.peek() {
            Some(c) if c == want => {
                self.pos += 1;
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected {want:?}, found {c:?}"))),
            None => Err(self.error(format!("expected {want:?}, found end of input"))),
        }
    }

    fn peek_ident(&mut self, word: &str) -> bool {
        if self.skip_trivia().is_err() {
            return false;
        }
        let len = word.chars().count();
        let matches = word
            .chars()
            .enumerate()
            .all(|(i, c)| self.peek_at(i) == Some(c));
        matches && !self.peek_at(len).is_some_and(is_ident_continue)
    }

    fn ident(&mut self) -> Result<String, ArtifactError> {
        self.skip_trivia()?;
        match self.peek() {
            Some(c) if is_ident_start(c) => {}
            Some(c) => return Err(self.error(format!("expected identifier, found {c:?}"))),
            None => return Err(self.error("expected identifier, found end of input")),
        }
        let mut out = String::new();
        while let Some(c) = self.peek().filter(|&c| is_ident_continue(c)) {
            out.push(c);
            self.pos += 1;
        }
        Ok(out)
    }

    fn value(&mut self, depth: usize) -> Result<Value, ArtifactError> {
        if depth > MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        self.skip_trivia()?;
        match self.peek() {
            Some('{') => self.object(depth),
            Some('[') => self.array(depth),
            Some('"') | Some('\'') => self.string().map(Value::String),
            Some('`') => Err(self.error("template literals are not supported")),
            Some(c) if c == '-' || c.is_ascii_digit() => self.number(),
            Some(c) if is_ident_start(c) => {
                let word = self.ident()?;
                match word.as_str() {
                    "true" => Ok(Value::Bool(true)),
                    "false" => Ok(Value::Bool(false)),
                    "null" => Ok(Value::Null),
                    other => Err(self.error(format!("unsupported expression {other:?}"))),
                }
            }
            Some(c) => Err(self.error(format!("unexpected {c:?}"))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn object(&mut self, depth: usize) -> Result<Value, ArtifactError> {
        self.expect('{')?;
        let mut map = Map::new();
        loop {
            self.skip_trivia()?;
            if self.peek() == Some('}') {
                self.pos += 1;
                return Ok(Value::Object(map));
            }
            let key_pos = self.pos;
            let key = match self.peek() {
                Some('"') | Some('\'') => self.string()?,
                _ => self.ident()?,
            };
            self.expect(':')?;
            let value = self.value(depth + 1)?;
            if map.contains_key(&key) {
                self.pos = key_pos;
                return Err(self.error(format!("duplicate key {key:?}")));
            }
            map.insert(key, value);

            self.skip_trivia()?;
            match self.peek() {
                Some(',') => self.pos += 1,
                Some('}') => {}
                Some(c) => return Err(self.error(format!("expected ',' or '}}', found {c:?}"))),
                None => return Err(self.error("unterminated object")),
            }
        }
    }

    fn array(&mut self, depth: usize) -> Result<Value, ArtifactError> {
        self.expect('[')?;
        let mut items = Vec::new();
        loop {
            self.skip_trivia()?;
            if self.peek() == Some(']') {
                self.pos += 1;
                return Ok(Value::Array(items));
            }
            items.push(self.value(depth + 1)?);
            self.skip_trivia()?;
            match self.peek() {
                Some(',') => self.pos += 1,
                Some(']') => {}
                Some(c) => return Err(self.error(format!("expected ',' or ']', found {c:?}"))),
                None => return Err(self.error("unterminated array")),
            }
        }
    }

    fn number(&mut self) -> Result<Value, ArtifactError> {
        let start = self.pos;
        let mut literal = String::new();
        while let Some(c) = self
            .peek()
            .filter(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E'))
        {
            literal.push(c);
            self.pos += 1;
        }
        serde_json::from_str::<Value>(&literal)
            .ok()
            .filter(Value::is_number)
            .ok_or_else(|| {
                self.pos = start;
                self.error(format!("invalid number {literal:?}"))
            })
    }

    fn string(&mut self) -> Result<String, ArtifactError> {
        let start = self.pos;
        let quote = self.bump().unwrap_or('"');
        let mut out = String::new();
        loop {
            let Some(c) = self.bump() else {
                self.pos = start;
                return Err(self.error("unterminated string"));
            };
            match c {
                c if c == quote => return Ok(out),
                '\n' | '\r' => {
                    self.pos -= 1;
                    return Err(self.error("line break inside string"));
                }
                '\\' => {
                    let escaped = self.escape()?;
                    out.push(escaped);
                }
                c => out.push(c),
            }
        }
    }

    fn escape(&mut self) -> Result<char, ArtifactError> {
        let Some(c) = self.bump() else {
            return Err(self.error("unterminated escape"));
        };
        Ok(match c {
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'v' => '\u{b}',
            '0' => '\0',
            'u' => return self.unicode_escape(),
            '\\' | '\'' | '"' | '/' => c,
            other => return Err(self.error(format!("unsupported escape \\{other}"))),
        })
    }

    fn hex4(&mut self) -> Result<u32, ArtifactError> {
        let mut code = 0u32;
        for _ in 0..4 {
            let digit = self
                .bump()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| self.error("invalid \\u escape"))?;
            code = code * 16 + digit;
        }
        Ok(code)
    }

    fn unicode_escape(&mut self) -> Result<char, ArtifactError> {
        let high = self.hex4()?;
        let code = if (0xD800..0xDC00).contains(&high) {
            if self.bump() != Some('\\') || self.bump() != Some('u') {
                return Err(self.error("unpaired surrogate in \\u escape"));
            }
            let low = self.hex4()?;
            if !(0xDC00..0xE000).contains(&low) {
                return Err(self.error("unpaired surrogate in \\u escape"));
            }
            0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
        } else {
            high
        };
        char::from_u32(code).ok_or_else(|| self.error("invalid \\u escape"))
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_parses_hand_written_config() {
        let src = r#"// public config, shipped with the site
// never put an API key here
window.LOCAL_CONFIG = {
  // default to the Cloud Run chat service
  AI_PROVIDER: "adk",
  ADK_CHAT_URL: "https://my-agent-api-531513049365.us-central1.run.app/api/chat",
  ADK_PROVIDER: "vertex",
  ADK_MODEL: "gemini-2.5-flash",
};
"#;
        let parsed = parse_assignment(src).unwrap();
        assert_eq!(parsed.target, "LOCAL_CONFIG");
        assert_eq!(
            parsed.value,
            json!({
                "AI_PROVIDER": "adk",
                "ADK_CHAT_URL": "https://my-agent-api-531513049365.us-central1.run.app/api/chat",
                "ADK_PROVIDER": "vertex",
                "ADK_MODEL": "gemini-2.5-flash",
            })
        );
    }

    #[test]
    fn test_parses_frozen_form_and_quoted_keys() {
        let src = "globalThis.CFG = Object.freeze({ 'a': 'x\\'y', \"b\": [1, -2.5, true, null], c: {} })";
        let parsed = parse_assignment(src).unwrap();
        assert_eq!(parsed.target, "CFG");
        assert_eq!(
            parsed.value,
            json!({ "a": "x'y", "b": [1, -2.5, true, null], "c": {} })
        );
    }

    #[test]
    fn test_unicode_escapes() {
        let parsed = parse_assignment(r#"window.X = { a: "é😀" };"#).unwrap();
        assert_eq!(parsed.value, json!({ "a": "é😀" }));
        assert!(parse_assignment(r#"window.X = { a: "\ud83d" };"#).is_err());
    }

    #[test]
    fn test_rejects_duplicate_keys() {
        let err = parse_assignment("window.X = {\n  a: \"1\",\n  a: \"2\",\n};").unwrap_err();
        match err {
            ArtifactError::Syntax { line, column, message } => {
                assert_eq!((line, column), (3, 3));
                assert!(message.contains("duplicate key"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_code_and_trailing_statements() {
        assert!(parse_assignment("document.X = {};").is_err());
        assert!(parse_assignment("window.X = { a: fetch() };").is_err());
        assert!(parse_assignment("window.X = { a: `tpl` };").is_err());
        assert!(parse_assignment("window.X = {}; alert(1);").is_err());
        assert!(parse_assignment("window.X = Object.assign({}, {});").is_err());
        assert!(parse_assignment("window.X = { a: 'x' /* open").is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("window.X = {}{}{};", "{a:".repeat(40), "1", "}".repeat(40));
        assert!(parse_assignment(&deep).is_err());
    }
}
