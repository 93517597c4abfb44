//! Recursive-descent decoding of JSON text
//!
//! Grammar, with insignificant whitespace between tokens:
//!
//! ```text
//! value  := array | string | number | object | true | false | null
//! object := '{' (string ':' value (',' string ':' value)*)? '}'
//! array  := '[' (value (',' value)*)? ']'
//! number := '-'? digit+ ('.' digit*)? ([eE] [+-]? digit+)?
//! ```
//!
//! A number with neither fraction nor exponent is an integer; `10.` is a float.

use std::collections::hash_map::Entry;

use crate::{Array, Object, ParseError, Value};

/// Arrays and objects nested deeper than this are rejected.
pub const MAX_DEPTH: usize = 512;

const SURROGATE_HIGH: std::ops::Range<u32> = 0xD800..0xDC00;
const SURROGATE_LOW: std::ops::Range<u32> = 0xDC00..0xE000;

/// Decodes one complete JSON value; only whitespace may follow it.
pub fn parse<T: AsRef<[u8]>>(input: T) -> Result<Value, ParseError> {
    let mut parser = Parser::new(input.as_ref());
    let value = parser.parse_value()?;

    parser.skip_whitespace();
    if parser.pos < parser.input.len() {
        return Err(ParseError::TrailingCharacters { offset: parser.pos });
    }

    Ok(value)
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0, depth: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn bump(&mut self) -> Result<u8, ParseError> {
        let byte = self.peek().ok_or(ParseError::UnexpectedEof { offset: self.pos })?;
        self.pos += 1;
        Ok(byte)
    }

    /// `byte` is the one at the current position; a non-ASCII lead byte is reported as
    /// the whole character it starts, or U+FFFD when it starts no valid UTF-8 sequence.
    fn unexpected(&self, byte: u8) -> ParseError {
        let found = if byte.is_ascii() {
            char::from(byte)
        } else {
            self.input[self.pos..]
                .utf8_chunks()
                .next()
                .and_then(|chunk| chunk.valid().chars().next())
                .unwrap_or(char::REPLACEMENT_CHARACTER)
        };
        ParseError::UnexpectedCharacter { offset: self.pos, found }
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r' | b'\x0B' | b'\x0C') = self.peek() {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: u8) -> Result<(), ParseError> {
        match self.peek() {
            Some(byte) if byte == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(byte) => Err(self.unexpected(byte)),
            None => Err(ParseError::UnexpectedEof { offset: self.pos }),
        }
    }

    fn parse_value(&mut self) -> Result<Value, ParseError> {
        self.skip_whitespace();
        match self.peek() {
            Some(b'[') => self.nested(Self::parse_array),
            Some(b'{') => self.nested(Self::parse_object),
            Some(b'"') => self.parse_string().map(Value::String),
            Some(b't') => self.parse_literal(b"true", Value::Bool(true)),
            Some(b'f') => self.parse_literal(b"false", Value::Bool(false)),
            Some(b'n') => self.parse_literal(b"null", Value::Null),
            Some(b'-' | b'0'..=b'9') => self.parse_number(),
            Some(byte) => Err(self.unexpected(byte)),
            None => Err(ParseError::UnexpectedEof { offset: self.pos }),
        }
    }

    fn nested(&mut self, parse: fn(&mut Self) -> Result<Value, ParseError>) -> Result<Value, ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::TooDeep { offset: self.pos, max_depth: MAX_DEPTH });
        }

        self.depth += 1;
        let value = parse(self);
        self.depth -= 1;
        value
    }

    fn parse_array(&mut self) -> Result<Value, ParseError> {
        self.expect(b'[')?;
        let mut array = Array::new();

        self.skip_whitespace();
        if self.peek() == Some(b']') {
            self.pos += 1;
            return Ok(Value::Array(array));
        }

        loop {
            array.push(self.parse_value()?);

            self.skip_whitespace();
            match self.bump()? {
                b',' => {}
                b']' => return Ok(Value::Array(array)),
                byte => {
                    self.pos -= 1;
                    return Err(self.unexpected(byte));
                }
            }
        }
    }

    fn parse_object(&mut self) -> Result<Value, ParseError> {
        self.expect(b'{')?;
        let mut object = Object::new();

        self.skip_whitespace();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            return Ok(Value::Object(object));
        }

        loop {
            self.skip_whitespace();
            let key = self.parse_string()?;

            self.skip_whitespace();
            self.expect(b':')?;
            let value = self.parse_value()?;

            // first occurrence of a key wins
            if let Entry::Vacant(entry) = object.entry(key) {
                entry.insert(value);
            }

            self.skip_whitespace();
            match self.bump()? {
                b',' => {}
                b'}' => return Ok(Value::Object(object)),
                byte => {
                    self.pos -= 1;
                    return Err(self.unexpected(byte));
                }
            }
        }
    }

    fn parse_literal(&mut self, literal: &[u8], value: Value) -> Result<Value, ParseError> {
        let end = self.pos + literal.len();
        match self.input.get(self.pos..end) {
            Some(bytes) if bytes == literal => {
                self.pos = end;
                Ok(value)
            }
            _ => {
                let mismatch = literal.iter().zip(&self.input[self.pos..]).take_while(|(expected, found)| expected == found).count();
                self.pos += mismatch;
                match self.peek() {
                    Some(byte) => Err(self.unexpected(byte)),
                    None => Err(ParseError::UnexpectedEof { offset: self.pos }),
                }
            }
        }
    }

    fn skip_digits(&mut self) -> usize {
        let start = self.pos;
        while let Some(b'0'..=b'9') = self.peek() {
            self.pos += 1;
        }
        self.pos - start
    }

    fn parse_number(&mut self) -> Result<Value, ParseError> {
        let start = self.pos;
        let invalid = ParseError::InvalidNumber { offset: start };

        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        if self.skip_digits() == 0 {
            return Err(invalid);
        }

        let mut is_float = false;
        if self.peek() == Some(b'.') {
            is_float = true;
            self.pos += 1;
            self.skip_digits();
        }
        if let Some(b'e' | b'E') = self.peek() {
            is_float = true;
            self.pos += 1;
            if let Some(b'+' | b'-') = self.peek() {
                self.pos += 1;
            }
            if self.skip_digits() == 0 {
                return Err(invalid);
            }
        }

        let text = std::str::from_utf8(&self.input[start..self.pos]).map_err(|_utf8| invalid.clone())?;
        if !is_float && let Ok(integer) = text.parse::<i64>() {
            return Ok(Value::Integer(integer));
        }

        // integers beyond i64 end up here as well
        text.parse::<f64>().map(Value::Float).map_err(|_float| invalid)
    }

    /// Decodes a quoted string, the opening quote being the current byte.
    fn parse_string(&mut self) -> Result<String, ParseError> {
        self.expect(b'"')?;
        let mut decoded = Vec::new();

        loop {
            let run_start = self.pos;
            while let Some(byte) = self.peek() {
                if matches!(byte, b'"' | b'\\' | b'&') {
                    break;
                }
                self.pos += 1;
            }

            let run = &self.input[run_start..self.pos];
            std::str::from_utf8(run).map_err(|e| ParseError::InvalidUtf8 { offset: run_start + e.valid_up_to() })?;
            decoded.extend_from_slice(run);

            match self.bump()? {
                b'"' => break,
                b'\\' => self.parse_escape(&mut decoded)?,
                _ => self.parse_entity(&mut decoded),
            }
        }

        // every run was validated and every escape pushed a whole code point
        String::from_utf8(decoded).map_err(|e| ParseError::InvalidUtf8 { offset: e.utf8_error().valid_up_to() })
    }

    /// Called with the backslash already consumed.
    fn parse_escape(&mut self, decoded: &mut Vec<u8>) -> Result<(), ParseError> {
        let offset = self.pos - 1;
        let byte = match self.bump()? {
            b'"' => b'"',
            b'\\' => b'\\',
            b'/' => b'/',
            b'b' => b'\x08',
            b'f' => b'\x0C',
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            b'u' => {
                let code_point = self.parse_code_point(offset)?;
                let mut utf8 = [0u8; 4];
                decoded.extend_from_slice(code_point.encode_utf8(&mut utf8).as_bytes());
                return Ok(());
            }
            _ => return Err(ParseError::InvalidEscape { offset }),
        };

        decoded.push(byte);
        Ok(())
    }

    /// Reads the hex digits after `\u`, combining a surrogate pair when one starts here.
    fn parse_code_point(&mut self, offset: usize) -> Result<char, ParseError> {
        let first = self.parse_hex4(offset)?;

        let code_point = if SURROGATE_HIGH.contains(&first) {
            if self.input.get(self.pos..self.pos + 2) != Some(b"\\u") {
                return Err(ParseError::InvalidCodePoint { offset });
            }
            self.pos += 2;

            let second = self.parse_hex4(self.pos - 2)?;
            if !SURROGATE_LOW.contains(&second) {
                return Err(ParseError::InvalidCodePoint { offset });
            }
            0x10000 + (first - SURROGATE_HIGH.start) * 0x400 + (second - SURROGATE_LOW.start)
        } else if SURROGATE_LOW.contains(&first) {
            return Err(ParseError::InvalidCodePoint { offset });
        } else {
            first
        };

        char::from_u32(code_point).ok_or(ParseError::InvalidCodePoint { offset })
    }

    fn parse_hex4(&mut self, offset: usize) -> Result<u32, ParseError> {
        let mut value = 0;
        for _ in 0..4 {
            let digit = match self.bump()? {
                byte @ b'0'..=b'9' => byte - b'0',
                byte @ b'a'..=b'f' => byte - b'a' + 10,
                byte @ b'A'..=b'F' => byte - b'A' + 10,
                _ => return Err(ParseError::InvalidEscape { offset }),
            };
            value = value * 16 + u32::from(digit);
        }
        Ok(value)
    }

    /// Called with the `&` already consumed; a `&` that starts no known entity stays as is.
    fn parse_entity(&mut self, decoded: &mut Vec<u8>) {
        let rest = &self.input[self.pos..];
        let (replacement, consumed) = if rest.starts_with(b"gt;") {
            (b'>', 3)
        } else if rest.starts_with(b"lt;") {
            (b'<', 3)
        } else if rest.starts_with(b"amp;") {
            (b'&', 4)
        } else {
            (b'&', 0)
        };

        decoded.push(replacement);
        self.pos += consumed;
    }
}
