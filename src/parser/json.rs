//! A minimal recursive-descent JSON parser producing [`TreeNode`]s
//! directly, rather than going through an intermediate `serde_json::Value`
//! and converting -- grounded in the shape of `graphtage`'s own
//! `build_tree` free functions, a small hand-written descent that builds
//! the final tree in one pass. JSON objects become `Mapping` nodes
//! (key edits allowed, since JSON has no schema distinguishing "this key
//! is fixed"); arrays become `List` nodes.

use std::rc::Rc;

use crate::tree::{KeyValuePairNode, ListNode, MappingNode, OrderedFloat, StringNode, TreeNode};

pub fn parse_json(input: &str) -> Result<TreeNode, String> {
    let mut p = JsonParser {
        chars: input.chars().collect(),
        pos: 0,
    };
    p.skip_whitespace();
    let value = p.parse_value()?;
    p.skip_whitespace();
    if p.pos != p.chars.len() {
        return Err(format!("trailing content at offset {}", p.pos));
    }
    Ok(value)
}

struct JsonParser {
    chars: Vec<char>,
    pos: usize,
}

impl JsonParser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, c: char) -> Result<(), String> {
        match self.bump() {
            Some(found) if found == c => Ok(()),
            Some(found) => Err(format!("expected '{c}' at offset {}, found '{found}'", self.pos - 1)),
            None => Err(format!("expected '{c}' but reached end of input")),
        }
    }

    fn expect_literal(&mut self, literal: &str) -> Result<(), String> {
        for expected in literal.chars() {
            self.expect(expected)?;
        }
        Ok(())
    }

    fn parse_value(&mut self) -> Result<TreeNode, String> {
        self.skip_whitespace();
        match self.peek() {
            Some('{') => self.parse_object(),
            Some('[') => self.parse_array(),
            Some('"') => self.parse_string().map(|value| TreeNode::String(StringNode { value, quoted: true })),
            Some('t') => {
                self.expect_literal("true")?;
                Ok(TreeNode::Bool(true))
            }
            Some('f') => {
                self.expect_literal("false")?;
                Ok(TreeNode::Bool(false))
            }
            Some('n') => {
                self.expect_literal("null")?;
                Ok(TreeNode::Null)
            }
            Some(c) if c == '-' || c.is_ascii_digit() => self.parse_number(),
            Some(c) => Err(format!("unexpected character '{c}' at offset {}", self.pos)),
            None => Err("unexpected end of input while parsing a value".to_string()),
        }
    }

    fn parse_object(&mut self) -> Result<TreeNode, String> {
        self.expect('{')?;
        self.skip_whitespace();
        let mut pairs = Vec::new();
        if self.peek() == Some('}') {
            self.bump();
            return Ok(TreeNode::Mapping(MappingNode::new(pairs).map_err(|e| e.to_string())?));
        }
        loop {
            self.skip_whitespace();
            let key = self.parse_string()?;
            self.skip_whitespace();
            self.expect(':')?;
            let value = self.parse_value()?;
            pairs.push(KeyValuePairNode::new(
                Rc::new(TreeNode::String(StringNode { value: key, quoted: true })),
                Rc::new(value),
            ));
            self.skip_whitespace();
            match self.bump() {
                Some(',') => continue,
                Some('}') => break,
                Some(c) => return Err(format!("expected ',' or '}}' at offset {}, found '{c}'", self.pos - 1)),
                None => return Err("unexpected end of input inside an object".to_string()),
            }
        }
        Ok(TreeNode::Mapping(MappingNode::new(pairs).map_err(|e| e.to_string())?))
    }

    fn parse_array(&mut self) -> Result<TreeNode, String> {
        self.expect('[')?;
        self.skip_whitespace();
        let mut items = Vec::new();
        if self.peek() == Some(']') {
            self.bump();
            return Ok(TreeNode::List(ListNode::new(items)));
        }
        loop {
            let value = self.parse_value()?;
            items.push(Rc::new(value));
            self.skip_whitespace();
            match self.bump() {
                Some(',') => continue,
                Some(']') => break,
                Some(c) => return Err(format!("expected ',' or ']' at offset {}, found '{c}'", self.pos - 1)),
                None => return Err("unexpected end of input inside an array".to_string()),
            }
        }
        Ok(TreeNode::List(ListNode::new(items)))
    }

    fn parse_string(&mut self) -> Result<String, String> {
        self.expect('"')?;
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('"') => break,
                Some('\\') => match self.bump() {
                    Some('"') => out.push('"'),
                    Some('\\') => out.push('\\'),
                    Some('/') => out.push('/'),
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some('b') => out.push('\u{8}'),
                    Some('f') => out.push('\u{c}'),
                    Some('u') => {
                        let code = self.parse_hex4()?;
                        out.push(char::from_u32(code).unwrap_or('\u{fffd}'));
                    }
                    Some(c) => return Err(format!("invalid escape sequence '\\{c}'")),
                    None => return Err("unexpected end of input inside a string escape".to_string()),
                },
                Some(c) => out.push(c),
                None => return Err("unexpected end of input inside a string".to_string()),
            }
        }
        Ok(out)
    }

    fn parse_hex4(&mut self) -> Result<u32, String> {
        let mut code = 0u32;
        for _ in 0..4 {
            let digit = self
                .bump()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| "invalid \\u escape".to_string())?;
            code = code * 16 + digit;
        }
        Ok(code)
    }

    fn parse_number(&mut self) -> Result<TreeNode, String> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.bump();
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.bump();
        }
        let mut is_float = false;
        if self.peek() == Some('.') {
            is_float = true;
            self.bump();
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.bump();
            }
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            is_float = true;
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.bump();
            }
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        if is_float {
            let value: f64 = text.parse().map_err(|_| format!("invalid number literal '{text}'"))?;
            Ok(TreeNode::Float(OrderedFloat::new(value).map_err(|e| e.to_string())?))
        } else {
            let value: i64 = text.parse().map_err(|_| format!("invalid number literal '{text}'"))?;
            Ok(TreeNode::Integer(value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scalars() {
        assert_eq!(parse_json("42").unwrap(), TreeNode::Integer(42));
        assert_eq!(parse_json("true").unwrap(), TreeNode::Bool(true));
        assert_eq!(parse_json("null").unwrap(), TreeNode::Null);
    }

    #[test]
    fn parses_nested_structure() {
        let tree = parse_json(r#"{"test":"foo","baz":1}"#).unwrap();
        let TreeNode::Mapping(m) = tree else {
            panic!("expected a mapping");
        };
        assert_eq!(m.pairs.len(), 2);
    }

    #[test]
    fn parses_arrays_of_mixed_scalars() {
        let tree = parse_json("[0,1,2,3,4,5]").unwrap();
        let TreeNode::List(l) = tree else {
            panic!("expected a list");
        };
        assert_eq!(l.items.len(), 6);
    }

    #[test]
    fn rejects_trailing_garbage() {
        assert!(parse_json("1 2").is_err());
    }

    #[test]
    fn rejects_duplicate_object_keys() {
        assert!(parse_json(r#"{"a":1,"a":2}"#).is_err());
    }

    #[test]
    fn unescapes_basic_string_escapes() {
        let tree = parse_json(r#""a\nb""#).unwrap();
        let TreeNode::String(s) = tree else {
            panic!("expected a string");
        };
        assert_eq!(s.value, "a\nb");
    }
}
