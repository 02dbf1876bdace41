//! S-expression reader: turns source text into `Value` forms ready for
//! the evaluator. Char-vector scanning grounded in the teacher's
//! `axm::lexer::Lexer` (`current`/`peek`/`advance`, `Span::new(source_id,
//! start, self.pos)` per token), adapted from Axiom's curly/infix syntax
//! to Lisp's list/vector/map/set reader syntax (spec §1's GLOSSARY:
//! "the reader" is an external collaborator the core numeric tower and
//! registry sit behind).

use std::rc::Rc;

use dashu::integer::IBig;

use crate::core::collections::{PersistentList, PersistentMap, PersistentSet};
use crate::core::value::Value;
use crate::errors::{AxError, AxResult, Span};

pub struct Reader {
    input: Vec<char>,
    pos: usize,
    source_id: u32,
}

impl Reader {
    pub fn new(input: &str, source_id: u32) -> Self {
        Reader { input: input.chars().collect(), pos: 0, source_id }
    }

    fn current(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.input.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.current();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(self.source_id, start, self.pos)
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.current() {
                Some(ch) if ch.is_whitespace() || ch == ',' => {
                    self.advance();
                }
                Some(';') => {
                    while let Some(ch) = self.current() {
                        if ch == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    /// Reads every top-level form in the source (spec-adjacent: the
    /// evaluator needs a whole-program entry point, not just one form).
    pub fn read_all(&mut self) -> AxResult<Vec<Value>> {
        let mut forms = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            if self.current().is_none() {
                break;
            }
            forms.push(self.read_form()?);
        }
        Ok(forms)
    }

    pub fn read_one(&mut self) -> AxResult<Option<Value>> {
        self.skip_whitespace_and_comments();
        if self.current().is_none() {
            return Ok(None);
        }
        Ok(Some(self.read_form()?))
    }

    fn read_form(&mut self) -> AxResult<Value> {
        self.skip_whitespace_and_comments();
        let start = self.pos;
        match self.current() {
            None => Err(AxError::value("unexpected end of input").with_span(self.span_from(start))),
            Some('(') => self.read_list(),
            Some('[') => self.read_vector(),
            Some('{') => self.read_map(),
            Some('#') if self.peek(1) == Some('{') => self.read_set(),
            Some('\'') => {
                self.advance();
                self.read_wrapped("quote")
            }
            Some('`') => {
                self.advance();
                self.read_wrapped("quasiquote")
            }
            Some('~') if self.peek(1) == Some('@') => {
                self.advance();
                self.advance();
                self.read_wrapped("unquote-splice")
            }
            Some('~') => {
                self.advance();
                self.read_wrapped("unquote")
            }
            Some('"') => self.read_string(),
            Some(':') => self.read_keyword(),
            Some(ch) if ch.is_ascii_digit() => self.read_number(),
            Some('-') if self.peek(1).map_or(false, |c| c.is_ascii_digit()) => self.read_number(),
            Some(')') | Some(']') | Some('}') => {
                Err(AxError::value(format!("unexpected '{}'", self.current().unwrap()))
                    .with_span(self.span_from(start)))
            }
            Some(_) => self.read_symbol_or_literal(),
        }
    }

    fn read_wrapped(&mut self, sym: &str) -> AxResult<Value> {
        let inner = self.read_form()?;
        let items = vec![Value::symbol(sym), inner];
        Ok(Value::List(Rc::new(PersistentList::new(items))))
    }

    fn read_delimited(&mut self, close: char) -> AxResult<Vec<Value>> {
        self.advance(); // consume opener
        let mut items = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            match self.current() {
                None => return Err(AxError::value(format!("unterminated form, expected '{close}'"))),
                Some(c) if c == close => {
                    self.advance();
                    break;
                }
                _ => items.push(self.read_form()?),
            }
        }
        Ok(items)
    }

    fn read_list(&mut self) -> AxResult<Value> {
        let items = self.read_delimited(')')?;
        Ok(Value::List(Rc::new(PersistentList::new(items))))
    }

    fn read_vector(&mut self) -> AxResult<Value> {
        let items = self.read_delimited(']')?;
        Ok(Value::Vector(Rc::new(items)))
    }

    fn read_map(&mut self) -> AxResult<Value> {
        let items = self.read_delimited('}')?;
        if items.len() % 2 != 0 {
            return Err(AxError::value("map literal requires an even number of forms"));
        }
        let entries = items.chunks_exact(2).map(|pair| (pair[0].clone(), pair[1].clone())).collect();
        Ok(Value::Map(Rc::new(PersistentMap::new(entries))))
    }

    fn read_set(&mut self) -> AxResult<Value> {
        self.advance(); // consume '#'
        let items = self.read_delimited('}')?;
        Ok(Value::Set(Rc::new(PersistentSet::new(items))))
    }

    fn read_string(&mut self) -> AxResult<Value> {
        self.advance(); // consume opening quote
        let mut s = String::new();
        loop {
            match self.advance() {
                None => return Err(AxError::value("unterminated string literal")),
                Some('"') => break,
                Some('\\') => match self.advance() {
                    Some('n') => s.push('\n'),
                    Some('t') => s.push('\t'),
                    Some('r') => s.push('\r'),
                    Some('\\') => s.push('\\'),
                    Some('"') => s.push('"'),
                    Some(c) => s.push(c),
                    None => return Err(AxError::value("unterminated string literal")),
                },
                Some(c) => s.push(c),
            }
        }
        Ok(Value::string(s))
    }

    fn read_keyword(&mut self) -> AxResult<Value> {
        self.advance(); // consume ':'
        let start = self.pos;
        while let Some(ch) = self.current() {
            if is_symbol_char(ch) {
                self.advance();
            } else {
                break;
            }
        }
        let text: String = self.input[start..self.pos].iter().collect();
        Ok(Value::keyword(text))
    }

    /// Numbers support the Clojure-style suffixes: `N` for `big_int`, `M`
    /// for `big_decimal` (scale taken from the number of fractional
    /// digits, per spec §3's data model), a `.` for `float`, and plain
    /// digits for `integer`.
    fn read_number(&mut self) -> AxResult<Value> {
        let start = self.pos;
        if self.current() == Some('-') {
            self.advance();
        }
        while let Some(ch) = self.current() {
            if ch.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }
        let mut is_float = false;
        if self.current() == Some('.') && self.peek(1).map_or(false, |c| c.is_ascii_digit()) {
            is_float = true;
            self.advance();
            while let Some(ch) = self.current() {
                if ch.is_ascii_digit() {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        let digits_end = self.pos;
        let text: String = self.input[start..digits_end].iter().collect();

        match self.current() {
            Some('N') => {
                self.advance();
                let n: IBig = text.parse().map_err(|_| AxError::value(format!("invalid big_int literal: {text}")))?;
                Ok(Value::BigInt(n))
            }
            Some('M') => {
                self.advance();
                let (unscaled_text, scale) = match text.split_once('.') {
                    Some((whole, frac)) => (format!("{whole}{frac}"), frac.len() as i32),
                    None => (text.clone(), 0),
                };
                let unscaled: IBig = unscaled_text
                    .parse()
                    .map_err(|_| AxError::value(format!("invalid big_decimal literal: {text}")))?;
                Ok(Value::big_decimal(unscaled, scale))
            }
            _ if is_float => {
                let f: f64 = text.parse().map_err(|_| AxError::value(format!("invalid float literal: {text}")))?;
                Ok(Value::Float(f))
            }
            _ => {
                let n: i64 = text.parse().map_err(|_| AxError::value(format!("invalid integer literal: {text}")))?;
                Ok(Value::Integer(n))
            }
        }
    }

    fn read_symbol_or_literal(&mut self) -> AxResult<Value> {
        let start = self.pos;
        while let Some(ch) = self.current() {
            if is_symbol_char(ch) {
                self.advance();
            } else {
                break;
            }
        }
        let text: String = self.input[start..self.pos].iter().collect();
        if text.is_empty() {
            let bad = self.current().unwrap_or('\0');
            return Err(AxError::value(format!("unexpected character '{bad}'")).with_span(self.span_from(start)));
        }
        Ok(match text.as_str() {
            "nil" => Value::Nil,
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::symbol(text),
        })
    }
}

fn is_symbol_char(ch: char) -> bool {
    !ch.is_whitespace() && !matches!(ch, '(' | ')' | '[' | ']' | '{' | '}' | '"' | ';' | ',' | '\'' | '`' | '~')
}

/// Convenience entry point: reads every top-level form from `source`.
pub fn read_all(source: &str, source_id: u32) -> AxResult<Vec<Value>> {
    Reader::new(source, source_id).read_all()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_atoms() {
        let forms = read_all("42 3.14 true false nil :kw sym", 0).unwrap();
        assert_eq!(
            forms,
            vec![
                Value::Integer(42),
                Value::Float(3.14),
                Value::Bool(true),
                Value::Bool(false),
                Value::Nil,
                Value::keyword("kw"),
                Value::symbol("sym"),
            ]
        );
    }

    #[test]
    fn reads_big_int_and_big_decimal_suffixes() {
        let forms = read_all("100000000000000000000N 3.14M", 0).unwrap();
        match &forms[0] {
            Value::BigInt(n) => assert_eq!(*n, "100000000000000000000".parse::<IBig>().unwrap()),
            other => panic!("expected big_int, got {:?}", other),
        }
        match &forms[1] {
            Value::BigDecimal(d) => {
                assert_eq!(d.scale, 2);
                assert_eq!(d.unscaled, IBig::from(314));
            }
            other => panic!("expected big_decimal, got {:?}", other),
        }
    }

    #[test]
    fn reads_nested_collections() {
        let forms = read_all("(+ 1 [2 3] {:a 1} #{1 2})", 0).unwrap();
        match &forms[0] {
            Value::List(l) => assert_eq!(l.len(), 4),
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn reads_quote_reader_macro() {
        let forms = read_all("'(1 2)", 0).unwrap();
        match &forms[0] {
            Value::List(l) => {
                assert_eq!(l.first().unwrap(), &Value::symbol("quote"));
            }
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn negative_integer_literal() {
        let forms = read_all("-7", 0).unwrap();
        assert_eq!(forms[0], Value::Integer(-7));
    }
}
