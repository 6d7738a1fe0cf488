//! Parser for the textual predicate syntax.
//!
//! ```text
//! expr    := or
//! or      := and ( "||" and )*
//! and     := unary ( "&&" unary )*
//! unary   := "!" unary | primary
//! primary := "true" | "false" | "(" expr ")"
//!          | "platform" "(" ident ("," ident)* ")"
//!          | "arch" "(" ident ("," ident)* ")"
//!          | "config" "(" ident ("," ident)* ")"
//!          | "feature" "(" ident ")"
//! ```
//!
//! Identifiers are ASCII letters, digits and `_`. Offsets in errors are byte
//! offsets into the source string. Negations and parenthesized groups may nest
//! at most [`MAX_PREDICATE_NESTING`] levels deep.

use thiserror::Error;

use super::Predicate;
use crate::consts::MAX_PREDICATE_NESTING;
use crate::environment::{Architecture, Configuration, Platform};

/// Errors produced while parsing a predicate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredicateError {
  #[error("unexpected character '{ch}' at offset {offset}")]
  UnexpectedChar { ch: char, offset: usize },

  #[error("expected {expected} at offset {offset}, found {found}")]
  UnexpectedToken {
    expected: &'static str,
    found: String,
    offset: usize,
  },

  #[error("unknown predicate function '{name}' at offset {offset}")]
  UnknownFunction { name: String, offset: usize },

  #[error("unknown configuration '{name}' at offset {offset}")]
  UnknownConfiguration { name: String, offset: usize },

  #[error("{function}() takes exactly one argument (offset {offset})")]
  ArgumentCount { function: &'static str, offset: usize },

  #[error("predicate nests deeper than {max} levels at offset {offset}", max = MAX_PREDICATE_NESTING)]
  TooDeep { offset: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
  Ident(String),
  LParen,
  RParen,
  Comma,
  And,
  Or,
  Bang,
  Eof,
}

impl Token {
  fn describe(&self) -> String {
    match self {
      Token::Ident(name) => format!("'{}'", name),
      Token::LParen => "'('".to_string(),
      Token::RParen => "')'".to_string(),
      Token::Comma => "','".to_string(),
      Token::And => "'&&'".to_string(),
      Token::Or => "'||'".to_string(),
      Token::Bang => "'!'".to_string(),
      Token::Eof => "end of input".to_string(),
    }
  }
}

fn is_ident_char(c: char) -> bool {
  c.is_ascii_alphanumeric() || c == '_'
}

/// Whether `name` can be written as a bare identifier.
pub(super) fn is_ident(name: &str) -> bool {
  !name.is_empty() && name.chars().all(is_ident_char)
}

fn tokenize(source: &str) -> Result<Vec<(Token, usize)>, PredicateError> {
  let mut tokens = Vec::new();
  let mut chars = source.char_indices().peekable();

  while let Some((offset, c)) = chars.next() {
    let token = match c {
      c if c.is_whitespace() => continue,
      '(' => Token::LParen,
      ')' => Token::RParen,
      ',' => Token::Comma,
      '!' => Token::Bang,
      '&' | '|' => match chars.peek() {
        Some(&(_, next)) if next == c => {
          chars.next();
          if c == '&' { Token::And } else { Token::Or }
        }
        _ => return Err(PredicateError::UnexpectedChar { ch: c, offset }),
      },
      c if is_ident_char(c) => {
        let mut end = offset + c.len_utf8();
        while let Some(&(i, next)) = chars.peek() {
          if !is_ident_char(next) {
            break;
          }
          end = i + next.len_utf8();
          chars.next();
        }
        Token::Ident(source[offset..end].to_string())
      }
      _ => return Err(PredicateError::UnexpectedChar { ch: c, offset }),
    };
    tokens.push((token, offset));
  }

  tokens.push((Token::Eof, source.len()));
  Ok(tokens)
}

struct Parser {
  tokens: Vec<(Token, usize)>,
  pos: usize,
  depth: usize,
}

impl Parser {
  fn peek(&self) -> &Token {
    &self.tokens[self.pos].0
  }

  fn offset(&self) -> usize {
    self.tokens[self.pos].1
  }

  fn advance(&mut self) -> (Token, usize) {
    let current = self.tokens[self.pos].clone();
    if self.pos + 1 < self.tokens.len() {
      self.pos += 1;
    }
    current
  }

  fn expect(&mut self, expected: Token, description: &'static str) -> Result<(), PredicateError> {
    if *self.peek() == expected {
      self.advance();
      Ok(())
    } else {
      Err(self.unexpected(description))
    }
  }

  fn unexpected(&self, expected: &'static str) -> PredicateError {
    PredicateError::UnexpectedToken {
      expected,
      found: self.peek().describe(),
      offset: self.offset(),
    }
  }

  /// Enter one level of `!` or parenthesis nesting opened at `offset`.
  fn descend(&mut self, offset: usize) -> Result<(), PredicateError> {
    if self.depth >= MAX_PREDICATE_NESTING {
      return Err(PredicateError::TooDeep { offset });
    }
    self.depth += 1;
    Ok(())
  }

  fn parse_or(&mut self) -> Result<Predicate, PredicateError> {
    let mut items = vec![self.parse_and()?];
    while *self.peek() == Token::Or {
      self.advance();
      items.push(self.parse_and()?);
    }
    Ok(if items.len() == 1 { items.remove(0) } else { Predicate::Any(items) })
  }

  fn parse_and(&mut self) -> Result<Predicate, PredicateError> {
    let mut items = vec![self.parse_unary()?];
    while *self.peek() == Token::And {
      self.advance();
      items.push(self.parse_unary()?);
    }
    Ok(if items.len() == 1 { items.remove(0) } else { Predicate::All(items) })
  }

  fn parse_unary(&mut self) -> Result<Predicate, PredicateError> {
    if *self.peek() == Token::Bang {
      let (_, offset) = self.advance();
      self.descend(offset)?;
      let inner = self.parse_unary()?;
      self.depth -= 1;
      return Ok(inner.negate());
    }
    self.parse_primary()
  }

  fn parse_primary(&mut self) -> Result<Predicate, PredicateError> {
    match self.advance() {
      (Token::LParen, offset) => {
        self.descend(offset)?;
        let inner = self.parse_or()?;
        self.expect(Token::RParen, "')'")?;
        self.depth -= 1;
        Ok(inner)
      }
      (Token::Ident(name), offset) => match name.as_str() {
        "true" => Ok(Predicate::Const(true)),
        "false" => Ok(Predicate::Const(false)),
        "platform" => Ok(Predicate::Platform(self.parse_args(|s, _| Ok(Platform::from(s)))?)),
        "arch" | "architecture" => Ok(Predicate::Architecture(
          self.parse_args(|s, _| Ok(Architecture::from(s)))?,
        )),
        "config" | "configuration" => Ok(Predicate::Configuration(self.parse_args(|s, offset| {
          s.parse::<Configuration>()
            .map_err(|_| PredicateError::UnknownConfiguration { name: s, offset })
        })?)),
        "feature" => {
          let mut args = self.parse_args(|s, _| Ok(s))?;
          if args.len() != 1 {
            return Err(PredicateError::ArgumentCount {
              function: "feature",
              offset,
            });
          }
          Ok(Predicate::Feature(args.remove(0)))
        }
        _ => Err(PredicateError::UnknownFunction { name, offset }),
      },
      (token, offset) => Err(PredicateError::UnexpectedToken {
        expected: "a predicate",
        found: token.describe(),
        offset,
      }),
    }
  }

  /// Parse `"(" ident ("," ident)* ")"`, converting each identifier.
  fn parse_args<T>(
    &mut self,
    convert: impl Fn(String, usize) -> Result<T, PredicateError>,
  ) -> Result<Vec<T>, PredicateError> {
    self.expect(Token::LParen, "'('")?;
    let mut args = Vec::new();
    loop {
      match self.advance() {
        (Token::Ident(name), offset) => args.push(convert(name, offset)?),
        (token, offset) => {
          return Err(PredicateError::UnexpectedToken {
            expected: "an identifier",
            found: token.describe(),
            offset,
          });
        }
      }
      match self.peek() {
        Token::Comma => {
          self.advance();
        }
        Token::RParen => {
          self.advance();
          return Ok(args);
        }
        _ => return Err(self.unexpected("',' or ')'")),
      }
    }
  }
}

/// Parse a predicate from its text form.
pub fn parse(source: &str) -> Result<Predicate, PredicateError> {
  let mut parser = Parser {
    tokens: tokenize(source)?,
    pos: 0,
    depth: 0,
  };
  let predicate = parser.parse_or()?;
  if *parser.peek() != Token::Eof {
    return Err(parser.unexpected("end of input"));
  }
  Ok(predicate)
}
