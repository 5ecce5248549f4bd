//! A small closed expression language for narrowing state views.
//!
//! Predicates compare record fields with literals or other fields and combine
//! the results with boolean connectives. Nothing is executed beyond field
//! lookups and comparisons.
//!
//! ```text
//! expr     := and_expr ( ("or" | "||") and_expr )*
//! and_expr := unary ( ("and" | "&&") unary )*
//! unary    := ("not" | "!") unary | primary
//! primary  := "(" expr ")" | operand ( cmp operand )?
//! cmp      := "==" | "!=" | "<" | "<=" | ">" | ">="
//! operand  := field | integer | "true" | "false" | 'text' | "text"
//! ```
//!
//! Field names are those of [`StateRecord::field`]. Outcome labels and
//! players may be quoted (`outcome == 'winning'`, `current_player == 'O'`)
//! or bare when compared with `outcome` or `current_player`
//! (`outcome == winning`, `current_player == X`). A bare word on the other
//! side of those two fields is read as a label, even where it also names a
//! boolean field. Players also compare equal to their numeric id.
//!
//! ```
//! use mnk_lab::dataset::{Predicate, StateRecord};
//! use mnk_lab::mnk::MnkGame;
//!
//! let record = StateRecord::annotate(&MnkGame::tic_tac_toe().new_initial_state(), 0);
//! let predicate: Predicate = "freespace >= 4 and not winning".parse().unwrap();
//! assert!(predicate.evaluate(&record).unwrap());
//! ```

use std::{fmt, str::FromStr};

use super::{FieldValue, OutcomeLabel, StateRecord};

/// Comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }
}

/// Leaf of a predicate expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Field(String),
    Int(i64),
    Bool(bool),
    Text(String),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Field(name) => f.write_str(name),
            Operand::Int(v) => write!(f, "{v}"),
            Operand::Bool(v) => write!(f, "{v}"),
            Operand::Text(v) => write!(f, "'{v}'"),
        }
    }
}

/// Parsed predicate expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Compare {
        left: Operand,
        op: CompareOp,
        right: Operand,
    },
    /// A lone operand, which must resolve to a boolean
    Truthy(Operand),
    Not(Box<Predicate>),
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
}

/// Operand after field lookup
#[derive(Debug, Clone, PartialEq)]
enum Resolved {
    Value(FieldValue),
    Text(String),
}

impl Predicate {
    /// Parse a predicate expression.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ParsePredicate`] on malformed input.
    pub fn parse(input: &str) -> crate::Result<Self> {
        let tokens = tokenize(input)?;
        let mut parser = Parser {
            input,
            tokens,
            pos: 0,
        };
        let predicate = parser.expr()?;
        if let Some(token) = parser.peek() {
            return Err(parser.error(format!("unexpected trailing {token:?}")));
        }
        Ok(predicate)
    }

    /// Evaluate against a record.
    ///
    /// # Errors
    ///
    /// Returns error for unknown fields, ordering comparisons on
    /// non-integers and lone operands that are not booleans.
    pub fn evaluate(&self, record: &StateRecord) -> crate::Result<bool> {
        match self {
            Predicate::Compare { left, op, right } => {
                let lhs = resolve(left, record)?;
                let rhs = resolve(right, record)?;
                compare(left, &lhs, *op, &rhs)
            }
            Predicate::Truthy(operand) => match resolve(operand, record)? {
                Resolved::Value(FieldValue::Bool(value)) => Ok(value),
                _ => Err(crate::Error::PredicateType {
                    field: operand.to_string(),
                    expected: "a boolean".to_string(),
                }),
            },
            Predicate::Not(inner) => Ok(!inner.evaluate(record)?),
            Predicate::And(a, b) => Ok(a.evaluate(record)? && b.evaluate(record)?),
            Predicate::Or(a, b) => Ok(a.evaluate(record)? || b.evaluate(record)?),
        }
    }
}

impl FromStr for Predicate {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Predicate::parse(s)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Compare { left, op, right } => write!(f, "{left} {} {right}", op.symbol()),
            Predicate::Truthy(operand) => write!(f, "{operand}"),
            Predicate::Not(inner) => write!(f, "not ({inner})"),
            Predicate::And(a, b) => write!(f, "({a}) and ({b})"),
            Predicate::Or(a, b) => write!(f, "({a}) or ({b})"),
        }
    }
}

fn resolve(operand: &Operand, record: &StateRecord) -> crate::Result<Resolved> {
    Ok(match operand {
        Operand::Field(name) => {
            Resolved::Value(record.field(name).ok_or_else(|| crate::Error::UnknownField {
                field: name.clone(),
            })?)
        }
        Operand::Int(v) => Resolved::Value(FieldValue::Int(*v)),
        Operand::Bool(v) => Resolved::Value(FieldValue::Bool(*v)),
        Operand::Text(v) => Resolved::Text(v.clone()),
    })
}

fn text_matches(value: &FieldValue, text: &str) -> bool {
    match value {
        FieldValue::Outcome(label) => text.parse::<OutcomeLabel>().is_ok_and(|t| t == *label),
        FieldValue::Player(player) => text.trim().eq_ignore_ascii_case(&player.to_string()),
        FieldValue::Int(_) | FieldValue::Bool(_) => false,
    }
}

fn compare(left: &Operand, lhs: &Resolved, op: CompareOp, rhs: &Resolved) -> crate::Result<bool> {
    let equal = || match (lhs, rhs) {
        (Resolved::Value(a), Resolved::Value(b)) => a.matches(b),
        (Resolved::Value(v), Resolved::Text(t)) | (Resolved::Text(t), Resolved::Value(v)) => {
            text_matches(v, t)
        }
        (Resolved::Text(a), Resolved::Text(b)) => a == b,
    };

    match op {
        CompareOp::Eq => Ok(equal()),
        CompareOp::Ne => Ok(!equal()),
        _ => {
            let (Resolved::Value(FieldValue::Int(a)), Resolved::Value(FieldValue::Int(b))) =
                (lhs, rhs)
            else {
                return Err(crate::Error::PredicateType {
                    field: left.to_string(),
                    expected: format!("an integer using '{}'", op.symbol()),
                });
            };
            Ok(match op {
                CompareOp::Lt => a < b,
                CompareOp::Le => a <= b,
                CompareOp::Gt => a > b,
                CompareOp::Ge => a >= b,
                CompareOp::Eq | CompareOp::Ne => unreachable!("handled above"),
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Int(i64),
    Text(String),
    Cmp(CompareOp),
    And,
    Or,
    Not,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> crate::Result<Vec<Token>> {
    let err = |reason: String| crate::Error::ParsePredicate {
        input: input.to_string(),
        reason,
    };

    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();
        match c {
            _ if c.is_whitespace() => i += 1,
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '=' if next == Some('=') => {
                tokens.push(Token::Cmp(CompareOp::Eq));
                i += 2;
            }
            '!' if next == Some('=') => {
                tokens.push(Token::Cmp(CompareOp::Ne));
                i += 2;
            }
            '!' => {
                tokens.push(Token::Not);
                i += 1;
            }
            '<' | '>' => {
                let inclusive = next == Some('=');
                let op = match (c, inclusive) {
                    ('<', false) => CompareOp::Lt,
                    ('<', true) => CompareOp::Le,
                    ('>', false) => CompareOp::Gt,
                    _ => CompareOp::Ge,
                };
                tokens.push(Token::Cmp(op));
                i += if inclusive { 2 } else { 1 };
            }
            '&' if next == Some('&') => {
                tokens.push(Token::And);
                i += 2;
            }
            '|' if next == Some('|') => {
                tokens.push(Token::Or);
                i += 2;
            }
            '\'' | '"' => {
                let end = chars[i + 1..]
                    .iter()
                    .position(|&q| q == c)
                    .ok_or_else(|| err(format!("unterminated text starting at {i}")))?;
                tokens.push(Token::Text(chars[i + 1..i + 1 + end].iter().collect()));
                i += end + 2;
            }
            _ if c.is_ascii_digit() || (c == '-' && next.is_some_and(|n| n.is_ascii_digit())) => {
                let start = i;
                i += 1;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
                let literal: String = chars[start..i].iter().collect();
                let value = literal
                    .parse::<i64>()
                    .map_err(|e| err(format!("bad integer '{literal}': {e}")))?;
                tokens.push(Token::Int(value));
            }
            _ if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                tokens.push(match word.as_str() {
                    "and" => Token::And,
                    "or" => Token::Or,
                    "not" => Token::Not,
                    _ => Token::Ident(word),
                });
            }
            _ => return Err(err(format!("unexpected character '{c}' at {i}"))),
        }
    }

    Ok(tokens)
}

struct Parser<'a> {
    input: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn error(&self, reason: String) -> crate::Error {
        crate::Error::ParsePredicate {
            input: self.input.to_string(),
            reason,
        }
    }

    fn expr(&mut self) -> crate::Result<Predicate> {
        let mut left = self.and_expr()?;
        while self.peek() == Some(&Token::Or) {
            self.advance();
            let right = self.and_expr()?;
            left = Predicate::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn and_expr(&mut self) -> crate::Result<Predicate> {
        let mut left = self.unary()?;
        while self.peek() == Some(&Token::And) {
            self.advance();
            let right = self.unary()?;
            left = Predicate::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn unary(&mut self) -> crate::Result<Predicate> {
        if self.peek() == Some(&Token::Not) {
            self.advance();
            return Ok(Predicate::Not(Box::new(self.unary()?)));
        }
        self.primary()
    }

    fn primary(&mut self) -> crate::Result<Predicate> {
        if self.peek() == Some(&Token::LParen) {
            self.advance();
            let inner = self.expr()?;
            return match self.advance() {
                Some(Token::RParen) => Ok(inner),
                other => Err(self.error(format!("expected ')', found {other:?}"))),
            };
        }

        let left = self.operand()?;
        if let Some(&Token::Cmp(op)) = self.peek() {
            self.advance();
            let right = self.operand()?;
            let (left, right) = (bare_label(&right, left.clone()), bare_label(&left, right));
            return Ok(Predicate::Compare { left, op, right });
        }
        Ok(Predicate::Truthy(left))
    }

    fn operand(&mut self) -> crate::Result<Operand> {
        match self.advance() {
            Some(Token::Ident(word)) => Ok(match word.as_str() {
                "true" | "True" => Operand::Bool(true),
                "false" | "False" => Operand::Bool(false),
                _ => Operand::Field(word),
            }),
            Some(Token::Int(value)) => Ok(Operand::Int(value)),
            Some(Token::Text(text)) => Ok(Operand::Text(text)),
            Some(other) => Err(self.error(format!("expected a field or literal, found {other:?}"))),
            None => Err(self.error("unexpected end of expression".to_string())),
        }
    }
}

/// Words read as labels when compared with `outcome`
const OUTCOME_WORDS: &[&str] = &["winning", "tied", "losing"];

/// Words read as players when compared with `current_player`
const PLAYER_WORDS: &[&str] = &["X", "O", "x", "o"];

/// Turn a bare word into text when `other` is a label-valued field.
fn bare_label(other: &Operand, operand: Operand) -> Operand {
    let (Operand::Field(field), Operand::Field(word)) = (other, &operand) else {
        return operand;
    };
    let words = match field.as_str() {
        "outcome" => OUTCOME_WORDS,
        "current_player" => PLAYER_WORDS,
        _ => return operand,
    };
    if words.contains(&word.as_str()) {
        Operand::Text(word.clone())
    } else {
        operand
    }
}
