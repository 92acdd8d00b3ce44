//! Boolean query parsing.
//!
//! A query is split into terms, quoted phrases, operators and parentheses,
//! then reordered into postfix form with the shunting-yard algorithm.
//!
//! # Precedence (highest to lowest)
//!
//! 1. `NOT` (right associative, so `NOT NOT a` nests)
//! 2. `AND`
//! 3. `OR`
//!
//! Operators are matched case-insensitively; there is no implicit AND
//! between adjacent terms.

use crate::error::QueryError;
use crate::html::is_space;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryToken {
    Term(String),
    Phrase(String),
    And,
    Or,
    Not,
    LParen,
    RParen,
}

impl QueryToken {
    fn precedence(&self) -> u8 {
        match self {
            QueryToken::Not => 3,
            QueryToken::And => 2,
            QueryToken::Or => 1,
            _ => 0,
        }
    }

    fn is_right_associative(&self) -> bool {
        matches!(self, QueryToken::Not)
    }

    fn from_word(word: &str) -> Self {
        if word.eq_ignore_ascii_case("AND") {
            QueryToken::And
        } else if word.eq_ignore_ascii_case("OR") {
            QueryToken::Or
        } else if word.eq_ignore_ascii_case("NOT") {
            QueryToken::Not
        } else {
            QueryToken::Term(word.to_string())
        }
    }
}

impl fmt::Display for QueryToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryToken::Term(t) => write!(f, "{t}"),
            QueryToken::Phrase(p) => write!(f, "\"{p}\""),
            QueryToken::And => write!(f, "AND"),
            QueryToken::Or => write!(f, "OR"),
            QueryToken::Not => write!(f, "NOT"),
            QueryToken::LParen => write!(f, "("),
            QueryToken::RParen => write!(f, ")"),
        }
    }
}

/// Only ASCII whitespace separates words; U+00A0 and friends stay inside a term.
fn is_query_space(c: char) -> bool {
    c.is_ascii() && is_space(c as u8)
}

/// Split a query into tokens. Never fails: an unterminated quote runs to the
/// end of the input.
pub fn tokenize_query(query: &str) -> Vec<QueryToken> {
    let mut out = Vec::new();
    let mut chars = query.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        match c {
            c if is_query_space(c) => {
                chars.next();
            }
            '(' => {
                chars.next();
                out.push(QueryToken::LParen);
            }
            ')' => {
                chars.next();
                out.push(QueryToken::RParen);
            }
            '"' => {
                chars.next();
                let body_start = start + 1;
                let mut end = query.len();
                for (i, c) in chars.by_ref() {
                    if c == '"' {
                        end = i;
                        break;
                    }
                }
                out.push(QueryToken::Phrase(query[body_start..end].to_string()));
            }
            _ => {
                let mut end = query.len();
                while let Some(&(i, c)) = chars.peek() {
                    if is_query_space(c) || matches!(c, '(' | ')' | '"') {
                        end = i;
                        break;
                    }
                    chars.next();
                }
                out.push(QueryToken::from_word(&query[start..end]));
            }
        }
    }
    out
}

/// Convert tokens to postfix order. Only operands and `AND`/`OR`/`NOT`
/// appear in the output.
pub fn tokens_to_postfix(tokens: Vec<QueryToken>) -> Result<Vec<QueryToken>, QueryError> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut ops: Vec<QueryToken> = Vec::new();

    for token in tokens {
        match token {
            QueryToken::Term(_) | QueryToken::Phrase(_) => output.push(token),
            QueryToken::And | QueryToken::Or | QueryToken::Not => {
                while let Some(top) = ops.last() {
                    if *top == QueryToken::LParen {
                        break;
                    }
                    let (p_top, p_cur) = (top.precedence(), token.precedence());
                    if p_top > p_cur || (p_top == p_cur && !token.is_right_associative()) {
                        output.extend(ops.pop());
                    } else {
                        break;
                    }
                }
                ops.push(token);
            }
            QueryToken::LParen => ops.push(token),
            QueryToken::RParen => loop {
                match ops.pop() {
                    Some(QueryToken::LParen) => break,
                    Some(op) => output.push(op),
                    None => return Err(QueryError::MismatchedParentheses),
                }
            },
        }
    }

    while let Some(op) = ops.pop() {
        if matches!(op, QueryToken::LParen | QueryToken::RParen) {
            return Err(QueryError::MismatchedParentheses);
        }
        output.push(op);
    }
    Ok(output)
}

pub fn to_postfix(query: &str) -> Result<Vec<QueryToken>, QueryError> {
    tokens_to_postfix(tokenize_query(query))
}
