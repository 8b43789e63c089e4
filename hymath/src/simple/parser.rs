//! Stack machine turning compact-syntax tokens into a validated tree.
//!
//! The machine alternates between two states. While an expression is expected it
//! takes one atom (symbol, variable, number or string) and pushes it. Once an
//! expression has ended it takes punctuation: `(` and `[` mark the entry on top of the
//! stack as the head of an application or binding, `,` separates arguments, and `)`
//! or `]` pop everything down to the nearest matching head and push the combined
//! expression. Each combination checks only the rules of the node it creates, so the
//! first invalid sub-expression aborts the parse; the finished shape is validated once
//! as a whole.
use log::trace;
use serde_json::Value;

use crate::arena::OmArena;
use crate::error::{OmError, OmResult};
use crate::node::{IntegerValue, NodeId};
use crate::shape;
use crate::simple::lexer::{Token, tokenize};
use crate::validate::validate;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Head {
    Application,
    Binding,
}

#[derive(Debug)]
struct Entry {
    value: Value,
    head: Option<Head>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    ExpectExpression,
    ExpressionEnded,
}

fn syntax<T>(reason: impl Into<String>) -> OmResult<T> {
    Err(OmError::Syntax(reason.into()))
}

fn atom(token: Token) -> OmResult<Value> {
    match token {
        Token::Symbol { cd, name } => shape::symbol(&name, &cd, None),
        Token::Variable(name) => shape::variable(&name),
        Token::Integer(text) => match text.parse::<i64>() {
            Ok(value) => shape::integer(value),
            Err(_) => shape::integer(IntegerValue::text(text)?),
        },
        Token::Float(text) => match text.parse::<f64>() {
            Ok(value) => shape::float(value),
            Err(_) => syntax(format!("Unexpected {text}")),
        },
        Token::String(text) => shape::string(text),
        other => syntax(format!("Unexpected {other}")),
    }
}

/// Pop every entry from the nearest one marked `head` upwards, in left-to-right order.
fn pop_group(stack: &mut Vec<Entry>, head: Head) -> OmResult<Vec<Value>> {
    let Some(depth) = stack.iter().rposition(|entry| entry.head.is_some()) else {
        return match head {
            Head::Application => syntax("Unexpected )"),
            Head::Binding => syntax("Unexpected ]"),
        };
    };
    match (stack[depth].head, head) {
        (Some(found), _) if found == head => {
            Ok(stack.drain(depth..).map(|entry| entry.value).collect())
        }
        (_, Head::Application) => syntax("Mismatch: [ closed by )"),
        (_, Head::Binding) => syntax("Mismatch: ( closed by ]"),
    }
}

fn mark_top(stack: &mut [Entry], head: Head) -> OmResult<()> {
    match stack.last_mut() {
        Some(entry) => {
            entry.head = Some(head);
            Ok(())
        }
        None => syntax("Unexpected end of input"),
    }
}

/// Parse compact text into an untyped, validated shape.
pub fn parse_shape(input: &str) -> OmResult<Value> {
    let mut tokens = tokenize(input)?.into_iter().peekable();
    let mut stack: Vec<Entry> = Vec::new();
    let mut state = State::ExpectExpression;

    while let Some(token) = tokens.next() {
        trace!("{state:?} <- {token}");
        match state {
            State::ExpectExpression => {
                stack.push(Entry {
                    value: atom(token)?,
                    head: None,
                });
                state = State::ExpressionEnded;
            }
            State::ExpressionEnded => match token {
                Token::Comma => state = State::ExpectExpression,
                Token::LParen if tokens.next_if_eq(&Token::RParen).is_some() => {
                    let Some(entry) = stack.pop() else {
                        return syntax("Unexpected (");
                    };
                    stack.push(Entry {
                        value: shape::combine_application(vec![entry.value])?,
                        head: None,
                    });
                }
                Token::LParen => {
                    mark_top(&mut stack, Head::Application)?;
                    state = State::ExpectExpression;
                }
                Token::LBracket => {
                    mark_top(&mut stack, Head::Binding)?;
                    state = State::ExpectExpression;
                }
                Token::RParen => {
                    let elements = pop_group(&mut stack, Head::Application)?;
                    stack.push(Entry {
                        value: shape::combine_application(elements)?,
                        head: None,
                    });
                }
                Token::RBracket => {
                    let mut elements = pop_group(&mut stack, Head::Binding)?.into_iter();
                    let (Some(head), Some(body)) = (elements.next(), elements.next_back()) else {
                        return syntax("Unexpected ]");
                    };
                    stack.push(Entry {
                        value: shape::combine_binding(head, elements.collect(), body)?,
                        head: None,
                    });
                }
                other => return syntax(format!("Unexpected {other}")),
            },
        }
    }

    if state == State::ExpectExpression || stack.len() != 1 {
        return syntax("Unexpected end of input");
    }
    match stack.pop() {
        Some(Entry { value, head: None }) => {
            validate(&value)?;
            Ok(value)
        }
        _ => syntax("Unexpected end of input"),
    }
}

impl OmArena {
    /// Parse the compact syntax into a new tree.
    ///
    /// ```
    /// use hymath::arena::OmArena;
    /// use hymath::node::NodeType;
    ///
    /// let mut arena = OmArena::new();
    /// let forall = arena.simple_decode("logic1.forall[x,f(x)]").unwrap();
    /// let node = arena.get(forall).unwrap();
    /// assert_eq!(node.node_type(), NodeType::Binding);
    /// assert_eq!(node.variables().len(), 1);
    /// assert_eq!(node.body().unwrap().to_string(), "f(x)");
    ///
    /// assert!(arena.simple_decode("f(x]").unwrap_err().is_syntax());
    /// ```
    pub fn simple_decode(&mut self, input: &str) -> OmResult<NodeId> {
        let shape = parse_shape(input)?;
        self.instantiate(&shape)
    }
}
