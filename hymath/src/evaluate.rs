//! Numeric evaluation of simple arithmetic, relational and transcendental expressions.
//!
//! Application heads are recognised by their compact text (`arith1.plus`, `transc1.sin`,
//! ...). Anything unknown evaluates to no value, with a message saying so. Notes about
//! approximations made along the way accumulate in [`Evaluation::message`], one per line.
//!
//! ```
//! use hymath::arena::OmArena;
//! use hymath::evaluate::EvalValue;
//!
//! let mut arena = OmArena::new();
//! let e = arena.simple_decode("arith1.times(arith1.plus(1,2),4)").unwrap();
//! assert_eq!(arena.evaluate(e).value, Some(EvalValue::Number(12.0)));
//!
//! let unknown = arena.simple_decode("f(x)").unwrap();
//! assert_eq!(arena.evaluate(unknown).message.as_deref(), Some("Could not evaluate f(x)"));
//! ```
use std::f64::consts::{E, PI};
use std::fmt;

use crate::arena::OmArena;
use crate::node::{NodeId, NodeKind};

#[derive(Debug, Clone, PartialEq)]
pub enum EvalValue {
    Number(f64),
    Bool(bool),
    Text(String),
    Bytes(Vec<u8>),
}

impl EvalValue {
    /// Numeric reading of the value; booleans count as `0` and `1`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            EvalValue::Number(n) => Some(*n),
            EvalValue::Bool(b) => Some(f64::from(u8::from(*b))),
            _ => None,
        }
    }

    fn truthy(&self) -> bool {
        match self {
            EvalValue::Number(n) => *n != 0.0 && !n.is_nan(),
            EvalValue::Bool(b) => *b,
            EvalValue::Text(s) => !s.is_empty(),
            EvalValue::Bytes(_) => true,
        }
    }
}

impl fmt::Display for EvalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalValue::Number(n) => write!(f, "{n}"),
            EvalValue::Bool(b) => write!(f, "{b}"),
            EvalValue::Text(s) => f.write_str(s),
            EvalValue::Bytes(bytes) => write!(f, "{bytes:?}"),
        }
    }
}

/// Outcome of [`OmArena::evaluate`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    pub value: Option<EvalValue>,
    pub message: Option<String>,
}

impl Evaluation {
    fn value(value: EvalValue) -> Self {
        Self {
            value: Some(value),
            message: None,
        }
    }

    fn number(value: f64) -> Self {
        Self::value(EvalValue::Number(value))
    }

    fn noted(value: f64, note: &str) -> Self {
        Self {
            value: Some(EvalValue::Number(value)),
            message: Some(note.to_owned()),
        }
    }

    fn note(&mut self, note: &str) {
        match &mut self.message {
            Some(message) => {
                message.push('\n');
                message.push_str(note);
            }
            None => self.message = Some(note.to_owned()),
        }
    }
}

/// Operation applied to already evaluated operands.
#[derive(Clone, Copy)]
enum Op {
    Unary(fn(f64) -> f64),
    Binary(fn(f64, f64) -> f64),
    Compare(fn(&EvalValue, &EvalValue) -> bool),
    Not,
}

fn factorial(a: f64) -> f64 {
    if a <= 1.0 {
        return 1.0;
    }
    if a >= 20.0 {
        return f64::INFINITY;
    }
    (1..=a as u64).map(|i| i as f64).product()
}

fn compare(a: &EvalValue, b: &EvalValue, f: fn(f64, f64) -> bool) -> bool {
    a.as_f64().zip(b.as_f64()).is_some_and(|(a, b)| f(a, b))
}

fn operator(head: &str) -> Option<Op> {
    use Op::*;

    Some(match head {
        "arith1.plus" => Binary(|a, b| a + b),
        "arith1.minus" => Binary(|a, b| a - b),
        "arith1.times" => Binary(|a, b| a * b),
        "arith1.divide" => Binary(|a, b| a / b),
        "arith1.power" => Binary(f64::powf),
        "arith1.root" => Binary(|a, b| b.powf(1.0 / a)),
        "arith1.abs" => Unary(f64::abs),
        "arith1.unary_minus" => Unary(|a| -a),
        "relation1.eq" => Compare(|a, b| a == b),
        "relation1.approx" => Compare(|a, b| compare(a, b, |a, b| (a - b).abs() < 0.01)),
        "relation1.neq" => Compare(|a, b| a != b),
        "relation1.lt" => Compare(|a, b| compare(a, b, |a, b| a < b)),
        "relation1.gt" => Compare(|a, b| compare(a, b, |a, b| a > b)),
        "relation1.le" => Compare(|a, b| compare(a, b, |a, b| a <= b)),
        "relation1.ge" => Compare(|a, b| compare(a, b, |a, b| a >= b)),
        "logic1.not" => Not,
        "transc1.sin" => Unary(f64::sin),
        "transc1.cos" => Unary(f64::cos),
        "transc1.tan" => Unary(f64::tan),
        "transc1.cot" => Unary(|a| 1.0 / a.tan()),
        "transc1.sec" => Unary(|a| 1.0 / a.cos()),
        "transc1.csc" => Unary(|a| 1.0 / a.sin()),
        "transc1.arcsin" => Unary(f64::asin),
        "transc1.arccos" => Unary(f64::acos),
        "transc1.arctan" => Unary(f64::atan),
        "transc1.arccot" => Unary(|a| (1.0 / a).atan()),
        "transc1.arcsec" => Unary(|a| (1.0 / a).acos()),
        "transc1.arccsc" => Unary(|a| (1.0 / a).asin()),
        "transc1.ln" => Unary(f64::ln),
        "transc1.log" => Binary(|base, arg| arg.ln() / base.ln()),
        "integer1.factorial" => Unary(factorial),
        _ => return None,
    })
}

impl OmArena {
    /// Evaluate `id` numerically where possible.
    pub fn evaluate(&self, id: NodeId) -> Evaluation {
        let mut result = self.evaluate_node(id);
        if result.value.is_none() {
            result.message = Some(format!("Could not evaluate {}", self.simple_encode(id)));
        }
        result
    }

    fn evaluate_node(&self, id: NodeId) -> Evaluation {
        let Some(kind) = self.kind(id) else {
            return Evaluation::default();
        };
        match kind {
            NodeKind::Integer(value) => Evaluation::number(value.to_f64()),
            NodeKind::Float(value) => Evaluation::number(*value),
            NodeKind::String(value) => Evaluation::value(EvalValue::Text(value.clone())),
            NodeKind::ByteArray(value) => Evaluation::value(EvalValue::Bytes(value.clone())),
            NodeKind::Variable(name) => match name.as_str() {
                "\u{03c0}" => Evaluation::noted(PI, "The actual value of \u{03c0} has been rounded."),
                "e" => Evaluation::noted(E, "The actual value of e has been rounded."),
                _ => Evaluation::default(),
            },
            NodeKind::Symbol(symbol) => match symbol.to_string().as_str() {
                "units.degrees" => Evaluation::noted(
                    PI / 180.0,
                    "Converting to degrees used an approximation of \u{03c0}.",
                ),
                "units.percent" => Evaluation::number(0.01),
                "units.dollars" => Evaluation::noted(1.0, "Dollar units were dropped"),
                _ => Evaluation::default(),
            },
            NodeKind::Application(children) => {
                let Some((&head, operands)) = children.split_first() else {
                    return Evaluation::default();
                };
                let head = self.simple_encode(head);
                match operator(&head) {
                    Some(op) => {
                        let mut result = self.apply(op, operands);
                        if head == "relation1.approx" && result.value.is_some() {
                            result.note(
                                "Values were rounded to two decimal places for approximate comparison.",
                            );
                        }
                        result
                    }
                    None => Evaluation::default(),
                }
            }
            NodeKind::Binding { .. } | NodeKind::Error { .. } => Evaluation::default(),
        }
    }

    /// Evaluate the operands `op` needs, then apply it. The first operand that fails to
    /// evaluate is returned as the result.
    fn apply(&self, op: Op, operands: &[NodeId]) -> Evaluation {
        let arity = match op {
            Op::Unary(_) | Op::Not => 1,
            Op::Binary(_) | Op::Compare(_) => 2,
        };
        let mut notes = Evaluation::default();
        let mut args = Vec::with_capacity(arity);
        for i in 0..arity {
            let Some(&operand) = operands.get(i) else {
                return Evaluation::default();
            };
            let arg = self.evaluate(operand);
            let Some(value) = arg.value else {
                return arg;
            };
            if let Some(message) = &arg.message {
                notes.note(message);
            }
            args.push(value);
        }

        let number = |i: usize| args[i].as_f64();
        let value = match op {
            Op::Unary(f) => number(0).map(|a| EvalValue::Number(f(a))),
            Op::Binary(f) => number(0)
                .zip(number(1))
                .map(|(a, b)| EvalValue::Number(f(a, b))),
            Op::Compare(f) => Some(EvalValue::Bool(f(&args[0], &args[1]))),
            Op::Not => Some(EvalValue::Bool(!args[0].truthy())),
        };
        Evaluation {
            value,
            message: notes.message,
        }
    }
}
