use serde::{Serialize, Serializer};
use std::f64::consts;
use std::fmt;

use crate::EvalError;

/// How an application of a builtin is laid out when rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Notation {
  /// `a + b`, `a - b`
  Additive,
  /// `a × b`, `a mod b`
  Multiplicative,
  /// Stacked fraction.
  Fraction,
  /// Radical sign over the operand.
  Radical,
  /// Superscript exponent.
  Power,
  /// `name(a, b)`, or just `name` for constants.
  Call,
}

#[derive(Clone, Copy)]
pub enum Function {
  Constant(f64),
  Unary(fn(f64) -> f64),
  Binary(fn(f64, f64) -> f64),
}

/// A builtin operator, function or constant.
#[derive(Clone, Copy)]
pub struct Builtin {
  pub name: &'static str,
  pub arity: usize,
  pub function: Function,
  pub glyph: Option<&'static str>,
  pub notation: Notation,
}

impl Builtin {
  /// Spelling used when rendering; falls back to the token itself.
  pub fn display(&self) -> &'static str {
    self.glyph.unwrap_or(self.name)
  }

  /// Apply the numeric function to argument values given in argument
  /// order. A table entry whose arity disagrees with its function is
  /// reported as an unknown operator.
  pub fn apply(&self, args: &[f64]) -> Result<f64, EvalError> {
    let malformed = || EvalError::UnknownOperator {
      name: self.name.to_string(),
    };
    if args.len() != self.arity {
      return Err(malformed());
    }
    match (self.function, args) {
      (Function::Constant(value), []) => Ok(value),
      (Function::Unary(f), [a]) => Ok(f(*a)),
      (Function::Binary(f), [a, b]) => Ok(f(*a, *b)),
      _ => Err(malformed()),
    }
  }
}

impl PartialEq for Builtin {
  fn eq(&self, other: &Self) -> bool {
    self.name == other.name
  }
}

impl fmt::Debug for Builtin {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Builtin")
      .field("name", &self.name)
      .field("arity", &self.arity)
      .field("glyph", &self.glyph)
      .field("notation", &self.notation)
      .finish()
  }
}

impl Serialize for Builtin {
  fn serialize<S: Serializer>(
    &self,
    serializer: S,
  ) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.name)
  }
}

fn add(a: f64, b: f64) -> f64 {
  a + b
}

fn subtract(a: f64, b: f64) -> f64 {
  a - b
}

fn multiply(a: f64, b: f64) -> f64 {
  a * b
}

fn divide(a: f64, b: f64) -> f64 {
  a / b
}

// Truncated remainder, sign follows the dividend.
fn remainder(a: f64, b: f64) -> f64 {
  a % b
}

const fn binary(
  name: &'static str,
  f: fn(f64, f64) -> f64,
  glyph: Option<&'static str>,
  notation: Notation,
) -> Builtin {
  Builtin {
    name,
    arity: 2,
    function: Function::Binary(f),
    glyph,
    notation,
  }
}

const fn unary(
  name: &'static str,
  f: fn(f64) -> f64,
  notation: Notation,
) -> Builtin {
  Builtin {
    name,
    arity: 1,
    function: Function::Unary(f),
    glyph: None,
    notation,
  }
}

const fn constant(
  name: &'static str,
  value: f64,
  glyph: Option<&'static str>,
) -> Builtin {
  Builtin {
    name,
    arity: 0,
    function: Function::Constant(value),
    glyph,
    notation: Notation::Call,
  }
}

static BUILTINS: [Builtin; 18] = [
  binary("+", add, None, Notation::Additive),
  binary("-", subtract, None, Notation::Additive),
  binary("*", multiply, Some("×"), Notation::Multiplicative),
  binary("/", divide, None, Notation::Fraction),
  binary("%", remainder, Some("mod"), Notation::Multiplicative),
  unary("abs", f64::abs, Notation::Call),
  unary("sin", f64::sin, Notation::Call),
  unary("cos", f64::cos, Notation::Call),
  unary("tan", f64::tan, Notation::Call),
  unary("asin", f64::asin, Notation::Call),
  unary("acos", f64::acos, Notation::Call),
  unary("atan", f64::atan, Notation::Call),
  unary("exp", f64::exp, Notation::Call),
  unary("log", f64::ln, Notation::Call),
  unary("sqrt", f64::sqrt, Notation::Radical),
  binary("pow", f64::powf, None, Notation::Power),
  constant("PI", consts::PI, Some("π")),
  constant("E", consts::E, None),
];

/// Every builtin, in registry order.
pub fn builtins() -> &'static [Builtin] {
  &BUILTINS
}

pub fn lookup(name: &str) -> Option<&'static Builtin> {
  BUILTINS.iter().find(|builtin| builtin.name == name)
}
