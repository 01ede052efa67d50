use serde::Serialize;
use thiserror::Error;

pub mod builtins;
pub mod environment;
pub mod evaluator;
pub mod lexer;
pub mod output;
pub mod render;
pub mod syntax;

pub use evaluator::{evaluate, Evaluation};
pub use lexer::{tokenize, Rule};
pub use render::{render, Fragment, Item, Renderer};
pub use syntax::{Node, NodeId};

/// Why a run stopped. Everything computed before the failing token is
/// still part of the [`Evaluation`].
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum EvalError {
  #[error("Unknown operator: {name}")]
  UnknownOperator { name: String },
  #[error(
    "Not enough operands for operator: {name} (needs {needed}, have {have})"
  )]
  InsufficientOperands {
    name: String,
    needed: usize,
    have: usize,
  },
  #[error("Nothing on the stack to assign to {name}")]
  EmptyStackOnAssignment { name: String },
  #[error("Unknown variable: {name}")]
  UnknownVariable { name: String },
  #[error("Not implemented: {feature}")]
  UnimplementedFeature { feature: String },
}

#[derive(Error, Debug)]
pub enum InterpreterError {
  #[error("Parse error: {0}")]
  ParseError(#[from] Box<pest::error::Error<Rule>>),
  #[error("Evaluation error: {0}")]
  EvaluationError(#[from] EvalError),
}

/// Tokenize and evaluate program text.
///
/// Only a lexer failure is an `Err`; evaluation errors are reported inside
/// the returned [`Evaluation`] next to the partial result.
pub fn evaluate_source(input: &str) -> Result<Evaluation, InterpreterError> {
  let tokens = tokenize(input)?;
  Ok(evaluate(&tokens))
}

/// Evaluate a program and return one text equation per line.
///
/// ```
/// assert_eq!(
///   stackmath::interpret("1 2 3 * 4 / - 5 +").unwrap(),
///   "1 - (2 × 3)/4 + 5 = 4.5"
/// );
/// ```
pub fn interpret(input: &str) -> Result<String, InterpreterError> {
  let evaluation = evaluate_source(input)?;
  if let Some(error) = &evaluation.error {
    return Err(error.clone().into());
  }
  let lines: Vec<String> = render(&evaluation)
    .iter()
    .map(ToString::to_string)
    .collect();
  Ok(lines.join("\n"))
}
