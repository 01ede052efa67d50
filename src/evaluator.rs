use serde::Serialize;
use tracing::{debug, trace};

use crate::builtins::{self, Builtin};
use crate::environment::Environment;
use crate::syntax::{parse_number, Node, NodeId, Tape};
use crate::EvalError;

/// What a token means, decided by its spelling in this order:
/// number, `=name`, `$name`, builtin, anything else.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind<'a> {
  Number(f64),
  Assign(&'a str),
  Reference(&'a str),
  Builtin(&'static Builtin),
  Identifier(&'a str),
}

pub fn classify(token: &str) -> TokenKind<'_> {
  if let Some(number) = parse_number(token) {
    return TokenKind::Number(number);
  }
  if let Some(name) = token.strip_prefix('=').filter(|n| !n.is_empty()) {
    return TokenKind::Assign(name);
  }
  if let Some(name) = token.strip_prefix('$').filter(|n| !n.is_empty()) {
    return TokenKind::Reference(name);
  }
  if let Some(builtin) = builtins::lookup(token) {
    return TokenKind::Builtin(builtin);
  }
  TokenKind::Identifier(token)
}

/// Everything a run produced, including the part computed before a
/// failing token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
  #[serde(flatten)]
  pub tape: Tape,
  /// Operand stack at the end of the run, in program order.
  pub top_level: Vec<NodeId>,
  pub environment: Environment,
  pub error: Option<EvalError>,
}

impl Evaluation {
  pub fn is_ok(&self) -> bool {
    self.error.is_none()
  }

  pub fn nodes(&self) -> &[Node] {
    self.tape.nodes()
  }

  pub fn values(&self) -> &[f64] {
    self.tape.values()
  }

  pub fn node(&self, id: NodeId) -> Option<&Node> {
    self.tape.node(id)
  }

  pub fn value(&self, id: NodeId) -> Option<f64> {
    self.tape.value(id)
  }

  pub fn top_level_values(&self) -> Vec<f64> {
    self
      .top_level
      .iter()
      .filter_map(|&id| self.tape.value(id))
      .collect()
  }
}

/// The stack machine. Feed it tokens with [`Machine::step`]; a failed step
/// leaves the machine exactly as it was before the token.
#[derive(Debug, Default)]
pub struct Machine {
  tape: Tape,
  stack: Vec<NodeId>,
  environment: Environment,
}

impl Machine {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn stack(&self) -> &[NodeId] {
    &self.stack
  }

  pub fn tape(&self) -> &Tape {
    &self.tape
  }

  pub fn environment(&self) -> &Environment {
    &self.environment
  }

  // Ids on the stack always point into the tape.
  fn value_of(&self, id: NodeId) -> f64 {
    self.tape.values()[id.index()]
  }

  fn push(&mut self, node: Node, value: f64) -> NodeId {
    let id = self.tape.push(node, value);
    self.stack.push(id);
    id
  }

  pub fn step(&mut self, token: &str) -> Result<NodeId, EvalError> {
    let id = match classify(token) {
      TokenKind::Number(number) => self.push(Node::Literal, number),
      TokenKind::Assign(name) => {
        let Some(source) = self.stack.pop() else {
          return Err(EvalError::EmptyStackOnAssignment {
            name: name.to_string(),
          });
        };
        let value = self.value_of(source);
        self.environment.assign(name, value);
        self.push(
          Node::Bind {
            name: name.to_string(),
            source,
          },
          value,
        )
      }
      TokenKind::Reference(name) => {
        if !self.environment.contains(name) {
          return Err(EvalError::UnknownVariable {
            name: name.to_string(),
          });
        }
        return Err(EvalError::UnimplementedFeature {
          feature: token.to_string(),
        });
      }
      TokenKind::Builtin(builtin) => self.apply(builtin)?,
      TokenKind::Identifier(name) => {
        let value = self.environment.get(name).ok_or_else(|| {
          EvalError::UnknownVariable {
            name: name.to_string(),
          }
        })?;
        self.push(
          Node::VarRef {
            name: name.to_string(),
          },
          value,
        )
      }
    };
    trace!(token, node = %id, value = self.value_of(id), "pushed");
    Ok(id)
  }

  fn apply(&mut self, builtin: &'static Builtin) -> Result<NodeId, EvalError> {
    let have = self.stack.len();
    if have < builtin.arity {
      return Err(EvalError::InsufficientOperands {
        name: builtin.name.to_string(),
        needed: builtin.arity,
        have,
      });
    }
    // The deepest of the popped entries is the first argument.
    let first = have - builtin.arity;
    let values: Vec<f64> = self.stack[first..]
      .iter()
      .map(|&id| self.value_of(id))
      .collect();
    let result = builtin.apply(&values)?;
    let args = self.stack.split_off(first);
    Ok(self.push(
      Node::Apply {
        operator: builtin,
        args,
      },
      result,
    ))
  }

  /// Close the run. Whatever is left on the stack becomes the top level.
  pub fn finish(self, error: Option<EvalError>) -> Evaluation {
    Evaluation {
      tape: self.tape,
      top_level: self.stack,
      environment: self.environment,
      error,
    }
  }
}

/// Run a whole token sequence, stopping at the first error.
#[tracing::instrument(level = "debug", skip_all, fields(tokens = tokens.len()))]
pub fn evaluate<S: AsRef<str>>(tokens: &[S]) -> Evaluation {
  let mut machine = Machine::new();
  for (position, token) in tokens.iter().enumerate() {
    let token = token.as_ref();
    if let Err(error) = machine.step(token) {
      debug!(position, token, %error, "evaluation halted");
      return machine.finish(Some(error));
    }
  }
  let evaluation = machine.finish(None);
  debug!(
    nodes = evaluation.tape.len(),
    results = evaluation.top_level.len(),
    "evaluation finished"
  );
  evaluation
}
