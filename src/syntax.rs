use serde::Serialize;
use std::fmt;

use crate::builtins::Builtin;

/// Position of a node on the tape. Stable for the whole run.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl NodeId {
  pub fn index(self) -> usize {
    self.0
  }
}

impl fmt::Display for NodeId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{}", self.0)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Node {
  Literal,
  Apply {
    operator: &'static Builtin,
    args: Vec<NodeId>,
  },
  Bind {
    name: String,
    source: NodeId,
  },
  VarRef {
    name: String,
  },
}

impl Node {
  /// Nodes this one was built from, in argument order.
  pub fn operands(&self) -> &[NodeId] {
    match self {
      Node::Literal | Node::VarRef { .. } => &[],
      Node::Apply { args, .. } => args,
      Node::Bind { source, .. } => std::slice::from_ref(source),
    }
  }
}

/// Append-only node log with its parallel value log.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Tape {
  nodes: Vec<Node>,
  values: Vec<f64>,
}

impl Tape {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&mut self, node: Node, value: f64) -> NodeId {
    let id = NodeId(self.nodes.len());
    self.nodes.push(node);
    self.values.push(value);
    id
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  pub fn node(&self, id: NodeId) -> Option<&Node> {
    self.nodes.get(id.0)
  }

  pub fn value(&self, id: NodeId) -> Option<f64> {
    self.values.get(id.0).copied()
  }

  pub fn nodes(&self) -> &[Node] {
    &self.nodes
  }

  pub fn values(&self) -> &[f64] {
    &self.values
  }

  /// Nodes with their ids and values, in tape order.
  pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node, f64)> + '_ {
    self
      .nodes
      .iter()
      .zip(self.values.iter().copied())
      .enumerate()
      .map(|(i, (node, value))| (NodeId(i), node, value))
  }
}

/// Format a number the way it is displayed in rendered equations.
/// Signs are kept; the renderer splits them off into an operator.
pub fn format_number(value: f64) -> String {
  if value.is_nan() {
    return "NaN".to_string();
  }
  if value.is_infinite() {
    return if value > 0.0 { "∞" } else { "-∞" }.to_string();
  }
  // Handle -0.0
  if value == 0.0 {
    return "0".to_string();
  }
  let magnitude = value.abs();
  if magnitude >= 1e21 || magnitude < 1e-6 {
    format!("{:e}", value)
  } else {
    format!("{}", value)
  }
}

/// Read the number a token starts with: an optional sign, then either
/// `Infinity` or the longest decimal literal prefix. Trailing text is
/// ignored, so `3abc` reads as 3 and `1.2.3` as 1.2. Words like `inf` or
/// `NaN` are left to the other token classes.
pub fn parse_number(token: &str) -> Option<f64> {
  let token = token.trim_start();
  let unsigned = token.strip_prefix(&['+', '-'][..]).unwrap_or(token);
  let sign = token.len() - unsigned.len();
  if unsigned.starts_with("Infinity") {
    return Some(if token.starts_with('-') {
      f64::NEG_INFINITY
    } else {
      f64::INFINITY
    });
  }
  let end = sign + decimal_prefix_len(unsigned)?;
  token[..end].parse().ok()
}

// Length of `digits [. digits] [e [sign] digits]` at the start of `s`,
// with at least one mantissa digit. An exponent without digits is not
// part of the literal.
fn decimal_prefix_len(s: &str) -> Option<usize> {
  let bytes = s.as_bytes();
  let digits = |from: usize| {
    bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count()
  };

  let whole = digits(0);
  let mut end = whole;
  let mut fraction = 0;
  if bytes.get(end) == Some(&b'.') {
    fraction = digits(end + 1);
    end += 1 + fraction;
  }
  if whole + fraction == 0 {
    return None;
  }

  if matches!(bytes.get(end), Some(b'e' | b'E')) {
    let mut exponent = end + 1;
    if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
      exponent += 1;
    }
    let count = digits(exponent);
    if count > 0 {
      end = exponent + count;
    }
  }
  Some(end)
}
