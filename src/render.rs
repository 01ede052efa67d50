//! Layout of evaluated nodes as abstract math fragments.
//!
//! Every node gets a binding power pair that decides whether it needs
//! parentheses when it appears as an operand of an infix operator or as
//! the base of a power. Fractions, radicals and superscripts delimit their
//! own operands and never wrap them.

use serde::Serialize;
use std::collections::HashMap;
use tracing::trace;

use crate::builtins::{Builtin, Notation};
use crate::evaluator::Evaluation;
use crate::syntax::{format_number, Node, NodeId};

/// How tightly a rendered node holds together on its left and right side.
/// `u8::MAX` stands for a node that never needs parentheses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BindingPower {
  pub left: u8,
  pub right: u8,
}

impl BindingPower {
  pub const ATOM: Self = Self::new(u8::MAX, u8::MAX);
  pub const BIND: Self = Self::new(1, 2);

  pub const fn new(left: u8, right: u8) -> Self {
    Self { left, right }
  }
}

impl Notation {
  pub fn binding_power(self) -> BindingPower {
    match self {
      Notation::Additive => BindingPower::new(3, 4),
      Notation::Multiplicative => BindingPower::new(5, 6),
      Notation::Radical => BindingPower::new(7, 8),
      Notation::Power => BindingPower::new(9, 10),
      Notation::Fraction | Notation::Call => BindingPower::ATOM,
    }
  }
}

/// A primitive of the render tree. Presenters map these onto a concrete
/// medium (see [`crate::output`]).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Item {
  Number(String),
  Identifier(String),
  Operator(String),
  Row(Vec<Item>),
  Fraction {
    numerator: Vec<Item>,
    denominator: Vec<Item>,
  },
  Radical(Vec<Item>),
  Superscript {
    base: Vec<Item>,
    exponent: Vec<Item>,
  },
}

impl Item {
  pub fn operator(text: &str) -> Self {
    Item::Operator(text.to_string())
  }
}

/// An ordered sequence of render items.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Fragment(pub Vec<Item>);

impl Fragment {
  pub fn items(&self) -> &[Item] {
    &self.0
  }
}

/// Render items for a number, with the sign split off as an operator.
pub fn number_items(value: f64) -> Vec<Item> {
  if value < 0.0 {
    vec![Item::Row(vec![
      Item::operator("-"),
      Item::Number(format_number(-value)),
    ])]
  } else {
    vec![Item::Number(format_number(value))]
  }
}

/// A child spliced into its parent's row, bare or in parentheses.
#[derive(Debug, Clone, Copy)]
enum Slot {
  Bare(NodeId),
  Wrapped(NodeId),
}

impl Slot {
  fn new(id: NodeId, wrap: bool) -> Self {
    if wrap {
      Slot::Wrapped(id)
    } else {
      Slot::Bare(id)
    }
  }
}

/// One piece of a node's layout. Children are referenced by id, so a
/// layout has a fixed size regardless of how deep the expression is.
#[derive(Debug, Clone)]
enum Part {
  Item(Item),
  Splice(Slot),
  Fraction(NodeId, NodeId),
  Radical(NodeId),
  Superscript(Slot, NodeId),
}

#[derive(Debug, Clone)]
struct Layout {
  parts: Vec<Part>,
  power: BindingPower,
}

/// Pending work while expanding a layout into items.
enum Task<'l> {
  Emit(std::slice::Iter<'l, Part>),
  Open,
  Close(Close),
}

/// How the innermost open row is folded into its parent.
#[derive(Clone, Copy)]
enum Close {
  Parentheses,
  Fraction,
  Radical,
  Superscript,
}

/// Renders nodes of one evaluation, laying out each node at most once.
pub struct Renderer<'a> {
  evaluation: &'a Evaluation,
  cache: HashMap<NodeId, Layout>,
}

impl<'a> Renderer<'a> {
  pub fn new(evaluation: &'a Evaluation) -> Self {
    Self {
      evaluation,
      cache: HashMap::new(),
    }
  }

  /// The expression of a node, without its value. `None` for ids that are
  /// not on the tape.
  pub fn render_node(&mut self, id: NodeId) -> Option<Fragment> {
    self.layout(id)?;
    self.expand(id).map(Fragment)
  }

  /// `<expression> = <value>` for a node.
  pub fn render_equation(&mut self, id: NodeId) -> Option<Fragment> {
    let value = self.evaluation.value(id)?;
    let mut items = self.render_node(id)?.0;
    items.push(Item::operator("="));
    items.extend(number_items(value));
    Some(Fragment(items))
  }

  pub fn binding_power(&mut self, id: NodeId) -> Option<BindingPower> {
    self.layout(id).map(|layout| layout.power)
  }

  pub fn is_cached(&self, id: NodeId) -> bool {
    self.cache.contains_key(&id)
  }

  // Lays out `id` and every uncached node below it, children first.
  // Operands always have smaller ids than the node consuming them.
  fn layout(&mut self, id: NodeId) -> Option<&Layout> {
    let evaluation = self.evaluation;
    let mut pending = vec![id];
    while let Some(&next) = pending.last() {
      if self.cache.contains_key(&next) {
        pending.pop();
        continue;
      }
      let node = evaluation.node(next)?;
      let missing: Vec<NodeId> = node
        .operands()
        .iter()
        .copied()
        .filter(|operand| !self.cache.contains_key(operand))
        .collect();
      if missing.is_empty() {
        pending.pop();
        trace!(node = %next, "laying out");
        let layout = self.build(next, node)?;
        self.cache.insert(next, layout);
      } else {
        pending.extend(missing);
      }
    }
    self.cache.get(&id)
  }

  fn power(&self, id: NodeId) -> Option<BindingPower> {
    self.cache.get(&id).map(|layout| layout.power)
  }

  fn build(&self, id: NodeId, node: &Node) -> Option<Layout> {
    let layout = match node {
      Node::Literal => Layout {
        parts: number_items(self.evaluation.value(id)?)
          .into_iter()
          .map(Part::Item)
          .collect(),
        power: BindingPower::ATOM,
      },
      Node::VarRef { name } => Layout {
        parts: vec![Part::Item(Item::Identifier(name.clone()))],
        power: BindingPower::ATOM,
      },
      Node::Bind { name, source } => Layout {
        parts: vec![
          Part::Item(Item::Identifier(name.clone())),
          Part::Item(Item::operator("≔")),
          Part::Splice(Slot::Bare(*source)),
        ],
        power: BindingPower::BIND,
      },
      Node::Apply { operator, args } => self.build_apply(operator, args)?,
    };
    Some(layout)
  }

  fn build_apply(
    &self,
    operator: &Builtin,
    args: &[NodeId],
  ) -> Option<Layout> {
    let power = operator.notation.binding_power();
    let parts = match (operator.notation, args) {
      (Notation::Additive | Notation::Multiplicative, &[a, b]) => vec![
        Part::Splice(Slot::new(a, self.power(a)?.right < power.left)),
        Part::Item(Item::operator(operator.display())),
        Part::Splice(Slot::new(b, self.power(b)?.left < power.right)),
      ],
      (Notation::Fraction, &[numerator, denominator]) => {
        vec![Part::Fraction(numerator, denominator)]
      }
      (Notation::Radical, &[radicand]) => vec![Part::Radical(radicand)],
      (Notation::Power, &[base, exponent]) => {
        let wrap = self.power(base)?.right < power.left;
        vec![Part::Superscript(Slot::new(base, wrap), exponent)]
      }
      _ => {
        let mut parts =
          vec![Part::Item(Item::Identifier(operator.display().to_string()))];
        if !args.is_empty() {
          parts.push(Part::Item(Item::operator("(")));
          for (i, &arg) in args.iter().enumerate() {
            if i > 0 {
              parts.push(Part::Item(Item::operator(",")));
            }
            parts.push(Part::Splice(Slot::Bare(arg)));
          }
          parts.push(Part::Item(Item::operator(")")));
        }
        return Some(Layout {
          parts,
          power: BindingPower::ATOM,
        });
      }
    };
    Some(Layout { parts, power })
  }

  fn parts(&self, id: NodeId) -> Option<std::slice::Iter<'_, Part>> {
    self.cache.get(&id).map(|layout| layout.parts.iter())
  }

  // Expands a laid-out node into items with an explicit work stack. Bare
  // splices write straight into the enclosing row, so a long chain is
  // emitted in time linear in its output.
  fn expand(&self, id: NodeId) -> Option<Vec<Item>> {
    let mut rows: Vec<Vec<Item>> = vec![Vec::new()];
    let mut tasks = vec![Task::Emit(self.parts(id)?)];

    while let Some(task) = tasks.pop() {
      match task {
        Task::Emit(mut parts) => {
          let Some(part) = parts.next() else {
            continue;
          };
          tasks.push(Task::Emit(parts));
          match part {
            Part::Item(item) => rows.last_mut()?.push(item.clone()),
            Part::Splice(slot) => self.schedule(*slot, &mut tasks)?,
            &Part::Fraction(numerator, denominator) => {
              tasks.push(Task::Close(Close::Fraction));
              tasks.push(Task::Emit(self.parts(denominator)?));
              tasks.push(Task::Open);
              tasks.push(Task::Emit(self.parts(numerator)?));
              tasks.push(Task::Open);
            }
            &Part::Radical(radicand) => {
              tasks.push(Task::Close(Close::Radical));
              tasks.push(Task::Emit(self.parts(radicand)?));
              tasks.push(Task::Open);
            }
            &Part::Superscript(base, exponent) => {
              tasks.push(Task::Close(Close::Superscript));
              tasks.push(Task::Emit(self.parts(exponent)?));
              tasks.push(Task::Open);
              self.schedule(base, &mut tasks)?;
              tasks.push(Task::Open);
            }
          }
        }
        Task::Open => rows.push(Vec::new()),
        Task::Close(close) => {
          let inner = rows.pop()?;
          let item = match close {
            Close::Parentheses => {
              let mut row = Vec::with_capacity(inner.len() + 2);
              row.push(Item::operator("("));
              row.extend(inner);
              row.push(Item::operator(")"));
              Item::Row(row)
            }
            Close::Radical => Item::Radical(inner),
            Close::Fraction => Item::Fraction {
              numerator: rows.pop()?,
              denominator: inner,
            },
            Close::Superscript => Item::Superscript {
              base: rows.pop()?,
              exponent: inner,
            },
          };
          rows.last_mut()?.push(item);
        }
      }
    }
    rows.pop()
  }

  fn schedule<'l>(
    &'l self,
    slot: Slot,
    tasks: &mut Vec<Task<'l>>,
  ) -> Option<()> {
    match slot {
      Slot::Bare(id) => tasks.push(Task::Emit(self.parts(id)?)),
      Slot::Wrapped(id) => {
        tasks.push(Task::Close(Close::Parentheses));
        tasks.push(Task::Emit(self.parts(id)?));
        tasks.push(Task::Open);
      }
    }
    Some(())
  }
}

/// One `<expression> = <value>` fragment per top-level result.
pub fn render(evaluation: &Evaluation) -> Vec<Fragment> {
  let mut renderer = Renderer::new(evaluation);
  evaluation
    .top_level
    .iter()
    .filter_map(|&id| renderer.render_equation(id))
    .collect()
}
