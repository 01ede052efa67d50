//! Presenters that turn render fragments into text.

use std::fmt;

use crate::render::{Fragment, Item};

/// Linear plain-text form, e.g. `1 - (2 × 3)/4 + 5 = 4.5`.
pub fn to_text(items: &[Item]) -> String {
  let mut text = String::new();
  for (i, item) in items.iter().enumerate() {
    if !hugs_previous(items, i) {
      text.push(' ');
    }
    text.push_str(&item_text(item));
  }
  text
}

// Brackets and commas sit flush: `(a + b)`, `sin(x, y)`.
fn hugs_previous(items: &[Item], i: usize) -> bool {
  let Some(previous) = i.checked_sub(1).map(|p| &items[p]) else {
    return true;
  };
  match (previous, &items[i]) {
    (Item::Operator(p), _) if p == "(" => true,
    (_, Item::Operator(s)) if s == ")" || s == "," => true,
    (Item::Identifier(_), Item::Operator(s)) if s == "(" => true,
    _ => false,
  }
}

// Operands of `/`, `^` and `√` are grouped in linear text unless they are
// a single simple item.
fn grouped_text(items: &[Item]) -> String {
  let text = to_text(items);
  let compound = match items {
    [Item::Fraction { .. } | Item::Superscript { .. }] => true,
    [_] => false,
    _ => true,
  };
  if compound {
    format!("({})", text)
  } else {
    text
  }
}

fn item_text(item: &Item) -> String {
  match item {
    Item::Number(s) | Item::Identifier(s) | Item::Operator(s) => s.clone(),
    Item::Row(items) => match items.as_slice() {
      [Item::Operator(sign), Item::Number(n)] if sign == "-" => {
        format!("-{}", n)
      }
      _ => to_text(items),
    },
    Item::Fraction {
      numerator,
      denominator,
    } => format!("{}/{}", grouped_text(numerator), grouped_text(denominator)),
    Item::Radical(items) => format!("√{}", grouped_text(items)),
    Item::Superscript { base, exponent } => {
      format!("{}^{}", grouped_text(base), grouped_text(exponent))
    }
  }
}

fn xml_escape(s: &str) -> String {
  s.replace('&', "&amp;")
    .replace('<', "&lt;")
    .replace('>', "&gt;")
}

fn row_markup(items: &[Item]) -> String {
  let inner: String = items.iter().map(item_markup).collect();
  format!("<mrow>{}</mrow>", inner)
}

fn item_markup(item: &Item) -> String {
  match item {
    Item::Number(s) => format!("<mn>{}</mn>", xml_escape(s)),
    Item::Identifier(s) => format!("<mi>{}</mi>", xml_escape(s)),
    Item::Operator(s) => format!("<mo>{}</mo>", xml_escape(s)),
    Item::Row(items) => row_markup(items),
    Item::Fraction {
      numerator,
      denominator,
    } => format!(
      "<mfrac>{}{}</mfrac>",
      row_markup(numerator),
      row_markup(denominator)
    ),
    Item::Radical(items) => {
      let inner: String = items.iter().map(item_markup).collect();
      format!("<msqrt>{}</msqrt>", inner)
    }
    Item::Superscript { base, exponent } => format!(
      "<msup>{}{}</msup>",
      row_markup(base),
      row_markup(exponent)
    ),
  }
}

/// A MathML `<math>` element for the fragment.
pub fn to_mathml(items: &[Item]) -> String {
  let inner: String = items.iter().map(item_markup).collect();
  format!("<math display=\"block\">{}</math>", inner)
}

impl fmt::Display for Fragment {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&to_text(self.items()))
  }
}
