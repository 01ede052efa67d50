use serde::{Serialize, Serializer};
use std::collections::HashMap;

/// Variable bindings of one evaluation run. The last assignment wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
  bindings: HashMap<String, f64>,
}

impl Environment {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, name: &str) -> Option<f64> {
    self.bindings.get(name).copied()
  }

  /// Bind `name` to `value`, returning the value it replaced.
  pub fn assign(&mut self, name: &str, value: f64) -> Option<f64> {
    self.bindings.insert(name.to_string(), value)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.bindings.contains_key(name)
  }

  pub fn len(&self) -> usize {
    self.bindings.len()
  }

  pub fn is_empty(&self) -> bool {
    self.bindings.is_empty()
  }

  /// Bindings ordered by name.
  pub fn sorted(&self) -> Vec<(&str, f64)> {
    let mut entries: Vec<(&str, f64)> = self
      .bindings
      .iter()
      .map(|(name, value)| (name.as_str(), *value))
      .collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
  }
}

impl Serialize for Environment {
  fn serialize<S: Serializer>(
    &self,
    serializer: S,
  ) -> Result<S::Ok, S::Error> {
    serializer.collect_map(self.sorted())
  }
}
