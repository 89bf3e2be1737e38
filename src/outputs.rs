use std::collections::BTreeMap;

/// Crisp results keyed by consequent variable name.
#[derive(Debug, Clone, PartialEq)]
pub struct Outputs(BTreeMap<String, f64>);

impl Outputs {
    pub(crate) fn new(defuzzificated: BTreeMap<String, f64>) -> Self {
        Self(defuzzificated)
    }

    pub fn get(&self, variable: &str) -> Option<f64> {
        self.0.get(variable).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, val)| (name.as_str(), *val))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<String, f64> {
        self.0
    }
}
