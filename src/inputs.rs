use std::collections::HashMap;

/// Crisp query values keyed by antecedent variable name.
#[derive(Default, Clone, Debug)]
pub struct Inputs(pub(crate) HashMap<String, f64>);

impl Inputs {
    pub fn new() -> Self {
        Inputs(HashMap::new())
    }

    pub fn add(&mut self, variable: impl Into<String>, val: f64) {
        self.0.insert(variable.into(), val);
    }

    pub fn get(&self, variable: &str) -> Option<f64> {
        self.0.get(variable).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for Inputs {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Inputs(iter.into_iter().map(|(name, val)| (name.into(), val)).collect())
    }
}
