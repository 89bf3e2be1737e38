use crate::membership::MembershipFunction;

/// Labeled membership functions for one variable, in insertion order.
///
/// Labels are checked for uniqueness when the system is built.
#[derive(Debug, Clone, Default)]
pub struct Terms(pub(crate) Vec<(String, MembershipFunction)>);

impl Terms {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    pub fn insert(&mut self, label: impl Into<String>, shape: MembershipFunction) {
        self.0.push((label.into(), shape));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<L: Into<String>> FromIterator<(L, MembershipFunction)> for Terms {
    fn from_iter<I: IntoIterator<Item = (L, MembershipFunction)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(label, shape)| (label.into(), shape)).collect())
    }
}
