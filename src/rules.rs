use crate::dsl::{Expr, Proposition};

#[derive(Default, Clone, Debug)]
pub struct Rules(pub(crate) Vec<Rule>);

impl Rules {
    pub fn new() -> Self {
        Rules(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Rules(Vec::with_capacity(capacity))
    }

    /// IF `premise` THEN `consequence`
    pub fn add(&mut self, premise: impl Into<Expr>, consequence: Proposition) {
        self.0.push(Rule {
            premise: premise.into(),
            consequence,
        });
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.0.iter()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Rule {
    pub(crate) premise: Expr,
    pub(crate) consequence: Proposition,
}

impl Rule {
    pub fn premise(&self) -> &Expr {
        &self.premise
    }

    pub fn consequence(&self) -> &Proposition {
        &self.consequence
    }
}
