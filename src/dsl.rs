use crate::variable::{Variable, VariableKey};

/// `variable is label`
#[derive(Clone, Debug, PartialEq)]
pub struct Proposition {
    pub(crate) var: VariableKey,
    pub(crate) label: String,
}

impl Proposition {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn and(self, rhs: impl Into<Expr>) -> Expr {
        Expr::from(self).and(rhs)
    }

    pub fn or(self, rhs: impl Into<Expr>) -> Expr {
        Expr::from(self).or(rhs)
    }
}

/// Rule premise. `And` combines operands with min, `Or` with max.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Is(Proposition),
    And(Vec<Expr>),
    Or(Vec<Expr>),
}

impl Expr {
    pub fn or(self, rhs: impl Into<Expr>) -> Self {
        match self {
            Expr::Or(mut exprs) => {
                exprs.push(rhs.into());
                Expr::Or(exprs)
            },
            lhs => Expr::Or(vec![lhs, rhs.into()]),
        }
    }

    pub fn and(self, rhs: impl Into<Expr>) -> Self {
        match self {
            Expr::And(mut exprs) => {
                exprs.push(rhs.into());
                Expr::And(exprs)
            },
            lhs => Expr::And(vec![lhs, rhs.into()]),
        }
    }

    pub fn propositions(&self) -> Vec<&Proposition> {
        let mut props = Vec::new();

        fn parse<'p>(expr: &'p Expr, out: &mut Vec<&'p Proposition>) {
            match expr {
                Expr::Is(prop) => out.push(prop),
                Expr::And(exprs) | Expr::Or(exprs) => {
                    for expr in exprs {
                        parse(expr, out);
                    }
                },
            }
        }

        parse(self, &mut props);

        props
    }
}

impl From<Proposition> for Expr {
    fn from(prop: Proposition) -> Self {
        Expr::Is(prop)
    }
}

impl Variable {
    pub fn is(self, label: impl Into<String>) -> Proposition {
        Proposition {
            var: self.0,
            label: label.into(),
        }
    }
}

#[test]
fn test_flattening_and_propositions() {
    use crate::terms::Terms;
    use crate::variable::Variables;

    let mut vars = Variables::new();
    let score = vars.add("score", 0. ..=10., Terms::new(), None);
    let ratio = vars.add("ratio", 0. ..=1., Terms::new(), None);
    let premise = score.is("high").and(ratio.is("good")).and(score.is("low"));

    let Expr::And(operands) = &premise else {
        panic!("expected a flat conjunction");
    };
    assert_eq!(operands.len(), 3);

    let labels: Vec<_> = premise.propositions().into_iter().map(Proposition::label).collect();
    assert_eq!(labels, vec!["high", "good", "low"]);

    let mixed = score.is("high").or(ratio.is("good").and(score.is("low")));
    assert_eq!(mixed.propositions().len(), 3);
    assert!(matches!(mixed, Expr::Or(ref operands) if matches!(operands[1], Expr::And(_))));
}
