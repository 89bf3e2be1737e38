use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use slotmap::{new_key_type, SlotMap};

use crate::error::{ConfigError, ConfigResult};
use crate::membership::MembershipFunction;
use crate::terms::Terms;
use crate::universe::{Universe, DEFAULT_STEP};

new_key_type! {
    /// A variable key
    pub struct VariableKey;
}

/// Handle to a variable registered in [`Variables`]; used to write rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Variable(pub(crate) VariableKey);

impl Variable {
    pub fn key(self) -> VariableKey {
        self.0
    }
}

/// Variable definitions collected before a system is built. Nothing is
/// validated until [`FuzzyInferenceSystem::build`](crate::FuzzyInferenceSystem::build).
#[derive(Default)]
pub struct Variables(pub(crate) SlotMap<VariableKey, VariableDefinition>);

impl Variables {
    pub fn new() -> Self {
        Self(SlotMap::with_key())
    }

    /// If the step value is not provided, it defaults to [`DEFAULT_STEP`]
    pub fn add(
        &mut self,
        name: impl Into<String>,
        universe_range: RangeInclusive<f64>,
        terms: Terms,
        step: Option<f64>,
    ) -> Variable {
        let key = self.0.insert(VariableDefinition {
            name: name.into(),
            universe_range,
            step: step.unwrap_or(DEFAULT_STEP),
            terms,
        });

        Variable(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub(crate) struct VariableDefinition {
    pub(crate) name: String,
    pub(crate) universe_range: RangeInclusive<f64>,
    pub(crate) step: f64,
    pub(crate) terms: Terms,
}

/// A named numeric axis with labeled membership functions over one universe.
///
/// Immutable once built. Every shape is also pre-sampled over the universe grid,
/// which is what implication clips at query time.
#[derive(Debug, Clone)]
pub struct LinguisticVariable {
    name: String,
    universe: Universe,
    terms: BTreeMap<String, MembershipFunction>,
    sampled: BTreeMap<String, Vec<f64>>,
}

impl LinguisticVariable {
    pub(crate) fn new(definition: VariableDefinition) -> ConfigResult<Self> {
        let VariableDefinition {
            name,
            universe_range,
            step,
            terms,
        } = definition;
        let universe = Universe::new(&name, universe_range, step)?;
        let mut labeled = BTreeMap::new();
        let mut sampled = BTreeMap::new();

        for (label, shape) in terms.0 {
            shape.validate()?;

            let (lo, hi) = shape.bounds();

            if !universe.contains(lo) || !universe.contains(hi) {
                return Err(ConfigError::ShapeOutsideUniverse {
                    variable: name,
                    label,
                    min: universe.min(),
                    max: universe.max(),
                });
            }
            if labeled.contains_key(&label) {
                return Err(ConfigError::DuplicateLabel { variable: name, label });
            }

            sampled.insert(label.clone(), shape.sample(universe.points()));
            labeled.insert(label, shape);
        }

        Ok(Self {
            name,
            universe,
            terms: labeled,
            sampled,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(String::as_str)
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.terms.contains_key(label)
    }

    pub fn membership_function(&self, label: &str) -> Option<&MembershipFunction> {
        self.terms.get(label)
    }

    /// Degree of `value` in every label. No clamping: values outside the
    /// universe still get well-defined (usually zero) degrees.
    pub fn fuzzify(&self, value: f64) -> BTreeMap<String, f64> {
        self.terms
            .iter()
            .map(|(label, shape)| (label.clone(), shape.degree(value)))
            .collect()
    }

    /// The shape of `label` sampled over the universe grid.
    pub fn sample(&self, label: &str) -> Option<&[f64]> {
        self.sampled.get(label).map(Vec::as_slice)
    }
}

#[cfg(test)]
fn temperature() -> LinguisticVariable {
    let terms = Terms::from_iter([
        ("cold", MembershipFunction::trapezoid(0., 0., 10., 15.).unwrap()),
        ("warm", MembershipFunction::triangle(10., 20., 30.).unwrap()),
        ("hot", MembershipFunction::trapezoid(25., 30., 40., 40.).unwrap()),
    ]);

    LinguisticVariable::new(VariableDefinition {
        name: "temperature".into(),
        universe_range: 0. ..=40.,
        step: 1.,
        terms,
    })
    .unwrap()
}

#[test]
fn test_fuzzify_overlap() {
    let degrees = temperature().fuzzify(12.5);

    assert_eq!(degrees["cold"], 0.5);
    assert_eq!(degrees["warm"], 0.25);
    assert_eq!(degrees["hot"], 0.);
}

#[test]
fn test_fuzzify_does_not_clamp() {
    let degrees = temperature().fuzzify(55.);

    assert!(degrees.values().all(|&d| d == 0.));
    assert_eq!(degrees.len(), 3);
}

#[test]
fn test_sampled_shapes() {
    let temperature = temperature();
    let hot = temperature.sample("hot").unwrap();

    assert_eq!(hot.len(), temperature.universe().len());
    assert_eq!(hot[40], 1.);
    assert_eq!(hot[25], 0.);
    assert!(temperature.sample("freezing").is_none());
}

#[test]
fn test_duplicate_label() {
    let terms = Terms::from_iter([
        ("cold", MembershipFunction::triangle(0., 0., 10.).unwrap()),
        ("cold", MembershipFunction::triangle(0., 5., 10.).unwrap()),
    ]);
    let result = LinguisticVariable::new(VariableDefinition {
        name: "temperature".into(),
        universe_range: 0. ..=40.,
        step: 1.,
        terms,
    });

    assert!(matches!(result, Err(ConfigError::DuplicateLabel { .. })));
}

#[test]
fn test_shape_outside_universe() {
    let terms = Terms::from_iter([("scorching", MembershipFunction::triangle(35., 45., 55.).unwrap())]);
    let result = LinguisticVariable::new(VariableDefinition {
        name: "temperature".into(),
        universe_range: 0. ..=40.,
        step: 1.,
        terms,
    });

    assert!(matches!(result, Err(ConfigError::ShapeOutsideUniverse { .. })));
}

#[test]
fn test_unvalidated_shape_is_rejected() {
    let mut terms = Terms::new();
    terms.insert("broken", MembershipFunction::Trapezoid { a: 10., b: 5., c: 20., d: 30. });

    let result = LinguisticVariable::new(VariableDefinition {
        name: "temperature".into(),
        universe_range: 0. ..=40.,
        step: 1.,
        terms,
    });

    assert!(matches!(result, Err(ConfigError::MalformedMembershipFunction(_))));
}
