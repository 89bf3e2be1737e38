use std::collections::BTreeMap;

use slotmap::SecondaryMap;

use crate::dsl::Expr;
use crate::error::{InferenceError, InferenceResult};
use crate::ops::{self, DefuzzificationOp};
use crate::outputs::Outputs;
use crate::rules::Rule;
use crate::variable::{LinguisticVariable, VariableKey};

/// Degrees per label, per variable.
pub(crate) type Degrees = SecondaryMap<VariableKey, BTreeMap<String, f64>>;

/// The Mamdani pipeline: `fuzzify -> evaluate -> implicate -> aggregate -> defuzzify`.
///
/// Every stage is a pure function of the previous stage's output and the
/// immutable variables and rules; nothing survives a query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct InferenceEngine {
    defuzz_op: DefuzzificationOp,
}

impl InferenceEngine {
    pub(crate) fn new(defuzz_op: DefuzzificationOp) -> Self {
        Self { defuzz_op }
    }

    pub(crate) fn defuzz_op(&self) -> DefuzzificationOp {
        self.defuzz_op
    }

    /// Runs every stage over already-validated crisp inputs.
    pub(crate) fn run(
        &self,
        variables: &SecondaryMap<VariableKey, LinguisticVariable>,
        rules: &[Rule],
        crisp: &[(VariableKey, f64)],
    ) -> InferenceTrace {
        let fuzzified = self.fuzzify(variables, crisp);
        tracing::trace!(?fuzzified, "fuzzified inputs");

        let firing_strengths = self.evaluate(rules, &fuzzified);
        tracing::trace!(?firing_strengths, "evaluated rules");

        let label_strengths = self.implicate(rules, &firing_strengths);
        let aggregated = self.aggregate(variables, &label_strengths);
        tracing::trace!(consequents = aggregated.len(), "aggregated rule outputs");

        let crisp_outputs = self.defuzzify(variables, &aggregated);

        let name_of = |key: VariableKey| variables[key].name().to_owned();

        InferenceTrace {
            fuzzified: fuzzified.into_iter().map(|(k, v)| (name_of(k), v)).collect(),
            firing_strengths,
            label_strengths: label_strengths.into_iter().map(|(k, v)| (name_of(k), v)).collect(),
            aggregated: aggregated.into_iter().map(|(k, v)| (name_of(k), v)).collect(),
            crisp: crisp_outputs.into_iter().map(|(k, v)| (name_of(k), v)).collect(),
        }
    }

    // Fuzzificate crisp facts into per-label degrees
    fn fuzzify(
        &self,
        variables: &SecondaryMap<VariableKey, LinguisticVariable>,
        crisp: &[(VariableKey, f64)],
    ) -> Degrees {
        crisp
            .iter()
            .map(|&(key, value)| (key, variables[key].fuzzify(value)))
            .collect()
    }

    // Firing strength of every rule, in rule order
    fn evaluate(&self, rules: &[Rule], fuzzified: &Degrees) -> Vec<f64> {
        fn strength(expr: &Expr, fuzzified: &Degrees) -> f64 {
            match expr {
                Expr::Is(prop) => fuzzified
                    .get(prop.var)
                    .and_then(|degrees| degrees.get(&prop.label))
                    .copied()
                    .unwrap_or(0.),
                Expr::And(exprs) => ops::and(exprs.iter().map(|expr| strength(expr, fuzzified))),
                Expr::Or(exprs) => ops::or(exprs.iter().map(|expr| strength(expr, fuzzified))),
            }
        }

        rules.iter().map(|rule| strength(&rule.premise, fuzzified)).collect()
    }

    // Rules sharing a consequent label fold into one clip level by max.
    // max(min(s1, m), min(s2, m)) == min(max(s1, s2), m), so this is exactly
    // clipping each rule and combining the clipped shapes.
    fn implicate(&self, rules: &[Rule], firing_strengths: &[f64]) -> Degrees {
        let mut label_strengths = Degrees::new();

        for (rule, &strength) in rules.iter().zip(firing_strengths) {
            let Some(labels) = label_strengths.entry(rule.consequence.var) else {
                continue;
            };
            let level = labels.or_default().entry(rule.consequence.label.clone()).or_insert(0.);

            *level = f64::max(*level, strength);
        }

        label_strengths
    }

    // Pointwise max over the clipped shapes of every consequent label
    fn aggregate(
        &self,
        variables: &SecondaryMap<VariableKey, LinguisticVariable>,
        label_strengths: &Degrees,
    ) -> SecondaryMap<VariableKey, Vec<f64>> {
        label_strengths
            .iter()
            .map(|(key, strengths)| {
                let var = &variables[key];
                let mut agg = vec![0.; var.universe().len()];

                for (label, &strength) in strengths {
                    if let Some(shape) = var.sample(label) {
                        ops::aggregate(&mut agg, ops::implicate(strength, shape));
                    }
                }

                (key, agg)
            })
            .collect()
    }

    fn defuzzify(
        &self,
        variables: &SecondaryMap<VariableKey, LinguisticVariable>,
        aggregated: &SecondaryMap<VariableKey, Vec<f64>>,
    ) -> SecondaryMap<VariableKey, Option<f64>> {
        aggregated
            .iter()
            .map(|(key, agg)| (key, self.defuzz_op.call(variables[key].universe().points(), agg)))
            .collect()
    }
}

/// Every intermediate result of one query, keyed by variable name.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceTrace {
    /// Antecedent variable -> label -> degree of the crisp input
    pub fuzzified: BTreeMap<String, BTreeMap<String, f64>>,
    /// Firing strength of each rule, in the order the rules were added
    pub firing_strengths: Vec<f64>,
    /// Consequent variable -> label -> clip level
    pub label_strengths: BTreeMap<String, BTreeMap<String, f64>>,
    /// Consequent variable -> aggregated degree at every universe sample
    pub aggregated: BTreeMap<String, Vec<f64>>,
    /// Consequent variable -> crisp value, `None` when nothing fired
    pub crisp: BTreeMap<String, Option<f64>>,
}

impl InferenceTrace {
    /// The crisp outputs, failing with [`InferenceError::NoActiveRule`] for the
    /// first consequent (by name) whose aggregated set is empty.
    pub fn outputs(&self) -> InferenceResult<Outputs> {
        self.crisp
            .iter()
            .map(|(name, value)| {
                value
                    .map(|value| (name.clone(), value))
                    .ok_or_else(|| InferenceError::NoActiveRule(name.clone()))
            })
            .collect::<InferenceResult<BTreeMap<_, _>>>()
            .map(Outputs::new)
    }
}
