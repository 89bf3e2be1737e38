use std::collections::{BTreeMap, HashSet};

use slotmap::SecondaryMap;

use crate::dsl::Proposition;
use crate::error::{ConfigError, ConfigResult, InferenceError, InferenceResult};
use crate::inference::{InferenceEngine, InferenceTrace};
use crate::inputs::Inputs;
use crate::ops::DefuzzificationOp;
use crate::outputs::Outputs;
use crate::rules::{Rule, Rules};
use crate::variable::{LinguisticVariable, Variable, VariableKey, Variables};

/// A validated, immutable rule base together with its variables.
///
/// Built once with [`build`](Self::build); queried any number of times, from any
/// number of threads, with [`compute`](Self::compute). Queries never mutate the
/// system, so a failed query leaves it fully usable.
#[derive(Debug, Clone)]
pub struct FuzzyInferenceSystem {
    variables: SecondaryMap<VariableKey, LinguisticVariable>,
    rules: Vec<Rule>,
    // Sorted by name so validation reports errors deterministically
    antecedents: BTreeMap<String, VariableKey>,
    consequents: BTreeMap<String, VariableKey>,
    engine: InferenceEngine,
}

impl FuzzyInferenceSystem {
    /// Validates every variable, shape and rule, failing on the first problem.
    ///
    /// Variables that are read by a rule premise become antecedents, variables
    /// named by a rule consequence become consequents. Defuzzification defaults
    /// to [`DefuzzificationOp::Centroid`].
    pub fn build(variables: Variables, rules: Rules) -> ConfigResult<Self> {
        let mut built = SecondaryMap::with_capacity(variables.len());
        let mut names = HashSet::with_capacity(variables.len());

        for (key, definition) in variables.0 {
            if !names.insert(definition.name.clone()) {
                return Err(ConfigError::DuplicateVariable(definition.name));
            }

            built.insert(key, LinguisticVariable::new(definition)?);
        }

        if rules.is_empty() {
            return Err(ConfigError::EmptyRuleBase);
        }

        let mut antecedents = BTreeMap::new();
        let mut consequents = BTreeMap::new();

        for rule in &rules.0 {
            for prop in rule.premise.propositions() {
                let var = resolve(&built, prop)?;
                antecedents.insert(var.name().to_owned(), prop.var);
            }

            let var = resolve(&built, &rule.consequence)?;
            consequents.insert(var.name().to_owned(), rule.consequence.var);
        }

        if let Some(name) = antecedents.keys().find(|name| consequents.contains_key(*name)) {
            return Err(ConfigError::AmbiguousVariableRole(name.clone()));
        }

        tracing::debug!(
            variables = built.len(),
            rules = rules.len(),
            antecedents = ?antecedents.keys().collect::<Vec<_>>(),
            consequents = ?consequents.keys().collect::<Vec<_>>(),
            "built fuzzy inference system"
        );

        Ok(Self {
            variables: built,
            rules: rules.0,
            antecedents,
            consequents,
            engine: InferenceEngine::default(),
        })
    }

    /// Replaces the defuzzification method.
    pub fn with_defuzzification(mut self, defuzz_op: DefuzzificationOp) -> Self {
        self.engine = InferenceEngine::new(defuzz_op);
        self
    }

    pub fn defuzzification(&self) -> DefuzzificationOp {
        self.engine.defuzz_op()
    }

    /// Crisp outputs for `inputs`, one per consequent variable.
    ///
    /// Every antecedent needs a finite input inside its universe domain. A
    /// consequent whose aggregated output set is empty fails the query with
    /// [`InferenceError::NoActiveRule`]; it never defaults to a number.
    pub fn compute(&self, inputs: &Inputs) -> InferenceResult<Outputs> {
        let outputs = self.trace(inputs)?.outputs();

        if let Err(err) = &outputs {
            tracing::debug!(%err, "query produced no crisp output");
        }

        outputs
    }

    /// Like [`compute`](Self::compute) but returns every intermediate stage.
    /// Consequents for which no rule fired appear with a `None` crisp value.
    pub fn trace(&self, inputs: &Inputs) -> InferenceResult<InferenceTrace> {
        let crisp = self.validate_inputs(inputs)?;
        let trace = self.engine.run(&self.variables, &self.rules, &crisp);

        tracing::debug!(crisp = ?trace.crisp, "computed query");

        Ok(trace)
    }

    fn validate_inputs(&self, inputs: &Inputs) -> InferenceResult<Vec<(VariableKey, f64)>> {
        if let Some(unknown) = inputs
            .0
            .keys()
            .filter(|name| !self.antecedents.contains_key(*name))
            .min()
        {
            return Err(InferenceError::UnknownInput(unknown.clone()));
        }

        self.antecedents
            .iter()
            .map(|(name, &key)| -> InferenceResult<(VariableKey, f64)> {
                let value = inputs
                    .get(name)
                    .ok_or_else(|| InferenceError::MissingInput(name.clone()))?;
                let universe = self.variables[key].universe();

                if !universe.contains(value) {
                    return Err(InferenceError::OutOfDomainInput {
                        variable: name.clone(),
                        value,
                        min: universe.min(),
                        max: universe.max(),
                    });
                }

                Ok((key, value))
            })
            .collect()
    }

    pub fn variable(&self, name: &str) -> Option<&LinguisticVariable> {
        self.antecedents
            .get(name)
            .or_else(|| self.consequents.get(name))
            .and_then(|&key| self.variables.get(key))
    }

    /// Looks up any built variable, including ones no rule refers to.
    pub fn variable_by_handle(&self, var: Variable) -> Option<&LinguisticVariable> {
        self.variables.get(var.key())
    }

    pub fn antecedents(&self) -> impl Iterator<Item = &str> {
        self.antecedents.keys().map(String::as_str)
    }

    pub fn consequents(&self) -> impl Iterator<Item = &str> {
        self.consequents.keys().map(String::as_str)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

fn resolve<'v>(
    variables: &'v SecondaryMap<VariableKey, LinguisticVariable>,
    prop: &Proposition,
) -> ConfigResult<&'v LinguisticVariable> {
    let var = variables.get(prop.var).ok_or(ConfigError::UnknownVariable)?;

    if !var.has_label(&prop.label) {
        return Err(ConfigError::UnknownLabel {
            variable: var.name().to_owned(),
            label: prop.label.clone(),
        });
    }

    Ok(var)
}

#[cfg(test)]
fn score_ratio_decision() -> (Variables, Variable, Variable, Variable) {
    use crate::membership::MembershipFunction;
    use crate::terms::Terms;

    let mut vars = Variables::new();
    let score = vars.add(
        "score",
        0. ..=10.,
        Terms::from_iter([
            ("low", MembershipFunction::trapezoid(0., 0., 3., 6.).unwrap()),
            ("high", MembershipFunction::trapezoid(4., 7., 10., 10.).unwrap()),
        ]),
        Some(1.),
    );
    let ratio = vars.add(
        "ratio",
        0. ..=1.,
        Terms::from_iter([
            ("good", MembershipFunction::trapezoid(0., 0., 0.3, 0.5).unwrap()),
            ("bad", MembershipFunction::trapezoid(0.4, 0.6, 1., 1.).unwrap()),
        ]),
        None,
    );
    let decision = vars.add(
        "decision",
        0. ..=10.,
        Terms::from_iter([
            ("reject", MembershipFunction::trapezoid(0., 0., 2., 5.).unwrap()),
            ("approve", MembershipFunction::trapezoid(5., 8., 10., 10.).unwrap()),
        ]),
        Some(1.),
    );

    (vars, score, ratio, decision)
}

#[test]
fn test_two_antecedents() {
    let (vars, score, ratio, decision) = score_ratio_decision();
    let mut rules = Rules::new();

    rules.add(score.is("high").and(ratio.is("good")), decision.is("approve"));
    rules.add(score.is("low").or(ratio.is("bad")), decision.is("reject"));

    let system = FuzzyInferenceSystem::build(vars, rules).unwrap();
    let inputs = Inputs::from_iter([("score", 5.5), ("ratio", 0.3)]);
    let trace = system.trace(&inputs).unwrap();

    // high(5.5) = 0.5, good(0.3) = 1, low(5.5) = 1/6, bad(0.3) = 0
    assert_eq!(trace.firing_strengths[0], 0.5);
    assert!((trace.firing_strengths[1] - 1. / 6.).abs() < 1e-12);
    assert_eq!(system.antecedents().collect::<Vec<_>>(), vec!["ratio", "score"]);
    assert_eq!(system.consequents().collect::<Vec<_>>(), vec!["decision"]);

    let decision = system.compute(&inputs).unwrap().get("decision").unwrap();
    assert!(decision > 5., "approve dominates, got {decision}");
}

#[test]
fn test_ambiguous_role() {
    let (vars, score, ratio, _) = score_ratio_decision();
    let mut rules = Rules::new();

    rules.add(score.is("high"), ratio.is("good"));
    rules.add(ratio.is("bad"), score.is("low"));

    assert!(matches!(
        FuzzyInferenceSystem::build(vars, rules),
        Err(ConfigError::AmbiguousVariableRole(name)) if name == "ratio" || name == "score"
    ));
}

#[test]
fn test_empty_rule_base() {
    let (vars, ..) = score_ratio_decision();

    assert_eq!(
        FuzzyInferenceSystem::build(vars, Rules::new()).unwrap_err(),
        ConfigError::EmptyRuleBase
    );
}

#[test]
fn test_duplicate_variable() {
    let (mut vars, score, _, decision) = score_ratio_decision();
    vars.add("score", 0. ..=1., crate::terms::Terms::new(), None);

    let mut rules = Rules::new();
    rules.add(score.is("high"), decision.is("approve"));

    assert_eq!(
        FuzzyInferenceSystem::build(vars, rules).unwrap_err(),
        ConfigError::DuplicateVariable("score".into())
    );
}

#[test]
fn test_foreign_variable_handle() {
    let (vars, score, _, _) = score_ratio_decision();
    let (mut other, ..) = score_ratio_decision();
    other.add("padding", 0. ..=1., crate::terms::Terms::new(), None);
    let foreign = other.add("extra", 0. ..=1., crate::terms::Terms::new(), None);
    let mut rules = Rules::new();
    rules.add(score.is("high"), foreign.is("anything"));

    assert_eq!(
        FuzzyInferenceSystem::build(vars, rules).unwrap_err(),
        ConfigError::UnknownVariable
    );
}

#[test]
fn test_input_errors() {
    let (vars, score, ratio, decision) = score_ratio_decision();
    let mut rules = Rules::new();
    rules.add(score.is("high").and(ratio.is("good")), decision.is("approve"));
    let system = FuzzyInferenceSystem::build(vars, rules).unwrap();

    let missing = Inputs::from_iter([("score", 5.)]);
    assert_eq!(
        system.compute(&missing).unwrap_err(),
        InferenceError::MissingInput("ratio".into())
    );

    let unknown = Inputs::from_iter([("score", 5.), ("ratio", 0.2), ("decision", 3.)]);
    assert_eq!(
        system.compute(&unknown).unwrap_err(),
        InferenceError::UnknownInput("decision".into())
    );

    let out_of_domain = Inputs::from_iter([("score", 11.), ("ratio", 0.2)]);
    assert!(matches!(
        system.compute(&out_of_domain),
        Err(InferenceError::OutOfDomainInput { ref variable, value, .. }) if variable == "score" && value == 11.
    ));

    let nan = Inputs::from_iter([("score", f64::NAN), ("ratio", 0.2)]);
    assert!(matches!(system.compute(&nan), Err(InferenceError::OutOfDomainInput { .. })));
}
