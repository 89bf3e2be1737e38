//! End-to-end queries against the temperature -> fan speed rule base.

use fuzzy_fan::presets::{self, FAN_SPEED, TEMPERATURE};
use fuzzy_fan::{
    ConfigError, DefuzzificationOp, FuzzyInferenceSystem, InferenceError, Inputs, MembershipFunction, Rules, Terms,
    Variables,
};
use rayon::prelude::*;

const LOW_CENTROID: f64 = 17.366197183098592;
const HIGH_CENTROID: f64 = 82.63380281690141;
// Discrete centroid at 12.5 °C (cold = 0.5, warm = 0.25) on the step-1 grid
const OVERLAP_CENTROID: f64 = 28.03435114503817;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn fan_speed(system: &FuzzyInferenceSystem, temperature: f64) -> Result<f64, InferenceError> {
    let outputs = system.compute(&Inputs::from_iter([(TEMPERATURE, temperature)]))?;

    Ok(outputs.get(FAN_SPEED).expect("fan_speed is the only consequent"))
}

/// The fan controller with its three rules added in `order`.
fn fan_controller_in_order(order: [usize; 3]) -> FuzzyInferenceSystem {
    let mut vars = Variables::new();
    let temperature = vars.add(
        TEMPERATURE,
        0. ..=40.,
        Terms::from_iter([
            ("cold", MembershipFunction::trapezoid(0., 0., 10., 15.).unwrap()),
            ("warm", MembershipFunction::triangle(10., 20., 30.).unwrap()),
            ("hot", MembershipFunction::trapezoid(25., 30., 40., 40.).unwrap()),
        ]),
        Some(1.),
    );
    let fan = vars.add(
        FAN_SPEED,
        0. ..=100.,
        Terms::from_iter([
            ("low", MembershipFunction::trapezoid(0., 0., 30., 40.).unwrap()),
            ("medium", MembershipFunction::triangle(30., 50., 70.).unwrap()),
            ("high", MembershipFunction::trapezoid(60., 70., 100., 100.).unwrap()),
        ]),
        Some(1.),
    );
    let pairs = [("cold", "low"), ("warm", "medium"), ("hot", "high")];
    let mut rules = Rules::new();

    for i in order {
        let (antecedent, consequent) = pairs[i];
        rules.add(temperature.is(antecedent), fan.is(consequent));
    }

    FuzzyInferenceSystem::build(vars, rules).unwrap()
}

#[test]
fn test_fully_cold() {
    init_tracing();
    let system = presets::fan_controller().unwrap();
    let trace = system.trace(&Inputs::from_iter([(TEMPERATURE, 5.)])).unwrap();

    assert_eq!(trace.firing_strengths, vec![1., 0., 0.]);

    let low = system.variable(FAN_SPEED).unwrap().sample("low").unwrap();
    assert_eq!(trace.aggregated[FAN_SPEED], low);

    let speed = fan_speed(&system, 5.).unwrap();
    assert!((speed - LOW_CENTROID).abs() < 1e-9, "got {speed}");
    assert_eq!(format!("{speed:.2}"), "17.37");
}

#[test]
fn test_warm_apex_is_symmetric() {
    let system = presets::fan_controller().unwrap();
    let trace = system.trace(&Inputs::from_iter([(TEMPERATURE, 20.)])).unwrap();
    let medium = system.variable(FAN_SPEED).unwrap().sample("medium").unwrap();

    assert_eq!(trace.firing_strengths, vec![0., 1., 0.]);
    assert_eq!(trace.aggregated[FAN_SPEED], medium);
    assert!((fan_speed(&system, 20.).unwrap() - 50.).abs() < 1e-9);
}

#[test]
fn test_overlapping_labels_blend() {
    let system = presets::fan_controller().unwrap();
    let trace = system.trace(&Inputs::from_iter([(TEMPERATURE, 12.5)])).unwrap();

    assert_eq!(trace.fuzzified[TEMPERATURE]["cold"], 0.5);
    assert_eq!(trace.fuzzified[TEMPERATURE]["warm"], 0.25);
    assert_eq!(trace.label_strengths[FAN_SPEED]["low"], 0.5);
    assert_eq!(trace.label_strengths[FAN_SPEED]["medium"], 0.25);

    let blended = fan_speed(&system, 12.5).unwrap();
    let cold = fan_speed(&system, 5.).unwrap();
    let warm = fan_speed(&system, 20.).unwrap();

    assert!(cold < blended && blended < warm, "{cold} < {blended} < {warm}");
    assert!((blended - OVERLAP_CENTROID).abs() < 1e-9, "got {blended}");
}

#[test]
fn test_rule_order_is_irrelevant() {
    let permutations = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
    let reference = fan_controller_in_order(permutations[0]);

    for order in &permutations[1..] {
        let system = fan_controller_in_order(*order);

        for temperature in [0., 5., 12.5, 14., 20., 26., 27.5, 33.3, 40.] {
            let inputs = Inputs::from_iter([(TEMPERATURE, temperature)]);
            let expected = reference.trace(&inputs).unwrap();
            let actual = system.trace(&inputs).unwrap();

            assert_eq!(actual.aggregated, expected.aggregated, "order {order:?} at {temperature}");
            assert_eq!(
                actual.crisp[FAN_SPEED].map(f64::to_bits),
                expected.crisp[FAN_SPEED].map(f64::to_bits)
            );
        }
    }
}

#[test]
fn test_upper_edge_is_fully_hot() {
    let system = presets::fan_controller().unwrap();
    let trace = system.trace(&Inputs::from_iter([(TEMPERATURE, 40.)])).unwrap();

    assert_eq!(trace.firing_strengths, vec![0., 0., 1.]);

    let speed = fan_speed(&system, 40.).unwrap();
    assert!(speed > 70., "got {speed}");
    assert!((speed - HIGH_CENTROID).abs() < 1e-9, "got {speed}");
}

#[test]
fn test_compute_is_deterministic() {
    let system = presets::fan_controller().unwrap();

    for temperature in [0., 7.25, 12.5, 22.2, 28., 40.] {
        let first = fan_speed(&system, temperature).unwrap();
        let second = fan_speed(&system, temperature).unwrap();

        assert_eq!(first.to_bits(), second.to_bits());
    }
}

#[test]
fn test_parallel_queries_match_sequential() {
    let system = presets::fan_controller().unwrap();
    let temperatures: Vec<f64> = (0..=400).map(|i| i as f64 / 10.).collect();

    let sequential: Vec<u64> = temperatures
        .iter()
        .map(|&t| fan_speed(&system, t).unwrap().to_bits())
        .collect();
    let parallel: Vec<u64> = temperatures
        .par_iter()
        .map(|&t| fan_speed(&system, t).unwrap().to_bits())
        .collect();

    assert_eq!(sequential, parallel);
}

#[test]
fn test_out_of_domain_input_leaves_system_usable() {
    let system = presets::fan_controller().unwrap();

    for temperature in [-0.5, 40.01, f64::INFINITY, f64::NAN] {
        assert!(matches!(
            fan_speed(&system, temperature),
            Err(InferenceError::OutOfDomainInput { ref variable, .. }) if variable == TEMPERATURE
        ));
    }

    assert!((fan_speed(&system, 20.).unwrap() - 50.).abs() < 1e-9);
}

#[test]
fn test_coverage_gap_has_no_active_rule() {
    init_tracing();
    let mut vars = Variables::new();
    let temperature = vars.add(
        TEMPERATURE,
        0. ..=40.,
        Terms::from_iter([
            ("cold", MembershipFunction::trapezoid(0., 0., 10., 15.).unwrap()),
            ("hot", MembershipFunction::trapezoid(25., 30., 40., 40.).unwrap()),
        ]),
        Some(1.),
    );
    let fan = vars.add(
        FAN_SPEED,
        0. ..=100.,
        Terms::from_iter([
            ("low", MembershipFunction::trapezoid(0., 0., 30., 40.).unwrap()),
            ("high", MembershipFunction::trapezoid(60., 70., 100., 100.).unwrap()),
        ]),
        Some(1.),
    );
    let mut rules = Rules::new();
    rules.add(temperature.is("cold"), fan.is("low"));
    rules.add(temperature.is("hot"), fan.is("high"));

    let system = FuzzyInferenceSystem::build(vars, rules).unwrap();

    assert_eq!(
        fan_speed(&system, 20.),
        Err(InferenceError::NoActiveRule(FAN_SPEED.into()))
    );

    let trace = system.trace(&Inputs::from_iter([(TEMPERATURE, 20.)])).unwrap();
    assert!(trace.aggregated[FAN_SPEED].iter().all(|&m| m == 0.));
    assert_eq!(trace.crisp[FAN_SPEED], None);

    assert!((fan_speed(&system, 5.).unwrap() - LOW_CENTROID).abs() < 1e-9);
}

#[test]
fn test_malformed_shape_fails_build() {
    let mut vars = Variables::new();
    let mut temperature_terms = Terms::new();
    temperature_terms.insert("cold", MembershipFunction::Trapezoid { a: 10., b: 5., c: 20., d: 30. });
    let temperature = vars.add(TEMPERATURE, 0. ..=40., temperature_terms, Some(1.));
    let fan = vars.add(
        FAN_SPEED,
        0. ..=100.,
        Terms::from_iter([("low", MembershipFunction::trapezoid(0., 0., 30., 40.).unwrap())]),
        Some(1.),
    );
    let mut rules = Rules::new();
    rules.add(temperature.is("cold"), fan.is("low"));

    assert!(matches!(
        FuzzyInferenceSystem::build(vars, rules),
        Err(ConfigError::MalformedMembershipFunction(_))
    ));
}

#[test]
fn test_unknown_consequent_label_fails_build() {
    let mut vars = Variables::new();
    let temperature = vars.add(
        TEMPERATURE,
        0. ..=40.,
        Terms::from_iter([("hot", MembershipFunction::trapezoid(25., 30., 40., 40.).unwrap())]),
        Some(1.),
    );
    let fan = vars.add(
        FAN_SPEED,
        0. ..=100.,
        Terms::from_iter([("high", MembershipFunction::trapezoid(60., 70., 100., 100.).unwrap())]),
        Some(1.),
    );
    let mut rules = Rules::new();
    rules.add(temperature.is("hot"), fan.is("extreme"));

    assert_eq!(
        FuzzyInferenceSystem::build(vars, rules).unwrap_err(),
        ConfigError::UnknownLabel {
            variable: FAN_SPEED.into(),
            label: "extreme".into(),
        }
    );
}

#[test]
fn test_alternative_defuzzification() {
    let system = presets::fan_controller()
        .unwrap()
        .with_defuzzification(DefuzzificationOp::MeanOfMaximum);

    assert_eq!(system.defuzzification(), DefuzzificationOp::MeanOfMaximum);
    // low plateau covers 0..=30 on the integer grid
    assert_eq!(fan_speed(&system, 5.).unwrap(), 15.);

    let system = system.with_defuzzification(DefuzzificationOp::LargestOfMaximum);
    assert_eq!(fan_speed(&system, 5.).unwrap(), 30.);

    let system = system.with_defuzzification(DefuzzificationOp::SmallestOfMaximum);
    assert_eq!(fan_speed(&system, 40.).unwrap(), 70.);

    let system = system.with_defuzzification(DefuzzificationOp::Bisector);
    assert_eq!(fan_speed(&system, 20.).unwrap(), 50.);
}

#[test]
fn test_finer_grid_approaches_continuous_centroid() {
    let coarse = presets::fan_controller().unwrap();
    let fine = presets::fan_controller_with_step(0.1).unwrap();

    // Continuous centroid of Trapezoid{0, 0, 30, 40}
    let exact = (30. * 15. + 5. * (30. + 10. / 3.)) / 35.;
    let coarse_error = (fan_speed(&coarse, 5.).unwrap() - exact).abs();
    let fine_error = (fan_speed(&fine, 5.).unwrap() - exact).abs();

    assert!(fine_error < coarse_error, "{fine_error} >= {coarse_error}");
    assert!(fine_error < 0.05, "got {fine_error}");
}

#[test]
fn test_shared_consequent_label_clips_at_strongest_rule() {
    let mut vars = Variables::new();
    let temperature = vars.add(
        TEMPERATURE,
        0. ..=40.,
        Terms::from_iter([
            ("cold", MembershipFunction::trapezoid(0., 0., 10., 15.).unwrap()),
            ("warm", MembershipFunction::triangle(10., 20., 30.).unwrap()),
        ]),
        Some(1.),
    );
    let fan = vars.add(
        FAN_SPEED,
        0. ..=100.,
        Terms::from_iter([("medium", MembershipFunction::triangle(30., 50., 70.).unwrap())]),
        Some(1.),
    );
    let mut rules = Rules::new();
    rules.add(temperature.is("warm"), fan.is("medium"));
    rules.add(temperature.is("cold"), fan.is("medium"));

    let system = FuzzyInferenceSystem::build(vars, rules).unwrap();
    // cold = 0.5, warm = 0.25
    let trace = system.trace(&Inputs::from_iter([(TEMPERATURE, 12.5)])).unwrap();

    assert_eq!(trace.firing_strengths, vec![0.25, 0.5]);
    assert_eq!(trace.label_strengths[FAN_SPEED]["medium"], 0.5);

    let medium = system.variable(FAN_SPEED).unwrap().sample("medium").unwrap();
    let clipped: Vec<f64> = medium.iter().map(|&m| f64::min(0.5, m)).collect();

    assert_eq!(trace.aggregated[FAN_SPEED], clipped);
    assert_eq!(trace.aggregated[FAN_SPEED].iter().copied().fold(0., f64::max), 0.5);
}
