//! Property-based tests for membership shapes and rule aggregation.

use fuzzy_fan::presets::{self, FAN_SPEED, TEMPERATURE};
use fuzzy_fan::{FuzzyInferenceSystem, Inputs, MembershipFunction, Rules, Terms, Variables};
use proptest::prelude::*;

// ===== Strategies for generating test data =====

/// Sorted breakpoints in [-100, 100], with frequent ties to hit degenerate edges
fn arb_breakpoints(n: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(prop_oneof![(-100i32..=100).prop_map(f64::from), -100.0..100.0f64], n).prop_map(|mut v| {
        v.sort_by(f64::total_cmp);
        v
    })
}

fn arb_triangle() -> impl Strategy<Value = (f64, f64, f64)> {
    arb_breakpoints(3).prop_map(|v| (v[0], v[1], v[2]))
}

fn arb_trapezoid() -> impl Strategy<Value = (f64, f64, f64, f64)> {
    arb_breakpoints(4).prop_map(|v| (v[0], v[1], v[2], v[3]))
}

fn arb_x() -> impl Strategy<Value = f64> {
    prop_oneof![-150.0..150.0f64, (-150i32..=150).prop_map(f64::from)]
}

/// Rules mapping overlapping input labels onto output labels, possibly sharing a label
fn shared_label_system(order: &[(usize, usize)]) -> FuzzyInferenceSystem {
    let inputs = ["a", "b", "c", "d"];
    let outputs = ["x", "y", "z"];
    let mut vars = Variables::new();
    let input = vars.add(
        "input",
        0. ..=10.,
        Terms::from_iter([
            ("a", MembershipFunction::triangle(0., 0., 4.).unwrap()),
            ("b", MembershipFunction::triangle(2., 4., 6.).unwrap()),
            ("c", MembershipFunction::trapezoid(4., 6., 7., 9.).unwrap()),
            ("d", MembershipFunction::points([(7., 0.), (10., 1.)]).unwrap()),
        ]),
        Some(0.5),
    );
    let output = vars.add(
        "output",
        0. ..=1.,
        Terms::from_iter([
            ("x", MembershipFunction::triangle(0., 0., 0.5).unwrap()),
            ("y", MembershipFunction::triangle(0.2, 0.5, 0.8).unwrap()),
            ("z", MembershipFunction::trapezoid(0.5, 0.9, 1., 1.).unwrap()),
        ]),
        Some(0.01),
    );
    let mut rules = Rules::new();

    for &(i, o) in order {
        rules.add(input.is(inputs[i]), output.is(outputs[o]));
    }

    FuzzyInferenceSystem::build(vars, rules).unwrap()
}

// ===== Property Tests =====

proptest! {
    #[test]
    fn prop_triangle_degree_in_unit_interval((a, b, c) in arb_triangle(), x in arb_x()) {
        let degree = MembershipFunction::triangle(a, b, c).unwrap().degree(x);

        prop_assert!((0. ..=1.).contains(&degree), "degree {} at {}", degree, x);
    }

    #[test]
    fn prop_trapezoid_degree_in_unit_interval((a, b, c, d) in arb_trapezoid(), x in arb_x()) {
        let degree = MembershipFunction::trapezoid(a, b, c, d).unwrap().degree(x);

        prop_assert!((0. ..=1.).contains(&degree), "degree {} at {}", degree, x);
    }

    #[test]
    fn prop_triangle_shape((a, b, c) in arb_triangle(), x in arb_x()) {
        let shape = MembershipFunction::triangle(a, b, c).unwrap();

        prop_assert_eq!(shape.degree(b), 1.);

        if x < b && x <= a || x > b && x >= c {
            prop_assert_eq!(shape.degree(x), 0.);
        } else if a < x && x < b {
            prop_assert!((shape.degree(x) - (x - a) / (b - a)).abs() < 1e-12);
        } else if b < x && x < c {
            prop_assert!((shape.degree(x) - (c - x) / (c - b)).abs() < 1e-12);
        }
    }

    #[test]
    fn prop_trapezoid_shape((a, b, c, d) in arb_trapezoid(), x in arb_x()) {
        let shape = MembershipFunction::trapezoid(a, b, c, d).unwrap();

        if b <= x && x <= c {
            prop_assert_eq!(shape.degree(x), 1.);
        } else if x <= a || x >= d {
            prop_assert_eq!(shape.degree(x), 0.);
        }
    }

    #[test]
    fn prop_descending_breakpoints_are_rejected((a, b, c, d) in arb_trapezoid()) {
        prop_assume!(a < b);

        prop_assert!(MembershipFunction::trapezoid(b, a, c, d).is_err());
    }

    #[test]
    fn prop_rule_order_is_bit_identical(
        rules in prop::collection::vec((0usize..4, 0usize..3), 1..8).prop_shuffle(),
        x in 0.0..=10.0f64,
    ) {
        let mut reversed = rules.clone();
        reversed.reverse();

        let inputs = Inputs::from_iter([("input", x)]);
        let forward = shared_label_system(&rules).trace(&inputs).unwrap();
        let backward = shared_label_system(&reversed).trace(&inputs).unwrap();

        prop_assert_eq!(&forward.aggregated, &backward.aggregated);
        prop_assert_eq!(
            forward.crisp["output"].map(f64::to_bits),
            backward.crisp["output"].map(f64::to_bits)
        );
    }

    #[test]
    fn prop_fan_speed_stays_in_universe(temperature in 0.0..=40.0f64) {
        let system = presets::fan_controller().unwrap();
        let speed = system
            .compute(&Inputs::from_iter([(TEMPERATURE, temperature)]))
            .unwrap()
            .get(FAN_SPEED)
            .unwrap();

        prop_assert!((0. ..=100.).contains(&speed));
    }
}
