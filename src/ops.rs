//! Pointwise fuzzy operators and defuzzification.
//!
//! AND is `min`, OR and aggregation are `max`, implication clips by `min`
//! (Mamdani). All of them are exactly order independent, which is what makes
//! aggregation bit-identical under any rule ordering.

/// Fuzzy AND over the operands' degrees. The empty conjunction is 1.
pub(crate) fn and(degrees: impl IntoIterator<Item = f64>) -> f64 {
    degrees.into_iter().fold(1., f64::min)
}

/// Fuzzy OR over the operands' degrees. The empty disjunction is 0.
pub(crate) fn or(degrees: impl IntoIterator<Item = f64>) -> f64 {
    degrees.into_iter().fold(0., f64::max)
}

/// Mamdani implication: the consequent shape clipped at the firing strength.
pub(crate) fn implicate(strength: f64, consequent: &[f64]) -> impl Iterator<Item = f64> + '_ {
    consequent.iter().map(move |&m| f64::min(strength, m))
}

/// Pointwise max of `implicated` into `agg`.
pub(crate) fn aggregate(agg: &mut [f64], implicated: impl IntoIterator<Item = f64>) {
    for (acc, m) in agg.iter_mut().zip(implicated) {
        *acc = f64::max(*acc, m);
    }
}

/// Method for defuzzificating the aggregated membership function.
///
/// Every method works on the discrete universe grid, never on a continuous
/// integral, so results are reproducible for a given step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DefuzzificationOp {
    /// Center of Gravity: `Σ μ(x)·x / Σ μ(x)`
    #[default]
    Centroid,
    /// First sample at which the cumulative degree reaches half of the total
    Bisector,
    /// Mean of the values for which the membership function is maximum
    MeanOfMaximum,
    /// Smallest value for which the membership function is maximum
    SmallestOfMaximum,
    /// Largest value for which the membership function is maximum
    LargestOfMaximum,
}

impl DefuzzificationOp {
    /// Returns `None` when the membership function is empty (sums to zero) or
    /// does not have one degree per universe sample.
    pub fn call(self, universe: &[f64], membership: &[f64]) -> Option<f64> {
        if universe.len() != membership.len() {
            return None;
        }

        let total = membership.iter().sum::<f64>();

        if total.is_nan() || total <= 0. {
            return None;
        }

        let samples = universe.iter().copied().zip(membership.iter().copied());

        match self {
            Self::Centroid => {
                let num = samples.map(|(x, m)| x * m).sum::<f64>();

                Some(num / total)
            },
            Self::Bisector => {
                let half = total / 2.;

                samples
                    .scan(0., |cum, (x, m)| {
                        *cum += m;
                        Some((x, *cum))
                    })
                    .find(|&(_, cum)| cum >= half)
                    .map(|(x, _)| x)
            },
            Self::MeanOfMaximum => {
                let maximum = membership.iter().copied().fold(0., f64::max);
                let (len, sum) = samples
                    .filter(|&(_, m)| m == maximum)
                    .fold((0usize, 0.), |(len, sum), (x, _)| (len + 1, sum + x));

                Some(sum / len as f64)
            },
            Self::SmallestOfMaximum => {
                let maximum = membership.iter().copied().fold(0., f64::max);

                samples.filter(|&(_, m)| m == maximum).map(|(x, _)| x).next()
            },
            Self::LargestOfMaximum => {
                let maximum = membership.iter().copied().fold(0., f64::max);

                samples.filter(|&(_, m)| m == maximum).map(|(x, _)| x).next_back()
            },
        }
    }
}

#[test]
fn test_operators() {
    assert_eq!(and([0.5, 0.25, 1.]), 0.25);
    assert_eq!(and(std::iter::empty()), 1.);
    assert_eq!(or([0.5, 0.25, 0.]), 0.5);
    assert_eq!(or(std::iter::empty()), 0.);
    assert_eq!(implicate(0.5, &[0., 0.25, 0.75, 1.]).collect::<Vec<_>>(), vec![0., 0.25, 0.5, 0.5]);

    let mut agg = vec![0., 0.5, 0.2];
    aggregate(&mut agg, [0.3, 0.1, 0.2]);
    assert_eq!(agg, vec![0.3, 0.5, 0.2]);
}

#[test]
fn test_defuzzification_methods() {
    let universe = [0., 1., 2., 3., 4.];
    let membership = [0., 1., 1., 0.5, 0.];

    assert_eq!(DefuzzificationOp::Centroid.call(&universe, &membership), Some(4.5 / 2.5));
    assert_eq!(DefuzzificationOp::Bisector.call(&universe, &membership), Some(2.));
    assert_eq!(DefuzzificationOp::MeanOfMaximum.call(&universe, &membership), Some(1.5));
    assert_eq!(DefuzzificationOp::SmallestOfMaximum.call(&universe, &membership), Some(1.));
    assert_eq!(DefuzzificationOp::LargestOfMaximum.call(&universe, &membership), Some(2.));
}

#[test]
fn test_empty_set_has_no_crisp_value() {
    let universe = [0., 1., 2.];
    let membership = [0., 0., 0.];

    for op in [
        DefuzzificationOp::Centroid,
        DefuzzificationOp::Bisector,
        DefuzzificationOp::MeanOfMaximum,
        DefuzzificationOp::SmallestOfMaximum,
        DefuzzificationOp::LargestOfMaximum,
    ] {
        assert_eq!(op.call(&universe, &membership), None);
    }
}

#[test]
fn test_mismatched_lengths_have_no_crisp_value() {
    let universe = [0., 1., 2., 3.];
    let membership = [0., 1., 1.];

    assert_eq!(DefuzzificationOp::Centroid.call(&universe, &membership), None);
    assert_eq!(DefuzzificationOp::Bisector.call(&universe[..2], &membership), None);
}
