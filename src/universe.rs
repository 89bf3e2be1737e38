use std::ops::RangeInclusive;

use crate::error::{ConfigError, ConfigResult};
use crate::linspace::Linspace;

/// Step used when a variable is added without an explicit resolution.
pub const DEFAULT_STEP: f64 = 0.1;

/// Upper bound on the number of samples in one universe.
pub const MAX_SAMPLES: usize = 1_000_000;

/// Absorbs float noise in `(max - min) / step` so that e.g. `0.3 / 0.1` still
/// yields four samples instead of three.
const STEP_EPSILON: f64 = 1e-9;

/// The discretized domain of a linguistic variable: `x_i = min + i * step`.
///
/// The grid is what membership sampling, aggregation and defuzzification run
/// over, so the step directly sets the precision of every crisp output.
#[derive(Debug, Clone, PartialEq)]
pub struct Universe {
    min: f64,
    max: f64,
    step: f64,
    points: Vec<f64>,
}

impl Universe {
    pub(crate) fn new(variable: &str, range: RangeInclusive<f64>, step: f64) -> ConfigResult<Self> {
        let min = *range.start();
        let max = *range.end();
        let malformed = |reason: String| ConfigError::MalformedUniverse {
            variable: variable.to_owned(),
            reason,
        };

        if !min.is_finite() || !max.is_finite() {
            return Err(malformed(format!("bounds must be finite, got [{min}, {max}]")));
        }
        if min > max {
            return Err(malformed(format!("min {min} is greater than max {max}")));
        }
        if !(step.is_finite() && step > 0.) {
            return Err(malformed(format!("step must be positive, got {step}")));
        }

        let ratio = ((max - min) / step + STEP_EPSILON).floor();

        if ratio >= MAX_SAMPLES as f64 {
            return Err(malformed(format!(
                "step {step} over [{min}, {max}] exceeds {MAX_SAMPLES} samples"
            )));
        }

        let num = ratio as usize + 1;
        // STEP_EPSILON may round the last sample just past max
        let last = f64::min(min + step * ratio, max);
        let points = Linspace::new(min, last, num).map(|x| f64::min(x, max)).collect();

        Ok(Self { min, max, step, points })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// The sample grid, strictly increasing.
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether `x` lies in the configured closed domain `[min, max]`.
    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }
}

#[test]
fn test_integer_grid() {
    let universe = Universe::new("fan_speed", 0. ..=100., 1.).unwrap();

    assert_eq!(universe.len(), 101);
    assert_eq!(universe.points()[0], 0.);
    assert_eq!(universe.points()[100], 100.);
    assert!(universe.points().windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_fractional_step_keeps_end_point() {
    let universe = Universe::new("x", 0. ..=0.3, 0.1).unwrap();

    assert_eq!(universe.len(), 4);
    assert!((universe.points()[3] - 0.3).abs() < 1e-12);
    assert!(universe.points().iter().all(|&x| universe.contains(x)));
    assert_eq!(universe.points()[3], 0.3);

    // min + 3 * 0.2 rounds to 0.7000000000000001
    let universe = Universe::new("x", 0.1..=0.7, 0.2).unwrap();

    assert_eq!(universe.len(), 4);
    assert!(universe.points().iter().all(|&x| universe.contains(x)));
}

#[test]
fn test_step_not_dividing_range() {
    let universe = Universe::new("x", 0. ..=10., 3.).unwrap();

    assert_eq!(universe.points(), &[0., 3., 6., 9.]);
    assert!(universe.contains(10.));
    assert!(!universe.contains(10.5));
}

#[test]
fn test_malformed_universe() {
    for (range, step) in [(0. ..=10., 0.), (0. ..=10., -1.), (10. ..=0., 1.), (0. ..=f64::INFINITY, 1.)] {
        assert!(matches!(
            Universe::new("x", range, step),
            Err(ConfigError::MalformedUniverse { .. })
        ));
    }

    assert!(matches!(
        Universe::new("x", 0. ..=1., 1e-9),
        Err(ConfigError::MalformedUniverse { .. })
    ));
}
