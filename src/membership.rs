use crate::error::{ConfigError, ConfigResult};
use crate::math::{interp, interp_at};

/// Shape of a fuzzy set, evaluated pointwise to a degree in `[0, 1]`.
///
/// Variants can be built directly; [`validate`](Self::validate) (called for every
/// registered shape when a system is built) rejects non-monotonic breakpoints. The
/// checked constructors validate immediately.
#[derive(Debug, Clone, PartialEq)]
pub enum MembershipFunction {
    /// Rises `a -> b`, falls `b -> c`, 1 at `b`.
    Triangle { a: f64, b: f64, c: f64 },
    /// Rises `a -> b`, flat 1 on `[b, c]`, falls `c -> d`.
    Trapezoid { a: f64, b: f64, c: f64, d: f64 },
    /// Piecewise-linear through `(x, degree)` breakpoints sorted by `x`. Beyond the
    /// end breakpoints the end degree is held.
    Points(Vec<(f64, f64)>),
}

impl MembershipFunction {
    pub fn triangle(a: f64, b: f64, c: f64) -> ConfigResult<Self> {
        let shape = Self::Triangle { a, b, c };
        shape.validate()?;
        Ok(shape)
    }

    pub fn trapezoid(a: f64, b: f64, c: f64, d: f64) -> ConfigResult<Self> {
        let shape = Self::Trapezoid { a, b, c, d };
        shape.validate()?;
        Ok(shape)
    }

    pub fn points(points: impl Into<Vec<(f64, f64)>>) -> ConfigResult<Self> {
        let shape = Self::Points(points.into());
        shape.validate()?;
        Ok(shape)
    }

    /// Checks that breakpoints are finite and non-decreasing, and that point
    /// degrees lie in `[0, 1]`.
    pub fn validate(&self) -> ConfigResult<()> {
        let malformed = |reason: &str| Err(ConfigError::MalformedMembershipFunction(format!("{self:?}: {reason}")));

        match self {
            Self::Triangle { a, b, c } => {
                if ![a, b, c].iter().all(|v| v.is_finite()) {
                    return malformed("breakpoints must be finite");
                }
                if !(a <= b && b <= c) {
                    return malformed("expected a <= b <= c");
                }
            },
            Self::Trapezoid { a, b, c, d } => {
                if ![a, b, c, d].iter().all(|v| v.is_finite()) {
                    return malformed("breakpoints must be finite");
                }
                if !(a <= b && b <= c && c <= d) {
                    return malformed("expected a <= b <= c <= d");
                }
            },
            Self::Points(points) => {
                if points.is_empty() {
                    return malformed("at least one breakpoint is required");
                }
                if !points.iter().all(|(x, y)| x.is_finite() && (0. ..=1.).contains(y)) {
                    return malformed("breakpoints must be finite with degrees in [0, 1]");
                }
                if !points.windows(2).all(|w| w[0].0 <= w[1].0) {
                    return malformed("breakpoint x values must be non-decreasing");
                }
            },
        }

        Ok(())
    }

    /// Membership degree of `x`. Total over the real line: outside the support
    /// the degree is 0 (or the held end degree for `Points`).
    pub fn degree(&self, x: f64) -> f64 {
        match *self {
            Self::Triangle { a, b, c } => trapezoid_degree(x, a, b, b, c),
            Self::Trapezoid { a, b, c, d } => trapezoid_degree(x, a, b, c, d),
            Self::Points(ref points) => interp_at(x, points),
        }
    }

    /// Degrees over every sample of `grid`.
    pub fn sample(&self, grid: &[f64]) -> Vec<f64> {
        match self {
            Self::Points(points) => interp(grid.iter().copied(), points),
            _ => grid.iter().map(|&x| self.degree(x)).collect(),
        }
    }

    /// Smallest and largest breakpoint.
    pub fn bounds(&self) -> (f64, f64) {
        match *self {
            Self::Triangle { a, c, .. } => (a, c),
            Self::Trapezoid { a, d, .. } => (a, d),
            Self::Points(ref points) => {
                let first = points.first().map_or(0., |p| p.0);
                let last = points.last().map_or(0., |p| p.0);
                (first, last)
            },
        }
    }
}

// The plateau check comes first so shoulders (a == b or c == d) reach 1 at
// their edge; the ramps are only entered with a strictly positive width.
fn trapezoid_degree(x: f64, a: f64, b: f64, c: f64, d: f64) -> f64 {
    if b <= x && x <= c {
        1.
    } else if x <= a || x >= d || x.is_nan() {
        0.
    } else if x < b {
        (x - a) / (b - a)
    } else {
        (d - x) / (d - c)
    }
}

#[test]
fn test_triangle() {
    let warm = MembershipFunction::triangle(10., 20., 30.).unwrap();

    assert_eq!(warm.degree(20.), 1.);
    assert_eq!(warm.degree(10.), 0.);
    assert_eq!(warm.degree(30.), 0.);
    assert_eq!(warm.degree(-5.), 0.);
    assert_eq!(warm.degree(12.5), 0.25);
    assert_eq!(warm.degree(25.), 0.5);
}

#[test]
fn test_trapezoid_shoulders() {
    let cold = MembershipFunction::trapezoid(0., 0., 10., 15.).unwrap();
    let hot = MembershipFunction::trapezoid(25., 30., 40., 40.).unwrap();

    assert_eq!(cold.degree(0.), 1.);
    assert_eq!(cold.degree(10.), 1.);
    assert_eq!(cold.degree(12.5), 0.5);
    assert_eq!(cold.degree(15.), 0.);
    assert_eq!(cold.degree(-1.), 0.);
    assert_eq!(hot.degree(40.), 1.);
    assert_eq!(hot.degree(27.5), 0.5);
    assert_eq!(hot.degree(41.), 0.);
}

#[test]
fn test_fully_degenerate_shapes() {
    let spike = MembershipFunction::triangle(5., 5., 5.).unwrap();

    assert_eq!(spike.degree(5.), 1.);
    assert_eq!(spike.degree(4.999), 0.);
    assert_eq!(spike.degree(5.001), 0.);
    assert_eq!(spike.degree(f64::NAN), 0.);
}

#[test]
fn test_malformed_shapes() {
    assert!(matches!(
        MembershipFunction::trapezoid(10., 5., 20., 30.),
        Err(ConfigError::MalformedMembershipFunction(_))
    ));
    assert!(MembershipFunction::triangle(0., 10., 5.).is_err());
    assert!(MembershipFunction::triangle(0., f64::NAN, 5.).is_err());
    assert!(MembershipFunction::points([(0., 0.), (1., 1.5)]).is_err());
    assert!(MembershipFunction::points([(2., 0.), (1., 1.)]).is_err());
    assert!(MembershipFunction::points(Vec::new()).is_err());
}

#[test]
fn test_points_shape() {
    let shape = MembershipFunction::points([(0., 1.), (10., 1.), (15., 0.)]).unwrap();

    assert_eq!(shape.degree(-3.), 1.);
    assert_eq!(shape.degree(12.5), 0.5);
    assert_eq!(shape.degree(20.), 0.);
    assert_eq!(shape.sample(&[0., 12.5, 20.]), vec![1., 0.5, 0.]);
    assert_eq!(shape.bounds(), (0., 15.));
}
