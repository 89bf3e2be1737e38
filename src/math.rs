use num::Float;

/// Similar to numpy.interp for a single abscissa: degrees beyond the first and
/// last breakpoints hold the end value.
///
/// `coords` must be sorted by x. Zero-width (vertical) segments yield their upper
/// end instead of dividing by zero. NaN or an empty `coords` yields zero.
pub(crate) fn interp_at<F: Float>(x: F, coords: &[(F, F)]) -> F {
    let (Some(&(x_first, y_first)), Some(&(x_last, y_last))) = (coords.first(), coords.last()) else {
        return F::zero();
    };

    // Base cases
    if x < x_first {
        return y_first;
    }
    if x > x_last {
        return y_last;
    }

    for window in coords.windows(2) {
        let (x1, y1) = window[0];
        let (x2, y2) = window[1];

        if x1 <= x && x <= x2 {
            if x2 == x1 {
                return y2;
            }

            return y1 + (x - x1) * (y2 - y1) / (x2 - x1);
        }
    }

    // Single breakpoint, or x is NaN
    if x == x_first {
        y_first
    } else {
        F::zero()
    }
}

/// Similar to numpy.interp: evaluates the piecewise-linear function through
/// `coords` at every point of `x_input`.
pub(crate) fn interp<F: Float>(x_input: impl IntoIterator<Item = F>, coords: &[(F, F)]) -> Vec<F> {
    x_input.into_iter().map(|x| interp_at(x, coords)).collect()
}

#[test]
fn test_interp() {
    let x = [0., 1., 1.5, 2.72, 3.24];
    let coords = [(1., 3.), (2., 2.), (3., 0.)];

    assert_eq!(interp(x, &coords), vec![3., 3., 2.5, 0.5599999999999996, 0.]);

    let x = [2.5, -1., 7.5];
    let coords = [(0., 0.), (1., 2.), (2., 5.), (3., 3.), (4.5, 2.)];

    assert_eq!(interp(x, &coords), vec![4., 0., 2.]);
}

#[test]
fn test_interp_vertical_segment() {
    let step = [(5., 0.), (5., 1.), (10., 1.)];

    assert_eq!(interp_at(4.9, &step), 0.);
    assert_eq!(interp_at(5., &step), 1.);
    assert_eq!(interp_at(7., &step), 1.);
}

#[test]
fn test_interp_degenerate_inputs() {
    assert_eq!(interp_at(1.0f64, &[]), 0.);
    assert_eq!(interp_at(2.0f64, &[(2., 0.5)]), 0.5);
    assert_eq!(interp_at(f64::NAN, &[(0., 0.), (1., 1.)]), 0.);
}
