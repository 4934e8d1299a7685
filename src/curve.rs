use ndarray::Array1;

use crate::error::{PlotError, PlotResult};

/// Number of grid points used when densifying a curve for plotting
pub const DEFAULT_INTERPOLATION_POINTS: usize = 500;

/// One step of the solved-fraction curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    pub iterations: f64,
    pub solved_percent: f64,
}

/// Empirical "percent of problems solved within an iteration budget" curve.
///
/// Points are sorted ascending by iteration count. Ties are kept, so the
/// curve has exactly one point per sample.
#[derive(Debug, Clone, PartialEq)]
pub struct SolvedFractionCurve {
    points: Vec<CurvePoint>,
}

impl SolvedFractionCurve {
    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn min_iterations(&self) -> Option<f64> {
        self.points.first().map(|p| p.iterations)
    }

    pub fn max_iterations(&self) -> Option<f64> {
        self.points.last().map(|p| p.iterations)
    }
}

/// Uniform resampling of a [`SolvedFractionCurve`]
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolatedCurve {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl InterpolatedCurve {
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}

/// Build the solved-fraction curve from the iteration counts of one benchmark function.
///
/// The i-th smallest count (1-indexed) is assigned `i * 100 / N`. The sort is
/// stable, so equal counts keep their input order.
pub fn build_curve(samples: &[f64]) -> PlotResult<SolvedFractionCurve> {
    if samples.is_empty() {
        return Err(PlotError::InvalidInput(
            "cannot build a solved-fraction curve from zero samples".to_string(),
        ));
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len() as f64;
    let points = sorted
        .into_iter()
        .enumerate()
        .map(|(i, iterations)| CurvePoint {
            iterations,
            solved_percent: (i + 1) as f64 * 100.0 / n,
        })
        .collect();

    Ok(SolvedFractionCurve { points })
}

/// Resample `curve` onto `num_points` evenly spaced iteration counts between
/// its minimum and maximum, inclusive, using piecewise-linear interpolation.
pub fn interpolate(curve: &SolvedFractionCurve, num_points: usize) -> PlotResult<InterpolatedCurve> {
    if num_points < 2 {
        return Err(PlotError::InvalidInput(format!(
            "interpolation needs at least 2 grid points, got {}",
            num_points
        )));
    }

    let points = curve.points();
    if points.len() < 2 {
        return Err(PlotError::DegenerateInput(format!(
            "linear interpolation needs at least 2 curve points, got {}",
            points.len()
        )));
    }

    let x_min = points[0].iterations;
    let x_max = points[points.len() - 1].iterations;
    if !x_min.is_finite() || !x_max.is_finite() {
        return Err(PlotError::DegenerateInput(format!(
            "non-finite domain [{}, {}]",
            x_min, x_max
        )));
    }
    if x_max <= x_min {
        return Err(PlotError::DegenerateInput(format!(
            "all iteration counts equal {}, zero-width domain",
            x_min
        )));
    }

    let x: Vec<f64> = Array1::linspace(x_min, x_max, num_points).to_vec();
    let y = x.iter().map(|&q| evaluate(points, q)).collect();

    Ok(InterpolatedCurve { x, y })
}

/// Piecewise-linear value at `q`, clamped to the end points outside the domain.
fn evaluate(points: &[CurvePoint], q: f64) -> f64 {
    // Last control point with x <= q; with ties this lands on the highest percent.
    // Unlike scipy's interp1d, which returns the lowest percent of a tie (NaN at a tied minimum).
    let upper = points.partition_point(|p| p.iterations <= q);
    if upper == 0 {
        return points[0].solved_percent;
    }
    if upper == points.len() {
        return points[points.len() - 1].solved_percent;
    }

    let left = points[upper - 1];
    let right = points[upper];
    let t = (q - left.iterations) / (right.iterations - left.iterations);
    left.solved_percent + t * (right.solved_percent - left.solved_percent)
}

/// Arithmetic mean of the iteration counts, `None` for an empty series
pub fn mean_iterations(samples: &[f64]) -> Option<f64> {
    Array1::from(samples.to_vec()).mean()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    const TOLERANCE: f64 = 1e-9;

    fn percents(curve: &SolvedFractionCurve) -> Vec<f64> {
        curve.points().iter().map(|p| p.solved_percent).collect()
    }

    #[test]
    fn unsorted_samples_produce_sorted_curve() {
        let curve = build_curve(&[3.0, 1.0, 2.0]).unwrap();
        let xs: Vec<f64> = curve.points().iter().map(|p| p.iterations).collect();
        assert_eq!(xs, vec![1.0, 2.0, 3.0]);

        let ys = percents(&curve);
        assert!((ys[0] - 100.0 / 3.0).abs() < TOLERANCE);
        assert!((ys[1] - 200.0 / 3.0).abs() < TOLERANCE);
        assert_eq!(ys[2], 100.0);
    }

    #[test]
    fn curve_has_one_point_per_sample_and_ends_at_hundred() {
        let samples = [7.0, 7.0, 2.0, 40.0, 13.0, 7.0, 1.0];
        let curve = build_curve(&samples).unwrap();
        assert_eq!(curve.len(), samples.len());

        let n = samples.len() as f64;
        for (i, p) in curve.points().iter().enumerate() {
            assert!((p.solved_percent - (i + 1) as f64 * 100.0 / n).abs() < TOLERANCE);
        }
        for pair in curve.points().windows(2) {
            assert!(pair[0].solved_percent < pair[1].solved_percent);
            assert!(pair[0].iterations <= pair[1].iterations);
        }
        assert_eq!(curve.points().last().unwrap().solved_percent, 100.0);
    }

    #[test]
    fn single_sample_is_fully_solved() {
        let curve = build_curve(&[12.0]).unwrap();
        assert_eq!(curve.points(), &[CurvePoint { iterations: 12.0, solved_percent: 100.0 }]);
    }

    #[test]
    fn curve_does_not_depend_on_input_order() {
        let samples: Vec<f64> = (0..50).map(|i| ((i * 37) % 23) as f64).collect();
        let reference = build_curve(&samples).unwrap();

        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        for _ in 0..10 {
            let mut shuffled = samples.clone();
            shuffled.shuffle(&mut rng);
            assert_eq!(build_curve(&shuffled).unwrap(), reference);
        }
    }

    #[test]
    fn empty_samples_are_rejected() {
        assert!(matches!(build_curve(&[]), Err(PlotError::InvalidInput(_))));
    }

    #[test]
    fn evenly_spaced_samples_are_reproduced_on_matching_grid() {
        let curve = build_curve(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(percents(&curve), vec![20.0, 40.0, 60.0, 80.0, 100.0]);

        let dense = interpolate(&curve, 5).unwrap();
        assert_eq!(dense.x.len(), 5);
        for (i, (x, y)) in dense.iter().enumerate() {
            assert!((x - (i + 1) as f64).abs() < TOLERANCE);
            assert!((y - 20.0 * (i + 1) as f64).abs() < TOLERANCE);
        }
    }

    #[test]
    fn interpolation_spans_the_curve_domain() {
        let curve = build_curve(&[12.0, 3.0, 45.0, 8.0, 8.0, 30.0]).unwrap();
        let dense = interpolate(&curve, DEFAULT_INTERPOLATION_POINTS).unwrap();

        assert_eq!(dense.x.len(), DEFAULT_INTERPOLATION_POINTS);
        assert_eq!(dense.y.len(), DEFAULT_INTERPOLATION_POINTS);
        assert!((dense.x[0] - 3.0).abs() < TOLERANCE);
        assert!((dense.x[DEFAULT_INTERPOLATION_POINTS - 1] - 45.0).abs() < TOLERANCE);
        assert!((dense.y[DEFAULT_INTERPOLATION_POINTS - 1] - 100.0).abs() < TOLERANCE);
        for pair in dense.y.windows(2) {
            assert!(pair[0] <= pair[1] + TOLERANCE);
        }
    }

    #[test]
    fn midpoint_is_linear_between_control_points() {
        let curve = build_curve(&[0.0, 10.0]).unwrap();
        let dense = interpolate(&curve, 3).unwrap();
        assert_eq!(dense.x, vec![0.0, 5.0, 10.0]);
        assert!((dense.y[1] - 75.0).abs() < TOLERANCE);
    }

    #[test]
    fn tied_counts_resolve_to_highest_percent() {
        // 2.0 appears twice: 50% and 75%
        let curve = build_curve(&[1.0, 2.0, 2.0, 3.0]).unwrap();
        let dense = interpolate(&curve, 3).unwrap();
        assert_eq!(dense.x, vec![1.0, 2.0, 3.0]);
        assert_eq!(dense.y, vec![25.0, 75.0, 100.0]);
    }

    #[test]
    fn equal_samples_have_zero_width_domain() {
        let curve = build_curve(&[5.0, 5.0, 5.0]).unwrap();
        assert!(matches!(
            interpolate(&curve, DEFAULT_INTERPOLATION_POINTS),
            Err(PlotError::DegenerateInput(_))
        ));
    }

    #[test]
    fn non_finite_domain_is_degenerate() {
        let curve = build_curve(&[f64::NAN, 3.0, f64::INFINITY]).unwrap();
        assert!(matches!(interpolate(&curve, 5), Err(PlotError::DegenerateInput(_))));

        let curve = build_curve(&[f64::NEG_INFINITY, 3.0]).unwrap();
        assert!(matches!(interpolate(&curve, 5), Err(PlotError::DegenerateInput(_))));
    }

    #[test]
    fn single_point_curve_cannot_be_interpolated() {
        let curve = build_curve(&[4.0]).unwrap();
        assert!(matches!(interpolate(&curve, 10), Err(PlotError::DegenerateInput(_))));
    }

    #[test]
    fn grid_needs_two_points() {
        let curve = build_curve(&[1.0, 2.0]).unwrap();
        assert!(matches!(interpolate(&curve, 1), Err(PlotError::InvalidInput(_))));
    }

    #[test]
    fn mean_of_iterations() {
        assert_eq!(mean_iterations(&[2.0, 4.0, 9.0]), Some(5.0));
        assert_eq!(mean_iterations(&[]), None);
    }
}
