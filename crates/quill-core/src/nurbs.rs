//! Open, non-rational B-spline curves built from edit points.
//!
//! Edit points are points the curve passes through (as opposed to control
//! vertices). A degree `p` curve through `n` edit points is a clamped
//! B-spline with `n + p - 1` control vertices and `n - 1` spans. The extra
//! `p - 1` degrees of freedom are fixed with natural end conditions (zero
//! second derivative at the start, and for cubics also at the end), which
//! makes the construction well defined from two edit points upward.

use crate::{QuillError, Result, Vec3};
use serde::{Deserialize, Serialize};

/// Highest degree supported by edit-point interpolation.
pub const MAX_DEGREE: usize = 3;

/// Fewest edit points that define a curve.
pub const MIN_EDIT_POINTS: usize = 2;

/// Chords shorter than this fall back to uniform parametrization.
const CHORD_EPSILON: f64 = 1e-12;

/// Topological form of a curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveForm {
    #[default]
    Open,
    Closed,
    Periodic,
}

/// A non-rational B-spline curve with clamped knots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NurbsCurve {
    pub degree: usize,
    pub form: CurveForm,
    pub knots: Vec<f64>,
    pub control_points: Vec<Vec3>,
    /// Points the curve was built to pass through, in order
    pub edit_points: Vec<Vec3>,
    /// Parameter of each edit point
    pub params: Vec<f64>,
}

impl NurbsCurve {
    /// Interpolate `edit_points` with an open curve of the given degree.
    ///
    /// With `uniform_param` the edit points sit at parameters `0, 1, .., n-1`;
    /// otherwise at their accumulated chord length (falling back to uniform
    /// if two consecutive points coincide).
    pub fn through_edit_points(
        edit_points: &[Vec3],
        degree: usize,
        uniform_param: bool,
    ) -> Result<Self> {
        let n = edit_points.len();
        if n < MIN_EDIT_POINTS {
            return Err(QuillError::InsufficientPoints {
                required: MIN_EDIT_POINTS,
                got: n,
            });
        }
        if degree == 0 || degree > MAX_DEGREE {
            return Err(QuillError::CurveConstruction(format!(
                "unsupported degree {degree}, expected 1..={MAX_DEGREE}"
            )));
        }
        if let Some(bad) = edit_points.iter().position(|p| !p.is_finite()) {
            return Err(QuillError::CurveConstruction(format!(
                "edit point {bad} is not finite"
            )));
        }

        let params = if uniform_param {
            uniform_params(n)
        } else {
            chord_length_params(edit_points).unwrap_or_else(|| uniform_params(n))
        };
        let knots = clamped_knots(&params, degree);
        let control_points = solve_control_points(edit_points, &params, &knots, degree)?;

        Ok(Self {
            degree,
            form: CurveForm::Open,
            knots,
            control_points,
            edit_points: edit_points.to_vec(),
            params,
        })
    }

    /// Parameter range `[start, end]`
    pub fn domain(&self) -> (f64, f64) {
        let p = self.degree;
        (self.knots[p], self.knots[self.knots.len() - p - 1])
    }

    pub fn num_spans(&self) -> usize {
        self.edit_points.len().saturating_sub(1)
    }

    /// Evaluate the curve at `u` (clamped to the domain)
    pub fn point_at(&self, u: f64) -> Vec3 {
        let (start, end) = self.domain();
        let u = u.clamp(start, end);
        let last = self.control_points.len() - 1;
        let span = find_span(last, self.degree, u, &self.knots);
        let basis = basis_functions(span, u, self.degree, &self.knots);

        let mut point = Vec3::ZERO;
        for (i, b) in basis.iter().enumerate() {
            point += self.control_points[span - self.degree + i] * *b;
        }
        point
    }

    /// Sum of straight segments between `samples_per_span` evaluations per span
    pub fn approximate_length(&self, samples_per_span: usize) -> f64 {
        let (start, end) = self.domain();
        let steps = (self.num_spans() * samples_per_span.max(1)).max(1);
        let mut length = 0.0;
        let mut prev = self.point_at(start);
        for i in 1..=steps {
            let u = start + (end - start) * i as f64 / steps as f64;
            let pos = self.point_at(u);
            length += pos.distance_to(&prev);
            prev = pos;
        }
        length
    }
}

fn uniform_params(n: usize) -> Vec<f64> {
    (0..n).map(|i| i as f64).collect()
}

fn chord_length_params(points: &[Vec3]) -> Option<Vec<f64>> {
    let mut params = Vec::with_capacity(points.len());
    let mut total = 0.0;
    params.push(total);
    for pair in points.windows(2) {
        let chord = pair[0].distance_to(&pair[1]);
        if chord < CHORD_EPSILON {
            return None;
        }
        total += chord;
        params.push(total);
    }
    Some(params)
}

/// Clamped knot vector: end parameters repeated `degree + 1` times, interior
/// edit point parameters once.
fn clamped_knots(params: &[f64], degree: usize) -> Vec<f64> {
    let first = params[0];
    let last = params[params.len() - 1];
    let mut knots = Vec::with_capacity(params.len() + 2 * degree);
    knots.extend(std::iter::repeat(first).take(degree + 1));
    knots.extend_from_slice(&params[1..params.len() - 1]);
    knots.extend(std::iter::repeat(last).take(degree + 1));
    knots
}

/// Knot span index containing `u`. `last` is the index of the last control point.
fn find_span(last: usize, degree: usize, u: f64, knots: &[f64]) -> usize {
    if u >= knots[last + 1] {
        return last;
    }
    if u <= knots[degree] {
        return degree;
    }
    let mut low = degree;
    let mut high = last + 1;
    let mut mid = (low + high) / 2;
    while u < knots[mid] || u >= knots[mid + 1] {
        if u < knots[mid] {
            high = mid;
        } else {
            low = mid;
        }
        mid = (low + high) / 2;
    }
    mid
}

/// Non-zero basis functions `N[span-degree..=span]` at `u` (Cox–de Boor).
fn basis_functions(span: usize, u: f64, degree: usize, knots: &[f64]) -> Vec<f64> {
    let mut n = vec![0.0; degree + 1];
    let mut left = vec![0.0; degree + 1];
    let mut right = vec![0.0; degree + 1];
    n[0] = 1.0;

    for j in 1..=degree {
        left[j] = u - knots[span + 1 - j];
        right[j] = knots[span + j] - u;
        let mut saved = 0.0;
        for r in 0..j {
            let denom = right[r + 1] + left[j - r];
            let temp = if denom.abs() > 0.0 { n[r] / denom } else { 0.0 };
            n[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        n[j] = saved;
    }
    n
}

/// Build and solve the interpolation system for the control points.
///
/// Rows: start point, natural start (degree >= 2), interior edit points,
/// natural end (degree 3), end point.
fn solve_control_points(
    edit_points: &[Vec3],
    params: &[f64],
    knots: &[f64],
    degree: usize,
) -> Result<Vec<Vec3>> {
    let n = edit_points.len();
    let count = n + degree - 1;
    let last = count - 1;

    let mut rows: Vec<Vec<f64>> = Vec::with_capacity(count);
    let mut rhs: Vec<Vec3> = Vec::with_capacity(count);

    let mut row = vec![0.0; count];
    row[0] = 1.0;
    rows.push(row);
    rhs.push(edit_points[0]);

    if degree >= 2 {
        let a = knots[degree + 1] - knots[1];
        let b = knots[degree + 2] - knots[2];
        let mut row = vec![0.0; count];
        row[0] = b;
        row[1] = -(a + b);
        row[2] = a;
        rows.push(row);
        rhs.push(Vec3::ZERO);
    }

    for k in 1..n - 1 {
        let u = params[k];
        let span = find_span(last, degree, u, knots);
        let basis = basis_functions(span, u, degree, knots);
        let mut row = vec![0.0; count];
        for (i, b) in basis.iter().enumerate() {
            row[span - degree + i] = *b;
        }
        rows.push(row);
        rhs.push(edit_points[k]);
    }

    if degree >= 3 {
        let m = knots.len() - 1;
        let a = knots[m - 1] - knots[m - degree - 1];
        let b = knots[m - 2] - knots[m - degree - 2];
        let mut row = vec![0.0; count];
        row[last] = b;
        row[last - 1] = -(a + b);
        row[last - 2] = a;
        rows.push(row);
        rhs.push(Vec3::ZERO);
    }

    let mut row = vec![0.0; count];
    row[last] = 1.0;
    rows.push(row);
    rhs.push(edit_points[n - 1]);

    solve_dense(rows, rhs)
}

/// Gaussian elimination with partial pivoting for a square system with
/// vector right-hand sides.
fn solve_dense(mut a: Vec<Vec<f64>>, mut b: Vec<Vec3>) -> Result<Vec<Vec3>> {
    let size = b.len();
    for col in 0..size {
        let pivot = (col..size)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .unwrap_or(col);
        if a[pivot][col].abs() < 1e-14 {
            return Err(QuillError::CurveConstruction(
                "singular interpolation system".into(),
            ));
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..size {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..size {
                a[row][k] -= factor * a[col][k];
            }
            let pivot_rhs = b[col];
            b[row] = b[row] - pivot_rhs * factor;
        }
    }

    let mut x = vec![Vec3::ZERO; size];
    for row in (0..size).rev() {
        let mut acc = b[row];
        for k in row + 1..size {
            acc = acc - x[k] * a[row][k];
        }
        x[row] = acc / a[row][row];
    }

    if x.iter().any(|p| !p.is_finite()) {
        return Err(QuillError::CurveConstruction(
            "interpolation produced non-finite control points".into(),
        ));
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zigzag(n: usize) -> Vec<Vec3> {
        (0..n)
            .map(|i| Vec3::new(i as f64, if i % 2 == 0 { 0.0 } else { 1.0 }, 0.5 * i as f64))
            .collect()
    }

    #[test]
    fn cubic_passes_through_edit_points() {
        let pts = zigzag(6);
        let curve = NurbsCurve::through_edit_points(&pts, 3, true).unwrap();

        assert_eq!(curve.degree, 3);
        assert_eq!(curve.form, CurveForm::Open);
        assert_eq!(curve.control_points.len(), pts.len() + 2);
        assert_eq!(curve.knots.len(), curve.control_points.len() + 4);
        assert_eq!(curve.num_spans(), 5);
        assert_eq!(curve.domain(), (0.0, 5.0));

        for (p, u) in pts.iter().zip(&curve.params) {
            assert!(curve.point_at(*u).abs_diff_eq(p, 1e-9), "missed {p:?} at {u}");
        }
    }

    #[test]
    fn chord_length_passes_through_edit_points() {
        let pts = zigzag(5);
        let curve = NurbsCurve::through_edit_points(&pts, 3, false).unwrap();
        assert!(curve.params[1] > 1.0);
        for (p, u) in pts.iter().zip(&curve.params) {
            assert!(curve.point_at(*u).abs_diff_eq(p, 1e-9));
        }
    }

    #[test]
    fn two_points_give_straight_cubic() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(3.0, 0.0, 0.0);
        let curve = NurbsCurve::through_edit_points(&[a, b], 3, true).unwrap();

        assert_eq!(curve.control_points.len(), 4);
        assert!(curve.control_points[1].abs_diff_eq(&Vec3::new(1.0, 0.0, 0.0), 1e-12));
        assert!(curve.control_points[2].abs_diff_eq(&Vec3::new(2.0, 0.0, 0.0), 1e-12));
        assert!(curve.point_at(0.5).abs_diff_eq(&Vec3::new(1.5, 0.0, 0.0), 1e-12));
    }

    #[test]
    fn endpoints_are_clamped() {
        let pts = zigzag(4);
        let curve = NurbsCurve::through_edit_points(&pts, 3, true).unwrap();
        assert_eq!(curve.control_points[0], pts[0]);
        assert_eq!(*curve.control_points.last().unwrap(), pts[3]);
        assert!(curve.point_at(-10.0).abs_diff_eq(&pts[0], 1e-12));
        assert!(curve.point_at(10.0).abs_diff_eq(&pts[3], 1e-12));
    }

    #[test]
    fn lower_degrees_interpolate() {
        let pts = zigzag(5);
        for degree in 1..=2 {
            let curve = NurbsCurve::through_edit_points(&pts, degree, true).unwrap();
            assert_eq!(curve.control_points.len(), pts.len() + degree - 1);
            for (p, u) in pts.iter().zip(&curve.params) {
                assert!(curve.point_at(*u).abs_diff_eq(p, 1e-9));
            }
        }
    }

    #[test]
    fn repeated_points_with_uniform_params() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        let curve = NurbsCurve::through_edit_points(&[Vec3::ZERO, p, p], 3, true).unwrap();
        assert!(curve.point_at(2.0).abs_diff_eq(&p, 1e-9));

        // Chord length degenerates and falls back to uniform
        let curve = NurbsCurve::through_edit_points(&[Vec3::ZERO, p, p], 3, false).unwrap();
        assert_eq!(curve.params, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn too_few_points_is_an_error() {
        let err = NurbsCurve::through_edit_points(&[Vec3::ZERO], 3, true).unwrap_err();
        assert!(matches!(err, QuillError::InsufficientPoints { required: 2, got: 1 }));
    }

    #[test]
    fn rejects_bad_input() {
        let pts = zigzag(3);
        assert!(NurbsCurve::through_edit_points(&pts, 0, true).is_err());
        assert!(NurbsCurve::through_edit_points(&pts, 4, true).is_err());

        let nan = vec![Vec3::ZERO, Vec3::new(f64::NAN, 0.0, 0.0)];
        assert!(NurbsCurve::through_edit_points(&nan, 3, true).is_err());
    }

    #[test]
    fn length_of_straight_line() {
        let curve = NurbsCurve::through_edit_points(
            &[Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0)],
            3,
            true,
        )
        .unwrap();
        assert!((curve.approximate_length(16) - 2.0).abs() < 1e-9);
    }
}
