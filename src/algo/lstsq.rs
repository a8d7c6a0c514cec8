//! Small dense least-squares solves.

use nalgebra::{DMatrix, DVector, Vector4};

/// Ratio of smallest to largest singular value below which a system is
/// treated as rank deficient.
const RANK_TOL: f64 = 1e-10;

/// Minimize `|A x - b|` for a system with four unknowns.
///
/// `rows` are the rows of `A` and `rhs` the matching entries of `b`.
/// Returns `None` if `A` does not have full column rank or the solution is
/// not finite.
pub fn solve4(rows: &[[f64; 4]], rhs: &[f64]) -> Option<Vector4<f64>> {
    debug_assert_eq!(rows.len(), rhs.len());
    if rows.len() < 4 {
        return None;
    }

    let a = DMatrix::from_fn(rows.len(), 4, |i, j| rows[i][j]);
    let b = DVector::from_column_slice(rhs);

    let svd = a.svd(true, true);
    let largest = svd.singular_values.max();
    let smallest = svd.singular_values.min();
    if !(largest > 0.0) || !(smallest > RANK_TOL * largest) {
        return None;
    }

    let x = svd.solve(&b, 0.0).ok()?;
    let x = Vector4::new(x[0], x[1], x[2], x[3]);
    x.iter().all(|v| v.is_finite()).then_some(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_overdetermined_system() {
        // x = (1, 2, 3, 4)
        let rows = [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
            [1.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 1.0],
        ];
        let rhs = [1.0, 2.0, 3.0, 4.0, 3.0, 7.0];

        let x = solve4(&rows, &rhs).unwrap();
        assert!((x - Vector4::new(1.0, 2.0, 3.0, 4.0)).norm() < 1e-10);
    }

    #[test]
    fn test_least_squares_average() {
        // Inconsistent equations for x0 resolve to their mean
        let rows = [
            [1.0, 0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ];
        let rhs = [1.0, 3.0, 0.0, 0.0, 0.0];

        let x = solve4(&rows, &rhs).unwrap();
        assert!((x[0] - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_rank_deficient_is_rejected() {
        let rows = [
            [1.0, 1.0, 0.0, 0.0],
            [2.0, 2.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ];
        assert!(solve4(&rows, &[1.0, 2.0, 0.0, 0.0]).is_none());
    }

    #[test]
    fn test_underdetermined_is_rejected() {
        let rows = [[1.0, 0.0, 0.0, 0.0]];
        assert!(solve4(&rows, &[1.0]).is_none());
    }
}
