//! Adaptive-precision orientation test for three points in the plane.
//!
//! The cheap floating-point determinant is used whenever its error bound
//! proves the sign correct. Otherwise the determinant is recomputed exactly
//! as a floating-point expansion: a list of non-overlapping components
//! ordered by increasing magnitude whose sum is the exact value.

use corridor_core::Point;

const EPSILON: f64 = 1.110_223_024_625_156_5e-16;
const ERRBOUND3: f64 = (3.0 + 16.0 * EPSILON) * EPSILON;
/// `2^27 + 1`, used to split a double into two 26-bit halves.
const SPLITTER: f64 = 134_217_729.0;

/// Orientation of the triangle `(a, b, c)`.
///
/// Positive for one turning sense, negative for the other, zero when the
/// three points are collinear. With `a = (0, 0)`, `b = (1, 0)` and
/// `c = (0, -1)` the result is positive. The sign is always exact.
pub fn orient(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
    let l = (a[1] - c[1]) * (b[0] - c[0]);
    let r = (a[0] - c[0]) * (b[1] - c[1]);
    let det = l - r;
    let s;
    if l > 0.0 {
        if r <= 0.0 {
            return det;
        }
        s = l + r;
    } else if l < 0.0 {
        if r >= 0.0 {
            return det;
        }
        s = -(l + r);
    } else {
        return det;
    }
    let tol = ERRBOUND3 * s;
    if det >= tol || det <= -tol {
        return det;
    }
    orient_exact(a, b, c)
}

/// [`orient`] on integer points.
#[inline]
pub fn orient_points(a: Point, b: Point, c: Point) -> f64 {
    orient(
        [a.x as f64, a.y as f64],
        [b.x as f64, b.y as f64],
        [c.x as f64, c.y as f64],
    )
}

fn orient_exact(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
    let p = sum(
        &sum(&two_product(b[1], c[0]), &two_product(-c[1], b[0])),
        &sum(&two_product(a[1], b[0]), &two_product(-b[1], a[0])),
    );
    let n = sum(&two_product(a[1], c[0]), &two_product(-c[1], a[0]));
    let d = diff(&p, &n);
    d.last().copied().unwrap_or(0.0)
}

/// Exact product as `[lo, hi]`.
fn two_product(a: f64, b: f64) -> [f64; 2] {
    let x = a * b;
    let (ahi, alo) = split(a);
    let (bhi, blo) = split(b);
    let err = x - ahi * bhi - alo * bhi - ahi * blo;
    [alo * blo - err, x]
}

#[inline]
fn split(a: f64) -> (f64, f64) {
    let c = SPLITTER * a;
    let abig = c - a;
    let hi = c - abig;
    (hi, a - hi)
}

/// Exact sum of two doubles as `(lo, hi)`.
#[inline]
fn two_sum(a: f64, b: f64) -> (f64, f64) {
    let x = a + b;
    let bv = x - a;
    let av = x - bv;
    let br = b - bv;
    let ar = a - av;
    (ar + br, x)
}

/// Like [`two_sum`] but requires `|a| >= |b|`.
#[inline]
fn fast_two_sum(a: f64, b: f64) -> (f64, f64) {
    let x = a + b;
    let bv = x - a;
    (b - bv, x)
}

/// Merge two expansions into one sequence of increasing magnitude.
fn merge_by_magnitude(e: &[f64], f: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(e.len() + f.len());
    let (mut i, mut j) = (0, 0);
    while i < e.len() || j < f.len() {
        if i < e.len() && (j >= f.len() || e[i].abs() < f[j].abs()) {
            out.push(e[i]);
            i += 1;
        } else {
            out.push(f[j]);
            j += 1;
        }
    }
    out
}

/// Exact sum of two expansions. Zero components are dropped; the result
/// holds at least one component.
fn sum(e: &[f64], f: &[f64]) -> Vec<f64> {
    let merged = merge_by_magnitude(e, f);
    let mut g = Vec::with_capacity(merged.len());
    let mut it = merged.into_iter();
    let (Some(first), Some(second)) = (it.next(), it.next()) else {
        return vec![e.first().or(f.first()).copied().unwrap_or(0.0)];
    };
    let (mut q0, mut q1) = fast_two_sum(second, first);
    for x in it {
        let (y, s) = fast_two_sum(x, q0);
        if y != 0.0 {
            g.push(y);
        }
        (q0, q1) = two_sum(q1, s);
    }
    if q0 != 0.0 {
        g.push(q0);
    }
    if q1 != 0.0 {
        g.push(q1);
    }
    if g.is_empty() {
        g.push(0.0);
    }
    g
}

fn diff(e: &[f64], f: &[f64]) -> Vec<f64> {
    let neg: Vec<f64> = f.iter().map(|v| -v).collect();
    sum(e, &neg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_convention() {
        assert!(orient([0.0, 0.0], [1.0, 0.0], [0.0, -1.0]) > 0.0);
        assert!(orient([0.0, 0.0], [0.0, -1.0], [1.0, 0.0]) < 0.0);
        assert!(orient_points(Point::new(0, 0), Point::new(1, 0), Point::new(0, -1)) > 0.0);
    }

    #[test]
    fn collinear_is_zero() {
        assert_eq!(orient([0.0, 0.0], [1.0, 1.0], [5.0, 5.0]), 0.0);
        assert_eq!(
            orient_points(Point::new(2, 3), Point::new(2, 7), Point::new(2, -4)),
            0.0
        );
    }

    #[test]
    fn inexact_collinear_falls_back_to_exact() {
        // Points on y = x whose differences are not exactly representable.
        assert_eq!(orient([0.1, 0.1], [0.2, 0.2], [0.3, 0.3]), 0.0);
        assert_eq!(orient([0.1, 0.2], [0.2, 0.4], [0.3, 0.6]), 0.0);
    }

    #[test]
    fn tiny_perturbation_keeps_sign() {
        let e = (-51f64).exp2();
        let a = [0.0, 0.0];
        let b = [1.0, 1.0];
        let c = [2.0, 2.0 + e];
        assert!(orient(a, b, c) < 0.0);
        assert!(orient(a, c, b) > 0.0);
        assert!(orient_exact(a, b, c) < 0.0);
    }

    #[test]
    fn expansion_sum_is_exact() {
        let big = 1e100;
        let s = sum(&[1.0], &[big]);
        let d = diff(&s, &[big]);
        assert_eq!(d, vec![1.0]);
        assert_eq!(sum(&[0.0], &[0.0]), vec![0.0]);
    }

    #[test]
    fn two_product_captures_low_bits() {
        let a = 1.0 + EPSILON * 2.0;
        let [lo, hi] = two_product(a, a);
        assert_eq!(hi, a * a);
        assert!(lo != 0.0);
        assert_eq!(two_product(3.0, 4.0), [0.0, 12.0]);
    }
}
