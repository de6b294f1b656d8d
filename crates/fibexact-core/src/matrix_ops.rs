//! Matrix multiplication operations for powers of the Fibonacci Q matrix.
//!
//! Every power of Q = [[1,1],[1,0]] (and the identity) satisfies b == c
//! and a == b + d. Both operations below require those invariants of
//! their operands and preserve them in the product, which cuts the
//! standard eight big-integer products down to five (multiply) or three
//! squarings plus one multiply (square).

use crate::matrix_types::Matrix;

/// Multiply two 2x2 matrices that are powers of Q.
///
/// With X = [[a,b],[b,d]] and Y = [[a',b'],[b',d']]:
///   result.a = a*a' + b*b'
///   result.b = a*b' + b*d'   (== result.c by the operand invariants)
///   result.d = b*b' + d*d'
#[must_use]
pub fn matrix_multiply(x: &Matrix, y: &Matrix) -> Matrix {
    let aa = &x.a * &y.a;
    let bb = &x.b * &y.b;
    let ab = &x.a * &y.b;
    let bd = &x.b * &y.d;
    let dd = &x.d * &y.d;

    let b = ab + bd;
    Matrix {
        a: aa + &bb,
        c: b.clone(),
        b,
        d: bb + dd,
    }
}

/// Square a 2x2 matrix that is a power of Q.
///
/// Three squarings plus one multiply:
///   result.a = a^2 + b^2
///   result.b = b * (a + d)   (== result.c)
///   result.d = b^2 + d^2
#[must_use]
pub fn matrix_square(m: &Matrix) -> Matrix {
    let a_sq = &m.a * &m.a;
    let b_sq = &m.b * &m.b;
    let d_sq = &m.d * &m.d;
    let b = &m.b * (&m.a + &m.d);

    Matrix {
        a: a_sq + &b_sq,
        c: b.clone(),
        b,
        d: b_sq + d_sq,
    }
}

/// Check the power-of-Q invariants (b == c and a == b + d).
/// Used by debug assertions and tests.
#[must_use]
pub fn is_q_power_shape(m: &Matrix) -> bool {
    m.b == m.c && m.a == &m.b + &m.d
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;

    #[test]
    fn multiply_identity() {
        let id = Matrix::identity();
        let q = Matrix::fibonacci_q();
        let result = matrix_multiply(&id, &q);
        assert_eq!(result.a, q.a);
        assert_eq!(result.b, q.b);
        assert_eq!(result.c, q.c);
        assert_eq!(result.d, q.d);
    }

    #[test]
    fn multiply_q_by_identity_both_sides() {
        let id = Matrix::identity();
        let q = Matrix::fibonacci_q();

        let left = matrix_multiply(&id, &q);
        let right = matrix_multiply(&q, &id);

        assert_eq!(left.a, q.a);
        assert_eq!(left.b, q.b);
        assert_eq!(right.a, q.a);
        assert_eq!(right.b, q.b);
    }

    #[test]
    fn square_q_matrix() {
        let q = Matrix::fibonacci_q();
        let q2 = matrix_square(&q);
        // Q^2 = [[2,1],[1,1]]
        assert_eq!(q2.a, BigUint::from(2u32));
        assert_eq!(q2.b, BigUint::from(1u32));
        assert_eq!(q2.c, BigUint::from(1u32));
        assert_eq!(q2.d, BigUint::from(1u32));
    }

    #[test]
    fn square_identity_is_identity() {
        let id = Matrix::identity();
        let sq = matrix_square(&id);
        assert!(sq.is_identity());
    }

    #[test]
    fn cube_q_matrix() {
        let q = Matrix::fibonacci_q();
        let q2 = matrix_square(&q);
        let q3 = matrix_multiply(&q2, &q);
        // Q^3 = [[3,2],[2,1]]
        assert_eq!(q3.a, BigUint::from(3u32));
        assert_eq!(q3.b, BigUint::from(2u32));
    }

    #[test]
    fn q_power_5_gives_fib_5() {
        // Q^n gives F(n) in position b, F(n+1) in position a
        let q = Matrix::fibonacci_q();
        let q2 = matrix_square(&q);
        let q4 = matrix_square(&q2);
        let q5 = matrix_multiply(&q4, &q);
        assert_eq!(q5.a, BigUint::from(8u32)); // F(6)
        assert_eq!(q5.b, BigUint::from(5u32)); // F(5)
        assert_eq!(q5.c, BigUint::from(5u32));
        assert_eq!(q5.d, BigUint::from(3u32)); // F(4)
    }

    #[test]
    fn q_power_10_gives_fib_10() {
        let q = Matrix::fibonacci_q();
        let q2 = matrix_square(&q);
        let q4 = matrix_square(&q2);
        let q8 = matrix_square(&q4);
        let q10 = matrix_multiply(&q8, &q2);
        assert_eq!(q10.a, BigUint::from(89u32)); // F(11)
        assert_eq!(q10.b, BigUint::from(55u32)); // F(10)
    }

    #[test]
    fn q_power_shape_preserved_through_operations() {
        let q = Matrix::fibonacci_q();
        assert!(is_q_power_shape(&q));
        assert!(is_q_power_shape(&Matrix::identity()));

        let q2 = matrix_square(&q);
        assert!(is_q_power_shape(&q2));

        let q3 = matrix_multiply(&q2, &q);
        assert!(is_q_power_shape(&q3));

        let q6 = matrix_square(&q3);
        assert!(is_q_power_shape(&q6));
    }
}
