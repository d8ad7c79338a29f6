//! GF(256) arithmetic for Shamir secret sharing.
//!
//! Elements are bytes; addition is XOR and multiplication is modulo the AES
//! polynomial `x^8 + x^4 + x^3 + x + 1`. Multiplication runs a fixed eight
//! rounds with masks instead of branches on secret bits.

/// Reduction constant for the AES polynomial (without the `x^8` term).
const REDUCTION: u8 = 0x1b;

/// Field addition (and subtraction).
#[inline]
pub(crate) const fn add(a: u8, b: u8) -> u8 {
    a ^ b
}

/// Field multiplication.
pub(crate) const fn mul(a: u8, b: u8) -> u8 {
    let mut a = a;
    let mut b = b;
    let mut product = 0u8;
    let mut round = 0;
    while round < 8 {
        product ^= a & 0u8.wrapping_sub(b & 1);
        let carry = a >> 7;
        a = (a << 1) ^ (REDUCTION & 0u8.wrapping_sub(carry));
        b >>= 1;
        round += 1;
    }
    product
}

/// Multiplicative inverse, computed as `a^254`. The inverse of 0 is 0.
pub(crate) const fn inv(a: u8) -> u8 {
    let mut result = 1u8;
    let mut base = a;
    let mut exponent = 254u8;
    while exponent > 0 {
        if exponent & 1 == 1 {
            result = mul(result, base);
        }
        base = mul(base, base);
        exponent >>= 1;
    }
    result
}

/// Field division. Callers guarantee `b != 0`.
pub(crate) const fn div(a: u8, b: u8) -> u8 {
    mul(a, inv(b))
}

/// Evaluates the polynomial with `coefficients` (constant term first) at `x`.
pub(crate) fn eval(coefficients: &[u8], x: u8) -> u8 {
    coefficients
        .iter()
        .rev()
        .fold(0u8, |acc, &c| add(mul(acc, x), c))
}

/// Lagrange interpolation at zero over the points `(xs[i], ys[i])`.
///
/// The x-coordinates must be distinct and non-zero.
pub(crate) fn interpolate_at_zero(xs: &[u8], ys: &[u8]) -> u8 {
    let mut secret = 0u8;
    for (i, (&xi, &yi)) in xs.iter().zip(ys).enumerate() {
        let mut basis = 1u8;
        for (j, &xj) in xs.iter().enumerate() {
            if i != j {
                basis = mul(basis, div(xj, add(xj, xi)));
            }
        }
        secret = add(secret, mul(yi, basis));
    }
    secret
}
