use super::{Error, U256};

/// Smaller root of `a*x^2 - 2*b*x + c = 0`, i.e. `(b - sqrt(b^2 - a*c)) / a`, rounded down.
///
/// `b^2` and `a*c` are evaluated in 512 bits, so large liquidity values do not overflow.
pub fn smaller_root_of_quad_eqn(a: U256, b: U256, c: U256) -> Result<U256, Error> {
    if a.is_zero() {
        return Err(Error::DivisionByZero);
    }
    let (b_squared, _) = b.widen().overflowing_mul(b.widen());
    let (ac, _) = a.widen().overflowing_mul(c.widen());
    // negative discriminant means there is no real root
    let discriminant = b_squared.checked_sub(ac).ok_or(Error::Overflow)?;
    let root = discriminant
        .integer_sqrt()
        .narrow()
        .ok_or(Error::Overflow)?;
    let numerator = b.checked_sub(root).ok_or(Error::Overflow)?;
    Ok(numerator / a)
}
