//! Wide unsigned integers and the full-precision arithmetic built on top of them.
//!
//! Prices are kept as Q64.96 square roots, fee growth as Q128.96-ish accumulators,
//! so every product that mixes them goes through a 512-bit intermediate.
mod full_math;
mod quad_math;
mod safe_cast;
mod types;

pub use full_math::{div_ceil, mul_div_ceil, mul_div_floor, mul_div_rounding};
pub use quad_math::smaller_root_of_quad_eqn;
pub use safe_cast::{neg_to_i128, to_i128, to_u128};
pub use types::{U256, U512};

/// Number of fractional bits of Q64.96 values.
pub const RES_96: u32 = 96;

/// `2^96`, the unit of Q64.96 values
pub const TWO_POW_96: U256 = U256([0, 1 << 32, 0, 0]);

#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Arithmetic overflow")]
    Overflow,
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Denominator too small relative to product")]
    DenominatorTooSmall,
}

#[cfg(test)]
mod tests {
    use super::{TWO_POW_96, U256};

    #[test]
    fn two_pow_96_is_exact() {
        assert_eq!(TWO_POW_96, U256::one() << 96u32);
        assert_eq!(
            TWO_POW_96.to_string(),
            "79228162514264337593543950336".to_string()
        );
    }
}
