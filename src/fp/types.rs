#![allow(clippy::all, clippy::pedantic)]

use num_traits::{WrappingAdd, WrappingSub};
use uint::construct_uint;

construct_uint! {
    /// 256-bit unsigned integer, constructed out of 4 words x 64 bits.
    pub struct U256(4);
}

construct_uint! {
    /// 512-bit unsigned integer, constructed out of 8 words x 64 bits.
    pub struct U512(8);
}

impl U256 {
    /// Lossless conversion into the 512-bit type; the upper half is zeroed.
    pub const fn widen(self) -> U512 {
        U512([
            self.0[0], self.0[1], self.0[2], self.0[3], 0, 0, 0, 0,
        ])
    }

    /// `true` if value fits into 128 bits
    pub const fn fits_u128(&self) -> bool {
        self.0[2] == 0 && self.0[3] == 0
    }
}

impl U512 {
    /// Lower half of the value, or `None` if the upper half is not zero.
    pub const fn narrow(self) -> Option<U256> {
        if self.0[4] == 0 && self.0[5] == 0 && self.0[6] == 0 && self.0[7] == 0 {
            Some(U256([self.0[0], self.0[1], self.0[2], self.0[3]]))
        } else {
            None
        }
    }
}

// Fee growth accumulators are defined modulo 2^256
impl WrappingAdd for U256 {
    fn wrapping_add(&self, v: &Self) -> Self {
        self.overflowing_add(*v).0
    }
}

impl WrappingSub for U256 {
    fn wrapping_sub(&self, v: &Self) -> Self {
        self.overflowing_sub(*v).0
    }
}

#[cfg(test)]
mod tests {
    use super::{U256, U512};
    use num_traits::{WrappingAdd, WrappingSub};
    use quickcheck::quickcheck;

    #[test]
    fn widen_narrow() {
        let value = U256::MAX;
        assert_eq!(value.widen().narrow(), Some(value));
        assert_eq!((value.widen() + U512::one()).narrow(), None);
    }

    #[test]
    fn wrapping_accumulator_arithmetic() {
        let near_max = U256::MAX - U256::from(5u8);
        let wrapped = WrappingAdd::wrapping_add(&near_max, &U256::from(10u8));
        assert_eq!(wrapped, U256::from(4u8));
        assert_eq!(
            WrappingSub::wrapping_sub(&wrapped, &near_max),
            U256::from(10u8)
        );
    }

    #[test]
    fn fits_u128() {
        assert!(U256::from(u128::MAX).fits_u128());
        assert!(!(U256::from(u128::MAX) + U256::one()).fits_u128());
    }

    quickcheck! {
        fn wrapping_sub_inverts_wrapping_add(a: u128, b: u128, shift: u8) -> bool {
            let a = U256::from(a) << (u32::from(shift) % 200);
            let b = U256::from(b);
            WrappingSub::wrapping_sub(&WrappingAdd::wrapping_add(&a, &b), &a) == b
        }
    }
}
