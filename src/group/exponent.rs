// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::GroupWithKnownOrder;
use crate::error::{Error, Result};
use crate::util;

use num_bigint_dig::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use zeroize::Zeroize;

/// An arbitrary-precision signed integer used as an exponent.
///
/// Arithmetic is plain integer arithmetic without any reduction, so proof
/// responses such as `r - t·x` can be computed in groups whose order is
/// unknown to the prover.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Zeroize)]
pub struct Exponent(BigInt);

impl Exponent {
    pub fn new(value: BigInt) -> Self {
        Self(value)
    }

    #[inline]
    pub fn value(&self) -> &BigInt {
        &self.0
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    /// Bit length of the absolute value.
    #[inline]
    pub fn bits(&self) -> usize {
        self.0.bits()
    }

    /// Absolute value as an unsigned integer.
    pub fn magnitude(&self) -> BigUint {
        self.0.abs().to_biguint().unwrap_or_else(BigUint::zero)
    }

    pub fn add(&self, other: &Exponent) -> Exponent {
        Self(&self.0 + &other.0)
    }

    pub fn subtract(&self, other: &Exponent) -> Exponent {
        Self(&self.0 - &other.0)
    }

    pub fn multiply(&self, other: &Exponent) -> Exponent {
        Self(&self.0 * &other.0)
    }

    /// Bitwise XOR of the absolute values.
    ///
    /// Only used to combine hash outputs, which are never negative.
    pub fn xor(&self, other: &Exponent) -> Exponent {
        Self::from(&self.magnitude() ^ &other.magnitude())
    }

    /// The least non-negative residue modulo `modulus`.
    pub fn modulo(&self, modulus: &BigUint) -> BigUint {
        let modulus = BigInt::from_biguint(Sign::Plus, modulus.clone());
        self.0.mod_floor(&modulus).to_biguint().unwrap_or_else(BigUint::zero)
    }

    /// The inverse modulo the order of `group`.
    ///
    /// Taking a [`GroupWithKnownOrder`] makes it impossible to call this on
    /// a public group.
    pub fn inverse(&self, group: &GroupWithKnownOrder) -> Result<Exponent> {
        let reduced = self.modulo(group.order());
        let inverse =
            util::mod_inverse(&reduced, group.order()).map_err(|_| Error::NotInvertible)?;
        Ok(Self::from(inverse))
    }

    /// The smallest integer `≥ self` that is coprime with the order of `group`.
    pub fn next_relative_prime(&self, group: &GroupWithKnownOrder) -> Exponent {
        let order = BigInt::from_biguint(Sign::Plus, group.order().clone());
        let mut candidate = self.0.clone();
        while !candidate.gcd(&order).is_one() {
            candidate += 1u32;
        }
        Self(candidate)
    }
}

impl From<BigUint> for Exponent {
    fn from(value: BigUint) -> Self {
        Self(BigInt::from_biguint(Sign::Plus, value))
    }
}

impl From<BigInt> for Exponent {
    fn from(value: BigInt) -> Self {
        Self(value)
    }
}

impl From<u64> for Exponent {
    fn from(value: u64) -> Self {
        Self(BigInt::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group() -> GroupWithKnownOrder {
        GroupWithKnownOrder::new(BigUint::from(23u32 * 47), BigUint::from(22u32 * 46)).unwrap()
    }

    #[test]
    fn arithmetic_does_not_reduce() {
        let a = Exponent::from(5000u64);
        let b = Exponent::from(7000u64);
        assert_eq!(a.subtract(&b), Exponent::new(BigInt::from(-2000)));
        assert_eq!(a.multiply(&b), Exponent::from(35_000_000u64));
        assert_eq!(a.add(&b), Exponent::from(12_000u64));
    }

    #[test]
    fn modulo_is_non_negative() {
        let a = Exponent::new(BigInt::from(-3));
        assert_eq!(a.modulo(&BigUint::from(10u32)), BigUint::from(7u32));
    }

    #[test]
    fn inverse_modulo_order() {
        let group = group();
        let e = Exponent::from(65537u64).next_relative_prime(&group);
        let d = e.inverse(&group).unwrap();
        let product = e.multiply(&d).modulo(group.order());
        assert!(product.is_one());
    }

    #[test]
    fn next_relative_prime_skips_common_factors() {
        let group = group();
        // 1012 = 2² · 11 · 23, so 22 up to 24 are skipped.
        assert_eq!(Exponent::from(22u64).next_relative_prime(&group), Exponent::from(25u64));
        assert_eq!(Exponent::from(25u64).next_relative_prime(&group), Exponent::from(25u64));
    }

    #[test]
    fn non_coprime_exponent_has_no_inverse() {
        let group = group();
        assert_eq!(Exponent::from(44u64).inverse(&group), Err(Error::NotInvertible));
    }

    #[test]
    fn xor_combines_magnitudes() {
        let a = Exponent::from(0b1100u64);
        let b = Exponent::from(0b1010u64);
        assert_eq!(a.xor(&b), Exponent::from(0b0110u64));
    }
}
