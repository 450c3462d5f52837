// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::Exponent;
use crate::error::{Error, Result};
use crate::util;

use std::sync::Arc;

use num_bigint_dig::BigUint;
use num_traits::One;

/// A residue `v ∈ [0, n)` tagged with the modulus of its group.
///
/// Elements of different groups cannot be combined; every binary operation
/// returns [`Error::GroupMismatch`] when the moduli differ.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Element {
    value: BigUint,
    modulus: Arc<BigUint>,
}

impl Element {
    /// Callers guarantee `value < modulus`.
    pub(crate) fn new(value: BigUint, modulus: Arc<BigUint>) -> Self {
        debug_assert!(value < *modulus);
        Self { value, modulus }
    }

    #[inline]
    pub fn value(&self) -> &BigUint {
        &self.value
    }

    #[inline]
    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    #[inline]
    pub fn is_one(&self) -> bool {
        self.value.is_one()
    }

    fn check_group(&self, other: &Element) -> Result<()> {
        if self.modulus != other.modulus {
            return Err(Error::GroupMismatch);
        }
        Ok(())
    }

    fn with_value(&self, value: BigUint) -> Self {
        Self { value, modulus: Arc::clone(&self.modulus) }
    }

    /// `self · other mod n`
    pub fn multiply(&self, other: &Element) -> Result<Element> {
        self.check_group(other)?;
        Ok(self.with_value((&self.value * &other.value) % &*self.modulus))
    }

    /// `self · other⁻¹ mod n`
    pub fn divide(&self, other: &Element) -> Result<Element> {
        self.multiply(&other.inverse()?)
    }

    /// The multiplicative inverse modulo `n`.
    ///
    /// Fails with [`Error::NotInvertible`] when the value shares a factor
    /// with the modulus.
    pub fn inverse(&self) -> Result<Element> {
        let inverse = util::mod_inverse(&self.value, &self.modulus)
            .map_err(|_| Error::NotInvertible)?;
        Ok(self.with_value(inverse))
    }

    /// `self^exponent mod n` for a signed exponent.
    ///
    /// Negative exponents go through the inverse of `self`.
    pub fn pow(&self, exponent: &Exponent) -> Result<Element> {
        let magnitude = exponent.magnitude();
        if exponent.is_negative() {
            Ok(self.inverse()?.pow_unsigned(&magnitude))
        } else {
            Ok(self.pow_unsigned(&magnitude))
        }
    }

    /// `self^exponent mod n` for a non-negative integer.
    pub fn pow_unsigned(&self, exponent: &BigUint) -> Element {
        self.with_value(self.value.modpow(exponent, &self.modulus))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::{Group, GroupWithKnownOrder};

    use num_bigint_dig::BigInt;

    fn group() -> GroupWithKnownOrder {
        GroupWithKnownOrder::new(BigUint::from(23u32 * 47), BigUint::from(22u32 * 46)).unwrap()
    }

    fn element(value: u32) -> Element {
        group().element(BigUint::from(value)).unwrap()
    }

    #[test]
    fn multiply_reduces() {
        let product = element(1000).multiply(&element(3)).unwrap();
        assert_eq!(product.value(), &BigUint::from(3000u32 % 1081));
    }

    #[test]
    fn inverse_cancels() {
        let a = element(17);
        let one = a.multiply(&a.inverse().unwrap()).unwrap();
        assert!(one.is_one());
        assert!(a.divide(&a).unwrap().is_one());
    }

    #[test]
    fn zero_divisors_are_not_invertible() {
        assert_eq!(element(23).inverse(), Err(Error::NotInvertible));
    }

    #[test]
    fn negative_exponent_inverts() {
        let a = element(5);
        let positive = a.pow(&Exponent::from(7u64)).unwrap();
        let negative = a.pow(&Exponent::new(BigInt::from(-7))).unwrap();
        assert!(positive.multiply(&negative).unwrap().is_one());
    }

    #[test]
    fn exponent_order_is_neutral() {
        let group = group();
        let a = element(123);
        let order = Exponent::from(group.order().clone());
        assert!(a.pow(&order).unwrap().is_one());
    }

    #[test]
    fn rejects_mixed_groups() {
        let other = GroupWithKnownOrder::new(BigUint::from(23u32 * 59), BigUint::from(22u32 * 58))
            .unwrap()
            .one();
        assert_eq!(element(3).multiply(&other), Err(Error::GroupMismatch));
    }
}
