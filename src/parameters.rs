// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::group::Exponent;
use crate::{Error, Result};

use num_bigint_dig::BigUint;
use num_traits::One;

/// Bit length of every hash output (SHA-256).
pub const HASH_BITS: usize = 256;

/// Bit lengths used by key generation, credential issuance and signing.
///
/// Passed explicitly into every entry point that samples key material or
/// blinding exponents. [`Parameters::default`] yields production sizes,
/// [`Parameters::testing`] yields sizes small enough for unit tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameters {
    factor_bits: usize,
    verifiable_encryption_bits: usize,
    random_exponent_bits: usize,
    credential_exponent_bits: usize,
    credential_exponent_range_bits: usize,
    statistical_bits: usize,
    serial_bits: usize,
    blinding_exponent_bits: usize,
}

impl Parameters {
    /// Smallest accepted size for the safe primes and for `z`.
    pub const MIN_MODULUS_BITS: usize = 32;

    /// Create parameters with production sizes.
    pub fn new() -> Self {
        Self {
            factor_bits: 1024,
            verifiable_encryption_bits: 1024,
            random_exponent_bits: 2048,
            credential_exponent_bits: 597,
            credential_exponent_range_bits: 120,
            statistical_bits: 80,
            serial_bits: 256,
            blinding_exponent_bits: 2048 + 597 + HASH_BITS + 80,
        }
    }

    /// Test-sized parameters. Not secure.
    pub fn testing() -> Self {
        Self {
            factor_bits: 128,
            verifiable_encryption_bits: 128,
            random_exponent_bits: 256,
            credential_exponent_bits: 320,
            credential_exponent_range_bits: 16,
            statistical_bits: 32,
            serial_bits: 64,
            blinding_exponent_bits: 256 + 320 + HASH_BITS + 32,
        }
    }

    /// Set the bit length of each safe prime factor.
    pub fn factor_bits(mut self, bits: usize) -> Self {
        self.factor_bits = bits;
        self
    }

    /// Set the bit length of the verifiable-encryption prime `z`.
    pub fn verifiable_encryption_bits(mut self, bits: usize) -> Self {
        self.verifiable_encryption_bits = bits;
        self
    }

    /// Set the bit length of secret exponents.
    pub fn random_exponent_bits(mut self, bits: usize) -> Self {
        self.random_exponent_bits = bits;
        self
    }

    /// Set the bit length of the credential exponent `e`.
    pub fn credential_exponent_bits(mut self, bits: usize) -> Self {
        self.credential_exponent_bits = bits;
        self
    }

    /// Set the bit length of the interval above `2^(le - 1)` that credential
    /// exponents are drawn from.
    pub fn credential_exponent_range_bits(mut self, bits: usize) -> Self {
        self.credential_exponent_range_bits = bits;
        self
    }

    /// Set the statistical zero-knowledge slack of range proofs.
    pub fn statistical_bits(mut self, bits: usize) -> Self {
        self.statistical_bits = bits;
        self
    }

    /// Set the bit length of credential serial numbers.
    pub fn serial_bits(mut self, bits: usize) -> Self {
        self.serial_bits = bits;
        self
    }

    /// Set the bit length of proof blinding exponents.
    pub fn blinding_exponent_bits(mut self, bits: usize) -> Self {
        self.blinding_exponent_bits = bits;
        self
    }

    #[inline]
    pub fn get_factor_bits(&self) -> usize {
        self.factor_bits
    }

    #[inline]
    pub fn get_verifiable_encryption_bits(&self) -> usize {
        self.verifiable_encryption_bits
    }

    #[inline]
    pub fn get_random_exponent_bits(&self) -> usize {
        self.random_exponent_bits
    }

    #[inline]
    pub fn get_credential_exponent_bits(&self) -> usize {
        self.credential_exponent_bits
    }

    #[inline]
    pub fn get_credential_exponent_range_bits(&self) -> usize {
        self.credential_exponent_range_bits
    }

    #[inline]
    pub fn get_statistical_bits(&self) -> usize {
        self.statistical_bits
    }

    /// Bit length of the blinding for `e - 2^(le - 1)` in a presentation.
    ///
    /// Honest responses never exceed this length, which is what bounds the
    /// credential exponent a verifier accepts.
    #[inline]
    pub fn get_credential_exponent_blinding_bits(&self) -> usize {
        self.credential_exponent_range_bits + HASH_BITS + self.statistical_bits
    }

    /// `2^(le - 1)`, the offset every credential exponent starts from.
    pub fn credential_exponent_offset(&self) -> Exponent {
        Exponent::from(BigUint::one() << self.credential_exponent_bits.saturating_sub(1))
    }

    /// Whether `e` lies in `[2^(le - 1), 2^(le - 1) + 2^range)`.
    pub fn contains_credential_exponent(&self, e: &Exponent) -> bool {
        let offset = e.subtract(&self.credential_exponent_offset());
        !offset.is_negative() && offset.bits() <= self.credential_exponent_range_bits
    }

    #[inline]
    pub fn get_serial_bits(&self) -> usize {
        self.serial_bits
    }

    #[inline]
    pub fn get_blinding_exponent_bits(&self) -> usize {
        self.blinding_exponent_bits
    }

    /// Check the sizes against each other.
    ///
    /// Serials must stay below `z` so that a lodged serial can be recovered
    /// from its verifiable encryption. A credential exponent proven to lie
    /// within its range must stay above `1` even after the slack of the
    /// proof, and blinding exponents must be wider than the largest secret
    /// they hide.
    pub fn validate(&self) -> Result<()> {
        if self.factor_bits < Self::MIN_MODULUS_BITS {
            return Err(Error::BitLengthTooShort {
                min: Self::MIN_MODULUS_BITS,
                actual: self.factor_bits,
            });
        }
        if self.verifiable_encryption_bits < Self::MIN_MODULUS_BITS {
            return Err(Error::BitLengthTooShort {
                min: Self::MIN_MODULUS_BITS,
                actual: self.verifiable_encryption_bits,
            });
        }
        if self.random_exponent_bits == 0
            || self.credential_exponent_range_bits < 2
            || self.serial_bits == 0
        {
            return Err(Error::InvalidParameters("exponent lengths must be positive".into()));
        }
        if self.serial_bits >= self.verifiable_encryption_bits {
            return Err(Error::InvalidParameters(
                "serial numbers must be shorter than the verifiable encryption prime".into(),
            ));
        }
        if self.credential_exponent_bits < self.get_credential_exponent_blinding_bits() + 4 {
            return Err(Error::InvalidParameters(
                "credential exponents must be wider than their range proof".into(),
            ));
        }
        if self.blinding_exponent_bits <= self.random_exponent_bits + self.credential_exponent_bits
        {
            return Err(Error::InvalidParameters(
                "blinding exponents must be wider than the secrets they hide".into(),
            ));
        }
        Ok(())
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(Parameters::default().validate().is_ok());
        assert!(Parameters::testing().validate().is_ok());
    }

    #[test]
    fn rejects_short_factors() {
        let params = Parameters::testing().factor_bits(16);
        assert_eq!(
            params.validate(),
            Err(Error::BitLengthTooShort { min: 32, actual: 16 })
        );
    }

    #[test]
    fn rejects_serials_wider_than_z() {
        let params = Parameters::testing().serial_bits(128);
        assert!(matches!(params.validate(), Err(Error::InvalidParameters(_))));
    }

    #[test]
    fn rejects_credential_exponents_narrower_than_their_proof() {
        let params = Parameters::testing().credential_exponent_bits(64);
        assert!(matches!(params.validate(), Err(Error::InvalidParameters(_))));

        let params = Parameters::testing().credential_exponent_range_bits(1);
        assert!(matches!(params.validate(), Err(Error::InvalidParameters(_))));
    }

    #[test]
    fn credential_exponent_range() {
        let params = Parameters::testing();
        let offset = params.credential_exponent_offset();
        assert_eq!(offset.bits(), params.get_credential_exponent_bits());

        let one = Exponent::from(1u64);
        let widest = Exponent::from((1u64 << params.get_credential_exponent_range_bits()) - 1);
        let largest = offset.add(&widest);
        assert!(params.contains_credential_exponent(&offset));
        assert!(params.contains_credential_exponent(&largest));
        assert!(!params.contains_credential_exponent(&largest.add(&one)));
        assert!(!params.contains_credential_exponent(&one));
        assert!(!params.contains_credential_exponent(&offset.subtract(&one)));
    }

    #[test]
    fn rejects_narrow_blinding() {
        let params = Parameters::testing().blinding_exponent_bits(200);
        assert!(matches!(params.validate(), Err(Error::InvalidParameters(_))));
    }
}
