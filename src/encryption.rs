// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::error::{Error, Result};
use crate::group::{Element, Exponent};

/// An ElGamal-style encryption `(c1, c2) = (y^r · (z + 1)^m, g^r)` in the
/// square group of a host's public key.
///
/// Produced by [`PublicKey::get_verifiable_encryption`] and opened with
/// [`PrivateKey::decrypt_verifiable_encryption`].
///
/// [`PublicKey::get_verifiable_encryption`]: crate::PublicKey::get_verifiable_encryption
/// [`PrivateKey::decrypt_verifiable_encryption`]: crate::PrivateKey::decrypt_verifiable_encryption
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VerifiableEncryption {
    c1: Element,
    c2: Element,
}

impl VerifiableEncryption {
    /// Both components must come from the same group.
    pub fn new(c1: Element, c2: Element) -> Result<Self> {
        if c1.modulus() != c2.modulus() {
            return Err(Error::GroupMismatch);
        }
        Ok(Self { c1, c2 })
    }

    #[inline]
    pub fn c1(&self) -> &Element {
        &self.c1
    }

    #[inline]
    pub fn c2(&self) -> &Element {
        &self.c2
    }

    /// Homomorphic addition of plaintexts: `E(m₁) · E(m₂) = E(m₁ + m₂)`.
    pub fn multiply(&self, other: &VerifiableEncryption) -> Result<VerifiableEncryption> {
        Ok(Self { c1: self.c1.multiply(&other.c1)?, c2: self.c2.multiply(&other.c2)? })
    }

    /// Homomorphic scaling of the plaintext: `E(m)^k = E(k·m)`.
    pub fn pow(&self, exponent: &Exponent) -> Result<VerifiableEncryption> {
        Ok(Self { c1: self.c1.pow(exponent)?, c2: self.c2.pow(exponent)? })
    }
}
