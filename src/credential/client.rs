// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{Credential, ExposedExponent};
use crate::error::{Error, Result};
use crate::group::{Element, Exponent, Group};
use crate::key::PublicKey;
use crate::parameters::Parameters;

use std::sync::Arc;

use rand::{CryptoRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A credential as held by the client it was issued to.
///
/// Satisfies `ao^o = c^e · ab^b · au^u · ai^i · av^v` under the issuer's
/// public key. The exponents are secret and wiped on drop.
#[allow(missing_debug_implementations)]
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
#[cfg_attr(feature = "expose-secret", derive(Debug))]
pub struct ClientCredential {
    #[zeroize(skip)]
    public_key: Arc<PublicKey>,
    #[zeroize(skip)]
    exposed_exponent: ExposedExponent,
    #[zeroize(skip)]
    c: Element,
    e: Exponent,
    b: Exponent,
    u: Exponent,
    i: Exponent,
    v: Exponent,
    one_time: bool,
}

impl ClientCredential {
    /// Assemble a credential and check its verification equation.
    ///
    /// `e` must lie in the interval [`Parameters`] allows for credential
    /// exponents. Without that bound anyone could solve the equation for
    /// `e = 1`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        public_key: Arc<PublicKey>,
        exposed_exponent: ExposedExponent,
        c: Element,
        e: Exponent,
        b: Exponent,
        u: Exponent,
        i: Exponent,
        v: Exponent,
        one_time: bool,
        parameters: &Parameters,
    ) -> Result<Self> {
        if !public_key.composite_group().contains(&c) {
            return Err(Error::GroupMismatch);
        }
        if !parameters.contains_credential_exponent(&e) {
            tracing::warn!(issuer = exposed_exponent.issuer(), "credential exponent out of range");
            return Err(Error::InvalidCredential);
        }
        let credential = Self { public_key, exposed_exponent, c, e, b, u, i, v, one_time };
        credential.verify()?;
        Ok(credential)
    }

    /// Assemble a credential without any checks.
    #[cfg(test)]
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new_unchecked(
        public_key: Arc<PublicKey>,
        exposed_exponent: ExposedExponent,
        c: Element,
        e: Exponent,
        b: Exponent,
        u: Exponent,
        i: Exponent,
        v: Exponent,
        one_time: bool,
    ) -> Self {
        Self { public_key, exposed_exponent, c, e, b, u, i, v, one_time }
    }

    /// Check `ao^o = c^e · ab^b · au^u · ai^i · av^v`.
    pub fn verify(&self) -> Result<()> {
        let public_key = &*self.public_key;
        let left = public_key.ao().pow(&self.o())?;
        let right = self
            .c
            .pow(&self.e)?
            .multiply(&public_key.ab().pow(&self.b)?)?
            .multiply(&public_key.au().pow(&self.u)?)?
            .multiply(&public_key.ai().pow(&self.i)?)?
            .multiply(&public_key.av().pow(&self.v)?)?;

        if left != right {
            tracing::warn!(issuer = self.exposed_exponent.issuer(), "credential does not verify");
            return Err(Error::InvalidCredential);
        }
        Ok(())
    }

    /// A fresh randomization of this credential.
    ///
    /// Returns a copy with `c ← c · ab^rho` and `b ← b − e·rho` for a random
    /// `rho`; the verification equation is unaffected since `c^e` gains
    /// exactly `ab^(e·rho)`.
    pub fn randomize<R: RngCore + CryptoRng>(
        &self,
        parameters: &Parameters,
        rng: &mut R,
    ) -> Result<ClientCredential> {
        let rho = self
            .public_key
            .composite_group()
            .random_exponent(rng, parameters.get_random_exponent_bits());

        let mut randomized = self.clone();
        randomized.c = self.c.multiply(&self.public_key.ab().pow(&rho)?)?;
        randomized.b = self.b.subtract(&self.e.multiply(&rho));
        Ok(randomized)
    }

    /// The issuer's public key.
    #[inline]
    pub fn public_key(&self) -> &Arc<PublicKey> {
        &self.public_key
    }

    #[inline]
    pub fn c(&self) -> &Element {
        &self.c
    }

    #[inline]
    pub fn e(&self) -> &Exponent {
        &self.e
    }

    #[inline]
    pub fn b(&self) -> &Exponent {
        &self.b
    }

    /// The client's identity secret.
    #[inline]
    pub fn u(&self) -> &Exponent {
        &self.u
    }

    #[inline]
    pub fn i(&self) -> &Exponent {
        &self.i
    }

    #[inline]
    pub fn v(&self) -> &Exponent {
        &self.v
    }

    /// One-time credentials disclose their serial when shown.
    #[inline]
    pub fn is_one_time(&self) -> bool {
        self.one_time
    }
}

impl Credential for ClientCredential {
    fn exposed_exponent(&self) -> &ExposedExponent {
        &self.exposed_exponent
    }

    fn serial(&self) -> Option<&Exponent> {
        Some(&self.i)
    }
}
