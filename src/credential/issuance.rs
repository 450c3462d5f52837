// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{ClientCredential, ExposedExponent};
use crate::error::{Error, Result};
use crate::group::{Element, Exponent, Group};
use crate::key::PublicKey;
use crate::keypair::KeyPair;
use crate::parameters::Parameters;

use std::sync::Arc;

use rand::{CryptoRng, RngCore};

/// The client's blind commitment `f = au^u · av^v` to its secrets.
pub fn blind_commitment(public_key: &PublicKey, u: &Exponent, v: &Exponent) -> Result<Element> {
    public_key.au().pow(u)?.multiply(&public_key.av().pow(v)?)
}

/// The issuer's answer to a blind commitment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedCredential {
    pub c: Element,
    pub e: Exponent,
    pub b: Exponent,
    pub i: Exponent,
}

impl IssuedCredential {
    /// Combine the issuer's answer with the client's own secrets.
    ///
    /// Fails with [`Error::InvalidCredential`] if `u` and `v` are not the
    /// secrets the commitment was made with.
    pub fn complete(
        self,
        public_key: Arc<PublicKey>,
        exposed_exponent: ExposedExponent,
        u: Exponent,
        v: Exponent,
        one_time: bool,
        parameters: &Parameters,
    ) -> Result<ClientCredential> {
        let Self { c, e, b, i } = self;
        ClientCredential::new(
            public_key,
            exposed_exponent,
            c,
            e,
            b,
            u,
            i,
            v,
            one_time,
            parameters,
        )
    }
}

/// Sign the blind commitment `f` for `exposed_exponent`.
///
/// Picks a fresh serial `i`, blinding `b` and an exponent `e` coprime with
/// the group order from `[2^(le - 1), 2^(le - 1) + 2^range)`, and solves
/// the verification equation for `c = (ao^o · (ab^b · f · ai^i)^-1)^(e^-1)`,
/// which only the holder of the factorization can do.
pub fn issue<R: RngCore + CryptoRng>(
    key_pair: &KeyPair,
    exposed_exponent: &ExposedExponent,
    f: &Element,
    parameters: &Parameters,
    rng: &mut R,
) -> Result<IssuedCredential> {
    parameters.validate()?;
    let public_key = key_pair.public_key();
    let group = key_pair.private_key().composite_group();
    if !group.contains(f) {
        return Err(Error::GroupMismatch);
    }

    let i = group.random_exponent(rng, parameters.get_serial_bits());
    let b = group.random_exponent(rng, parameters.get_random_exponent_bits());

    // One bit of headroom for the search of a relative prime.
    let offset = parameters.credential_exponent_offset();
    let range_bits = parameters.get_credential_exponent_range_bits() - 1;
    let e = loop {
        let e = offset.add(&group.random_exponent(rng, range_bits)).next_relative_prime(group);
        if parameters.contains_credential_exponent(&e) {
            break e;
        }
    };
    let e_inverse = e.inverse(group)?;

    let blinded = public_key.ab().pow(&b)?.multiply(f)?.multiply(&public_key.ai().pow(&i)?)?;
    let c = public_key.ao().pow(&exposed_exponent.hash())?.divide(&blinded)?.pow(&e_inverse)?;

    tracing::debug!(issuer = exposed_exponent.issuer(), "credential issued");
    Ok(IssuedCredential { c, e, b, i })
}
