// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{Credential, ExposedExponent};
use crate::encryption::VerifiableEncryption;
use crate::error::Result;
use crate::group::Exponent;
use crate::key::PublicKey;
use crate::keypair::KeyPair;

use std::sync::Arc;

/// A credential as seen by a verifier after a successful presentation.
///
/// Holds the issuer's public key, the exposed exponent and, depending on
/// how the credential was shown, either the disclosed serial or the serial
/// and the blinding exponent encrypted for the issuer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostCredential {
    public_key: Arc<PublicKey>,
    exposed_exponent: ExposedExponent,
    serial: Option<Exponent>,
    encrypted_serial: Option<VerifiableEncryption>,
    encrypted_blinding: Option<VerifiableEncryption>,
}

impl HostCredential {
    pub fn new(
        public_key: Arc<PublicKey>,
        exposed_exponent: ExposedExponent,
        serial: Option<Exponent>,
        encrypted_serial: Option<VerifiableEncryption>,
        encrypted_blinding: Option<VerifiableEncryption>,
    ) -> Self {
        Self { public_key, exposed_exponent, serial, encrypted_serial, encrypted_blinding }
    }

    /// The issuer's public key.
    #[inline]
    pub fn public_key(&self) -> &Arc<PublicKey> {
        &self.public_key
    }

    /// The serial encrypted for the issuer, if the credential was lodged.
    #[inline]
    pub fn encrypted_serial(&self) -> Option<&VerifiableEncryption> {
        self.encrypted_serial.as_ref()
    }

    /// The blinding exponent `b` of the shown credential encrypted for the
    /// issuer, if the credential was lodged.
    #[inline]
    pub fn encrypted_blinding(&self) -> Option<&VerifiableEncryption> {
        self.encrypted_blinding.as_ref()
    }

    /// Recover the serial of a lodged credential.
    ///
    /// Only the issuer can do this; returns `Ok(None)` if the credential was
    /// not lodged.
    pub fn reveal_serial(&self, issuer: &KeyPair) -> Result<Option<Exponent>> {
        reveal(self.encrypted_serial.as_ref(), issuer)
    }

    /// Recover the blinding exponent of a lodged credential modulo `z`.
    pub fn reveal_blinding(&self, issuer: &KeyPair) -> Result<Option<Exponent>> {
        reveal(self.encrypted_blinding.as_ref(), issuer)
    }
}

fn reveal(
    encryption: Option<&VerifiableEncryption>,
    issuer: &KeyPair,
) -> Result<Option<Exponent>> {
    encryption
        .map(|encryption| issuer.private_key().decrypt_verifiable_encryption(encryption))
        .transpose()
}

impl Credential for HostCredential {
    fn exposed_exponent(&self) -> &ExposedExponent {
        &self.exposed_exponent
    }

    fn serial(&self) -> Option<&Exponent> {
        self.serial.as_ref()
    }
}
