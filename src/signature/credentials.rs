// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Anonymous presentation of one or more credentials.
//!
//! For every presented (randomized) credential `j` the prover commits to
//!
//! ```text
//! tf_j = c_j^re_j · ab^rb_j · au^ru · av^rv_j [· ai^ri_j]
//! ```
//!
//! where `ru` is shared so that one response `su` proves all credentials
//! were issued to the same secret `u`. The `ai` factor is only present when
//! the serial stays hidden. `re_j` blinds `e_j − 2^(le−1)` rather than `e_j`
//! and is short, so a response `se_j` of bounded length proves that `e_j`
//! lies close above `2^(le−1)`. A lodged credential additionally carries
//! `W = (y^w · (z + 1)^i, g^w)` and `Wb = (y^wb · (z + 1)^b, g^wb)` under
//! the issuer's square group with the commitments `tw = (y^rw · (z + 1)^ri,
//! g^rw)` and `twb = (y^rwb · (z + 1)^rb, g^rwb)`.
//!
//! The challenge is `t = hash(c_1, tf_1, [W_1, tw_1, Wb_1, twb_1], c_2, ...)`
//! and every response has the form `s = r − h·secret` with
//! `h = t XOR content_hash`.

use super::is_expired;
use crate::credential::{ClientCredential, Credential, ExposedExponent, HostCredential};
use crate::encryption::VerifiableEncryption;
use crate::error::{Error, Result};
use crate::group::{Element, Exponent, Group};
use crate::hash::{content_hash, generate_hash, Signable};
use crate::key::PublicKey;
use crate::parameters::Parameters;

use std::sync::Arc;
use std::time::SystemTime;

use num_bigint_dig::RandBigInt;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

/// How the serial number of a presented credential is handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disclosure {
    /// The serial is revealed. Used for one-time credentials.
    Disclosed(Exponent),
    /// The serial stays hidden; `si` is its response.
    Hidden { si: Exponent },
    /// The serial stays hidden from the verifier but is verifiably
    /// encrypted for the issuer together with the blinding exponent `b`.
    /// `sw` and `swb` are the responses for the encryption randomness.
    Lodged {
        si: Exponent,
        serial: VerifiableEncryption,
        sw: Exponent,
        blinding: VerifiableEncryption,
        swb: Exponent,
    },
}

/// The part of a [`CredentialsSignature`] that concerns one credential.
///
/// `se` is the response for `e − 2^(le−1)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialProof {
    pub public_key: Arc<PublicKey>,
    pub exposed_exponent: ExposedExponent,
    pub c: Element,
    pub se: Exponent,
    pub sb: Exponent,
    pub sv: Exponent,
    pub disclosure: Disclosure,
}

/// Presentation of credentials sharing one client secret, bound to
/// `(time, subject, object)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialsSignature<T> {
    time: SystemTime,
    subject: String,
    object: T,
    t: Exponent,
    su: Exponent,
    proofs: Vec<CredentialProof>,
}

/// Verifiable encryptions of a lodged credential and their secrets.
struct Lodging {
    serial: VerifiableEncryption,
    w: Exponent,
    rw: Exponent,
    blinding: VerifiableEncryption,
    wb: Exponent,
    rwb: Exponent,
}

/// Blindings of one credential while the proof is under construction.
struct Blinded {
    credential: ClientCredential,
    re: Exponent,
    rb: Exponent,
    rv: Exponent,
    ri: Option<Exponent>,
    lodging: Option<Lodging>,
}

impl Drop for Blinded {
    fn drop(&mut self) {
        self.re.zeroize();
        self.rb.zeroize();
        self.rv.zeroize();
        self.ri.zeroize();
        if let Some(lodging) = &mut self.lodging {
            lodging.w.zeroize();
            lodging.rw.zeroize();
            lodging.wb.zeroize();
            lodging.rwb.zeroize();
        }
    }
}

fn blinding<R: RngCore + CryptoRng>(bits: usize, rng: &mut R) -> Exponent {
    Exponent::from(rng.gen_biguint(bits))
}

/// `c^e · ab^b · au^u · av^v [· ai^i]`
fn representation(
    public_key: &PublicKey,
    c: &Element,
    e: &Exponent,
    b: &Exponent,
    u: &Exponent,
    v: &Exponent,
    i: Option<&Exponent>,
) -> Result<Element> {
    let mut value = c
        .pow(e)?
        .multiply(&public_key.ab().pow(b)?)?
        .multiply(&public_key.au().pow(u)?)?
        .multiply(&public_key.av().pow(v)?)?;
    if let Some(i) = i {
        value = value.multiply(&public_key.ai().pow(i)?)?;
    }
    Ok(value)
}

fn push_encryptions(transcript: &mut Vec<Element>, encryptions: [&VerifiableEncryption; 4]) {
    for encryption in encryptions {
        transcript.push(encryption.c1().clone());
        transcript.push(encryption.c2().clone());
    }
}

/// Encrypt the serial and the blinding exponent of `credential` for its
/// issuer and commit to the blindings `ri` and `rb` under the same key.
fn lodge<R: RngCore + CryptoRng>(
    credential: &ClientCredential,
    ri: &Exponent,
    rb: &Exponent,
    parameters: &Parameters,
    rng: &mut R,
    transcript: &mut Vec<Element>,
) -> Result<Lodging> {
    let public_key = credential.public_key();
    let square = public_key.square_group();
    let randomness_bits = parameters.get_random_exponent_bits();
    let blinding_bits = parameters.get_blinding_exponent_bits();

    let w = square.random_exponent(rng, randomness_bits);
    let wb = square.random_exponent(rng, randomness_bits);
    let rw = blinding(blinding_bits, rng);
    let rwb = blinding(blinding_bits, rng);

    let serial = public_key.get_verifiable_encryption(credential.i(), &w)?;
    let tw = public_key.get_verifiable_encryption(ri, &rw)?;
    let encrypted_blinding = public_key.get_verifiable_encryption(credential.b(), &wb)?;
    let twb = public_key.get_verifiable_encryption(rb, &rwb)?;
    push_encryptions(transcript, [&serial, &tw, &encrypted_blinding, &twb]);

    Ok(Lodging { serial, w, rw, blinding: encrypted_blinding, wb, rwb })
}

impl<T: Signable> CredentialsSignature<T> {
    /// Present `credentials` as authorization for `object`.
    ///
    /// Every credential is randomized before it is shown. One-time
    /// credentials disclose their serial; the others hide it, and with
    /// `lodged` set they also encrypt it and their blinding exponent for
    /// their issuer.
    pub fn sign<R: RngCore + CryptoRng>(
        credentials: &[ClientCredential],
        lodged: bool,
        time: SystemTime,
        subject: impl Into<String>,
        object: T,
        parameters: &Parameters,
        rng: &mut R,
    ) -> Result<Self> {
        let mut randomized = Vec::with_capacity(credentials.len());
        for credential in credentials {
            randomized.push(credential.randomize(parameters, rng)?);
        }
        Self::prove(&randomized, lodged, time, subject, object, parameters, rng)
    }

    /// Prove knowledge of `credentials` as they are, without randomizing.
    fn prove<R: RngCore + CryptoRng>(
        credentials: &[ClientCredential],
        lodged: bool,
        time: SystemTime,
        subject: impl Into<String>,
        object: T,
        parameters: &Parameters,
        rng: &mut R,
    ) -> Result<Self> {
        let Some(first) = credentials.first() else {
            return Err(Error::InvalidParameters("no credentials to present".into()));
        };
        if credentials.iter().any(|credential| credential.u() != first.u()) {
            return Err(Error::InvalidParameters(
                "credentials were issued to different client secrets".into(),
            ));
        }

        let subject = subject.into();
        let bits = parameters.get_blinding_exponent_bits();
        let offset = parameters.credential_exponent_offset();
        let mut ru = blinding(bits, rng);

        let mut transcript = Vec::new();
        let mut blinded = Vec::with_capacity(credentials.len());
        for credential in credentials {
            let re = blinding(parameters.get_credential_exponent_blinding_bits(), rng);
            let rb = blinding(bits, rng);
            let rv = blinding(bits, rng);
            let ri = (!credential.is_one_time()).then(|| blinding(bits, rng));

            let c = credential.c();
            let tf =
                representation(credential.public_key(), c, &re, &rb, &ru, &rv, ri.as_ref())?;
            transcript.push(c.clone());
            transcript.push(tf);

            let lodging = match &ri {
                Some(ri) if lodged => {
                    Some(lodge(credential, ri, &rb, parameters, rng, &mut transcript)?)
                }
                _ => None,
            };

            blinded.push(Blinded { credential: credential.clone(), re, rb, rv, ri, lodging });
        }

        let t = generate_hash(&transcript);
        let h = t.xor(&content_hash(time, &subject, &object));
        let response = |r: &Exponent, secret: &Exponent| r.subtract(&h.multiply(secret));

        let su = response(&ru, first.u());
        ru.zeroize();

        let proofs = blinded
            .iter()
            .map(|b| {
                let credential = &b.credential;
                let disclosure = match (&b.ri, &b.lodging) {
                    (None, _) => Disclosure::Disclosed(credential.i().clone()),
                    (Some(ri), None) => Disclosure::Hidden { si: response(ri, credential.i()) },
                    (Some(ri), Some(lodging)) => Disclosure::Lodged {
                        si: response(ri, credential.i()),
                        serial: lodging.serial.clone(),
                        sw: response(&lodging.rw, &lodging.w),
                        blinding: lodging.blinding.clone(),
                        swb: response(&lodging.rwb, &lodging.wb),
                    },
                };

                let mut e_offset = credential.e().subtract(&offset);
                let se = response(&b.re, &e_offset);
                e_offset.zeroize();

                CredentialProof {
                    public_key: Arc::clone(credential.public_key()),
                    exposed_exponent: credential.exposed_exponent().clone(),
                    c: credential.c().clone(),
                    se,
                    sb: response(&b.rb, credential.b()),
                    sv: response(&b.rv, credential.v()),
                    disclosure,
                }
            })
            .collect();

        Ok(Self { time, subject, object, t, su, proofs })
    }

    /// Verify against the current time.
    pub fn verify<F>(&self, parameters: &Parameters, issuers: F) -> Result<Vec<HostCredential>>
    where
        F: Fn(&str) -> Option<Arc<PublicKey>>,
    {
        self.verify_at(parameters, issuers, SystemTime::now())
    }

    /// Verify as of `now` and return what the presentation discloses about
    /// each credential.
    ///
    /// `issuers` resolves the issuer named in an exposed exponent to the
    /// public key the verifier trusts for it. A proof made under any other
    /// key is rejected with [`Error::UntrustedIssuer`].
    pub fn verify_at<F>(
        &self,
        parameters: &Parameters,
        issuers: F,
        now: SystemTime,
    ) -> Result<Vec<HostCredential>>
    where
        F: Fn(&str) -> Option<Arc<PublicKey>>,
    {
        if is_expired(self.time, now) {
            tracing::warn!(subject = %self.subject, "credentials signature expired");
            return Err(Error::ExpiredCredentialsSignature);
        }
        if self.proofs.is_empty() {
            return Err(Error::InvalidCredentialsSignature("no credentials presented".into()));
        }

        let limit = parameters.get_credential_exponent_blinding_bits() + 1;
        for proof in &self.proofs {
            let issuer = proof.exposed_exponent.issuer();
            if !issuers(issuer).is_some_and(|trusted| *trusted == *proof.public_key) {
                tracing::warn!(subject = %self.subject, issuer, "untrusted credential issuer");
                return Err(Error::UntrustedIssuer(issuer.into()));
            }
            if proof.se.bits() > limit {
                tracing::warn!(subject = %self.subject, issuer, "credential exponent out of range");
                return Err(Error::InvalidCredentialsSignature(
                    "credential exponent out of range".into(),
                ));
            }
        }

        let h = self.t.xor(&content_hash(self.time, &self.subject, &self.object));
        let offset = parameters.credential_exponent_offset();
        let mut transcript = Vec::new();
        for proof in &self.proofs {
            self.recompute(proof, &h, &offset, &mut transcript).map_err(|e| {
                tracing::warn!(subject = %self.subject, error = %e, "malformed credential proof");
                Error::InvalidCredentialsSignature(e.to_string())
            })?;
        }

        if generate_hash(&transcript) != self.t {
            tracing::warn!(subject = %self.subject, "credentials signature does not verify");
            return Err(Error::InvalidCredentialsSignature("challenge mismatch".into()));
        }

        Ok(self
            .proofs
            .iter()
            .map(|proof| {
                let (serial, lodged) = match &proof.disclosure {
                    Disclosure::Disclosed(i) => (Some(i.clone()), None),
                    Disclosure::Hidden { .. } => (None, None),
                    Disclosure::Lodged { serial, blinding, .. } => {
                        (None, Some((serial.clone(), blinding.clone())))
                    }
                };
                let (encrypted_serial, encrypted_blinding) = lodged.unzip();
                HostCredential::new(
                    Arc::clone(&proof.public_key),
                    proof.exposed_exponent.clone(),
                    serial,
                    encrypted_serial,
                    encrypted_blinding,
                )
            })
            .collect())
    }

    /// Append the recomputed commitments of `proof` to `transcript`.
    fn recompute(
        &self,
        proof: &CredentialProof,
        h: &Exponent,
        offset: &Exponent,
        transcript: &mut Vec<Element>,
    ) -> Result<()> {
        let public_key = &*proof.public_key;
        if !public_key.composite_group().contains(&proof.c) {
            return Err(Error::GroupMismatch);
        }

        let mut base = public_key.ao().pow(&proof.exposed_exponent.hash())?;
        let si = match &proof.disclosure {
            Disclosure::Disclosed(i) => {
                base = base.divide(&public_key.ai().pow(i)?)?;
                None
            }
            Disclosure::Hidden { si } | Disclosure::Lodged { si, .. } => Some(si),
        };

        let se = proof.se.subtract(&h.multiply(offset));
        let (c, su) = (&proof.c, &self.su);
        let tf = representation(public_key, c, &se, &proof.sb, su, &proof.sv, si)?
            .multiply(&base.pow(h)?)?;
        transcript.push(proof.c.clone());
        transcript.push(tf);

        if let Disclosure::Lodged { si, serial, sw, blinding, swb } = &proof.disclosure {
            let square = public_key.square_group();
            if !square.contains(serial.c1()) || !square.contains(blinding.c1()) {
                return Err(Error::GroupMismatch);
            }
            let tw = public_key.get_verifiable_encryption(si, sw)?.multiply(&serial.pow(h)?)?;
            let twb = public_key
                .get_verifiable_encryption(&proof.sb, swb)?
                .multiply(&blinding.pow(h)?)?;
            push_encryptions(transcript, [serial, &tw, blinding, &twb]);
        }
        Ok(())
    }
}

impl<T> CredentialsSignature<T> {
    /// Reassemble a received signature.
    pub fn from_parts(
        time: SystemTime,
        subject: impl Into<String>,
        object: T,
        t: Exponent,
        su: Exponent,
        proofs: Vec<CredentialProof>,
    ) -> Self {
        Self { time, subject: subject.into(), object, t, su, proofs }
    }

    #[inline]
    pub fn time(&self) -> SystemTime {
        self.time
    }

    #[inline]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[inline]
    pub fn object(&self) -> &T {
        &self.object
    }

    #[inline]
    pub fn t(&self) -> &Exponent {
        &self.t
    }

    #[inline]
    pub fn su(&self) -> &Exponent {
        &self.su
    }

    #[inline]
    pub fn proofs(&self) -> &[CredentialProof] {
        &self.proofs
    }
}
