// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::is_expired;
use crate::error::{Error, Result};
use crate::group::{Element, Exponent, Group};
use crate::hash::{content_hash, generate_hash, Signable};
use crate::key::PublicKey;
use crate::parameters::Parameters;

use std::sync::Arc;
use std::time::SystemTime;

use rand::{CryptoRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A public commitment `au^s` to a client secret `s`, in the composite
/// group of the host the client is registered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commitment {
    public_key: Arc<PublicKey>,
    value: Element,
}

impl Commitment {
    /// `value` must lie in the composite group of `public_key`.
    pub fn new(public_key: Arc<PublicKey>, value: Element) -> Result<Self> {
        if !public_key.composite_group().contains(&value) {
            return Err(Error::GroupMismatch);
        }
        Ok(Self { public_key, value })
    }

    #[inline]
    pub fn public_key(&self) -> &Arc<PublicKey> {
        &self.public_key
    }

    #[inline]
    pub fn value(&self) -> &Element {
        &self.value
    }
}

/// A [`Commitment`] together with the secret behind it.
#[allow(missing_debug_implementations)]
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
#[cfg_attr(feature = "expose-secret", derive(Debug))]
pub struct SecretCommitment {
    #[zeroize(skip)]
    commitment: Commitment,
    secret: Exponent,
}

impl SecretCommitment {
    /// Commit to `secret` under `public_key`.
    pub fn new(public_key: Arc<PublicKey>, secret: Exponent) -> Result<Self> {
        let value = public_key.au().pow(&secret)?;
        Ok(Self { commitment: Commitment { public_key, value }, secret })
    }

    #[inline]
    pub fn commitment(&self) -> &Commitment {
        &self.commitment
    }

    #[inline]
    pub fn secret(&self) -> &Exponent {
        &self.secret
    }
}

/// Proof of knowledge of the secret behind a [`Commitment`], bound to
/// `(time, subject, object)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSignature<T> {
    time: SystemTime,
    subject: String,
    object: T,
    commitment: Commitment,
    t: Exponent,
    s: Exponent,
}

impl<T: Signable> ClientSignature<T> {
    /// Sign `object` for `subject` at `time`.
    ///
    /// Draws a blinding `r`, sets `t = hash(au^r)`,
    /// `h = t XOR content_hash(time, subject, object)` and `s = r − secret·h`.
    pub fn sign<R: RngCore + CryptoRng>(
        secret: &SecretCommitment,
        time: SystemTime,
        subject: impl Into<String>,
        object: T,
        parameters: &Parameters,
        rng: &mut R,
    ) -> Result<Self> {
        let subject = subject.into();
        let commitment = secret.commitment().clone();
        let public_key = commitment.public_key();

        let mut r = public_key
            .composite_group()
            .random_exponent(rng, parameters.get_blinding_exponent_bits());
        let t = generate_hash([&public_key.au().pow(&r)?]);
        let h = t.xor(&content_hash(time, &subject, &object));
        let s = r.subtract(&secret.secret().multiply(&h));
        r.zeroize();

        Ok(Self { time, subject, object, commitment, t, s })
    }

    /// Verify against the current time.
    pub fn verify(&self) -> Result<()> {
        self.verify_at(SystemTime::now())
    }

    /// Verify as of `now`.
    ///
    /// Fails with [`Error::ExpiredClientSignature`] if the signature is
    /// older than a tropical year, and with [`Error::InvalidClientSignature`]
    /// unless `t = hash(au^s · commitment^h)`.
    pub fn verify_at(&self, now: SystemTime) -> Result<()> {
        if is_expired(self.time, now) {
            tracing::warn!(subject = %self.subject, "client signature expired");
            return Err(Error::ExpiredClientSignature);
        }

        let h = self.t.xor(&content_hash(self.time, &self.subject, &self.object));
        let au = self.commitment.public_key().au();
        let value = au
            .pow(&self.s)
            .and_then(|left| left.multiply(&self.commitment.value().pow(&h)?))
            .map_err(|_| Error::InvalidClientSignature)?;

        if generate_hash([&value]) != self.t {
            tracing::warn!(subject = %self.subject, "client signature does not verify");
            return Err(Error::InvalidClientSignature);
        }
        Ok(())
    }
}

impl<T> ClientSignature<T> {
    /// Reassemble a received signature.
    pub fn from_parts(
        time: SystemTime,
        subject: impl Into<String>,
        object: T,
        commitment: Commitment,
        t: Exponent,
        s: Exponent,
    ) -> Self {
        Self { time, subject: subject.into(), object, commitment, t, s }
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
    pub fn commitment(&self) -> &Commitment {
        &self.commitment
    }

    #[inline]
    pub fn t(&self) -> &Exponent {
        &self.t
    }

    #[inline]
    pub fn s(&self) -> &Exponent {
        &self.s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::TROPICAL_YEAR;
    use crate::util::testing::{init_testing, key_pair, other_key_pair};

    use std::time::Duration;

    const SUBJECT: &str = "alice@example.test";

    fn secret_commitment() -> SecretCommitment {
        let public_key = Arc::new(key_pair().public_key().clone());
        SecretCommitment::new(public_key, Exponent::from(7u64)).unwrap()
    }

    fn signed(time: SystemTime) -> ClientSignature<String> {
        let mut rng = init_testing();
        let secret = secret_commitment();
        let parameters = Parameters::testing();
        ClientSignature::sign(&secret, time, SUBJECT, "hello".to_string(), &parameters, &mut rng)
            .unwrap()
    }

    fn with<T>(
        signature: &ClientSignature<String>,
        subject: &str,
        object: T,
        t: Exponent,
        s: Exponent,
    ) -> ClientSignature<T> {
        ClientSignature::from_parts(
            signature.time(),
            subject,
            object,
            signature.commitment().clone(),
            t,
            s,
        )
    }

    #[test]
    fn fresh_signature_verifies() {
        let signature = signed(SystemTime::now());
        assert_eq!(signature.verify(), Ok(()));
        assert_eq!(signature.subject(), SUBJECT);
        assert_eq!(signature.object(), "hello");
    }

    #[test]
    fn mutated_content_is_invalid() {
        let signature = signed(SystemTime::now());
        let (t, s) = (signature.t().clone(), signature.s().clone());

        let object = with(&signature, SUBJECT, "hellO".to_string(), t.clone(), s.clone());
        assert_eq!(object.verify(), Err(Error::InvalidClientSignature));

        let bob = "bob@example.test";
        let subject = with(&signature, bob, "hello".to_string(), t.clone(), s.clone());
        assert_eq!(subject.verify(), Err(Error::InvalidClientSignature));

        let one = Exponent::from(1u64);
        let bumped_t = with(&signature, SUBJECT, "hello".to_string(), t.add(&one), s.clone());
        assert_eq!(bumped_t.verify(), Err(Error::InvalidClientSignature));

        let bumped_s = with(&signature, SUBJECT, "hello".to_string(), t, s.add(&one));
        assert_eq!(bumped_s.verify(), Err(Error::InvalidClientSignature));
    }

    #[test]
    fn object_type_does_not_matter_for_equal_bytes() {
        let signature = signed(SystemTime::now());
        let bytes = with(
            &signature,
            SUBJECT,
            b"hello".to_vec(),
            signature.t().clone(),
            signature.s().clone(),
        );
        assert_eq!(bytes.verify(), Ok(()));
    }

    #[test]
    fn wrong_commitment_is_invalid() {
        let signature = signed(SystemTime::now());
        let public_key = Arc::clone(signature.commitment().public_key());
        let other = SecretCommitment::new(public_key, Exponent::from(8u64)).unwrap();
        let forged = ClientSignature::from_parts(
            signature.time(),
            SUBJECT,
            "hello".to_string(),
            other.commitment().clone(),
            signature.t().clone(),
            signature.s().clone(),
        );
        assert_eq!(forged.verify(), Err(Error::InvalidClientSignature));
    }

    #[test]
    fn old_signatures_expire() {
        let now = SystemTime::now();
        let signature = signed(now - Duration::from_secs(400 * 86_400));
        assert_eq!(signature.verify(), Err(Error::ExpiredClientSignature));

        let signature = signed(now);
        let later = now + TROPICAL_YEAR + Duration::from_secs(1);
        assert_eq!(signature.verify_at(later), Err(Error::ExpiredClientSignature));
        assert_eq!(signature.verify_at(now + TROPICAL_YEAR), Ok(()));
    }

    #[test]
    fn commitment_must_match_the_key() {
        let public_key = Arc::new(key_pair().public_key().clone());
        let foreign = other_key_pair().public_key().au().clone();
        assert_eq!(Commitment::new(public_key, foreign), Err(Error::GroupMismatch));
    }
}
