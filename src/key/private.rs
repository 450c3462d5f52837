// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::encryption::VerifiableEncryption;
use crate::error::{Error, Result};
use crate::group::{Element, Exponent, Group, GroupWithKnownOrder};
use crate::util;

use num_bigint_dig::BigUint;
use num_traits::One;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Secret key material.
///
/// Holds the factorization of the composite modulus, the decryption
/// exponent `d`, and the secret `x` of the square group, together with the
/// values precomputed for CRT exponentiation. Sensitive fields are zeroized
/// on drop.
#[allow(missing_debug_implementations)]
#[derive(PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
#[cfg_attr(feature = "expose-secret", derive(Debug))]
pub struct PrivateKey {
    pub(crate) composite_group: GroupWithKnownOrder,
    pub(crate) p: BigUint,
    pub(crate) q: BigUint,
    pub(crate) d: Exponent,
    pub(crate) square_group: GroupWithKnownOrder,
    pub(crate) x: Exponent,

    /// `z` with `z²` the square modulus; public, but kept for decryption.
    #[zeroize(skip)]
    pub(crate) z: BigUint,

    /// `d mod (p - 1)`
    d_mod_p_minus_1: BigUint,
    /// `d mod (q - 1)`
    d_mod_q_minus_1: BigUint,
    /// `(q⁻¹ mod p)·q mod n`, which is 1 modulo `p` and 0 modulo `q`.
    p_identity_crt: BigUint,
    /// `(p⁻¹ mod q)·p mod n`, which is 0 modulo `p` and 1 modulo `q`.
    q_identity_crt: BigUint,
}

impl PrivateKey {
    /// Construct a private key from its components.
    ///
    /// Validates that the factors reconstruct the composite modulus and that
    /// the square group has the shape `(z², z·(z - 1))`.
    pub fn new(
        composite_group: GroupWithKnownOrder,
        p: BigUint,
        q: BigUint,
        d: Exponent,
        square_group: GroupWithKnownOrder,
        x: Exponent,
    ) -> Result<Self> {
        if p <= BigUint::one() || q <= BigUint::one() || p == q {
            return Err(Error::InvalidPrivateKey);
        }
        let n: &BigUint = composite_group.modulus();
        if &(&p * &q) != n {
            return Err(Error::InvalidPrivateKey);
        }

        let z = square_group.modulus().sqrt();
        if &(&z * &z) != &**square_group.modulus()
            || square_group.order() != &(&z * (&z - BigUint::one()))
        {
            return Err(Error::InvalidPrivateKey);
        }

        let p_minus_1 = &p - BigUint::one();
        let q_minus_1 = &q - BigUint::one();
        let d_mod_p_minus_1 = d.modulo(&p_minus_1);
        let d_mod_q_minus_1 = d.modulo(&q_minus_1);

        let q_inverse = util::mod_inverse(&(&q % &p), &p).map_err(|_| Error::InvalidPrivateKey)?;
        let p_inverse = util::mod_inverse(&(&p % &q), &q).map_err(|_| Error::InvalidPrivateKey)?;
        let p_identity_crt = (q_inverse * &q) % n;
        let q_identity_crt = (p_inverse * &p) % n;

        Ok(Self {
            composite_group,
            p,
            q,
            d,
            square_group,
            x,
            z,
            d_mod_p_minus_1,
            d_mod_q_minus_1,
            p_identity_crt,
            q_identity_crt,
        })
    }

    #[inline]
    pub fn composite_group(&self) -> &GroupWithKnownOrder {
        &self.composite_group
    }

    #[inline]
    pub fn square_group(&self) -> &GroupWithKnownOrder {
        &self.square_group
    }

    /// The decryption exponent `d = e⁻¹ mod φ(n)`.
    #[inline]
    pub fn d(&self) -> &Exponent {
        &self.d
    }

    /// Check that the factors still reconstruct the composite modulus.
    pub fn validate(&self) -> Result<()> {
        if &(&self.p * &self.q) != &**self.composite_group.modulus() {
            tracing::warn!("private key factors do not match the modulus");
            return Err(Error::InvalidPrivateKey);
        }
        Ok(())
    }

    /// `c^d mod n`, computed with the Chinese Remainder Theorem.
    ///
    /// Exponentiates modulo `p` and `q` separately with the reduced
    /// exponents and recombines `mP·pIdentity + mQ·qIdentity mod n`.
    pub fn pow_d(&self, c: &Element) -> Result<Element> {
        if !self.composite_group.contains(c) {
            return Err(Error::GroupMismatch);
        }

        let m_p = (c.value() % &self.p).modpow(&self.d_mod_p_minus_1, &self.p);
        let m_q = (c.value() % &self.q).modpow(&self.d_mod_q_minus_1, &self.q);
        let n: &BigUint = self.composite_group.modulus();
        let m = (m_p * &self.p_identity_crt + m_q * &self.q_identity_crt) % n;

        self.composite_group.element(m)
    }

    /// Recover the plaintext of a verifiable encryption made under the
    /// matching public key.
    ///
    /// Computes `c1 / c2^x = (z + 1)^m = 1 + m·z mod z²` and returns
    /// `m mod z`.
    pub fn decrypt_verifiable_encryption(
        &self,
        encryption: &VerifiableEncryption,
    ) -> Result<Exponent> {
        if !self.square_group.contains(encryption.c1()) {
            return Err(Error::GroupMismatch);
        }

        let mask = encryption.c2().pow(&self.x)?;
        let encoded = encryption.c1().divide(&mask)?;
        let m = util::l_function(encoded.value(), &self.z)?;
        Ok(Exponent::from(m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::{init_testing, key_pair, other_key_pair};

    use num_bigint_dig::RandBigInt;
    use num_traits::Zero;

    #[test]
    fn crt_matches_direct_exponentiation() {
        let mut rng = init_testing();
        let private_key = key_pair().private_key();
        let group = private_key.composite_group();

        for _ in 0..20 {
            let c = group.random_element(&mut rng);
            let direct = c.pow(private_key.d()).unwrap();
            assert_eq!(private_key.pow_d(&c).unwrap(), direct);
        }
    }

    #[test]
    fn crt_round_trip() {
        let mut rng = init_testing();
        let key_pair = key_pair();
        let n: &BigUint = key_pair.public_key().composite_group().modulus();

        for _ in 0..20 {
            let value = rng.gen_biguint_below(n);
            let m = key_pair.public_key().composite_group().element(value).unwrap();
            let c = key_pair.public_key().pow_e(&m).unwrap();
            assert_eq!(key_pair.private_key().pow_d(&c).unwrap(), m);
        }
    }

    #[test]
    fn crt_identities() {
        let private_key = key_pair().private_key();
        assert!((&private_key.p_identity_crt % &private_key.p).is_one());
        assert!((&private_key.p_identity_crt % &private_key.q).is_zero());
        assert!((&private_key.q_identity_crt % &private_key.p).is_zero());
        assert!((&private_key.q_identity_crt % &private_key.q).is_one());
    }

    #[test]
    fn pow_d_rejects_foreign_elements() {
        let foreign = other_key_pair().public_key().ab().clone();
        assert_eq!(key_pair().private_key().pow_d(&foreign), Err(Error::GroupMismatch));
    }

    #[test]
    fn new_rejects_mismatched_factors() {
        let private_key = key_pair().private_key();
        let result = PrivateKey::new(
            private_key.composite_group.clone(),
            private_key.p.clone(),
            &private_key.q + 2u32,
            private_key.d.clone(),
            private_key.square_group.clone(),
            private_key.x.clone(),
        );
        assert!(matches!(result, Err(Error::InvalidPrivateKey)));
    }

    #[test]
    fn validate_accepts_generated_key() {
        assert!(key_pair().private_key().validate().is_ok());
    }

    #[test]
    fn verifiable_encryption_round_trip() {
        let mut rng = init_testing();
        let key_pair = key_pair();
        let public_key = key_pair.public_key();

        for _ in 0..20 {
            let m = Exponent::from(rng.gen_biguint(16));
            let r = public_key.square_group().random_exponent(&mut rng, 256);
            let encryption = public_key.get_verifiable_encryption(&m, &r).unwrap();
            let decrypted = key_pair.private_key().decrypt_verifiable_encryption(&encryption);
            assert_eq!(decrypted.unwrap(), m);
        }
    }

    #[test]
    fn verifiable_encryption_needs_the_right_key() {
        let mut rng = init_testing();
        let public_key = key_pair().public_key();
        let m = Exponent::from(424_242u64);
        let r = public_key.square_group().random_exponent(&mut rng, 256);
        let encryption = public_key.get_verifiable_encryption(&m, &r).unwrap();

        let result = other_key_pair().private_key().decrypt_verifiable_encryption(&encryption);
        assert_eq!(result, Err(Error::GroupMismatch));
    }

    #[test]
    fn garbage_does_not_decrypt() {
        let mut rng = init_testing();
        let key_pair = key_pair();
        let square = key_pair.public_key().square_group();
        let (c1, c2) = (square.random_element(&mut rng), square.random_element(&mut rng));
        let encryption = VerifiableEncryption::new(c1, c2).unwrap();
        assert!(key_pair.private_key().decrypt_verifiable_encryption(&encryption).is_err());
    }
}
