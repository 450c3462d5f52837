// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

mod util;

use crate::error::{Error, Result};
use crate::group::{Element, Exponent, Group, GroupWithKnownOrder};
use crate::hash::generate_hash;
use crate::key::{Bases, PrivateKey, PublicKey, SubgroupProof};
use crate::parameters::Parameters;

use num_bigint_dig::BigUint;
use num_traits::One;
use rand::rngs::StdRng;
use rand::{CryptoRng, RngCore, SeedableRng};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Public exponent candidate; the actual `e` is the next value coprime
/// with the group order.
const PUBLIC_EXPONENT: u64 = 65537;

/// A matched pair of host keys, generated together.
///
/// Secret material is zeroized when dropped.
#[allow(missing_debug_implementations)]
#[derive(PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
#[cfg_attr(feature = "expose-secret", derive(Debug))]
pub struct KeyPair {
    #[zeroize(skip)]
    public: PublicKey,
    secret: PrivateKey,
}

impl KeyPair {
    /// Generate a key pair with production [`Parameters`].
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self> {
        KeyPairBuilder::new().build(rng)
    }

    /// Generate a key pair with custom parameters.
    pub fn generate_with<R: RngCore + CryptoRng>(
        parameters: Parameters,
        rng: &mut R,
    ) -> Result<Self> {
        KeyPairBuilder::new().parameters(parameters).build(rng)
    }

    /// Return the public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    /// Return the private key.
    pub fn private_key(&self) -> &PrivateKey {
        &self.secret
    }
}

/// Builder for generating key pairs with configurable parameters.
#[derive(Debug, Default)]
pub struct KeyPairBuilder {
    parameters: Parameters,
}

impl KeyPairBuilder {
    /// Factor size below which a warning is logged.
    pub const MIN_SECURE_FACTOR_BITS: usize = 1024;

    /// Create a builder with production parameters.
    pub fn new() -> Self {
        Self { parameters: Parameters::new() }
    }

    /// Set the parameters used for generation.
    pub fn parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// Generate the key pair.
    pub fn build<R: RngCore + CryptoRng>(self, rng: &mut R) -> Result<KeyPair> {
        let parameters = self.parameters;
        parameters.validate()?;

        let factor_bits = parameters.get_factor_bits();
        if factor_bits < Self::MIN_SECURE_FACTOR_BITS {
            tracing::warn!(
                factor_bits,
                minimum = Self::MIN_SECURE_FACTOR_BITS,
                "generating a key pair with weak factors"
            );
        }

        let (p, q) = factors(factor_bits, rng)?;
        if p == q {
            return Err(Error::KeyGenerationFailed("Primes must be distinct".into()));
        }
        tracing::debug!(factor_bits, "safe primes found");

        let modulus = &p * &q;
        let order = (&p - BigUint::one()) * (&q - BigUint::one());
        let composite_group = GroupWithKnownOrder::new(modulus, order)?;

        let e = Exponent::from(PUBLIC_EXPONENT).next_relative_prime(&composite_group);
        let d = e.inverse(&composite_group)?;

        let ab = util::composite_base(&composite_group, &p, &q, rng);
        let (bases, proof) = subgroup_proof(&composite_group, ab, &parameters, rng)?;
        tracing::debug!("composite bases sampled and proven");

        let z = util::prime(parameters.get_verifiable_encryption_bits(), rng)?;
        let square_group = GroupWithKnownOrder::new(&z * &z, &z * (&z - BigUint::one()))?;
        let g = util::square_base(&square_group, &z, rng);
        let x = square_group.random_exponent(rng, parameters.get_random_exponent_bits());
        let y = g.pow(&x)?;
        let z_plus_1 = square_group.element(&z + BigUint::one())?;
        tracing::debug!(bits = parameters.get_verifiable_encryption_bits(), "square group ready");

        let public = PublicKey::new(
            composite_group.drop_order(),
            e,
            bases,
            proof,
            square_group.drop_order(),
            g,
            y,
            z_plus_1,
        )?;
        let secret = PrivateKey::new(composite_group, p, q, d, square_group, x)?;
        tracing::debug!("key pair generated");

        Ok(KeyPair { public, secret })
    }
}

/// Search both safe primes concurrently, each on its own child RNG.
fn factors<R: RngCore + CryptoRng>(bits: usize, rng: &mut R) -> Result<(BigUint, BigUint)> {
    let mut p_rng =
        StdRng::from_rng(&mut *rng).map_err(|e| Error::KeyGenerationFailed(e.to_string()))?;
    let mut q_rng =
        StdRng::from_rng(&mut *rng).map_err(|e| Error::KeyGenerationFailed(e.to_string()))?;

    let (p_result, q_result) = rayon::join(
        || util::safe_prime(bits, &mut p_rng),
        || util::safe_prime(bits, &mut q_rng),
    );

    Ok((p_result?, q_result?))
}

/// Derive `au, ai, av, ao` from `ab` and prove they are powers of it.
///
/// The proof is checked before it is returned; a mismatch is an internal
/// inconsistency and aborts generation.
fn subgroup_proof<R: RngCore + CryptoRng>(
    group: &GroupWithKnownOrder,
    ab: Element,
    parameters: &Parameters,
    rng: &mut R,
) -> Result<(Bases, SubgroupProof)> {
    let secret_bits = parameters.get_random_exponent_bits();
    let blinding_bits = parameters.get_blinding_exponent_bits();

    let mut exponents: [Exponent; 4] =
        std::array::from_fn(|_| group.random_exponent(rng, secret_bits));
    let mut blindings: [Exponent; 4] =
        std::array::from_fn(|_| group.random_exponent(rng, blinding_bits));

    let [eu, ei, ev, eo] = &exponents;
    let bases = Bases {
        au: ab.pow(eu)?,
        ai: ab.pow(ei)?,
        av: ab.pow(ev)?,
        ao: ab.pow(eo)?,
        ab,
    };

    let [ru, ri, rv, ro] = &blindings;
    let tu = bases.ab.pow(ru)?;
    let ti = bases.ab.pow(ri)?;
    let tv = bases.ab.pow(rv)?;
    let to = bases.ab.pow(ro)?;
    let t = generate_hash([&tu, &ti, &tv, &to]);

    let response = |r: &Exponent, secret: &Exponent| r.subtract(&t.multiply(secret));
    let proof = SubgroupProof {
        su: response(ru, eu),
        si: response(ri, ei),
        sv: response(rv, ev),
        so: response(ro, eo),
        t,
    };

    exponents.zeroize();
    blindings.zeroize();

    let recomputed = [
        (&proof.su, &bases.au, &tu),
        (&proof.si, &bases.ai, &ti),
        (&proof.sv, &bases.av, &tv),
        (&proof.so, &bases.ao, &to),
    ];
    for (s, base, expected) in recomputed {
        if &bases.ab.pow(s)?.multiply(&base.pow(&proof.t)?)? != expected {
            tracing::error!("subgroup proof failed its self-check");
            return Err(Error::KeyGenerationFailed("subgroup proof does not verify".into()));
        }
    }

    Ok((bases, proof))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::{init_testing, key_pair};

    #[test]
    fn generated_key_pair_is_consistent() {
        let key_pair = key_pair();
        let public_key = key_pair.public_key();
        let private_key = key_pair.private_key();

        assert!(public_key.validate().is_ok());
        assert!(private_key.validate().is_ok());
        assert_eq!(public_key.composite_group(), &private_key.composite_group().drop_order());
        assert_eq!(public_key.square_group(), &private_key.square_group().drop_order());

        let order = private_key.composite_group().order();
        let ed = public_key.e().multiply(private_key.d()).modulo(order);
        assert!(ed.is_one());
    }

    #[test]
    fn factors_have_requested_size() {
        let private_key = key_pair().private_key();
        let bits = Parameters::testing().get_factor_bits();
        assert_eq!(private_key.p.bits(), bits);
        assert_eq!(private_key.q.bits(), bits);
        assert_eq!(private_key.z.bits(), Parameters::testing().get_verifiable_encryption_bits());
    }

    #[test]
    fn y_is_g_to_the_x() {
        let key_pair = key_pair();
        let y = key_pair.public_key().g().pow(&key_pair.private_key().x).unwrap();
        assert_eq!(&y, key_pair.public_key().y());
    }

    #[test]
    fn z_plus_1_encodes_small_messages_linearly() {
        let key_pair = key_pair();
        let z = &key_pair.private_key().z;
        let encoded = key_pair.public_key().z_plus_1().pow(&Exponent::from(5u64)).unwrap();
        assert_eq!(encoded.value(), &(z * 5u32 + 1u32));
    }

    #[test]
    fn rejects_invalid_parameters() {
        let mut rng = init_testing();
        let parameters = Parameters::testing().factor_bits(8);
        assert_eq!(
            KeyPair::generate_with(parameters, &mut rng).err(),
            Some(Error::BitLengthTooShort { min: Parameters::MIN_MODULUS_BITS, actual: 8 })
        );
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let parameters = Parameters::testing().factor_bits(64).verifiable_encryption_bits(80);
        let first = KeyPair::generate_with(parameters, &mut StdRng::from_seed([7; 32])).unwrap();
        let second = KeyPair::generate_with(parameters, &mut StdRng::from_seed([7; 32])).unwrap();
        assert_eq!(first.public_key(), second.public_key());
    }
}
