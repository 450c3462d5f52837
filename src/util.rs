// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{Error, Result};

use num_bigint_dig::{BigInt, BigUint, ModInverse, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};

/// L(x) = (x - 1) / z
///
/// Recovers `m` from `(1 + z)^m ≡ 1 + m·z (mod z²)`. Fails when `x` is not
/// congruent to 1 modulo `z`, i.e. when `x` is not of that form.
pub fn l_function(x: &BigUint, z: &BigUint) -> Result<BigUint> {
    if x.is_zero() || z.is_zero() {
        return Err(Error::DecryptionFailed("L function undefined for zero".into()));
    }
    let shifted = x - BigUint::one();
    let (quotient, remainder) = shifted.div_rem(z);
    if !remainder.is_zero() {
        return Err(Error::DecryptionFailed("value is not congruent to 1".into()));
    }
    Ok(quotient)
}

/// Computes modular inverse a⁻¹ mod b, normalized into `[0, b)`.
pub fn mod_inverse<'i>(a: &'i BigUint, b: &'i BigUint) -> Result<BigUint> {
    let inverse = a
        .mod_inverse(b)
        .ok_or(Error::NotInvertible)?
        .mod_floor(&BigInt::from_biguint(Sign::Plus, b.clone()));

    inverse.to_biguint().ok_or(Error::NotInvertible)
}

/// Big-endian two's-complement encoding of a non-negative integer.
///
/// Uses the minimal number of bytes that keeps the sign bit clear, so zero
/// encodes as a single zero byte and values with the top bit set gain a
/// leading zero byte.
pub fn to_signed_bytes_be(value: &BigUint) -> Vec<u8> {
    let mut bytes = value.to_bytes_be();
    if bytes.is_empty() {
        bytes.push(0);
    } else if bytes[0] & 0x80 != 0 {
        bytes.insert(0, 0);
    }
    bytes
}

/// Test Utility Functions
#[cfg(test)]
pub(crate) mod testing {
    use crate::credential::{
        blind_commitment, issue, ClientCredential, ExposedContent, ExposedExponent,
    };
    use crate::group::{Exponent, Group};
    use crate::{KeyPair, Parameters};

    use std::sync::{Arc, OnceLock};
    use std::time::SystemTime;

    use rand::rngs::{OsRng, StdRng};
    use rand::{Rng, SeedableRng};
    use tracing_subscriber::{EnvFilter, fmt};

    static KEY_PAIR: OnceLock<KeyPair> = OnceLock::new();
    static OTHER_KEY_PAIR: OnceLock<KeyPair> = OnceLock::new();

    /// Returns an rng to be used for testing. The seed is printed to stderr
    /// so that a failing run can be reproduced with
    /// [`init_testing_with_seed`].
    pub(crate) fn init_testing() -> StdRng {
        let seed: [u8; 32] = OsRng.gen();
        eprintln!("rng seed for init_testing_with_seed(): {seed:?}");
        StdRng::from_seed(seed)
    }

    /// A seeded version of [`init_testing`] that also turns on logging.
    ///
    /// Only meant for debugging a specific failure.
    #[allow(unused)]
    pub(crate) fn init_testing_with_seed(seed: [u8; 32]) -> StdRng {
        // Fails if another test already installed a subscriber.
        let _ = fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
        StdRng::from_seed(seed)
    }

    /// A cached test-sized key pair, generated once per test binary.
    pub(crate) fn key_pair() -> &'static KeyPair {
        KEY_PAIR.get_or_init(generate)
    }

    /// A second, unrelated test-sized key pair.
    pub(crate) fn other_key_pair() -> &'static KeyPair {
        OTHER_KEY_PAIR.get_or_init(generate)
    }

    fn generate() -> KeyPair {
        let mut rng = init_testing();
        KeyPair::generate_with(Parameters::testing(), &mut rng).unwrap()
    }

    /// The issuer name every test credential carries.
    pub(crate) const ISSUER: &str = "host@example.test";

    fn role_exposed_exponent(role: &str) -> ExposedExponent {
        ExposedExponent::new(ISSUER, SystemTime::now(), ExposedContent::Role(role.into()), None)
    }

    /// Issue a role credential for the identity secret `u` under
    /// [`key_pair`].
    pub(crate) fn issued_credential(
        rng: &mut StdRng,
        u: &Exponent,
        role: &str,
        one_time: bool,
    ) -> ClientCredential {
        issued_credential_by(key_pair(), rng, u, role, one_time)
    }

    /// Issue a role credential named after [`ISSUER`] but signed by `issuer`.
    pub(crate) fn issued_credential_by(
        issuer: &KeyPair,
        rng: &mut StdRng,
        u: &Exponent,
        role: &str,
        one_time: bool,
    ) -> ClientCredential {
        let parameters = Parameters::testing();
        let public_key = Arc::new(issuer.public_key().clone());
        let exposed = role_exposed_exponent(role);

        let v = public_key
            .composite_group()
            .random_exponent(rng, parameters.get_random_exponent_bits());
        let f = blind_commitment(&public_key, u, &v).unwrap();
        let issued = issue(issuer, &exposed, &f, &parameters, rng).unwrap();
        issued.complete(public_key, exposed, u.clone(), v, one_time, &parameters).unwrap()
    }

    /// A credential under [`key_pair`] that no issuer signed: `e = 1` and
    /// `c = ao^o / au^u` satisfy the verification equation on their own.
    pub(crate) fn forged_credential(u: &Exponent, role: &str) -> ClientCredential {
        let public_key = Arc::new(key_pair().public_key().clone());
        let exposed = role_exposed_exponent(role);
        let c = public_key
            .ao()
            .pow(&exposed.hash())
            .unwrap()
            .divide(&public_key.au().pow(u).unwrap())
            .unwrap();
        let zero = Exponent::from(0u64);
        ClientCredential::new_unchecked(
            public_key,
            exposed,
            c,
            Exponent::from(1u64),
            zero.clone(),
            u.clone(),
            zero.clone(),
            zero,
            false,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_bytes_match_twos_complement() {
        assert_eq!(to_signed_bytes_be(&BigUint::zero()), vec![0]);
        assert_eq!(to_signed_bytes_be(&BigUint::from(0x7fu32)), vec![0x7f]);
        assert_eq!(to_signed_bytes_be(&BigUint::from(0x80u32)), vec![0x00, 0x80]);
        assert_eq!(to_signed_bytes_be(&BigUint::from(0x1234u32)), vec![0x12, 0x34]);
    }

    #[test]
    fn mod_inverse_is_normalized() {
        let inverse = mod_inverse(&BigUint::from(3u32), &BigUint::from(7u32)).unwrap();
        assert_eq!(inverse, BigUint::from(5u32));
        assert_eq!(
            mod_inverse(&BigUint::from(6u32), &BigUint::from(9u32)),
            Err(Error::NotInvertible)
        );
    }

    #[test]
    fn l_function_requires_unit_residue() {
        let z = BigUint::from(11u32);
        // (1 + 11)^5 mod 121 = 1 + 55
        assert_eq!(l_function(&BigUint::from(56u32), &z).unwrap(), BigUint::from(5u32));
        assert!(l_function(&BigUint::from(57u32), &z).is_err());
    }
}
