// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::group::{Element, Group, GroupWithKnownOrder};
use crate::{Error, Result};

use num_bigint_dig::prime::probably_prime;
use num_bigint_dig::{BigUint, RandPrime};
use num_traits::One;
use rand::{CryptoRng, RngCore};

/// Smallest accepted safe prime size. Below this the search space can be
/// empty once the top two bits of `p'` are forced.
pub const MIN_SAFE_PRIME_BITS: usize = 16;

/// Generates a safe prime p of given bit size.
///
/// Safe primes have the form p = 2p' + 1, where p' is also prime. A fresh
/// probable prime p' of `bits - 1` bits is drawn until 2p' + 1 is prime too.
pub fn safe_prime<R: RngCore + CryptoRng>(bits: usize, rng: &mut R) -> Result<BigUint> {
    if bits < MIN_SAFE_PRIME_BITS {
        return Err(Error::BitLengthTooShort { min: MIN_SAFE_PRIME_BITS, actual: bits });
    }

    let rounds = optimal_miller_rabin_rounds(bits);
    loop {
        let p_prime = rng.gen_prime(bits - 1);
        let p = (&p_prime << 1) + BigUint::one();

        if probably_prime(&p, rounds) {
            return Ok(p);
        }
    }
}

/// Draw a probable prime of exactly `bits` bits.
pub fn prime<R: RngCore + CryptoRng>(bits: usize, rng: &mut R) -> Result<BigUint> {
    if bits < 2 {
        return Err(Error::BitLengthTooShort { min: 2, actual: bits });
    }
    Ok(rng.gen_prime(bits))
}

/// Find a base of the composite group that generates a large subgroup.
///
/// Rejects candidates whose order divides `p - 1`, `q - 1` or a quarter of
/// the group order, i.e. candidates confined to a small subgroup modulo `p`
/// or modulo `q`, or to a subgroup of small index.
pub fn composite_base<R: RngCore + CryptoRng>(
    group: &GroupWithKnownOrder,
    p: &BigUint,
    q: &BigUint,
    rng: &mut R,
) -> Element {
    let p_minus_1 = p - BigUint::one();
    let q_minus_1 = q - BigUint::one();
    let quarter_order = group.order() >> 2;

    loop {
        let candidate = group.random_element(rng);
        if !candidate.pow_unsigned(&p_minus_1).is_one()
            && !candidate.pow_unsigned(&q_minus_1).is_one()
            && !candidate.pow_unsigned(&quarter_order).is_one()
        {
            return candidate;
        }
    }
}

/// Find a base of the square group `Z*_{z²}` whose order divides neither
/// `z` nor `z - 1`.
pub fn square_base<R: RngCore + CryptoRng>(
    group: &GroupWithKnownOrder,
    z: &BigUint,
    rng: &mut R,
) -> Element {
    let z_minus_1 = z - BigUint::one();

    loop {
        let candidate = group.random_element(rng);
        if !candidate.pow_unsigned(z).is_one() && !candidate.pow_unsigned(&z_minus_1).is_one() {
            return candidate;
        }
    }
}

/// Determine the number of Miller-Rabin rounds based on bit length.
///
/// Targets an error probability below 2^-128 (FIPS 186-4, Table C.1); larger
/// candidates need fewer rounds.
#[inline]
pub const fn optimal_miller_rabin_rounds(bits: usize) -> usize {
    match bits {
        0..=256 => 40,
        257..=512 => 15,
        513..=1024 => 10,
        1025..=2048 => 6,
        2049..=4096 => 4,
        _ => 3,
    }
}
