// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::encryption::VerifiableEncryption;
use crate::error::{Error, Result};
use crate::group::{Element, Exponent, Group, GroupWithUnknownOrder};
use crate::hash::generate_hash;

/// The five bases of the composite group.
///
/// `au`, `ai`, `av` and `ao` are powers of `ab`, which the
/// [`SubgroupProof`] of the public key establishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bases {
    pub ab: Element,
    pub au: Element,
    pub ai: Element,
    pub av: Element,
    pub ao: Element,
}

/// Fiat-Shamir proof that `au`, `ai`, `av` and `ao` lie in the subgroup
/// generated by `ab`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubgroupProof {
    pub t: Exponent,
    pub su: Exponent,
    pub si: Exponent,
    pub sv: Exponent,
    pub so: Exponent,
}

/// Public parameters of a host.
///
/// Both groups are unknown-order views: the composite modulus `n = p·q`
/// and the square modulus `z²` are published without their orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    composite_group: GroupWithUnknownOrder,
    e: Exponent,
    bases: Bases,
    proof: SubgroupProof,
    square_group: GroupWithUnknownOrder,
    g: Element,
    y: Element,
    z_plus_1: Element,
}

impl PublicKey {
    /// Construct a public key from its components.
    ///
    /// Fails with [`Error::InvalidPublicKey`] if an element lies outside its
    /// group or if the subgroup proof does not verify.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        composite_group: GroupWithUnknownOrder,
        e: Exponent,
        bases: Bases,
        proof: SubgroupProof,
        square_group: GroupWithUnknownOrder,
        g: Element,
        y: Element,
        z_plus_1: Element,
    ) -> Result<Self> {
        let public_key =
            Self { composite_group, e, bases, proof, square_group, g, y, z_plus_1 };
        public_key.validate()?;
        Ok(public_key)
    }

    #[inline]
    pub fn composite_group(&self) -> &GroupWithUnknownOrder {
        &self.composite_group
    }

    /// The public exponent `e`.
    #[inline]
    pub fn e(&self) -> &Exponent {
        &self.e
    }

    #[inline]
    pub fn bases(&self) -> &Bases {
        &self.bases
    }

    #[inline]
    pub fn ab(&self) -> &Element {
        &self.bases.ab
    }

    #[inline]
    pub fn au(&self) -> &Element {
        &self.bases.au
    }

    #[inline]
    pub fn ai(&self) -> &Element {
        &self.bases.ai
    }

    #[inline]
    pub fn av(&self) -> &Element {
        &self.bases.av
    }

    #[inline]
    pub fn ao(&self) -> &Element {
        &self.bases.ao
    }

    #[inline]
    pub fn proof(&self) -> &SubgroupProof {
        &self.proof
    }

    #[inline]
    pub fn square_group(&self) -> &GroupWithUnknownOrder {
        &self.square_group
    }

    /// Generator of the square group.
    #[inline]
    pub fn g(&self) -> &Element {
        &self.g
    }

    /// `y = g^x` for the secret `x` of the private key.
    #[inline]
    pub fn y(&self) -> &Element {
        &self.y
    }

    /// The element `z + 1` of the square group.
    #[inline]
    pub fn z_plus_1(&self) -> &Element {
        &self.z_plus_1
    }

    /// `m^e mod n`, undone by [`PrivateKey::pow_d`](crate::PrivateKey::pow_d).
    pub fn pow_e(&self, m: &Element) -> Result<Element> {
        if !self.composite_group.contains(m) {
            return Err(Error::GroupMismatch);
        }
        m.pow(&self.e)
    }

    fn subgroup_challenge(&self) -> Result<Exponent> {
        let Bases { ab, au, ai, av, ao } = &self.bases;
        let SubgroupProof { t, su, si, sv, so } = &self.proof;

        let tu = ab.pow(su)?.multiply(&au.pow(t)?)?;
        let ti = ab.pow(si)?.multiply(&ai.pow(t)?)?;
        let tv = ab.pow(sv)?.multiply(&av.pow(t)?)?;
        let to = ab.pow(so)?.multiply(&ao.pow(t)?)?;

        Ok(generate_hash([&tu, &ti, &tv, &to]))
    }

    /// Check that `au`, `ai`, `av` and `ao` are powers of `ab`.
    ///
    /// Recomputes `tx = ab^sx · ax^t` for each base and compares `t` with the
    /// hash of the four commitments.
    pub fn verify_subgroup_proof(&self) -> bool {
        self.subgroup_challenge().is_ok_and(|t| t == self.proof.t)
    }

    /// Verifiably encrypt `m` with randomness `r`.
    ///
    /// Returns `(y^r · (z + 1)^m, g^r)` in the square group; only the holder of
    /// `x` can strip `y^r` and read `m` off `(z + 1)^m = 1 + m·z`.
    pub fn get_verifiable_encryption(
        &self,
        m: &Exponent,
        r: &Exponent,
    ) -> Result<VerifiableEncryption> {
        let c1 = self.y.pow(r)?.multiply(&self.z_plus_1.pow(m)?)?;
        let c2 = self.g.pow(r)?;
        VerifiableEncryption::new(c1, c2)
    }

    /// Check the structural invariants of the key.
    pub fn validate(&self) -> Result<()> {
        let Bases { ab, au, ai, av, ao } = &self.bases;
        let in_composite = [ab, au, ai, av, ao]
            .into_iter()
            .all(|base| self.composite_group.contains(base));
        let in_square = [&self.g, &self.y, &self.z_plus_1]
            .into_iter()
            .all(|element| self.square_group.contains(element));

        if !in_composite || !in_square || self.e.is_negative() {
            tracing::warn!("public key elements lie outside their groups");
            return Err(Error::InvalidPublicKey);
        }
        if !self.verify_subgroup_proof() {
            tracing::warn!("public key subgroup proof does not verify");
            return Err(Error::InvalidPublicKey);
        }
        Ok(())
    }
}
