// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Anonymous credentials.
//!
//! An issuing host signs a client's blind commitment to its secrets `u`
//! and `v` together with a publicly [`ExposedExponent`]. The holder keeps a
//! [`ClientCredential`] satisfying
//!
//! ```text
//! ao^o = c^e · ab^b · au^u · ai^i · av^v   (mod n)
//! ```
//!
//! with `o` the hash of the exposed exponent, and shows randomized copies
//! of it. Verifiers end up with a [`HostCredential`], which carries only
//! what a presentation discloses.

mod client;
mod host;
mod issuance;

pub use client::ClientCredential;
pub use host::HostCredential;
pub use issuance::{blind_commitment, issue, IssuedCredential};

use crate::group::Exponent;
use crate::hash::timestamp_millis;

use std::time::SystemTime;

use num_bigint_dig::BigUint;
use sha2::{Digest, Sha256};

/// What a credential vouches for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExposedContent {
    /// An encoded attribute value of the client.
    Attribute(Vec<u8>),
    /// A role the client may assume.
    Role(String),
}

/// Limits on what a credential authorizes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Restrictions {
    /// The holder may act as a client of the issuer.
    pub client: bool,
    /// The holder may assume roles.
    pub role: bool,
    /// The holder may write, not only read.
    pub writing: bool,
    /// Context the credential is confined to, if any.
    pub context: Option<String>,
}

/// The publicly disclosed context of a credential.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExposedExponent {
    issuer: String,
    issuance: SystemTime,
    content: ExposedContent,
    restrictions: Option<Restrictions>,
}

impl ExposedExponent {
    pub fn new(
        issuer: impl Into<String>,
        issuance: SystemTime,
        content: ExposedContent,
        restrictions: Option<Restrictions>,
    ) -> Self {
        Self { issuer: issuer.into(), issuance, content, restrictions }
    }

    #[inline]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    #[inline]
    pub fn issuance(&self) -> SystemTime {
        self.issuance
    }

    #[inline]
    pub fn content(&self) -> &ExposedContent {
        &self.content
    }

    #[inline]
    pub fn restrictions(&self) -> Option<&Restrictions> {
        self.restrictions.as_ref()
    }

    /// Deterministic byte encoding.
    ///
    /// Strings and byte strings are prefixed with their length as a
    /// big-endian `u64`; variants and options are prefixed with a tag byte.
    pub fn encode(&self) -> Vec<u8> {
        fn put(bytes: &mut Vec<u8>, value: &[u8]) {
            bytes.extend_from_slice(&(value.len() as u64).to_be_bytes());
            bytes.extend_from_slice(value);
        }

        let mut bytes = Vec::new();
        put(&mut bytes, self.issuer.as_bytes());
        bytes.extend_from_slice(&timestamp_millis(self.issuance).to_be_bytes());

        match &self.content {
            ExposedContent::Attribute(value) => {
                bytes.push(0);
                put(&mut bytes, value);
            }
            ExposedContent::Role(role) => {
                bytes.push(1);
                put(&mut bytes, role.as_bytes());
            }
        }

        match &self.restrictions {
            None => bytes.push(0),
            Some(restrictions) => {
                bytes.push(1);
                bytes.push(restrictions.client as u8);
                bytes.push(restrictions.role as u8);
                bytes.push(restrictions.writing as u8);
                match &restrictions.context {
                    None => bytes.push(0),
                    Some(context) => {
                        bytes.push(1);
                        put(&mut bytes, context.as_bytes());
                    }
                }
            }
        }
        bytes
    }

    /// `o`, the SHA-256 digest of [`encode`](Self::encode) as an integer.
    pub fn hash(&self) -> Exponent {
        Exponent::from(BigUint::from_bytes_be(&Sha256::digest(self.encode())))
    }
}

/// Operations shared by the holder's and the verifier's view of a credential.
pub trait Credential {
    fn exposed_exponent(&self) -> &ExposedExponent;

    /// The serial number, where this view knows it.
    fn serial(&self) -> Option<&Exponent>;

    /// `o = Hash(exposed exponent)`.
    fn o(&self) -> Exponent {
        self.exposed_exponent().hash()
    }

    fn restrictions(&self) -> Option<&Restrictions> {
        self.exposed_exponent().restrictions()
    }

    /// Whether both are randomizations of the same issued credential.
    fn is_similar_to<C: Credential + ?Sized>(&self, other: &C) -> bool {
        self.exposed_exponent() == other.exposed_exponent() && self.serial() == other.serial()
    }
}
