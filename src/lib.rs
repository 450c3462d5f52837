// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Digital identity cryptography
//!
//! Host key material, CRT private-key operations and the zero-knowledge
//! signatures a decentralized identity protocol authenticates its messages
//! with.
//!
//! A host owns a [`KeyPair`]: an RSA-like composite group `n = p·q` built
//! from two safe primes, five related bases `ab, au, ai, av, ao` with an
//! embedded proof that they lie in one cyclic subgroup, and a square group
//! `z²` for Camenisch-Shoup verifiable encryption. Clients prove knowledge
//! of a committed secret with a [`ClientSignature`] and anonymously show
//! issued credentials with a [`CredentialsSignature`].
//!
//! ## Security
//!
//! Group orders never leave the private side: everything public is built
//! on a [`GroupWithUnknownOrder`]. Secret exponents are zeroized on drop
//! via the `zeroize` crate. Signatures combine the Fiat-Shamir challenge
//! with the content hash by XOR rather than by addition.
//!
//! ## Example
//!
//! ```rust,no_run
//! use digitalid_crypto::{ClientSignature, Exponent, KeyPair, Parameters, SecretCommitment};
//! use rand::rngs::OsRng;
//! use std::sync::Arc;
//! use std::time::SystemTime;
//!
//! let parameters = Parameters::testing();
//! let key_pair = KeyPair::generate_with(parameters, &mut OsRng).expect("key generation failed");
//! assert!(key_pair.public_key().verify_subgroup_proof());
//!
//! let public_key = Arc::new(key_pair.public_key().clone());
//! let secret = SecretCommitment::new(public_key, Exponent::from(7u64)).expect("commitment");
//! let signature = ClientSignature::sign(
//!     &secret,
//!     SystemTime::now(),
//!     "alice@example.test",
//!     "hello",
//!     &parameters,
//!     &mut OsRng,
//! )
//! .expect("signing failed");
//! assert!(signature.verify().is_ok());
//! ```

pub mod credential;
mod encryption;
mod error;
pub mod group;
pub mod hash;
mod key;
mod keypair;
mod parameters;
pub mod signature;
mod util;

pub use credential::{ClientCredential, Credential, ExposedExponent, HostCredential};
pub use encryption::VerifiableEncryption;
pub use error::*;
pub use group::{Element, Exponent, Group, GroupWithKnownOrder, GroupWithUnknownOrder};
pub use key::{Bases, PrivateKey, PublicKey, SubgroupProof};
pub use keypair::{KeyPair, KeyPairBuilder};
pub use parameters::{Parameters, HASH_BITS};
pub use signature::{
    ClientSignature, Commitment, CredentialsSignature, SecretCommitment, TROPICAL_YEAR,
};
