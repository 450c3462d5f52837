// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Immutable views of the material produced by key generation.

mod private;
mod public;

pub use private::PrivateKey;
pub use public::{Bases, PublicKey, SubgroupProof};
