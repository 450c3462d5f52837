// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Modular arithmetic over groups of integers modulo `n`.
//!
//! A group is identified by its modulus. The private side works with a
//! [`GroupWithKnownOrder`], which also carries the multiplicative order;
//! everything handed out publicly is a [`GroupWithUnknownOrder`] obtained
//! through [`GroupWithKnownOrder::drop_order`]. Publishing the order next
//! to a composite modulus reveals its factorization, so elements never
//! carry the order with them.

mod element;
mod exponent;

pub use element::Element;
pub use exponent::Exponent;

use crate::{Error, Result};

use std::fmt;
use std::sync::Arc;

use num_bigint_dig::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::One;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

/// Operations shared by both views of a group.
pub trait Group {
    /// The modulus `n` of the group.
    fn modulus(&self) -> &Arc<BigUint>;

    /// Wrap `value` as an element of this group.
    ///
    /// Returns [`Error::ElementOutOfRange`] unless `value < n`.
    fn element(&self, value: BigUint) -> Result<Element> {
        if value >= **self.modulus() {
            return Err(Error::ElementOutOfRange);
        }
        Ok(Element::new(value, Arc::clone(self.modulus())))
    }

    /// The neutral element.
    fn one(&self) -> Element {
        Element::new(BigUint::one(), Arc::clone(self.modulus()))
    }

    /// Whether `element` was created in a group with this modulus.
    fn contains(&self, element: &Element) -> bool {
        element.modulus() == &**self.modulus()
    }

    /// Sample a uniformly random unit in `[2, n)`.
    fn random_element<R: RngCore + CryptoRng>(&self, rng: &mut R) -> Element {
        let n: &BigUint = self.modulus();
        let two = BigUint::from(2u32);
        loop {
            let candidate = rng.gen_biguint_range(&two, n);
            if candidate.gcd(n).is_one() {
                return Element::new(candidate, Arc::clone(self.modulus()));
            }
        }
    }

    /// Sample a non-negative exponent of at most `bits` bits.
    fn random_exponent<R: RngCore + CryptoRng>(&self, rng: &mut R, bits: usize) -> Exponent {
        Exponent::from(rng.gen_biguint(bits))
    }
}

/// Public view of a group: only the modulus is known.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupWithUnknownOrder {
    modulus: Arc<BigUint>,
}

impl GroupWithUnknownOrder {
    /// Create a group from its modulus. The modulus must exceed 2.
    pub fn new(modulus: BigUint) -> Result<Self> {
        if modulus <= BigUint::from(2u32) {
            return Err(Error::InvalidParameters("group modulus must be greater than 2".into()));
        }
        Ok(Self { modulus: Arc::new(modulus) })
    }
}

impl Group for GroupWithUnknownOrder {
    #[inline]
    fn modulus(&self) -> &Arc<BigUint> {
        &self.modulus
    }
}

/// Private view of a group: modulus together with the group order.
///
/// `Debug` prints the modulus only, and the order is wiped on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct GroupWithKnownOrder {
    modulus: Arc<BigUint>,
    order: BigUint,
}

impl GroupWithKnownOrder {
    /// Create a group from its modulus and multiplicative order.
    pub fn new(modulus: BigUint, order: BigUint) -> Result<Self> {
        if modulus <= BigUint::from(2u32) {
            return Err(Error::InvalidParameters("group modulus must be greater than 2".into()));
        }
        if order < BigUint::one() || order >= modulus {
            return Err(Error::InvalidParameters("group order must lie in [1, n)".into()));
        }
        Ok(Self { modulus: Arc::new(modulus), order })
    }

    /// The multiplicative order of the group.
    #[inline]
    pub fn order(&self) -> &BigUint {
        &self.order
    }

    /// Forget the order, keeping the modulus.
    ///
    /// Elements of the returned group compare equal to elements of `self`.
    pub fn drop_order(&self) -> GroupWithUnknownOrder {
        GroupWithUnknownOrder { modulus: Arc::clone(&self.modulus) }
    }
}

impl Group for GroupWithKnownOrder {
    #[inline]
    fn modulus(&self) -> &Arc<BigUint> {
        &self.modulus
    }
}

impl fmt::Debug for GroupWithKnownOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupWithKnownOrder")
            .field("modulus", &self.modulus)
            .finish_non_exhaustive()
    }
}

impl Zeroize for GroupWithKnownOrder {
    fn zeroize(&mut self) {
        self.order.zeroize();
    }
}
