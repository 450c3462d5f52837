// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain-separated hashing into integers.
//!
//! [`generate_hash`] turns an ordered transcript of group elements into a
//! Fiat-Shamir challenge. [`content_hash`] digests the `(time, subject,
//! object)` triple a signature is bound to.

use crate::group::{Element, Exponent};
use crate::util;

use std::borrow::Cow;
use std::time::{SystemTime, UNIX_EPOCH};

use num_bigint_dig::BigUint;
use sha2::{Digest, Sha256};

/// Hash the values of `elements`, in order, into a 256-bit integer.
///
/// Each value is fed as its big-endian two's-complement encoding followed by
/// a single zero byte.
pub fn generate_hash<'a, I>(elements: I) -> Exponent
where
    I: IntoIterator<Item = &'a Element>,
{
    let mut hasher = Sha256::new();
    for element in elements {
        hasher.update(util::to_signed_bytes_be(element.value()));
        hasher.update([0u8]);
    }
    Exponent::from(BigUint::from_bytes_be(&hasher.finalize()))
}

/// Content that can be bound into a signature.
///
/// The encoding must be deterministic: equal objects must produce equal
/// bytes, since the signature only commits to their digest.
pub trait Signable {
    fn signing_bytes(&self) -> Cow<'_, [u8]>;
}

impl Signable for str {
    fn signing_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

impl Signable for String {
    fn signing_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

impl Signable for [u8] {
    fn signing_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self)
    }
}

impl Signable for Vec<u8> {
    fn signing_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self)
    }
}

impl<T: Signable + ?Sized> Signable for &T {
    fn signing_bytes(&self) -> Cow<'_, [u8]> {
        (**self).signing_bytes()
    }
}

/// Milliseconds since the Unix epoch, negative for earlier times.
pub(crate) fn timestamp_millis(time: SystemTime) -> i128 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => after.as_millis() as i128,
        Err(before) => -(before.duration().as_millis() as i128),
    }
}

/// Digest of the triple a signature is bound to.
///
/// SHA-256 over the 16-byte big-endian millisecond timestamp, then the
/// subject and the object, each prefixed with its length as a big-endian
/// `u64`.
pub fn content_hash<T>(time: SystemTime, subject: &str, object: &T) -> Exponent
where
    T: Signable + ?Sized,
{
    let object = object.signing_bytes();

    let mut hasher = Sha256::new();
    hasher.update(timestamp_millis(time).to_be_bytes());
    hasher.update((subject.len() as u64).to_be_bytes());
    hasher.update(subject.as_bytes());
    hasher.update((object.len() as u64).to_be_bytes());
    hasher.update(&object);
    Exponent::from(BigUint::from_bytes_be(&hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::{Group, GroupWithUnknownOrder};
    use crate::parameters::HASH_BITS;

    use std::time::Duration;

    fn elements() -> (Element, Element, Element) {
        let group = GroupWithUnknownOrder::new(BigUint::from(1_000_003u32)).unwrap();
        (
            group.element(BigUint::from(2u32)).unwrap(),
            group.element(BigUint::from(128u32)).unwrap(),
            group.element(BigUint::from(999_999u32)).unwrap(),
        )
    }

    #[test]
    fn generate_hash_is_deterministic() {
        let (a, b, c) = elements();
        assert_eq!(generate_hash([&a, &b, &c]), generate_hash([&a, &b, &c]));
        assert!(generate_hash([&a, &b, &c]).bits() <= HASH_BITS);
    }

    #[test]
    fn generate_hash_is_order_sensitive() {
        let (a, b, c) = elements();
        assert_ne!(generate_hash([&a, &b, &c]), generate_hash([&b, &a, &c]));
        assert_ne!(generate_hash([&a, &b, &c]), generate_hash([&a, &c, &b]));
    }

    #[test]
    fn generate_hash_separates_elements() {
        // Without the separator, 0x01 followed by 0x00 would hash like 0x0100.
        let group = GroupWithUnknownOrder::new(BigUint::from(1_000_003u32)).unwrap();
        let one = group.element(BigUint::from(1u32)).unwrap();
        let zero = group.element(BigUint::from(0u32)).unwrap();
        let joined = group.element(BigUint::from(256u32)).unwrap();
        assert_ne!(generate_hash([&one, &zero]), generate_hash([&joined]));
    }

    #[test]
    fn generate_hash_matches_known_digest() {
        let group = GroupWithUnknownOrder::new(BigUint::from(1_000_003u32)).unwrap();
        let element = group.element(BigUint::from(0x80u32)).unwrap();
        let expected = Sha256::digest([0x00u8, 0x80, 0x00]);
        assert_eq!(
            generate_hash([&element]),
            Exponent::from(BigUint::from_bytes_be(&expected))
        );
    }

    #[test]
    fn content_hash_binds_every_field() {
        let now = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let base = content_hash(now, "alice@example.test", "hello");
        assert_eq!(base, content_hash(now, "alice@example.test", "hello"));
        let later = now + Duration::from_millis(1);
        assert_ne!(base, content_hash(later, "alice@example.test", "hello"));
        assert_ne!(base, content_hash(now, "bob@example.test", "hello"));
        assert_ne!(base, content_hash(now, "alice@example.test", "hellO"));
        // Moving bytes between subject and object changes the digest.
        assert_ne!(content_hash(now, "ab", "c"), content_hash(now, "a", "bc"));
    }

    #[test]
    fn timestamps_before_the_epoch_are_negative() {
        let before = UNIX_EPOCH - Duration::from_millis(5);
        assert_eq!(timestamp_millis(before), -5);
        assert_eq!(timestamp_millis(UNIX_EPOCH + Duration::from_millis(5)), 5);
    }
}
