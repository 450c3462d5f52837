// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Zero-knowledge signatures bound to `(time, subject, object)`.
//!
//! Both schemes are Schnorr proofs made non-interactive by hashing the
//! commitments into `t` and combining it with the content hash as
//! `h = t XOR content_hash`. A signature older than one tropical year is
//! rejected as expired before its proof is looked at.

mod client;
mod credentials;

pub use client::{ClientSignature, Commitment, SecretCommitment};
pub use credentials::{CredentialProof, CredentialsSignature, Disclosure};

use std::time::{Duration, SystemTime};

/// 365.2422 days.
pub const TROPICAL_YEAR: Duration = Duration::from_millis(31_556_926_080);

/// Whether a signature made at `time` is stale at `now`.
///
/// Signatures dated in the future are not considered expired.
pub fn is_expired(time: SystemTime, now: SystemTime) -> bool {
    now.duration_since(time).is_ok_and(|age| age > TROPICAL_YEAR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tropical_year_length() {
        // 365.2422 days of 86 400 000 ms each
        assert_eq!(TROPICAL_YEAR.as_millis(), 3_652_422 * 8_640);
    }

    #[test]
    fn expiry_window() {
        let now = SystemTime::now();
        assert!(!is_expired(now, now));
        assert!(!is_expired(now - TROPICAL_YEAR, now));
        assert!(is_expired(now - TROPICAL_YEAR - Duration::from_millis(1), now));
        assert!(!is_expired(now + Duration::from_secs(60), now));
    }
}
