// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Errors that can occur during cryptographic operations.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid bit length: must be at least {min} bits, got {actual}")]
    BitLengthTooShort { min: usize, actual: usize },

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Elements belong to different groups")]
    GroupMismatch,

    #[error("Value is not an element of the group")]
    ElementOutOfRange,

    #[error("Value is not invertible in the group")]
    NotInvertible,

    #[error("Key generation failed: {0}")]
    KeyGenerationFailed(String),

    #[error("Invalid public key")]
    InvalidPublicKey,

    #[error("Invalid private key")]
    InvalidPrivateKey,

    #[error("Invalid credential")]
    InvalidCredential,

    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("Client signature has expired")]
    ExpiredClientSignature,

    #[error("Client signature is invalid")]
    InvalidClientSignature,

    #[error("Credentials signature has expired")]
    ExpiredCredentialsSignature,

    #[error("Credentials signature is invalid: {0}")]
    InvalidCredentialsSignature(String),

    #[error("Credential issuer is not trusted: {0}")]
    UntrustedIssuer(String),
}

pub type Result<T> = std::result::Result<T, Error>;
