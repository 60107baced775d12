//! Error types for recovery, address derivation and document construction.

use crate::account::EthAddress;
use thiserror::Error;

/// The common error type used by this crate.
///
/// Every fallible operation resolves to one of three kinds. Errors raised
/// while recovering a public key propagate unchanged through address
/// derivation; the document builders only ever raise [`Error::InvalidInput`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The external signer did not produce a signature. The operator may
    /// have rejected or cancelled the prompt; the caller decides whether to
    /// ask again.
    #[error("signing request declined: {0}")]
    SigningDeclined(#[from] SignerError),

    /// A signature was produced but no usable public key could be recovered
    /// from it. Retrying requires a new signature.
    #[error("public key recovery failed: {0}")]
    RecoveryFailed(#[from] RecoveryError),

    /// A document builder was called with malformed parameters.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Result alias defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failure reported by an external signer in place of a signature.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignerError {
    /// The operator explicitly rejected the request.
    #[error("rejected by operator: {0}")]
    Rejected(String),

    /// The prompt was dismissed or the request was aborted before completion.
    #[error("cancelled")]
    Cancelled,

    /// The signer could not service the request (locked wallet, unsupported
    /// method, transport failure).
    #[error("signer unavailable: {0}")]
    Unavailable(String),
}

/// Reasons a public key could not be recovered from a signature.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecoveryError {
    /// The signature is not 65 bytes of `r || s || v`.
    #[error("expected 65 signature bytes, got {0}")]
    InvalidLength(usize),

    /// The signature is not valid hex.
    #[error("signature is not valid hex")]
    InvalidHex,

    /// `r` or `s` is zero or not below the curve order.
    #[error("malformed signature scalars")]
    MalformedSignature,

    /// The `v` byte does not encode a recovery id.
    #[error("invalid recovery id byte {0}")]
    InvalidRecoveryId(u8),

    /// The signature does not recover to a valid curve point.
    #[error("signature does not recover to a valid public key")]
    InvalidPoint,

    /// The recovered key belongs to a different Ethereum account than the
    /// one that was asked to sign.
    #[error("recovered key belongs to {recovered}, expected {expected}")]
    AddressMismatch {
        /// Address of the account that was asked to sign.
        expected: EthAddress,
        /// Address of the key that actually signed.
        recovered: EthAddress,
    },
}
