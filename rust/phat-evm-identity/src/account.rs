//! The external signer seam: Ethereum accounts, their addresses and the
//! recoverable signatures they produce.
//!
//! This crate never holds key material. An [`Account`] is a capability owned
//! by the caller (a browser wallet, a hardware device, a remote signer) that
//! can be asked to sign; every request is assumed to be interactive.

use crate::{
    ConditionalSend,
    error::{RecoveryError, SignerError},
    hash::keccak256,
    typed_data::StructuredDataDocument,
};
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, future::Future, str::FromStr};
use thiserror::Error;

/// An Ethereum-style signing identity.
pub trait Account {
    /// The 20-byte address this account claims to sign for.
    fn address(&self) -> EthAddress;

    /// Ask the signer to sign `message` with the personal-sign scheme
    /// (`eth_sign` / `personal_sign`).
    ///
    /// This suspends until the operator approves or declines the prompt.
    fn sign_message(
        &self,
        message: &[u8],
    ) -> impl Future<Output = Result<RecoverableSignature, SignerError>> + ConditionalSend;
}

/// An account that can also sign EIP-712 structured data
/// (`eth_signTypedData_v4`).
pub trait TypedDataSigner: Account {
    /// Ask the signer to sign `document`.
    ///
    /// This suspends until the operator approves or declines the prompt.
    fn sign_typed_data(
        &self,
        document: &StructuredDataDocument,
    ) -> impl Future<Output = Result<RecoverableSignature, SignerError>> + ConditionalSend;
}

/// Errors that can occur when parsing an [`EthAddress`] from a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum EthAddressError {
    /// The string is not hex.
    #[error("invalid hex encoding")]
    InvalidHex,

    /// The string does not hold exactly 20 bytes.
    #[error("expected 20 address bytes, got {0}")]
    InvalidLength(usize),

    /// The string is mixed-case but the casing is not a valid EIP-55
    /// checksum.
    #[error("invalid EIP-55 checksum")]
    InvalidChecksum,
}

/// A 20-byte Ethereum account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EthAddress([u8; 20]);

impl EthAddress {
    /// Wrap raw address bytes.
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Get the raw address bytes.
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Derive the address owning a secp256k1 public key: the last 20 bytes
    /// of `keccak256(x || y)`.
    pub fn from_verifying_key(key: &VerifyingKey) -> Self {
        let point = key.to_encoded_point(false);
        let digest = keccak256(&point.as_bytes()[1..]);
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest[12..]);
        Self(bytes)
    }

    /// Format with EIP-55 mixed-case checksum.
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let digest = keccak256(lower.as_bytes());
        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let shift = if i % 2 == 0 { 4 } else { 0 };
            let nibble = (digest[i / 2] >> shift) & 0x0f;
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl From<[u8; 20]> for EthAddress {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl FromStr for EthAddress {
    type Err = EthAddressError;

    /// Parse a hex address, with or without `0x`. All-lowercase and
    /// all-uppercase input is accepted as-is; mixed-case input must carry a
    /// valid EIP-55 checksum.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let decoded = hex::decode(digits).map_err(|_| EthAddressError::InvalidHex)?;
        let bytes: [u8; 20] = decoded
            .as_slice()
            .try_into()
            .map_err(|_| EthAddressError::InvalidLength(decoded.len()))?;
        let address = Self(bytes);

        let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
        if has_lower && has_upper && address.to_checksum()[2..] != *digits {
            return Err(EthAddressError::InvalidChecksum);
        }

        Ok(address)
    }
}

impl fmt::Display for EthAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl fmt::Debug for EthAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EthAddress({self})")
    }
}

impl Serialize for EthAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EthAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A 65-byte Ethereum signature, `r || s || v`.
///
/// `v` is accepted either in raw recovery-id form (0 to 3) or with the legacy
/// offset of 27 (27 to 30), which is what wallets usually return.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecoverableSignature([u8; 65]);

impl RecoverableSignature {
    /// Length of the encoded signature in bytes.
    pub const LENGTH: usize = 65;

    /// Assemble a signature from its ECDSA scalars and recovery id, encoding
    /// `v` with the legacy offset of 27.
    pub fn from_parts(signature: &Signature, recovery_id: RecoveryId) -> Self {
        let mut bytes = [0u8; Self::LENGTH];
        bytes[..64].copy_from_slice(&signature.to_bytes());
        bytes[64] = 27 + recovery_id.to_byte();
        Self(bytes)
    }

    /// Get the raw signature bytes.
    pub const fn as_bytes(&self) -> &[u8; 65] {
        &self.0
    }

    /// The trailing `v` byte as it was received.
    pub const fn v(&self) -> u8 {
        self.0[64]
    }

    /// Split into the ECDSA signature and recovery id.
    ///
    /// # Errors
    ///
    /// Returns an error if `r` or `s` is out of range or `v` does not encode
    /// a recovery id.
    pub fn to_components(&self) -> Result<(Signature, RecoveryId), RecoveryError> {
        let signature = Signature::from_slice(&self.0[..64])
            .map_err(|_| RecoveryError::MalformedSignature)?;
        let v = self.v();
        let id = match v {
            0..=3 => v,
            27..=30 => v - 27,
            _ => return Err(RecoveryError::InvalidRecoveryId(v)),
        };
        let recovery_id =
            RecoveryId::from_byte(id).ok_or(RecoveryError::InvalidRecoveryId(v))?;
        Ok((signature, recovery_id))
    }
}

impl TryFrom<&[u8]> for RecoverableSignature {
    type Error = RecoveryError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; 65] = bytes
            .try_into()
            .map_err(|_| RecoveryError::InvalidLength(bytes.len()))?;
        Ok(Self(bytes))
    }
}

impl From<[u8; 65]> for RecoverableSignature {
    fn from(bytes: [u8; 65]) -> Self {
        Self(bytes)
    }
}

impl FromStr for RecoverableSignature {
    type Err = RecoveryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|_| RecoveryError::InvalidHex)?;
        Self::try_from(bytes.as_slice())
    }
}

impl fmt::Display for RecoverableSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for RecoverableSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecoverableSignature({self})")
    }
}

impl Serialize for RecoverableSignature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}
