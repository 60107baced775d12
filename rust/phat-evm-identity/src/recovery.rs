//! Public key recovery from a personal-sign signature over the probe message.
//!
//! Ethereum wallets do not expose public keys, only addresses. Signing a
//! fixed probe message and running ECDSA recovery on the result yields the
//! account's secp256k1 public key. The key is the same whichever of the many
//! valid signatures the wallet returns, which is what makes the derived
//! Substrate address stable.

use crate::{
    account::{Account, EthAddress, RecoverableSignature},
    constants::{ProtocolConstants, V1},
    error::{RecoveryError, Result},
};
use k256::ecdsa::{RecoveryId, VerifyingKey};
use std::fmt;

/// A secp256k1 public key in SEC1 compressed form: a parity byte (`0x02` for
/// even y, `0x03` for odd y) followed by the 32-byte x coordinate.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompactPublicKey([u8; 33]);

impl CompactPublicKey {
    /// Length of the compressed encoding in bytes.
    pub const LENGTH: usize = 33;

    /// Compress a verifying key.
    pub fn from_verifying_key(key: &VerifyingKey) -> Self {
        let mut bytes = [0u8; Self::LENGTH];
        bytes.copy_from_slice(key.to_encoded_point(true).as_bytes());
        Self(bytes)
    }

    /// Parse and compress a SEC1 point (33 bytes compressed or 65 bytes
    /// uncompressed), e.g. a key the caller cached from an earlier recovery.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a point on secp256k1.
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self, RecoveryError> {
        let key =
            VerifyingKey::from_sec1_bytes(bytes).map_err(|_| RecoveryError::InvalidPoint)?;
        Ok(Self::from_verifying_key(&key))
    }

    /// Get the compressed bytes.
    pub const fn as_bytes(&self) -> &[u8; 33] {
        &self.0
    }

    /// Get the Ethereum address owning this key.
    ///
    /// # Errors
    ///
    /// Never fails for keys produced by this crate; the check exists because
    /// decompression is fallible in general.
    pub fn eth_address(&self) -> Result<EthAddress, RecoveryError> {
        let key =
            VerifyingKey::from_sec1_bytes(&self.0).map_err(|_| RecoveryError::InvalidPoint)?;
        Ok(EthAddress::from_verifying_key(&key))
    }
}

impl AsRef<[u8]> for CompactPublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for CompactPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for CompactPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompactPublicKey({self})")
    }
}

/// Digest `message` with the Ethereum personal-sign scheme of the current
/// constant table.
pub fn personal_message_digest(message: &[u8]) -> [u8; 32] {
    V1.personal_message_digest(message)
}

/// Recover the verifying key that produced `signature` over a 32-byte digest.
///
/// High-S signatures are accepted: they are normalized to low-S with the
/// recovery id's parity flipped, which identifies the same key.
///
/// # Errors
///
/// Returns an error if the signature is malformed or does not recover to a
/// valid curve point.
pub fn recover_verifying_key(
    digest: &[u8; 32],
    signature: &RecoverableSignature,
) -> Result<VerifyingKey, RecoveryError> {
    let (signature, recovery_id) = signature.to_components()?;
    let (signature, recovery_id) = match signature.normalize_s() {
        Some(normalized) => (
            normalized,
            RecoveryId::new(!recovery_id.is_y_odd(), recovery_id.is_x_reduced()),
        ),
        None => (signature, recovery_id),
    };
    VerifyingKey::recover_from_prehash(digest, &signature, recovery_id)
        .map_err(|_| RecoveryError::InvalidPoint)
}

/// Recovers compact public keys by asking accounts to sign the probe message.
#[derive(Debug, Clone, Copy)]
pub struct PublicKeyRecoverer {
    constants: &'static ProtocolConstants,
}

impl Default for PublicKeyRecoverer {
    fn default() -> Self {
        Self::new(&V1)
    }
}

impl PublicKeyRecoverer {
    /// Create a recoverer over the given constant table.
    pub const fn new(constants: &'static ProtocolConstants) -> Self {
        Self { constants }
    }

    /// Recover the compact key from a probe signature already obtained from
    /// `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`RecoveryError::AddressMismatch`] if the signature was made by
    /// a key other than the one owning `expected`, and the errors of
    /// [`recover_verifying_key`] otherwise.
    pub fn recover_from_signature(
        &self,
        expected: EthAddress,
        signature: &RecoverableSignature,
    ) -> Result<CompactPublicKey, RecoveryError> {
        let digest = self
            .constants
            .personal_message_digest(self.constants.probe_message);
        let key = recover_verifying_key(&digest, signature)?;

        let recovered = EthAddress::from_verifying_key(&key);
        if recovered != expected {
            tracing::warn!(%expected, %recovered, "probe signature made by a different key");
            return Err(RecoveryError::AddressMismatch {
                expected,
                recovered,
            });
        }

        Ok(CompactPublicKey::from_verifying_key(&key))
    }

    /// Ask `account` to sign the probe message and recover its compact
    /// public key.
    ///
    /// Triggers exactly one signing prompt. Nothing is retried or cached.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SigningDeclined`] if the signer does not produce a
    /// signature and [`Error::RecoveryFailed`] if the signature does not
    /// recover to the account's key.
    ///
    /// [`Error::SigningDeclined`]: crate::Error::SigningDeclined
    /// [`Error::RecoveryFailed`]: crate::Error::RecoveryFailed
    pub async fn recover<A: Account>(&self, account: &A) -> Result<CompactPublicKey> {
        let expected = account.address();
        tracing::debug!(account = %expected, "requesting probe signature");

        let signature = account
            .sign_message(self.constants.probe_message)
            .await
            .inspect_err(|error| {
                tracing::debug!(account = %expected, %error, "probe signature declined")
            })?;

        let key = self.recover_from_signature(expected, &signature)?;
        tracing::debug!(account = %expected, public_key = %key, "recovered public key");
        Ok(key)
    }
}

/// Ask `account` to sign the probe message and recover its compact public
/// key, using the current constant table.
///
/// # Errors
///
/// See [`PublicKeyRecoverer::recover`].
pub async fn recover_compact_public_key<A: Account>(account: &A) -> Result<CompactPublicKey> {
    PublicKeyRecoverer::default().recover(account).await
}
