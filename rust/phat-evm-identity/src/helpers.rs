//! In-process account backed by a local secp256k1 key.
//!
//! Only compiled for tests or with the `helpers` feature. Production callers
//! bring their own [`Account`] implementation wrapping a wallet; this one
//! exists so recovery and document signing can be exercised end to end
//! without a wallet.

use crate::{
    account::{Account, EthAddress, RecoverableSignature, TypedDataSigner},
    error::{Error, SignerError},
    recovery::{CompactPublicKey, personal_message_digest},
    typed_data::StructuredDataDocument,
};
use k256::ecdsa::SigningKey;

/// An [`Account`] that signs immediately with a key held in memory.
#[derive(Debug, Clone)]
pub struct LocalAccount {
    key: SigningKey,
    address: EthAddress,
}

impl LocalAccount {
    /// Import a 32-byte secp256k1 secret.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the secret is not 32 bytes or is
    /// not a valid scalar (zero or above the curve order).
    pub fn from_secret(secret: &[u8]) -> Result<Self, Error> {
        let key = SigningKey::from_slice(secret)
            .map_err(|_| Error::InvalidInput("invalid secp256k1 secret".into()))?;
        Ok(key.into())
    }

    /// The compressed public key of this account.
    pub fn compact_public_key(&self) -> CompactPublicKey {
        CompactPublicKey::from_verifying_key(self.key.verifying_key())
    }

    /// Sign a 32-byte digest directly, returning `r || s || v` with `v` in
    /// the 27/28 convention.
    ///
    /// # Errors
    ///
    /// Returns [`SignerError::Unavailable`] if the signing primitive fails.
    pub fn sign_digest(&self, digest: &[u8; 32]) -> Result<RecoverableSignature, SignerError> {
        let (signature, recovery_id) = self
            .key
            .sign_prehash_recoverable(digest)
            .map_err(|e| SignerError::Unavailable(e.to_string()))?;
        Ok(RecoverableSignature::from_parts(&signature, recovery_id))
    }
}

impl From<SigningKey> for LocalAccount {
    fn from(key: SigningKey) -> Self {
        let address = EthAddress::from_verifying_key(key.verifying_key());
        Self { key, address }
    }
}

impl Account for LocalAccount {
    fn address(&self) -> EthAddress {
        self.address
    }

    async fn sign_message(&self, message: &[u8]) -> Result<RecoverableSignature, SignerError> {
        self.sign_digest(&personal_message_digest(message))
    }
}

impl TypedDataSigner for LocalAccount {
    async fn sign_typed_data(
        &self,
        document: &StructuredDataDocument,
    ) -> Result<RecoverableSignature, SignerError> {
        self.sign_digest(&document.signing_hash())
    }
}
