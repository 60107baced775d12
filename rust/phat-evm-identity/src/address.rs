//! Substrate addresses for Ethereum accounts.
//!
//! The account id is `blake2b_256` of the 33-byte compressed public key
//! recovered by [`crate::recovery`], which is how Substrate derives account
//! ids for ECDSA keys. It is SS58-encoded with the configured network prefix.

use crate::{
    account::Account,
    constants::{ProtocolConstants, V1},
    error::Result,
    hash::blake2b_256,
    recovery::{CompactPublicKey, PublicKeyRecoverer},
    ss58::{self, Ss58Error, Ss58Prefix},
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

/// A 32-byte Substrate account id together with the network it is encoded
/// for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubstrateAddress {
    prefix: Ss58Prefix,
    account_id: [u8; 32],
}

impl SubstrateAddress {
    /// Pair an account id with a network prefix.
    pub const fn new(prefix: Ss58Prefix, account_id: [u8; 32]) -> Self {
        Self { prefix, account_id }
    }

    /// Derive the address owning `public_key` on the network `prefix`.
    pub fn from_public_key(public_key: &CompactPublicKey, prefix: Ss58Prefix) -> Self {
        Self::new(prefix, blake2b_256(public_key.as_bytes()))
    }

    /// The raw account id.
    pub const fn account_id(&self) -> &[u8; 32] {
        &self.account_id
    }

    /// The network this address is encoded for.
    pub const fn prefix(&self) -> Ss58Prefix {
        self.prefix
    }
}

impl fmt::Display for SubstrateAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&ss58::encode_account_id(self.prefix, &self.account_id))
    }
}

impl FromStr for SubstrateAddress {
    type Err = Ss58Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, payload) = ss58::decode(s)?;
        let account_id = payload
            .as_slice()
            .try_into()
            .map_err(|_| Ss58Error::InvalidAccountIdLength(payload.len()))?;
        Ok(Self::new(prefix, account_id))
    }
}

impl Serialize for SubstrateAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SubstrateAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        encoded.parse().map_err(serde::de::Error::custom)
    }
}

/// Derives Substrate addresses for Ethereum accounts.
#[derive(Debug, Clone, Copy)]
pub struct AddressTranslator {
    recoverer: PublicKeyRecoverer,
    prefix: Ss58Prefix,
}

impl Default for AddressTranslator {
    fn default() -> Self {
        Self::new(&V1)
    }
}

impl AddressTranslator {
    /// Create a translator over the given constant table, encoding for the
    /// network named there.
    pub const fn new(constants: &'static ProtocolConstants) -> Self {
        Self {
            recoverer: PublicKeyRecoverer::new(constants),
            prefix: constants.network_prefix,
        }
    }

    /// Encode for `prefix` instead of the table's network.
    pub const fn with_prefix(self, prefix: Ss58Prefix) -> Self {
        Self { prefix, ..self }
    }

    /// Derive the Substrate address of `account`.
    ///
    /// Triggers exactly one signing prompt. Repeated calls for the same
    /// account return the same address, but nothing is cached: each call
    /// prompts again.
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`PublicKeyRecoverer::recover`] unchanged.
    pub async fn derive<A: Account>(&self, account: &A) -> Result<SubstrateAddress> {
        let public_key = self.recoverer.recover(account).await?;
        let address = SubstrateAddress::from_public_key(&public_key, self.prefix);
        tracing::debug!(account = %account.address(), %address, "derived substrate address");
        Ok(address)
    }
}

/// Derive the Substrate address of `account` with the current constant
/// table.
///
/// # Errors
///
/// See [`AddressTranslator::derive`].
pub async fn derive_substrate_address<A: Account>(account: &A) -> Result<SubstrateAddress> {
    AddressTranslator::default().derive(account).await
}
