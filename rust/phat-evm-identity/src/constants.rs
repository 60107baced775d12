//! Frozen protocol constants.
//!
//! Every derived address and every signed document depends on these bytes.
//! Changing any of them silently changes the Substrate address of every
//! existing account and invalidates every outstanding certificate, so they
//! are grouped into a versioned table instead of being inlined at their use
//! sites. A new table (with a new domain salt or version) is the only
//! supported way to evolve them.

use crate::{hash::keccak256_iter, ss58::Ss58Prefix};
use serde::{Serialize, Serializer};
use std::fmt;

/// A fixed 32-byte value placed in the `salt` field of every EIP-712 domain
/// produced by this crate.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DomainSalt([u8; 32]);

impl DomainSalt {
    /// Wrap raw salt bytes.
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw salt bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for DomainSalt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for DomainSalt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DomainSalt({self})")
    }
}

impl Serialize for DomainSalt {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// One version of the constant table shared by recovery, address encoding
/// and document construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolConstants {
    /// Version of this table.
    pub version: u32,

    /// Message signed only to obtain a recoverable signature. It carries no
    /// intent and must never be presented as a meaningful authorization.
    pub probe_message: &'static [u8],

    /// Prefix of the Ethereum "personal sign" scheme. The decimal byte length
    /// of the message follows it, then the message itself.
    pub personal_message_prefix: &'static [u8],

    /// ASCII string whose keccak-256 digest is [`Self::domain_salt`].
    pub domain_salt_preimage: &'static str,

    /// `keccak256(domain_salt_preimage)`, recorded literally.
    pub domain_salt: DomainSalt,

    /// SS58 network identifier used for derived addresses.
    pub network_prefix: Ss58Prefix,

    /// `version` field of every EIP-712 domain.
    pub domain_version: &'static str,

    /// Domain name of the certificate issuance document.
    pub certificate_domain_name: &'static str,

    /// Domain name of the contract query document.
    pub query_domain_name: &'static str,

    /// Fixed `description` of the certificate issuance document.
    pub certificate_description: &'static str,

    /// Fixed `description` of the contract query document.
    pub query_description: &'static str,

    /// Text preceding the block height in `timeToLive`.
    pub time_to_live_prefix: &'static str,

    /// Text following the block height in `timeToLive`.
    pub time_to_live_suffix: &'static str,
}

/// The constant table every current deployment uses.
pub const V1: ProtocolConstants = ProtocolConstants {
    version: 1,
    probe_message: b"Hello",
    personal_message_prefix: b"\x19Ethereum Signed Message:\n",
    domain_salt_preimage: "phala/phat-contract",
    domain_salt: DomainSalt::new([
        0x0e, 0xa8, 0x13, 0xd1, 0x59, 0x25, 0x26, 0xd6, 0x72, 0xea, 0x25, 0x76, 0xd7, 0xa0, 0x79,
        0x14, 0xce, 0xf2, 0xca, 0x30, 0x1b, 0x35, 0xc5, 0xee, 0xd9, 0x41, 0xf7, 0xc8, 0x97, 0x51,
        0x2a, 0x00,
    ]),
    network_prefix: Ss58Prefix::GENERIC_SUBSTRATE,
    domain_version: "1",
    certificate_domain_name: "Phat Query Certificate",
    query_domain_name: "Phat Contract Query",
    certificate_description: "You are signing a Certificate that can be used to query Phat Contracts using your identity without further prompts.",
    query_description: "You are signing a query request that would be sent to a Phat Contract.",
    time_to_live_prefix: "The Certificate will be valid till block ",
    time_to_live_suffix: ".",
};

impl ProtocolConstants {
    /// Digest an arbitrary message with the Ethereum personal-sign scheme:
    /// `keccak256(prefix || decimal(len(message)) || message)`.
    ///
    /// This must match what the external signer computes internally.
    /// A mismatch does not fail; recovery just yields an unrelated key.
    pub fn personal_message_digest(&self, message: &[u8]) -> [u8; 32] {
        let length = message.len().to_string();
        keccak256_iter([
            self.personal_message_prefix,
            length.as_bytes(),
            message,
        ])
    }

    /// Render a block height into the certificate's `timeToLive` sentence.
    ///
    /// The height is printed as a plain decimal integer. It is not range
    /// checked; zero and negative heights are rendered as given.
    pub fn render_time_to_live(&self, block_height: i64) -> String {
        format!(
            "{}{block_height}{}",
            self.time_to_live_prefix, self.time_to_live_suffix
        )
    }
}
