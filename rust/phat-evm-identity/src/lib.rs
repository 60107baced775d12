#![warn(missing_docs)]

//! Substrate identities and Phat typed-data documents for Ethereum signers.
//!
//! Holders of an Ethereum-compatible signing capability have no native
//! Substrate key. This crate lets them take part anyway:
//!
//! - [`recovery`] drives an [`Account`] to sign a fixed probe message and
//!   recovers its compressed secp256k1 public key from the signature.
//! - [`address`] hashes that key with blake2b-256 and encodes it as an SS58
//!   address (network id 42 by default).
//! - [`typed_data`] builds the two EIP-712 documents a wallet signs to issue a
//!   query certificate or to submit a contract query.
//!
//! All byte constants these flows depend on live in the versioned
//! [`ProtocolConstants`] table.
//!
//! ```ignore
//! use phat_evm_identity::{build_query_document, derive_substrate_address, request_signature};
//!
//! let address = derive_substrate_address(&account).await?;
//! let document = build_query_document(&account, "0xabc123")?;
//! let signature = request_signature(&account, &document).await?;
//! ```

pub mod account;
pub mod address;
pub mod bytes;
pub mod constants;
pub mod error;
pub mod hash;
pub mod recovery;
pub mod ss58;
pub mod typed_data;

mod sync;
pub use sync::*;

#[cfg(any(test, feature = "helpers"))]
pub mod helpers;

pub use account::{Account, EthAddress, EthAddressError, RecoverableSignature, TypedDataSigner};
pub use address::{AddressTranslator, SubstrateAddress, derive_substrate_address};
pub use bytes::HexBytes;
pub use constants::{DomainSalt, ProtocolConstants, V1};
pub use error::{Error, RecoveryError, Result, SignerError};
pub use recovery::{
    CompactPublicKey, PublicKeyRecoverer, personal_message_digest, recover_compact_public_key,
};
pub use ss58::{Ss58Error, Ss58Prefix};
pub use typed_data::{
    DocumentKind, StructuredDataDocument, StructuredMessageFactory, build_certificate_document,
    build_query_document, request_signature,
};
