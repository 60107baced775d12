//! EIP-712 document model.
//!
//! The field tables in this module are a wire contract: any verifier that
//! recomputes the typed-data hash rebuilds exactly these type strings, in
//! exactly this order. Serialization and hashing both read the same tables so
//! they cannot drift apart.

use super::encode;
use crate::{account::EthAddress, bytes::HexBytes, constants::DomainSalt};
use serde::{Serialize, Serializer, ser::SerializeMap};

/// Solidity types used by the documents in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Dynamic UTF-8 string, hashed as `keccak256(bytes)`.
    String,
    /// Dynamic byte string, hashed as `keccak256(bytes)`.
    Bytes,
    /// Fixed 32-byte value, encoded as-is.
    Bytes32,
}

impl FieldType {
    /// The Solidity spelling of this type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Bytes32 => "bytes32",
        }
    }
}

/// A `{ name, type }` member of a struct type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TypedField {
    /// Member name.
    pub name: &'static str,
    /// Member type.
    #[serde(rename = "type")]
    pub kind: FieldType,
}

const fn field(name: &'static str, kind: FieldType) -> TypedField {
    TypedField { name, kind }
}

/// Name of the domain struct type.
pub const EIP712_DOMAIN: &str = "EIP712Domain";

/// Members of `EIP712Domain`, in order.
pub const EIP712_DOMAIN_FIELDS: &[TypedField] = &[
    field("name", FieldType::String),
    field("version", FieldType::String),
    field("salt", FieldType::Bytes32),
];

/// Members of `IssueQueryCertificate`, in order.
pub const CERTIFICATE_FIELDS: &[TypedField] = &[
    field("description", FieldType::String),
    field("timeToLive", FieldType::String),
    field("encodedCert", FieldType::Bytes),
];

/// Members of `PhatContractQuery`, in order.
pub const QUERY_FIELDS: &[TypedField] = &[
    field("description", FieldType::String),
    field("encodedQuery", FieldType::Bytes),
];

/// The two document variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// Authorizes issuing a query certificate.
    CertificateIssuance,
    /// Authorizes a single contract query.
    ContractQuery,
}

impl DocumentKind {
    /// The EIP-712 `primaryType` of this variant.
    pub const fn primary_type(self) -> &'static str {
        match self {
            Self::CertificateIssuance => "IssueQueryCertificate",
            Self::ContractQuery => "PhatContractQuery",
        }
    }

    /// Members of the message struct of this variant, in order.
    pub const fn fields(self) -> &'static [TypedField] {
        match self {
            Self::CertificateIssuance => CERTIFICATE_FIELDS,
            Self::ContractQuery => QUERY_FIELDS,
        }
    }
}

/// A value bound to a [`TypedField`] for hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// A `string` value.
    String(&'a str),
    /// A `bytes` value.
    Bytes(&'a [u8]),
    /// A `bytes32` value.
    Bytes32(&'a [u8; 32]),
}

impl FieldValue<'_> {
    /// The type this value encodes as.
    pub const fn kind(&self) -> FieldType {
        match self {
            Self::String(_) => FieldType::String,
            Self::Bytes(_) => FieldType::Bytes,
            Self::Bytes32(_) => FieldType::Bytes32,
        }
    }
}

/// The `domain` record of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Domain {
    /// Human-readable name of the signing domain.
    pub name: &'static str,
    /// Version of the signing domain.
    pub version: &'static str,
    /// Fixed domain salt.
    pub salt: DomainSalt,
}

impl Domain {
    /// Values in `EIP712Domain` member order.
    pub fn values(&self) -> [FieldValue<'_>; 3] {
        [
            FieldValue::String(self.name),
            FieldValue::String(self.version),
            FieldValue::Bytes32(self.salt.as_bytes()),
        ]
    }
}

/// Message of a certificate issuance document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateIssuance {
    /// Fixed description of what is being authorized.
    pub description: &'static str,
    /// Sentence naming the block height the certificate expires at.
    pub time_to_live: String,
    /// The encoded certificate being signed.
    pub encoded_cert: HexBytes,
}

/// Message of a contract query document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractQuery {
    /// Fixed description of what is being authorized.
    pub description: &'static str,
    /// The encoded query being signed.
    pub encoded_query: HexBytes,
}

/// The `message` record of a document, tagged by variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Message {
    /// See [`DocumentKind::CertificateIssuance`].
    CertificateIssuance(CertificateIssuance),
    /// See [`DocumentKind::ContractQuery`].
    ContractQuery(ContractQuery),
}

impl Message {
    /// The variant of this message.
    pub const fn kind(&self) -> DocumentKind {
        match self {
            Self::CertificateIssuance(_) => DocumentKind::CertificateIssuance,
            Self::ContractQuery(_) => DocumentKind::ContractQuery,
        }
    }

    /// The fixed description.
    pub const fn description(&self) -> &'static str {
        match self {
            Self::CertificateIssuance(message) => message.description,
            Self::ContractQuery(message) => message.description,
        }
    }

    /// The opaque payload being authorized (certificate or query).
    pub fn encoded_payload(&self) -> &[u8] {
        match self {
            Self::CertificateIssuance(message) => message.encoded_cert.as_slice(),
            Self::ContractQuery(message) => message.encoded_query.as_slice(),
        }
    }

    /// The `timeToLive` sentence, for certificate documents.
    pub fn time_to_live(&self) -> Option<&str> {
        match self {
            Self::CertificateIssuance(message) => Some(message.time_to_live.as_str()),
            Self::ContractQuery(_) => None,
        }
    }

    /// Values in the member order of [`DocumentKind::fields`].
    pub fn values(&self) -> Vec<FieldValue<'_>> {
        match self {
            Self::CertificateIssuance(message) => vec![
                FieldValue::String(message.description),
                FieldValue::String(message.time_to_live.as_str()),
                FieldValue::Bytes(message.encoded_cert.as_slice()),
            ],
            Self::ContractQuery(message) => vec![
                FieldValue::String(message.description),
                FieldValue::Bytes(message.encoded_query.as_slice()),
            ],
        }
    }
}

/// The `types` record: `EIP712Domain` first, then the primary type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Types(DocumentKind);

impl Serialize for Types {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(EIP712_DOMAIN, EIP712_DOMAIN_FIELDS)?;
        map.serialize_entry(self.0.primary_type(), self.0.fields())?;
        map.end()
    }
}

/// A complete typed-data document, ready to hand to a wallet.
///
/// Serializes to the `eth_signTypedData_v4` shape with keys in the order
/// `domain, primaryType, types, message, account`. For given inputs the
/// serialized bytes are always identical.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredDataDocument {
    domain: Domain,
    primary_type: &'static str,
    types: Types,
    message: Message,
    account: EthAddress,
}

impl StructuredDataDocument {
    pub(crate) fn new(domain: Domain, message: Message, account: EthAddress) -> Self {
        let kind = message.kind();
        Self {
            domain,
            primary_type: kind.primary_type(),
            types: Types(kind),
            message,
            account,
        }
    }

    /// The variant of this document.
    pub const fn kind(&self) -> DocumentKind {
        self.message.kind()
    }

    /// The `domain` record.
    pub const fn domain(&self) -> &Domain {
        &self.domain
    }

    /// The EIP-712 `primaryType`.
    pub const fn primary_type(&self) -> &'static str {
        self.primary_type
    }

    /// The `message` record.
    pub const fn message(&self) -> &Message {
        &self.message
    }

    /// The account expected to sign this document.
    pub const fn account(&self) -> EthAddress {
        self.account
    }

    /// The EIP-712 domain separator, `hashStruct(domain)`.
    pub fn domain_separator(&self) -> [u8; 32] {
        encode::hash_struct(EIP712_DOMAIN, EIP712_DOMAIN_FIELDS, &self.domain.values())
    }

    /// `hashStruct(message)` for the primary type.
    pub fn message_hash(&self) -> [u8; 32] {
        let kind = self.kind();
        encode::hash_struct(kind.primary_type(), kind.fields(), &self.message.values())
    }

    /// The digest a wallet signs for this document:
    /// `keccak256(0x19 0x01 || domainSeparator || hashStruct(message))`.
    pub fn signing_hash(&self) -> [u8; 32] {
        encode::signing_hash(&self.domain_separator(), &self.message_hash())
    }
}
