//! EIP-712 encoding for flat structs of `string`, `bytes` and `bytes32`
//! members, which is all the documents in this crate use.

use super::document::{FieldValue, TypedField};
use crate::hash::{keccak256, keccak256_iter};

/// `encodeType`: `Name(type1 name1,type2 name2,...)`.
pub fn encode_type(name: &str, fields: &[TypedField]) -> String {
    let members: Vec<String> = fields
        .iter()
        .map(|field| format!("{} {}", field.kind.as_str(), field.name))
        .collect();
    format!("{name}({})", members.join(","))
}

/// `typeHash`: `keccak256(encodeType(...))`.
pub fn type_hash(name: &str, fields: &[TypedField]) -> [u8; 32] {
    keccak256(encode_type(name, fields).as_bytes())
}

/// Encode one member value into its 32-byte slot.
fn encode_value(value: &FieldValue<'_>) -> [u8; 32] {
    match value {
        FieldValue::String(s) => keccak256(s.as_bytes()),
        FieldValue::Bytes(bytes) => keccak256(bytes),
        FieldValue::Bytes32(bytes) => **bytes,
    }
}

/// `hashStruct`: `keccak256(typeHash || encodeData(values))`.
///
/// `values` must line up with `fields` one to one; the document model
/// guarantees this by producing both from the same variant.
pub fn hash_struct(name: &str, fields: &[TypedField], values: &[FieldValue<'_>]) -> [u8; 32] {
    debug_assert_eq!(fields.len(), values.len());
    debug_assert!(
        fields
            .iter()
            .zip(values)
            .all(|(field, value)| field.kind == value.kind())
    );

    let type_hash = type_hash(name, fields);
    let slots: Vec<[u8; 32]> = values.iter().map(encode_value).collect();
    let mut chunks: Vec<&[u8]> = vec![type_hash.as_slice()];
    chunks.extend(slots.iter().map(|slot| slot.as_slice()));
    keccak256_iter(chunks)
}

/// The final digest: `keccak256(0x19 0x01 || domainSeparator || messageHash)`.
pub fn signing_hash(domain_separator: &[u8; 32], message_hash: &[u8; 32]) -> [u8; 32] {
    keccak256_iter([
        [0x19u8, 0x01].as_slice(),
        domain_separator.as_slice(),
        message_hash.as_slice(),
    ])
}
