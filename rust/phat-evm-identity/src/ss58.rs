//! SS58 address encoding.
//!
//! An SS58 string is `base58(prefix || payload || checksum)` where `prefix`
//! is the network identifier in one or two bytes and `checksum` is a prefix
//! of `blake2b_512("SS58PRE" || prefix || payload)`: one byte for 1, 2, 4 and
//! 8 byte payloads, two bytes for 32 and 33 byte payloads. No other payload
//! length is defined.

use crate::hash::blake2b_512_iter;
use base58::{FromBase58, ToBase58};
use thiserror::Error;

/// Fixed preimage prefix of the SS58 checksum.
const CHECKSUM_PREAMBLE: &[u8] = b"SS58PRE";

/// Identifiers at or above this value do not fit the two-byte form.
const MAX_PREFIX: u16 = 0x3fff;

/// Errors that can occur when constructing a prefix or parsing an SS58
/// string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum Ss58Error {
    /// The network identifier does not fit in 14 bits.
    #[error("network identifier {0} is out of range")]
    PrefixOutOfRange(u16),

    /// Identifiers 46 and 47 are reserved and never used for addresses.
    #[error("network identifier {0} is reserved")]
    ReservedPrefix(u16),

    /// The leading byte does not start a one- or two-byte prefix.
    #[error("invalid prefix byte {0:#04x}")]
    InvalidPrefixByte(u8),

    /// The string contains characters outside the base58 alphabet.
    #[error("invalid base58 encoding")]
    InvalidBase58,

    /// The decoded bytes are too short to hold a prefix, payload and checksum.
    #[error("address is too short")]
    TooShort,

    /// The checksum does not match the prefix and payload.
    #[error("checksum mismatch")]
    InvalidChecksum,

    /// SS58 does not define a payload of this many bytes.
    #[error("no SS58 payload is {0} bytes long")]
    InvalidPayloadLength(usize),

    /// This many bytes after the prefix do not split into a payload and its
    /// checksum.
    #[error("{0} bytes after the prefix do not form a payload and checksum")]
    UnsupportedLength(usize),

    /// The payload is not a 32-byte account id.
    #[error("expected a 32-byte account id, got {0} bytes")]
    InvalidAccountIdLength(usize),
}

/// A validated SS58 network identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ss58Prefix(u16);

impl Ss58Prefix {
    /// Network id 42, the generic Substrate prefix (addresses start with `5`).
    pub const GENERIC_SUBSTRATE: Self = Self(42);

    /// Validate a network identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is above 16383 or is one of the reserved
    /// identifiers 46 and 47.
    pub const fn new(id: u16) -> Result<Self, Ss58Error> {
        match id {
            46 | 47 => Err(Ss58Error::ReservedPrefix(id)),
            id if id > MAX_PREFIX => Err(Ss58Error::PrefixOutOfRange(id)),
            id => Ok(Self(id)),
        }
    }

    /// Get the numeric network identifier.
    pub const fn id(self) -> u16 {
        self.0
    }

    /// Encode into the one-byte (ids below 64) or two-byte form.
    fn to_bytes(self) -> Vec<u8> {
        let id = self.0;
        if id < 64 {
            vec![id as u8]
        } else {
            let first = ((id & 0b0000_0000_1111_1100) as u8 >> 2) | 0b0100_0000;
            let second = ((id >> 8) as u8) | (((id & 0b0000_0000_0000_0011) as u8) << 6);
            vec![first, second]
        }
    }

    /// Decode the prefix at the start of `bytes`, returning it together with
    /// the number of bytes it occupied.
    fn from_bytes(bytes: &[u8]) -> Result<(Self, usize), Ss58Error> {
        match bytes {
            [first @ 0..=63, ..] => Ok((Self::new(*first as u16)?, 1)),
            [first @ 64..=127, second, ..] => {
                let lower = (first << 2) | (second >> 6);
                let upper = second & 0b0011_1111;
                let id = (lower as u16) | ((upper as u16) << 8);
                Ok((Self::new(id)?, 2))
            }
            [first @ 64..=127] => Err(Ss58Error::InvalidPrefixByte(*first)),
            [first, ..] => Err(Ss58Error::InvalidPrefixByte(*first)),
            [] => Err(Ss58Error::TooShort),
        }
    }
}

impl Default for Ss58Prefix {
    fn default() -> Self {
        Self::GENERIC_SUBSTRATE
    }
}

impl TryFrom<u16> for Ss58Prefix {
    type Error = Ss58Error;

    fn try_from(id: u16) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

/// Checksum length for a payload of `payload_len` bytes.
const fn checksum_len(payload_len: usize) -> Option<usize> {
    match payload_len {
        1 | 2 | 4 | 8 => Some(1),
        32 | 33 => Some(2),
        _ => None,
    }
}

fn checksum(prefixed_payload: &[u8]) -> [u8; 64] {
    blake2b_512_iter([CHECKSUM_PREAMBLE, prefixed_payload])
}

/// Encode `payload` for the given network.
///
/// # Errors
///
/// Returns [`Ss58Error::InvalidPayloadLength`] unless the payload is 1, 2,
/// 4, 8, 32 or 33 bytes long.
pub fn encode(prefix: Ss58Prefix, payload: &[u8]) -> Result<String, Ss58Error> {
    let checksum_len = checksum_len(payload.len())
        .ok_or(Ss58Error::InvalidPayloadLength(payload.len()))?;
    Ok(encode_with_checksum(prefix, payload, checksum_len))
}

/// Encode a 32-byte account id, which always takes a two-byte checksum.
pub(crate) fn encode_account_id(prefix: Ss58Prefix, account_id: &[u8; 32]) -> String {
    encode_with_checksum(prefix, account_id, 2)
}

fn encode_with_checksum(prefix: Ss58Prefix, payload: &[u8], checksum_len: usize) -> String {
    let mut bytes = prefix.to_bytes();
    bytes.extend_from_slice(payload);
    let checksum = checksum(&bytes);
    bytes.extend_from_slice(&checksum[..checksum_len]);
    bytes.to_base58()
}

/// Decode an SS58 string into its network prefix and payload, verifying the
/// checksum.
///
/// # Errors
///
/// Returns an error if the string is not base58, the prefix is malformed or
/// reserved, the length does not match a defined payload size, or the
/// checksum does not match.
pub fn decode(address: &str) -> Result<(Ss58Prefix, Vec<u8>), Ss58Error> {
    let bytes = address
        .from_base58()
        .map_err(|_| Ss58Error::InvalidBase58)?;
    let (prefix, prefix_len) = Ss58Prefix::from_bytes(&bytes)?;

    let rest = bytes.len() - prefix_len;
    let checksum_len = match rest {
        0 | 1 => return Err(Ss58Error::TooShort),
        2 | 3 | 5 | 9 => 1,
        34 | 35 => 2,
        other => return Err(Ss58Error::UnsupportedLength(other)),
    };

    let (body, expected) = bytes.split_at(bytes.len() - checksum_len);
    if checksum(body)[..checksum_len] != *expected {
        return Err(Ss58Error::InvalidChecksum);
    }

    Ok((prefix, body[prefix_len..].to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: &str = "d43593c715fdd31c61141abd04a99fd6822c8558854ccde39a5684e7a56da27d";

    fn alice() -> Vec<u8> {
        hex::decode(ALICE).unwrap()
    }

    #[test]
    fn encodes_well_known_generic_substrate_address() {
        assert_eq!(
            encode(Ss58Prefix::GENERIC_SUBSTRATE, &alice()).unwrap(),
            "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY"
        );
    }

    #[test]
    fn encodes_single_byte_zero_prefix() {
        assert_eq!(
            encode(Ss58Prefix::new(0).unwrap(), &alice()).unwrap(),
            "15oF4uVJwmo4TdGW7VfQxNLavjCXviqxT9S1MgbjMNHr6Sp5"
        );
    }

    #[test]
    fn encodes_two_byte_prefix() {
        assert_eq!(
            encode(Ss58Prefix::new(2254).unwrap(), &alice()).unwrap(),
            "stB4S14whneyomiEa22Fu2PzVoibMB7n5PvBFUwafbCbRkC1K"
        );
    }

    #[test]
    fn decode_recovers_prefix_and_payload() {
        let (prefix, payload) =
            decode("stB4S14whneyomiEa22Fu2PzVoibMB7n5PvBFUwafbCbRkC1K").unwrap();
        assert_eq!(prefix.id(), 2254);
        assert_eq!(payload, alice());

        let (prefix, payload) =
            decode("5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY").unwrap();
        assert_eq!(prefix, Ss58Prefix::GENERIC_SUBSTRATE);
        assert_eq!(payload, alice());
    }

    #[test]
    fn decode_rejects_corrupted_checksum() {
        let mut bytes = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY"
            .from_base58()
            .unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        assert_eq!(decode(&bytes.to_base58()), Err(Ss58Error::InvalidChecksum));
    }

    #[test]
    fn decode_rejects_non_base58() {
        assert_eq!(decode("0OIl"), Err(Ss58Error::InvalidBase58));
    }

    #[test]
    fn decode_rejects_truncated_input() {
        assert_eq!(decode(&[42u8, 1].to_base58()), Err(Ss58Error::TooShort));
    }

    #[test]
    fn reserved_and_oversized_prefixes_are_rejected() {
        assert_eq!(Ss58Prefix::new(46), Err(Ss58Error::ReservedPrefix(46)));
        assert_eq!(Ss58Prefix::new(47), Err(Ss58Error::ReservedPrefix(47)));
        assert_eq!(
            Ss58Prefix::new(16384),
            Err(Ss58Error::PrefixOutOfRange(16384))
        );
        assert!(Ss58Prefix::new(16383).is_ok());
    }

    #[test]
    fn short_payloads_take_a_one_byte_checksum() {
        for len in [1usize, 2, 4, 8] {
            let payload: Vec<u8> = (1..=len as u8).collect();
            let encoded = encode(Ss58Prefix::GENERIC_SUBSTRATE, &payload).unwrap();

            let raw = encoded.from_base58().unwrap();
            assert_eq!(raw.len(), 1 + len + 1);
            assert_eq!(raw[1 + len], checksum(&raw[..1 + len])[0]);

            let (prefix, decoded) = decode(&encoded).unwrap();
            assert_eq!(prefix, Ss58Prefix::GENERIC_SUBSTRATE);
            assert_eq!(decoded, payload);
        }
    }

    #[test]
    fn compressed_public_key_payload_takes_a_two_byte_checksum() {
        let payload = [2u8; 33];
        let encoded = encode(Ss58Prefix::new(0).unwrap(), &payload).unwrap();
        assert_eq!(encoded.from_base58().unwrap().len(), 1 + 33 + 2);
        assert_eq!(decode(&encoded).unwrap().1, payload);
    }

    #[test]
    fn undefined_payload_lengths_are_rejected() {
        assert_eq!(
            encode(Ss58Prefix::GENERIC_SUBSTRATE, &[1u8; 20]),
            Err(Ss58Error::InvalidPayloadLength(20))
        );
        assert_eq!(
            encode(Ss58Prefix::GENERIC_SUBSTRATE, &[]),
            Err(Ss58Error::InvalidPayloadLength(0))
        );

        let mut raw = vec![42u8];
        raw.extend_from_slice(&[1u8; 22]);
        assert_eq!(decode(&raw.to_base58()), Err(Ss58Error::UnsupportedLength(22)));
    }
}
