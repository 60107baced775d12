//! Digest helpers shared by recovery, address encoding and typed-data hashing.

use blake2::{Blake2b, Blake2b512, digest::consts::U32};
use sha3::{Digest, Keccak256};

type Blake2b256 = Blake2b<U32>;

/// The size of a keccak-256 or blake2b-256 digest in bytes.
pub const HASH_256_SIZE: usize = 32;

/// Computes the keccak-256 digest (the pre-standard SHA-3 padding used by
/// Ethereum) of the given bytes.
pub fn keccak256(bytes: &[u8]) -> [u8; HASH_256_SIZE] {
    Keccak256::digest(bytes).into()
}

/// Computes keccak-256 over several chunks as if they were concatenated.
pub fn keccak256_iter<'a, I>(chunks: I) -> [u8; HASH_256_SIZE]
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut hasher = Keccak256::new();
    for chunk in chunks {
        hasher.update(chunk);
    }
    hasher.finalize().into()
}

/// Computes the 32-byte blake2b digest of the given bytes.
pub fn blake2b_256(bytes: &[u8]) -> [u8; HASH_256_SIZE] {
    Blake2b256::digest(bytes).into()
}

/// Computes the 64-byte blake2b digest over several chunks as if they were
/// concatenated.
pub fn blake2b_512_iter<'a, I>(chunks: I) -> [u8; 64]
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut hasher = Blake2b512::new();
    for chunk in chunks {
        hasher.update(chunk);
    }
    let mut out = [0u8; 64];
    out.copy_from_slice(&hasher.finalize());
    out
}
