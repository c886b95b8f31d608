// SPDX-FileCopyrightText: 2024 TriliTech <contact@trili.tech>
//
// SPDX-License-Identifier: MIT

//! Keccak-256 digest, EVM flavour (original Keccak padding, not SHA3-256).

use primitive_types::H256;
use sha3::{Digest, Keccak256};

/// Keccak-256 over several byte segments, fed in order.
///
/// Equivalent to hashing the concatenation of all the parts.
pub fn keccak256<I, T>(parts: I) -> H256
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part.as_ref());
    }
    let digest: [u8; 32] = hasher.finalize().into();
    H256(digest)
}

/// Keccak-256 of a single byte slice.
pub fn keccak256_bytes(data: &[u8]) -> H256 {
    keccak256([data])
}
