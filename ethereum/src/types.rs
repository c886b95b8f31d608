// SPDX-FileCopyrightText: 2023 Nomadic Labs <contact@nomadic-labs.com>
//
// SPDX-License-Identifier: MIT

//! Fixed-width values: addresses, hashes and block numbers.
//!
//! Addresses and hashes are the `primitive_types` `H160` / `H256`; this
//! module adds the checked constructors and the textual forms used at the
//! boundary of the library.

use std::fmt;
use std::str::FromStr;

use primitive_types::{H160, H256, U256};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;
use crate::keccak::keccak256_bytes;

pub const ADDRESS_SIZE: usize = 20;
pub const HASH_SIZE: usize = 32;

pub type Address = H160;
pub type Hash = H256;

pub(crate) fn strip_0x(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// Decodes a hex string, with or without `0x`, odd lengths allowed.
pub fn decode_hex(s: &str) -> Result<Vec<u8>, Error> {
    let s = strip_0x(s);
    if s.len() % 2 == 1 {
        Ok(hex::decode(format!("0{s}"))?)
    } else {
        Ok(hex::decode(s)?)
    }
}

pub fn address_from_slice(bytes: &[u8]) -> Result<H160, Error> {
    if bytes.len() != ADDRESS_SIZE {
        return Err(Error::InvalidLength {
            expected: ADDRESS_SIZE,
            actual: bytes.len(),
        });
    }
    Ok(H160::from_slice(bytes))
}

pub fn address_from_hex(s: &str) -> Result<H160, Error> {
    address_from_slice(&decode_hex(s)?)
}

/// Hashes shorter than 32 bytes are left-padded with zeros.
pub fn hash_from_slice(bytes: &[u8]) -> Result<H256, Error> {
    if bytes.len() > HASH_SIZE {
        return Err(Error::InvalidLength {
            expected: HASH_SIZE,
            actual: bytes.len(),
        });
    }
    let mut full = [0u8; HASH_SIZE];
    full[HASH_SIZE - bytes.len()..].copy_from_slice(bytes);
    Ok(H256(full))
}

pub fn hash_from_hex(s: &str) -> Result<H256, Error> {
    hash_from_slice(&decode_hex(s)?)
}

pub fn hash_from_u256(value: U256) -> H256 {
    let mut bytes = [0u8; HASH_SIZE];
    value.to_big_endian(&mut bytes);
    H256(bytes)
}

/// Negative values are stored as their two's complement over 256 bits.
pub fn hash_from_i128(value: i128) -> H256 {
    let fill = if value < 0 { 0xff } else { 0x00 };
    let mut bytes = [fill; HASH_SIZE];
    bytes[HASH_SIZE - 16..].copy_from_slice(&value.to_be_bytes());
    H256(bytes)
}

/// `0x` followed by the lowercase hex of the fixed bytes.
pub fn to_hex_string(bytes: impl AsRef<[u8]>) -> String {
    format!("0x{}", hex::encode(bytes.as_ref()))
}

/// EIP-55 mixed-case checksum encoding of an address.
pub fn to_checksum(address: &H160) -> String {
    let lower = hex::encode(address.as_bytes());
    let digest = keccak256_bytes(lower.as_bytes());
    let mut out = String::with_capacity(2 + 2 * ADDRESS_SIZE);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let byte = digest.as_bytes()[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
        if nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Parses an address, validating the EIP-55 checksum when the input is
/// mixed case. All-lowercase and all-uppercase inputs carry no checksum.
pub fn parse_checksummed(s: &str) -> Result<H160, Error> {
    let address = address_from_hex(s)?;
    let digits = strip_0x(s);
    let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper && strip_0x(&to_checksum(&address)) != digits {
        return Err(Error::InvalidEncodingMsg("invalid EIP-55 checksum"));
    }
    Ok(address)
}

/// Largest block number representable on the JSON boundary.
pub const MAX_BLOCK_NUMBER: u64 = i64::MAX as u64;

/// Block selector used by the RPC boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockNumber {
    Number(u64),
    Earliest,
    Latest,
    Pending,
}

impl BlockNumber {
    pub fn number(n: u64) -> Result<Self, Error> {
        if n > MAX_BLOCK_NUMBER {
            Err(Error::InvalidEncodingMsg("block number exceeds 2^63 - 1"))
        } else {
            Ok(BlockNumber::Number(n))
        }
    }
}

impl fmt::Display for BlockNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockNumber::Number(n) => write!(f, "{n:#x}"),
            BlockNumber::Earliest => write!(f, "earliest"),
            BlockNumber::Latest => write!(f, "latest"),
            BlockNumber::Pending => write!(f, "pending"),
        }
    }
}

impl FromStr for BlockNumber {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "earliest" => Ok(BlockNumber::Earliest),
            "latest" => Ok(BlockNumber::Latest),
            "pending" => Ok(BlockNumber::Pending),
            _ => {
                let digits = s
                    .strip_prefix("0x")
                    .ok_or(Error::InvalidEncodingMsg("block number is missing '0x'"))?;
                let n = u64::from_str_radix(digits, 16)
                    .map_err(|_| Error::InvalidEncodingMsg("invalid block number"))?;
                BlockNumber::number(n)
            }
        }
    }
}

impl Serialize for BlockNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for BlockNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: String = Deserialize::deserialize(deserializer)?;
        value.parse().map_err(de::Error::custom)
    }
}
