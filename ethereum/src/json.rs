// SPDX-FileCopyrightText: 2024 Nomadic Labs <contact@nomadic-labs.com>
//
// SPDX-License-Identifier: MIT

//! Serde adapters for the JSON-RPC conventions.
//!
//! `U256`, `H160` and `H256` already serialize as `0x` hex through
//! `primitive_types`; byte strings and signed quantities need the
//! adapters below.

use serde::{de, Deserialize, Deserializer, Serializer};

/// `Vec<u8>` as a `0x` prefixed lowercase hex string.
pub mod bytes_hex {
    use super::*;

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: String = Deserialize::deserialize(deserializer)?;
        if let Some(digits) = value.strip_prefix("0x") {
            hex::decode(digits).map_err(de::Error::custom)
        } else {
            Err(de::Error::custom("Hex string is missing '0x' prefix"))
        }
    }
}

/// Signed quantity: `0x` hex without leading zeros, negatives as `-0x..`.
pub mod i128_quantity {
    use super::*;

    pub fn to_string(value: i128) -> String {
        if value < 0 {
            format!("-{:#x}", value.unsigned_abs())
        } else {
            format!("{value:#x}")
        }
    }

    pub fn from_str(s: &str) -> Result<i128, String> {
        let (negative, rest) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let digits = rest
            .strip_prefix("0x")
            .ok_or_else(|| format!("quantity {s} is missing '0x' prefix"))?;
        if digits.is_empty() || (digits.len() > 1 && digits.starts_with('0')) {
            return Err(format!("quantity {s} is not canonical"));
        }
        let magnitude = u128::from_str_radix(digits, 16).map_err(|e| e.to_string())?;
        if negative {
            0i128
                .checked_sub_unsigned(magnitude)
                .ok_or_else(|| format!("quantity {s} is out of range"))
        } else {
            i128::try_from(magnitude).map_err(|e| e.to_string())
        }
    }

    pub fn serialize<S>(value: &i128, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&to_string(*value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i128, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: String = Deserialize::deserialize(deserializer)?;
        from_str(&value).map_err(de::Error::custom)
    }
}
