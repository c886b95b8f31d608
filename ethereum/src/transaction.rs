// SPDX-FileCopyrightText: 2023 Nomadic Labs <contact@nomadic-labs.com>
//
// SPDX-License-Identifier: MIT

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// EIP-2718 envelope type.
#[derive(Debug, PartialEq, Clone, Copy, Eq, Default)]
pub enum TransactionType {
    #[default]
    Legacy,
    /// EIP-2930
    AccessList,
    /// EIP-1559
    DynamicFee,
}

impl TransactionType {
    pub fn is_typed(&self) -> bool {
        !matches!(self, TransactionType::Legacy)
    }
}

impl TryFrom<u8> for TransactionType {
    type Error = Error;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(Self::Legacy),
            1 => Ok(Self::AccessList),
            2 => Ok(Self::DynamicFee),
            v => Err(Error::UnsupportedTransactionType(v)),
        }
    }
}

impl From<TransactionType> for u8 {
    fn from(v: TransactionType) -> Self {
        match v {
            TransactionType::Legacy => 0u8,
            TransactionType::AccessList => 1u8,
            TransactionType::DynamicFee => 2u8,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Legacy => write!(f, "legacy"),
            TransactionType::AccessList => write!(f, "access-list"),
            TransactionType::DynamicFee => write!(f, "dynamic-fee"),
        }
    }
}

// JSON renders the type as a quantity, e.g. "0x2".
impl Serialize for TransactionType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{:#x}", u8::from(*self)))
    }
}

impl<'de> Deserialize<'de> for TransactionType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: String = Deserialize::deserialize(deserializer)?;
        let digits = value
            .strip_prefix("0x")
            .ok_or_else(|| de::Error::custom("transaction type is missing '0x'"))?;
        let tag = u8::from_str_radix(digits, 16).map_err(de::Error::custom)?;
        TransactionType::try_from(tag).map_err(de::Error::custom)
    }
}
