// SPDX-FileCopyrightText: 2024 Nomadic Labs <contact@nomadic-labs.com>
//
// SPDX-License-Identifier: MIT

//! JSON representation of a version 3 keystore.
//!
//! Only (de)serialization lives here. Algorithm names are kept as
//! strings so that an unknown kdf or cipher is reported as unsupported
//! rather than as malformed JSON.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Bytes as lowercase hex without `0x`.
#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexBytes(Vec<u8>);

impl HexBytes {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for HexBytes {
    fn from(vec: Vec<u8>) -> Self {
        Self(vec)
    }
}

impl From<&[u8]> for HexBytes {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<HexBytes> for String {
    fn from(bytes: HexBytes) -> Self {
        hex::encode(bytes.0)
    }
}

impl TryFrom<String> for HexBytes {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let s = s.strip_prefix("0x").unwrap_or(&s);
        hex::decode(s)
            .map(Self)
            .map_err(|e| format!("Invalid hex: {e}"))
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct JsonKeystore {
    /// 20 byte address, hex without `0x`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<HexBytes>,
    pub crypto: CryptoJson,
    /// Not required to read a keystore; always written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub version: u32,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct CryptoJson {
    pub cipher: String,
    pub cipherparams: CipherParams,
    pub ciphertext: HexBytes,
    pub kdf: String,
    pub kdfparams: KdfParams,
    pub mac: HexBytes,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct CipherParams {
    pub iv: HexBytes,
}

/// Union of the scrypt (`n`, `r`, `p`) and PBKDF2 (`c`, `prf`) parameters.
#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize, Deserialize)]
pub struct KdfParams {
    pub dklen: u32,
    pub salt: HexBytes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prf: Option<String>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_hex_bytes() {
        let bytes: HexBytes = serde_json::from_str(r#""0aFF""#).unwrap();
        assert_eq!(&[0x0a, 0xff], bytes.as_bytes());
        assert_eq!(r#""0aff""#, serde_json::to_string(&bytes).unwrap());
        let prefixed: HexBytes = serde_json::from_str(r#""0x0aff""#).unwrap();
        assert_eq!(bytes, prefixed);
        assert!(serde_json::from_str::<HexBytes>(r#""0g""#).is_err());
    }

    #[test]
    fn test_kdf_params_skip_absent() {
        let params = KdfParams {
            dklen: 32,
            salt: vec![1, 2].into(),
            c: Some(10),
            prf: Some("hmac-sha256".to_string()),
            ..KdfParams::default()
        };
        assert_eq!(
            r#"{"dklen":32,"salt":"0102","c":10,"prf":"hmac-sha256"}"#,
            serde_json::to_string(&params).unwrap()
        );
    }
}
