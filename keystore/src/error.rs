// SPDX-FileCopyrightText: 2024 Nomadic Labs <contact@nomadic-labs.com>
//
// SPDX-License-Identifier: MIT

use primitive_types::H160;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid passphrase")]
    InvalidPassphrase,

    #[error("Keystore address is {expected:?} but the key is for {found:?}")]
    AddressMismatch { expected: H160, found: H160 },

    #[error("No keystore for {0:?}")]
    KeyNotFound(H160),

    #[error("Keystore has no address")]
    MissingAddress,

    #[error("Unsupported keystore version {0}")]
    UnsupportedVersion(u32),

    #[error("Unsupported kdf {0}")]
    UnsupportedKdf(String),

    #[error("Unsupported cipher {0}")]
    UnsupportedCipher(String),

    #[error("Unsupported prf {0}")]
    UnsupportedPrf(String),

    #[error("Invalid kdf parameters: {0}")]
    InvalidKdfParams(&'static str),

    #[error("Invalid {field} length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid keystore JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Crypto error: {0}")]
    InternalCryptoError(&'static str),

    #[error(transparent)]
    Signer(#[from] ethereum_signer::Error),
}
