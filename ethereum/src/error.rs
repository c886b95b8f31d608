// SPDX-FileCopyrightText: 2023 Nomadic Labs <contact@nomadic-labs.com>
//
// SPDX-License-Identifier: MIT

use hex::FromHexError;
use primitive_types::{H160, U256};
use rlp::DecoderError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Clone)]
pub enum Error {
    #[error("Error decoding RLP encoded byte array: {0}")]
    InvalidEncoding(#[from] DecoderError),

    #[error("Invalid encoding: {0}")]
    InvalidEncodingMsg(&'static str),

    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Error reading a hex string: {0}")]
    InvalidHex(#[from] FromHexError),

    #[error("Invalid signature component: {0}")]
    InvalidSignatureComponent(&'static str),

    #[error("Unsupported transaction type: {0:#04x}")]
    UnsupportedTransactionType(u8),

    #[error("Transaction doesn't have a signature")]
    MissingSignature,

    #[error("Chain id mismatch: transaction has {expected}, signature encodes {found}")]
    ChainIdMismatch { expected: U256, found: U256 },

    #[error("Invalid signer: transaction is from {expected:?}, key is {found:?}")]
    InvalidSigner { expected: H160, found: H160 },

    #[error("Invalid secret key")]
    InvalidSecretKey,

    #[error("Couldn't recover a public key from the signature")]
    RecoveryFailed,

    #[error("Error manipulating ECDSA key: {0}")]
    InternalCryptoError(libsecp256k1::Error),
}

impl Error {
    /// True for every flavour of malformed encoding.
    pub fn is_invalid_encoding(&self) -> bool {
        matches!(self, Error::InvalidEncoding(_) | Error::InvalidEncodingMsg(_))
    }
}

impl From<libsecp256k1::Error> for Error {
    fn from(e: libsecp256k1::Error) -> Self {
        match e {
            libsecp256k1::Error::InvalidSecretKey => Self::InvalidSecretKey,
            libsecp256k1::Error::InvalidSignature => {
                Self::InvalidSignatureComponent("r or s out of the curve order")
            }
            libsecp256k1::Error::InvalidRecoveryId => {
                Self::InvalidSignatureComponent("recovery id")
            }
            e => Self::InternalCryptoError(e),
        }
    }
}
