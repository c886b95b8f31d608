// SPDX-FileCopyrightText: 2024 Nomadic Labs <contact@nomadic-labs.com>
//
// SPDX-License-Identifier: MIT

use std::fmt;

use libsecp256k1::SecretKey;
use primitive_types::{H160, H256};
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::error::Error;
use crate::signer::{
    address_from_secret, recover_hash, recover_message, recover_transaction,
    secret_key_from_slice, sign_hash, sign_message, sign_transaction, SECRET_KEY_SIZE,
};
use crate::tx_common::Transaction;
use crate::tx_signature::TxSignature;
use crate::types::strip_0x;

/// A secret key bound to its address.
#[derive(Clone)]
pub struct Key {
    secret: SecretKey,
    address: H160,
}

impl Key {
    pub fn from_secret(secret: SecretKey) -> Self {
        let address = address_from_secret(&secret);
        Key { secret, address }
    }

    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Ok(Self::from_secret(secret_key_from_slice(bytes)?))
    }

    /// Parses a hex encoded secret key, with or without `0x`.
    pub fn from_hex(s: &str) -> Result<Self, Error> {
        let bytes = Zeroizing::new(hex::decode(strip_0x(s))?);
        Self::from_secret_bytes(&bytes)
    }

    /// Draws secret keys from `rng` until one is valid.
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut bytes = Zeroizing::new([0u8; SECRET_KEY_SIZE]);
        loop {
            rng.fill_bytes(&mut bytes[..]);
            if let Ok(secret) = SecretKey::parse(&bytes) {
                return Self::from_secret(secret);
            }
        }
    }

    pub fn address(&self) -> H160 {
        self.address
    }

    pub fn secret_bytes(&self) -> Zeroizing<[u8; SECRET_KEY_SIZE]> {
        Zeroizing::new(self.secret.serialize())
    }

    pub fn sign_hash(&self, digest: &H256) -> Result<TxSignature, Error> {
        sign_hash(&self.secret, digest)
    }

    pub fn sign_message(&self, data: &[u8]) -> Result<TxSignature, Error> {
        sign_message(&self.secret, data)
    }

    pub fn sign_transaction(&self, tx: &Transaction) -> Result<Transaction, Error> {
        sign_transaction(&self.secret, tx)
    }

    // The verifiers never fail: any error means "not signed by this key".

    pub fn verify_hash(&self, digest: &H256, signature: &TxSignature) -> bool {
        matches!(recover_hash(digest, signature), Ok(address) if address == self.address)
    }

    pub fn verify_message(&self, data: &[u8], signature: &TxSignature) -> bool {
        matches!(recover_message(data, signature), Ok(address) if address == self.address)
    }

    pub fn verify_transaction(&self, tx: &Transaction) -> bool {
        matches!(recover_transaction(tx), Ok(address) if address == self.address)
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
