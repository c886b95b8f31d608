// SPDX-FileCopyrightText: 2024 Nomadic Labs <contact@nomadic-labs.com>
//
// SPDX-License-Identifier: MIT

//! Version 3 keystores: a secret key encrypted with AES-128-CTR under a
//! passphrase derived key, authenticated with a Keccak-256 MAC.

use ethereum_signer::keccak::keccak256;
use ethereum_signer::Key;
use primitive_types::H160;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::cipher::{self, AES_128_CTR, IV_SIZE};
use crate::derived_key::DerivedKey;
use crate::error::Error;
use crate::json_keystore::{CipherParams, CryptoJson, JsonKeystore};
use crate::kdf::{Kdf, DKLEN, SCRYPT_R};

pub const VERSION: u32 = 3;

pub const SECRET_KEY_LEN: usize = 32;

pub const SALT_SIZE: usize = 32;

const ADDRESS_LEN: usize = 20;

/// Scrypt cost used by `Keystore::encrypt`; `r` is always 8.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ScryptParams {
    pub n: u32,
    pub p: u32,
}

impl ScryptParams {
    /// About 256MB of memory and one second of CPU.
    pub const STANDARD: ScryptParams = ScryptParams { n: 1 << 18, p: 1 };

    /// About 4MB of memory and 100ms of CPU.
    pub const LIGHT: ScryptParams = ScryptParams { n: 1 << 12, p: 6 };
}

impl Default for ScryptParams {
    fn default() -> Self {
        Self::STANDARD
    }
}

fn compute_mac(derived_key: &DerivedKey, cipher_text: &[u8]) -> [u8; 32] {
    keccak256([derived_key.mac_key(), cipher_text]).to_fixed_bytes()
}

// Runs in time independent of where the inputs differ.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

fn check_length(field: &'static str, bytes: &[u8], expected: usize) -> Result<(), Error> {
    if bytes.len() != expected {
        return Err(Error::InvalidLength {
            field,
            expected,
            actual: bytes.len(),
        });
    }
    Ok(())
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Keystore {
    json: JsonKeystore,
}

impl Keystore {
    /// Encrypts `key` under `passphrase` with fresh random salt and IV.
    pub fn encrypt(key: &Key, passphrase: &str, params: ScryptParams) -> Result<Self, Error> {
        Self::encrypt_with_rng(key, passphrase, params, &mut rand::thread_rng())
    }

    pub fn encrypt_with_rng<R: RngCore + CryptoRng>(
        key: &Key,
        passphrase: &str,
        params: ScryptParams,
        rng: &mut R,
    ) -> Result<Self, Error> {
        let mut salt = vec![0u8; SALT_SIZE];
        rng.fill_bytes(&mut salt);
        let mut iv = [0u8; IV_SIZE];
        rng.fill_bytes(&mut iv);

        let kdf = Kdf::Scrypt {
            n: params.n,
            r: SCRYPT_R,
            p: params.p,
            dklen: DKLEN,
            salt,
        };
        kdf.validate()?;
        let derived_key = kdf.derive_key(passphrase.as_bytes())?;
        let secret = key.secret_bytes();
        let cipher_text = cipher::encrypt(derived_key.cipher_key(), &iv, &secret[..])?;
        let mac = compute_mac(&derived_key, &cipher_text);

        let (kdf_function, kdfparams) = kdf.to_json();
        let json = JsonKeystore {
            address: Some(key.address().as_bytes().into()),
            crypto: CryptoJson {
                cipher: AES_128_CTR.to_string(),
                cipherparams: CipherParams { iv: iv.to_vec().into() },
                ciphertext: cipher_text.into(),
                kdf: kdf_function,
                kdfparams,
                mac: mac.to_vec().into(),
            },
            id: Some(Uuid::new_v4()),
            version: VERSION,
        };
        debug!("Encrypted keystore {:?} for {:?}", json.id, key.address());
        Ok(Keystore { json })
    }

    /// Recovers the key. The MAC is checked before anything is decrypted.
    pub fn decrypt(&self, passphrase: &str) -> Result<Key, Error> {
        if self.json.version != VERSION {
            return Err(Error::UnsupportedVersion(self.json.version));
        }
        let crypto = &self.json.crypto;
        if crypto.cipher != AES_128_CTR {
            return Err(Error::UnsupportedCipher(crypto.cipher.clone()));
        }
        let kdf = Kdf::from_json(&crypto.kdf, &crypto.kdfparams)?;
        let iv = crypto.cipherparams.iv.as_bytes();
        check_length("iv", iv, IV_SIZE)?;
        let cipher_text = crypto.ciphertext.as_bytes();
        check_length("ciphertext", cipher_text, SECRET_KEY_LEN)?;

        let derived_key = kdf.derive_key(passphrase.as_bytes())?;
        let mac = compute_mac(&derived_key, cipher_text);
        if !constant_time_eq(&mac, crypto.mac.as_bytes()) {
            return Err(Error::InvalidPassphrase);
        }

        let secret = cipher::decrypt(derived_key.cipher_key(), iv, cipher_text)?;
        let key = Key::from_secret_bytes(&secret)?;
        if let Some(expected) = self.address()? {
            if !expected.is_zero() && expected != key.address() {
                return Err(Error::AddressMismatch {
                    expected,
                    found: key.address(),
                });
            }
        }
        debug!(
            "Decrypted keystore {:?} ({}) for {:?}",
            self.json.id,
            kdf.function(),
            key.address()
        );
        Ok(key)
    }

    /// Address recorded in the keystore, if any.
    pub fn address(&self) -> Result<Option<H160>, Error> {
        match &self.json.address {
            None => Ok(None),
            Some(bytes) => {
                check_length("address", bytes.as_bytes(), ADDRESS_LEN)?;
                Ok(Some(H160::from_slice(bytes.as_bytes())))
            }
        }
    }

    pub fn id(&self) -> Option<Uuid> {
        self.json.id
    }

    pub fn kdf(&self) -> &str {
        &self.json.crypto.kdf
    }

    pub fn json(&self) -> &JsonKeystore {
        &self.json
    }

    pub fn from_json(json: JsonKeystore) -> Self {
        Keystore { json }
    }

    pub fn from_json_str(s: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, Error> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn to_json_string(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_vec_pretty(&self) -> Result<Vec<u8>, Error> {
        Ok(serde_json::to_vec_pretty(self)?)
    }
}
