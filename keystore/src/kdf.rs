// SPDX-FileCopyrightText: 2024 Nomadic Labs <contact@nomadic-labs.com>
//
// SPDX-License-Identifier: MIT

//! Passphrase based key derivation: scrypt or PBKDF2-HMAC-SHA256.

use hmac::Hmac;
use pbkdf2::pbkdf2;
use scrypt::{scrypt, Params};
use sha2::Sha256;

use crate::derived_key::DerivedKey;
use crate::error::Error;
use crate::json_keystore::KdfParams;

/// Length of the derived key written by `encrypt`, and the minimum
/// accepted by `decrypt`.
pub const DKLEN: u32 = 32;

/// Scrypt block size used when encrypting.
pub const SCRYPT_R: u32 = 8;

pub const SCRYPT: &str = "scrypt";
pub const PBKDF2: &str = "pbkdf2";
pub const HMAC_SHA256: &str = "hmac-sha256";

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Kdf {
    Scrypt {
        n: u32,
        r: u32,
        p: u32,
        dklen: u32,
        salt: Vec<u8>,
    },
    /// The PRF is always HMAC-SHA256.
    Pbkdf2 { c: u32, dklen: u32, salt: Vec<u8> },
}

fn required(value: Option<u32>, name: &'static str) -> Result<u32, Error> {
    value.ok_or(Error::InvalidKdfParams(name))
}

impl Kdf {
    /// Reads and validates the `kdf` / `kdfparams` pair of a keystore.
    pub fn from_json(function: &str, params: &KdfParams) -> Result<Self, Error> {
        let salt = params.salt.as_bytes().to_vec();
        let kdf = match function {
            SCRYPT => Kdf::Scrypt {
                n: required(params.n, "missing scrypt n")?,
                r: required(params.r, "missing scrypt r")?,
                p: required(params.p, "missing scrypt p")?,
                dklen: params.dklen,
                salt,
            },
            PBKDF2 => {
                match params.prf.as_deref() {
                    Some(HMAC_SHA256) => (),
                    Some(prf) => return Err(Error::UnsupportedPrf(prf.to_string())),
                    None => return Err(Error::InvalidKdfParams("missing pbkdf2 prf")),
                }
                Kdf::Pbkdf2 {
                    c: required(params.c, "missing pbkdf2 c")?,
                    dklen: params.dklen,
                    salt,
                }
            }
            other => return Err(Error::UnsupportedKdf(other.to_string())),
        };
        kdf.validate()?;
        Ok(kdf)
    }

    pub fn to_json(&self) -> (String, KdfParams) {
        match self {
            Kdf::Scrypt {
                n,
                r,
                p,
                dklen,
                salt,
            } => (
                SCRYPT.to_string(),
                KdfParams {
                    dklen: *dklen,
                    salt: salt.clone().into(),
                    n: Some(*n),
                    r: Some(*r),
                    p: Some(*p),
                    ..KdfParams::default()
                },
            ),
            Kdf::Pbkdf2 { c, dklen, salt } => (
                PBKDF2.to_string(),
                KdfParams {
                    dklen: *dklen,
                    salt: salt.clone().into(),
                    c: Some(*c),
                    prf: Some(HMAC_SHA256.to_string()),
                    ..KdfParams::default()
                },
            ),
        }
    }

    pub fn function(&self) -> &'static str {
        match self {
            Kdf::Scrypt { .. } => SCRYPT,
            Kdf::Pbkdf2 { .. } => PBKDF2,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        match self {
            Kdf::Scrypt { n, r, p, dklen, .. } => {
                if *n <= 1 || !n.is_power_of_two() {
                    return Err(Error::InvalidKdfParams(
                        "scrypt n must be a power of two greater than 1",
                    ));
                }
                if *r == 0 || *p == 0 {
                    return Err(Error::InvalidKdfParams("scrypt r and p must be non-zero"));
                }
                check_dklen(*dklen)
            }
            Kdf::Pbkdf2 { c, dklen, .. } => {
                if *c == 0 {
                    return Err(Error::InvalidKdfParams("pbkdf2 c must be non-zero"));
                }
                check_dklen(*dklen)
            }
        }
    }

    pub fn derive_key(&self, passphrase: &[u8]) -> Result<DerivedKey, Error> {
        match self {
            Kdf::Scrypt {
                n,
                r,
                p,
                dklen,
                salt,
            } => {
                let log_n = n.trailing_zeros() as u8;
                let params = Params::new(log_n, *r, *p)
                    .map_err(|_| Error::InvalidKdfParams("scrypt parameters out of range"))?;
                let mut dk = DerivedKey::zero(*dklen as usize);
                scrypt(passphrase, salt, &params, dk.as_mut_bytes())
                    .map_err(|_| Error::InternalCryptoError("scrypt output length"))?;
                Ok(dk)
            }
            Kdf::Pbkdf2 { c, dklen, salt } => {
                let mut dk = DerivedKey::zero(*dklen as usize);
                pbkdf2::<Hmac<Sha256>>(passphrase, salt, *c, dk.as_mut_bytes());
                Ok(dk)
            }
        }
    }
}

fn check_dklen(dklen: u32) -> Result<(), Error> {
    if dklen < DKLEN {
        Err(Error::InvalidKdfParams("dklen must be at least 32"))
    } else {
        Ok(())
    }
}
