// SPDX-FileCopyrightText: 2024 Nomadic Labs <contact@nomadic-labs.com>
//
// SPDX-License-Identifier: MIT

use aes::cipher::{NewCipher, StreamCipher};
use aes::Aes128Ctr;
use zeroize::Zeroizing;

use crate::error::Error;

pub const AES_128_CTR: &str = "aes-128-ctr";

pub const IV_SIZE: usize = 16;

/// Encrypts `plain_text` with AES-128-CTR.
pub fn encrypt(key: &[u8], iv: &[u8], plain_text: &[u8]) -> Result<Vec<u8>, Error> {
    let mut cipher_text = plain_text.to_vec();
    apply_keystream(key, iv, &mut cipher_text)?;
    Ok(cipher_text)
}

/// Decrypts `cipher_text`; the result is wiped on drop.
pub fn decrypt(key: &[u8], iv: &[u8], cipher_text: &[u8]) -> Result<Zeroizing<Vec<u8>>, Error> {
    let mut plain_text = Zeroizing::new(cipher_text.to_vec());
    apply_keystream(key, iv, &mut plain_text)?;
    Ok(plain_text)
}

fn apply_keystream(key: &[u8], iv: &[u8], data: &mut [u8]) -> Result<(), Error> {
    if iv.len() != IV_SIZE {
        return Err(Error::InvalidLength {
            field: "iv",
            expected: IV_SIZE,
            actual: iv.len(),
        });
    }
    let mut cipher = Aes128Ctr::new_from_slices(key, iv)
        .map_err(|_| Error::InternalCryptoError("invalid AES-128 key length"))?;
    cipher.apply_keystream(data);
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_nist_sp800_38a_ctr_vector() {
        // F.5.1 CTR-AES128.Encrypt, first block
        let key = hex::decode("2b7e151628aed2a6abf7158809cf4f3c").unwrap();
        let iv = hex::decode("f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff").unwrap();
        let plain_text = hex::decode("6bc1bee22e409f96e93d7e117393172a").unwrap();
        let cipher_text = encrypt(&key, &iv, &plain_text).unwrap();
        assert_eq!("874d6191b620e3261bef6864990db6ce", hex::encode(&cipher_text));
        assert_eq!(plain_text, *decrypt(&key, &iv, &cipher_text).unwrap());
    }

    #[test]
    fn test_invalid_lengths() {
        assert!(matches!(
            encrypt(&[0; 16], &[0; 15], &[0; 32]),
            Err(Error::InvalidLength { field: "iv", .. })
        ));
        assert!(matches!(
            encrypt(&[0; 15], &[0; 16], &[0; 32]),
            Err(Error::InternalCryptoError(_))
        ));
    }
}
