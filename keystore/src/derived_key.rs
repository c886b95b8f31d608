// SPDX-FileCopyrightText: 2024 Nomadic Labs <contact@nomadic-labs.com>
//
// SPDX-License-Identifier: MIT

use zeroize::Zeroizing;

/// Output of the keystore kdf, wiped on drop.
pub struct DerivedKey(Zeroizing<Vec<u8>>);

impl DerivedKey {
    /// All-zeros key of `len` bytes, to be filled by a kdf.
    pub fn zero(len: usize) -> Self {
        Self(Zeroizing::new(vec![0; len]))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        &mut self.0
    }

    /// `dk[0..16]`, the AES-128 key.
    pub fn cipher_key(&self) -> &[u8] {
        &self.0[..16]
    }

    /// `dk[16..32]`, prepended to the ciphertext to compute the MAC.
    pub fn mac_key(&self) -> &[u8] {
        &self.0[16..32]
    }
}
