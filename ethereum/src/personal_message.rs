// SPDX-FileCopyrightText: 2024 Nomadic Labs <contact@nomadic-labs.com>
//
// SPDX-License-Identifier: MIT

//! `personal_sign` framing, see
//! `<https://github.com/ethereum/go-ethereum/pull/2940>`.

use primitive_types::H256;

use crate::keccak::keccak256;

pub const MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n";

/// `"\x19Ethereum Signed Message:\n" || len(data) || data`, the length in
/// decimal.
pub fn prefixed_message(data: &[u8]) -> Vec<u8> {
    let len = data.len().to_string();
    let mut message = Vec::with_capacity(MESSAGE_PREFIX.len() + len.len() + data.len());
    message.extend_from_slice(MESSAGE_PREFIX);
    message.extend_from_slice(len.as_bytes());
    message.extend_from_slice(data);
    message
}

/// Digest signed by `sign_message`.
pub fn hash_message(data: &[u8]) -> H256 {
    let len = data.len().to_string();
    keccak256([MESSAGE_PREFIX, len.as_bytes(), data])
}
