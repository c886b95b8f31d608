// SPDX-FileCopyrightText: 2023 Nomadic Labs <contact@nomadic-labs.com>
//
// SPDX-License-Identifier: MIT

pub mod access_list;
pub mod error;
pub mod json;
pub mod keccak;
pub mod key;
pub mod personal_message;
pub mod rlp_helpers;
pub mod signer;
pub mod transaction;
pub mod tx_common;
pub mod tx_signature;
pub mod types;
pub mod wei;

pub use error::Error;
pub use key::Key;
pub use libsecp256k1::SecretKey;
pub use primitive_types::{H160, H256, U256};
pub use transaction::TransactionType;
pub use tx_common::Transaction;
pub use tx_signature::TxSignature;
