// SPDX-FileCopyrightText: 2024 Nomadic Labs <contact@nomadic-labs.com>
//
// SPDX-License-Identifier: MIT

//! Version 3 (Web3 Secret Storage) keystores for `ethereum_signer` keys.

pub mod cipher;
pub mod derived_key;
pub mod dir;
pub mod error;
pub mod json_keystore;
pub mod kdf;
pub mod keystore;

pub use dir::{find_key_file, load_key_from_dir, write_key_file, MAX_KEY_FILE_SIZE};
pub use error::Error;
pub use keystore::{Keystore, ScryptParams};
