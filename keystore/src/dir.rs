// SPDX-FileCopyrightText: 2024 Nomadic Labs <contact@nomadic-labs.com>
//
// SPDX-License-Identifier: MIT

//! Keystore files on disk.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use ethereum_signer::Key;
use primitive_types::H160;
use tracing::debug;

use crate::error::Error;
use crate::keystore::Keystore;

/// Files of this size or larger are never read as keystores.
pub const MAX_KEY_FILE_SIZE: u64 = 1 << 20;

/// `<lowercase address without 0x>.json`
pub fn key_file_name(address: &H160) -> String {
    format!("{}.json", hex::encode(address.as_bytes()))
}

// `Ok(None)` when the file is not a keystore for `address`.
fn try_key_file(path: &Path, address: &H160, passphrase: &str) -> Result<Option<Key>, Error> {
    let metadata = fs::metadata(path)?;
    if !metadata.is_file() {
        debug!("Skipping {path:?}: not a regular file");
        return Ok(None);
    }
    if metadata.len() == 0 || metadata.len() >= MAX_KEY_FILE_SIZE {
        debug!("Skipping {path:?}: size {}", metadata.len());
        return Ok(None);
    }
    let keystore = Keystore::from_json_slice(&fs::read(path)?)?;
    if let Some(recorded) = keystore.address()? {
        if !recorded.is_zero() && recorded != *address {
            debug!("Skipping {path:?}: keystore for {recorded:?}");
            return Ok(None);
        }
    }
    let key = keystore.decrypt(passphrase)?;
    Ok((key.address() == *address).then_some(key))
}

/// Returns the first keystore file of `dir` that decrypts under
/// `passphrase` to the key of `address`, with that key.
///
/// Unreadable or invalid files are skipped.
pub fn find_key_file(
    dir: &Path,
    address: &H160,
    passphrase: &str,
) -> Result<(PathBuf, Key), Error> {
    let mut paths = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .collect::<Vec<_>>();
    paths.sort();
    for path in paths {
        match try_key_file(&path, address, passphrase) {
            Ok(Some(key)) => {
                debug!("Found keystore for {address:?} in {path:?}");
                return Ok((path, key));
            }
            Ok(None) => (),
            Err(err) => debug!("Skipping {path:?}: {err}"),
        }
    }
    Err(Error::KeyNotFound(*address))
}

pub fn load_key_from_dir(dir: &Path, address: &H160, passphrase: &str) -> Result<Key, Error> {
    find_key_file(dir, address, passphrase).map(|(_, key)| key)
}

/// Writes `keystore` to `dir` under its address, readable by the owner
/// only. An existing file is never overwritten.
pub fn write_key_file(dir: &Path, keystore: &Keystore) -> Result<PathBuf, Error> {
    let address = keystore.address()?.ok_or(Error::MissingAddress)?;
    let path = dir.join(key_file_name(&address));
    let bytes = keystore.to_json_vec_pretty()?;

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)?;
    set_file_permissions(&file)?;
    file.write_all(&bytes)?;
    file.sync_all()?;
    debug!("Wrote keystore {:?} to {path:?}", keystore.id());
    Ok(path)
}

/// Readable and writable by the owner only (0600).
#[cfg(unix)]
fn set_file_permissions(file: &File) -> Result<(), Error> {
    use std::os::unix::fs::PermissionsExt;

    let mut perm = file.metadata()?.permissions();
    perm.set_mode(0o600);
    file.set_permissions(perm)?;
    Ok(())
}

#[cfg(not(unix))]
fn set_file_permissions(_file: &File) -> Result<(), Error> {
    Ok(())
}
