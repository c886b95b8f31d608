// SPDX-FileCopyrightText: 2022-2024 TriliTech <contact@trili.tech>
// SPDX-FileCopyrightText: 2024 Nomadic Labs <contact@nomadic-labs.com>
//
// SPDX-License-Identifier: MIT

//! ECDSA signing and public key recovery over secp256k1, with the `V`
//! conventions of each envelope.

use libsecp256k1::{recover, sign, Message, PublicKey, RecoveryId, SecretKey};
use primitive_types::{H160, H256, U256};
use tracing::debug;

use crate::{
    error::Error,
    keccak::keccak256_bytes,
    personal_message::hash_message,
    transaction::TransactionType,
    tx_common::Transaction,
    tx_signature::{TxSignature, LEGACY_V_OFFSET},
    types::ADDRESS_SIZE,
};

/// Size of a raw secret key.
pub const SECRET_KEY_SIZE: usize = 32;

pub fn secret_key_from_slice(bytes: &[u8]) -> Result<SecretKey, Error> {
    if bytes.len() != SECRET_KEY_SIZE {
        return Err(Error::InvalidLength {
            expected: SECRET_KEY_SIZE,
            actual: bytes.len(),
        });
    }
    Ok(SecretKey::parse_slice(bytes)?)
}

/// Last 20 bytes of the Keccak-256 of the uncompressed `X || Y`
/// coordinates.
pub fn public_key_to_address(public_key: &PublicKey) -> H160 {
    let serialised = &public_key.serialize()[1..];
    let kec = keccak256_bytes(serialised);
    H160::from_slice(&kec.as_bytes()[32 - ADDRESS_SIZE..])
}

pub fn address_from_secret(secret: &SecretKey) -> H160 {
    public_key_to_address(&PublicKey::from_secret_key(secret))
}

fn sign_digest(
    secret: &SecretKey,
    digest: &H256,
    v_offset: U256,
) -> Result<TxSignature, Error> {
    let message = Message::parse(digest.as_fixed_bytes());
    let (signature, recovery_id) = sign(&message, secret);
    TxSignature::from_recoverable(&signature, recovery_id, v_offset)
}

fn recover_digest(
    digest: &H256,
    signature: &TxSignature,
    recovery_id: RecoveryId,
) -> Result<H160, Error> {
    let message = Message::parse(digest.as_fixed_bytes());
    let sig = signature.to_secp256k1()?;
    let public_key =
        recover(&message, &sig, &recovery_id).map_err(|_| Error::RecoveryFailed)?;
    Ok(public_key_to_address(&public_key))
}

/// Signs a 32-byte digest, `V = recid + 27`.
pub fn sign_hash(secret: &SecretKey, digest: &H256) -> Result<TxSignature, Error> {
    sign_digest(secret, digest, U256::from(LEGACY_V_OFFSET))
}

/// Recovers the signer of a digest. `V` may be the bare recovery id or
/// the recovery id plus 27.
pub fn recover_hash(digest: &H256, signature: &TxSignature) -> Result<H160, Error> {
    recover_digest(digest, signature, signature.recovery_id()?)
}

/// Signs a personal message, always in the pre-EIP-155 form
/// (`V = recid + 27`).
pub fn sign_message(secret: &SecretKey, data: &[u8]) -> Result<TxSignature, Error> {
    sign_hash(secret, &hash_message(data))
}

pub fn recover_message(data: &[u8], signature: &TxSignature) -> Result<H160, Error> {
    recover_hash(&hash_message(data), signature)
}

/// Produces a signed copy of `tx`, with `from` set to the signer.
///
/// If `tx.from` is already set it must be the address of `secret`.
pub fn sign_transaction(secret: &SecretKey, tx: &Transaction) -> Result<Transaction, Error> {
    let address = address_from_secret(secret);
    if let Some(from) = tx.from {
        if from != address {
            return Err(Error::InvalidSigner {
                expected: from,
                found: address,
            });
        }
    }
    let v_offset = match tx.type_ {
        TransactionType::Legacy => match tx.eip155_chain_id() {
            Some(chain_id) => TxSignature::eip155_v_offset(chain_id)?,
            None => U256::from(LEGACY_V_OFFSET),
        },
        TransactionType::AccessList | TransactionType::DynamicFee => U256::zero(),
    };
    let signature = sign_digest(secret, &tx.signing_hash(), v_offset)?;
    debug!(
        "Signed {} transaction (chain id {:?}) with {address:?}",
        tx.type_, tx.chain_id
    );
    Ok(Transaction {
        from: Some(address),
        signature: Some(signature),
        ..tx.clone()
    })
}

/// Recovers the sender of a signed transaction.
///
/// For legacy transactions the pre-image is chosen by `V`: EIP-155 when
/// `V >= 35`, the six-field form otherwise. A chain id set on the
/// transaction must agree with the one carried by an EIP-155 `V`.
pub fn recover_transaction(tx: &Transaction) -> Result<H160, Error> {
    let signature = tx.signature.as_ref().ok_or(Error::MissingSignature)?;
    let (recovery_id, digest) = match tx.type_ {
        TransactionType::Legacy => {
            let (recovery_id, chain_id) = signature.legacy_recovery_id()?;
            if let (Some(expected), Some(found)) = (tx.eip155_chain_id(), chain_id) {
                if expected != found {
                    return Err(Error::ChainIdMismatch { expected, found });
                }
            }
            let payload = tx.legacy_signing_payload(chain_id);
            (recovery_id, keccak256_bytes(&payload))
        }
        TransactionType::AccessList | TransactionType::DynamicFee => {
            (signature.typed_recovery_id()?, tx.signing_hash())
        }
    };
    let sender = recover_digest(&digest, signature, recovery_id)?;
    debug!("Recovered sender {sender:?} of {} transaction", tx.type_);
    Ok(sender)
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use super::*;
    use crate::access_list::AccessListItem;
    use crate::wei;

    fn secret(s: &str) -> SecretKey {
        secret_key_from_slice(&hex::decode(s).unwrap()).unwrap()
    }

    fn u256(s: &str) -> U256 {
        U256::from_str_radix(s, 16).unwrap()
    }

    fn address(s: &str) -> H160 {
        H160::from_str(s).unwrap()
    }

    const EIP155_KEY: &str = "4646464646464646464646464646464646464646464646464646464646464646";

    fn basic_eip155_transaction_unsigned() -> Transaction {
        Transaction::new(TransactionType::Legacy)
            .with_chain_id(1u64)
            .with_nonce(9u64)
            .with_gas_price(wei::from_gwei(20))
            .with_gas_limit(21000u64)
            .with_to(address("3535353535353535353535353535353535353535"))
            .with_value(wei::from_eth(1))
    }

    #[test]
    fn test_secret_key_checks() {
        assert_eq!(
            Err(Error::InvalidLength {
                expected: 32,
                actual: 31
            }),
            secret_key_from_slice(&[1u8; 31]).map(|_| ())
        );
        assert_eq!(
            Err(Error::InvalidSecretKey),
            secret_key_from_slice(&[0u8; 32]).map(|_| ())
        );
        assert_eq!(
            Err(Error::InvalidSecretKey),
            secret_key_from_slice(&[0xffu8; 32]).map(|_| ())
        );
    }

    #[test]
    fn test_address_from_secret() {
        assert_eq!(
            address("9d8a62f656a8d1615c1294fd71e9cfb3e4855a4f"),
            address_from_secret(&secret(EIP155_KEY))
        );
        assert_eq!(
            address("1a642f0e3c3af545e7acbd38b07251b3990914f1"),
            address_from_secret(&SecretKey::parse(&[1u8; 32]).unwrap())
        );
    }

    #[test]
    fn test_sign_hash_vector() {
        let key = SecretKey::parse(&[1u8; 32]).unwrap();
        let digest = H256::repeat_byte(2);
        let signature = sign_hash(&key, &digest).unwrap();
        assert_eq!(U256::from(0x1b), signature.v());
        assert_eq!(
            u256("97ef30233ead25d10f7bb2bf9eaf571a16f2deb33a75f20819284f0cb8ff3cc1"),
            signature.r()
        );
        assert_eq!(
            u256("4870ca05940199c113b4dc77866f001702691cde269f6835581e7aea1ead2660"),
            signature.s()
        );
        assert_eq!(Ok(address_from_secret(&key)), recover_hash(&digest, &signature));
    }

    #[test]
    fn test_sign_message_vector() {
        let key = SecretKey::parse(&[1u8; 32]).unwrap();
        let signature = sign_message(&key, b"hello world").unwrap();
        assert_eq!(U256::from(0x1b), signature.v());
        assert_eq!(
            u256("0f2b67e452d18ce781203f10380ea5a2726494162c49c495069cf99118bcf199"),
            signature.r()
        );
        assert_eq!(
            u256("51601fe3219055482c45a14bf616c3e2bc7914c953f438627de2aa541eef61b5"),
            signature.s()
        );
        assert_eq!(
            Ok(address("1a642f0e3c3af545e7acbd38b07251b3990914f1")),
            recover_message(b"hello world", &signature)
        );
    }

    #[test]
    fn test_recover_hash_accepts_bare_recovery_id() {
        let key = SecretKey::parse(&[1u8; 32]).unwrap();
        let digest = H256::repeat_byte(2);
        let signature = sign_hash(&key, &digest).unwrap();
        let bare = TxSignature::new(signature.v() - 27, signature.r(), signature.s());
        assert_eq!(recover_hash(&digest, &signature), recover_hash(&digest, &bare));
        let invalid = TxSignature::new(U256::from(29), signature.r(), signature.s());
        assert!(matches!(
            recover_hash(&digest, &invalid),
            Err(Error::InvalidSignatureComponent(_))
        ));
    }

    #[test]
    fn test_recover_zero_signature_fails() {
        let zero = TxSignature::new(U256::from(27), U256::zero(), U256::zero());
        assert_eq!(
            Err(Error::RecoveryFailed),
            recover_hash(&H256::repeat_byte(2), &zero)
        );
    }

    #[test]
    fn test_signature_eip155_example() {
        let signed = sign_transaction(&secret(EIP155_KEY), &basic_eip155_transaction_unsigned())
            .unwrap();
        let signature = signed.signature.unwrap();
        assert_eq!(U256::from(37), signature.v());
        assert_eq!(
            "f86c098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a76400008025a028ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276a067cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83",
            hex::encode(signed.to_bytes())
        );
        assert_eq!(
            Some(address("9d8a62f656a8d1615c1294fd71e9cfb3e4855a4f")),
            signed.from
        );
    }

    #[test]
    fn test_caller_classic() {
        let encoded = "f86c098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a76400008025a028ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276a067cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83";
        let transaction = Transaction::from_hex(encoded).unwrap();
        assert_eq!(
            Ok(address("9d8A62f656a8d1615C1294fd71e9CFb3E4855A4F")),
            recover_transaction(&transaction)
        );
    }

    #[test]
    fn test_caller_classic_with_chain_id() {
        let key = secret("9bfc9fbe6296c8fef8eb8d6ce2ed5f772a011898c6cabe32d35e7c3e419efb1b");
        let expected_address = address("6471A723296395CF1Dcc568941AFFd7A390f94CE");
        assert_eq!(expected_address, address_from_secret(&key));

        // chain id 1337
        let encoded = "f86d80843b9aca00825208940b52d4d3be5d18a7ab5e4476a2f5382bbf2b38d888016345785d8a000080820a95a0d9ef1298c18c88604e3f08e14907a17dfa81b1dc6b37948abe189d8db5cb8a43a06fc7040a71d71d3cb74bd05ead7046b10668ad255da60391c017eea31555f156";
        let transaction = Transaction::from_hex(encoded).unwrap();
        assert_eq!(Some(U256::from(1337)), transaction.chain_id);
        assert_eq!(Ok(expected_address), recover_transaction(&transaction));

        let resigned = sign_transaction(&key, &transaction).unwrap();
        let v = resigned.signature.unwrap().v();
        assert!(v == U256::from(2709) || v == U256::from(2710));
        assert_eq!(Ok(expected_address), recover_transaction(&resigned));
    }

    #[test]
    fn test_sign_then_recover_every_envelope() {
        let key = secret(EIP155_KEY);
        let expected = address_from_secret(&key);
        let access_list = vec![AccessListItem {
            address: H160::repeat_byte(0x33),
            storage_keys: vec![H256::repeat_byte(0x44)],
        }];
        let legacy = basic_eip155_transaction_unsigned();
        let pre_eip155 = Transaction {
            chain_id: None,
            ..legacy.clone()
        };
        let eip2930 = Transaction {
            type_: TransactionType::AccessList,
            ..legacy.clone()
        }
        .with_access_list(access_list.clone());
        let eip1559 = Transaction {
            type_: TransactionType::DynamicFee,
            gas_price: None,
            ..legacy.clone()
        }
        .with_access_list(access_list)
        .with_max_priority_fee_per_gas(wei::from_gwei(1))
        .with_max_fee_per_gas(wei::from_gwei(2));

        for (tx, v_range) in [
            (legacy, (37u64, 38u64)),
            (pre_eip155, (27, 28)),
            (eip2930, (0, 1)),
            (eip1559, (0, 1)),
        ] {
            let signed = sign_transaction(&key, &tx).unwrap();
            let v = signed.signature.unwrap().v();
            assert!(v == U256::from(v_range.0) || v == U256::from(v_range.1));
            assert_eq!(Ok(expected), recover_transaction(&signed));
            // through the wire
            let decoded = Transaction::from_bytes(&signed.to_bytes()).unwrap();
            assert_eq!(Ok(expected), recover_transaction(&decoded));
        }
    }

    #[test]
    fn test_sign_with_wrong_from() {
        let tx = basic_eip155_transaction_unsigned().with_from(H160::repeat_byte(1));
        assert_eq!(
            Err(Error::InvalidSigner {
                expected: H160::repeat_byte(1),
                found: address("9d8a62f656a8d1615c1294fd71e9cfb3e4855a4f"),
            }),
            sign_transaction(&secret(EIP155_KEY), &tx)
        );
        let tx = basic_eip155_transaction_unsigned()
            .with_from(address("9d8a62f656a8d1615c1294fd71e9cfb3e4855a4f"));
        assert!(sign_transaction(&secret(EIP155_KEY), &tx).is_ok());
    }

    #[test]
    fn test_sign_invalid_chain_id_fails_gracefully() {
        let tx = basic_eip155_transaction_unsigned().with_chain_id(U256::MAX);
        assert!(matches!(
            sign_transaction(&secret(EIP155_KEY), &tx),
            Err(Error::InvalidSignatureComponent(_))
        ));
    }

    #[test]
    fn test_recover_unsigned_fails() {
        assert_eq!(
            Err(Error::MissingSignature),
            recover_transaction(&basic_eip155_transaction_unsigned())
        );
    }

    #[test]
    fn test_recover_chain_id_mismatch() {
        let signed =
            sign_transaction(&secret(EIP155_KEY), &basic_eip155_transaction_unsigned())
                .unwrap();
        let other_chain = signed.with_chain_id(5u64);
        assert_eq!(
            Err(Error::ChainIdMismatch {
                expected: U256::from(5),
                found: U256::one()
            }),
            recover_transaction(&other_chain)
        );
    }

    #[test]
    fn test_recover_invalid_parity() {
        let signed =
            sign_transaction(&secret(EIP155_KEY), &basic_eip155_transaction_unsigned())
                .unwrap();
        let sig = signed.signature.unwrap();
        let typed = Transaction {
            type_: TransactionType::DynamicFee,
            signature: Some(TxSignature::new(U256::from(27), sig.r(), sig.s())),
            ..signed.clone()
        };
        assert!(matches!(
            recover_transaction(&typed),
            Err(Error::InvalidSignatureComponent(_))
        ));
        let legacy = Transaction {
            signature: Some(TxSignature::new(U256::from(30), sig.r(), sig.s())),
            ..signed
        };
        assert!(matches!(
            recover_transaction(&legacy),
            Err(Error::InvalidSignatureComponent(_))
        ));
    }

    #[test]
    fn test_high_s_is_accepted() {
        // (r, n - s) with the other parity is the same signature
        let key = secret(EIP155_KEY);
        let digest = H256::repeat_byte(7);
        let signature = sign_hash(&key, &digest).unwrap();
        assert!(signature.is_low_s());
        let n = u256("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141");
        let flipped_v = if signature.v() == U256::from(27) { 28 } else { 27 };
        let flipped = TxSignature::new(U256::from(flipped_v), signature.r(), n - signature.s());
        assert!(!flipped.is_low_s());
        assert_eq!(Ok(address_from_secret(&key)), recover_hash(&digest, &flipped));
    }

    #[test]
    fn test_message_signature_differs_from_hash_signature() {
        let key = secret(EIP155_KEY);
        let data = b"some data";
        let message_signature = sign_message(&key, data).unwrap();
        let hash_signature = sign_hash(&key, &keccak256_bytes(data)).unwrap();
        assert_ne!(message_signature, hash_signature);
    }
}
