// SPDX-FileCopyrightText: 2022-2024 TriliTech <contact@trili.tech>
// SPDX-FileCopyrightText: 2023 Marigold <contact@marigold.dev>
// SPDX-FileCopyrightText: 2023 Nomadic Labs <contact@nomadic-labs.com>
//
// SPDX-License-Identifier: MIT

//! Transaction model and its wire envelopes.
//!
//! All the envelopes (Legacy, EIP-2930 and EIP-1559) are parsed to the
//! same [Transaction] type, signed or not. Every field is optional so that
//! an unset value can be told apart from an explicit zero until the
//! transaction is encoded.

use primitive_types::{H160, H256, U256};
use rlp::{DecoderError, Rlp, RlpStream};
use serde::{Deserialize, Serialize};

use crate::{
    access_list::{AccessList, AccessListItem},
    error::Error,
    json::bytes_hex,
    keccak::keccak256_bytes,
    rlp_helpers::{
        append_option, append_u256_or_zero, append_vec, decode_field, decode_list,
        decode_option, item_length, next,
    },
    transaction::TransactionType,
    tx_signature::{rlp_append_opt, rlp_decode_typed_opt, rlp_decode_vrs, TxSignature},
    types::strip_0x,
};

/// Fields written after the payload of an envelope.
enum Trailer {
    /// `V, R, S`, zeros when unsigned.
    Signature,
    /// `chain_id, 0, 0` of the EIP-155 signing pre-image.
    Eip155(U256),
    /// Nothing, as in the pre-EIP-155 and typed signing pre-images.
    Empty,
}

impl Trailer {
    fn len(&self) -> usize {
        match self {
            Trailer::Signature | Trailer::Eip155(_) => 3,
            Trailer::Empty => 0,
        }
    }
}

/// Data common to every kind of Ethereum transaction (transfers, contract
/// creation and contract invocation).
#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(rename = "type", default)]
    pub type_: TransactionType,
    /// Sender, filled in by signing or recovery. Never part of an encoding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<H160>,
    /// Recipient, `None` for a contract creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<H160>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<U256>,
    #[serde(rename = "gas", default, skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<U256>,
    /// Legacy and EIP-2930 only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
    #[serde(rename = "input", default, with = "bytes_hex")]
    pub data: Vec<u8>,
    /// Mandatory for typed envelopes. For legacy ones, `Some` non zero
    /// selects EIP-155 replay protection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<U256>,
    /// Typed envelopes only. For more information see
    /// `<https://eips.ethereum.org/EIPS/eip-2930>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_list: Option<AccessList>,
    /// EIP-1559 only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_priority_fee_per_gas: Option<U256>,
    /// EIP-1559 only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fee_per_gas: Option<U256>,
    /// If the transaction is unsigned then this field is None.
    #[serde(flatten)]
    pub signature: Option<TxSignature>,
}

impl Transaction {
    pub fn new(type_: TransactionType) -> Self {
        Transaction {
            type_,
            ..Transaction::default()
        }
    }

    pub fn with_from(mut self, from: H160) -> Self {
        self.from = Some(from);
        self
    }

    pub fn with_to(mut self, to: H160) -> Self {
        self.to = Some(to);
        self
    }

    pub fn with_nonce(mut self, nonce: impl Into<U256>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    pub fn with_gas_limit(mut self, gas_limit: impl Into<U256>) -> Self {
        self.gas_limit = Some(gas_limit.into());
        self
    }

    pub fn with_gas_price(mut self, gas_price: impl Into<U256>) -> Self {
        self.gas_price = Some(gas_price.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<U256>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_data(mut self, data: Vec<u8>) -> Self {
        self.data = data;
        self
    }

    pub fn with_chain_id(mut self, chain_id: impl Into<U256>) -> Self {
        self.chain_id = Some(chain_id.into());
        self
    }

    pub fn with_access_list(mut self, access_list: AccessList) -> Self {
        self.access_list = Some(access_list);
        self
    }

    pub fn with_max_priority_fee_per_gas(mut self, fee: impl Into<U256>) -> Self {
        self.max_priority_fee_per_gas = Some(fee.into());
        self
    }

    pub fn with_max_fee_per_gas(mut self, fee: impl Into<U256>) -> Self {
        self.max_fee_per_gas = Some(fee.into());
        self
    }

    pub fn with_signature(mut self, signature: TxSignature) -> Self {
        self.signature = Some(signature);
        self
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// Chain id of a legacy transaction that opts into EIP-155.
    pub(crate) fn eip155_chain_id(&self) -> Option<U256> {
        self.chain_id.filter(|c| !c.is_zero())
    }

    fn access_list_or_empty(&self) -> &[AccessListItem] {
        self.access_list.as_deref().unwrap_or_default()
    }

    fn rlp_encode_legacy(&self, stream: &mut RlpStream, trailer: &Trailer) {
        stream.begin_list(6 + trailer.len());
        append_u256_or_zero(stream, &self.nonce);
        append_u256_or_zero(stream, &self.gas_price);
        append_u256_or_zero(stream, &self.gas_limit);
        append_option(stream, &self.to);
        append_u256_or_zero(stream, &self.value);
        append_vec(stream, &self.data);
        self.rlp_encode_trailer(stream, trailer);
    }

    fn rlp_encode_eip2930(&self, stream: &mut RlpStream, trailer: &Trailer) {
        stream.begin_list(8 + trailer.len());
        append_u256_or_zero(stream, &self.chain_id);
        append_u256_or_zero(stream, &self.nonce);
        append_u256_or_zero(stream, &self.gas_price);
        append_u256_or_zero(stream, &self.gas_limit);
        append_option(stream, &self.to);
        append_u256_or_zero(stream, &self.value);
        append_vec(stream, &self.data);
        stream.append_list::<AccessListItem, _>(self.access_list_or_empty());
        self.rlp_encode_trailer(stream, trailer);
    }

    fn rlp_encode_eip1559(&self, stream: &mut RlpStream, trailer: &Trailer) {
        stream.begin_list(9 + trailer.len());
        append_u256_or_zero(stream, &self.chain_id);
        append_u256_or_zero(stream, &self.nonce);
        append_u256_or_zero(stream, &self.max_priority_fee_per_gas);
        append_u256_or_zero(stream, &self.max_fee_per_gas);
        append_u256_or_zero(stream, &self.gas_limit);
        append_option(stream, &self.to);
        append_u256_or_zero(stream, &self.value);
        append_vec(stream, &self.data);
        stream.append_list::<AccessListItem, _>(self.access_list_or_empty());
        self.rlp_encode_trailer(stream, trailer);
    }

    fn rlp_encode_trailer(&self, stream: &mut RlpStream, trailer: &Trailer) {
        match trailer {
            Trailer::Signature => rlp_append_opt(&self.signature, stream),
            Trailer::Eip155(chain_id) => {
                stream.append(chain_id);
                stream.append_empty_data();
                stream.append_empty_data();
            }
            Trailer::Empty => (),
        }
    }

    fn encode_with(&self, trailer: Trailer) -> Vec<u8> {
        let mut stream = RlpStream::new();
        match self.type_ {
            TransactionType::Legacy => self.rlp_encode_legacy(&mut stream, &trailer),
            TransactionType::AccessList => self.rlp_encode_eip2930(&mut stream, &trailer),
            TransactionType::DynamicFee => self.rlp_encode_eip1559(&mut stream, &trailer),
        }
        let rlp_enc = stream.out();
        if self.type_.is_typed() {
            let mut bytes = Vec::with_capacity(rlp_enc.len() + 1);
            bytes.push(u8::from(self.type_));
            bytes.extend_from_slice(&rlp_enc);
            bytes
        } else {
            rlp_enc.to_vec()
        }
    }

    /// Raw (wire) encoding. The signature fields are always present, as
    /// zeros when the transaction is unsigned.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.encode_with(Trailer::Signature)
    }

    /// Signing pre-image of a legacy transaction, given the chain id the
    /// signature commits to.
    pub(crate) fn legacy_signing_payload(&self, chain_id: Option<U256>) -> Vec<u8> {
        match chain_id.filter(|c| !c.is_zero()) {
            Some(chain_id) => self.encode_with(Trailer::Eip155(chain_id)),
            None => self.encode_with(Trailer::Empty),
        }
    }

    /// The bytes whose Keccak-256 is signed.
    pub fn signing_payload(&self) -> Vec<u8> {
        match self.type_ {
            TransactionType::Legacy => self.legacy_signing_payload(self.chain_id),
            _ => self.encode_with(Trailer::Empty),
        }
    }

    pub fn signing_hash(&self) -> H256 {
        keccak256_bytes(&self.signing_payload())
    }

    /// Transaction hash: Keccak-256 of the raw encoding.
    pub fn hash(&self) -> H256 {
        keccak256_bytes(&self.to_bytes())
    }

    // Accepts the signed 9 field form, the 6 field pre-EIP-155 pre-image
    // and the 9 field EIP-155 pre-image where `V` holds the chain id and
    // `R = S = 0`.
    fn rlp_decode_legacy(decoder: &Rlp) -> Result<Self, Error> {
        let count = decoder.item_count()?;
        if count != 6 && count != 9 {
            return Err(DecoderError::RlpIncorrectListLen.into());
        }
        let mut it = decoder.iter();
        let nonce: U256 = decode_field(&next(&mut it)?, "nonce")?;
        let gas_price: U256 = decode_field(&next(&mut it)?, "gas_price")?;
        let gas_limit: U256 = decode_field(&next(&mut it)?, "gas_limit")?;
        let to: Option<H160> = decode_option(&next(&mut it)?, "to")?;
        let value: U256 = decode_field(&next(&mut it)?, "value")?;
        let data: Vec<u8> = decode_field(&next(&mut it)?, "data")?;

        let (chain_id, signature) = if count == 6 {
            (None, None)
        } else {
            let sig = rlp_decode_vrs(&mut it)?;
            if sig.r().is_zero() && sig.s().is_zero() {
                // unsigned, `V` is the chain id of the EIP-155 pre-image
                let chain_id = if sig.v().is_zero() {
                    None
                } else {
                    Some(sig.v())
                };
                (chain_id, None)
            } else {
                let (_, chain_id) = sig.legacy_recovery_id()?;
                (chain_id, Some(sig))
            }
        };

        Ok(Transaction {
            type_: TransactionType::Legacy,
            from: None,
            to,
            nonce: Some(nonce),
            gas_limit: Some(gas_limit),
            gas_price: Some(gas_price),
            value: Some(value),
            data,
            chain_id,
            access_list: None,
            max_priority_fee_per_gas: None,
            max_fee_per_gas: None,
            signature,
        })
    }

    // It's either 8 fields for an unsigned tx or 11 fields for a signed one.
    fn rlp_decode_eip2930(decoder: &Rlp) -> Result<Self, Error> {
        let count = decoder.item_count()?;
        if count != 8 && count != 11 {
            return Err(DecoderError::RlpIncorrectListLen.into());
        }
        let mut it = decoder.iter();
        let chain_id: U256 = decode_field(&next(&mut it)?, "chain_id")?;
        let nonce: U256 = decode_field(&next(&mut it)?, "nonce")?;
        let gas_price: U256 = decode_field(&next(&mut it)?, "gas_price")?;
        let gas_limit: U256 = decode_field(&next(&mut it)?, "gas_limit")?;
        let to: Option<H160> = decode_option(&next(&mut it)?, "to")?;
        let value: U256 = decode_field(&next(&mut it)?, "value")?;
        let data: Vec<u8> = decode_field(&next(&mut it)?, "data")?;
        let access_list: AccessList = decode_list(&next(&mut it)?, "access_list")?;
        let signature = if count == 11 {
            rlp_decode_typed_opt(&mut it)?
        } else {
            None
        };

        Ok(Transaction {
            type_: TransactionType::AccessList,
            from: None,
            to,
            nonce: Some(nonce),
            gas_limit: Some(gas_limit),
            gas_price: Some(gas_price),
            value: Some(value),
            data,
            chain_id: Some(chain_id),
            access_list: Some(access_list),
            max_priority_fee_per_gas: None,
            max_fee_per_gas: None,
            signature,
        })
    }

    // It's either 9 fields for an unsigned tx or 12 fields for a signed one.
    fn rlp_decode_eip1559(decoder: &Rlp) -> Result<Self, Error> {
        let count = decoder.item_count()?;
        if count != 9 && count != 12 {
            return Err(DecoderError::RlpIncorrectListLen.into());
        }
        let mut it = decoder.iter();
        let chain_id: U256 = decode_field(&next(&mut it)?, "chain_id")?;
        let nonce: U256 = decode_field(&next(&mut it)?, "nonce")?;
        let max_priority_fee_per_gas: U256 =
            decode_field(&next(&mut it)?, "max_priority_fee_per_gas")?;
        let max_fee_per_gas: U256 = decode_field(&next(&mut it)?, "max_fee_per_gas")?;
        let gas_limit: U256 = decode_field(&next(&mut it)?, "gas_limit")?;
        let to: Option<H160> = decode_option(&next(&mut it)?, "to")?;
        let value: U256 = decode_field(&next(&mut it)?, "value")?;
        let data: Vec<u8> = decode_field(&next(&mut it)?, "data")?;
        let access_list: AccessList = decode_list(&next(&mut it)?, "access_list")?;
        let signature = if count == 12 {
            rlp_decode_typed_opt(&mut it)?
        } else {
            None
        };

        Ok(Transaction {
            type_: TransactionType::DynamicFee,
            from: None,
            to,
            nonce: Some(nonce),
            gas_limit: Some(gas_limit),
            gas_price: None,
            value: Some(value),
            data,
            chain_id: Some(chain_id),
            access_list: Some(access_list),
            max_priority_fee_per_gas: Some(max_priority_fee_per_gas),
            max_fee_per_gas: Some(max_fee_per_gas),
            signature,
        })
    }

    fn from_rlp_any(bytes: &[u8], type_: TransactionType) -> Result<Self, Error> {
        let decoder = Rlp::new(bytes);
        if !decoder.is_list() {
            return Err(DecoderError::RlpExpectedToBeList.into());
        }
        match type_ {
            TransactionType::Legacy => Self::rlp_decode_legacy(&decoder),
            TransactionType::AccessList => Self::rlp_decode_eip2930(&decoder),
            TransactionType::DynamicFee => Self::rlp_decode_eip1559(&decoder),
        }
    }

    /// Decodes the transaction at the start of `bytes` and returns it with
    /// the number of bytes it spans. Trailing bytes are left to the caller.
    ///
    /// A top-level RLP list is a legacy transaction; otherwise the first
    /// byte is the EIP-2718 type of the envelope.
    pub fn decode_prefix(bytes: &[u8]) -> Result<(Self, usize), Error> {
        let first = *bytes.first().ok_or(DecoderError::RlpIsTooShort)?;
        if first >= 0xc0 {
            let length = item_length(bytes)?;
            let tx = Self::from_rlp_any(&bytes[..length], TransactionType::Legacy)?;
            Ok((tx, length))
        } else if first >= 0x80 {
            Err(Error::InvalidEncodingMsg(
                "transaction is neither a list nor a typed envelope",
            ))
        } else {
            let type_ = TransactionType::try_from(first)?;
            if type_ == TransactionType::Legacy {
                return Err(Error::InvalidEncodingMsg(
                    "legacy transactions have no type byte",
                ));
            }
            let payload = &bytes[1..];
            let length = item_length(payload)?;
            let tx = Self::from_rlp_any(&payload[..length], type_)?;
            Ok((tx, length + 1))
        }
    }

    /// Decodes a whole raw transaction, trailing bytes are an error.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let (tx, consumed) = Self::decode_prefix(bytes)?;
        if consumed != bytes.len() {
            return Err(Error::InvalidEncodingMsg("trailing bytes after transaction"));
        }
        Ok(tx)
    }

    /// Decodes a hex encoded raw transaction, with or without `0x`.
    pub fn from_hex(s: &str) -> Result<Self, Error> {
        let bytes = hex::decode(strip_0x(s))?;
        Self::from_bytes(&bytes)
    }
}

impl TryFrom<&[u8]> for Transaction {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(bytes)
    }
}
