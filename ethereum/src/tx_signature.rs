// SPDX-FileCopyrightText: 2022-2023 TriliTech <contact@trili.tech>
//
// SPDX-License-Identifier: MIT

//! The `(V, R, S)` triple attached to a transaction or a message, and the
//! conversions between `V` and the raw secp256k1 recovery id.

use libsecp256k1::{RecoveryId, Signature};
use primitive_types::U256;
use rlp::{DecoderError, RlpIterator, RlpStream};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::rlp_helpers::{decode_field, next};

/// Length of the flattened `R || S || V` form.
pub const SIGNATURE_SIZE: usize = 65;

/// `V` offset of pre-EIP-155 legacy transactions and personal messages.
pub const LEGACY_V_OFFSET: u8 = 27;

/// `V` offset of EIP-155 legacy transactions, before adding `2 * chain_id`.
pub const EIP155_V_OFFSET: u8 = 35;

// secp256k1n / 2, as little-endian 64-bit limbs
const HALF_CURVE_ORDER: U256 = U256([
    0xdfe9_2f46_681b_20a0,
    0x5d57_6e73_57a4_501d,
    0xffff_ffff_ffff_ffff,
    0x7fff_ffff_ffff_ffff,
]);

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TxSignature {
    v: U256,
    r: U256,
    s: U256,
}

impl TxSignature {
    pub fn new(v: U256, r: U256, s: U256) -> Self {
        TxSignature { v, r, s }
    }

    pub fn v(&self) -> U256 {
        self.v
    }

    pub fn r(&self) -> U256 {
        self.r
    }

    pub fn s(&self) -> U256 {
        self.s
    }

    /// An all-zero triple stands for "no signature" in encodings.
    pub fn is_zero(&self) -> bool {
        self.v.is_zero() && self.r.is_zero() && self.s.is_zero()
    }

    /// True when `S` lies in the lower half of the curve order (EIP-2).
    pub fn is_low_s(&self) -> bool {
        self.s <= HALF_CURVE_ORDER
    }

    /// Builds the triple from a recoverable signature, with
    /// `V = recid + v_offset`.
    pub(crate) fn from_recoverable(
        signature: &Signature,
        recovery_id: RecoveryId,
        v_offset: U256,
    ) -> Result<Self, Error> {
        let parity: u8 = recovery_id.into();
        let v = v_offset
            .checked_add(U256::from(parity))
            .ok_or(Error::InvalidSignatureComponent("v overflows"))?;
        let bytes = signature.serialize();
        Ok(TxSignature {
            v,
            r: U256::from_big_endian(&bytes[..32]),
            s: U256::from_big_endian(&bytes[32..]),
        })
    }

    /// `R` and `S` as a secp256k1 signature; fails when either is not
    /// below the curve order.
    pub(crate) fn to_secp256k1(&self) -> Result<Signature, Error> {
        let mut bytes = [0u8; 64];
        self.r.to_big_endian(&mut bytes[..32]);
        self.s.to_big_endian(&mut bytes[32..]);
        Ok(Signature::parse_standard(&bytes)?)
    }

    /// Recovery id from a `V` that is either the bare parity or the parity
    /// shifted by 27.
    pub fn recovery_id(&self) -> Result<RecoveryId, Error> {
        let v = self.v;
        let parity = if v <= U256::one() {
            v.low_u32() as u8
        } else if v == U256::from(LEGACY_V_OFFSET) || v == U256::from(LEGACY_V_OFFSET + 1) {
            v.low_u32() as u8 - LEGACY_V_OFFSET
        } else {
            return Err(Error::InvalidSignatureComponent("v is neither 0, 1, 27 nor 28"));
        };
        Ok(RecoveryId::parse(parity)?)
    }

    /// Recovery id of a typed (EIP-2718) envelope, where `V` is the parity.
    pub fn typed_recovery_id(&self) -> Result<RecoveryId, Error> {
        if self.v > U256::one() {
            return Err(Error::InvalidSignatureComponent(
                "v of a typed transaction must be 0 or 1",
            ));
        }
        Ok(RecoveryId::parse(self.v.low_u32() as u8)?)
    }

    /// Recovery id of a legacy transaction, together with the chain id
    /// encoded in `V` when it follows EIP-155.
    pub fn legacy_recovery_id(&self) -> Result<(RecoveryId, Option<U256>), Error> {
        let offset = U256::from(EIP155_V_OFFSET);
        if self.v >= offset {
            let shifted = self.v - offset;
            let chain_id = shifted / 2;
            let parity = (shifted % 2).low_u32() as u8;
            Ok((RecoveryId::parse(parity)?, Some(chain_id)))
        } else {
            Ok((self.recovery_id()?, None))
        }
    }

    /// `V` offset for an EIP-155 signature: `35 + 2 * chain_id`.
    pub fn eip155_v_offset(chain_id: U256) -> Result<U256, Error> {
        chain_id
            .checked_mul(U256::from(2))
            .and_then(|c| c.checked_add(U256::from(EIP155_V_OFFSET)))
            .ok_or(Error::InvalidSignatureComponent(
                "chain id too large for EIP-155",
            ))
    }

    /// `R || S || V`, with `V` as a single byte.
    pub fn to_bytes(&self) -> Result<[u8; SIGNATURE_SIZE], Error> {
        if self.v > U256::from(u8::MAX) {
            return Err(Error::InvalidSignatureComponent("v does not fit in a byte"));
        }
        let mut bytes = [0u8; SIGNATURE_SIZE];
        self.r.to_big_endian(&mut bytes[..32]);
        self.s.to_big_endian(&mut bytes[32..64]);
        bytes[64] = self.v.low_u32() as u8;
        Ok(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != SIGNATURE_SIZE {
            return Err(Error::InvalidLength {
                expected: SIGNATURE_SIZE,
                actual: bytes.len(),
            });
        }
        Ok(TxSignature {
            r: U256::from_big_endian(&bytes[..32]),
            s: U256::from_big_endian(&bytes[32..64]),
            v: U256::from(bytes[64]),
        })
    }

    pub(crate) fn rlp_append(&self, stream: &mut RlpStream) {
        stream.append(&self.v);
        stream.append(&self.r);
        stream.append(&self.s);
    }
}

// Encode None as (0, 0, 0).
pub(crate) fn rlp_append_opt(sig: &Option<TxSignature>, stream: &mut RlpStream) {
    sig.unwrap_or_default().rlp_append(stream)
}

/// Reads the three trailing `V, R, S` fields of an envelope.
pub(crate) fn rlp_decode_vrs(
    it: &mut RlpIterator<'_, '_>,
) -> Result<TxSignature, DecoderError> {
    let v: U256 = decode_field(&next(it)?, "v")?;
    let r: U256 = decode_field(&next(it)?, "r")?;
    let s: U256 = decode_field(&next(it)?, "s")?;
    Ok(TxSignature { v, r, s })
}

// Decode (0, 0, 0) as None.
pub(crate) fn rlp_decode_opt(
    it: &mut RlpIterator<'_, '_>,
) -> Result<Option<TxSignature>, DecoderError> {
    let sig = rlp_decode_vrs(it)?;
    Ok(if sig.is_zero() { None } else { Some(sig) })
}

// Same as `rlp_decode_opt`, for envelopes where V is the bare parity.
pub(crate) fn rlp_decode_typed_opt(
    it: &mut RlpIterator<'_, '_>,
) -> Result<Option<TxSignature>, Error> {
    match rlp_decode_opt(it)? {
        Some(sig) if sig.v > U256::one() => Err(Error::InvalidSignatureComponent(
            "v of a typed transaction must be 0 or 1",
        )),
        sig => Ok(sig),
    }
}
