// SPDX-FileCopyrightText: 2023 Nomadic Labs <contact@nomadic-labs.com>
// SPDX-FileCopyrightText: 2023 Marigold <contact@marigold.dev>
//
// SPDX-License-Identifier: MIT

//! Module containing helper functions for RLP encoding/decoding.
//!
//! The item codec itself (strings, lists, canonical integers) is the `rlp`
//! crate; these helpers add the field-level conventions used by the
//! transaction envelopes: absent values encode as the empty string,
//! integers are minimal big-endian, and every field error is tagged with
//! the name of the field.

use primitive_types::U256;
use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpIterator, RlpStream};

pub fn next<'a, 'v>(decoder: &mut RlpIterator<'a, 'v>) -> Result<Rlp<'a>, DecoderError> {
    decoder.next().ok_or(DecoderError::RlpIncorrectListLen)
}

pub fn check_list(decoder: &Rlp<'_>, length: usize) -> Result<(), DecoderError> {
    if !decoder.is_list() {
        Err(DecoderError::RlpExpectedToBeList)
    } else if decoder.item_count() != Ok(length) {
        Err(DecoderError::RlpIncorrectListLen)
    } else {
        Ok(())
    }
}

pub fn decode_field<T: Decodable>(
    decoder: &Rlp<'_>,
    field_name: &'static str,
) -> Result<T, DecoderError> {
    let custom_err = |_: DecoderError| (DecoderError::Custom(field_name));
    decoder.as_val().map_err(custom_err)
}

pub fn decode_option<T: Decodable>(
    decoder: &Rlp<'_>,
    field_name: &'static str,
) -> Result<Option<T>, DecoderError> {
    if decoder.is_empty() {
        Ok(None)
    } else {
        let inner: T = decode_field(decoder, field_name)?;
        Ok(Some(inner))
    }
}

pub fn decode_list<T: Decodable>(
    decoder: &Rlp<'_>,
    field_name: &'static str,
) -> Result<Vec<T>, DecoderError> {
    let custom_err = |_: DecoderError| (DecoderError::Custom(field_name));
    if !decoder.is_list() {
        return Err(DecoderError::Custom(field_name));
    }
    decoder.as_list().map_err(custom_err)
}

/// Appends an optional value, falling back to the empty byte string.
pub fn append_option<'a, T: Encodable>(
    stream: &'a mut RlpStream,
    data: &Option<T>,
) -> &'a mut RlpStream {
    if let Some(value) = data {
        stream.append(value)
    } else {
        stream.append_empty_data()
    }
}

/// Appends an optional integer; absence and zero both encode as `0x80`.
pub fn append_u256_or_zero<'a>(
    stream: &'a mut RlpStream,
    data: &Option<U256>,
) -> &'a mut RlpStream {
    stream.append(&data.unwrap_or_default())
}

pub fn append_vec<'a>(stream: &'a mut RlpStream, data: &[u8]) -> &'a mut RlpStream {
    if data.is_empty() {
        stream.append_empty_data()
    } else {
        stream.append_iter(data.iter().copied())
    }
}

/// Total length (header plus payload) of the RLP item starting at
/// `bytes[0]`. Trailing bytes after the item are not inspected.
pub fn item_length(bytes: &[u8]) -> Result<usize, DecoderError> {
    if bytes.is_empty() {
        return Err(DecoderError::RlpIsTooShort);
    }
    let info = Rlp::new(bytes).payload_info()?;
    let total = info
        .header_len
        .checked_add(info.value_len)
        .ok_or(DecoderError::RlpIsTooBig)?;
    if total > bytes.len() {
        Err(DecoderError::RlpIsTooShort)
    } else {
        Ok(total)
    }
}

/// Decodes the leading item of `bytes` and returns it with the number of
/// bytes it spans.
pub fn decode_prefix<T: Decodable>(bytes: &[u8]) -> Result<(T, usize), DecoderError> {
    let length = item_length(bytes)?;
    let value = rlp::decode(&bytes[..length])?;
    Ok((value, length))
}
