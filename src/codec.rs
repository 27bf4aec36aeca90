// Copyright 2024-2026, NVIDIA CORPORATION & AFFILIATES. All rights reserved.
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions
// are met:
//  * Redistributions of source code must retain the above copyright
//    notice, this list of conditions and the following disclaimer.
//  * Redistributions in binary form must reproduce the above copyright
//    notice, this list of conditions and the following disclaimer in the
//    documentation and/or other materials provided with the distribution.
//  * Neither the name of NVIDIA CORPORATION nor the names of its
//    contributors may be used to endorse or promote products derived
//    from this software without specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS ``AS IS'' AND ANY
// EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR
// PURPOSE ARE DISCLAIMED.  IN NO EVENT SHALL THE COPYRIGHT OWNER OR
// CONTRIBUTORS BE LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL,
// EXEMPLARY, OR CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO,
// PROCUREMENT OF SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR
// PROFITS; OR BUSINESS INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY
// OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY, OR TORT
// (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
// OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

//! Tensor wire codec.
//!
//! `BYTES` tensors travel as a flat buffer in which every element is a
//! 4-byte little-endian length followed by that many UTF-8 bytes, with no
//! padding, separator or terminator. `FP32` tensors are a flat buffer of
//! little-endian IEEE 754 values. Both are row-major relative to the
//! declared shape, which [`reshape`] restores.
//!
//! # Example
//!
//! ```rust
//! use models_requester::codec::{decode_strings, encode_strings, reshape};
//!
//! let (raw, shape) = encode_strings(&["ab", "c"]).unwrap();
//! assert_eq!(raw, [2, 0, 0, 0, b'a', b'b', 1, 0, 0, 0, b'c']);
//! assert_eq!(shape, [2, 1]);
//!
//! let strings = decode_strings(&raw).unwrap();
//! let rows = reshape(strings, &shape).unwrap();
//! assert_eq!(rows, vec![vec!["ab".to_owned()], vec!["c".to_owned()]]);
//! ```

use crate::error::{Error, Result};

/// Size of a `BYTES` element length prefix.
const LENGTH_PREFIX: usize = 4;

/// Size of one `FP32` element.
const FP32_SIZE: usize = 4;

// ---------------------------------------------------------------------------
// BYTES
// ---------------------------------------------------------------------------

/// Encodes strings into a single-column `BYTES` tensor.
///
/// Returns the raw buffer and its `[len, 1]` shape. An empty slice yields an
/// empty buffer with shape `[0, 1]`.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if a string is longer than `u32::MAX`
/// bytes and so cannot be length-prefixed.
pub fn encode_strings<S: AsRef<str>>(strings: &[S]) -> Result<(Vec<u8>, [i64; 2])> {
    let capacity = strings
        .iter()
        .map(|s| LENGTH_PREFIX + s.as_ref().len())
        .sum();
    let mut raw = Vec::with_capacity(capacity);
    for s in strings {
        let bytes = s.as_ref().as_bytes();
        let len = u32::try_from(bytes.len()).map_err(|_| {
            Error::InvalidInput(format!(
                "string of {} bytes exceeds the BYTES element limit",
                bytes.len()
            ))
        })?;
        raw.extend_from_slice(&len.to_le_bytes());
        raw.extend_from_slice(bytes);
    }
    let rows = i64::try_from(strings.len())
        .map_err(|_| Error::InvalidInput(format!("{} elements overflow shape", strings.len())))?;
    tracing::trace!(elements = strings.len(), bytes = raw.len(), "encoded BYTES tensor");
    Ok((raw, [rows, 1]))
}

/// Decodes a `BYTES` tensor into its strings, in order.
///
/// # Errors
///
/// Returns [`Error::Truncated`] if the buffer ends inside a length prefix or
/// a payload, and [`Error::Decode`] if a payload is not valid UTF-8. No
/// partial result is returned in either case.
pub fn decode_strings(raw: &[u8]) -> Result<Vec<String>> {
    let mut strings = Vec::new();
    let mut offset = 0;
    while offset < raw.len() {
        let remaining = &raw[offset..];
        if remaining.len() < LENGTH_PREFIX {
            return Err(Error::Truncated {
                offset,
                needed: LENGTH_PREFIX,
                available: remaining.len(),
            });
        }
        let (prefix, rest) = remaining.split_at(LENGTH_PREFIX);
        let len = u32::from_le_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]) as usize;
        let payload = rest.get(..len).ok_or(Error::Truncated {
            offset: offset + LENGTH_PREFIX,
            needed: len,
            available: rest.len(),
        })?;
        let s = std::str::from_utf8(payload).map_err(|e| {
            Error::Decode(format!("element at offset {offset} is not valid UTF-8: {e}"))
        })?;
        strings.push(s.to_owned());
        offset += LENGTH_PREFIX + len;
    }
    tracing::trace!(elements = strings.len(), bytes = raw.len(), "decoded BYTES tensor");
    Ok(strings)
}

// ---------------------------------------------------------------------------
// FP32
// ---------------------------------------------------------------------------

/// Decodes an `FP32` tensor into a flat vector.
///
/// # Errors
///
/// Returns [`Error::Misaligned`] if the buffer length is not a multiple of 4.
pub fn decode_fp32(raw: &[u8]) -> Result<Vec<f32>> {
    if raw.len() % FP32_SIZE != 0 {
        return Err(Error::Misaligned { len: raw.len() });
    }
    Ok(raw
        .chunks_exact(FP32_SIZE)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

// ---------------------------------------------------------------------------
// Reshape
// ---------------------------------------------------------------------------

/// Largest row count accepted for a zero-width shape `[rows, 0]`.
///
/// Such a shape carries no elements, so the buffer length cannot bound it.
pub const MAX_EMPTY_ROWS: usize = 1 << 20;

/// Splits a flat row-major sequence into `rows` vectors of `cols` elements.
///
/// Elements are moved into the rows, not cloned. A shape of `[rows, 0]`
/// yields `rows` empty rows, up to [`MAX_EMPTY_ROWS`].
///
/// # Errors
///
/// Returns [`Error::UnsupportedRank`] unless `shape` has exactly two
/// dimensions, [`Error::InvalidShape`] for negative dimensions or a
/// zero-width shape with more than [`MAX_EMPTY_ROWS`] rows, and
/// [`Error::ShapeMismatch`] if `rows * cols` differs from `flat.len()`.
pub fn reshape<T>(flat: Vec<T>, shape: &[i64]) -> Result<Vec<Vec<T>>> {
    let &[rows, cols] = shape else {
        return Err(Error::UnsupportedRank {
            shape: shape.to_vec(),
        });
    };
    let (Ok(rows), Ok(cols)) = (usize::try_from(rows), usize::try_from(cols)) else {
        return Err(Error::InvalidShape {
            shape: shape.to_vec(),
        });
    };
    if cols == 0 && rows > MAX_EMPTY_ROWS {
        return Err(Error::InvalidShape {
            shape: shape.to_vec(),
        });
    }
    let expected = rows.checked_mul(cols).ok_or_else(|| Error::InvalidShape {
        shape: shape.to_vec(),
    })?;
    if expected != flat.len() {
        return Err(Error::ShapeMismatch {
            shape: shape.to_vec(),
            expected,
            actual: flat.len(),
        });
    }

    let mut elements = flat.into_iter();
    Ok((0..rows)
        .map(|_| elements.by_ref().take(cols).collect())
        .collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn strings_roundtrip_prop(strings in prop::collection::vec(any::<String>(), 0..16)) {
            let (raw, shape) = encode_strings(&strings).unwrap();
            prop_assert_eq!(shape, [strings.len() as i64, 1]);
            prop_assert_eq!(decode_strings(&raw).unwrap(), strings);
        }

        #[test]
        fn fp32_bits_roundtrip_prop(bits in prop::collection::vec(any::<u32>(), 0..64)) {
            let raw: Vec<u8> = bits
                .iter()
                .flat_map(|&b| f32::from_bits(b).to_le_bytes())
                .collect();
            let decoded: Vec<u32> = decode_fp32(&raw).unwrap().iter().map(|v| v.to_bits()).collect();
            prop_assert_eq!(decoded, bits);
        }

        #[test]
        fn reshape_flattens_back_prop(rows in 0usize..12, cols in 0usize..12) {
            let flat: Vec<usize> = (0..rows * cols).collect();
            let shape = [rows as i64, cols as i64];
            let reshaped = reshape(flat.clone(), &shape).unwrap();
            prop_assert_eq!(reshaped.len(), rows);
            prop_assert!(reshaped.iter().all(|row| row.len() == cols));
            prop_assert_eq!(reshaped.concat(), flat);
        }

        #[test]
        fn reshape_count_mismatch_prop(rows in 0usize..12, cols in 0usize..12, extra in 1usize..6) {
            let flat: Vec<usize> = (0..rows * cols + extra).collect();
            let err = reshape(flat, &[rows as i64, cols as i64]).unwrap_err();
            prop_assert!(matches!(err, Error::ShapeMismatch { .. }), "{:?}", err);
        }

        #[test]
        fn truncated_strings_prop(strings in prop::collection::vec(".{0,12}", 1..8)) {
            let (raw, _) = encode_strings(&strings).unwrap();
            let mut boundaries = vec![0];
            for s in &strings {
                let last = boundaries[boundaries.len() - 1];
                boundaries.push(last + LENGTH_PREFIX + s.len());
            }
            for cut in 0..raw.len() {
                let result = decode_strings(&raw[..cut]);
                if let Some(complete) = boundaries.iter().position(|&b| b == cut) {
                    prop_assert_eq!(result.unwrap(), &strings[..complete]);
                } else {
                    prop_assert!(
                        matches!(result, Err(Error::Truncated { .. })),
                        "cut at {}: {:?}",
                        cut,
                        result
                    );
                }
            }
        }
    }
}
