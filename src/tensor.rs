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

//! Tensor value model shared by inputs and outputs.
//!
//! A [`Datatype`] tags how the values of a tensor are represented on the
//! wire, and a [`Content`] holds the decoded values for exactly one such
//! tag. [`Input`] and [`Output`] are the named tensor descriptors that flow
//! through a [`Requester`](crate::requester::Requester).
//!
//! # Example
//!
//! ```rust
//! use models_requester::tensor::{Datatype, Input};
//!
//! let input = Input::from_texts("text", ["hello", "world"]);
//! assert_eq!(input.datatype, Datatype::Bytes);
//! assert_eq!(input.string_contents().unwrap()[0].len(), 2);
//! ```

use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Datatype
// ---------------------------------------------------------------------------

/// Tensor datatypes understood by the codec.
///
/// These map to the protocol strings `"BYTES"` and `"FP32"`. Any other
/// protocol datatype is rejected with [`Error::UnsupportedDatatype`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Datatype {
    /// Variable-length UTF-8 strings, length-prefixed on the wire.
    Bytes,
    /// IEEE 754 single-precision floating point.
    Fp32,
}

impl Datatype {
    /// Returns the protocol string representation of this datatype.
    ///
    /// # Example
    ///
    /// ```rust
    /// use models_requester::tensor::Datatype;
    /// assert_eq!(Datatype::Fp32.as_str(), "FP32");
    /// assert_eq!(Datatype::Bytes.as_str(), "BYTES");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bytes => "BYTES",
            Self::Fp32 => "FP32",
        }
    }

    /// Parses a protocol datatype string.
    ///
    /// Returns `None` for unknown strings and for protocol datatypes this
    /// crate does not decode (e.g. `"INT64"`).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "BYTES" => Some(Self::Bytes),
            "FP32" => Some(Self::Fp32),
            _ => None,
        }
    }

    /// Parses the datatype of the named tensor, failing with
    /// [`Error::UnsupportedDatatype`] when it is not supported.
    pub(crate) fn parse_for(tensor: &str, datatype: &str) -> Result<Self> {
        Self::parse(datatype).ok_or_else(|| Error::UnsupportedDatatype {
            tensor: tensor.to_owned(),
            datatype: datatype.to_owned(),
        })
    }
}

impl std::fmt::Display for Datatype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown datatype string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDatatypeError(String);

impl std::fmt::Display for ParseDatatypeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unsupported tensor datatype: {}", self.0)
    }
}

impl std::error::Error for ParseDatatypeError {}

impl std::str::FromStr for Datatype {
    type Err = ParseDatatypeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Datatype::parse(s).ok_or_else(|| ParseDatatypeError(s.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Content
// ---------------------------------------------------------------------------

/// Decoded values of one tensor segment (an input segment or an output row).
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// Values of a [`Datatype::Bytes`] tensor.
    Strings(Vec<String>),
    /// Values of a [`Datatype::Fp32`] tensor.
    Fp32(Vec<f32>),
}

impl Content {
    /// Returns the datatype this content was written with.
    #[must_use]
    pub fn datatype(&self) -> Datatype {
        match self {
            Self::Strings(_) => Datatype::Bytes,
            Self::Fp32(_) => Datatype::Fp32,
        }
    }

    /// Returns the number of values held.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Strings(v) => v.len(),
            Self::Fp32(v) => v.len(),
        }
    }

    /// Returns `true` when no values are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the string values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ContentMismatch`] if this content holds floats.
    pub fn as_strings(&self) -> Result<&[String]> {
        match self {
            Self::Strings(v) => Ok(v),
            other => Err(Error::ContentMismatch {
                requested: Datatype::Bytes,
                actual: other.datatype(),
            }),
        }
    }

    /// Returns the float values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ContentMismatch`] if this content holds strings.
    pub fn as_fp32(&self) -> Result<&[f32]> {
        match self {
            Self::Fp32(v) => Ok(v),
            other => Err(Error::ContentMismatch {
                requested: Datatype::Fp32,
                actual: other.datatype(),
            }),
        }
    }
}

impl From<Vec<String>> for Content {
    fn from(values: Vec<String>) -> Self {
        Self::Strings(values)
    }
}

impl From<Vec<f32>> for Content {
    fn from(values: Vec<f32>) -> Self {
        Self::Fp32(values)
    }
}

/// Fails unless `actual` is the datatype an accessor expects.
fn expect_datatype(tensor: &str, requested: Datatype, actual: Datatype) -> Result<()> {
    if requested == actual {
        Ok(())
    } else {
        Err(Error::UnsupportedDatatype {
            tensor: tensor.to_owned(),
            datatype: actual.as_str().to_owned(),
        })
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Describes an input tensor of an inference request.
///
/// The order of `contents` is significant. Only single-segment `BYTES`
/// inputs can currently be encoded; the wire shape is derived from the
/// content length, so `shape` is advisory.
#[derive(Debug, Clone, PartialEq)]
pub struct Input {
    /// The tensor name as defined in the model configuration.
    pub name: String,
    /// The element datatype.
    pub datatype: Datatype,
    /// Optional shape hint.
    pub shape: Option<Vec<i64>>,
    /// The tensor values.
    pub contents: Vec<Content>,
}

impl Input {
    /// Creates an input with no contents.
    #[must_use]
    pub fn new(name: impl Into<String>, datatype: Datatype) -> Self {
        Self {
            name: name.into(),
            datatype,
            shape: None,
            contents: Vec::new(),
        }
    }

    /// Creates a `BYTES` input holding one segment of texts.
    #[must_use]
    pub fn from_texts<I, S>(name: impl Into<String>, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, Datatype::Bytes)
            .with_content(Content::Strings(texts.into_iter().map(Into::into).collect()))
    }

    /// Sets the advisory shape.
    #[must_use]
    pub fn with_shape(self, shape: Vec<i64>) -> Self {
        Self {
            shape: Some(shape),
            ..self
        }
    }

    /// Appends a content segment.
    #[must_use]
    pub fn with_content(mut self, content: Content) -> Self {
        self.contents.push(content);
        self
    }

    /// Returns the string segments of this input.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedDatatype`] unless the input is `BYTES`, and
    /// [`Error::ContentMismatch`] if a segment holds another representation.
    pub fn string_contents(&self) -> Result<Vec<&[String]>> {
        expect_datatype(&self.name, Datatype::Bytes, self.datatype)?;
        self.contents.iter().map(Content::as_strings).collect()
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// A decoded output tensor of an inference response.
///
/// `shape` is the two-dimensional shape declared by the server and
/// `contents` holds one entry per row of that shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    /// The tensor name.
    pub name: String,
    /// The element datatype.
    pub datatype: Datatype,
    /// The declared `[rows, cols]` shape.
    pub shape: Vec<i64>,
    /// One content per row.
    pub contents: Vec<Content>,
}

impl Output {
    /// Returns the rows of an `FP32` output.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedDatatype`] unless the output is `FP32`.
    pub fn fp32_contents(&self) -> Result<Vec<&[f32]>> {
        expect_datatype(&self.name, Datatype::Fp32, self.datatype)?;
        self.contents.iter().map(Content::as_fp32).collect()
    }

    /// Returns the rows of a `BYTES` output.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedDatatype`] unless the output is `BYTES`.
    pub fn string_contents(&self) -> Result<Vec<&[String]>> {
        expect_datatype(&self.name, Datatype::Bytes, self.datatype)?;
        self.contents.iter().map(Content::as_strings).collect()
    }

    /// Parses every string of a `BYTES` output as a JSON record.
    ///
    /// Models that emit structured results (chunks, sparse embeddings)
    /// serialize each element as a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] naming the offending payload if any
    /// element fails to parse as `T`.
    pub fn json_contents<T: DeserializeOwned>(&self) -> Result<Vec<Vec<T>>> {
        self.string_contents()?
            .into_iter()
            .map(|row| {
                row.iter()
                    .map(|s| {
                        serde_json::from_str(s)
                            .map_err(|e| Error::Decode(format!("invalid JSON {s:?}: {e}")))
                    })
                    .collect()
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn datatype_round_trip() {
        for dt in [Datatype::Bytes, Datatype::Fp32] {
            assert_eq!(Datatype::parse(dt.as_str()), Some(dt));
            assert_eq!(dt.to_string(), dt.as_str());
        }
    }

    #[test]
    fn datatype_rejects_unsupported_protocol_types() {
        assert!(Datatype::parse("INT64").is_none());
        assert!(Datatype::parse("fp32").is_none());
        assert!("".parse::<Datatype>().is_err());

        let err = Datatype::parse_for("ids", "INT64").unwrap_err();
        assert!(matches!(
            &err,
            Error::UnsupportedDatatype { tensor, datatype } if tensor == "ids" && datatype == "INT64"
        ));
    }

    #[test]
    fn content_accessor_checks_tag() {
        let content = Content::Fp32(vec![0.5, 1.5]);
        assert_eq!(content.as_fp32().unwrap(), &[0.5, 1.5]);
        assert_eq!(content.len(), 2);

        let err = content.as_strings().unwrap_err();
        assert!(matches!(
            err,
            Error::ContentMismatch {
                requested: Datatype::Bytes,
                actual: Datatype::Fp32
            }
        ));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn input_from_texts() {
        let input = Input::from_texts("text", ["a", "b", "c"]).with_shape(vec![3]);
        assert_eq!(input.name, "text");
        assert_eq!(input.shape.as_deref(), Some(&[3][..]));
        let segments = input.string_contents().unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0], ["a", "b", "c"]);
    }

    #[test]
    fn input_string_contents_requires_bytes() {
        let input = Input::new("x", Datatype::Fp32).with_content(Content::Fp32(vec![1.0]));
        assert!(matches!(
            input.string_contents(),
            Err(Error::UnsupportedDatatype { .. })
        ));
    }

    #[test]
    fn output_fp32_rows() {
        let output = Output {
            name: "embedding".into(),
            datatype: Datatype::Fp32,
            shape: vec![2, 2],
            contents: vec![vec![1.0, 2.0].into(), vec![3.0, 4.0].into()],
        };
        let rows = output.fp32_contents().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], [1.0f32, 2.0]);
        assert_eq!(rows[1], [3.0f32, 4.0]);
        assert!(output.string_contents().is_err());
    }

    #[test]
    fn output_json_contents() {
        let output = Output {
            name: "embedding".into(),
            datatype: Datatype::Bytes,
            shape: vec![1, 2],
            contents: vec![Content::Strings(vec![
                r#"{"a": 0.5}"#.into(),
                r#"{"b": 1.0, "c": 2.0}"#.into(),
            ])],
        };
        let rows: Vec<Vec<HashMap<String, f32>>> = output.json_contents().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0]["a"], 0.5);
        assert_eq!(rows[0][1].len(), 2);
    }

    #[test]
    fn output_json_contents_reports_bad_payload() {
        let output = Output {
            name: "chunk".into(),
            datatype: Datatype::Bytes,
            shape: vec![1, 1],
            contents: vec![Content::Strings(vec!["not json".into()])],
        };
        let err = output.json_contents::<serde_json::Value>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(err.to_string().contains("not json"));
    }
}
