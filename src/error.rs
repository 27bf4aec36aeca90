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

//! Error types for the requester.
//!
//! This module defines [`Error`] -- the unified error type returned by all
//! fallible operations -- along with [`ErrorKind`], which groups variants
//! into the codec/protocol failure classes, and the [`Result`] alias used
//! throughout the crate.

/// Convenience alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Unsupported datatype, unsupported shape rank or element-count mismatch.
    Validation,
    /// A byte tensor ended in the middle of a length prefix or payload.
    Truncation,
    /// A float32 buffer length was not a multiple of 4.
    Alignment,
    /// The response does not match the request (id, output count, names).
    Protocol,
    /// A payload could not be parsed into text or a structured record.
    Decode,
    /// The operation is not implemented by the transport in use.
    Unsupported,
    /// The server reported the model or itself as not ready.
    Readiness,
    /// Connection, gRPC status or lifecycle failure.
    Transport,
}

/// Errors that may occur when talking to an inference server.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to establish a gRPC connection.
    #[error("connection error: {0}")]
    Connection(String),

    /// The gRPC transport layer returned an error.
    #[error("transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    /// The server returned a gRPC status error.
    #[error("gRPC error (code={code}): {message}")]
    Grpc {
        /// The gRPC status code.
        code: tonic::Code,
        /// The error message from the server.
        message: String,
    },

    /// The requester was used after [`close`](crate::requester::Requester::close).
    #[error("requester is closed")]
    Closed,

    /// A tensor carries a datatype this crate cannot encode or decode.
    #[error("unsupported datatype {datatype:?} for tensor {tensor:?}")]
    UnsupportedDatatype {
        /// Name of the offending tensor.
        tensor: String,
        /// The datatype as it appears on the wire.
        datatype: String,
    },

    /// A shape with a rank other than two was supplied for reshaping.
    #[error("shape must have exactly two dimensions, got {shape:?}")]
    UnsupportedRank {
        /// The offending shape.
        shape: Vec<i64>,
    },

    /// A shape contains a dimension that cannot describe a row-major array.
    #[error("invalid shape {shape:?}: dimensions must be non-negative")]
    InvalidShape {
        /// The offending shape.
        shape: Vec<i64>,
    },

    /// The number of elements does not match the declared shape.
    #[error("shape {shape:?} requires {expected} elements, got {actual}")]
    ShapeMismatch {
        /// The declared shape.
        shape: Vec<i64>,
        /// `rows * cols`.
        expected: usize,
        /// Number of decoded elements.
        actual: usize,
    },

    /// An input tensor was constructed with invalid parameters.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A content value was read through an accessor of another datatype.
    #[error("content holds {actual} values, but {requested} was requested")]
    ContentMismatch {
        /// The datatype the accessor expects.
        requested: crate::tensor::Datatype,
        /// The datatype the content was written with.
        actual: crate::tensor::Datatype,
    },

    /// A byte tensor ended before a length prefix or payload was complete.
    #[error("byte tensor truncated at offset {offset}: needed {needed} bytes, {available} available")]
    Truncated {
        /// Offset at which the incomplete read started.
        offset: usize,
        /// Bytes required to complete the read.
        needed: usize,
        /// Bytes left in the buffer.
        available: usize,
    },

    /// A float32 buffer length is not a multiple of 4.
    #[error("float32 tensor has {len} bytes, which is not a multiple of 4")]
    Misaligned {
        /// Length of the offending buffer.
        len: usize,
    },

    /// The response id does not echo the request id.
    #[error("unexpected response id {actual:?}, expected {expected:?}")]
    CorrelationMismatch {
        /// Id sent with the request.
        expected: String,
        /// Id found in the response.
        actual: String,
    },

    /// The response carries a different number of outputs than requested.
    #[error("expected {expected} outputs, got {actual}")]
    OutputCountMismatch {
        /// Number of requested outputs.
        expected: usize,
        /// Number of outputs in the response.
        actual: usize,
    },

    /// A requested output is missing from the response.
    #[error("response has no output named {0:?}")]
    UnexpectedOutput(String),

    /// A payload could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// The requested operation is not implemented.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// The requested model is not in a ready state on the server.
    #[error("model not ready: {model_name} (version: {model_version})")]
    ModelNotReady {
        /// Name of the model that was not ready.
        model_name: String,
        /// Version of the model that was not ready.
        model_version: String,
    },

    /// The server itself is not in a ready state.
    #[error("server not ready")]
    ServerNotReady,

    /// A streaming inference response contained an error message.
    #[error("stream inference error: {0}")]
    StreamInference(String),

    /// The server returned a response that could not be interpreted.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl Error {
    /// Returns the failure class of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedDatatype { .. }
            | Self::UnsupportedRank { .. }
            | Self::InvalidShape { .. }
            | Self::ShapeMismatch { .. }
            | Self::InvalidInput(_)
            | Self::ContentMismatch { .. } => ErrorKind::Validation,
            Self::Truncated { .. } => ErrorKind::Truncation,
            Self::Misaligned { .. } => ErrorKind::Alignment,
            Self::CorrelationMismatch { .. }
            | Self::OutputCountMismatch { .. }
            | Self::UnexpectedOutput(_)
            | Self::StreamInference(_)
            | Self::UnexpectedResponse(_) => ErrorKind::Protocol,
            Self::Decode(_) => ErrorKind::Decode,
            Self::Unsupported(_) => ErrorKind::Unsupported,
            Self::ModelNotReady { .. } | Self::ServerNotReady => ErrorKind::Readiness,
            Self::Connection(_) | Self::Transport(_) | Self::Grpc { .. } | Self::Closed => {
                ErrorKind::Transport
            }
        }
    }
}

impl From<tonic::Status> for Error {
    fn from(status: tonic::Status) -> Self {
        Self::Grpc {
            code: status.code(),
            message: status.message().to_owned(),
        }
    }
}
