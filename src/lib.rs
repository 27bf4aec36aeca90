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

//! Requester for tensor inference servers speaking the KServe v2 gRPC
//! protocol (as implemented by Triton Inference Server).
//!
//! The crate turns text inputs into `BYTES` tensors, performs one inference
//! round trip per call, validates the response against the request and
//! decodes `BYTES` and `FP32` outputs back into rows of strings or floats.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use models_requester::{GrpcRequester, Host, HostScheme, Input, Requester};
//!
//! # async fn example() -> models_requester::error::Result<()> {
//! let host = Host::new("localhost", HostScheme::Http).with_port(8001);
//! let requester = GrpcRequester::connect(&host).await?;
//!
//! requester.health().await?;
//! requester.ready("tokenizer", "1").await?;
//!
//! let outputs = requester
//!     .infer(
//!         "tokenizer",
//!         "1",
//!         vec![Input::from_texts("text", ["first sentence", "second sentence"])],
//!         &["tokens".to_owned()],
//!         "",
//!     )
//!     .await?;
//!
//! for row in outputs[0].string_contents()? {
//!     println!("{row:?}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`requester`] -- The [`Requester`] trait and its gRPC implementation.
//! - [`infer`] -- Request building and response validation.
//! - [`codec`] -- The `BYTES` and `FP32` wire encodings and 2-D reshaping.
//! - [`tensor`] -- Input and output tensor descriptors.
//! - [`transport`] -- The transport seam and connection options.
//! - [`host`] -- Server address configuration.
//! - [`error`] -- Error types and the [`Result`](error::Result) alias.
//! - [`generated`] -- Raw protobuf/gRPC generated types for advanced usage.

pub mod codec;
pub mod error;
pub mod generated;
pub mod host;
pub mod infer;
pub mod requester;
pub mod tensor;
pub mod transport;

pub use error::{Error, ErrorKind, Result};
pub use host::{Host, HostScheme};
pub use infer::{InferRequestBuilder, ModelIdentity};
pub use requester::{GrpcRequester, Requester, TextStream};
pub use tensor::{Content, Datatype, Input, Output};
pub use transport::{ClientOptions, GrpcTransport, InferenceTransport};
