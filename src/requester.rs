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

//! The requester: the capability surface through which callers run
//! inference, readiness checks and streaming inference.
//!
//! [`GrpcRequester`] builds a request from [`Input`] descriptors, performs
//! exactly one round trip over its [`InferenceTransport`] and decodes the
//! validated response into [`Output`] descriptors.
//!
//! # Example
//!
//! ```rust,no_run
//! # async fn example() -> models_requester::error::Result<()> {
//! use models_requester::host::{Host, HostScheme};
//! use models_requester::requester::{GrpcRequester, Requester};
//! use models_requester::tensor::Input;
//!
//! let host = Host::new("localhost", HostScheme::Http).with_port(8001);
//! let mut requester = GrpcRequester::connect(&host).await?;
//!
//! requester.health().await?;
//! requester.ready("embedder", "1").await?;
//!
//! let outputs = requester
//!     .infer(
//!         "embedder",
//!         "1",
//!         vec![Input::from_texts("text", ["hello world"])],
//!         &["embedding".to_owned()],
//!         "req-001",
//!     )
//!     .await?;
//! let embeddings = outputs[0].fp32_contents()?;
//! println!("{} dimensions", embeddings[0].len());
//!
//! requester.close();
//! # Ok(())
//! # }
//! ```

use std::pin::Pin;

use async_trait::async_trait;
use tokio_stream::{Stream, StreamExt};

use crate::error::{Error, Result};
use crate::generated::inference;
use crate::host::Host;
use crate::infer::{decode_stream_response, process_response, InferRequestBuilder, ModelIdentity};
use crate::tensor::{Input, Output};
use crate::transport::{ClientOptions, GrpcTransport, InferenceTransport, ResponseStream};

/// Lazy stream of text increments produced by [`Requester::stream`].
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Protocol operations exposed to callers, independent of transport.
///
/// Every operation is a complete request/response cycle; a failure of any
/// step fails the whole call. After [`close`](Requester::close) every
/// operation fails with [`Error::Closed`].
#[async_trait]
pub trait Requester: Send + Sync {
    /// Runs inference and returns one output per entry of `output_keys`,
    /// in the same order.
    ///
    /// Outputs are matched by name: the server must answer with exactly the
    /// requested outputs, and a requested key it does not return fails the
    /// call with [`Error::UnexpectedOutput`].
    ///
    /// `id` is the correlation id the server must echo. An empty `id` is
    /// replaced with a generated UUID.
    async fn infer(
        &self,
        model_name: &str,
        model_version: &str,
        inputs: Vec<Input>,
        output_keys: &[String],
        id: &str,
    ) -> Result<Vec<Output>>;

    /// Succeeds if the model version is ready to serve.
    async fn ready(&self, model_name: &str, model_version: &str) -> Result<()>;

    /// Succeeds if the server is ready to serve.
    async fn health(&self) -> Result<()>;

    /// Runs streaming inference and yields decoded text increments.
    ///
    /// The returned stream is finite and cannot be restarted.
    async fn stream(
        &self,
        model_name: &str,
        model_version: &str,
        inputs: Vec<Input>,
    ) -> Result<TextStream>;

    /// Releases the transport. Calling it again has no effect.
    fn close(&mut self);
}

/// [`Requester`] speaking the KServe v2 inference protocol.
///
/// Generic over the transport so the protocol logic can run against any
/// [`InferenceTransport`]; by default it uses [`GrpcTransport`].
#[derive(Debug)]
pub struct GrpcRequester<T = GrpcTransport> {
    transport: Option<T>,
    identity: ModelIdentity,
}

impl GrpcRequester<GrpcTransport> {
    /// Connects to the inference server at `host` with default options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the connection cannot be established.
    pub async fn connect(host: &Host) -> Result<Self> {
        Self::connect_with_options(host, ClientOptions::default()).await
    }

    /// Connects to the inference server at `host` with custom options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] for an invalid host and
    /// [`Error::Transport`] if the connection cannot be established.
    pub async fn connect_with_options(host: &Host, options: ClientOptions) -> Result<Self> {
        let transport = GrpcTransport::connect_with_options(&host.full_url(), &options).await?;
        Ok(Self::with_transport(transport).model_identity(options.model_identity))
    }
}

impl<T: InferenceTransport> GrpcRequester<T> {
    /// Creates a requester that owns `transport`.
    #[must_use]
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport: Some(transport),
            identity: ModelIdentity::default(),
        }
    }

    /// Sets how model name and version are placed on the wire.
    #[must_use]
    pub fn model_identity(self, identity: ModelIdentity) -> Self {
        Self { identity, ..self }
    }

    /// Returns `true` once [`close`](Requester::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.transport.is_none()
    }

    fn transport(&self) -> Result<&T> {
        self.transport.as_ref().ok_or(Error::Closed)
    }

    fn build_request(
        &self,
        model_name: &str,
        model_version: &str,
        inputs: Vec<Input>,
        output_keys: &[String],
        id: &str,
    ) -> Result<inference::ModelInferRequest> {
        InferRequestBuilder::new(model_name)
            .model_version(model_version)
            .request_id(id)
            .model_identity(self.identity)
            .inputs(inputs)
            .outputs(output_keys.iter().cloned())
            .build()
    }
}

#[async_trait]
impl<T: InferenceTransport> Requester for GrpcRequester<T> {
    async fn infer(
        &self,
        model_name: &str,
        model_version: &str,
        inputs: Vec<Input>,
        output_keys: &[String],
        id: &str,
    ) -> Result<Vec<Output>> {
        let transport = self.transport()?;
        let id = correlation_id(id);
        let request = self.build_request(model_name, model_version, inputs, output_keys, &id)?;

        tracing::debug!(
            model = model_name,
            version = model_version,
            %id,
            inputs = request.inputs.len(),
            outputs = request.outputs.len(),
            "sending inference request"
        );
        let response = transport.model_infer(request).await?;
        process_response(response, &id, output_keys)
    }

    async fn ready(&self, model_name: &str, model_version: &str) -> Result<()> {
        let transport = self.transport()?;
        let (name, version) = self.identity.wire_fields(model_name, model_version);
        let ready = transport
            .model_ready(inference::ModelReadyRequest { name, version })
            .await?;
        tracing::debug!(model = model_name, version = model_version, ready, "model readiness");
        if !ready {
            return Err(Error::ModelNotReady {
                model_name: model_name.to_owned(),
                model_version: model_version.to_owned(),
            });
        }
        Ok(())
    }

    async fn health(&self) -> Result<()> {
        let ready = self.transport()?.server_ready().await?;
        tracing::debug!(ready, "server readiness");
        if !ready {
            return Err(Error::ServerNotReady);
        }
        Ok(())
    }

    async fn stream(
        &self,
        model_name: &str,
        model_version: &str,
        inputs: Vec<Input>,
    ) -> Result<TextStream> {
        let transport = self.transport()?;
        let id = correlation_id("");
        let request = self.build_request(model_name, model_version, inputs, &[], &id)?;

        tracing::debug!(
            model = model_name,
            version = model_version,
            %id,
            "opening inference stream"
        );
        let responses = transport.model_stream_infer(request).await?;
        Ok(Box::pin(decode_text_stream(responses, id)))
    }

    fn close(&mut self) {
        if self.transport.take().is_some() {
            tracing::debug!("requester closed");
        }
    }
}

/// Returns `id`, or a fresh UUID when `id` is empty.
fn correlation_id(id: &str) -> String {
    if id.is_empty() {
        uuid::Uuid::new_v4().to_string()
    } else {
        id.to_owned()
    }
}

/// Decodes every streamed response, stopping at the first error.
fn decode_text_stream(
    mut responses: ResponseStream,
    id: String,
) -> impl Stream<Item = Result<String>> + Send {
    async_stream::try_stream! {
        while let Some(response) = responses.next().await {
            for text in decode_stream_response(response?, &id)? {
                yield text;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_correlation_id_is_generated() {
        let id = correlation_id("");
        assert_eq!(id.len(), 36);
        assert_ne!(id, correlation_id(""));
        assert_eq!(correlation_id("req-1"), "req-1");
    }
}
