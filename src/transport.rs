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

//! Transport seam between the requester and the inference server.
//!
//! [`InferenceTransport`] is the set of RPCs the requester needs. The
//! production implementation, [`GrpcTransport`], wraps the generated tonic
//! client; tests substitute their own implementation.
//!
//! # Example
//!
//! ```rust,no_run
//! # async fn example() -> models_requester::error::Result<()> {
//! use std::time::Duration;
//! use models_requester::transport::{ClientOptions, GrpcTransport, InferenceTransport};
//!
//! let options = ClientOptions::default().request_timeout(Duration::from_secs(30));
//! let transport = GrpcTransport::connect_with_options("http://localhost:8001", &options).await?;
//! assert!(transport.server_ready().await?);
//! # Ok(())
//! # }
//! ```

use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use tokio_stream::{Stream, StreamExt};
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};

use crate::error::{Error, Result};
use crate::generated::inference::{
    self, grpc_inference_service_client::GrpcInferenceServiceClient,
};
use crate::infer::ModelIdentity;

/// Default maximum message size for gRPC (128 MiB).
const DEFAULT_MAX_MESSAGE_SIZE: usize = 128 * 1024 * 1024;

/// Stream of responses of a streaming inference call.
pub type ResponseStream =
    Pin<Box<dyn Stream<Item = Result<inference::ModelStreamInferResponse>> + Send>>;

/// HTTP/2 keep-alive ping settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct KeepAlive {
    pub(crate) interval: Duration,
    pub(crate) timeout: Duration,
}

/// Options for configuring the connection and protocol conventions.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use models_requester::infer::ModelIdentity;
/// use models_requester::transport::ClientOptions;
///
/// let options = ClientOptions::default()
///     .connect_timeout(Duration::from_secs(10))
///     .max_message_size(256 * 1024 * 1024)
///     .model_identity(ModelIdentity::Joined);
/// ```
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub(crate) connect_timeout: Option<Duration>,
    pub(crate) request_timeout: Option<Duration>,
    pub(crate) max_message_size: usize,
    pub(crate) keep_alive: Option<KeepAlive>,
    pub(crate) model_identity: ModelIdentity,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Some(Duration::from_secs(5)),
            request_timeout: None,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            keep_alive: None,
            model_identity: ModelIdentity::default(),
        }
    }
}

impl ClientOptions {
    /// Sets the timeout for establishing the initial connection.
    #[must_use]
    pub fn connect_timeout(self, timeout: Duration) -> Self {
        Self {
            connect_timeout: Some(timeout),
            ..self
        }
    }

    /// Sets the timeout applied by the channel to each individual RPC.
    #[must_use]
    pub fn request_timeout(self, timeout: Duration) -> Self {
        Self {
            request_timeout: Some(timeout),
            ..self
        }
    }

    /// Sets the maximum gRPC message size in bytes.
    ///
    /// Default: 128 MiB.
    #[must_use]
    pub fn max_message_size(self, size: usize) -> Self {
        Self {
            max_message_size: size,
            ..self
        }
    }

    /// Pings idle connections every `interval` and drops them when a ping
    /// is not acknowledged within `timeout`.
    ///
    /// Keeps long-running inference streams alive behind proxies that reap
    /// idle HTTP/2 connections. Disabled by default.
    #[must_use]
    pub fn keep_alive(self, interval: Duration, timeout: Duration) -> Self {
        Self {
            keep_alive: Some(KeepAlive { interval, timeout }),
            ..self
        }
    }

    /// Sets how model name and version are placed on the wire.
    #[must_use]
    pub fn model_identity(self, identity: ModelIdentity) -> Self {
        Self {
            model_identity: identity,
            ..self
        }
    }
}

/// The RPCs a requester performs against an inference server.
///
/// Implementations must be safe to call concurrently; the requester adds
/// no locking of its own.
#[async_trait]
pub trait InferenceTransport: Send + Sync {
    /// Performs a single inference round trip.
    async fn model_infer(
        &self,
        request: inference::ModelInferRequest,
    ) -> Result<inference::ModelInferResponse>;

    /// Returns whether the given model is ready.
    async fn model_ready(&self, request: inference::ModelReadyRequest) -> Result<bool>;

    /// Returns whether the server is ready.
    async fn server_ready(&self) -> Result<bool>;

    /// Sends one request over a streaming inference call.
    ///
    /// The default implementation fails with [`Error::Unsupported`].
    async fn model_stream_infer(
        &self,
        request: inference::ModelInferRequest,
    ) -> Result<ResponseStream> {
        let _ = request;
        Err(Error::Unsupported("streaming inference".into()))
    }
}

/// [`InferenceTransport`] over a tonic gRPC channel.
///
/// Cheaply cloneable: clones share the same underlying HTTP/2 channel.
#[derive(Debug, Clone)]
pub struct GrpcTransport {
    inner: GrpcInferenceServiceClient<Channel>,
}

impl GrpcTransport {
    /// Connects to the given URL with default options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the connection cannot be established.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_options(url, &ClientOptions::default()).await
    }

    /// Connects to the given URL with custom options.
    ///
    /// `https` URLs are secured with the platform's native root
    /// certificates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] for an invalid URL and
    /// [`Error::Transport`] if the connection cannot be established.
    pub async fn connect_with_options(url: &str, options: &ClientOptions) -> Result<Self> {
        let mut endpoint = Endpoint::from_shared(url.to_owned())
            .map_err(|e| Error::Connection(format!("invalid URL {url:?}: {e}")))?;

        if url.starts_with("https://") {
            endpoint = endpoint.tls_config(ClientTlsConfig::new().with_native_roots())?;
        }
        if let Some(timeout) = options.connect_timeout {
            endpoint = endpoint.connect_timeout(timeout);
        }
        if let Some(timeout) = options.request_timeout {
            endpoint = endpoint.timeout(timeout);
        }
        if let Some(KeepAlive { interval, timeout }) = options.keep_alive {
            endpoint = endpoint
                .keep_alive_while_idle(true)
                .http2_keep_alive_interval(interval)
                .keep_alive_timeout(timeout);
        }

        let channel = endpoint.connect().await?;
        tracing::debug!(%url, "connected to inference server");

        let inner = GrpcInferenceServiceClient::new(channel)
            .max_decoding_message_size(options.max_message_size)
            .max_encoding_message_size(options.max_message_size);

        Ok(Self { inner })
    }
}

#[async_trait]
impl InferenceTransport for GrpcTransport {
    async fn model_infer(
        &self,
        request: inference::ModelInferRequest,
    ) -> Result<inference::ModelInferResponse> {
        let response = self.inner.clone().model_infer(request).await?;
        Ok(response.into_inner())
    }

    async fn model_ready(&self, request: inference::ModelReadyRequest) -> Result<bool> {
        let response = self.inner.clone().model_ready(request).await?;
        Ok(response.into_inner().ready)
    }

    async fn server_ready(&self) -> Result<bool> {
        let response = self
            .inner
            .clone()
            .server_ready(inference::ServerReadyRequest {})
            .await?;
        Ok(response.into_inner().ready)
    }

    async fn model_stream_infer(
        &self,
        request: inference::ModelInferRequest,
    ) -> Result<ResponseStream> {
        let response = self
            .inner
            .clone()
            .model_stream_infer(tokio_stream::once(request))
            .await?;
        let stream = response
            .into_inner()
            .map(|result| result.map_err(Error::from));
        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_builder_overrides_defaults() {
        let options = ClientOptions::default()
            .request_timeout(Duration::from_secs(30))
            .max_message_size(1024)
            .keep_alive(Duration::from_secs(60), Duration::from_secs(20))
            .model_identity(ModelIdentity::Joined);

        assert_eq!(options.connect_timeout, Some(Duration::from_secs(5)));
        assert_eq!(options.request_timeout, Some(Duration::from_secs(30)));
        assert_eq!(options.max_message_size, 1024);
        assert_eq!(
            options.keep_alive,
            Some(KeepAlive {
                interval: Duration::from_secs(60),
                timeout: Duration::from_secs(20),
            })
        );
        assert_eq!(options.model_identity, ModelIdentity::Joined);
    }

    #[tokio::test]
    async fn invalid_url_is_a_connection_error() {
        let err = GrpcTransport::connect("not a url").await.unwrap_err();
        assert!(matches!(err, Error::Connection(_)));
    }
}
