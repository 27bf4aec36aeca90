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

//! Inference server address.

use serde::{Deserialize, Serialize};

/// URL scheme of an inference server endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostScheme {
    /// Plaintext HTTP/2.
    #[default]
    Http,
    /// HTTP/2 over TLS.
    Https,
}

impl HostScheme {
    /// Returns the scheme as used in a URL.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl std::fmt::Display for HostScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Location of an inference server.
///
/// `url` is the bare host name or address, without scheme or port.
///
/// # Example
///
/// ```rust
/// use models_requester::host::{Host, HostScheme};
///
/// let host = Host::new("localhost", HostScheme::Http).with_port(8001);
/// assert_eq!(host.full_url(), "http://localhost:8001");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    /// Host name or address.
    pub url: String,
    /// URL scheme.
    #[serde(default)]
    pub scheme: HostScheme,
    /// Port, when not the scheme default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

impl Host {
    /// Creates a host without an explicit port.
    #[must_use]
    pub fn new(url: impl Into<String>, scheme: HostScheme) -> Self {
        Self {
            url: url.into(),
            scheme,
            port: None,
        }
    }

    /// Sets the port.
    #[must_use]
    pub fn with_port(self, port: u16) -> Self {
        Self {
            port: Some(port),
            ..self
        }
    }

    /// Returns `<scheme>://<url>` or `<scheme>://<url>:<port>`.
    #[must_use]
    pub fn full_url(&self) -> String {
        match self.port {
            Some(port) => format!("{}://{}:{port}", self.scheme, self.url),
            None => format!("{}://{}", self.scheme, self.url),
        }
    }
}

impl std::fmt::Display for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.full_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_without_port() {
        let host = Host::new("models.internal", HostScheme::Https);
        assert_eq!(host.full_url(), "https://models.internal");
    }

    #[test]
    fn url_with_port() {
        let host = Host::new("127.0.0.1", HostScheme::Http).with_port(8001);
        assert_eq!(host.full_url(), "http://127.0.0.1:8001");
        assert_eq!(host.to_string(), host.full_url());
    }

    #[test]
    fn deserializes_from_config() {
        let host: Host =
            serde_json::from_str(r#"{"url": "triton", "scheme": "https", "port": 443}"#).unwrap();
        assert_eq!(host.full_url(), "https://triton:443");

        let host: Host = serde_json::from_str(r#"{"url": "triton"}"#).unwrap();
        assert_eq!(host.scheme, HostScheme::Http);
        assert_eq!(host.port, None);
    }
}
