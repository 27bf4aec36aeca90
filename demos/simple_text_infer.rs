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

//! Simple text inference example.
//!
//! Demonstrates connecting to an inference server, checking server and
//! model readiness, and running a text model whose output is a `BYTES`
//! tensor.
//!
//! This example assumes a server is running at `localhost:8001` with a
//! model named `tokenizer` that accepts a `BYTES` input `text` and produces
//! a `BYTES` output `tokens`.
//!
//! # Usage
//!
//! ```bash
//! RUST_LOG=models_requester=debug cargo run --example simple_text_infer
//! ```
//!
//! Optionally pass a host and port:
//!
//! ```bash
//! cargo run --example simple_text_infer -- inference-server 8001
//! ```

use models_requester::error::Result;
use models_requester::{GrpcRequester, Host, HostScheme, Input, Requester};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let url = args.next().unwrap_or_else(|| "localhost".to_owned());
    let port = args.next().and_then(|p| p.parse().ok()).unwrap_or(8001);
    let host = Host::new(url, HostScheme::Http).with_port(port);

    println!("Connecting to {host}...");
    let mut requester = GrpcRequester::connect(&host).await?;

    // -- Readiness -----------------------------------------------------------

    requester.health().await?;
    println!("Server ready");

    let model_name = "tokenizer";
    let model_version = "1";

    if let Err(e) = requester.ready(model_name, model_version).await {
        println!("{e}, skipping inference.");
        return Ok(());
    }
    println!("Model '{model_name}' v{model_version} ready");

    // -- Inference -----------------------------------------------------------

    let texts = ["The quick brown fox", "jumps over the lazy dog"];
    let outputs = requester
        .infer(
            model_name,
            model_version,
            vec![Input::from_texts("text", texts)],
            &["tokens".to_owned()],
            "example-001",
        )
        .await?;

    for output in &outputs {
        println!("Output: {} ({}) {:?}", output.name, output.datatype, output.shape);
        for (text, row) in texts.iter().zip(output.string_contents()?) {
            println!("  {text:?} -> {row:?}");
        }
    }

    requester.close();
    println!("\nDone!");
    Ok(())
}
