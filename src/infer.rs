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

//! Request building and response processing.
//!
//! [`InferRequestBuilder`] turns [`Input`] descriptors into a wire
//! [`inference::ModelInferRequest`], encoding each input into
//! `raw_input_contents` at the same index as its tensor metadata.
//! [`process_response`] validates a [`inference::ModelInferResponse`]
//! against the request and decodes it back into [`Output`] descriptors.
//!
//! # Example
//!
//! ```rust
//! use models_requester::infer::InferRequestBuilder;
//! use models_requester::tensor::Input;
//!
//! let request = InferRequestBuilder::new("embedder")
//!     .model_version("1")
//!     .request_id("req-001")
//!     .input(Input::from_texts("text", ["hello", "world"]))
//!     .output("embedding")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(request.inputs[0].shape, [2, 1]);
//! assert_eq!(request.raw_input_contents.len(), 1);
//! ```

use crate::codec::{decode_fp32, decode_strings, encode_strings, reshape};
use crate::error::{Error, Result};
use crate::generated::inference::{
    self,
    model_infer_request::{InferInputTensor, InferRequestedOutputTensor},
    model_infer_response::InferOutputTensor,
};
use crate::tensor::{Content, Datatype, Input, Output};

// ---------------------------------------------------------------------------
// ModelIdentity
// ---------------------------------------------------------------------------

/// How the model name and version are placed on the wire.
///
/// Servers that host every model of several repositories in a single
/// namespace address versions through the model name instead of the
/// version field. Pick the convention the target deployment expects; it is
/// applied to inference and readiness requests alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ModelIdentity {
    /// `model_name` and `model_version` are sent in their own fields.
    #[default]
    Separate,
    /// `model_name` is sent as `"<name>:<version>"` and `model_version`
    /// is pinned to `"1"`.
    Joined,
}

impl ModelIdentity {
    /// Version sent when the version is folded into the model name.
    pub const JOINED_VERSION: &'static str = "1";

    /// Returns the `(model_name, model_version)` wire fields.
    ///
    /// # Example
    ///
    /// ```rust
    /// use models_requester::infer::ModelIdentity;
    ///
    /// assert_eq!(
    ///     ModelIdentity::Joined.wire_fields("ranker", "2"),
    ///     ("ranker:2".to_owned(), "1".to_owned())
    /// );
    /// ```
    #[must_use]
    pub fn wire_fields(self, model_name: &str, model_version: &str) -> (String, String) {
        match self {
            Self::Separate => (model_name.to_owned(), model_version.to_owned()),
            Self::Joined => (
                format!("{model_name}:{model_version}"),
                Self::JOINED_VERSION.to_owned(),
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// InferRequestBuilder
// ---------------------------------------------------------------------------

/// Builder for [`inference::ModelInferRequest`] messages.
///
/// Inputs keep the order in which they are added; outputs are requested by
/// name only, without a datatype hint.
#[derive(Debug)]
pub struct InferRequestBuilder {
    model_name: String,
    model_version: String,
    request_id: String,
    identity: ModelIdentity,
    inputs: Vec<Input>,
    outputs: Vec<String>,
}

impl InferRequestBuilder {
    /// Creates a new builder targeting the specified model.
    #[must_use]
    pub fn new(model_name: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            model_version: String::new(),
            request_id: String::new(),
            identity: ModelIdentity::default(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Sets the model version to use for inference.
    #[must_use]
    pub fn model_version(self, version: impl Into<String>) -> Self {
        Self {
            model_version: version.into(),
            ..self
        }
    }

    /// Sets the correlation id the server must echo in its response.
    #[must_use]
    pub fn request_id(self, id: impl Into<String>) -> Self {
        Self {
            request_id: id.into(),
            ..self
        }
    }

    /// Sets how the model name and version are placed on the wire.
    #[must_use]
    pub fn model_identity(self, identity: ModelIdentity) -> Self {
        Self { identity, ..self }
    }

    /// Adds an input tensor to the request.
    #[must_use]
    pub fn input(mut self, input: Input) -> Self {
        self.inputs.push(input);
        self
    }

    /// Adds multiple input tensors to the request.
    #[must_use]
    pub fn inputs(mut self, inputs: impl IntoIterator<Item = Input>) -> Self {
        self.inputs.extend(inputs);
        self
    }

    /// Adds a requested output by name.
    #[must_use]
    pub fn output(mut self, name: impl Into<String>) -> Self {
        self.outputs.push(name.into());
        self
    }

    /// Adds multiple requested outputs by name.
    #[must_use]
    pub fn outputs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outputs.extend(names.into_iter().map(Into::into));
        self
    }

    /// Consumes the builder and produces a [`inference::ModelInferRequest`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedDatatype`] for inputs that are not
    /// `BYTES`, and [`Error::InvalidInput`] or [`Error::ContentMismatch`]
    /// for inputs without exactly one string segment.
    pub fn build(self) -> Result<inference::ModelInferRequest> {
        let mut input_tensors = Vec::with_capacity(self.inputs.len());
        let mut raw_input_contents = Vec::with_capacity(self.inputs.len());

        for input in self.inputs {
            let (tensor, raw) = encode_input(input)?;
            input_tensors.push(tensor);
            raw_input_contents.push(raw);
        }

        let output_tensors = self
            .outputs
            .into_iter()
            .map(|name| InferRequestedOutputTensor {
                name,
                parameters: Default::default(),
            })
            .collect();

        let (model_name, model_version) = self
            .identity
            .wire_fields(&self.model_name, &self.model_version);

        Ok(inference::ModelInferRequest {
            model_name,
            model_version,
            id: self.request_id,
            parameters: Default::default(),
            inputs: input_tensors,
            outputs: output_tensors,
            raw_input_contents,
        })
    }
}

/// Encodes one input into its wire metadata and raw buffer.
fn encode_input(input: Input) -> Result<(InferInputTensor, Vec<u8>)> {
    let texts = match input.datatype {
        Datatype::Bytes => match input.contents.as_slice() {
            [content] => content.as_strings()?,
            [] => {
                return Err(Error::InvalidInput(format!(
                    "input {:?} has no contents",
                    input.name
                )))
            }
            segments => {
                return Err(Error::InvalidInput(format!(
                    "input {:?} has {} content segments, only one is supported",
                    input.name,
                    segments.len()
                )))
            }
        },
        Datatype::Fp32 => {
            return Err(Error::UnsupportedDatatype {
                tensor: input.name,
                datatype: input.datatype.as_str().to_owned(),
            })
        }
    };

    let (raw, shape) = encode_strings(texts)?;
    if let Some(hint) = input.shape.as_deref().filter(|hint| *hint != shape) {
        tracing::debug!(
            input = %input.name,
            ?hint,
            ?shape,
            "advisory input shape differs from encoded shape"
        );
    }

    let tensor = InferInputTensor {
        name: input.name,
        datatype: Datatype::Bytes.as_str().to_owned(),
        shape: shape.to_vec(),
        parameters: Default::default(),
        contents: None, // Data travels in raw_input_contents.
    };
    Ok((tensor, raw))
}

// ---------------------------------------------------------------------------
// Response processing
// ---------------------------------------------------------------------------

/// Validates an inference response and decodes its outputs.
///
/// The returned outputs are index-aligned with `output_keys`.
///
/// # Errors
///
/// Returns [`Error::CorrelationMismatch`] if the response id differs from
/// `request_id`, [`Error::OutputCountMismatch`] if the response does not
/// carry exactly one tensor and one buffer per requested output,
/// [`Error::UnexpectedOutput`] if a requested name is missing, and any
/// codec error raised while decoding. No partial result is returned.
pub fn process_response(
    response: inference::ModelInferResponse,
    request_id: &str,
    output_keys: &[String],
) -> Result<Vec<Output>> {
    check_correlation(request_id, &response.id)?;

    let expected = output_keys.len();
    let actual = response.raw_output_contents.len();
    if actual != expected || response.outputs.len() != actual {
        tracing::warn!(
            expected,
            raw = actual,
            tensors = response.outputs.len(),
            "response output count does not match request"
        );
        return Err(Error::OutputCountMismatch {
            expected,
            actual: actual.min(response.outputs.len()),
        });
    }

    let mut pairs: Vec<Option<(InferOutputTensor, Vec<u8>)>> = response
        .outputs
        .into_iter()
        .zip(response.raw_output_contents)
        .map(Some)
        .collect();

    output_keys
        .iter()
        .map(|key| {
            let (metadata, raw) = pairs
                .iter_mut()
                .find(|pair| matches!(pair, Some((metadata, _)) if metadata.name == *key))
                .and_then(Option::take)
                .ok_or_else(|| Error::UnexpectedOutput(key.clone()))?;
            decode_output(metadata, &raw)
        })
        .collect()
}

/// Decodes one streamed response into the strings of its `BYTES` outputs.
///
/// Every output of the response is decoded with the length-prefixed
/// `BYTES` convention and its strings are returned in output order.
///
/// # Errors
///
/// Returns [`Error::StreamInference`] if the server reported an error,
/// [`Error::UnexpectedResponse`] if the message has no response body,
/// [`Error::CorrelationMismatch`] on an id mismatch and
/// [`Error::UnsupportedDatatype`] for outputs that are not `BYTES`.
pub fn decode_stream_response(
    response: inference::ModelStreamInferResponse,
    request_id: &str,
) -> Result<Vec<String>> {
    if !response.error_message.is_empty() {
        return Err(Error::StreamInference(response.error_message));
    }
    let response = response.infer_response.ok_or_else(|| {
        Error::UnexpectedResponse("stream response has no infer_response".into())
    })?;
    check_correlation(request_id, &response.id)?;

    if response.outputs.len() != response.raw_output_contents.len() {
        return Err(Error::OutputCountMismatch {
            expected: response.outputs.len(),
            actual: response.raw_output_contents.len(),
        });
    }

    let mut texts = Vec::new();
    for (metadata, raw) in response.outputs.iter().zip(&response.raw_output_contents) {
        match Datatype::parse_for(&metadata.name, &metadata.datatype)? {
            Datatype::Bytes => texts.extend(decode_strings(raw)?),
            Datatype::Fp32 => {
                return Err(Error::UnsupportedDatatype {
                    tensor: metadata.name.clone(),
                    datatype: metadata.datatype.clone(),
                })
            }
        }
    }
    Ok(texts)
}

fn check_correlation(expected: &str, actual: &str) -> Result<()> {
    if expected == actual {
        return Ok(());
    }
    tracing::warn!(expected, actual, "response id does not match request id");
    Err(Error::CorrelationMismatch {
        expected: expected.to_owned(),
        actual: actual.to_owned(),
    })
}

/// Decodes a raw output buffer according to its declared datatype and shape.
fn decode_output(metadata: InferOutputTensor, raw: &[u8]) -> Result<Output> {
    let datatype = Datatype::parse_for(&metadata.name, &metadata.datatype)?;
    let contents = match datatype {
        Datatype::Fp32 => reshape(decode_fp32(raw)?, &metadata.shape)?
            .into_iter()
            .map(Content::Fp32)
            .collect(),
        Datatype::Bytes => reshape(decode_strings(raw)?, &metadata.shape)?
            .into_iter()
            .map(Content::Strings)
            .collect(),
    };
    tracing::trace!(
        output = %metadata.name,
        %datatype,
        shape = ?metadata.shape,
        bytes = raw.len(),
        "decoded output"
    );
    Ok(Output {
        name: metadata.name,
        datatype,
        shape: metadata.shape,
        contents,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn fp32_bytes(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    fn output_tensor(name: &str, datatype: &str, shape: Vec<i64>) -> InferOutputTensor {
        InferOutputTensor {
            name: name.into(),
            datatype: datatype.into(),
            shape,
            parameters: Default::default(),
            contents: None,
        }
    }

    fn response(
        id: &str,
        outputs: Vec<InferOutputTensor>,
        raw: Vec<Vec<u8>>,
    ) -> inference::ModelInferResponse {
        inference::ModelInferResponse {
            model_name: "model".into(),
            model_version: "1".into(),
            id: id.into(),
            parameters: Default::default(),
            outputs,
            raw_output_contents: raw,
        }
    }

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|&n| n.to_owned()).collect()
    }

    #[test]
    fn builder_encodes_inputs_in_order() {
        let request = InferRequestBuilder::new("ranker")
            .model_version("2")
            .request_id("req-7")
            .inputs([
                Input::from_texts("query", ["q", "q"]),
                Input::from_texts("passage", ["first passage", "second"]),
            ])
            .output("score")
            .build()
            .unwrap();

        assert_eq!(request.model_name, "ranker");
        assert_eq!(request.model_version, "2");
        assert_eq!(request.id, "req-7");
        assert_eq!(request.inputs.len(), 2);
        assert_eq!(request.raw_input_contents.len(), 2);
        assert_eq!(request.inputs[0].name, "query");
        assert_eq!(request.inputs[1].name, "passage");
        assert_eq!(request.inputs[1].datatype, "BYTES");
        assert_eq!(request.inputs[1].shape, [2, 1]);
        assert_eq!(
            decode_strings(&request.raw_input_contents[1]).unwrap(),
            ["first passage", "second"]
        );
        assert_eq!(request.outputs.len(), 1);
        assert_eq!(request.outputs[0].name, "score");
        assert!(request.outputs[0].parameters.is_empty());
    }

    #[test]
    fn builder_ignores_advisory_shape() {
        let request = InferRequestBuilder::new("embedder")
            .input(Input::from_texts("text", ["a", "b", "c"]).with_shape(vec![3]))
            .build()
            .unwrap();
        assert_eq!(request.inputs[0].shape, [3, 1]);
    }

    #[test]
    fn builder_joined_identity() {
        let request = InferRequestBuilder::new("embedder")
            .model_version("3")
            .model_identity(ModelIdentity::Joined)
            .build()
            .unwrap();
        assert_eq!(request.model_name, "embedder:3");
        assert_eq!(request.model_version, "1");
    }

    #[test]
    fn builder_rejects_fp32_input() {
        let input = Input::new("features", Datatype::Fp32).with_content(Content::Fp32(vec![1.0]));
        let err = InferRequestBuilder::new("m").input(input).build().unwrap_err();
        assert!(matches!(
            &err,
            Error::UnsupportedDatatype { tensor, datatype } if tensor == "features" && datatype == "FP32"
        ));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn builder_requires_single_segment() {
        let empty = Input::new("text", Datatype::Bytes);
        assert!(matches!(
            InferRequestBuilder::new("m").input(empty).build(),
            Err(Error::InvalidInput(_))
        ));

        let two = Input::from_texts("text", ["a"]).with_content(Content::Strings(vec!["b".into()]));
        assert!(matches!(
            InferRequestBuilder::new("m").input(two).build(),
            Err(Error::InvalidInput(_))
        ));

        let mismatched = Input::new("text", Datatype::Bytes).with_content(Content::Fp32(vec![]));
        assert!(matches!(
            InferRequestBuilder::new("m").input(mismatched).build(),
            Err(Error::ContentMismatch { .. })
        ));
    }

    #[test]
    fn builder_empty_text_list() {
        let request = InferRequestBuilder::new("m")
            .input(Input::from_texts("text", Vec::<String>::new()))
            .build()
            .unwrap();
        assert_eq!(request.inputs[0].shape, [0, 1]);
        assert!(request.raw_input_contents[0].is_empty());
    }

    #[test]
    fn process_fp32_output() {
        let resp = response(
            "req-1",
            vec![output_tensor("embedding", "FP32", vec![2, 3])],
            vec![fp32_bytes(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0])],
        );
        let outputs = process_response(resp, "req-1", &keys(&["embedding"])).unwrap();
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].name, "embedding");
        assert_eq!(outputs[0].datatype, Datatype::Fp32);
        assert_eq!(outputs[0].shape, [2, 3]);
        assert_eq!(
            outputs[0].contents,
            vec![
                Content::Fp32(vec![1.0, 2.0, 3.0]),
                Content::Fp32(vec![4.0, 5.0, 6.0])
            ]
        );
    }

    #[test]
    fn process_bytes_output() {
        let (raw, _) = encode_strings(&["a", "b", "c", "d"]).unwrap();
        let resp = response(
            "id",
            vec![output_tensor("chunk", "BYTES", vec![2, 2])],
            vec![raw],
        );
        let outputs = process_response(resp, "id", &keys(&["chunk"])).unwrap();
        let rows = outputs[0].string_contents().unwrap();
        assert_eq!(rows[0], ["a", "b"]);
        assert_eq!(rows[1], ["c", "d"]);
    }

    #[test]
    fn process_aligns_outputs_with_requested_names() {
        let (raw_text, _) = encode_strings(&["x"]).unwrap();
        let resp = response(
            "id",
            vec![
                output_tensor("label", "BYTES", vec![1, 1]),
                output_tensor("score", "FP32", vec![1, 1]),
            ],
            vec![raw_text, fp32_bytes(&[0.25])],
        );
        let outputs = process_response(resp, "id", &keys(&["score", "label"])).unwrap();
        assert_eq!(outputs[0].name, "score");
        assert_eq!(outputs[0].fp32_contents().unwrap()[0], [0.25]);
        assert_eq!(outputs[1].name, "label");
    }

    #[test]
    fn process_rejects_correlation_mismatch() {
        let resp = response(
            "req-2",
            vec![output_tensor("score", "FP32", vec![1, 1])],
            vec![fp32_bytes(&[1.0])],
        );
        let err = process_response(resp, "req-1", &keys(&["score"])).unwrap_err();
        assert!(matches!(
            &err,
            Error::CorrelationMismatch { expected, actual } if expected == "req-1" && actual == "req-2"
        ));
        assert_eq!(err.kind(), ErrorKind::Protocol);
    }

    #[test]
    fn process_rejects_count_mismatch() {
        let resp = response(
            "id",
            vec![output_tensor("score", "FP32", vec![1, 1])],
            vec![fp32_bytes(&[1.0])],
        );
        let err = process_response(resp, "id", &keys(&["score", "label"])).unwrap_err();
        assert!(matches!(
            err,
            Error::OutputCountMismatch {
                expected: 2,
                actual: 1
            }
        ));

        // Metadata without a matching raw buffer.
        let resp = response(
            "id",
            vec![output_tensor("score", "FP32", vec![1, 1])],
            vec![],
        );
        assert!(matches!(
            process_response(resp, "id", &keys(&["score"])),
            Err(Error::OutputCountMismatch { .. })
        ));
    }

    #[test]
    fn process_rejects_missing_name() {
        let resp = response(
            "id",
            vec![output_tensor("other", "FP32", vec![1, 1])],
            vec![fp32_bytes(&[1.0])],
        );
        assert!(matches!(
            process_response(resp, "id", &keys(&["score"])),
            Err(Error::UnexpectedOutput(name)) if name == "score"
        ));
    }

    #[test]
    fn process_rejects_unsupported_datatype() {
        let resp = response(
            "id",
            vec![output_tensor("ids", "INT64", vec![1, 1])],
            vec![1i64.to_le_bytes().to_vec()],
        );
        let err = process_response(resp, "id", &keys(&["ids"])).unwrap_err();
        assert!(matches!(
            &err,
            Error::UnsupportedDatatype { datatype, .. } if datatype == "INT64"
        ));
    }

    #[test]
    fn process_propagates_codec_errors() {
        let resp = response(
            "id",
            vec![output_tensor("score", "FP32", vec![1, 1])],
            vec![vec![0, 0, 0]],
        );
        assert_eq!(
            process_response(resp, "id", &keys(&["score"]))
                .unwrap_err()
                .kind(),
            ErrorKind::Alignment
        );

        let resp = response(
            "id",
            vec![output_tensor("score", "FP32", vec![2, 2])],
            vec![fp32_bytes(&[1.0, 2.0, 3.0])],
        );
        assert!(matches!(
            process_response(resp, "id", &keys(&["score"])),
            Err(Error::ShapeMismatch { .. })
        ));

        let resp = response(
            "id",
            vec![output_tensor("score", "FP32", vec![4])],
            vec![fp32_bytes(&[1.0, 2.0, 3.0, 4.0])],
        );
        assert!(matches!(
            process_response(resp, "id", &keys(&["score"])),
            Err(Error::UnsupportedRank { .. })
        ));
    }

    #[test]
    fn stream_response_yields_strings() {
        let (raw, _) = encode_strings(&["Hel", "lo"]).unwrap();
        let msg = inference::ModelStreamInferResponse {
            error_message: String::new(),
            infer_response: Some(response(
                "s-1",
                vec![output_tensor("text_output", "BYTES", vec![1, 2])],
                vec![raw],
            )),
        };
        assert_eq!(decode_stream_response(msg, "s-1").unwrap(), ["Hel", "lo"]);
    }

    #[test]
    fn stream_response_errors() {
        let msg = inference::ModelStreamInferResponse {
            error_message: "model crashed".into(),
            infer_response: None,
        };
        assert!(matches!(
            decode_stream_response(msg, "s-1"),
            Err(Error::StreamInference(m)) if m == "model crashed"
        ));

        let msg = inference::ModelStreamInferResponse {
            error_message: String::new(),
            infer_response: None,
        };
        assert!(matches!(
            decode_stream_response(msg, "s-1"),
            Err(Error::UnexpectedResponse(_))
        ));

        let msg = inference::ModelStreamInferResponse {
            error_message: String::new(),
            infer_response: Some(response(
                "s-1",
                vec![output_tensor("logits", "FP32", vec![1, 1])],
                vec![fp32_bytes(&[0.0])],
            )),
        };
        assert!(matches!(
            decode_stream_response(msg, "s-1"),
            Err(Error::UnsupportedDatatype { .. })
        ));
    }

    #[test]
    fn oversized_zero_width_output_is_rejected() {
        let resp = response(
            "req-9",
            vec![output_tensor("embedding", "FP32", vec![i64::MAX, 0])],
            vec![Vec::new()],
        );
        let err = process_response(resp, "req-9", &keys(&["embedding"])).unwrap_err();
        assert!(matches!(err, Error::InvalidShape { .. }));
    }
}
