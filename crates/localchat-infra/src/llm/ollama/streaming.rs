//! NDJSON stream creation for Ollama's `/api/chat`.
//!
//! Ollama streams one JSON object per line:
//! 1. N x `{"message":{"role":"assistant","content":"..."},"done":false}`
//! 2. `{"done":true,"done_reason":"stop","prompt_eval_count":..,"eval_count":..}`
//! 3. `{"error":"..."}` may replace any line if generation fails
//!
//! HTTP chunks do not align with lines, so bytes are buffered until a
//! newline arrives.

use std::pin::Pin;

use futures_util::{Stream, StreamExt};

use localchat_types::llm::{LlmError, StopReason, StreamEvent, Usage};

use super::types::{OllamaChatChunk, OllamaChatRequest, OllamaErrorBody};

/// Splits a byte stream into complete lines.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: Vec<u8>,
    /// Bytes of `buf` already known to contain no newline.
    scanned: usize,
}

impl LineBuffer {
    /// Append bytes and drain every complete, non-blank line.
    ///
    /// Only bytes not yet searched are scanned for `\n`, so a long partial
    /// line costs linear time across chunks.
    pub fn push(&mut self, bytes: &[u8]) -> Result<Vec<String>, LlmError> {
        self.buf.extend_from_slice(bytes);
        let mut lines = Vec::new();
        let mut start = 0;
        let mut from = self.scanned;
        while let Some(offset) = self.buf[from..].iter().position(|b| *b == b'\n') {
            let end = from + offset;
            if let Some(line) = decode_line(&self.buf[start..end])? {
                lines.push(line);
            }
            start = end + 1;
            from = start;
        }
        self.buf.drain(..start);
        self.scanned = self.buf.len();
        Ok(lines)
    }

    /// Take whatever is left after the stream ends (a final line without `\n`).
    pub fn finish(&mut self) -> Result<Option<String>, LlmError> {
        let raw = std::mem::take(&mut self.buf);
        self.scanned = 0;
        decode_line(&raw)
    }
}

fn decode_line(raw: &[u8]) -> Result<Option<String>, LlmError> {
    let text = std::str::from_utf8(raw)
        .map_err(|e| LlmError::Deserialization(format!("stream line is not UTF-8: {e}")))?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(trimmed.to_string()))
    }
}

/// Map Ollama's `done_reason` to a [`StopReason`].
fn stop_reason_from(done_reason: Option<&str>) -> StopReason {
    match done_reason {
        Some("length") => StopReason::MaxTokens,
        Some("unload") => StopReason::Unloaded,
        _ => StopReason::EndTurn,
    }
}

/// Translate one NDJSON line into provider-agnostic events.
///
/// Returns the events plus whether this was the final (`done: true`) line.
pub fn parse_chunk_line(line: &str, model: &str) -> Result<(Vec<StreamEvent>, bool), LlmError> {
    let chunk: OllamaChatChunk = serde_json::from_str(line)
        .map_err(|e| LlmError::Deserialization(format!("invalid stream line: {e}")))?;

    if let Some(error) = chunk.error {
        return Err(LlmError::from_backend_message(model, error));
    }

    let mut events = Vec::new();
    if let Some(message) = chunk.message {
        if !message.content.is_empty() {
            events.push(StreamEvent::TextDelta {
                text: message.content,
            });
        }
    }

    if chunk.done {
        if chunk.prompt_eval_count.is_some() || chunk.eval_count.is_some() {
            events.push(StreamEvent::Usage(Usage {
                input_tokens: chunk.prompt_eval_count.unwrap_or(0),
                output_tokens: chunk.eval_count.unwrap_or(0),
            }));
        }
        events.push(StreamEvent::MessageDelta {
            stop_reason: stop_reason_from(chunk.done_reason.as_deref()),
        });
    }

    Ok((events, chunk.done))
}

/// Classify a non-success HTTP response.
///
/// A body naming a missing model becomes [`LlmError::ModelNotFound`];
/// anything else is a generic provider error carrying the status.
pub fn classify_http_error(model: &str, status: u16, body: &str) -> LlmError {
    let message = serde_json::from_str::<OllamaErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| body.trim().to_string());

    match LlmError::from_backend_message(model, message.clone()) {
        err @ LlmError::ModelNotFound { .. } => err,
        _ => LlmError::Provider {
            message: format!("HTTP {status}: {message}"),
        },
    }
}

/// Create a streaming connection to Ollama's chat endpoint.
///
/// Returns a `Stream` of [`StreamEvent`]s: `Connected` once the response
/// headers arrive, a `TextDelta` per fragment, `Usage` and `MessageDelta`
/// from the final line, then `Done`. A stream that closes before the final
/// line is an error.
///
/// # Arguments
///
/// * `client` - Shared reqwest HTTP client
/// * `url` - Full API URL (e.g., "http://localhost:11434/api/chat")
/// * `body` - Ollama request with `stream: true`
pub fn create_ollama_stream(
    client: &reqwest::Client,
    url: &str,
    body: OllamaChatRequest,
) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>> {
    let client = client.clone();
    let url = url.to_string();

    Box::pin(async_stream::try_stream! {
        let model = body.model.clone();
        let response = client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        let response = if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            Err::<(), LlmError>(classify_http_error(&model, status.as_u16(), &error_body))?;
            unreachable!()
        } else {
            response
        };

        yield StreamEvent::Connected;

        let mut bytes = response.bytes_stream();
        let mut lines = LineBuffer::default();
        let mut finished = false;

        while let Some(chunk) = bytes.next().await {
            let chunk = chunk.map_err(|e| LlmError::Stream(e.to_string()))?;
            for line in lines.push(&chunk)? {
                let (events, done) = parse_chunk_line(&line, &model)?;
                for event in events {
                    yield event;
                }
                finished |= done;
            }
        }

        if let Some(line) = lines.finish()? {
            let (events, done) = parse_chunk_line(&line, &model)?;
            for event in events {
                yield event;
            }
            finished |= done;
        }

        if !finished {
            Err::<(), LlmError>(LlmError::Stream(
                "response ended before the model finished".to_string(),
            ))?;
        }

        yield StreamEvent::Done;
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_buffer_splits_across_chunks() {
        let mut buf = LineBuffer::default();
        assert!(buf.push(b"{\"a\":").unwrap().is_empty());
        let lines = buf.push(b"1}\n{\"b\":2}\n{\"c\"").unwrap();
        assert_eq!(lines, vec![r#"{"a":1}"#, r#"{"b":2}"#]);
        assert!(buf.push(b":3}").unwrap().is_empty());
        assert_eq!(buf.finish().unwrap().as_deref(), Some(r#"{"c":3}"#));
    }

    #[test]
    fn test_line_buffer_skips_blank_lines_and_crlf() {
        let mut buf = LineBuffer::default();
        let lines = buf.push(b"\n\r\n{\"a\":1}\r\n").unwrap();
        assert_eq!(lines, vec![r#"{"a":1}"#]);
        assert_eq!(buf.finish().unwrap(), None);
    }

    #[test]
    fn test_line_buffer_keeps_split_utf8_intact() {
        let text = "{\"t\":\"caf\u{e9}\"}\n".as_bytes();
        let split = text.len() - 4; // inside the two-byte 'é'
        let mut buf = LineBuffer::default();
        assert!(buf.push(&text[..split]).unwrap().is_empty());
        let lines = buf.push(&text[split..]).unwrap();
        assert_eq!(lines, vec!["{\"t\":\"caf\u{e9}\"}"]);
    }

    #[test]
    fn test_line_buffer_long_line_in_small_chunks() {
        let mut buf = LineBuffer::default();
        let text = "x".repeat(10_000);
        let line = format!("{{\"t\":\"{text}\"}}\n{{\"u\":1}}\n");
        let mut lines = Vec::new();
        for chunk in line.as_bytes().chunks(7) {
            lines.extend(buf.push(chunk).unwrap());
        }
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), text.len() + 8);
        assert_eq!(lines[1], r#"{"u":1}"#);
        assert_eq!(buf.scanned, 0);
        assert_eq!(buf.finish().unwrap(), None);
    }

    #[test]
    fn test_parse_fragment_line() {
        let (events, done) =
            parse_chunk_line(r#"{"message":{"role":"assistant","content":"Hi"},"done":false}"#, "m").unwrap();
        assert!(!done);
        assert_eq!(events, vec![StreamEvent::TextDelta { text: "Hi".into() }]);
    }

    #[test]
    fn test_parse_empty_fragment_yields_nothing() {
        let (events, done) =
            parse_chunk_line(r#"{"message":{"role":"assistant","content":""},"done":false}"#, "m").unwrap();
        assert!(!done);
        assert!(events.is_empty());
    }

    #[test]
    fn test_parse_final_line() {
        let (events, done) = parse_chunk_line(
            r#"{"message":{"role":"assistant","content":""},"done":true,"done_reason":"length","prompt_eval_count":20,"eval_count":5}"#,
            "m",
        )
        .unwrap();
        assert!(done);
        assert_eq!(
            events,
            vec![
                StreamEvent::Usage(Usage {
                    input_tokens: 20,
                    output_tokens: 5
                }),
                StreamEvent::MessageDelta {
                    stop_reason: StopReason::MaxTokens
                },
            ]
        );
    }

    #[test]
    fn test_parse_final_line_without_counts() {
        let (events, done) = parse_chunk_line(r#"{"done":true}"#, "m").unwrap();
        assert!(done);
        assert_eq!(
            events,
            vec![StreamEvent::MessageDelta {
                stop_reason: StopReason::EndTurn
            }]
        );
    }

    #[test]
    fn test_parse_error_line_model_not_found() {
        let err = parse_chunk_line(r#"{"error":"model 'x' not found"}"#, "x").unwrap_err();
        assert!(err.is_model_not_found());
    }

    #[test]
    fn test_parse_error_line_generic() {
        let err = parse_chunk_line(r#"{"error":"llama runner process has terminated"}"#, "x").unwrap_err();
        assert!(matches!(err, LlmError::Backend(_)));
    }

    #[test]
    fn test_parse_malformed_line() {
        let err = parse_chunk_line("not json", "x").unwrap_err();
        assert!(matches!(err, LlmError::Deserialization(_)));
    }

    #[test]
    fn test_stop_reason_mapping() {
        assert_eq!(stop_reason_from(Some("stop")), StopReason::EndTurn);
        assert_eq!(stop_reason_from(Some("length")), StopReason::MaxTokens);
        assert_eq!(stop_reason_from(Some("unload")), StopReason::Unloaded);
        assert_eq!(stop_reason_from(None), StopReason::EndTurn);
    }

    #[test]
    fn test_classify_http_error() {
        let err = classify_http_error("llama3.2:1b", 404, r#"{"error":"model \"llama3.2:1b\" not found, try pulling it first"}"#);
        assert!(err.is_model_not_found());

        let err = classify_http_error("m", 404, "404 page not found");
        assert_eq!(err.to_string(), "provider error: HTTP 404: 404 page not found");

        let err = classify_http_error("m", 500, r#"{"error":"boom"}"#);
        assert_eq!(err.to_string(), "provider error: HTTP 500: boom");
    }
}
