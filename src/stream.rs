//! Server-sent-event decoding and delta accumulation for streamed completions.

use serde::Deserialize;
use tracing::debug;

use crate::error::UpstreamError;

/// Splits a byte stream into SSE `data` payloads, one per dispatched event.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    data: Vec<String>,
}

impl SseDecoder {
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);
        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw[..raw.len() - 1]);
            if let Some(event) = self.feed_line(trim_cr(&line)) {
                events.push(event);
            }
        }
        events
    }

    /// Flushes whatever is left once the body has ended.
    pub fn finish(mut self) -> Option<String> {
        if !self.buffer.is_empty() {
            let raw = std::mem::take(&mut self.buffer);
            let line = String::from_utf8_lossy(&raw).into_owned();
            if let Some(event) = self.feed_line(trim_cr(&line)) {
                return Some(event);
            }
        }
        self.dispatch()
    }

    fn feed_line(&mut self, line: &str) -> Option<String> {
        if line.is_empty() {
            return self.dispatch();
        }
        if let Some(value) = line.strip_prefix("data:") {
            let value = value.strip_prefix(' ').unwrap_or(value);
            self.data.push(value.to_string());
        }
        // `event:`, `id:`, `retry:` and `:` comments carry nothing we need.
        None
    }

    fn dispatch(&mut self) -> Option<String> {
        if self.data.is_empty() {
            return None;
        }
        let joined = self.data.join("\n");
        self.data.clear();
        Some(joined)
    }
}

fn trim_cr(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    TextDelta(String),
    Completed,
    Failed(String),
    Other(String),
}

#[derive(Deserialize)]
struct RawEvent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    delta: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    response: Option<RawResponse>,
}

#[derive(Deserialize)]
struct RawResponse {
    #[serde(default)]
    error: Option<RawError>,
}

#[derive(Deserialize)]
struct RawError {
    #[serde(default)]
    message: Option<String>,
}

impl StreamEvent {
    pub fn parse(data: &str) -> Result<Self, serde_json::Error> {
        if data.trim() == "[DONE]" {
            return Ok(Self::Completed);
        }
        let raw: RawEvent = serde_json::from_str(data)?;
        let event = match raw.kind.as_str() {
            "response.output_text.delta" => Self::TextDelta(raw.delta.unwrap_or_default()),
            "response.completed" => Self::Completed,
            "error" => Self::Failed(raw.message.unwrap_or_else(|| "unknown error".to_string())),
            "response.failed" => Self::Failed(
                raw.response
                    .and_then(|r| r.error)
                    .and_then(|e| e.message)
                    .unwrap_or_else(|| "response failed".to_string()),
            ),
            _ => Self::Other(raw.kind),
        };
        Ok(event)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamPhase {
    Idle,
    Streaming,
    Completed,
    Failed,
}

/// Collects text deltas for one streamed completion.
///
/// `Idle -> Streaming` when the call is issued, `Streaming -> Completed` on the
/// end signal (or end of body), `Streaming -> Failed` on any error.
#[derive(Debug)]
pub struct StreamAccumulator {
    phase: StreamPhase,
    text: String,
}

impl Default for StreamAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamAccumulator {
    pub fn new() -> Self {
        Self {
            phase: StreamPhase::Idle,
            text: String::new(),
        }
    }

    pub fn phase(&self) -> StreamPhase {
        self.phase
    }

    pub fn begin(&mut self) {
        if self.phase == StreamPhase::Idle {
            self.phase = StreamPhase::Streaming;
        }
    }

    pub fn is_completed(&self) -> bool {
        self.phase == StreamPhase::Completed
    }

    /// Applies one `data` payload. Events arriving after completion are ignored.
    pub fn apply_data(&mut self, data: &str) -> Result<(), UpstreamError> {
        if self.phase != StreamPhase::Streaming {
            return Ok(());
        }
        let event = StreamEvent::parse(data).map_err(|err| self.fail(err.into()))?;
        match event {
            StreamEvent::TextDelta(delta) => self.text.push_str(&delta),
            StreamEvent::Completed => self.phase = StreamPhase::Completed,
            StreamEvent::Failed(message) => return Err(self.fail(UpstreamError::Stream(message))),
            StreamEvent::Other(kind) => debug!(event = %kind, "ignoring stream event"),
        }
        Ok(())
    }

    pub fn fail(&mut self, err: UpstreamError) -> UpstreamError {
        self.phase = StreamPhase::Failed;
        err
    }

    /// Final accumulated text. A body that ended without an explicit end
    /// signal still counts as completed.
    pub fn finish(mut self) -> Result<String, UpstreamError> {
        match self.phase {
            StreamPhase::Failed => Err(UpstreamError::Stream("stream already failed".to_string())),
            StreamPhase::Idle => Err(UpstreamError::Stream("stream never started".to_string())),
            StreamPhase::Streaming | StreamPhase::Completed => {
                self.phase = StreamPhase::Completed;
                Ok(self.text)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decoder_handles_split_chunks_and_crlf() {
        let mut decoder = SseDecoder::default();
        assert!(decoder.push(b"event: x\r\ndata: {\"a\"").is_empty());
        let events = decoder.push(b":1}\r\n\r\ndata: [DONE]\n\n");
        assert_eq!(events, vec!["{\"a\":1}".to_string(), "[DONE]".to_string()]);
    }

    #[test]
    fn decoder_keeps_multibyte_text_across_chunks() {
        let payload = "data: बिंदु\n\n".as_bytes();
        let mut decoder = SseDecoder::default();
        let mut events = decoder.push(&payload[..8]);
        events.extend(decoder.push(&payload[8..]));
        assert_eq!(events, vec!["बिंदु".to_string()]);
    }

    #[test]
    fn decoder_flushes_unterminated_tail() {
        let mut decoder = SseDecoder::default();
        assert!(decoder.push(b"data: tail").is_empty());
        assert_eq!(decoder.finish().as_deref(), Some("tail"));
    }

    #[test]
    fn parses_event_kinds() {
        assert_eq!(
            StreamEvent::parse(r#"{"type":"response.output_text.delta","delta":"hi"}"#).unwrap(),
            StreamEvent::TextDelta("hi".to_string())
        );
        assert_eq!(
            StreamEvent::parse(r#"{"type":"response.completed","response":{}}"#).unwrap(),
            StreamEvent::Completed
        );
        assert_eq!(
            StreamEvent::parse(r#"{"type":"response.failed","response":{"error":{"message":"quota"}}}"#)
                .unwrap(),
            StreamEvent::Failed("quota".to_string())
        );
        assert_eq!(
            StreamEvent::parse(r#"{"type":"response.created"}"#).unwrap(),
            StreamEvent::Other("response.created".to_string())
        );
        assert!(StreamEvent::parse("not json").is_err());
    }

    #[test]
    fn accumulates_only_text_deltas_until_completed() {
        let mut acc = StreamAccumulator::new();
        assert_eq!(acc.phase(), StreamPhase::Idle);
        acc.begin();
        assert_eq!(acc.phase(), StreamPhase::Streaming);

        acc.apply_data(r#"{"type":"response.created"}"#).unwrap();
        acc.apply_data(r#"{"type":"response.output_text.delta","delta":"1. One."}"#)
            .unwrap();
        acc.apply_data(r#"{"type":"response.output_text.delta","delta":"\nLANG: en"}"#)
            .unwrap();
        acc.apply_data(r#"{"type":"response.output_text.done","text":"ignored"}"#)
            .unwrap();
        acc.apply_data(r#"{"type":"response.completed","response":{}}"#)
            .unwrap();
        assert!(acc.is_completed());

        acc.apply_data(r#"{"type":"response.output_text.delta","delta":"late"}"#)
            .unwrap();
        assert_eq!(acc.finish().unwrap(), "1. One.\nLANG: en");
    }

    #[test]
    fn error_event_moves_to_failed() {
        let mut acc = StreamAccumulator::new();
        acc.begin();
        let err = acc
            .apply_data(r#"{"type":"error","message":"rate limited"}"#)
            .unwrap_err();
        assert!(matches!(err, UpstreamError::Stream(ref m) if m == "rate limited"));
        assert_eq!(acc.phase(), StreamPhase::Failed);
        assert!(acc.finish().is_err());
    }

    #[test]
    fn malformed_payload_moves_to_failed() {
        let mut acc = StreamAccumulator::new();
        acc.begin();
        let err = acc.apply_data("{broken").unwrap_err();
        assert!(matches!(err, UpstreamError::Decode(_)));
        assert_eq!(acc.phase(), StreamPhase::Failed);
    }

    #[test]
    fn body_end_without_signal_completes() {
        let mut acc = StreamAccumulator::new();
        acc.begin();
        acc.apply_data(r#"{"type":"response.output_text.delta","delta":"partial"}"#)
            .unwrap();
        assert_eq!(acc.finish().unwrap(), "partial");
    }
}
