//! Incrementally delivered response bodies
//!
//! Agent chat and execution have "stream" variants that hand back the live
//! response instead of parsed JSON. [`EventStream`] reads it either as
//! server-sent event frames or as raw bytes.

use bytes::Bytes;
use futures::stream::{self, BoxStream};
use futures::{Stream, StreamExt};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::{ApiError, Result};

/// Sentinel some backends send as the last frame
const DONE: &str = "[DONE]";

/// One server-sent event frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEvent {
    /// Value of the `event:` field, if present
    pub event: Option<String>,
    /// `data:` lines of the frame joined with `\n`
    pub data: String,
}

impl StreamEvent {
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.data).map_err(ApiError::decode)
    }

    pub fn is_done(&self) -> bool {
        self.data.trim() == DONE
    }

    fn parse(frame: &str) -> Option<Self> {
        let mut event = None;
        let mut data: Option<String> = None;

        for line in frame.lines() {
            if line.is_empty() || line.starts_with(':') {
                continue;
            }
            let (field, value) = line.split_once(':').unwrap_or((line, ""));
            let value = value.strip_prefix(' ').unwrap_or(value);
            match field {
                "data" => match data.as_mut() {
                    Some(existing) => {
                        existing.push('\n');
                        existing.push_str(value);
                    }
                    None => data = Some(value.to_string()),
                },
                "event" => event = Some(value.to_string()),
                _ => {}
            }
        }

        data.map(|data| Self { event, data })
    }
}

/// Live response body of a streaming endpoint
pub struct EventStream {
    status: StatusCode,
    inner: BoxStream<'static, Result<Bytes>>,
    buffer: Vec<u8>,
}

impl EventStream {
    pub(crate) fn new(response: Response) -> Self {
        let status = response.status();
        let inner = response.bytes_stream().map(|chunk| chunk.map_err(ApiError::from));
        Self::from_stream(status, inner)
    }

    /// Wrap an arbitrary byte stream
    pub fn from_stream(
        status: StatusCode,
        inner: impl Stream<Item = Result<Bytes>> + Send + 'static,
    ) -> Self {
        Self {
            status,
            inner: inner.boxed(),
            buffer: Vec::new(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Next frame carrying data, or `None` once the body ends
    ///
    /// Comment lines and frames without `data:` are skipped. A trailing frame
    /// without the final blank line is still delivered.
    pub async fn next_event(&mut self) -> Result<Option<StreamEvent>> {
        loop {
            if let Some(end) = find_frame_end(&self.buffer) {
                let frame: Vec<u8> = self.buffer.drain(..end + 2).collect();
                if let Some(event) = StreamEvent::parse(&String::from_utf8_lossy(&frame)) {
                    return Ok(Some(event));
                }
                continue;
            }

            match self.inner.next().await {
                Some(chunk) => {
                    let chunk = chunk?;
                    self.buffer.extend(chunk.iter().filter(|&&b| b != b'\r'));
                }
                None => {
                    if self.buffer.is_empty() {
                        return Ok(None);
                    }
                    let rest = std::mem::take(&mut self.buffer);
                    return Ok(StreamEvent::parse(&String::from_utf8_lossy(&rest)));
                }
            }
        }
    }

    /// Raw body chunks, starting with anything already buffered
    ///
    /// Buffered bytes have had carriage returns removed.
    pub fn into_bytes_stream(self) -> impl Stream<Item = Result<Bytes>> + Send {
        let buffered = (!self.buffer.is_empty()).then(|| Ok(Bytes::from(self.buffer)));
        stream::iter(buffered).chain(self.inner)
    }
}

impl std::fmt::Debug for EventStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventStream")
            .field("status", &self.status)
            .field("buffered", &self.buffer.len())
            .finish()
    }
}

fn find_frame_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(2).position(|pair| pair == b"\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream_of(chunks: &[&'static str]) -> EventStream {
        let chunks: Vec<Result<Bytes>> = chunks
            .iter()
            .map(|&chunk| Ok(Bytes::from_static(chunk.as_bytes())))
            .collect();
        EventStream::from_stream(StatusCode::OK, stream::iter(chunks))
    }

    #[tokio::test]
    async fn test_frames_split_across_chunks() {
        let mut events = stream_of(&["data: {\"tok", "en\":\"a\"}\n", "\ndata: b\n\n"]);

        let first = events.next_event().await.unwrap().unwrap();
        let value: serde_json::Value = first.json().unwrap();
        assert_eq!(value["token"], "a");

        let second = events.next_event().await.unwrap().unwrap();
        assert_eq!(second.data, "b");
        assert_eq!(events.next_event().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_comments_event_names_and_crlf() {
        let mut events = stream_of(&[
            ": keep-alive\r\n\r\n",
            "event: message\r\ndata: line1\r\ndata: line2\r\n\r\n",
            "data: [DONE]",
        ]);

        let event = events.next_event().await.unwrap().unwrap();
        assert_eq!(event.event.as_deref(), Some("message"));
        assert_eq!(event.data, "line1\nline2");

        let done = events.next_event().await.unwrap().unwrap();
        assert!(done.is_done());
        assert_eq!(events.next_event().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_bytes_stream_keeps_buffered_data() {
        let mut events = stream_of(&["data: one\n\ndata: tw", "o\n\n"]);
        assert_eq!(events.next_event().await.unwrap().unwrap().data, "one");

        let rest: Vec<Bytes> = events
            .into_bytes_stream()
            .map(|chunk| chunk.unwrap())
            .collect()
            .await;
        let rest: Vec<u8> = rest.iter().flat_map(|chunk| chunk.iter().copied()).collect();
        assert_eq!(rest, b"data: two\n\n");
    }
}
