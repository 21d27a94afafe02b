// Hosted realtime database adapter (REST streaming API)
use crate::application::vitals_source::{Subscription, UpdateCallback, VitalsSource};
use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::{Buf, BytesMut};
use futures::StreamExt;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct RealtimeDatabaseSource {
    base_url: String,
    auth_token: Option<String>,
    client: reqwest::Client,
}

/// Payload of `put` and `patch` events.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PathData {
    pub path: String,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Put(PathData),
    Patch(PathData),
    KeepAlive,
    Cancel,
    AuthRevoked,
}

impl RealtimeDatabaseSource {
    pub fn new(base_url: String, auth_token: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token,
            client: reqwest::Client::new(),
        }
    }

    fn path_url(&self, path: &str) -> String {
        let mut url = format!("{}/{}.json", self.base_url, path.trim_matches('/'));
        if let Some(token) = &self.auth_token {
            url.push_str("?auth=");
            url.push_str(&urlencoding::encode(token));
        }
        url
    }

    async fn listen(client: reqwest::Client, url: String, path: String, on_update: UpdateCallback) -> Result<()> {
        let response = client
            .get(&url)
            .header("Accept", "text/event-stream")
            .send()
            .await
            .context("Failed to open realtime database stream")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Realtime database stream failed with status {}: {}", status, body);
        }

        let mut stream = response.bytes_stream();
        let mut parser = EventStreamParser::default();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.context("Failed to read realtime database stream")?;
            for event in parser.feed(&chunk) {
                match event {
                    StreamEvent::Put(put) if put.path == "/" => on_update(coerce_value(&put.data)),
                    StreamEvent::Put(put) | StreamEvent::Patch(put) => {
                        tracing::debug!("Ignoring nested update at {}{}", path, put.path);
                    }
                    StreamEvent::KeepAlive => tracing::trace!("keep-alive on {}", path),
                    StreamEvent::Cancel => {
                        tracing::warn!("Realtime database cancelled stream for {}", path);
                        return Ok(());
                    }
                    StreamEvent::AuthRevoked => {
                        tracing::warn!("Credentials revoked for stream {}", path);
                        return Ok(());
                    }
                }
            }
        }

        tracing::debug!("Stream for {} ended", path);
        Ok(())
    }
}

#[async_trait]
impl VitalsSource for RealtimeDatabaseSource {
    fn subscribe(&self, path: &str, on_update: UpdateCallback) -> Result<Subscription> {
        let url = self.path_url(path);
        let client = self.client.clone();
        let stream_path = path.to_string();

        let handle = tokio::spawn(async move {
            if let Err(e) = Self::listen(client, url, stream_path.clone(), on_update).await {
                tracing::error!("Stream for {} failed: {:#}", stream_path, e);
            }
        });

        Ok(Subscription::new(path, move || handle.abort()))
    }

    async fn write(&self, path: &str, value: f64) -> Result<()> {
        let response = self
            .client
            .put(self.path_url(path))
            .json(&value)
            .send()
            .await
            .context("Failed to send write to realtime database")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Realtime database write failed with status {}: {}", status, body);
        }

        Ok(())
    }
}

/// Numbers pass through, numeric strings are parsed, anything else is
/// treated as missing.
pub fn coerce_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Incremental `text/event-stream` decoder.
#[derive(Debug, Default)]
pub struct EventStreamParser {
    buffer: BytesMut,
}

impl EventStreamParser {
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some((end, separator)) = find_block_end(&self.buffer) {
            let block = self.buffer.split_to(end);
            self.buffer.advance(separator);
            if let Some(event) = parse_block(&String::from_utf8_lossy(&block)) {
                events.push(event);
            }
        }
        events
    }
}

/// Position and length of the first blank-line separator, LF or CRLF.
fn find_block_end(buffer: &[u8]) -> Option<(usize, usize)> {
    let lf = buffer.windows(2).position(|w| w == b"\n\n").map(|i| (i, 2));
    let crlf = buffer.windows(4).position(|w| w == b"\r\n\r\n").map(|i| (i, 4));
    match (lf, crlf) {
        (Some(a), Some(b)) => Some(if b.0 < a.0 { b } else { a }),
        (a, b) => a.or(b),
    }
}

fn parse_block(block: &str) -> Option<StreamEvent> {
    let mut name = None;
    let mut data: Vec<&str> = Vec::new();

    for line in block.lines() {
        let line = line.trim_end_matches('\r');
        if let Some(rest) = line.strip_prefix("event:") {
            name = Some(rest.trim());
        } else if let Some(rest) = line.strip_prefix("data:") {
            data.push(rest.trim_start());
        }
    }

    let data = data.join("\n");
    match name? {
        "put" => serde_json::from_str(&data).ok().map(StreamEvent::Put),
        "patch" => serde_json::from_str(&data).ok().map(StreamEvent::Patch),
        "keep-alive" => Some(StreamEvent::KeepAlive),
        "cancel" => Some(StreamEvent::Cancel),
        "auth_revoked" => Some(StreamEvent::AuthRevoked),
        other => {
            tracing::debug!("Unknown stream event: {}", other);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_value() {
        assert_eq!(coerce_value(&json!(72)), Some(72.0));
        assert_eq!(coerce_value(&json!(36.6)), Some(36.6));
        assert_eq!(coerce_value(&json!("36.7")), Some(36.7));
        assert_eq!(coerce_value(&json!(" 98 ")), Some(98.0));
        assert_eq!(coerce_value(&json!("n/a")), None);
        assert_eq!(coerce_value(&Value::Null), None);
        assert_eq!(coerce_value(&json!({"bpm": 72})), None);
    }

    #[test]
    fn test_parse_put_split_across_chunks() {
        let mut parser = EventStreamParser::default();
        assert!(parser.feed(b"event: put\ndata: {\"path\":\"/\",").is_empty());

        let events = parser.feed(b"\"data\":85}\n\nevent: keep-alive\ndata: null\n\n");
        assert_eq!(
            events,
            vec![
                StreamEvent::Put(PathData {
                    path: "/".to_string(),
                    data: json!(85),
                }),
                StreamEvent::KeepAlive,
            ]
        );
    }

    #[test]
    fn test_parse_null_and_control_events() {
        let mut parser = EventStreamParser::default();
        let events = parser.feed(
            b"event: put\ndata: {\"path\":\"/\",\"data\":null}\n\nevent: cancel\ndata: null\n\nevent: auth_revoked\ndata: credential is no longer valid\n\n",
        );
        assert_eq!(events.len(), 3);
        assert_eq!(
            events[0],
            StreamEvent::Put(PathData {
                path: "/".to_string(),
                data: Value::Null,
            })
        );
        assert_eq!(events[1], StreamEvent::Cancel);
        assert_eq!(events[2], StreamEvent::AuthRevoked);
    }

    #[test]
    fn test_parse_crlf_framed_events() {
        let mut parser = EventStreamParser::default();
        assert!(parser.feed(b"event: put\r\ndata: {\"path\":\"/\",\"data\":97}\r\n\r").is_empty());

        let events = parser.feed(b"\nevent: patch\r\ndata: {\"path\":\"/\",\"data\":{\"v\":1}}\r\n\r\nevent: keep-alive\ndata: null\n\n");
        assert_eq!(
            events,
            vec![
                StreamEvent::Put(PathData {
                    path: "/".to_string(),
                    data: json!(97),
                }),
                StreamEvent::Patch(PathData {
                    path: "/".to_string(),
                    data: json!({"v": 1}),
                }),
                StreamEvent::KeepAlive,
            ]
        );
    }

    #[test]
    fn test_parse_ignores_malformed_blocks() {
        let mut parser = EventStreamParser::default();
        let events = parser.feed(b"data: orphan\n\nevent: put\ndata: not json\n\nevent: rules_debug\ndata: x\n\n");
        assert!(events.is_empty());
    }

    #[test]
    fn test_path_url() {
        let source = RealtimeDatabaseSource::new("https://demo-rtdb.firebaseio.com/".to_string(), None);
        assert_eq!(source.path_url("ekg"), "https://demo-rtdb.firebaseio.com/ekg.json");

        let source = RealtimeDatabaseSource::new(
            "https://demo-rtdb.firebaseio.com".to_string(),
            Some("a b/c".to_string()),
        );
        assert_eq!(
            source.path_url("/patient/sp02/"),
            "https://demo-rtdb.firebaseio.com/patient/sp02.json?auth=a%20b%2Fc"
        );
    }
}
