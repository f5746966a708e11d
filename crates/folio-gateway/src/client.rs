//! Clients for the text-generation API.

use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{stream, Stream, StreamExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use folio_core::config::GenerationConfig;

use crate::error::{GatewayError, Result};
use crate::types::{GenerateContentResponse, FALLBACK_REPLY};

/// Stream of text fragments from the gateway, in arrival order.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Seam between the relay and the external generation service.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// One completed response. The first non-empty text part is the
    /// reply; a fixed fallback string stands in when the response has
    /// none.
    async fn complete(&self, prompt: &str, config: &GenerationConfig) -> Result<String>;

    /// Lazy, finite, non-restartable stream of text fragments.
    async fn stream_generate(&self, prompt: &str, config: &GenerationConfig)
        -> Result<TextStream>;
}

// ---------------------------------------------------------------------------
// HTTP client (real API calls)
// ---------------------------------------------------------------------------

/// Client for a Gemini-style generateContent endpoint.
pub struct HttpGenerationClient {
    http: reqwest::Client,
    api_base: String,
    model: String,
    api_key: String,
}

impl HttpGenerationClient {
    /// Build a client with a bounded request timeout. The timeout caps
    /// the whole exchange, including consumption of a streamed body.
    pub fn new(api_base: &str, model: &str, api_key: &str, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn endpoint_url(&self, action: &str) -> String {
        format!("{}/models/{}:{}", self.api_base, self.model, action)
    }

    fn request_body(prompt: &str, config: &GenerationConfig) -> serde_json::Value {
        serde_json::json!({
            "contents": [
                { "parts": [ { "text": prompt } ] }
            ],
            "generationConfig": {
                "temperature": config.temperature,
                "topP": config.top_p,
                "topK": config.top_k,
                "maxOutputTokens": config.max_output_tokens,
            }
        })
    }

    /// POST the prompt and fail on a non-success status, extracting the
    /// API's own error message when one is present.
    async fn send(
        &self,
        url: &str,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<reqwest::Response> {
        let resp = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&Self::request_body(prompt, config))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body: serde_json::Value = resp.json().await.unwrap_or_default();
            let message = body["error"]["message"]
                .as_str()
                .unwrap_or("no detail")
                .to_string();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(resp)
    }
}

#[async_trait]
impl GenerationClient for HttpGenerationClient {
    async fn complete(&self, prompt: &str, config: &GenerationConfig) -> Result<String> {
        let url = self.endpoint_url("generateContent");
        let resp = self.send(&url, prompt, config).await?;

        let body: GenerateContentResponse = resp
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;

        Ok(body
            .first_text()
            .map(|t| t.to_string())
            .unwrap_or_else(|| FALLBACK_REPLY.to_string()))
    }

    async fn stream_generate(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<TextStream> {
        let url = format!("{}?alt=sse", self.endpoint_url("streamGenerateContent"));
        let resp = self.send(&url, prompt, config).await?;

        let (tx, rx) = mpsc::channel::<Result<String>>(32);
        tokio::spawn(async move {
            let mut bytes = resp.bytes_stream();
            let mut buffer = String::new();
            while let Some(next) = bytes.next().await {
                let chunk = match next {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        tracing::warn!(error = %e, "generation stream broke mid-flight");
                        let _ = tx.send(Err(GatewayError::Stream(e.to_string()))).await;
                        return;
                    }
                };
                buffer.push_str(&String::from_utf8_lossy(&chunk));

                // SSE frames are separated by a blank line.
                while let Some(pos) = buffer.find("\n\n") {
                    let frame = buffer[..pos].to_string();
                    buffer.drain(..pos + 2);
                    for item in parse_frame(&frame) {
                        if tx.send(item).await.is_err() {
                            // Receiver dropped: the relay stopped listening.
                            return;
                        }
                    }
                }
            }
        });

        Ok(Box::pin(ReceiverStream::new(rx)))
    }
}

/// Extract text fragments from one SSE frame.
///
/// A frame may carry several `data:` lines; each parses to a chunk whose
/// non-empty text parts are yielded in order. Unparseable payloads come
/// back as `Err` items so the caller can report them without tearing the
/// stream down.
fn parse_frame(frame: &str) -> Vec<Result<String>> {
    let mut items = Vec::new();
    for line in frame.lines() {
        let Some(payload) = line.strip_prefix("data:") else {
            continue;
        };
        let payload = payload.trim();
        if payload.is_empty() || payload == "[DONE]" {
            continue;
        }
        match serde_json::from_str::<GenerateContentResponse>(payload) {
            Ok(chunk) => items.extend(chunk.texts().into_iter().map(Ok)),
            Err(e) => items.push(Err(GatewayError::Stream(format!("bad frame: {e}")))),
        }
    }
    items
}

// ---------------------------------------------------------------------------
// Mock client (for testing)
// ---------------------------------------------------------------------------

/// Canned-response client for tests.
///
/// Records every prompt it is asked to serve so tests can assert both
/// what was sent and whether the gateway was reached at all.
pub struct MockGenerationClient {
    reply: Mutex<String>,
    chunks: Mutex<Vec<String>>,
    failing: Mutex<bool>,
    chunk_faults: Mutex<Vec<usize>>,
    call_log: Arc<Mutex<Vec<String>>>,
}

impl MockGenerationClient {
    pub fn new() -> Self {
        Self {
            reply: Mutex::new(FALLBACK_REPLY.to_string()),
            chunks: Mutex::new(Vec::new()),
            failing: Mutex::new(false),
            chunk_faults: Mutex::new(Vec::new()),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Canned reply for `complete`.
    pub fn set_reply(&self, reply: &str) {
        *self.reply.lock().unwrap() = reply.to_string();
    }

    /// Canned fragments for `stream_generate`.
    pub fn set_chunks(&self, chunks: &[&str]) {
        *self.chunks.lock().unwrap() = chunks.iter().map(|c| c.to_string()).collect();
    }

    /// Make every call fail with an API error.
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    /// Replace the fragment at `index` with a stream error.
    pub fn fail_chunk(&self, index: usize) {
        self.chunk_faults.lock().unwrap().push(index);
    }

    /// All prompts this mock has been asked to serve.
    pub fn calls(&self) -> Vec<String> {
        self.call_log.lock().unwrap().clone()
    }

    fn record(&self, prompt: &str) -> Result<()> {
        self.call_log.lock().unwrap().push(prompt.to_string());
        if *self.failing.lock().unwrap() {
            return Err(GatewayError::Api {
                status: 500,
                message: "mock failure".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for MockGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationClient for MockGenerationClient {
    async fn complete(&self, prompt: &str, _config: &GenerationConfig) -> Result<String> {
        self.record(prompt)?;
        Ok(self.reply.lock().unwrap().clone())
    }

    async fn stream_generate(
        &self,
        prompt: &str,
        _config: &GenerationConfig,
    ) -> Result<TextStream> {
        self.record(prompt)?;

        let faults = self.chunk_faults.lock().unwrap().clone();
        let items: Vec<Result<String>> = self
            .chunks
            .lock()
            .unwrap()
            .iter()
            .enumerate()
            .map(|(i, chunk)| {
                if faults.contains(&i) {
                    Err(GatewayError::Stream("mock chunk failure".to_string()))
                } else {
                    Ok(chunk.clone())
                }
            })
            .collect();

        Ok(Box::pin(stream::iter(items)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GenerationConfig {
        GenerationConfig::default()
    }

    // -- mock client --

    #[tokio::test]
    async fn mock_returns_canned_reply() {
        let mock = MockGenerationClient::new();
        mock.set_reply("Hello!");
        let reply = mock.complete("prompt", &config()).await.unwrap();
        assert_eq!(reply, "Hello!");
    }

    #[tokio::test]
    async fn mock_records_prompts() {
        let mock = MockGenerationClient::new();
        mock.complete("first", &config()).await.unwrap();
        mock.stream_generate("second", &config()).await.unwrap();

        let calls = mock.calls();
        assert_eq!(calls, vec!["first".to_string(), "second".to_string()]);
    }

    #[tokio::test]
    async fn mock_streams_chunks_in_order() {
        let mock = MockGenerationClient::new();
        mock.set_chunks(&["Hi ", "there", "!"]);

        let stream = mock.stream_generate("p", &config()).await.unwrap();
        let items: Vec<_> = stream.collect().await;
        let texts: Vec<String> = items.into_iter().map(|i| i.unwrap()).collect();
        assert_eq!(texts, vec!["Hi ", "there", "!"]);
    }

    #[tokio::test]
    async fn mock_injects_chunk_faults() {
        let mock = MockGenerationClient::new();
        mock.set_chunks(&["ok", "bad", "more"]);
        mock.fail_chunk(1);

        let stream = mock.stream_generate("p", &config()).await.unwrap();
        let items: Vec<_> = stream.collect().await;
        assert!(items[0].is_ok());
        assert!(items[1].is_err());
        assert_eq!(items[2].as_ref().unwrap(), "more");
    }

    #[tokio::test]
    async fn mock_fails_when_told_to() {
        let mock = MockGenerationClient::new();
        mock.set_failing(true);

        let err = mock.complete("p", &config()).await.unwrap_err();
        assert!(matches!(err, GatewayError::Api { status: 500, .. }));
        assert!(mock.stream_generate("p", &config()).await.is_err());
        // Failed calls still show up in the log.
        assert_eq!(mock.calls().len(), 2);
    }

    // -- http client plumbing --

    #[test]
    fn endpoint_urls() {
        let client = HttpGenerationClient::new(
            "https://generativelanguage.googleapis.com/v1beta/",
            "gemma-3-27b-it",
            "key",
            Duration::from_secs(30),
        );
        assert_eq!(
            client.endpoint_url("generateContent"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemma-3-27b-it:generateContent"
        );
    }

    #[test]
    fn request_body_shape() {
        let body = HttpGenerationClient::request_body("say hi", &config());
        assert_eq!(body["contents"][0]["parts"][0]["text"], "say hi");
        assert_eq!(body["generationConfig"]["topK"], 40);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 512);
        assert!(body["generationConfig"]["temperature"].is_number());
        assert!(body["generationConfig"]["topP"].is_number());
    }

    // -- frame parsing --

    #[test]
    fn parse_frame_extracts_text() {
        let frame = r#"data: {"candidates":[{"content":{"parts":[{"text":"Hi "}]}}]}"#;
        let items = parse_frame(frame);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].as_ref().unwrap(), "Hi ");
    }

    #[test]
    fn parse_frame_handles_multiple_data_lines() {
        let frame = concat!(
            "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"a\"}]}}]}\n",
            "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"b\"}]}}]}"
        );
        let items = parse_frame(frame);
        let texts: Vec<&str> = items.iter().map(|i| i.as_ref().unwrap().as_str()).collect();
        assert_eq!(texts, vec!["a", "b"]);
    }

    #[test]
    fn parse_frame_skips_comments_and_done() {
        assert!(parse_frame(": keep-alive").is_empty());
        assert!(parse_frame("data: [DONE]").is_empty());
        assert!(parse_frame("data:").is_empty());
        assert!(parse_frame("event: ping").is_empty());
    }

    #[test]
    fn parse_frame_reports_bad_payloads() {
        let items = parse_frame("data: {not json");
        assert_eq!(items.len(), 1);
        assert!(matches!(items[0], Err(GatewayError::Stream(_))));
    }

    #[test]
    fn parse_frame_flattens_multi_part_chunks() {
        let frame =
            r#"data: {"candidates":[{"content":{"parts":[{"text":"x"},{"text":"y"}]}}]}"#;
        let items = parse_frame(frame);
        let texts: Vec<&str> = items.iter().map(|i| i.as_ref().unwrap().as_str()).collect();
        assert_eq!(texts, vec!["x", "y"]);
    }
}
