use async_stream::try_stream;
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use super::error::NutritionError;
use super::transport::{GenerationRequest, GenerationTransport, TextStream};

#[derive(Debug, Clone)]
pub struct GeminiTransport {
    base_url: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    response_mime_type: String,
    response_schema: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking_config: Option<ThinkingConfig>,
}

#[derive(Debug, Serialize)]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Debug, Deserialize)]
struct StreamingResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
struct PartResponse {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl GeminiTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    fn stream_url(&self, model: &str) -> String {
        format!("{}/models/{}:streamGenerateContent", self.base_url, model)
    }
}

fn build_body(request: &GenerationRequest) -> GeminiRequest {
    GeminiRequest {
        contents: vec![Content {
            role: "user".to_string(),
            parts: vec![Part {
                text: request.prompt.clone(),
            }],
        }],
        generation_config: GenerationConfig {
            temperature: request.temperature,
            response_mime_type: "application/json".to_string(),
            response_schema: request.response_schema.clone(),
            thinking_config: request
                .thinking_budget
                .map(|thinking_budget| ThinkingConfig { thinking_budget }),
        },
    }
}

fn api_error_message(status: u16, body: &str) -> String {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    format!("LLM API returned error: {status} - {message}")
}

/// Appends `chunk` and returns every line it completed. Bytes after the last
/// newline stay in `pending`, so lines and UTF-8 sequences may span chunks.
fn split_sse(pending: &mut Vec<u8>, chunk: &[u8]) -> Vec<String> {
    pending.extend_from_slice(chunk);
    let mut lines = Vec::new();
    while let Some(pos) = pending.iter().position(|b| *b == b'\n') {
        let line: Vec<u8> = pending.drain(..=pos).collect();
        lines.push(String::from_utf8_lossy(&line).trim_end().to_string());
    }
    lines
}

/// Whatever is left once the body ends without a final newline.
fn take_remainder(pending: &mut Vec<u8>) -> String {
    let rest = String::from_utf8_lossy(pending).trim_end().to_string();
    pending.clear();
    rest
}

/// Text carried by one SSE line, if any. Thought parts are dropped.
fn parse_sse_line(line: &str) -> Option<String> {
    let data = line.strip_prefix("data:")?.trim_start();
    if data.is_empty() {
        return None;
    }
    match serde_json::from_str::<StreamingResponse>(data) {
        Ok(response) => {
            let text: String = response
                .candidates
                .iter()
                .take(1)
                .filter_map(|c| c.content.as_ref())
                .flat_map(|c| c.parts.iter())
                .filter(|p| !p.thought)
                .filter_map(|p| p.text.as_deref())
                .collect();
            (!text.is_empty()).then_some(text)
        }
        Err(e) => {
            warn!(error = %e, "failed to parse streaming chunk");
            None
        }
    }
}

#[async_trait]
impl GenerationTransport for GeminiTransport {
    async fn stream_generate(
        &self,
        api_key: &str,
        request: &GenerationRequest,
    ) -> Result<TextStream, NutritionError> {
        let body = build_body(request);
        debug!(model = %request.model, "starting streaming request to Gemini API");

        let response = self
            .client
            .post(self.stream_url(&request.model))
            .query(&[("alt", "sse")])
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Gemini API request failed");
                NutritionError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!(%status, "Gemini API error");
            return Err(NutritionError::Transport(api_error_message(
                status.as_u16(),
                &text,
            )));
        }

        let stream: TextStream = Box::pin(try_stream! {
            let mut bytes = response.bytes_stream();
            let mut pending: Vec<u8> = Vec::new();
            while let Some(chunk) = bytes.next().await {
                let chunk = chunk.map_err(|e| NutritionError::Transport(format!("stream error: {e}")))?;
                for line in split_sse(&mut pending, &chunk) {
                    if let Some(text) = parse_sse_line(&line) {
                        yield text;
                    }
                }
            }
            if let Some(text) = parse_sse_line(&take_remainder(&mut pending)) {
                yield text;
            }
        });

        Ok(stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(thinking_budget: Option<u32>) -> GenerationRequest {
        GenerationRequest {
            model: "gemini-2.5-flash".into(),
            prompt: "analyse this".into(),
            temperature: 0.5,
            response_schema: json!({"type": "OBJECT"}),
            thinking_budget,
        }
    }

    #[test]
    fn body_requests_json_with_schema() {
        let body = serde_json::to_value(build_body(&request(Some(10587)))).unwrap();
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "analyse this");
        let config = &body["generation_config"];
        assert_eq!(config["response_mime_type"], "application/json");
        assert_eq!(config["response_schema"]["type"], "OBJECT");
        assert_eq!(config["temperature"], 0.5);
        assert_eq!(config["thinking_config"]["thinking_budget"], 10587);
    }

    #[test]
    fn body_omits_thinking_config_when_unset() {
        let body = serde_json::to_value(build_body(&request(None))).unwrap();
        assert!(body["generation_config"].get("thinking_config").is_none());
    }

    #[test]
    fn sse_line_yields_candidate_text() {
        let line = r#"data: {"candidates":[{"content":{"parts":[{"text":"{\"food_"},{"text":"item\""}]}}]}"#;
        assert_eq!(parse_sse_line(line).as_deref(), Some(r#"{"food_item""#));
    }

    #[test]
    fn sse_line_skips_thoughts_and_noise() {
        let thought = r#"data: {"candidates":[{"content":{"parts":[{"text":"hmm","thought":true}]}}]}"#;
        assert_eq!(parse_sse_line(thought), None);
        assert_eq!(parse_sse_line(""), None);
        assert_eq!(parse_sse_line("data: "), None);
        assert_eq!(parse_sse_line(": keep-alive"), None);
        assert_eq!(parse_sse_line("data: {not json"), None);
        let usage_only = r#"data: {"usageMetadata":{"totalTokenCount":12}}"#;
        assert_eq!(parse_sse_line(usage_only), None);
    }

    #[test]
    fn event_split_mid_json_is_reassembled() {
        let event = r#"data: {"candidates":[{"content":{"parts":[{"text":"{\"calories\": 350}"}]}}]}"#;
        let (head, tail) = event.split_at(30);
        let mut pending = Vec::new();

        assert!(split_sse(&mut pending, head.as_bytes()).is_empty());
        let lines = split_sse(&mut pending, format!("{tail}\r\n\r\n").as_bytes());
        assert_eq!(lines, vec![event.to_string(), String::new()]);
        assert!(pending.is_empty());
        assert_eq!(parse_sse_line(&lines[0]).as_deref(), Some(r#"{"calories": 350}"#));
    }

    #[test]
    fn multibyte_character_split_across_chunks_survives() {
        let event = r#"data: {"candidates":[{"content":{"parts":[{"text":"Crème brûlée"}]}}]}"#;
        let bytes = event.as_bytes();
        let cut = event.find('è').unwrap() + 1;
        let mut pending = Vec::new();

        assert!(split_sse(&mut pending, &bytes[..cut]).is_empty());
        let mut rest = bytes[cut..].to_vec();
        rest.push(b'\n');
        let lines = split_sse(&mut pending, &rest);
        assert_eq!(lines.len(), 1);
        assert_eq!(parse_sse_line(&lines[0]).as_deref(), Some("Crème brûlée"));
    }

    #[test]
    fn unterminated_last_line_is_flushed() {
        let first = r#"data: {"candidates":[{"content":{"parts":[{"text":"{\"a\":"}]}}]}"#;
        let last = r#"data: {"candidates":[{"content":{"parts":[{"text":"1}"}]}}]}"#;
        let mut pending = Vec::new();

        let lines = split_sse(&mut pending, format!("{first}\n{last}").as_bytes());
        assert_eq!(lines, vec![first.to_string()]);

        let rest = take_remainder(&mut pending);
        assert_eq!(rest, last);
        assert!(pending.is_empty());

        let text: String = lines
            .iter()
            .chain(std::iter::once(&rest))
            .filter_map(|l| parse_sse_line(l))
            .collect();
        assert_eq!(text, r#"{"a":1}"#);
    }

    #[test]
    fn api_error_uses_message_from_body() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(
            api_error_message(400, body),
            "LLM API returned error: 400 - API key not valid."
        );
        assert_eq!(
            api_error_message(503, "overloaded\n"),
            "LLM API returned error: 503 - overloaded"
        );
    }

    #[test]
    fn stream_url_trims_trailing_slash() {
        let transport = GeminiTransport::new("http://localhost:9999/v1beta/");
        assert_eq!(
            transport.stream_url("gemini-2.5-flash"),
            "http://localhost:9999/v1beta/models/gemini-2.5-flash:streamGenerateContent"
        );
    }
}
