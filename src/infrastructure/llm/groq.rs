use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use serde::{Deserialize, Serialize};

use crate::domain::llm::{
    FinishReason, LlmProvider, LlmRequest, LlmResponse, LlmStream, Message, MessageRole,
    StreamChunk,
};
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClientTrait;

const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai";

/// Groq API provider (OpenAI-compatible wire format)
#[derive(Debug)]
pub struct GroqProvider<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    base_url: String,
}

impl<C: HttpClientTrait> GroqProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_GROQ_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let auth_header = format!("Bearer {}", api_key.into());
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            auth_header,
            base_url,
        }
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn build_request(&self, model: &str, request: &LlmRequest) -> serde_json::Value {
        let messages: Vec<GroqMessage> = request
            .messages
            .iter()
            .map(GroqMessage::from_domain)
            .collect();

        let mut body = serde_json::json!({
            "model": model,
            "messages": messages,
            "stream": request.stream,
        });

        if let Some(temp) = request.temperature {
            body["temperature"] = serde_json::json!(temp);
        }

        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        body
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<LlmResponse, DomainError> {
        let response: GroqResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("groq", format!("Failed to parse response: {}", e))
        })?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::provider("groq", "No choices in response"))?;

        let message = Message::assistant(choice.message.content.unwrap_or_default());
        let mut llm_response = LlmResponse::new(response.id, response.model, message);

        if let Some(reason) = choice.finish_reason {
            llm_response = llm_response.with_finish_reason(parse_finish_reason(&reason));
        }

        Ok(llm_response)
    }
}

#[async_trait]
impl<C: HttpClientTrait> LlmProvider for GroqProvider<C> {
    async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError> {
        let mut req = request;
        req.stream = false;

        let url = self.chat_completions_url();
        let body = self.build_request(model, &req);
        let response = self.client.post_json(&url, self.headers(), &body).await?;

        self.parse_response(response)
    }

    async fn chat_stream(
        &self,
        model: &str,
        request: LlmRequest,
    ) -> Result<LlmStream, DomainError> {
        let mut req = request;
        req.stream = true;

        let url = self.chat_completions_url();
        let body = self.build_request(model, &req);
        let byte_stream = self
            .client
            .post_json_stream(&url, self.headers(), &body)
            .await?;

        let model_clone = model.to_string();
        let stream = byte_stream.filter_map(move |result: Result<Bytes, DomainError>| {
            let model = model_clone.clone();
            async move {
                match result {
                    Ok(bytes) => {
                        let text = String::from_utf8_lossy(&bytes);
                        parse_sse_chunks(&text, &model)
                    }
                    Err(e) => Some(Err(e)),
                }
            }
        });

        Ok(Box::pin(stream))
    }

    fn provider_name(&self) -> &'static str {
        "groq"
    }
}

fn parse_sse_chunks(text: &str, model: &str) -> Option<Result<StreamChunk, DomainError>> {
    for line in text.lines() {
        if let Some(data) = line.strip_prefix("data: ") {
            if data.trim() == "[DONE]" {
                return Some(Ok(StreamChunk::new(String::new(), model.to_string())
                    .with_finish_reason(FinishReason::Stop)));
            }

            if let Ok(chunk) = serde_json::from_str::<GroqStreamChunk>(data) {
                if let Some(choice) = chunk.choices.into_iter().next() {
                    let mut stream_chunk =
                        StreamChunk::new(chunk.id, chunk.model.unwrap_or_default());

                    if let Some(delta) = choice.delta.content {
                        stream_chunk = stream_chunk.with_delta(delta);
                    }

                    if let Some(reason) = choice.finish_reason {
                        stream_chunk =
                            stream_chunk.with_finish_reason(parse_finish_reason(&reason));
                    }

                    return Some(Ok(stream_chunk));
                }
            }
        }
    }
    None
}

fn parse_finish_reason(reason: &str) -> FinishReason {
    match reason {
        "length" => FinishReason::Length,
        "content_filter" => FinishReason::ContentFilter,
        _ => FinishReason::Stop,
    }
}

// Groq wire types

#[derive(Debug, Serialize)]
struct GroqMessage {
    role: String,
    content: String,
}

impl GroqMessage {
    fn from_domain(message: &Message) -> Self {
        let role = match message.role {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        };

        Self {
            role: role.to_string(),
            content: message.content.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GroqResponse {
    id: String,
    model: String,
    choices: Vec<GroqChoice>,
}

#[derive(Debug, Deserialize)]
struct GroqChoice {
    message: GroqResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GroqResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GroqStreamChunk {
    id: String,
    model: Option<String>,
    choices: Vec<GroqStreamChoice>,
}

#[derive(Debug, Deserialize)]
struct GroqStreamChoice {
    delta: GroqDelta,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GroqDelta {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http_client::mock::MockHttpClient;

    const TEST_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

    #[tokio::test]
    async fn test_groq_chat() {
        let mock_response = serde_json::json!({
            "id": "chatcmpl-groq-1",
            "model": "llama-3.3-70b-versatile",
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": "Day 1: explore Old Goa."
                },
                "finish_reason": "stop"
            }]
        });

        let client = MockHttpClient::new().with_response(TEST_URL, mock_response);
        let provider = GroqProvider::new(client, "test-api-key");

        let request = LlmRequest::builder()
            .user("Plan a day in Goa")
            .temperature(0.4)
            .max_tokens(2048)
            .build();

        let response = provider
            .chat("llama-3.3-70b-versatile", request)
            .await
            .unwrap();

        assert_eq!(response.id, "chatcmpl-groq-1");
        assert_eq!(response.content(), Some("Day 1: explore Old Goa."));
        assert_eq!(response.finish_reason, Some(FinishReason::Stop));
    }

    #[tokio::test]
    async fn test_groq_error_propagates() {
        let client = MockHttpClient::new().with_error(TEST_URL, "invalid api key");
        let provider = GroqProvider::new(client, "bad-key");

        let request = LlmRequest::builder().user("hello").build();
        let result = provider.chat("llama-3.3-70b-versatile", request).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_groq_empty_choices_is_error() {
        let mock_response = serde_json::json!({
            "id": "chatcmpl-groq-2",
            "model": "llama-3.3-70b-versatile",
            "choices": []
        });

        let client = MockHttpClient::new().with_response(TEST_URL, mock_response);
        let provider = GroqProvider::new(client, "test-api-key");

        let request = LlmRequest::builder().user("hello").build();
        let result = provider.chat("llama-3.3-70b-versatile", request).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_groq_stream_parses_sse() {
        let chunks = vec![
            Bytes::from(
                "data: {\"id\":\"c1\",\"model\":\"m\",\"choices\":[{\"delta\":{\"content\":\"Sunny\"},\"finish_reason\":null}]}\n\n",
            ),
            Bytes::from(
                "data: {\"id\":\"c1\",\"model\":\"m\",\"choices\":[{\"delta\":{\"content\":\" today\"},\"finish_reason\":null}]}\n\n",
            ),
            Bytes::from("data: [DONE]\n\n"),
        ];

        let client = MockHttpClient::new().with_stream_response(TEST_URL, chunks);
        let provider = GroqProvider::new(client, "test-api-key");

        let request = LlmRequest::builder().user("weather in goa").build();
        let stream = provider
            .chat_stream("llama-3.3-70b-versatile", request)
            .await
            .unwrap();

        let collected: Vec<StreamChunk> = stream.map(|c| c.unwrap()).collect::<Vec<_>>().await;
        assert_eq!(collected.len(), 3);
        assert_eq!(collected[0].delta.as_deref(), Some("Sunny"));
        assert_eq!(collected[1].delta.as_deref(), Some(" today"));
        assert_eq!(collected[2].finish_reason, Some(FinishReason::Stop));
    }
}
