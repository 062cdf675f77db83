//! OpenAI-compatible chat completion client used for narrative polishing

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest_middleware::ClientWithMiddleware;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::http::send_json;
use super::{TextPolisher, UpstreamError};
use crate::config::PolishConfig;
use crate::models::Attribution;

pub const POLISH_SYSTEM_PROMPT: &str = "You polish travel itineraries. Tighten and humanize the wording, keep every place name and detail, remove fluff. Keep the exact line structure and line prefixes of the input.";

pub struct OpenAiPolisher {
    client: ClientWithMiddleware,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl OpenAiPolisher {
    pub fn new(client: ClientWithMiddleware, config: &PolishConfig, api_key: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}/chat/completions", config.url.trim_end_matches('/')),
            api_key: api_key.to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }
}

#[async_trait]
impl TextPolisher for OpenAiPolisher {
    #[instrument(skip(self, text), fields(chars = text.len()))]
    async fn polish(&self, text: &str) -> Result<String, UpstreamError> {
        let body = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: [
                ChatMessage {
                    role: "system",
                    content: POLISH_SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: text,
                },
            ],
        };
        let body = serde_json::to_vec(&body)
            .map_err(|e| UpstreamError::Rejected(format!("unencodable polish request: {e}")))?;

        let request = self
            .client
            .post(&self.endpoint)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(CONTENT_TYPE, "application/json")
            .body(body);

        let response: ChatResponse = send_json(request, "Chat completions").await?;
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| UpstreamError::InvalidResponse("empty completion".into()))?;

        debug!("Polished {} chars into {}", text.len(), content.len());
        Ok(content)
    }

    fn attribution(&self) -> Attribution {
        Attribution::new("OpenAI", "https://openai.com", "narrative polish")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let body = ChatRequest {
            model: "gpt-4o-mini",
            temperature: 0.2,
            messages: [
                ChatMessage {
                    role: "system",
                    content: "sys",
                },
                ChatMessage {
                    role: "user",
                    content: "hello",
                },
            ],
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["model"], "gpt-4o-mini");
        assert_eq!(value["messages"][1]["content"], "hello");
        assert_eq!(value["messages"][0]["role"], "system");
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        let client = reqwest_middleware::ClientBuilder::new(reqwest::Client::new()).build();
        let mut config = PolishConfig::default();
        config.url = "https://llm.example/v1/".to_string();
        let polisher = OpenAiPolisher::new(client, &config, "sk-test");
        assert_eq!(polisher.endpoint, "https://llm.example/v1/chat/completions");
    }
}
