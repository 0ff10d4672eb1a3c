use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::{ChatModel, LlmMessage};
use crate::config::LlmConfig;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: WireContent<'a>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum WireContent<'a> {
    Text(&'a str),
    Parts(Vec<WirePart<'a>>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WirePart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: WireImage<'a> },
}

#[derive(Debug, Serialize)]
struct WireImage<'a> {
    url: &'a str,
}

impl<'a> From<&'a LlmMessage> for WireMessage<'a> {
    fn from(msg: &'a LlmMessage) -> Self {
        let content = match &msg.image_url {
            None => WireContent::Text(&msg.text),
            Some(url) => WireContent::Parts(vec![
                WirePart::Text { text: &msg.text },
                WirePart::ImageUrl { image_url: WireImage { url } },
            ]),
        };
        Self { role: msg.role.as_str(), content }
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Client for any endpoint speaking the OpenAI chat-completions API.
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(cfg: &LlmConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("build llm http client")?;
        Ok(Self {
            client,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
        })
    }

    fn build_request<'a>(&'a self, messages: &'a [LlmMessage]) -> CompletionRequest<'a> {
        CompletionRequest {
            model: &self.model,
            messages: messages.iter().map(WireMessage::from).collect(),
            temperature: 0.0,
        }
    }
}

#[async_trait]
impl ChatModel for OpenAiClient {
    #[instrument(skip(self, messages), fields(model = %self.model, messages = messages.len()))]
    async fn complete(&self, messages: &[LlmMessage]) -> anyhow::Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.build_request(messages))
            .send()
            .await
            .context("llm request")?;

        let status = res.status();
        let body = res.text().await.context("llm response body")?;
        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            warn!(%status, "llm request rejected");
            anyhow::bail!("llm returned {status}: {detail}");
        }

        let text = extract_content(&body)?;
        debug!(chars = text.len(), "llm completion received");
        Ok(text)
    }
}

fn extract_content(body: &str) -> anyhow::Result<String> {
    let parsed: CompletionResponse =
        serde_json::from_str(body).context("decode llm response")?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .context("llm response has no content")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmMessage;

    fn client() -> OpenAiClient {
        OpenAiClient::new(&LlmConfig {
            api_key: "k".into(),
            base_url: "https://llm.local/v1/".into(),
            model: "test-model".into(),
        })
        .unwrap()
    }

    #[test]
    fn image_message_becomes_content_parts() {
        let c = client();
        let msgs = [
            LlmMessage::system("sys"),
            LlmMessage::user_with_image("what is this", "https://img.local/a.jpg"),
        ];
        let v = serde_json::to_value(c.build_request(&msgs)).unwrap();
        assert_eq!(v["model"], "test-model");
        assert_eq!(v["temperature"], 0.0);
        assert_eq!(v["messages"][0]["content"], "sys");
        let parts = &v["messages"][1]["content"];
        assert_eq!(parts[0]["type"], "text");
        assert_eq!(parts[0]["text"], "what is this");
        assert_eq!(parts[1]["type"], "image_url");
        assert_eq!(parts[1]["image_url"]["url"], "https://img.local/a.jpg");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        assert_eq!(client().base_url, "https://llm.local/v1");
    }

    #[test]
    fn extracts_first_choice_content() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"Calories: 500"}}]}"#;
        assert_eq!(extract_content(body).unwrap(), "Calories: 500");
    }

    #[test]
    fn empty_choices_is_an_error() {
        assert!(extract_content(r#"{"choices":[]}"#).is_err());
    }
}
