use async_trait::async_trait;
use base64ct::{Base64, Encoding};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use super::dto::{ChatRole, ChatSuggestion, ChatTurn, FoodAnalysis, FoodDescription, ImageInput};
use super::{parse, prompts, AiError};
use crate::config::LlmConfig;
use crate::nutrients::Micronutrients;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const ESTIMATE_MAX_TOKENS: u32 = 512;

/// The language-model collaborator. Every call may fail or return something
/// other than what was asked for; callers decide how to degrade.
#[async_trait]
pub trait NutritionAdvisor: Send + Sync {
    async fn analyze_food(&self, images: &[ImageInput], notes: &str)
        -> Result<FoodAnalysis, AiError>;

    async fn chat_suggest(
        &self,
        message: &str,
        history: &[ChatTurn],
        context: &Value,
    ) -> Result<ChatSuggestion, AiError>;

    async fn estimate_food_micronutrients(
        &self,
        food: &FoodDescription,
    ) -> Result<Micronutrients, AiError>;

    async fn estimate_supplement_micronutrients(
        &self,
        name: &str,
        dosage: &str,
    ) -> Result<Micronutrients, AiError>;
}

// --- Messages API wire types ---

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: ChatRole,
    content: Vec<ContentBlock>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ContentBlock {
    Text { text: String },
    Image { source: ImageSource },
}

#[derive(Debug, Serialize)]
struct ImageSource {
    #[serde(rename = "type")]
    kind: &'static str,
    media_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ResponseBlock>,
}

#[derive(Debug, Deserialize)]
struct ResponseBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl Message {
    fn text(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            role,
            content: vec![ContentBlock::Text { text: text.into() }],
        }
    }
}

fn image_block(image: &ImageInput) -> ContentBlock {
    ContentBlock::Image {
        source: ImageSource {
            kind: "base64",
            media_type: image.media_type.clone(),
            data: Base64::encode_string(&image.data),
        },
    }
}

fn first_text(resp: MessagesResponse) -> Result<String, AiError> {
    resp.content
        .into_iter()
        .find(|b| b.kind == "text")
        .and_then(|b| b.text)
        .ok_or(AiError::MissingText)
}

/// Anthropic Messages API client.
pub struct AnthropicClient {
    http: Client,
    cfg: LlmConfig,
}

impl AnthropicClient {
    pub fn new(cfg: LlmConfig) -> Self {
        Self {
            http: Client::new(),
            cfg,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.cfg.base_url.trim_end_matches('/'))
    }

    async fn complete(
        &self,
        system: Option<String>,
        messages: Vec<Message>,
        max_tokens: u32,
    ) -> Result<String, AiError> {
        let body = MessagesRequest {
            model: &self.cfg.model,
            max_tokens,
            system,
            messages,
        };
        let res = self
            .http
            .post(self.endpoint())
            .header("x-api-key", &self.cfg.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(AiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = first_text(res.json::<MessagesResponse>().await?)?;
        debug!(model = %self.cfg.model, chars = text.len(), "llm reply received");
        Ok(text)
    }
}

#[async_trait]
impl NutritionAdvisor for AnthropicClient {
    #[instrument(skip(self, images, notes), fields(images = images.len()))]
    async fn analyze_food(
        &self,
        images: &[ImageInput],
        notes: &str,
    ) -> Result<FoodAnalysis, AiError> {
        let mut content: Vec<ContentBlock> = images.iter().map(image_block).collect();
        content.push(ContentBlock::Text {
            text: prompts::food_image(images.len(), notes),
        });
        let messages = vec![Message {
            role: ChatRole::User,
            content,
        }];
        let reply = self.complete(None, messages, self.cfg.max_tokens).await?;
        Ok(parse::parse_analysis(&reply))
    }

    #[instrument(skip_all, fields(history = history.len()))]
    async fn chat_suggest(
        &self,
        message: &str,
        history: &[ChatTurn],
        context: &Value,
    ) -> Result<ChatSuggestion, AiError> {
        let mut messages: Vec<Message> = history
            .iter()
            .map(|t| Message::text(t.role, t.content.clone()))
            .collect();
        messages.push(Message::text(ChatRole::User, message));
        let reply = self
            .complete(Some(prompts::chat_system(context)), messages, self.cfg.max_tokens)
            .await?;
        Ok(parse::parse_chat(&reply))
    }

    #[instrument(skip_all, fields(food = %food.name))]
    async fn estimate_food_micronutrients(
        &self,
        food: &FoodDescription,
    ) -> Result<Micronutrients, AiError> {
        let messages = vec![Message::text(
            ChatRole::User,
            prompts::food_micronutrients(food),
        )];
        let reply = self.complete(None, messages, ESTIMATE_MAX_TOKENS).await?;
        parse::parse_micronutrients(&reply)
    }

    #[instrument(skip(self))]
    async fn estimate_supplement_micronutrients(
        &self,
        name: &str,
        dosage: &str,
    ) -> Result<Micronutrients, AiError> {
        let messages = vec![Message::text(
            ChatRole::User,
            prompts::supplement_micronutrients(name, dosage),
        )];
        let reply = self.complete(None, messages, ESTIMATE_MAX_TOKENS).await?;
        Ok(parse::parse_micronutrients(&reply)?.supplement_subset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use serde_json::json;

    #[test]
    fn request_serializes_to_messages_api_shape() {
        let image = ImageInput {
            media_type: "image/png".into(),
            data: Bytes::from_static(b"hi"),
        };
        let body = MessagesRequest {
            model: "m",
            max_tokens: 10,
            system: None,
            messages: vec![Message {
                role: ChatRole::User,
                content: vec![
                    image_block(&image),
                    ContentBlock::Text { text: "what is this".into() },
                ],
            }],
        };
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(
            v,
            json!({
                "model": "m",
                "max_tokens": 10,
                "messages": [{
                    "role": "user",
                    "content": [
                        {"type": "image", "source": {"type": "base64", "media_type": "image/png", "data": "aGk="}},
                        {"type": "text", "text": "what is this"}
                    ]
                }]
            })
        );
    }

    #[test]
    fn picks_the_first_text_block() {
        let resp: MessagesResponse = serde_json::from_value(json!({
            "id": "msg_1",
            "content": [{"type": "thinking"}, {"type": "text", "text": "{}"}]
        }))
        .unwrap();
        assert_eq!(first_text(resp).unwrap(), "{}");

        let empty: MessagesResponse = serde_json::from_value(json!({"content": []})).unwrap();
        assert!(matches!(first_text(empty), Err(AiError::MissingText)));
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let client = AnthropicClient::new(LlmConfig {
            api_key: "k".into(),
            base_url: "http://localhost:9999/".into(),
            model: "m".into(),
            max_tokens: 100,
        });
        assert_eq!(client.endpoint(), "http://localhost:9999/v1/messages");
    }
}
