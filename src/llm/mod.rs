//! Chat-completion client used for meal photo analysis and the assistant chat.

mod openai;

pub use openai::OpenAiClient;

use async_trait::async_trait;

pub const NUTRITION_SYSTEM_PROMPT: &str = "You are a capable personal trainer. \
Using the photo the user sends, estimate the calories and nutrients contained in the meal.";

pub const NUTRITION_QUESTION: &str = "If there is a meal in this image, report its nutrition \
one item per line in exactly this form, using whole numbers only:\n\
Calories: <kcal>\nProtein: <g>\nFat: <g>\nCarbohydrates: <g>\n\
Vitamin: <score>\nMineral: <score>\nFiber: <g>";

pub const CHAT_SYSTEM_PROMPT: &str = "You are a capable personal trainer who gives \
personal advice while talking with the user.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmRole {
    System,
    User,
    Assistant,
}

impl LlmRole {
    pub fn as_str(self) -> &'static str {
        match self {
            LlmRole::System => "system",
            LlmRole::User => "user",
            LlmRole::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LlmMessage {
    pub role: LlmRole,
    pub text: String,
    pub image_url: Option<String>,
}

impl LlmMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: LlmRole::System,
            text: text.into(),
            image_url: None,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: LlmRole::User,
            text: text.into(),
            image_url: None,
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: LlmRole::Assistant,
            text: text.into(),
            image_url: None,
        }
    }

    pub fn user_with_image(text: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            role: LlmRole::User,
            text: text.into(),
            image_url: Some(image_url.into()),
        }
    }
}

#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Runs one completion and returns the assistant's text.
    async fn complete(&self, messages: &[LlmMessage]) -> anyhow::Result<String>;
}

/// Asks the model for a nutrition estimate of the image at `image_url`.
pub async fn analyze_meal_image(model: &dyn ChatModel, image_url: &str) -> anyhow::Result<String> {
    let messages = [
        LlmMessage::system(NUTRITION_SYSTEM_PROMPT),
        LlmMessage::user_with_image(NUTRITION_QUESTION, image_url),
    ];
    model.complete(&messages).await
}
