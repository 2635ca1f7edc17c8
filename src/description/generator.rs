use tracing::{info, warn};

use super::template::fallback_description;
use crate::text::TextModel;
use crate::text::error::TextModelError;

/// Generated descriptions shorter than this are replaced by the template.
pub const MIN_DESCRIPTION_CHARS: usize = 20;

/// Produces marketing copy for a room.
///
/// When a text model is configured it is asked first; any model error, or a
/// completion under [`MIN_DESCRIPTION_CHARS`], falls back to the fixed
/// template. [`DescriptionClient::generate`] therefore never fails.
pub struct DescriptionClient<M> {
    model: Option<M>,
    max_tokens: u32,
}

impl<M: TextModel> DescriptionClient<M> {
    pub fn new(model: Option<M>, max_tokens: u32) -> Self {
        Self { model, max_tokens }
    }

    /// A client that always uses the template.
    pub fn template_only() -> Self {
        Self::new(None, 0)
    }

    pub async fn generate(&self, room_type: &str, features: &[String]) -> String {
        let Some(model) = &self.model else {
            return fallback_description(room_type, features);
        };

        let prompt = build_prompt(room_type, features);
        match model.complete(&prompt, self.max_tokens).await {
            Ok(generated) => {
                let description = strip_prompt_echo(&prompt, &generated);
                if description.chars().count() < MIN_DESCRIPTION_CHARS {
                    warn!(
                        room_type,
                        chars = description.chars().count(),
                        "generated description too short, using template"
                    );
                    return fallback_description(room_type, features);
                }
                info!(room_type, "generated description with text model");
                description
            }
            Err(TextModelError::RateLimited { retry_after_ms }) => {
                warn!(room_type, retry_after_ms, "text model rate limited, using template");
                fallback_description(room_type, features)
            }
            Err(e) => {
                warn!(room_type, error = %e, "text model failed, using template");
                fallback_description(room_type, features)
            }
        }
    }
}

/// Prompt sent to the text model.
pub fn build_prompt(room_type: &str, features: &[String]) -> String {
    format!(
        "Write a luxurious real estate description for a {room_type} with these features: {}. \
         The description should be engaging and highlight the best aspects.\n\nDescription:",
        features.join(", ")
    )
}

/// Removes any verbatim copy of the prompt from a completion and trims it.
pub fn strip_prompt_echo(prompt: &str, generated: &str) -> String {
    generated.replace(prompt, "").trim().to_string()
}
