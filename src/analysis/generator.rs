//! The archetype generation capability and its model-backed implementation.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::gateway::{Attribution, ChatGateway, ChatModel, ChatRequest, ProviderError};
use crate::prompts::{PromptTemplate, DEFAULT_PROMPT};

use super::types::{AnalysisRequest, ArchetypeDraft};

pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Output cap for one archetype; the JSON object is small.
pub const ARCHETYPE_MAX_OUTPUT_TOKENS: u32 = 1_024;

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Turns a score profile plus answer context into narrative text.
///
/// Implementations only propose text; scores in the final result always come
/// from the local computation.
#[async_trait]
pub trait ArchetypeGenerator: Send + Sync {
    async fn generate(&self, request: &AnalysisRequest) -> Result<ArchetypeDraft, GenerationError>;
}

/// Generator backed by a chat model in JSON mode.
pub struct LlmArchetypeGenerator<G: ChatGateway> {
    gateway: Arc<G>,
    model: String,
    temperature: f32,
    template: PromptTemplate,
}

impl<G: ChatGateway> LlmArchetypeGenerator<G> {
    pub fn new(gateway: Arc<G>, model: impl Into<String>) -> Self {
        Self {
            gateway,
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            template: DEFAULT_PROMPT,
        }
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.temperature = t;
        self
    }

    pub fn template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl<G: ChatGateway> ArchetypeGenerator for LlmArchetypeGenerator<G> {
    async fn generate(&self, request: &AnalysisRequest) -> Result<ArchetypeDraft, GenerationError> {
        let prompt = self.template.render(request);

        let mut attribution = Attribution::new("analysis::archetype");
        if let Some(id) = request.session_id {
            attribution = attribution.with_session(id);
        }

        let chat = ChatRequest::new(
            ChatModel::openrouter(&self.model),
            prompt.to_messages(),
            attribution,
        )
        .temperature(self.temperature)
        .max_tokens(ARCHETYPE_MAX_OUTPUT_TOKENS)
        .json();

        let response = self.gateway.chat(chat).await?;
        debug!(
            model = %self.model,
            template = %prompt.template_slug,
            output_tokens = response.output_tokens,
            "archetype response received"
        );

        parse_draft(&response.content)
    }
}

/// Parse the model's JSON object, tolerating surrounding prose or code fences.
pub fn parse_draft(raw: &str) -> Result<ArchetypeDraft, GenerationError> {
    let json = extract_json(raw).ok_or_else(|| {
        GenerationError::Malformed("no JSON object in response".to_string())
    })?;
    serde_json::from_str(json).map_err(|e| GenerationError::Malformed(e.to_string()))
}

/// First balanced `{...}` in `raw`, ignoring braces inside string literals.
fn extract_json(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let body = &raw[start..];

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in body.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&body[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{"archetype":"The Quiet Reformer","definition":"You change things slowly.","coreValues":["a: 1","b: 2","c: 3"],"unexpectedTrait":"Loves order."}"#;

    #[test]
    fn parses_bare_json() {
        let d = parse_draft(BODY).unwrap();
        assert_eq!(d.archetype, "The Quiet Reformer");
        assert_eq!(d.core_values.len(), 3);
    }

    #[test]
    fn parses_fenced_json_with_prose() {
        let raw = format!("Here you go:\n```json\n{BODY}\n```\nThanks!");
        let d = parse_draft(&raw).unwrap();
        assert_eq!(d.unexpected_trait, "Loves order.");
    }

    #[test]
    fn braces_inside_strings_do_not_end_object() {
        let raw = r#"{"archetype":"The {Curly} One","definition":"d \"}\" e","coreValues":[],"unexpectedTrait":"t"} trailing }"#;
        let d = parse_draft(raw).unwrap();
        assert_eq!(d.archetype, "The {Curly} One");
        assert_eq!(d.definition, "d \"}\" e");
    }

    #[test]
    fn malformed_inputs() {
        assert!(matches!(
            parse_draft("no json here"),
            Err(GenerationError::Malformed(_))
        ));
        assert!(matches!(
            parse_draft(r#"{"archetype": "x""#),
            Err(GenerationError::Malformed(_))
        ));
        assert!(matches!(
            parse_draft(r#"{"archetype": 5, "definition": "d", "unexpectedTrait": "t"}"#),
            Err(GenerationError::Malformed(_))
        ));
    }
}
