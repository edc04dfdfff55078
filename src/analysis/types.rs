//! Wire and result types for the archetype analysis exchange.

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::axis::{Axis, AxisScores};
use crate::session::Answer;

/// Number of core values in a validated result.
pub const CORE_VALUE_COUNT: usize = 3;

/// Per-answer context sent to the interpretation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerContext {
    pub question_text: String,
    pub chosen_option_text: String,
    pub axis: Axis,
    pub score: i8,
}

impl From<&Answer> for AnswerContext {
    fn from(a: &Answer) -> Self {
        Self {
            question_text: a.question_text.clone(),
            chosen_option_text: a.chosen_option_text.clone(),
            axis: a.axis,
            score: a.score,
        }
    }
}

/// Request body: `{ answers: [...], normalizedScores: {...} }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub answers: Vec<AnswerContext>,
    pub normalized_scores: AxisScores<u8>,
    /// Session the request belongs to. Not part of the wire body.
    #[serde(skip)]
    pub session_id: Option<Uuid>,
}

impl AnalysisRequest {
    pub fn new(answers: &[Answer], normalized_scores: AxisScores<u8>) -> Self {
        Self {
            answers: answers.iter().map(AnswerContext::from).collect(),
            normalized_scores,
            session_id: None,
        }
    }

    pub fn with_session(mut self, session_id: Uuid) -> Self {
        self.session_id = Some(session_id);
        self
    }
}

/// Response body as proposed by the service, before validation.
///
/// Any `scores` field the service adds is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchetypeDraft {
    pub archetype: String,
    pub definition: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub core_values: Vec<String>,
    pub unexpected_trait: String,
}

/// `null` reads as an empty list, so it is padded like a missing key.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Validated interpretation of one completed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub archetype: String,
    pub definition: String,
    /// Always [`CORE_VALUE_COUNT`] entries.
    pub core_values: Vec<String>,
    pub unexpected_trait: String,
    /// Locally computed normalized scores.
    pub scores: AxisScores<u8>,
}

impl AnalysisResult {
    /// Core values split into keyword and detail.
    pub fn parsed_core_values(&self) -> Vec<CoreValue> {
        self.core_values.iter().map(|v| CoreValue::parse(v)).collect()
    }
}

/// A `"Keyword: detail"` core value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreValue {
    pub keyword: String,
    pub detail: String,
}

impl CoreValue {
    /// Split on the first colon. Without a colon (or with nothing after it),
    /// the detail repeats the keyword.
    pub fn parse(raw: &str) -> Self {
        let (keyword, detail) = match raw.split_once(':') {
            Some((k, d)) => (k.trim(), d.trim()),
            None => (raw.trim(), ""),
        };
        let detail = if detail.is_empty() { keyword } else { detail };
        Self {
            keyword: keyword.to_string(),
            detail: detail.to_string(),
        }
    }
}
