//! Prompt templates for archetype generation.
//!
//! Renders an [`AnalysisRequest`] into chat messages. Provider-agnostic.

use crate::analysis::AnalysisRequest;
use crate::axis::Axis;
use crate::gateway::Message;

/// Rendered prompt ready for LLM.
#[derive(Debug, Clone)]
pub struct PromptInstance {
    pub template_slug: String,
    pub system: String,
    pub user: String,
}

impl PromptInstance {
    pub fn to_messages(&self) -> Vec<Message> {
        vec![Message::system(&self.system), Message::user(&self.user)]
    }
}

/// Escape XML special characters to prevent prompt injection via tag breaking.
fn escape_xml_chars(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Unicode-escape angle brackets so embedded JSON stays valid and cannot close a tag.
fn escape_json_angles(json: &str) -> String {
    json.replace('<', "\\u003c").replace('>', "\\u003e")
}

/// A prompt template with placeholders.
#[derive(Debug, Clone, Copy)]
pub struct PromptTemplate {
    pub slug: &'static str,
    pub system: &'static str,
    pub user: &'static str,
}

impl PromptTemplate {
    /// Fill `{score_summary}`, `{answer_summary}` and `{request_json}`.
    pub fn render(&self, request: &AnalysisRequest) -> PromptInstance {
        let score_summary = score_summary(request);
        let answer_summary = answer_summary(request);
        let request_json =
            escape_json_angles(&serde_json::to_string_pretty(request).unwrap_or_default());

        let user = fill_placeholders(
            self.user,
            &[
                ("{score_summary}", score_summary.as_str()),
                ("{answer_summary}", answer_summary.as_str()),
                ("{request_json}", request_json.as_str()),
            ],
        );

        PromptInstance {
            template_slug: self.slug.to_string(),
            system: self.system.trim().to_string(),
            user: user.trim().to_string(),
        }
    }
}

/// Single pass over `template`; inserted values are never rescanned.
fn fill_placeholders(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match values.iter().find(|(key, _)| tail.starts_with(key)) {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len()..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn score_summary(request: &AnalysisRequest) -> String {
    Axis::ALL
        .iter()
        .map(|axis| {
            let (low, high) = axis.poles();
            format!(
                "- {} (0: {low} ~ 100: {high}): {}",
                axis.label(),
                request.normalized_scores[*axis]
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn answer_summary(request: &AnalysisRequest) -> String {
    request
        .answers
        .iter()
        .map(|a| {
            format!(
                "- Question: \"{}\"\n  -> Chosen: \"{}\" (axis: {}, score: {:+})",
                escape_xml_chars(&a.question_text),
                escape_xml_chars(&a.chosen_option_text),
                a.axis,
                a.score
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// =============================================================================
// Standard prompts
// =============================================================================

pub const ARCHETYPE_V1: PromptTemplate = PromptTemplate {
    slug: "archetype_v1",
    system: r#"You are an expert on the political landscape who reads people's values from their choices on concrete policy dilemmas. You describe a respondent's political persona vividly but fairly, without judging which side is right.

Output only valid JSON with exactly these keys:
{"archetype": string, "definition": string, "coreValues": [string, string, string], "unexpectedTrait": string}"#,
    user: r#"A respondent answered a set of political and social policy questions.

<final_scores>
Scores run 0 to 100, 50 is neutral.
{score_summary}
</final_scores>

<answers>
{answer_summary}
</answers>

<request>
{request_json}
</request>

Analyse this respondent's political persona (archetype) and answer in this structure:
1. archetype: an intuitive, creative name of 2 to 4 words, like an MBTI type (e.g. "The Cool-Headed Strategist", "The Warm Reformer").
2. definition: one striking sentence that captures who this type is.
3. coreValues: exactly three values or beliefs this type holds most dear, each formatted as "Keyword: detail" (e.g. "Top priority: distributive justice").
4. unexpectedTrait: one sentence describing a surprising strength, weakness or twist that people of the same leaning would recognise.

json:"#,
};

pub const PROMPTS: &[PromptTemplate] = &[ARCHETYPE_V1];
pub const DEFAULT_PROMPT: PromptTemplate = ARCHETYPE_V1;

pub fn prompt_by_slug(slug: &str) -> Option<PromptTemplate> {
    PROMPTS.iter().find(|t| t.slug == slug).copied()
}

// =============================================================================
// TESTS
// =============================================================================
