//! Shape validation for service drafts.
//!
//! Text fields must be non-empty after trimming. Core values are cleaned of
//! blank entries, truncated to the first three, and padded from the score
//! profile when fewer than three remain. The returned result always carries
//! the locally computed scores.

use thiserror::Error;

use crate::axis::{AxisScores, Leaning};

use super::types::{AnalysisResult, ArchetypeDraft, CORE_VALUE_COUNT};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("field '{0}' is empty")]
    EmptyField(&'static str),
}

pub fn validate(
    draft: ArchetypeDraft,
    scores: AxisScores<u8>,
) -> Result<AnalysisResult, ValidationError> {
    let archetype = required("archetype", draft.archetype)?;
    let definition = required("definition", draft.definition)?;
    let unexpected_trait = required("unexpectedTrait", draft.unexpected_trait)?;

    let mut core_values: Vec<String> = draft
        .core_values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .take(CORE_VALUE_COUNT)
        .collect();

    if core_values.len() < CORE_VALUE_COUNT {
        let missing = CORE_VALUE_COUNT - core_values.len();
        core_values.extend(profile_core_values(&scores).into_iter().take(missing));
    }

    Ok(AnalysisResult {
        archetype,
        definition,
        core_values,
        unexpected_trait,
        scores,
    })
}

fn required(name: &'static str, value: String) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField(name));
    }
    Ok(trimmed.to_string())
}

/// Filler core values derived from the strongest axes, e.g. `"Economy: leans Growth (78)"`.
pub fn profile_core_values(scores: &AxisScores<u8>) -> Vec<String> {
    scores
        .by_strength()
        .into_iter()
        .map(|(axis, score)| match Leaning::of(score) {
            Leaning::Neutral => format!("{}: balanced ({score})", axis.label()),
            leaning => format!(
                "{}: leans {} ({score})",
                axis.label(),
                leaning.describe(axis)
            ),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores() -> AxisScores<u8> {
        AxisScores {
            economy: 78,
            society: 45,
            diplomacy: 10,
            approach: 50,
        }
    }

    fn draft(core_values: &[&str]) -> ArchetypeDraft {
        ArchetypeDraft {
            archetype: " The Pragmatic Builder ".into(),
            definition: "You build first and argue later.".into(),
            core_values: core_values.iter().map(|s| s.to_string()).collect(),
            unexpected_trait: "Secretly sentimental.".into(),
        }
    }

    #[test]
    fn keeps_exactly_three_values() {
        let r = validate(draft(&["a: 1", "b: 2", "c: 3"]), scores()).unwrap();
        assert_eq!(r.core_values, vec!["a: 1", "b: 2", "c: 3"]);
        assert_eq!(r.archetype, "The Pragmatic Builder");
        assert_eq!(r.scores, scores());
    }

    #[test]
    fn truncates_extra_values() {
        let r = validate(draft(&["a", "b", "c", "d", "e"]), scores()).unwrap();
        assert_eq!(r.core_values, vec!["a", "b", "c"]);
    }

    #[test]
    fn pads_missing_values_from_profile() {
        let r = validate(draft(&["a: 1", "  "]), scores()).unwrap();
        assert_eq!(r.core_values.len(), 3);
        assert_eq!(r.core_values[0], "a: 1");
        assert_eq!(r.core_values[1], "Diplomacy: leans Autonomy (10)");
        assert_eq!(r.core_values[2], "Economy: leans Growth (78)");

        let r = validate(draft(&[]), scores()).unwrap();
        assert_eq!(r.core_values[2], "Society: balanced (45)");
    }

    #[test]
    fn empty_text_fields_fail() {
        let mut d = draft(&["a", "b", "c"]);
        d.definition = "   ".into();
        assert_eq!(
            validate(d, scores()).unwrap_err(),
            ValidationError::EmptyField("definition")
        );

        let mut d = draft(&["a", "b", "c"]);
        d.unexpected_trait.clear();
        assert_eq!(
            validate(d, scores()).unwrap_err(),
            ValidationError::EmptyField("unexpectedTrait")
        );
    }
}
