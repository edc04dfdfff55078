//! Archetype analysis: request shaping, generation, validation.
//!
//! The requestor builds `{ answers, normalizedScores }`, hands it to an
//! [`ArchetypeGenerator`], and validates the draft into an [`AnalysisResult`]
//! whose scores always come from the local scoring engine.

pub mod generator;
pub mod requestor;
pub mod types;
pub mod validate;

pub use generator::{
    parse_draft, ArchetypeGenerator, GenerationError, LlmArchetypeGenerator, DEFAULT_MODEL,
};
pub use requestor::{
    AnalysisRequestor, AnalysisUnavailable, UnavailableReason, DEFAULT_ANALYSIS_TIMEOUT,
};
pub use types::{
    AnalysisRequest, AnalysisResult, AnswerContext, ArchetypeDraft, CoreValue, CORE_VALUE_COUNT,
};
pub use validate::{profile_core_values, validate, ValidationError};
