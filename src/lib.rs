#![forbid(unsafe_code)]

//! # compass-harness
//!
//! A four-axis opinion survey with a model-written archetype on top.
//!
//! A session samples questions from a bank, records one answer per question,
//! and scores each axis (Economy, Society, Diplomacy, Approach) on 0..=100,
//! where 50 is neutral. The scores are computed locally and deterministically.
//! An LLM is then asked for a narrative interpretation (an archetype name, a
//! definition, three core values and an unexpected trait). That interpretation
//! is optional: when the model is slow, wrong or unreachable the caller still
//! has the scores.

pub mod analysis;
pub mod axis;
pub mod bank;
pub mod config;
pub mod error;
pub mod gateway;
pub mod prompts;
pub mod sampler;
pub mod scoring;
pub mod session;

pub use analysis::{
    AnalysisRequest, AnalysisRequestor, AnalysisResult, AnalysisUnavailable, ArchetypeGenerator,
    LlmArchetypeGenerator,
};
pub use axis::{Axis, AxisScores, Leaning};
pub use bank::{AnswerOption, Question, QuestionBank};
pub use config::CompassConfig;
pub use error::{ConfigError, SequenceError};
pub use gateway::{Attribution, ChatGateway, ProviderGateway, UsageSink};
pub use sampler::Sampler;
pub use scoring::{score, score_breakdown};
pub use session::{Answer, ResponseCollector, SessionState};
