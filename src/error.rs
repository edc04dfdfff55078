//! Startup and session error types.
//!
//! Failures of the external analysis exchange live in
//! [`crate::analysis::AnalysisUnavailable`].

use std::path::PathBuf;

use thiserror::Error;

use crate::gateway::ProviderError;

/// Fatal configuration problems. Detected before any session starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The bank cannot fill one session.
    #[error("question bank has {available} questions but sample size is {requested}")]
    BankTooSmall { available: usize, requested: usize },

    /// A bank entry violates the bank invariants.
    #[error("invalid question bank: {0}")]
    InvalidBank(String),

    /// Sample size must be at least one.
    #[error("sample size must be >= 1")]
    ZeroSampleSize,

    /// Provider credentials or client setup failed.
    #[error("missing or invalid service credentials: {0}")]
    Credentials(#[source] ProviderError),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

impl ConfigError {
    pub fn invalid_bank(message: impl Into<String>) -> Self {
        Self::InvalidBank(message.into())
    }

    /// Short error code for logging.
    pub fn code(&self) -> &'static str {
        match self {
            Self::BankTooSmall { .. } => "bank_too_small",
            Self::InvalidBank(_) => "invalid_bank",
            Self::ZeroSampleSize => "zero_sample_size",
            Self::Credentials(_) => "credentials",
            Self::Io { .. } => "io",
            Self::Parse { .. } => "parse",
        }
    }
}

/// Caller misuse of a response collector. Rejected without touching state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    /// A collector was created with no sampled questions.
    #[error("no questions have been sampled for this session")]
    NotSampled,

    /// The same question appears twice in one session.
    #[error("question {question_id} appears more than once in the session")]
    DuplicateQuestion { question_id: u32 },

    /// Every sampled question already has an answer.
    #[error("session is complete; {answered} answers already recorded")]
    AlreadyComplete { answered: usize },

    /// The chosen option does not exist on the shown question.
    #[error("option {index} out of range for question {question_id} ({available} options)")]
    OptionOutOfRange {
        question_id: u32,
        index: usize,
        available: usize,
    },

    /// Answers were requested before the last question was answered.
    #[error("session is incomplete: {answered} of {total} answered")]
    Incomplete { answered: usize, total: usize },
}
