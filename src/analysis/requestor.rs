//! Analysis requestor: one outbound exchange per completed session.
//!
//! Every failure of the exchange (transport, status, timeout, cancellation,
//! malformed body, failed validation) collapses into [`AnalysisUnavailable`].
//! Nothing is retried here; retry policy belongs to the caller.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::axis::AxisScores;
use crate::gateway::ProviderError;
use crate::session::Answer;

use super::generator::{ArchetypeGenerator, GenerationError};
use super::types::{AnalysisRequest, AnalysisResult, ArchetypeDraft};
use super::validate::{validate, ValidationError};

pub const DEFAULT_ANALYSIS_TIMEOUT: Duration = Duration::from_secs(60);

/// Why an analysis could not be produced. For logging; callers treat all
/// variants alike.
#[derive(Debug, Error)]
pub enum UnavailableReason {
    #[error("transport failure: {0}")]
    Transport(#[source] ProviderError),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("cancelled by caller")]
    Cancelled,
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("invalid response: {0}")]
    Invalid(#[source] ValidationError),
}

impl UnavailableReason {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Transport(e) => e.code(),
            Self::Timeout(_) => "timeout",
            Self::Cancelled => "cancelled",
            Self::Malformed(_) => "malformed",
            Self::Invalid(_) => "invalid",
        }
    }
}

/// The single failure condition of [`AnalysisRequestor::request_analysis`].
///
/// Locally computed scores stay valid when this occurs.
#[derive(Debug, Error)]
#[error("analysis unavailable: {reason}")]
pub struct AnalysisUnavailable {
    pub reason: UnavailableReason,
}

impl From<UnavailableReason> for AnalysisUnavailable {
    fn from(reason: UnavailableReason) -> Self {
        Self { reason }
    }
}

impl From<GenerationError> for AnalysisUnavailable {
    fn from(err: GenerationError) -> Self {
        let reason = match err {
            GenerationError::Provider(e) => UnavailableReason::Transport(e),
            GenerationError::Malformed(m) => UnavailableReason::Malformed(m),
        };
        Self { reason }
    }
}

pub struct AnalysisRequestor<G: ArchetypeGenerator + ?Sized> {
    generator: Arc<G>,
    timeout: Duration,
}

impl<G: ArchetypeGenerator + ?Sized> AnalysisRequestor<G> {
    pub fn new(generator: Arc<G>) -> Self {
        Self {
            generator,
            timeout: DEFAULT_ANALYSIS_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Request an interpretation of `answers` and their normalized `scores`.
    pub async fn request_analysis(
        &self,
        answers: &[Answer],
        scores: AxisScores<u8>,
    ) -> Result<AnalysisResult, AnalysisUnavailable> {
        self.request_analysis_until(answers, scores, None, std::future::pending())
            .await
    }

    /// Like [`request_analysis`](Self::request_analysis), aborting when
    /// `cancel` resolves first.
    pub async fn request_analysis_until<C>(
        &self,
        answers: &[Answer],
        scores: AxisScores<u8>,
        session_id: Option<Uuid>,
        cancel: C,
    ) -> Result<AnalysisResult, AnalysisUnavailable>
    where
        C: Future<Output = ()>,
    {
        let mut request = AnalysisRequest::new(answers, scores);
        if let Some(id) = session_id {
            request = request.with_session(id);
        }

        let outcome: Result<ArchetypeDraft, AnalysisUnavailable> = tokio::select! {
            res = tokio::time::timeout(self.timeout, self.generator.generate(&request)) => match res {
                Ok(generated) => generated.map_err(AnalysisUnavailable::from),
                Err(_) => Err(UnavailableReason::Timeout(self.timeout).into()),
            },
            _ = cancel => Err(UnavailableReason::Cancelled.into()),
        };

        let result = outcome.and_then(|draft| {
            validate(draft, scores).map_err(|e| UnavailableReason::Invalid(e).into())
        });

        match &result {
            Ok(r) => info!(
                session = ?session_id,
                archetype = %r.archetype,
                "analysis complete"
            ),
            Err(e) => warn!(
                session = ?session_id,
                reason = e.reason.code(),
                error = %e,
                "analysis unavailable"
            ),
        }

        result
    }
}
