//! Response collector: one respondent, one pass through the sampled questions.
//!
//! ```text
//! AwaitingAnswer(0) → AwaitingAnswer(1) → … → AwaitingAnswer(K-1) → Complete
//! ```
//!
//! Each submission appends exactly one [`Answer`] built from the collector's
//! own copy of the question shown at that index. Nothing is accepted once the
//! collector is `Complete`; rejected submissions leave state untouched.

use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::axis::Axis;
use crate::bank::Question;
use crate::error::SequenceError;
use crate::sampler::Sampler;

/// A respondent's choice for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: u32,
    pub question_text: String,
    pub chosen_option_text: String,
    pub axis: Axis,
    pub score: i8,
}

/// Where a collector stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingAnswer { index: usize, total: usize },
    Complete,
}

impl SessionState {
    pub fn is_complete(&self) -> bool {
        matches!(self, SessionState::Complete)
    }
}

/// Answered / total counts for progress display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
}

impl Progress {
    /// Completion percentage, rounded to the nearest integer.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.answered as f64 / self.total as f64) * 100.0).round() as u8
    }
}

/// Sequential state machine over a fixed list of sampled questions.
#[derive(Debug, Clone)]
pub struct ResponseCollector {
    id: Uuid,
    questions: Vec<Question>,
    answers: Vec<Answer>,
}

impl ResponseCollector {
    /// Start a session over already sampled questions.
    pub fn new(questions: Vec<Question>) -> Result<Self, SequenceError> {
        if questions.is_empty() {
            return Err(SequenceError::NotSampled);
        }
        let mut seen = HashSet::with_capacity(questions.len());
        if let Some(dup) = questions.iter().find(|q| !seen.insert(q.id)) {
            return Err(SequenceError::DuplicateQuestion {
                question_id: dup.id,
            });
        }
        let answers = Vec::with_capacity(questions.len());
        Ok(Self {
            id: Uuid::new_v4(),
            questions,
            answers,
        })
    }

    /// Sample from `sampler` and start a session.
    pub fn start<R: Rng + ?Sized>(sampler: &Sampler, rng: &mut R) -> Self {
        let questions = sampler.sample(rng);
        Self {
            id: Uuid::new_v4(),
            answers: Vec::with_capacity(questions.len()),
            questions,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        let index = self.answers.len();
        if index >= self.questions.len() {
            SessionState::Complete
        } else {
            SessionState::AwaitingAnswer {
                index,
                total: self.questions.len(),
            }
        }
    }

    /// The question awaiting an answer, if any.
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.answers.len())
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn progress(&self) -> Progress {
        Progress {
            answered: self.answers.len(),
            total: self.questions.len(),
        }
    }

    /// Record the option at `option_index` of the current question.
    pub fn submit(&mut self, option_index: usize) -> Result<SessionState, SequenceError> {
        let Some(question) = self.questions.get(self.answers.len()) else {
            return Err(SequenceError::AlreadyComplete {
                answered: self.answers.len(),
            });
        };

        let option =
            question
                .options
                .get(option_index)
                .ok_or(SequenceError::OptionOutOfRange {
                    question_id: question.id,
                    index: option_index,
                    available: question.options.len(),
                })?;

        let answer = Answer {
            question_id: question.id,
            question_text: question.text.clone(),
            chosen_option_text: option.text.clone(),
            axis: question.axis,
            score: option.score,
        };
        debug!(
            session = %self.id,
            question_id = answer.question_id,
            axis = %answer.axis,
            score = answer.score,
            "answer recorded"
        );
        self.answers.push(answer);

        Ok(self.state())
    }

    /// The ordered answers. Only valid once the session is complete.
    pub fn finalize(&self) -> Result<Vec<Answer>, SequenceError> {
        match self.state() {
            SessionState::Complete => Ok(self.answers.clone()),
            SessionState::AwaitingAnswer { index, total } => Err(SequenceError::Incomplete {
                answered: index,
                total,
            }),
        }
    }
}
