//! Per-session question sampling.
//!
//! Randomness is injected by the caller so a fixed seed reproduces a session.
//! It only varies session content and need not be cryptographically strong.

use std::sync::Arc;

use rand::seq::index;
use rand::Rng;

use crate::bank::{Question, QuestionBank};
use crate::error::ConfigError;

/// Questions per session unless configured otherwise.
pub const DEFAULT_SAMPLE_SIZE: usize = 15;

/// Draws `k` distinct questions in random order.
///
/// Fails when the bank holds fewer than `k` questions.
pub fn sample<R: Rng + ?Sized>(
    bank: &QuestionBank,
    k: usize,
    rng: &mut R,
) -> Result<Vec<Question>, ConfigError> {
    check_size(bank, k)?;
    Ok(draw(bank, k, rng))
}

fn check_size(bank: &QuestionBank, k: usize) -> Result<(), ConfigError> {
    if k == 0 {
        return Err(ConfigError::ZeroSampleSize);
    }
    if bank.len() < k {
        return Err(ConfigError::BankTooSmall {
            available: bank.len(),
            requested: k,
        });
    }
    Ok(())
}

fn draw<R: Rng + ?Sized>(bank: &QuestionBank, k: usize, rng: &mut R) -> Vec<Question> {
    // index::sample returns distinct indices in shuffled order.
    let questions = bank.questions();
    index::sample(rng, questions.len(), k)
        .into_iter()
        .map(|i| questions[i].clone())
        .collect()
}

/// A sampler bound to one bank and sample size, validated at construction.
///
/// Build one at startup; [`Sampler::sample`] cannot fail afterwards.
#[derive(Debug, Clone)]
pub struct Sampler {
    bank: Arc<QuestionBank>,
    size: usize,
}

impl Sampler {
    pub fn new(bank: Arc<QuestionBank>, size: usize) -> Result<Self, ConfigError> {
        check_size(&bank, size)?;
        Ok(Self { bank, size })
    }

    /// Sampler over the builtin bank with the default size.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::new(
            Arc::new(QuestionBank::builtin().clone()),
            DEFAULT_SAMPLE_SIZE,
        )
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Question> {
        draw(&self.bank, self.size, rng)
    }
}
