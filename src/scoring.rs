//! Scoring engine: answers → per-axis normalized profile.
//!
//! For every axis the engine sums the chosen weights (`raw`) and the largest
//! magnitude the presented questions could have produced (`max_magnitude`,
//! `MAX_OPTION_WEIGHT` per question touching the axis). Normalization maps
//! `raw / max_magnitude ∈ [-1, 1]` onto `[0, 100]`:
//!
//! ```text
//! normalized = round(((raw / max_magnitude) + 1) * 50)
//! ```
//!
//! An axis no sampled question touched normalizes to the neutral 50.
//!
//! Rounding is `f64::round` (half away from zero). The rounded quantity is
//! never negative, so this agrees with half-up rounding on every input.

use serde::Serialize;

use crate::axis::{AxisScores, NEUTRAL_SCORE};
use crate::session::Answer;

/// Largest absolute weight a single option may carry.
///
/// Fixed rather than inferred from the answers, so an axis where the
/// respondent only picked negative options is not compressed.
pub const MAX_OPTION_WEIGHT: i32 = 2;

/// Upper bound of the normalized scale.
pub const MAX_SCORE: u8 = 100;

/// Intermediate and final values of one scoring pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub raw: AxisScores<i32>,
    pub max_magnitude: AxisScores<i32>,
    pub normalized: AxisScores<u8>,
}

/// Normalized scores for a completed answer sequence.
pub fn score(answers: &[Answer]) -> AxisScores<u8> {
    score_breakdown(answers).normalized
}

/// Raw sums, maximum magnitudes and normalized scores.
pub fn score_breakdown(answers: &[Answer]) -> ScoreBreakdown {
    let mut raw = AxisScores::splat(0i32);
    let mut max_magnitude = AxisScores::splat(0i32);

    for answer in answers {
        raw[answer.axis] += i32::from(answer.score);
        max_magnitude[answer.axis] += MAX_OPTION_WEIGHT;
    }

    let normalized = AxisScores::from_fn(|axis| normalize(raw[axis], max_magnitude[axis]));

    ScoreBreakdown {
        raw,
        max_magnitude,
        normalized,
    }
}

/// Map a raw sum onto `[0, 100]` given the maximum reachable magnitude.
pub fn normalize(raw: i32, max_magnitude: i32) -> u8 {
    if max_magnitude <= 0 {
        return NEUTRAL_SCORE;
    }
    let ratio = f64::from(raw) / f64::from(max_magnitude);
    let scaled = ((ratio + 1.0) * 50.0).round();
    scaled.clamp(0.0, f64::from(MAX_SCORE)) as u8
}
