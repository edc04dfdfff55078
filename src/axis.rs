//! The four profile axes and per-axis score maps.
//!
//! Every axis runs from a "low" pole (0) to a "high" pole (100) with 50 as the
//! neutral midpoint:
//!
//! | Axis        | 0         | 100      |
//! |-------------|-----------|----------|
//! | `economy`   | Welfare   | Growth   |
//! | `society`   | Liberty   | Order    |
//! | `diplomacy` | Autonomy  | Alliance |
//! | `approach`  | Idealism  | Realism  |
//!
//! Positive option weights push toward the high pole.

use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Neutral midpoint of the normalized scale.
pub const NEUTRAL_SCORE: u8 = 50;

/// Scores within this distance of [`NEUTRAL_SCORE`] read as neutral.
pub const NEUTRAL_BAND: u8 = 10;

// =============================================================================
// Axis
// =============================================================================

/// One dimension of the profile. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Economy,
    Society,
    Diplomacy,
    Approach,
}

impl Axis {
    /// All axes in declaration order.
    pub const ALL: [Axis; 4] = [Axis::Economy, Axis::Society, Axis::Diplomacy, Axis::Approach];

    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::Economy => "economy",
            Axis::Society => "society",
            Axis::Diplomacy => "diplomacy",
            Axis::Approach => "approach",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Axis::Economy => "Economy",
            Axis::Society => "Society",
            Axis::Diplomacy => "Diplomacy",
            Axis::Approach => "Approach",
        }
    }

    /// `(low pole, high pole)`.
    pub fn poles(&self) -> (&'static str, &'static str) {
        match self {
            Axis::Economy => ("Welfare", "Growth"),
            Axis::Society => ("Liberty", "Order"),
            Axis::Diplomacy => ("Autonomy", "Alliance"),
            Axis::Approach => ("Idealism", "Realism"),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Axis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "economy" => Ok(Axis::Economy),
            "society" => Ok(Axis::Society),
            "diplomacy" => Ok(Axis::Diplomacy),
            "approach" => Ok(Axis::Approach),
            other => Err(format!("unknown axis: {other}")),
        }
    }
}

// =============================================================================
// Leaning
// =============================================================================

/// Coarse reading of a normalized score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leaning {
    Low,
    Neutral,
    High,
}

impl Leaning {
    pub fn of(score: u8) -> Self {
        if score.saturating_add(NEUTRAL_BAND) < NEUTRAL_SCORE {
            Leaning::Low
        } else if score > NEUTRAL_SCORE + NEUTRAL_BAND {
            Leaning::High
        } else {
            Leaning::Neutral
        }
    }

    /// Pole name for this leaning on `axis`, or `"Center"`.
    pub fn describe(&self, axis: Axis) -> &'static str {
        let (low, high) = axis.poles();
        match self {
            Leaning::Low => low,
            Leaning::Neutral => "Center",
            Leaning::High => high,
        }
    }
}

// =============================================================================
// AxisScores
// =============================================================================

/// One value per [`Axis`].
///
/// `AxisScores<i32>` holds raw sums, `AxisScores<u8>` the normalized profile.
/// Serializes as `{ "economy": .., "society": .., "diplomacy": .., "approach": .. }`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AxisScores<T> {
    pub economy: T,
    pub society: T,
    pub diplomacy: T,
    pub approach: T,
}

impl<T> AxisScores<T> {
    pub fn from_fn(mut f: impl FnMut(Axis) -> T) -> Self {
        Self {
            economy: f(Axis::Economy),
            society: f(Axis::Society),
            diplomacy: f(Axis::Diplomacy),
            approach: f(Axis::Approach),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Axis, &T)> {
        Axis::ALL.into_iter().map(move |axis| (axis, &self[axis]))
    }

    pub fn map<U>(&self, mut f: impl FnMut(Axis, &T) -> U) -> AxisScores<U> {
        AxisScores::from_fn(|axis| f(axis, &self[axis]))
    }
}

impl<T: Clone> AxisScores<T> {
    pub fn splat(value: T) -> Self {
        Self::from_fn(|_| value.clone())
    }
}

impl<T> Index<Axis> for AxisScores<T> {
    type Output = T;

    fn index(&self, axis: Axis) -> &T {
        match axis {
            Axis::Economy => &self.economy,
            Axis::Society => &self.society,
            Axis::Diplomacy => &self.diplomacy,
            Axis::Approach => &self.approach,
        }
    }
}

impl<T> IndexMut<Axis> for AxisScores<T> {
    fn index_mut(&mut self, axis: Axis) -> &mut T {
        match axis {
            Axis::Economy => &mut self.economy,
            Axis::Society => &mut self.society,
            Axis::Diplomacy => &mut self.diplomacy,
            Axis::Approach => &mut self.approach,
        }
    }
}

impl AxisScores<u8> {
    /// Axes ordered by distance from neutral, strongest first.
    ///
    /// Ties keep declaration order.
    pub fn by_strength(&self) -> Vec<(Axis, u8)> {
        let mut ranked: Vec<(Axis, u8)> = self.iter().map(|(axis, v)| (axis, *v)).collect();
        ranked.sort_by_key(|(_, v)| std::cmp::Reverse(v.abs_diff(NEUTRAL_SCORE)));
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_roundtrips_through_str_and_serde() {
        for axis in Axis::ALL {
            assert_eq!(axis.as_str().parse::<Axis>().unwrap(), axis);
            let json = serde_json::to_string(&axis).unwrap();
            assert_eq!(json, format!("\"{}\"", axis.as_str()));
        }
        assert!("culture".parse::<Axis>().is_err());
    }

    #[test]
    fn index_matches_fields() {
        let mut scores = AxisScores::splat(0i32);
        scores[Axis::Diplomacy] += 3;
        assert_eq!(scores.diplomacy, 3);
        assert_eq!(scores.economy, 0);
    }

    #[test]
    fn serializes_with_axis_keys() {
        let scores = AxisScores {
            economy: 10u8,
            society: 20,
            diplomacy: 30,
            approach: 40,
        };
        let v = serde_json::to_value(scores).unwrap();
        assert_eq!(v["economy"], 10);
        assert_eq!(v["approach"], 40);
    }

    #[test]
    fn leaning_bands() {
        assert_eq!(Leaning::of(0), Leaning::Low);
        assert_eq!(Leaning::of(39), Leaning::Low);
        assert_eq!(Leaning::of(40), Leaning::Neutral);
        assert_eq!(Leaning::of(60), Leaning::Neutral);
        assert_eq!(Leaning::of(61), Leaning::High);
        assert_eq!(Leaning::High.describe(Axis::Society), "Order");
    }

    #[test]
    fn by_strength_orders_by_distance_then_declaration() {
        let scores = AxisScores {
            economy: 60u8,
            society: 10,
            diplomacy: 40,
            approach: 95,
        };
        let order: Vec<Axis> = scores.by_strength().into_iter().map(|(a, _)| a).collect();
        assert_eq!(
            order,
            vec![Axis::Approach, Axis::Society, Axis::Economy, Axis::Diplomacy]
        );
    }
}
