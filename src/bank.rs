//! Question bank: the static catalog of survey items.
//!
//! A bank is loaded once at startup and never mutated. The builtin bank is a
//! process-wide [`Lazy`]; custom banks are loaded from JSON or TOML through
//! [`QuestionBank::from_path`] and shared behind an `Arc`.

use std::collections::HashSet;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::axis::Axis;
use crate::error::ConfigError;
use crate::scoring::MAX_OPTION_WEIGHT;

/// Every question offers exactly this many options.
pub const OPTIONS_PER_QUESTION: usize = 4;

/// One answer choice. `score` is in `[-MAX_OPTION_WEIGHT, MAX_OPTION_WEIGHT]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub text: String,
    pub score: i8,
}

/// A survey item tagged with a single axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub category: String,
    pub text: String,
    pub axis: Axis,
    pub options: Vec<AnswerOption>,
}

/// Validated, immutable set of questions.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

#[derive(Deserialize)]
struct BankFile {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Validate and wrap a list of questions.
    ///
    /// Rejects an empty bank, duplicate ids, blank text, option counts other
    /// than four, and weights outside the allowed range.
    pub fn new(questions: Vec<Question>) -> Result<Self, ConfigError> {
        if questions.is_empty() {
            return Err(ConfigError::invalid_bank("bank is empty"));
        }

        let mut seen = HashSet::with_capacity(questions.len());
        for q in &questions {
            if !seen.insert(q.id) {
                return Err(ConfigError::invalid_bank(format!(
                    "duplicate question id {}",
                    q.id
                )));
            }
            if q.text.trim().is_empty() {
                return Err(ConfigError::invalid_bank(format!(
                    "question {} has no text",
                    q.id
                )));
            }
            if q.options.len() != OPTIONS_PER_QUESTION {
                return Err(ConfigError::invalid_bank(format!(
                    "question {} has {} options (expected {OPTIONS_PER_QUESTION})",
                    q.id,
                    q.options.len()
                )));
            }
            for opt in &q.options {
                if i32::from(opt.score).abs() > MAX_OPTION_WEIGHT {
                    return Err(ConfigError::invalid_bank(format!(
                        "question {} option {:?} has weight {} outside [-{MAX_OPTION_WEIGHT}, {MAX_OPTION_WEIGHT}]",
                        q.id, opt.text, opt.score
                    )));
                }
                if opt.text.trim().is_empty() {
                    return Err(ConfigError::invalid_bank(format!(
                        "question {} has an option with no text",
                        q.id
                    )));
                }
            }
        }

        Ok(Self { questions })
    }

    /// The bank shipped with the crate.
    pub fn builtin() -> &'static QuestionBank {
        &BUILTIN_BANK
    }

    /// Load a bank from a `.json` or `.toml` file with a top-level `questions` list.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_toml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

        let parsed: BankFile = if is_toml {
            toml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        } else {
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        };

        Self::new(parsed.questions)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Number of questions per axis.
    pub fn axis_counts(&self) -> crate::axis::AxisScores<usize> {
        let mut counts = crate::axis::AxisScores::splat(0usize);
        for q in &self.questions {
            counts[q.axis] += 1;
        }
        counts
    }
}

// =============================================================================
// Builtin bank
// =============================================================================

type RawQuestion = (u32, &'static str, Axis, &'static str, [(&'static str, i8); 4]);

static BUILTIN_BANK: Lazy<QuestionBank> = Lazy::new(|| {
    let questions = BUILTIN
        .iter()
        .map(|(id, category, axis, text, options)| Question {
            id: *id,
            category: (*category).to_string(),
            text: (*text).to_string(),
            axis: *axis,
            options: options
                .iter()
                .map(|(text, score)| AnswerOption {
                    text: (*text).to_string(),
                    score: *score,
                })
                .collect(),
        })
        .collect();
    QuestionBank { questions }
});

const BUILTIN: &[RawQuestion] = &[
    // Economy: -Welfare / +Growth
    (1, "Labor", Axis::Economy,
     "Next year's minimum wage increase is being negotiated. What should the government push for?",
     [("A steep raise; a living wage comes first", -2),
      ("A moderate raise paired with subsidies for small shops", -1),
      ("A raise tied strictly to productivity growth", 1),
      ("A freeze; keeping jobs matters more than the wage level", 2)]),
    (2, "Taxation", Axis::Economy,
     "Tax revenue is short of the budget. Where should the gap be closed?",
     [("Cut spending and lower corporate tax to spur investment", 2),
      ("Trim spending and broaden the tax base slightly", 1),
      ("Raise taxes on top incomes and large assets", -1),
      ("Introduce a wealth tax to fund expanded welfare", -2)]),
    (3, "Housing", Axis::Economy,
     "Apartment prices in the capital keep climbing. What is the best response?",
     [("Build large volumes of public rental housing", -2),
      ("Strengthen holding taxes on multiple homes", -1),
      ("Ease reconstruction rules so private supply grows", 1),
      ("Deregulate the market and let supply catch up", 2)]),
    (4, "Welfare", Axis::Economy,
     "A basic income pilot is proposed for all young adults. Your view?",
     [("Adopt it nationwide; income security is a right", -2),
      ("Run the pilot and expand if it works", -1),
      ("Target support only to those in real need", 1),
      ("Reject it; it blunts the incentive to work", 2)]),
    (5, "Industry", Axis::Economy,
     "Large conglomerates dominate key industries. What should policy do?",
     [("Break up concentration and tightly regulate them", -2),
      ("Enforce fair-trade rules with their suppliers more strictly", -1),
      ("Keep oversight light; they anchor exports", 1),
      ("Remove regulations so they can compete globally", 2)]),
    (6, "Labor", Axis::Economy,
     "Should the 52-hour working week cap be relaxed for busy seasons?",
     [("Yes, firms need the flexibility to stay competitive", 2),
      ("Yes, but only with extra pay and worker consent", 1),
      ("No, the cap protects health and should stay", -1),
      ("No, it should be cut further toward a 4-day week", -2)]),
    // Society: -Liberty / +Order
    (7, "Justice", Axis::Society,
     "Should the death penalty be actively carried out for heinous crimes?",
     [("Yes, executions should resume without delay", 2),
      ("Keep it on the books for the most extreme cases", 1),
      ("Replace it with life imprisonment without parole", -1),
      ("Abolish it entirely; the state must not take lives", -2)]),
    (8, "Speech", Axis::Society,
     "Online defamation is criminally punishable even when the statement is true. Should that change?",
     [("Decriminalize it; truth should never be a crime", -2),
      ("Narrow it to clearly malicious cases", -1),
      ("Keep it to protect reputations online", 1),
      ("Strengthen penalties to curb online abuse", 2)]),
    (9, "Rights", Axis::Society,
     "A comprehensive anti-discrimination act is before the assembly. Your stance?",
     [("Pass it in full as soon as possible", -2),
      ("Pass it with exemptions for religious groups", -1),
      ("Delay until broader social consensus forms", 1),
      ("Oppose it; existing laws are sufficient", 2)]),
    (10, "Security", Axis::Society,
     "Police want to expand CCTV with facial recognition in public spaces.",
     [("Expand it nationwide; safety comes first", 2),
      ("Allow it in high-crime areas under oversight", 1),
      ("Limit it strictly with warrants and audits", -1),
      ("Ban facial recognition in public spaces", -2)]),
    (11, "Education", Axis::Society,
     "Student rights ordinances limit how teachers can discipline pupils. What now?",
     [("Repeal them and restore teachers' authority", 2),
      ("Revise them to balance teacher authority", 1),
      ("Keep them and add support for teachers", -1),
      ("Expand them; students deserve full rights", -2)]),
    (12, "Drugs", Axis::Society,
     "How should the law treat personal cannabis use?",
     [("Legalize and regulate it like alcohol", -2),
      ("Allow medical use and lighten penalties", -1),
      ("Keep it illegal with treatment options", 1),
      ("Punish it strictly to prevent spread", 2)]),
    // Diplomacy: -Autonomy / +Alliance
    (13, "Alliance", Axis::Diplomacy,
     "Host-nation cost sharing for allied troops is up for renewal. What should we do?",
     [("Pay more; the alliance is our core security asset", 2),
      ("Accept a modest increase to keep ties smooth", 1),
      ("Hold the line and negotiate hard", -1),
      ("Cut it sharply and plan for self-reliant defense", -2)]),
    (14, "Regional", Axis::Diplomacy,
     "How should we approach trilateral security cooperation with our ally and Japan?",
     [("Deepen it into a formal security framework", 2),
      ("Cooperate on specific threats case by case", 1),
      ("Stay cautious given unresolved historical issues", -1),
      ("Avoid it; keep our diplomacy independent", -2)]),
    (15, "North Korea", Axis::Diplomacy,
     "What should drive policy toward the North?",
     [("Dialogue and economic cooperation led by ourselves", -2),
      ("Engagement alongside sanctions relief steps", -1),
      ("Pressure coordinated closely with allies", 1),
      ("Maximum pressure until denuclearization", 2)]),
    (16, "Defense", Axis::Diplomacy,
     "Should wartime operational control be transferred back to our own military soon?",
     [("Yes, immediately; sovereignty demands it", -2),
      ("Yes, on a fixed timeline", -1),
      ("Only once all conditions are fully met", 1),
      ("No, the joint command structure works best", 2)]),
    (17, "Trade", Axis::Diplomacy,
     "Our ally asks us to join export controls against a major trading partner.",
     [("Join fully; values and security come first", 2),
      ("Join selectively where our industry is protected", 1),
      ("Stay neutral and protect our export markets", -1),
      ("Refuse; trade policy must be set independently", -2)]),
    (18, "Nuclear", Axis::Diplomacy,
     "Should we develop our own nuclear deterrent?",
     [("Yes, we cannot rely on others forever", -2),
      ("Keep the option open as leverage", -1),
      ("No, the extended deterrence umbrella suffices", 1),
      ("No, strengthening the alliance is the answer", 2)]),
    // Approach: -Idealism / +Realism
    (19, "Energy", Axis::Approach,
     "How fast should coal and nuclear plants be phased out?",
     [("Phase out quickly, even at higher energy cost", -2),
      ("Phase out gradually as renewables scale", -1),
      ("Keep nuclear as a bridge while costs fall", 1),
      ("Prioritize cheap, stable power over targets", 2)]),
    (20, "Reform", Axis::Approach,
     "A popular reform bill would strain the budget. What should lawmakers do?",
     [("Pass it; principles matter more than cost", -2),
      ("Pass it and find funding along the way", -1),
      ("Scale it down to what is affordable", 1),
      ("Shelve it until the fiscal picture improves", 2)]),
    (21, "Politics", Axis::Approach,
     "Your party can pass a key bill only by compromising with the opposition.",
     [("Compromise; results beat purity", 2),
      ("Compromise on details but keep the core", 1),
      ("Hold firm and make the case to voters", -1),
      ("Refuse; a diluted bill betrays supporters", -2)]),
    (22, "Migration", Axis::Approach,
     "Labor shortages are growing. How should immigration policy respond?",
     [("Open the door widely as a matter of inclusion", -2),
      ("Expand programs with strong integration support", -1),
      ("Admit workers only for specific shortages", 1),
      ("Automate and raise birth rates before immigration", 2)]),
    (23, "Climate", Axis::Approach,
     "Should the national emissions target be raised even if it hurts manufacturing?",
     [("Yes, the climate crisis leaves no choice", -2),
      ("Yes, with transition support for industry", -1),
      ("Keep the current target and focus on delivery", 1),
      ("Lower it; competitiveness comes first", 2)]),
    (24, "Governance", Axis::Approach,
     "What matters most when choosing a leader?",
     [("A clear vision of the society we should become", -2),
      ("Moral integrity and consistency", -1),
      ("A record of getting things done", 1),
      ("Pragmatic skill at managing crises", 2)]),
];
