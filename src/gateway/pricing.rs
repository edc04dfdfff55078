//! Chat model pricing table.
//!
//! Costs are in nanodollars (1e-9 USD) per token. Used to attach a cost to
//! each usage record; unknown models fall back to a mid-range default.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Pricing information for a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelPricing {
    /// Cost per input token in nanodollars.
    pub input_nanos_per_token: i64,
    /// Cost per output token in nanodollars.
    pub output_nanos_per_token: i64,
}

impl ModelPricing {
    const fn new(input: i64, output: i64) -> Self {
        Self {
            input_nanos_per_token: input,
            output_nanos_per_token: output,
        }
    }

    /// Calculate cost for a request.
    pub fn calculate_cost(&self, input_tokens: u32, output_tokens: u32) -> i64 {
        (input_tokens as i64) * self.input_nanos_per_token
            + (output_tokens as i64) * self.output_nanos_per_token
    }
}

// OpenRouter list prices (verify periodically against the model pages)
// Gemini 2.5 Flash: $0.30/1M input, $2.50/1M output
// Gemini 2.5 Pro: $1.25/1M input, $10.00/1M output
// GPT-5-mini: $0.25/1M input, $2.00/1M output
// GPT-4o-mini: $0.15/1M input, $0.60/1M output
// Claude Haiku 4.5: $1.00/1M input, $5.00/1M output

const GEMINI_25_FLASH: ModelPricing = ModelPricing::new(300, 2_500);
const GEMINI_25_PRO: ModelPricing = ModelPricing::new(1_250, 10_000);
const GPT_5_MINI: ModelPricing = ModelPricing::new(250, 2_000);
const GPT_4O_MINI: ModelPricing = ModelPricing::new(150, 600);
const CLAUDE_HAIKU_4_5: ModelPricing = ModelPricing::new(1_000, 5_000);

const UNKNOWN_MODEL: ModelPricing = ModelPricing::new(1_000, 5_000);

static PRICING_MAP: OnceLock<HashMap<&'static str, ModelPricing>> = OnceLock::new();

fn init_pricing() -> HashMap<&'static str, ModelPricing> {
    let mut map = HashMap::new();
    map.insert("google/gemini-2.5-flash", GEMINI_25_FLASH);
    map.insert("google/gemini-2.5-pro", GEMINI_25_PRO);
    map.insert("openai/gpt-5-mini", GPT_5_MINI);
    map.insert("openai/gpt-4o-mini", GPT_4O_MINI);
    map.insert("anthropic/claude-haiku-4.5", CLAUDE_HAIKU_4_5);
    map
}

/// Get pricing for a model.
pub fn get_pricing(model_id: &str) -> Option<ModelPricing> {
    let map = PRICING_MAP.get_or_init(init_pricing);
    map.get(model_id).copied()
}

/// Calculate chat cost.
pub fn chat_cost(model: &str, input_tokens: u32, output_tokens: u32) -> i64 {
    get_pricing(model)
        .unwrap_or(UNKNOWN_MODEL)
        .calculate_cost(input_tokens, output_tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_cost() {
        // 1K input + 1K output for Gemini 2.5 Flash
        // Input: 1000 * 300 = 300,000 nanos
        // Output: 1000 * 2500 = 2,500,000 nanos
        let cost = chat_cost("google/gemini-2.5-flash", 1_000, 1_000);
        assert_eq!(cost, 2_800_000);
    }

    #[test]
    fn unknown_model_uses_default() {
        assert!(get_pricing("acme/unknown").is_none());
        assert_eq!(chat_cost("acme/unknown", 1, 1), 6_000);
    }
}
