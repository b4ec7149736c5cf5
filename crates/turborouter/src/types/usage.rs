//! Token usage and cost accounting

use serde::{Deserialize, Serialize};

/// Token usage reported with a completion.
///
/// OpenRouter adds per-request cost fields on top of the usual token counts;
/// they are absent for providers that do not report pricing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens in the prompt
    #[serde(default)]
    pub prompt_tokens: u32,

    /// Tokens in the completion
    #[serde(default)]
    pub completion_tokens: u32,

    /// Prompt plus completion
    #[serde(default)]
    pub total_tokens: u32,

    /// Prompt cost in credits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_cost: Option<f64>,

    /// Completion cost in credits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_cost: Option<f64>,

    /// Total cost in credits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<f64>,
}

impl Usage {
    /// Total cost, summing the parts when only they were reported.
    pub fn cost(&self) -> Option<f64> {
        self.total_cost.or(match (self.prompt_cost, self.completion_cost) {
            (None, None) => None,
            (p, c) => Some(p.unwrap_or(0.0) + c.unwrap_or(0.0)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deserialize_with_costs() {
        let json = r#"{"prompt_tokens": 10, "completion_tokens": 20, "total_tokens": 30, "total_cost": 0.0012}"#;
        let usage: Usage = serde_json::from_str(json).unwrap();
        assert_eq!(usage.total_tokens, 30);
        assert_eq!(usage.cost(), Some(0.0012));
    }

    #[test]
    fn test_cost_from_parts() {
        let usage = Usage {
            prompt_cost: Some(0.5),
            completion_cost: Some(0.25),
            ..Default::default()
        };
        assert_eq!(usage.cost(), Some(0.75));
        assert_eq!(Usage::default().cost(), None);
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let usage: Usage = serde_json::from_str("{}").unwrap();
        assert_eq!(usage, Usage::default());
        let json = serde_json::to_value(usage).unwrap();
        assert!(json.get("total_cost").is_none());
    }
}
