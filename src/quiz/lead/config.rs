use serde::{Deserialize, Serialize};

/// Tuning knobs for the lead score heuristic.
///
/// The values are sales-team dials, not derived from any model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadScoreConfig {
    pub base: f64,
    pub ready_bonus: f64,
    pub potential_bonus: f64,
    pub positive_answer_weight: f64,
    pub ready_keywords: Vec<String>,
    pub potential_keywords: Vec<String>,
}

impl Default for LeadScoreConfig {
    fn default() -> Self {
        Self {
            base: 50.0,
            ready_bonus: 30.0,
            potential_bonus: 15.0,
            positive_answer_weight: 20.0,
            ready_keywords: ["spreman", "spremni", "spremna", "ready"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            potential_keywords: ["potencijal", "potential"]
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}
