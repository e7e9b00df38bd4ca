use serde::{Deserialize, Serialize};

use super::RiskLevel;

/// Shown when a supplement has no default dosage on record
pub const DOSAGE_FALLBACK: &str = "Consult a physician";

/// Shown when a supplement has no side-effect information on record
pub const SIDE_EFFECTS_FALLBACK: &str = "Information unavailable";

/// Non-diagnostic disclaimer restated alongside every result
pub const DISCLAIMER: &str = "These suggestions are not personalised medical advice, diagnosis or \
treatment. Consult a doctor or dietitian before taking any supplement. Risk accepted.";

/// Qualitative success label attached to every recommendation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SuccessRate {
    Low,
    #[default]
    Medium,
    High,
}

/// One user-facing suggestion derived from an eligible supplement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub supplement_name: String,
    pub dosage: String,
    pub side_effects: String,
    pub risk_level: RiskLevel,
    pub success_rate: SuccessRate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_rate_serialization() {
        assert_eq!(serde_json::to_string(&SuccessRate::Medium).unwrap(), "\"Medium\"");
        assert_eq!(SuccessRate::default(), SuccessRate::Medium);
    }

    #[test]
    fn test_recommendation_json_shape() {
        let rec = Recommendation {
            supplement_name: "Magnesium".to_string(),
            dosage: "200 mg".to_string(),
            side_effects: SIDE_EFFECTS_FALLBACK.to_string(),
            risk_level: RiskLevel::new(2).unwrap(),
            success_rate: SuccessRate::Medium,
        };

        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["supplement_name"], "Magnesium");
        assert_eq!(json["risk_level"], 2);
        assert_eq!(json["success_rate"], "Medium");
    }
}
