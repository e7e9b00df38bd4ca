use crate::models::{
    Recommendation, SuccessRate, Supplement, DOSAGE_FALLBACK, SIDE_EFFECTS_FALLBACK,
};

use super::selection::{SelectionPolicy, Selected};

/// Maps a selected supplement to the user-facing recommendation
pub fn to_recommendation(
    selected: &Selected<'_>,
    policy: SelectionPolicy,
    selected_complaint_count: usize,
) -> Recommendation {
    let supplement: &Supplement = selected.supplement;

    Recommendation {
        supplement_name: supplement.name.clone(),
        dosage: text_or(supplement.default_dosage.as_deref(), DOSAGE_FALLBACK),
        side_effects: text_or(supplement.side_effects.as_deref(), SIDE_EFFECTS_FALLBACK),
        risk_level: supplement.risk_level,
        success_rate: success_rate(policy, selected.overlap, selected_complaint_count),
    }
}

/// Copies `value` as stored unless it is missing or blank
fn text_or(value: Option<&str>, fallback: &str) -> String {
    match value {
        Some(text) if !text.trim().is_empty() => text.to_string(),
        _ => fallback.to_string(),
    }
}

/// Catalog order always reports Medium. Complaint overlap grades by coverage.
fn success_rate(
    policy: SelectionPolicy,
    overlap: usize,
    selected_complaint_count: usize,
) -> SuccessRate {
    match policy {
        SelectionPolicy::CatalogOrder => SuccessRate::Medium,
        SelectionPolicy::ComplaintOverlap => match (overlap, selected_complaint_count) {
            (_, 0) => SuccessRate::Medium,
            (0, _) => SuccessRate::Low,
            (hit, total) if hit >= total => SuccessRate::High,
            _ => SuccessRate::Medium,
        },
    }
}
