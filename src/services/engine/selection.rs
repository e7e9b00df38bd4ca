use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use crate::models::{Complaint, Supplement};

/// Upper bound on recommendations per generation, whatever the catalog size
pub const MAX_RECOMMENDATIONS: usize = 5;

/// How eligible supplements are chosen and ordered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// First eligible supplements in catalog order. Selected complaints are ignored.
    #[default]
    CatalogOrder,
    /// Ranks by how many selected complaints a supplement is indicated for,
    /// then by lower risk, then by catalog order.
    ComplaintOverlap,
}

/// A supplement picked for output together with its complaint overlap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selected<'a> {
    pub supplement: &'a Supplement,
    /// Selected complaints this supplement is indicated for
    pub overlap: usize,
}

/// Chooses at most `MAX_RECOMMENDATIONS` supplements from the eligible set.
///
/// Output is a pure function of the inputs; ties keep catalog order.
pub fn select<'a>(
    policy: SelectionPolicy,
    eligible: Vec<&'a Supplement>,
    selected_complaints: &[&Complaint],
) -> Vec<Selected<'a>> {
    let wanted: HashSet<Uuid> = selected_complaints.iter().map(|c| c.id).collect();

    let mut scored: Vec<Selected<'a>> = eligible
        .into_iter()
        .map(|supplement| Selected {
            supplement,
            overlap: overlap(supplement, &wanted),
        })
        .collect();

    if policy == SelectionPolicy::ComplaintOverlap {
        // sort_by is stable, so equal keys stay in catalog order
        scored.sort_by(|a, b| {
            b.overlap
                .cmp(&a.overlap)
                .then_with(|| a.supplement.risk_level.cmp(&b.supplement.risk_level))
        });
    }

    scored.truncate(MAX_RECOMMENDATIONS);
    scored
}

fn overlap(supplement: &Supplement, wanted: &HashSet<Uuid>) -> usize {
    supplement
        .indications
        .iter()
        .collect::<HashSet<_>>()
        .into_iter()
        .filter(|id| wanted.contains(id))
        .count()
}
