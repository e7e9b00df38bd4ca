//! Recommendation engine for the mixer.
//!
//! Pure and synchronous: filters the supplement catalog by age, selects at most
//! five entries under a [`SelectionPolicy`], and shapes them into
//! [`Recommendation`]s. Reads only immutable catalog snapshots, so it can be
//! called concurrently without coordination.

pub mod eligibility;
pub mod selection;
pub mod shaping;

pub use eligibility::eligible_supplements;
pub use selection::{SelectionPolicy, MAX_RECOMMENDATIONS};

use crate::models::{Catalog, Complaint, Profile, Recommendation, Supplement};

/// Generates a ranked recommendation list (length 0..=5).
///
/// `selected_complaints` are the catalog complaints the user picked. An empty
/// result means nothing was eligible and is not an error.
pub fn generate_recommendations(
    age: u32,
    selected_complaints: &[&Complaint],
    catalog: &[Supplement],
    policy: SelectionPolicy,
) -> Vec<Recommendation> {
    let eligible = eligibility::eligible_supplements(age, catalog);
    let selected = selection::select(policy, eligible, selected_complaints);

    selected
        .iter()
        .map(|s| shaping::to_recommendation(s, policy, selected_complaints.len()))
        .collect()
}

/// Engine bound to a selection policy
#[derive(Debug, Clone, Copy, Default)]
pub struct RecommendationEngine {
    policy: SelectionPolicy,
}

impl RecommendationEngine {
    pub fn new(policy: SelectionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    /// Runs the engine for a validated profile against a catalog snapshot
    pub fn generate(&self, profile: &Profile, catalog: &Catalog) -> Vec<Recommendation> {
        let selected_complaints = catalog.selected_complaints(profile.complaint_ids());

        if selected_complaints.len() < profile.complaint_ids().len() {
            tracing::debug!(
                requested = profile.complaint_ids().len(),
                known = selected_complaints.len(),
                "Dropping complaint ids not present in catalog"
            );
        }

        let recommendations = generate_recommendations(
            profile.age(),
            &selected_complaints,
            &catalog.supplements,
            self.policy,
        );

        tracing::debug!(
            policy = ?self.policy,
            catalog_size = catalog.supplements.len(),
            recommendation_count = recommendations.len(),
            "Generated recommendations"
        );

        recommendations
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use uuid::Uuid;

    use crate::models::{AgeRestrictions, Complaint, RiskLevel, Supplement};

    pub fn supplement(name: &str) -> Supplement {
        Supplement {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: String::new(),
            default_dosage: Some("1 capsule daily".to_string()),
            side_effects: Some("None known".to_string()),
            risk_level: RiskLevel::new(2).unwrap(),
            contraindications: None,
            age_restrictions: None,
            indications: vec![],
        }
    }

    pub fn restricted(name: &str, min_age: Option<u32>, max_age: Option<u32>) -> Supplement {
        Supplement {
            age_restrictions: Some(AgeRestrictions { min_age, max_age }),
            ..supplement(name)
        }
    }

    pub fn with_risk(mut supplement: Supplement, level: u8) -> Supplement {
        supplement.risk_level = RiskLevel::new(level).unwrap();
        supplement
    }

    pub fn with_indications(mut supplement: Supplement, complaints: &[Uuid]) -> Supplement {
        supplement.indications = complaints.to_vec();
        supplement
    }

    pub fn complaint(name: &str) -> Complaint {
        Complaint {
            id: Uuid::new_v4(),
            name: name.to_string(),
            category: "general".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::models::{SuccessRate, DOSAGE_FALLBACK, SIDE_EFFECTS_FALLBACK};

    #[test]
    fn test_age_ten_scenario() {
        let catalog = vec![restricted("Creatine", Some(18), None), supplement("Vitamin C")];

        let recs = generate_recommendations(10, &[], &catalog, SelectionPolicy::CatalogOrder);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].supplement_name, "Vitamin C");
    }

    #[test]
    fn test_eight_eligible_yields_first_five_in_order() {
        let catalog: Vec<Supplement> = ["A", "B", "C", "D", "E", "F", "G", "H"]
            .iter()
            .map(|n| supplement(n))
            .collect();

        let recs = generate_recommendations(35, &[], &catalog, SelectionPolicy::CatalogOrder);
        let names: Vec<&str> = recs.iter().map(|r| r.supplement_name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn test_no_eligible_supplements_is_empty_not_error() {
        let catalog = vec![restricted("Adults only", Some(21), None)];
        assert!(generate_recommendations(16, &[], &catalog, SelectionPolicy::CatalogOrder).is_empty());
        assert!(generate_recommendations(16, &[], &[], SelectionPolicy::CatalogOrder).is_empty());
    }

    #[test]
    fn test_output_never_exceeds_cap() {
        let sleep = complaint("Insomnia");
        for size in [0usize, 1, 4, 5, 6, 20, 100] {
            let catalog: Vec<Supplement> = (0..size)
                .map(|i| with_indications(supplement(&format!("S{i}")), &[sleep.id]))
                .collect();
            for policy in [SelectionPolicy::CatalogOrder, SelectionPolicy::ComplaintOverlap] {
                let recs = generate_recommendations(30, &[&sleep], &catalog, policy);
                assert_eq!(recs.len(), size.min(MAX_RECOMMENDATIONS));
            }
        }
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let stress = complaint("Stress");
        let catalog = vec![
            with_risk(supplement("Rhodiola"), 3),
            with_indications(with_risk(supplement("L-theanine"), 1), &[stress.id]),
            restricted("Kava", Some(18), Some(60)),
            supplement("B complex"),
        ];

        for policy in [SelectionPolicy::CatalogOrder, SelectionPolicy::ComplaintOverlap] {
            let first = generate_recommendations(45, &[&stress], &catalog, policy);
            let second = generate_recommendations(45, &[&stress], &catalog, policy);
            assert_eq!(
                serde_json::to_vec(&first).unwrap(),
                serde_json::to_vec(&second).unwrap()
            );
        }
    }

    #[test]
    fn test_risk_level_copied_and_fallbacks_applied() {
        let mut bare = with_risk(supplement("Unlabelled"), 5);
        bare.default_dosage = None;
        bare.side_effects = Some(String::new());

        let recs = generate_recommendations(30, &[], &[bare.clone()], SelectionPolicy::CatalogOrder);
        assert_eq!(recs[0].risk_level, bare.risk_level);
        assert_eq!(recs[0].dosage, DOSAGE_FALLBACK);
        assert_eq!(recs[0].side_effects, SIDE_EFFECTS_FALLBACK);
        assert_eq!(recs[0].success_rate, SuccessRate::Medium);
    }

    #[test]
    fn test_engine_uses_profile_complaints() {
        let sleep = complaint("Insomnia");
        let catalog = Catalog::new(
            vec![sleep.clone()],
            vec![
                supplement("Iron"),
                with_indications(supplement("Melatonin"), &[sleep.id]),
            ],
        );
        let profile = Profile::new(30, 170, 70, [sleep.id, uuid::Uuid::new_v4()]).unwrap();

        let baseline = RecommendationEngine::default().generate(&profile, &catalog);
        assert_eq!(baseline[0].supplement_name, "Iron");

        let ranked = RecommendationEngine::new(SelectionPolicy::ComplaintOverlap).generate(&profile, &catalog);
        assert_eq!(ranked[0].supplement_name, "Melatonin");
        assert_eq!(ranked[0].success_rate, SuccessRate::High);
        assert_eq!(ranked[1].success_rate, SuccessRate::Low);
    }
}
