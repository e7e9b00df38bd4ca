use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Profile, Recommendation};

/// A (profile, recommendations) pair sent to the history store for audit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub age: u32,
    pub height: u32,
    pub weight: u32,
    pub complaints: Vec<Uuid>,
    pub recommendations: Vec<Recommendation>,
    pub risk_accepted: bool,
    /// Id of the HTTP request that produced this submission, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Submission {
    pub fn new(
        profile: &Profile,
        recommendations: Vec<Recommendation>,
        risk_accepted: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            age: profile.age(),
            height: profile.height_cm(),
            weight: profile.weight_kg(),
            complaints: profile.complaint_ids().iter().copied().collect(),
            recommendations,
            risk_accepted,
            request_id: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_request_id(mut self, request_id: Option<Uuid>) -> Self {
        self.request_id = request_id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_submission_copies_profile() {
        let complaint = Uuid::new_v4();
        let profile = Profile::new(40, 170, 65, [complaint]).unwrap();
        let submission = Submission::new(&profile, vec![], true);

        assert_eq!(submission.age, 40);
        assert_eq!(submission.height, 170);
        assert_eq!(submission.weight, 65);
        assert_eq!(submission.complaints, vec![complaint]);
        assert!(submission.risk_accepted);
        assert!(submission.request_id.is_none());
    }

    #[test]
    fn test_request_id_is_optional_in_json() {
        let profile = Profile::new(40, 170, 65, []).unwrap();
        let submission = Submission::new(&profile, vec![], true);
        let json = serde_json::to_value(&submission).unwrap();
        assert!(json.get("request_id").is_none());

        let request_id = Uuid::new_v4();
        let tagged = submission.with_request_id(Some(request_id));
        assert_eq!(tagged.request_id, Some(request_id));
    }
}
