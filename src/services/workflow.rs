use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Catalog, Profile, ProfileForm, Recommendation, Submission},
    services::{engine::RecommendationEngine, history::SubmissionSink},
};

/// Phase of a mixer session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Collecting,
    Generating,
    Presenting,
}

/// Results held while a session is presenting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub submission_id: Uuid,
    pub profile: Profile,
    pub recommendations: Vec<Recommendation>,
    pub risk_accepted: bool,
}

#[derive(Debug, Clone, PartialEq)]
enum SessionState {
    Collecting,
    Generating,
    Presenting(Outcome),
}

/// One pass through the mixer form: Collecting -> Generating -> Presenting -> (reset) Collecting
#[derive(Debug, Clone)]
pub struct MixerSession {
    id: Uuid,
    created_at: DateTime<Utc>,
    state: SessionState,
}

impl Default for MixerSession {
    fn default() -> Self {
        Self::new()
    }
}

impl MixerSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            state: SessionState::Collecting,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// True once the session has been open for longer than `ttl` at `now`
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: std::time::Duration) -> bool {
        (now - self.created_at)
            .to_std()
            .map_or(false, |age| age > ttl)
    }

    pub fn phase(&self) -> SessionPhase {
        match self.state {
            SessionState::Collecting => SessionPhase::Collecting,
            SessionState::Generating => SessionPhase::Generating,
            SessionState::Presenting(_) => SessionPhase::Presenting,
        }
    }

    /// Results of the last generation, present only while presenting
    pub fn outcome(&self) -> Option<&Outcome> {
        match &self.state {
            SessionState::Presenting(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Validates the form, runs the engine and dispatches the history write.
    ///
    /// On a validation failure (including a missing risk acknowledgment) the
    /// session stays in `Collecting` and nothing is dispatched. The history
    /// write is handed to `sink` and never awaited.
    pub fn submit(
        &mut self,
        form: &ProfileForm,
        catalog: &Catalog,
        engine: &RecommendationEngine,
        sink: &dyn SubmissionSink,
        request_id: Option<Uuid>,
    ) -> AppResult<&Outcome> {
        if self.phase() != SessionPhase::Collecting {
            return Err(AppError::InvalidTransition(format!(
                "session {} is {:?}; reset it before submitting again",
                self.id,
                self.phase()
            )));
        }

        let profile = form.validate().map_err(|errors| {
            tracing::info!(session_id = %self.id, errors = %errors, "Mixer submission rejected");
            AppError::Validation(errors)
        })?;

        self.state = SessionState::Generating;
        let recommendations = engine.generate(&profile, catalog);

        let submission = Submission::new(&profile, recommendations.clone(), form.risk_accepted)
            .with_request_id(request_id);
        let submission_id = submission.id;
        sink.dispatch(submission);

        tracing::info!(
            session_id = %self.id,
            submission_id = %submission_id,
            recommendation_count = recommendations.len(),
            "Mixer recommendations generated"
        );

        self.state = SessionState::Presenting(Outcome {
            submission_id,
            profile,
            recommendations,
            risk_accepted: form.risk_accepted,
        });

        match &self.state {
            SessionState::Presenting(outcome) => Ok(outcome),
            _ => Err(AppError::Internal("session left presenting state".to_string())),
        }
    }

    /// Discards the profile and results and returns to `Collecting`
    pub fn reset(&mut self) {
        if self.phase() != SessionPhase::Collecting {
            tracing::debug!(session_id = %self.id, "Mixer session reset");
        }
        self.state = SessionState::Collecting;
    }
}
