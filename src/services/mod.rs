pub mod catalog;
pub mod content;
pub mod engine;
pub mod history;
pub mod stores;
pub mod workflow;

pub use engine::{generate_recommendations, RecommendationEngine, SelectionPolicy};
pub use history::{HistoryDispatcher, HistoryWriterHandle, SubmissionSink};
pub use workflow::{MixerSession, SessionPhase};
