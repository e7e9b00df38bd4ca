pub mod catalog;
pub mod content;
pub mod profile;
pub mod recommendation;
pub mod submission;

pub use catalog::{AgeRestrictions, Catalog, CatalogError, Complaint, RiskLevel, Supplement};
pub use content::{ContentType, DictionaryEntry, LibraryItem};
pub use profile::{FormNumber, Profile, ProfileForm};
pub use recommendation::{
    Recommendation, SuccessRate, DISCLAIMER, DOSAGE_FALLBACK, SIDE_EFFECTS_FALLBACK,
};
pub use submission::Submission;
