use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Kind of media a library item points to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Pdf,
    Image,
    Video,
    Iframe,
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pdf" => Ok(ContentType::Pdf),
            "image" => Ok(ContentType::Image),
            "video" => Ok(ContentType::Video),
            "iframe" => Ok(ContentType::Iframe),
            other => Err(format!("unknown content type: {}", other)),
        }
    }
}

/// A reference document in the library
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LibraryItem {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub content_type: ContentType,
    pub file_url: String,
    #[serde(default)]
    pub preview_text: String,
    pub created_at: DateTime<Utc>,
}

/// A term and its definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DictionaryEntry {
    pub id: Uuid,
    pub term: String,
    pub definition: String,
    pub created_at: DateTime<Utc>,
}

impl DictionaryEntry {
    /// Case-insensitive substring match against term or definition
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        needle.is_empty()
            || self.term.to_lowercase().contains(&needle)
            || self.definition.to_lowercase().contains(&needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_round_trip() {
        assert_eq!("iframe".parse::<ContentType>().unwrap(), ContentType::Iframe);
        assert!("gif".parse::<ContentType>().is_err());
        assert_eq!(serde_json::to_string(&ContentType::Pdf).unwrap(), "\"pdf\"");
    }

    #[test]
    fn test_dictionary_entry_matches() {
        let entry = DictionaryEntry {
            id: Uuid::new_v4(),
            term: "Bioavailability".to_string(),
            definition: "The proportion of a substance that enters circulation".to_string(),
            created_at: Utc::now(),
        };

        assert!(entry.matches("BIOAVAIL"));
        assert!(entry.matches("circulation"));
        assert!(entry.matches("  "));
        assert!(!entry.matches("dosage"));
    }
}
