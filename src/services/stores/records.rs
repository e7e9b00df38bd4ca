use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::models::{
    AgeRestrictions, CatalogError, Complaint, ContentType, DictionaryEntry, LibraryItem, RiskLevel,
    Supplement,
};

// Raw rows as the Postgres and PostgREST backends return them. Conversion to the
// domain types is where malformed data gets rejected.

#[derive(Debug, Clone, Deserialize, sqlx::FromRow)]
pub struct ComplaintRecord {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
}

impl From<ComplaintRecord> for Complaint {
    fn from(record: ComplaintRecord) -> Self {
        Complaint {
            id: record.id,
            name: record.name,
            category: record.category.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, sqlx::FromRow)]
pub struct SupplementRecord {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub default_dosage: Option<String>,
    #[serde(default)]
    pub side_effects: Option<String>,
    pub risk_level: i32,
    #[serde(default)]
    pub contraindications: Option<String>,
    #[serde(default)]
    pub age_restrictions: Option<Value>,
    #[serde(default)]
    pub indications: Vec<Uuid>,
}

impl TryFrom<SupplementRecord> for Supplement {
    type Error = CatalogError;

    fn try_from(record: SupplementRecord) -> Result<Self, Self::Error> {
        let risk_level = RiskLevel::try_from(i64::from(record.risk_level))?;
        let age_restrictions = match &record.age_restrictions {
            Some(value) => AgeRestrictions::from_json(value)?,
            None => None,
        };

        Ok(Supplement {
            id: record.id,
            name: record.name,
            description: record.description.unwrap_or_default(),
            default_dosage: record.default_dosage,
            side_effects: record.side_effects,
            risk_level,
            contraindications: record.contraindications,
            age_restrictions,
            indications: record.indications,
        })
    }
}

/// Converts raw supplement rows, dropping (and logging) the ones that fail validation
pub fn into_supplements(records: Vec<SupplementRecord>) -> Vec<Supplement> {
    records
        .into_iter()
        .filter_map(|record| {
            let id = record.id;
            let name = record.name.clone();
            match Supplement::try_from(record) {
                Ok(supplement) => Some(supplement),
                Err(e) => {
                    tracing::warn!(supplement_id = %id, name = %name, error = %e, "Skipping malformed supplement");
                    None
                }
            }
        })
        .collect()
}

#[derive(Debug, Clone, Deserialize, sqlx::FromRow)]
pub struct LibraryItemRecord {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub content_type: String,
    pub file_url: String,
    #[serde(default)]
    pub preview_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<LibraryItemRecord> for LibraryItem {
    type Error = String;

    fn try_from(record: LibraryItemRecord) -> Result<Self, Self::Error> {
        Ok(LibraryItem {
            id: record.id,
            title: record.title,
            description: record.description.unwrap_or_default(),
            content_type: record.content_type.parse::<ContentType>()?,
            file_url: record.file_url,
            preview_text: record.preview_text.unwrap_or_default(),
            created_at: record.created_at,
        })
    }
}

/// Converts raw library rows, dropping (and logging) unknown content types
pub fn into_library_items(records: Vec<LibraryItemRecord>) -> Vec<LibraryItem> {
    records
        .into_iter()
        .filter_map(|record| {
            let id = record.id;
            LibraryItem::try_from(record)
                .map_err(|e| tracing::warn!(item_id = %id, error = %e, "Skipping malformed library item"))
                .ok()
        })
        .collect()
}

#[derive(Debug, Clone, Deserialize, sqlx::FromRow)]
pub struct DictionaryEntryRecord {
    pub id: Uuid,
    pub term: String,
    pub definition: String,
    pub created_at: DateTime<Utc>,
}

impl From<DictionaryEntryRecord> for DictionaryEntry {
    fn from(record: DictionaryEntryRecord) -> Self {
        DictionaryEntry {
            id: record.id,
            term: record.term,
            definition: record.definition,
            created_at: record.created_at,
        }
    }
}
