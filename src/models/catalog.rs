use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Display;
use uuid::Uuid;

/// A health complaint the user can select in the mixer form
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Complaint {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub category: String,
}

/// Risk level of a supplement, always within 1..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct RiskLevel(u8);

impl RiskLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(level: u8) -> Result<Self, CatalogError> {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Ok(Self(level))
        } else {
            Err(CatalogError::RiskLevelOutOfRange(level as i64))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for RiskLevel {
    type Error = CatalogError;

    fn try_from(level: i64) -> Result<Self, Self::Error> {
        u8::try_from(level)
            .map_err(|_| CatalogError::RiskLevelOutOfRange(level))
            .and_then(RiskLevel::new)
    }
}

impl From<RiskLevel> for u8 {
    fn from(level: RiskLevel) -> Self {
        level.0
    }
}

impl Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

/// Inclusive age bounds for a supplement. A missing bound imposes no limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeRestrictions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age: Option<u32>,
}

impl AgeRestrictions {
    /// Checks whether `age` falls within both bounds
    pub fn admits(&self, age: u32) -> bool {
        self.min_age.map_or(true, |min| age >= min) && self.max_age.map_or(true, |max| age <= max)
    }

    /// Parses the loosely-typed `age_restrictions` column.
    ///
    /// `null`, `{}` and objects with `minAge`/`maxAge` non-negative integers (or nulls)
    /// are accepted. Anything else is rejected so malformed rows never reach the engine.
    pub fn from_json(value: &Value) -> Result<Option<Self>, CatalogError> {
        let object = match value {
            Value::Null => return Ok(None),
            Value::Object(object) => object,
            other => return Err(CatalogError::MalformedAgeRestrictions(other.to_string())),
        };

        let bound = |key: &str| -> Result<Option<u32>, CatalogError> {
            match object.get(key) {
                None | Some(Value::Null) => Ok(None),
                Some(Value::Number(n)) => n
                    .as_u64()
                    .and_then(|n| u32::try_from(n).ok())
                    .map(Some)
                    .ok_or_else(|| CatalogError::MalformedAgeRestrictions(value.to_string())),
                Some(_) => Err(CatalogError::MalformedAgeRestrictions(value.to_string())),
            }
        };

        let restrictions = Self {
            min_age: bound("minAge")?,
            max_age: bound("maxAge")?,
        };

        if let (Some(min), Some(max)) = (restrictions.min_age, restrictions.max_age) {
            if min > max {
                return Err(CatalogError::MalformedAgeRestrictions(value.to_string()));
            }
        }

        if restrictions == Self::default() {
            Ok(None)
        } else {
            Ok(Some(restrictions))
        }
    }
}

/// A supplement as the engine sees it, validated at the store boundary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Supplement {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub default_dosage: Option<String>,
    #[serde(default)]
    pub side_effects: Option<String>,
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub contraindications: Option<String>,
    #[serde(default, deserialize_with = "deserialize_age_restrictions")]
    pub age_restrictions: Option<AgeRestrictions>,
    /// Complaints this supplement is indicated for. Only read by complaint-aware selection.
    #[serde(default)]
    pub indications: Vec<Uuid>,
}

fn deserialize_age_restrictions<'de, D>(
    deserializer: D,
) -> Result<Option<AgeRestrictions>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    AgeRestrictions::from_json(&value).map_err(serde::de::Error::custom)
}

impl Supplement {
    /// True when the supplement has no age bounds or `age` satisfies them
    pub fn is_eligible_for(&self, age: u32) -> bool {
        self.age_restrictions
            .as_ref()
            .map_or(true, |restrictions| restrictions.admits(age))
    }
}

/// An immutable snapshot of the catalog for a single generation call
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Catalog {
    pub complaints: Vec<Complaint>,
    pub supplements: Vec<Supplement>,
}

impl Catalog {
    pub fn new(complaints: Vec<Complaint>, supplements: Vec<Supplement>) -> Self {
        Self {
            complaints,
            supplements,
        }
    }

    /// Catalog complaints whose ids were selected, in catalog order. Unknown ids are dropped.
    pub fn selected_complaints<'b, I>(&self, ids: I) -> Vec<&Complaint>
    where
        I: IntoIterator<Item = &'b Uuid>,
    {
        let ids: std::collections::HashSet<&Uuid> = ids.into_iter().collect();
        self.complaints
            .iter()
            .filter(|complaint| ids.contains(&complaint.id))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.complaints.is_empty() && self.supplements.is_empty()
    }
}

/// Errors raised while converting raw catalog records
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("risk level {0} is outside 1..=5")]
    RiskLevelOutOfRange(i64),
    #[error("malformed age restrictions: {0}")]
    MalformedAgeRestrictions(String),
}
