use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use uuid::Uuid;

use crate::error::ValidationErrors;

pub const AGE_RANGE: RangeInclusive<u32> = 1..=150;
pub const HEIGHT_CM_RANGE: RangeInclusive<u32> = 1..=300;
pub const WEIGHT_KG_RANGE: RangeInclusive<u32> = 1..=500;

/// Validated biometric profile. Only constructible through validation, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    age: u32,
    height_cm: u32,
    weight_kg: u32,
    complaint_ids: BTreeSet<Uuid>,
}

impl Profile {
    pub fn new(
        age: u32,
        height_cm: u32,
        weight_kg: u32,
        complaint_ids: impl IntoIterator<Item = Uuid>,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_range(&mut errors, "age", age, &AGE_RANGE);
        check_range(&mut errors, "height", height_cm, &HEIGHT_CM_RANGE);
        check_range(&mut errors, "weight", weight_kg, &WEIGHT_KG_RANGE);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            age,
            height_cm,
            weight_kg,
            complaint_ids: complaint_ids.into_iter().collect(),
        })
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn height_cm(&self) -> u32 {
        self.height_cm
    }

    pub fn weight_kg(&self) -> u32 {
        self.weight_kg
    }

    pub fn complaint_ids(&self) -> &BTreeSet<Uuid> {
        &self.complaint_ids
    }
}

fn check_range(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: u32,
    range: &RangeInclusive<u32>,
) {
    if !range.contains(&value) {
        errors.push(
            field,
            format!("must be between {} and {}", range.start(), range.end()),
        );
    }
}

/// A numeric form field as submitted: JSON number or the raw text of an input box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormNumber {
    Number(serde_json::Number),
    Text(String),
}

impl FormNumber {
    /// Parses the value as a non-negative integer. Fractions, signs and junk are rejected.
    fn parse(&self) -> Option<u32> {
        match self {
            FormNumber::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            FormNumber::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                trimmed.parse().ok()
            }
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, FormNumber::Text(s) if s.trim().is_empty())
    }
}

impl From<u32> for FormNumber {
    fn from(value: u32) -> Self {
        FormNumber::Number(value.into())
    }
}

/// Raw mixer form input, before validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub age: Option<FormNumber>,
    #[serde(default)]
    pub height: Option<FormNumber>,
    #[serde(default)]
    pub weight: Option<FormNumber>,
    #[serde(default)]
    pub complaints: Vec<Uuid>,
    #[serde(default)]
    pub risk_accepted: bool,
}

impl ProfileForm {
    /// Validates every field at once, including the risk acknowledgment.
    ///
    /// All failures are reported together so the form can flag each field inline.
    pub fn validate(&self) -> Result<Profile, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let age = required_number(&mut errors, "age", self.age.as_ref(), &AGE_RANGE);
        let height = required_number(&mut errors, "height", self.height.as_ref(), &HEIGHT_CM_RANGE);
        let weight = required_number(&mut errors, "weight", self.weight.as_ref(), &WEIGHT_KG_RANGE);

        if !self.risk_accepted {
            errors.push("risk_accepted", "the risk acknowledgment must be accepted");
        }

        match (age, height, weight) {
            (Some(age), Some(height), Some(weight)) if errors.is_empty() => {
                Profile::new(age, height, weight, self.complaints.iter().copied())
            }
            _ => Err(errors),
        }
    }
}

fn required_number(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<&FormNumber>,
    range: &RangeInclusive<u32>,
) -> Option<u32> {
    let value = match value {
        Some(value) if !value.is_blank() => value,
        _ => {
            errors.push(field, "is required");
            return None;
        }
    };

    match value.parse() {
        Some(n) => {
            check_range(errors, field, n, range);
            range.contains(&n).then_some(n)
        }
        None => {
            errors.push(field, "must be a whole number");
            None
        }
    }
}
