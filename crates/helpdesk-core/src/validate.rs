//! Submission validation rules.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::FieldKey;
use crate::submission::FieldValues;

pub const TITLE_TOO_SHORT: &str = "Title must be longer than 5 characters";
pub const DUE_DATE_NOT_IN_FUTURE: &str = "Due date must be in the future";

/// Titles of this length or less are rejected. Length is measured in UTF-16
/// code units, the way the platform's clients count text.
const MAX_SHORT_TITLE_LEN: usize = 5;

/// Inline errors keyed by block id. Empty means the submission is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn insert(&mut self, field: FieldKey, message: &str) {
        self.0.insert(field.block_id().to_string(), message.to_string());
    }

    pub fn get(&self, field: FieldKey) -> Option<&str> {
        self.0.get(field.block_id()).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Check every rule against `values`, collecting all violations.
///
/// Fields absent from the active category are `None` and never fail. A due
/// date counts from midnight UTC, so today's date is already in the past.
pub fn validate(values: &FieldValues, now: DateTime<Utc>) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    if let Some(title) = &values.title
        && title.encode_utf16().count() <= MAX_SHORT_TITLE_LEN
    {
        errors.insert(FieldKey::Title, TITLE_TOO_SHORT);
    }

    if let Some(due) = values.due_date
        && due
            .and_hms_opt(0, 0, 0)
            .is_some_and(|midnight| midnight.and_utc() < now)
    {
        errors.insert(FieldKey::DueDate, DUE_DATE_NOT_IN_FUTURE);
    }

    errors
}
