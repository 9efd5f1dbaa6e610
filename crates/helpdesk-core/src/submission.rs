//! Submitted modal state and the record built from it.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::category::FieldKey;
use crate::{CoreError, ELEMENT_ACTION_ID};

/// Wire format of the date picker.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The selected option of a static select.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedOption {
    pub value: String,
}

/// State of one input element as reported in a view submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_option: Option<SelectedOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_user: Option<String>,
}

/// `view.state.values`: block id → action id → element state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateValues(pub BTreeMap<String, BTreeMap<String, ElementState>>);

impl StateValues {
    pub fn new() -> Self {
        Self::default()
    }

    fn with(mut self, field: FieldKey, state: ElementState) -> Self {
        self.0
            .entry(field.block_id().to_string())
            .or_default()
            .insert(ELEMENT_ACTION_ID.to_string(), state);
        self
    }

    pub fn with_text(self, field: FieldKey, value: &str) -> Self {
        self.with(
            field,
            ElementState {
                value: Some(value.to_string()),
                ..Default::default()
            },
        )
    }

    pub fn with_option(self, field: FieldKey, value: &str) -> Self {
        self.with(
            field,
            ElementState {
                selected_option: Some(SelectedOption {
                    value: value.to_string(),
                }),
                ..Default::default()
            },
        )
    }

    pub fn with_date(self, field: FieldKey, date: NaiveDate) -> Self {
        self.with(
            field,
            ElementState {
                selected_date: Some(date.format(DATE_FORMAT).to_string()),
                ..Default::default()
            },
        )
    }

    pub fn with_user(self, field: FieldKey, user_id: &str) -> Self {
        self.with(
            field,
            ElementState {
                selected_user: Some(user_id.to_string()),
                ..Default::default()
            },
        )
    }

    /// Element state of a field, `None` when the block is not part of the view.
    fn element(&self, field: FieldKey) -> Result<Option<&ElementState>, CoreError> {
        let Some(actions) = self.0.get(field.block_id()) else {
            return Ok(None);
        };
        actions
            .get(ELEMENT_ACTION_ID)
            .map(Some)
            .ok_or(CoreError::MissingField(field.block_id()))
    }
}

/// Values extracted from a submission. Fields outside the active category's
/// field set are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldValues {
    pub title: Option<String>,
    pub laptop_model: Option<String>,
    pub os: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub approver: Option<String>,
}

impl FieldValues {
    pub fn from_state(state: &StateValues) -> Result<Self, CoreError> {
        let text = |field| -> Result<Option<String>, CoreError> {
            Ok(state.element(field)?.and_then(|e| e.value.clone()))
        };
        let option = |field| -> Result<Option<String>, CoreError> {
            Ok(state
                .element(field)?
                .and_then(|e| e.selected_option.as_ref())
                .map(|o| o.value.clone()))
        };

        let due_date = match state
            .element(FieldKey::DueDate)?
            .and_then(|e| e.selected_date.as_deref())
        {
            Some(raw) => Some(NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| {
                CoreError::MalformedDate {
                    field: FieldKey::DueDate.block_id(),
                    value: raw.to_string(),
                }
            })?),
            None => None,
        };

        Ok(Self {
            title: text(FieldKey::Title)?,
            laptop_model: option(FieldKey::LaptopModel)?,
            os: option(FieldKey::MobileOs)?,
            description: text(FieldKey::Description)?,
            due_date,
            approver: state
                .element(FieldKey::Approver)?
                .and_then(|e| e.selected_user.clone()),
        })
    }
}

/// A validated helpdesk request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub title: String,
    pub laptop_model: Option<String>,
    pub os: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub approver: Option<String>,
}

impl SubmissionRecord {
    /// Build the record from values that already passed validation.
    ///
    /// Every category shows a title, so its absence means the payload did not
    /// come from one of our views.
    pub fn from_values(values: FieldValues) -> Result<Self, CoreError> {
        let title = values
            .title
            .ok_or(CoreError::MissingField(FieldKey::Title.block_id()))?;
        Ok(Self {
            title,
            laptop_model: values.laptop_model,
            os: values.os,
            description: values.description,
            due_date: values.due_date,
            approver: values.approver,
        })
    }

    /// Markdown summary used in notifications and on the home tab.
    pub fn summary(&self) -> String {
        let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
        let due_date = self
            .due_date
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_else(|| "-".to_string());
        let approver = self
            .approver
            .as_ref()
            .map(|id| format!("<@{id}>"))
            .unwrap_or_else(|| "-".to_string());
        format!(
            "*Title*: {title}\n\
             *Laptop Model*: {laptop_model}\n\
             *Mobile OS*: {os}\n\
             *Description*: {description}\n\
             *Due Date*: {due_date}\n\
             *Approver*: {approver}",
            title = self.title,
            laptop_model = or_dash(&self.laptop_model),
            os = or_dash(&self.os),
            description = or_dash(&self.description),
        )
    }
}
