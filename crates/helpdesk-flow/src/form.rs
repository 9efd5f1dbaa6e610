//! The request modal as a state machine.
//!
//! ```text
//!   open ──► Step1 ──category──► Step2 ──valid submit──► Closed
//!              ▲                   │ │
//!              └──────reset────────┘ └─invalid submit─► Step2 (inline errors)
//! ```
//!
//! The platform keeps no state of ours beyond the view's private metadata, so
//! an instance is rebuilt from every inbound payload with [`FormInstance::from_view`].

use chrono::{DateTime, Utc};
use helpdesk_core::view::{self, View, ViewHandle};
use helpdesk_core::{
    Category, FieldValues, FormMetadata, StateValues, SubmissionRecord, ValidationErrors, validate,
};

use crate::FlowError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Step1,
    Step2,
    Closed,
}

/// Result of a submission in Step2.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Validation failed; the form stays at Step2.
    Rejected(ValidationErrors),
    /// The form is closed and the request recorded.
    Accepted(SubmissionRecord),
}

/// One open request modal.
#[derive(Debug, Clone, PartialEq)]
pub struct FormInstance {
    view: ViewHandle,
    step: Step,
    category: Option<Category>,
}

impl FormInstance {
    /// The view shown when a new request is started.
    pub fn initial_view(callback_id: &str) -> View {
        view::step1_view(callback_id)
    }

    /// A freshly opened instance, displaying the initial view.
    pub fn opened(view: ViewHandle) -> Self {
        Self {
            view,
            step: Step::Step1,
            category: None,
        }
    }

    /// Rebuild an instance from the view an interaction came from.
    ///
    /// A category in the metadata means the step 2 view is showing.
    pub fn from_view(view: ViewHandle, private_metadata: &str) -> Result<Self, FlowError> {
        let category = FormMetadata::decode(private_metadata)?.map(|m| m.category);
        let step = if category.is_some() {
            Step::Step2
        } else {
            Step::Step1
        };
        Ok(Self {
            view,
            step,
            category,
        })
    }

    pub fn view(&self) -> &ViewHandle {
        &self.view
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn category(&self) -> Option<Category> {
        self.category
    }

    /// Record the platform's new version after an update.
    pub fn rebase(&mut self, view: ViewHandle) {
        self.view = view;
    }

    fn expect_step(&self, step: Step, event: &'static str) -> Result<(), FlowError> {
        if self.step == step {
            Ok(())
        } else {
            Err(FlowError::InvalidTransition {
                step: self.step,
                event,
            })
        }
    }

    /// Step1 → Step2 for the selected option value.
    ///
    /// An unknown value leaves the instance untouched.
    pub fn select_category(&mut self, value: &str, callback_id: &str) -> Result<View, FlowError> {
        self.expect_step(Step::Step1, "category selection")?;
        let category: Category = value.parse()?;
        self.category = Some(category);
        self.step = Step::Step2;
        Ok(view::category_view(callback_id, category))
    }

    /// Step2 → Step1, forgetting the category.
    pub fn reset(&mut self, callback_id: &str) -> Result<View, FlowError> {
        self.expect_step(Step::Step2, "reset")?;
        self.category = None;
        self.step = Step::Step1;
        Ok(Self::initial_view(callback_id))
    }

    /// Validate a Step2 submission, closing the form when it passes.
    pub fn submit(
        &mut self,
        values: &StateValues,
        now: DateTime<Utc>,
    ) -> Result<SubmitOutcome, FlowError> {
        self.expect_step(Step::Step2, "submission")?;
        let category = self
            .category
            .ok_or(FlowError::Malformed("step 2 form without category"))?;

        let allowed = category.fields();
        if let Some(field) = values
            .0
            .keys()
            .find(|id| !allowed.iter().any(|f| f.block_id() == id.as_str()))
        {
            return Err(FlowError::UnexpectedField {
                field: field.clone(),
                category,
            });
        }

        let fields = FieldValues::from_state(values)?;
        let errors = validate(&fields, now);
        if !errors.is_empty() {
            return Ok(SubmitOutcome::Rejected(errors));
        }

        let record = SubmissionRecord::from_values(fields)?;
        self.step = Step::Closed;
        Ok(SubmitOutcome::Accepted(record))
    }
}
