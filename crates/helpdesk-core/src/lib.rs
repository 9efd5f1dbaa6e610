//! Core types for the helpdesk request workflow: categories and their field
//! sets, declarative view builders, submission extraction, and validation.

mod error;
pub use error::CoreError;

pub mod category;
pub mod submission;
pub mod validate;
pub mod view;

pub use category::{Category, FieldKey, FormMetadata};
pub use submission::{FieldValues, StateValues, SubmissionRecord};
pub use validate::{ValidationErrors, validate};
pub use view::{Block, View, ViewHandle};

/// Callback id shared by every step of the request modal.
pub const MODAL_CALLBACK_ID: &str = "helpdesk-request-modal";

/// Callback id of the global shortcut that opens a new request.
pub const SHORTCUT_CALLBACK_ID: &str = "new-helpdesk-request";

/// Action id of the step 1 category select.
pub const CATEGORY_ACTION_ID: &str = "helpdesk-request-modal-category-selection";

/// Action id of the step 2 "Back" button.
pub const RESET_ACTION_ID: &str = "helpdesk-request-modal-reset";

/// Action id carried by every input element inside the modal.
pub const ELEMENT_ACTION_ID: &str = "element";
