//! Request categories and the field set each one shows on step 2.
//!
//! | Category | Fields                                   |
//! |----------|------------------------------------------|
//! | Laptop   | title, laptop-model                      |
//! | Mobile   | title, mobile-os, approver, due-date     |
//! | Other    | title (empty initial value), description |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// The closed set of request categories offered by the step 1 select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Laptop,
    Mobile,
    Other,
}

impl Category {
    /// Every category, in the order the select lists them.
    pub const ALL: [Category; 3] = [Category::Laptop, Category::Mobile, Category::Other];

    /// Option value used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Laptop => "laptop",
            Category::Mobile => "mobile",
            Category::Other => "other",
        }
    }

    /// Option label shown to the user.
    pub fn label(self) -> &'static str {
        match self {
            Category::Laptop => "Laptop",
            Category::Mobile => "Mobile",
            Category::Other => "Other",
        }
    }

    /// Text of the step 2 header section.
    pub fn header_text(self) -> &'static str {
        match self {
            Category::Laptop => "You're making a request on your laptop.",
            Category::Mobile => "You're making a request on your mobile devices.",
            Category::Other => {
                "This may be a bit rare one. Please share the details with us as much as possible."
            }
        }
    }

    /// Pre-filled value of the title input.
    pub fn initial_title(self) -> &'static str {
        match self {
            Category::Laptop => "Laptop Replacement",
            Category::Mobile => "Mobile Device Replacement",
            Category::Other => "",
        }
    }

    /// Ordered input fields shown on step 2.
    pub fn fields(self) -> &'static [FieldKey] {
        match self {
            Category::Laptop => &[FieldKey::Title, FieldKey::LaptopModel],
            Category::Mobile => &[
                FieldKey::Title,
                FieldKey::MobileOs,
                FieldKey::Approver,
                FieldKey::DueDate,
            ],
            Category::Other => &[FieldKey::Title, FieldKey::Description],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| CoreError::UnknownCategory(s.to_string()))
    }
}

/// An input field of the step 2 modal, keyed by its block id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKey {
    Title,
    LaptopModel,
    MobileOs,
    Description,
    Approver,
    DueDate,
}

impl FieldKey {
    /// Block id of the input, also the key used in inline error responses.
    pub fn block_id(self) -> &'static str {
        match self {
            FieldKey::Title => "title",
            FieldKey::LaptopModel => "laptop-model",
            FieldKey::MobileOs => "os",
            FieldKey::Description => "description",
            FieldKey::Approver => "approver",
            FieldKey::DueDate => "due-date",
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.block_id())
    }
}

/// State carried across steps in the view's `private_metadata`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormMetadata {
    pub category: Category,
}

impl FormMetadata {
    pub fn new(category: Category) -> Self {
        Self { category }
    }

    /// Encode as the JSON string attached to the step 2 view.
    pub fn encode(&self) -> String {
        format!(r#"{{"category":"{}"}}"#, self.category)
    }

    /// Decode metadata from an inbound view.
    ///
    /// An empty string (step 1 views carry none) yields `Ok(None)`.
    pub fn decode(raw: &str) -> Result<Option<Self>, CoreError> {
        if raw.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(raw)?))
    }
}
