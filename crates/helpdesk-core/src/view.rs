//! Declarative view descriptions (modals and the home tab).
//!
//! These serialize to the chat platform's block layout format. Everything in
//! this module is a pure function of its arguments.

use serde::{Deserialize, Serialize};

use crate::category::{Category, FieldKey, FormMetadata};
use crate::CATEGORY_ACTION_ID;

const MODAL_TITLE: &str = "Helpdesk Request";

/// A text object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Text {
    #[serde(rename = "plain_text")]
    Plain {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        emoji: Option<bool>,
    },
    #[serde(rename = "mrkdwn")]
    Markdown { text: String },
}

impl Text {
    pub fn plain(text: impl Into<String>) -> Self {
        Text::Plain {
            text: text.into(),
            emoji: None,
        }
    }

    pub fn markdown(text: impl Into<String>) -> Self {
        Text::Markdown { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Text::Plain { text, .. } | Text::Markdown { text } => text,
        }
    }
}

/// One choice of a static select.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub text: Text,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: &str, value: &str) -> Self {
        Self {
            text: Text::plain(label),
            value: value.to_string(),
        }
    }
}

/// An interactive element inside a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Button {
        action_id: String,
        text: Text,
        value: String,
    },
    StaticSelect {
        action_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<Text>,
        options: Vec<SelectOption>,
    },
    PlainTextInput {
        action_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        initial_value: Option<String>,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        multiline: bool,
    },
    UsersSelect {
        action_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<Text>,
    },
    Datepicker {
        action_id: String,
    },
}

/// One declarative UI element of a view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Section {
        text: Text,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        accessory: Option<Element>,
    },
    Actions {
        elements: Vec<Element>,
    },
    Input {
        block_id: String,
        label: Text,
        element: Element,
    },
    Divider,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    Modal,
    Home,
}

/// Identity and version of a view the platform is displaying.
///
/// `hash` changes on every update; passing a stale one makes the platform
/// reject the update instead of overwriting a newer view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewHandle {
    pub id: String,
    #[serde(default)]
    pub hash: String,
}

/// A complete view handed to the platform for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    #[serde(rename = "type")]
    pub kind: ViewKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_metadata: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submit: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close: Option<Text>,
    pub blocks: Vec<Block>,
}

impl View {
    /// Block ids of the input blocks, in display order.
    pub fn input_block_ids(&self) -> Vec<&str> {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                Block::Input { block_id, .. } => Some(block_id.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Step 1: pick a category.
pub fn step1_view(callback_id: &str) -> View {
    let options = Category::ALL
        .iter()
        .map(|c| SelectOption::new(c.label(), c.as_str()))
        .collect();
    View {
        kind: ViewKind::Modal,
        callback_id: Some(callback_id.to_string()),
        private_metadata: None,
        title: Some(Text::plain(MODAL_TITLE)),
        submit: None,
        close: Some(Text::plain("Close")),
        blocks: vec![
            Block::Section {
                text: Text::markdown(":wave: Select a category."),
                accessory: None,
            },
            Block::Actions {
                elements: vec![Element::StaticSelect {
                    action_id: CATEGORY_ACTION_ID.to_string(),
                    placeholder: None,
                    options,
                }],
            },
        ],
    }
}

/// Step 2: the category-specific inputs, with `metadata` attached for the
/// submission handler.
pub fn step2_view(callback_id: &str, blocks: Vec<Block>, metadata: String) -> View {
    View {
        kind: ViewKind::Modal,
        callback_id: Some(callback_id.to_string()),
        private_metadata: Some(metadata),
        title: Some(Text::plain(MODAL_TITLE)),
        submit: Some(Text::plain("Submit")),
        close: Some(Text::plain("Close")),
        blocks,
    }
}

/// Step 2 view for `category`, with the category encoded in its metadata.
pub fn category_view(callback_id: &str, category: Category) -> View {
    step2_view(
        callback_id,
        category_blocks(category),
        FormMetadata::new(category).encode(),
    )
}

/// Header followed by the field blocks of the category's field set.
pub fn category_blocks(category: Category) -> Vec<Block> {
    let mut out = Vec::with_capacity(category.fields().len() + 1);
    out.push(blocks::header(category.header_text()));
    for field in category.fields() {
        out.push(match field {
            FieldKey::Title => blocks::title(category.initial_title()),
            FieldKey::LaptopModel => blocks::laptop_model(),
            FieldKey::MobileOs => blocks::mobile_os(),
            FieldKey::Description => blocks::description(),
            FieldKey::Approver => blocks::approver(),
            FieldKey::DueDate => blocks::due_date(),
        });
    }
    out
}

/// Home tab listing every summary, each followed by a divider.
pub fn home_view<S: AsRef<str>>(entries: &[S]) -> View {
    let blocks = entries
        .iter()
        .flat_map(|entry| {
            [
                Block::Section {
                    text: Text::markdown(entry.as_ref()),
                    accessory: None,
                },
                Block::Divider,
            ]
        })
        .collect();
    View {
        kind: ViewKind::Home,
        callback_id: None,
        private_metadata: None,
        title: None,
        submit: None,
        close: None,
        blocks,
    }
}

/// Individual step 2 blocks.
pub mod blocks {
    use super::{Block, Element, SelectOption, Text};
    use crate::category::FieldKey;
    use crate::{ELEMENT_ACTION_ID, RESET_ACTION_ID};

    fn input(field: FieldKey, label: Text, element: Element) -> Block {
        Block::Input {
            block_id: field.block_id().to_string(),
            label,
            element,
        }
    }

    /// Section with a "Back" button that returns to step 1.
    pub fn header(text: &str) -> Block {
        Block::Section {
            text: Text::markdown(text),
            accessory: Some(Element::Button {
                action_id: RESET_ACTION_ID.to_string(),
                text: Text::plain("Back"),
                value: "1".to_string(),
            }),
        }
    }

    pub fn title(initial_value: &str) -> Block {
        input(
            FieldKey::Title,
            Text::plain("Title"),
            Element::PlainTextInput {
                action_id: ELEMENT_ACTION_ID.to_string(),
                initial_value: Some(initial_value.to_string()),
                multiline: false,
            },
        )
    }

    pub fn laptop_model() -> Block {
        input(
            FieldKey::LaptopModel,
            Text::plain("Laptop Model"),
            Element::StaticSelect {
                action_id: ELEMENT_ACTION_ID.to_string(),
                placeholder: None,
                options: vec![
                    SelectOption::new("MacBook Pro (16-inch, 2019)", "MacBookPro16,1"),
                    SelectOption::new(
                        "MacBook Pro (13-inch, 2019, Two Thunderbolt 3 ports)",
                        "MacBookPro15,4",
                    ),
                    SelectOption::new("Surface Book 3 for Business", "SurfaceBook3"),
                ],
            },
        )
    }

    pub fn mobile_os() -> Block {
        input(
            FieldKey::MobileOs,
            Text::plain("Mobile OS"),
            Element::StaticSelect {
                action_id: ELEMENT_ACTION_ID.to_string(),
                placeholder: Some(Text::plain("Select an item")),
                options: vec![
                    SelectOption::new("iOS", "ios"),
                    SelectOption::new("Android", "android"),
                ],
            },
        )
    }

    pub fn description() -> Block {
        input(
            FieldKey::Description,
            Text::plain("Description"),
            Element::PlainTextInput {
                action_id: ELEMENT_ACTION_ID.to_string(),
                initial_value: None,
                multiline: true,
            },
        )
    }

    pub fn approver() -> Block {
        input(
            FieldKey::Approver,
            Text::plain("Approver"),
            Element::UsersSelect {
                action_id: ELEMENT_ACTION_ID.to_string(),
                placeholder: Some(Text::plain("Select your approver")),
            },
        )
    }

    pub fn due_date() -> Block {
        input(
            FieldKey::DueDate,
            Text::Plain {
                text: "Due date".to_string(),
                emoji: Some(true),
            },
            Element::Datepicker {
                action_id: ELEMENT_ACTION_ID.to_string(),
            },
        )
    }
}
