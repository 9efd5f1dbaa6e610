//! Routing of inbound payloads to the workflow's interaction events.

use helpdesk_core::{
    CATEGORY_ACTION_ID, MODAL_CALLBACK_ID, RESET_ACTION_ID, SHORTCUT_CALLBACK_ID, StateValues,
    ViewHandle,
};
use helpdesk_slack::InteractionPayload;
use helpdesk_slack::payload::ViewPayload;

use crate::FlowError;

/// An interaction the request modal reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionEvent {
    ShortcutInvoked {
        trigger_id: String,
        user_id: String,
    },
    CategorySelected {
        value: String,
        view: ViewHandle,
        private_metadata: String,
    },
    ResetPressed {
        view: ViewHandle,
        private_metadata: String,
    },
    ViewSubmitted {
        view: ViewHandle,
        private_metadata: String,
        values: StateValues,
        submitter: String,
    },
}

impl InteractionEvent {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            InteractionEvent::ShortcutInvoked { .. } => "shortcut",
            InteractionEvent::CategorySelected { .. } => "category_selected",
            InteractionEvent::ResetPressed { .. } => "reset",
            InteractionEvent::ViewSubmitted { .. } => "view_submission",
        }
    }

    /// Map a payload to its event. `Ok(None)` means no listener is registered
    /// for it (another shortcut, action, or view).
    pub fn route(payload: InteractionPayload) -> Result<Option<Self>, FlowError> {
        match payload {
            InteractionPayload::Shortcut {
                callback_id,
                trigger_id,
                user,
            } if callback_id == SHORTCUT_CALLBACK_ID => Ok(Some(Self::ShortcutInvoked {
                trigger_id,
                user_id: user.id,
            })),
            InteractionPayload::BlockActions { actions, view, .. } => {
                let Some(action) = actions.into_iter().next() else {
                    return Ok(None);
                };
                match action.action_id.as_str() {
                    CATEGORY_ACTION_ID => {
                        let view = view.ok_or(FlowError::Malformed("category selection without view"))?;
                        let value = action
                            .selected_option
                            .ok_or(FlowError::Malformed("category selection without option"))?
                            .value;
                        Ok(Some(Self::CategorySelected {
                            value,
                            view: handle(&view),
                            private_metadata: view.private_metadata,
                        }))
                    }
                    RESET_ACTION_ID => {
                        let view = view.ok_or(FlowError::Malformed("reset without view"))?;
                        Ok(Some(Self::ResetPressed {
                            view: handle(&view),
                            private_metadata: view.private_metadata,
                        }))
                    }
                    _ => Ok(None),
                }
            }
            InteractionPayload::ViewSubmission { user, view }
                if view.callback_id == MODAL_CALLBACK_ID =>
            {
                Ok(Some(Self::ViewSubmitted {
                    view: handle(&view),
                    private_metadata: view.private_metadata,
                    values: view.state.values,
                    submitter: user.id,
                }))
            }
            _ => Ok(None),
        }
    }
}

fn handle(view: &ViewPayload) -> ViewHandle {
    ViewHandle {
        id: view.id.clone(),
        hash: view.hash.clone(),
    }
}
