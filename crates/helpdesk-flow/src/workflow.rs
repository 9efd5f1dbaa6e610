//! Interaction handling: acknowledgment, view transitions, and the
//! post-submission fan-out.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use helpdesk_core::view::{View, home_view};
use helpdesk_core::{MODAL_CALLBACK_ID, StateValues, ValidationErrors, ViewHandle};
use helpdesk_store::SubmissionStore;
use tracing::{debug, info, warn};

use crate::dispatch::{DEFAULT_TRIAGE_CHANNEL, DeliveryReport, Dispatcher};
use crate::event::InteractionEvent;
use crate::form::{FormInstance, SubmitOutcome};
use crate::platform::{AckResponse, Acknowledge, HostPlatform};
use crate::FlowError;

#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// Callback id of the request modal.
    pub callback_id: String,
    /// Channel new requests are announced in.
    pub triage_channel: String,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            callback_id: MODAL_CALLBACK_ID.to_string(),
            triage_channel: DEFAULT_TRIAGE_CHANNEL.to_string(),
        }
    }
}

/// What handling one event produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Opened(FormInstance),
    Updated(FormInstance),
    Rejected(ValidationErrors),
    Submitted {
        form: FormInstance,
        report: DeliveryReport,
    },
}

pub struct Workflow {
    platform: Arc<dyn HostPlatform>,
    store: Arc<dyn SubmissionStore>,
    config: WorkflowConfig,
}

impl Workflow {
    pub fn new(
        platform: Arc<dyn HostPlatform>,
        store: Arc<dyn SubmissionStore>,
        config: WorkflowConfig,
    ) -> Self {
        Self {
            platform,
            store,
            config,
        }
    }

    /// Handle one event. Every event is acknowledged exactly once through
    /// `ack`, before any follow-up platform call.
    pub async fn handle(
        &self,
        event: InteractionEvent,
        ack: &mut dyn Acknowledge,
    ) -> Result<Outcome, FlowError> {
        self.handle_at(event, ack, Utc::now()).await
    }

    /// [`Workflow::handle`] with due dates judged against `now`.
    pub async fn handle_at(
        &self,
        event: InteractionEvent,
        ack: &mut dyn Acknowledge,
        now: DateTime<Utc>,
    ) -> Result<Outcome, FlowError> {
        debug!(kind = event.kind(), "handling interaction");
        match event {
            InteractionEvent::ShortcutInvoked {
                trigger_id,
                user_id,
            } => {
                ack.ack(AckResponse::Empty).await?;
                let view = FormInstance::initial_view(&self.config.callback_id);
                log_view("views.open", &view);
                let handle = self.platform.open_view(&trigger_id, &view).await?;
                info!(user = %user_id, view_id = %handle.id, "request modal opened");
                Ok(Outcome::Opened(FormInstance::opened(handle)))
            }
            InteractionEvent::CategorySelected {
                value,
                view,
                private_metadata,
            } => {
                ack.ack(AckResponse::Empty).await?;
                let mut form = FormInstance::from_view(view, &private_metadata)?;
                let next = form.select_category(&value, &self.config.callback_id)?;
                self.update(&mut form, &next).await?;
                info!(category = %value, view_id = %form.view().id, "category selected");
                Ok(Outcome::Updated(form))
            }
            InteractionEvent::ResetPressed {
                view,
                private_metadata,
            } => {
                ack.ack(AckResponse::Empty).await?;
                let mut form = FormInstance::from_view(view, &private_metadata)?;
                let next = form.reset(&self.config.callback_id)?;
                self.update(&mut form, &next).await?;
                info!(view_id = %form.view().id, "form reset");
                Ok(Outcome::Updated(form))
            }
            InteractionEvent::ViewSubmitted {
                view,
                private_metadata,
                values,
                submitter,
            } => {
                self.submit(view, &private_metadata, &values, &submitter, ack, now)
                    .await
            }
        }
    }

    async fn update(&self, form: &mut FormInstance, next: &View) -> Result<(), FlowError> {
        log_view("views.update", next);
        let current = form.view().clone();
        let handle = self
            .platform
            .update_view(&current.id, &current.hash, next)
            .await?;
        form.rebase(handle);
        Ok(())
    }

    async fn submit(
        &self,
        view: ViewHandle,
        private_metadata: &str,
        values: &StateValues,
        submitter: &str,
        ack: &mut dyn Acknowledge,
        now: DateTime<Utc>,
    ) -> Result<Outcome, FlowError> {
        let mut form = FormInstance::from_view(view, private_metadata)?;
        let record = match form.submit(values, now)? {
            SubmitOutcome::Rejected(errors) => {
                info!(submitter, errors = errors.len(), "submission rejected");
                ack.ack(AckResponse::Errors(errors.clone())).await?;
                return Ok(Outcome::Rejected(errors));
            }
            SubmitOutcome::Accepted(record) => record,
        };
        ack.ack(AckResponse::Empty).await?;

        let summary = record.summary();
        info!(submitter, "request submitted:\n{summary}");

        let report = Dispatcher::new(self.platform.as_ref())
            .fan_out(
                &self.config.triage_channel,
                submitter,
                record.approver.as_deref(),
                &summary,
            )
            .await;

        let count = self.store.append(submitter, summary).await?;
        debug!(submitter, count, "submission logged");

        self.refresh_home(submitter).await;
        Ok(Outcome::Submitted { form, report })
    }

    /// Republish the submitter's home tab from the log. Failures are logged.
    async fn refresh_home(&self, submitter: &str) {
        let entries = match self.store.list(submitter).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(submitter, error = %e, "cannot read submission log for home tab");
                return;
            }
        };
        let view = home_view(&entries);
        log_view("views.publish", &view);
        if let Err(e) = self.platform.publish_home_view(submitter, &view).await {
            warn!(submitter, error = %e, "home tab publish failed");
        }
    }
}

fn log_view(method: &str, view: &View) {
    if tracing::enabled!(tracing::Level::DEBUG) {
        let pretty = serde_json::to_string_pretty(view).unwrap_or_default();
        debug!(method, "view payload:\n{pretty}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::Step;
    use crate::testing::{Call, FakePlatform, RecordingAck};
    use chrono::Duration;
    use helpdesk_core::view::step1_view;
    use helpdesk_core::{Block, Category, FieldKey, FormMetadata};
    use helpdesk_store::{MemoryStore, StoreError};

    struct Harness {
        platform: Arc<FakePlatform>,
        store: Arc<MemoryStore>,
        workflow: Workflow,
    }

    fn harness_with(platform: FakePlatform) -> Harness {
        let platform = Arc::new(platform);
        let store = Arc::new(MemoryStore::new());
        let workflow = Workflow::new(
            platform.clone(),
            store.clone(),
            WorkflowConfig::default(),
        );
        Harness {
            platform,
            store,
            workflow,
        }
    }

    fn harness() -> Harness {
        harness_with(FakePlatform::default())
    }

    fn v1(hash: &str) -> ViewHandle {
        ViewHandle {
            id: "V1".into(),
            hash: hash.into(),
        }
    }

    fn submitted(category: Category, values: StateValues, submitter: &str) -> InteractionEvent {
        InteractionEvent::ViewSubmitted {
            view: v1("h2"),
            private_metadata: FormMetadata::new(category).encode(),
            values,
            submitter: submitter.into(),
        }
    }

    fn mobile_values(now: DateTime<Utc>) -> StateValues {
        StateValues::new()
            .with_text(FieldKey::Title, "Broken screen")
            .with_option(FieldKey::MobileOs, "ios")
            .with_user(FieldKey::Approver, "U123")
            .with_date(FieldKey::DueDate, now.date_naive() + Duration::days(3))
    }

    #[tokio::test]
    async fn shortcut_acks_and_opens_step1() {
        let h = harness();
        let mut ack = RecordingAck::default();
        let outcome = h
            .workflow
            .handle(
                InteractionEvent::ShortcutInvoked {
                    trigger_id: "t1".into(),
                    user_id: "U777".into(),
                },
                &mut ack,
            )
            .await
            .unwrap();

        assert_eq!(ack.responses, [AckResponse::Empty]);
        let Outcome::Opened(form) = outcome else {
            panic!("expected opened form");
        };
        assert_eq!(form.step(), Step::Step1);
        assert_eq!(
            h.platform.calls(),
            [Call::OpenView {
                trigger_id: "t1".into(),
                view: step1_view(MODAL_CALLBACK_ID)
            }]
        );
    }

    #[tokio::test]
    async fn category_selection_updates_with_observed_hash() {
        let h = harness();
        let mut ack = RecordingAck::default();
        let outcome = h
            .workflow
            .handle(
                InteractionEvent::CategorySelected {
                    value: "laptop".into(),
                    view: v1("h1"),
                    private_metadata: String::new(),
                },
                &mut ack,
            )
            .await
            .unwrap();

        assert_eq!(ack.responses, [AckResponse::Empty]);
        let Outcome::Updated(form) = outcome else {
            panic!("expected updated form");
        };
        assert_eq!(form.category(), Some(Category::Laptop));
        assert_eq!(form.view(), &v1("h1+"));

        let calls = h.platform.calls();
        let [Call::UpdateView { view_id, hash, view }] = calls.as_slice() else {
            panic!("expected one update, got {calls:?}");
        };
        assert_eq!((view_id.as_str(), hash.as_str()), ("V1", "h1"));
        assert_eq!(view.private_metadata.as_deref(), Some(r#"{"category":"laptop"}"#));
        assert!(matches!(
            &view.blocks[0],
            Block::Section { text, .. } if text.as_str() == Category::Laptop.header_text()
        ));
    }

    #[tokio::test]
    async fn unknown_category_is_acked_but_not_displayed() {
        let h = harness();
        let mut ack = RecordingAck::default();
        let err = h
            .workflow
            .handle(
                InteractionEvent::CategorySelected {
                    value: "tablet".into(),
                    view: v1("h1"),
                    private_metadata: String::new(),
                },
                &mut ack,
            )
            .await
            .unwrap_err();

        assert!(err.is_protocol());
        assert_eq!(ack.responses, [AckResponse::Empty]);
        assert_eq!(h.platform.view_updates(), 0);
    }

    #[tokio::test]
    async fn reset_restores_initial_view() {
        let h = harness();
        let mut ack = RecordingAck::default();
        let outcome = h
            .workflow
            .handle(
                InteractionEvent::ResetPressed {
                    view: v1("h2"),
                    private_metadata: FormMetadata::new(Category::Other).encode(),
                },
                &mut ack,
            )
            .await
            .unwrap();

        let Outcome::Updated(form) = outcome else {
            panic!("expected updated form");
        };
        assert_eq!(form.step(), Step::Step1);
        assert_eq!(
            h.platform.calls(),
            [Call::UpdateView {
                view_id: "V1".into(),
                hash: "h2".into(),
                view: step1_view(MODAL_CALLBACK_ID)
            }]
        );
    }

    #[tokio::test]
    async fn invalid_submission_acks_errors_and_sends_nothing() {
        let h = harness();
        let mut ack = RecordingAck::default();
        let now = Utc::now();
        let values = StateValues::new()
            .with_text(FieldKey::Title, "help")
            .with_date(FieldKey::DueDate, now.date_naive() - Duration::days(1));
        let outcome = h
            .workflow
            .handle_at(submitted(Category::Mobile, values, "U777"), &mut ack, now)
            .await
            .unwrap();

        let Outcome::Rejected(errors) = outcome else {
            panic!("expected rejection");
        };
        assert_eq!(errors.fields().collect::<Vec<_>>(), ["due-date", "title"]);
        assert_eq!(ack.responses, [AckResponse::Errors(errors)]);
        assert!(h.platform.calls().is_empty());
        assert!(h.store.list("U777").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn mobile_request_end_to_end() {
        let h = harness();
        let now = Utc::now();

        let mut ack = RecordingAck::default();
        let Outcome::Opened(form) = h
            .workflow
            .handle(
                InteractionEvent::ShortcutInvoked {
                    trigger_id: "t1".into(),
                    user_id: "U777".into(),
                },
                &mut ack,
            )
            .await
            .unwrap()
        else {
            panic!("expected opened form");
        };

        let Outcome::Updated(form) = h
            .workflow
            .handle(
                InteractionEvent::CategorySelected {
                    value: "mobile".into(),
                    view: form.view().clone(),
                    private_metadata: String::new(),
                },
                &mut ack,
            )
            .await
            .unwrap()
        else {
            panic!("expected updated form");
        };

        let outcome = h
            .workflow
            .handle_at(
                InteractionEvent::ViewSubmitted {
                    view: form.view().clone(),
                    private_metadata: FormMetadata::new(Category::Mobile).encode(),
                    values: mobile_values(now),
                    submitter: "U777".into(),
                },
                &mut ack,
                now,
            )
            .await
            .unwrap();

        assert_eq!(ack.responses, vec![AckResponse::Empty; 3]);
        let Outcome::Submitted { form, report } = outcome else {
            panic!("expected submission");
        };
        assert_eq!(form.step(), Step::Closed);
        assert_eq!(report.sent, 3);
        assert_eq!(
            h.platform.posted_channels(),
            ["#general", "D-U777", "D-U123"]
        );

        let log = h.store.list("U777").await.unwrap();
        assert_eq!(log.len(), 1);
        assert!(log[0].contains("*Title*: Broken screen"));
        assert!(log[0].contains("*Mobile OS*: ios"));

        let Some(Call::PublishHome { user_id, view }) = h.platform.calls().pop() else {
            panic!("expected home publish last");
        };
        assert_eq!(user_id, "U777");
        assert_eq!(view.blocks.len(), 2);
    }

    #[tokio::test]
    async fn home_tab_lists_every_submission() {
        let h = harness();
        let now = Utc::now();
        for _ in 0..2 {
            let mut ack = RecordingAck::default();
            h.workflow
                .handle_at(
                    submitted(Category::Mobile, mobile_values(now), "U777"),
                    &mut ack,
                    now,
                )
                .await
                .unwrap();
        }
        let homes: Vec<_> = h
            .platform
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::PublishHome { view, .. } => Some(view.blocks.len()),
                _ => None,
            })
            .collect();
        assert_eq!(homes, [2, 4]);
    }

    #[tokio::test]
    async fn failed_notification_still_logs_submission() {
        let h = harness_with(FakePlatform::failing_channel("#general"));
        let now = Utc::now();
        let mut ack = RecordingAck::default();
        let outcome = h
            .workflow
            .handle_at(
                submitted(Category::Mobile, mobile_values(now), "U777"),
                &mut ack,
                now,
            )
            .await
            .unwrap();

        let Outcome::Submitted { report, .. } = outcome else {
            panic!("expected submission");
        };
        assert_eq!(report.failed.len(), 1);
        assert_eq!(h.platform.posted_channels(), ["D-U777", "D-U123"]);
        assert_eq!(h.store.list("U777").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn laptop_form_rejects_mobile_field() {
        let h = harness();
        let now = Utc::now();
        let mut ack = RecordingAck::default();
        let err = h
            .workflow
            .handle_at(
                submitted(Category::Laptop, mobile_values(now), "U777"),
                &mut ack,
                now,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::UnexpectedField { .. }));
        assert!(ack.responses.is_empty());
        assert!(h.platform.calls().is_empty());
    }

    struct UnavailableStore;

    #[async_trait::async_trait]
    impl SubmissionStore for UnavailableStore {
        async fn append(&self, _: &str, _: String) -> Result<usize, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }

        async fn list(&self, _: &str) -> Result<Vec<String>, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn store_outage_surfaces_after_notifications() {
        let platform = Arc::new(FakePlatform::default());
        let workflow = Workflow::new(
            platform.clone(),
            Arc::new(UnavailableStore),
            WorkflowConfig::default(),
        );
        let now = Utc::now();
        let mut ack = RecordingAck::default();
        let err = workflow
            .handle_at(
                submitted(Category::Mobile, mobile_values(now), "U777"),
                &mut ack,
                now,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, FlowError::Store(StoreError::Unavailable(_))));
        assert!(!err.is_protocol());
        assert_eq!(ack.responses, [AckResponse::Empty]);
        assert_eq!(platform.posted_channels().len(), 3);
        assert!(
            !platform
                .calls()
                .iter()
                .any(|c| matches!(c, Call::PublishHome { .. }))
        );
    }
}
