//! The `/slack/events` endpoint.
//!
//! Every request is signature-checked, decoded, and routed to the workflow,
//! which runs in its own task. The HTTP response carries the first
//! acknowledgment the workflow emits; anything it does after acknowledging
//! (view updates, notifications) continues once the response has been sent.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use helpdesk_flow::{AckResponse, Acknowledge, FlowError, InteractionEvent, Workflow};
use helpdesk_slack::signature::{SIGNATURE_HEADER, TIMESTAMP_HEADER};
use helpdesk_slack::{EventsPayload, InteractionPayload, SignatureVerifier};
use serde_json::json;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::display;

#[derive(Clone)]
pub struct AppState {
    pub workflow: Arc<Workflow>,
    pub verifier: SignatureVerifier,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/slack/events", post(events))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

/// Sends the workflow's acknowledgment back to the waiting request handler.
struct ChannelAck {
    tx: Option<oneshot::Sender<AckResponse>>,
}

#[async_trait]
impl Acknowledge for ChannelAck {
    async fn ack(&mut self, response: AckResponse) -> Result<(), FlowError> {
        let tx = self.tx.take().ok_or(FlowError::AlreadyAcknowledged)?;
        if tx.send(response).is_err() {
            debug!("request closed before acknowledgment");
        }
        Ok(())
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}

async fn events(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let header_str = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    if let Err(e) = state.verifier.verify(
        header_str(TIMESTAMP_HEADER),
        header_str(SIGNATURE_HEADER),
        &body,
        chrono::Utc::now().timestamp(),
    ) {
        warn!(error = %e, "rejected unsigned request");
        return StatusCode::UNAUTHORIZED.into_response();
    }

    debug!("inbound payload:\n{}", display::render_body(&body));

    if is_json(&headers) {
        return match serde_json::from_slice::<EventsPayload>(&body) {
            Ok(EventsPayload::UrlVerification { challenge }) => {
                info!("answered url verification");
                Json(json!({ "challenge": challenge })).into_response()
            }
            Ok(EventsPayload::Unsupported) => StatusCode::OK.into_response(),
            Err(e) => {
                warn!(error = %e, "malformed events body");
                StatusCode::BAD_REQUEST.into_response()
            }
        };
    }

    let event = match InteractionPayload::from_form(&body)
        .map_err(|e| e.to_string())
        .and_then(|payload| InteractionEvent::route(payload).map_err(|e| e.to_string()))
    {
        Ok(Some(event)) => event,
        Ok(None) => {
            info!("no listener for payload");
            return StatusCode::NOT_FOUND.into_response();
        }
        Err(e) => {
            error!(error = %e, "malformed interaction payload");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let (tx, rx) = oneshot::channel();
    let workflow = state.workflow.clone();
    tokio::spawn(async move {
        let kind = event.kind();
        let mut ack = ChannelAck { tx: Some(tx) };
        if let Err(e) = workflow.handle(event, &mut ack).await {
            error!(kind, error = %e, "interaction handling failed");
        }
    });

    match rx.await {
        Ok(response) => match response.to_json() {
            Some(body) => Json(body).into_response(),
            None => StatusCode::OK.into_response(),
        },
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}
