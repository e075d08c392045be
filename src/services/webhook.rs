//! Inbound webhook endpoint and the update listener behind it.
//!
//! The axum route decodes each update and pushes it onto a bounded queue;
//! the teloxide `Dispatcher` drains that queue through [`update_listener`],
//! running updates of the same chat one after another.

use std::convert::Infallible;
use std::task::Poll;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::post,
    Router,
};
use futures::{FutureExt, Stream};
use serde::{Deserialize, Serialize};
use teloxide::stop::{mk_stop_token, StopFlag, StopToken};
use teloxide::types::{Update, UpdateKind};
use teloxide::update_listeners::{StatefulListener, UpdateListener};
use tokio::sync::mpsc;

pub const WEBHOOK_PATH: &str = "/webhook";
pub const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Default capacity of the webhook-to-dispatcher queue.
pub const QUEUE_CAPACITY: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub ok: bool,
}

/// Sending half of the update queue. Refuses updates once the listener was
/// asked to stop.
#[derive(Clone)]
pub struct UpdateIntake {
    queue: mpsc::Sender<Update>,
    stop_flag: StopFlag,
}

impl UpdateIntake {
    pub async fn enqueue(&self, update: Update) -> Result<(), mpsc::error::SendError<Update>> {
        if self.stop_flag.is_stopped() {
            return Err(mpsc::error::SendError(update));
        }
        self.queue.send(update).await
    }
}

struct ListenerState {
    queue: mpsc::Receiver<Update>,
    stop_token: StopToken,
    stop_flag: StopFlag,
}

/// Creates the queue shared by the webhook route and the dispatcher.
///
/// The listener's stream ends once every [`UpdateIntake`] is dropped, or
/// once it was stopped and the queued updates are drained. The returned
/// [`StopFlag`] resolves when the dispatcher stops the listener.
pub fn update_listener(
    capacity: usize,
) -> (impl UpdateListener<Err = Infallible>, UpdateIntake, StopFlag) {
    let (tx, rx) = mpsc::channel(capacity);
    let (stop_token, stop_flag) = mk_stop_token();

    let intake = UpdateIntake {
        queue: tx,
        stop_flag: stop_flag.clone(),
    };
    let state = ListenerState {
        queue: rx,
        stop_token,
        stop_flag: stop_flag.clone(),
    };
    let listener = StatefulListener::new(state, update_stream, |state: &mut ListenerState| {
        state.stop_token.clone()
    });

    (listener, intake, stop_flag)
}

fn update_stream(
    state: &mut ListenerState,
) -> impl Stream<Item = Result<Update, Infallible>> + Send + '_ {
    futures::stream::poll_fn(move |cx| match state.queue.poll_recv(cx) {
        Poll::Ready(update) => Poll::Ready(update.map(Ok)),
        Poll::Pending if state.stop_flag.is_stopped() => Poll::Ready(None),
        Poll::Pending => state.stop_flag.poll_unpin(cx).map(|()| None),
    })
}

#[derive(Clone)]
struct WebhookState {
    intake: UpdateIntake,
    secret: Option<String>,
}

pub fn webhook_router(intake: UpdateIntake, secret: Option<String>) -> Router {
    Router::new()
        .route(WEBHOOK_PATH, post(receive_update))
        .with_state(WebhookState { intake, secret })
}

async fn receive_update(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Ack>, StatusCode> {
    if let Some(expected) = &state.secret {
        let provided = headers
            .get(SECRET_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok());
        if provided != Some(expected.as_str()) {
            tracing::warn!("Rejected webhook call with missing or wrong secret token");
            return Err(StatusCode::UNAUTHORIZED);
        }
    }

    // Undecodable payloads are acknowledged so the platform does not
    // redeliver them.
    match serde_json::from_slice::<Update>(&body) {
        Ok(update) => {
            if let UpdateKind::Error(value) = &update.kind {
                tracing::warn!("Discarding update {:?} of unknown shape: {}", update.id, value);
            } else if state.intake.enqueue(update).await.is_err() {
                tracing::error!("Update queue is closed, refusing webhook call");
                return Err(StatusCode::SERVICE_UNAVAILABLE);
            }
        }
        Err(e) => tracing::warn!("Discarding undecodable webhook payload: {}", e),
    }

    Ok(Json(Ack { ok: true }))
}
