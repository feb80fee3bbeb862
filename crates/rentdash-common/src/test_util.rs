//! Test doubles for driving the client and stores without a network.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use futures::channel::oneshot;

use crate::error::ApiError;
use crate::http::{ApiRequest, ApiResponse, Transport};
use crate::models::{Banner, Property, PropertyStatus, PropertyType};
use crate::notify::{Notice, Notifier};

type Reply = Result<ApiResponse, ApiError>;

enum Queued {
    Ready(Reply),
    Held(oneshot::Receiver<Reply>),
}

#[derive(Default)]
struct MockState {
    replies: VecDeque<Queued>,
    requests: Vec<ApiRequest>,
}

/// Scripted transport. Replies are consumed in FIFO order, one per request;
/// clones share the same script and request log.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

/// A reply the test releases by hand, to control completion order.
pub struct HeldReply(oneshot::Sender<Reply>);

impl HeldReply {
    pub fn respond(self, response: ApiResponse) {
        let _ = self.0.send(Ok(response));
    }

    pub fn fail(self, error: ApiError) {
        let _ = self.0.send(Err(error));
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn enqueue(&self, q: Queued) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replies
            .push_back(q);
    }

    pub fn push_response(&self, response: ApiResponse) {
        self.enqueue(Queued::Ready(Ok(response)));
    }

    pub fn push_json(&self, status: u16, body: serde_json::Value) {
        self.push_response(ApiResponse::new(status, body.to_string()));
    }

    pub fn push_error(&self, error: ApiError) {
        self.enqueue(Queued::Ready(Err(error)));
    }

    /// Queue a reply that stays pending until the returned handle is used.
    pub fn hold(&self) -> HeldReply {
        let (tx, rx) = oneshot::channel();
        self.enqueue(Queued::Held(rx));
        HeldReply(tx)
    }

    /// Every request seen so far, in send order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .requests
            .clone()
    }
}

impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let next = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.requests.push(request);
            state.replies.pop_front()
        };
        match next {
            Some(Queued::Ready(reply)) => reply,
            Some(Queued::Held(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(ApiError::Network("held reply dropped".into()))),
            None => Err(ApiError::Network("no reply scripted".into())),
        }
    }
}

/// Collects notices for assertions.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }
}

// ── Fixtures ────────────────────────────────────────────────────────

pub fn property(id: &str, name: &str, kind: PropertyType) -> Property {
    Property {
        id: id.to_string(),
        name: name.to_string(),
        address: format!("{name} address"),
        location: "Lagos".to_string(),
        kind,
        bedroom: 2,
        servicing: "Serviced".to_string(),
        price: 1_200_000.0,
        agent_percentage: 10.0,
        amenities: vec!["Parking".to_string()],
        images: vec![format!("https://cdn.test/{id}.jpg")],
        status: PropertyStatus::Available,
        description: String::new(),
    }
}

pub fn banner(id: &str, order: i64) -> Banner {
    Banner {
        id: id.to_string(),
        title: format!("Banner {id}"),
        description: String::new(),
        image_url: format!("https://cdn.test/{id}.png"),
        is_active: true,
        order,
        target_url: "/promo".to_string(),
    }
}
