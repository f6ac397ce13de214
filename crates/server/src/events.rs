//! # Feedback Events
//!
//! Broadcasts feedback changes to server-sent-event subscribers. Delivery is
//! best effort: events published with no subscriber are dropped, and a
//! subscriber that lags behind the channel capacity skips the missed events.

use std::convert::Infallible;

use axum::response::sse::Event;
use futures::stream::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, warn};
use uuid::Uuid;

/// What happened to the feedback of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackEventKind {
    /// A sender answered or edited one request
    Answered,
    /// A rule added requests to the session
    Generated,
    /// Duplicate requests were deleted
    DuplicatesRemoved,
}

impl FeedbackEventKind {
    fn as_str(self) -> &'static str {
        match self {
            FeedbackEventKind::Answered => "answered",
            FeedbackEventKind::Generated => "generated",
            FeedbackEventKind::DuplicatesRemoved => "duplicates_removed",
        }
    }
}

/// One feedback change. Session-wide changes carry no sender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEvent {
    pub kind:        FeedbackEventKind,
    pub session_id:  Uuid,
    pub sender_id:   Option<Uuid>,
    pub feedback_id: Option<Uuid>,
    pub value:       Option<i16>,
}

impl FeedbackEvent {
    pub fn answered(feedback: &entity::feedbacks::Model) -> Self {
        Self {
            kind:        FeedbackEventKind::Answered,
            session_id:  feedback.session_id,
            sender_id:   Some(feedback.sender_id),
            feedback_id: Some(feedback.id),
            value:       feedback.value,
        }
    }

    pub fn session_wide(kind: FeedbackEventKind, session_id: Uuid) -> Self {
        Self {
            kind,
            session_id,
            sender_id: None,
            feedback_id: None,
            value: None,
        }
    }
}

/// Subscription filter: one session, optionally one sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventFilter {
    pub session_id: Uuid,
    pub sender_id:  Option<Uuid>,
}

impl EventFilter {
    pub fn matches(&self, event: &FeedbackEvent) -> bool {
        if event.session_id != self.session_id {
            return false;
        }
        match (self.sender_id, event.sender_id) {
            (Some(wanted), Some(sender)) => wanted == sender,
            _ => true,
        }
    }
}

/// Fan-out of feedback events to every connected client.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<FeedbackEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
        }
    }

    /// Publish an event, returning how many subscribers received it.
    pub fn publish(&self, event: FeedbackEvent) -> usize {
        match self.tx.send(event) {
            Ok(count) => {
                debug!(subscribers = count, "Feedback event published");
                count
            },
            Err(_) => 0,
        }
    }

    pub fn subscriber_count(&self) -> usize { self.tx.receiver_count() }

    /// Raw event stream for `filter`.
    pub fn subscribe(&self, filter: EventFilter) -> impl Stream<Item = FeedbackEvent> {
        BroadcastStream::new(self.tx.subscribe()).filter_map(move |result| {
            async move {
                match result {
                    Ok(event) if filter.matches(&event) => Some(event),
                    Ok(_) => None,
                    Err(e) => {
                        warn!(session_id = %filter.session_id, error = ?e, "SSE subscriber lagged");
                        None
                    },
                }
            }
        })
    }

    /// Stream of SSE frames for `filter`.
    pub fn sse_stream(&self, filter: EventFilter) -> impl Stream<Item = Result<Event, Infallible>> {
        self.subscribe(filter).filter_map(|event| {
            async move {
                Event::default()
                    .event(event.kind.as_str())
                    .json_data(&event)
                    .ok()
                    .map(Ok)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answered(session_id: Uuid, sender_id: Uuid) -> FeedbackEvent {
        FeedbackEvent {
            kind: FeedbackEventKind::Answered,
            session_id,
            sender_id: Some(sender_id),
            feedback_id: Some(Uuid::new_v4()),
            value: Some(4),
        }
    }

    #[test]
    fn test_filter_by_session_and_sender() {
        let (session, alice, bob) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let filter = EventFilter {
            session_id: session,
            sender_id:  Some(alice),
        };

        assert!(filter.matches(&answered(session, alice)));
        assert!(!filter.matches(&answered(session, bob)));
        assert!(!filter.matches(&answered(Uuid::new_v4(), alice)));
        assert!(filter.matches(&FeedbackEvent::session_wide(
            FeedbackEventKind::Generated,
            session
        )));
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::new(8);
        assert_eq!(bus.publish(answered(Uuid::new_v4(), Uuid::new_v4())), 0);
    }

    #[tokio::test]
    async fn test_subscriber_receives_matching_events() {
        let bus = EventBus::new(8);
        let session = Uuid::new_v4();
        let stream = bus.subscribe(EventFilter {
            session_id: session,
            sender_id:  None,
        });
        futures::pin_mut!(stream);

        bus.publish(answered(Uuid::new_v4(), Uuid::new_v4()));
        let expected = answered(session, Uuid::new_v4());
        bus.publish(expected.clone());

        assert_eq!(stream.next().await, Some(expected));
    }
}
