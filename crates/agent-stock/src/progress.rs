//! Progress events of an analysis run
//!
//! Events are published on a process-wide broadcast channel and tagged with
//! the session id of the run that produced them. Listeners filter on their
//! own session. Delivery is fire-and-forget: with no listener the event is
//! dropped, and a lagging listener skips what it missed.

use chrono::Utc;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{trace, warn};

/// Buffered envelopes per listener before it starts lagging
pub const DEFAULT_CAPACITY: usize = 256;

/// One progress notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// A stage started
    Progress(String),
    /// The run finished; carries the final result
    Complete(String),
    /// The run failed; carries the error text
    Error(String),
}

impl ProgressEvent {
    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            ProgressEvent::Progress(_) => "analysis_progress",
            ProgressEvent::Complete(_) => "analysis_complete",
            ProgressEvent::Error(_) => "analysis_error",
        }
    }

    /// Event payload
    pub fn data(&self) -> &str {
        match self {
            ProgressEvent::Progress(s) | ProgressEvent::Complete(s) | ProgressEvent::Error(s) => s,
        }
    }
}

/// An event as sent to listeners
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressEnvelope {
    pub event: &'static str,
    pub data: String,
    pub session_id: String,
    /// RFC 3339 emission time
    pub timestamp: String,
}

/// Destination for the progress events of one run
pub trait ProgressSink: Send + Sync {
    /// Publish an event; never blocks and never fails
    fn emit(&self, event: ProgressEvent);
}

/// Broadcast hub shared by all runs
#[derive(Debug, Clone)]
pub struct ProgressHub {
    sender: broadcast::Sender<ProgressEnvelope>,
}

impl Default for ProgressHub {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ProgressHub {
    /// Create a hub buffering `capacity` envelopes per listener
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Sink publishing under `session_id`
    pub fn publisher(&self, session_id: impl Into<String>) -> SessionPublisher {
        SessionPublisher {
            sender: self.sender.clone(),
            session_id: session_id.into(),
        }
    }

    /// Listen to the events of one session
    pub fn subscribe(&self, session_id: impl Into<String>) -> SessionSubscription {
        SessionSubscription {
            receiver: self.sender.subscribe(),
            session_id: session_id.into(),
        }
    }
}

/// Publishes the events of one session
#[derive(Debug, Clone)]
pub struct SessionPublisher {
    sender: broadcast::Sender<ProgressEnvelope>,
    session_id: String,
}

impl ProgressSink for SessionPublisher {
    fn emit(&self, event: ProgressEvent) {
        let envelope = ProgressEnvelope {
            event: event.name(),
            data: event.data().to_string(),
            session_id: self.session_id.clone(),
            timestamp: Utc::now().to_rfc3339(),
        };

        if self.sender.send(envelope).is_err() {
            trace!(session_id = %self.session_id, event = event.name(), "No listeners, event dropped");
        }
    }
}

/// Receives the events of one session
#[derive(Debug)]
pub struct SessionSubscription {
    receiver: broadcast::Receiver<ProgressEnvelope>,
    session_id: String,
}

impl SessionSubscription {
    /// Next event of this session, or `None` once the hub is gone
    pub async fn recv(&mut self) -> Option<ProgressEnvelope> {
        loop {
            match self.receiver.recv().await {
                Ok(envelope) if envelope.session_id == self.session_id => return Some(envelope),
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(session_id = %self.session_id, skipped, "Progress listener lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Next already-buffered event of this session, without waiting
    pub fn try_recv(&mut self) -> Option<ProgressEnvelope> {
        loop {
            match self.receiver.try_recv() {
                Ok(envelope) if envelope.session_id == self.session_id => return Some(envelope),
                Ok(_) | Err(broadcast::error::TryRecvError::Lagged(_)) => {}
                Err(_) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(ProgressEvent::Progress("x".into()).name(), "analysis_progress");
        assert_eq!(ProgressEvent::Complete("BUY".into()).name(), "analysis_complete");
        assert_eq!(ProgressEvent::Error("boom".into()).data(), "boom");
    }

    #[test]
    fn test_emit_without_listener_is_dropped() {
        let hub = ProgressHub::default();
        hub.publisher("s1")
            .emit(ProgressEvent::Progress("Initializing research analyst...".into()));

        let mut late = hub.subscribe("s1");
        assert!(late.try_recv().is_none());

        hub.publisher("s1").emit(ProgressEvent::Complete("HOLD".into()));
        assert_eq!(late.try_recv().map(|e| e.data), Some("HOLD".to_string()));
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let hub = ProgressHub::new(16);
        let mut first = hub.subscribe("first");
        let mut second = hub.subscribe("second");

        hub.publisher("first").emit(ProgressEvent::Progress("a".into()));
        hub.publisher("second").emit(ProgressEvent::Complete("b".into()));
        hub.publisher("first").emit(ProgressEvent::Error("c".into()));

        let got = first.recv().await.unwrap();
        assert_eq!((got.event, got.data.as_str()), ("analysis_progress", "a"));
        let got = first.recv().await.unwrap();
        assert_eq!((got.event, got.data.as_str()), ("analysis_error", "c"));
        assert!(first.try_recv().is_none());

        let got = second.recv().await.unwrap();
        assert_eq!(got.session_id, "second");
        assert_eq!(got.event, "analysis_complete");
        assert!(second.try_recv().is_none());
    }

    #[test]
    fn test_envelope_json() {
        let envelope = ProgressEnvelope {
            event: "analysis_progress",
            data: "Conducting financial analysis...".to_string(),
            session_id: "abc".to_string(),
            timestamp: "2024-06-01T12:00:00+00:00".to_string(),
        };

        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            serde_json::json!({
                "event": "analysis_progress",
                "data": "Conducting financial analysis...",
                "session_id": "abc",
                "timestamp": "2024-06-01T12:00:00+00:00"
            })
        );
    }
}
