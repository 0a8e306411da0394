use chrono::Utc;
use uuid::Uuid;

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct BookingCommittedEvent {
    pub event_id: Uuid,
    pub committed_at: i64,
    pub booking: serde_json::Value, // Serialized BookingCandidate
}

impl BookingCommittedEvent {
    pub fn new(booking: serde_json::Value) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            committed_at: Utc::now().timestamp(),
            booking,
        }
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct RuleFailure {
    pub rule: u8,
    pub reason: String,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct BookingRejectedEvent {
    pub event_id: Uuid,
    pub rejected_at: i64,
    pub failures: Vec<RuleFailure>,
}

impl BookingRejectedEvent {
    pub fn new(failures: Vec<RuleFailure>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            rejected_at: Utc::now().timestamp(),
            failures,
        }
    }
}

/// Outcome of one submission, as broadcast to subscribers.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingEvent {
    Committed(BookingCommittedEvent),
    Rejected(BookingRejectedEvent),
}

impl BookingEvent {
    pub fn event_id(&self) -> Uuid {
        match self {
            BookingEvent::Committed(e) => e.event_id,
            BookingEvent::Rejected(e) => e.event_id,
        }
    }

    pub fn is_committed(&self) -> bool {
        matches!(self, BookingEvent::Committed(_))
    }
}
