use flightgate_core::{
    BookingCandidate, BookingState, BookingValidator, Clock, Rejection, SubmitOutcome,
};
use flightgate_shared::models::events::{
    BookingCommittedEvent, BookingEvent, BookingRejectedEvent, RuleFailure,
};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

use crate::app_config::Config;
use crate::error::ServiceResult;

/// Single-writer access to one [`BookingValidator`].
///
/// Submissions take the write lock for the whole validate-and-commit step,
/// so readers never see a booking that is between states.
pub struct BookingService {
    validator: RwLock<BookingValidator<Arc<dyn Clock>>>,
    events: broadcast::Sender<BookingEvent>,
}

impl BookingService {
    pub fn new(clock: Arc<dyn Clock>, event_capacity: usize) -> Self {
        let (events, _) = broadcast::channel(event_capacity.max(1));
        Self {
            validator: RwLock::new(BookingValidator::new(clock)),
            events,
        }
    }

    pub fn from_config(config: &Config) -> ServiceResult<Self> {
        let clock = config.clock.build()?;
        Ok(Self::new(clock, config.event_capacity))
    }

    pub async fn submit(&self, candidate: &BookingCandidate) -> SubmitOutcome {
        let mut validator = self.validator.write().await;
        let outcome = validator.submit(candidate);

        let event = match &outcome {
            SubmitOutcome::Accepted => committed_event(candidate),
            SubmitOutcome::Rejected(rejection) => Some(rejected_event(rejection)),
        };
        // Published under the write guard so event order matches commit order.
        if let Some(event) = event {
            tracing::debug!(event_id = %event.event_id(), "Publishing booking event");
            let _ = self.events.send(event);
        }
        drop(validator);

        outcome
    }

    /// Dry run against the injected clock; never changes the current booking.
    pub async fn validate(&self, candidate: &BookingCandidate) -> Result<BookingState, Rejection> {
        self.validator.read().await.validate(candidate)
    }

    pub async fn current(&self) -> Option<BookingState> {
        self.validator.read().await.current().cloned()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BookingEvent> {
        self.events.subscribe()
    }
}

fn committed_event(candidate: &BookingCandidate) -> Option<BookingEvent> {
    match serde_json::to_value(candidate) {
        Ok(booking) => Some(BookingEvent::Committed(BookingCommittedEvent::new(booking))),
        Err(e) => {
            tracing::error!("Failed to serialize committed booking: {}", e);
            None
        }
    }
}

fn rejected_event(rejection: &Rejection) -> BookingEvent {
    let failures = rejection
        .violations()
        .iter()
        .map(|v| RuleFailure {
            rule: v.rule().number(),
            reason: v.to_string(),
        })
        .collect();
    BookingEvent::Rejected(BookingRejectedEvent::new(failures))
}
