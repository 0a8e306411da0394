pub mod booking;
pub mod clock;
pub mod date;
pub mod rules;
pub mod validator;

pub use booking::{AirportCode, BookingCandidate, BookingState, SeatingClass, UnknownToken};
pub use clock::{Clock, FixedClock, OffsetClock, SystemClock};
pub use date::{CalendarDate, ParseError};
pub use rules::{Rule, Violation};
pub use validator::{BookingValidator, Rejection, SubmitOutcome};
