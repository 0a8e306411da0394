use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::date::CalendarDate;

/// Cabin requested for every passenger on the booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeatingClass {
    Economy,
    PremiumEconomy,
    Business,
    First,
}

impl SeatingClass {
    pub const ALL: [SeatingClass; 4] = [
        SeatingClass::Economy,
        SeatingClass::PremiumEconomy,
        SeatingClass::Business,
        SeatingClass::First,
    ];

    /// Exact, case-sensitive lookup. `"premium economy"` is kept as an alias
    /// of `"premium-economy"` for requests using the older spelling.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "economy" => Some(SeatingClass::Economy),
            "premium-economy" | "premium economy" => Some(SeatingClass::PremiumEconomy),
            "business" => Some(SeatingClass::Business),
            "first" => Some(SeatingClass::First),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeatingClass::Economy => "economy",
            SeatingClass::PremiumEconomy => "premium-economy",
            SeatingClass::Business => "business",
            SeatingClass::First => "first",
        }
    }
}

impl fmt::Display for SeatingClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeatingClass {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(s).ok_or_else(|| UnknownToken::SeatingClass(s.to_string()))
    }
}

/// Airports served by the booking engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AirportCode {
    Syd,
    Mel,
    Lax,
    Cdg,
    Del,
    Pvg,
    Doh,
}

impl AirportCode {
    pub const ALL: [AirportCode; 7] = [
        AirportCode::Syd,
        AirportCode::Mel,
        AirportCode::Lax,
        AirportCode::Cdg,
        AirportCode::Del,
        AirportCode::Pvg,
        AirportCode::Doh,
    ];

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|code| code.as_str() == token)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AirportCode::Syd => "syd",
            AirportCode::Mel => "mel",
            AirportCode::Lax => "lax",
            AirportCode::Cdg => "cdg",
            AirportCode::Del => "del",
            AirportCode::Pvg => "pvg",
            AirportCode::Doh => "doh",
        }
    }
}

impl fmt::Display for AirportCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AirportCode {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(s).ok_or_else(|| UnknownToken::Airport(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnknownToken {
    #[error("Unknown seating class: {0:?}")]
    SeatingClass(String),

    #[error("Unknown airport code: {0:?}")]
    Airport(String),
}

/// A booking request as submitted by the caller, before any validation.
///
/// Tokens are kept as raw text and counts as signed integers so that
/// malformed input reaches the rules instead of failing at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingCandidate {
    pub departure_date: String,
    pub return_date: String,
    pub departure_airport: String,
    pub destination_airport: String,
    pub emergency_row_seating: bool,
    pub seating_class: String,
    pub adult_count: i32,
    pub child_count: i32,
    pub infant_count: i32,
}

impl BookingCandidate {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        departure_date: impl Into<String>,
        departure_airport: impl Into<String>,
        emergency_row_seating: bool,
        return_date: impl Into<String>,
        destination_airport: impl Into<String>,
        seating_class: impl Into<String>,
        adult_count: i32,
        child_count: i32,
        infant_count: i32,
    ) -> Self {
        Self {
            departure_date: departure_date.into(),
            return_date: return_date.into(),
            departure_airport: departure_airport.into(),
            destination_airport: destination_airport.into(),
            emergency_row_seating,
            seating_class: seating_class.into(),
            adult_count,
            child_count,
            infant_count,
        }
    }

    /// Sum of all passenger counts, widened so extreme inputs cannot overflow.
    pub fn total_passengers(&self) -> i64 {
        i64::from(self.adult_count) + i64::from(self.child_count) + i64::from(self.infant_count)
    }
}

/// The last accepted booking.
///
/// Only the validator can build one, and only from a candidate that passed
/// every rule, so holding a `BookingState` means holding a valid booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingState {
    candidate: BookingCandidate,
    departure: CalendarDate,
    return_on: CalendarDate,
    origin: AirportCode,
    destination: AirportCode,
    class: SeatingClass,
}

impl BookingState {
    pub(crate) fn new(
        candidate: BookingCandidate,
        departure: CalendarDate,
        return_on: CalendarDate,
        origin: AirportCode,
        destination: AirportCode,
        class: SeatingClass,
    ) -> Self {
        Self {
            candidate,
            departure,
            return_on,
            origin,
            destination,
            class,
        }
    }

    /// The accepted request exactly as it was submitted.
    pub fn candidate(&self) -> &BookingCandidate {
        &self.candidate
    }

    pub fn into_candidate(self) -> BookingCandidate {
        self.candidate
    }

    pub fn departure_date(&self) -> &str {
        &self.candidate.departure_date
    }

    pub fn return_date(&self) -> &str {
        &self.candidate.return_date
    }

    pub fn departure_airport(&self) -> &str {
        &self.candidate.departure_airport
    }

    pub fn destination_airport(&self) -> &str {
        &self.candidate.destination_airport
    }

    pub fn emergency_row_seating(&self) -> bool {
        self.candidate.emergency_row_seating
    }

    pub fn seating_class(&self) -> &str {
        &self.candidate.seating_class
    }

    pub fn adult_count(&self) -> i32 {
        self.candidate.adult_count
    }

    pub fn child_count(&self) -> i32 {
        self.candidate.child_count
    }

    pub fn infant_count(&self) -> i32 {
        self.candidate.infant_count
    }

    pub fn departure(&self) -> CalendarDate {
        self.departure
    }

    pub fn return_on(&self) -> CalendarDate {
        self.return_on
    }

    pub fn origin(&self) -> AirportCode {
        self.origin
    }

    pub fn destination(&self) -> AirportCode {
        self.destination
    }

    pub fn class(&self) -> SeatingClass {
        self.class
    }
}
