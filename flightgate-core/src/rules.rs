use chrono::NaiveDate;
use std::fmt;

use crate::booking::{AirportCode, BookingCandidate, SeatingClass};
use crate::date::{self, CalendarDate, ParseError};

pub const MIN_PASSENGERS: i64 = 1;
pub const MAX_PASSENGERS: i64 = 9;
pub const CHILDREN_PER_ADULT: i64 = 2;
pub const INFANTS_PER_ADULT: i64 = 1;

/// Everything the rules need to know about one candidate, derived once.
#[derive(Debug, Clone)]
pub struct RuleContext<'a> {
    pub candidate: &'a BookingCandidate,
    pub departure: Result<CalendarDate, ParseError>,
    pub return_on: Result<CalendarDate, ParseError>,
    pub class: Option<SeatingClass>,
    pub origin: Option<AirportCode>,
    pub destination: Option<AirportCode>,
    pub today: NaiveDate,
}

impl<'a> RuleContext<'a> {
    pub fn new(candidate: &'a BookingCandidate, today: NaiveDate) -> Self {
        Self {
            candidate,
            departure: date::parse(&candidate.departure_date),
            return_on: date::parse(&candidate.return_date),
            class: SeatingClass::from_token(&candidate.seating_class),
            origin: AirportCode::from_token(&candidate.departure_airport),
            destination: AirportCode::from_token(&candidate.destination_airport),
            today,
        }
    }
}

/// The eleven booking rules, in reference order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    PassengerTotal,
    ChildSeating,
    InfantSeating,
    ChildRatio,
    InfantRatio,
    DepartureNotPast,
    StrictDates,
    ReturnNotBeforeDeparture,
    SeatingClassKnown,
    EmergencyRowEconomyOnly,
    AirportsValid,
}

impl Rule {
    pub const ALL: [Rule; 11] = [
        Rule::PassengerTotal,
        Rule::ChildSeating,
        Rule::InfantSeating,
        Rule::ChildRatio,
        Rule::InfantRatio,
        Rule::DepartureNotPast,
        Rule::StrictDates,
        Rule::ReturnNotBeforeDeparture,
        Rule::SeatingClassKnown,
        Rule::EmergencyRowEconomyOnly,
        Rule::AirportsValid,
    ];

    pub fn number(&self) -> u8 {
        match self {
            Rule::PassengerTotal => 1,
            Rule::ChildSeating => 2,
            Rule::InfantSeating => 3,
            Rule::ChildRatio => 4,
            Rule::InfantRatio => 5,
            Rule::DepartureNotPast => 6,
            Rule::StrictDates => 7,
            Rule::ReturnNotBeforeDeparture => 8,
            Rule::SeatingClassKnown => 9,
            Rule::EmergencyRowEconomyOnly => 10,
            Rule::AirportsValid => 11,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Rule::PassengerTotal => "1 to 9 passengers, no negative counts",
            Rule::ChildSeating => "children cannot sit in emergency rows or first class",
            Rule::InfantSeating => "infants cannot sit in emergency rows or business class",
            Rule::ChildRatio => "at most 2 children per adult",
            Rule::InfantRatio => "at most 1 infant per adult",
            Rule::DepartureNotPast => "departure is today or later",
            Rule::StrictDates => "dates are real DD/MM/YYYY dates",
            Rule::ReturnNotBeforeDeparture => "return is on or after departure",
            Rule::SeatingClassKnown => "seating class is offered",
            Rule::EmergencyRowEconomyOnly => "emergency rows are economy only",
            Rule::AirportsValid => "airports are served and distinct",
        }
    }

    pub fn check(&self, ctx: &RuleContext<'_>) -> Result<(), Violation> {
        let c = ctx.candidate;
        let adults = i64::from(c.adult_count);
        let children = i64::from(c.child_count);
        let infants = i64::from(c.infant_count);

        match self {
            Rule::PassengerTotal => {
                if children < 0 || infants < 0 {
                    return Err(Violation::NegativeCount {
                        children: c.child_count,
                        infants: c.infant_count,
                    });
                }
                let total = c.total_passengers();
                if !(MIN_PASSENGERS..=MAX_PASSENGERS).contains(&total) {
                    return Err(Violation::PassengerTotal { total });
                }
            }
            Rule::ChildSeating => {
                if children > 0 {
                    if c.emergency_row_seating {
                        return Err(Violation::ChildInEmergencyRow);
                    }
                    if ctx.class == Some(SeatingClass::First) {
                        return Err(Violation::ChildInFirstClass);
                    }
                }
            }
            Rule::InfantSeating => {
                if infants > 0 {
                    if c.emergency_row_seating {
                        return Err(Violation::InfantInEmergencyRow);
                    }
                    if ctx.class == Some(SeatingClass::Business) {
                        return Err(Violation::InfantInBusinessClass);
                    }
                }
            }
            Rule::ChildRatio => {
                if children > 0 {
                    if adults < 1 {
                        return Err(Violation::ChildrenWithoutAdult);
                    }
                    if children > CHILDREN_PER_ADULT * adults {
                        return Err(Violation::TooManyChildren {
                            children: c.child_count,
                            adults: c.adult_count,
                        });
                    }
                }
            }
            Rule::InfantRatio => {
                if infants > 0 {
                    if adults < 1 {
                        return Err(Violation::InfantsWithoutAdult);
                    }
                    if infants > INFANTS_PER_ADULT * adults {
                        return Err(Violation::TooManyInfants {
                            infants: c.infant_count,
                            adults: c.adult_count,
                        });
                    }
                }
            }
            Rule::DepartureNotPast => {
                // An unparseable departure is reported by StrictDates.
                if let Ok(departure) = &ctx.departure {
                    if *departure < ctx.today {
                        return Err(Violation::DepartureInPast {
                            departure: *departure,
                            today: ctx.today,
                        });
                    }
                }
            }
            Rule::StrictDates => {
                if let Err(source) = &ctx.departure {
                    return Err(Violation::InvalidDepartureDate {
                        text: c.departure_date.clone(),
                        source: source.clone(),
                    });
                }
                if let Err(source) = &ctx.return_on {
                    return Err(Violation::InvalidReturnDate {
                        text: c.return_date.clone(),
                        source: source.clone(),
                    });
                }
            }
            Rule::ReturnNotBeforeDeparture => {
                if let (Ok(departure), Ok(return_on)) = (&ctx.departure, &ctx.return_on) {
                    if return_on < departure {
                        return Err(Violation::ReturnBeforeDeparture {
                            departure: *departure,
                            return_on: *return_on,
                        });
                    }
                }
            }
            Rule::SeatingClassKnown => {
                if ctx.class.is_none() {
                    return Err(Violation::UnknownSeatingClass(c.seating_class.clone()));
                }
            }
            Rule::EmergencyRowEconomyOnly => {
                if c.emergency_row_seating && ctx.class != Some(SeatingClass::Economy) {
                    return Err(Violation::EmergencyRowOutsideEconomy(c.seating_class.clone()));
                }
            }
            Rule::AirportsValid => match (ctx.origin, ctx.destination) {
                (None, _) => {
                    return Err(Violation::UnknownAirport(c.departure_airport.clone()));
                }
                (_, None) => {
                    return Err(Violation::UnknownAirport(c.destination_airport.clone()));
                }
                (Some(origin), Some(destination)) if origin == destination => {
                    return Err(Violation::SameAirport(origin));
                }
                _ => {}
            },
        }

        Ok(())
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule {} ({})", self.number(), self.description())
    }
}

/// Why a candidate failed a rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("Passenger counts cannot be negative (children: {children}, infants: {infants})")]
    NegativeCount { children: i32, infants: i32 },

    #[error("Total passengers must be between 1 and 9, got {total}")]
    PassengerTotal { total: i64 },

    #[error("Children cannot be seated in emergency rows")]
    ChildInEmergencyRow,

    #[error("Children cannot be seated in first class")]
    ChildInFirstClass,

    #[error("Infants cannot be seated in emergency rows")]
    InfantInEmergencyRow,

    #[error("Infants cannot be seated in business class")]
    InfantInBusinessClass,

    #[error("Children must travel with at least one adult")]
    ChildrenWithoutAdult,

    #[error("{children} children exceed 2 per adult for {adults} adult(s)")]
    TooManyChildren { children: i32, adults: i32 },

    #[error("Infants must travel with at least one adult")]
    InfantsWithoutAdult,

    #[error("{infants} infants exceed 1 per adult for {adults} adult(s)")]
    TooManyInfants { infants: i32, adults: i32 },

    #[error("Departure {departure} is before today ({today})")]
    DepartureInPast { departure: CalendarDate, today: NaiveDate },

    #[error("Departure date {text:?} is invalid: {source}")]
    InvalidDepartureDate { text: String, source: ParseError },

    #[error("Return date {text:?} is invalid: {source}")]
    InvalidReturnDate { text: String, source: ParseError },

    #[error("Return {return_on} is before departure {departure}")]
    ReturnBeforeDeparture {
        departure: CalendarDate,
        return_on: CalendarDate,
    },

    #[error("Unknown seating class: {0:?}")]
    UnknownSeatingClass(String),

    #[error("Emergency row seating is only available in economy, not {0:?}")]
    EmergencyRowOutsideEconomy(String),

    #[error("Airport {0:?} is not served")]
    UnknownAirport(String),

    #[error("Departure and destination are both {0}")]
    SameAirport(AirportCode),
}

impl Violation {
    pub fn rule(&self) -> Rule {
        match self {
            Violation::NegativeCount { .. } | Violation::PassengerTotal { .. } => {
                Rule::PassengerTotal
            }
            Violation::ChildInEmergencyRow | Violation::ChildInFirstClass => Rule::ChildSeating,
            Violation::InfantInEmergencyRow | Violation::InfantInBusinessClass => {
                Rule::InfantSeating
            }
            Violation::ChildrenWithoutAdult | Violation::TooManyChildren { .. } => Rule::ChildRatio,
            Violation::InfantsWithoutAdult | Violation::TooManyInfants { .. } => Rule::InfantRatio,
            Violation::DepartureInPast { .. } => Rule::DepartureNotPast,
            Violation::InvalidDepartureDate { .. } | Violation::InvalidReturnDate { .. } => {
                Rule::StrictDates
            }
            Violation::ReturnBeforeDeparture { .. } => Rule::ReturnNotBeforeDeparture,
            Violation::UnknownSeatingClass(_) => Rule::SeatingClassKnown,
            Violation::EmergencyRowOutsideEconomy(_) => Rule::EmergencyRowEconomyOnly,
            Violation::UnknownAirport(_) | Violation::SameAirport(_) => Rule::AirportsValid,
        }
    }
}

/// Run every rule and collect all violations, in reference order.
pub fn evaluate(ctx: &RuleContext<'_>) -> Vec<Violation> {
    Rule::ALL
        .iter()
        .filter_map(|rule| rule.check(ctx).err())
        .collect()
}
