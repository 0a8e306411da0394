use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Fixed textual layout accepted by [`parse`]: `DD/MM/YYYY`.
const LAYOUT_LEN: usize = 10;
const SEPARATOR_POSITIONS: [usize; 2] = [2, 5];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Date must be exactly 10 characters in DD/MM/YYYY form, got {0}")]
    Length(usize),

    #[error("Expected '/' at position {position}")]
    Separator { position: usize },

    #[error("Expected a digit at position {position}")]
    Digit { position: usize },

    #[error("Month {0} is outside 1-12")]
    Month(u32),

    #[error("Day {day} does not exist in {month:02}/{year:04}")]
    Day { day: u32, month: u32, year: i32 },
}

/// A calendar date that is known to exist in the proleptic Gregorian calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn is_leap_year(&self) -> bool {
        self.0.leap_year()
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl From<CalendarDate> for NaiveDate {
    fn from(date: CalendarDate) -> Self {
        date.0
    }
}

impl PartialEq<NaiveDate> for CalendarDate {
    fn eq(&self, other: &NaiveDate) -> bool {
        self.0 == *other
    }
}

impl PartialOrd<NaiveDate> for CalendarDate {
    fn partial_cmp(&self, other: &NaiveDate) -> Option<std::cmp::Ordering> {
        self.0.partial_cmp(other)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}/{:04}", self.day(), self.month(), self.year())
    }
}

impl FromStr for CalendarDate {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

impl Serialize for CalendarDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        parse(&text).map_err(serde::de::Error::custom)
    }
}

/// Parse a strict `DD/MM/YYYY` date.
///
/// Anything other than two-digit day, two-digit month and four-digit year
/// separated by `/` is rejected, as is any triple that is not a real date.
/// Out-of-range days are never rolled over into the next month.
pub fn parse(text: &str) -> Result<CalendarDate, ParseError> {
    let len = text.chars().count();
    if len != LAYOUT_LEN {
        return Err(ParseError::Length(len));
    }

    // Positions are in characters, so a non-ASCII digit is reported where it sits.
    for (position, c) in text.chars().enumerate() {
        if SEPARATOR_POSITIONS.contains(&position) {
            if c != '/' {
                return Err(ParseError::Separator { position });
            }
        } else if !c.is_ascii_digit() {
            return Err(ParseError::Digit { position });
        }
    }

    // All ten characters are ASCII from here on.
    let bytes = text.as_bytes();

    let day = digits(&bytes[0..2]);
    let month = digits(&bytes[3..5]);
    let year = digits(&bytes[6..10]) as i32;

    if !(1..=12).contains(&month) {
        return Err(ParseError::Month(month));
    }

    NaiveDate::from_ymd_opt(year, month, day)
        .map(CalendarDate)
        .ok_or(ParseError::Day { day, month, year })
}

// Caller guarantees every byte is an ASCII digit.
fn digits(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
}
