use chrono::{DateTime, FixedOffset, Local, NaiveDate, Offset, Utc};
use std::sync::Arc;

/// Source of "today" for date-sensitive rules.
///
/// Injected into the validator so that nothing reads wall-clock time
/// through a hidden global; tests pin it with [`FixedClock`].
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall clock in the process's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Wall clock observed at a fixed UTC offset, independent of the host zone.
#[derive(Debug, Clone, Copy)]
pub struct OffsetClock {
    offset: FixedOffset,
}

impl OffsetClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }
}

impl Clock for OffsetClock {
    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.offset).date_naive()
    }
}

/// A clock that always reports the same day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    today: NaiveDate,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    /// Pin the clock to the calendar day `instant` falls on at `offset`.
    pub fn at_instant(instant: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self::new(instant.with_timezone(&offset).date_naive())
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }
}

/// Adapter for closures; see [`from_fn`].
pub struct FnClock<F>(F);

impl<F> Clock for FnClock<F>
where
    F: Fn() -> NaiveDate + Send + Sync,
{
    fn today(&self) -> NaiveDate {
        (self.0)()
    }
}

pub fn from_fn<F>(f: F) -> FnClock<F>
where
    F: Fn() -> NaiveDate + Send + Sync,
{
    FnClock(f)
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}
