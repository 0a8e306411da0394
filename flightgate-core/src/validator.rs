use chrono::NaiveDate;

use crate::booking::{BookingCandidate, BookingState};
use crate::clock::{Clock, SystemClock};
use crate::rules::{self, Rule, RuleContext, Violation};

/// A candidate that failed at least one rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Booking rejected with {} violation(s)", .violations.len())]
pub struct Rejection {
    violations: Vec<Violation>,
}

impl Rejection {
    fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// Every violation found, in rule order.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// The violation a short-circuiting check would have stopped on.
    pub fn first(&self) -> Option<&Violation> {
        self.violations.first()
    }

    pub fn violates(&self, rule: Rule) -> bool {
        self.violations.iter().any(|v| v.rule() == rule)
    }

    pub fn rules(&self) -> Vec<Rule> {
        let mut rules: Vec<Rule> = self.violations.iter().map(Violation::rule).collect();
        rules.dedup();
        rules
    }
}

/// Result of [`BookingValidator::submit`].
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted,
    Rejected(Rejection),
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted)
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            SubmitOutcome::Accepted => None,
            SubmitOutcome::Rejected(rejection) => Some(rejection),
        }
    }

    pub fn into_result(self) -> Result<(), Rejection> {
        match self {
            SubmitOutcome::Accepted => Ok(()),
            SubmitOutcome::Rejected(rejection) => Err(rejection),
        }
    }
}

/// Gatekeeper for the current booking.
///
/// Holds at most one [`BookingState`]. A submission replaces it only when
/// every rule passes; a rejected submission leaves it untouched. Not
/// internally synchronized: concurrent callers must serialize access.
pub struct BookingValidator<C = SystemClock> {
    clock: C,
    state: Option<BookingState>,
}

impl<C: Clock> BookingValidator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock, state: None }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// The last accepted booking, if any submission has succeeded yet.
    pub fn current(&self) -> Option<&BookingState> {
        self.state.as_ref()
    }

    /// Check a candidate against today's date without committing it.
    pub fn validate(&self, candidate: &BookingCandidate) -> Result<BookingState, Rejection> {
        validate_on(candidate, self.clock.today())
    }

    /// Validate `candidate` and, if it passes every rule, make it the current booking.
    pub fn submit(&mut self, candidate: &BookingCandidate) -> SubmitOutcome {
        match self.validate(candidate) {
            Ok(state) => {
                tracing::info!(
                    departure = %state.departure(),
                    origin = %state.origin(),
                    destination = %state.destination(),
                    "Booking accepted"
                );
                // Single assignment: the old state is replaced whole or not at all.
                self.state = Some(state);
                SubmitOutcome::Accepted
            }
            Err(rejection) => {
                tracing::warn!(
                    violations = rejection.violations().len(),
                    "Booking rejected, keeping current state"
                );
                SubmitOutcome::Rejected(rejection)
            }
        }
    }
}

impl Default for BookingValidator<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

/// Evaluate all rules for `candidate` as of `today`.
pub fn validate_on(
    candidate: &BookingCandidate,
    today: NaiveDate,
) -> Result<BookingState, Rejection> {
    let ctx = RuleContext::new(candidate, today);
    let violations = rules::evaluate(&ctx);

    for violation in &violations {
        tracing::debug!(rule = violation.rule().number(), "{}", violation);
    }

    let typed = match (ctx.departure, ctx.return_on, ctx.origin, ctx.destination, ctx.class) {
        (Ok(departure), Ok(return_on), Some(origin), Some(destination), Some(class)) => {
            Some((departure, return_on, origin, destination, class))
        }
        _ => None,
    };

    match typed {
        Some((departure, return_on, origin, destination, class)) if violations.is_empty() => {
            Ok(BookingState::new(
                candidate.clone(),
                departure,
                return_on,
                origin,
                destination,
                class,
            ))
        }
        _ => Err(Rejection::new(violations)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::{AirportCode, SeatingClass};
    use crate::clock::{self, FixedClock};
    use chrono::{DateTime, FixedOffset, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    // "Today" is 13/10/2025 throughout, matching the Melbourne booking window.
    fn validator() -> BookingValidator<FixedClock> {
        let instant = "2025-10-12T14:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let melbourne = FixedOffset::east_opt(11 * 3600).unwrap();
        BookingValidator::new(FixedClock::at_instant(instant, melbourne))
    }

    #[allow(clippy::too_many_arguments)]
    fn candidate(
        dep: &str,
        from: &str,
        emergency: bool,
        ret: &str,
        to: &str,
        class: &str,
        adults: i32,
        children: i32,
        infants: i32,
    ) -> BookingCandidate {
        BookingCandidate::new(dep, from, emergency, ret, to, class, adults, children, infants)
    }

    fn reference() -> BookingCandidate {
        candidate("14/10/2025", "mel", false, "20/10/2025", "pvg", "economy", 1, 0, 0)
    }

    #[test]
    fn test_reference_scenario_commits() {
        let mut validator = validator();
        assert!(validator.current().is_none());

        assert!(validator.submit(&reference()).is_accepted());

        let state = validator.current().unwrap();
        assert_eq!(state.departure_date(), "14/10/2025");
        assert_eq!(state.candidate(), &reference());
        assert_eq!(state.origin(), AirportCode::Mel);
        assert_eq!(state.destination(), AirportCode::Pvg);
        assert_eq!(state.class(), SeatingClass::Economy);
    }

    #[test]
    fn test_rejection_keeps_previous_state() {
        let mut validator = validator();
        assert!(validator.submit(&reference()).is_accepted());
        let before = validator.current().cloned();

        let mut too_many = reference();
        too_many.adult_count = 9;
        too_many.child_count = 1;
        let outcome = validator.submit(&too_many);
        assert!(!outcome.is_accepted());
        assert!(outcome.rejection().unwrap().violates(Rule::PassengerTotal));
        assert_eq!(validator.current().cloned(), before);

        let mut past_and_empty = reference();
        past_and_empty.departure_date = "12/10/2025".to_string();
        past_and_empty.adult_count = 0;
        assert!(!validator.submit(&past_and_empty).is_accepted());
        assert_eq!(validator.current().unwrap().departure_date(), "14/10/2025");
    }

    #[test]
    fn test_rejection_before_any_commit_leaves_no_state() {
        let mut validator = validator();
        let mut same_airport = reference();
        same_airport.destination_airport = "mel".to_string();
        let outcome = validator.submit(&same_airport);
        assert_eq!(
            outcome.into_result().unwrap_err().violations(),
            &[Violation::SameAirport(AirportCode::Mel)]
        );
        assert!(validator.current().is_none());
    }

    #[test]
    fn test_successive_commits_replace_whole_state() {
        let mut validator = validator();
        assert!(validator.submit(&reference()).is_accepted());

        let family = candidate(
            "16/10/2025",
            "syd",
            false,
            "16/10/2025",
            "lax",
            "premium-economy",
            2,
            2,
            1,
        );
        assert!(validator.submit(&family).is_accepted());

        let state = validator.current().unwrap();
        assert_eq!(state.candidate(), &family);
        assert_eq!(state.departure_airport(), "syd");
        assert_eq!(state.return_date(), "16/10/2025");
        assert_eq!(state.class(), SeatingClass::PremiumEconomy);
        assert_eq!(state.child_count(), 2);
        assert_eq!(state.infant_count(), 1);
    }

    #[test]
    fn test_boundaries_from_booking_rules() {
        let cases = [
            // dep, from, emergency, ret, to, class, adults, children, infants, expected
            ("14/10/2025", "mel", false, "20/10/2025", "pvg", "economy", 0, 0, 0, false),
            ("14/10/2025", "mel", false, "20/10/2025", "pvg", "economy", 5, 2, 2, true),
            ("14/10/2025", "mel", false, "20/10/2025", "pvg", "economy", 9, 1, 0, false),
            ("14/10/2025", "mel", true, "20/10/2025", "pvg", "economy", 1, 1, 0, false),
            ("14/10/2025", "mel", false, "20/10/2025", "pvg", "first", 1, 1, 0, false),
            ("14/10/2025", "mel", true, "20/10/2025", "pvg", "economy", 1, 0, 1, false),
            ("14/10/2025", "mel", false, "20/10/2025", "pvg", "business", 1, 0, 1, false),
            ("14/10/2025", "mel", false, "20/10/2025", "pvg", "economy", 1, 3, 0, false),
            ("14/10/2025", "mel", false, "20/10/2025", "pvg", "economy", 1, 2, 0, true),
            ("14/10/2025", "mel", false, "20/10/2025", "pvg", "economy", 1, 0, 2, false),
            ("14/10/2025", "mel", false, "20/10/2025", "pvg", "economy", 2, 0, 2, true),
            ("12/10/2025", "mel", false, "20/10/2025", "pvg", "economy", 1, 0, 0, false),
            ("13/10/2025", "mel", false, "20/10/2025", "pvg", "economy", 1, 0, 0, true),
            ("14/10/2025", "mel", false, "13/10/2025", "pvg", "economy", 1, 0, 0, false),
            ("14/10/2025", "mel", false, "14/10/2025", "pvg", "economy", 1, 0, 0, true),
            ("14/10/2025", "mel", false, "20/10/2025", "pvg", "ultra", 1, 0, 0, false),
            ("14/10/2025", "mel", false, "20/10/2025", "pvg", "premium economy", 1, 0, 0, true),
            ("14/10/2025", "mel", true, "20/10/2025", "pvg", "business", 1, 0, 0, false),
            ("14/10/2025", "mel", true, "20/10/2025", "pvg", "economy", 1, 0, 0, true),
            ("14/10/2025", "mel", false, "20/10/2025", "mel", "economy", 1, 0, 0, false),
            ("14/10/2025", "abc", false, "20/10/2025", "pvg", "economy", 1, 0, 0, false),
            ("14/10/2025", "mel", true, "20/10/2025", "pvg", "economy", 2, 2, 0, false),
            ("14/10/2025", "mel", false, "20/10/2025", "pvg", "economy", 2, 2, 0, true),
            ("14/10/2025", "mel", false, "16/10/2025", "pvg", "premium-economy", 1, 0, 0, true),
            ("14/10/2025", "mel", false, "18/10/2025", "pvg", "business", 2, 0, 0, true),
            ("14/10/2025", "mel", false, "18/10/2025", "pvg", "first", 1, 0, 0, true),
        ];

        for (dep, from, emg, ret, to, class, ad, ch, inf, expected) in cases {
            let mut validator = validator();
            let outcome = validator.submit(&candidate(dep, from, emg, ret, to, class, ad, ch, inf));
            assert_eq!(
                outcome.is_accepted(),
                expected,
                "{dep} {from}->{to} {class} emergency={emg} {ad}/{ch}/{inf}: {outcome:?}"
            );
            assert_eq!(validator.current().is_some(), expected);
        }
    }

    #[test]
    fn test_leap_day_departures() {
        let mut validator = BookingValidator::new(FixedClock::new(
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        ));

        let leap = candidate("29/02/2024", "mel", false, "05/03/2024", "pvg", "economy", 1, 0, 0);
        assert!(validator.submit(&leap).is_accepted());

        let mut not_leap = leap.clone();
        not_leap.departure_date = "29/02/2026".to_string();
        not_leap.return_date = "05/03/2026".to_string();
        let outcome = validator.submit(&not_leap);
        assert_eq!(outcome.rejection().unwrap().rules(), vec![Rule::StrictDates]);
        assert_eq!(validator.current().unwrap().departure_date(), "29/02/2024");
    }

    #[test]
    fn test_validate_does_not_commit() {
        let validator = validator();
        let state = validator.validate(&reference()).unwrap();
        assert_eq!(state.departure().to_string(), "14/10/2025");
        assert!(validator.current().is_none());
    }

    #[test]
    fn test_clock_read_once_per_submit() {
        let reads = Arc::new(AtomicUsize::new(0));
        let counter = reads.clone();
        let mut validator = BookingValidator::new(clock::from_fn(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            NaiveDate::from_ymd_opt(2025, 10, 13).unwrap()
        }));

        let _ = validator.submit(&reference());
        let _ = validator.submit(&candidate("bad", "mel", false, "bad", "pvg", "economy", 1, 0, 0));
        assert_eq!(reads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_first_violation_follows_rule_order() {
        let validator = validator();
        let rejection = validator
            .validate(&candidate("14/10/2025", "mel", true, "20/10/2025", "pvg", "first", 1, 1, 0))
            .unwrap_err();

        assert_eq!(rejection.first(), Some(&Violation::ChildInEmergencyRow));
        assert_eq!(
            rejection.rules(),
            vec![Rule::ChildSeating, Rule::EmergencyRowEconomyOnly]
        );
        assert_eq!(rejection.to_string(), "Booking rejected with 2 violation(s)");
    }
}
