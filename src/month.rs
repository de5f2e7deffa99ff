// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Solar months.
//!
//! A solar month runs from one Jie term to the next; its branch is fixed by
//! the opening Jie (立春 opens 寅, 惊蛰 opens 卯, … 小寒 opens 丑). Instants
//! are compared as civil wall-clock readings at the table's standard
//! meridian.

use std::sync::Arc;

use chrono::{Datelike, NaiveDateTime};

use crate::error::{ChartError, LookupError};
use crate::ganzhi::Branch;
use crate::solar_terms::{SolarTermEvent, TermSource, YearTerms};

/// The solar month containing an instant.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MonthSpan {
    branch: Branch,
    opened_by: SolarTermEvent,
}

impl MonthSpan {
    #[inline]
    pub fn branch(&self) -> Branch {
        self.branch
    }

    /// The Jie event the month starts at.
    #[inline]
    pub fn opened_by(&self) -> &SolarTermEvent {
        &self.opened_by
    }
}

/// The table of the solar year containing `instant`: the calendar year's,
/// or the previous one's when `instant` precedes its Start of Spring.
pub(crate) fn solar_year_terms<T: TermSource + ?Sized>(
    source: &T,
    instant: NaiveDateTime,
) -> Result<Arc<YearTerms>, ChartError> {
    let year = instant.year();
    let terms = source.year_terms(year)?;
    if instant < terms.start_of_spring().civil() {
        source.year_terms(year - 1)
    } else {
        Ok(terms)
    }
}

/// Latest Jie in `terms` at or before `instant`.
pub(crate) fn latest_jie(terms: &YearTerms, instant: NaiveDateTime) -> Option<&SolarTermEvent> {
    terms.jie().rev().find(|e| e.civil() <= instant)
}

/// Month of an instant already placed in its solar year.
pub(crate) fn month_in(terms: &YearTerms, instant: NaiveDateTime) -> Result<MonthSpan, ChartError> {
    let jie = latest_jie(terms, instant).ok_or(LookupError::NoJie { instant })?;
    let branch = jie
        .term()
        .month_branch()
        .ok_or(LookupError::NoJie { instant })?;
    Ok(MonthSpan {
        branch,
        opened_by: *jie,
    })
}

/// Solar month containing `instant`.
pub fn resolve_month<T: TermSource + ?Sized>(
    source: &T,
    instant: NaiveDateTime,
) -> Result<MonthSpan, ChartError> {
    let terms = solar_year_terms(source, instant)?;
    month_in(&terms, instant)
}

/// Latest Jie at or before `instant`.
pub fn previous_jie<T: TermSource + ?Sized>(
    source: &T,
    instant: NaiveDateTime,
) -> Result<SolarTermEvent, ChartError> {
    resolve_month(source, instant).map(|span| span.opened_by)
}

/// Earliest Jie strictly after `instant`.
pub fn next_jie<T: TermSource + ?Sized>(
    source: &T,
    instant: NaiveDateTime,
) -> Result<SolarTermEvent, ChartError> {
    let terms = solar_year_terms(source, instant)?;
    if let Some(event) = terms.jie().find(|e| e.civil() > instant) {
        return Ok(*event);
    }
    let following = source.year_terms(terms.year() + 1)?;
    let next = following
        .jie()
        .find(|e| e.civil() > instant)
        .copied()
        .ok_or_else(|| LookupError::NoJie { instant }.into());
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchSettings;
    use crate::ephemeris::Vsop87Sun;
    use crate::solar_terms::{SolarTerm, SolarTermLocator};
    use crate::solar_time::StandardMeridian;
    use chrono::{Duration, NaiveDate};

    fn locator() -> SolarTermLocator<Vsop87Sun> {
        SolarTermLocator::new(Vsop87Sun, SearchSettings::default(), StandardMeridian::BEIJING)
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn minute_before_start_of_spring_is_previous_chou_month() {
        let loc = locator();
        let lichun = loc.locate(SolarTerm::LiChun, 2024).unwrap().civil();
        let span = resolve_month(&loc, lichun - Duration::minutes(1)).unwrap();
        assert_eq!(span.branch(), Branch::Chou);
        assert_eq!(span.opened_by().term(), SolarTerm::XiaoHan);
        assert_eq!(span.opened_by().civil().year(), 2024);

        let span = resolve_month(&loc, lichun).unwrap();
        assert_eq!(span.branch(), Branch::Yin);
    }

    #[test]
    fn months_through_a_year() {
        let loc = locator();
        let cases = [
            (at(2023, 3, 1, 12), Branch::Yin),
            (at(2023, 3, 10, 12), Branch::Mao),
            (at(2023, 6, 21, 12), Branch::Wu),
            (at(2023, 10, 1, 12), Branch::You),
            (at(2023, 12, 25, 12), Branch::Zi),
            (at(2024, 1, 15, 12), Branch::Chou),
        ];
        for (instant, branch) in cases {
            assert_eq!(resolve_month(&loc, instant).unwrap().branch(), branch, "{instant}");
        }
    }

    #[test]
    fn neighbouring_jie_bracket_the_instant() {
        let loc = locator();
        let instant = at(2023, 12, 30, 0);
        let prev = previous_jie(&loc, instant).unwrap();
        let next = next_jie(&loc, instant).unwrap();
        assert_eq!(prev.term(), SolarTerm::DaXue);
        assert_eq!(next.term(), SolarTerm::XiaoHan);
        assert!(prev.civil() <= instant && instant < next.civil());
    }

    #[test]
    fn next_jie_crosses_into_the_following_solar_year() {
        let loc = locator();
        // After 小寒 2024, the next Jie is 立春 2024.
        let next = next_jie(&loc, at(2024, 1, 20, 0)).unwrap();
        assert_eq!(next.term(), SolarTerm::LiChun);
        assert_eq!(next.civil().year(), 2024);
        // The last Jie of a solar year rolls into the next table.
        let next = next_jie(&loc, at(2025, 1, 25, 0)).unwrap();
        assert_eq!(next.term(), SolarTerm::LiChun);
        assert_eq!(next.civil().year(), 2025);
    }

    struct Stuck(Arc<YearTerms>);

    impl TermSource for Stuck {
        fn year_terms(&self, _year: i32) -> Result<Arc<YearTerms>, ChartError> {
            Ok(Arc::clone(&self.0))
        }
    }

    #[test]
    fn no_jie_before_instant_is_a_lookup_error() {
        let source = Stuck(Arc::new(locator().compute_year(2030).unwrap()));
        let instant = at(2024, 6, 1, 0);
        assert_eq!(
            resolve_month(&source, instant),
            Err(ChartError::Lookup(LookupError::NoJie { instant }))
        );
    }
}
