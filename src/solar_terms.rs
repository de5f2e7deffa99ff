// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! The twenty-four solar terms (节气) and their numerical search.
//!
//! A solar term is the instant the Sun's apparent longitude crosses a
//! multiple of 15°. Each term is bracketed by ±`half_window_days` around a
//! fixed calendar seed and refined by bisection on the wrapped difference
//! `λ(t) − θ ∈ (−180, 180]`, which keeps the 345° → 0° seam continuous.
//!
//! A [`YearTerms`] table covers one solar year: it opens at Start of Spring
//! (立春, 315°) and closes with Greater Cold (大寒, 300°) the following
//! January. The three terms at or past 270° are searched with both the
//! year's and the next year's seed and the one inside the window is kept.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use qtty::Days;
use tracing::{instrument, trace};

use crate::config::SearchSettings;
use crate::ephemeris::{normalize_pm180, solar_longitude, Ephemeris};
use crate::epoch::{Epoch, TT};
use crate::error::{ChartError, ConvergenceError, InputError, LookupError, SymbolError};
use crate::ganzhi::Branch;
use crate::solar_time::StandardMeridian;

/// Length of the window a solar year's terms must fall in, from Start of Spring.
const SOLAR_YEAR_WINDOW: Days = Days::new(366.0);

/// One of the 24 solar terms, in calendar order from Start of Spring.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SolarTerm {
    LiChun,
    YuShui,
    JingZhe,
    ChunFen,
    QingMing,
    GuYu,
    LiXia,
    XiaoMan,
    MangZhong,
    XiaZhi,
    XiaoShu,
    DaShu,
    LiQiu,
    ChuShu,
    BaiLu,
    QiuFen,
    HanLu,
    ShuangJiang,
    LiDong,
    XiaoXue,
    DaXue,
    DongZhi,
    XiaoHan,
    DaHan,
}

impl SolarTerm {
    pub const ALL: [SolarTerm; 24] = [
        SolarTerm::LiChun,
        SolarTerm::YuShui,
        SolarTerm::JingZhe,
        SolarTerm::ChunFen,
        SolarTerm::QingMing,
        SolarTerm::GuYu,
        SolarTerm::LiXia,
        SolarTerm::XiaoMan,
        SolarTerm::MangZhong,
        SolarTerm::XiaZhi,
        SolarTerm::XiaoShu,
        SolarTerm::DaShu,
        SolarTerm::LiQiu,
        SolarTerm::ChuShu,
        SolarTerm::BaiLu,
        SolarTerm::QiuFen,
        SolarTerm::HanLu,
        SolarTerm::ShuangJiang,
        SolarTerm::LiDong,
        SolarTerm::XiaoXue,
        SolarTerm::DaXue,
        SolarTerm::DongZhi,
        SolarTerm::XiaoHan,
        SolarTerm::DaHan,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            SolarTerm::LiChun => "立春",
            SolarTerm::YuShui => "雨水",
            SolarTerm::JingZhe => "惊蛰",
            SolarTerm::ChunFen => "春分",
            SolarTerm::QingMing => "清明",
            SolarTerm::GuYu => "谷雨",
            SolarTerm::LiXia => "立夏",
            SolarTerm::XiaoMan => "小满",
            SolarTerm::MangZhong => "芒种",
            SolarTerm::XiaZhi => "夏至",
            SolarTerm::XiaoShu => "小暑",
            SolarTerm::DaShu => "大暑",
            SolarTerm::LiQiu => "立秋",
            SolarTerm::ChuShu => "处暑",
            SolarTerm::BaiLu => "白露",
            SolarTerm::QiuFen => "秋分",
            SolarTerm::HanLu => "寒露",
            SolarTerm::ShuangJiang => "霜降",
            SolarTerm::LiDong => "立冬",
            SolarTerm::XiaoXue => "小雪",
            SolarTerm::DaXue => "大雪",
            SolarTerm::DongZhi => "冬至",
            SolarTerm::XiaoHan => "小寒",
            SolarTerm::DaHan => "大寒",
        }
    }

    /// Target apparent longitude in degrees: 315 for 立春, stepping by 15.
    #[inline]
    pub const fn longitude_deg(self) -> u16 {
        (315 + 15 * self as u16) % 360
    }

    /// Jie (节) terms open a month; Qi (气) terms fall mid-month.
    #[inline]
    pub const fn is_jie(self) -> bool {
        (self as u8) % 2 == 0
    }

    /// Branch of the month a Jie term opens; `None` for Qi terms.
    pub const fn month_branch(self) -> Option<Branch> {
        match self {
            SolarTerm::LiChun => Some(Branch::Yin),
            SolarTerm::JingZhe => Some(Branch::Mao),
            SolarTerm::QingMing => Some(Branch::Chen),
            SolarTerm::LiXia => Some(Branch::Si),
            SolarTerm::MangZhong => Some(Branch::Wu),
            SolarTerm::XiaoShu => Some(Branch::Wei),
            SolarTerm::LiQiu => Some(Branch::Shen),
            SolarTerm::BaiLu => Some(Branch::You),
            SolarTerm::HanLu => Some(Branch::Xu),
            SolarTerm::LiDong => Some(Branch::Hai),
            SolarTerm::DaXue => Some(Branch::Zi),
            SolarTerm::XiaoHan => Some(Branch::Chou),
            _ => None,
        }
    }

    /// Typical civil (month, day) of the term, used to seed the search.
    const fn seed_month_day(self) -> (u32, u32) {
        match self {
            SolarTerm::LiChun => (2, 4),
            SolarTerm::YuShui => (2, 19),
            SolarTerm::JingZhe => (3, 6),
            SolarTerm::ChunFen => (3, 21),
            SolarTerm::QingMing => (4, 5),
            SolarTerm::GuYu => (4, 20),
            SolarTerm::LiXia => (5, 6),
            SolarTerm::XiaoMan => (5, 21),
            SolarTerm::MangZhong => (6, 6),
            SolarTerm::XiaZhi => (6, 21),
            SolarTerm::XiaoShu => (7, 7),
            SolarTerm::DaShu => (7, 23),
            SolarTerm::LiQiu => (8, 8),
            SolarTerm::ChuShu => (8, 23),
            SolarTerm::BaiLu => (9, 8),
            SolarTerm::QiuFen => (9, 23),
            SolarTerm::HanLu => (10, 8),
            SolarTerm::ShuangJiang => (10, 23),
            SolarTerm::LiDong => (11, 7),
            SolarTerm::XiaoXue => (11, 22),
            SolarTerm::DaXue => (12, 7),
            SolarTerm::DongZhi => (12, 22),
            SolarTerm::XiaoHan => (1, 6),
            SolarTerm::DaHan => (1, 20),
        }
    }
}

impl fmt::Display for SolarTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SolarTerm {
    type Err = SymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SolarTerm::ALL
            .into_iter()
            .find(|term| term.name() == s)
            .ok_or_else(|| SymbolError::new("solar term", s))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for SolarTerm {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for SolarTerm {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A located solar term.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SolarTermEvent {
    term: SolarTerm,
    jd: Epoch<TT>,
    utc: DateTime<Utc>,
    civil: NaiveDateTime,
}

impl SolarTermEvent {
    #[inline]
    pub fn term(&self) -> SolarTerm {
        self.term
    }

    #[inline]
    pub fn longitude_deg(&self) -> u16 {
        self.term.longitude_deg()
    }

    /// Exact instant on the TT axis.
    #[inline]
    pub fn jd(&self) -> Epoch<TT> {
        self.jd
    }

    #[inline]
    pub fn utc(&self) -> DateTime<Utc> {
        self.utc
    }

    /// Wall-clock time at the standard meridian the table was built for.
    #[inline]
    pub fn civil(&self) -> NaiveDateTime {
        self.civil
    }
}

/// The 24 solar terms of one solar year, from 立春 to the following 大寒.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct YearTerms {
    year: i32,
    events: Vec<SolarTermEvent>,
}

impl YearTerms {
    #[inline]
    pub fn year(&self) -> i32 {
        self.year
    }

    /// All 24 events in time order.
    #[inline]
    pub fn events(&self) -> &[SolarTermEvent] {
        &self.events
    }

    /// The Start of Spring event that opens the year.
    #[inline]
    pub fn start_of_spring(&self) -> &SolarTermEvent {
        &self.events[0]
    }

    pub fn get(&self, term: SolarTerm) -> Option<&SolarTermEvent> {
        self.events.iter().find(|e| e.term == term)
    }

    /// The 12 month-opening terms in time order.
    pub fn jie(&self) -> impl DoubleEndedIterator<Item = &SolarTermEvent> + '_ {
        self.events.iter().filter(|e| e.term.is_jie())
    }
}

/// Anything that can hand out a year's solar-term table.
pub trait TermSource {
    fn year_terms(&self, year: i32) -> Result<Arc<YearTerms>, ChartError>;
}

impl<T: TermSource + ?Sized> TermSource for &T {
    fn year_terms(&self, year: i32) -> Result<Arc<YearTerms>, ChartError> {
        (**self).year_terms(year)
    }
}

/// Bisection search for solar-term instants.
#[derive(Debug, Clone)]
pub struct SolarTermLocator<E> {
    ephemeris: E,
    search: SearchSettings,
    meridian: StandardMeridian,
}

impl<E: Ephemeris> SolarTermLocator<E> {
    pub fn new(ephemeris: E, search: SearchSettings, meridian: StandardMeridian) -> Self {
        Self {
            ephemeris,
            search,
            meridian,
        }
    }

    pub fn ephemeris(&self) -> &E {
        &self.ephemeris
    }

    pub fn meridian(&self) -> StandardMeridian {
        self.meridian
    }

    /// Locate `term` around its seed date in `seed_year`.
    pub fn locate(&self, term: SolarTerm, seed_year: i32) -> Result<SolarTermEvent, ChartError> {
        let (month, day) = term.seed_month_day();
        let seed_utc = NaiveDate::from_ymd_opt(seed_year, month, day)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .map(|noon| noon.and_utc())
            .ok_or(InputError::InvalidDate {
                year: seed_year,
                month,
                day,
            })?;

        let seed = Epoch::<TT>::from_utc(seed_utc);
        let half = Days::new(self.search.half_window_days);
        let target = f64::from(term.longitude_deg());
        let (mut lo, mut hi) = (seed - half, seed + half);
        let mut residual = f64::NAN;

        for iteration in 1..=self.search.max_iterations {
            let mid = lo.mean(hi);
            residual = normalize_pm180(solar_longitude(&self.ephemeris, mid) - target);
            if residual.abs() < self.search.tolerance_deg {
                trace!(%term, seed_year, iteration, residual, "solar term converged");
                return self.event(term, mid, seed_year);
            }
            if residual > 0.0 {
                hi = mid;
            } else {
                lo = mid;
            }
        }

        Err(ConvergenceError {
            term,
            year: seed_year,
            iterations: self.search.max_iterations,
            residual_deg: residual,
        }
        .into())
    }

    /// Build the full 24-term table of the solar year opened by `year`'s 立春.
    #[instrument(level = "debug", skip(self))]
    pub fn compute_year(&self, year: i32) -> Result<YearTerms, ChartError> {
        let start = self.locate(SolarTerm::LiChun, year)?;
        let end = start.jd + SOLAR_YEAR_WINDOW;

        let mut events = Vec::with_capacity(SolarTerm::ALL.len());
        events.push(start);
        for term in SolarTerm::ALL.into_iter().skip(1) {
            let event = if term.longitude_deg() >= 270 {
                self.locate_within(term, year, start.jd, end)?
            } else {
                self.locate(term, year)?
            };
            events.push(event);
        }
        events.sort_by(|a, b| a.jd.value().total_cmp(&b.jd.value()));

        Ok(YearTerms { year, events })
    }

    /// Try `year` and `year + 1` seeds; keep the instant inside `[start, end)`.
    fn locate_within(
        &self,
        term: SolarTerm,
        year: i32,
        start: Epoch<TT>,
        end: Epoch<TT>,
    ) -> Result<SolarTermEvent, ChartError> {
        for seed_year in [year, year + 1] {
            let event = self.locate(term, seed_year)?;
            if event.jd >= start && event.jd < end {
                return Ok(event);
            }
        }
        Err(LookupError::TermOutsideYear { term, year }.into())
    }

    fn event(
        &self,
        term: SolarTerm,
        jd: Epoch<TT>,
        seed_year: i32,
    ) -> Result<SolarTermEvent, ChartError> {
        let utc = jd.to_utc().ok_or(LookupError::OutOfCalendarRange {
            term,
            year: seed_year,
        })?;
        Ok(SolarTermEvent {
            term,
            jd,
            utc,
            civil: self.meridian.civil_from_utc(utc),
        })
    }
}

impl<E: Ephemeris> TermSource for SolarTermLocator<E> {
    fn year_terms(&self, year: i32) -> Result<Arc<YearTerms>, ChartError> {
        self.compute_year(year).map(Arc::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::{LowPrecisionSun, Vsop87Sun};
    use chrono::{Datelike, Duration, NaiveDate};

    fn locator() -> SolarTermLocator<Vsop87Sun> {
        SolarTermLocator::new(Vsop87Sun, SearchSettings::default(), StandardMeridian::BEIJING)
    }

    fn civil(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    fn assert_near(actual: NaiveDateTime, expected: NaiveDateTime, seconds: i64) {
        let diff = (actual - expected).num_seconds().abs();
        assert!(diff <= seconds, "{actual} is {diff} s from {expected}");
    }

    #[test]
    fn term_longitudes_ramp_from_315() {
        assert_eq!(SolarTerm::LiChun.longitude_deg(), 315);
        assert_eq!(SolarTerm::JingZhe.longitude_deg(), 345);
        assert_eq!(SolarTerm::ChunFen.longitude_deg(), 0);
        assert_eq!(SolarTerm::DongZhi.longitude_deg(), 270);
        assert_eq!(SolarTerm::DaHan.longitude_deg(), 300);
    }

    #[test]
    fn jie_terms_are_odd_multiples_of_fifteen() {
        for term in SolarTerm::ALL {
            assert_eq!(term.is_jie(), (term.longitude_deg() / 15) % 2 == 1, "{term}");
            assert_eq!(term.is_jie(), term.month_branch().is_some(), "{term}");
        }
        assert_eq!(SolarTerm::ALL.iter().filter(|t| t.is_jie()).count(), 12);
    }

    #[test]
    fn parse_term_names() {
        assert_eq!("立春".parse::<SolarTerm>(), Ok(SolarTerm::LiChun));
        assert_eq!("冬至".parse::<SolarTerm>(), Ok(SolarTerm::DongZhi));
        assert!("立冬至".parse::<SolarTerm>().is_err());
    }

    #[test]
    fn locates_start_of_spring_2024() {
        // Published: 2024-02-04 16:26:53 Beijing time.
        let event = locator().locate(SolarTerm::LiChun, 2024).unwrap();
        assert_near(event.civil(), civil(2024, 2, 4, 16, 26, 53), 60);
        let lon = solar_longitude(&Vsop87Sun, event.jd());
        assert!(normalize_pm180(lon - 315.0).abs() < 1e-4);
    }

    #[test]
    fn locates_march_equinox_across_the_seam() {
        // Published: 2024-03-20 11:06:21 Beijing time; target is 0°.
        let event = locator().locate(SolarTerm::ChunFen, 2024).unwrap();
        assert_near(event.civil(), civil(2024, 3, 20, 11, 6, 21), 60);
    }

    #[test]
    fn year_table_is_ordered_and_ramps() {
        let terms = locator().compute_year(2023).unwrap();
        let events = terms.events();
        assert_eq!(events.len(), 24);
        assert_eq!(terms.start_of_spring().term(), SolarTerm::LiChun);
        for pair in events.windows(2) {
            assert!(pair[0].jd() < pair[1].jd());
            let step = (pair[1].longitude_deg() + 360 - pair[0].longitude_deg()) % 360;
            assert_eq!(step, 15);
        }
        // Winter solstice stays in December, Minor and Greater Cold move to January.
        assert_eq!(terms.get(SolarTerm::DongZhi).unwrap().civil().date().year(), 2023);
        assert_eq!(terms.get(SolarTerm::XiaoHan).unwrap().civil().date().year(), 2024);
        assert_eq!(terms.get(SolarTerm::DaHan).unwrap().civil().date().year(), 2024);
    }

    #[test]
    fn unwrapped_longitude_strictly_increases() {
        let terms = locator().compute_year(1999).unwrap();
        let mut unwrapped = Vec::new();
        let mut turns = 0.0;
        let mut last = -1.0;
        for e in terms.events() {
            let lon = f64::from(e.longitude_deg());
            if lon < last {
                turns += 360.0;
            }
            last = lon;
            unwrapped.push(lon + turns);
        }
        assert!(unwrapped.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn year_table_spans_less_than_a_year() {
        let terms = locator().compute_year(2000).unwrap();
        let first = terms.events().first().unwrap().civil();
        let last = terms.events().last().unwrap().civil();
        assert!(last - first < Duration::days(366));
        assert!(last - first > Duration::days(340));
    }

    #[test]
    fn low_precision_sun_stays_within_minutes() {
        let coarse = SolarTermLocator::new(
            LowPrecisionSun,
            SearchSettings::default(),
            StandardMeridian::BEIJING,
        );
        let event = coarse.locate(SolarTerm::LiChun, 2024).unwrap();
        assert_near(event.civil(), civil(2024, 2, 4, 16, 26, 53), 10 * 60);
    }

    /// The real Sun replayed 6% slower, starting from 2024's 立春.
    struct SlowSun {
        anchor: f64,
    }

    impl Ephemeris for SlowSun {
        fn apparent_longitude_deg(&self, jd: Epoch<TT>) -> f64 {
            let stretched = self.anchor + (jd.value() - self.anchor) * 0.94;
            Vsop87Sun.apparent_longitude_deg(Epoch::new(stretched))
        }
    }

    #[test]
    fn late_term_past_the_window_is_a_lookup_error() {
        let anchor = locator().locate(SolarTerm::LiChun, 2024).unwrap().jd().value();
        let search = SearchSettings {
            half_window_days: 30.0,
            ..SearchSettings::default()
        };
        let slow = SolarTermLocator::new(SlowSun { anchor }, search, StandardMeridian::BEIJING);

        // 大寒 lands about 373 days after 立春, past the 366-day window.
        assert_eq!(
            slow.compute_year(2024),
            Err(ChartError::Lookup(LookupError::TermOutsideYear {
                term: SolarTerm::DaHan,
                year: 2024,
            }))
        );
        let late = slow.locate(SolarTerm::DaHan, 2025).unwrap();
        assert!(late.jd().value() - anchor > 366.0);
    }

    #[test]
    fn instant_past_the_calendar_is_a_lookup_error() {
        // chrono stops at +262142-12-31; a root two weeks after the seed
        // date of 冬至 in that year has no UTC timestamp.
        let seed = Epoch::<TT>::from_utc(
            NaiveDate::from_ymd_opt(262_142, 12, 22)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap()
                .and_utc(),
        );
        struct Linear(f64);
        impl Ephemeris for Linear {
            fn apparent_longitude_deg(&self, jd: Epoch<TT>) -> f64 {
                270.0 + (jd.value() - self.0)
            }
        }
        let loc = SolarTermLocator::new(
            Linear(seed.value() + 14.0),
            SearchSettings::default(),
            StandardMeridian::BEIJING,
        );
        assert_eq!(
            loc.locate(SolarTerm::DongZhi, 262_142),
            Err(ChartError::Lookup(LookupError::OutOfCalendarRange {
                term: SolarTerm::DongZhi,
                year: 262_142,
            }))
        );
    }

    #[test]
    fn exhausted_budget_is_a_convergence_error() {
        let search = SearchSettings {
            max_iterations: 3,
            ..SearchSettings::default()
        };
        let loc = SolarTermLocator::new(LowPrecisionSun, search, StandardMeridian::BEIJING);
        match loc.locate(SolarTerm::XiaZhi, 2010) {
            Err(ChartError::Convergence(err)) => {
                assert_eq!(err.term, SolarTerm::XiaZhi);
                assert_eq!(err.iterations, 3);
                assert!(err.residual_deg.abs() >= 1e-4);
            }
            other => panic!("expected convergence error, got {other:?}"),
        }
    }

    #[test]
    fn unbracketed_root_never_yields_a_guess() {
        struct Frozen;
        impl Ephemeris for Frozen {
            fn apparent_longitude_deg(&self, _jd: Epoch<TT>) -> f64 {
                100.0
            }
        }
        let loc = SolarTermLocator::new(Frozen, SearchSettings::default(), StandardMeridian::BEIJING);
        assert!(matches!(
            loc.locate(SolarTerm::LiChun, 2000),
            Err(ChartError::Convergence(_))
        ));
    }
}
