// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! # Four Pillars
//!
//! A chart is four stem–branch pairs read off one (corrected) instant:
//!
//! | Pillar | Boundary | Rule |
//! |--------|----------|------|
//! | Year   | 立春 | `(year − 4) mod 60`, using the previous year before 立春 |
//! | Month  | each Jie | branch from the Jie; stem by the Five Tigers rule |
//! | Day    | 23:00 | closed-form day count from 1900-01-01 = 甲戌 |
//! | Hour   | odd hours | branch from the two-hour slot; stem by the Five Rats rule |
//!
//! From 23:00 to 23:59 the Day Pillar already belongs to the next calendar
//! day, and the 子 hour stem follows that day.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use tracing::instrument;

use crate::error::{ChartError, SymbolError};
use crate::ganzhi::{Branch, GanZhi, Stem};
use crate::month::{month_in, solar_year_terms};
use crate::solar_terms::{SolarTermEvent, TermSource};
use crate::solar_time::Location;

/// Cycle position of 1900-01-01.
const ANCHOR_POSITION: i64 = 10;

/// Day number of 1900-01-01 under [`day_number`].
const ANCHOR_DAY_NUMBER: i64 = 693_901;

/// Cycle position of 丙寅, the Tiger month of 甲 and 己 years.
const BING_YIN: i64 = 2;

/// Day count on a March-based year: January and February are months 13
/// and 14 of the previous year, so the leap day closes each year.
fn day_number(date: NaiveDate) -> i64 {
    let (mut y, mut m) = (i64::from(date.year()), i64::from(date.month()));
    if m <= 2 {
        y -= 1;
        m += 12;
    }
    let century = y.div_euclid(100);
    let year_of_century = y.rem_euclid(100);
    36_524 * century + century.div_euclid(4) + 365 * year_of_century + year_of_century / 4
        + (153 * (m - 3) + 2) / 5
        + i64::from(date.day())
        - 1
}

/// Year Pillar of a solar year.
#[inline]
pub fn year_pillar(solar_year: i32) -> GanZhi {
    GanZhi::from_position(i64::from(solar_year) - 4)
}

/// Month Pillar from the year stem and the month branch.
///
/// 甲/己 years open on 丙寅, 乙/庚 on 戊寅, 丙/辛 on 庚寅, 丁/壬 on 壬寅,
/// 戊/癸 on 甲寅; later months step on one pair at a time.
pub fn month_pillar(year_stem: Stem, month: Branch) -> GanZhi {
    let tiger = BING_YIN + 12 * i64::from(year_stem.index() % 5);
    let months_after_tiger = (i64::from(month.index()) - i64::from(Branch::Yin.index())).rem_euclid(12);
    GanZhi::from_position(tiger + months_after_tiger)
}

/// Day Pillar of a calendar date.
#[inline]
pub fn day_pillar(date: NaiveDate) -> GanZhi {
    GanZhi::from_position(day_number(date) - ANCHOR_DAY_NUMBER + ANCHOR_POSITION)
}

/// Day Pillar of a wall-clock instant, moving to the next day from 23:00.
#[inline]
pub fn day_pillar_at(instant: NaiveDateTime) -> GanZhi {
    let day = day_pillar(instant.date());
    if instant.hour() == 23 {
        day.offset(1)
    } else {
        day
    }
}

/// Hour Pillar from the day stem and the clock hour (0–23).
///
/// `day_stem` is the stem of the day the hour belongs to, which for 23:00
/// is the following calendar day.
pub fn hour_pillar(day_stem: Stem, hour: u32) -> GanZhi {
    // 甲/己 days open on 甲子, 乙/庚 on 丙子, and so on.
    let rat = 12 * i64::from(day_stem.index() % 5);
    GanZhi::from_position(rat + i64::from(Branch::from_hour(hour).index()))
}

/// Which of the four positions a pillar occupies.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PillarKind {
    Year,
    Month,
    Day,
    Hour,
}

impl PillarKind {
    pub const fn name(self) -> &'static str {
        match self {
            PillarKind::Year => "年柱",
            PillarKind::Month => "月柱",
            PillarKind::Day => "日柱",
            PillarKind::Hour => "时柱",
        }
    }
}

/// A stem–branch pair in one of the four positions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Pillar {
    kind: PillarKind,
    ganzhi: GanZhi,
}

impl Pillar {
    #[inline]
    pub const fn new(kind: PillarKind, ganzhi: GanZhi) -> Self {
        Self { kind, ganzhi }
    }

    #[inline]
    pub const fn kind(&self) -> PillarKind {
        self.kind
    }

    #[inline]
    pub const fn ganzhi(&self) -> GanZhi {
        self.ganzhi
    }

    #[inline]
    pub const fn stem(&self) -> Stem {
        self.ganzhi.stem()
    }

    #[inline]
    pub const fn branch(&self) -> Branch {
        self.ganzhi.branch()
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.ganzhi, f)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const fn name(self) -> &'static str {
        match self {
            Gender::Male => "男",
            Gender::Female => "女",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Gender {
    type Err = SymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "男" => Ok(Gender::Male),
            "女" => Ok(Gender::Female),
            _ => Err(SymbolError::new("gender", s)),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Gender {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Gender {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A computed Four Pillars chart.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FourPillarsChart {
    year: Pillar,
    month: Pillar,
    day: Pillar,
    hour: Pillar,
    solar_year: i32,
    month_opened_by: SolarTermEvent,
    civil: NaiveDateTime,
    corrected: NaiveDateTime,
    gender: Gender,
    place: Option<Location>,
}

impl FourPillarsChart {
    #[inline]
    pub fn year(&self) -> Pillar {
        self.year
    }

    #[inline]
    pub fn month(&self) -> Pillar {
        self.month
    }

    #[inline]
    pub fn day(&self) -> Pillar {
        self.day
    }

    #[inline]
    pub fn hour(&self) -> Pillar {
        self.hour
    }

    /// Year, month, day and hour, in that order.
    pub fn pillars(&self) -> [Pillar; 4] {
        [self.year, self.month, self.day, self.hour]
    }

    /// The year whose 立春 opened the chart's solar year.
    #[inline]
    pub fn solar_year(&self) -> i32 {
        self.solar_year
    }

    /// The Jie that opened the chart's month.
    #[inline]
    pub fn month_opened_by(&self) -> &SolarTermEvent {
        &self.month_opened_by
    }

    /// The wall-clock time as given.
    #[inline]
    pub fn civil(&self) -> NaiveDateTime {
        self.civil
    }

    /// The time the pillars were derived from.
    #[inline]
    pub fn corrected(&self) -> NaiveDateTime {
        self.corrected
    }

    #[inline]
    pub fn gender(&self) -> Gender {
        self.gender
    }

    /// The place the true-solar-time correction used: `None` when the
    /// correction is disabled or no place resolved.
    #[inline]
    pub fn place(&self) -> Option<&Location> {
        self.place.as_ref()
    }

    /// The day stem (日主).
    #[inline]
    pub fn day_master(&self) -> Stem {
        self.day.stem()
    }
}

impl fmt::Display for FourPillarsChart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.year, self.month, self.day, self.hour)
    }
}

/// Derive the chart for an already corrected instant.
#[instrument(level = "debug", skip_all, fields(%corrected, %gender))]
pub(crate) fn derive_chart<T: TermSource + ?Sized>(
    source: &T,
    civil: NaiveDateTime,
    corrected: NaiveDateTime,
    gender: Gender,
    place: Option<Location>,
) -> Result<FourPillarsChart, ChartError> {
    let terms = solar_year_terms(source, corrected)?;
    let solar_year = terms.year();
    let span = month_in(&terms, corrected)?;

    let year = year_pillar(solar_year);
    let month = month_pillar(year.stem(), span.branch());
    let day = day_pillar_at(corrected);
    let hour = hour_pillar(day.stem(), corrected.hour());

    Ok(FourPillarsChart {
        year: Pillar::new(PillarKind::Year, year),
        month: Pillar::new(PillarKind::Month, month),
        day: Pillar::new(PillarKind::Day, day),
        hour: Pillar::new(PillarKind::Hour, hour),
        solar_year,
        month_opened_by: *span.opened_by(),
        civil,
        corrected,
        gender,
        place,
    })
}
