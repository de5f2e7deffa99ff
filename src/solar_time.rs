// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! True solar time.
//!
//! Civil clocks follow the mean Sun at a zone's standard meridian. The local
//! apparent Sun differs by two terms, both in minutes:
//!
//! * the **longitude correction**, `(λ_place − λ_meridian) × 4`, since the
//!   Earth turns one degree every four minutes;
//! * the **equation of time**, `9.87 sin 2B − 7.53 cos B − 1.5 sin B` with
//!   `B = 2π(d − 81)/365` and `d` the 1-based day of the year.
//!
//! The sum is added to the civil wall clock with chrono arithmetic, so
//! day/month/year roll-over needs no special handling.

use std::f64::consts::TAU;

use chrono::{DateTime, Datelike, Duration, NaiveDateTime, Utc};

/// Minutes of clock time per degree of longitude.
const MINUTES_PER_DEGREE: f64 = 4.0;

/// Clock milliseconds per degree of longitude.
const MILLIS_PER_DEGREE: f64 = 240_000.0;

/// A geographic place. Longitude is positive east.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    pub name: String,
    pub longitude_deg: f64,
    pub latitude_deg: f64,
}

impl Location {
    pub fn new(name: impl Into<String>, longitude_deg: f64, latitude_deg: f64) -> Self {
        Self {
            name: name.into(),
            longitude_deg,
            latitude_deg,
        }
    }
}

/// The central meridian a civil time zone keeps mean time for.
///
/// Its clock runs `longitude × 4` minutes ahead of UTC; 120°E is UTC+8.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StandardMeridian(f64);

impl StandardMeridian {
    /// 120°E, the meridian of China Standard Time.
    pub const BEIJING: StandardMeridian = StandardMeridian(120.0);

    #[inline]
    pub const fn new(longitude_deg: f64) -> Self {
        Self(longitude_deg)
    }

    #[inline]
    pub const fn longitude_deg(self) -> f64 {
        self.0
    }

    /// Offset of the zone's clock from UTC.
    #[inline]
    pub fn utc_offset(self) -> Duration {
        Duration::milliseconds((self.0 * MILLIS_PER_DEGREE).round() as i64)
    }

    /// Wall-clock reading in this zone at `utc`.
    #[inline]
    pub fn civil_from_utc(self, utc: DateTime<Utc>) -> NaiveDateTime {
        utc.naive_utc() + self.utc_offset()
    }

    /// The UTC instant a wall-clock reading in this zone denotes.
    #[inline]
    pub fn civil_to_utc(self, civil: NaiveDateTime) -> DateTime<Utc> {
        (civil - self.utc_offset()).and_utc()
    }
}

impl Default for StandardMeridian {
    fn default() -> Self {
        Self::BEIJING
    }
}

/// Equation of time in minutes for a 1-based day of the year.
pub fn equation_of_time_minutes(day_of_year: u32) -> f64 {
    let b = TAU * (f64::from(day_of_year) - 81.0) / 365.0;
    9.87 * (2.0 * b).sin() - 7.53 * b.cos() - 1.5 * b.sin()
}

/// Longitude correction in minutes of `longitude_deg` against `meridian`.
#[inline]
pub fn longitude_correction_minutes(longitude_deg: f64, meridian: StandardMeridian) -> f64 {
    (longitude_deg - meridian.longitude_deg()) * MINUTES_PER_DEGREE
}

/// Breakdown of a true-solar-time correction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TimeCorrection {
    pub location: Location,
    pub longitude_minutes: f64,
    pub equation_of_time_minutes: f64,
    pub total_minutes: f64,
    pub civil: NaiveDateTime,
    pub corrected: NaiveDateTime,
}

impl TimeCorrection {
    pub fn compute(civil: NaiveDateTime, location: &Location, meridian: StandardMeridian) -> Self {
        let longitude_minutes = longitude_correction_minutes(location.longitude_deg, meridian);
        let equation_of_time_minutes = equation_of_time_minutes(civil.ordinal());
        let total_minutes = longitude_minutes + equation_of_time_minutes;
        Self {
            location: location.clone(),
            longitude_minutes,
            equation_of_time_minutes,
            total_minutes,
            civil,
            corrected: civil + minutes(total_minutes),
        }
    }
}

/// Convert a civil wall-clock time to true solar time at `place`.
///
/// With no place the input comes back unchanged.
pub fn true_solar_time(
    civil: NaiveDateTime,
    place: Option<&Location>,
    meridian: StandardMeridian,
) -> NaiveDateTime {
    match place {
        Some(location) => TimeCorrection::compute(civil, location, meridian).corrected,
        None => civil,
    }
}

/// Fractional minutes as a duration, rounded to the microsecond.
#[inline]
fn minutes(value: f64) -> Duration {
    Duration::microseconds((value * 60e6).round() as i64)
}
