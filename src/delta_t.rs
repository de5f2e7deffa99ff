// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! # ΔT (Delta T): the UT↔TT correction
//!
//! **ΔT = TT − UT** from the polynomial segments of Espenak & Meeus (2006),
//! as published with the NASA *Five Millennium Canon of Solar Eclipses*.
//! Only the segments around the supported calendar range are carried; outside
//! 1860–2150 the long-term parabola of Morrison & Stephenson (2004) is used.
//!
//! The correction is applied automatically by the [`UT`](crate::epoch::UT)
//! scale, so charts never call into this module directly. Its effect on a
//! solar-term instant is about a minute, well inside the locator tolerance
//! once the civil clock is involved.

use qtty::{Days, Seconds, Simplify};

/// JD(UT) of 2000-01-01T00:00:00.
const JD_2000_UT: Days = Days::new(2_451_544.5);

/// Mean Gregorian year in days.
const GREGORIAN_YEAR: Days = Days::new(365.2425);

/// Decimal year for a Julian Day on the UT axis.
#[inline]
fn decimal_year(jd_ut: Days) -> f64 {
    2000.0 + ((jd_ut - JD_2000_UT) / GREGORIAN_YEAR).simplify().value()
}

/// Long-term parabola, `u` in centuries from 1820.
#[inline]
fn long_term(y: f64) -> f64 {
    let u = (y - 1820.0) / 100.0;
    -20.0 + 32.0 * u * u
}

/// ΔT in seconds for a decimal year.
fn delta_t_seconds(y: f64) -> f64 {
    match y {
        y if y < 1860.0 => long_term(y),
        y if y < 1900.0 => {
            let t = y - 1860.0;
            7.62 + 0.5737 * t - 0.251_754 * t.powi(2) + 0.016_806_68 * t.powi(3)
                - 0.000_447_362_4 * t.powi(4)
                + t.powi(5) / 233_174.0
        }
        y if y < 1920.0 => {
            let t = y - 1900.0;
            -2.79 + 1.494_119 * t - 0.059_893_9 * t.powi(2) + 0.006_196_6 * t.powi(3)
                - 0.000_197 * t.powi(4)
        }
        y if y < 1941.0 => {
            let t = y - 1920.0;
            21.20 + 0.844_93 * t - 0.076_100 * t.powi(2) + 0.002_093_6 * t.powi(3)
        }
        y if y < 1961.0 => {
            let t = y - 1950.0;
            29.07 + 0.407 * t - t.powi(2) / 233.0 + t.powi(3) / 2547.0
        }
        y if y < 1986.0 => {
            let t = y - 1975.0;
            45.45 + 1.067 * t - t.powi(2) / 260.0 - t.powi(3) / 718.0
        }
        y if y < 2005.0 => {
            let t = y - 2000.0;
            63.86 + 0.3345 * t - 0.060_374 * t.powi(2)
                + 0.001_727_5 * t.powi(3)
                + 0.000_651_814 * t.powi(4)
                + 0.000_023_735_99 * t.powi(5)
        }
        y if y < 2050.0 => {
            let t = y - 2000.0;
            62.92 + 0.322_17 * t + 0.005_589 * t.powi(2)
        }
        y if y < 2150.0 => long_term(y) - 0.5628 * (2150.0 - y),
        y => long_term(y),
    }
}

/// Returns **ΔT** for a Julian Day on the **UT** axis.
#[inline]
pub(crate) fn delta_t_at(jd_ut: Days) -> Seconds {
    Seconds::new(delta_t_seconds(decimal_year(jd_ut)))
}
