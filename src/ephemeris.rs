// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Apparent solar longitude.
//!
//! The solar-term search only needs one scalar function of time: the Sun's
//! apparent geocentric ecliptic longitude. Any source can provide it through
//! [`Ephemeris`]; [`solar_longitude`] normalizes whatever the provider returns
//! into `[0, 360)`.
//!
//! Two providers are built in:
//!
//! - [`Vsop87Sun`], the default: truncated VSOP87 for the Earth plus nutation
//!   and aberration. Good to about one arcsecond, which puts a solar-term
//!   instant within half a minute of the published tables.
//! - [`LowPrecisionSun`]: the mean-element theory of Meeus, *Astronomical
//!   Algorithms* ch. 25. Good to about 0.01°, so term instants can be off by
//!   several minutes.

use crate::epoch::{Epoch, TT};
use crate::nutation::nutation_in_longitude_arcsec;
use crate::vsop87::{earth_longitude_rad, earth_radius_au};

/// JD(TT) of J2000.0.
const J2000: f64 = 2_451_545.0;

/// Days per Julian century.
const JULIAN_CENTURY: f64 = 36_525.0;

/// Annual aberration constant, arcseconds at 1 au.
const ABERRATION_ARCSEC: f64 = 20.489_8;

/// FK5 frame correction to the VSOP87 longitude, arcseconds.
const FK5_CORRECTION_ARCSEC: f64 = -0.090_33;

/// A source of the Sun's apparent ecliptic longitude.
///
/// Implementations are assumed always available: there is no error channel,
/// and a non-finite value is treated as a broken precondition.
pub trait Ephemeris: Send + Sync {
    /// Apparent geocentric ecliptic longitude of the Sun, in degrees.
    ///
    /// Any real value is accepted; callers normalize.
    fn apparent_longitude_deg(&self, jd: Epoch<TT>) -> f64;
}

impl<E: Ephemeris + ?Sized> Ephemeris for &E {
    fn apparent_longitude_deg(&self, jd: Epoch<TT>) -> f64 {
        (**self).apparent_longitude_deg(jd)
    }
}

impl<E: Ephemeris + ?Sized> Ephemeris for Box<E> {
    fn apparent_longitude_deg(&self, jd: Epoch<TT>) -> f64 {
        (**self).apparent_longitude_deg(jd)
    }
}

/// Normalize an angle into `[0, 360)`.
#[inline]
pub fn normalize_360(deg: f64) -> f64 {
    let d = deg.rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360.0
    if d >= 360.0 {
        0.0
    } else {
        d
    }
}

/// Normalize an angle into `(-180, 180]`.
#[inline]
pub fn normalize_pm180(deg: f64) -> f64 {
    let d = normalize_360(deg);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}

/// The Sun's apparent longitude at `jd`, in `[0, 360)`.
///
/// # Panics
///
/// Panics if the provider returns a non-finite value.
pub fn solar_longitude<E: Ephemeris + ?Sized>(ephemeris: &E, jd: Epoch<TT>) -> f64 {
    let raw = ephemeris.apparent_longitude_deg(jd);
    assert!(
        raw.is_finite(),
        "ephemeris returned a non-finite longitude at {jd}"
    );
    normalize_360(raw)
}

/// Apparent Sun from the truncated VSOP87 Earth series.
///
/// The geocentric longitude is the Earth's heliocentric one turned by 180°,
/// moved to FK5, then corrected for nutation in longitude and for aberration
/// scaled by the Earth–Sun distance.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Vsop87Sun;

impl Ephemeris for Vsop87Sun {
    fn apparent_longitude_deg(&self, jd: Epoch<TT>) -> f64 {
        let t = (jd.value() - J2000) / JULIAN_CENTURY;
        let tau = t / 10.0;

        let geometric = earth_longitude_rad(tau).to_degrees() + 180.0;
        let corrections = FK5_CORRECTION_ARCSEC + nutation_in_longitude_arcsec(t)
            - ABERRATION_ARCSEC / earth_radius_au(tau);

        geometric + corrections / 3_600.0
    }
}

/// Analytic low-precision solar theory.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct LowPrecisionSun;

impl Ephemeris for LowPrecisionSun {
    fn apparent_longitude_deg(&self, jd: Epoch<TT>) -> f64 {
        let t = (jd.value() - J2000) / JULIAN_CENTURY;

        // Geometric mean longitude and mean anomaly.
        let l0 = 280.466_46 + 36_000.769_83 * t + 0.000_303_2 * t * t;
        let m = (357.529_11 + 35_999.050_29 * t - 0.000_153_7 * t * t).to_radians();

        // Equation of centre.
        let c = (1.914_602 - 0.004_817 * t - 0.000_014 * t * t) * m.sin()
            + (0.019_993 - 0.000_101 * t) * (2.0 * m).sin()
            + 0.000_289 * (3.0 * m).sin();

        // Longitude of the Moon's ascending node, for nutation.
        let omega = (125.04 - 1_934.136 * t).to_radians();

        l0 + c - 0.005_69 - 0.004_78 * omega.sin()
    }
}
