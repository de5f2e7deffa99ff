// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Scale-parameterised Julian-day instants.
//!
//! [`Epoch<S>`] stores a Julian Day as a [`Days`] quantity whose meaning is
//! fixed by the compile-time marker `S: TimeScale`:
//!
//! | Marker | Axis | Used for |
//! |--------|------|----------|
//! | [`TT`] | Terrestrial Time | argument of the solar theory |
//! | [`UT`] | Universal Time   | civil clocks (UTC ≈ UT1) |
//!
//! Conversions route through JD(TT), the same way every scale in this crate
//! does; `UT` applies **ΔT** from [`crate::delta_t`].

use chrono::{DateTime, Utc};
use qtty::{Day, Days, Second, Seconds};
use std::marker::PhantomData;
use std::ops::{Add, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Julian Day of the Unix epoch, 1970-01-01T00:00:00Z.
const UNIX_EPOCH_JD: Days = Days::new(2_440_587.5);

/// Marker trait for the time scales an [`Epoch`] can live on.
pub trait TimeScale: Copy + Clone + std::fmt::Debug + PartialEq + PartialOrd + 'static {
    /// Display label.
    const LABEL: &'static str;

    /// Julian Day on this scale → Julian Day (TT).
    fn to_jd_tt(value: Days) -> Days;

    /// Julian Day (TT) → Julian Day on this scale.
    fn from_jd_tt(jd_tt: Days) -> Days;
}

/// Terrestrial Time, the uniform axis the solar theory is evaluated on.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct TT;

impl TimeScale for TT {
    const LABEL: &'static str = "JD(TT)";

    #[inline(always)]
    fn to_jd_tt(value: Days) -> Days {
        value
    }

    #[inline(always)]
    fn from_jd_tt(jd_tt: Days) -> Days {
        jd_tt
    }
}

/// Universal Time, the axis civil clocks follow.
///
/// `TT = UT + ΔT`; the inverse solves the same relation by fixed-point
/// iteration, which converges immediately since dΔT/dJD ≈ 3×10⁻⁸.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct UT;

impl TimeScale for UT {
    const LABEL: &'static str = "JD(UT)";

    #[inline]
    fn to_jd_tt(value: Days) -> Days {
        value + crate::delta_t::delta_t_at(value).to::<Day>()
    }

    #[inline]
    fn from_jd_tt(jd_tt: Days) -> Days {
        let mut ut = jd_tt;
        for _ in 0..3 {
            ut = jd_tt - crate::delta_t::delta_t_at(ut).to::<Day>();
        }
        ut
    }
}

/// A point on time scale `S`, stored as a Julian Day.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Epoch<S: TimeScale> {
    jd: Days,
    _scale: PhantomData<S>,
}

impl<S: TimeScale> Epoch<S> {
    /// Create from a raw Julian Day on scale `S`.
    #[inline]
    pub const fn new(jd: f64) -> Self {
        Self::from_days(Days::new(jd))
    }

    #[inline]
    pub const fn from_days(jd: Days) -> Self {
        Self {
            jd,
            _scale: PhantomData,
        }
    }

    /// The Julian Day quantity on scale `S`.
    #[inline]
    pub const fn quantity(&self) -> Days {
        self.jd
    }

    #[inline]
    pub const fn value(&self) -> f64 {
        self.jd.value()
    }

    /// Convert to another scale through JD(TT).
    #[inline]
    pub fn to<T: TimeScale>(&self) -> Epoch<T> {
        Epoch::from_days(T::from_jd_tt(S::to_jd_tt(self.jd)))
    }

    /// Build from a UTC timestamp, read as UT and carried onto `S`.
    pub fn from_utc(datetime: DateTime<Utc>) -> Self {
        let whole = Seconds::new(datetime.timestamp() as f64);
        let frac = Seconds::new(f64::from(datetime.timestamp_subsec_nanos()) / 1e9);
        let jd_ut = UNIX_EPOCH_JD + (whole + frac).to::<Day>();
        Epoch::<UT>::from_days(jd_ut).to::<S>()
    }

    /// Back to a UTC timestamp, rounded to the nearest millisecond.
    ///
    /// Returns `None` outside chrono's representable range.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        let jd_ut = self.to::<UT>().quantity();
        let millis = ((jd_ut - UNIX_EPOCH_JD).to::<Second>().value() * 1e3).round();
        if !millis.is_finite() {
            return None;
        }
        DateTime::<Utc>::from_timestamp_millis(millis as i64)
    }

    /// Midpoint between two instants on the same scale.
    #[inline]
    pub fn mean(self, other: Self) -> Self {
        Self::from_days((self.jd + other.jd) * 0.5)
    }
}

impl<S: TimeScale> std::fmt::Display for Epoch<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {:.6}", S::LABEL, self.jd.value())
    }
}

impl<S: TimeScale> Add<Days> for Epoch<S> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Days) -> Self::Output {
        Self::from_days(self.jd + rhs)
    }
}

impl<S: TimeScale> Sub<Days> for Epoch<S> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Days) -> Self::Output {
        Self::from_days(self.jd - rhs)
    }
}

impl<S: TimeScale> Sub for Epoch<S> {
    type Output = Days;
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        self.jd - rhs.jd
    }
}

#[cfg(feature = "serde")]
impl<S: TimeScale> Serialize for Epoch<S> {
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: Serializer,
    {
        serializer.serialize_f64(self.value())
    }
}

#[cfg(feature = "serde")]
impl<'de, S: TimeScale> Deserialize<'de> for Epoch<S> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = f64::deserialize(deserializer)?;
        Ok(Self::new(v))
    }
}
