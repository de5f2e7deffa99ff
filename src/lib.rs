// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Four Pillars (四柱) calendrical engine.
//!
//! This crate derives the sexagenary Year, Month, Day and Hour pillars of a
//! birth instant, with the calendrical astronomy that needs:
//!
//! - [`SolarTermLocator`] finds the 24 solar terms of a year by bisecting the
//!   Sun's apparent longitude, supplied by any [`Ephemeris`].
//! - [`true_solar_time`] shifts a civil clock reading to local apparent time
//!   (longitude correction plus equation of time).
//! - [`ChartEngine`] ties both to the pillar rules and memoizes solar-term
//!   tables per year in a [`SolarTermCache`].
//!
//! # Core types
//!
//! | Type | Meaning |
//! |------|---------|
//! | [`Stem`], [`Branch`] | the 10 heavenly stems and 12 earthly branches |
//! | [`GanZhi`] | one of the 60 stem–branch pairs, stored as a cycle position |
//! | [`SolarTerm`], [`SolarTermEvent`], [`YearTerms`] | solar terms and their instants |
//! | [`FourPillarsChart`] | the computed chart |
//! | [`Epoch<S>`] | Julian Day on time scale [`TT`] or [`UT`] |
//!
//! # Boundaries
//!
//! The year changes at Start of Spring (立春, 315°), months change at each
//! Jie term, and the day changes at 23:00, the start of the 子 hour.
//! All comparisons use wall-clock time at the configured standard meridian
//! (120°E by default).
//!
//! # Example
//!
//! ```
//! use sizhu::{BirthInput, ChartEngine, Gender};
//!
//! let engine = ChartEngine::default();
//! let input = BirthInput::from_ymd_hms(1984, 2, 5, 12, 0, 0, Gender::Male)
//!     .unwrap()
//!     .with_place("上海");
//! let chart = engine.chart(&input).unwrap();
//! assert_eq!(chart.year().to_string(), "甲子");
//! ```

mod cache;
mod config;
mod delta_t;
mod engine;
pub mod ephemeris;
mod epoch;
mod error;
mod ganzhi;
mod month;
mod nutation;
pub mod pillars;
mod places;
mod solar_terms;
pub mod solar_time;
mod vsop87;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use cache::{CacheStats, SolarTermCache};
pub use config::{EngineConfig, SearchSettings, MIN_SEARCH_ITERATIONS};
pub use engine::{BirthInput, ChartEngine};
pub use ephemeris::{solar_longitude, Ephemeris, LowPrecisionSun, Vsop87Sun};
pub use epoch::{Epoch, TimeScale, TT, UT};
pub use error::{ChartError, ConvergenceError, InputError, LookupError, SymbolError};
pub use ganzhi::{Branch, Element, GanZhi, Polarity, Stem};
pub use month::{next_jie, previous_jie, resolve_month, MonthSpan};
pub use pillars::{FourPillarsChart, Gender, Pillar, PillarKind};
pub use places::{CityTable, Place, PlaceResolver};
pub use solar_terms::{SolarTerm, SolarTermEvent, SolarTermLocator, TermSource, YearTerms};
pub use solar_time::{true_solar_time, Location, StandardMeridian, TimeCorrection};
