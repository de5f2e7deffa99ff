// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Chart engine: configuration, ephemeris, place lookup and the solar-term
//! cache behind one `Send + Sync` handle.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use tracing::{debug, instrument};

use crate::cache::SolarTermCache;
use crate::config::EngineConfig;
use crate::ephemeris::{Ephemeris, Vsop87Sun};
use crate::error::{ChartError, InputError};
use crate::month::{self, MonthSpan};
use crate::pillars::{derive_chart, FourPillarsChart, Gender};
use crate::places::{CityTable, Place, PlaceResolver};
use crate::solar_terms::{SolarTermEvent, SolarTermLocator, TermSource, YearTerms};
use crate::solar_time::{true_solar_time, Location, StandardMeridian, TimeCorrection};

/// A birth instant as read off a civil clock.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BirthInput {
    civil: NaiveDateTime,
    gender: Gender,
    place: Option<Place>,
}

impl BirthInput {
    pub fn new(civil: NaiveDateTime, gender: Gender) -> Self {
        Self {
            civil,
            gender,
            place: None,
        }
    }

    /// Build from calendar fields, rejecting impossible dates and times.
    pub fn from_ymd_hms(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        gender: Gender,
    ) -> Result<Self, InputError> {
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or(InputError::InvalidDate { year, month, day })?;
        let civil = date
            .and_hms_opt(hour, minute, second)
            .ok_or(InputError::InvalidTime {
                hour,
                minute,
                second,
            })?;
        Ok(Self::new(civil, gender))
    }

    pub fn with_place(mut self, place: impl Into<Place>) -> Self {
        self.place = Some(place.into());
        self
    }

    #[inline]
    pub fn civil(&self) -> NaiveDateTime {
        self.civil
    }

    #[inline]
    pub fn gender(&self) -> Gender {
        self.gender
    }

    #[inline]
    pub fn place(&self) -> Option<&Place> {
        self.place.as_ref()
    }
}

/// Computes Four Pillars charts.
///
/// ```
/// use sizhu::{BirthInput, ChartEngine, EngineConfig, Gender};
///
/// let engine = ChartEngine::new(EngineConfig::default()).unwrap();
/// let input = BirthInput::from_ymd_hms(2024, 3, 1, 12, 0, 0, Gender::Female)
///     .unwrap()
///     .with_place("北京");
/// let chart = engine.chart(&input).unwrap();
/// assert_eq!(chart.year().to_string(), "甲辰");
/// ```
#[derive(Debug)]
pub struct ChartEngine<E = Vsop87Sun, R = CityTable> {
    config: EngineConfig,
    locator: SolarTermLocator<E>,
    resolver: R,
    cache: Arc<SolarTermCache>,
}

impl ChartEngine {
    /// Engine with the built-in solar theory and city table.
    pub fn new(config: EngineConfig) -> Result<Self, ChartError> {
        Self::with_parts(config, Vsop87Sun, CityTable::china())
    }
}

impl Default for ChartEngine {
    fn default() -> Self {
        // The default configuration always validates.
        Self::assemble(EngineConfig::default(), Vsop87Sun, CityTable::china())
    }
}

impl<E: Ephemeris, R: PlaceResolver> ChartEngine<E, R> {
    pub fn with_parts(config: EngineConfig, ephemeris: E, resolver: R) -> Result<Self, ChartError> {
        config.validate()?;
        Ok(Self::assemble(config, ephemeris, resolver))
    }

    fn assemble(config: EngineConfig, ephemeris: E, resolver: R) -> Self {
        Self {
            locator: SolarTermLocator::new(
                ephemeris,
                config.search,
                StandardMeridian::new(config.standard_meridian_deg),
            ),
            resolver,
            cache: Arc::new(SolarTermCache::new(config.cache_capacity)),
            config,
        }
    }

    /// Use `cache` instead of a private one, e.g. to share it between engines
    /// with the same ephemeris and standard meridian.
    pub fn with_cache(mut self, cache: Arc<SolarTermCache>) -> Self {
        self.cache = cache;
        self
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[inline]
    pub fn cache(&self) -> &Arc<SolarTermCache> {
        &self.cache
    }

    #[inline]
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    #[inline]
    pub fn meridian(&self) -> StandardMeridian {
        self.locator.meridian()
    }

    /// Look up a place; coordinates pass straight through.
    pub fn resolve_place(&self, place: &Place) -> Option<Location> {
        match place {
            Place::At(location) => Some(location.clone()),
            Place::Named(name) => {
                let found = self.resolver.resolve(name);
                if found.is_none() {
                    debug!(place = %name, "unresolved place, keeping civil time");
                }
                found
            }
        }
    }

    /// True solar time at `place`, or `civil` unchanged when the place is
    /// missing or unknown.
    pub fn true_solar_time(&self, civil: NaiveDateTime, place: Option<&Place>) -> NaiveDateTime {
        let location = place.and_then(|p| self.resolve_place(p));
        true_solar_time(civil, location.as_ref(), self.meridian())
    }

    /// Breakdown of the correction at `place`; `None` if it cannot be resolved.
    pub fn time_correction(&self, civil: NaiveDateTime, place: &Place) -> Option<TimeCorrection> {
        self.resolve_place(place)
            .map(|location| TimeCorrection::compute(civil, &location, self.meridian()))
    }

    /// Solar month containing a wall-clock instant.
    pub fn month(&self, instant: NaiveDateTime) -> Result<MonthSpan, ChartError> {
        month::resolve_month(self, instant)
    }

    /// Latest Jie at or before `instant`.
    pub fn previous_jie(&self, instant: NaiveDateTime) -> Result<SolarTermEvent, ChartError> {
        month::previous_jie(self, instant)
    }

    /// Earliest Jie after `instant`.
    pub fn next_jie(&self, instant: NaiveDateTime) -> Result<SolarTermEvent, ChartError> {
        month::next_jie(self, instant)
    }

    fn check_year(&self, year: i32) -> Result<(), InputError> {
        if (self.config.min_year..=self.config.max_year).contains(&year) {
            Ok(())
        } else {
            Err(InputError::YearOutOfRange {
                year,
                min: self.config.min_year,
                max: self.config.max_year,
            })
        }
    }

    /// Compute the Four Pillars chart of `input`.
    #[instrument(skip_all, fields(civil = %input.civil(), gender = %input.gender()))]
    pub fn chart(&self, input: &BirthInput) -> Result<FourPillarsChart, ChartError> {
        let civil = input.civil();
        self.check_year(civil.year())?;

        // Places only matter to the correction; without it none is recorded.
        let location = if self.config.use_true_solar_time {
            input.place().and_then(|p| self.resolve_place(p))
        } else {
            None
        };
        let corrected = true_solar_time(civil, location.as_ref(), self.meridian());

        derive_chart(self, civil, corrected, input.gender(), location)
    }
}

impl<E: Ephemeris, R: PlaceResolver> TermSource for ChartEngine<E, R> {
    /// Cached table of the solar year opened by `year`'s 立春.
    fn year_terms(&self, year: i32) -> Result<Arc<YearTerms>, ChartError> {
        self.cache
            .get_or_try_insert_with(year, || self.locator.compute_year(year))
    }
}
