// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Engine configuration.

use crate::error::ChartError;

/// Smallest iteration budget that still reaches 1e-4° from a ±15 day bracket.
pub const MIN_SEARCH_ITERATIONS: u32 = 45;

/// Solar-term bisection settings.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchSettings {
    pub max_iterations: u32,
    /// Stop once `|λ − θ|` drops below this many degrees.
    pub tolerance_deg: f64,
    /// Half-width of the bracket around the seed date.
    pub half_window_days: f64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            tolerance_deg: 1e-4,
            half_window_days: 15.0,
        }
    }
}

/// Everything a [`ChartEngine`](crate::ChartEngine) can be tuned with.
///
/// ```
/// use sizhu::EngineConfig;
///
/// let config = EngineConfig {
///     use_true_solar_time: false,
///     ..EngineConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Longitude of the civil time zone's meridian, degrees east.
    pub standard_meridian_deg: f64,
    pub min_year: i32,
    pub max_year: i32,
    /// Apply the longitude and equation-of-time correction before deriving pillars.
    pub use_true_solar_time: bool,
    /// Number of solar years kept in the solar-term cache.
    pub cache_capacity: usize,
    pub search: SearchSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            standard_meridian_deg: 120.0,
            min_year: 1900,
            max_year: 2100,
            use_true_solar_time: true,
            cache_capacity: 32,
            search: SearchSettings::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ChartError> {
        if !(-180.0..=180.0).contains(&self.standard_meridian_deg) {
            return Err(ChartError::InvalidConfig(
                "standard_meridian_deg must lie in [-180, 180]",
            ));
        }
        if self.min_year > self.max_year {
            return Err(ChartError::InvalidConfig("min_year exceeds max_year"));
        }
        if self.cache_capacity == 0 {
            return Err(ChartError::InvalidConfig("cache_capacity must be positive"));
        }
        if self.search.max_iterations < MIN_SEARCH_ITERATIONS {
            return Err(ChartError::InvalidConfig(
                "search.max_iterations must be at least 45",
            ));
        }
        if !(self.search.tolerance_deg > 0.0 && self.search.tolerance_deg < 1.0) {
            return Err(ChartError::InvalidConfig(
                "search.tolerance_deg must lie in (0, 1)",
            ));
        }
        if !(self.search.half_window_days > 0.0 && self.search.half_window_days <= 30.0) {
            return Err(ChartError::InvalidConfig(
                "search.half_window_days must lie in (0, 30]",
            ));
        }
        Ok(())
    }
}
