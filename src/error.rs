// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error types.

use chrono::NaiveDateTime;

use crate::solar_terms::SolarTerm;

/// Top-level error returned by chart and solar-term computations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChartError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Convergence(#[from] ConvergenceError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("invalid engine configuration: {0}")]
    InvalidConfig(&'static str),
}

/// Caller-supplied date/time rejected before any computation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("invalid calendar date {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error("invalid time of day {hour:02}:{minute:02}:{second:02}")]
    InvalidTime { hour: u32, minute: u32, second: u32 },

    #[error("year {year} outside supported range {min}..={max}")]
    YearOutOfRange { year: i32, min: i32, max: i32 },
}

/// The bisection used up its iteration budget without meeting tolerance.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error(
    "solar term {term} (seed year {year}) did not converge after {iterations} iterations, residual {residual_deg:.6}°"
)]
pub struct ConvergenceError {
    pub term: SolarTerm,
    pub year: i32,
    pub iterations: u32,
    pub residual_deg: f64,
}

/// A solar-term table did not contain what the calendar rules require.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("no jie term at or before {instant} in its year or the previous one")]
    NoJie { instant: NaiveDateTime },

    #[error("solar term {term} has no instant inside the solar year {year}")]
    TermOutsideYear { term: SolarTerm, year: i32 },

    #[error("solar term {term} (seed year {year}) falls outside the representable calendar")]
    OutOfCalendarRange { term: SolarTerm, year: i32 },
}

/// Parsing a symbol that is not one of the closed enumerations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} symbol {symbol:?}")]
pub struct SymbolError {
    pub kind: &'static str,
    pub symbol: String,
}

impl SymbolError {
    pub(crate) fn new(kind: &'static str, symbol: &str) -> Self {
        Self {
            kind,
            symbol: symbol.to_owned(),
        }
    }
}
