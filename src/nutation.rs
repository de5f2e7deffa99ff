// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Nutation in longitude.
//!
//! The leading lunisolar terms of IAU 2000B (IERS Conventions 2010,
//! Table 5.3b). Every term with a longitude amplitude above 0.01″ is kept,
//! which keeps the truncation error under 0.05″.

use std::f64::consts::TAU;

const ARCSEC_TO_RAD: f64 = TAU / 1_296_000.0;

/// Delaunay arguments `[l, l', F, D, Ω]` in radians, `t` in Julian
/// centuries of TT from J2000.0.
fn delaunay_arguments(t: f64) -> [f64; 5] {
    let poly = |c: [f64; 5]| {
        (c[0] + t * (c[1] + t * (c[2] + t * (c[3] + t * c[4])))) * ARCSEC_TO_RAD
    };
    [
        poly([485_868.249_036, 1_717_915_923.217_8, 31.879_2, 0.051_635, -0.000_244_70]),
        poly([1_287_104.793_05, 129_596_581.048_1, -0.553_2, 0.000_136, -0.000_011_49]),
        poly([335_779.526_232, 1_739_527_262.847_8, -12.751_2, -0.001_037, 0.000_004_17]),
        poly([1_072_260.703_69, 1_602_961_601.209_0, -6.370_6, 0.006_593, -0.000_031_69]),
        poly([450_160.398_036, -6_962_890.543_1, 7.472_2, 0.007_702, -0.000_059_39]),
    ]
}

/// `[nl, nl', nF, nD, nΩ, S, S']`, amplitudes in 0.1 μas.
#[rustfmt::skip]
const TERMS: [[i64; 7]; 13] = [
    [ 0,  0, 0,  0, 1, -172_064_161, -174_666],
    [ 0,  0, 2, -2, 2,  -13_170_906,   -1_675],
    [ 0,  0, 2,  0, 2,   -2_276_413,     -234],
    [ 0,  0, 0,  0, 2,    2_074_554,      207],
    [ 0,  1, 0,  0, 0,    1_475_877,   -3_633],
    [ 0,  1, 2, -2, 2,     -516_821,    1_226],
    [ 1,  0, 0,  0, 0,      711_159,       73],
    [ 0,  0, 2,  0, 1,     -387_298,     -367],
    [ 1,  0, 2,  0, 2,     -301_461,      -36],
    [ 0, -1, 2, -2, 2,      215_829,     -494],
    [ 0,  0, 2, -2, 1,      128_227,      137],
    [-1,  0, 2,  0, 2,      123_457,       11],
    [-1,  0, 0,  2, 0,      156_994,       10],
];

/// Nutation in longitude Δψ, in arcseconds.
pub(crate) fn nutation_in_longitude_arcsec(t: f64) -> f64 {
    let args = delaunay_arguments(t);
    let sum: f64 = TERMS
        .iter()
        .map(|row| {
            let arg: f64 = row[..5]
                .iter()
                .zip(args)
                .map(|(&n, a)| n as f64 * a)
                .sum();
            (row[5] as f64 + row[6] as f64 * t) * arg.sin()
        })
        .sum();
    sum * 1e-7
}
