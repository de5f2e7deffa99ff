// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Place-name resolution.

use crate::solar_time::Location;

/// Turns a free-form place name into a [`Location`].
///
/// An unknown name is `None`; callers then skip the true-solar-time step.
pub trait PlaceResolver: Send + Sync {
    fn resolve(&self, name: &str) -> Option<Location>;
}

impl<R: PlaceResolver + ?Sized> PlaceResolver for &R {
    fn resolve(&self, name: &str) -> Option<Location> {
        (**self).resolve(name)
    }
}

impl<R: PlaceResolver + ?Sized> PlaceResolver for Box<R> {
    fn resolve(&self, name: &str) -> Option<Location> {
        (**self).resolve(name)
    }
}

/// A birth place, either by name or by coordinates.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Place {
    Named(String),
    At(Location),
}

impl From<&str> for Place {
    fn from(name: &str) -> Self {
        Place::Named(name.to_owned())
    }
}

impl From<String> for Place {
    fn from(name: String) -> Self {
        Place::Named(name)
    }
}

impl From<Location> for Place {
    fn from(location: Location) -> Self {
        Place::At(location)
    }
}

/// (name, longitude °E, latitude °N)
const CHINA_CITIES: [(&str, f64, f64); 38] = [
    ("北京", 116.4074, 39.9042),
    ("上海", 121.4737, 31.2304),
    ("广州", 113.2644, 23.1291),
    ("深圳", 114.0579, 22.5431),
    ("成都", 104.0657, 30.6595),
    ("重庆", 106.5516, 29.5630),
    ("天津", 117.1901, 39.1256),
    ("武汉", 114.3055, 30.5928),
    ("南京", 118.7969, 32.0603),
    ("杭州", 120.1536, 30.2875),
    ("西安", 108.9402, 34.3416),
    ("长沙", 112.9388, 28.2282),
    ("沈阳", 123.4315, 41.8057),
    ("哈尔滨", 126.5346, 45.8038),
    ("大连", 121.6147, 38.9140),
    ("青岛", 120.3826, 36.0671),
    ("济南", 117.1209, 36.6512),
    ("郑州", 113.6254, 34.7466),
    ("福州", 119.2965, 26.0745),
    ("厦门", 118.0894, 24.4798),
    ("昆明", 102.8329, 24.8801),
    ("贵阳", 106.6302, 26.6477),
    ("南宁", 108.3661, 22.8170),
    ("海口", 110.1999, 20.0444),
    ("太原", 112.5489, 37.8706),
    ("石家庄", 114.5149, 38.0428),
    ("合肥", 117.2272, 31.8206),
    ("南昌", 115.8579, 28.6820),
    ("长春", 125.3235, 43.8171),
    ("呼和浩特", 111.7490, 40.8424),
    ("乌鲁木齐", 87.6177, 43.7928),
    ("拉萨", 91.1322, 29.6600),
    ("兰州", 103.8343, 36.0611),
    ("银川", 106.2309, 38.4872),
    ("西宁", 101.7782, 36.6171),
    ("台北", 121.5654, 25.0330),
    ("香港", 114.1095, 22.3964),
    ("澳门", 113.5439, 22.1987),
];

/// In-memory table of places, matched by exact name first and then by
/// substring containment in either direction ("北京市" finds 北京).
#[derive(Debug, Clone, PartialEq)]
pub struct CityTable {
    entries: Vec<Location>,
}

impl CityTable {
    pub fn new(entries: Vec<Location>) -> Self {
        Self { entries }
    }

    /// Provincial capitals and other major cities of China.
    pub fn china() -> Self {
        Self::new(
            CHINA_CITIES
                .iter()
                .map(|&(name, lon, lat)| Location::new(name, lon, lat))
                .collect(),
        )
    }

    pub fn insert(&mut self, location: Location) {
        self.entries.push(location);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Location> + '_ {
        self.entries.iter()
    }
}

impl Default for CityTable {
    fn default() -> Self {
        Self::china()
    }
}

impl PlaceResolver for CityTable {
    fn resolve(&self, name: &str) -> Option<Location> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|loc| loc.name == name)
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|loc| name.contains(loc.name.as_str()) || loc.name.contains(name))
            })
            .cloned()
    }
}
