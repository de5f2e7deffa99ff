// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Heavenly stems, earthly branches and the sexagenary cycle.
//!
//! [`Stem`] and [`Branch`] are closed enumerations; [`GanZhi`] stores a single
//! cycle position in `0..60` and derives both halves from it, so the 60
//! parity-mismatched pairs (e.g. 甲丑) cannot be represented at all.
//!
//! Symbol literals (甲, 子, …) are load-bearing vocabulary for downstream
//! consumers: `Display` and `FromStr` use them verbatim, and so does the
//! optional serde representation.

use std::fmt;
use std::str::FromStr;

use crate::error::SymbolError;

/// Five phases (五行).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Element {
    Wood,
    Fire,
    Earth,
    Metal,
    Water,
}

impl Element {
    pub const fn name(self) -> &'static str {
        match self {
            Element::Wood => "木",
            Element::Fire => "火",
            Element::Earth => "土",
            Element::Metal => "金",
            Element::Water => "水",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Yin/Yang polarity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Polarity {
    Yang,
    Yin,
}

impl Polarity {
    pub const fn name(self) -> &'static str {
        match self {
            Polarity::Yang => "阳",
            Polarity::Yin => "阴",
        }
    }

    const fn from_index(index: u8) -> Self {
        if index % 2 == 0 {
            Polarity::Yang
        } else {
            Polarity::Yin
        }
    }
}

/// Heavenly stem (天干).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stem {
    Jia,
    Yi,
    Bing,
    Ding,
    Wu,
    Ji,
    Geng,
    Xin,
    Ren,
    Gui,
}

impl Stem {
    pub const ALL: [Stem; 10] = [
        Stem::Jia,
        Stem::Yi,
        Stem::Bing,
        Stem::Ding,
        Stem::Wu,
        Stem::Ji,
        Stem::Geng,
        Stem::Xin,
        Stem::Ren,
        Stem::Gui,
    ];

    /// Stem for any integer index, taken mod 10.
    pub const fn from_index(index: i64) -> Self {
        Self::ALL[index.rem_euclid(10) as usize]
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            Stem::Jia => "甲",
            Stem::Yi => "乙",
            Stem::Bing => "丙",
            Stem::Ding => "丁",
            Stem::Wu => "戊",
            Stem::Ji => "己",
            Stem::Geng => "庚",
            Stem::Xin => "辛",
            Stem::Ren => "壬",
            Stem::Gui => "癸",
        }
    }

    pub const fn element(self) -> Element {
        match self {
            Stem::Jia | Stem::Yi => Element::Wood,
            Stem::Bing | Stem::Ding => Element::Fire,
            Stem::Wu | Stem::Ji => Element::Earth,
            Stem::Geng | Stem::Xin => Element::Metal,
            Stem::Ren | Stem::Gui => Element::Water,
        }
    }

    #[inline]
    pub const fn polarity(self) -> Polarity {
        Polarity::from_index(self.index())
    }

    /// The stem `steps` positions later (negative for earlier).
    #[inline]
    pub const fn offset(self, steps: i64) -> Self {
        Self::from_index(self.index() as i64 + steps)
    }
}

/// Earthly branch (地支).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Branch {
    Zi,
    Chou,
    Yin,
    Mao,
    Chen,
    Si,
    Wu,
    Wei,
    Shen,
    You,
    Xu,
    Hai,
}

impl Branch {
    pub const ALL: [Branch; 12] = [
        Branch::Zi,
        Branch::Chou,
        Branch::Yin,
        Branch::Mao,
        Branch::Chen,
        Branch::Si,
        Branch::Wu,
        Branch::Wei,
        Branch::Shen,
        Branch::You,
        Branch::Xu,
        Branch::Hai,
    ];

    /// Branch for any integer index, taken mod 12.
    pub const fn from_index(index: i64) -> Self {
        Self::ALL[index.rem_euclid(12) as usize]
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            Branch::Zi => "子",
            Branch::Chou => "丑",
            Branch::Yin => "寅",
            Branch::Mao => "卯",
            Branch::Chen => "辰",
            Branch::Si => "巳",
            Branch::Wu => "午",
            Branch::Wei => "未",
            Branch::Shen => "申",
            Branch::You => "酉",
            Branch::Xu => "戌",
            Branch::Hai => "亥",
        }
    }

    pub const fn element(self) -> Element {
        match self {
            Branch::Zi | Branch::Hai => Element::Water,
            Branch::Yin | Branch::Mao => Element::Wood,
            Branch::Si | Branch::Wu => Element::Fire,
            Branch::Shen | Branch::You => Element::Metal,
            Branch::Chou | Branch::Chen | Branch::Wei | Branch::Xu => Element::Earth,
        }
    }

    #[inline]
    pub const fn polarity(self) -> Polarity {
        Polarity::from_index(self.index())
    }

    pub const fn animal(self) -> &'static str {
        match self {
            Branch::Zi => "鼠",
            Branch::Chou => "牛",
            Branch::Yin => "虎",
            Branch::Mao => "兔",
            Branch::Chen => "龙",
            Branch::Si => "蛇",
            Branch::Wu => "马",
            Branch::Wei => "羊",
            Branch::Shen => "猴",
            Branch::You => "鸡",
            Branch::Xu => "狗",
            Branch::Hai => "猪",
        }
    }

    /// Branch of the two-hour slot containing `hour` (0–23).
    ///
    /// Slots start on odd hours; 23:00–00:59 is 子.
    #[inline]
    pub const fn from_hour(hour: u32) -> Self {
        Self::from_index(((hour + 1) / 2) as i64)
    }

    /// First and last clock hour of this branch's slot, e.g. `(23, 0)` for 子.
    pub const fn hour_slot(self) -> (u32, u32) {
        let start = (self.index() as u32 * 2 + 23) % 24;
        (start, (start + 1) % 24)
    }

    #[inline]
    pub const fn offset(self, steps: i64) -> Self {
        Self::from_index(self.index() as i64 + steps)
    }
}

/// One of the sixty valid stem–branch pairs.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GanZhi {
    position: u8,
}

impl GanZhi {
    /// 甲子, the start of the cycle.
    pub const JIA_ZI: GanZhi = GanZhi { position: 0 };

    /// Pair at `position` in the cycle, taken mod 60.
    pub const fn from_position(position: i64) -> Self {
        Self {
            position: position.rem_euclid(60) as u8,
        }
    }

    /// Pair a stem with a branch; `None` when their parities differ.
    pub const fn new(stem: Stem, branch: Branch) -> Option<Self> {
        let s = stem.index() as i64;
        let b = branch.index() as i64;
        if (s - b) % 2 != 0 {
            return None;
        }
        // pos ≡ s (mod 10) and pos ≡ b (mod 12)
        Some(Self::from_position(6 * s - 5 * b))
    }

    #[inline]
    pub const fn position(self) -> u8 {
        self.position
    }

    #[inline]
    pub const fn stem(self) -> Stem {
        Stem::from_index(self.position as i64)
    }

    #[inline]
    pub const fn branch(self) -> Branch {
        Branch::from_index(self.position as i64)
    }

    /// The pair `steps` positions later in the cycle (negative for earlier).
    #[inline]
    pub const fn offset(self, steps: i64) -> Self {
        Self::from_position(self.position as i64 + steps)
    }

    /// Iterate the whole cycle from 甲子 to 癸亥.
    pub fn cycle() -> impl Iterator<Item = GanZhi> {
        (0..60).map(GanZhi::from_position)
    }
}

impl fmt::Display for Stem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for GanZhi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.stem(), self.branch())
    }
}

impl FromStr for Stem {
    type Err = SymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stem::ALL
            .into_iter()
            .find(|stem| stem.name() == s)
            .ok_or_else(|| SymbolError::new("stem", s))
    }
}

impl FromStr for Branch {
    type Err = SymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Branch::ALL
            .into_iter()
            .find(|branch| branch.name() == s)
            .ok_or_else(|| SymbolError::new("branch", s))
    }
}

impl FromStr for GanZhi {
    type Err = SymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(g), Some(z), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(SymbolError::new("ganzhi", s));
        };
        let stem: Stem = g.encode_utf8(&mut [0; 4]).parse()?;
        let branch: Branch = z.encode_utf8(&mut [0; 4]).parse()?;
        GanZhi::new(stem, branch).ok_or_else(|| SymbolError::new("ganzhi", s))
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::{Branch, GanZhi, Stem};
    use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};

    macro_rules! literal_serde {
        ($ty:ty) => {
            impl Serialize for $ty {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.collect_str(self)
                }
            }

            impl<'de> Deserialize<'de> for $ty {
                fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                    let s = String::deserialize(deserializer)?;
                    s.parse().map_err(D::Error::custom)
                }
            }
        };
    }

    literal_serde!(Stem);
    literal_serde!(Branch);
    literal_serde!(GanZhi);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stem_and_branch_derive_from_one_position() {
        for pos in 0..60 {
            let gz = GanZhi::from_position(pos);
            assert_eq!(gz.stem().index() as i64, pos % 10);
            assert_eq!(gz.branch().index() as i64, pos % 12);
        }
    }

    #[test]
    fn new_accepts_exactly_sixty_pairs() {
        let mut valid = 0;
        for stem in Stem::ALL {
            for branch in Branch::ALL {
                match GanZhi::new(stem, branch) {
                    Some(gz) => {
                        valid += 1;
                        assert_eq!(gz.stem(), stem);
                        assert_eq!(gz.branch(), branch);
                    }
                    None => assert_ne!(stem.index() % 2, branch.index() % 2),
                }
            }
        }
        assert_eq!(valid, 60);
    }

    #[test]
    fn known_positions() {
        assert_eq!(GanZhi::JIA_ZI.to_string(), "甲子");
        assert_eq!(GanZhi::from_position(59).to_string(), "癸亥");
        assert_eq!(GanZhi::from_position(54).to_string(), "戊午");
        assert_eq!(GanZhi::new(Stem::Geng, Branch::Chen).map(GanZhi::position), Some(16));
    }

    #[test]
    fn offset_wraps_both_directions() {
        assert_eq!(GanZhi::from_position(59).offset(1), GanZhi::JIA_ZI);
        assert_eq!(GanZhi::JIA_ZI.offset(-1).position(), 59);
        assert_eq!(GanZhi::from_position(7).offset(120), GanZhi::from_position(7));
        assert_eq!(Stem::Gui.offset(1), Stem::Jia);
        assert_eq!(Branch::Zi.offset(-1), Branch::Hai);
    }

    #[test]
    fn stem_attributes() {
        assert_eq!(Stem::Jia.element(), Element::Wood);
        assert_eq!(Stem::Jia.polarity(), Polarity::Yang);
        assert_eq!(Stem::Ding.element(), Element::Fire);
        assert_eq!(Stem::Ding.polarity(), Polarity::Yin);
        assert_eq!(Stem::Gui.element(), Element::Water);
    }

    #[test]
    fn branch_attributes() {
        assert_eq!(Branch::Zi.element(), Element::Water);
        assert_eq!(Branch::Chen.element(), Element::Earth);
        assert_eq!(Branch::Shen.element(), Element::Metal);
        assert_eq!(Branch::Wu.animal(), "马");
    }

    #[test]
    fn hour_slots_start_on_odd_hours() {
        assert_eq!(Branch::from_hour(23), Branch::Zi);
        assert_eq!(Branch::from_hour(0), Branch::Zi);
        assert_eq!(Branch::from_hour(1), Branch::Chou);
        assert_eq!(Branch::from_hour(2), Branch::Chou);
        assert_eq!(Branch::from_hour(11), Branch::Wu);
        assert_eq!(Branch::from_hour(22), Branch::Hai);
        assert_eq!(Branch::Zi.hour_slot(), (23, 0));
        assert_eq!(Branch::Chou.hour_slot(), (1, 2));
        assert_eq!(Branch::Hai.hour_slot(), (21, 22));
        for hour in 0..24 {
            let (start, end) = Branch::from_hour(hour).hour_slot();
            assert!(hour == start || hour == end, "hour {hour} not in slot");
        }
    }

    #[test]
    fn parse_literals() {
        assert_eq!("壬".parse::<Stem>(), Ok(Stem::Ren));
        assert_eq!("酉".parse::<Branch>(), Ok(Branch::You));
        assert_eq!("丙寅".parse::<GanZhi>().map(GanZhi::position), Ok(2));
        assert!("甲丑".parse::<GanZhi>().is_err());
        assert!("甲".parse::<GanZhi>().is_err());
        assert!("X".parse::<Stem>().is_err());
    }

    #[test]
    fn cycle_visits_every_pair_once() {
        let all: Vec<_> = GanZhi::cycle().collect();
        assert_eq!(all.len(), 60);
        assert_eq!(all[0], GanZhi::JIA_ZI);
        assert!(all.windows(2).all(|w| w[0].offset(1) == w[1]));
    }
}
