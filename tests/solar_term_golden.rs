//! Solar-term instants checked against published Beijing-time almanac values.
//!
//! 2024 entries are published to the second; the rest to the minute.

use chrono::NaiveDateTime;
use sizhu::{BirthInput, ChartEngine, EngineConfig, Gender, SolarTerm, TermSource};

/// `(solar year, term, published Beijing time)`.
const GOLDEN: &[(i32, SolarTerm, &str)] = &[
    (2023, SolarTerm::XiaoHan, "2024-01-06 04:49:09"),
    (2024, SolarTerm::LiChun, "2024-02-04 16:26:53"),
    (2024, SolarTerm::ChunFen, "2024-03-20 11:06:21"),
    (2024, SolarTerm::XiaZhi, "2024-06-21 04:50:46"),
    (2024, SolarTerm::QiuFen, "2024-09-22 20:43:27"),
    (2024, SolarTerm::DongZhi, "2024-12-21 17:20:34"),
    (1984, SolarTerm::LiChun, "1984-02-04 23:19:00"),
    (1990, SolarTerm::ChunFen, "1990-03-21 05:19:00"),
    (2000, SolarTerm::LiChun, "2000-02-04 20:40:00"),
    (2000, SolarTerm::XiaZhi, "2000-06-21 09:48:00"),
    (2000, SolarTerm::DongZhi, "2000-12-21 21:37:00"),
    (2010, SolarTerm::LiChun, "2010-02-04 06:48:00"),
    (2020, SolarTerm::LiChun, "2020-02-04 17:03:00"),
    (2020, SolarTerm::DongZhi, "2020-12-21 18:02:00"),
    (2023, SolarTerm::LiChun, "2023-02-04 10:42:00"),
    (2023, SolarTerm::ChunFen, "2023-03-21 05:24:00"),
    (2023, SolarTerm::QiuFen, "2023-09-23 14:50:00"),
    (2023, SolarTerm::DongZhi, "2023-12-22 11:27:00"),
];

#[test]
fn terms_match_published_times_within_a_minute() {
    let engine = ChartEngine::default();
    for &(year, term, published) in GOLDEN {
        let expected = NaiveDateTime::parse_from_str(published, "%Y-%m-%d %H:%M:%S").unwrap();
        let event = engine.year_terms(year).unwrap().get(term).copied().unwrap();
        let diff = (event.civil() - expected).num_seconds();
        assert!(
            diff.abs() <= 60,
            "{term} {year}: computed {}, published {expected} ({diff:+} s)",
            event.civil()
        );
    }
}

/// A birth four minutes before 2024's 立春 still belongs to 癸卯.
#[test]
fn birth_minutes_before_start_of_spring_keeps_the_old_year() {
    let engine = ChartEngine::new(EngineConfig {
        use_true_solar_time: false,
        ..EngineConfig::default()
    })
    .unwrap();
    let before = BirthInput::from_ymd_hms(2024, 2, 4, 16, 22, 0, Gender::Male).unwrap();
    let after = BirthInput::from_ymd_hms(2024, 2, 4, 16, 28, 0, Gender::Male).unwrap();
    assert_eq!(engine.chart(&before).unwrap().year().to_string(), "癸卯");
    assert_eq!(engine.chart(&after).unwrap().year().to_string(), "甲辰");
}
