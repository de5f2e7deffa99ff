use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use sizhu::pillars::day_pillar;
use sizhu::{
    BirthInput, Branch, ChartEngine, ChartError, CityTable, EngineConfig, Ephemeris, Epoch,
    GanZhi, Gender, Location, LowPrecisionSun, Place, SolarTerm, SolarTermCache,
    StandardMeridian, TermSource, TimeCorrection, TT,
};

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
}

fn civil_engine() -> ChartEngine {
    ChartEngine::new(EngineConfig {
        use_true_solar_time: false,
        ..EngineConfig::default()
    })
    .unwrap()
}

fn year_position(engine: &ChartEngine, civil: NaiveDateTime) -> u8 {
    let input = BirthInput::new(civil, Gender::Male);
    engine.chart(&input).unwrap().year().ganzhi().position()
}

#[test]
fn start_of_spring_1984_opens_jia_zi() {
    let engine = civil_engine();
    // 立春 1984 fell at 23:19 on Feb 4, Beijing time.
    assert_eq!(year_position(&engine, at(1984, 2, 5, 12, 0, 0)), 0);
    assert_eq!(year_position(&engine, at(1984, 2, 4, 12, 0, 0)), 59);
    assert_eq!(year_position(&engine, at(1984, 2, 3, 12, 0, 0)), 59);
}

#[test]
fn one_second_either_side_of_start_of_spring() {
    let engine = civil_engine();
    for year in [1901, 1950, 1984, 2000, 2024, 2099] {
        let terms = engine.year_terms(year).unwrap();
        let boundary = terms.start_of_spring().civil();
        let before = year_position(&engine, boundary - Duration::seconds(1));
        let after = year_position(&engine, boundary + Duration::seconds(1));
        assert_eq!((before + 1) % 60, after, "{year}");
        assert_eq!(GanZhi::from_position(i64::from(year) - 4).position(), after);
    }
}

#[test]
fn day_pillar_of_2000_01_01_and_2000_03_01() {
    let jan = day_pillar(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
    let mar = day_pillar(NaiveDate::from_ymd_opt(2000, 3, 1).unwrap());
    assert_eq!(jan.position(), 54);
    assert_eq!(jan, mar);
    assert_eq!(jan.to_string(), "戊午");
}

#[test]
fn day_pillars_repeat_every_sixty_days() {
    let mut d = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2100, 12, 31).unwrap();
    while d + Duration::days(60) <= end {
        assert_eq!(day_pillar(d), day_pillar(d + Duration::days(60)), "{d}");
        assert_eq!(
            day_pillar(d + Duration::days(1)),
            day_pillar(d).offset(1),
            "{d}"
        );
        d += Duration::days(37);
    }
}

#[test]
fn year_pillars_repeat_every_sixty_years() {
    let engine = civil_engine();
    for year in [1910, 1955, 1999, 2030] {
        let a = year_position(&engine, at(year, 7, 1, 12, 0, 0));
        let b = year_position(&engine, at(year + 60, 7, 1, 12, 0, 0));
        assert_eq!(a, b, "{year}");
    }
}

#[test]
fn five_degrees_east_on_day_81() {
    // 2023-03-22 is the 81st day of the year.
    let civil = at(2023, 3, 22, 12, 0, 0);
    let place = Location::new("东经125", 125.0, 40.0);
    let c = TimeCorrection::compute(civil, &place, StandardMeridian::BEIJING);
    assert_eq!(c.longitude_minutes, 20.0);
    assert!((c.equation_of_time_minutes - (-7.53)).abs() < 1e-12);
    assert!((c.total_minutes - (20.0 - 7.53)).abs() < 1e-9);
    assert_eq!(
        sizhu::true_solar_time(civil, Some(&place), StandardMeridian::BEIJING),
        c.corrected
    );
}

#[test]
fn minute_before_start_of_spring_is_chou_month_of_previous_year() {
    let engine = civil_engine();
    let lichun = engine.year_terms(2024).unwrap().start_of_spring().civil();
    let instant = lichun - Duration::minutes(1);

    let span = engine.month(instant).unwrap();
    assert_eq!(span.branch(), Branch::Chou);

    let chart = engine.chart(&BirthInput::new(instant, Gender::Female)).unwrap();
    assert_eq!(chart.solar_year(), 2023);
    assert_eq!(chart.year().to_string(), "癸卯");
    assert_eq!(chart.month().to_string(), "乙丑");
}

#[test]
fn every_year_has_twenty_four_ordered_terms() {
    let engine = civil_engine();
    for year in (1900..=2100).step_by(20) {
        let terms = engine.year_terms(year).unwrap();
        assert_eq!(terms.events().len(), 24, "{year}");
        assert_eq!(terms.start_of_spring().term(), SolarTerm::LiChun);
        assert_eq!(terms.events()[23].term(), SolarTerm::DaHan);
        for pair in terms.events().windows(2) {
            assert!(pair[0].jd() < pair[1].jd(), "{year}");
            let step = (pair[1].longitude_deg() + 360 - pair[0].longitude_deg()) % 360;
            assert_eq!(step, 15, "{year}");
        }
        assert_eq!(terms.jie().count(), 12);
    }
}

#[test]
fn unknown_place_keeps_civil_time() {
    let engine = ChartEngine::default();
    let civil = at(1990, 5, 17, 6, 45, 0);
    let input = BirthInput::new(civil, Gender::Male).with_place("Nowhere");
    let chart = engine.chart(&input).unwrap();
    assert_eq!(chart.corrected(), civil);
    assert!(chart.place().is_none());
    assert_eq!(engine.true_solar_time(civil, Some(&Place::from("Nowhere"))), civil);
}

#[test]
fn named_and_coordinate_places_agree() {
    let engine = ChartEngine::default();
    let civil = at(1990, 5, 17, 6, 45, 0);
    let by_name = engine.true_solar_time(civil, Some(&Place::from("成都市")));
    let by_coords = engine.true_solar_time(
        civil,
        Some(&Place::At(Location::new("成都", 104.0657, 30.6595))),
    );
    assert_eq!(by_name, by_coords);
    assert!(civil - by_name > Duration::minutes(45));
}

#[test]
fn concurrent_charts_match_sequential_ones() {
    let engine = ChartEngine::default();
    let inputs: Vec<BirthInput> = (0..16)
        .map(|i| {
            BirthInput::new(at(1960 + i * 3, 1 + (i as u32 % 12), 15, 23, 30, 0), Gender::Male)
                .with_place("西安")
        })
        .collect();
    let sequential: Vec<_> = inputs.iter().map(|i| engine.chart(i).unwrap()).collect();

    engine.cache().clear();
    let engine = &engine;
    let concurrent: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|input| scope.spawn(move || engine.chart(input).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(sequential, concurrent);
}

#[test]
fn engines_can_share_a_cache() {
    let cache = Arc::new(SolarTermCache::new(8));
    let a = ChartEngine::default().with_cache(Arc::clone(&cache));
    let b = ChartEngine::default().with_cache(Arc::clone(&cache));
    let first = a.year_terms(2012).unwrap();
    let second = b.year_terms(2012).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.stats().hits, 1);
    assert_eq!(cache.stats().misses, 1);
}

#[test]
fn boxed_ephemeris_is_accepted() {
    let ephemeris: Box<dyn Ephemeris> = Box::new(LowPrecisionSun);
    let engine =
        ChartEngine::with_parts(EngineConfig::default(), ephemeris, CityTable::china()).unwrap();
    let input = BirthInput::from_ymd_hms(2024, 2, 10, 12, 0, 0, Gender::Male).unwrap();
    assert_eq!(engine.chart(&input).unwrap().year().to_string(), "甲辰");
}

struct Frozen;

impl Ephemeris for Frozen {
    fn apparent_longitude_deg(&self, _jd: Epoch<TT>) -> f64 {
        42.0
    }
}

#[test]
fn search_failure_surfaces_as_convergence_error() {
    let engine = ChartEngine::with_parts(EngineConfig::default(), Frozen, CityTable::china()).unwrap();
    let input = BirthInput::from_ymd_hms(2024, 6, 1, 12, 0, 0, Gender::Male).unwrap();
    match engine.chart(&input) {
        Err(ChartError::Convergence(err)) => assert_eq!(err.term, SolarTerm::LiChun),
        other => panic!("expected a convergence error, got {other:?}"),
    }
    assert!(engine.cache().is_empty());
}

#[cfg(feature = "serde")]
#[test]
fn serde_chart_keeps_symbol_literals() {
    let engine = civil_engine();
    let input = BirthInput::new(at(1984, 2, 5, 12, 0, 0), Gender::Male);
    let chart = engine.chart(&input).unwrap();
    let json = serde_json::to_string(&chart).unwrap();
    assert!(json.contains("\"甲子\""));
    assert!(json.contains("\"男\""));
    assert!(json.contains("\"立春\""));

    let gz: GanZhi = serde_json::from_str("\"癸亥\"").unwrap();
    assert_eq!(gz.position(), 59);
    let config: EngineConfig = serde_json::from_str(r#"{"cache_capacity": 4}"#).unwrap();
    assert_eq!(config.cache_capacity, 4);
    assert_eq!(config.standard_meridian_deg, 120.0);
}
