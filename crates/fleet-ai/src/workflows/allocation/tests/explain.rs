use super::common::{fleet, highway_trip, trip, vehicle};
use crate::workflows::allocation::{
    build_factors, score, FactorKind, ImpactLevel, Terrain, Weather,
};

#[test]
fn builds_six_factors_in_display_order() {
    let roster = fleet();
    let trip = highway_trip();
    let scored = score(&roster[3], &trip);

    let factors = build_factors(&scored, &trip);

    let names: Vec<&str> = factors.iter().map(|factor| factor.name.as_str()).collect();
    let expected: Vec<&str> = FactorKind::ALL.iter().map(|kind| kind.label()).collect();
    assert_eq!(names, expected);

    let rendered: Vec<(ImpactLevel, &str)> = factors
        .iter()
        .map(|factor| (factor.impact, factor.value.as_str()))
        .collect();
    assert_eq!(
        rendered,
        vec![
            (ImpactLevel::High, "95%"),
            (ImpactLevel::Low, "12000 kg"),
            (ImpactLevel::Low, "highway"),
            (ImpactLevel::Low, "clear"),
            (ImpactLevel::Low, "99%"),
            (ImpactLevel::Medium, "156 trips"),
        ]
    );
}

#[test]
fn harsh_conditions_raise_impacts() {
    let conditions = trip(16_000, Terrain::Mountain, Weather::Fog);
    let scored = score(&vehicle("VH005", 35, 90), &conditions);

    let factors = build_factors(&scored, &conditions);

    assert_eq!(factors[1].impact, ImpactLevel::Medium);
    assert_eq!(factors[2].impact, ImpactLevel::Medium);
    assert_eq!(factors[2].value, "mountain");
    assert_eq!(factors[3].impact, ImpactLevel::High);
    // Exactly 90% is not considered well instrumented.
    assert_eq!(factors[4].impact, ImpactLevel::Medium);
}

#[test]
fn mixed_terrain_and_rain_impacts() {
    let conditions = trip(15_000, Terrain::Mixed, Weather::Rain);
    let scored = score(&vehicle("VH001", 23, 95), &conditions);

    let factors = build_factors(&scored, &conditions);

    assert_eq!(factors[1].impact, ImpactLevel::Low);
    assert_eq!(factors[2].impact, ImpactLevel::Medium);
    assert_eq!(factors[3].impact, ImpactLevel::High);
    assert_eq!(factors[3].value, "rain");
}
