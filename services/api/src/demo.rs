use crate::infra::{find_route, parse_terrain, parse_weather, sample_fleet, InMemoryTripLedger};
use chrono::Utc;
use clap::Args;
use fleet_ai::config::AppConfig;
use fleet_ai::error::AppError;
use fleet_ai::workflows::allocation::{
    RecommendationResult, RecommendationSession, RosterImporter, RouteProfile,
    ScoredVehicle, SessionId, Simulation, Terrain, TripParameters, TripRecord, Vehicle, VehicleId,
    Weather,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct RecommendArgs {
    /// Route identifier, e.g. RT001
    #[arg(value_parser = find_route)]
    pub(crate) route: RouteProfile,
    /// Cargo weight in kilograms
    #[arg(long, default_value_t = 12_000)]
    pub(crate) load_weight: u32,
    /// Forecast weather (clear, rain, fog, storm)
    #[arg(long, value_parser = parse_weather, default_value = "clear")]
    pub(crate) weather: Weather,
    /// Override the route's terrain (highway, mixed, mountain)
    #[arg(long, value_parser = parse_terrain)]
    pub(crate) terrain: Option<Terrain>,
    /// Vehicle roster CSV export. Defaults to APP_VEHICLE_ROSTER, then the built-in fleet.
    #[arg(long)]
    pub(crate) roster: Option<PathBuf>,
    /// Promote one of the listed alternatives before simulating or confirming
    #[arg(long)]
    pub(crate) swap_to: Option<String>,
    /// Show the recommended vehicle's risk at a different load
    #[arg(long)]
    pub(crate) simulate_load: Option<u32>,
    /// Dry-run the trip submission against a throwaway in-memory ledger
    #[arg(long)]
    pub(crate) confirm: bool,
}

pub(crate) async fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let RecommendArgs {
        route,
        load_weight,
        weather,
        terrain,
        roster,
        swap_to,
        simulate_load,
        confirm,
    } = args;

    let config = AppConfig::load()?;
    let (vehicles, source) = load_roster(roster.or_else(|| config.dispatch.vehicle_roster.clone()))?;

    let mut trip = route.plan(load_weight, weather);
    if let Some(terrain) = terrain {
        trip.terrain = terrain;
    }

    render_trip(&route, &trip, &source, &vehicles);

    let mut session = RecommendationSession::new(SessionId("cli".to_string()));
    let result = session.score(trip, &vehicles)?;
    render_result(result);

    if let Some(vehicle) = swap_to {
        let result = session.swap(&VehicleId(vehicle.trim().to_string()))?;
        println!("\nAfter swapping to {}", result.recommended.id());
        render_result(result);
    }

    if let Some(load) = simulate_load {
        let simulation = session.simulate(load)?;
        render_simulation(&simulation);
    }

    if confirm {
        let ledger = InMemoryTripLedger::default();
        let record = session
            .confirm(&ledger, Utc::now(), &config.dispatch)
            .await?;
        render_confirmation(&record);
    }

    Ok(())
}

fn load_roster(path: Option<PathBuf>) -> Result<(Vec<Vehicle>, String), AppError> {
    match path {
        Some(path) => {
            let vehicles = RosterImporter::from_path(&path)?;
            Ok((vehicles, format!("CSV export {}", path.display())))
        }
        None => Ok((sample_fleet(), "built-in sample fleet".to_string())),
    }
}

fn render_trip(route: &RouteProfile, trip: &TripParameters, source: &str, vehicles: &[Vehicle]) {
    println!("Trip allocation");
    println!(
        "Route {} ({}) | {} km | {} terrain | {} weather | {} kg",
        route.id,
        route.name,
        trip.distance,
        trip.terrain.label(),
        trip.weather.label(),
        trip.load_weight
    );
    let active = vehicles.iter().filter(|vehicle| vehicle.is_eligible()).count();
    println!(
        "Roster: {} ({} vehicles, {} active)",
        source,
        vehicles.len(),
        active
    );
}

fn render_result(result: &RecommendationResult) {
    println!("\nRecommended vehicle");
    println!("- {}", candidate_line(&result.recommended));
    let anomalies = &result.recommended.vehicle.anomalies;
    if !anomalies.is_empty() {
        println!("  Anomalies: {}", anomalies.join(", "));
    }

    if result.alternatives.is_empty() {
        println!("\nAlternatives: none");
    } else {
        println!("\nAlternatives");
        for candidate in &result.alternatives {
            println!("- {}", candidate_line(candidate));
        }
    }

    println!("\nDecision factors");
    for factor in &result.factors {
        println!(
            "- {}: {} ({} impact)",
            factor.name,
            factor.value,
            factor.impact.label()
        );
    }
}

fn candidate_line(candidate: &ScoredVehicle) -> String {
    format!(
        "{} {} [{}] | risk {}% ({}) | confidence {}%",
        candidate.id(),
        candidate.vehicle.name,
        candidate.vehicle.category,
        candidate.calculated_risk,
        candidate.risk_band().label(),
        candidate.confidence
    )
}

fn render_simulation(simulation: &Simulation) {
    println!("\nWhat-if simulation for {}", simulation.vehicle_id);
    println!(
        "- {} kg -> {} kg: risk {}% -> {}%",
        simulation.trip_load_weight,
        simulation.hypothetical_load,
        simulation.calculated_risk,
        simulation.simulated_risk
    );
}

fn render_confirmation(record: &TripRecord) {
    println!();
    for line in confirmation_lines(record) {
        println!("{line}");
    }
}

/// The demo ledger lives only for this run, so nothing is persisted.
fn confirmation_lines(record: &TripRecord) -> Vec<String> {
    vec![
        "Trip accepted (dry run, not persisted)".to_string(),
        format!(
            "- {} on {} with driver {} | risk {}% | confidence {}%",
            record.vehicle, record.route, record.driver, record.breakdown_risk, record.ai_confidence
        ),
        format!(
            "- Departs {} | expected arrival {}",
            record.start_time.format("%Y-%m-%d %H:%M UTC"),
            record.expected_end.format("%Y-%m-%d %H:%M UTC")
        ),
    ]
}
