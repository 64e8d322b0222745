use chrono::{Duration, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use ecocommute::models::{Location, NewRideOffer, NewTripRequest, RideOffer, TravelMode, TripRequest};
use ecocommute::services::RideMatcher;
use std::hint::black_box;
use uuid::Uuid;

/// Rides fanned out from around the city toward campus, with staggered
/// departures so only some fall inside the time window.
fn make_rides(count: usize) -> Vec<RideOffer> {
    let now = Utc::now();
    (0..count)
        .map(|i| {
            let offset = (i % 50) as f64 * 0.002;
            NewRideOffer {
                origin: Location::new(37.7749 + offset, -122.4194 + offset, "Origin"),
                destination: Location::new(37.8716, -122.2727, "Campus"),
                departure_time: now + Duration::minutes((i % 90) as i64),
                available_seats: 1 + (i % 4) as u32,
                route_waypoints: vec![],
                price_per_seat: 0.0,
            }
            .into_offer(Uuid::new_v4())
        })
        .collect()
}

fn make_request() -> TripRequest {
    NewTripRequest {
        origin: Location::new(37.7760, -122.4180, "16th St"),
        destination: Location::new(37.8700, -122.2740, "Library"),
        departure_time: Utc::now() + Duration::minutes(20),
        flexibility_minutes: 15,
        mode: TravelMode::Carpool,
        seats_needed: 1,
        is_recurring: false,
        recurring_days: vec![],
    }
    .into_trip(Uuid::new_v4())
}

fn benchmark_find_matches(c: &mut Criterion) {
    let matcher = RideMatcher::default();
    let request = make_request();

    let mut group = c.benchmark_group("find_matches");
    for size in [10, 100, 1000] {
        let rides = make_rides(size);
        group.bench_function(format!("{}_rides", size), |b| {
            b.iter(|| matcher.find_matches(black_box(&request), black_box(&rides)))
        });
    }
    group.finish();
}

fn benchmark_optimize_route(c: &mut Criterion) {
    let matcher = RideMatcher::default();
    let driver = Location::new(37.7749, -122.4194, "Driver");
    let campus = Location::new(37.8716, -122.2727, "Campus");

    // A full car
    let passengers: Vec<TripRequest> = (0..7).map(|_| make_request()).collect();

    c.bench_function("optimize_route_7_passengers", |b| {
        b.iter(|| matcher.optimize_route(black_box(&driver), black_box(&campus), black_box(&passengers)))
    });
}

criterion_group!(benches, benchmark_find_matches, benchmark_optimize_route);
criterion_main!(benches);
