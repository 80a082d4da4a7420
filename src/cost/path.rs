//! Capacity-split path for the aggregate-distance metric.

use crate::model::{polyline_length, Parcel, Point};

/// Splits `route` into trips by capacity alone.
///
/// Parcels are taken in order; when the running weight would exceed
/// `capacity` a new trip starts with the current parcel. Fuel, wind and
/// time are ignored. A parcel heavier than `capacity` still gets its own
/// trip.
pub fn capacity_trips(route: &[usize], parcels: &[Parcel], capacity: f64) -> Vec<Vec<usize>> {
    let mut trips = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    let mut occupied = 0.0;

    for &idx in route {
        let weight = parcels[idx].weight;
        if !current.is_empty() && occupied + weight > capacity {
            trips.push(std::mem::take(&mut current));
            occupied = 0.0;
        }
        occupied += weight;
        current.push(idx);
    }
    if !current.is_empty() {
        trips.push(current);
    }
    trips
}

/// Ordered points flown for a sequence of trips, starting and ending at `base`.
///
/// Consecutive trips share the base visit between them. No trips yields
/// `[base, base]`.
pub fn trips_path(trips: &[Vec<usize>], parcels: &[Parcel], base: Point) -> Vec<Point> {
    let stops: usize = trips.iter().map(Vec::len).sum();
    let mut path = Vec::with_capacity(stops + trips.len() + 1);
    path.push(base);
    for trip in trips {
        path.extend(trip.iter().map(|&idx| parcels[idx].position));
        path.push(base);
    }
    if path.len() == 1 {
        path.push(base);
    }
    path
}

/// Length of the capacity-split path of `route`.
pub fn route_length(route: &[usize], parcels: &[Parcel], capacity: f64, base: Point) -> f64 {
    let trips = capacity_trips(route, parcels, capacity);
    polyline_length(&trips_path(&trips, parcels, base))
}
