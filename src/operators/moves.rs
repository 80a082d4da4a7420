//! Route mutation moves.
//!
//! Every move edits vehicle routes in place and keeps the multiset of
//! parcel indices unchanged. Moves that pick an empty (or too short) route
//! do nothing.
//!
//! # Moves
//!
//! - [`adjacent_swap`]: exchange two neighbouring stops (O(1))
//! - [`reinsert_between`]: move one stop to any vehicle (O(n))
//! - [`reinsert_within`]: move one stop inside its route (O(n))
//! - [`swallow_nearest`]: pull the globally nearest parcel next to a stop (O(total parcels))
//! - [`relocate_chain`]: move a contiguous run of stops, maybe reversed (O(n))
//! - [`two_opt`]: reverse a random segment (O(n))

use crate::model::{distance, Parcel, Vehicle};
use rand::Rng;

// ============================================================================
// Count-based moves
// ============================================================================

/// Swaps two adjacent stops of a random vehicle.
pub fn adjacent_swap<R: Rng>(vehicles: &mut [Vehicle], rng: &mut R) {
    let Some(v) = pick_vehicle(vehicles, rng) else {
        return;
    };
    let route = &mut vehicles[v].route;
    if route.len() < 2 {
        return;
    }
    let i = rng.random_range(0..route.len() - 1);
    route.swap(i, i + 1);
}

/// Removes a random stop from a non-empty vehicle and inserts it at a
/// random position of a random vehicle (possibly the same one).
pub fn reinsert_between<R: Rng>(vehicles: &mut [Vehicle], rng: &mut R) {
    let Some(from) = pick_vehicle(vehicles, rng) else {
        return;
    };
    if vehicles[from].route.is_empty() {
        return;
    }
    let to = rng.random_range(0..vehicles.len());
    let pop = rng.random_range(0..vehicles[from].route.len());
    let parcel = vehicles[from].route.remove(pop);
    let at = rng.random_range(0..=vehicles[to].route.len());
    vehicles[to].route.insert(at, parcel);
}

/// Moves a random stop of a random vehicle to a different position of
/// the same route.
pub fn reinsert_within<R: Rng>(vehicles: &mut [Vehicle], rng: &mut R) {
    let Some(v) = pick_vehicle(vehicles, rng) else {
        return;
    };
    let route = &mut vehicles[v].route;
    let n = route.len();
    if n < 2 {
        return;
    }
    let from = rng.random_range(0..n);
    let mut to = rng.random_range(0..n - 1);
    if to >= from {
        to += 1;
    }
    let parcel = route.remove(from);
    route.insert(to, parcel);
}

// ============================================================================
// Single-shot moves
// ============================================================================

/// Picks a random stop, finds the closest other parcel across the whole
/// fleet and moves that neighbour directly before or after the stop.
pub fn swallow_nearest<R: Rng>(vehicles: &mut [Vehicle], parcels: &[Parcel], rng: &mut R) {
    let Some(v) = pick_vehicle(vehicles, rng) else {
        return;
    };
    if vehicles[v].route.is_empty() {
        return;
    }
    let pos = rng.random_range(0..vehicles[v].route.len());
    let selected = vehicles[v].route[pos];
    let origin = parcels[selected].position;

    let mut nearest: Option<(usize, usize, f64)> = None;
    for (w, vehicle) in vehicles.iter().enumerate() {
        for (i, &idx) in vehicle.route.iter().enumerate() {
            if idx == selected {
                continue;
            }
            let d = distance(origin, parcels[idx].position);
            if nearest.map_or(true, |(_, _, best)| d < best) {
                nearest = Some((w, i, d));
            }
        }
    }
    let Some((w, i, _)) = nearest else {
        return;
    };

    let neighbour = vehicles[w].route.remove(i);
    // The selected stop shifts left if the neighbour sat before it.
    let pos = if w == v && i < pos { pos - 1 } else { pos };
    let at = if rng.random_bool(0.5) { pos } else { pos + 1 };
    vehicles[v].route.insert(at, neighbour);
}

/// Moves a contiguous run of up to `max_length` stops from one vehicle to
/// a position near a random index of another (possibly the same) vehicle.
///
/// The run is collected by walking from a random start in a random
/// direction, keeps its relative order when removed, and is inserted
/// either forward or reversed.
pub fn relocate_chain<R: Rng>(vehicles: &mut [Vehicle], max_length: usize, rng: &mut R) {
    if vehicles.is_empty() || max_length == 0 {
        return;
    }
    let to = rng.random_range(0..vehicles.len());
    let from = rng.random_range(0..vehicles.len());
    let n = vehicles[from].route.len();
    if n == 0 {
        return;
    }

    let start = rng.random_range(0..n);
    let length = rng.random_range(1..=max_length);
    let range = if rng.random_bool(0.5) {
        start..(start + length).min(n)
    } else {
        (start + 1).saturating_sub(length)..start + 1
    };
    let mut chain: Vec<usize> = vehicles[from].route.drain(range).collect();
    if rng.random_bool(0.5) {
        chain.reverse();
    }

    let target = &mut vehicles[to].route;
    let anchor = rng.random_range(0..=target.len()) as i64;
    let offset = rng.random_range(-2i64..=2);
    let at = (anchor + offset).clamp(0, target.len() as i64) as usize;
    target.splice(at..at, chain);
}

/// Reverses `route[i..k]` of a random vehicle for random `i <= k`.
pub fn two_opt<R: Rng>(vehicles: &mut [Vehicle], rng: &mut R) {
    let Some(v) = pick_vehicle(vehicles, rng) else {
        return;
    };
    let n = vehicles[v].route.len();
    if n < 2 {
        return;
    }
    let a = rng.random_range(0..=n);
    let b = rng.random_range(0..=n);
    vehicles[v].reverse_segment(a.min(b), a.max(b));
}

// ============================================================================
// Helpers
// ============================================================================

fn pick_vehicle<R: Rng>(vehicles: &[Vehicle], rng: &mut R) -> Option<usize> {
    if vehicles.is_empty() {
        None
    } else {
        Some(rng.random_range(0..vehicles.len()))
    }
}

// ============================================================================
// Tests
// ============================================================================
