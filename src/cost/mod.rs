//! Route cost model.
//!
//! Two interchangeable metrics, selected once per fleet:
//!
//! - [`CostMetric::AggregateDistance`]: sum over vehicles of the
//!   capacity-split path length. Fuel, wind and time are ignored.
//! - [`CostMetric::WorstCaseTime`]: maximum over vehicles of the total
//!   delivery time, with routes partitioned into fuel-, capacity- and
//!   wind-feasible sub-trips.
//!
//! An infeasible route costs `f64::INFINITY`, which the annealing
//! acceptance rule always rejects when coming from a finite cost.

mod path;
mod trip;
mod wind;

pub use path::{capacity_trips, route_length, trips_path};
pub use trip::{InfeasibleStop, TripContext, TripPlan};
pub use wind::{ground_speed, Wind};

use crate::model::{Parcel, Point, Vehicle};

/// Why a leg or sub-trip cannot be flown.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum Infeasible {
    #[error("cargo exceeds vehicle capacity")]
    OverCapacity,

    #[error("fuel runs out before the trip ends")]
    OutOfFuel,

    /// Fuel and cargo push the load factor so high that no usable airspeed
    /// remains.
    #[error("load leaves no usable airspeed")]
    Overloaded,

    #[error("wind speed {wind} is not below airspeed {airspeed}")]
    WindExceedsAirspeed { airspeed: f64, wind: f64 },
}

/// Objective minimized by the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CostMetric {
    /// Sum of capacity-split path lengths.
    #[default]
    AggregateDistance,

    /// Delivery time of the slowest vehicle.
    WorstCaseTime,
}

impl CostMetric {
    /// Cost of a single vehicle's route. `f64::INFINITY` when infeasible.
    pub fn vehicle_cost(
        &self,
        vehicle: &Vehicle,
        parcels: &[Parcel],
        base: Point,
        wind: Wind,
    ) -> f64 {
        match self {
            CostMetric::AggregateDistance => {
                route_length(&vehicle.route, parcels, vehicle.max_capacity, base)
            }
            CostMetric::WorstCaseTime => TripContext::new(vehicle, parcels, base, wind)
                .plan(&vehicle.route)
                .map_or(f64::INFINITY, |plan| plan.time),
        }
    }

    /// Folds per-vehicle costs into the fleet cost.
    pub fn combine<I: IntoIterator<Item = f64>>(&self, costs: I) -> f64 {
        match self {
            CostMetric::AggregateDistance => costs.into_iter().sum(),
            CostMetric::WorstCaseTime => costs.into_iter().fold(0.0, f64::max),
        }
    }

    /// Sub-trip partition used to draw a vehicle's path.
    ///
    /// Returns `None` for a route the time metric cannot fly.
    pub fn trips(
        &self,
        vehicle: &Vehicle,
        parcels: &[Parcel],
        base: Point,
        wind: Wind,
    ) -> Option<Vec<Vec<usize>>> {
        match self {
            CostMetric::AggregateDistance => {
                Some(capacity_trips(&vehicle.route, parcels, vehicle.max_capacity))
            }
            CostMetric::WorstCaseTime => TripContext::new(vehicle, parcels, base, wind)
                .plan(&vehicle.route)
                .ok()
                .map(|plan| plan.trips),
        }
    }
}
