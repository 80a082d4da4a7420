//! Sub-trip simulation and greedy route partitioning for the
//! worst-case-time metric.
//!
//! Everything here is a pure function of the route and the vehicle
//! parameters: a trip is simulated from a fresh state every time, so the
//! result never depends on what was evaluated before.

use super::wind::{ground_speed, Wind};
use super::Infeasible;
use crate::model::{distance, Parcel, Point, Vehicle};

/// Read-only inputs for simulating one vehicle.
#[derive(Debug, Clone, Copy)]
pub struct TripContext<'a> {
    pub vehicle: &'a Vehicle,
    pub parcels: &'a [Parcel],
    pub base: Point,
    pub wind: Wind,
}

/// Route partition into feasible sub-trips and the total time to fly them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TripPlan {
    pub trips: Vec<Vec<usize>>,
    pub time: f64,
}

/// A parcel that cannot be flown even on a trip of its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InfeasibleStop {
    /// Index into the parcel table.
    pub parcel: usize,
    pub cause: Infeasible,
}

struct FlightState {
    position: Point,
    fuel: f64,
    cargo: f64,
    time: f64,
}

impl<'a> TripContext<'a> {
    pub fn new(vehicle: &'a Vehicle, parcels: &'a [Parcel], base: Point, fleet_wind: Wind) -> Self {
        Self {
            vehicle,
            parcels,
            base,
            wind: vehicle.effective_wind(fleet_wind),
        }
    }

    /// Flies one leg from the current position to `to`.
    ///
    /// Airspeed and burn rate are taken from the state at the start of the
    /// leg: `v = max_speed / e^((fuel + cargo) / mass)` and
    /// `burn = base_fuel_consumption * e^((fuel + cargo) / mass)`.
    fn fly(&self, state: &mut FlightState, to: Point) -> Result<(), Infeasible> {
        let v = self.vehicle;
        let load = ((state.fuel + state.cargo) / v.mass).exp();
        let airspeed = v.max_speed / load;
        let burn_rate = v.base_fuel_consumption * load;
        if !(airspeed > 0.0 && airspeed.is_finite()) {
            return Err(Infeasible::Overloaded);
        }

        let heading = (to.x - state.position.x, to.y - state.position.y);
        let ground = ground_speed(airspeed, self.wind, heading)?;
        let vertical = 2.0 * v.altitude * v.altitude_factor / airspeed;
        let flight_time = distance(state.position, to) / ground + vertical;

        state.fuel -= burn_rate * flight_time;
        if state.fuel < 0.0 {
            return Err(Infeasible::OutOfFuel);
        }
        state.time += flight_time;
        state.position = to;
        Ok(())
    }

    /// Simulates one outbound/return cycle serving `stops` in order.
    ///
    /// The drone leaves base fully fuelled with the whole sub-trip cargo on
    /// board and unloads each parcel at its stop. The returned time includes
    /// the loading time at base and the hand-over time at every stop.
    pub fn simulate_trip(&self, stops: &[usize]) -> Result<f64, Infeasible> {
        let v = self.vehicle;
        let cargo: f64 = stops.iter().map(|&idx| self.parcels[idx].weight).sum();
        if cargo > v.max_capacity {
            return Err(Infeasible::OverCapacity);
        }

        let mut state = FlightState {
            position: self.base,
            fuel: v.max_fuel,
            cargo,
            time: v.waiting_at_base,
        };
        for &idx in stops {
            let parcel = &self.parcels[idx];
            self.fly(&mut state, parcel.position)?;
            state.cargo -= parcel.weight;
            state.time += v.waiting_at_client;
        }
        self.fly(&mut state, self.base)?;
        Ok(state.time)
    }

    /// Partitions `route` greedily into feasible sub-trips.
    ///
    /// Parcels are appended to the open sub-trip while it stays feasible.
    /// When the next parcel would break it, the open sub-trip is closed and a
    /// new one starts with that parcel.
    ///
    /// # Errors
    /// Returns the first parcel that is infeasible on a trip of its own.
    pub fn plan(&self, route: &[usize]) -> Result<TripPlan, InfeasibleStop> {
        let mut plan = TripPlan::default();
        let mut current: Vec<usize> = Vec::new();
        let mut current_time = 0.0;

        for &idx in route {
            current.push(idx);
            match self.simulate_trip(&current) {
                Ok(time) => current_time = time,
                Err(cause) => {
                    current.pop();
                    if current.is_empty() {
                        return Err(InfeasibleStop { parcel: idx, cause });
                    }
                    plan.trips.push(std::mem::take(&mut current));
                    plan.time += current_time;

                    current.push(idx);
                    current_time = self
                        .simulate_trip(&current)
                        .map_err(|cause| InfeasibleStop { parcel: idx, cause })?;
                }
            }
        }
        if !current.is_empty() {
            plan.trips.push(current);
            plan.time += current_time;
        }
        Ok(plan)
    }
}
