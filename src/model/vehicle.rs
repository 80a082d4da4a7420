//! Delivery vehicles and their routes.

use crate::cost::Wind;

/// A drone with its flight parameters and the ordered route it serves.
///
/// `route` holds indices into the owning fleet's parcel table. It is the
/// only state the search mutates; everything else is fixed at setup.
///
/// # Defaults
///
/// [`Vehicle::new`] produces an "ideal" drone whose speed and burn rate do
/// not depend on load and whose fuel never runs out (`mass = inf`,
/// `max_fuel = 0`, `base_fuel_consumption = 0`). Use the `with_*` builders
/// to enable the full flight model.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vehicle {
    pub id: u32,

    /// Maximum cargo weight per sub-trip.
    pub max_capacity: f64,

    /// Airspeed of an unloaded, unfuelled drone.
    pub max_speed: f64,

    /// Dry mass. Divides the load exponent of the speed and burn-rate model.
    pub mass: f64,

    /// Fuel on board when leaving base.
    pub max_fuel: f64,

    /// Burn rate of an unloaded, unfuelled drone (fuel per time unit).
    pub base_fuel_consumption: f64,

    /// Cruise altitude. Every landing costs a descent and a climb of this height.
    pub altitude: f64,

    /// How many times slower vertical flight is than horizontal airspeed.
    pub altitude_factor: f64,

    /// Wind seen by this drone. `None` inherits the fleet wind.
    pub wind: Option<Wind>,

    /// Loading time spent at base once per sub-trip.
    pub waiting_at_base: f64,

    /// Hand-over time spent at every client stop.
    pub waiting_at_client: f64,

    pub route: Vec<usize>,
}

impl Vehicle {
    pub fn new(id: u32, max_capacity: f64, max_speed: f64) -> Self {
        Self {
            id,
            max_capacity,
            max_speed,
            mass: f64::INFINITY,
            max_fuel: 0.0,
            base_fuel_consumption: 0.0,
            altitude: 0.0,
            altitude_factor: 1.0,
            wind: None,
            waiting_at_base: 0.0,
            waiting_at_client: 0.0,
            route: Vec::new(),
        }
    }

    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_fuel(mut self, max_fuel: f64, base_fuel_consumption: f64) -> Self {
        self.max_fuel = max_fuel;
        self.base_fuel_consumption = base_fuel_consumption;
        self
    }

    pub fn with_altitude(mut self, altitude: f64, factor: f64) -> Self {
        self.altitude = altitude;
        self.altitude_factor = factor;
        self
    }

    pub fn with_waiting(mut self, at_base: f64, at_client: f64) -> Self {
        self.waiting_at_base = at_base;
        self.waiting_at_client = at_client;
        self
    }

    pub fn with_wind(mut self, wind: Wind) -> Self {
        self.wind = Some(wind);
        self
    }

    pub fn with_route(mut self, route: Vec<usize>) -> Self {
        self.route = route;
        self
    }

    pub fn len(&self) -> usize {
        self.route.len()
    }

    pub fn is_empty(&self) -> bool {
        self.route.is_empty()
    }

    /// Wind this vehicle flies in, given the fleet-wide wind.
    pub fn effective_wind(&self, fleet_wind: Wind) -> Wind {
        self.wind.unwrap_or(fleet_wind)
    }

    /// Reverses `route[i..k]` in place (2-opt move).
    ///
    /// Applying the same reversal twice restores the original order.
    ///
    /// # Panics
    /// Panics if `i > k` or `k > len`.
    pub fn reverse_segment(&mut self, i: usize, k: usize) {
        self.route[i..k].reverse();
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        let positive = [
            ("max_capacity", self.max_capacity),
            ("max_speed", self.max_speed),
            ("mass", self.mass),
            ("altitude_factor", self.altitude_factor),
        ];
        for (name, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(format!("{name} must be positive, got {value}"));
            }
        }
        if !self.max_speed.is_finite() {
            return Err("max_speed must be finite".into());
        }
        let non_negative = [
            ("max_fuel", self.max_fuel),
            ("base_fuel_consumption", self.base_fuel_consumption),
            ("altitude", self.altitude),
            ("waiting_at_base", self.waiting_at_base),
            ("waiting_at_client", self.waiting_at_client),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(format!(
                    "{name} must be finite and non-negative, got {value}"
                ));
            }
        }
        Ok(())
    }
}
