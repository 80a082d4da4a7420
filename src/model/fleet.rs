//! The optimization problem instance: base, wind, vehicles and parcels.

use super::parcel::Parcel;
use super::point::{polyline_length, Point};
use super::snapshot::RouteSnapshot;
use super::vehicle::Vehicle;
use crate::cost::{trips_path, CostMetric, TripContext, Wind};
use crate::error::FleetError;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use std::collections::HashSet;
use std::fmt;

/// Vehicles, parcels and the shared environment they fly in.
///
/// Every parcel is referenced by exactly one vehicle route once the fleet
/// has been distributed. Operators keep that invariant; see
/// [`Fleet::is_conserved`].
#[derive(Debug, Clone, PartialEq)]
pub struct Fleet {
    base: Point,
    wind: Wind,
    metric: CostMetric,
    vehicles: Vec<Vehicle>,
    parcels: Vec<Parcel>,
    scale: f64,
}

impl Fleet {
    /// Builds and validates a fleet.
    ///
    /// Routes already present on the vehicles must reference valid parcel
    /// indices without repetition.
    ///
    /// # Errors
    /// - [`FleetError::NoVehicles`] for an empty vehicle list
    /// - [`FleetError::DuplicateVehicle`] / [`FleetError::DuplicateParcel`]
    /// - [`FleetError::InvalidVehicle`] / [`FleetError::InvalidParcel`] for
    ///   out-of-range parameters or broken routes
    /// - [`FleetError::UnroutableParcel`] when no vehicle can deliver a
    ///   parcel on a trip of its own under `metric`
    pub fn new(
        base: impl Into<Point>,
        wind: impl Into<Wind>,
        metric: CostMetric,
        vehicles: Vec<Vehicle>,
        parcels: Vec<Parcel>,
    ) -> Result<Self, FleetError> {
        let fleet = Self {
            base: base.into(),
            wind: wind.into(),
            metric,
            scale: compute_scale(&parcels),
            vehicles,
            parcels,
        };
        fleet.validate()?;
        Ok(fleet)
    }

    fn validate(&self) -> Result<(), FleetError> {
        if self.vehicles.is_empty() {
            return Err(FleetError::NoVehicles);
        }

        let mut vehicle_ids = HashSet::new();
        for vehicle in &self.vehicles {
            if !vehicle_ids.insert(vehicle.id) {
                return Err(FleetError::DuplicateVehicle { id: vehicle.id });
            }
            vehicle.validate().map_err(|reason| FleetError::InvalidVehicle {
                id: vehicle.id,
                reason,
            })?;
        }

        let mut parcel_ids = HashSet::new();
        for parcel in &self.parcels {
            if !parcel_ids.insert(parcel.id) {
                return Err(FleetError::DuplicateParcel { id: parcel.id });
            }
            parcel.validate().map_err(|reason| FleetError::InvalidParcel {
                id: parcel.id,
                reason,
            })?;
        }

        let mut seen = vec![false; self.parcels.len()];
        for vehicle in &self.vehicles {
            for &idx in &vehicle.route {
                let fresh = seen.get_mut(idx).map(|s| !std::mem::replace(s, true));
                if fresh != Some(true) {
                    return Err(FleetError::InvalidVehicle {
                        id: vehicle.id,
                        reason: format!(
                            "route references parcel index {idx} twice or out of range"
                        ),
                    });
                }
            }
        }

        for (idx, parcel) in self.parcels.iter().enumerate() {
            if self.eligible_vehicles(idx).is_empty() {
                return Err(FleetError::UnroutableParcel { id: parcel.id });
            }
        }
        Ok(())
    }

    pub fn base(&self) -> Point {
        self.base
    }

    pub fn wind(&self) -> Wind {
        self.wind
    }

    pub fn metric(&self) -> CostMetric {
        self.metric
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub(crate) fn vehicles_mut(&mut self) -> &mut [Vehicle] {
        &mut self.vehicles
    }

    pub fn parcels(&self) -> &[Parcel] {
        &self.parcels
    }

    /// Split borrow used by operators that read parcel positions while
    /// editing routes.
    pub(crate) fn parts_mut(&mut self) -> (&mut [Vehicle], &[Parcel]) {
        (&mut self.vehicles, &self.parcels)
    }

    /// Normalization constant: the larger side of the parcel bounding box.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Indices of vehicles able to deliver parcel `idx` on a trip of its own.
    pub fn eligible_vehicles(&self, idx: usize) -> Vec<usize> {
        let parcel = &self.parcels[idx];
        self.vehicles
            .iter()
            .enumerate()
            .filter(|(_, vehicle)| match self.metric {
                CostMetric::AggregateDistance => parcel.weight <= vehicle.max_capacity,
                CostMetric::WorstCaseTime => {
                    TripContext::new(vehicle, &self.parcels, self.base, self.wind)
                        .simulate_trip(&[idx])
                        .is_ok()
                }
            })
            .map(|(v, _)| v)
            .collect()
    }

    /// Clears all routes and hands every parcel, in random order, to a
    /// vehicle drawn uniformly among those able to carry it alone.
    pub fn distribute<R: Rng>(&mut self, rng: &mut R) {
        let eligible: Vec<Vec<usize>> = (0..self.parcels.len())
            .map(|idx| self.eligible_vehicles(idx))
            .collect();

        for vehicle in &mut self.vehicles {
            vehicle.route.clear();
        }
        let mut order: Vec<usize> = (0..self.parcels.len()).collect();
        order.shuffle(rng);
        for idx in order {
            // Validation guarantees at least one eligible vehicle.
            if let Some(&v) = eligible[idx].choose(rng) {
                self.vehicles[v].route.push(idx);
            }
        }
    }

    /// Cost of every vehicle under the active metric.
    pub fn vehicle_costs(&self) -> Vec<f64> {
        self.vehicles
            .iter()
            .map(|v| self.metric.vehicle_cost(v, &self.parcels, self.base, self.wind))
            .collect()
    }

    /// Fleet cost under the active metric. `f64::INFINITY` if any route is
    /// infeasible.
    pub fn cost(&self) -> f64 {
        self.metric.combine(
            self.vehicles
                .iter()
                .map(|v| self.metric.vehicle_cost(v, &self.parcels, self.base, self.wind)),
        )
    }

    /// Ordered points flown by each vehicle, base to base.
    ///
    /// A vehicle whose route is infeasible under the time metric is drawn
    /// as a single unsplit tour.
    pub fn paths(&self) -> Vec<Vec<Point>> {
        self.vehicles
            .iter()
            .map(|v| {
                let trips = self
                    .metric
                    .trips(v, &self.parcels, self.base, self.wind)
                    .unwrap_or_else(|| vec![v.route.clone()]);
                trips_path(&trips, &self.parcels, self.base)
            })
            .collect()
    }

    /// Total distance flown, regardless of the active metric.
    pub fn total_distance(&self) -> f64 {
        self.paths().iter().map(|p| polyline_length(p)).sum()
    }

    pub fn snapshot(&self) -> RouteSnapshot {
        RouteSnapshot {
            routes: self
                .vehicles
                .iter()
                .map(|v| (v.id, v.route.clone()))
                .collect(),
        }
    }

    /// Puts every route back to the state saved in `snapshot`.
    ///
    /// Vehicles absent from the snapshot are left untouched.
    pub fn restore(&mut self, snapshot: &RouteSnapshot) {
        for vehicle in &mut self.vehicles {
            if let Some(route) = snapshot.route(vehicle.id) {
                vehicle.route.clear();
                vehicle.route.extend_from_slice(route);
            }
        }
    }

    /// Parcel ids per vehicle, in route order.
    pub fn route_ids(&self) -> Vec<(u32, Vec<u32>)> {
        self.vehicles
            .iter()
            .map(|v| (v.id, v.route.iter().map(|&idx| self.parcels[idx].id).collect()))
            .collect()
    }

    /// True when the routes together reference every parcel exactly once.
    pub fn is_conserved(&self) -> bool {
        let mut seen = vec![false; self.parcels.len()];
        for idx in self.vehicles.iter().flat_map(|v| v.route.iter().copied()) {
            match seen.get_mut(idx) {
                Some(s) if !*s => *s = true,
                _ => return false,
            }
        }
        seen.into_iter().all(|s| s)
    }
}

/// Tabular description: environment, vehicles with their assigned parcel
/// counts, then parcels.
impl fmt::Display for Fleet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "base ({}, {}), wind ({}, {}), metric {:?}",
            self.base.x, self.base.y, self.wind.x, self.wind.y, self.metric
        )?;

        writeln!(f, "\n{} vehicles:", self.vehicles.len())?;
        writeln!(
            f,
            "{:>12}{:>14}{:>12}{:>10}",
            "vehicle", "max capacity", "max speed", "parcels"
        )?;
        for v in &self.vehicles {
            writeln!(
                f,
                "{:>12}{:>14}{:>12}{:>10}",
                v.id, v.max_capacity, v.max_speed, v.route.len()
            )?;
        }

        writeln!(f, "\n{} parcels:", self.parcels.len())?;
        writeln!(f, "{:>12}{:>14}{:>24}", "parcel", "weight", "position")?;
        for p in &self.parcels {
            let position = format!("({}, {})", p.position.x, p.position.y);
            writeln!(f, "{:>12}{:>14}{:>24}", p.id, p.weight, position)?;
        }
        Ok(())
    }
}

/// Larger side of the parcels' bounding box; `1.0` when degenerate.
fn compute_scale(parcels: &[Parcel]) -> f64 {
    let mut min = Point::new(f64::INFINITY, f64::INFINITY);
    let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in parcels {
        min.x = min.x.min(p.position.x);
        min.y = min.y.min(p.position.y);
        max.x = max.x.max(p.position.x);
        max.y = max.y.max(p.position.y);
    }
    let scale = (max.x - min.x).max(max.y - min.y);
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_fleet(metric: CostMetric) -> Fleet {
        let vehicles = vec![
            Vehicle::new(1, 40.0, 8.0),
            Vehicle::new(2, 30.0, 7.0),
            Vehicle::new(3, 25.0, 9.0),
        ];
        let parcels = (0..12)
            .map(|i| {
                let angle = i as f64 * 0.5;
                Parcel::new(i, 2.0 + (i % 5) as f64, (10.0 * angle.cos(), 6.0 * angle.sin()))
            })
            .collect();
        Fleet::new((0.0, 0.0), (1.0, 2.0), metric, vehicles, parcels).unwrap()
    }

    #[test]
    fn test_single_vehicle_single_parcel_round_trip() {
        let fleet = Fleet::new(
            (0.0, 0.0),
            Wind::CALM,
            CostMetric::AggregateDistance,
            vec![Vehicle::new(1, 5.0, 10.0).with_route(vec![0])],
            vec![Parcel::new(1, 1.0, (3.0, 4.0))],
        )
        .unwrap();
        assert!((fleet.cost() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_capacity_forced_split_cost() {
        let fleet = Fleet::new(
            (0.0, 0.0),
            Wind::CALM,
            CostMetric::AggregateDistance,
            vec![Vehicle::new(1, 10.0, 10.0).with_route(vec![0, 1])],
            vec![
                Parcel::new(1, 6.0, (1.0, 0.0)),
                Parcel::new(2, 6.0, (-1.0, 0.0)),
            ],
        )
        .unwrap();
        assert!((fleet.cost() - 4.0).abs() < 1e-12);
        assert_eq!(fleet.paths()[0].len(), 5);
    }

    #[test]
    fn test_time_metric_takes_slowest_vehicle() {
        let fleet = Fleet::new(
            (0.0, 0.0),
            Wind::CALM,
            CostMetric::WorstCaseTime,
            vec![
                Vehicle::new(1, 10.0, 1.0).with_route(vec![0]),
                Vehicle::new(2, 10.0, 2.0).with_route(vec![1]),
            ],
            vec![
                Parcel::new(1, 1.0, (3.0, 4.0)),
                Parcel::new(2, 1.0, (0.0, 20.0)),
            ],
        )
        .unwrap();
        let costs = fleet.vehicle_costs();
        assert!((costs[0] - 10.0).abs() < 1e-12);
        assert!((costs[1] - 20.0).abs() < 1e-12);
        assert!((fleet.cost() - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_scale_from_bounding_box() {
        let fleet = sample_fleet(CostMetric::AggregateDistance);
        let xs: Vec<f64> = fleet.parcels().iter().map(|p| p.position.x).collect();
        let ys: Vec<f64> = fleet.parcels().iter().map(|p| p.position.y).collect();
        let width = xs.iter().cloned().fold(f64::MIN, f64::max)
            - xs.iter().cloned().fold(f64::MAX, f64::min);
        let height = ys.iter().cloned().fold(f64::MIN, f64::max)
            - ys.iter().cloned().fold(f64::MAX, f64::min);
        assert!((fleet.scale() - width.max(height)).abs() < 1e-12);
    }

    #[test]
    fn test_scale_degenerate() {
        assert_eq!(compute_scale(&[]), 1.0);
        assert_eq!(compute_scale(&[Parcel::new(1, 1.0, (5.0, 5.0))]), 1.0);
    }

    #[test]
    fn test_distribute_conserves_parcels() {
        let mut fleet = sample_fleet(CostMetric::AggregateDistance);
        assert!(!fleet.is_conserved());
        let mut rng = StdRng::seed_from_u64(7);
        fleet.distribute(&mut rng);
        assert!(fleet.is_conserved());
        fleet.distribute(&mut rng);
        assert!(fleet.is_conserved());
    }

    #[test]
    fn test_distribute_respects_eligibility() {
        let vehicles = vec![Vehicle::new(1, 2.0, 8.0), Vehicle::new(2, 50.0, 8.0)];
        let parcels = vec![Parcel::new(1, 10.0, (1.0, 1.0)), Parcel::new(2, 1.0, (2.0, 1.0))];
        let mut fleet = Fleet::new(
            (0.0, 0.0),
            Wind::CALM,
            CostMetric::AggregateDistance,
            vehicles,
            parcels,
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            fleet.distribute(&mut rng);
            assert!(fleet.vehicles()[1].route.contains(&0));
        }
    }

    #[test]
    fn test_unroutable_parcel_is_setup_error() {
        let err = Fleet::new(
            (0.0, 0.0),
            Wind::CALM,
            CostMetric::AggregateDistance,
            vec![Vehicle::new(1, 5.0, 8.0), Vehicle::new(2, 6.0, 8.0)],
            vec![Parcel::new(9, 7.0, (1.0, 1.0))],
        )
        .unwrap_err();
        assert_eq!(err, FleetError::UnroutableParcel { id: 9 });
    }

    #[test]
    fn test_wind_makes_parcel_unroutable_under_time_metric() {
        let err = Fleet::new(
            (0.0, 0.0),
            (10.0, 0.0),
            CostMetric::WorstCaseTime,
            vec![Vehicle::new(1, 5.0, 5.0)],
            vec![Parcel::new(4, 1.0, (1.0, 1.0))],
        )
        .unwrap_err();
        assert_eq!(err, FleetError::UnroutableParcel { id: 4 });
    }

    #[test]
    fn test_setup_errors() {
        let parcel = Parcel::new(1, 1.0, (1.0, 1.0));
        let no_vehicles = Fleet::new(
            (0.0, 0.0),
            Wind::CALM,
            CostMetric::AggregateDistance,
            vec![],
            vec![parcel],
        );
        assert_eq!(no_vehicles.unwrap_err(), FleetError::NoVehicles);

        let dup_vehicle = Fleet::new(
            (0.0, 0.0),
            Wind::CALM,
            CostMetric::AggregateDistance,
            vec![Vehicle::new(1, 5.0, 5.0), Vehicle::new(1, 5.0, 5.0)],
            vec![parcel],
        );
        assert_eq!(dup_vehicle.unwrap_err(), FleetError::DuplicateVehicle { id: 1 });

        let dup_parcel = Fleet::new(
            (0.0, 0.0),
            Wind::CALM,
            CostMetric::AggregateDistance,
            vec![Vehicle::new(1, 5.0, 5.0)],
            vec![parcel, parcel],
        );
        assert_eq!(dup_parcel.unwrap_err(), FleetError::DuplicateParcel { id: 1 });

        let bad_route = Fleet::new(
            (0.0, 0.0),
            Wind::CALM,
            CostMetric::AggregateDistance,
            vec![Vehicle::new(1, 5.0, 5.0).with_route(vec![0, 0])],
            vec![parcel],
        );
        assert!(matches!(
            bad_route.unwrap_err(),
            FleetError::InvalidVehicle { id: 1, .. }
        ));
    }

    #[test]
    fn test_snapshot_restore_exact() {
        let mut fleet = sample_fleet(CostMetric::AggregateDistance);
        let mut rng = StdRng::seed_from_u64(11);
        fleet.distribute(&mut rng);
        let snapshot = fleet.snapshot();
        let before = fleet.clone();

        fleet.distribute(&mut rng);
        fleet.vehicles_mut()[0].route.reverse();
        fleet.restore(&snapshot);

        assert_eq!(fleet, before);
    }

    #[test]
    fn test_display_table() {
        let fleet = Fleet::new(
            (0.0, 0.0),
            (1.5, -2.0),
            CostMetric::AggregateDistance,
            vec![
                Vehicle::new(7, 10.0, 4.0).with_route(vec![1, 0]),
                Vehicle::new(8, 5.0, 3.0),
            ],
            vec![Parcel::new(10, 1.0, (1.0, 0.0)), Parcel::new(20, 2.5, (2.0, 3.0))],
        )
        .unwrap();
        let text = fleet.to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "base (0, 0), wind (1.5, -2), metric AggregateDistance");
        assert!(text.contains("2 vehicles:"));
        assert!(text.contains("2 parcels:"));
        assert_eq!(lines[4].split_whitespace().collect::<Vec<_>>(), ["7", "10", "4", "2"]);
        assert_eq!(lines[5].split_whitespace().collect::<Vec<_>>(), ["8", "5", "3", "0"]);
        assert_eq!(
            lines[10].split_whitespace().collect::<Vec<_>>(),
            ["20", "2.5", "(2,", "3)"]
        );
    }

    #[test]
    fn test_route_ids() {
        let fleet = Fleet::new(
            (0.0, 0.0),
            Wind::CALM,
            CostMetric::AggregateDistance,
            vec![Vehicle::new(7, 10.0, 1.0).with_route(vec![1, 0])],
            vec![Parcel::new(10, 1.0, (1.0, 0.0)), Parcel::new(20, 1.0, (2.0, 0.0))],
        )
        .unwrap();
        assert_eq!(fleet.route_ids(), vec![(7, vec![20, 10])]);
    }
}
