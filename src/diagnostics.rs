//! Run diagnostics for external plotting and reporting.
//!
//! [`DiagnosticsReport`] gathers what a viewer needs after a run: the path
//! each vehicle flies, the cost series of the annealing loop and, when a
//! benchmark optimum is known, the relative overshoot.

use crate::model::{Fleet, Point};
use crate::sa::SaResult;

/// Ordered points flown by one vehicle, base to base.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehiclePath {
    pub vehicle_id: u32,
    pub points: Vec<Point>,
}

/// Snapshot of a fleet and the run that produced it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiagnosticsReport {
    pub vehicle_paths: Vec<VehiclePath>,

    /// Fleet cost under the active metric.
    pub cost: f64,

    pub attempted_costs: Vec<f64>,
    pub accepted_costs: Vec<f64>,
    pub best_costs: Vec<f64>,

    /// `100 * (cost - optimal) / optimal`, if a usable optimum was given.
    pub overshoot_percent: Option<f64>,
}

impl DiagnosticsReport {
    /// Builds a report from the fleet as it currently stands.
    ///
    /// Pass `None` for `result` to report a fleet that has not been
    /// annealed; the series are then empty.
    pub fn new(fleet: &Fleet, result: Option<&SaResult>, optimal: Option<f64>) -> Self {
        let vehicle_paths = fleet
            .vehicles()
            .iter()
            .zip(fleet.paths())
            .map(|(vehicle, points)| VehiclePath {
                vehicle_id: vehicle.id,
                points,
            })
            .collect();
        let cost = fleet.cost();

        let (attempted_costs, accepted_costs, best_costs) = match result {
            Some(r) => (
                r.attempted_costs.clone(),
                r.accepted_costs.clone(),
                r.best_costs.clone(),
            ),
            None => (Vec::new(), Vec::new(), Vec::new()),
        };

        Self {
            vehicle_paths,
            cost,
            attempted_costs,
            accepted_costs,
            best_costs,
            overshoot_percent: overshoot(cost, optimal),
        }
    }
}

/// Relative overshoot of `cost` over a known optimum, in percent.
///
/// `None` when no optimum is given or it is zero or not finite.
pub fn overshoot(cost: f64, optimal: Option<f64>) -> Option<f64> {
    let optimal = optimal?;
    if optimal == 0.0 || !optimal.is_finite() {
        return None;
    }
    Some(100.0 * (cost - optimal) / optimal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::{CostMetric, Wind};
    use crate::model::{Parcel, Vehicle};
    use crate::sa::{CoolingSchedule, SaConfig, SaRunner};

    fn small_fleet() -> Fleet {
        let parcels = vec![
            Parcel::new(1, 1.0, (2.0, 0.0)),
            Parcel::new(2, 1.0, (0.0, 2.0)),
            Parcel::new(3, 1.0, (-2.0, 0.0)),
        ];
        let vehicles = vec![
            Vehicle::new(1, 5.0, 10.0).with_route(vec![0, 1]),
            Vehicle::new(2, 5.0, 10.0).with_route(vec![2]),
        ];
        Fleet::new(
            (0.0, 0.0),
            Wind::CALM,
            CostMetric::AggregateDistance,
            vehicles,
            parcels,
        )
        .unwrap()
    }

    #[test]
    fn test_overshoot() {
        assert_eq!(overshoot(110.0, Some(100.0)), Some(10.0));
        assert_eq!(overshoot(90.0, Some(100.0)), Some(-10.0));
        assert_eq!(overshoot(110.0, None), None);
        assert_eq!(overshoot(110.0, Some(0.0)), None);
        assert_eq!(overshoot(110.0, Some(f64::NAN)), None);
    }

    #[test]
    fn test_report_without_run() {
        let fleet = small_fleet();
        let report = DiagnosticsReport::new(&fleet, None, None);
        assert_eq!(report.vehicle_paths.len(), 2);
        assert_eq!(report.vehicle_paths[0].vehicle_id, 1);
        assert_eq!(
            report.vehicle_paths[1].points,
            vec![Point::new(0.0, 0.0), Point::new(-2.0, 0.0), Point::new(0.0, 0.0)]
        );
        assert!((report.cost - fleet.cost()).abs() < 1e-12);
        assert!(report.best_costs.is_empty());
        assert_eq!(report.overshoot_percent, None);
    }

    #[test]
    fn test_report_after_run() {
        let mut fleet = small_fleet();
        let config = SaConfig::default()
            .with_initial_temperature(10.0)
            .with_min_temperature(0.01)
            .with_cooling(CoolingSchedule::FixedIterations { iterations: 300 })
            .with_seed(5);
        let result = SaRunner::run(&mut fleet, &config).unwrap();

        let optimal = result.best_cost / 2.0;
        let report = DiagnosticsReport::new(&fleet, Some(&result), Some(optimal));
        assert_eq!(report.attempted_costs.len(), result.iterations);
        assert_eq!(report.accepted_costs.len(), result.iterations);
        assert_eq!(report.best_costs.len(), result.iterations);
        assert!((report.overshoot_percent.unwrap() - 100.0).abs() < 1e-9);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_report_serializes() {
        let fleet = small_fleet();
        let report = DiagnosticsReport::new(&fleet, None, Some(1.0));
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("vehicle_paths"));
        assert!(json.contains("overshoot_percent"));
    }
}
