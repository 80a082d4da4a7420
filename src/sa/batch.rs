//! Independent annealing runs over many fleets.
//!
//! Run `i` is seeded with `seed + i`, so a seeded batch is reproducible
//! whether or not the `parallel` feature is enabled.

use super::config::SaConfig;
use super::runner::{SaResult, SaRunner};
use crate::error::FleetError;
use crate::model::Fleet;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::info;

/// Executes batches of annealing runs.
pub struct BatchRunner;

impl BatchRunner {
    /// Anneals every fleet independently.
    ///
    /// Each fleet is left holding its own best routes. With the `parallel`
    /// feature the runs are spread over the rayon thread pool.
    pub fn run(fleets: &mut [Fleet], config: &SaConfig) -> Vec<Result<SaResult, FleetError>> {
        let base_seed = config.seed.unwrap_or_else(rand::random);
        info!(runs = fleets.len(), base_seed, "batch started");

        let run_one = |(i, fleet): (usize, &mut Fleet)| {
            let config = config.clone().with_seed(base_seed.wrapping_add(i as u64));
            SaRunner::run(fleet, &config)
        };

        #[cfg(feature = "parallel")]
        return fleets.par_iter_mut().enumerate().map(run_one).collect();
        #[cfg(not(feature = "parallel"))]
        return fleets.iter_mut().enumerate().map(run_one).collect();
    }

    /// Anneals `restarts` copies of `fleet` and keeps the cheapest.
    ///
    /// `fleet` is overwritten with the winning routes. Ties go to the
    /// lowest restart index.
    ///
    /// # Errors
    /// [`FleetError::InvalidConfig`] if `config` fails validation or
    /// `restarts` is 0.
    pub fn restarts(
        fleet: &mut Fleet,
        config: &SaConfig,
        restarts: usize,
    ) -> Result<SaResult, FleetError> {
        if restarts == 0 {
            return Err(FleetError::InvalidConfig("restarts must be positive".into()));
        }
        let mut copies = vec![fleet.clone(); restarts];
        let results = Self::run(&mut copies, config);

        let mut best: Option<(usize, SaResult)> = None;
        for (i, result) in results.into_iter().enumerate() {
            let result = result?;
            if best
                .as_ref()
                .map_or(true, |(_, b)| result.best_cost < b.best_cost)
            {
                best = Some((i, result));
            }
        }

        let (winner, result) =
            best.ok_or_else(|| FleetError::InvalidConfig("restarts produced no result".into()))?;
        fleet.restore(&result.best);
        info!(winner, best_cost = result.best_cost, "restarts finished");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::{CostMetric, Wind};
    use crate::model::{Parcel, Vehicle};
    use crate::sa::CoolingSchedule;

    fn grid_fleet() -> Fleet {
        let parcels: Vec<Parcel> = (0..12)
            .map(|i| {
                Parcel::new(
                    i as u32 + 1,
                    1.0 + (i % 3) as f64,
                    ((i % 4) as f64 * 3.0, (i / 4) as f64 * 3.0),
                )
            })
            .collect();
        let vehicles = vec![
            Vehicle::new(1, 5.0, 10.0),
            Vehicle::new(2, 5.0, 10.0),
            Vehicle::new(3, 8.0, 10.0),
        ];
        Fleet::new(
            (4.5, 3.0),
            Wind::CALM,
            CostMetric::AggregateDistance,
            vehicles,
            parcels,
        )
        .unwrap()
    }

    fn config() -> SaConfig {
        SaConfig::default()
            .with_initial_temperature(50.0)
            .with_min_temperature(0.01)
            .with_cooling(CoolingSchedule::FixedIterations { iterations: 800 })
            .with_refinement(3, 5)
            .with_seed(11)
    }

    #[test]
    fn test_batch_runs_every_fleet() {
        let mut fleets = vec![grid_fleet(); 4];
        let results = BatchRunner::run(&mut fleets, &config());
        assert_eq!(results.len(), 4);
        for (fleet, result) in fleets.iter().zip(&results) {
            let result = result.as_ref().unwrap();
            assert!(fleet.is_conserved());
            assert!((fleet.cost() - result.best_cost).abs() < 1e-9);
        }
    }

    #[test]
    fn test_batch_seeds_match_single_runs() {
        let config = config();
        let mut fleets = vec![grid_fleet(); 3];
        let results = BatchRunner::run(&mut fleets, &config);

        for (i, result) in results.iter().enumerate() {
            let mut single = grid_fleet();
            let expected =
                SaRunner::run(&mut single, &config.clone().with_seed(11 + i as u64)).unwrap();
            assert_eq!(result.as_ref().unwrap().best_cost, expected.best_cost);
            assert_eq!(fleets[i].route_ids(), single.route_ids());
        }
    }

    #[test]
    fn test_restarts_keep_cheapest() {
        let config = config();
        let mut fleets = vec![grid_fleet(); 5];
        let cheapest = BatchRunner::run(&mut fleets, &config)
            .into_iter()
            .map(|r| r.unwrap().best_cost)
            .fold(f64::INFINITY, f64::min);

        let mut fleet = grid_fleet();
        let result = BatchRunner::restarts(&mut fleet, &config, 5).unwrap();
        assert_eq!(result.best_cost, cheapest);
        assert!((fleet.cost() - cheapest).abs() < 1e-9);
    }

    #[test]
    fn test_restarts_rejects_zero() {
        let mut fleet = grid_fleet();
        assert!(matches!(
            BatchRunner::restarts(&mut fleet, &config(), 0),
            Err(FleetError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_batch_reports_invalid_config() {
        let mut fleets = vec![grid_fleet(); 2];
        let bad = config().with_min_temperature(100.0);
        let results = BatchRunner::run(&mut fleets, &bad);
        assert!(results.iter().all(|r| r.is_err()));
    }
}
