//! Exhaustive window refinement.
//!
//! After annealing, each vehicle gets a fixed number of passes. A pass picks
//! a window of consecutive stops, tries every ordering of it in place and
//! keeps the first one that strictly lowers the fleet cost.

use super::config::RefineConfig;
use crate::model::Fleet;
use rand::Rng;
use tracing::debug;

/// Summary of a refinement run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefineOutcome {
    /// Windows reordered.
    pub improvements: usize,

    /// Fleet cost after refinement.
    pub cost: f64,
}

/// Refines every vehicle route of `fleet` in place.
///
/// A vehicle whose route is shorter than the window is skipped. A window
/// with no improving ordering is put back as it was; only that vehicle is
/// touched and the remaining passes and vehicles still run.
pub fn refine<R: Rng>(fleet: &mut Fleet, config: &RefineConfig, rng: &mut R) -> RefineOutcome {
    let metric = fleet.metric();
    let mut costs = fleet.vehicle_costs();
    let mut cost = metric.combine(costs.iter().copied());
    let mut improvements = 0;

    if config.passes == 0 || config.window == 0 {
        return RefineOutcome { improvements, cost };
    }
    let window = config.window;
    let orders = permutations(window);

    for v in 0..fleet.vehicles().len() {
        for _ in 0..config.passes {
            let n = fleet.vehicles()[v].len();
            if n < window {
                break;
            }
            let start = rng.random_range(0..=n - window);
            let saved = fleet.vehicles()[v].route[start..start + window].to_vec();
            let mut improved = false;

            // Identity first; it cannot improve anything.
            for order in orders.iter().skip(1) {
                let slots = &mut fleet.vehicles_mut()[v].route[start..start + window];
                for (slot, &k) in slots.iter_mut().zip(order) {
                    *slot = saved[k];
                }

                let vehicle_cost = metric.vehicle_cost(
                    &fleet.vehicles()[v],
                    fleet.parcels(),
                    fleet.base(),
                    fleet.wind(),
                );
                let candidate = metric.combine(
                    costs
                        .iter()
                        .enumerate()
                        .map(|(i, &c)| if i == v { vehicle_cost } else { c }),
                );
                if candidate < cost {
                    debug!(
                        vehicle = fleet.vehicles()[v].id,
                        start,
                        from = cost,
                        to = candidate,
                        "window reordered"
                    );
                    costs[v] = vehicle_cost;
                    cost = candidate;
                    improvements += 1;
                    improved = true;
                    break;
                }
            }

            if !improved {
                fleet.vehicles_mut()[v].route[start..start + window].copy_from_slice(&saved);
            }
        }
    }

    RefineOutcome { improvements, cost }
}

/// All orderings of `0..n` in lexicographic order, identity first.
fn permutations(n: usize) -> Vec<Vec<usize>> {
    let mut current: Vec<usize> = (0..n).collect();
    let mut all = vec![current.clone()];
    loop {
        // Rightmost ascent.
        let Some(i) = (1..n).rev().find(|&i| current[i - 1] < current[i]) else {
            return all;
        };
        let pivot = i - 1;
        let Some(j) = (i..n).rev().find(|&j| current[j] > current[pivot]) else {
            return all;
        };
        current.swap(pivot, j);
        current[i..].reverse();
        all.push(current.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::{CostMetric, Wind};
    use crate::model::{Parcel, Point, Vehicle};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn line_fleet(routes: Vec<Vec<usize>>, parcel_count: usize) -> Fleet {
        let parcels: Vec<Parcel> = (0..parcel_count)
            .map(|i| Parcel::new(i as u32 + 1, 1.0, (i as f64 + 1.0, 0.0)))
            .collect();
        let vehicles: Vec<Vehicle> = routes
            .into_iter()
            .enumerate()
            .map(|(i, route)| Vehicle::new(i as u32 + 1, 100.0, 10.0).with_route(route))
            .collect();
        Fleet::new(
            Point::new(0.0, 0.0),
            Wind::CALM,
            CostMetric::AggregateDistance,
            vehicles,
            parcels,
        )
        .unwrap()
    }

    #[test]
    fn test_permutations_count_and_uniqueness() {
        for n in 1..=5 {
            let perms = permutations(n);
            let expected: usize = (1..=n).product();
            assert_eq!(perms.len(), expected);
            let unique: HashSet<_> = perms.iter().cloned().collect();
            assert_eq!(unique.len(), expected);
            assert_eq!(perms[0], (0..n).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_permutations_lexicographic() {
        assert_eq!(
            permutations(3),
            vec![
                vec![0, 1, 2],
                vec![0, 2, 1],
                vec![1, 0, 2],
                vec![1, 2, 0],
                vec![2, 0, 1],
                vec![2, 1, 0],
            ]
        );
    }

    #[test]
    fn test_short_route_skipped() {
        let mut fleet = line_fleet(vec![vec![2, 0, 1]], 3);
        let before = fleet.route_ids();
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = refine(&mut fleet, &RefineConfig { window: 4, passes: 10 }, &mut rng);
        assert_eq!(outcome.improvements, 0);
        assert_eq!(fleet.route_ids(), before);
        assert!((outcome.cost - fleet.cost()).abs() < 1e-12);
    }

    #[test]
    fn test_zigzag_route_straightened() {
        // Whole route fits in the window, so one pass sees every ordering.
        let mut fleet = line_fleet(vec![vec![3, 0, 2, 1]], 4);
        let before = fleet.cost();
        let mut rng = StdRng::seed_from_u64(2);
        let outcome = refine(&mut fleet, &RefineConfig { window: 4, passes: 20 }, &mut rng);
        assert!(outcome.improvements > 0);
        assert!(outcome.cost < before);
        // Out and back along the line is optimal: 2 * 4.
        assert!((fleet.cost() - 8.0).abs() < 1e-9, "got {}", fleet.cost());
        assert!((outcome.cost - fleet.cost()).abs() < 1e-12);
        assert!(fleet.is_conserved());
    }

    #[test]
    fn test_optimal_route_unchanged() {
        let mut fleet = line_fleet(vec![vec![0, 1, 2, 3, 4]], 5);
        let before = fleet.route_ids();
        let mut rng = StdRng::seed_from_u64(3);
        let outcome = refine(&mut fleet, &RefineConfig { window: 3, passes: 50 }, &mut rng);
        assert_eq!(outcome.improvements, 0);
        assert_eq!(fleet.route_ids(), before);
    }

    #[test]
    fn test_later_vehicles_refined_after_failed_window() {
        // Vehicle 1 is already optimal, vehicle 2 is not.
        let mut fleet = line_fleet(vec![vec![0, 1, 2], vec![5, 3, 4]], 6);
        let first = fleet.vehicles()[0].route.clone();
        let mut rng = StdRng::seed_from_u64(4);
        let outcome = refine(&mut fleet, &RefineConfig { window: 3, passes: 5 }, &mut rng);
        assert_eq!(fleet.vehicles()[0].route, first);
        // Either sweep direction of parcels at x = 4, 5, 6 flies 12.
        let costs = fleet.vehicle_costs();
        assert!((costs[1] - 12.0).abs() < 1e-9, "got {}", costs[1]);
        assert!(outcome.improvements >= 1);
    }

    #[test]
    fn test_disabled_refinement() {
        let mut fleet = line_fleet(vec![vec![3, 0, 2, 1]], 4);
        let before = fleet.route_ids();
        let mut rng = StdRng::seed_from_u64(5);
        let outcome = refine(&mut fleet, &RefineConfig { window: 4, passes: 0 }, &mut rng);
        assert_eq!(outcome.improvements, 0);
        assert_eq!(fleet.route_ids(), before);
    }
}
