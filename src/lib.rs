//! Simulated annealing for drone parcel delivery.
//!
//! A fleet of drones leaves a shared base to deliver weighted parcels. The
//! crate searches for parcel-to-drone assignments and per-drone visiting
//! orders that minimize one of two objectives:
//!
//! - **Aggregate distance**: total flown path length, with routes split
//!   into capacity-feasible trips back to base.
//! - **Worst-case time**: delivery time of the slowest drone under a
//!   fuel, load and wind model.
//!
//! # Modules
//!
//! - [`model`]: points, parcels, vehicles and the [`Fleet`] that owns them,
//!   plus the flat [`ProblemDescriptor`] used for exchange.
//! - [`cost`]: both cost metrics, wind-adjusted ground speed and trip
//!   partitioning.
//! - [`operators`]: route mutation moves and the temperature-driven
//!   [`OperatorPolicy`](operators::OperatorPolicy).
//! - [`sa`]: the annealing loop, window refinement and batch runs.
//! - [`diagnostics`]: owned report of paths and cost series.
//!
//! # Example
//!
//! ```
//! use u_dronefleet::cost::{CostMetric, Wind};
//! use u_dronefleet::model::{Fleet, Parcel, Vehicle};
//! use u_dronefleet::sa::{CoolingSchedule, SaConfig, SaRunner};
//!
//! let parcels = vec![
//!     Parcel::new(1, 2.0, (3.0, 4.0)),
//!     Parcel::new(2, 1.0, (-3.0, 4.0)),
//!     Parcel::new(3, 4.0, (0.0, -5.0)),
//! ];
//! let vehicles = vec![Vehicle::new(1, 5.0, 10.0), Vehicle::new(2, 5.0, 10.0)];
//! let mut fleet = Fleet::new(
//!     (0.0, 0.0),
//!     Wind::CALM,
//!     CostMetric::AggregateDistance,
//!     vehicles,
//!     parcels,
//! )
//! .unwrap();
//!
//! let config = SaConfig::default()
//!     .with_cooling(CoolingSchedule::FixedIterations { iterations: 2_000 })
//!     .with_seed(7);
//! let result = SaRunner::run(&mut fleet, &config).unwrap();
//! assert!(fleet.is_conserved());
//! assert!(result.best_cost <= result.initial_cost);
//! ```
//!
//! # Logging
//!
//! Progress is reported through [`tracing`]. The crate never installs a
//! subscriber.

pub mod cost;
pub mod diagnostics;
pub mod error;
pub mod model;
pub mod operators;
pub mod sa;

pub use error::FleetError;
pub use model::{Fleet, ProblemDescriptor};
