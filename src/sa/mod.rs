//! Simulated Annealing (SA) over fleet routes.
//!
//! A single-solution trajectory metaheuristic inspired by the physical
//! annealing process. Worsening moves are accepted with a probability that
//! decreases with the temperature, so the search can leave local optima
//! early and settles as the fleet cools. A final exhaustive window
//! refinement polishes the best routes found.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"

mod batch;
mod config;
mod refine;
mod runner;

pub use batch::BatchRunner;
pub use config::{CoolingSchedule, RefineConfig, SaConfig};
pub use refine::{refine, RefineOutcome};
pub use runner::{
    acceptance_value, metropolis_accept, Annealer, Phase, SaResult, SaRunner, StepOutcome,
    MAX_ACCEPTANCE_EXPONENT,
};
