//! Fleet annealing loop.
//!
//! # Algorithm
//!
//! 1. **Initializing**: distribute parcels at random, compute cost.
//! 2. **Annealing**, once per iteration:
//!    a. snapshot all routes and the current cost
//!    b. apply the operators planned for the current temperature
//!    c. recompute the fleet cost ("attempted")
//!    d. update the best cost
//!    e. `A = e^(min(100, (previous - attempted) / (T * scale)))`
//!    f. keep the new routes if `U[0,1) < A`, otherwise restore the snapshot
//!    g. `T <- T * rate`
//! 3. **Refining**: exhaustive window permutations on the best state.
//! 4. **Converged**: the fleet holds the best routes found.

use super::config::SaConfig;
use super::refine::refine;
use crate::error::FleetError;
use crate::model::{Fleet, RouteSnapshot};
use crate::operators::{Operator, OperatorPolicy};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

/// Largest exponent passed to `exp` by the acceptance rule.
pub const MAX_ACCEPTANCE_EXPONENT: f64 = 100.0;

/// Lifecycle of an annealing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initializing,
    Annealing,
    Refining,
    Converged,
}

/// Result of an annealing run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaResult {
    /// Routes of the best state found.
    pub best: RouteSnapshot,

    /// Cost of the random initial distribution.
    pub initial_cost: f64,

    /// Cost of the best state, after refinement.
    pub best_cost: f64,

    /// Best cost at the end of annealing, before refinement.
    pub annealed_cost: f64,

    /// Annealing iterations performed.
    pub iterations: usize,

    /// Temperature when annealing stopped.
    pub final_temperature: f64,

    /// Iterations whose candidate was kept (including improvements).
    pub accepted_moves: usize,

    /// Iterations whose candidate was strictly cheaper than its predecessor.
    pub improving_moves: usize,

    /// Windows improved during refinement.
    pub refinement_improvements: usize,

    /// Candidate cost of every iteration.
    pub attempted_costs: Vec<f64>,

    /// Cost after the accept/revert decision of every iteration.
    pub accepted_costs: Vec<f64>,

    /// Best cost so far after every iteration. Non-increasing.
    pub best_costs: Vec<f64>,

    /// Base operator magnitude `floor(sqrt(sqrt(T)))` of every iteration.
    pub magnitudes: Vec<i64>,

    /// Total applications per operator, indexed by [`Operator::index`].
    pub operator_invocations: [usize; 6],
}

impl SaResult {
    /// Applications of `op` over the whole run.
    pub fn invocations(&self, op: Operator) -> usize {
        self.operator_invocations[op.index()]
    }
}

/// Outcome of one annealing iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub attempted_cost: f64,
    pub accepted: bool,
    pub acceptance: f64,
}

/// Metropolis acceptance value `e^(min(100, improvement / (T * scale)))`.
///
/// Exceeds 1 for any strict improvement. Infinite costs stand for
/// infeasible states: leaving one is always accepted, entering one from a
/// finite cost never is, and two infinite costs count as no change.
pub fn acceptance_value(previous_cost: f64, new_cost: f64, temperature: f64, scale: f64) -> f64 {
    let improvement = if previous_cost == new_cost {
        0.0
    } else {
        previous_cost - new_cost
    };
    (improvement / (temperature * scale))
        .min(MAX_ACCEPTANCE_EXPONENT)
        .exp()
}

/// Draws `U[0,1)` and accepts when it falls below `acceptance`.
pub fn metropolis_accept<R: Rng>(acceptance: f64, rng: &mut R) -> bool {
    rng.random::<f64>() < acceptance
}

/// Stateful annealer over a borrowed fleet.
///
/// [`SaRunner`] drives it to completion; it is public so callers can step
/// through iterations and observe the fleet between them.
pub struct Annealer<'a, R: Rng> {
    fleet: &'a mut Fleet,
    config: &'a SaConfig,
    rng: R,
    phase: Phase,
    temperature: f64,
    cooling_rate: f64,
    current_cost: f64,
    best_cost: f64,
    best: RouteSnapshot,
    result: SaResult,
}

impl<'a, R: Rng> Annealer<'a, R> {
    /// Validates `config`. Parcels are distributed on [`initialize`](Self::initialize)
    /// or, implicitly, on the first [`step`](Self::step).
    pub fn new(fleet: &'a mut Fleet, config: &'a SaConfig, rng: R) -> Result<Self, FleetError> {
        config.validate().map_err(FleetError::InvalidConfig)?;

        let best = fleet.snapshot();
        Ok(Self {
            fleet,
            config,
            rng,
            phase: Phase::Initializing,
            temperature: config.initial_temperature,
            cooling_rate: config.cooling_rate(),
            current_cost: f64::INFINITY,
            best_cost: f64::INFINITY,
            result: SaResult {
                best: best.clone(),
                initial_cost: f64::INFINITY,
                best_cost: f64::INFINITY,
                annealed_cost: f64::INFINITY,
                iterations: 0,
                final_temperature: config.initial_temperature,
                accepted_moves: 0,
                improving_moves: 0,
                refinement_improvements: 0,
                attempted_costs: Vec::new(),
                accepted_costs: Vec::new(),
                best_costs: Vec::new(),
                magnitudes: Vec::new(),
                operator_invocations: [0; 6],
            },
            best,
        })
    }

    /// Distributes the parcels at random and computes the initial cost.
    pub fn initialize(&mut self) {
        self.fleet.distribute(&mut self.rng);
        let cost = self.fleet.cost();
        info!(
            vehicles = self.fleet.vehicles().len(),
            parcels = self.fleet.parcels().len(),
            metric = ?self.fleet.metric(),
            scale = self.fleet.scale(),
            initial_cost = cost,
            "annealing started"
        );

        self.current_cost = cost;
        self.best_cost = cost;
        self.best = self.fleet.snapshot();
        self.result.initial_cost = cost;
        self.result.annealed_cost = cost;
        self.phase = Phase::Annealing;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn current_cost(&self) -> f64 {
        self.current_cost
    }

    pub fn best_cost(&self) -> f64 {
        self.best_cost
    }

    pub fn fleet(&self) -> &Fleet {
        &*self.fleet
    }

    /// True once the temperature floor or the iteration budget is reached.
    pub fn should_stop(&self) -> bool {
        self.temperature <= self.config.min_temperature
            || (self.config.max_iterations > 0
                && self.result.iterations >= self.config.max_iterations)
    }

    /// Performs one annealing iteration.
    ///
    /// Returns `None` once annealing has ended; the fleet is left as is.
    pub fn step(&mut self) -> Option<StepOutcome> {
        match self.phase {
            Phase::Initializing => self.initialize(),
            Phase::Annealing => {}
            Phase::Refining | Phase::Converged => return None,
        }
        let snapshot = self.fleet.snapshot();
        let previous_cost = self.current_cost;
        let config = self.config;
        let policy = &config.policy;

        let plan = policy.plan(self.temperature, self.fleet.vehicles().len(), &mut self.rng);
        for &(op, n) in &plan {
            for _ in 0..n {
                op.apply(self.fleet, policy, &mut self.rng);
            }
            self.result.operator_invocations[op.index()] += n;
        }

        let attempted_cost = self.fleet.cost();
        self.result.attempted_costs.push(attempted_cost);
        if attempted_cost < previous_cost {
            self.result.improving_moves += 1;
        }
        if attempted_cost < self.best_cost {
            debug!(
                iteration = self.result.iterations,
                temperature = self.temperature,
                cost = attempted_cost,
                "new best"
            );
            self.best_cost = attempted_cost;
            self.best = self.fleet.snapshot();
        }

        let acceptance = acceptance_value(
            previous_cost,
            attempted_cost,
            self.temperature,
            self.fleet.scale(),
        );
        let accepted = metropolis_accept(acceptance, &mut self.rng);
        if accepted {
            self.current_cost = attempted_cost;
            self.result.accepted_moves += 1;
        } else {
            // Cost is a pure function of the routes, so the saved cost is exact.
            self.fleet.restore(&snapshot);
            self.current_cost = previous_cost;
        }
        debug_assert!(self.fleet.is_conserved());

        self.result.accepted_costs.push(self.current_cost);
        self.result.best_costs.push(self.best_cost);
        self.result
            .magnitudes
            .push(OperatorPolicy::magnitude(self.temperature));
        trace!(
            iteration = self.result.iterations,
            temperature = self.temperature,
            attempted = attempted_cost,
            current = self.current_cost,
            accepted,
            "iteration"
        );

        self.temperature *= self.cooling_rate;
        self.result.iterations += 1;

        Some(StepOutcome {
            attempted_cost,
            accepted,
            acceptance,
        })
    }

    /// Runs iterations until a stopping rule fires. Does nothing once
    /// annealing has ended.
    pub fn anneal(&mut self) {
        match self.phase {
            Phase::Initializing => self.initialize(),
            Phase::Annealing => {}
            Phase::Refining | Phase::Converged => return,
        }
        while !self.should_stop() {
            self.step();
        }
        self.result.final_temperature = self.temperature;
        self.result.annealed_cost = self.best_cost;
        self.phase = Phase::Refining;
    }

    /// Restores the best annealed state and refines it.
    ///
    /// Anneals first if that has not happened yet. Does nothing once the
    /// run has converged.
    pub fn refine(&mut self) {
        match self.phase {
            Phase::Initializing | Phase::Annealing => self.anneal(),
            Phase::Refining => {}
            Phase::Converged => return,
        }
        self.fleet.restore(&self.best);
        self.current_cost = self.best_cost;

        let outcome = refine(self.fleet, &self.config.refine, &mut self.rng);
        self.result.refinement_improvements = outcome.improvements;
        if outcome.cost < self.best_cost {
            self.best_cost = outcome.cost;
            self.current_cost = outcome.cost;
            self.best = self.fleet.snapshot();
        }
        self.phase = Phase::Converged;
    }

    /// Runs any remaining phases and returns the result. The fleet is left
    /// holding the best routes found.
    pub fn finish(mut self) -> SaResult {
        if matches!(self.phase, Phase::Initializing | Phase::Annealing) {
            self.anneal();
        }
        if self.phase == Phase::Refining {
            self.refine();
        }
        self.fleet.restore(&self.best);

        info!(
            iterations = self.result.iterations,
            annealed_cost = self.result.annealed_cost,
            best_cost = self.best_cost,
            accepted = self.result.accepted_moves,
            refinements = self.result.refinement_improvements,
            "annealing converged"
        );

        self.result.best = self.best;
        self.result.best_cost = self.best_cost;
        self.result
    }
}

/// Executes the fleet annealer.
pub struct SaRunner;

impl SaRunner {
    /// Runs a full optimization: distribute, anneal, refine.
    ///
    /// On return `fleet` holds the best routes found.
    ///
    /// # Errors
    /// [`FleetError::InvalidConfig`] if `config` fails validation.
    pub fn run(fleet: &mut Fleet, config: &SaConfig) -> Result<SaResult, FleetError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };
        Self::run_with_rng(fleet, config, rng)
    }

    /// Runs with a caller-supplied random source.
    pub fn run_with_rng<R: Rng>(
        fleet: &mut Fleet,
        config: &SaConfig,
        rng: R,
    ) -> Result<SaResult, FleetError> {
        Ok(Annealer::new(fleet, config, rng)?.finish())
    }
}
