//! SA configuration and cooling schedules.

use crate::operators::OperatorPolicy;

/// Cooling schedule for temperature reduction.
///
/// Both variants are geometric, `T_{k+1} = rate * T_k`; they differ only
/// in how the rate is obtained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoolingSchedule {
    /// Fixed cooling factor in (0, 1). Higher = slower cooling.
    Geometric {
        alpha: f64,
    },

    /// Rate chosen so the temperature reaches the floor after exactly
    /// `iterations` steps: `rate = (T_min / T_0)^(1 / iterations)`.
    FixedIterations {
        iterations: usize,
    },
}

impl Default for CoolingSchedule {
    fn default() -> Self {
        CoolingSchedule::Geometric { alpha: 0.9997 }
    }
}

impl CoolingSchedule {
    /// Per-iteration cooling factor for the given temperature bounds.
    pub fn rate(&self, initial_temperature: f64, min_temperature: f64) -> f64 {
        match *self {
            CoolingSchedule::Geometric { alpha } => alpha,
            CoolingSchedule::FixedIterations { iterations } => {
                (min_temperature / initial_temperature).powf(1.0 / iterations as f64)
            }
        }
    }
}

/// Window refinement applied once annealing stops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefineConfig {
    /// Number of consecutive stops permuted exhaustively (`window!` orders).
    pub window: usize,

    /// Passes per vehicle. 0 disables refinement.
    pub passes: usize,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            window: 4,
            passes: 100,
        }
    }
}

/// Configuration for the fleet annealer.
///
/// The run stops when the temperature falls to `min_temperature` or when
/// `max_iterations` (if non-zero) iterations have been performed,
/// whichever comes first.
///
/// # Examples
///
/// ```
/// use u_dronefleet::sa::{SaConfig, CoolingSchedule};
///
/// let config = SaConfig::default()
///     .with_initial_temperature(1000.0)
///     .with_min_temperature(0.1)
///     .with_cooling(CoolingSchedule::FixedIterations { iterations: 20_000 })
///     .with_refinement(4, 50)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct SaConfig {
    /// Initial temperature. Higher values allow more exploration.
    pub initial_temperature: f64,

    /// Temperature floor. Annealing stops once T drops to or below it.
    pub min_temperature: f64,

    pub cooling: CoolingSchedule,

    /// Maximum iterations (hard budget). 0 = no limit.
    pub max_iterations: usize,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,

    /// Which operators run per iteration.
    pub policy: OperatorPolicy,

    pub refine: RefineConfig,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 1000.0,
            min_temperature: 0.1,
            cooling: CoolingSchedule::default(),
            max_iterations: 0,
            seed: None,
            policy: OperatorPolicy::default(),
            refine: RefineConfig::default(),
        }
    }
}

impl SaConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_cooling(mut self, cooling: CoolingSchedule) -> Self {
        self.cooling = cooling;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_policy(mut self, policy: OperatorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_refinement(mut self, window: usize, passes: usize) -> Self {
        self.refine = RefineConfig { window, passes };
        self
    }

    /// Cooling factor applied after every iteration.
    pub fn cooling_rate(&self) -> f64 {
        self.cooling
            .rate(self.initial_temperature, self.min_temperature)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.initial_temperature > 0.0) || !self.initial_temperature.is_finite() {
            return Err("initial_temperature must be positive and finite".into());
        }
        if !(self.min_temperature > 0.0) {
            return Err("min_temperature must be positive".into());
        }
        if self.min_temperature >= self.initial_temperature {
            return Err("min_temperature must be less than initial_temperature".into());
        }
        match self.cooling {
            CoolingSchedule::Geometric { alpha } => {
                if !(alpha > 0.0 && alpha < 1.0) {
                    return Err(format!("geometric alpha must be in (0, 1), got {alpha}"));
                }
            }
            CoolingSchedule::FixedIterations { iterations } => {
                if iterations == 0 {
                    return Err("cooling iterations must be positive".into());
                }
            }
        }
        if self.refine.passes > 0 && !(1..=8).contains(&self.refine.window) {
            return Err(format!(
                "refinement window must be in 1..=8, got {}",
                self.refine.window
            ));
        }
        self.policy.validate()
    }
}
