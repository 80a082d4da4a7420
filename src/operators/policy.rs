//! Temperature-driven operator schedule.

use super::Operator;
use rand::seq::IndexedRandom;
use rand::Rng;

/// Maps a temperature to the operator invocations of one iteration.
///
/// Scaled operators run `n` times with `n = floor(sqrt(sqrt(T))) - offset`.
/// A negative `n` is clamped to 0, or to 1 for a single-vehicle fleet so
/// the iteration still moves something. On top of that, exactly one
/// single-shot operator, drawn uniformly, runs once per iteration.
///
/// # Examples
///
/// ```
/// use u_dronefleet::operators::{Operator, OperatorPolicy};
///
/// let policy = OperatorPolicy::default();
/// // sqrt(sqrt(1000)) = 5.62
/// assert_eq!(policy.count(Operator::AdjacentSwap, 1000.0, 3), 4);
/// assert_eq!(policy.count(Operator::ReinsertBetween, 0.5, 3), 0);
/// assert_eq!(policy.count(Operator::ReinsertBetween, 0.5, 1), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorPolicy {
    /// Count-based operators and their offsets.
    pub scaled: Vec<(Operator, i64)>,

    /// Operators of which one is applied per iteration.
    pub single_shot: Vec<Operator>,

    /// Longest run moved by [`Operator::RelocateChain`].
    pub chain_max_length: usize,
}

impl Default for OperatorPolicy {
    fn default() -> Self {
        Self {
            scaled: vec![
                (Operator::AdjacentSwap, 1),
                (Operator::ReinsertBetween, 2),
                (Operator::ReinsertWithin, 2),
            ],
            single_shot: vec![
                Operator::SwallowNearest,
                Operator::RelocateChain,
                Operator::TwoOpt,
            ],
            chain_max_length: 5,
        }
    }
}

impl OperatorPolicy {
    pub fn with_chain_max_length(mut self, n: usize) -> Self {
        self.chain_max_length = n;
        self
    }

    pub fn with_scaled(mut self, scaled: Vec<(Operator, i64)>) -> Self {
        self.scaled = scaled;
        self
    }

    pub fn with_single_shot(mut self, ops: Vec<Operator>) -> Self {
        self.single_shot = ops;
        self
    }

    /// Base magnitude `floor(sqrt(sqrt(T)))`.
    pub fn magnitude(temperature: f64) -> i64 {
        temperature.max(0.0).sqrt().sqrt().floor() as i64
    }

    /// Invocation count of a scaled operator at `temperature`.
    ///
    /// Operators not listed in [`scaled`](Self::scaled) get 0.
    pub fn count(&self, op: Operator, temperature: f64, vehicle_count: usize) -> usize {
        let Some(&(_, offset)) = self.scaled.iter().find(|(o, _)| *o == op) else {
            return 0;
        };
        let n = Self::magnitude(temperature) - offset;
        let floor = if vehicle_count == 1 { 1 } else { 0 };
        n.max(floor) as usize
    }

    /// Operator invocations for one iteration, in application order.
    pub fn plan<R: Rng>(
        &self,
        temperature: f64,
        vehicle_count: usize,
        rng: &mut R,
    ) -> Vec<(Operator, usize)> {
        let mut plan: Vec<(Operator, usize)> = self
            .scaled
            .iter()
            .map(|&(op, _)| (op, self.count(op, temperature, vehicle_count)))
            .filter(|&(_, n)| n > 0)
            .collect();
        if let Some(&op) = self.single_shot.choose(rng) {
            plan.push((op, 1));
        }
        plan
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.scaled.is_empty() && self.single_shot.is_empty() {
            return Err("operator policy has no operators".into());
        }
        let relocates = self.scaled.iter().any(|(op, _)| *op == Operator::RelocateChain)
            || self.single_shot.contains(&Operator::RelocateChain);
        if relocates && self.chain_max_length == 0 {
            return Err("chain_max_length must be positive".into());
        }
        Ok(())
    }
}
