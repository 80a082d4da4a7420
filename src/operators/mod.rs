//! Neighborhood operators over fleet routes.
//!
//! The operator set is closed: [`Operator`] names every move and
//! [`OperatorPolicy`] decides how often each runs at a given temperature.

mod moves;
mod policy;

pub use moves::{
    adjacent_swap, reinsert_between, reinsert_within, relocate_chain, swallow_nearest, two_opt,
};
pub use policy::OperatorPolicy;

use crate::model::Fleet;
use rand::Rng;

/// A route mutation move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operator {
    AdjacentSwap,
    ReinsertBetween,
    ReinsertWithin,
    SwallowNearest,
    RelocateChain,
    TwoOpt,
}

impl Operator {
    pub const ALL: [Operator; 6] = [
        Operator::AdjacentSwap,
        Operator::ReinsertBetween,
        Operator::ReinsertWithin,
        Operator::SwallowNearest,
        Operator::RelocateChain,
        Operator::TwoOpt,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Operator::AdjacentSwap => "adjacent_swap",
            Operator::ReinsertBetween => "reinsert_between",
            Operator::ReinsertWithin => "reinsert_within",
            Operator::SwallowNearest => "swallow_nearest",
            Operator::RelocateChain => "relocate_chain",
            Operator::TwoOpt => "two_opt",
        }
    }

    /// Position in [`Operator::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Applies the move once to `fleet`.
    pub fn apply<R: Rng>(&self, fleet: &mut Fleet, policy: &OperatorPolicy, rng: &mut R) {
        let (vehicles, parcels) = fleet.parts_mut();
        match self {
            Operator::AdjacentSwap => adjacent_swap(vehicles, rng),
            Operator::ReinsertBetween => reinsert_between(vehicles, rng),
            Operator::ReinsertWithin => reinsert_within(vehicles, rng),
            Operator::SwallowNearest => swallow_nearest(vehicles, parcels, rng),
            Operator::RelocateChain => relocate_chain(vehicles, policy.chain_max_length, rng),
            Operator::TwoOpt => two_opt(vehicles, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_all() {
        for (i, op) in Operator::ALL.iter().enumerate() {
            assert_eq!(op.index(), i);
        }
    }

    #[test]
    fn test_names_unique() {
        let mut names: Vec<&str> = Operator::ALL.iter().map(Operator::name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Operator::ALL.len());
    }
}
