//! Errors surfaced to callers of the engine.
//!
//! Only setup and configuration problems are reported here. Infeasible
//! candidate routes found during the search are resolved inside the engine
//! (the move is rejected) and never reach the caller.

/// Failure reported while building a [`Fleet`](crate::model::Fleet) or
/// starting an optimization run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FleetError {
    #[error("fleet has no vehicles")]
    NoVehicles,

    #[error("duplicate vehicle id {id}")]
    DuplicateVehicle { id: u32 },

    #[error("duplicate parcel id {id}")]
    DuplicateParcel { id: u32 },

    #[error("vehicle {id} is invalid: {reason}")]
    InvalidVehicle { id: u32, reason: String },

    #[error("parcel {id} is invalid: {reason}")]
    InvalidParcel { id: u32, reason: String },

    /// No vehicle in the fleet can deliver this parcel on a trip of its own.
    #[error("parcel {id} cannot be delivered by any vehicle")]
    UnroutableParcel { id: u32 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
