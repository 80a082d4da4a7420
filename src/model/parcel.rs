//! Delivery requests.

use super::point::Point;

/// An immutable delivery request.
///
/// Parcels are never mutated during a run; the engine only moves their
/// indices between vehicle routes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parcel {
    pub id: u32,
    /// Delivery demand, in the same unit as vehicle capacity.
    pub weight: f64,
    pub position: Point,
}

impl Parcel {
    pub fn new(id: u32, weight: f64, position: impl Into<Point>) -> Self {
        Self {
            id,
            weight,
            position: position.into(),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(format!(
                "weight must be finite and non-negative, got {}",
                self.weight
            ));
        }
        if !self.position.x.is_finite() || !self.position.y.is_finite() {
            return Err("position must be finite".into());
        }
        Ok(())
    }
}
