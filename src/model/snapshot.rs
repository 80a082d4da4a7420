//! Saved route state for tentative moves.

/// Copy of every vehicle's route, keyed by vehicle id.
///
/// Taken before a tentative move and swapped back wholesale when the move
/// is rejected. The snapshot owns its routes, so nothing done to the live
/// fleet afterwards can leak into it.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteSnapshot {
    pub(crate) routes: Vec<(u32, Vec<usize>)>,
}

impl RouteSnapshot {
    /// Route saved for `vehicle_id`.
    pub fn route(&self, vehicle_id: u32) -> Option<&[usize]> {
        self.routes
            .iter()
            .find(|(id, _)| *id == vehicle_id)
            .map(|(_, route)| route.as_slice())
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &[usize])> {
        self.routes.iter().map(|(id, route)| (*id, route.as_slice()))
    }
}
