//! Wind model and wind-adjusted ground speed.

use super::Infeasible;

/// A constant wind vector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Wind {
    pub x: f64,
    pub y: f64,
}

impl Wind {
    pub const CALM: Wind = Wind { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Wind speed `|w|`.
    #[inline]
    pub fn speed(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

impl From<(f64, f64)> for Wind {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Ground speed of a drone flying at `airspeed` toward heading `(dx, dy)`.
///
/// With `alpha` the angle between the heading and the wind direction:
///
/// ```text
/// ground = |w| cos(alpha) + sqrt(v^2 - |w|^2 sin^2(alpha))
/// ```
///
/// The drone crabs into the wind so that its track stays on the heading;
/// this is only possible while `v > |w|`. A zero heading (start equals
/// destination) has no direction and returns the airspeed.
///
/// # Errors
/// [`Infeasible::WindExceedsAirspeed`] when `|w| >= v`. The check happens
/// before anything else so every leg evaluation reports it.
pub fn ground_speed(airspeed: f64, wind: Wind, heading: (f64, f64)) -> Result<f64, Infeasible> {
    let w = wind.speed();
    // `!(w < airspeed)` also catches a NaN airspeed.
    if !(w < airspeed) {
        return Err(Infeasible::WindExceedsAirspeed {
            airspeed,
            wind: w,
        });
    }

    let norm = heading.0.hypot(heading.1);
    if w == 0.0 || norm == 0.0 {
        return Ok(airspeed);
    }

    let cos = ((heading.0 * wind.x + heading.1 * wind.y) / (norm * w)).clamp(-1.0, 1.0);
    let sin_sq = 1.0 - cos * cos;
    Ok(w * cos + (airspeed * airspeed - w * w * sin_sq).sqrt())
}
