//! Problem descriptor records exchanged with external loaders.
//!
//! Field names follow the stored instance format: `wind`, `position`,
//! `drones` and `parcels`, with vehicles and parcels identified by
//! `number`. Reading and writing files is left to the caller; with the
//! `serde` feature these types (de)serialize directly.

use super::fleet::Fleet;
use super::parcel::Parcel;
use super::vehicle::Vehicle;
use crate::cost::CostMetric;
use crate::error::FleetError;

/// A vehicle as recorded in a problem descriptor.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleRecord {
    #[cfg_attr(feature = "serde", serde(rename = "number"))]
    pub id: u32,
    pub max_capacity: f64,
    pub max_speed: f64,
}

/// A parcel as recorded in a problem descriptor.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParcelRecord {
    #[cfg_attr(feature = "serde", serde(rename = "number"))]
    pub id: u32,
    pub weight: f64,
    pub x: f64,
    pub y: f64,
}

/// Wind, base position, vehicle and parcel records of one instance.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProblemDescriptor {
    pub wind: [f64; 2],
    pub position: [f64; 2],
    #[cfg_attr(feature = "serde", serde(rename = "drones"))]
    pub vehicles: Vec<VehicleRecord>,
    pub parcels: Vec<ParcelRecord>,
}

impl ProblemDescriptor {
    /// Builds a validated fleet with empty routes.
    ///
    /// Vehicles get the default flight model of [`Vehicle::new`].
    pub fn into_fleet(self, metric: CostMetric) -> Result<Fleet, FleetError> {
        let vehicles = self
            .vehicles
            .iter()
            .map(|r| Vehicle::new(r.id, r.max_capacity, r.max_speed))
            .collect();
        let parcels = self
            .parcels
            .iter()
            .map(|r| Parcel::new(r.id, r.weight, (r.x, r.y)))
            .collect();
        Fleet::new(
            (self.position[0], self.position[1]),
            (self.wind[0], self.wind[1]),
            metric,
            vehicles,
            parcels,
        )
    }
}

impl Fleet {
    /// Descriptor records of this fleet. Routes are not part of the format.
    pub fn descriptor(&self) -> ProblemDescriptor {
        ProblemDescriptor {
            wind: [self.wind().x, self.wind().y],
            position: [self.base().x, self.base().y],
            vehicles: self
                .vehicles()
                .iter()
                .map(|v| VehicleRecord {
                    id: v.id,
                    max_capacity: v.max_capacity,
                    max_speed: v.max_speed,
                })
                .collect(),
            parcels: self
                .parcels()
                .iter()
                .map(|p| ParcelRecord {
                    id: p.id,
                    weight: p.weight,
                    x: p.position.x,
                    y: p.position.y,
                })
                .collect(),
        }
    }
}
