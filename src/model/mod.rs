//! Problem model: geometry, parcels, vehicles and the fleet that owns them.

mod descriptor;
mod fleet;
mod parcel;
mod point;
mod snapshot;
mod vehicle;

pub use descriptor::{ParcelRecord, ProblemDescriptor, VehicleRecord};
pub use fleet::Fleet;
pub use parcel::Parcel;
pub use point::{distance, polyline_length, Point};
pub use snapshot::RouteSnapshot;
pub use vehicle::Vehicle;
