//! Location-aware matching of advertisements, vendors, and players.

pub mod advertisements;
pub mod directory;
pub mod distance;
pub mod geo;
pub mod http;
pub mod origin;
pub mod ranking;
pub mod repository;

#[cfg(test)]
pub(crate) mod test_support;

pub use distance::distance_router;
pub use geo::{haversine_miles, Coordinates, EARTH_RADIUS_MILES};
pub use origin::{resolve_origin, Geocoder, OriginRequest, ZipDirectory};
pub use ranking::{rank, Candidate, Match, ProximityQuery};
