//! Vendor and player listings searched by proximity.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{NewPlayer, NewVendor, Player, PlayerId, SearchRequest, Vendor, VendorId};
pub use repository::{DirectoryRepository, InMemoryDirectoryRepository};
pub use router::{directory_router, DirectoryApi};
pub use service::{DirectoryService, DirectoryServiceError};
