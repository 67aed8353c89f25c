//! Advertisement placement, per-user selection, and engagement tracking.

pub mod domain;
pub mod repository;
pub mod router;
pub mod selection;
pub mod service;


pub use domain::{Advertisement, AdvertisementId, NewAdvertisement};
pub use repository::{AdCounter, AdvertisementRepository, InMemoryAdvertisementRepository};
pub use router::{advertisement_router, AdvertisementApi};
pub use selection::{select_advertisement, DEFAULT_AD_RADIUS_MILES};
pub use service::{AdvertisementService, AdvertisementServiceError, AdvertisementValidationError};
