use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::domain::{Advertisement, AdvertisementId};
use crate::discovery::repository::{lock, RepositoryError};

/// Engagement counters tracked per advertisement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdCounter {
    Impressions,
    Clicks,
}

/// Storage abstraction for advertisements.
///
/// `list` returns ads in insertion order; selection relies on that order for its
/// "first global ad" fallback. `increment` must apply the read-modify-write as one step.
pub trait AdvertisementRepository: Send + Sync {
    fn insert(&self, ad: Advertisement) -> Result<Advertisement, RepositoryError>;
    fn fetch(&self, id: &AdvertisementId) -> Result<Option<Advertisement>, RepositoryError>;
    fn list(&self) -> Result<Vec<Advertisement>, RepositoryError>;
    fn set_active(
        &self,
        id: &AdvertisementId,
        active: bool,
    ) -> Result<Advertisement, RepositoryError>;
    fn increment(&self, id: &AdvertisementId, counter: AdCounter) -> Result<u64, RepositoryError>;
}

/// Process-local repository used by the service binary and tests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryAdvertisementRepository {
    ads: Arc<Mutex<Vec<Advertisement>>>,
}

impl AdvertisementRepository for InMemoryAdvertisementRepository {
    fn insert(&self, ad: Advertisement) -> Result<Advertisement, RepositoryError> {
        let mut guard = lock(&self.ads)?;
        if guard.iter().any(|existing| existing.id == ad.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(ad.clone());
        Ok(ad)
    }

    fn fetch(&self, id: &AdvertisementId) -> Result<Option<Advertisement>, RepositoryError> {
        let guard = lock(&self.ads)?;
        Ok(guard.iter().find(|ad| &ad.id == id).cloned())
    }

    fn list(&self) -> Result<Vec<Advertisement>, RepositoryError> {
        Ok(lock(&self.ads)?.clone())
    }

    fn set_active(
        &self,
        id: &AdvertisementId,
        active: bool,
    ) -> Result<Advertisement, RepositoryError> {
        let mut guard = lock(&self.ads)?;
        let ad = guard
            .iter_mut()
            .find(|ad| &ad.id == id)
            .ok_or(RepositoryError::NotFound)?;
        ad.active = active;
        Ok(ad.clone())
    }

    fn increment(&self, id: &AdvertisementId, counter: AdCounter) -> Result<u64, RepositoryError> {
        let mut guard = lock(&self.ads)?;
        let ad = guard
            .iter_mut()
            .find(|ad| &ad.id == id)
            .ok_or(RepositoryError::NotFound)?;
        let slot = match counter {
            AdCounter::Impressions => &mut ad.impressions,
            AdCounter::Clicks => &mut ad.clicks,
        };
        *slot = slot.saturating_add(1);
        Ok(*slot)
    }
}
