use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use super::domain::{Advertisement, AdvertisementId, NewAdvertisement};
use super::repository::{AdCounter, AdvertisementRepository};
use super::selection::select_advertisement;
use crate::discovery::geo::Coordinates;
use crate::discovery::origin::{place_listing, resolve_origin, Geocoder, OriginRequest, PlacementError};
use crate::discovery::ranking::{rank, Match, ProximityQuery};
use crate::discovery::repository::{IdSequence, RepositoryError};

/// Service composing the advertisement repository, geocoder, and selection rules.
pub struct AdvertisementService<R, G> {
    repository: Arc<R>,
    geocoder: Arc<G>,
    radius_miles: f64,
    ids: IdSequence,
}

impl<R, G> AdvertisementService<R, G>
where
    R: AdvertisementRepository + 'static,
    G: Geocoder + 'static,
{
    pub fn new(repository: Arc<R>, geocoder: Arc<G>, radius_miles: f64) -> Self {
        Self {
            repository,
            geocoder,
            radius_miles,
            ids: IdSequence::new("ad"),
        }
    }

    pub fn radius_miles(&self) -> f64 {
        self.radius_miles
    }

    /// Book a new placement. Zip-only ads are anchored through the geocoder.
    pub fn create(
        &self,
        request: NewAdvertisement,
    ) -> Result<Advertisement, AdvertisementServiceError> {
        let title = request.title.trim();
        if title.is_empty() {
            return Err(AdvertisementValidationError::MissingTitle.into());
        }
        let link_url = request.link_url.trim();
        if !(link_url.starts_with("https://") || link_url.starts_with("http://")) {
            return Err(AdvertisementValidationError::InvalidLink(link_url.to_string()).into());
        }
        if let (Some(start), Some(end)) = (request.starts_on, request.ends_on) {
            if end < start {
                return Err(AdvertisementValidationError::InvertedWindow { start, end }.into());
            }
        }

        let placement = place_listing(
            self.geocoder.as_ref(),
            request.zip_code.as_deref(),
            request.latitude,
            request.longitude,
        )?;

        let ad = Advertisement {
            id: AdvertisementId(self.ids.next_id()),
            title: title.to_string(),
            image_url: request.image_url,
            link_url: link_url.to_string(),
            zip_code: placement.zip_code,
            latitude: placement.coordinates.map(|c| c.latitude),
            longitude: placement.coordinates.map(|c| c.longitude),
            is_featured: request.is_featured,
            active: true,
            starts_on: request.starts_on,
            ends_on: request.ends_on,
            impressions: 0,
            clicks: 0,
        };

        let stored = self.repository.insert(ad)?;
        info!(ad_id = %stored.id.0, anchored = stored.is_anchored(), "advertisement created");
        Ok(stored)
    }

    /// Every advertisement, featured first then by title.
    pub fn list(&self) -> Result<Vec<Match<Advertisement>>, AdvertisementServiceError> {
        let ads = self.repository.list()?;
        Ok(rank(ads, &ProximityQuery::default()))
    }

    /// Live ads near `origin`. Without a radius every live ad is returned.
    pub fn nearby(
        &self,
        origin: Option<Coordinates>,
        radius_miles: Option<f64>,
        today: NaiveDate,
    ) -> Result<Vec<Match<Advertisement>>, AdvertisementServiceError> {
        let live = self.live_ads(today)?;
        let query = ProximityQuery {
            origin,
            radius_miles,
        };
        Ok(rank(live, &query))
    }

    /// Choose the ad to show this user today and count the impression.
    pub fn select_for(
        &self,
        user: Option<Coordinates>,
        today: NaiveDate,
    ) -> Result<Option<Advertisement>, AdvertisementServiceError> {
        let live = self.live_ads(today)?;
        let Some(chosen) = select_advertisement(&live, user, self.radius_miles) else {
            debug!("no live advertisement to serve");
            return Ok(None);
        };

        let mut chosen = chosen.clone();
        chosen.impressions = self
            .repository
            .increment(&chosen.id, AdCounter::Impressions)?;
        Ok(Some(chosen))
    }

    pub fn record_click(&self, id: &AdvertisementId) -> Result<u64, AdvertisementServiceError> {
        let clicks = self.repository.increment(id, AdCounter::Clicks)?;
        Ok(clicks)
    }

    pub fn set_active(
        &self,
        id: &AdvertisementId,
        active: bool,
    ) -> Result<Advertisement, AdvertisementServiceError> {
        let updated = self.repository.set_active(id, active)?;
        info!(ad_id = %id.0, active, "advertisement status changed");
        Ok(updated)
    }

    /// Locate the requesting user with the same geocoder used for placements.
    pub fn resolve_origin(&self, request: &OriginRequest) -> Option<Coordinates> {
        resolve_origin(self.geocoder.as_ref(), request)
    }

    fn live_ads(&self, today: NaiveDate) -> Result<Vec<Advertisement>, RepositoryError> {
        Ok(self
            .repository
            .list()?
            .into_iter()
            .filter(|ad| ad.is_live_on(today))
            .collect())
    }
}

/// Reasons a placement request is rejected before it reaches storage.
#[derive(Debug, thiserror::Error)]
pub enum AdvertisementValidationError {
    #[error("advertisement title is required")]
    MissingTitle,
    #[error("link '{0}' must be an http(s) URL")]
    InvalidLink(String),
    #[error("run window ends ({end}) before it starts ({start})")]
    InvertedWindow { start: NaiveDate, end: NaiveDate },
    #[error(transparent)]
    Placement(#[from] PlacementError),
}

/// Error raised by the advertisement service.
#[derive(Debug, thiserror::Error)]
pub enum AdvertisementServiceError {
    #[error(transparent)]
    Validation(#[from] AdvertisementValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<PlacementError> for AdvertisementServiceError {
    fn from(value: PlacementError) -> Self {
        Self::Validation(AdvertisementValidationError::Placement(value))
    }
}
