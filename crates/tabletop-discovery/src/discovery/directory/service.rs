use std::sync::Arc;

use tracing::{debug, info};

use super::domain::{
    NewPlayer, NewVendor, Player, PlayerId, SearchRequest, Vendor, VendorId,
};
use super::repository::DirectoryRepository;
use crate::discovery::origin::{place_listing, resolve_origin, Geocoder, PlacementError};
use crate::discovery::ranking::{rank, Match, ProximityQuery};
use crate::discovery::repository::{IdSequence, RepositoryError};
use crate::scheduling::AvailabilitySlot;

/// Vendor and player lookups over a shared geocoder.
pub struct DirectoryService<R, G> {
    repository: Arc<R>,
    geocoder: Arc<G>,
    vendor_ids: IdSequence,
    player_ids: IdSequence,
}

impl<R, G> DirectoryService<R, G>
where
    R: DirectoryRepository + 'static,
    G: Geocoder + 'static,
{
    pub fn new(repository: Arc<R>, geocoder: Arc<G>) -> Self {
        Self {
            repository,
            geocoder,
            vendor_ids: IdSequence::new("vendor"),
            player_ids: IdSequence::new("player"),
        }
    }

    pub fn add_vendor(&self, request: NewVendor) -> Result<Vendor, DirectoryServiceError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(DirectoryServiceError::MissingName);
        }
        let placement = place_listing(
            self.geocoder.as_ref(),
            request.zip_code.as_deref(),
            request.latitude,
            request.longitude,
        )?;

        let vendor = Vendor {
            id: VendorId(self.vendor_ids.next_id()),
            name: name.to_string(),
            description: request.description.trim().to_string(),
            zip_code: placement.zip_code,
            latitude: placement.coordinates.map(|c| c.latitude),
            longitude: placement.coordinates.map(|c| c.longitude),
            is_featured: request.is_featured,
            categories: request.categories,
        };

        let stored = self.repository.insert_vendor(vendor)?;
        info!(vendor_id = %stored.id.0, "vendor listed");
        Ok(stored)
    }

    pub fn add_player(&self, request: NewPlayer) -> Result<Player, DirectoryServiceError> {
        let display_name = request.display_name.trim();
        if display_name.is_empty() {
            return Err(DirectoryServiceError::MissingName);
        }
        let placement = place_listing(
            self.geocoder.as_ref(),
            request.zip_code.as_deref(),
            request.latitude,
            request.longitude,
        )?;

        let player = Player {
            id: PlayerId(self.player_ids.next_id()),
            display_name: display_name.to_string(),
            zip_code: placement.zip_code,
            latitude: placement.coordinates.map(|c| c.latitude),
            longitude: placement.coordinates.map(|c| c.longitude),
            favorite_games: request.favorite_games,
            availability: request.availability,
        };

        let stored = self.repository.insert_player(player)?;
        info!(player_id = %stored.id.0, "player profile created");
        Ok(stored)
    }

    pub fn search_vendors(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<Match<Vendor>>, DirectoryServiceError> {
        let needle = keyword(request);
        let vendors: Vec<Vendor> = self
            .repository
            .vendors()?
            .into_iter()
            .filter(|vendor| needle.as_deref().map_or(true, |n| vendor.matches_keyword(n)))
            .collect();
        Ok(rank(vendors, &self.query_for(request)))
    }

    pub fn search_players(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<Match<Player>>, DirectoryServiceError> {
        let needle = keyword(request);
        let players: Vec<Player> = self
            .repository
            .players()?
            .into_iter()
            .filter(|player| needle.as_deref().map_or(true, |n| player.matches_keyword(n)))
            .collect();
        Ok(rank(players, &self.query_for(request)))
    }

    pub fn get_player(&self, id: &PlayerId) -> Result<Player, DirectoryServiceError> {
        let player = self
            .repository
            .fetch_player(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(player)
    }

    /// Flip one weekly slot on the player's profile; returns the updated profile.
    pub fn toggle_player_availability(
        &self,
        id: &PlayerId,
        slot: AvailabilitySlot,
    ) -> Result<Player, DirectoryServiceError> {
        let (player, enabled) = self.repository.toggle_availability(id, slot)?;
        debug!(player_id = %id.0, day = ?slot.day, period = slot.period.label(), enabled, "availability toggled");
        Ok(player)
    }

    pub fn common_availability(
        &self,
        first: &PlayerId,
        second: &PlayerId,
    ) -> Result<Vec<AvailabilitySlot>, DirectoryServiceError> {
        let first = self.get_player(first)?;
        let second = self.get_player(second)?;
        Ok(first.availability.overlap(&second.availability))
    }

    fn query_for(&self, request: &SearchRequest) -> ProximityQuery {
        ProximityQuery {
            origin: resolve_origin(self.geocoder.as_ref(), &request.origin),
            radius_miles: request.radius_miles,
        }
    }
}

fn keyword(request: &SearchRequest) -> Option<String> {
    request
        .keyword
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_lowercase)
}

/// Error raised by the directory service.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryServiceError {
    #[error("a display name is required")]
    MissingName,
    #[error(transparent)]
    Placement(#[from] PlacementError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
