use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use super::domain::{Player, PlayerId, Vendor, VendorId};
use crate::discovery::repository::{lock, RepositoryError};
use crate::scheduling::AvailabilitySlot;

/// Storage abstraction for vendor and player listings.
///
/// `toggle_availability` must flip the slot and store the result as one step.
pub trait DirectoryRepository: Send + Sync {
    fn insert_vendor(&self, vendor: Vendor) -> Result<Vendor, RepositoryError>;
    fn vendors(&self) -> Result<Vec<Vendor>, RepositoryError>;

    fn insert_player(&self, player: Player) -> Result<Player, RepositoryError>;
    fn fetch_player(&self, id: &PlayerId) -> Result<Option<Player>, RepositoryError>;
    fn toggle_availability(
        &self,
        id: &PlayerId,
        slot: AvailabilitySlot,
    ) -> Result<(Player, bool), RepositoryError>;
    fn players(&self) -> Result<Vec<Player>, RepositoryError>;
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryDirectoryRepository {
    vendors: Arc<Mutex<BTreeMap<VendorId, Vendor>>>,
    players: Arc<Mutex<BTreeMap<PlayerId, Player>>>,
}

impl DirectoryRepository for InMemoryDirectoryRepository {
    fn insert_vendor(&self, vendor: Vendor) -> Result<Vendor, RepositoryError> {
        let mut guard = lock(&self.vendors)?;
        if guard.contains_key(&vendor.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(vendor.id.clone(), vendor.clone());
        Ok(vendor)
    }

    fn vendors(&self) -> Result<Vec<Vendor>, RepositoryError> {
        Ok(lock(&self.vendors)?.values().cloned().collect())
    }

    fn insert_player(&self, player: Player) -> Result<Player, RepositoryError> {
        let mut guard = lock(&self.players)?;
        if guard.contains_key(&player.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(player.id.clone(), player.clone());
        Ok(player)
    }

    fn fetch_player(&self, id: &PlayerId) -> Result<Option<Player>, RepositoryError> {
        Ok(lock(&self.players)?.get(id).cloned())
    }

    fn toggle_availability(
        &self,
        id: &PlayerId,
        slot: AvailabilitySlot,
    ) -> Result<(Player, bool), RepositoryError> {
        let mut guard = lock(&self.players)?;
        let player = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        let enabled = player.availability.toggle(slot);
        Ok((player.clone(), enabled))
    }

    fn players(&self) -> Result<Vec<Player>, RepositoryError> {
        Ok(lock(&self.players)?.values().cloned().collect())
    }
}
