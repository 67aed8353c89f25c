use std::sync::Arc;

use crate::discovery::directory::domain::{NewPlayer, NewVendor, Player, PlayerId, Vendor};
use crate::discovery::directory::repository::{DirectoryRepository, InMemoryDirectoryRepository};
use crate::discovery::directory::{directory_router, DirectoryApi, DirectoryService};
use crate::discovery::http::AdminToken;
use crate::discovery::origin::ZipDirectory;
use crate::discovery::repository::RepositoryError;
use crate::discovery::test_support::zip_directory;
use crate::scheduling::{AvailabilitySlot, DayPeriod, WeeklyAvailability};
use chrono::Weekday;

pub(super) type MemoryService = DirectoryService<InMemoryDirectoryRepository, ZipDirectory>;

pub(super) const ADMIN_TOKEN: &str = "vendor-admin";

pub(super) fn build_service() -> Arc<MemoryService> {
    Arc::new(DirectoryService::new(
        Arc::new(InMemoryDirectoryRepository::default()),
        zip_directory(),
    ))
}

pub(super) fn router(service: Arc<MemoryService>) -> axum::Router {
    directory_router(DirectoryApi {
        service,
        admin: AdminToken::new(Some(ADMIN_TOKEN.to_string())),
    })
}

pub(super) fn vendor(name: &str, zip: Option<&str>, featured: bool) -> NewVendor {
    NewVendor {
        name: name.to_string(),
        description: format!("{name} sells games"),
        zip_code: zip.map(str::to_string),
        is_featured: featured,
        categories: vec!["board games".to_string()],
        ..NewVendor::default()
    }
}

pub(super) fn player(name: &str, zip: Option<&str>, games: &[&str]) -> NewPlayer {
    NewPlayer {
        display_name: name.to_string(),
        zip_code: zip.map(str::to_string),
        favorite_games: games.iter().map(|game| game.to_string()).collect(),
        ..NewPlayer::default()
    }
}

pub(super) const FRIDAY_EVENING: AvailabilitySlot =
    AvailabilitySlot::new(Weekday::Fri, DayPeriod::Evening);
pub(super) const SUNDAY_AFTERNOON: AvailabilitySlot =
    AvailabilitySlot::new(Weekday::Sun, DayPeriod::Afternoon);

pub(super) fn weekly(slots: &[AvailabilitySlot]) -> WeeklyAvailability {
    slots.iter().copied().collect()
}

pub(super) fn seed_vendors(service: &MemoryService) -> Vec<Vendor> {
    [
        vendor("Round Rock Games", Some("78664"), false),
        vendor("Georgetown Guild", Some("78626"), true),
        vendor("Alamo Meeples", Some("78205"), false),
        vendor("Mail Order Minis", None, false),
        vendor("austin dice", Some("78701"), false),
    ]
    .into_iter()
    .map(|request| service.add_vendor(request).expect("vendor added"))
    .collect()
}

pub(super) struct UnavailableRepository;

impl DirectoryRepository for UnavailableRepository {
    fn insert_vendor(&self, _vendor: Vendor) -> Result<Vendor, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn vendors(&self) -> Result<Vec<Vendor>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_player(&self, _player: Player) -> Result<Player, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_player(&self, _id: &PlayerId) -> Result<Option<Player>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn toggle_availability(
        &self,
        _id: &PlayerId,
        _slot: AvailabilitySlot,
    ) -> Result<(Player, bool), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn players(&self) -> Result<Vec<Player>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}
