use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tabletop_discovery::catalog::BoardGameCatalog;
use tabletop_discovery::config::DiscoveryConfig;
use tabletop_discovery::discovery::advertisements::{
    AdvertisementApi, AdvertisementService, InMemoryAdvertisementRepository,
};
use tabletop_discovery::discovery::directory::{
    DirectoryApi, DirectoryService, InMemoryDirectoryRepository,
};
use tabletop_discovery::discovery::http::AdminToken;
use tabletop_discovery::discovery::ZipDirectory;
use tabletop_discovery::error::AppError;
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type AdvertisementHandle =
    AdvertisementApi<InMemoryAdvertisementRepository, ZipDirectory>;
pub(crate) type DirectoryHandle = DirectoryApi<InMemoryDirectoryRepository, ZipDirectory>;

/// Everything the discovery routes need, wired against in-memory storage.
#[derive(Clone)]
pub(crate) struct DiscoveryServices {
    pub(crate) advertisements: AdvertisementHandle,
    pub(crate) directory: DirectoryHandle,
    pub(crate) catalog: Arc<BoardGameCatalog>,
}

impl DiscoveryServices {
    pub(crate) fn load(config: &DiscoveryConfig) -> Result<Self, AppError> {
        let zips = match &config.zip_directory_csv {
            Some(path) => {
                let directory = ZipDirectory::from_path(path)?;
                info!(path = %path.display(), entries = directory.len(), "zip directory loaded");
                directory
            }
            None => {
                warn!("APP_ZIP_DIRECTORY_CSV not set; zip and city searches will not resolve");
                ZipDirectory::default()
            }
        };

        let catalog = match &config.boardgames_csv {
            Some(path) => {
                let catalog = BoardGameCatalog::from_path(path)?;
                info!(path = %path.display(), games = catalog.len(), "board game catalog loaded");
                catalog
            }
            None => {
                warn!("APP_BOARDGAMES_CSV not set; board game search is empty");
                BoardGameCatalog::default()
            }
        };

        Ok(Self::build(
            zips,
            catalog,
            config.ad_radius_miles,
            config.admin_token.clone(),
        ))
    }

    pub(crate) fn build(
        zips: ZipDirectory,
        catalog: BoardGameCatalog,
        ad_radius_miles: f64,
        admin_token: Option<String>,
    ) -> Self {
        let geocoder = Arc::new(zips);
        let admin = AdminToken::new(admin_token);

        let advertisements = AdvertisementApi {
            service: Arc::new(AdvertisementService::new(
                Arc::new(InMemoryAdvertisementRepository::default()),
                Arc::clone(&geocoder),
                ad_radius_miles,
            )),
            admin: admin.clone(),
        };
        let directory = DirectoryApi {
            service: Arc::new(DirectoryService::new(
                Arc::new(InMemoryDirectoryRepository::default()),
                geocoder,
            )),
            admin,
        };

        Self {
            advertisements,
            directory,
            catalog: Arc::new(catalog),
        }
    }
}

pub(crate) fn parse_finite(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|err| format!("'{raw}' is not a number ({err})"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("'{raw}' is not a finite number"))
    }
}
