//! Resolution of the searching user's reference point.
//!
//! An origin comes from an explicit coordinate pair, a free-text search string, or the
//! zip code stored on the user's profile. Lookups go through the [`Geocoder`] seam so the
//! zip table can be swapped for a remote service without touching the ranking code.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::geo::{CoordinateError, Coordinates};

/// Turns zip codes and place names into coordinates.
pub trait Geocoder: Send + Sync {
    /// `Ok(None)` means the lookup ran but found nothing.
    fn geocode(&self, query: &str) -> Result<Option<Coordinates>, GeocodeError>;
}

#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("failed to read zip directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse zip directory: {0}")]
    Csv(#[from] csv::Error),
    #[error("geocoder unavailable: {0}")]
    Unavailable(String),
}

/// Caller-supplied hints for locating the searching user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OriginRequest {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub profile_zip: Option<String>,
}

/// Picks the origin for a request: explicit coordinates, then the search text, then the
/// profile zip.
///
/// A search string that cannot be geocoded yields no origin rather than silently falling
/// back to the profile, so callers degrade to the name-sorted listing.
pub fn resolve_origin<G>(geocoder: &G, request: &OriginRequest) -> Option<Coordinates>
where
    G: Geocoder + ?Sized,
{
    if let Some(coordinates) = Coordinates::from_parts(request.latitude, request.longitude) {
        return Some(coordinates);
    }

    if let Some(search) = non_blank(request.search.as_deref()) {
        return match geocoder.geocode(search) {
            Ok(Some(coordinates)) => Some(coordinates),
            Ok(None) => {
                debug!(search, "search location did not geocode");
                None
            }
            Err(err) => {
                warn!(search, error = %err, "geocoding failed, continuing without origin");
                None
            }
        };
    }

    let zip = non_blank(request.profile_zip.as_deref())?;
    match geocoder.geocode(zip) {
        Ok(found) => found,
        Err(err) => {
            warn!(zip, error = %err, "profile zip lookup failed, continuing without origin");
            None
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Reduces `78701`, `78701-1234`, and ` 78701 ` to the five-digit form.
pub fn normalize_zip(raw: &str) -> Option<String> {
    let digits: String = raw
        .trim()
        .chars()
        .take_while(|ch| ch.is_ascii_digit())
        .collect();
    (digits.len() >= 5).then(|| digits[..5].to_string())
}

/// Where a new listing lives once its zip code and coordinates are reconciled.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingPlacement {
    pub zip_code: Option<String>,
    pub coordinates: Option<Coordinates>,
}

#[derive(Debug, thiserror::Error)]
pub enum PlacementError {
    #[error(transparent)]
    Coordinates(#[from] CoordinateError),
    #[error("'{0}' is not a valid zip code")]
    InvalidZip(String),
    #[error("zip code {0} could not be located")]
    UnknownZip(String),
    #[error(transparent)]
    Geocode(#[from] GeocodeError),
}

/// Normalizes a listing's zip and fills in coordinates from it when none were supplied.
pub fn place_listing<G>(
    geocoder: &G,
    zip_code: Option<&str>,
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<ListingPlacement, PlacementError>
where
    G: Geocoder + ?Sized,
{
    let explicit = Coordinates::checked(latitude, longitude)?;
    let zip_code = match non_blank(zip_code) {
        Some(raw) => {
            Some(normalize_zip(raw).ok_or_else(|| PlacementError::InvalidZip(raw.to_string()))?)
        }
        None => None,
    };

    let coordinates = match (explicit, zip_code.as_deref()) {
        (Some(coordinates), _) => Some(coordinates),
        (None, Some(zip)) => Some(
            geocoder
                .geocode(zip)?
                .ok_or_else(|| PlacementError::UnknownZip(zip.to_string()))?,
        ),
        (None, None) => None,
    };

    Ok(ListingPlacement {
        zip_code,
        coordinates,
    })
}

#[derive(Debug, Clone, Deserialize)]
struct ZipRow {
    zip: String,
    #[serde(default)]
    city: String,
    #[serde(default)]
    state: String,
    latitude: f64,
    longitude: f64,
}

/// Zip-code and city lookup table loaded from CSV (`zip,city,state,latitude,longitude`).
#[derive(Debug, Clone, Default)]
pub struct ZipDirectory {
    by_zip: HashMap<String, Coordinates>,
    by_place: HashMap<String, Coordinates>,
    by_city: HashMap<String, Coordinates>,
}

impl ZipDirectory {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, GeocodeError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, GeocodeError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut directory = Self::default();

        for row in csv_reader.deserialize::<ZipRow>() {
            let row = row?;
            let Some(zip) = normalize_zip(&row.zip) else {
                continue;
            };
            let coordinates = Coordinates::new(row.latitude, row.longitude);
            directory.by_zip.entry(zip).or_insert(coordinates);

            let city = row.city.to_lowercase();
            if city.is_empty() {
                continue;
            }
            // first zip listed for a city stands in for the whole city
            directory
                .by_place
                .entry(format!("{}, {}", city, row.state.to_lowercase()))
                .or_insert(coordinates);
            directory.by_city.entry(city).or_insert(coordinates);
        }

        Ok(directory)
    }

    pub fn len(&self) -> usize {
        self.by_zip.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_zip.is_empty()
    }

    pub fn lookup_zip(&self, zip: &str) -> Option<Coordinates> {
        normalize_zip(zip).and_then(|zip| self.by_zip.get(&zip).copied())
    }

    fn lookup_place(&self, text: &str) -> Option<Coordinates> {
        let lowered = text.trim().to_lowercase();
        let collapsed = lowered
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        self.by_place
            .get(&collapsed)
            .or_else(|| self.by_city.get(&collapsed))
            .or_else(|| {
                collapsed
                    .split(", ")
                    .next()
                    .and_then(|city| self.by_city.get(city))
            })
            .copied()
    }
}

impl Geocoder for ZipDirectory {
    fn geocode(&self, query: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let zip_token = query
            .split(|ch: char| !ch.is_ascii_alphanumeric() && ch != '-')
            .find_map(normalize_zip);

        if let Some(zip) = zip_token {
            return Ok(self.lookup_zip(&zip));
        }

        Ok(self.lookup_place(query))
    }
}
