use serde::{Deserialize, Serialize};

use crate::discovery::geo::Coordinates;
use crate::discovery::origin::OriginRequest;
use crate::discovery::ranking::Candidate;
use crate::scheduling::WeeklyAvailability;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VendorId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub String);

/// Game store, convention booth, or other marketplace seller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    pub id: VendorId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub categories: Vec<String>,
}

impl Candidate for Vendor {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_featured(&self) -> bool {
        self.is_featured
    }

    fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::from_parts(self.latitude, self.longitude)
    }
}

/// Player profile as exposed to the "find players near me" search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub favorite_games: Vec<String>,
    #[serde(default)]
    pub availability: WeeklyAvailability,
}

impl Candidate for Player {
    fn name(&self) -> &str {
        &self.display_name
    }

    fn is_featured(&self) -> bool {
        false
    }

    fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::from_parts(self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVendor {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlayer {
    pub display_name: String,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub favorite_games: Vec<String>,
    #[serde(default)]
    pub availability: WeeklyAvailability,
}

/// Directory search: where the user is, how far to look, and an optional keyword.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchRequest {
    pub origin: OriginRequest,
    pub radius_miles: Option<f64>,
    pub keyword: Option<String>,
}

impl Vendor {
    pub(crate) fn matches_keyword(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self
                .categories
                .iter()
                .any(|category| category.to_lowercase().contains(needle))
    }
}

impl Player {
    pub(crate) fn matches_keyword(&self, needle: &str) -> bool {
        self.display_name.to_lowercase().contains(needle)
            || self
                .favorite_games
                .iter()
                .any(|game| game.to_lowercase().contains(needle))
    }
}
