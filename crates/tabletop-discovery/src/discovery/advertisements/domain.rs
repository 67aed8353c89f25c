use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::discovery::geo::Coordinates;
use crate::discovery::ranking::Candidate;

/// Identifier wrapper for advertisements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AdvertisementId(pub String);

/// A banner placed by a vendor or the platform itself.
///
/// Ads carrying both coordinates are anchored to a zip code and only shown nearby;
/// everything else is global.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advertisement {
    pub id: AdvertisementId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub link_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub is_featured: bool,
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_on: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_on: Option<NaiveDate>,
    #[serde(default)]
    pub impressions: u64,
    #[serde(default)]
    pub clicks: u64,
}

impl Advertisement {
    pub fn is_anchored(&self) -> bool {
        self.coordinates().is_some()
    }

    /// Active and inside its optional run window (both ends inclusive).
    pub fn is_live_on(&self, date: NaiveDate) -> bool {
        self.active
            && self.starts_on.map_or(true, |start| start <= date)
            && self.ends_on.map_or(true, |end| date <= end)
    }
}

impl Candidate for Advertisement {
    fn name(&self) -> &str {
        &self.title
    }

    fn is_featured(&self) -> bool {
        self.is_featured
    }

    fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::from_parts(self.latitude, self.longitude)
    }
}

/// Payload accepted when an advertiser books a new placement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAdvertisement {
    pub title: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub link_url: String,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub starts_on: Option<NaiveDate>,
    #[serde(default)]
    pub ends_on: Option<NaiveDate>,
}
