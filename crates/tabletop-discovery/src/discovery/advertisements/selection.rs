use crate::discovery::geo::Coordinates;
use crate::discovery::ranking::Candidate;

use super::domain::Advertisement;

/// Default reach of a zip-anchored advertisement.
pub const DEFAULT_AD_RADIUS_MILES: f64 = 50.0;

/// Picks the single advertisement to show a user.
///
/// Preference order: the closest anchored ad within `radius_miles` of the user, the first
/// global ad, then whatever comes first. `ads` is expected to hold live ads only.
pub fn select_advertisement<'a>(
    ads: &'a [Advertisement],
    user: Option<Coordinates>,
    radius_miles: f64,
) -> Option<&'a Advertisement> {
    if let Some(user) = user {
        let mut closest: Option<(&Advertisement, f64)> = None;
        for ad in ads {
            let Some(position) = ad.coordinates() else {
                continue;
            };
            let distance = user.distance_miles(&position);
            if distance.is_nan() || distance > radius_miles {
                continue;
            }
            // strict comparison keeps the earlier ad on ties
            if closest.map_or(true, |(_, best)| distance < best) {
                closest = Some((ad, distance));
            }
        }
        if let Some((ad, _)) = closest {
            return Some(ad);
        }
    }

    ads.iter()
        .find(|ad| !ad.is_anchored())
        .or_else(|| ads.first())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::advertisements::domain::AdvertisementId;

    const AUSTIN: Coordinates = Coordinates::new(30.2672, -97.7431);
    const ROUND_ROCK: Coordinates = Coordinates::new(30.5083, -97.6789);
    const SAN_ANTONIO: Coordinates = Coordinates::new(29.4241, -98.4936);
    const DALLAS: Coordinates = Coordinates::new(32.7767, -96.7970);

    fn ad(id: &str, at: Option<Coordinates>) -> Advertisement {
        Advertisement {
            id: AdvertisementId(id.to_string()),
            title: id.to_string(),
            image_url: None,
            link_url: format!("https://ads.example/{id}"),
            zip_code: None,
            latitude: at.map(|c| c.latitude),
            longitude: at.map(|c| c.longitude),
            is_featured: false,
            active: true,
            starts_on: None,
            ends_on: None,
            impressions: 0,
            clicks: 0,
        }
    }

    fn picked(ads: &[Advertisement], user: Option<Coordinates>) -> Option<&str> {
        select_advertisement(ads, user, DEFAULT_AD_RADIUS_MILES).map(|ad| ad.id.0.as_str())
    }

    #[test]
    fn closest_anchored_ad_wins() {
        let ads = vec![
            ad("global", None),
            ad("san-antonio", Some(SAN_ANTONIO)),
            ad("round-rock", Some(ROUND_ROCK)),
        ];
        assert_eq!(picked(&ads, Some(AUSTIN)), Some("round-rock"));
    }

    #[test]
    fn anchored_ads_beyond_radius_fall_back_to_global() {
        let ads = vec![
            ad("dallas", Some(DALLAS)),
            ad("global-a", None),
            ad("global-b", None),
        ];
        assert_eq!(picked(&ads, Some(AUSTIN)), Some("global-a"));
    }

    #[test]
    fn without_global_ads_any_ad_is_used() {
        let ads = vec![ad("dallas", Some(DALLAS)), ad("san-antonio", Some(SAN_ANTONIO))];
        assert_eq!(picked(&ads, Some(AUSTIN)), Some("dallas"));
    }

    #[test]
    fn unknown_user_location_skips_anchored_matching() {
        let ads = vec![ad("round-rock", Some(ROUND_ROCK)), ad("global", None)];
        assert_eq!(picked(&ads, None), Some("global"));
    }

    #[test]
    fn equal_distances_keep_input_order() {
        let ads = vec![ad("first", Some(ROUND_ROCK)), ad("second", Some(ROUND_ROCK))];
        assert_eq!(picked(&ads, Some(AUSTIN)), Some("first"));
    }

    #[test]
    fn no_ads_means_no_selection() {
        assert_eq!(picked(&[], Some(AUSTIN)), None);
    }

    #[test]
    fn radius_is_configurable() {
        let ads = vec![ad("global", None), ad("san-antonio", Some(SAN_ANTONIO))];
        let selected = select_advertisement(&ads, Some(AUSTIN), 100.0).expect("ad selected");
        assert_eq!(selected.id.0, "san-antonio");
    }
}
