use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::geo::Coordinates;

/// Anything that can be placed on the proximity board: advertisements, vendors, players.
pub trait Candidate {
    fn name(&self) -> &str;
    fn is_featured(&self) -> bool;
    fn coordinates(&self) -> Option<Coordinates>;
}

/// A candidate paired with its distance from the searching user.
///
/// Matches are computed per request and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match<T> {
    #[serde(flatten)]
    pub candidate: T,
    #[serde(rename = "distanceMiles", skip_serializing_if = "Option::is_none")]
    pub distance_miles: Option<f64>,
}

/// Reference point and optional radius for a ranking pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProximityQuery {
    pub origin: Option<Coordinates>,
    pub radius_miles: Option<f64>,
}

impl ProximityQuery {
    pub fn within(origin: Coordinates, radius_miles: f64) -> Self {
        Self {
            origin: Some(origin),
            radius_miles: Some(radius_miles),
        }
    }

    pub fn browse(origin: Option<Coordinates>) -> Self {
        Self {
            origin,
            radius_miles: None,
        }
    }

    /// Radius filtering only applies when there is somewhere to measure from.
    pub fn is_distance_filtered(&self) -> bool {
        self.origin.is_some() && self.radius_miles.is_some()
    }
}

/// Filters and orders candidates for a search.
///
/// With both an origin and a radius only candidates inside the radius survive and
/// the order is featured, then nearest, then name. Otherwise every candidate is
/// returned (distance attached where it can be computed) ordered by featured then name.
pub fn rank<T: Candidate>(candidates: Vec<T>, query: &ProximityQuery) -> Vec<Match<T>> {
    let filtered = query.is_distance_filtered();
    let radius = query.radius_miles.unwrap_or(f64::INFINITY);

    let mut matches: Vec<Match<T>> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let distance_miles = distance_from(query.origin, &candidate);
            if filtered {
                match distance_miles {
                    Some(distance) if distance <= radius => {}
                    _ => return None,
                }
            }
            Some(Match {
                candidate,
                distance_miles,
            })
        })
        .collect();

    if filtered {
        matches.sort_by(compare_by_proximity);
    } else {
        matches.sort_by(compare_by_name);
    }
    matches
}

fn distance_from<T: Candidate>(origin: Option<Coordinates>, candidate: &T) -> Option<f64> {
    let origin = origin?;
    let position = candidate.coordinates()?;
    let distance = origin.distance_miles(&position);
    distance.is_finite().then_some(distance)
}

fn compare_by_proximity<T: Candidate>(a: &Match<T>, b: &Match<T>) -> Ordering {
    featured_first(a, b)
        .then_with(|| nearest_first(a.distance_miles, b.distance_miles))
        .then_with(|| name_order(a.candidate.name(), b.candidate.name()))
}

fn compare_by_name<T: Candidate>(a: &Match<T>, b: &Match<T>) -> Ordering {
    featured_first(a, b).then_with(|| name_order(a.candidate.name(), b.candidate.name()))
}

fn featured_first<T: Candidate>(a: &Match<T>, b: &Match<T>) -> Ordering {
    b.candidate
        .is_featured()
        .cmp(&a.candidate.is_featured())
}

fn nearest_first(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub(crate) fn name_order(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}
