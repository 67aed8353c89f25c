//! Board-game lookup backed by a ranked CSV export.
//!
//! The catalog is parsed once and shared behind an `Arc`; there is no global cache.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::discovery::ranking::name_order;

pub const MAX_SEARCH_RESULTS: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardGame {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_published: Option<i32>,
    /// Overall rank; `None` for unranked titles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
    pub users_rated: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to open board game catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse board game catalog: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    id: u64,
    name: String,
    #[serde(rename = "yearpublished", default, deserialize_with = "blank_as_none")]
    year_published: Option<i32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    rank: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    average: Option<f64>,
    #[serde(rename = "usersrated", default, deserialize_with = "blank_as_none")]
    users_rated: Option<u32>,
}

fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// In-memory board game catalog with ranked name search.
#[derive(Debug, Clone, Default)]
pub struct BoardGameCatalog {
    games: Vec<BoardGame>,
    by_id: HashMap<u64, usize>,
}

impl BoardGameCatalog {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut games = Vec::new();
        for row in csv_reader.deserialize::<CatalogRow>() {
            let row = row?;
            let name = row.name.trim().to_string();
            if name.is_empty() {
                continue;
            }
            games.push(BoardGame {
                id: row.id,
                name,
                year_published: row.year_published.filter(|year| *year != 0),
                rank: row.rank.filter(|rank| *rank > 0),
                average_rating: row.average,
                users_rated: row.users_rated.unwrap_or(0),
            });
        }

        Ok(Self::from_games(games))
    }

    pub fn from_games(games: Vec<BoardGame>) -> Self {
        let mut by_id = HashMap::with_capacity(games.len());
        for (index, game) in games.iter().enumerate() {
            by_id.entry(game.id).or_insert(index);
        }
        Self { games, by_id }
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&BoardGame> {
        self.by_id.get(&id).map(|index| &self.games[*index])
    }

    /// Case-insensitive name search: exact, then prefix, then substring matches, each
    /// tier ordered by rank (unranked last) and then name.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&BoardGame> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<(MatchTier, &BoardGame)> = self
            .games
            .iter()
            .filter_map(|game| {
                MatchTier::of(&game.name.to_lowercase(), &needle).map(|tier| (tier, game))
            })
            .collect();

        hits.sort_by(|(tier_a, a), (tier_b, b)| {
            tier_a
                .cmp(tier_b)
                .then_with(|| rank_order(a.rank, b.rank))
                .then_with(|| name_order(&a.name, &b.name))
        });

        hits.into_iter()
            .take(limit.clamp(1, MAX_SEARCH_RESULTS))
            .map(|(_, game)| game)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum MatchTier {
    Exact,
    Prefix,
    Contains,
}

impl MatchTier {
    fn of(haystack: &str, needle: &str) -> Option<Self> {
        if haystack == needle {
            Some(Self::Exact)
        } else if haystack.starts_with(needle) {
            Some(Self::Prefix)
        } else if haystack.contains(needle) {
            Some(Self::Contains)
        } else {
            None
        }
    }
}

fn rank_order(a: Option<u32>, b: Option<u32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
