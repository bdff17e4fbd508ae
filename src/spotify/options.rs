//! Query option shapes accepted by the endpoint methods.
//!
//! Every field is optional unless the endpoint requires it. Unset fields (and
//! empty lists) never reach the query string.

use std::fmt;

use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::utils::join_comma;

fn comma_separated<T: fmt::Display, S: Serializer>(values: &[T], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&join_comma(values))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarketOptions {
    /// ISO 3166-1 alpha-2 country code, e.g. `"ES"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,
}

impl MarketOptions {
    pub fn market(market: impl Into<String>) -> Self {
        Self {
            market: Some(market.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarketPageOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CountryPageOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IncludeGroup {
    Album,
    Single,
    AppearsOn,
    Compilation,
}

impl fmt::Display for IncludeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IncludeGroup::Album => write!(f, "album"),
            IncludeGroup::Single => write!(f, "single"),
            IncludeGroup::AppearsOn => write!(f, "appears_on"),
            IncludeGroup::Compilation => write!(f, "compilation"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArtistAlbumsOptions {
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "comma_separated"
    )]
    pub include_groups: Vec<IncludeGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    Album,
    Artist,
    Playlist,
    Track,
    Show,
    Episode,
}

impl SearchType {
    pub const ALL: &'static [SearchType] = &[
        SearchType::Album,
        SearchType::Artist,
        SearchType::Playlist,
        SearchType::Track,
        SearchType::Show,
        SearchType::Episode,
    ];
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchType::Album => write!(f, "album"),
            SearchType::Artist => write!(f, "artist"),
            SearchType::Playlist => write!(f, "playlist"),
            SearchType::Track => write!(f, "track"),
            SearchType::Show => write!(f, "show"),
            SearchType::Episode => write!(f, "episode"),
        }
    }
}

impl std::str::FromStr for SearchType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SearchType::ALL
            .iter()
            .find(|kind| kind.to_string() == s)
            .copied()
            .ok_or_else(|| format!("unknown search type '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IncludeExternal {
    /// The caller can play externally hosted audio.
    Audio,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOptions {
    /// Search query, field filters included (`artist:`, `year:`, `tag:new`, ...).
    pub q: String,
    #[serde(rename = "type", serialize_with = "comma_separated")]
    pub types: Vec<SearchType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_external: Option<IncludeExternal>,
}

impl SearchOptions {
    pub fn new(q: impl Into<String>, types: &[SearchType]) -> Self {
        Self {
            q: q.into(),
            types: types.to_vec(),
            market: None,
            limit: None,
            offset: None,
            include_external: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    /// Roughly the last four weeks.
    ShortTerm,
    /// Roughly the last six months.
    MediumTerm,
    /// Several years of data.
    LongTerm,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TopItemsOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_range: Option<TimeRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeviceOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Min,
    Max,
    Target,
}

impl Bound {
    fn prefix(&self) -> &'static str {
        match self {
            Bound::Min => "min",
            Bound::Max => "max",
            Bound::Target => "target",
        }
    }
}

/// Track attributes the recommendation engine can be tuned on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Acousticness,
    Danceability,
    DurationMs,
    Energy,
    Instrumentalness,
    Key,
    Liveness,
    Loudness,
    Mode,
    Popularity,
    Speechiness,
    Tempo,
    TimeSignature,
    Valence,
}

impl Attribute {
    fn name(&self) -> &'static str {
        match self {
            Attribute::Acousticness => "acousticness",
            Attribute::Danceability => "danceability",
            Attribute::DurationMs => "duration_ms",
            Attribute::Energy => "energy",
            Attribute::Instrumentalness => "instrumentalness",
            Attribute::Key => "key",
            Attribute::Liveness => "liveness",
            Attribute::Loudness => "loudness",
            Attribute::Mode => "mode",
            Attribute::Popularity => "popularity",
            Attribute::Speechiness => "speechiness",
            Attribute::Tempo => "tempo",
            Attribute::TimeSignature => "time_signature",
            Attribute::Valence => "valence",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tunable {
    pub bound: Bound,
    pub attribute: Attribute,
    pub value: f64,
}

/// Seeds and tunables for `GET /recommendations`.
///
/// Serialized as `seed_artists=a,b&min_energy=0.4&target_tempo=120.0`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationOptions {
    pub seed_artists: Vec<String>,
    pub seed_genres: Vec<String>,
    pub seed_tracks: Vec<String>,
    pub market: Option<String>,
    pub limit: Option<u32>,
    pub tunables: Vec<Tunable>,
}

impl RecommendationOptions {
    /// Sets one tunable. Tuning the same bound of an attribute again
    /// replaces the earlier value.
    pub fn tune(mut self, bound: Bound, attribute: Attribute, value: f64) -> Self {
        match self
            .tunables
            .iter_mut()
            .find(|t| t.bound == bound && t.attribute == attribute)
        {
            Some(tunable) => tunable.value = value,
            None => self.tunables.push(Tunable {
                bound,
                attribute,
                value,
            }),
        }
        self
    }
}

impl Serialize for RecommendationOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (key, seeds) in [
            ("seed_artists", &self.seed_artists),
            ("seed_genres", &self.seed_genres),
            ("seed_tracks", &self.seed_tracks),
        ] {
            if !seeds.is_empty() {
                map.serialize_entry(key, &seeds.join(","))?;
            }
        }
        if let Some(market) = &self.market {
            map.serialize_entry("market", market)?;
        }
        if let Some(limit) = self.limit {
            map.serialize_entry("limit", &limit)?;
        }
        for tunable in &self.tunables {
            let key = format!("{}_{}", tunable.bound.prefix(), tunable.attribute.name());
            map.serialize_entry(&key, &tunable.value)?;
        }
        map.end()
    }
}
