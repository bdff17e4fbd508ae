use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalIds {
    pub isrc: Option<String>,
    pub ean: Option<String>,
    pub upc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Followers {
    pub href: Option<String>,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restrictions {
    /// `market`, `product` or `explicit`.
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CopyrightKind {
    /// The copyright.
    C,
    /// The sound recording (performance) copyright.
    P,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Copyright {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: CopyrightKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatePrecision {
    Year,
    Month,
    Day,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlbumType {
    #[serde(alias = "ALBUM")]
    Album,
    #[serde(alias = "SINGLE")]
    Single,
    #[serde(alias = "COMPILATION")]
    Compilation,
}

/// A window over a larger result set.
///
/// Pages are returned exactly as the API sends them; fetching `next` or
/// `previous` is an explicit call on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub href: String,
    pub items: Vec<T>,
    pub limit: u32,
    pub next: Option<String>,
    pub offset: u32,
    pub previous: Option<String>,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    pub href: Option<String>,
    pub uri: String,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    #[serde(default)]
    pub genres: Vec<String>,
    pub popularity: Option<u32>,
    pub followers: Option<Followers>,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    pub album_type: AlbumType,
    pub total_tracks: u32,
    pub release_date: String,
    pub release_date_precision: DatePrecision,
    pub href: String,
    pub uri: String,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub available_markets: Vec<String>,
    #[serde(default)]
    pub artists: Vec<Artist>,
    pub tracks: Option<Page<Track>>,
    pub restrictions: Option<Restrictions>,
    #[serde(default)]
    pub copyrights: Vec<Copyright>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub label: Option<String>,
    pub popularity: Option<u32>,
}

/// The track originally requested when track relinking replaced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedTrack {
    pub id: String,
    pub href: String,
    pub uri: String,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// `None` for local files.
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<Artist>,
    pub album: Option<Album>,
    pub disc_number: u32,
    pub duration_ms: u64,
    pub explicit: bool,
    pub external_ids: Option<ExternalIds>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    pub href: Option<String>,
    pub uri: String,
    pub is_playable: Option<bool>,
    pub linked_from: Option<LinkedTrack>,
    pub restrictions: Option<Restrictions>,
    pub popularity: Option<u32>,
    pub preview_url: Option<String>,
    pub track_number: u32,
    #[serde(default)]
    pub is_local: bool,
    #[serde(default)]
    pub available_markets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Show {
    pub id: String,
    pub name: String,
    pub description: String,
    pub html_description: Option<String>,
    pub explicit: bool,
    pub is_externally_hosted: Option<bool>,
    #[serde(default)]
    pub languages: Vec<String>,
    pub media_type: String,
    pub publisher: String,
    pub total_episodes: Option<u32>,
    pub episodes: Option<Page<Episode>>,
    #[serde(default)]
    pub copyrights: Vec<Copyright>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub available_markets: Vec<String>,
    pub href: String,
    pub uri: String,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumePoint {
    pub fully_played: bool,
    pub resume_position_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub id: String,
    pub name: String,
    pub description: String,
    pub html_description: Option<String>,
    pub audio_preview_url: Option<String>,
    pub duration_ms: u64,
    pub explicit: bool,
    pub is_externally_hosted: Option<bool>,
    pub is_playable: Option<bool>,
    pub language: Option<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    pub release_date: String,
    pub release_date_precision: DatePrecision,
    pub resume_point: Option<ResumePoint>,
    pub restrictions: Option<Restrictions>,
    pub show: Option<Box<Show>>,
    #[serde(default)]
    pub images: Vec<Image>,
    pub href: String,
    pub uri: String,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplicitContent {
    pub filter_enabled: bool,
    pub filter_locked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub display_name: Option<String>,
    /// Only present with the `user-read-email` scope.
    pub email: Option<String>,
    /// Only present with the `user-read-private` scope.
    pub country: Option<String>,
    /// `open`, `free` or `premium`.
    pub product: Option<String>,
    pub explicit_content: Option<ExplicitContent>,
    pub followers: Option<Followers>,
    #[serde(default)]
    pub images: Vec<Image>,
    pub href: String,
    pub uri: String,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistTracksRef {
    pub href: String,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistOwner {
    pub id: String,
    pub display_name: Option<String>,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub public: Option<bool>,
    pub collaborative: bool,
    pub owner: PlaylistOwner,
    pub tracks: PlaylistTracksRef,
    pub snapshot_id: String,
    #[serde(default)]
    pub images: Vec<Image>,
    pub href: String,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedAlbum {
    pub added_at: DateTime<Utc>,
    pub album: Album,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedTrack {
    pub added_at: DateTime<Utc>,
    pub track: Track,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedShow {
    pub added_at: DateTime<Utc>,
    pub show: Show,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedEpisode {
    pub added_at: DateTime<Utc>,
    pub episode: Episode,
}

// Several-item lookups answer with `null` for ids that do not exist.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumList {
    pub albums: Vec<Option<Album>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistList {
    pub artists: Vec<Option<Artist>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackList {
    pub tracks: Vec<Option<Track>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowList {
    pub shows: Vec<Option<Show>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeList {
    pub episodes: Vec<Option<Episode>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReleases {
    pub albums: Page<Album>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreSeeds {
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Markets {
    pub markets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub tracks: Option<Page<Track>>,
    pub artists: Option<Page<Artist>>,
    pub albums: Option<Page<Album>>,
    pub playlists: Option<Page<Option<PlaylistSummary>>>,
    pub shows: Option<Page<Option<Show>>>,
    pub episodes: Option<Page<Option<Episode>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub id: String,
    pub acousticness: f64,
    pub analysis_url: String,
    pub danceability: f64,
    pub duration_ms: u64,
    pub energy: f64,
    pub instrumentalness: f64,
    pub key: i32,
    pub liveness: f64,
    pub loudness: f64,
    pub mode: i32,
    pub speechiness: f64,
    pub tempo: f64,
    pub time_signature: i32,
    pub track_href: String,
    pub uri: String,
    pub valence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioFeaturesList {
    pub audio_features: Vec<Option<AudioFeatures>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMeta {
    pub analyzer_version: String,
    pub platform: String,
    pub detailed_status: String,
    pub status_code: i32,
    pub timestamp: i64,
    pub analysis_time: f64,
    pub input_process: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisTrack {
    pub num_samples: u64,
    pub duration: f64,
    #[serde(default)]
    pub sample_md5: String,
    pub offset_seconds: f64,
    pub window_seconds: f64,
    pub analysis_sample_rate: u32,
    pub analysis_channels: u32,
    pub end_of_fade_in: f64,
    pub start_of_fade_out: f64,
    pub loudness: f64,
    pub tempo: f64,
    pub tempo_confidence: f64,
    pub time_signature: i32,
    pub time_signature_confidence: f64,
    pub key: i32,
    pub key_confidence: f64,
    pub mode: i32,
    pub mode_confidence: f64,
    #[serde(default)]
    pub codestring: String,
    pub code_version: f64,
    #[serde(default)]
    pub echoprintstring: String,
    pub echoprint_version: f64,
    #[serde(default)]
    pub synchstring: String,
    pub synch_version: f64,
    #[serde(default)]
    pub rhythmstring: String,
    pub rhythm_version: f64,
}

/// A time interval of the analysed track (bar, beat or tatum).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: f64,
    pub duration: f64,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub start: f64,
    pub duration: f64,
    pub confidence: f64,
    pub loudness: f64,
    pub tempo: f64,
    pub tempo_confidence: f64,
    pub key: i32,
    pub key_confidence: f64,
    pub mode: i32,
    pub mode_confidence: f64,
    pub time_signature: i32,
    pub time_signature_confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub duration: f64,
    pub confidence: f64,
    pub loudness_start: f64,
    pub loudness_max: f64,
    pub loudness_max_time: f64,
    #[serde(default)]
    pub loudness_end: f64,
    pub pitches: Vec<f64>,
    pub timbre: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioAnalysis {
    pub meta: AnalysisMeta,
    pub track: AnalysisTrack,
    pub bars: Vec<TimeInterval>,
    pub beats: Vec<TimeInterval>,
    pub sections: Vec<Section>,
    pub segments: Vec<Segment>,
    pub tatums: Vec<TimeInterval>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationSeed {
    pub after_filtering_size: u32,
    pub after_relinking_size: u32,
    pub href: Option<String>,
    pub id: String,
    pub initial_pool_size: u32,
    /// `artist`, `track` or `genre`.
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub seeds: Vec<RecommendationSeed>,
    pub tracks: Vec<Track>,
}
