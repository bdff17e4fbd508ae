//! Endpoint methods of [`ApiClient`], generated from one declarative table.
//!
//! Each row names the method, its path arguments, whether it takes an id
//! list, its options shape, the result type and the path template relative
//! to `/v1`. Queries decode their `200` body into the result type; commands
//! succeed on any `2xx` and return `()`.

use reqwest::Method;

use crate::{
    error::Result,
    spotify::{
        client::ApiClient,
        options::{
            ArtistAlbumsOptions, CountryPageOptions, DeviceOptions, MarketOptions,
            MarketPageOptions, PageOptions, RecommendationOptions, SearchOptions, TopItemsOptions,
        },
        transport::Transport,
    },
    types::{
        Album, AlbumList, Artist, ArtistList, AudioAnalysis, AudioFeatures, AudioFeaturesList,
        Episode, EpisodeList, GenreSeeds, Markets, NewReleases, Page, Recommendations,
        SavedAlbum, SavedEpisode, SavedShow, SavedTrack, SearchResults, Show, ShowList, Track,
        TrackList, User,
    },
};

macro_rules! ids_param {
    () => {
        None
    };
    ($ids:ident) => {
        Some($ids)
    };
}

macro_rules! options_param {
    () => {
        None::<&()>
    };
    ($options:ident) => {
        $options
    };
}

macro_rules! queries {
    ($(
        $(#[$doc:meta])*
        fn $name:ident($($arg:ident),*) $([$ids:ident])? $(with $options:ident: $shape:ident)?
            -> $ret:ty = $path:literal;
    )*) => {
        impl<T: Transport> ApiClient<T> {
            $(
                $(#[$doc])*
                pub async fn $name(
                    &self,
                    $($arg: &str,)*
                    $($ids: &[&str],)?
                    $($options: Option<&$shape>,)?
                ) -> Result<$ret> {
                    self.query(
                        Method::GET,
                        $path,
                        &[$((stringify!($arg), $arg)),*],
                        ids_param!($($ids)?),
                        options_param!($($options)?),
                    )
                    .await
                }
            )*
        }
    };
}

macro_rules! commands {
    ($(
        $(#[$doc:meta])*
        fn $name:ident($($arg:ident),*) $([$ids:ident])? $(with $options:ident: $shape:ident)?
            = $method:ident $path:literal;
    )*) => {
        impl<T: Transport> ApiClient<T> {
            $(
                $(#[$doc])*
                pub async fn $name(
                    &self,
                    $($arg: &str,)*
                    $($ids: &[&str],)?
                    $($options: Option<&$shape>,)?
                ) -> Result<()> {
                    self.command(
                        Method::$method,
                        $path,
                        &[$((stringify!($arg), $arg)),*],
                        ids_param!($($ids)?),
                        options_param!($($options)?),
                    )
                    .await
                }
            )*
        }
    };
}

queries! {
    /// Catalog information for a single album.
    fn get_album(id) with options: MarketOptions -> Album = "albums/{id}";
    /// Up to 20 albums; unknown ids come back as `None`.
    fn get_several_albums() [ids] with options: MarketOptions -> AlbumList = "albums";
    fn get_album_tracks(id) with options: MarketPageOptions -> Page<Track> = "albums/{id}/tracks";
    /// Albums in the current user's library. Requires `user-library-read`.
    fn get_saved_albums() with options: MarketPageOptions -> Page<SavedAlbum> = "me/albums";
    fn check_saved_albums() [ids] -> Vec<bool> = "me/albums/contains";
    fn get_new_releases() with options: CountryPageOptions -> NewReleases = "browse/new-releases";

    fn get_artist(id) -> Artist = "artists/{id}";
    /// Up to 50 artists; unknown ids come back as `None`.
    fn get_several_artists() [ids] -> ArtistList = "artists";
    fn get_artist_albums(id) with options: ArtistAlbumsOptions -> Page<Album> = "artists/{id}/albums";
    /// Top tracks of an artist. The provider requires `market` for this one.
    fn get_artist_top_tracks(id) with options: MarketOptions -> TrackList = "artists/{id}/top-tracks";
    fn get_related_artists(id) -> ArtistList = "artists/{id}/related-artists";

    fn get_show(id) with options: MarketOptions -> Show = "shows/{id}";
    fn get_several_shows() [ids] with options: MarketOptions -> ShowList = "shows";
    fn get_show_episodes(id) with options: MarketPageOptions -> Page<Episode> = "shows/{id}/episodes";
    fn get_saved_shows() with options: PageOptions -> Page<SavedShow> = "me/shows";
    fn check_saved_shows() [ids] -> Vec<bool> = "me/shows/contains";

    fn get_episode(id) with options: MarketOptions -> Episode = "episodes/{id}";
    fn get_several_episodes() [ids] with options: MarketOptions -> EpisodeList = "episodes";
    fn get_saved_episodes() with options: MarketPageOptions -> Page<SavedEpisode> = "me/episodes";
    fn check_saved_episodes() [ids] -> Vec<bool> = "me/episodes/contains";

    fn get_track(id) with options: MarketOptions -> Track = "tracks/{id}";
    fn get_several_tracks() [ids] with options: MarketOptions -> TrackList = "tracks";
    fn get_saved_tracks() with options: MarketPageOptions -> Page<SavedTrack> = "me/tracks";
    fn check_saved_tracks() [ids] -> Vec<bool> = "me/tracks/contains";
    /// Audio features for several tracks; unknown ids come back as `None`.
    fn get_several_audio_features() [ids] -> AudioFeaturesList = "audio-features";
    fn get_audio_features(id) -> AudioFeatures = "audio-features/{id}";
    /// Low-level structure and rhythm of a track.
    fn get_audio_analysis(id) -> AudioAnalysis = "audio-analysis/{id}";

    /// Tracks generated from up to five seeds.
    fn get_recommendations() with options: RecommendationOptions -> Recommendations = "recommendations";
    fn get_available_genre_seeds() -> GenreSeeds = "recommendations/available-genre-seeds";

    /// Catalog search. `options` carries the query and the result types.
    fn search() with options: SearchOptions -> SearchResults = "search";

    /// Profile of the user the token was issued for.
    fn get_current_user() -> User = "me";
    fn get_user(user_id) -> User = "users/{user_id}";
    /// Requires `user-top-read`.
    fn get_top_artists() with options: TopItemsOptions -> Page<Artist> = "me/top/artists";
    /// Requires `user-top-read`.
    fn get_top_tracks() with options: TopItemsOptions -> Page<Track> = "me/top/tracks";
    fn get_available_markets() -> Markets = "markets";
}

commands! {
    /// Requires `user-library-modify`.
    fn save_albums() [ids] = PUT "me/albums";
    fn remove_saved_albums() [ids] = DELETE "me/albums";
    fn save_shows() [ids] = PUT "me/shows";
    fn remove_saved_shows() [ids] = DELETE "me/shows";
    fn save_episodes() [ids] = PUT "me/episodes";
    fn remove_saved_episodes() [ids] = DELETE "me/episodes";
    fn save_tracks() [ids] = PUT "me/tracks";
    fn remove_saved_tracks() [ids] = DELETE "me/tracks";
    /// Pauses playback on the active (or given) device. Requires
    /// `user-modify-playback-state`.
    fn pause_playback() with options: DeviceOptions = PUT "me/player/pause";
}
