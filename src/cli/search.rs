use std::path::Path;

use tabled::{Table, Tabled};

use crate::{
    error, info,
    spotify::options::{SearchOptions, SearchType},
    types::{Album, Artist, Episode, PlaylistSummary, SearchResults, Show, Track},
    utils, warning,
};

use super::app_client;

const NAME_WIDTH: usize = 48;

#[derive(Tabled)]
struct TrackRow {
    name: String,
    artists: String,
    album: String,
    duration: String,
    id: String,
}

#[derive(Tabled)]
struct ArtistRow {
    name: String,
    genres: String,
    followers: String,
    id: String,
}

#[derive(Tabled)]
struct AlbumRow {
    name: String,
    artists: String,
    released: String,
    tracks: u32,
    id: String,
}

#[derive(Tabled)]
struct PlaylistRow {
    name: String,
    owner: String,
    tracks: u32,
    id: String,
}

#[derive(Tabled)]
struct ShowRow {
    name: String,
    publisher: String,
    episodes: String,
    id: String,
}

#[derive(Tabled)]
struct EpisodeRow {
    name: String,
    released: String,
    duration: String,
    id: String,
}

fn artist_names(artists: &[Artist]) -> String {
    artists
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<Track> for TrackRow {
    fn from(t: Track) -> Self {
        Self {
            name: utils::truncate(&t.name, NAME_WIDTH),
            artists: utils::truncate(&artist_names(&t.artists), NAME_WIDTH),
            album: t
                .album
                .map(|a| utils::truncate(&a.name, NAME_WIDTH))
                .unwrap_or_default(),
            duration: utils::format_duration_ms(t.duration_ms),
            id: t.id.unwrap_or_else(|| "-".to_string()),
        }
    }
}

impl From<Artist> for ArtistRow {
    fn from(a: Artist) -> Self {
        Self {
            name: utils::truncate(&a.name, NAME_WIDTH),
            genres: a.genres.iter().take(3).cloned().collect::<Vec<_>>().join(","),
            followers: a
                .followers
                .map(|f| f.total.to_string())
                .unwrap_or_default(),
            id: a.id,
        }
    }
}

impl From<Album> for AlbumRow {
    fn from(a: Album) -> Self {
        Self {
            name: utils::truncate(&a.name, NAME_WIDTH),
            artists: utils::truncate(&artist_names(&a.artists), NAME_WIDTH),
            released: a.release_date,
            tracks: a.total_tracks,
            id: a.id,
        }
    }
}

impl From<PlaylistSummary> for PlaylistRow {
    fn from(p: PlaylistSummary) -> Self {
        Self {
            name: utils::truncate(&p.name, NAME_WIDTH),
            owner: p.owner.display_name.unwrap_or(p.owner.id),
            tracks: p.tracks.total,
            id: p.id,
        }
    }
}

impl From<Show> for ShowRow {
    fn from(s: Show) -> Self {
        Self {
            name: utils::truncate(&s.name, NAME_WIDTH),
            publisher: utils::truncate(&s.publisher, NAME_WIDTH),
            episodes: s
                .total_episodes
                .map(|n| n.to_string())
                .unwrap_or_default(),
            id: s.id,
        }
    }
}

impl From<Episode> for EpisodeRow {
    fn from(e: Episode) -> Self {
        Self {
            name: utils::truncate(&e.name, NAME_WIDTH),
            released: e.release_date,
            duration: utils::format_duration_ms(e.duration_ms),
            id: e.id,
        }
    }
}

fn print_table<I, R>(title: &str, total: u32, items: I)
where
    I: IntoIterator,
    I::Item: Into<R>,
    R: Tabled,
{
    let rows: Vec<R> = items.into_iter().map(Into::into).collect();
    if rows.is_empty() {
        warning!("No {} found", title);
        return;
    }
    info!("{} ({} of {})", title, rows.len(), total);
    println!("{}", Table::new(rows));
}

fn print_results(results: SearchResults) {
    if let Some(page) = results.tracks {
        print_table::<_, TrackRow>("Tracks", page.total, page.items);
    }
    if let Some(page) = results.artists {
        print_table::<_, ArtistRow>("Artists", page.total, page.items);
    }
    if let Some(page) = results.albums {
        print_table::<_, AlbumRow>("Albums", page.total, page.items);
    }
    if let Some(page) = results.playlists {
        print_table::<_, PlaylistRow>("Playlists", page.total, page.items.into_iter().flatten());
    }
    if let Some(page) = results.shows {
        print_table::<_, ShowRow>("Shows", page.total, page.items.into_iter().flatten());
    }
    if let Some(page) = results.episodes {
        print_table::<_, EpisodeRow>("Episodes", page.total, page.items.into_iter().flatten());
    }
}

pub async fn search(
    credentials_path: &Path,
    query: &str,
    types: &[SearchType],
    limit: Option<u32>,
    market: Option<String>,
) {
    let client = app_client(credentials_path).await;

    let mut options = SearchOptions::new(query, types);
    options.limit = limit;
    options.market = market;

    let pb = utils::spinner(format!("Searching for '{query}'..."));
    let results = client.search(Some(&options)).await;
    pb.finish_and_clear();

    match results {
        Ok(results) => print_results(results),
        Err(e) => error!("Search failed. Err: {}", e),
    }
}
