//! OAuth scopes understood by the Spotify accounts service.
//!
//! Scopes are requested during the authorization-code flow and decide which
//! user data the resulting token may read or modify.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scope {
    UgcImageUpload,
    UserReadPlaybackState,
    UserModifyPlaybackState,
    UserReadCurrentlyPlaying,
    UserReadPrivate,
    UserReadEmail,
    UserFollowModify,
    UserFollowRead,
    UserLibraryModify,
    UserLibraryRead,
    Streaming,
    AppRemoteControl,
    UserReadPlaybackPosition,
    UserTopRead,
    UserReadRecentlyPlayed,
    PlaylistModifyPrivate,
    PlaylistReadCollaborative,
    PlaylistReadPrivate,
    PlaylistModifyPublic,
}

impl Scope {
    pub const ALL: &'static [Scope] = &[
        Scope::UgcImageUpload,
        Scope::UserReadPlaybackState,
        Scope::UserModifyPlaybackState,
        Scope::UserReadCurrentlyPlaying,
        Scope::UserReadPrivate,
        Scope::UserReadEmail,
        Scope::UserFollowModify,
        Scope::UserFollowRead,
        Scope::UserLibraryModify,
        Scope::UserLibraryRead,
        Scope::Streaming,
        Scope::AppRemoteControl,
        Scope::UserReadPlaybackPosition,
        Scope::UserTopRead,
        Scope::UserReadRecentlyPlayed,
        Scope::PlaylistModifyPrivate,
        Scope::PlaylistReadCollaborative,
        Scope::PlaylistReadPrivate,
        Scope::PlaylistModifyPublic,
    ];

    pub const IMAGES: &'static [Scope] = &[Scope::UgcImageUpload];

    pub const SPOTIFY_CONNECT: &'static [Scope] = &[
        Scope::UserReadPlaybackState,
        Scope::UserModifyPlaybackState,
        Scope::UserReadCurrentlyPlaying,
    ];

    pub const USERS: &'static [Scope] = &[Scope::UserReadPrivate, Scope::UserReadEmail];

    pub const FOLLOW: &'static [Scope] = &[Scope::UserFollowModify, Scope::UserFollowRead];

    pub const LIBRARY: &'static [Scope] = &[Scope::UserLibraryModify, Scope::UserLibraryRead];

    pub const PLAYBACK: &'static [Scope] = &[Scope::Streaming, Scope::AppRemoteControl];

    pub const LISTENING_HISTORY: &'static [Scope] = &[
        Scope::UserReadPlaybackPosition,
        Scope::UserTopRead,
        Scope::UserReadRecentlyPlayed,
    ];

    pub const PLAYLISTS: &'static [Scope] = &[
        Scope::PlaylistModifyPrivate,
        Scope::PlaylistReadCollaborative,
        Scope::PlaylistReadPrivate,
        Scope::PlaylistModifyPublic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::UgcImageUpload => "ugc-image-upload",
            Scope::UserReadPlaybackState => "user-read-playback-state",
            Scope::UserModifyPlaybackState => "user-modify-playback-state",
            Scope::UserReadCurrentlyPlaying => "user-read-currently-playing",
            Scope::UserReadPrivate => "user-read-private",
            Scope::UserReadEmail => "user-read-email",
            Scope::UserFollowModify => "user-follow-modify",
            Scope::UserFollowRead => "user-follow-read",
            Scope::UserLibraryModify => "user-library-modify",
            Scope::UserLibraryRead => "user-library-read",
            Scope::Streaming => "streaming",
            Scope::AppRemoteControl => "app-remote-control",
            Scope::UserReadPlaybackPosition => "user-read-playback-position",
            Scope::UserTopRead => "user-top-read",
            Scope::UserReadRecentlyPlayed => "user-read-recently-played",
            Scope::PlaylistModifyPrivate => "playlist-modify-private",
            Scope::PlaylistReadCollaborative => "playlist-read-collaborative",
            Scope::PlaylistReadPrivate => "playlist-read-private",
            Scope::PlaylistModifyPublic => "playlist-modify-public",
        }
    }

    /// Space-separated form used by the `scope` parameter.
    pub fn join(scopes: &[Scope]) -> String {
        scopes
            .iter()
            .map(Scope::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scope::ALL
            .iter()
            .find(|scope| scope.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown scope '{s}'"))
    }
}
