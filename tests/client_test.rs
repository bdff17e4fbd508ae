mod common;

use reqwest::Method;
use serde_json::{Value, json};
use spotwire::{
    Body, Error,
    spotify::options::{
        ArtistAlbumsOptions, DeviceOptions, IncludeGroup, MarketOptions, MarketPageOptions,
        SearchOptions, SearchType,
    },
};

use common::{FakeTransport, client, query_pairs};

fn show_json() -> Value {
    json!({
        "id": "5aEsPtN61qhf1mxTrrcgOt",
        "name": "Philosophize This!",
        "description": "A podcast about philosophy.",
        "explicit": false,
        "languages": ["en"],
        "media_type": "audio",
        "publisher": "Stephen West",
        "total_episodes": 200,
        "href": "https://api.spotify.com/v1/shows/5aEsPtN61qhf1mxTrrcgOt",
        "uri": "spotify:show:5aEsPtN61qhf1mxTrrcgOt",
        "images": []
    })
}

fn album_json(id: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Album {id}"),
        "album_type": "album",
        "total_tracks": 12,
        "release_date": "2020-01-01",
        "release_date_precision": "day",
        "href": format!("https://api.spotify.com/v1/albums/{id}"),
        "uri": format!("spotify:album:{id}")
    })
}

fn album_page(offset: u32, next: Option<&str>, previous: Option<&str>) -> Value {
    json!({
        "href": "https://api.spotify.com/v1/artists/0TnOYISbd1XYRBk9myaseg/albums",
        "items": [album_json("a")],
        "limit": 1,
        "next": next,
        "offset": offset,
        "previous": previous,
        "total": 2
    })
}

#[tokio::test]
async fn test_get_show_without_market() {
    let transport = FakeTransport::new();
    transport.respond(200, show_json());

    let show = client(&transport)
        .get_show("5aEsPtN61qhf1mxTrrcgOt", None)
        .await
        .unwrap();
    assert_eq!(show.publisher, "Stephen West");

    let request = transport.last_request();
    assert_eq!(request.method, Method::GET);
    assert_eq!(
        request.url.as_str(),
        "https://api.spotify.com/v1/shows/5aEsPtN61qhf1mxTrrcgOt"
    );
    assert!(request.url.query().is_none());
    assert_eq!(request.header_value("authorization"), Some("Bearer X"));
    assert_eq!(request.header_value("content-type"), Some("application/json"));
    assert!(request.body.is_none());
}

#[tokio::test]
async fn test_get_show_with_market() {
    let transport = FakeTransport::new();
    transport.respond(200, show_json());

    client(&transport)
        .get_show("5aEsPtN61qhf1mxTrrcgOt", Some(&MarketOptions::market("SE")))
        .await
        .unwrap();

    let request = transport.last_request();
    assert_eq!(
        query_pairs(&request),
        vec![("market".to_string(), "SE".to_string())]
    );
}

#[tokio::test]
async fn test_get_several_albums_sends_ids() {
    let transport = FakeTransport::new();
    transport.respond(200, json!({"albums": [album_json("a"), null]}));

    let list = client(&transport)
        .get_several_albums(&["a", "b"], None)
        .await
        .unwrap();
    assert_eq!(list.albums.len(), 2);
    assert!(list.albums[1].is_none());

    let request = transport.last_request();
    assert_eq!(request.url.path(), "/v1/albums");
    assert_eq!(
        query_pairs(&request),
        vec![("ids".to_string(), "a,b".to_string())]
    );
}

#[tokio::test]
async fn test_set_options_appear_once_and_unset_are_omitted() {
    let transport = FakeTransport::new();
    transport.respond(200, album_page(0, None, None));

    let options = ArtistAlbumsOptions {
        include_groups: vec![IncludeGroup::Album, IncludeGroup::Single],
        limit: Some(1),
        ..Default::default()
    };
    client(&transport)
        .get_artist_albums("0TnOYISbd1XYRBk9myaseg", Some(&options))
        .await
        .unwrap();

    let request = transport.last_request();
    assert_eq!(
        request.url.path(),
        "/v1/artists/0TnOYISbd1XYRBk9myaseg/albums"
    );
    assert_eq!(
        query_pairs(&request),
        vec![
            ("include_groups".to_string(), "album,single".to_string()),
            ("limit".to_string(), "1".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_search_query_is_percent_encoded() {
    let transport = FakeTransport::new();
    transport.respond(200, json!({"artists": {
        "href": "https://api.spotify.com/v1/search",
        "items": [],
        "limit": 20,
        "next": null,
        "offset": 0,
        "previous": null,
        "total": 0
    }}));

    let options = SearchOptions::new("year:2001 artist:Röyksopp", &[SearchType::Artist]);
    let results = client(&transport).search(Some(&options)).await.unwrap();
    assert!(results.artists.unwrap().items.is_empty());
    assert!(results.tracks.is_none());

    let request = transport.last_request();
    let raw = request.url.query().unwrap();
    assert!(!raw.contains(' '));
    assert!(!raw.contains('ö'));
    assert_eq!(
        query_pairs(&request),
        vec![
            ("q".to_string(), "year:2001 artist:Röyksopp".to_string()),
            ("type".to_string(), "artist".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_path_argument_is_a_single_segment() {
    let transport = FakeTransport::new();
    transport.respond(404, json!({"error": {"status": 404, "message": "Not found"}}));

    let _ = client(&transport).get_user("smedjan/../me").await;
    assert_eq!(transport.last_request().url.path(), "/v1/users/smedjan%2F..%2Fme");
}

#[tokio::test]
async fn test_unauthorized_query_fails_once_with_status_and_body() {
    let transport = FakeTransport::new();
    let body = json!({"error": {"status": 401, "message": "The access token expired"}});
    transport.respond(401, body.clone());

    let err = client(&transport)
        .get_album("4aawyAB9vmqN3uQ7FjRGTy", None)
        .await
        .unwrap_err();
    match err {
        Error::Query {
            method,
            endpoint,
            status,
            body: returned,
        } => {
            assert_eq!(method, Method::GET);
            assert_eq!(endpoint, "/v1/albums/4aawyAB9vmqN3uQ7FjRGTy");
            assert_eq!(status, 401);
            assert_eq!(returned, Body::Json(body));
        }
        other => panic!("expected query error, got {other}"),
    }

    // No retry
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_non_json_error_body_is_kept_as_text() {
    let transport = FakeTransport::new();
    transport.respond_text(502, "<html>Bad Gateway</html>");

    let err = client(&transport).get_current_user().await.unwrap_err();
    assert_eq!(err.status(), Some(502));
    assert_eq!(
        err.body(),
        Some(&Body::Text("<html>Bad Gateway</html>".to_string()))
    );
}

#[tokio::test]
async fn test_unexpected_shape_is_a_decode_error() {
    let transport = FakeTransport::new();
    transport.respond(200, json!({"genres": "jazz"}));

    let err = client(&transport)
        .get_available_genre_seeds()
        .await
        .unwrap_err();
    match err {
        Error::Decode { endpoint, source } => {
            assert_eq!(endpoint, "/v1/recommendations/available-genre-seeds");
            assert_eq!(source.path().to_string(), "genres");
        }
        other => panic!("expected decode error, got {other}"),
    }
}

#[tokio::test]
async fn test_check_saved_tracks_returns_flags() {
    let transport = FakeTransport::new();
    transport.respond(200, json!([true, false]));

    let flags = client(&transport)
        .check_saved_tracks(&["t1", "t2"])
        .await
        .unwrap();
    assert_eq!(flags, vec![true, false]);
    assert_eq!(transport.last_request().url.path(), "/v1/me/tracks/contains");
}

#[tokio::test]
async fn test_commands_accept_any_success_status() {
    let transport = FakeTransport::new();
    transport
        .respond_text(200, "")
        .respond_text(204, "")
        .respond(403, json!({"error": {"status": 403, "message": "Player command failed"}}));

    let api = client(&transport);
    api.save_tracks(&["t1"]).await.unwrap();
    api.remove_saved_tracks(&["t1"]).await.unwrap();
    let err = api
        .pause_playback(Some(&DeviceOptions {
            device_id: Some("d1".to_string()),
        }))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(403));

    let requests = transport.requests();
    assert_eq!(requests[0].method, Method::PUT);
    assert_eq!(requests[0].url.as_str(), "https://api.spotify.com/v1/me/tracks?ids=t1");
    assert_eq!(requests[1].method, Method::DELETE);
    assert_eq!(requests[2].method, Method::PUT);
    assert_eq!(
        requests[2].url.as_str(),
        "https://api.spotify.com/v1/me/player/pause?device_id=d1"
    );
}

#[tokio::test]
async fn test_pages_are_followed_only_on_request() {
    let next = "https://api.spotify.com/v1/artists/0TnOYISbd1XYRBk9myaseg/albums?offset=1&limit=1";
    let transport = FakeTransport::new();
    transport
        .respond(200, album_page(0, Some(next), None))
        .respond(200, album_page(1, None, Some("https://api.spotify.com/v1/artists/0TnOYISbd1XYRBk9myaseg/albums?offset=0&limit=1")));

    let api = client(&transport);
    let first = api
        .get_artist_albums(
            "0TnOYISbd1XYRBk9myaseg",
            Some(&ArtistAlbumsOptions {
                limit: Some(1),
                ..Default::default()
            }),
        )
        .await
        .unwrap();
    assert_eq!(transport.requests().len(), 1);

    // No previous page: nothing is sent
    assert!(api.previous_page(&first).await.unwrap().is_none());
    assert_eq!(transport.requests().len(), 1);

    let second = api.next_page(&first).await.unwrap().unwrap();
    assert_eq!(second.offset, 1);
    assert!(api.next_page(&second).await.unwrap().is_none());

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].url.as_str(), next);
    assert_eq!(requests[1].header_value("authorization"), Some("Bearer X"));
}

#[tokio::test]
async fn test_page_links_to_other_hosts_are_refused() {
    let transport = FakeTransport::new();
    let page: spotwire::types::Page<spotwire::types::Album> = serde_json::from_value(album_page(
        0,
        Some("https://evil.example.com/v1/steal"),
        None,
    ))
    .unwrap();

    let err = client(&transport).next_page(&page).await.unwrap_err();
    assert!(matches!(err, Error::InvalidUrl(_)));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_saved_albums_decode_wrapper() {
    let transport = FakeTransport::new();
    transport.respond(
        200,
        json!({
            "href": "https://api.spotify.com/v1/me/albums",
            "items": [{"added_at": "2023-05-01T10:00:00Z", "album": album_json("a")}],
            "limit": 20,
            "next": null,
            "offset": 0,
            "previous": null,
            "total": 1
        }),
    );

    let page = client(&transport)
        .get_saved_albums(Some(&MarketPageOptions {
            limit: Some(20),
            ..Default::default()
        }))
        .await
        .unwrap();
    assert_eq!(page.items[0].album.id, "a");
    assert_eq!(
        query_pairs(&transport.last_request()),
        vec![("limit".to_string(), "20".to_string())]
    );
}

#[tokio::test]
async fn test_empty_path_argument_is_refused_before_sending() {
    let transport = FakeTransport::new();

    let err = client(&transport).get_album("", None).await.unwrap_err();
    assert!(matches!(err, Error::InvalidUrl(_)));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_empty_id_list_sends_no_ids() {
    let transport = FakeTransport::new();
    transport.respond(200, json!([]));

    let flags = client(&transport).check_saved_tracks(&[]).await.unwrap();
    assert!(flags.is_empty());

    let request = transport.last_request();
    assert_eq!(request.url.as_str(), "https://api.spotify.com/v1/me/tracks/contains");
}
