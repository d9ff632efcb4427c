//! Spotify client and end-to-end recommendation tests against a mock
//! Spotify Web API.

use std::sync::Arc;

use serde_json::json;
use sonority_core::{Catalog, RawTable};
use sonority_recommend::resilience::RateLimiter;
use sonority_recommend::{
    respond, MetadataSource, RecommendError, RecommendRequest, Recommender, SpotifyClient,
    SpotifyCredentials, TrackId,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_token(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "test-token",
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_search(server: &MockServer, items: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("type", "track"))
        .and(query_param("limit", "1"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tracks": { "items": items }
        })))
        .mount(server)
        .await;
}

async fn mount_features(server: &MockServer, track_id: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/v1/audio-features/{}", track_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn client(server: &MockServer) -> SpotifyClient {
    SpotifyClient::new(SpotifyCredentials::new(
        "client-id".to_string(),
        "client-secret".to_string(),
    ))
    .unwrap()
    .with_base_urls(&server.uri(), &server.uri())
    .with_rate_limiter(RateLimiter::new(0))
}

#[tokio::test]
async fn test_search_track_returns_first_item() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    mount_search(&server, json!([{"id": "0VjIjW4GlUZAMYd2vXMi3b"}, {"id": "other"}])).await;

    let spotify = client(&server);
    let track = spotify
        .search_track("Blinding Lights", "The Weeknd")
        .await
        .unwrap();
    assert_eq!(track, Some(TrackId::new("0VjIjW4GlUZAMYd2vXMi3b")));
}

#[tokio::test]
async fn test_search_track_no_match() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    mount_search(&server, json!([])).await;

    let track = client(&server).search_track("Nope", "Nobody").await.unwrap();
    assert!(track.is_none());
}

#[tokio::test]
async fn test_token_is_cached_between_requests() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    mount_search(&server, json!([{"id": "abc"}])).await;

    let spotify = client(&server);
    spotify.search_track("A", "X").await.unwrap();
    spotify.search_track("B", "Y").await.unwrap();
    // MockServer verifies the single token request on drop.
}

#[tokio::test]
async fn test_audio_features_numeric_only() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    mount_features(
        &server,
        "abc",
        json!({
            "id": "abc",
            "type": "audio_features",
            "key": 1,
            "energy": 0.73,
            "tempo": 171.005
        }),
    )
    .await;

    let attributes = client(&server)
        .audio_features(&TrackId::new("abc"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(attributes.len(), 3);
    assert_eq!(attributes["energy"], 0.73);
}

#[tokio::test]
async fn test_audio_features_404_is_none() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/v1/audio-features/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let attributes = client(&server)
        .audio_features(&TrackId::new("missing"))
        .await
        .unwrap();
    assert!(attributes.is_none());
}

#[tokio::test]
async fn test_rejected_credentials_are_auth_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "invalid_client"})))
        .mount(&server)
        .await;

    let err = client(&server).search_track("A", "X").await.unwrap_err();
    assert!(matches!(err, RecommendError::Auth { .. }));
    assert!(err.is_upstream());
}

#[tokio::test]
async fn test_rate_limit_is_not_retried() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server).search_track("A", "X").await.unwrap_err();
    assert!(matches!(err, RecommendError::RateLimited { .. }));
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client(&server).search_track("A", "X").await.unwrap_err();
    assert!(matches!(err, RecommendError::Parse { .. }));
}

const CATALOG: &str = "\
track_name,track_artist,track_album_name,popularity,key,valence,energy,speechiness,danceability,acousticness,instrumentalness,liveness
Blinding Lights,The Weeknd,After Hours,95,1,0.33,0.73,0.06,0.51,0.001,0.0001,0.09
Save Your Tears,The Weeknd,After Hours,90,0,0.64,0.83,0.03,0.68,0.02,0.00002,0.54
Save Your Tears,The Weeknd,After Hours (Deluxe),88,0,0.64,0.83,0.03,0.68,0.02,0.00002,0.54
Levitating,Dua Lipa,Future Nostalgia,88,6,0.92,0.82,0.06,0.70,0.01,0.0,0.07
Clair de Lune,Debussy,Suite bergamasque,60,1,0.05,0.02,0.04,0.20,0.99,0.91,0.10
";

#[tokio::test]
async fn test_end_to_end_request() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    mount_search(&server, json!([{"id": "0VjIjW4GlUZAMYd2vXMi3b"}])).await;
    mount_features(
        &server,
        "0VjIjW4GlUZAMYd2vXMi3b",
        json!({
            "key": 1, "valence": 0.33, "energy": 0.73, "speechiness": 0.06,
            "danceability": 0.51, "acousticness": 0.001, "instrumentalness": 0.0001,
            "liveness": 0.09, "tempo": 171.0
        }),
    )
    .await;

    let raw = RawTable::from_reader(CATALOG.as_bytes()).unwrap();
    let catalog = Arc::new(Catalog::load(&raw).unwrap());
    let recommender = Recommender::new(Arc::clone(&catalog), client(&server)).with_count(3);

    let response = respond(
        Some(&recommender),
        &RecommendRequest::new("Blinding Lights", "The Weeknd"),
    )
    .await;

    assert_eq!(response.status, 200);
    let body = serde_json::to_value(&response.body).unwrap();
    let songs: Vec<&str> = body["recommended_songs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["song_name"].as_str().unwrap())
        .collect();
    // Blinding Lights itself is excluded and the duplicate row collapses.
    assert_eq!(songs, vec!["Save Your Tears", "Clair de Lune", "Levitating"]);
}
