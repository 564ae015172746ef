//! Source chain and policy gating tests for the artwork fetcher.

mod common;

use common::{encoded_png, FixedConnectivity, Harness, MemSettings};
use core_artwork::config::keys;
use core_artwork::{ArtInfo, ArtworkError, ArtworkSize};

fn album_json(mbid: &str, image_url: &str) -> String {
    format!(
        r##"{{"album":{{"mbid":"{mbid}","image":[{{"#text":"{image_url}","size":"extralarge"}}]}}}}"##
    )
}

fn artist_json(image_url: &str) -> String {
    format!(r##"{{"artist":{{"image":[{{"#text":"{image_url}","size":"extralarge"}}]}}}}"##)
}

#[tokio::test]
async fn local_artwork_is_served_without_touching_the_network() {
    let harness = Harness::new();
    let local = encoded_png(64, 64);
    harness.content.insert("/music/track.flac", local.clone());

    let fetcher = harness.fetcher(FixedConnectivity::wifi());
    let info = ArtInfo::album("Alvvays", "Antisocialites").with_uri("/music/track.flac");

    let bytes = fetcher.fetch(&info, ArtworkSize::Thumbnail).await.unwrap();
    assert_eq!(bytes, local);
    assert_eq!(harness.http.call_count(), 0);
}

#[tokio::test]
async fn local_artwork_seeds_the_disk_cache() {
    let harness = Harness::new();
    let local = encoded_png(64, 64);
    harness.content.insert("/music/track.flac", local.clone());

    let fetcher = harness.fetcher(FixedConnectivity::wifi());
    let info = ArtInfo::album("Alvvays", "Antisocialites").with_uri("/music/track.flac");

    let first = fetcher.fetch(&info, ArtworkSize::Thumbnail).await.unwrap();
    let second = fetcher.fetch(&info, ArtworkSize::Thumbnail).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(fetcher.disk_stats().await.entries, 1);
    // The second fetch came off disk without re-reading the file.
    assert_eq!(harness.content.calls().len(), 1);
}

#[tokio::test]
async fn provider_chain_resolves_cover_through_the_archive() {
    let harness = Harness::new();
    let cover = encoded_png(600, 600);
    harness
        .http
        .route("album.getinfo", 200, album_json("mbid-1", "http://img/cover.jpg"));
    harness
        .http
        .route("release-group/mbid-1/front", 200, cover.clone());

    let fetcher = harness.fetcher(FixedConnectivity::wifi());
    let info = ArtInfo::album("Alvvays", "Antisocialites");

    let bytes = fetcher.fetch(&info, ArtworkSize::Thumbnail).await.unwrap();
    assert_eq!(bytes, cover);
    assert_eq!(harness.http.calls_matching("album.getinfo"), 1);
    assert_eq!(harness.http.calls_matching("release-group"), 1);
    // The direct URL was never needed.
    assert_eq!(harness.http.calls_matching("img/cover.jpg"), 0);
}

#[tokio::test]
async fn archive_miss_falls_back_to_the_direct_image_url() {
    let harness = Harness::new();
    let cover = encoded_png(500, 500);
    harness
        .http
        .route("album.getinfo", 200, album_json("mbid-2", "http://img/direct.jpg"));
    harness.http.route("release-group", 404, "");
    harness.http.route("img/direct.jpg", 200, cover.clone());

    let fetcher = harness.fetcher(FixedConnectivity::wifi());
    let info = ArtInfo::album("Big Thief", "Capacity");

    let bytes = fetcher.fetch(&info, ArtworkSize::Large).await.unwrap();
    assert_eq!(bytes, cover);
    assert_eq!(harness.http.calls_matching("img/direct.jpg"), 1);
}

#[tokio::test]
async fn second_fetch_is_served_from_the_disk_cache() {
    let harness = Harness::new();
    harness
        .http
        .route("album.getinfo", 200, album_json("mbid-3", "http://img/c.jpg"));
    harness
        .http
        .route("release-group", 200, encoded_png(400, 400));

    let fetcher = harness.fetcher(FixedConnectivity::wifi());
    let info = ArtInfo::album("Artist", "Album");

    let first = fetcher.fetch(&info, ArtworkSize::Thumbnail).await.unwrap();
    let calls_after_first = harness.http.call_count();

    let second = fetcher.fetch(&info, ArtworkSize::Thumbnail).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(harness.http.call_count(), calls_after_first);
    assert_eq!(fetcher.disk_stats().await.entries, 1);
}

#[tokio::test]
async fn disk_budget_setting_overrides_the_configured_limit() {
    let settings = MemSettings::new().with_u64(keys::DISK_LIMIT_MB, 0);
    let harness = Harness::with_settings(settings);
    harness
        .http
        .route("album.getinfo", 200, album_json("mbid-9", "http://img/c.jpg"));
    harness
        .http
        .route("release-group", 200, encoded_png(400, 400));

    let fetcher = harness.fetcher(FixedConnectivity::wifi());
    let info = ArtInfo::album("Artist", "Album");

    fetcher.fetch(&info, ArtworkSize::Thumbnail).await.unwrap();
    assert_eq!(fetcher.disk_stats().await.entries, 0);

    // Nothing cached, so the provider chain runs again.
    let calls_after_first = harness.http.call_count();
    fetcher.fetch(&info, ArtworkSize::Thumbnail).await.unwrap();
    assert!(harness.http.call_count() > calls_after_first);
}

#[tokio::test]
async fn wifi_only_blocks_downloads_on_cellular() {
    let settings = MemSettings::new().with_bool(keys::WIFI_ONLY, true);
    let harness = Harness::with_settings(settings);

    let fetcher = harness.fetcher(FixedConnectivity::cellular());
    let info = ArtInfo::album("Artist", "Album");

    let err = fetcher.fetch(&info, ArtworkSize::Thumbnail).await.unwrap_err();
    assert!(matches!(err, ArtworkError::PolicyDenied(_)));
    assert_eq!(harness.http.call_count(), 0);
}

#[tokio::test]
async fn disabling_downloads_blocks_the_network_tier() {
    let settings = MemSettings::new().with_bool(keys::DOWNLOAD_MISSING, false);
    let harness = Harness::with_settings(settings);

    let fetcher = harness.fetcher(FixedConnectivity::wifi());
    let info = ArtInfo::album("Artist", "Album");

    let err = fetcher.fetch(&info, ArtworkSize::Thumbnail).await.unwrap_err();
    assert!(matches!(err, ArtworkError::PolicyDenied(_)));
    assert_eq!(harness.http.call_count(), 0);
}

#[tokio::test]
async fn offline_exhausts_sources_quietly() {
    let harness = Harness::new();

    let fetcher = harness.fetcher(FixedConnectivity::offline());
    let info = ArtInfo::album("Artist", "Album");

    let err = fetcher.fetch(&info, ArtworkSize::Thumbnail).await.unwrap_err();
    assert!(matches!(err, ArtworkError::AllSourcesExhausted));
    assert_eq!(harness.http.call_count(), 0);
}

#[tokio::test]
async fn artist_images_require_their_own_opt_in() {
    let harness = Harness::new();
    let fetcher = harness.fetcher(FixedConnectivity::wifi());
    let info = ArtInfo::artist("Alvvays");

    let err = fetcher.fetch(&info, ArtworkSize::Thumbnail).await.unwrap_err();
    assert!(matches!(err, ArtworkError::PolicyDenied(_)));
    assert_eq!(harness.http.call_count(), 0);
}

#[tokio::test]
async fn artist_image_is_fetched_when_opted_in() {
    let settings = MemSettings::new().with_bool(keys::DOWNLOAD_ARTIST_IMAGES, true);
    let harness = Harness::with_settings(settings);
    let portrait = encoded_png(450, 450);
    harness
        .http
        .route("artist.getinfo", 200, artist_json("http://img/artist.jpg"));
    harness.http.route("img/artist.jpg", 200, portrait.clone());

    let fetcher = harness.fetcher(FixedConnectivity::wifi());
    let info = ArtInfo::artist("Alvvays");

    let bytes = fetcher.fetch(&info, ArtworkSize::Thumbnail).await.unwrap();
    assert_eq!(bytes, portrait);
}

#[tokio::test]
async fn unknown_album_exhausts_sources() {
    let harness = Harness::new();
    harness.http.route(
        "album.getinfo",
        200,
        r#"{"error":6,"message":"Album not found"}"#,
    );

    let fetcher = harness.fetcher(FixedConnectivity::wifi());
    let info = ArtInfo::album("Nobody", "Nothing");

    let err = fetcher.fetch(&info, ArtworkSize::Thumbnail).await.unwrap_err();
    assert!(matches!(err, ArtworkError::AllSourcesExhausted));
}

#[tokio::test]
async fn requests_without_identity_are_rejected() {
    let harness = Harness::new();
    let fetcher = harness.fetcher(FixedConnectivity::wifi());

    let err = fetcher
        .fetch(&ArtInfo::default(), ArtworkSize::Thumbnail)
        .await
        .unwrap_err();
    assert!(matches!(err, ArtworkError::MissingIdentity));
}

#[tokio::test]
async fn prefer_download_consults_the_network_first() {
    let settings = MemSettings::new().with_bool(keys::PREFER_DOWNLOAD, true);
    let harness = Harness::with_settings(settings);

    let local = encoded_png(64, 64);
    let remote = encoded_png(600, 600);
    harness.content.insert("/music/track.flac", local);
    harness
        .http
        .route("album.getinfo", 200, album_json("mbid-4", "http://img/r.jpg"));
    harness.http.route("release-group", 200, remote.clone());

    let fetcher = harness.fetcher(FixedConnectivity::wifi());
    let info = ArtInfo::album("Artist", "Album").with_uri("/music/track.flac");

    let bytes = fetcher.fetch(&info, ArtworkSize::Large).await.unwrap();
    assert_eq!(bytes, remote);
}

#[tokio::test]
async fn prefer_download_still_falls_back_to_local() {
    let settings = MemSettings::new().with_bool(keys::PREFER_DOWNLOAD, true);
    let harness = Harness::with_settings(settings);

    let local = encoded_png(64, 64);
    harness.content.insert("/music/track.flac", local.clone());
    harness.http.route(
        "album.getinfo",
        200,
        r#"{"error":6,"message":"Album not found"}"#,
    );

    let fetcher = harness.fetcher(FixedConnectivity::wifi());
    let info = ArtInfo::album("Artist", "Album").with_uri("/music/track.flac");

    let bytes = fetcher.fetch(&info, ArtworkSize::Thumbnail).await.unwrap();
    assert_eq!(bytes, local);
}

#[tokio::test]
async fn rate_limited_provider_surfaces_the_error() {
    let harness = Harness::new();
    harness
        .http
        .route_with_header("album.getinfo", 429, ("Retry-After", "30"), "");

    let fetcher = harness.fetcher(FixedConnectivity::wifi());
    let info = ArtInfo::album("Artist", "Album");

    let err = fetcher.fetch(&info, ArtworkSize::Thumbnail).await.unwrap_err();
    match err {
        ArtworkError::RateLimited {
            retry_after_seconds,
            ..
        } => assert_eq!(retry_after_seconds, 30),
        other => panic!("expected RateLimited, got {other:?}"),
    }
}
