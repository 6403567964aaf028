//! Integration tests for direct downloads
//!
//! These run the downloader end-to-end against a local mock server, so no
//! external network access is needed.

use std::time::{Duration, Instant};

use tempfile::tempdir;
use webgrab::{DownloadOptions, Error};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_download_writes_exact_bytes() {
    let server = MockServer::start().await;
    let body: Vec<u8> = (0..=255u8).cycle().take(256 * 1024).collect();

    Mock::given(method("GET"))
        .and(path("/blob.bin"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let dest = dir.path().join("blob.bin");
    let url = format!("{}/blob.bin", server.uri());

    webgrab::download(&url, &dest).await.unwrap();

    let written = std::fs::read(&dest).unwrap();
    assert_eq!(written.len(), body.len());
    assert_eq!(written, body);
}

#[tokio::test]
async fn test_rate_limited_download_is_paced() {
    let server = MockServer::start().await;
    // 96 KiB at a 32 KiB/s ceiling: the 32 KiB burst is free, the remaining
    // 64 KiB must take at least two seconds.
    let body = vec![0x5Au8; 96 * 1024];

    Mock::given(method("GET"))
        .and(path("/slow.bin"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let dest = dir.path().join("slow.bin");
    let url = format!("{}/slow.bin", server.uri());

    let options = DownloadOptions {
        rate_limit: 32.0 * 1024.0,
        ..Default::default()
    };

    let start = Instant::now();
    webgrab::download_with_options(&url, &dest, &options)
        .await
        .unwrap();
    let elapsed = start.elapsed();

    assert!(
        elapsed >= Duration::from_millis(1800),
        "limited transfer finished too fast: {elapsed:?}"
    );
    assert_eq!(std::fs::read(&dest).unwrap(), body);
}

#[tokio::test]
async fn test_unlimited_download_is_not_paced() {
    let server = MockServer::start().await;
    let body = vec![0xA5u8; 96 * 1024];

    Mock::given(method("GET"))
        .and(path("/fast.bin"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let dest = dir.path().join("fast.bin");
    let url = format!("{}/fast.bin", server.uri());

    let start = Instant::now();
    webgrab::download(&url, &dest).await.unwrap();

    // Generous bound; a local transfer of 96 KiB is effectively instant.
    assert!(start.elapsed() < Duration::from_secs(1));
    assert_eq!(std::fs::read(&dest).unwrap().len(), body.len());
}

#[tokio::test]
async fn test_server_error_status_maps_to_http_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gone.bin"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let dest = dir.path().join("gone.bin");
    let url = format!("{}/gone.bin", server.uri());

    let err = webgrab::download(&url, &dest).await.unwrap_err();
    match err {
        Error::HttpStatus(status) => assert_eq!(status.as_u16(), 503),
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_server_maps_to_network_error() {
    // A port nothing listens on.
    let dir = tempdir().unwrap();
    let dest = dir.path().join("never.bin");

    let err = webgrab::download("http://127.0.0.1:9/never.bin", &dest)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NetworkError(_)));
}

#[tokio::test]
async fn test_existing_destination_is_truncated() {
    let server = MockServer::start().await;
    let body = b"short".to_vec();

    Mock::given(method("GET"))
        .and(path("/replace.bin"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let dest = dir.path().join("replace.bin");
    std::fs::write(&dest, vec![0u8; 4096]).unwrap();

    let url = format!("{}/replace.bin", server.uri());
    webgrab::download(&url, &dest).await.unwrap();

    assert_eq!(std::fs::read(&dest).unwrap(), body);
}
