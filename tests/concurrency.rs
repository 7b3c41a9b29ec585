//! Concurrency and cache-bound tests.

use avatar_server::config::AvatarConfig;
use futures_util::future::join_all;
use std::time::Duration;

mod common;

#[tokio::test]
async fn test_concurrent_identical_requests_convert_once() {
    let adapter = common::CountingAdapter::with_delay(Duration::from_millis(200));
    let server = common::start_server_with(
        AvatarConfig::default(),
        common::gltf_adapter(adapter.clone()),
    )
    .await;
    let client = common::client();

    let requests = (0..10).map(|_| {
        let client = client.clone();
        let url = server.url("/avatar.gltf?hair=%23F9D656");
        async move {
            let res = client.get(url).send().await.unwrap();
            assert_eq!(res.status(), 200);
            let status = res.headers()["x-avatar-cache"].to_str().unwrap().to_string();
            (status, res.bytes().await.unwrap())
        }
    });
    let results = join_all(requests).await;

    assert_eq!(adapter.calls(), 1);
    let first = &results[0].1;
    assert!(results.iter().all(|(_, body)| body == first));
    assert_eq!(results.iter().filter(|(status, _)| status == "miss").count(), 1);
}

#[tokio::test]
async fn test_coalescing_can_be_disabled() {
    let adapter = common::CountingAdapter::with_delay(Duration::from_millis(200));
    let mut config = AvatarConfig::default();
    config.cache.coalesce_in_flight = false;
    let server = common::start_server_with(config, common::gltf_adapter(adapter.clone())).await;
    let client = common::client();

    let requests = (0..4).map(|_| client.get(server.url("/avatar.gltf?hair=545454")).send());
    for res in join_all(requests).await {
        assert_eq!(res.unwrap().status(), 200);
    }

    assert_eq!(adapter.calls(), 4);
}

#[tokio::test]
async fn test_cache_is_bounded_and_evicts_oldest() {
    let adapter = common::CountingAdapter::with_delay(Duration::ZERO);
    let mut config = AvatarConfig::default();
    config.cache.capacity = 2;
    let server = common::start_server_with(config, common::gltf_adapter(adapter.clone())).await;
    let client = common::client();

    let get = |query: &'static str| {
        let client = client.clone();
        let url = server.url(&format!("/avatar.gltf?{query}"));
        async move {
            let res = client.get(url).send().await.unwrap();
            res.headers()["x-avatar-cache"].to_str().unwrap().to_string()
        }
    };

    assert_eq!(get("body=545454").await, "miss");
    assert_eq!(get("body=0b1821").await, "miss");
    assert_eq!(get("body=545454").await, "hit");
    // Evicts body=0b1821, the least recently used.
    assert_eq!(get("body=f9d656").await, "miss");
    assert_eq!(get("body=545454").await, "hit");
    assert_eq!(get("body=0b1821").await, "miss");
    assert_eq!(adapter.calls(), 4);
}
