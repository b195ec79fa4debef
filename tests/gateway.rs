//! End-to-end tests: gateway in front of a mock application.

use canonical_host::config::GatewayConfig;

mod common;

#[tokio::test]
async fn test_bare_host_is_redirected_to_www() {
    let backend = common::start_mock_backend("app").await;
    let (gateway, shutdown) = common::start_gateway(GatewayConfig::default(), backend).await;

    let res = common::client()
        .get(format!("http://{gateway}/path/1?param=test"))
        .header("Host", "example.com")
        .send()
        .await
        .expect("Gateway unreachable");

    assert_eq!(res.status(), 301);
    assert_eq!(
        res.headers()["location"],
        "https://www.example.com/path/1?param=test"
    );
    assert_eq!(res.headers()["content-type"], "text/html");
    assert!(res.headers().contains_key("x-request-id"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_canonical_host_reaches_upstream() {
    let backend = common::start_mock_backend("app").await;
    let (gateway, shutdown) = common::start_gateway(GatewayConfig::default(), backend).await;

    let res = common::client()
        .get(format!("http://{gateway}/"))
        .header("Host", "www.example.com")
        .send()
        .await
        .expect("Gateway unreachable");

    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "app host=www.example.com");

    shutdown.trigger();
}

#[tokio::test]
async fn test_forbid_policy_strips_www() {
    let backend = common::start_mock_backend("app").await;
    let mut config = GatewayConfig::default();
    config.redirect.want_subdomain = false;
    config.redirect.message = vec!["<a>".to_string(), "moved".to_string(), "</a>".to_string()].into();
    let (gateway, shutdown) = common::start_gateway(config, backend).await;

    let client = common::client();

    let res = client
        .get(format!("http://{gateway}/"))
        .header("Host", "www.example.com")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 301);
    assert_eq!(res.headers()["location"], "https://example.com/");
    assert_eq!(res.text().await.unwrap(), "<a>moved</a>");

    let res = client
        .get(format!("http://{gateway}/"))
        .header("Host", "example.com")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    shutdown.trigger();
}

#[tokio::test]
async fn test_ip_host_is_never_redirected() {
    let backend = common::start_mock_backend("app").await;
    let (gateway, shutdown) = common::start_gateway(GatewayConfig::default(), backend).await;

    // Host defaults to the gateway's own 127.0.0.1:port
    let res = common::client()
        .get(format!("http://{gateway}/"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    shutdown.trigger();
}

#[tokio::test]
async fn test_non_default_port_in_location() {
    let backend = common::start_mock_backend("app").await;
    let (gateway, shutdown) = common::start_gateway(GatewayConfig::default(), backend).await;

    let res = common::client()
        .get(format!("http://{gateway}/"))
        .header("Host", "example.com:8080")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 301);
    assert_eq!(res.headers()["location"], "https://www.example.com:8080/");

    shutdown.trigger();
}

#[tokio::test]
async fn test_upstream_down_is_bad_gateway() {
    let (gateway, shutdown) = common::start_gateway(
        GatewayConfig::default(),
        "127.0.0.1:1".parse().unwrap(),
    )
    .await;

    let res = common::client()
        .get(format!("http://{gateway}/"))
        .header("Host", "www.example.com")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 502);

    shutdown.trigger();
}
