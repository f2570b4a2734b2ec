use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use configs::DatabaseConfig;
use futures::StreamExt;
use migration::MigratorTrait;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;
use tower_http::cors::CorsLayer;

use server::{events::EventHub, routes, state::ServerState};

struct TestApp {
    base_url: String,
}

async fn start_server() -> anyhow::Result<TestApp> {
    let url = std::env::var("TEST_DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string());
    let cfg = DatabaseConfig { url, min_connections: 1, ..Default::default() };
    let db = models::db::connect_with_config(&cfg).await?;
    if let Err(e) = migration::Migrator::up(&db, None).await { eprintln!("migrations notice: {}", e); }

    let state = ServerState::new(db, EventHub::new(64));
    let app: Router = routes::build_router(state, CorsLayer::very_permissive(), "/nonexistent-dashboard");
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url })
}

#[tokio::test]
async fn e2e_public_health_and_metrics() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let app = start_server().await?;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["status"], "ok");

    let res = client.get(format!("{}/metrics", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn e2e_medication_and_water_change_flow() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let app = start_server().await?;
    let client = reqwest::Client::new();
    let base = &app.base_url;

    let site: Value = client.post(format!("{base}/sites")).json(&json!({"name": "Delta"})).send().await?.json().await?;
    let pond: Value = client
        .post(format!("{base}/fish-ponds"))
        .json(&json!({"site_id": site["id"], "name": "Nursery", "area_m2": 120.5, "depth_m": 1.1}))
        .send().await?
        .json().await?;
    assert_eq!(pond["status"], "active");

    let res = client
        .post(format!("{base}/water-changes"))
        .json(&json!({"pond_id": pond["id"], "volume_percent": 25.0, "ph": 7.4, "temperature_c": 24.0}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let change: Value = res.json().await?;

    // null clears a reading, an absent key keeps it
    let cleared: Value = client
        .put(format!("{base}/water-changes/{}", change["id"].as_str().unwrap_or_default()))
        .json(&json!({"ph": null}))
        .send().await?
        .json().await?;
    assert!(cleared["ph"].is_null());
    assert_eq!(cleared["temperature_c"], 24.0);

    let res = client
        .post(format!("{base}/medications"))
        .json(&json!({"pond_id": pond["id"], "medicine": "salt bath", "dosage": 3.0, "dosage_unit": "g/L"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let med: Value = res.json().await?;

    let listed: Value = client
        .get(format!("{base}/medications?pond_id={}", pond["id"].as_str().unwrap_or_default()))
        .send().await?
        .json().await?;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));

    let res = client.delete(format!("{base}/medications/{}", med["id"].as_str().unwrap_or_default())).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);

    // water changes need a lab box or a pond
    let res = client
        .post(format!("{base}/water-changes"))
        .json(&json!({"volume_percent": 10.0}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn e2e_ws_streams_only_subscribed_topics() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let app = start_server().await?;
    let client = reqwest::Client::new();
    let base = &app.base_url;

    let site: Value = client.post(format!("{base}/sites")).json(&json!({"name": "Weir"})).send().await?.json().await?;
    let store: Value = client
        .post(format!("{base}/stores"))
        .json(&json!({"site_id": site["id"], "name": "Silo 1", "feed_type": "fry powder", "quantity": 10.0, "reorder_level": 5.0}))
        .send().await?
        .json().await?;
    let pond: Value = client
        .post(format!("{base}/fish-ponds"))
        .json(&json!({"site_id": site["id"], "name": "Grow-out", "area_m2": 300.0}))
        .send().await?
        .json().await?;

    let ws_url = format!("{}/ws?topics=store", base.replacen("http://", "ws://", 1));
    let (mut socket, _) = tokio_tungstenite::connect_async(ws_url).await?;

    let res = client
        .post(format!("{base}/feedings"))
        .json(&json!({"pond_id": pond["id"], "store_id": store["id"], "quantity": 6.0}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    // the feeding event is published first; only the store update reaches this client
    let frame = tokio::time::timeout(Duration::from_secs(5), socket.next())
        .await?
        .ok_or_else(|| anyhow::anyhow!("socket closed before any event"))??;
    let event: Value = match frame {
        Message::Text(text) => serde_json::from_str(&text)?,
        other => anyhow::bail!("unexpected frame: {other:?}"),
    };
    assert_eq!(event["topic"], "store");
    assert_eq!(event["action"], "updated");
    assert_eq!(event["id"], store["id"]);
    assert_eq!(event["data"]["quantity"], 4.0);
    assert_eq!(event["data"]["low_stock"], true);

    assert!(tokio::time::timeout(Duration::from_millis(300), socket.next()).await.is_err());

    socket.close(None).await?;
    let mut gauge = String::new();
    for _ in 0..20 {
        let metrics = client.get(format!("{base}/metrics")).send().await?.text().await?;
        gauge = metrics.lines().find(|l| l.starts_with("hatchery_ws_clients ")).unwrap_or_default().to_string();
        if gauge == "hatchery_ws_clients 0" { break; }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert_eq!(gauge, "hatchery_ws_clients 0");
    Ok(())
}
