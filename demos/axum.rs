/* demos/axum.rs */

use axum::{Router, extract::ConnectInfo, http::HeaderMap, response::Json, routing::get};
use origin_ip::{ClientIp, ClientIpLayer, ClientIpResolver, DEFAULT_HEADERS};
use serde_json::json;
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .init();

    let app = create_app();
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();

    println!("Server starting on http://localhost:3000");
    println!("Test endpoints:");
    println!("  • GET /        - JSON response with the resolved source IP");
    println!("  • GET /debug   - Resolution details and forwarding headers");
    println!();
    println!("Test with headers:");
    println!("  curl -H 'X-Forwarded-For: 203.0.113.7, 10.0.0.5' http://localhost:3000/");
    println!("  curl -H 'X-Forwarded-For: 10.0.0.5' -H 'X-Real-IP: 198.51.100.9' http://localhost:3000/debug");
    println!();

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}

fn create_app() -> Router {
    Router::new()
        .route("/", get(event_handler))
        .route("/debug", get(debug_handler))
        .layer(ClientIpLayer::default())
}

/// Shape of the `sourceIp` field as a security event producer would emit it.
async fn event_handler(client_ip: ClientIp) -> Json<serde_json::Value> {
    Json(json!({ "sourceIp": client_ip.as_str() }))
}

async fn debug_handler(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Json<serde_json::Value> {
    let peer = addr.ip().to_string();
    let resolution = ClientIpResolver::default().resolve_detailed(&headers, Some(&peer));

    let forwarding_headers: serde_json::Map<String, serde_json::Value> = DEFAULT_HEADERS
        .iter()
        .filter_map(|name| {
            headers
                .get(*name)
                .and_then(|value| value.to_str().ok())
                .map(|value| (name.to_string(), json!(value)))
        })
        .collect();

    Json(json!({
        "sourceIp": resolution.ip,
        "source": resolution.source.to_string(),
        "peer": addr.to_string(),
        "forwarding_headers": forwarding_headers,
    }))
}
