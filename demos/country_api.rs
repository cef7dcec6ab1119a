//! Demo server exposing a REST country resource.
//!
//! Run with `cargo run --example country_api`, then:
//!
//! ```text
//! curl http://127.0.0.1:3000/ping
//! curl http://127.0.0.1:3000/ping/there
//! curl -X POST http://127.0.0.1:3000/country \
//!     -H 'Content-Type: application/json' \
//!     -d '{"name":"Italy","iso":"IT","iso3":"ITA","numcode":380}'
//! curl http://127.0.0.1:3000/country/name:Italy
//! ```

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use resource_router::{observability, Api, ApiConfig, ApiRequest, MemorySet, Reply, SharedSet};
use serde_json::json;

async fn dispatch(State(countries): State<SharedSet>, request: Request<Body>) -> Response {
    let config = ApiConfig::default();
    let request = ApiRequest::from_http(request, config.max_body_bytes).await;

    let mut api = Api::with_config(request, config);
    api.get("/ping", |_| Ok(Reply::Value(json!("Hello, World"))));
    api.get("/ping/:hello", |vars| {
        Ok(Reply::Value(json!(format!("Hello, {}", vars[0].as_str()))))
    });
    api.rest("/country", countries);

    match api.into_response() {
        Some(envelope) => envelope.into_response(),
        None => (StatusCode::NOT_FOUND, "no matching route").into_response(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    observability::logging::init();

    let countries = SharedSet::new(
        MemorySet::new("country")
            .require("name")
            .field("sys_name")
            .require("iso")
            .require("iso3")
            .require("numcode")
            .field("phonecode"),
    );

    let app = Router::new().fallback(dispatch).with_state(countries);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
    tracing::info!(address = %listener.local_addr()?, "country API listening");
    axum::serve(listener, app).await?;

    Ok(())
}
