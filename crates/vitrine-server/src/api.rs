//! The analytics pixel route.
//!
//! One endpoint: `GET /pixel?d=<date>&b=<brand>&p=<product path>`. It
//! increments a counter keyed by the three parameters and always answers
//! with a 1×1 transparent GIF marked `no-store` — the pixel must never be
//! cached and must never break the page embedding it, even when the counter
//! store is down.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use crate::store::CounterStore;

/// 1×1 transparent GIF, 43 bytes.
const PIXEL_GIF: &[u8] = &[
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, // GIF89a
    0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, // 1x1, global color table
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // palette
    0x21, 0xF9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, // GCE: transparent
    0x2C, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, // image descriptor
    0x02, 0x02, 0x44, 0x01, 0x00, // image data
    0x3B, // trailer
];

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CounterStore>,
}

#[derive(Debug, Deserialize)]
struct PixelParams {
    /// Date bucket, e.g. `2026-08-23`.
    d: Option<String>,
    /// Brand slug.
    b: Option<String>,
    /// Product tree path.
    p: Option<String>,
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/pixel", get(pixel))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn pixel(State(state): State<AppState>, Query(params): Query<PixelParams>) -> Response {
    let (Some(date), Some(brand), Some(product)) = (params.d, params.b, params.p) else {
        return (
            StatusCode::BAD_REQUEST,
            "missing required query parameters: d, b, p",
        )
            .into_response();
    };

    let key = format!("hits:{date}:{brand}:{product}");
    if let Err(e) = state.store.incr(&key).await {
        // Count is lost but the page must still get its pixel.
        tracing::error!(key = %key, error = %e, "counter increment failed");
    }

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "image/gif"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        PIXEL_GIF,
    )
        .into_response()
}

async fn not_found() -> Response {
    StatusCode::NOT_FOUND.into_response()
}
