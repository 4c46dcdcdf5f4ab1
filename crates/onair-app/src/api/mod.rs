//! HTTP boundary
//!
//! Serverless-style handlers with CORS envelopes, plus path routing for the
//! bundled server.

pub mod handlers;
pub mod types;

pub use handlers::{current_track, probe, radio_api, save_track, track_history, ApiContext};
pub use types::{ApiRequest, ApiResponse};

/// Dispatch a request by path (`/current`, `/history`, `/save`, `/api`, `/probe`)
pub fn route(ctx: &ApiContext, path: &str, req: &ApiRequest) -> ApiResponse {
    let path = path.trim_end_matches('/');
    match path {
        "/current" => current_track(ctx, req),
        "/history" => track_history(ctx, req),
        "/save" => save_track(ctx, req),
        "/api" => radio_api(ctx, req),
        "/probe" => probe(ctx, req),
        _ => ApiResponse::not_found(),
    }
}
