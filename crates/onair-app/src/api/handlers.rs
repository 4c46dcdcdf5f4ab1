//! Request handlers
//!
//! Each handler answers one endpoint. None of them surfaces a now-playing
//! failure to the client: the station defaults are served instead.

use std::sync::{Mutex, PoisonError};

use onair::stream::{resolve_playlist_url, IcyMetadataReader, TrackInfo};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::config::history::MAX_HISTORY_ENTRIES;
use crate::config::{AppConfig, SourceConfig};
use crate::data::{HistoryLog, HistoryStore};
use crate::error::Result;
use crate::providers::SourceChain;

use super::types::{ApiRequest, ApiResponse};

const READ_METHODS: &str = "GET, OPTIONS";
const WRITE_METHODS: &str = "POST, OPTIONS";

/// Everything the handlers need, shared across requests
pub struct ApiContext {
    config: AppConfig,
    sources: SourceChain,
    history: Mutex<Box<dyn HistoryStore>>,
    reader: IcyMetadataReader,
}

impl ApiContext {
    pub fn new(
        config: AppConfig,
        sources: SourceChain,
        history: Box<dyn HistoryStore>,
    ) -> Result<Self> {
        let reader = IcyMetadataReader::new(config.station.timeout(), &config.station.label)?;
        Ok(Self {
            config,
            sources,
            history: Mutex::new(history),
            reader,
        })
    }

    /// Build sources and open the history file described by `config`
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let sources = SourceChain::from_config(&config)?;
        let history = HistoryLog::load_from(&config.history_path()?)?;
        Self::new(config, sources, Box::new(history))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Current track, or the station default when no source answers
    pub fn now_playing(&self) -> TrackInfo {
        match self.sources.current_track() {
            Ok(track) => track,
            Err(e) => {
                info!(error = %e, "Serving default track");
                self.config.station.fallback_for(&e)
            }
        }
    }

    /// Recent distinct tracks, or the fallback list when there are none
    pub fn recent_tracks(&self, limit: usize) -> Vec<TrackInfo> {
        let history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        match history.recent_distinct(limit) {
            Ok(tracks) if !tracks.is_empty() => tracks,
            Ok(_) => self.config.history.fallback_tracks.clone(),
            Err(e) => {
                warn!(error = %e, "History unavailable, serving fallback tracks");
                self.config.history.fallback_tracks.clone()
            }
        }
    }

    /// Probe `url` (playlist or stream) and describe its ICY support
    pub fn probe_report(&self, url: &str) -> Value {
        let probe = resolve_playlist_url(self.reader.client(), url)
            .and_then(|stream_url| self.reader.probe(&stream_url));

        let mut report = match probe {
            Ok(probe) => serde_json::to_value(&probe)
                .unwrap_or_else(|e| json!({ "error": e.to_string() })),
            Err(e) => json!({
                "stream_url": url,
                "icy_metadata_supported": false,
                "error": e.to_string(),
            }),
        };
        if let Value::Object(map) = &mut report {
            map.insert("requested_url".to_string(), json!(url));
        }
        report
    }
}

/// GET: current track as `{"artist", "title"}`
pub fn current_track(ctx: &ApiContext, req: &ApiRequest) -> ApiResponse {
    if req.is("OPTIONS") {
        return ApiResponse::preflight(READ_METHODS);
    }
    if !req.is("GET") {
        return ApiResponse::method_not_allowed();
    }
    ApiResponse::ok(&ctx.now_playing())
}

/// GET: `{"tracks": [...]}`, optional `?limit=N`
pub fn track_history(ctx: &ApiContext, req: &ApiRequest) -> ApiResponse {
    if req.is("OPTIONS") {
        return ApiResponse::preflight(READ_METHODS);
    }
    if !req.is("GET") {
        return ApiResponse::method_not_allowed();
    }
    let limit = req
        .query_param("limit")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(ctx.config.history.limit)
        .clamp(1, MAX_HISTORY_ENTRIES);
    ApiResponse::ok(&json!({ "tracks": ctx.recent_tracks(limit) }))
}

/// POST: record the current track in the history
pub fn save_track(ctx: &ApiContext, req: &ApiRequest) -> ApiResponse {
    if req.is("OPTIONS") {
        return ApiResponse::preflight(WRITE_METHODS);
    }
    if !req.is("POST") {
        return ApiResponse::method_not_allowed();
    }

    let track = match ctx.sources.current_track() {
        Ok(track) if track.is_complete() => track,
        Ok(_) => return skipped(),
        Err(e) => {
            info!(error = %e, "Nothing to save");
            return skipped();
        }
    };

    let outcome = ctx
        .history
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .record(&track);
    match outcome {
        Ok(outcome) => ApiResponse::ok(&json!({
            "status": outcome.as_str(),
            "artist": track.artist,
            "title": track.title,
        })),
        Err(e) => {
            warn!(error = %e, "Failed to record track");
            ApiResponse::error(500, e.to_string())
        }
    }
}

fn skipped() -> ApiResponse {
    ApiResponse::ok(&json!({ "status": "skipped", "reason": "no track info" }))
}

/// GET `?endpoint=current|history`: single proxy entry point for the frontend
pub fn radio_api(ctx: &ApiContext, req: &ApiRequest) -> ApiResponse {
    if req.is("OPTIONS") {
        return ApiResponse::preflight(READ_METHODS);
    }
    if !req.is("GET") {
        return ApiResponse::method_not_allowed();
    }
    match req.query_param("endpoint").unwrap_or("current") {
        "current" => current_track(ctx, req),
        "history" => track_history(ctx, req),
        _ => ApiResponse::error(400, "Invalid endpoint"),
    }
}

/// GET: ICY diagnostics for the configured stream sources.
///
/// `?url=` narrows the report to one of them; other URLs are refused.
pub fn probe(ctx: &ApiContext, req: &ApiRequest) -> ApiResponse {
    if req.is("OPTIONS") {
        return ApiResponse::preflight(READ_METHODS);
    }
    if !req.is("GET") {
        return ApiResponse::method_not_allowed();
    }
    let streams: Vec<&str> = ctx
        .config
        .sources
        .iter()
        .filter(|s| matches!(s, SourceConfig::Icy { .. }))
        .map(SourceConfig::url)
        .collect();
    let targets = match req.query_param("url") {
        Some(url) if streams.contains(&url) => vec![url],
        Some(_) => return ApiResponse::error(400, "Unknown stream"),
        None => streams,
    };
    let probes: Vec<Value> = targets.into_iter().map(|url| ctx.probe_report(url)).collect();
    ApiResponse::ok(&json!({
        "station": ctx.config.station.label,
        "probes": probes,
    }))
}
