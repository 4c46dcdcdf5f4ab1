//! ICY metadata reader
//!
//! Connects to Icecast/Shoutcast streams, skips the first audio interval and
//! reads one inline metadata frame to find out what is on air.

use std::fmt;
use std::io::{self, Read};
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::HeaderMap;
use serde::Serialize;
use tracing::debug;

use crate::config::icy::{BLOCK_UNIT, METADATA_REQUEST_HEADER, METAINT_HEADER};
use crate::config::network::USER_AGENT;
use crate::error::{OnAirError, Result};
use crate::stream::metadata::{decode_metadata_block, parse_stream_title, TrackInfo};

/// Headers parsed from an ICY stream response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IcyHeaders {
    /// Audio bytes between metadata frames; `None` when absent or not a number
    pub metaint: Option<usize>,
    pub station_name: Option<String>,
    pub genre: Option<String>,
    pub station_url: Option<String>,
    pub content_type: Option<String>,
    pub bitrate: Option<u32>,
}

impl IcyHeaders {
    pub fn from_header_map(headers: &HeaderMap) -> Self {
        Self {
            metaint: header_str(headers, METAINT_HEADER)
                .and_then(|v| v.trim().parse::<usize>().ok()),
            station_name: header_str(headers, "icy-name").map(str::to_string),
            genre: header_str(headers, "icy-genre").map(str::to_string),
            station_url: header_str(headers, "icy-url").map(str::to_string),
            content_type: header_str(headers, "content-type").map(str::to_string),
            bitrate: header_str(headers, "icy-br").and_then(|v| v.trim().parse::<u32>().ok()),
        }
    }

    /// Whether the server interleaves metadata into the body
    pub fn metadata_supported(&self) -> bool {
        matches!(self.metaint, Some(n) if n > 0)
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Progress of a single metadata read, used for tracing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadPhase {
    Connecting,
    MetaIntervalNegotiated,
    AudioSkipped,
    LengthByteRead,
    FrameRead,
    TitleParsed,
    Done,
}

impl fmt::Display for ReadPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// An open stream body together with the headers it was negotiated with.
///
/// The metadata interval is fixed when the connection is created. Dropping
/// the connection closes the underlying body.
pub struct IcyConnection<R> {
    headers: IcyHeaders,
    body: R,
}

impl<R: Read> IcyConnection<R> {
    pub fn new(headers: IcyHeaders, body: R) -> Self {
        Self { headers, body }
    }

    pub fn headers(&self) -> &IcyHeaders {
        &self.headers
    }

    /// Read the first metadata frame and decode it to text.
    pub fn read_metadata_frame(&mut self) -> Result<String> {
        let mut phase = ReadPhase::Connecting;
        self.read_frame(&mut phase)
    }

    fn read_frame(&mut self, phase: &mut ReadPhase) -> Result<String> {
        let metaint = match self.headers.metaint {
            Some(n) if n > 0 => n,
            _ => return Err(OnAirError::NoMetadataSupport),
        };
        *phase = ReadPhase::MetaIntervalNegotiated;

        let skipped = io::copy(&mut (&mut self.body).take(metaint as u64), &mut io::sink())?;
        if skipped < metaint as u64 {
            return Err(OnAirError::TruncatedStream {
                expected: metaint,
                received: skipped as usize,
            });
        }
        *phase = ReadPhase::AudioSkipped;

        let mut len_byte = [0u8; 1];
        read_full(&mut self.body, &mut len_byte)?;
        *phase = ReadPhase::LengthByteRead;

        let frame_len = len_byte[0] as usize * BLOCK_UNIT;
        if frame_len == 0 {
            return Err(OnAirError::EmptyMetadataFrame);
        }

        let mut frame = vec![0u8; frame_len];
        read_full(&mut self.body, &mut frame)?;
        *phase = ReadPhase::FrameRead;

        Ok(decode_metadata_block(&frame))
    }
}

/// Fill `buf` completely, reporting a short stream as `TruncatedStream`
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(OnAirError::TruncatedStream {
                    expected: buf.len(),
                    received: filled,
                })
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// Read the current track from an open connection.
///
/// Consumes the connection, so the body is closed on every return path.
pub fn read_current_track<R: Read>(
    connection: IcyConnection<R>,
    default_artist: &str,
) -> Result<TrackInfo> {
    let mut connection = connection;
    let mut phase = ReadPhase::Connecting;
    let result = read_track(&mut connection, default_artist, &mut phase);
    drop(connection);

    match &result {
        Ok(track) => debug!(
            phase = %ReadPhase::Done,
            artist = %track.artist,
            title = %track.title,
            "ICY metadata read"
        ),
        Err(e) => debug!(phase = %phase, error = %e, "ICY metadata read failed"),
    }
    result
}

fn read_track<R: Read>(
    connection: &mut IcyConnection<R>,
    default_artist: &str,
    phase: &mut ReadPhase,
) -> Result<TrackInfo> {
    let metadata = connection.read_frame(phase)?;
    let value = parse_stream_title(&metadata).ok_or(OnAirError::NoStreamTitleField)?;
    *phase = ReadPhase::TitleParsed;
    Ok(TrackInfo::from_stream_title(value, default_artist))
}

/// Diagnostic report of a stream's ICY capabilities
#[derive(Debug, Clone, Serialize)]
pub struct IcyProbe {
    pub stream_url: String,
    pub icy_metadata_supported: bool,
    pub headers: IcyHeaders,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_metadata: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track: Option<TrackInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Read one frame from `connection` and describe what was found.
///
/// Frame-level failures end up in `IcyProbe::error` instead of failing.
pub fn probe_connection<R: Read>(
    stream_url: &str,
    connection: IcyConnection<R>,
    default_artist: &str,
) -> IcyProbe {
    let mut connection = connection;
    let headers = connection.headers().clone();
    let mut report = IcyProbe {
        stream_url: stream_url.to_string(),
        icy_metadata_supported: headers.metadata_supported(),
        headers,
        raw_metadata: None,
        stream_title: None,
        track: None,
        error: None,
    };

    match connection.read_metadata_frame() {
        Ok(metadata) => {
            if let Some(value) = parse_stream_title(&metadata) {
                report.stream_title = Some(value.to_string());
                report.track = Some(TrackInfo::from_stream_title(value, default_artist));
            } else {
                report.error = Some(OnAirError::NoStreamTitleField.to_string());
            }
            report.raw_metadata = Some(metadata);
        }
        Err(e) => report.error = Some(e.to_string()),
    }
    report
}

/// Reads the track currently on air from ICY streams.
///
/// Each call opens its own connection and never retries; fallback between
/// URLs is up to the caller.
pub struct IcyMetadataReader {
    client: Client,
    default_artist: String,
}

impl IcyMetadataReader {
    /// Create a reader. `timeout` bounds the connect and every body read.
    pub fn new(timeout: Duration, default_artist: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            default_artist: default_artist.into(),
        })
    }

    /// The HTTP client used for stream requests
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn default_artist(&self) -> &str {
        &self.default_artist
    }

    /// Open a stream with metadata negotiation.
    pub fn connect(&self, url: &str) -> Result<IcyConnection<Response>> {
        debug!(url, phase = %ReadPhase::Connecting, "Opening ICY stream");
        let response = self
            .client
            .get(url)
            .header(METADATA_REQUEST_HEADER, "1")
            .send()?;

        if !response.status().is_success() {
            return Err(OnAirError::Status(response.status().as_u16()));
        }

        let headers = IcyHeaders::from_header_map(response.headers());
        Ok(IcyConnection::new(headers, response))
    }

    /// Fetch the track currently on air at `url`.
    pub fn fetch_current_track(&self, url: &str) -> Result<TrackInfo> {
        let connection = self.connect(url).inspect_err(|e| {
            debug!(url, phase = %ReadPhase::Connecting, error = %e, "ICY connect failed");
        })?;
        read_current_track(connection, &self.default_artist)
    }

    /// Describe the ICY capabilities of the stream at `url`.
    pub fn probe(&self, url: &str) -> Result<IcyProbe> {
        let connection = self.connect(url)?;
        Ok(probe_connection(url, connection, &self.default_artist))
    }
}
