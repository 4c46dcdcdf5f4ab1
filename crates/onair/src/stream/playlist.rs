//! Playlist resolution (PLS/M3U)
//!
//! Stations often publish a playlist rather than the stream itself. The
//! first stream entry is followed until a non-playlist URL is reached.

use reqwest::blocking::Client;
use tracing::debug;

use crate::config::network::MAX_PLAYLIST_DEPTH;
use crate::error::{OnAirError, Result};

/// Result of checking a URL's playlist type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistCheck {
    Pls,
    M3u,
    NotPlaylist,
}

/// Check what type of playlist a URL points to based on extension
pub fn check_playlist_type(url: &str) -> PlaylistCheck {
    let lower = url.to_lowercase();
    if lower.ends_with(".pls") || lower.contains(".pls?") {
        PlaylistCheck::Pls
    } else if lower.ends_with(".m3u") || lower.contains(".m3u?") {
        PlaylistCheck::M3u
    } else {
        PlaylistCheck::NotPlaylist
    }
}

/// Directory part of a URL, used to resolve relative entries
pub fn get_base_url(url: &str) -> &str {
    url.rsplit_once('/').map(|(base, _)| base).unwrap_or("")
}

fn is_absolute(uri: &str) -> bool {
    uri.starts_with("http://") || uri.starts_with("https://")
}

/// Parse a PLS playlist and return the first stream URL
pub fn parse_pls(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let (key, value) = line.trim().split_once('=')?;
        let value = value.trim();
        (key.to_lowercase().starts_with("file") && is_absolute(value)).then(|| value.to_string())
    })
}

/// Parse an M3U playlist and return the first stream URL
pub fn parse_m3u(content: &str, base_url: &str) -> Option<String> {
    content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| {
            if is_absolute(line) || base_url.is_empty() {
                line.to_string()
            } else {
                format!("{base_url}/{line}")
            }
        })
}

/// Resolve a playlist URL to its final stream URL.
///
/// Non-playlist URLs pass through unchanged. Playlists are fetched and
/// followed up to `MAX_PLAYLIST_DEPTH` levels.
pub fn resolve_playlist_url(client: &Client, url: &str) -> Result<String> {
    let mut current = url.to_string();
    for _ in 0..MAX_PLAYLIST_DEPTH {
        let next = match check_playlist_type(&current) {
            PlaylistCheck::NotPlaylist => return Ok(current),
            PlaylistCheck::Pls => parse_pls(&fetch_playlist(client, &current)?),
            PlaylistCheck::M3u => {
                parse_m3u(&fetch_playlist(client, &current)?, get_base_url(&current))
            }
        };
        let next = next.ok_or_else(|| {
            OnAirError::Playlist(format!("No stream URL found in {current}"))
        })?;
        debug!(playlist = %current, stream = %next, "Resolved playlist entry");
        current = next;
    }
    Err(OnAirError::Playlist("Playlist nesting too deep".to_string()))
}

fn fetch_playlist(client: &Client, url: &str) -> Result<String> {
    let response = client.get(url).send()?;
    if !response.status().is_success() {
        return Err(OnAirError::Status(response.status().as_u16()));
    }
    Ok(response.text()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- check_playlist_type ---

    #[test]
    fn check_m3u_extension() {
        assert_eq!(
            check_playlist_type("https://myradio24.org/54137.m3u"),
            PlaylistCheck::M3u
        );
    }

    #[test]
    fn check_m3u_with_query() {
        assert_eq!(
            check_playlist_type("http://example.com/stream.m3u?id=5"),
            PlaylistCheck::M3u
        );
    }

    #[test]
    fn check_pls_case_insensitive() {
        assert_eq!(
            check_playlist_type("http://example.com/stream.PLS"),
            PlaylistCheck::Pls
        );
    }

    #[test]
    fn check_direct_stream() {
        assert_eq!(
            check_playlist_type("https://myradio24.org/54137"),
            PlaylistCheck::NotPlaylist
        );
        assert_eq!(
            check_playlist_type("http://example.com/live.m3u8"),
            PlaylistCheck::NotPlaylist
        );
    }

    // --- get_base_url ---

    #[test]
    fn base_url_of_playlist() {
        assert_eq!(
            get_base_url("https://myradio24.org/54137.m3u"),
            "https://myradio24.org"
        );
        assert_eq!(get_base_url("nopath"), "");
    }

    // --- parse_pls ---

    #[test]
    fn parse_pls_standard() {
        let content = "[playlist]\nNumberOfEntries=1\nFile1=http://stream.example.com:8000/live\nTitle1=Test Radio\n";
        assert_eq!(
            parse_pls(content),
            Some("http://stream.example.com:8000/live".to_string())
        );
    }

    #[test]
    fn parse_pls_keeps_query_string() {
        let content = "[playlist]\nFile1=http://stream.example.com/live?sid=1&type=mp3\n";
        assert_eq!(
            parse_pls(content),
            Some("http://stream.example.com/live?sid=1&type=mp3".to_string())
        );
    }

    #[test]
    fn parse_pls_no_http_url() {
        assert_eq!(parse_pls("[playlist]\nFile1=/local/path\n"), None);
    }

    // --- parse_m3u ---

    #[test]
    fn parse_m3u_first_entry() {
        let content = "#EXTM3U\n#EXTINF:-1,Radio\nhttps://myradio24.org/54137\nhttps://backup/54137\n";
        assert_eq!(
            parse_m3u(content, "https://myradio24.org"),
            Some("https://myradio24.org/54137".to_string())
        );
    }

    #[test]
    fn parse_m3u_relative_entry() {
        assert_eq!(
            parse_m3u("live.mp3\n", "http://example.com/radio"),
            Some("http://example.com/radio/live.mp3".to_string())
        );
    }

    #[test]
    fn parse_m3u_windows_line_endings() {
        assert_eq!(
            parse_m3u("#EXTM3U\r\nhttp://stream/live\r\n", ""),
            Some("http://stream/live".to_string())
        );
    }

    #[test]
    fn parse_m3u_comments_only() {
        assert_eq!(parse_m3u("#EXTM3U\n# nothing here\n\n", "http://base"), None);
    }

    // --- resolve_playlist_url ---

    #[test]
    fn resolve_direct_url_without_fetching() {
        let client = Client::new();
        assert_eq!(
            resolve_playlist_url(&client, "http://invalid.invalid.invalid/stream").unwrap(),
            "http://invalid.invalid.invalid/stream"
        );
    }

    #[test]
    fn resolve_unreachable_playlist_fails() {
        let client = Client::new();
        assert!(resolve_playlist_url(&client, "http://invalid.invalid.invalid/a.m3u").is_err());
    }
}
