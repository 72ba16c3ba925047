//! YouTube caption source backed by yt-dlp.

use super::{CaptionFormat, CaptionLocator, CaptionPayload, CaptionSource, CaptionTrack};
use crate::error::{MimicError, Result};
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Subset of the `yt-dlp --dump-json` document we read.
#[derive(Debug, Default, Deserialize)]
struct VideoInfo {
    id: Option<String>,
    title: Option<String>,
    #[serde(default)]
    subtitles: Option<BTreeMap<String, Vec<SubtitleEntry>>>,
    #[serde(default)]
    automatic_captions: Option<BTreeMap<String, Vec<SubtitleEntry>>>,
}

#[derive(Debug, Deserialize)]
struct SubtitleEntry {
    ext: Option<String>,
    url: Option<String>,
}

/// One entry of a playlist or channel listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub id: String,
    pub title: Option<String>,
}

/// Caption source that asks yt-dlp for subtitle tracks.
pub struct YtDlpCaptionSource {
    video_id_regex: Regex,
    http: reqwest::Client,
}

impl YtDlpCaptionSource {
    pub fn new(fetch_timeout_seconds: u64) -> Self {
        // Matches various YouTube URL formats and bare video IDs
        let video_id_regex = Regex::new(
            r"(?x)
            (?:
                (?:https?://)?
                (?:www\.|m\.)?
                (?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/shorts/|youtube\.com/v/)
                ([a-zA-Z0-9_-]{11})
            )
            |
            ^([a-zA-Z0-9_-]{11})$
        ",
        )
        .expect("Invalid regex");

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(fetch_timeout_seconds))
            .build()
            .unwrap_or_default();

        Self { video_id_regex, http }
    }

    /// Extract video ID from a YouTube URL or bare ID.
    fn extract_video_id(&self, input: &str) -> Option<String> {
        let caps = self.video_id_regex.captures(input.trim())?;

        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().to_string())
    }

    /// Whether the input looks like a playlist or channel rather than one video.
    pub fn is_collection_url(input: &str) -> bool {
        input.contains("youtube.com/playlist")
            || input.contains("list=")
            || input.contains("youtube.com/channel")
            || input.contains("youtube.com/@")
    }

    /// List the videos of a playlist or channel.
    #[instrument(skip(self))]
    pub async fn list_entries(&self, url: &str, limit: Option<usize>) -> Result<Vec<PlaylistEntry>> {
        let limit_str = limit.map(|l| l.to_string()).unwrap_or_else(|| "50".to_string());

        let output = run_ytdlp(&[
            "--dump-json",
            "--no-download",
            "--no-warnings",
            "--flat-playlist",
            "--playlist-end",
            &limit_str,
            url,
        ])
        .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MimicError::CaptionSource(format!(
                "Failed to list videos: {}",
                stderr
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let entries = parse_playlist_lines(&stdout, |s| self.extract_video_id(s));

        info!("Found {} playlist entries", entries.len());
        Ok(entries)
    }
}

impl Default for YtDlpCaptionSource {
    fn default() -> Self {
        Self::new(10)
    }
}

async fn run_ytdlp(args: &[&str]) -> Result<std::process::Output> {
    tokio::process::Command::new("yt-dlp")
        .args(args)
        .output()
        .await
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                MimicError::ToolNotFound("yt-dlp".to_string())
            } else {
                MimicError::CaptionSource(format!("Failed to run yt-dlp: {}", e))
            }
        })
}

/// Convert one language map into tracks, keeping supported layouts in listed order.
fn collect_tracks(map: BTreeMap<String, Vec<SubtitleEntry>>) -> BTreeMap<String, Vec<CaptionTrack>> {
    map.into_iter()
        .filter(|(lang, _)| lang != "live_chat")
        .filter_map(|(lang, entries)| {
            let tracks: Vec<CaptionTrack> = entries
                .into_iter()
                .filter_map(|entry| {
                    let format = CaptionFormat::from_extension(entry.ext.as_deref().unwrap_or("srt"))?;
                    let url = url::Url::parse(entry.url.as_deref()?).ok()?;
                    Some(CaptionTrack {
                        format,
                        locator: CaptionLocator::Url(url),
                    })
                })
                .collect();
            (!tracks.is_empty()).then_some((lang, tracks))
        })
        .collect()
}

/// Build a payload from yt-dlp metadata.
///
/// Manual subtitles are used when they offer any supported track; otherwise
/// the automatic captions are used.
fn payload_from_info(video_id: &str, info: VideoInfo) -> CaptionPayload {
    let manual = collect_tracks(info.subtitles.unwrap_or_default());
    let tracks = if manual.is_empty() {
        collect_tracks(info.automatic_captions.unwrap_or_default())
    } else {
        manual
    };

    CaptionPayload {
        id: info.id.unwrap_or_else(|| video_id.to_string()),
        title: info.title,
        tracks,
    }
}

fn parse_playlist_lines(
    stdout: &str,
    extract_id: impl Fn(&str) -> Option<String>,
) -> Vec<PlaylistEntry> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| serde_json::from_str::<serde_json::Value>(line).ok())
        .filter_map(|json| {
            let id = json["id"]
                .as_str()
                .or_else(|| json["url"].as_str())
                .map(|s| extract_id(s).unwrap_or_else(|| s.to_string()))?;
            Some(PlaylistEntry {
                id,
                title: json["title"].as_str().map(|s| s.to_string()),
            })
        })
        .collect()
}

#[async_trait]
impl CaptionSource for YtDlpCaptionSource {
    #[instrument(skip(self))]
    async fn fetch_captions(&self, id: &str) -> Result<CaptionPayload> {
        let video_id = self.extract_video_id(id).ok_or_else(|| {
            MimicError::InvalidInput(format!("Invalid YouTube video ID or URL: {}", id))
        })?;
        let url = format!("https://www.youtube.com/watch?v={}", video_id);

        let output = run_ytdlp(&[
            "--dump-json",
            "--skip-download",
            "--no-playlist",
            "--no-warnings",
            &url,
        ])
        .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MimicError::NoSuchContent(format!(
                "{} ({})",
                video_id,
                stderr.trim()
            )));
        }

        let info: VideoInfo = serde_json::from_slice(&output.stdout).map_err(|e| {
            MimicError::CaptionSource(format!("Failed to parse yt-dlp output: {}", e))
        })?;

        let payload = payload_from_info(&video_id, info);
        debug!("{} caption languages available for {}", payload.tracks.len(), video_id);
        Ok(payload)
    }

    #[instrument(skip(self, locator))]
    async fn fetch_body(&self, locator: &CaptionLocator) -> Result<String> {
        let url = match locator {
            CaptionLocator::Inline(body) => return Ok(body.clone()),
            CaptionLocator::Url(url) => url,
        };

        let response = self.http.get(url.clone()).send().await?;
        if !response.status().is_success() {
            warn!("Caption download returned {}", response.status());
            return Err(MimicError::CaptionSource(format!(
                "Caption download failed with status {}",
                response.status()
            )));
        }

        Ok(response.text().await?)
    }

    fn can_handle(&self, input: &str) -> bool {
        self.extract_video_id(input).is_some() || Self::is_collection_url(input)
    }

    fn extract_id(&self, input: &str) -> Option<String> {
        self.extract_video_id(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_video_id() {
        let source = YtDlpCaptionSource::default();

        assert_eq!(
            source.extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            source.extract_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            source.extract_video_id("https://youtube.com/shorts/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            source.extract_video_id("dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );

        assert_eq!(source.extract_video_id("not-a-video-id"), None);
        assert_eq!(source.extract_video_id(""), None);
    }

    #[test]
    fn test_can_handle() {
        let source = YtDlpCaptionSource::default();

        assert!(source.can_handle("dQw4w9WgXcQ"));
        assert!(source.can_handle("https://youtube.com/playlist?list=PLtest"));
        assert!(!source.can_handle("/path/to/captions.srt"));
    }

    #[test]
    fn test_payload_prefers_manual_subtitles() {
        let info: VideoInfo = serde_json::from_str(
            r#"{
                "id": "dQw4w9WgXcQ",
                "title": "Talk",
                "subtitles": {
                    "en": [
                        {"ext": "vtt", "url": "https://example.com/en.vtt"},
                        {"ext": "json3", "url": "https://example.com/en.json3"},
                        {"ext": "srt", "url": "https://example.com/en.srt"}
                    ]
                },
                "automatic_captions": {
                    "de": [{"ext": "json3", "url": "https://example.com/de.json3"}]
                }
            }"#,
        )
        .unwrap();

        let payload = payload_from_info("dQw4w9WgXcQ", info);
        assert_eq!(payload.title.as_deref(), Some("Talk"));
        assert_eq!(payload.tracks.len(), 1);

        let en = &payload.tracks["en"];
        assert_eq!(en.len(), 2);
        assert_eq!(en[0].format, CaptionFormat::SegmentTimed);
        assert_eq!(en[1].format, CaptionFormat::LineTimed);
    }

    #[test]
    fn test_payload_falls_back_to_automatic_captions() {
        let info: VideoInfo = serde_json::from_str(
            r#"{
                "id": "abc",
                "subtitles": {
                    "live_chat": [{"ext": "json", "url": "https://example.com/chat"}],
                    "en": [{"ext": "vtt", "url": null}]
                },
                "automatic_captions": {
                    "en": [{"ext": "srv1", "url": "https://example.com/a"}, {"ext": "srt", "url": "https://example.com/b"}]
                }
            }"#,
        )
        .unwrap();

        let payload = payload_from_info("abc", info);
        assert_eq!(payload.tracks["en"].len(), 1);
        assert_eq!(payload.tracks["en"][0].format, CaptionFormat::LineTimed);
    }

    #[test]
    fn test_payload_without_captions_is_empty() {
        let info: VideoInfo = serde_json::from_str(r#"{"id": "abc", "subtitles": null}"#).unwrap();
        assert!(payload_from_info("abc", info).tracks.is_empty());
    }

    #[test]
    fn test_parse_playlist_lines() {
        let stdout = concat!(
            r#"{"id": "dQw4w9WgXcQ", "title": "One"}"#,
            "\n\n",
            r#"{"url": "https://www.youtube.com/watch?v=aaaaaaaaaaa"}"#,
            "\nnot json\n"
        );
        let source = YtDlpCaptionSource::default();
        let entries = parse_playlist_lines(stdout, |s| source.extract_video_id(s));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title.as_deref(), Some("One"));
        assert_eq!(entries[1].id, "aaaaaaaaaaa");
    }
}
