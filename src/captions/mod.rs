//! Caption ingestion and normalization.
//!
//! A [`CaptionSource`] yields a [`CaptionPayload`] for a content identifier:
//! a map from language code to one or more caption tracks. The normalizer
//! picks one track by language preference and flattens it into plain text.
//!
//! The caption layout is decided once, when the payload is built, and carried
//! as a [`CaptionFormat`] tag from then on.

mod local;
mod parse;
mod youtube;

pub use local::LocalCaptionSource;
pub use parse::{parse_line_timed, parse_segment_timed};
pub use youtube::{PlaylistEntry, YtDlpCaptionSource};

use crate::error::{MimicError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tracing::debug;

/// Layout of a caption body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionFormat {
    /// JSON caption events, each carrying a list of text segments.
    SegmentTimed,
    /// Blank-line separated blocks of index, timing line and text.
    LineTimed,
}

impl CaptionFormat {
    /// Map a subtitle file extension to a supported layout.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json3" | "json" => Some(CaptionFormat::SegmentTimed),
            "srt" => Some(CaptionFormat::LineTimed),
            _ => None,
        }
    }
}

/// Where a caption body lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptionLocator {
    /// Body must be downloaded from this URL.
    Url(url::Url),
    /// Body is already available.
    Inline(String),
}

/// One caption representation for a language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionTrack {
    pub format: CaptionFormat,
    pub locator: CaptionLocator,
}

impl CaptionTrack {
    /// Create a track whose body is already in memory.
    pub fn inline(format: CaptionFormat, body: impl Into<String>) -> Self {
        Self {
            format,
            locator: CaptionLocator::Inline(body.into()),
        }
    }
}

/// Caption data for one content item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionPayload {
    /// Content identifier.
    pub id: String,
    /// Human-readable title, when the source knows one.
    pub title: Option<String>,
    /// Language code to tracks, in the order the source listed them.
    pub tracks: BTreeMap<String, Vec<CaptionTrack>>,
}

impl CaptionPayload {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            tracks: BTreeMap::new(),
        }
    }

    /// Append a track for `language`.
    pub fn with_track(mut self, language: impl Into<String>, track: CaptionTrack) -> Self {
        self.tracks.entry(language.into()).or_default().push(track);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Name to record as the source of chunks cut from this payload.
    pub fn source_name(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }
}

/// Flattened transcript text for one content item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTranscript {
    pub id: String,
    pub title: Option<String>,
    pub language: String,
    pub text: String,
}

impl NormalizedTranscript {
    pub fn source_name(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }
}

/// External provider of caption payloads.
#[async_trait]
pub trait CaptionSource: Send + Sync {
    /// Fetch all caption tracks for a content identifier.
    async fn fetch_captions(&self, id: &str) -> Result<CaptionPayload>;

    /// Resolve a track body.
    async fn fetch_body(&self, locator: &CaptionLocator) -> Result<String> {
        match locator {
            CaptionLocator::Inline(body) => Ok(body.clone()),
            CaptionLocator::Url(url) => Err(MimicError::CaptionSource(format!(
                "this source cannot download {}",
                url
            ))),
        }
    }

    /// Check if this source can handle the given input.
    fn can_handle(&self, input: &str) -> bool;

    /// Extract the content identifier from input (URL, path, etc.).
    fn extract_id(&self, input: &str) -> Option<String>;
}

/// Pick the caption track to use for a payload.
///
/// The first preferred language present wins. Otherwise the lexicographically
/// smallest language is used. Within a language the first listed track is taken.
pub fn select_track<'a>(
    payload: &'a CaptionPayload,
    preferred: &[String],
) -> Result<(&'a str, &'a CaptionTrack)> {
    let available = |lang: &str| {
        payload
            .tracks
            .get_key_value(lang)
            .and_then(|(key, tracks)| tracks.first().map(|track| (key.as_str(), track)))
    };

    let chosen = preferred
        .iter()
        .find_map(|lang| available(lang))
        .or_else(|| {
            payload
                .tracks
                .iter()
                .find_map(|(lang, tracks)| tracks.first().map(|track| (lang.as_str(), track)))
        });

    chosen.ok_or_else(|| MimicError::NoCaptionsAvailable(payload.id.clone()))
}

/// Flatten a caption body according to its layout.
pub fn normalize_body(format: CaptionFormat, body: &str) -> String {
    match format {
        CaptionFormat::SegmentTimed => parse_segment_timed(body),
        CaptionFormat::LineTimed => parse_line_timed(body),
    }
}

/// Normalize a payload whose tracks are already inline.
///
/// An empty string is a valid result and means the captions carried no text.
pub fn normalize(payload: &CaptionPayload, preferred: &[String]) -> Result<String> {
    let (language, track) = select_track(payload, preferred)?;
    match &track.locator {
        CaptionLocator::Inline(body) => Ok(normalize_body(track.format, body)),
        CaptionLocator::Url(url) => Err(MimicError::CaptionSource(format!(
            "{} captions for '{}' have not been downloaded ({})",
            language, payload.id, url
        ))),
    }
}

/// Fetch captions for `id` from `source` and flatten them into plain text.
pub async fn fetch_transcript(
    source: &dyn CaptionSource,
    id: &str,
    preferred: &[String],
) -> Result<NormalizedTranscript> {
    let payload = source.fetch_captions(id).await?;
    let (language, track) = select_track(&payload, preferred)?;
    debug!("Selected {} captions ({:?}) for {}", language, track.format, payload.id);

    let body = source.fetch_body(&track.locator).await?;
    let text = normalize_body(track.format, &body);

    Ok(NormalizedTranscript {
        id: payload.id.clone(),
        title: payload.title.clone(),
        language: language.to_string(),
        text,
    })
}

/// Detect the appropriate caption source for the given input.
pub fn detect_source(input: &str, fetch_timeout_seconds: u64) -> Option<Box<dyn CaptionSource>> {
    let local = LocalCaptionSource::new();
    if local.can_handle(input) {
        return Some(Box::new(local));
    }

    let youtube = YtDlpCaptionSource::new(fetch_timeout_seconds);
    if youtube.can_handle(input) {
        return Some(Box::new(youtube));
    }

    None
}

/// Parse input and return the appropriate source and content identifier.
pub fn parse_input(input: &str, fetch_timeout_seconds: u64) -> Option<(Box<dyn CaptionSource>, String)> {
    let source = detect_source(input, fetch_timeout_seconds)?;
    let id = source.extract_id(input)?;
    Some((source, id))
}
