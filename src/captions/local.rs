//! Local caption file source.
//!
//! Reads `.srt`, `.json3` and `.json` caption files from disk. A language
//! suffix in the file name (`talk.en.srt`) becomes the track language.

use super::{CaptionFormat, CaptionPayload, CaptionSource, CaptionTrack};
use crate::error::{MimicError, Result};
use async_trait::async_trait;
use std::path::Path;

/// Language recorded when the file name carries none.
const UNDETERMINED_LANGUAGE: &str = "und";

/// Caption source for files on the local filesystem.
pub struct LocalCaptionSource;

impl LocalCaptionSource {
    pub fn new() -> Self {
        Self
    }

    fn caption_format(path: &Path) -> Option<CaptionFormat> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(CaptionFormat::from_extension)
    }

    /// Split `talk.en.srt` into (`talk`, `en`).
    fn title_and_language(path: &Path) -> (String, String) {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("captions");

        match stem.rsplit_once('.') {
            Some((title, lang))
                if !title.is_empty()
                    && (2..=8).contains(&lang.len())
                    && lang.chars().all(|c| c.is_ascii_alphabetic() || c == '-') =>
            {
                (title.to_string(), lang.to_string())
            }
            _ => (stem.to_string(), UNDETERMINED_LANGUAGE.to_string()),
        }
    }
}

impl Default for LocalCaptionSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CaptionSource for LocalCaptionSource {
    async fn fetch_captions(&self, id: &str) -> Result<CaptionPayload> {
        let path = Path::new(id);

        if !path.is_file() {
            return Err(MimicError::NoSuchContent(format!("File not found: {}", id)));
        }

        let format = Self::caption_format(path).ok_or_else(|| {
            MimicError::InvalidInput(format!("Not a recognized caption file: {}", id))
        })?;

        let body = tokio::fs::read_to_string(path).await?;
        let (title, language) = Self::title_and_language(path);

        Ok(CaptionPayload::new(id)
            .with_title(title)
            .with_track(language, CaptionTrack::inline(format, body)))
    }

    fn can_handle(&self, input: &str) -> bool {
        let path = Path::new(input);
        path.is_file() && Self::caption_format(path).is_some()
    }

    fn extract_id(&self, input: &str) -> Option<String> {
        self.can_handle(input).then(|| input.to_string())
    }
}
