//! Sliding-window splitting over word or character units.

use crate::error::{MimicError, Result};

/// Check window parameters: `window_size > 0` and `overlap < window_size`.
pub fn validate_window(window_size: usize, overlap: usize) -> Result<()> {
    if window_size == 0 || overlap >= window_size {
        return Err(MimicError::InvalidChunkParameters { window_size, overlap });
    }
    Ok(())
}

/// Start offsets of every window over `len` units.
///
/// Windows start at `0, step, 2*step, ...` with `step = window_size - overlap`
/// and stop once the offset reaches `len`.
fn window_starts(len: usize, window_size: usize, overlap: usize) -> impl Iterator<Item = usize> {
    (0..len).step_by(window_size - overlap)
}

/// Split `text` into windows of at most `window_size` whitespace-delimited words.
///
/// Consecutive windows share exactly `overlap` words. Words inside a window are
/// joined by single spaces. Empty or whitespace-only text yields no windows.
pub fn split_words(text: &str, window_size: usize, overlap: usize) -> Result<Vec<String>> {
    validate_window(window_size, overlap)?;

    let words: Vec<&str> = text.split_whitespace().collect();
    let chunks = window_starts(words.len(), window_size, overlap)
        .map(|start| {
            let end = (start + window_size).min(words.len());
            words[start..end].join(" ")
        })
        .collect();

    Ok(chunks)
}

/// Split `text` into windows of at most `window_size` characters.
///
/// Windows are measured in Unicode scalar values, so multi-byte text is never
/// cut inside a character.
pub fn split_chars(text: &str, window_size: usize, overlap: usize) -> Result<Vec<String>> {
    validate_window(window_size, overlap)?;

    let chars: Vec<char> = text.chars().collect();
    let chunks = window_starts(chars.len(), window_size, overlap)
        .map(|start| {
            let end = (start + window_size).min(chars.len());
            chars[start..end].iter().collect()
        })
        .collect();

    Ok(chunks)
}
