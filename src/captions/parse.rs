//! Caption body parsers for the two supported layouts.

use serde_json::Value;
use tracing::warn;

/// Fields a segment may carry its text under, in lookup order.
const SEGMENT_TEXT_FIELDS: [&str; 2] = ["text", "utf8"];

/// Events of a segment-timed document: either a bare event list or an
/// object wrapping the list under `events`.
fn caption_events(document: &Value) -> &[Value] {
    match document {
        Value::Array(events) => events,
        Value::Object(map) => map
            .get("events")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default(),
        _ => &[],
    }
}

fn segment_text(segment: &Value) -> Option<&str> {
    SEGMENT_TEXT_FIELDS
        .iter()
        .find_map(|field| segment.get(field)?.as_str())
}

/// Flatten segment-timed captions into plain text.
///
/// Every segment of every event is trimmed, empty segments are dropped and the
/// rest are joined with single spaces. Events or segments of an unexpected
/// shape are skipped. A body that is not valid JSON yields an empty string.
pub fn parse_segment_timed(body: &str) -> String {
    let document: Value = match serde_json::from_str(body) {
        Ok(doc) => doc,
        Err(e) => {
            warn!("Unreadable segment-timed captions: {}", e);
            return String::new();
        }
    };

    caption_events(&document)
        .iter()
        .filter_map(|event| event.get("segs")?.as_array())
        .flatten()
        .filter_map(segment_text)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Flatten line-timed (SubRip style) captions into plain text.
///
/// Blocks are separated by a blank line. The first two lines of a block (cue
/// index and timing) are dropped unless the block has two lines or fewer.
/// Purely numeric lines are dropped as well.
pub fn parse_line_timed(body: &str) -> String {
    let body = body.replace("\r\n", "\n");

    body.trim()
        .split("\n\n")
        .flat_map(|block| {
            let lines: Vec<&str> = block.trim().split('\n').collect();
            let skip = if lines.len() > 2 { 2 } else { 0 };
            lines.into_iter().skip(skip)
        })
        .map(str::trim)
        .filter(|line| !line.is_empty() && !is_numeric(line))
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_numeric(line: &str) -> bool {
    line.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_timed_event_list() {
        let body = r#"[{"segs":[{"text":"hello"},{"text":"world"}]}]"#;
        assert_eq!(parse_segment_timed(body), "hello world");
    }

    #[test]
    fn test_segment_timed_events_document() {
        let body = r#"{
            "wireMagic": "pb3",
            "events": [
                {"tStartMs": 0, "dDurationMs": 1000, "segs": [{"utf8": "  so "}, {"utf8": "today"}]},
                {"tStartMs": 1000, "aAppend": 1, "segs": [{"utf8": "\n"}]},
                {"tStartMs": 1200},
                {"tStartMs": 1500, "segs": [{"utf8": "we talk"}]}
            ]
        }"#;
        assert_eq!(parse_segment_timed(body), "so today we talk");
    }

    #[test]
    fn test_segment_timed_skips_empty_segments() {
        let body = r#"[{"segs":[{"text":""},{"text":"  "},{}]},{"segs":[{"text":"x"}]}]"#;
        assert_eq!(parse_segment_timed(body), "x");
    }

    #[test]
    fn test_segment_timed_skips_odd_items() {
        let body = r#"[
            "stray",
            {"segs": [{"text": "kept", "utf8": "ignored"}, 7, {"utf8": "also"}]},
            {"segs": "not a list"},
            {"segs": [{"text": 3}, {"text": "kept too"}]}
        ]"#;
        assert_eq!(parse_segment_timed(body), "kept also kept too");
    }

    #[test]
    fn test_segment_timed_malformed_is_empty() {
        assert_eq!(parse_segment_timed("not json"), "");
        assert_eq!(parse_segment_timed("[]"), "");
    }

    #[test]
    fn test_line_timed_two_blocks() {
        let body = "1\n00:00:00,000 --> 00:00:01,000\nHello there\n\n2\n00:00:01,000 --> 00:00:02,000\nGeneral Kenobi";
        assert_eq!(parse_line_timed(body), "Hello there General Kenobi");
    }

    #[test]
    fn test_line_timed_crlf_and_multiline_cues() {
        let body = "1\r\n00:00:00,000 --> 00:00:01,000\r\n first line \r\nsecond line\r\n\r\n2\r\n00:00:01,000 --> 00:00:02,000\r\n42\r\nthird\r\n";
        assert_eq!(parse_line_timed(body), "first line second line third");
    }

    #[test]
    fn test_line_timed_short_block_kept_whole() {
        // Short blocks keep their lines; numeric ones are still dropped.
        assert_eq!(parse_line_timed("7\nstray text"), "stray text");
        assert_eq!(parse_line_timed("only line"), "only line");
    }

    #[test]
    fn test_line_timed_empty() {
        assert_eq!(parse_line_timed(""), "");
        assert_eq!(parse_line_timed("\n\n\n"), "");
    }
}
