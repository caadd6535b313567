use serde::Deserialize;

use crate::Result;

/// One normalized piece of caption text, in source order
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptFragment {
    pub text: String,

    /// Start offset in milliseconds, when the payload provides one.
    /// Carried for diagnostics only; joining ignores it.
    pub start_ms: Option<u64>,
}

/// Subtitle document in the json3 event format.
///
/// Two schema variants exist in the wild: events carrying a `segs` array
/// whose segments use a `utf8` text key, and events carrying a `payload`
/// array whose segments use a `text` key. Both are supported; anything
/// else in an event is ignored.
#[derive(Debug, Default, Deserialize)]
struct SubtitleDoc {
    #[serde(default)]
    events: Vec<SubtitleEvent>,
}

#[derive(Debug, Default, Deserialize)]
struct SubtitleEvent {
    #[serde(default, rename = "tStartMs")]
    start_ms: Option<u64>,

    #[serde(default)]
    segs: Option<Vec<Utf8Segment>>,

    #[serde(default)]
    payload: Option<Vec<TextSegment>>,
}

#[derive(Debug, Default, Deserialize)]
struct Utf8Segment {
    #[serde(default)]
    utf8: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct TextSegment {
    #[serde(default)]
    text: Option<String>,
}

/// Parse a raw json3 subtitle payload into ordered fragments.
///
/// Produces one fragment per segment that carries its expected text key;
/// segments missing the key are skipped without error. An empty or
/// event-less document yields an empty sequence.
pub fn parse_events(raw: &str) -> Result<Vec<TranscriptFragment>> {
    let doc: SubtitleDoc = serde_json::from_str(raw)?;
    Ok(normalize(doc))
}

fn normalize(doc: SubtitleDoc) -> Vec<TranscriptFragment> {
    let mut fragments = Vec::new();

    for event in doc.events {
        if let Some(segs) = event.segs {
            for seg in segs {
                if let Some(text) = seg.utf8 {
                    fragments.push(TranscriptFragment {
                        text,
                        start_ms: event.start_ms,
                    });
                }
            }
        } else if let Some(payload) = event.payload {
            for seg in payload {
                if let Some(text) = seg.text {
                    fragments.push(TranscriptFragment {
                        text,
                        start_ms: event.start_ms,
                    });
                }
            }
        }
    }

    fragments
}

/// Join fragments into a single transcript string.
///
/// Fragments are joined with the configured delimiter and the result is
/// trimmed; callers treat a whitespace-only result as "no transcript".
pub fn join_fragments(fragments: &[TranscriptFragment], delimiter: &str) -> String {
    fragments
        .iter()
        .map(|f| f.text.as_str())
        .collect::<Vec<_>>()
        .join(delimiter)
        .trim()
        .to_string()
}
