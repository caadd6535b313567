use url::Url;

/// Length of a standard YouTube video identifier
const VIDEO_ID_LEN: usize = 11;

/// Host markers that identify a YouTube URL in free-form input
const HOST_MARKERS: &[&str] = &["youtube.com", "youtu.be"];

/// An immutable reference to a video, derived from a raw URL or a bare ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRef(String);

impl VideoRef {
    /// Derive a video reference from user input.
    ///
    /// Recognized URL forms (`watch?v=`, `youtu.be/`, `/embed/`, `/shorts/`,
    /// `/v/`) yield the embedded 11-character ID; a bare ID token is taken
    /// as-is. Anything else passes through unchanged so that a downstream
    /// source can still reject it with a diagnosable error.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();

        if let Some(id) = extract_id_from_url(trimmed) {
            return Self(id);
        }

        Self(trimmed.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical watch URL for this video, used by tool-based sources
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl std::fmt::Display for VideoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Check whether raw input looks like something we can fetch a transcript
/// for: a URL containing a YouTube host marker, or a bare 11-character ID.
/// Performs no network activity.
pub fn validate_input(input: &str) -> bool {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return false;
    }

    let lower = trimmed.to_lowercase();
    if HOST_MARKERS.iter().any(|marker| lower.contains(marker)) {
        return true;
    }

    is_video_id(trimmed)
}

/// Bare video IDs are exactly 11 characters of `[A-Za-z0-9_-]`
fn is_video_id(token: &str) -> bool {
    token.len() == VIDEO_ID_LEN
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn extract_id_from_url(input: &str) -> Option<String> {
    let parsed = Url::parse(input).ok()?;
    let host = parsed.host_str()?.to_lowercase();

    let candidate = if host.ends_with("youtu.be") {
        // Short links carry the ID as the first path segment
        parsed.path_segments()?.next().map(|s| s.to_string())
    } else if host.ends_with("youtube.com") {
        parsed
            .query_pairs()
            .find(|(k, _)| k == "v")
            .map(|(_, v)| v.to_string())
            .or_else(|| {
                // /embed/<id>, /shorts/<id>, /v/<id>
                let segments: Vec<_> = parsed.path_segments()?.collect();
                match segments.as_slice() {
                    [prefix, id, ..] if matches!(*prefix, "embed" | "shorts" | "v") => {
                        Some(id.to_string())
                    }
                    _ => None,
                }
            })
    } else {
        None
    };

    candidate.filter(|id| is_video_id(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_host_markers() {
        assert!(validate_input("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(validate_input("https://youtu.be/dQw4w9WgXcQ"));
        assert!(validate_input("https://m.youtube.com/watch?v=dQw4w9WgXcQ"));
    }

    #[test]
    fn test_validate_accepts_bare_id() {
        assert!(validate_input("dQw4w9WgXcQ"));
        assert!(validate_input("abcdEFGH123"));
        assert!(validate_input("a-b_c1D2e3F"));
    }

    #[test]
    fn test_validate_rejects_malformed() {
        assert!(!validate_input(""));
        assert!(!validate_input("   "));
        assert!(!validate_input("not a video"));
        assert!(!validate_input("https://vimeo.com/12345"));
        assert!(!validate_input("tooshort"));
        assert!(!validate_input("way-too-long-to-be-an-id"));
        assert!(!validate_input("bad!chars!!"));
    }

    #[test]
    fn test_parse_watch_url() {
        assert_eq!(
            VideoRef::parse("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42").as_str(),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_parse_short_link() {
        assert_eq!(
            VideoRef::parse("https://youtu.be/abcdEFGH123").as_str(),
            "abcdEFGH123"
        );
    }

    #[test]
    fn test_parse_embed_and_shorts() {
        assert_eq!(
            VideoRef::parse("https://www.youtube.com/embed/dQw4w9WgXcQ").as_str(),
            "dQw4w9WgXcQ"
        );
        assert_eq!(
            VideoRef::parse("https://www.youtube.com/shorts/dQw4w9WgXcQ").as_str(),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_parse_bare_id_passes_through() {
        assert_eq!(VideoRef::parse("dQw4w9WgXcQ").as_str(), "dQw4w9WgXcQ");
        assert_eq!(VideoRef::parse("  dQw4w9WgXcQ  ").as_str(), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_watch_url() {
        let video = VideoRef::parse("dQw4w9WgXcQ");
        assert_eq!(
            video.watch_url(),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
    }
}
