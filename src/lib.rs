pub mod config;
pub mod error;
pub mod fallback;
pub mod gemini;
pub mod notes;
pub mod output;
pub mod summarize;
pub mod web;
pub mod youtube;

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub use error::{Error, GenerateError, ModelFailure, Unavailable};
pub use notes::{Notes, Summary, generate_notes};

/// Patterns tried in order; the first capture wins
static VIDEO_ID_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"v=([0-9A-Za-z_-]{11})").expect("valid regex"),
        Regex::new(r"youtu\.be/([0-9A-Za-z_-]{11})").expect("valid regex"),
        Regex::new(r"/embed/([0-9A-Za-z_-]{11})").expect("valid regex"),
    ]
});

/// An 11-character YouTube video identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn thumbnail_url(&self) -> String {
        format!("https://img.youtube.com/vi/{}/0.jpg", self.0)
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single caption snippet. Timing is not kept.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Segment {
    pub text: String,
}

impl Segment {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Complete transcript for a video, flattened to one string
#[derive(Debug, Clone, Serialize)]
pub struct Transcript {
    video_id: VideoId,
    text: String,
}

impl Transcript {
    /// Join segment texts in order with a single space, trimming the ends
    pub fn from_texts<I, S>(video_id: VideoId, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut text = String::new();
        for t in texts {
            text.push(' ');
            text.push_str(t.as_ref());
        }
        Self {
            video_id,
            text: text.trim().to_string(),
        }
    }

    pub fn video_id(&self) -> &VideoId {
        &self.video_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Extract the video ID from a `watch?v=`, `youtu.be/` or `/embed/` URL
pub fn extract_video_id(input: &str) -> Result<VideoId, Error> {
    VIDEO_ID_PATTERNS
        .iter()
        .find_map(|re| re.captures(input))
        .map(|caps| VideoId(caps[1].to_string()))
        .ok_or_else(|| Error::InvalidUrl(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(input: &str) -> Option<String> {
        extract_video_id(input).ok().map(|v| v.as_str().to_string())
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(
            id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_watch_url_with_extra_params() {
        assert_eq!(
            id("https://www.youtube.com/watch?v=cE72C0e0bKw&t=5s"),
            Some("cE72C0e0bKw".to_string())
        );
    }

    #[test]
    fn test_watch_url_v_not_first() {
        assert_eq!(
            id("https://www.youtube.com/watch?feature=share&v=9bZkp7q19f0"),
            Some("9bZkp7q19f0".to_string())
        );
    }

    #[test]
    fn test_short_url() {
        assert_eq!(id("https://youtu.be/dQw4w9WgXcQ"), Some("dQw4w9WgXcQ".to_string()));
    }

    #[test]
    fn test_short_url_with_query() {
        assert_eq!(
            id("https://youtu.be/dQw4w9WgXcQ?si=abcdef"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_embed_url() {
        assert_eq!(
            id("https://www.youtube.com/embed/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_too_short_id() {
        assert!(matches!(
            extract_video_id("https://www.youtube.com/watch?v=short"),
            Err(Error::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_no_pattern() {
        let err = extract_video_id("https://www.youtube.com/channel/UCabc").unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(ref u) if u == "https://www.youtube.com/channel/UCabc"));
    }

    #[test]
    fn test_bare_id_is_not_a_url() {
        assert!(extract_video_id("dQw4w9WgXcQ").is_err());
    }

    #[test]
    fn test_empty_input() {
        assert!(extract_video_id("").is_err());
    }

    #[test]
    fn test_thumbnail_url() {
        let v = extract_video_id("https://youtu.be/dQw4w9WgXcQ").unwrap();
        assert_eq!(v.thumbnail_url(), "https://img.youtube.com/vi/dQw4w9WgXcQ/0.jpg");
    }

    #[test]
    fn test_transcript_join_and_trim() {
        let v = extract_video_id("https://youtu.be/dQw4w9WgXcQ").unwrap();
        let t = Transcript::from_texts(v, ["Hello", "world"]);
        assert_eq!(t.text(), "Hello world");
        assert_eq!(t.word_count(), 2);
        assert_eq!(t.char_count(), 11);
    }

    #[test]
    fn test_transcript_empty() {
        let v = extract_video_id("https://youtu.be/dQw4w9WgXcQ").unwrap();
        let t = Transcript::from_texts(v, Vec::<String>::new());
        assert!(t.is_empty());
    }
}
