//! Local summary used when no model produced one.

use crate::Transcript;

/// Words kept from the start of the transcript
pub const FALLBACK_WORDS: usize = 100;

/// First [`FALLBACK_WORDS`] words of the transcript, wrapped in a notice
pub fn simple_summary(transcript: &Transcript) -> String {
    let text = transcript.text();
    let words: Vec<&str> = text.split_whitespace().collect();

    let excerpt = if words.len() > FALLBACK_WORDS {
        format!("{}...", words[..FALLBACK_WORDS].join(" "))
    } else {
        text.to_string()
    };

    format!(
        "## Summary (Simple Extraction)\n\n\
         {excerpt}\n\n\
         *Note: This is a simple text extraction since AI summarization is unavailable.*\n\
         *To enable AI summarization, check the Gemini API key and model configuration.*\n\n\
         **Transcript Length:** {} words, {} characters\n",
        words.len(),
        transcript.char_count(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VideoId;

    fn transcript_of(words: usize) -> Transcript {
        let texts: Vec<String> = (1..=words).map(|i| format!("w{i}")).collect();
        Transcript::from_texts(VideoId("cE72C0e0bKw".to_string()), texts)
    }

    #[test]
    fn test_long_transcript_truncated() {
        let t = transcript_of(150);
        let out = simple_summary(&t);

        let first_100: Vec<String> = (1..=100).map(|i| format!("w{i}")).collect();
        assert!(out.contains(&format!("{}...", first_100.join(" "))));
        assert!(!out.contains("w101"));
        assert!(out.contains("150 words"));
        assert!(out.contains(&format!("{} characters", t.char_count())));
    }

    #[test]
    fn test_short_transcript_unchanged() {
        let t = transcript_of(50);
        let out = simple_summary(&t);
        assert!(out.contains(&format!("\n\n{}\n\n", t.text())));
        assert!(!out.contains("..."));
        assert!(out.contains("50 words"));
    }

    #[test]
    fn test_exactly_limit_no_ellipsis() {
        let out = simple_summary(&transcript_of(FALLBACK_WORDS));
        assert!(!out.contains("..."));
        assert!(out.contains("w100"));
    }

    #[test]
    fn test_template_markers() {
        let t = Transcript::from_texts(VideoId("cE72C0e0bKw".to_string()), ["Hello", "world"]);
        let out = simple_summary(&t);
        assert!(out.contains("Simple Extraction"));
        assert!(out.contains("AI summarization is unavailable"));
        assert!(out.contains("2 words, 11 characters"));
    }
}
