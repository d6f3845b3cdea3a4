use std::path::{Path, PathBuf};

use eyre::Result;

use crate::{Notes, Transcript};

pub const SUMMARY_FILE: &str = "youtube_summary.txt";
pub const TRANSCRIPT_FILE: &str = "youtube_transcript.txt";
pub const CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Characters of transcript shown before the preview is cut
pub const PREVIEW_CHARS: usize = 1000;

/// A downloadable plain-text file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl Artifact {
    pub fn summary(body: impl Into<String>) -> Self {
        Self {
            file_name: SUMMARY_FILE,
            content_type: CONTENT_TYPE,
            body: body.into(),
        }
    }

    pub fn transcript(body: impl Into<String>) -> Self {
        Self {
            file_name: TRANSCRIPT_FILE,
            content_type: CONTENT_TYPE,
            body: body.into(),
        }
    }

    /// `Content-Disposition` header value for serving as a download
    pub fn disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.file_name)
    }
}

/// Summary and full transcript files for a submission
pub fn artifacts(notes: &Notes) -> [Artifact; 2] {
    [
        Artifact::summary(notes.summary.text()),
        Artifact::transcript(notes.transcript.text()),
    ]
}

/// Write both artifacts into `dir`, returning the paths written
pub fn write_artifacts(notes: &Notes, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    artifacts(notes)
        .into_iter()
        .map(|a| -> Result<PathBuf> {
            let path = dir.join(a.file_name);
            std::fs::write(&path, a.body)?;
            Ok(path)
        })
        .collect()
}

/// Start of the transcript, with `...` when cut
pub fn preview(transcript: &Transcript) -> String {
    let text = transcript.text();
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Render notes as plain text for the terminal
pub fn render_text(notes: &Notes) -> String {
    let source = match &notes.summary {
        crate::Summary::Ai { model, .. } => format!("Generated by {model}"),
        crate::Summary::Fallback { reason, .. } => format!("Simple text extraction ({reason})"),
    };
    format!(
        "Video ID: {}\nTranscript: {} characters\n\n{}\n\n--- {source} ---",
        notes.video_id,
        notes.transcript.char_count(),
        notes.summary.text().trim_end(),
    )
}

/// Render notes as JSON
pub fn render_json(notes: &Notes) -> String {
    serde_json::to_string_pretty(notes).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
}
