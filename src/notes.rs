use log::{info, warn};
use serde::Serialize;

use crate::fallback::simple_summary;
use crate::summarize::Summarizer;
use crate::youtube::{TranscriptService, fetch_transcript};
use crate::{Error, Transcript, Unavailable, VideoId, extract_video_id};

/// Summary text and where it came from
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Summary {
    Ai { model: String, text: String },
    Fallback { reason: Unavailable, text: String },
}

impl Summary {
    pub fn text(&self) -> &str {
        match self {
            Summary::Ai { text, .. } | Summary::Fallback { text, .. } => text,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Summary::Ai { .. } => "ai",
            Summary::Fallback { .. } => "fallback",
        }
    }
}

/// Everything produced for one submitted URL
#[derive(Debug, Clone, Serialize)]
pub struct Notes {
    pub video_id: VideoId,
    pub transcript: Transcript,
    pub summary: Summary,
}

/// Parse, fetch, summarize; fall back to simple extraction when no model answers
pub async fn generate_notes(
    url: &str,
    service: &dyn TranscriptService,
    summarizer: &Summarizer,
) -> Result<Notes, Error> {
    let video_id = extract_video_id(url)?;
    info!("Video ID: {video_id}");

    let transcript = fetch_transcript(service, &video_id).await?;
    info!("Transcript extracted ({} characters)", transcript.char_count());

    let summary = match summarizer.summarize(&transcript).await {
        Ok(generated) => Summary::Ai {
            model: generated.model,
            text: generated.text,
        },
        Err(reason) => {
            warn!("AI summary unavailable ({reason}), using simple extraction");
            Summary::Fallback {
                text: simple_summary(&transcript),
                reason,
            }
        }
    };

    Ok(Notes {
        video_id,
        transcript,
        summary,
    })
}
