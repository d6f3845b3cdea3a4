use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use regex::Regex;
use serde::Deserialize;

use crate::{Error, Segment, Transcript, VideoId};

pub const YOUTUBE_BASE_URL: &str = "https://www.youtube.com";

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Transcript payload as returned by a service, before flattening
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawTranscript {
    /// An object exposing a `snippets` collection
    Snippets { snippets: Vec<Segment> },
    /// A list of segment objects, each with a text field
    Segments(Vec<Segment>),
    /// A list of mappings; entries without a string `text` key are skipped
    Entries(Vec<serde_json::Map<String, serde_json::Value>>),
    /// Plain text, used verbatim
    Text(String),
}

impl RawTranscript {
    /// Segment texts in service order
    pub fn into_texts(self) -> Vec<String> {
        match self {
            RawTranscript::Snippets { snippets } | RawTranscript::Segments(snippets) => {
                snippets.into_iter().map(|s| s.text).collect()
            }
            RawTranscript::Entries(entries) => entries
                .into_iter()
                .filter_map(|mut e| match e.remove("text") {
                    Some(serde_json::Value::String(s)) => Some(s),
                    _ => None,
                })
                .collect(),
            RawTranscript::Text(text) => vec![text],
        }
    }
}

/// A captions backend. One call per submission, never retried.
#[async_trait]
pub trait TranscriptService: Send + Sync {
    async fn fetch(&self, video_id: &VideoId) -> Result<RawTranscript, Error>;
}

/// Fetch and flatten the transcript for a video
pub async fn fetch_transcript(service: &dyn TranscriptService, video_id: &VideoId) -> Result<Transcript, Error> {
    let raw = service.fetch(video_id).await?;
    let transcript = Transcript::from_texts(video_id.clone(), raw.into_texts());
    if transcript.is_empty() {
        return Err(Error::NoCaptionsAvailable(video_id.to_string()));
    }
    debug!(
        "Transcript for {video_id}: {} words, {} chars",
        transcript.word_count(),
        transcript.char_count()
    );
    Ok(transcript)
}

#[derive(Debug, Deserialize)]
struct InnerTubePlayerResponse {
    #[serde(rename = "playabilityStatus")]
    playability_status: Option<PlayabilityStatus>,
    captions: Option<CaptionsData>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: String,
    reason: Option<String>,
}

impl InnerTubePlayerResponse {
    /// Private, removed or region-locked videos come back with a non-OK status
    fn check_playable(&self) -> Result<(), Error> {
        match &self.playability_status {
            Some(ps) if ps.status != "OK" => Err(Error::Fetch(match &ps.reason {
                Some(reason) => format!("video not playable ({}): {reason}", ps.status),
                None => format!("video not playable ({})", ps.status),
            })),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CaptionsData {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    player_captions_tracklist_renderer: Option<CaptionTracklistRenderer>,
}

#[derive(Debug, Deserialize)]
struct CaptionTracklistRenderer {
    #[serde(rename = "captionTracks")]
    caption_tracks: Option<Vec<CaptionTrack>>,
}

#[derive(Debug, Deserialize)]
struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "languageCode")]
    language_code: String,
}

/// YouTube's own captions, read through the InnerTube player API
pub struct InnerTube {
    client: reqwest::Client,
    base_url: String,
    lang: String,
    timeout: Duration,
}

impl InnerTube {
    pub fn new(client: reqwest::Client, lang: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            base_url: YOUTUBE_BASE_URL.to_string(),
            lang: lang.into(),
            timeout,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn get_text(&self, url: &str) -> Result<String, Error> {
        let text = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(text)
    }
}

#[async_trait]
impl TranscriptService for InnerTube {
    async fn fetch(&self, video_id: &VideoId) -> Result<RawTranscript, Error> {
        let watch_url = format!("{}/watch?v={video_id}", self.base_url);
        debug!("Fetching watch page: {watch_url}");
        let page_html = self.get_text(&watch_url).await?;

        let api_key = extract_api_key(&page_html)?;
        debug!("Extracted InnerTube API key: {api_key}");

        let player_url = format!(
            "{}/youtubei/v1/player?key={api_key}&prettyPrint=false",
            self.base_url
        );
        let body = serde_json::json!({
            "context": {
                "client": {
                    "hl": self.lang,
                    "gl": "US",
                    "clientName": "WEB",
                    "clientVersion": "2.20241126.01.00"
                }
            },
            "videoId": video_id.as_str()
        });

        let resp: InnerTubePlayerResponse = self
            .client
            .post(&player_url)
            .header("User-Agent", USER_AGENT)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        resp.check_playable()?;

        let tracks = resp
            .captions
            .and_then(|c| c.player_captions_tracklist_renderer)
            .and_then(|r| r.caption_tracks)
            .unwrap_or_default();

        // Requested language first, otherwise whatever YouTube lists first
        let track = tracks
            .iter()
            .find(|t| t.language_code == self.lang)
            .or_else(|| tracks.first())
            .ok_or_else(|| Error::NoCaptionsAvailable(video_id.to_string()))?;
        debug!("Using caption track: lang={}", track.language_code);

        let caption_xml = self.get_text(&track.base_url).await?;
        Ok(RawTranscript::Segments(parse_caption_xml(&caption_xml)?))
    }
}

fn extract_api_key(html: &str) -> Result<String, Error> {
    let patterns = [
        r#""INNERTUBE_API_KEY"\s*:\s*"([^"]+)""#,
        r#"innertubeApiKey\s*[=:]\s*"([^"]+)""#,
    ];
    for pattern in patterns {
        let re = Regex::new(pattern).map_err(|e| Error::Fetch(e.to_string()))?;
        if let Some(caps) = re.captures(html) {
            return Ok(caps[1].to_string());
        }
    }
    Err(Error::Fetch("could not extract InnerTube API key from watch page".to_string()))
}

fn parse_caption_xml(xml: &str) -> Result<Vec<Segment>, Error> {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    let mut reader = Reader::from_str(xml);
    let mut segments = Vec::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"text" => in_text = true,
            Ok(Event::End(ref e)) if e.name().as_ref() == b"text" => in_text = false,
            Ok(Event::Text(ref e)) if in_text => {
                let raw_text = e.unescape().unwrap_or_default().to_string();
                let text = html_escape::decode_html_entities(&raw_text).to_string();
                if !text.is_empty() {
                    segments.push(Segment { text });
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Fetch(format!("error parsing caption XML: {e}"))),
            _ => {}
        }
    }

    Ok(segments)
}

/// A JSON transcript endpoint, e.g. a youtube-transcript-api proxy
pub struct TranscriptApi {
    client: reqwest::Client,
    base_url: String,
    lang: String,
    timeout: Duration,
}

impl TranscriptApi {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, lang: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            lang: lang.into(),
            timeout,
        }
    }
}

#[async_trait]
impl TranscriptService for TranscriptApi {
    async fn fetch(&self, video_id: &VideoId) -> Result<RawTranscript, Error> {
        debug!("Fetching transcript from {} for {video_id}", self.base_url);
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[("video_id", video_id.as_str()), ("lang", self.lang.as_str())])
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NoCaptionsAvailable(video_id.to_string()));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Fetch(format!("transcript service returned {status}: {body}")));
        }

        let body = resp.text().await?;
        parse_transcript_body(&body)
    }
}

fn parse_transcript_body(body: &str) -> Result<RawTranscript, Error> {
    use serde_json::Value;

    match serde_json::from_str::<Value>(body) {
        // Bare numbers and booleans are text that happens to parse as JSON
        Ok(Value::Number(_) | Value::Bool(_)) => Ok(RawTranscript::Text(body.to_string())),
        Ok(value) => serde_json::from_value(value)
            .map_err(|_| Error::Fetch("unrecognized transcript payload".to_string())),
        Err(_) => Ok(RawTranscript::Text(body.to_string())),
    }
}
