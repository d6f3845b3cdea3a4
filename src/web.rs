//! Single-page form: paste a URL, get notes, download the files.
//!
//! Every request is handled on its own. The server keeps no per-user state;
//! download buttons post the text back rather than referencing a stored result.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Form, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use log::{error, info};
use serde::Deserialize;

use crate::output::{self, Artifact};
use crate::summarize::Summarizer;
use crate::youtube::TranscriptService;
use crate::{Notes, Summary, Unavailable, generate_notes};

/// Longest per-model failure reason shown on the page
const FAILURE_REASON_CHARS: usize = 100;

pub struct AppState {
    pub service: Box<dyn TranscriptService>,
    pub summarizer: Summarizer,
}

#[derive(Debug, Deserialize)]
pub struct GenerateForm {
    #[serde(default)]
    url: String,
}

#[derive(Debug, Deserialize)]
pub struct DownloadForm {
    #[serde(default)]
    content: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index).post(generate))
        .route("/download/{kind}", post(download))
        .with_state(state)
}

pub async fn serve(bind: &str, state: AppState) -> eyre::Result<()> {
    let addr: SocketAddr = bind.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{addr}");
    eprintln!("Listening on http://{addr}");

    axum::serve(listener, router(Arc::new(state)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to install Ctrl+C handler: {e}");
    }
}

async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let body = if !state.summarizer.has_credential() {
        notice(
            "warning",
            "No API key found in GOOGLE_API_KEY, GEMINI_API_KEY or the config file's api_key. Summaries will use simple text extraction.",
        )
    } else if !state.summarizer.is_available() {
        notice("warning", "No Gemini models configured. Summaries will use simple text extraction.")
    } else {
        String::new()
    };
    page("", &body)
}

async fn generate(State(state): State<Arc<AppState>>, Form(form): Form<GenerateForm>) -> Html<String> {
    let url = form.url.trim();
    if let Err(message) = check_input(url) {
        return page(url, &notice("warning", message));
    }

    match generate_notes(url, state.service.as_ref(), &state.summarizer).await {
        Ok(notes) => page(url, &render_notes(&notes)),
        Err(e) => {
            error!("Submission for {url} failed: {e}");
            page(url, &notice("error", &e.user_message()))
        }
    }
}

async fn download(Path(kind): Path<String>, Form(form): Form<DownloadForm>) -> Response {
    let Some(artifact) = posted_artifact(&kind, &form.content) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    (
        [
            (header::CONTENT_TYPE, artifact.content_type.to_string()),
            (header::CONTENT_DISPOSITION, artifact.disposition()),
        ],
        artifact.body,
    )
        .into_response()
}

/// Artifact for text posted back from the page. Browsers submit textarea
/// line breaks as CRLF; the generated text used LF.
fn posted_artifact(kind: &str, content: &str) -> Option<Artifact> {
    let body = content.replace("\r\n", "\n");
    match kind {
        "summary" => Some(Artifact::summary(body)),
        "transcript" => Some(Artifact::transcript(body)),
        _ => None,
    }
}

/// Reject input that is empty or obviously not a YouTube link
fn check_input(url: &str) -> Result<(), &'static str> {
    if url.is_empty() {
        return Err("Please enter a YouTube URL");
    }
    if !url.contains("youtube.com") && !url.contains("youtu.be") {
        return Err("Please enter a valid YouTube URL");
    }
    Ok(())
}

fn notice(kind: &str, message: &str) -> String {
    format!("<p class=\"notice {kind}\">{}</p>\n", text(message))
}

fn render_notes(notes: &Notes) -> String {
    let mut html = format!(
        "<p>Video ID: <code>{id}</code></p>\n<img class=\"thumb\" src=\"{thumb}\" alt=\"thumbnail\">\n",
        id = text(notes.video_id.as_str()),
        thumb = attr(&notes.video_id.thumbnail_url()),
    );
    html.push_str(&notice(
        "success",
        &format!("Transcript extracted ({} characters)", notes.transcript.char_count()),
    ));
    html.push_str(&format!(
        "<details><summary>View Transcript Preview</summary><pre>{}</pre></details>\n<hr>\n",
        text(&output::preview(&notes.transcript)),
    ));

    match &notes.summary {
        Summary::Ai { model, text: summary } => {
            html.push_str(&notice("success", "AI summary generated successfully!"));
            html.push_str(&format!(
                "<h2>Detailed Notes</h2>\n<pre class=\"summary\">{}</pre>\n<p class=\"caption\">Generated by Google Gemini AI ({})</p>\n",
                text(summary),
                text(model),
            ));
        }
        Summary::Fallback { reason, text: summary } => {
            html.push_str(&fallback_notice(reason));
            html.push_str(&format!(
                "<h2>Notes (Simple Extraction)</h2>\n<pre class=\"summary\">{}</pre>\n<p class=\"caption\">Simple text extraction (AI unavailable)</p>\n",
                text(summary),
            ));
        }
    }

    html.push_str("<hr>\n<h2>Download Options</h2>\n<div class=\"downloads\">\n");
    for (kind, label, content) in [
        ("summary", "Download Summary", notes.summary.text()),
        ("transcript", "Download Full Transcript", notes.transcript.text()),
    ] {
        html.push_str(&format!(
            "<form method=\"post\" action=\"/download/{kind}\"><textarea name=\"content\" hidden>\n{}</textarea><button type=\"submit\">{label}</button></form>\n",
            text(content),
        ));
    }
    html.push_str("</div>\n");
    html
}

fn fallback_notice(reason: &Unavailable) -> String {
    match reason {
        Unavailable::NoCredential => notice("warning", "Gemini API not configured. Using simple text extraction..."),
        Unavailable::NoModels => notice("warning", "No Gemini models configured. Using simple text extraction..."),
        Unavailable::AllModelsFailed(failures) => {
            let mut html = String::new();
            for f in failures {
                let reason: String = f.reason.chars().take(FAILURE_REASON_CHARS).collect();
                html.push_str(&format!(
                    "<p class=\"attempt\">Model {} failed: {}</p>\n",
                    text(&f.model),
                    text(&reason)
                ));
            }
            html.push_str(&notice("warning", "Gemini AI failed. Using simple text extraction..."));
            html
        }
    }
}

fn page(url: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>YouTube Summarizer</title>
<style>
body {{ font-family: sans-serif; max-width: 760px; margin: 2em auto; padding: 0 1em; }}
input[type=text] {{ width: 100%; font-size: 16px; padding: 12px; box-sizing: border-box; }}
button {{ background-color: #FF4B4B; color: white; font-weight: bold; padding: 10px 24px; border-radius: 5px; border: none; }}
button:hover {{ background-color: #FF3333; }}
pre {{ white-space: pre-wrap; }}
.notice {{ padding: 8px 12px; border-radius: 4px; }}
.success {{ background: #e6f4ea; }}
.warning {{ background: #fff4e5; }}
.error {{ background: #fdecea; }}
.attempt, .caption {{ color: #666; font-size: 0.9em; }}
.thumb {{ width: 500px; max-width: 100%; }}
.downloads {{ display: flex; gap: 1em; }}
</style>
</head>
<body>
<h1>YouTube Transcript to Detailed Notes Converter</h1>
<form method="post" action="/">
<label for="url">YouTube Video URL:</label>
<input type="text" id="url" name="url" value="{url}" placeholder="https://www.youtube.com/watch?v=...">
<p><button type="submit">Generate Detailed Notes</button></p>
</form>
{body}
<hr>
<p class="caption">Powered by YouTube captions &amp; Google Gemini AI</p>
</body>
</html>
"#,
        url = attr(url),
    ))
}
