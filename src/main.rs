use std::path::PathBuf;
use std::time::Duration;

use eyre::Result;
use log::{info, warn};

mod cli;

use cli::{Cli, OutputFormat};
use ytnotes::config::{API_KEY_VARS, Config};
use ytnotes::summarize::Summarizer;
use ytnotes::web::AppState;
use ytnotes::youtube::{InnerTube, TranscriptApi, TranscriptService};

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("ytnotes.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytnotes")
        .join("logs")
}

fn build_after_help() -> String {
    let key_line = match API_KEY_VARS.iter().find(|name| std::env::var(name).is_ok_and(|v| !v.trim().is_empty())) {
        Some(name) => format!("  \x1b[32m✅\x1b[0m {name} set"),
        None => format!(
            "  \x1b[31m❌\x1b[0m {} not set (summaries fall back to simple extraction)",
            API_KEY_VARS.join(" / ")
        ),
    };

    let log_path = log_dir().join("ytnotes.log");

    format!(
        "\nCREDENTIALS:\n{key_line}\n\nConfig is read from: {}\nLogs are written to: {}",
        ytnotes::config::config_path().display(),
        log_path.display()
    )
}

fn transcript_service(client: &reqwest::Client, config: &Config) -> Box<dyn TranscriptService> {
    let timeout = Duration::from_secs(config.timeout_secs);
    match &config.transcript_api {
        Some(base) => {
            info!("Using transcript API at {base}");
            Box::new(TranscriptApi::new(client.clone(), base, &config.lang, timeout))
        }
        None => Box::new(InnerTube::new(client.clone(), &config.lang, timeout)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;

    let after_help = build_after_help();
    let cmd = <Cli as clap::CommandFactory>::command().after_help(after_help);
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    // Load config file (non-fatal if missing/invalid)
    let config = Config::load(cli.config.as_deref()).unwrap_or_else(|e| {
        warn!("Ignoring config file: {e}");
        Config::default()
    });

    let api_key = config.resolve_api_key();
    if api_key.is_none() {
        warn!("No API key found; running in simple extraction mode");
    }

    let client = reqwest::Client::new();
    let service = transcript_service(&client, &config);
    let summarizer = Summarizer::gemini(&client, api_key.as_deref(), &config);

    if cli.verbose {
        eprintln!("Config: {}", cli.config.clone().unwrap_or_else(ytnotes::config::config_path).display());
        eprintln!("Models: {}", summarizer.models().join(", "));
    }

    let Some(url) = cli.url.as_deref() else {
        let bind = cli.bind.as_deref().unwrap_or(&config.bind);
        return ytnotes::web::serve(bind, AppState { service, summarizer }).await;
    };

    let notes = ytnotes::generate_notes(url.trim(), service.as_ref(), &summarizer)
        .await
        .map_err(|e| eyre::eyre!("{}\n({e})", e.user_message()))?;

    if cli.verbose {
        eprintln!(
            "Video: {}\nWords: {}\nSummary: {}",
            notes.video_id,
            notes.transcript.word_count(),
            notes.summary.tag(),
        );
        if let ytnotes::Summary::Fallback {
            reason: ytnotes::Unavailable::AllModelsFailed(failures),
            ..
        } = &notes.summary
        {
            for f in failures {
                eprintln!("Model {} failed: {}", f.model, f.reason);
            }
        }
    }

    let rendered = match cli.format {
        OutputFormat::Text => ytnotes::output::render_text(&notes),
        OutputFormat::Json => ytnotes::output::render_json(&notes),
    };
    println!("{rendered}");

    if let Some(ref dir) = cli.output_dir {
        for path in ytnotes::output::write_artifacts(&notes, dir)? {
            if cli.verbose {
                eprintln!("Output written to: {}", path.display());
            }
        }
    }

    Ok(())
}
