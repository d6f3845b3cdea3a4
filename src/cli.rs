use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(
    name = "ytnotes",
    about = "YouTube transcript to detailed notes",
    version
)]
pub struct Cli {
    /// YouTube video URL; serves the web form if omitted
    pub url: Option<String>,

    /// Output format for a single URL: text (default), json
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also write youtube_summary.txt and youtube_transcript.txt into this directory
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Address for the web form (overrides config)
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Show model attempts and transcript details
    #[arg(short, long)]
    pub verbose: bool,
}
