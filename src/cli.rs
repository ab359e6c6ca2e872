use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(
    name = "quotepick",
    version,
    about = "Click-to-sentence extraction and pull-quote picking for PDF documents"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Analyze(AnalyzeArgs),
    Click(ClickArgs),
    Sentences(SentencesArgs),
    Text(TextArgs),
    Quotes(QuotesArgs),
    Clean(CleanArgs),
    Status(SessionArgs),
    Clear(SessionArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SessionArgs {
    #[arg(long, default_value = ".cache/quotepick")]
    pub cache_root: PathBuf,

    #[arg(long)]
    pub session_path: Option<PathBuf>,
}

impl SessionArgs {
    pub fn resolved_session_path(&self) -> PathBuf {
        self.session_path
            .clone()
            .unwrap_or_else(|| self.cache_root.join("session.json"))
    }
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    pub pdf_path: PathBuf,

    #[command(flatten)]
    pub session: SessionArgs,

    #[arg(long, value_enum, default_value_t = OcrMode::Off)]
    pub ocr_mode: OcrMode,

    #[arg(long, default_value = "jpn")]
    pub ocr_lang: String,

    #[arg(long, default_value_t = 8)]
    pub min_text_chars: usize,

    #[arg(long, default_value_t = 1.25)]
    pub render_scale: f64,

    #[arg(long)]
    pub render_dir: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrMode {
    Off,
    Auto,
    Force,
}

impl OcrMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Auto => "auto",
            Self::Force => "force",
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ClickArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    #[arg(long)]
    pub page: u32,

    #[arg(long, allow_negative_numbers = true)]
    pub x: f64,

    #[arg(long, allow_negative_numbers = true)]
    pub y: f64,

    #[arg(long, default_value_t = false)]
    pub html: bool,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SentencesArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    #[arg(long)]
    pub page: Option<u32>,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct TextArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    #[arg(long)]
    pub max_chars: Option<usize>,
}

#[derive(Args, Debug, Clone)]
pub struct QuotesArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    #[arg(long)]
    pub input: Option<PathBuf>,

    #[arg(long, default_value = "")]
    pub keywords: String,

    #[arg(long, default_value_t = 15)]
    pub min_len: usize,

    #[arg(long, default_value_t = 160)]
    pub max_len: usize,

    #[arg(long, default_value_t = 6)]
    pub count: usize,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CleanArgs {
    #[arg(long)]
    pub input: Option<PathBuf>,
}
