use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::analysis::Rate;
use crate::extract::DEFAULT_OCR_DPI;

#[derive(Parser, Debug)]
#[command(
    name = "pdf-narrate",
    version,
    about = "Turn PDF books into chapter-structured, narration-ready text"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Analyze(AnalyzeArgs),
    Chapters(ChaptersArgs),
    Text(TextArgs),
    Script(ScriptArgs),
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct InputArgs {
    #[arg(long)]
    pub pdf: Option<PathBuf>,

    #[arg(long)]
    pub pages_json: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ExtractionArgs {
    #[arg(long, value_enum, default_value_t = OcrMode::Off)]
    pub ocr_mode: OcrMode,

    #[arg(long, default_value = "eng")]
    pub ocr_lang: String,

    #[arg(long, default_value_t = DEFAULT_OCR_DPI)]
    pub ocr_dpi: u32,

    #[arg(long, default_value_t = 50)]
    pub ocr_min_text_chars: usize,

    #[arg(long)]
    pub max_pages: Option<usize>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
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

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum RateArg {
    Slow,
    Medium,
    Fast,
}

impl RateArg {
    pub fn rate(self) -> Rate {
        match self {
            Self::Slow => Rate::Slow,
            Self::Medium => Rate::Medium,
            Self::Fast => Rate::Fast,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    #[arg(long, default_value = ".cache/pdf-narrate")]
    pub cache_root: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,

    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub extraction: ExtractionArgs,

    #[arg(long)]
    pub out: Option<PathBuf>,

    #[arg(long)]
    pub dump_pages: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub no_store: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ChaptersArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub extraction: ExtractionArgs,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct TextArgs {
    #[arg(long, default_value = ".cache/pdf-narrate")]
    pub cache_root: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,

    #[arg(long)]
    pub doc_id: String,

    #[arg(long)]
    pub chapter: Option<usize>,

    #[arg(long, default_value_t = false)]
    pub paragraphs: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ScriptArgs {
    #[arg(long, default_value = ".cache/pdf-narrate")]
    pub cache_root: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,

    #[arg(long)]
    pub doc_id: String,

    #[arg(long)]
    pub chapter: Option<usize>,

    #[arg(long, default_value_t = 500)]
    pub max_chars: usize,

    #[arg(long, value_enum, default_value_t = RateArg::Medium)]
    pub rate: RateArg,

    #[arg(long)]
    pub voice: Option<String>,

    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = ".cache/pdf-narrate")]
    pub cache_root: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,
}

pub fn resolve_db_path(cache_root: &std::path::Path, db_path: Option<&PathBuf>) -> PathBuf {
    db_path
        .cloned()
        .unwrap_or_else(|| cache_root.join("pdf_narrate.sqlite"))
}
