use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

const CHAPTER_PATTERNS: [&str; 5] = [
    r"^(Chapter|CHAPTER|Capítulo|CAPÍTULO)\s+(\d+|[IVXLCDM]+)",
    r"^(\d+)\.\s+[A-Z]",
    r"^[A-Z][A-Z\s]{10,}$",
    r"^(Part|PART|Parte|PARTE)\s+(\d+|[IVXLCDM]+)",
    r"^(Section|SECTION|Seção|SEÇÃO)\s+(\d+)",
];

const HEADER_PATTERNS: [&str; 3] = [r"^\d+\s*$", r"^[A-Z\s]+$", r"^\s*\d+\s*\|\s*"];

const FOOTER_PATTERNS: [&str; 4] = [r"^\d+\s*$", r"^Copyright", r"^©", r"^\s*\d+\s*$"];

const FOOTNOTE_PATTERN: &str = r"^\s*(\d+)\s+";
const REFERENCE_PATTERN: &str = r"^\[\d+\]";

const EDGE_WINDOW: usize = 3;
const EDGE_LINE_MAX_CHARS: usize = 50;
const FOOTNOTE_MAX_CHARS: usize = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineClassification {
    Empty,
    Chapter,
    Header,
    Footer,
    Footnote,
    Reference,
    Content,
}

#[derive(Debug)]
pub struct LineClassifier {
    chapter_patterns: Vec<Regex>,
    header_patterns: Vec<Regex>,
    footer_patterns: Vec<Regex>,
    footnote: Regex,
    reference: Regex,
}

impl LineClassifier {
    pub fn new() -> Result<Self> {
        Ok(Self {
            chapter_patterns: compile_all(&CHAPTER_PATTERNS, "chapter heading")?,
            header_patterns: compile_all(&HEADER_PATTERNS, "header")?,
            footer_patterns: compile_all(&FOOTER_PATTERNS, "footer")?,
            footnote: Regex::new(FOOTNOTE_PATTERN).context("failed to compile footnote regex")?,
            reference: Regex::new(REFERENCE_PATTERN)
                .context("failed to compile reference regex")?,
        })
    }

    pub fn classify(&self, line: &str, position: usize, total_lines: usize) -> LineClassification {
        let line = line.trim();
        if line.is_empty() {
            return LineClassification::Empty;
        }

        if self.chapter_patterns.iter().any(|regex| regex.is_match(line)) {
            return LineClassification::Chapter;
        }

        let char_count = line.chars().count();

        if position < EDGE_WINDOW
            && char_count < EDGE_LINE_MAX_CHARS
            && self.header_patterns.iter().any(|regex| regex.is_match(line))
        {
            return LineClassification::Header;
        }

        if position + EDGE_WINDOW >= total_lines
            && char_count < EDGE_LINE_MAX_CHARS
            && self.footer_patterns.iter().any(|regex| regex.is_match(line))
        {
            return LineClassification::Footer;
        }

        if self.footnote.is_match(line) && char_count < FOOTNOTE_MAX_CHARS {
            return LineClassification::Footnote;
        }

        if self.reference.is_match(line) {
            return LineClassification::Reference;
        }

        LineClassification::Content
    }

    pub fn footnote_number(&self, line: &str) -> Option<u32> {
        self.footnote
            .captures(line)
            .and_then(|captures| captures.get(1))
            .and_then(|value| value.as_str().parse::<u32>().ok())
    }
}

fn compile_all(patterns: &[&str], label: &str) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern)
                .with_context(|| format!("failed to compile {label} regex: {pattern}"))
        })
        .collect()
}
