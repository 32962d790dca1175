pub mod analyze;
pub mod chapters;
pub mod script;
pub mod status;
pub mod text;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use rusqlite::Connection;

use crate::cli::{ExtractionArgs, InputArgs, resolve_db_path};
use crate::extract::{ExtractionPlan, full_reading_text};
use crate::store;
use crate::util::{doc_id_for, file_stem_or, sha256_file};

pub const FULL_DOCUMENT_TITLE: &str = "Full Document";

#[derive(Debug, Clone)]
pub struct InputDescriptor {
    pub path: PathBuf,
    pub filename: String,
    pub title: String,
    pub sha256: String,
    pub doc_id: String,
}

pub fn describe_input(input: &InputArgs) -> Result<InputDescriptor> {
    let path = input_path(input)?;
    let sha256 = sha256_file(path)?;
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(ToOwned::to_owned)
        .with_context(|| format!("invalid UTF-8 filename: {}", path.display()))?;

    Ok(InputDescriptor {
        path: path.to_path_buf(),
        filename,
        title: file_stem_or(path, "document"),
        doc_id: doc_id_for(&sha256),
        sha256,
    })
}

pub fn build_plan(input: &InputArgs, extraction: &ExtractionArgs) -> Result<ExtractionPlan> {
    if let Some(pages_json) = &input.pages_json {
        return Ok(ExtractionPlan::for_pages_json(pages_json.clone()));
    }

    let pdf = input_path(input)?;
    Ok(ExtractionPlan::for_pdf(
        pdf.to_path_buf(),
        extraction.ocr_mode,
        &extraction.ocr_lang,
        extraction.ocr_dpi,
        extraction.ocr_min_text_chars,
        extraction.max_pages,
    ))
}

fn input_path(input: &InputArgs) -> Result<&Path> {
    match (&input.pdf, &input.pages_json) {
        (Some(pdf), _) => Ok(pdf.as_path()),
        (None, Some(pages_json)) => Ok(pages_json.as_path()),
        (None, None) => bail!("either --pdf or --pages-json is required"),
    }
}

pub fn open_existing_store(cache_root: &Path, db_path: Option<&PathBuf>) -> Result<Connection> {
    let db_path = resolve_db_path(cache_root, db_path);
    if !db_path.exists() {
        bail!(
            "database {} not found; run analyze first",
            db_path.display()
        );
    }
    store::open(&db_path)
}

#[derive(Debug, Clone)]
pub struct ReadingSelection {
    pub chapter_index: Option<usize>,
    pub title: String,
    pub text: String,
    pub paragraphs: Vec<String>,
}

pub fn select_reading(
    connection: &Connection,
    doc_id: &str,
    chapter: Option<usize>,
) -> Result<ReadingSelection> {
    if store::load_document(connection, doc_id)?.is_none() {
        bail!("document {doc_id} is not in the store; run analyze first");
    }

    let Some(index) = chapter else {
        let pages = store::load_pages(connection, doc_id)?;
        let text = full_reading_text(&pages);
        let paragraphs = text
            .split("\n\n")
            .map(str::trim)
            .filter(|paragraph| !paragraph.is_empty())
            .map(|paragraph| paragraph.split_whitespace().collect::<Vec<&str>>().join(" "))
            .collect();
        return Ok(ReadingSelection {
            chapter_index: None,
            title: FULL_DOCUMENT_TITLE.to_string(),
            text,
            paragraphs,
        });
    };

    let chapters = store::load_chapters(connection, doc_id)?;
    let Some(stored) = chapters.into_iter().nth(index) else {
        bail!("document {doc_id} has no chapter {index}; omit --chapter to read the full document");
    };

    Ok(ReadingSelection {
        chapter_index: Some(index),
        title: stored.title,
        text: stored.content,
        paragraphs: stored.paragraphs,
    })
}
