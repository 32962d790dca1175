use serde::{Deserialize, Serialize};

use crate::analysis::{
    AuxiliaryContent, ChapterContent, DocumentStructureFlags, DurationEstimate, Footnote,
    Reference, StructuredDocument,
};
use crate::extract::StrategyAttempt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PageRecord", into = "PageRecord")]
pub struct Page {
    pub page_number: u32,
    pub raw_text: String,
    pub lines: Vec<String>,
}

impl Page {
    pub fn new(page_number: u32, raw_text: impl Into<String>) -> Self {
        let raw_text = raw_text.into();
        let lines = raw_text.split('\n').map(ToOwned::to_owned).collect();
        Self {
            page_number,
            raw_text,
            lines,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRecord {
    pub page_number: u32,
    pub raw_text: String,
}

impl From<PageRecord> for Page {
    fn from(record: PageRecord) -> Self {
        Page::new(record.page_number, record.raw_text)
    }
}

impl From<Page> for PageRecord {
    fn from(page: Page) -> Self {
        PageRecord {
            page_number: page.page_number,
            raw_text: page.raw_text,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceInfo {
    pub doc_id: String,
    pub title: String,
    pub path: String,
    pub sha256: String,
    pub extraction_method: String,
    pub attempts: Vec<StrategyAttempt>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportMetadata {
    pub total_pages: usize,
    pub total_chapters: usize,
    pub total_words: usize,
    pub estimated_duration: DurationEstimate,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChapterRecord {
    pub ordinal: Option<u32>,
    pub title: String,
    pub kind: String,
    pub page: u32,
    pub line_index: usize,
    pub confidence: f64,
    pub page_range: [u32; 2],
    pub content: String,
    pub paragraphs: Vec<String>,
    pub word_count: usize,
    pub duration_estimate: DurationEstimate,
}

impl From<&ChapterContent> for ChapterRecord {
    fn from(chapter: &ChapterContent) -> Self {
        ChapterRecord {
            ordinal: chapter.marker.ordinal,
            title: chapter.marker.title.clone(),
            kind: chapter.marker.kind.as_str().to_string(),
            page: chapter.marker.page,
            line_index: chapter.marker.line_index,
            confidence: chapter.marker.confidence,
            page_range: chapter.page_range,
            content: chapter.text.clone(),
            paragraphs: chapter.paragraphs.clone(),
            word_count: chapter.word_count,
            duration_estimate: chapter.duration_estimate,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisExport {
    pub export_version: u32,
    pub generated_at: String,
    pub source: SourceInfo,
    pub metadata: ExportMetadata,
    pub chapters: Vec<ChapterRecord>,
    pub footnotes: Vec<Footnote>,
    pub references: Vec<Reference>,
    pub document_structure: DocumentStructureFlags,
}

impl AnalysisExport {
    pub fn new(
        generated_at: String,
        source: SourceInfo,
        document: &StructuredDocument,
        auxiliary: AuxiliaryContent,
        document_structure: DocumentStructureFlags,
    ) -> Self {
        AnalysisExport {
            export_version: 1,
            generated_at,
            source,
            metadata: ExportMetadata {
                total_pages: document.metadata.total_pages,
                total_chapters: document.metadata.total_chapters,
                total_words: document.metadata.total_words,
                estimated_duration: document.metadata.estimated_duration,
            },
            chapters: document.chapters.iter().map(ChapterRecord::from).collect(),
            footnotes: auxiliary.footnotes,
            references: auxiliary.references,
            document_structure,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentSummary {
    pub doc_id: String,
    pub title: String,
    pub filename: String,
    pub total_pages: i64,
    pub total_chapters: i64,
    pub words_total: i64,
    pub duration_medium: f64,
    pub extraction_method: String,
    pub analyzed_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoredChapter {
    pub chapter_index: i64,
    pub ordinal: Option<i64>,
    pub kind: String,
    pub title: String,
    pub start_page: i64,
    pub end_page: i64,
    pub word_count: i64,
    pub content: String,
    pub paragraphs: Vec<String>,
}
