use serde::Serialize;

use super::chapters::ChapterMarker;
use super::classifier::{LineClassification, LineClassifier};
use super::content::{ContentExtractor, word_count};
use super::duration::DurationEstimate;
use crate::model::Page;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChapterContent {
    pub marker: ChapterMarker,
    pub page_range: [u32; 2],
    pub text: String,
    pub paragraphs: Vec<String>,
    pub word_count: usize,
    pub duration_estimate: DurationEstimate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentMetadata {
    pub total_pages: usize,
    pub total_chapters: usize,
    pub total_words: usize,
    pub estimated_duration: DurationEstimate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuredDocument {
    pub metadata: DocumentMetadata,
    pub chapters: Vec<ChapterContent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Footnote {
    pub page: u32,
    pub text: String,
    pub number: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    pub page: u32,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuxiliaryContent {
    pub footnotes: Vec<Footnote>,
    pub references: Vec<Reference>,
}

pub struct DocumentOrganizer<'a> {
    classifier: &'a LineClassifier,
}

impl<'a> DocumentOrganizer<'a> {
    pub fn new(classifier: &'a LineClassifier) -> Self {
        Self { classifier }
    }

    pub fn organize(&self, pages: &[Page], chapters: &[ChapterMarker]) -> StructuredDocument {
        let chapter_contents = (0..chapters.len())
            .filter_map(|index| self.chapter_content(pages, chapters, index))
            .collect::<Vec<ChapterContent>>();

        let total_words = pages
            .iter()
            .map(|page| word_count(&page.raw_text))
            .sum::<usize>();

        StructuredDocument {
            metadata: DocumentMetadata {
                total_pages: pages.len(),
                total_chapters: chapters.len(),
                total_words,
                estimated_duration: DurationEstimate::from_word_count(total_words),
            },
            chapters: chapter_contents,
        }
    }

    pub fn chapter_content(
        &self,
        pages: &[Page],
        chapters: &[ChapterMarker],
        index: usize,
    ) -> Option<ChapterContent> {
        let marker = chapters.get(index)?;
        let start_page = marker.page;
        let end_page_exclusive = match chapters.get(index + 1) {
            Some(next) => next.page,
            None => last_page_number(pages) + 1,
        };

        let content = ContentExtractor::new(self.classifier).extract(
            pages,
            start_page,
            end_page_exclusive,
            marker.line_index,
        );

        Some(ChapterContent {
            marker: marker.clone(),
            page_range: [start_page, end_page_exclusive.saturating_sub(1)],
            duration_estimate: DurationEstimate::from_word_count(content.word_count),
            text: content.text,
            paragraphs: content.paragraphs,
            word_count: content.word_count,
        })
    }

    pub fn extract_footnotes_and_references(&self, pages: &[Page]) -> AuxiliaryContent {
        let mut auxiliary = AuxiliaryContent::default();

        for page in pages {
            let total_lines = page.lines.len();
            for (index, line) in page.lines.iter().enumerate() {
                match self.classifier.classify(line, index, total_lines) {
                    LineClassification::Footnote => auxiliary.footnotes.push(Footnote {
                        page: page.page_number,
                        text: line.trim().to_string(),
                        number: self.classifier.footnote_number(line),
                    }),
                    LineClassification::Reference => auxiliary.references.push(Reference {
                        page: page.page_number,
                        text: line.trim().to_string(),
                    }),
                    _ => {}
                }
            }
        }

        auxiliary
    }
}

fn last_page_number(pages: &[Page]) -> u32 {
    pages
        .iter()
        .map(|page| page.page_number)
        .max()
        .unwrap_or(0)
}
