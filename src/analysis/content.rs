use serde::Serialize;

use super::classifier::{LineClassification, LineClassifier};
use crate::model::Page;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedContent {
    pub text: String,
    pub paragraphs: Vec<String>,
    pub word_count: usize,
}

pub struct ContentExtractor<'a> {
    classifier: &'a LineClassifier,
}

impl<'a> ContentExtractor<'a> {
    pub fn new(classifier: &'a LineClassifier) -> Self {
        Self { classifier }
    }

    pub fn extract(
        &self,
        pages: &[Page],
        start_page: u32,
        end_page_exclusive: u32,
        start_line_index: usize,
    ) -> ExtractedContent {
        let mut content_lines = Vec::<&str>::new();
        let mut paragraphs = Vec::<String>::new();
        let mut current = Vec::<&str>::new();

        for page in pages
            .iter()
            .filter(|page| (start_page..end_page_exclusive).contains(&page.page_number))
        {
            let first_index = if page.page_number == start_page {
                start_line_index + 1
            } else {
                0
            };
            let total_lines = page.lines.len();

            for (index, line) in page.lines.iter().enumerate().skip(first_index) {
                match self.classifier.classify(line, index, total_lines) {
                    LineClassification::Content => {
                        let trimmed = line.trim();
                        content_lines.push(trimmed);
                        current.push(trimmed);
                    }
                    LineClassification::Empty => {
                        if !current.is_empty() {
                            paragraphs.push(current.join(" "));
                            current.clear();
                        }
                    }
                    _ => {}
                }
            }
        }

        if !current.is_empty() {
            paragraphs.push(current.join(" "));
        }

        let text = content_lines.join(" ");
        let word_count = word_count(&text);

        ExtractedContent {
            text,
            paragraphs,
            word_count,
        }
    }
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
