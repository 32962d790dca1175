use serde::{Deserialize, Serialize};

use super::classifier::{LineClassification, LineClassifier};
use crate::model::Page;

pub const MARKER_CONFIDENCE: f64 = 0.9;

const PART_KEYWORDS: [&str; 2] = ["part", "parte"];
const SECTION_KEYWORDS: [&str; 2] = ["section", "seção"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChapterKind {
    Chapter,
    Part,
    Section,
}

impl ChapterKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chapter => "chapter",
            Self::Part => "part",
            Self::Section => "section",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterMarker {
    pub title: String,
    pub ordinal: Option<u32>,
    pub kind: ChapterKind,
    pub page: u32,
    pub line_index: usize,
    pub confidence: f64,
}

impl ChapterMarker {
    pub fn position(&self) -> (u32, usize) {
        (self.page, self.line_index)
    }
}

pub struct ChapterDetector<'a> {
    classifier: &'a LineClassifier,
}

impl<'a> ChapterDetector<'a> {
    pub fn new(classifier: &'a LineClassifier) -> Self {
        Self { classifier }
    }

    pub fn detect(&self, pages: &[Page]) -> Vec<ChapterMarker> {
        let mut markers = Vec::new();

        for page in pages {
            let total_lines = page.lines.len();
            for (line_index, line) in page.lines.iter().enumerate() {
                if self.classifier.classify(line, line_index, total_lines)
                    != LineClassification::Chapter
                {
                    continue;
                }

                let title = line.trim().to_string();
                markers.push(ChapterMarker {
                    ordinal: parse_ordinal(&title),
                    kind: parse_kind(&title),
                    title,
                    page: page.page_number,
                    line_index,
                    confidence: MARKER_CONFIDENCE,
                });
            }
        }

        markers.sort_by_key(ChapterMarker::position);
        markers
    }
}

pub fn parse_kind(title: &str) -> ChapterKind {
    let lowered = title.to_lowercase();
    if PART_KEYWORDS.iter().any(|keyword| lowered.contains(keyword)) {
        ChapterKind::Part
    } else if SECTION_KEYWORDS.iter().any(|keyword| lowered.contains(keyword)) {
        ChapterKind::Section
    } else {
        ChapterKind::Chapter
    }
}

/// The Roman fallback takes the first run anywhere in the title, so a heading
/// such as `Chapter IV` yields 100 from the leading `C`.
pub fn parse_ordinal(title: &str) -> Option<u32> {
    if let Some(digits) = first_run(title, |character| character.is_ascii_digit()) {
        return digits.parse::<u32>().ok();
    }

    first_run(title, is_roman_letter).map(roman_to_int)
}

pub fn roman_to_int(numeral: &str) -> u32 {
    let mut total: i64 = 0;
    let mut previous: i64 = 0;

    for character in numeral.chars().rev() {
        let value = roman_value(character);
        if value < previous {
            total -= value;
        } else {
            total += value;
        }
        previous = value;
    }

    u32::try_from(total.max(0)).unwrap_or(u32::MAX)
}

fn roman_value(character: char) -> i64 {
    match character {
        'I' => 1,
        'V' => 5,
        'X' => 10,
        'L' => 50,
        'C' => 100,
        'D' => 500,
        'M' => 1000,
        _ => 0,
    }
}

fn is_roman_letter(character: char) -> bool {
    roman_value(character) > 0
}

fn first_run(text: &str, predicate: impl Fn(char) -> bool) -> Option<&str> {
    let start = text.find(|character: char| predicate(character))?;
    let rest = &text[start..];
    let end = rest
        .find(|character: char| !predicate(character))
        .unwrap_or(rest.len());
    Some(&rest[..end])
}
