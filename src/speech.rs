use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;

use crate::analysis::{DurationEstimate, Rate, word_count};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScriptChunk {
    pub index: usize,
    pub text: String,
    pub char_count: usize,
    pub word_count: usize,
    pub minutes: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NarrationScript {
    pub doc_id: String,
    pub chapter_index: Option<usize>,
    pub title: String,
    pub rate: Rate,
    pub words_per_minute: f64,
    pub voice: Option<String>,
    pub max_chars: usize,
    pub total_words: usize,
    pub total_minutes: f64,
    pub generated_at: String,
    pub chunks: Vec<ScriptChunk>,
}

pub struct ScriptRequest<'a> {
    pub doc_id: &'a str,
    pub chapter_index: Option<usize>,
    pub title: &'a str,
    pub text: &'a str,
    pub rate: Rate,
    pub voice: Option<String>,
    pub max_chars: usize,
    pub generated_at: String,
}

pub struct SentenceSplitter {
    boundary: Regex,
}

impl SentenceSplitter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            boundary: Regex::new(r"[.!?]\s+").context("failed to compile sentence boundary regex")?,
        })
    }

    pub fn sentences<'t>(&self, text: &'t str) -> Vec<&'t str> {
        let mut sentences = Vec::new();
        let mut start = 0usize;

        for boundary in self.boundary.find_iter(text) {
            sentences.push(&text[start..boundary.start() + 1]);
            start = boundary.end();
        }
        sentences.push(&text[start..]);

        sentences
            .into_iter()
            .map(str::trim)
            .filter(|sentence| !sentence.is_empty())
            .collect()
    }

    pub fn chunks(&self, text: &str, max_chars: usize) -> Vec<String> {
        let mut chunks = Vec::<String>::new();
        let mut current = String::new();

        for sentence in self.sentences(text) {
            let needed = if current.is_empty() {
                sentence.chars().count()
            } else {
                current.chars().count() + 1 + sentence.chars().count()
            };

            if needed <= max_chars || current.is_empty() {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(sentence);
                continue;
            }

            chunks.push(std::mem::take(&mut current));
            current.push_str(sentence);
        }

        if !current.is_empty() {
            chunks.push(current);
        }

        chunks
    }

    pub fn build_script(&self, request: ScriptRequest<'_>) -> NarrationScript {
        let words_per_minute = request.rate.words_per_minute();
        let chunks = self
            .chunks(request.text, request.max_chars)
            .into_iter()
            .enumerate()
            .map(|(index, text)| {
                let words = word_count(&text);
                ScriptChunk {
                    index,
                    char_count: text.chars().count(),
                    word_count: words,
                    minutes: DurationEstimate::from_word_count(words).for_rate(request.rate),
                    text,
                }
            })
            .collect::<Vec<ScriptChunk>>();

        let total_words = chunks.iter().map(|chunk| chunk.word_count).sum::<usize>();

        NarrationScript {
            doc_id: request.doc_id.to_string(),
            chapter_index: request.chapter_index,
            title: request.title.to_string(),
            rate: request.rate,
            words_per_minute,
            voice: request.voice,
            max_chars: request.max_chars,
            total_words,
            total_minutes: DurationEstimate::from_word_count(total_words).for_rate(request.rate),
            generated_at: request.generated_at,
            chunks,
        }
    }
}
