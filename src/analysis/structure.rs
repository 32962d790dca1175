use serde::{Deserialize, Serialize};

use crate::model::Page;

const MATTER_PAGE_WINDOW: usize = 10;

const TABLE_OF_CONTENTS_KEYWORDS: [&str; 2] = ["table of contents", "índice"];
const INTRODUCTION_KEYWORDS: [&str; 2] = ["introduction", "introdução"];
const PREFACE_KEYWORDS: [&str; 2] = ["preface", "prefácio"];
const EPILOGUE_KEYWORDS: [&str; 2] = ["epilogue", "epílogo"];
const BIBLIOGRAPHY_KEYWORDS: [&str; 2] = ["bibliography", "bibliografia"];
const INDEX_KEYWORDS: [&str; 1] = ["index"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStructureFlags {
    pub has_table_of_contents: bool,
    pub has_introduction: bool,
    pub has_preface: bool,
    pub has_epilogue: bool,
    pub has_bibliography: bool,
    pub has_index: bool,
}

pub fn identify_document_structure(pages: &[Page]) -> DocumentStructureFlags {
    let front = lowered_texts(pages.iter().take(MATTER_PAGE_WINDOW));
    let back = lowered_texts(pages[pages.len().saturating_sub(MATTER_PAGE_WINDOW)..].iter());

    DocumentStructureFlags {
        has_table_of_contents: mentions_any(&front, &TABLE_OF_CONTENTS_KEYWORDS),
        has_introduction: mentions_any(&front, &INTRODUCTION_KEYWORDS),
        has_preface: mentions_any(&front, &PREFACE_KEYWORDS),
        has_epilogue: mentions_any(&back, &EPILOGUE_KEYWORDS),
        has_bibliography: mentions_any(&back, &BIBLIOGRAPHY_KEYWORDS),
        has_index: mentions_any(&back, &INDEX_KEYWORDS),
    }
}

fn lowered_texts<'a>(pages: impl Iterator<Item = &'a Page>) -> Vec<String> {
    pages.map(|page| page.raw_text.to_lowercase()).collect()
}

fn mentions_any(texts: &[String], keywords: &[&str]) -> bool {
    texts
        .iter()
        .any(|text| keywords.iter().any(|keyword| text.contains(keyword)))
}
