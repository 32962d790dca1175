use std::path::PathBuf;
use std::process::Command;

use anyhow::Result;
use tracing::debug;

use super::{PageSource, pages_from_texts, run_tool};
use crate::model::Page;

const FORM_FEED: char = '\u{000C}';

#[derive(Debug, Clone)]
pub struct TextLayerSource {
    pdf_path: PathBuf,
    max_pages: Option<usize>,
}

impl TextLayerSource {
    pub fn new(pdf_path: PathBuf, max_pages: Option<usize>) -> Self {
        Self {
            pdf_path,
            max_pages,
        }
    }

    fn pdftotext(&self) -> Command {
        let mut command = Command::new("pdftotext");
        command.args(["-enc", "UTF-8", "-f", "1"]);
        if let Some(last_page) = self.max_pages {
            command.arg("-l").arg(last_page.to_string());
        }
        command.arg(&self.pdf_path).arg("-");
        command
    }
}

impl PageSource for TextLayerSource {
    fn name(&self) -> &'static str {
        "text_layer"
    }

    fn extract(&self) -> Result<Vec<Page>> {
        let subject = self.pdf_path.display().to_string();
        let stdout = run_tool(&mut self.pdftotext(), &subject)?;
        let texts = split_form_feed_pages(&stdout);
        debug!(path = %subject, pages = texts.len(), "text layer read");
        Ok(pages_from_texts(texts))
    }
}

pub(super) fn split_form_feed_pages(raw: &str) -> Vec<String> {
    let mut pages = raw
        .split(FORM_FEED)
        .map(|chunk| chunk.replace('\u{0000}', ""))
        .collect::<Vec<String>>();

    while pages.last().is_some_and(|page| page.trim().is_empty()) {
        pages.pop();
    }

    pages
}
