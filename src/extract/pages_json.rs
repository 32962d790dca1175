use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use super::PageSource;
use crate::model::Page;

#[derive(Debug, Clone)]
pub struct PagesJsonSource {
    path: PathBuf,
}

impl PagesJsonSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl PageSource for PagesJsonSource {
    fn name(&self) -> &'static str {
        "pages_json"
    }

    fn extract(&self) -> Result<Vec<Page>> {
        let raw = fs::read(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let mut pages: Vec<Page> = serde_json::from_slice(&raw)
            .with_context(|| format!("failed to parse {}", self.path.display()))?;
        pages.sort_by_key(|page| page.page_number);
        Ok(pages)
    }
}
