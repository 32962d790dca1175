use std::fs;
use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use tracing::{debug, info};

use super::{PageSource, command_available, pages_from_texts, run_tool};
use crate::model::Page;

pub const DEFAULT_OCR_DPI: u32 = 300;

#[derive(Debug, Clone)]
pub struct OcrSource {
    pdf_path: PathBuf,
    lang: String,
    dpi: u32,
    max_pages: Option<usize>,
}

impl OcrSource {
    pub fn new(pdf_path: PathBuf, lang: String, dpi: u32, max_pages: Option<usize>) -> Self {
        Self {
            pdf_path,
            lang,
            dpi,
            max_pages,
        }
    }

    fn page_count(&self) -> Result<usize> {
        let subject = self.pdf_path.display().to_string();
        let mut pdfinfo = Command::new("pdfinfo");
        pdfinfo.arg(&self.pdf_path);
        let info = run_tool(&mut pdfinfo, &subject)?;
        let pages = parse_pdfinfo_pages(&info)
            .with_context(|| format!("pdfinfo reported no page count for {subject}"))?;
        Ok(self.max_pages.map_or(pages, |limit| pages.min(limit)))
    }

    fn recognize_page(&self, render_dir: &RenderDir, page_number: usize) -> Result<String> {
        let subject = format!("{} page {}", self.pdf_path.display(), page_number);
        let image_root = render_dir.page_root(page_number);

        let mut pdftoppm = Command::new("pdftoppm");
        pdftoppm
            .arg("-f")
            .arg(page_number.to_string())
            .arg("-l")
            .arg(page_number.to_string())
            .arg("-r")
            .arg(self.dpi.to_string())
            .args(["-singlefile", "-png"])
            .arg(&self.pdf_path)
            .arg(&image_root);
        run_tool(&mut pdftoppm, &subject)?;

        let image = image_root.with_extension("png");
        if !image.exists() {
            bail!("pdftoppm produced no image for {subject}");
        }

        let mut tesseract = Command::new("tesseract");
        tesseract.arg(&image).arg("stdout").arg("-l").arg(&self.lang);
        let text = run_tool(&mut tesseract, &subject);
        let _ = fs::remove_file(&image);

        Ok(text?.trim().to_string())
    }
}

impl PageSource for OcrSource {
    fn name(&self) -> &'static str {
        "ocr"
    }

    fn extract(&self) -> Result<Vec<Page>> {
        if !command_available("pdftoppm") || !command_available("tesseract") {
            bail!("OCR requested but pdftoppm/tesseract are unavailable");
        }

        let page_count = self.page_count()?;
        let render_dir = RenderDir::create()?;
        info!(
            path = %self.pdf_path.display(),
            pages = page_count,
            lang = %self.lang,
            dpi = self.dpi,
            "running OCR"
        );

        let mut texts = Vec::with_capacity(page_count);
        for page_number in 1..=page_count {
            let text = self.recognize_page(&render_dir, page_number)?;
            debug!(page = page_number, chars = text.chars().count(), "page recognized");
            texts.push(text);
        }

        Ok(pages_from_texts(texts))
    }
}

pub(super) struct RenderDir {
    pub(super) path: PathBuf,
}

impl RenderDir {
    pub(super) fn create() -> Result<Self> {
        let stamp = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let path = std::env::temp_dir().join(format!(
            "pdf_narrate_ocr_{}_{}",
            std::process::id(),
            stamp
        ));
        fs::create_dir_all(&path)
            .with_context(|| format!("failed to create render dir {}", path.display()))?;
        Ok(Self { path })
    }

    pub(super) fn page_root(&self, page_number: usize) -> PathBuf {
        self.path.join(format!("page_{page_number:05}"))
    }
}

impl Drop for RenderDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

pub(super) fn parse_pdfinfo_pages(pdfinfo: &str) -> Option<usize> {
    pdfinfo.lines().find_map(|line| {
        line.strip_prefix("Pages:")
            .and_then(|value| value.trim().parse::<usize>().ok())
    })
}
