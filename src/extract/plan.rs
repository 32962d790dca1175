use std::path::PathBuf;

use anyhow::{Result, bail};
use serde::Serialize;
use tracing::{info, warn};

use super::ocr::OcrSource;
use super::pages_json::PagesJsonSource;
use super::text_layer::TextLayerSource;
use super::{PageSource, non_whitespace_char_count};
use crate::cli::OcrMode;
use crate::model::Page;

const SCANNED_SAMPLE_PAGES: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acceptance {
    Any,
    RejectScanned { min_text_chars: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AttemptOutcome {
    Accepted { page_count: usize },
    Rejected { reason: String },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategyAttempt {
    pub strategy: String,
    #[serde(flatten)]
    pub outcome: AttemptOutcome,
}

#[derive(Debug)]
pub struct ExtractionResult {
    pub pages: Vec<Page>,
    pub method: String,
    pub attempts: Vec<StrategyAttempt>,
}

struct PlanStep {
    source: Box<dyn PageSource>,
    acceptance: Acceptance,
}

#[derive(Default)]
pub struct ExtractionPlan {
    steps: Vec<PlanStep>,
}

impl ExtractionPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_step(mut self, source: Box<dyn PageSource>, acceptance: Acceptance) -> Self {
        self.steps.push(PlanStep { source, acceptance });
        self
    }

    pub fn for_pdf(
        pdf_path: PathBuf,
        ocr_mode: OcrMode,
        ocr_lang: &str,
        ocr_dpi: u32,
        ocr_min_text_chars: usize,
        max_pages: Option<usize>,
    ) -> Self {
        let text_layer = Box::new(TextLayerSource::new(pdf_path.clone(), max_pages));
        let ocr = Box::new(OcrSource::new(
            pdf_path,
            ocr_lang.to_string(),
            ocr_dpi,
            max_pages,
        ));

        match ocr_mode {
            OcrMode::Off => Self::new().with_step(text_layer, Acceptance::Any),
            OcrMode::Auto => Self::new()
                .with_step(
                    text_layer,
                    Acceptance::RejectScanned {
                        min_text_chars: ocr_min_text_chars,
                    },
                )
                .with_step(ocr, Acceptance::Any),
            OcrMode::Force => Self::new().with_step(ocr, Acceptance::Any),
        }
    }

    pub fn for_pages_json(path: PathBuf) -> Self {
        Self::new().with_step(Box::new(PagesJsonSource::new(path)), Acceptance::Any)
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|step| step.source.name()).collect()
    }

    pub fn run(&self) -> Result<ExtractionResult> {
        let mut attempts = Vec::<StrategyAttempt>::new();

        for step in &self.steps {
            let strategy = step.source.name();
            match step.source.extract() {
                Ok(pages) => {
                    if let Some(reason) = rejection_reason(&pages, step.acceptance) {
                        warn!(strategy, reason = %reason, "page source result rejected");
                        attempts.push(StrategyAttempt {
                            strategy: strategy.to_string(),
                            outcome: AttemptOutcome::Rejected { reason },
                        });
                        continue;
                    }

                    info!(strategy, pages = pages.len(), "page source accepted");
                    attempts.push(StrategyAttempt {
                        strategy: strategy.to_string(),
                        outcome: AttemptOutcome::Accepted {
                            page_count: pages.len(),
                        },
                    });
                    return Ok(ExtractionResult {
                        pages,
                        method: strategy.to_string(),
                        attempts,
                    });
                }
                Err(error) => {
                    warn!(strategy, error = %error, "page source failed");
                    attempts.push(StrategyAttempt {
                        strategy: strategy.to_string(),
                        outcome: AttemptOutcome::Failed {
                            error: format!("{error:#}"),
                        },
                    });
                }
            }
        }

        if attempts.is_empty() {
            bail!("extraction plan has no page sources");
        }

        let summary = attempts
            .iter()
            .map(|attempt| match &attempt.outcome {
                AttemptOutcome::Rejected { reason } => format!("{}: {}", attempt.strategy, reason),
                AttemptOutcome::Failed { error } => format!("{}: {}", attempt.strategy, error),
                AttemptOutcome::Accepted { .. } => attempt.strategy.clone(),
            })
            .collect::<Vec<String>>()
            .join("; ");
        bail!("no page source produced usable pages ({summary})")
    }
}

fn rejection_reason(pages: &[Page], acceptance: Acceptance) -> Option<String> {
    match acceptance {
        Acceptance::Any => None,
        Acceptance::RejectScanned { min_text_chars } => {
            let average = average_leading_chars(pages);
            if average < min_text_chars as f64 {
                Some(format!(
                    "looks scanned: {average:.1} text chars per leading page, below {min_text_chars}"
                ))
            } else {
                None
            }
        }
    }
}

/// Average non-whitespace characters over page slots `1..=3`. Slots missing
/// from `pages` (blank in the source) count as zero.
pub(super) fn average_leading_chars(pages: &[Page]) -> f64 {
    let last_page = pages.iter().map(|page| page.page_number).max().unwrap_or(0);
    let slots = last_page.min(SCANNED_SAMPLE_PAGES);
    if slots == 0 {
        return 0.0;
    }

    let chars = pages
        .iter()
        .filter(|page| page.page_number <= slots)
        .map(|page| non_whitespace_char_count(&page.raw_text))
        .sum::<usize>();

    chars as f64 / slots as f64
}
