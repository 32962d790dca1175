mod clean;
mod ocr;
mod pages_json;
mod plan;
mod text_layer;

use std::process::Command;

use anyhow::{Context, Result, bail};

use crate::model::Page;

pub use clean::full_reading_text;
pub use ocr::DEFAULT_OCR_DPI;
pub use plan::{ExtractionPlan, StrategyAttempt};

pub trait PageSource {
    fn name(&self) -> &'static str;

    fn extract(&self) -> Result<Vec<Page>>;
}

fn pages_from_texts(texts: Vec<String>) -> Vec<Page> {
    texts
        .into_iter()
        .enumerate()
        .filter(|(_, text)| non_whitespace_char_count(text) > 0)
        .map(|(index, text)| Page::new((index + 1) as u32, text))
        .collect()
}

fn non_whitespace_char_count(text: &str) -> usize {
    text.chars()
        .filter(|character| !character.is_whitespace())
        .count()
}

fn command_available(program: &str) -> bool {
    Command::new(program).arg("-v").output().is_ok()
}

fn run_tool(command: &mut Command, subject: &str) -> Result<String> {
    let program = command.get_program().to_string_lossy().into_owned();
    let output = command
        .output()
        .with_context(|| format!("failed to execute {program} for {subject}"))?;

    if !output.status.success() {
        bail!(
            "{program} returned non-zero exit status for {subject}: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).replace('\u{0000}', ""))
}
