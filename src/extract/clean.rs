use crate::model::Page;

const EDGE_LINES: usize = 2;
const MIN_READABLE_CHARS: usize = 3;

pub fn clean_page_text(raw_text: &str) -> String {
    let lines = raw_text.split('\n').collect::<Vec<&str>>();
    let body = if lines.len() > EDGE_LINES * 2 {
        &lines[EDGE_LINES..lines.len() - EDGE_LINES]
    } else {
        &lines[..]
    };

    body.iter()
        .copied()
        .filter(|line| !is_page_number_line(line))
        .filter(|line| line.trim().chars().count() >= MIN_READABLE_CHARS)
        .collect::<Vec<&str>>()
        .join("\n")
}

pub fn full_reading_text(pages: &[Page]) -> String {
    pages
        .iter()
        .map(|page| clean_page_text(&page.raw_text))
        .collect::<Vec<String>>()
        .join("\n\n")
}

fn is_page_number_line(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && trimmed.chars().all(char::is_numeric)
}
