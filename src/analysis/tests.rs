use super::chapters::{
    ChapterKind, ChapterMarker, MARKER_CONFIDENCE, parse_kind, parse_ordinal, roman_to_int,
};
use super::classifier::LineClassification;
use super::content::ContentExtractor;
use super::*;
use crate::model::Page;

fn classifier() -> LineClassifier {
    LineClassifier::new().expect("patterns should compile")
}

fn int_to_roman(mut value: u32) -> String {
    const TABLE: [(u32, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];

    let mut out = String::new();
    for (amount, symbol) in TABLE {
        while value >= amount {
            out.push_str(symbol);
            value -= amount;
        }
    }
    out
}

fn sample_book() -> Vec<Page> {
    vec![
        Page::new(
            1,
            "ACME PRESS\nCHAPTER 1\n\nThe first paragraph starts here\nand continues on this line.\n\n1 A footnote about the first paragraph.\n[3] Reference entry.\nSecond paragraph text.\nCopyright 2024 Acme\n7",
        ),
        Page::new(
            2,
            "8\nStill the second paragraph.\n\nThird paragraph on page two.\n9",
        ),
        Page::new(
            3,
            "CHAPTER 2\nChapter two body line.\n2 Another footnote.",
        ),
    ]
}

#[test]
fn blank_lines_are_empty_at_any_position() {
    let classifier = classifier();
    for line in ["", "   ", "\t", " \t  "] {
        for total in 1..6 {
            for position in 0..total {
                assert_eq!(
                    classifier.classify(line, position, total),
                    LineClassification::Empty
                );
            }
        }
    }
}

#[test]
fn heading_patterns_are_recognised_anywhere_on_the_page() {
    let classifier = classifier();
    for heading in [
        "CHAPTER 1",
        "Chapter XII",
        "Capítulo 3",
        "CAPÍTULO IV",
        "3. The Beginning",
        "THE LONG HEADING",
        "Part 2",
        "PARTE III",
        "Section 4",
        "Seção 5",
    ] {
        assert_eq!(
            classifier.classify(heading, 10, 30),
            LineClassification::Chapter,
            "{heading}"
        );
    }
}

#[test]
fn header_rules_only_apply_to_short_lines_near_the_top() {
    let classifier = classifier();
    assert_eq!(classifier.classify("42", 0, 30), LineClassification::Header);
    assert_eq!(classifier.classify("ACME", 1, 30), LineClassification::Header);
    assert_eq!(
        classifier.classify("12 | Running title", 2, 30),
        LineClassification::Header
    );
    assert_eq!(classifier.classify("NOTES", 10, 30), LineClassification::Content);
    assert_eq!(classifier.classify("42", 15, 30), LineClassification::Content);
}

#[test]
fn footer_rules_only_apply_to_short_lines_near_the_bottom() {
    let classifier = classifier();
    assert_eq!(classifier.classify("17", 29, 30), LineClassification::Footer);
    assert_eq!(
        classifier.classify("Copyright 2020 Someone", 28, 30),
        LineClassification::Footer
    );
    assert_eq!(classifier.classify("© Publisher", 27, 30), LineClassification::Footer);
    assert_eq!(
        classifier.classify("Copyright 2014", 0, 1),
        LineClassification::Footer
    );
    assert_eq!(
        classifier.classify("Copyright notice in the middle", 10, 30),
        LineClassification::Content
    );
}

#[test]
fn footnotes_and_references_follow_positional_rules() {
    let classifier = classifier();
    assert_eq!(
        classifier.classify("3 See the appendix for details.", 10, 30),
        LineClassification::Footnote
    );
    assert_eq!(
        classifier.classify("[12] Smith, J. A Title.", 10, 30),
        LineClassification::Reference
    );

    let long_line = format!("3 {}", "word ".repeat(40));
    assert_eq!(classifier.classify(&long_line, 10, 30), LineClassification::Content);
}

#[test]
fn priority_order_resolves_overlapping_patterns() {
    let classifier = classifier();
    assert_eq!(
        classifier.classify("1. Introduction", 0, 30),
        LineClassification::Chapter
    );
    assert_eq!(
        classifier.classify("1 Introduction", 0, 30),
        LineClassification::Footnote
    );
    assert_eq!(classifier.classify("5", 0, 2), LineClassification::Header);
}

#[test]
fn footnote_number_parses_leading_integer() {
    let classifier = classifier();
    assert_eq!(classifier.footnote_number("  12 Note text"), Some(12));
    assert_eq!(classifier.footnote_number("Note text"), None);
    assert_eq!(classifier.footnote_number("99999999999 Too large"), None);
}

#[test]
fn roman_numerals_round_trip_over_standard_range() {
    for value in 1..=3999 {
        assert_eq!(roman_to_int(&int_to_roman(value)), value, "{value}");
    }
}

#[test]
fn roman_to_int_tolerates_non_standard_forms() {
    assert_eq!(roman_to_int("MCMXCIV"), 1994);
    assert_eq!(roman_to_int("IIII"), 4);
    assert_eq!(roman_to_int(""), 0);
}

#[test]
fn ordinal_prefers_digits_then_first_roman_run() {
    assert_eq!(parse_ordinal("CHAPTER 12"), Some(12));
    assert_eq!(parse_ordinal("Part VI"), Some(6));
    assert_eq!(parse_ordinal("PART XIV"), Some(14));
    assert_eq!(parse_ordinal("SECTION 3"), Some(3));
    assert_eq!(parse_ordinal("untitled heading"), None);
    // The leading `C` of "Chapter" is the first Roman run.
    assert_eq!(parse_ordinal("Chapter IV"), Some(100));
}

#[test]
fn kind_comes_from_keywords_in_either_language() {
    assert_eq!(parse_kind("PART ONE"), ChapterKind::Part);
    assert_eq!(parse_kind("Parte 2"), ChapterKind::Part);
    assert_eq!(parse_kind("SECTION 5"), ChapterKind::Section);
    assert_eq!(parse_kind("SEÇÃO 4"), ChapterKind::Section);
    assert_eq!(parse_kind("CHAPTER 3"), ChapterKind::Chapter);
    assert_eq!(parse_kind("3. The Beginning"), ChapterKind::Chapter);
}

#[test]
fn every_marker_has_fixed_confidence() {
    let classifier = classifier();
    let markers = ChapterDetector::new(&classifier).detect(&sample_book());
    assert_eq!(markers.len(), 2);
    assert!(markers.iter().all(|marker| marker.confidence == MARKER_CONFIDENCE));
    assert_eq!(MARKER_CONFIDENCE, 0.9);
}

#[test]
fn markers_sort_into_reading_order() {
    let marker = |page: u32, line_index: usize| ChapterMarker {
        title: format!("CHAPTER {page}-{line_index}"),
        ordinal: None,
        kind: ChapterKind::Chapter,
        page,
        line_index,
        confidence: MARKER_CONFIDENCE,
    };

    let mut markers = vec![marker(5, 0), marker(2, 9), marker(2, 5)];
    markers.sort_by_key(ChapterMarker::position);

    let order = markers
        .iter()
        .map(ChapterMarker::position)
        .collect::<Vec<(u32, usize)>>();
    assert_eq!(order, vec![(2, 5), (2, 9), (5, 0)]);
}

#[test]
fn detect_returns_reading_order_for_shuffled_pages() {
    let classifier = classifier();
    let pages = vec![
        Page::new(4, "CHAPTER 3\nLate words."),
        Page::new(1, "CHAPTER 1\nEarly words.\n\nCHAPTER 2\nMiddle words."),
    ];

    let markers = ChapterDetector::new(&classifier).detect(&pages);
    let titles = markers
        .iter()
        .map(|marker| marker.title.as_str())
        .collect::<Vec<&str>>();
    assert_eq!(titles, vec!["CHAPTER 1", "CHAPTER 2", "CHAPTER 3"]);
    assert_eq!(
        markers.iter().map(ChapterMarker::position).collect::<Vec<_>>(),
        vec![(1, 0), (1, 3), (4, 0)]
    );
}

#[test]
fn single_page_chapter_collects_one_paragraph() {
    let classifier = classifier();
    let pages = vec![Page::new(1, "CHAPTER 1\n\nHello world.\nIt is a nice day.")];

    let markers = ChapterDetector::new(&classifier).detect(&pages);
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].title, "CHAPTER 1");
    assert_eq!(markers[0].page, 1);
    assert_eq!(markers[0].line_index, 0);
    assert_eq!(markers[0].ordinal, Some(1));
    assert_eq!(markers[0].kind, ChapterKind::Chapter);

    let content = ContentExtractor::new(&classifier).extract(&pages, 1, 2, 0);
    assert_eq!(content.paragraphs, vec!["Hello world. It is a nice day.".to_string()]);
    assert_eq!(content.text, "Hello world. It is a nice day.");
    assert_eq!(content.word_count, 7);
}

#[test]
fn heading_on_last_line_yields_empty_chapter() {
    let classifier = classifier();
    let pages = vec![
        Page::new(1, "Some preface text here.\nMore preface.\nCHAPTER 1"),
        Page::new(2, "CHAPTER 2\nBody of chapter two.\nStill chapter two."),
    ];

    let markers = ChapterDetector::new(&classifier).detect(&pages);
    assert_eq!(
        markers.iter().map(ChapterMarker::position).collect::<Vec<_>>(),
        vec![(1, 2), (2, 0)]
    );

    let document = DocumentOrganizer::new(&classifier).organize(&pages, &markers);
    let first = &document.chapters[0];
    assert_eq!(first.page_range, [1, 1]);
    assert_eq!(first.text, "");
    assert!(first.paragraphs.is_empty());
    assert_eq!(first.word_count, 0);
    assert_eq!(first.duration_estimate, DurationEstimate::default());

    let second = &document.chapters[1];
    assert_eq!(second.page_range, [2, 2]);
    assert_eq!(
        second.paragraphs,
        vec!["Body of chapter two. Still chapter two.".to_string()]
    );
    assert_eq!(second.word_count, 7);
}

#[test]
fn duration_uses_fixed_rates_rounded_to_one_decimal() {
    let estimate = DurationEstimate::from_word_count(300);
    assert_eq!(estimate.slow, 2.3);
    assert_eq!(estimate.medium, 2.0);
    assert_eq!(estimate.fast, 1.7);
    assert_eq!(estimate.for_rate(Rate::Fast), 1.7);
    assert_eq!(DurationEstimate::from_word_count(0), DurationEstimate::default());
    assert_eq!(DurationEstimate::from_word_count(27).fast, 0.1);
}

#[test]
fn duration_is_monotonic_in_word_count() {
    for words in 0..3000 {
        let smaller = DurationEstimate::from_word_count(words);
        let larger = DurationEstimate::from_word_count(words + 1);
        assert!(smaller.slow <= larger.slow, "{words}");
        assert!(smaller.medium <= larger.medium, "{words}");
        assert!(smaller.fast <= larger.fast, "{words}");
    }
}

#[test]
fn organizer_spans_pages_and_drops_non_content_lines() {
    let classifier = classifier();
    let pages = sample_book();
    let markers = ChapterDetector::new(&classifier).detect(&pages);
    let document = DocumentOrganizer::new(&classifier).organize(&pages, &markers);

    assert_eq!(document.metadata.total_pages, 3);
    assert_eq!(document.metadata.total_chapters, 2);

    let first = &document.chapters[0];
    assert_eq!(first.page_range, [1, 2]);
    assert_eq!(
        first.paragraphs,
        vec![
            "The first paragraph starts here and continues on this line.".to_string(),
            "Second paragraph text. Still the second paragraph.".to_string(),
            "Third paragraph on page two.".to_string(),
        ]
    );
    assert_eq!(first.word_count, 22);

    let second = &document.chapters[1];
    assert_eq!(second.page_range, [3, 3]);
    assert_eq!(second.text, "Chapter two body line.");

    for chapter in &document.chapters {
        for noise in ["ACME PRESS", "CHAPTER", "footnote", "[3]", "Copyright"] {
            assert!(!chapter.text.contains(noise), "{noise} leaked into {}", chapter.text);
        }
        assert!(
            chapter
                .text
                .split_whitespace()
                .all(|token| !token.chars().all(|character| character.is_ascii_digit())),
            "page number leaked into {}",
            chapter.text
        );
    }
}

#[test]
fn last_chapter_runs_to_highest_page_number_across_gaps() {
    let classifier = classifier();
    let pages = vec![
        Page::new(1, "CHAPTER 1\nOpening words."),
        Page::new(2, "Middle words here."),
        Page::new(5, "Closing words after a gap."),
    ];

    let markers = ChapterDetector::new(&classifier).detect(&pages);
    let document = DocumentOrganizer::new(&classifier).organize(&pages, &markers);

    assert_eq!(document.chapters.len(), 1);
    assert_eq!(document.chapters[0].page_range, [1, 5]);
    assert!(document.chapters[0].text.ends_with("Closing words after a gap."));
}

#[test]
fn organize_without_chapters_keeps_document_metadata() {
    let classifier = classifier();
    let pages = vec![
        Page::new(1, "Just some words on a page."),
        Page::new(2, "And a few more."),
    ];

    let document = DocumentOrganizer::new(&classifier).organize(&pages, &[]);
    assert!(document.chapters.is_empty());
    assert_eq!(document.metadata.total_pages, 2);
    assert_eq!(document.metadata.total_chapters, 0);
    assert_eq!(document.metadata.total_words, 10);

    let empty = DocumentOrganizer::new(&classifier).organize(&[], &[]);
    assert_eq!(empty.metadata.total_pages, 0);
    assert_eq!(empty.metadata.estimated_duration, DurationEstimate::default());
}

#[test]
fn document_duration_counts_raw_words_not_chapter_words() {
    let classifier = classifier();
    let pages = vec![Page::new(1, "CHAPTER 1\n\nHello world.\nIt is a nice day.")];
    let markers = ChapterDetector::new(&classifier).detect(&pages);
    let document = DocumentOrganizer::new(&classifier).organize(&pages, &markers);

    assert_eq!(document.metadata.total_words, 9);
    assert_eq!(document.chapters[0].word_count, 7);
}

#[test]
fn organize_is_idempotent() {
    let classifier = classifier();
    let pages = sample_book();
    let markers = ChapterDetector::new(&classifier).detect(&pages);
    let organizer = DocumentOrganizer::new(&classifier);

    let first = organizer.organize(&pages, &markers);
    let second = organizer.organize(&pages, &markers);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).expect("document should serialize"),
        serde_json::to_string(&second).expect("document should serialize")
    );
}

#[test]
fn footnotes_and_references_are_collected_with_pages() {
    let classifier = classifier();
    let auxiliary =
        DocumentOrganizer::new(&classifier).extract_footnotes_and_references(&sample_book());

    assert_eq!(
        auxiliary.footnotes,
        vec![
            Footnote {
                page: 1,
                text: "1 A footnote about the first paragraph.".to_string(),
                number: Some(1),
            },
            Footnote {
                page: 3,
                text: "2 Another footnote.".to_string(),
                number: Some(2),
            },
        ]
    );
    assert_eq!(
        auxiliary.references,
        vec![Reference {
            page: 1,
            text: "[3] Reference entry.".to_string(),
        }]
    );
}

#[test]
fn structure_flags_search_front_and_back_matter_separately() {
    let mut pages = (1..=12)
        .map(|page_number| Page::new(page_number, "Plain filler text."))
        .collect::<Vec<Page>>();
    pages[0] = Page::new(1, "Table of Contents\nEpilogue ........ 300");
    pages[1] = Page::new(2, "PREFÁCIO");
    pages[10] = Page::new(11, "Index\nIntroduction, 4");
    pages[11] = Page::new(12, "Bibliografia");

    let flags = identify_document_structure(&pages);
    assert!(flags.has_table_of_contents);
    assert!(flags.has_preface);
    assert!(!flags.has_introduction);
    assert!(!flags.has_epilogue);
    assert!(flags.has_bibliography);
    assert!(flags.has_index);

    assert_eq!(identify_document_structure(&[]), DocumentStructureFlags::default());
}
