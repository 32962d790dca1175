use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};

use crate::analysis::StructuredDocument;
use crate::model::{DocumentSummary, Page, StoredChapter};

pub const DB_SCHEMA_VERSION: &str = "0.1.0";

#[derive(Debug, Clone)]
pub struct DocumentRow {
    pub doc_id: String,
    pub title: String,
    pub filename: String,
    pub source_path: String,
    pub sha256: String,
    pub extraction_method: String,
    pub analyzed_at: String,
}

pub fn open(db_path: &Path) -> Result<Connection> {
    let connection = Connection::open(db_path)
        .with_context(|| format!("failed to open {}", db_path.display()))?;
    configure_connection(&connection)?;
    ensure_schema(&connection)?;
    Ok(connection)
}

fn configure_connection(connection: &Connection) -> Result<()> {
    connection
        .pragma_update(None, "journal_mode", "WAL")
        .context("failed to set journal_mode=WAL")?;
    connection
        .pragma_update(None, "synchronous", "NORMAL")
        .context("failed to set synchronous=NORMAL")?;
    Ok(())
}

pub fn ensure_schema(connection: &Connection) -> Result<()> {
    connection
        .execute_batch(
            "
            CREATE TABLE IF NOT EXISTS metadata (
              key TEXT PRIMARY KEY,
              value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS documents (
              doc_id TEXT PRIMARY KEY,
              title TEXT NOT NULL,
              filename TEXT NOT NULL,
              source_path TEXT NOT NULL,
              sha256 TEXT NOT NULL,
              total_pages INTEGER NOT NULL,
              total_chapters INTEGER NOT NULL,
              words_total INTEGER NOT NULL,
              duration_medium REAL NOT NULL,
              extraction_method TEXT NOT NULL,
              analyzed_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS chapters (
              doc_id TEXT NOT NULL,
              chapter_index INTEGER NOT NULL,
              ordinal INTEGER,
              kind TEXT NOT NULL,
              title TEXT NOT NULL,
              start_page INTEGER NOT NULL,
              end_page INTEGER NOT NULL,
              word_count INTEGER NOT NULL,
              content TEXT NOT NULL,
              paragraphs_json TEXT NOT NULL,
              PRIMARY KEY(doc_id, chapter_index),
              FOREIGN KEY(doc_id) REFERENCES documents(doc_id)
            );

            CREATE TABLE IF NOT EXISTS pages (
              doc_id TEXT NOT NULL,
              page_number INTEGER NOT NULL,
              raw_text TEXT NOT NULL,
              PRIMARY KEY(doc_id, page_number),
              FOREIGN KEY(doc_id) REFERENCES documents(doc_id)
            );
            ",
        )
        .context("failed to create schema")?;

    connection
        .execute(
            "INSERT INTO metadata(key, value) VALUES('db_schema_version', ?1)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![DB_SCHEMA_VERSION],
        )
        .context("failed to record schema version")?;

    Ok(())
}

pub fn save_document(
    connection: &mut Connection,
    row: &DocumentRow,
    document: &StructuredDocument,
    pages: &[Page],
) -> Result<()> {
    let tx = connection
        .transaction()
        .context("failed to start save transaction")?;

    tx.execute("DELETE FROM chapters WHERE doc_id = ?1", params![row.doc_id])
        .context("failed to clear chapters")?;
    tx.execute("DELETE FROM pages WHERE doc_id = ?1", params![row.doc_id])
        .context("failed to clear pages")?;

    tx.execute(
        "
        INSERT OR REPLACE INTO documents (
          doc_id, title, filename, source_path, sha256, total_pages, total_chapters,
          words_total, duration_medium, extraction_method, analyzed_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        ",
        params![
            row.doc_id,
            row.title,
            row.filename,
            row.source_path,
            row.sha256,
            document.metadata.total_pages as i64,
            document.metadata.total_chapters as i64,
            document.metadata.total_words as i64,
            document.metadata.estimated_duration.medium,
            row.extraction_method,
            row.analyzed_at,
        ],
    )
    .with_context(|| format!("failed to upsert document {}", row.doc_id))?;

    {
        let mut chapter_statement = tx
            .prepare(
                "
                INSERT INTO chapters (
                  doc_id, chapter_index, ordinal, kind, title, start_page, end_page,
                  word_count, content, paragraphs_json
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                ",
            )
            .context("failed to prepare chapter insert")?;

        for (index, chapter) in document.chapters.iter().enumerate() {
            let paragraphs_json = serde_json::to_string(&chapter.paragraphs)
                .context("failed to serialize chapter paragraphs")?;
            chapter_statement
                .execute(params![
                    row.doc_id,
                    index as i64,
                    chapter.marker.ordinal.map(i64::from),
                    chapter.marker.kind.as_str(),
                    chapter.marker.title,
                    i64::from(chapter.page_range[0]),
                    i64::from(chapter.page_range[1]),
                    chapter.word_count as i64,
                    chapter.text,
                    paragraphs_json,
                ])
                .with_context(|| format!("failed to insert chapter {} of {}", index, row.doc_id))?;
        }

        let mut page_statement = tx
            .prepare("INSERT INTO pages (doc_id, page_number, raw_text) VALUES (?1, ?2, ?3)")
            .context("failed to prepare page insert")?;
        for page in pages {
            page_statement
                .execute(params![row.doc_id, i64::from(page.page_number), page.raw_text])
                .with_context(|| {
                    format!("failed to insert page {} of {}", page.page_number, row.doc_id)
                })?;
        }
    }

    tx.commit().context("failed to commit document")?;
    Ok(())
}

pub fn list_documents(connection: &Connection) -> Result<Vec<DocumentSummary>> {
    let mut statement = connection
        .prepare(
            "
            SELECT doc_id, title, filename, total_pages, total_chapters, words_total,
                   duration_medium, extraction_method, analyzed_at
            FROM documents
            ORDER BY analyzed_at DESC, doc_id ASC
            ",
        )
        .context("failed to prepare document listing")?;

    let rows = statement
        .query_map([], document_summary_from_row)
        .context("failed to list documents")?;

    let mut documents = Vec::new();
    for row in rows {
        documents.push(row.context("failed to read document row")?);
    }
    Ok(documents)
}

pub fn load_document(connection: &Connection, doc_id: &str) -> Result<Option<DocumentSummary>> {
    connection
        .query_row(
            "
            SELECT doc_id, title, filename, total_pages, total_chapters, words_total,
                   duration_medium, extraction_method, analyzed_at
            FROM documents
            WHERE doc_id = ?1
            ",
            params![doc_id],
            document_summary_from_row,
        )
        .optional()
        .with_context(|| format!("failed to load document {doc_id}"))
}

fn document_summary_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DocumentSummary> {
    Ok(DocumentSummary {
        doc_id: row.get(0)?,
        title: row.get(1)?,
        filename: row.get(2)?,
        total_pages: row.get(3)?,
        total_chapters: row.get(4)?,
        words_total: row.get(5)?,
        duration_medium: row.get(6)?,
        extraction_method: row.get(7)?,
        analyzed_at: row.get(8)?,
    })
}

pub fn load_chapters(connection: &Connection, doc_id: &str) -> Result<Vec<StoredChapter>> {
    let mut statement = connection
        .prepare(
            "
            SELECT chapter_index, ordinal, kind, title, start_page, end_page, word_count,
                   content, paragraphs_json
            FROM chapters
            WHERE doc_id = ?1
            ORDER BY chapter_index ASC
            ",
        )
        .context("failed to prepare chapter query")?;

    let rows = statement
        .query_map(params![doc_id], |row| {
            Ok((
                StoredChapter {
                    chapter_index: row.get(0)?,
                    ordinal: row.get(1)?,
                    kind: row.get(2)?,
                    title: row.get(3)?,
                    start_page: row.get(4)?,
                    end_page: row.get(5)?,
                    word_count: row.get(6)?,
                    content: row.get(7)?,
                    paragraphs: Vec::new(),
                },
                row.get::<_, String>(8)?,
            ))
        })
        .with_context(|| format!("failed to query chapters of {doc_id}"))?;

    let mut chapters = Vec::new();
    for row in rows {
        let (mut chapter, paragraphs_json) = row.context("failed to read chapter row")?;
        chapter.paragraphs = serde_json::from_str(&paragraphs_json).with_context(|| {
            format!(
                "failed to parse paragraphs of chapter {} in {}",
                chapter.chapter_index, doc_id
            )
        })?;
        chapters.push(chapter);
    }
    Ok(chapters)
}

pub fn load_pages(connection: &Connection, doc_id: &str) -> Result<Vec<Page>> {
    let mut statement = connection
        .prepare(
            "SELECT page_number, raw_text FROM pages WHERE doc_id = ?1 ORDER BY page_number ASC",
        )
        .context("failed to prepare page query")?;

    let rows = statement
        .query_map(params![doc_id], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })
        .with_context(|| format!("failed to query pages of {doc_id}"))?;

    let mut pages = Vec::new();
    for row in rows {
        let (page_number, raw_text) = row.context("failed to read page row")?;
        let page_number = u32::try_from(page_number)
            .with_context(|| format!("invalid page number {page_number} in {doc_id}"))?;
        pages.push(Page::new(page_number, raw_text));
    }
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{ChapterDetector, DocumentOrganizer, LineClassifier};

    fn sample_row() -> DocumentRow {
        DocumentRow {
            doc_id: "doc-0123456789abcdef".to_string(),
            title: "sample".to_string(),
            filename: "sample.pdf".to_string(),
            source_path: "/tmp/sample.pdf".to_string(),
            sha256: "0123456789abcdef".to_string(),
            extraction_method: "text_layer".to_string(),
            analyzed_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    fn sample_pages() -> Vec<Page> {
        vec![
            Page::new(1, "CHAPTER 1\n\nFirst chapter words.\n\nMore words here."),
            Page::new(3, "CHAPTER 2\nSecond chapter words."),
        ]
    }

    fn memory_store() -> Connection {
        let connection = Connection::open_in_memory().expect("in-memory db should open");
        ensure_schema(&connection).expect("schema should apply");
        connection
    }

    fn analyze(pages: &[Page]) -> StructuredDocument {
        let classifier = LineClassifier::new().expect("patterns should compile");
        let markers = ChapterDetector::new(&classifier).detect(pages);
        DocumentOrganizer::new(&classifier).organize(pages, &markers)
    }

    #[test]
    fn save_and_load_round_trip_preserves_chapters_and_pages() {
        let mut connection = memory_store();
        let pages = sample_pages();
        let document = analyze(&pages);
        let row = sample_row();

        save_document(&mut connection, &row, &document, &pages).expect("save should succeed");

        let summary = load_document(&connection, &row.doc_id)
            .expect("load should succeed")
            .expect("document should exist");
        assert_eq!(summary.total_pages, 2);
        assert_eq!(summary.total_chapters, 2);

        let chapters = load_chapters(&connection, &row.doc_id).expect("chapters should load");
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].ordinal, Some(1));
        assert_eq!(chapters[0].kind, "chapter");
        assert_eq!(chapters[0].start_page, 1);
        assert_eq!(chapters[0].end_page, 2);
        assert_eq!(
            chapters[0].paragraphs,
            vec!["First chapter words.".to_string(), "More words here.".to_string()]
        );
        assert_eq!(chapters[1].content, "Second chapter words.");

        let loaded_pages = load_pages(&connection, &row.doc_id).expect("pages should load");
        assert_eq!(loaded_pages, pages);
    }

    #[test]
    fn saving_again_replaces_previous_analysis() {
        let mut connection = memory_store();
        let row = sample_row();
        let pages = sample_pages();
        save_document(&mut connection, &row, &analyze(&pages), &pages)
            .expect("first save should succeed");

        let shorter = vec![Page::new(1, "No headings in this version.")];
        save_document(&mut connection, &row, &analyze(&shorter), &shorter)
            .expect("second save should succeed");

        assert!(load_chapters(&connection, &row.doc_id)
            .expect("chapters should load")
            .is_empty());
        assert_eq!(load_pages(&connection, &row.doc_id).expect("pages should load"), shorter);
        assert_eq!(list_documents(&connection).expect("listing should work").len(), 1);
    }

    #[test]
    fn unknown_document_loads_as_none() {
        let connection = memory_store();
        assert!(load_document(&connection, "doc-missing")
            .expect("query should succeed")
            .is_none());
    }
}
