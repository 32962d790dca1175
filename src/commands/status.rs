use anyhow::Result;
use tracing::{info, warn};

use crate::cli::{StatusArgs, resolve_db_path};
use crate::store;

pub fn run(args: StatusArgs) -> Result<()> {
    let db_path = resolve_db_path(&args.cache_root, args.db_path.as_ref());

    info!(cache_root = %args.cache_root.display(), "status requested");

    if !db_path.exists() {
        warn!(path = %db_path.display(), "database file missing");
        return Ok(());
    }

    let connection = store::open(&db_path)?;
    let documents = store::list_documents(&connection)?;

    for document in &documents {
        info!(
            doc_id = %document.doc_id,
            title = %document.title,
            filename = %document.filename,
            pages = document.total_pages,
            chapters = document.total_chapters,
            words = document.words_total,
            minutes_medium = document.duration_medium,
            method = %document.extraction_method,
            analyzed_at = %document.analyzed_at,
            "stored document"
        );
    }

    info!(
        path = %db_path.display(),
        documents = documents.len(),
        chapters = documents.iter().map(|document| document.total_chapters).sum::<i64>(),
        pages = documents.iter().map(|document| document.total_pages).sum::<i64>(),
        "database status"
    );

    Ok(())
}
