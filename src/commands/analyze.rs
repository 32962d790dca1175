use anyhow::Result;
use tracing::{info, warn};

use crate::analysis::{
    ChapterDetector, DocumentOrganizer, LineClassifier, identify_document_structure,
};
use crate::cli::{AnalyzeArgs, resolve_db_path};
use crate::commands::{build_plan, describe_input};
use crate::model::{AnalysisExport, SourceInfo};
use crate::store::{self, DocumentRow};
use crate::util::{ensure_directory, now_utc_string, write_json_pretty};

pub fn run(args: AnalyzeArgs) -> Result<()> {
    let input = describe_input(&args.input)?;
    let plan = build_plan(&args.input, &args.extraction)?;

    info!(
        path = %input.path.display(),
        doc_id = %input.doc_id,
        ocr_mode = args.extraction.ocr_mode.as_str(),
        strategies = ?plan.strategy_names(),
        "starting analysis"
    );

    let extraction = plan.run()?;
    let pages = extraction.pages;
    if pages.is_empty() {
        warn!(path = %input.path.display(), "no page produced any text");
    }

    if let Some(dump_path) = &args.dump_pages {
        write_json_pretty(dump_path, &pages)?;
        info!(path = %dump_path.display(), pages = pages.len(), "wrote page dump");
    }

    let classifier = LineClassifier::new()?;
    let markers = ChapterDetector::new(&classifier).detect(&pages);
    let organizer = DocumentOrganizer::new(&classifier);
    let document = organizer.organize(&pages, &markers);
    let auxiliary = organizer.extract_footnotes_and_references(&pages);
    let structure = identify_document_structure(&pages);

    if markers.is_empty() {
        warn!(doc_id = %input.doc_id, "no chapter headings detected");
    }

    let generated_at = now_utc_string();
    let export = AnalysisExport::new(
        generated_at.clone(),
        SourceInfo {
            doc_id: input.doc_id.clone(),
            title: input.title.clone(),
            path: input.path.display().to_string(),
            sha256: input.sha256.clone(),
            extraction_method: extraction.method.clone(),
            attempts: extraction.attempts,
        },
        &document,
        auxiliary,
        structure,
    );

    let export_path = args.out.clone().unwrap_or_else(|| {
        args.cache_root
            .join("exports")
            .join(format!("{}.json", input.doc_id))
    });
    write_json_pretty(&export_path, &export)?;
    info!(path = %export_path.display(), "wrote analysis export");

    if args.no_store {
        info!("skipping store (--no-store)");
    } else {
        ensure_directory(&args.cache_root)?;
        let db_path = resolve_db_path(&args.cache_root, args.db_path.as_ref());
        let mut connection = store::open(&db_path)?;
        let row = DocumentRow {
            doc_id: input.doc_id.clone(),
            title: input.title.clone(),
            filename: input.filename.clone(),
            source_path: input.path.display().to_string(),
            sha256: input.sha256.clone(),
            extraction_method: extraction.method,
            analyzed_at: generated_at,
        };
        store::save_document(&mut connection, &row, &document, &pages)?;
        info!(path = %db_path.display(), doc_id = %row.doc_id, "stored analysis");
    }

    info!(
        doc_id = %input.doc_id,
        pages = document.metadata.total_pages,
        chapters = document.metadata.total_chapters,
        words = document.metadata.total_words,
        footnotes = export.footnotes.len(),
        references = export.references.len(),
        minutes_medium = document.metadata.estimated_duration.medium,
        "analysis completed"
    );

    Ok(())
}
