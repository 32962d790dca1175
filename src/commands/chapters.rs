use anyhow::{Context, Result};
use tracing::info;

use crate::analysis::{ChapterDetector, LineClassifier};
use crate::cli::ChaptersArgs;
use crate::commands::build_plan;

pub fn run(args: ChaptersArgs) -> Result<()> {
    let plan = build_plan(&args.input, &args.extraction)?;
    let extraction = plan.run()?;

    let classifier = LineClassifier::new()?;
    let markers = ChapterDetector::new(&classifier).detect(&extraction.pages);

    if args.json {
        let rendered =
            serde_json::to_string_pretty(&markers).context("failed to serialize chapter markers")?;
        println!("{rendered}");
        return Ok(());
    }

    for (index, marker) in markers.iter().enumerate() {
        info!(
            index,
            ordinal = ?marker.ordinal,
            kind = marker.kind.as_str(),
            page = marker.page,
            line = marker.line_index,
            title = %marker.title,
            "chapter heading"
        );
    }
    info!(
        pages = extraction.pages.len(),
        chapters = markers.len(),
        method = %extraction.method,
        "chapter detection completed"
    );

    Ok(())
}
