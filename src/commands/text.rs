use anyhow::Result;
use tracing::info;

use crate::cli::TextArgs;
use crate::commands::{open_existing_store, select_reading};

pub fn run(args: TextArgs) -> Result<()> {
    let connection = open_existing_store(&args.cache_root, args.db_path.as_ref())?;

    let selection = select_reading(&connection, &args.doc_id, args.chapter)?;
    info!(
        doc_id = %args.doc_id,
        chapter = ?selection.chapter_index,
        title = %selection.title,
        "printing text"
    );

    if args.paragraphs {
        println!("{}", selection.paragraphs.join("\n\n"));
    } else {
        println!("{}", selection.text);
    }

    Ok(())
}
