use anyhow::Result;
use tracing::info;

use crate::cli::ScriptArgs;
use crate::commands::{open_existing_store, select_reading};
use crate::speech::{ScriptRequest, SentenceSplitter};
use crate::util::{ensure_directory, now_utc_string, write_json_pretty, write_text};

pub fn run(args: ScriptArgs) -> Result<()> {
    let connection = open_existing_store(&args.cache_root, args.db_path.as_ref())?;
    let selection = select_reading(&connection, &args.doc_id, args.chapter)?;

    let splitter = SentenceSplitter::new()?;
    let script = splitter.build_script(ScriptRequest {
        doc_id: &args.doc_id,
        chapter_index: selection.chapter_index,
        title: &selection.title,
        text: &selection.text,
        rate: args.rate.rate(),
        voice: args.voice.clone(),
        max_chars: args.max_chars,
        generated_at: now_utc_string(),
    });

    let unit = match selection.chapter_index {
        Some(index) => format!("chapter_{index:03}"),
        None => "full".to_string(),
    };
    let out_dir = args.out_dir.clone().unwrap_or_else(|| {
        args.cache_root
            .join("scripts")
            .join(&args.doc_id)
            .join(&unit)
    });
    ensure_directory(&out_dir)?;

    for chunk in &script.chunks {
        write_text(
            &out_dir.join(format!("chunk_{:03}.txt", chunk.index)),
            &chunk.text,
        )?;
    }
    write_json_pretty(&out_dir.join("script.json"), &script)?;

    info!(
        path = %out_dir.display(),
        title = %script.title,
        chunks = script.chunks.len(),
        words = script.total_words,
        rate = script.rate.as_str(),
        minutes = script.total_minutes,
        "wrote narration script"
    );

    Ok(())
}
