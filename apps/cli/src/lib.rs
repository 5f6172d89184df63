pub mod cli;
pub mod logging;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use quizcard_core::{generate_notes, render_notes, Document};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub use crate::cli::Cli;

/// Paths written by a run.
#[derive(Debug)]
pub struct Output {
    pub notes_file: PathBuf,
    pub note_count: usize,
    pub words_json: Option<PathBuf>,
}

pub fn run(cli: Cli) -> Result<()> {
    let _guard = logging::init(cli.log_level, cli.log_file.as_deref())?;
    execute(&cli)?;
    Ok(())
}

/// Build the document, generate notes and write the export files.
pub fn execute(cli: &Cli) -> Result<Output> {
    let text = cli.read_input()?;
    let config = cli.document_config()?;
    let options = cli.note_options();
    tracing::debug!(
        config = %serde_json::to_string(&config)?,
        options = %serde_json::to_string(&options)?,
        "effective options"
    );
    let doc = Document::new(&text, &config).context("invalid document configuration")?;

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let notes = generate_notes(&doc, cli.limit, &options, &mut rng);
    let export = cli.note_export();
    let rendered = render_notes(&notes, &export, &mut rng);

    fs::create_dir_all(&cli.output_dir).with_context(|| {
        format!("failed to create output directory {}", cli.output_dir.display())
    })?;
    let notes_file = cli.output_dir.join(export.file_name());
    fs::write(&notes_file, rendered)
        .with_context(|| format!("failed to write notes to {}", notes_file.display()))?;
    tracing::info!(
        path = %notes_file.display(),
        notes = notes.len(),
        "wrote anki notes"
    );

    if let Some(path) = &cli.words_json {
        let json = serde_json::to_string_pretty(&doc.word_summaries())
            .context("failed to serialize word summaries")?;
        fs::write(path, json)
            .with_context(|| format!("failed to write word summaries to {}", path.display()))?;
        tracing::info!(path = %path.display(), words = doc.word_count(), "wrote word summaries");
    }

    Ok(Output {
        notes_file,
        note_count: notes.len(),
        words_json: cli.words_json.clone(),
    })
}
