use std::{fs, path::Path};

use anyhow::{Context, bail};

use crate::{
    markdown,
    publication::{self, ExtractOptions},
    report::{self, Summary},
    source::{ParserKind, SourceItem},
};

/// Convert every entry of a BibTeX file into a publication page under `out_dir`.
///
/// A missing input file is an error. A file that cannot be tokenised at all is reported and
/// nothing is written. Individual entries that are skipped or fail are reported and counted but
/// never stop the batch.
pub fn run(
    bib_path: &Path,
    out_dir: &Path,
    parser: ParserKind,
    opts: &ExtractOptions,
) -> anyhow::Result<Summary> {
    if !bib_path.exists() {
        bail!("BibTeX file '{}' not found", bib_path.display());
    }
    println!("Converting {} to Jekyll markdown files...", bib_path.display());

    let input = fs::read_to_string(bib_path)
        .with_context(|| format!("failed to read {}", bib_path.display()))?;
    let items = match parser.parse(&input) {
        Ok(items) => items,
        Err(e) => {
            report::failed(format_args!("parsing BibTeX file: {e}"));
            return Ok(Summary::default());
        }
    };
    tracing::info!(entries = items.len(), ?parser, "parsed bibliography");

    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let summary = write_all(items, out_dir, opts);
    tracing::info!(
        total = summary.total(),
        created = summary.done,
        skipped = summary.skipped,
        failed = summary.failed,
        "conversion finished"
    );
    report::finish(&summary, "publications", out_dir);
    Ok(summary)
}

/// Extract, render and write each item in order. Later files with the same name overwrite
/// earlier ones.
pub fn write_all(items: Vec<SourceItem>, out_dir: &Path, opts: &ExtractOptions) -> Summary {
    let mut summary = Summary::default();

    for item in items {
        let record = item.and_then(|raw| publication::extract(&raw, opts));
        let record = match record {
            Ok(record) => record,
            Err(rejection) if rejection.is_skip() => {
                tracing::debug!(%rejection, "skipped entry");
                report::skipped(&rejection);
                summary.skipped += 1;
                continue;
            }
            Err(rejection) => {
                tracing::debug!(%rejection, "rejected entry");
                report::failed(format_args!("processing {rejection}"));
                summary.failed += 1;
                continue;
            }
        };

        let filename = record.filename();
        let path = out_dir.join(&filename);
        if path.exists() {
            tracing::warn!(file = %filename, "overwriting existing file");
        }
        match fs::write(&path, markdown::render(&record)) {
            Ok(()) => {
                report::created(&filename, record.category);
                summary.done += 1;
            }
            Err(e) => {
                report::failed(format_args!("writing {filename}: {e}"));
                summary.failed += 1;
            }
        }
    }

    summary
}
