use anyhow::anyhow;
use biblatex::{Bibliography, ChunksExt, Entry};

use crate::{
    publication::Rejection,
    source::{Authors, EntrySource, Name, RawEntry, SourceItem},
};

/// Entries read through the `biblatex` parser.
pub struct Biblatex;

impl EntrySource for Biblatex {
    fn parse(input: &str) -> anyhow::Result<Vec<SourceItem>> {
        let bib = Bibliography::parse(input).map_err(|e| anyhow!("failed to parse BibTeX: {e}"))?;
        Ok(bib.iter().map(to_raw).collect())
    }
}

fn to_raw(entry: &Entry) -> SourceItem {
    let mut raw = RawEntry {
        key: entry.key.clone(),
        entry_type: entry.entry_type.to_string().to_lowercase(),
        ..Default::default()
    };

    for (name, chunks) in &entry.fields {
        raw.fields
            .insert(name.to_lowercase(), chunks.format_verbatim());
    }

    // BibLaTeX spelling of the journal field.
    if !raw.fields.contains_key("journal")
        && let Some(title) = raw.fields.get("journaltitle").cloned()
    {
        raw.fields.insert("journal".to_string(), title);
    }

    if raw.fields.contains_key("author") {
        let people = entry.author().map_err(|e| Rejection::MalformedField {
            key: entry.key.clone(),
            field: "author".to_string(),
            reason: e.to_string(),
        })?;
        raw.authors = Authors::Structured(
            people
                .into_iter()
                .map(|p| {
                    // "von" particle and "Jr." stay with the family name.
                    let family = [p.prefix.as_str(), p.name.as_str(), p.suffix.as_str()]
                        .into_iter()
                        .map(str::trim)
                        .filter(|part| !part.is_empty())
                        .collect::<Vec<_>>()
                        .join(" ");
                    Name {
                        given: p.given_name,
                        family,
                    }
                })
                .collect(),
        );
    }

    Ok(raw)
}
