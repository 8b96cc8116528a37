use std::fmt;

use thiserror::Error;

use crate::source::RawEntry;

pub mod category;
pub mod date;
pub mod text;

pub use category::Category;

/// A publication normalised for the website, ready to be rendered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicationRecord {
    pub title: String,
    pub authors: String,
    pub venue: String,
    /// Always `YYYY-MM-DD`.
    pub date: String,
    pub category: Category,
    pub url_slug: String,
    pub links: Vec<Link>,
    /// Abstract, else note, else empty.
    pub body: String,
}

impl PublicationRecord {
    /// Name of the markdown file this record is written to.
    pub fn filename(&self) -> String {
        format!("{}-{}.md", self.date, self.url_slug)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Link {
    pub kind: LinkKind,
    pub url: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkKind {
    Paper,
    Video,
    Code,
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LinkKind::Paper => "paper",
            LinkKind::Video => "video",
            LinkKind::Code => "code",
        })
    }
}

/// Why an entry did not become a publication. None of these stop a batch.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("no title found for entry {key}")]
    MissingTitle { key: String },
    #[error("entry {key} has no usable characters for a URL slug")]
    EmptySlug { key: String },
    #[error("entry {key}: malformed field '{field}': {reason}")]
    MalformedField {
        key: String,
        field: String,
        reason: String,
    },
}

impl Rejection {
    /// A missing title is an expected skip; everything else is a failure.
    pub fn is_skip(&self) -> bool {
        matches!(self, Rejection::MissingTitle { .. })
    }
}

/// Year used for entries without one unless `--default-year` says otherwise.
pub const DEFAULT_YEAR: &str = "2024";

/// Knobs that differ between runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Cut slugs to this many characters. `None` keeps them whole.
    pub slug_limit: Option<usize>,
    /// Year used when an entry carries none.
    pub default_year: String,
}

#[cfg(test)]
impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions {
            slug_limit: None,
            default_year: DEFAULT_YEAR.to_string(),
        }
    }
}

/// Turn one raw entry into a publication record.
pub fn extract(entry: &RawEntry, opts: &ExtractOptions) -> Result<PublicationRecord, Rejection> {
    let title = text::clean(entry.field("title").unwrap_or_default());
    if title.is_empty() {
        return Err(Rejection::MissingTitle {
            key: entry.key.clone(),
        });
    }

    let mut url_slug = text::slug(&title, opts.slug_limit);
    if url_slug.is_empty() {
        url_slug = text::slug(&entry.key, opts.slug_limit);
        tracing::debug!(key = %entry.key, %url_slug, "title has no slug characters, using the key");
    }
    if url_slug.is_empty() {
        return Err(Rejection::EmptySlug {
            key: entry.key.clone(),
        });
    }

    let venue = text::clean(category::venue(entry));
    let category = category::determine(&entry.entry_type, &venue);
    let body = entry
        .field("abstract")
        .or_else(|| entry.field("note"))
        .map(text::clean)
        .unwrap_or_default();

    Ok(PublicationRecord {
        authors: text::authors(&entry.authors),
        date: date::extract(entry, &opts.default_year),
        links: links(entry),
        title,
        venue,
        category,
        url_slug,
        body,
    })
}

/// Paper, video and code links, in that order, for whichever are present.
pub fn links(entry: &RawEntry) -> Vec<Link> {
    let mut links = Vec::new();

    if let Some(paper) = entry.field("url").or_else(|| entry.field("doi")) {
        let paper = paper.trim();
        let url = if paper.starts_with("10.") {
            format!("https://doi.org/{paper}")
        } else {
            paper.to_string()
        };
        links.push(Link {
            kind: LinkKind::Paper,
            url,
        });
    }
    if let Some(video) = entry.field("video") {
        links.push(Link {
            kind: LinkKind::Video,
            url: video.trim().to_string(),
        });
    }
    if let Some(code) = entry.field("code").or_else(|| entry.field("github")) {
        links.push(Link {
            kind: LinkKind::Code,
            url: code.trim().to_string(),
        });
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{EntrySource, scan::Scan, structured::Biblatex};

    const WIDGETS: &str = "@inproceedings{k1, title={Fast Thing}, author={Jane A. Doe}, \
                           booktitle={Proc. of Workshop on Widgets}, year={2023}, month={mar}}";

    fn first<S: EntrySource>(bib: &str) -> RawEntry {
        S::parse(bib).unwrap().remove(0).unwrap()
    }

    fn raw(entry_type: &str, fields: &[(&str, &str)]) -> RawEntry {
        let mut e = RawEntry {
            key: "key".into(),
            entry_type: entry_type.into(),
            ..Default::default()
        };
        for (k, v) in fields {
            e.fields.insert(k.to_string(), v.to_string());
        }
        e
    }

    #[test]
    fn widgets_scenario_through_both_sources() {
        for entry in [first::<Biblatex>(WIDGETS), first::<Scan>(WIDGETS)] {
            let rec = extract(&entry, &ExtractOptions::default()).unwrap();
            assert_eq!(rec.title, "Fast Thing");
            assert_eq!(rec.authors, "Jane A. Doe");
            assert_eq!(rec.venue, "Proc. of Workshop on Widgets");
            assert_eq!(rec.date, "2023-03-01");
            assert_eq!(rec.category, Category::Conferences);
            assert_eq!(rec.url_slug, "fast-thing");
            assert_eq!(rec.filename(), "2023-03-01-fast-thing.md");
            assert!(rec.links.is_empty());
            assert_eq!(rec.body, "");
        }
    }

    #[test]
    fn arxiv_journal_is_a_manuscript() {
        let entry = first::<Biblatex>("@article{a, title={P}, journal={arXiv preprint}, year={2022}}");
        let rec = extract(&entry, &ExtractOptions::default()).unwrap();
        assert_eq!(rec.category, Category::Manuscripts);
        assert_eq!(rec.date, "2022-01-01");
    }

    #[test]
    fn missing_or_blank_title_is_rejected() {
        let opts = ExtractOptions::default();
        let err = extract(&raw("article", &[("year", "2020")]), &opts).unwrap_err();
        assert_eq!(err, Rejection::MissingTitle { key: "key".into() });
        assert!(err.is_skip());
        let err = extract(&raw("article", &[("title", "{}")]), &opts).unwrap_err();
        assert!(matches!(err, Rejection::MissingTitle { .. }));
    }

    #[test]
    fn unsluggable_title_falls_back_to_key_then_rejects() {
        let opts = ExtractOptions::default();
        let rec = extract(&raw("misc", &[("title", "深層学習")]), &opts).unwrap();
        assert_eq!(rec.url_slug, "key");

        let mut entry = raw("misc", &[("title", "深層学習")]);
        entry.key = "学習".into();
        let err = extract(&entry, &opts).unwrap_err();
        assert!(matches!(err, Rejection::EmptySlug { .. }));
        assert!(!err.is_skip());
    }

    #[test]
    fn doi_becomes_a_resolver_link() {
        let links = links(&raw("misc", &[("doi", "10.1000/xyz")]));
        assert_eq!(
            links,
            vec![Link {
                kind: LinkKind::Paper,
                url: "https://doi.org/10.1000/xyz".into()
            }]
        );
    }

    #[test]
    fn url_wins_over_doi_and_links_keep_order() {
        let entry = raw(
            "misc",
            &[
                ("github", "https://github.com/x/y"),
                ("video", "https://youtu.be/v"),
                ("doi", "10.1/z"),
                ("url", "https://example.org/paper.pdf"),
            ],
        );
        let kinds: Vec<_> = links(&entry).into_iter().map(|l| (l.kind, l.url)).collect();
        assert_eq!(
            kinds,
            vec![
                (LinkKind::Paper, "https://example.org/paper.pdf".to_string()),
                (LinkKind::Video, "https://youtu.be/v".to_string()),
                (LinkKind::Code, "https://github.com/x/y".to_string()),
            ]
        );
    }

    #[test]
    fn code_field_beats_github() {
        let entry = raw("misc", &[("code", "https://c"), ("github", "https://g")]);
        assert_eq!(links(&entry)[0].url, "https://c");
    }

    #[test]
    fn abstract_then_note_for_body() {
        let opts = ExtractOptions::default();
        let both = raw("misc", &[("title", "T"), ("abstract", "An {abstract}"), ("note", "n")]);
        assert_eq!(extract(&both, &opts).unwrap().body, "An abstract");
        let note = raw("misc", &[("title", "T"), ("note", "Best \"paper\"")]);
        assert_eq!(extract(&note, &opts).unwrap().body, "Best \\\"paper\\\"");
    }

    #[test]
    fn slug_limit_is_honoured() {
        let title = "A very long title that keeps going and going well past fifty characters";
        let opts = ExtractOptions {
            slug_limit: Some(50),
            ..Default::default()
        };
        let rec = extract(&raw("misc", &[("title", title)]), &opts).unwrap();
        assert!(rec.url_slug.len() <= 50);
        assert!(!rec.url_slug.ends_with('-'));
        let whole = extract(&raw("misc", &[("title", title)]), &ExtractOptions::default()).unwrap();
        assert!(whole.url_slug.len() > 50);
        assert!(whole.url_slug.starts_with(&rec.url_slug));
    }

    #[test]
    fn category_is_always_known() {
        proptest::proptest!(|(ty in "[a-z]{0,14}", venue in "\\PC{0,40}", title in "[A-Za-z ]{1,20}[A-Za-z]")| {
            let entry = raw(&ty, &[("title", &title), ("venue", &venue)]);
            let rec = extract(&entry, &ExtractOptions::default()).unwrap();
            proptest::prop_assert!(
                ["manuscripts", "conferences", "journals"].contains(&rec.category.as_str())
            );
        })
    }
}
