use std::{fs, path::Path};

use anyhow::{Context, bail};
use serde_yaml::{Mapping, Value};

use crate::report::{self, Summary};

pub const DEFAULT_TEASER: &str = "/images/default-thumbnail.png";
const DEFAULT_CATEGORY: &str = "conferences";

const COLUMNS: [&str; 10] = [
    "pub_date",
    "title",
    "authors",
    "venue",
    "url_slug",
    "paper_url",
    "video_url",
    "code_url",
    "image_path",
    "category",
];

/// One data row, with empty cells as `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Row {
    /// Line of the table the row starts on.
    pub line: u64,
    pub pub_date: Option<String>,
    pub title: Option<String>,
    pub authors: Option<String>,
    pub venue: Option<String>,
    pub url_slug: Option<String>,
    pub paper_url: Option<String>,
    pub video_url: Option<String>,
    pub code_url: Option<String>,
    pub image_path: Option<String>,
    pub category: Option<String>,
}

impl Row {
    /// The row as a page, when it has the date, slug and title a page needs.
    pub fn page(&self) -> Option<Page<'_>> {
        Some(Page {
            date: self.pub_date.as_deref()?,
            slug: self.url_slug.as_deref()?,
            title: self.title.as_deref()?,
            row: self,
        })
    }
}

/// A row known to carry the fields that name a page.
#[derive(Clone, Copy, Debug)]
pub struct Page<'a> {
    pub date: &'a str,
    pub slug: &'a str,
    pub title: &'a str,
    pub row: &'a Row,
}

impl Page<'_> {
    pub fn filename(&self) -> String {
        format!("{}-{}.md", self.date, self.slug)
    }

    pub fn category(&self) -> &str {
        self.row.category.as_deref().unwrap_or(DEFAULT_CATEGORY)
    }

    /// Front matter for the page, in page order.
    pub fn front_matter(&self, teaser: &str) -> Mapping {
        let row = self.row;
        let mut fm = Mapping::new();
        let mut put = |k: &str, v: Value| {
            fm.insert(Value::from(k), v);
        };

        put("title", Value::from(self.title));
        put("collection", Value::from("publications"));
        put("category", Value::from(self.category()));
        put("date", Value::from(self.date));
        put("permalink", Value::from(format!("/publication/{}", self.slug)));
        if let Some(authors) = &row.authors {
            put("authors", Value::from(authors.as_str()));
        }
        if let Some(venue) = &row.venue {
            put("venue", Value::from(venue.as_str()));
        }

        let mut header = Mapping::new();
        header.insert(
            Value::from("teaser"),
            Value::from(row.image_path.as_deref().unwrap_or(teaser)),
        );
        put("header", Value::Mapping(header));

        let buttons: Vec<Value> = [
            ("paper", &row.paper_url),
            ("video", &row.video_url),
            ("code", &row.code_url),
        ]
        .into_iter()
        .filter_map(|(kind, url)| {
            url.as_ref().map(|url| {
                let mut button = Mapping::new();
                button.insert(Value::from("type"), Value::from(kind));
                button.insert(Value::from("url"), Value::from(url.as_str()));
                Value::Mapping(button)
            })
        })
        .collect();
        if !buttons.is_empty() {
            put("buttons", Value::Sequence(buttons));
        }

        fm
    }
}

/// Read a tab-separated table into rows. The header must name every column in [`COLUMNS`]; extra
/// columns are ignored, short rows are padded with empty cells and quoted cells are unquoted.
pub fn parse(input: &str) -> anyhow::Result<Vec<Row>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input.as_bytes());
    let names = reader.headers().context("failed to read header")?.clone();
    if names.iter().all(str::is_empty) {
        bail!("table is empty");
    }

    let mut index = [0usize; COLUMNS.len()];
    for (slot, column) in index.iter_mut().zip(COLUMNS) {
        *slot = names
            .iter()
            .position(|n| n == column)
            .with_context(|| format!("missing required column '{column}'"))?;
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.context("failed to read row")?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let cell = |i: usize| {
            record
                .get(index[i])
                .filter(|c| !c.is_empty())
                .map(str::to_string)
        };
        rows.push(Row {
            line: record.position().map_or(0, |p| p.line()),
            pub_date: cell(0),
            title: cell(1),
            authors: cell(2),
            venue: cell(3),
            url_slug: cell(4),
            paper_url: cell(5),
            video_url: cell(6),
            code_url: cell(7),
            image_path: cell(8),
            category: cell(9),
        });
    }
    Ok(rows)
}

/// Write one page per row of the table at `tsv_path`.
pub fn run(tsv_path: &Path, out_dir: &Path, teaser: &str) -> anyhow::Result<Summary> {
    if !tsv_path.exists() {
        bail!("TSV file '{}' not found", tsv_path.display());
    }
    let input = fs::read_to_string(tsv_path)
        .with_context(|| format!("failed to read {}", tsv_path.display()))?;
    let rows = parse(&input).with_context(|| format!("invalid table {}", tsv_path.display()))?;
    tracing::info!(rows = rows.len(), "parsed publication table");

    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let mut summary = Summary::default();
    for row in &rows {
        let line = row.line;
        let Some(page) = row.page() else {
            report::skipped(format_args!("row {line} needs pub_date, title and url_slug"));
            summary.skipped += 1;
            continue;
        };
        let (date, slug) = (page.date, page.slug);
        if slug.contains(['/', '\\']) || date.contains(['/', '\\']) {
            report::failed(format_args!("row {line}: '{date}-{slug}' is not a file name"));
            summary.failed += 1;
            continue;
        }

        let filename = page.filename();
        let fm = Value::Mapping(page.front_matter(teaser));
        let written = serde_yaml::to_string(&fm)
            .map_err(anyhow::Error::from)
            .and_then(|yaml| {
                fs::write(out_dir.join(&filename), format!("---\n{yaml}---\n"))?;
                Ok(())
            });
        match written {
            Ok(()) => {
                report::created(&filename, page.category());
                summary.done += 1;
            }
            Err(e) => {
                report::failed(format_args!("writing {filename}: {e}"));
                summary.failed += 1;
            }
        }
    }

    report::finish(&summary, "publications", out_dir);
    Ok(summary)
}
