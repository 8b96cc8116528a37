use std::collections::BTreeMap;

use clap::ValueEnum;

use crate::publication::Rejection;

pub mod scan;
pub mod structured;

/// A bibliography entry before any normalisation: the entry type, its citation key, and the raw
/// field values keyed by lowercase field name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawEntry {
    pub key: String,
    pub entry_type: String,
    pub fields: BTreeMap<String, String>,
    pub authors: Authors,
}

/// Authors as the source was able to provide them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Authors {
    #[default]
    None,
    /// Names already split into given and family parts by a BibTeX parser.
    Structured(Vec<Name>),
    /// The `author` field verbatim.
    Text(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Name {
    pub given: String,
    pub family: String,
}

impl RawEntry {
    /// The value of `field`, or `None` when it is missing or blank.
    pub fn field(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .map(|v| v.as_str())
            .filter(|v| !v.trim().is_empty())
    }
}

/// One item produced by a source: either a usable raw entry or the reason it could not be read.
pub type SourceItem = Result<RawEntry, Rejection>;

/// Something that can turn the text of a `.bib` file into raw entries.
///
/// A whole-file error means nothing at all could be tokenised; anything that only affects a
/// single entry is reported through its own [`SourceItem`] instead so the batch can go on.
pub trait EntrySource {
    fn parse(input: &str) -> anyhow::Result<Vec<SourceItem>>;
}

/// Which [`EntrySource`] to read a BibTeX file with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ParserKind {
    /// Full BibTeX/BibLaTeX parser with structured author names
    #[default]
    Biblatex,
    /// Lenient field scanner that keeps author text as written
    Scan,
}

impl ParserKind {
    pub fn parse(self, input: &str) -> anyhow::Result<Vec<SourceItem>> {
        match self {
            ParserKind::Biblatex => structured::Biblatex::parse(input),
            ParserKind::Scan => scan::Scan::parse(input),
        }
    }

    /// Slug length cap historically paired with each parser.
    pub fn default_slug_limit(self) -> Option<usize> {
        match self {
            ParserKind::Biblatex => None,
            ParserKind::Scan => Some(50),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_treats_blank_as_missing() {
        let mut entry = RawEntry::default();
        entry.fields.insert("note".into(), "   ".into());
        entry.fields.insert("year".into(), "2021".into());
        assert_eq!(entry.field("note"), None);
        assert_eq!(entry.field("year"), Some("2021"));
        assert_eq!(entry.field("title"), None);
    }

    #[test]
    fn parsers_agree_on_simple_entry() {
        let bib = "@article{k, title = {Same Thing}, journal = {J. Things}, year = {2020}}";
        let a = ParserKind::Biblatex.parse(bib).unwrap();
        let b = ParserKind::Scan.parse(bib).unwrap();
        let (a, b) = (a[0].as_ref().unwrap(), b[0].as_ref().unwrap());
        assert_eq!(a.entry_type, b.entry_type);
        assert_eq!(a.field("title"), b.field("title"));
        assert_eq!(a.field("journal"), b.field("journal"));
        assert_eq!(a.field("year"), b.field("year"));
    }

    #[test]
    fn parsers_agree_on_name_particles() {
        let bib = "@misc{k, title = {Stars}, author = {van Gogh, Vincent and Ludwig van Beethoven}}";
        let a = ParserKind::Biblatex.parse(bib).unwrap();
        let b = ParserKind::Scan.parse(bib).unwrap();
        let (a, b) = (a[0].as_ref().unwrap(), b[0].as_ref().unwrap());
        let expected = "Vincent van Gogh, Ludwig van Beethoven";
        assert_eq!(crate::publication::text::authors(&a.authors), expected);
        assert_eq!(crate::publication::text::authors(&b.authors), expected);
    }
}
