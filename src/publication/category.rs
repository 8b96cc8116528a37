use std::fmt;

use crate::source::RawEntry;

/// Which section of the publication list an entry belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Manuscripts,
    Conferences,
    Journals,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Manuscripts => "manuscripts",
            Category::Conferences => "conferences",
            Category::Journals => "journals",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const PREPRINT_HINTS: &[&str] = &["arxiv", "preprint", "submitted", "under review"];
const CONFERENCE_HINTS: &[&str] = &["conference", "proceedings", "workshop", "symposium"];
const JOURNAL_HINTS: &[&str] = &["journal", "transactions", "letters"];

const CONFERENCE_TYPES: &[&str] = &["inproceedings", "conference"];
const JOURNAL_TYPES: &[&str] = &["article", "journal"];

/// Classify an entry.
///
/// NOTE: Ordering matters. A preprint-looking venue wins over everything, then the entry type,
/// then keywords in the venue, and finally everything else is a manuscript.
pub fn determine(entry_type: &str, venue: &str) -> Category {
    let entry_type = entry_type.to_lowercase();
    let venue = venue.to_lowercase();
    let mentions = |hints: &[&str]| hints.iter().any(|h| venue.contains(h));

    if mentions(PREPRINT_HINTS) {
        Category::Manuscripts
    } else if CONFERENCE_TYPES.contains(&entry_type.as_str()) {
        Category::Conferences
    } else if JOURNAL_TYPES.contains(&entry_type.as_str()) {
        Category::Journals
    } else if mentions(CONFERENCE_HINTS) {
        Category::Conferences
    } else if mentions(JOURNAL_HINTS) {
        Category::Journals
    } else {
        Category::Manuscripts
    }
}

/// Raw venue text, picked by entry type: `booktitle` for proceedings, `journal` for articles,
/// and otherwise the first of `booktitle`, `journal`, `venue`, `publisher` that is present.
pub fn venue(entry: &RawEntry) -> &str {
    let entry_type = entry.entry_type.to_lowercase();
    let pick = if CONFERENCE_TYPES.contains(&entry_type.as_str()) {
        entry.field("booktitle")
    } else if JOURNAL_TYPES.contains(&entry_type.as_str()) {
        entry.field("journal")
    } else {
        ["booktitle", "journal", "venue", "publisher"]
            .iter()
            .find_map(|f| entry.field(f))
    };
    pick.unwrap_or_default()
}
