use once_cell::sync::Lazy;
use regex::Regex;

use crate::source::{Authors, Name};

static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static SLUG_STRIP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9\s-]").unwrap());
static SLUG_JOIN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-\s]+").unwrap());
static AND_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+and\s+").unwrap());

/// Make a BibTeX value safe to put inside a double-quoted YAML scalar: drop grouping braces and
/// TeX escapes, escape embedded quotes, and fold whitespace onto one line.
pub fn clean(text: &str) -> String {
    let stripped: String = text
        .chars()
        .filter(|c| !matches!(c, '{' | '}' | '\\'))
        .collect();
    let escaped = stripped.replace('"', "\\\"");
    WS_RE.replace_all(escaped.trim(), " ").into_owned()
}

/// URL- and filesystem-safe identifier for `title`.
///
/// The result only contains `[a-z0-9-]`, never starts or ends with `-` and never has two `-` in a
/// row. With `limit`, the slug is cut to at most that many characters before trimming.
pub fn slug(title: &str, limit: Option<usize>) -> String {
    let lower = title.to_lowercase();
    let kept = SLUG_STRIP_RE.replace_all(&lower, "");
    let mut joined = SLUG_JOIN_RE.replace_all(&kept, "-").into_owned();
    if let Some(limit) = limit {
        // Only ASCII survives the strip above, so byte and char offsets agree.
        joined.truncate(limit.min(joined.len()));
    }
    joined.trim_matches('-').to_string()
}

/// Display form of all authors joined with `", "`.
pub fn authors(authors: &Authors) -> String {
    match authors {
        Authors::None => String::new(),
        Authors::Structured(names) => names
            .iter()
            .map(display_name)
            .filter(|n| !n.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Authors::Text(text) => AND_RE
            .split(text.trim())
            .map(|name| clean(&flip_name(name)))
            .filter(|n| !n.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
    }
}

fn display_name(name: &Name) -> String {
    clean(format!("{} {}", name.given.trim(), name.family.trim()).trim())
}

/// `Last, First` becomes `First Last`; anything else is left alone.
fn flip_name(name: &str) -> String {
    match name.split_once(',') {
        Some((last, first)) if !first.trim().is_empty() => {
            format!("{} {}", first.trim(), last.trim())
        }
        Some((last, _)) => last.trim().to_string(),
        None => name.trim().to_string(),
    }
}
