use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::source::RawEntry;

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b([0-9]{4})\b").unwrap());
static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{4})(?:-([0-9]{1,2})(?:-([0-9]{1,2}))?)?").unwrap());

/// `YYYY-MM-DD` for an entry. Missing or unreadable parts fall back to `default_year`, January,
/// and the first of the month. The result is not checked against the calendar.
pub fn extract(entry: &RawEntry, default_year: &str) -> String {
    let iso = entry
        .field("date")
        .and_then(|d| ISO_DATE_RE.captures(d.trim()));
    let from_iso = |i: usize| iso.as_ref().and_then(|c| c.get(i)).map(|m| m.as_str());

    let (year, month, day) = match entry.field("year").and_then(year_of) {
        Some(year) => (year, entry.field("month"), entry.field("day")),
        None => match from_iso(1) {
            Some(year) => (
                year,
                entry.field("month").or(from_iso(2)),
                entry.field("day").or(from_iso(3)),
            ),
            None => (default_year, entry.field("month"), entry.field("day")),
        },
    };

    let date = format!("{year}-{}-{}", month_of(month), day_of(day));
    if NaiveDate::parse_from_str(&date, "%Y-%m-%d").is_err() {
        tracing::warn!(key = %entry.key, %date, "date is not a real calendar day");
    }
    date
}

fn year_of(raw: &str) -> Option<&str> {
    YEAR_RE
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Two-digit month for a BibTeX month value: a number, or an English month name matched on its
/// first three letters.
pub fn month_of(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|m| !m.is_empty()) else {
        return "01".to_string();
    };
    if let Some(padded) = pad_number(raw) {
        return padded;
    }
    let lower = raw.to_lowercase();
    MONTHS
        .iter()
        .position(|m| lower.len() >= 3 && lower.starts_with(m))
        .map(|i| format!("{:02}", i + 1))
        .unwrap_or_else(|| "01".to_string())
}

pub fn day_of(raw: Option<&str>) -> String {
    raw.map(str::trim)
        .and_then(pad_number)
        .unwrap_or_else(|| "01".to_string())
}

/// One digit gets a leading zero, two digits pass through, anything else is rejected.
fn pad_number(raw: &str) -> Option<String> {
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match raw.len() {
        1 => Some(format!("0{raw}")),
        2 => Some(raw.to_string()),
        _ => None,
    }
}
