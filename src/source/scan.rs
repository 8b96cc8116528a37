use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    publication::Rejection,
    source::{Authors, EntrySource, RawEntry, SourceItem},
};

/// Entries read by scanning the text for `@type{key, name = value, ...}` blocks.
///
/// This does not understand `@string` macros or cross references; bare macro names are kept as
/// their literal text (which is what lets `month = mar` work).
pub struct Scan;

static HEADER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"@\s*([A-Za-z]+)\s*[{(]").unwrap());
static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

const IGNORED_TYPES: &[&str] = &["comment", "string", "preamble"];

impl EntrySource for Scan {
    fn parse(input: &str) -> anyhow::Result<Vec<SourceItem>> {
        let headers: Vec<_> = HEADER_RE.captures_iter(input).collect();
        let mut items = Vec::with_capacity(headers.len());

        for (i, caps) in headers.iter().enumerate() {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let entry_type = caps[1].to_lowercase();
            if IGNORED_TYPES.contains(&entry_type.as_str()) {
                continue;
            }
            let end = headers
                .get(i + 1)
                .and_then(|c| c.get(0))
                .map(|m| m.start())
                .unwrap_or(input.len());
            items.push(parse_body(entry_type, &input[whole.end()..end]));
        }

        Ok(items)
    }
}

/// Parse everything after the opening delimiter of one entry.
fn parse_body(entry_type: String, body: &str) -> SourceItem {
    let mut cur = Cursor::new(body);
    let key = cur.take_while(|b| !matches!(b, b',' | b'}' | b')')).trim();
    let mut raw = RawEntry {
        key: if key.is_empty() {
            "unknown".to_string()
        } else {
            key.to_string()
        },
        entry_type,
        ..Default::default()
    };

    let malformed = |field: &str, reason: &str| Rejection::MalformedField {
        key: raw.key.clone(),
        field: field.to_string(),
        reason: reason.to_string(),
    };

    let mut fields = Vec::new();
    loop {
        cur.skip_while(|b| b.is_ascii_whitespace() || b == b',');
        match cur.peek() {
            None | Some(b'}') | Some(b')') => break,
            _ => {}
        }

        let name = cur
            .take_while(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b':' | b'.'))
            .to_lowercase();
        if name.is_empty() {
            return Err(malformed("?", "expected a field name"));
        }
        cur.skip_while(|b| b.is_ascii_whitespace());
        if cur.peek() != Some(b'=') {
            return Err(malformed(&name, "expected '='"));
        }
        cur.bump();

        let value = read_value(&mut cur).map_err(|reason| malformed(&name, reason))?;
        fields.push((name, value));
    }

    for (name, value) in fields {
        let value = WS_RE.replace_all(value.trim(), " ").into_owned();
        raw.fields.insert(name, value);
    }
    if let Some(author) = raw.field("author") {
        raw.authors = Authors::Text(author.to_string());
    }

    Ok(raw)
}

/// A value is one or more pieces joined with `#`.
fn read_value(cur: &mut Cursor<'_>) -> Result<String, &'static str> {
    let mut out = String::new();
    loop {
        cur.skip_while(|b| b.is_ascii_whitespace());
        match cur.peek() {
            Some(b'{') => {
                cur.bump();
                out.push_str(cur.balanced(b'}')?);
                cur.bump();
            }
            Some(b'"') => {
                cur.bump();
                out.push_str(cur.balanced(b'"')?);
                cur.bump();
            }
            Some(_) => {
                let bare = cur.take_while(|b| {
                    !b.is_ascii_whitespace() && !matches!(b, b',' | b'}' | b')' | b'#')
                });
                if bare.is_empty() {
                    return Err("expected a value");
                }
                out.push_str(bare);
            }
            None => return Err("unexpected end of entry"),
        }
        cur.skip_while(|b| b.is_ascii_whitespace());
        if cur.peek() == Some(b'#') {
            cur.bump();
        } else {
            return Ok(out);
        }
    }
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Cursor { src, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        self.skip_while(pred);
        &self.src[start..self.pos]
    }

    fn skip_while(&mut self, pred: impl Fn(u8) -> bool) {
        while let Some(b) = self.peek() {
            if !pred(b) {
                break;
            }
            self.bump();
        }
    }

    /// Read up to (not including) `close` at brace depth zero. Nested `{}` groups are kept.
    fn balanced(&mut self, close: u8) -> Result<&'a str, &'static str> {
        let start = self.pos;
        let mut depth = 0usize;
        while let Some(b) = self.peek() {
            match b {
                b'\\' => {
                    // An escaped delimiter never opens, closes or ends anything.
                    self.bump();
                }
                b'{' => depth += 1,
                b'}' if depth > 0 => depth -= 1,
                _ if b == close && depth == 0 => return Ok(&self.src[start..self.pos]),
                b'}' => return Err("unbalanced braces"),
                _ => {}
            }
            self.bump();
        }
        Err("unterminated value")
    }
}
