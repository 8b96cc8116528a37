use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, bail};
use serde_yaml::{Mapping, Value};

use crate::report::{self, Summary};

pub const DEFAULT_CATEGORY: &str = "manuscripts";

/// A markdown file split into its YAML front matter and the text after it.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub meta: Mapping,
    pub body: String,
}

impl Document {
    /// Split `text` at its `---` fences. Text without front matter is all body.
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let Some((yaml, body)) = split(text) else {
            return Ok(Document {
                meta: Mapping::new(),
                body: text.to_string(),
            });
        };
        let meta = match serde_yaml::from_str::<Value>(yaml).context("invalid front matter")? {
            Value::Mapping(m) => m,
            Value::Null => Mapping::new(),
            other => bail!("front matter is not a mapping: {other:?}"),
        };
        Ok(Document {
            meta,
            body: body.to_string(),
        })
    }

    pub fn render(&self) -> anyhow::Result<String> {
        let yaml = if self.meta.is_empty() {
            String::new()
        } else {
            serde_yaml::to_string(&self.meta)?
        };
        Ok(format!("---\n{yaml}---\n{}", self.body))
    }
}

/// `(yaml, body)` when `text` opens with a `---` line and has a closing one.
fn split(text: &str) -> Option<(&str, &str)> {
    let rest = text
        .strip_prefix("---\n")
        .or_else(|| text.strip_prefix("---\r\n"))?;
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// A metadata fix-up that can be applied to a publication's front matter.
pub trait Patch {
    /// Field name used in progress messages.
    fn field(&self) -> &str;
    /// Apply the patch. Returns `false` when the field was already there and nothing changed.
    fn apply(&self, meta: &mut Mapping) -> bool;
}

/// Adds a top-level `category` when there is none.
pub struct AddCategory {
    pub category: String,
}

impl Patch for AddCategory {
    fn field(&self) -> &str {
        "category"
    }

    fn apply(&self, meta: &mut Mapping) -> bool {
        if meta.contains_key("category") {
            return false;
        }
        meta.insert(Value::from("category"), Value::from(self.category.as_str()));
        true
    }
}

/// Adds `header.teaser` when there is none, keeping any other `header` keys.
pub struct AddTeaser {
    pub teaser: String,
}

impl Patch for AddTeaser {
    fn field(&self) -> &str {
        "teaser"
    }

    fn apply(&self, meta: &mut Mapping) -> bool {
        let teaser = (Value::from("teaser"), Value::from(self.teaser.as_str()));
        match meta.get_mut("header") {
            Some(Value::Mapping(header)) if header.contains_key("teaser") => false,
            Some(Value::Mapping(header)) => {
                header.insert(teaser.0, teaser.1);
                true
            }
            Some(other) => {
                *other = Value::Mapping(Mapping::from_iter([teaser]));
                true
            }
            None => {
                meta.insert(
                    Value::from("header"),
                    Value::Mapping(Mapping::from_iter([teaser])),
                );
                true
            }
        }
    }
}

/// Apply `patch` to one file. Returns whether the file was rewritten.
pub fn patch_file(path: &Path, patch: &dyn Patch) -> anyhow::Result<bool> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mut doc = Document::parse(&text)?;
    if !patch.apply(&mut doc.meta) {
        return Ok(false);
    }
    fs::write(path, doc.render()?)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(true)
}

/// `*.md` files directly inside `dir`, sorted by name.
pub fn markdown_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("directory '{}' not found", dir.display());
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("failed to list {}", dir.display()))? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == "md") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Apply `patch` to every markdown file in `dir`, reporting each one.
pub fn run(dir: &Path, patch: &dyn Patch) -> anyhow::Result<Summary> {
    let mut summary = Summary::default();
    for path in markdown_files(dir)? {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match patch_file(&path, patch) {
            Ok(true) => {
                report::patched(patch.field(), &name);
                summary.done += 1;
            }
            Ok(false) => {
                report::unchanged(&name);
                summary.skipped += 1;
            }
            Err(e) => {
                tracing::debug!(file = %path.display(), error = ?e, "patch failed");
                report::failed(format_args!("patching {name}: {e:#}"));
                summary.failed += 1;
            }
        }
    }
    tracing::info!(field = patch.field(), files = summary.total(), "patching finished");
    report::counts(&summary);
    Ok(summary)
}
