use std::{fmt::Display, path::Path};

use owo_colors::{OwoColorize, Stream};

/// Running tally of what happened to each item in a batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub done: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl Summary {
    pub fn total(&self) -> usize {
        self.done + self.skipped + self.failed
    }
}

pub fn created(file: &str, detail: impl Display) {
    println!(
        "{} Created: {file} ({detail})",
        "✓".if_supports_color(Stream::Stdout, |t| t.green())
    );
}

pub fn skipped(reason: impl Display) {
    println!(
        "{} Warning: {reason}, skipping...",
        "⚠".if_supports_color(Stream::Stdout, |t| t.yellow())
    );
}

pub fn failed(what: impl Display) {
    println!(
        "{} Error {what}",
        "✗".if_supports_color(Stream::Stdout, |t| t.red())
    );
}

pub fn patched(field: &str, file: &str) {
    println!(
        "{} {field} added: {file}",
        "✓".if_supports_color(Stream::Stdout, |t| t.green())
    );
}

pub fn unchanged(file: &str) {
    println!(
        "{} already present: {file}",
        "–".if_supports_color(Stream::Stdout, |t| t.dimmed())
    );
}

/// Final lines of a conversion run.
pub fn finish(summary: &Summary, noun: &str, out_dir: &Path) {
    println!();
    println!(
        "Successfully converted {} {noun}!",
        summary.done.if_supports_color(Stream::Stdout, |t| t.bold())
    );
    println!("Files saved to: {}", out_dir.display());
    counts(summary);
}

/// Compact `✓ / ⚠ / ✗` count line.
pub fn counts(summary: &Summary) {
    println!(
        "{} {}  {} {}  {} {}",
        "✓".if_supports_color(Stream::Stdout, |t| t.green()),
        summary.done,
        "⚠".if_supports_color(Stream::Stdout, |t| t.yellow()),
        summary.skipped,
        "✗".if_supports_color(Stream::Stdout, |t| t.red()),
        summary.failed,
    );
}
