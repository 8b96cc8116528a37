use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::{frontmatter, publication, source::ParserKind, tsv};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert BibTeX entries to Jekyll markdown files for Academic Pages
    Convert {
        /// Path to BibTeX file
        #[arg(value_name = "BIBTEX_FILE")]
        bibtex_file: PathBuf,
        /// Output directory for markdown files
        #[arg(short, long, default_value = "../_publications/")]
        output: PathBuf,
        /// How to read the BibTeX file
        #[arg(long, value_enum, default_value_t = ParserKind::Biblatex)]
        parser: ParserKind,
        /// Cut URL slugs to at most this many characters (0 for no limit) [default: none for
        /// biblatex, 50 for scan]
        #[arg(long, value_name = "N")]
        slug_max_len: Option<usize>,
        /// Year used for entries without one
        #[arg(long, default_value = publication::DEFAULT_YEAR, value_parser = parse_year)]
        default_year: String,
    },
    /// Generate publication pages from a tab-separated table
    Tsv {
        /// Path to the TSV file
        #[arg(value_name = "TSV_FILE")]
        tsv_file: PathBuf,
        /// Output directory for markdown files
        #[arg(short, long, default_value = "../_publications")]
        output: PathBuf,
        /// Teaser image used for rows without one
        #[arg(long, default_value = tsv::DEFAULT_TEASER)]
        default_teaser: String,
    },
    /// Add a default `category` to publications that lack one
    AddCategory {
        #[arg(value_name = "DIR", default_value = "_publications")]
        dir: PathBuf,
        #[arg(long, default_value = frontmatter::DEFAULT_CATEGORY)]
        category: String,
    },
    /// Add a default `header.teaser` to publications that lack one
    AddTeaser {
        #[arg(value_name = "DIR", default_value = "_publications")]
        dir: PathBuf,
        #[arg(long, default_value = tsv::DEFAULT_TEASER)]
        teaser: String,
    },
}

impl Command {
    /// Slug limit for `convert`: an explicit `--slug-max-len` wins, otherwise the parser's own.
    pub fn slug_limit(parser: ParserKind, flag: Option<usize>) -> Option<usize> {
        match flag {
            Some(0) => None,
            Some(n) => Some(n),
            None => parser.default_slug_limit(),
        }
    }
}

fn parse_year(s: &str) -> Result<String, String> {
    if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        Ok(s.to_string())
    } else {
        Err(format!("'{s}' is not a four-digit year"))
    }
}

impl Cli {
    /// Default log filter when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
