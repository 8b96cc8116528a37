use clap::Parser;

use crate::{
    cli::{Cli, Command},
    frontmatter::{AddCategory, AddTeaser},
    publication::ExtractOptions,
};

mod cli;
mod convert;
mod frontmatter;
mod markdown;
mod publication;
mod report;
mod source;
mod tsv;

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(args.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(?args, "arguments parsed");

    match args.command {
        Command::Convert {
            bibtex_file,
            output,
            parser,
            slug_max_len,
            default_year,
        } => {
            let opts = ExtractOptions {
                slug_limit: Command::slug_limit(parser, slug_max_len),
                default_year,
            };
            convert::run(&bibtex_file, &output, parser, &opts)?;
        }
        Command::Tsv {
            tsv_file,
            output,
            default_teaser,
        } => {
            tsv::run(&tsv_file, &output, &default_teaser)?;
        }
        Command::AddCategory { dir, category } => {
            frontmatter::run(&dir, &AddCategory { category })?;
        }
        Command::AddTeaser { dir, teaser } => {
            frontmatter::run(&dir, &AddTeaser { teaser })?;
        }
    }
    Ok(())
}
