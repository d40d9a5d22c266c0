use anyhow::Result;
use clap::Parser;
use gitdump::areas::repository::Repository;
use gitdump::artifacts::dump::since::parse_since;
use gitdump::artifacts::dump::{
    DEFAULT_DATE_PLACEHOLDER, DEFAULT_REPO_PLACEHOLDER, DumpOptions, TreeLineFormat,
};
use gitdump::artifacts::log::rev_list::WalkOrder;
use is_terminal::IsTerminal;
use std::io::BufWriter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(
    name = "gitdump",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "Dump a git repository's history as text lines",
    long_about = "Walks every commit reachable from HEAD and writes refs, commits, \
    file changes, trees and blobs as deterministic text lines, each object exactly once.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[arg(
        index = 1,
        help = "Only dump commits committed at or after this time (e.g. 2024-01-01T10:00:00Z)"
    )]
    since: Option<String>,
    #[arg(
        short = 'C',
        long,
        default_value = ".",
        help = "The path to the repository"
    )]
    repository: String,
    #[arg(long, value_enum, default_value_t = WalkOrder::Topological, help = "Commit order")]
    order: WalkOrder,
    #[arg(long, help = "Do not write branch and tag lines")]
    no_refs: bool,
    #[arg(long, help = "Write tree entries without name and mode")]
    minimal_trees: bool,
    #[arg(long, help = "Keep the walk order of tree and blob lines within a commit")]
    unsorted: bool,
    #[arg(
        long,
        default_value_t = 50,
        value_parser = clap::value_parser!(u8).range(0..=100),
        help = "Minimum similarity (percent) for a rename"
    )]
    rename_threshold: u8,
    #[arg(long, help = "Write non-ASCII characters unescaped")]
    unicode: bool,
    #[arg(long, default_value = DEFAULT_REPO_PLACEHOLDER, help = "Repository field of ref lines")]
    repo_placeholder: String,
    #[arg(long, default_value = DEFAULT_DATE_PLACEHOLDER, help = "Date field of ref lines")]
    date_placeholder: String,
}

impl Cli {
    fn dump_options(&self) -> Result<DumpOptions> {
        Ok(DumpOptions {
            order: self.order,
            since: self.since.as_deref().map(parse_since).transpose()?,
            include_refs: !self.no_refs,
            tree_line_format: if self.minimal_trees {
                TreeLineFormat::Minimal
            } else {
                TreeLineFormat::Detailed
            },
            sort_objects: !self.unsorted,
            rename_threshold: self.rename_threshold,
            ascii_only: !self.unicode,
            repo_placeholder: self.repo_placeholder.clone(),
            date_placeholder: self.date_placeholder.clone(),
        })
    }
}

fn main() -> Result<()> {
    let stderr = std::io::stderr();
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(stderr.is_terminal()),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let options = cli.dump_options()?;

    let repository = Repository::new(
        &cli.repository,
        Box::new(BufWriter::new(std::io::stdout())),
    )?;
    repository.dump(&options)
}
