//! Lexicon Search CLI
//!
//! Ad-hoc fuzzy search over a lexicon file, printing ranked results with
//! their match annotations.

use std::path::PathBuf;

use anyhow::bail;
use clap::Parser;
use lexicon_schemas::search::MIN_QUERY_LEN;
use lexicon_schemas::{filter_for_search, Lexicon, LexiconConfig, MatchKind};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lexicon-search")]
#[command(about = "Search classes and data groups in a lexicon document")]
struct Cli {
    /// Search query (at least 3 characters)
    query: String,

    /// Path to the lexicon document (overrides config)
    #[arg(short, long)]
    lexicon: Option<PathBuf>,

    /// Path to a config file
    #[arg(short, long)]
    config: Option<String>,

    /// Maximum number of results (overrides config)
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Search data groups instead of classes
    #[arg(long)]
    data_groups: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if cli.query.chars().count() < MIN_QUERY_LEN {
        bail!("query must be at least {} characters", MIN_QUERY_LEN);
    }

    let config = LexiconConfig::load_from(cli.config.as_deref())?;
    let lexicon_path = cli
        .lexicon
        .unwrap_or_else(|| config.generator.lexicon_path.clone());
    let limit = cli.limit.unwrap_or(config.search.limit);

    let lexicon = Lexicon::load(&lexicon_path)?;

    if cli.data_groups {
        let hits = filter_for_search(&lexicon.data_groups, &cli.query);
        print_hits(&cli.query, hits.iter().map(|h| (&h.entity.type_name, &h.matches)), limit);
    } else {
        let hits = filter_for_search(&lexicon.classes, &cli.query);
        print_hits(&cli.query, hits.iter().map(|h| (&h.entity.type_name, &h.matches)), limit);
    }

    Ok(())
}

fn print_hits<'a>(
    query: &str,
    hits: impl ExactSizeIterator<Item = (&'a String, &'a Vec<lexicon_schemas::SearchMatch>)>,
    limit: usize,
) {
    if hits.len() == 0 {
        println!("No matches for '{}'", query);
        return;
    }

    println!("🔍 {} result(s) for '{}'", hits.len(), query);
    for (name, matches) in hits.take(limit) {
        println!();
        println!("  {}", name);
        for m in matches {
            let kind = match m.kind {
                MatchKind::Class => "class",
                MatchKind::Property => "property",
                MatchKind::Relationship => "relationship",
            };
            println!("    [{:>12}] {} = {} ({:.2})", kind, m.field, m.value, m.score);
        }
    }
}
