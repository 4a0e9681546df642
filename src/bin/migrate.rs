//! Lexicon Migration CLI
//!
//! One-off migrations over the lexicon source document. Currently:
//! minimum-constraint injection (minLength/minimum/minItems defaults).

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lexicon_schemas::constraints::{inject_minimum_constraints, migrate_file};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lexicon-migrate")]
#[command(about = "Apply one-off migrations to a lexicon document")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inject minLength/minimum/minItems defaults where absent
    MinConstraints {
        /// Path to the lexicon document (rewritten in place)
        lexicon: PathBuf,

        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,
    },
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
    match cli.command {
        Commands::MinConstraints { lexicon, dry_run } => {
            let stats = if dry_run {
                let content = std::fs::read_to_string(&lexicon)?;
                let mut document: serde_json::Value = serde_json::from_str(&content)?;
                inject_minimum_constraints(&mut document)?
            } else {
                migrate_file(&lexicon)?
            };

            println!("🔧 Minimum constraints{}", if dry_run { " (dry run)" } else { "" });
            println!("  minLength added: {}", stats.min_length);
            println!("  minimum added:   {}", stats.minimum);
            println!("  minItems added:  {}", stats.min_items);
        }
    }

    Ok(())
}
