//! Schema Generation CLI
//!
//! Builds the publishable schema artifacts from a lexicon document, shows a
//! single generated schema, or checks class examples without writing files.

use std::path::PathBuf;

use anyhow::{anyhow, bail};
use clap::{Parser, Subcommand};
use lexicon_schemas::config::OutputFormat;
use lexicon_schemas::{
    generate_schema_for_class, to_canonical_json, to_pretty_json, validate_class_examples,
    write_schema_artifacts, Lexicon, LexiconConfig, LocalPublisher,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lexicon-generate")]
#[command(about = "Generate draft-07 JSON Schemas from a lexicon document")]
struct Cli {
    /// Path to the lexicon document (overrides config)
    #[arg(short, long)]
    lexicon: Option<PathBuf>,

    /// Path to a config file
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate and write all artifacts for the configured tag
    Build {
        /// Output directory (overrides config)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Tag selecting the classes to publish (overrides config)
        #[arg(short, long)]
        tag: Option<String>,

        /// Skip example validation
        #[arg(long)]
        no_validate: bool,
    },

    /// Print the generated schema for one class
    Show {
        /// Class type key
        class: String,

        /// Pretty-print instead of canonical bytes
        #[arg(long)]
        pretty: bool,
    },

    /// Validate class examples without writing anything
    Validate {
        /// Restrict to one class
        #[arg(short = 'C', long)]
        class: Option<String>,
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
    let config = LexiconConfig::load_from(cli.config.as_deref())?;
    let lexicon_path = cli
        .lexicon
        .unwrap_or_else(|| config.generator.lexicon_path.clone());

    let lexicon = Lexicon::load(&lexicon_path)?;
    println!("📖 Lexicon: {:?}", lexicon_path);
    println!("  Classes: {}", lexicon.classes.len());
    println!();

    match cli.command {
        Commands::Build {
            out,
            tag,
            no_validate,
        } => {
            let out_dir = out.unwrap_or_else(|| config.generator.output_dir.clone());
            let tag = tag.unwrap_or_else(|| config.generator.tag.clone());

            if config.generator.validate_examples && !no_validate {
                let mut failures = 0usize;
                for class in lexicon.tagged_classes(&tag) {
                    let report = validate_class_examples(class)?;
                    if !report.is_clean() {
                        failures += report.violations.len();
                        println!(
                            "❌ {} - {} example(s) failed validation",
                            report.class_name,
                            report.violations.len()
                        );
                        for violation in &report.violations {
                            for error in &violation.errors {
                                println!("   [{}] {}", violation.example_index, error);
                            }
                        }
                    }
                }
                if failures > 0 {
                    bail!("{} example(s) failed validation", failures);
                }
            }

            let mut publisher = LocalPublisher::new(&out_dir)?;
            let manifest = write_schema_artifacts(&lexicon, &tag, &out_dir, &mut publisher)?;

            println!("✅ Wrote {} schema(s) to {:?}", manifest.len(), out_dir);
            for name in manifest.entries.keys() {
                println!("   {}.json", name);
            }
        }

        Commands::Show { class, pretty } => {
            let class = lexicon
                .get_class(&class)
                .ok_or_else(|| anyhow!("class not found: {}", class))?;
            let schema = generate_schema_for_class(class)?;

            if pretty || config.generator.output_format == OutputFormat::Pretty {
                println!("{}", to_pretty_json(&schema));
            } else {
                println!("{}", to_canonical_json(&schema));
            }
        }

        Commands::Validate { class } => {
            let classes: Vec<_> = match &class {
                Some(name) => lexicon
                    .get_class(name)
                    .map(|c| vec![c])
                    .ok_or_else(|| anyhow!("class not found: {}", name))?,
                None => lexicon.classes.iter().collect(),
            };

            let mut total_violations = 0usize;
            for class in classes {
                let report = validate_class_examples(class)?;
                if report.examples_checked == 0 {
                    continue;
                }
                if report.is_clean() {
                    println!("✅ {} - {} example(s) OK", report.class_name, report.examples_checked);
                } else {
                    total_violations += report.violations.len();
                    println!(
                        "❌ {} - {}/{} example(s) failed",
                        report.class_name,
                        report.violations.len(),
                        report.examples_checked
                    );
                }
            }

            if total_violations > 0 {
                bail!("{} example(s) failed validation", total_violations);
            }
        }
    }

    Ok(())
}
