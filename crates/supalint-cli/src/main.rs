//! supalint CLI - schema-aware static analysis for query-builder chains

mod args;
mod config;
mod output;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use supalint_core::analyzer::{chain_candidates, reference_sites, Candidate};
use supalint_core::report::line_at;
use supalint_core::{Analyzer, Report, SchemaBuilder, SourceWalker};

use crate::args::{Args, Command, OutputFormat};
use crate::config::Config;
use crate::output::OutputFormatter;

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(found_discrepancies) => {
            if found_discrepancies {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Error: {:?}", e);
            ExitCode::from(2)
        }
    }
}

fn run(args: Args) -> Result<bool> {
    match args.command {
        Command::Check {
            root,
            schema,
            config: config_path,
            format,
        } => {
            // Load configuration
            let config = if let Some(path) = config_path {
                Config::from_file(&path)?
            } else {
                Config::find_and_load()?.unwrap_or_default()
            };

            // Merge CLI args with config (CLI takes precedence)
            let config = config.merge_with_args(&schema, &root, &format);

            let schema_files: Vec<PathBuf> = config.schema.iter().map(PathBuf::from).collect();
            if schema_files.is_empty() {
                miette::bail!(
                    "No schema files specified. Use --schema or configure in supalint.toml"
                );
            }

            // Determine output format
            let output_format = match config.format.as_deref() {
                Some("json") => OutputFormat::Json,
                Some("sarif") => OutputFormat::Sarif,
                _ => OutputFormat::Human,
            };

            // Build the schema catalog
            let mut builder = SchemaBuilder::new();
            for schema_file in &schema_files {
                builder.parse_file(schema_file).into_diagnostic()?;
            }
            let catalog = builder.build();

            // Walk the source tree
            let source_root = PathBuf::from(config.root.as_deref().unwrap_or("."));
            let mut walker = SourceWalker::new(&source_root);
            if !config.extensions.is_empty() {
                walker = walker.with_extensions(config.extensions.iter().cloned());
            }

            let analyzer = Analyzer::new(&catalog);
            let formatter = OutputFormatter::new(output_format);
            let mut report = Report::new();
            let mut all_discrepancies = Vec::new();
            let mut file_count = 0usize;

            for path in walker.files() {
                file_count += 1;
                let content = fs::read_to_string(&path).into_diagnostic()?;
                let discrepancies = analyzer.analyze(&path, &content);
                if discrepancies.is_empty() {
                    continue;
                }
                formatter.print_file(&path, &discrepancies, &content);
                report.extend(&discrepancies);
                all_discrepancies.extend(discrepancies);
            }

            formatter.print_report(&report, &all_discrepancies);

            // Print summary
            if output_format == OutputFormat::Human && !args.quiet {
                if report.is_empty() {
                    eprintln!("All {} file(s) passed validation", file_count);
                } else {
                    eprintln!(
                        "Found {} discrepancy(ies) in {} file(s)",
                        report.len(),
                        file_count
                    );
                }
            }

            Ok(!report.is_empty())
        }

        Command::Schema { files } => {
            // Build and display catalog information
            let mut builder = SchemaBuilder::new();
            for file in &files {
                builder.parse_file(file).into_diagnostic()?;
            }
            let catalog = builder.build();

            println!("Catalog:");
            println!("========");
            for (table_name, table) in &catalog.tables {
                println!("\nTable: {}", table_name);
                for (col_name, type_tag) in &table.columns {
                    println!("  - {} {}", col_name, type_tag);
                }
            }

            Ok(false)
        }

        Command::Extract { file } => {
            // Display reference sites and their candidates (for debugging)
            let content = fs::read_to_string(&file).into_diagnostic()?;

            for site in reference_sites(&content) {
                let line = line_at(&content, site.offset);
                println!("{}:{} .from('{}')", file.display(), line, site.table);
                for candidate in chain_candidates(&content, &site) {
                    match candidate {
                        Candidate::Column { table, column, .. } => {
                            println!("  column '{}' (checked against '{}')", column, table);
                        }
                        Candidate::Relation { name, .. } => {
                            println!("  relation '{}' (not validated)", name);
                        }
                    }
                }
            }

            Ok(false)
        }
    }
}
