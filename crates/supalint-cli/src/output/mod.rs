//! Output formatting

use std::path::Path;

use supalint_core::{Discrepancy, Report};

use crate::args::OutputFormat;

/// Output formatter for discrepancies
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print one file's discrepancies as they are found.
    /// Structured formats defer to [`print_report`](Self::print_report).
    pub fn print_file(&self, file: &Path, discrepancies: &[Discrepancy], source: &str) {
        if self.format != OutputFormat::Human {
            return;
        }

        for disc in discrepancies {
            eprintln!("\x1b[31merror\x1b[0m[{}]: {}", disc.code(), disc.message());

            let (line, col) = offset_to_line_col(source, disc.offset);
            eprintln!("  --> {}:{}:{}", file.display(), line, col);

            // Print source line with annotation
            if let Some(source_line) = get_source_line(source, line) {
                eprintln!("   |");
                eprintln!("{:>3} | {}", line, source_line);

                let padding = " ".repeat(col.saturating_sub(1));
                let width = disc
                    .identifier
                    .len()
                    .min(source_line.len().saturating_sub(col - 1))
                    .max(1);
                eprintln!("   | {}{}", padding, "^".repeat(width));
            }

            eprintln!("   = help: {}", disc.fix());
            eprintln!();
        }
    }

    /// Print the final report in the configured structured format.
    /// Human output has already been printed per file.
    pub fn print_report(&self, report: &Report, discrepancies: &[Discrepancy]) {
        match self.format {
            OutputFormat::Human => {}
            OutputFormat::Json => self.print_json(report),
            OutputFormat::Sarif => self.print_sarif(discrepancies),
        }
    }

    fn print_json(&self, report: &Report) {
        println!(
            "{}",
            serde_json::to_string_pretty(&report.entries).expect("report serializes")
        );
    }

    fn print_sarif(&self, discrepancies: &[Discrepancy]) {
        let results: Vec<serde_json::Value> = discrepancies
            .iter()
            .map(|d| {
                serde_json::json!({
                    "ruleId": d.code(),
                    "level": "error",
                    "message": {
                        "text": d.message()
                    },
                    "locations": [{
                        "physicalLocation": {
                            "artifactLocation": {
                                "uri": d.file.display().to_string()
                            },
                            "region": {
                                "startLine": d.line
                            }
                        }
                    }]
                })
            })
            .collect();

        let sarif = serde_json::json!({
            "$schema": "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json",
            "version": "2.1.0",
            "runs": [{
                "tool": {
                    "driver": {
                        "name": "supalint",
                        "version": env!("CARGO_PKG_VERSION")
                    }
                },
                "results": results
            }]
        });

        println!(
            "{}",
            serde_json::to_string_pretty(&sarif).expect("sarif serializes")
        );
    }
}

/// Convert byte offset to line and column (1-indexed)
fn offset_to_line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;

    for (i, ch) in source.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }

    (line, col)
}

/// Get a specific line from source (1-indexed)
fn get_source_line(source: &str, line: usize) -> Option<&str> {
    source.lines().nth(line.saturating_sub(1))
}
