use std::collections::BTreeMap;
use std::path::Path;
use std::process;

use serde::Serialize;
use tracing::debug;
use variants_codegen::{
    load_table, write_source, CommandFormatter, EmitConfig, ExtendedVariant, GenerateError,
    VariantTable,
};

use crate::{report_error, MessageFormat};

pub(crate) struct GenerateOptions<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    pub package: String,
    pub import_path: String,
    pub formatter: &'a str,
    pub message_format: MessageFormat,
    pub quiet: bool,
}

#[derive(Serialize)]
struct GenerateSummary<'a> {
    output: &'a str,
    jobs: usize,
    /// Number of jobs carrying each extended-variant tag.
    flags: BTreeMap<&'static str, usize>,
}

fn flag_counts(table: &VariantTable) -> BTreeMap<&'static str, usize> {
    ExtendedVariant::ALL
        .into_iter()
        .map(|ext| {
            let count = table.iter().filter(|(_, v)| v.has(ext)).count();
            (ext.as_tag(), count)
        })
        .collect()
}

/// Load the TSV table, write the Go source and format it. Every failure
/// exits the process with status 1.
pub(crate) fn cmd_generate(opts: GenerateOptions<'_>) {
    let table = match load_table(opts.input) {
        Ok(t) => t,
        Err(e) => {
            let msg = format!("Failed to read TSV file {}: {}", opts.input.display(), e);
            report_error(&msg, opts.message_format);
            process::exit(1);
        }
    };
    debug!(jobs = table.len(), "variant table loaded");

    let config = EmitConfig {
        package: opts.package,
        import_path: opts.import_path,
    };
    let formatter = CommandFormatter::with_program(opts.formatter);
    debug!(formatter = ?formatter.program(), output = %opts.output.display(), "generating");

    if let Err(e) = write_source(opts.output, &table, &config, &formatter) {
        let msg = match &e {
            GenerateError::Format(_) => format!("error: {}", e),
            GenerateError::Io { .. } => format!(
                "Failed to generate Go file {}: {}",
                opts.output.display(),
                e
            ),
        };
        report_error(&msg, opts.message_format);
        process::exit(1);
    }

    if opts.quiet {
        return;
    }
    let output = opts.output.display().to_string();
    match opts.message_format {
        MessageFormat::Text => println!("Go file generated: {}", output),
        MessageFormat::Json => {
            let summary = GenerateSummary {
                output: &output,
                jobs: table.len(),
                flags: flag_counts(&table),
            };
            println!(
                "{}",
                serde_json::to_string(&summary).unwrap_or_else(|e| format!(
                    "{{\"error\": \"serialization error: {}\"}}",
                    e
                ))
            );
        }
    }
}
