mod commands;

use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, ValueEnum};
use tracing_subscriber::{fmt, EnvFilter};
use variants_codegen::emit::{DEFAULT_IMPORT_PATH, DEFAULT_PACKAGE};

use commands::generate::{cmd_generate, GenerateOptions};

/// Shape of the messages printed on success and failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum MessageFormat {
    Text,
    Json,
}

/// Generate the test-grid Go variant map from a TSV table.
#[derive(Parser)]
#[command(
    name = "variants",
    version,
    about = "Generate the test-grid Go variant map from a TSV table"
)]
struct Cli {
    /// Input TSV file (header row, then job, variant, extended variants)
    #[arg(long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Output Go file
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Package clause of the generated file
    #[arg(long, default_value = DEFAULT_PACKAGE)]
    package: String,

    /// Import path of the package defining the Variant type
    #[arg(long = "import", value_name = "IMPORT_PATH", default_value = DEFAULT_IMPORT_PATH)]
    import_path: String,

    /// gofmt-compatible formatter, run as `<PROGRAM> -s -w <output>`
    #[arg(long, value_name = "PROGRAM", default_value = "gofmt")]
    formatter: String,

    /// Message format (text or json)
    #[arg(long, default_value = "text", value_enum)]
    message_format: MessageFormat,

    /// Suppress the success message
    #[arg(long)]
    quiet: bool,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                let _ = e.print();
                process::exit(1);
            }
        },
    };

    init_logging();

    let Some(input) = cli.input else {
        usage_error("Input file is required");
    };
    let Some(output) = cli.output else {
        usage_error("Output file is required");
    };

    cmd_generate(GenerateOptions {
        input: &input,
        output: &output,
        package: cli.package,
        import_path: cli.import_path,
        formatter: &cli.formatter,
        message_format: cli.message_format,
        quiet: cli.quiet,
    });
}

/// Log to stderr so stdout only carries the result message. `RUST_LOG`
/// overrides the default level.
fn init_logging() {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn usage_error(msg: &str) -> ! {
    eprintln!("{}", msg);
    eprintln!("{}", Cli::command().render_usage());
    eprintln!("For more information, try '--help'.");
    process::exit(1);
}

pub(crate) fn report_error(msg: &str, format: MessageFormat) {
    match format {
        MessageFormat::Text => eprintln!("{}", msg),
        MessageFormat::Json => eprintln!("{}", serde_json::json!({ "error": msg })),
    }
}
