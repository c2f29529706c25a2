use std::path::PathBuf;

/// Errors produced while loading a variant table.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The input file could not be opened or read.
    #[error("cannot read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid tab-delimited data, e.g. a record has a
    /// different number of fields than the header.
    #[error("malformed TSV in '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Fewer than a header row plus one data row.
    #[error("invalid TSV file '{}': not enough records", .path.display())]
    NotEnoughRecords { path: PathBuf },

    /// A data row is missing one of the job, variant or tag columns.
    #[error("invalid TSV file '{}': line {line} has no {field} column", .path.display())]
    MissingField {
        path: PathBuf,
        line: u64,
        field: &'static str,
    },
}

/// Errors produced by a [`crate::SourceFormatter`].
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// The formatter program could not be started (usually not on `PATH`).
    #[error("failed to run formatter '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The formatter ran but reported failure.
    #[error("formatter '{program}' exited with {}: {stderr}", describe_exit(.code))]
    Failed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
}

/// Errors produced while writing the generated source file.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The output file could not be created or written.
    #[error("cannot write '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The written file could not be formatted. Unformatted output is not
    /// considered valid, so callers treat this as fatal.
    #[error(transparent)]
    Format(#[from] FormatError),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {}", c),
        None => "a signal".to_string(),
    }
}
