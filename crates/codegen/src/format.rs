//! Post-processing of generated files by an external source formatter.

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::error::FormatError;

/// Normalizes a generated file in place.
pub trait SourceFormatter {
    fn format(&self, path: &Path) -> Result<(), FormatError>;
}

/// Runs `program args... <path>` and requires a zero exit status.
#[derive(Debug, Clone)]
pub struct CommandFormatter {
    program: OsString,
    args: Vec<OsString>,
}

impl CommandFormatter {
    pub fn new<I, S>(program: impl Into<OsString>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        CommandFormatter {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// `gofmt -s -w <path>`: simplify and rewrite in place.
    pub fn gofmt() -> Self {
        Self::with_program("gofmt")
    }

    /// A gofmt-compatible program, invoked with `-s -w <path>`.
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self::new(program, ["-s", "-w"])
    }

    pub fn program(&self) -> &OsString {
        &self.program
    }
}

impl SourceFormatter for CommandFormatter {
    fn format(&self, path: &Path) -> Result<(), FormatError> {
        let program = self.program.to_string_lossy().into_owned();
        debug!(program = %program, path = %path.display(), "running formatter");

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .output()
            .map_err(|source| FormatError::Spawn {
                program: program.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(FormatError::Failed {
                program,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

/// Leaves the file as written.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFormatter;

impl SourceFormatter for NoopFormatter {
    fn format(&self, _path: &Path) -> Result<(), FormatError> {
        Ok(())
    }
}
