//! Go source emission for a [`VariantTable`].
//!
//! The generated file declares `var Variants = map[string]<pkg>.Variant{...}`
//! with one entry per job in lexicographic order, so regenerating from the
//! same table is byte-stable. Whitespace is normalized afterwards by a
//! [`SourceFormatter`].

use std::fmt::Write as _;
use std::fs::File;
use std::io::Write as _;
use std::path::Path;

use tracing::info;

use crate::error::GenerateError;
use crate::format::SourceFormatter;
use crate::table::{Variant, VariantTable};

pub const DEFAULT_PACKAGE: &str = "generated";
pub const DEFAULT_IMPORT_PATH: &str = "github.com/bertinatto/testgrid/internal";

/// Names used in the generated Go file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitConfig {
    /// Package clause of the generated file.
    pub package: String,
    /// Import path of the package that defines `Variant`.
    pub import_path: String,
}

impl Default for EmitConfig {
    fn default() -> Self {
        EmitConfig {
            package: DEFAULT_PACKAGE.to_string(),
            import_path: DEFAULT_IMPORT_PATH.to_string(),
        }
    }
}

impl EmitConfig {
    /// Qualified Go type of the map values, e.g. `internal.Variant`.
    pub fn type_name(&self) -> String {
        let pkg = self
            .import_path
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or("internal");
        format!("{}.Variant", pkg)
    }
}

/// Render the whole Go file for `table`.
pub fn render_source(table: &VariantTable, config: &EmitConfig) -> String {
    let mut out = String::new();
    out.push_str(&header(config));
    for (job, variant) in table.iter() {
        push_entry(&mut out, job, variant);
    }
    out.push_str("\n}\n");
    out
}

/// Write the rendered table to `path`, then run `formatter` on it.
///
/// The file is closed before the formatter runs. A formatter failure leaves
/// the unformatted file in place and is returned as [`GenerateError::Format`].
pub fn write_source(
    path: &Path,
    table: &VariantTable,
    config: &EmitConfig,
    formatter: &dyn SourceFormatter,
) -> Result<(), GenerateError> {
    let source = render_source(table, config);
    let io_err = |source: std::io::Error| GenerateError::Io {
        path: path.to_path_buf(),
        source,
    };

    {
        let mut file = File::create(path).map_err(io_err)?;
        file.write_all(source.as_bytes()).map_err(io_err)?;
        file.flush().map_err(io_err)?;
    }
    info!(path = %path.display(), jobs = table.len(), bytes = source.len(), "wrote Go source");

    formatter.format(path)?;
    Ok(())
}

fn header(config: &EmitConfig) -> String {
    format!(
        "\npackage {package}\n\nimport\t{import}\n\n\
         // This file is generated by go generate. DO NOT EDIT.\n\n\
         var Variants = map[string]{ty}{{\n",
        package = config.package,
        import = go_quote(&config.import_path),
        ty = config.type_name(),
    )
}

fn push_entry(out: &mut String, job: &str, v: &Variant) {
    // Writing into a String cannot fail.
    let _ = write!(
        out,
        "\n{job}: {{\n\tName: {name},\n\tParallel: {parallel},\n\tCSI: {csi},\n\
         \tUpgradeFromPrevious: {prev},\n\tUpgradeFromCurrent: {cur},\n\tSerial: {serial},\n}},",
        job = go_quote(job),
        name = go_quote(&v.name),
        parallel = v.parallel,
        csi = v.csi,
        prev = v.upgrade_from_previous,
        cur = v.upgrade_from_current,
        serial = v.serial,
    );
}

/// Quote `s` as a Go interpreted string literal.
fn go_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
