//! variants-codegen: turns a tab-separated variant table into a Go source map.
//!
//! The pipeline has two stages. [`table`] reads the TSV file into a
//! [`VariantTable`] keyed by job name, classifying each row's extended-variant
//! tags into boolean flags. [`emit`] renders the table, sorted by job name,
//! as a Go `map[string]internal.Variant` literal and hands the written file to
//! a [`SourceFormatter`].

pub mod emit;
pub mod error;
pub mod format;
pub mod table;

pub use emit::{render_source, write_source, EmitConfig};
pub use error::{FormatError, GenerateError, LoadError};
pub use format::{CommandFormatter, NoopFormatter, SourceFormatter};
pub use table::{load_table, read_table, ExtendedVariant, Variant, VariantTable};
