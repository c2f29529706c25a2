//! TSV loading and extended-variant classification.
//!
//! The input is a tab-separated file whose first row is a header. Every other
//! row carries `job name`, `variant name` and a comma-separated list of
//! extended-variant tags. Extra columns are ignored.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::LoadError;

/// Extended-variant tags that map onto a [`Variant`] flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtendedVariant {
    Parallel,
    Csi,
    /// Upgrade from the current release.
    Upgrade,
    /// Upgrade from the previous minor release.
    UpgradeMinor,
    Serial,
}

impl ExtendedVariant {
    pub const ALL: [ExtendedVariant; 5] = [
        ExtendedVariant::Parallel,
        ExtendedVariant::Csi,
        ExtendedVariant::Upgrade,
        ExtendedVariant::UpgradeMinor,
        ExtendedVariant::Serial,
    ];

    /// Exact, case-sensitive lookup. Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "parallel" => Some(ExtendedVariant::Parallel),
            "csi" => Some(ExtendedVariant::Csi),
            "upgrade" => Some(ExtendedVariant::Upgrade),
            "upgrade-minor" => Some(ExtendedVariant::UpgradeMinor),
            "serial" => Some(ExtendedVariant::Serial),
            _ => None,
        }
    }

    pub fn as_tag(self) -> &'static str {
        match self {
            ExtendedVariant::Parallel => "parallel",
            ExtendedVariant::Csi => "csi",
            ExtendedVariant::Upgrade => "upgrade",
            ExtendedVariant::UpgradeMinor => "upgrade-minor",
            ExtendedVariant::Serial => "serial",
        }
    }
}

/// Classification of a single job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Variant {
    pub name: String,
    pub parallel: bool,
    pub csi: bool,
    pub upgrade_from_current: bool,
    pub upgrade_from_previous: bool,
    pub serial: bool,
}

impl Variant {
    /// Build a variant from its name and the raw comma-separated tag column.
    pub fn from_tags(name: impl Into<String>, tags: &str) -> Self {
        let mut variant = Variant {
            name: name.into(),
            ..Variant::default()
        };
        for tag in tags.split(',') {
            match ExtendedVariant::from_tag(tag) {
                Some(ext) => variant.set(ext),
                None => {
                    if !tag.is_empty() {
                        debug!(tag, "ignoring unknown extended variant");
                    }
                }
            }
        }
        variant
    }

    fn set(&mut self, ext: ExtendedVariant) {
        match ext {
            ExtendedVariant::Parallel => self.parallel = true,
            ExtendedVariant::Csi => self.csi = true,
            ExtendedVariant::Upgrade => self.upgrade_from_current = true,
            ExtendedVariant::UpgradeMinor => self.upgrade_from_previous = true,
            ExtendedVariant::Serial => self.serial = true,
        }
    }

    /// Whether the given tag's flag is set.
    pub fn has(&self, ext: ExtendedVariant) -> bool {
        match ext {
            ExtendedVariant::Parallel => self.parallel,
            ExtendedVariant::Csi => self.csi,
            ExtendedVariant::Upgrade => self.upgrade_from_current,
            ExtendedVariant::UpgradeMinor => self.upgrade_from_previous,
            ExtendedVariant::Serial => self.serial,
        }
    }
}

/// Job name to [`Variant`], iterated in lexicographic job order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VariantTable {
    jobs: BTreeMap<String, Variant>,
}

impl VariantTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `job`, returning the replaced variant.
    pub fn insert(&mut self, job: impl Into<String>, variant: Variant) -> Option<Variant> {
        self.jobs.insert(job.into(), variant)
    }

    pub fn get(&self, job: &str) -> Option<&Variant> {
        self.jobs.get(job)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Variant)> {
        self.jobs.iter().map(|(job, v)| (job.as_str(), v))
    }
}

/// Open `path` and load it as a variant table.
pub fn load_table(path: &Path) -> Result<VariantTable, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_table(file, path)
}

/// Parse tab-delimited records from `reader`. `path` is only used for error
/// messages and logging.
pub fn read_table<R: Read>(reader: R, path: &Path) -> Result<VariantTable, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(false)
        .from_reader(reader);

    // A malformed record anywhere fails the whole load.
    let records = rdr
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| parse_error(path, source))?;

    if records.len() < 2 {
        return Err(LoadError::NotEnoughRecords {
            path: path.to_path_buf(),
        });
    }

    let mut table = VariantTable::new();
    for (index, record) in records.iter().enumerate().skip(1) {
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(index as u64 + 1);
        let job = column(record, 0, "job name", path, line)?;
        let name = column(record, 1, "variant name", path, line)?;
        let tags = column(record, 2, "extended variants", path, line)?;

        let variant = Variant::from_tags(name, tags);
        debug!(job, variant = %variant.name, line, "loaded variant");
        if table.insert(job, variant).is_some() {
            warn!(job, line, "duplicate job name, later row wins");
        }
    }

    info!(path = %path.display(), jobs = table.len(), "loaded variant table");
    Ok(table)
}

fn column<'r>(
    record: &'r csv::StringRecord,
    index: usize,
    field: &'static str,
    path: &Path,
    line: u64,
) -> Result<&'r str, LoadError> {
    record.get(index).ok_or_else(|| LoadError::MissingField {
        path: path.to_path_buf(),
        line,
        field,
    })
}

fn parse_error(path: &Path, source: csv::Error) -> LoadError {
    if source.is_io_error() {
        LoadError::Io {
            path: path.to_path_buf(),
            source: source.into(),
        }
    } else {
        LoadError::Parse {
            path: path.to_path_buf(),
            source,
        }
    }
}
