// DataCollector — append-only observations grouped by label
//
// Side channel for offline analysis (activation traces, accuracy curves, ...).
// It never touches Batch or Importer state.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use mimic_core::{Error, Matrix, Result};

const WRITER: &str = "<csv writer>";

/// How a series reports its value range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeriesRange<D> {
    /// Range follows the observed values.
    Auto,
    /// Range fixed up front, e.g. `[0, 1]` for an accuracy curve.
    Fixed { min: D, max: D },
}

/// The observations recorded under one label.
#[derive(Debug, Clone)]
pub struct Series<D> {
    values: Vec<D>,
    range: SeriesRange<D>,
}

impl<D> Series<D> {
    fn new(range: SeriesRange<D>) -> Self {
        Self {
            values: Vec::new(),
            range,
        }
    }

    pub fn values(&self) -> &[D] {
        &self.values
    }

    pub fn range(&self) -> &SeriesRange<D> {
        &self.range
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<D: PartialOrd + Copy> Series<D> {
    /// Lower bound: the fixed minimum, or the smallest observed value.
    pub fn min(&self) -> Option<D> {
        match self.range {
            SeriesRange::Fixed { min, .. } => Some(min),
            SeriesRange::Auto => self.extreme(|candidate, best| candidate < best),
        }
    }

    /// Upper bound: the fixed maximum, or the largest observed value.
    pub fn max(&self) -> Option<D> {
        match self.range {
            SeriesRange::Fixed { max, .. } => Some(max),
            SeriesRange::Auto => self.extreme(|candidate, best| candidate > best),
        }
    }

    fn extreme(&self, better: impl Fn(&D, &D) -> bool) -> Option<D> {
        self.values.iter().copied().fold(None, |best, v| match best {
            Some(b) if !better(&v, &b) => Some(b),
            _ => Some(v),
        })
    }
}

/// Label-keyed, insertion-ordered observation store.
///
/// Labels are kept in sorted order so exports are stable between runs.
#[derive(Debug, Clone)]
pub struct DataCollector<L, D> {
    series: BTreeMap<L, Series<D>>,
}

impl<L, D> Default for DataCollector<L, D> {
    fn default() -> Self {
        Self {
            series: BTreeMap::new(),
        }
    }
}

impl<L: Ord, D> DataCollector<L, D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `data` to the series for `label`, creating an auto-ranged
    /// series on first use.
    pub fn observe(&mut self, label: L, data: D) {
        self.series
            .entry(label)
            .or_insert_with(|| Series::new(SeriesRange::Auto))
            .values
            .push(data);
    }

    /// Everything observed under `label`, oldest first. Empty if never observed.
    pub fn observations(&self, label: &L) -> &[D] {
        self.series
            .get(label)
            .map(|s| s.values.as_slice())
            .unwrap_or(&[])
    }

    /// Declare a series with an explicit range. Fails if `label` already
    /// holds a series, since its past entries must not change.
    pub fn create_series(&mut self, label: L, range: SeriesRange<D>) -> Result<()>
    where
        L: std::fmt::Debug,
    {
        if self.series.contains_key(&label) {
            return Err(Error::config(format!("series {label:?} already exists")));
        }
        self.series.insert(label, Series::new(range));
        Ok(())
    }

    pub fn series(&self, label: &L) -> Option<&Series<D>> {
        self.series.get(label)
    }

    /// Labels in sorted order.
    pub fn labels(&self) -> impl Iterator<Item = &L> + '_ {
        self.series.keys()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl<L, D> DataCollector<L, D>
where
    L: Ord + Display,
    D: PartialOrd + Copy + Display,
{
    /// Write every series as two lines:
    ///
    /// ```text
    /// <label>, min, <min>, max, <max>
    /// <v0>,<v1>,...
    /// ```
    ///
    /// An auto-ranged series with no values leaves min and max blank.
    pub fn export_csv<W: Write>(&self, mut writer: W) -> Result<()> {
        for (label, series) in &self.series {
            let min = series.min().map(|v| v.to_string()).unwrap_or_default();
            let max = series.max().map(|v| v.to_string()).unwrap_or_default();
            let values = series
                .values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(",");
            writeln!(writer, "{label}, min, {min}, max, {max}")
                .and_then(|_| writeln!(writer, "{values}"))
                .map_err(|e| Error::io(WRITER, e))?;
        }
        writer.flush().map_err(|e| Error::io(WRITER, e))
    }

    /// [`export_csv`](Self::export_csv) into a newly created file.
    pub fn export_csv_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| Error::io(path, e))?;
        debug!(path = %path.display(), series = self.series.len(), "exporting collected data");
        self.export_csv(BufWriter::new(file)).map_err(|e| at_path(path, e))
    }
}

// Standalone CSV exports
//
// One-off traces written next to (or instead of) a collector dump. Each
// comes as a `write_*` over any writer and an `export_*` over a file path.

/// Whether a path export replaces the file or adds to its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportMode {
    #[default]
    Truncate,
    Append,
}

/// Re-point a writer error at the file it was writing.
fn at_path(path: &Path, err: Error) -> Error {
    match err {
        Error::Io { source, .. } => Error::io(path, source),
        other => other,
    }
}

fn export_to(
    path: &Path,
    mode: ExportMode,
    write: impl FnOnce(&mut BufWriter<File>) -> Result<()>,
) -> Result<()> {
    let file = match mode {
        ExportMode::Truncate => File::create(path),
        ExportMode::Append => OpenOptions::new().create(true).append(true).open(path),
    }
    .map_err(|e| Error::io(path, e))?;
    debug!(path = %path.display(), ?mode, "exporting csv");
    let mut writer = BufWriter::new(file);
    write(&mut writer)
        .and_then(|_| writer.flush().map_err(|e| Error::io(WRITER, e)))
        .map_err(|e| at_path(path, e))
}

fn join<D: Display>(values: impl IntoIterator<Item = D>) -> String {
    values
        .into_iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Label line, then the values on one line separated by `", "`.
/// An empty vector writes the label only.
pub fn write_vector_csv<W: Write, D: Display>(
    writer: &mut W,
    label: &str,
    data: &[D],
) -> Result<()> {
    writeln!(writer, "{label}").map_err(|e| Error::io(WRITER, e))?;
    if !data.is_empty() {
        writeln!(writer, "{}", join(data)).map_err(|e| Error::io(WRITER, e))?;
    }
    Ok(())
}

/// A single `label, value` line.
pub fn write_value_csv<W: Write, D: Display>(
    writer: &mut W,
    label: &str,
    value: D,
) -> Result<()> {
    writeln!(writer, "{label}, {value}").map_err(|e| Error::io(WRITER, e))
}

/// A free-form line, e.g. a run description between series.
pub fn write_comment_csv<W: Write>(writer: &mut W, comment: &str) -> Result<()> {
    writeln!(writer, "{comment}").map_err(|e| Error::io(WRITER, e))
}

/// Label line, then the matrix in row-major order with every value followed
/// by `", "`.
pub fn write_matrix_csv<W: Write, D: Display>(
    writer: &mut W,
    label: &str,
    matrix: &Matrix<D>,
) -> Result<()> {
    write_matrices_csv(writer, label, std::slice::from_ref(matrix))
}

/// Label line, then one row-major line per matrix.
pub fn write_matrices_csv<W: Write, D: Display>(
    writer: &mut W,
    label: &str,
    matrices: &[Matrix<D>],
) -> Result<()> {
    writeln!(writer, "{label}").map_err(|e| Error::io(WRITER, e))?;
    for matrix in matrices {
        // Logical iteration order of an ndarray is row-major.
        let line: String = matrix.iter().map(|v| format!("{v}, ")).collect();
        writeln!(writer, "{line}").map_err(|e| Error::io(WRITER, e))?;
    }
    Ok(())
}

pub fn export_vector_csv<D: Display>(
    path: impl AsRef<Path>,
    label: &str,
    data: &[D],
    mode: ExportMode,
) -> Result<()> {
    export_to(path.as_ref(), mode, |w| write_vector_csv(w, label, data))
}

pub fn export_value_csv<D: Display>(
    path: impl AsRef<Path>,
    label: &str,
    value: D,
    mode: ExportMode,
) -> Result<()> {
    export_to(path.as_ref(), mode, |w| write_value_csv(w, label, value))
}

pub fn export_comment_csv(path: impl AsRef<Path>, comment: &str, mode: ExportMode) -> Result<()> {
    export_to(path.as_ref(), mode, |w| write_comment_csv(w, comment))
}

pub fn export_matrix_csv<D: Display>(
    path: impl AsRef<Path>,
    label: &str,
    matrix: &Matrix<D>,
    mode: ExportMode,
) -> Result<()> {
    export_to(path.as_ref(), mode, |w| write_matrix_csv(w, label, matrix))
}

pub fn export_matrices_csv<D: Display>(
    path: impl AsRef<Path>,
    label: &str,
    matrices: &[Matrix<D>],
    mode: ExportMode,
) -> Result<()> {
    export_to(path.as_ref(), mode, |w| write_matrices_csv(w, label, matrices))
}
