// CSV — tabular rows as column-vector samples
//
// A lightweight parser that doesn't require an external CSV crate. Supports
// headerless or header-row files. The caller picks the feature columns and
// the single label column; labels must be non-negative integers.

use mimic_core::{Error, Matrix, Result};

use crate::importer::{DatasetFormat, FormatImporter};

const FORMAT: &str = "CSV";

/// Importer for delimited text files.
pub type CsvImporter = FormatImporter<CsvFormat>;

/// Configuration and parser for CSV datasets.
///
/// Each row becomes an `n × 1` column matrix of its feature values plus a
/// `u32` class label.
///
/// # Example
/// ```ignore
/// // iris.csv: 4 feature columns, class id in the last column
/// let mut importer = CsvImporter::new(
///     CsvFormat::default().feature_cols(vec![0, 1, 2, 3]).label_col(4),
/// );
/// importer.set_data_filename("data/iris.csv");
/// importer.import()?;
/// ```
#[derive(Debug, Clone)]
pub struct CsvFormat {
    /// Whether the first row is a header (to be skipped).
    pub has_header: bool,
    /// Column indices to use as features. Empty = every column but the label.
    pub feature_cols: Vec<usize>,
    /// Label column. `None` = last column.
    pub label_col: Option<usize>,
    /// Delimiter character (default: `,`).
    pub delimiter: u8,
}

impl Default for CsvFormat {
    fn default() -> Self {
        Self {
            has_header: true,
            feature_cols: Vec::new(),
            label_col: None,
            delimiter: b',',
        }
    }
}

impl CsvFormat {
    pub fn has_header(mut self, h: bool) -> Self {
        self.has_header = h;
        self
    }
    pub fn feature_cols(mut self, cols: Vec<usize>) -> Self {
        self.feature_cols = cols;
        self
    }
    pub fn label_col(mut self, col: usize) -> Self {
        self.label_col = Some(col);
        self
    }
    pub fn delimiter(mut self, d: u8) -> Self {
        self.delimiter = d;
        self
    }

    fn parse_str(&self, content: &str) -> Result<Vec<(Matrix<f32>, u32)>> {
        let delim = self.delimiter as char;
        let lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();

        let start = usize::from(self.has_header);
        if start >= lines.len() {
            return Ok(Vec::new());
        }

        let num_cols = lines[start].split(delim).count();
        let label_col = self.label_col.unwrap_or(num_cols - 1);
        if label_col >= num_cols {
            return Err(Error::config(format!(
                "CSV label column {label_col} out of range for {num_cols} columns"
            )));
        }
        let feat_cols = if self.feature_cols.is_empty() {
            (0..num_cols).filter(|&c| c != label_col).collect::<Vec<_>>()
        } else {
            self.feature_cols.clone()
        };
        if let Some(&bad) = feat_cols.iter().find(|&&c| c >= num_cols) {
            return Err(Error::config(format!(
                "CSV feature column {bad} out of range for {num_cols} columns"
            )));
        }

        let mut samples = Vec::with_capacity(lines.len() - start);
        for (line_no, &line) in lines[start..].iter().enumerate() {
            let line_no = line_no + start + 1;
            let cols: Vec<&str> = line.split(delim).collect();
            if cols.len() != num_cols {
                return Err(Error::import(
                    FORMAT,
                    format!(
                        "line {line_no} has {} columns, expected {num_cols}",
                        cols.len()
                    ),
                ));
            }

            let mut features = Vec::with_capacity(feat_cols.len());
            for &c in &feat_cols {
                let val: f32 = cols[c].trim().parse().map_err(|e| {
                    Error::import(FORMAT, format!("line {line_no}, col {c}: parse error: {e}"))
                })?;
                features.push(val);
            }

            let label: u32 = cols[label_col].trim().parse().map_err(|e| {
                Error::import(
                    FORMAT,
                    format!("line {line_no}, col {label_col}: bad label: {e}"),
                )
            })?;

            let column = Matrix::from_shape_vec((features.len(), 1), features)
                .map_err(|e| Error::import(FORMAT, e.to_string()))?;
            samples.push((column, label));
        }

        Ok(samples)
    }
}

impl DatasetFormat for CsvFormat {
    type Data = Matrix<f32>;
    type Label = u32;

    fn name(&self) -> &str {
        FORMAT
    }

    fn parse(&self, data: &[u8], _labels: Option<&[u8]>) -> Result<Vec<(Matrix<f32>, u32)>> {
        let content = std::str::from_utf8(data).map_err(|e| Error::import(FORMAT, e.to_string()))?;
        self.parse_str(content)
    }
}
