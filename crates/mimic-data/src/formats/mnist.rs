// MNIST — IDX file format
//
// The MNIST database ships as image/label file pairs:
//   - train-images-idx3-ubyte / train-labels-idx1-ubyte  (60,000 samples)
//   - t10k-images-idx3-ubyte  / t10k-labels-idx1-ubyte   (10,000 samples)
//
// IDX format (all header values big-endian):
//   images: magic(2051) | count(u32) | rows(u32) | cols(u32) | pixel_data(u8...)
//   labels: magic(2049) | count(u32) | label_data(u8...)
//
// Compressed (.gz) files are not handled; decompress them first.

use mimic_core::{Error, Matrix, Result};

use crate::importer::{DatasetFormat, FormatImporter};

const IDX3_MAGIC: u32 = 2051;
const IDX1_MAGIC: u32 = 2049;
const FORMAT: &str = "MNIST";

/// Importer for MNIST image/label file pairs.
pub type MnistImporter = FormatImporter<MnistFormat>;

/// MNIST adapter: each image becomes a `rows × cols` matrix with pixels
/// scaled to `[0, 1]`; labels are the digit values.
#[derive(Debug, Clone, Copy, Default)]
pub struct MnistFormat;

impl DatasetFormat for MnistFormat {
    type Data = Matrix<f32>;
    type Label = u32;

    fn name(&self) -> &str {
        FORMAT
    }

    fn needs_labels(&self) -> bool {
        true
    }

    fn parse(&self, data: &[u8], labels: Option<&[u8]>) -> Result<Vec<(Matrix<f32>, u32)>> {
        let labels = labels.ok_or_else(|| Error::config("MNIST needs a labels file"))?;
        let (images, rows, cols) = parse_idx3_images(data)?;
        let labels = parse_idx1_labels(labels)?;

        if images.len() != labels.len() {
            return Err(Error::CountMismatch {
                data: images.len(),
                labels: labels.len(),
            });
        }

        images
            .into_iter()
            .zip(labels.iter().copied())
            .map(|(pixels, label)| {
                let scaled: Vec<f32> = pixels.iter().map(|&p| p as f32 / 255.0).collect();
                let image = Matrix::from_shape_vec((rows, cols), scaled)
                    .map_err(|e| Error::import(FORMAT, e.to_string()))?;
                Ok((image, label as u32))
            })
            .collect()
    }
}

fn truncated(what: &str, expected: usize, got: usize) -> Error {
    Error::import(
        FORMAT,
        format!("{what} truncated: expected {expected} bytes, got {got}"),
    )
}

/// The payload must be exactly what the header declares.
fn check_payload_len(what: &str, expected: usize, got: usize) -> Result<()> {
    if got < expected {
        return Err(truncated(what, expected, got));
    }
    if got > expected {
        return Err(Error::import(
            FORMAT,
            format!("{what} has {} trailing bytes past the declared payload", got - expected),
        ));
    }
    Ok(())
}

/// Parse an IDX3 file (images): magic=2051, count, rows, cols, data.
fn parse_idx3_images(data: &[u8]) -> Result<(Vec<&[u8]>, usize, usize)> {
    if data.len() < 16 {
        return Err(truncated("IDX3 header", 16, data.len()));
    }

    let magic = read_u32_be(data, 0);
    if magic != IDX3_MAGIC {
        return Err(Error::import(
            FORMAT,
            format!("invalid IDX3 magic: expected {IDX3_MAGIC:#06x}, got {magic:#06x}"),
        ));
    }

    let count = read_u32_be(data, 4) as usize;
    let rows = read_u32_be(data, 8) as usize;
    let cols = read_u32_be(data, 12) as usize;
    if rows == 0 || cols == 0 {
        return Err(Error::import(
            FORMAT,
            format!("empty image dimensions {rows}×{cols}"),
        ));
    }
    let pixels_per_image = rows
        .checked_mul(cols)
        .ok_or_else(|| Error::import(FORMAT, "image dimensions overflow"))?;

    let expected_len = count
        .checked_mul(pixels_per_image)
        .and_then(|n| n.checked_add(16))
        .ok_or_else(|| Error::import(FORMAT, "declared image count overflows"))?;
    check_payload_len("IDX3", expected_len, data.len())?;

    let images = (0..count)
        .map(|i| {
            let start = 16 + i * pixels_per_image;
            &data[start..start + pixels_per_image]
        })
        .collect();

    Ok((images, rows, cols))
}

/// Parse an IDX1 file (labels): magic=2049, count, data.
fn parse_idx1_labels(data: &[u8]) -> Result<&[u8]> {
    if data.len() < 8 {
        return Err(truncated("IDX1 header", 8, data.len()));
    }

    let magic = read_u32_be(data, 0);
    if magic != IDX1_MAGIC {
        return Err(Error::import(
            FORMAT,
            format!("invalid IDX1 magic: expected {IDX1_MAGIC:#06x}, got {magic:#06x}"),
        ));
    }

    let count = read_u32_be(data, 4) as usize;
    let expected_len = count
        .checked_add(8)
        .ok_or_else(|| Error::import(FORMAT, "declared label count overflows"))?;
    check_payload_len("IDX1", expected_len, data.len())?;

    Ok(&data[8..expected_len])
}

/// Read a big-endian u32 from `data` at byte offset `off`.
fn read_u32_be(data: &[u8], off: usize) -> u32 {
    u32::from_be_bytes([data[off], data[off + 1], data[off + 2], data[off + 3]])
}

// Builder helpers

/// Build IDX3 image bytes from raw image data (useful for tests).
pub fn build_idx3_bytes(images: &[&[u8]], rows: u32, cols: u32) -> Vec<u8> {
    let count = images.len() as u32;
    let mut buf = Vec::new();
    buf.extend_from_slice(&IDX3_MAGIC.to_be_bytes());
    buf.extend_from_slice(&count.to_be_bytes());
    buf.extend_from_slice(&rows.to_be_bytes());
    buf.extend_from_slice(&cols.to_be_bytes());
    for img in images {
        buf.extend_from_slice(img);
    }
    buf
}

/// Build IDX1 label bytes (useful for tests).
pub fn build_idx1_bytes(labels: &[u8]) -> Vec<u8> {
    let count = labels.len() as u32;
    let mut buf = Vec::new();
    buf.extend_from_slice(&IDX1_MAGIC.to_be_bytes());
    buf.extend_from_slice(&count.to_be_bytes());
    buf.extend_from_slice(labels);
    buf
}
