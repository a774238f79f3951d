// CIFAR-10 — binary batch files
//
// Each record is 3073 bytes: one label byte (0-9) followed by 3072 pixel
// bytes, channel-major (1024 red, 1024 green, 1024 blue), each channel in
// row-major order over a 32×32 image. Files hold records back to back.

use mimic_core::{Error, Result, Tensor3};

use crate::importer::{DatasetFormat, FormatImporter};

pub const CIFAR_CHANNELS: usize = 3;
pub const CIFAR_SIDE: usize = 32;
const PIXELS: usize = CIFAR_CHANNELS * CIFAR_SIDE * CIFAR_SIDE;
const RECORD: usize = 1 + PIXELS;
const FORMAT: &str = "CIFAR-10";

/// Importer for CIFAR-10 binary batch files.
pub type CifarImporter = FormatImporter<CifarFormat>;

/// CIFAR-10 adapter: `[3, 32, 32]` tensors scaled to `[0, 1]`, `u32` labels.
#[derive(Debug, Clone, Copy, Default)]
pub struct CifarFormat;

impl DatasetFormat for CifarFormat {
    type Data = Tensor3<f32>;
    type Label = u32;

    fn name(&self) -> &str {
        FORMAT
    }

    fn parse(&self, data: &[u8], _labels: Option<&[u8]>) -> Result<Vec<(Tensor3<f32>, u32)>> {
        if data.len() % RECORD != 0 {
            return Err(Error::import(
                FORMAT,
                format!(
                    "{} bytes is not a whole number of {RECORD}-byte records",
                    data.len()
                ),
            ));
        }

        data.chunks_exact(RECORD)
            .map(|record| {
                let label = record[0] as u32;
                let pixels: Vec<f32> = record[1..].iter().map(|&p| p as f32 / 255.0).collect();
                let image =
                    Tensor3::from_shape_vec((CIFAR_CHANNELS, CIFAR_SIDE, CIFAR_SIDE), pixels)
                        .map_err(|e| Error::import(FORMAT, e.to_string()))?;
                Ok((image, label))
            })
            .collect()
    }
}

/// Build a CIFAR-10 binary file from `(label, fill byte)` pairs (useful for tests).
pub fn build_cifar_bytes(records: &[(u8, u8)]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(records.len() * RECORD);
    for &(label, fill) in records {
        buf.push(label);
        buf.extend(std::iter::repeat(fill).take(PIXELS));
    }
    buf
}
