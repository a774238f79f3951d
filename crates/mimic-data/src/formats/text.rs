// Raw text — one sample per character

use mimic_core::{Error, Result};

use crate::importer::{DatasetFormat, FormatImporter};

/// Importer for plain UTF-8 text files.
pub type RawTextImporter = FormatImporter<RawTextFormat>;

/// Every character becomes a sample whose data and label are that character,
/// which is what next-symbol prediction experiments consume.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawTextFormat;

impl DatasetFormat for RawTextFormat {
    type Data = char;
    type Label = char;

    fn name(&self) -> &str {
        "raw text"
    }

    fn parse(&self, data: &[u8], _labels: Option<&[u8]>) -> Result<Vec<(char, char)>> {
        let text = std::str::from_utf8(data).map_err(|e| Error::import("raw text", e.to_string()))?;
        Ok(text.chars().map(|c| (c, c)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_sample_per_char() {
        let pairs = RawTextFormat.parse("ab\nżc".as_bytes(), None).unwrap();
        let chars: Vec<char> = pairs.iter().map(|p| p.0).collect();
        assert_eq!(chars, vec!['a', 'b', '\n', 'ż', 'c']);
        assert!(pairs.iter().all(|(d, l)| d == l));
    }

    #[test]
    fn invalid_utf8_fails() {
        assert!(RawTextFormat.parse(&[0x61, 0xFF, 0x62], None).is_err());
    }
}
