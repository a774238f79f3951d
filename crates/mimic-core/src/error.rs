use std::path::PathBuf;

/// All errors that can occur within mimic.
///
/// Every variant belongs to one of four categories (see [`ErrorKind`]):
/// invalid configuration, failed dataset import, out-of-range access and
/// unsupported operations. A single error type is shared by every crate so
/// callers can propagate with `?` across the importer/encoder boundary.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing or invalid configuration value (file path, batch size, SDR length, ...).
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed or truncated dataset content.
    #[error("{format} import failed: {reason}")]
    Import { format: String, reason: String },

    /// A dataset file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The data and label sources declare different sample counts.
    #[error("sample count mismatch: {data} data items vs {labels} labels")]
    CountMismatch { data: usize, labels: usize },

    /// Index or cursor outside `[0, len)`.
    #[error("index {index} out of range for length {len}")]
    OutOfRange { index: usize, len: usize },

    /// Symbol absent from an encoder's alphabet.
    #[error("symbol {0} is not part of the alphabet")]
    UnknownSymbol(String),

    /// An SDR that cannot be decoded (wrong shape, no active unit).
    #[error("invalid SDR: {0}")]
    InvalidSdr(String),

    /// Operation without a meaningful implementation (e.g. decoding a lossy encoder).
    #[error("unsupported operation: {0}")]
    Unsupported(String),
}

/// Coarse error category, stable across variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    Import,
    OutOfRange,
    UnsupportedOperation,
}

impl Error {
    /// Create a configuration error from any message.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create an import error for the named format.
    pub fn import(format: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Import {
            format: format.into(),
            reason: reason.into(),
        }
    }

    /// Wrap an I/O failure on `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Error::Unsupported(msg.into())
    }

    /// The category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) => ErrorKind::Configuration,
            Error::Import { .. } | Error::Io { .. } | Error::CountMismatch { .. } => {
                ErrorKind::Import
            }
            Error::OutOfRange { .. } | Error::UnknownSymbol(_) | Error::InvalidSdr(_) => {
                ErrorKind::OutOfRange
            }
            Error::Unsupported(_) => ErrorKind::UnsupportedOperation,
        }
    }
}

/// Convenience Result type used throughout mimic.
pub type Result<T> = std::result::Result<T, Error>;

/// Macro for early return with a formatted configuration error.
/// Usage: `bail_config!("batch size must be positive, got {}", n)`
#[macro_export]
macro_rules! bail_config {
    ($($arg:tt)*) => {
        return Err($crate::Error::Config(format!($($arg)*)))
    };
}

/// Fail with [`Error::OutOfRange`] unless `index < len`.
pub fn check_index(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(Error::OutOfRange { index, len })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_group_variants() {
        assert_eq!(Error::config("x").kind(), ErrorKind::Configuration);
        assert_eq!(Error::import("mnist", "bad").kind(), ErrorKind::Import);
        assert_eq!(
            Error::CountMismatch { data: 1, labels: 2 }.kind(),
            ErrorKind::Import
        );
        assert_eq!(
            Error::io("a.bin", std::io::Error::from(std::io::ErrorKind::NotFound)).kind(),
            ErrorKind::Import
        );
        assert_eq!(
            Error::UnknownSymbol("'z'".into()).kind(),
            ErrorKind::OutOfRange
        );
        assert_eq!(
            Error::unsupported("decode").kind(),
            ErrorKind::UnsupportedOperation
        );
    }

    #[test]
    fn check_index_bounds() {
        assert!(check_index(0, 1).is_ok());
        assert!(matches!(
            check_index(3, 3),
            Err(Error::OutOfRange { index: 3, len: 3 })
        ));
    }

    #[test]
    fn messages_are_readable() {
        let e = Error::OutOfRange { index: 7, len: 4 };
        assert_eq!(e.to_string(), "index 7 out of range for length 4");
        let e = Error::import("cifar", "trailing partial record");
        assert_eq!(e.to_string(), "cifar import failed: trailing partial record");
    }
}
