/// Error taxonomy for the viewer library
use std::path::PathBuf;

use thiserror::Error;

use crate::stl::ParseError;

/// Everything that can go wrong while cataloging, loading, or navigating
/// models. All variants are logged at their point of origin and swallowed;
/// the previously displayed model stays on screen.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("i/o failure on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not decode {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("model index {index} out of range (catalog holds {len})")]
    InvalidIndex { index: usize, len: usize },
}

impl ViewerError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, source: ParseError) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::path::Path;

    #[test]
    fn io_variant_names_the_path() {
        let err = ViewerError::io(
            Path::new("models/a.stl"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        let message = err.to_string();
        assert!(message.contains("models/a.stl"), "{message}");
        assert!(err.source().is_some());
    }

    #[test]
    fn parse_variant_carries_the_decode_error() {
        let err = ViewerError::parse(Path::new("bad.stl"), ParseError::Truncated(12));
        assert!(err.to_string().contains("bad.stl"));
        assert!(err.source().unwrap().to_string().contains("12 bytes"));
    }

    #[test]
    fn invalid_index_reports_both_numbers() {
        let err = ViewerError::InvalidIndex { index: 4, len: 2 };
        let message = err.to_string();
        assert!(message.contains('4') && message.contains('2'), "{message}");
    }
}
