use std::fmt;
use std::path::PathBuf;

use crate::model::AssetKind;

#[derive(Debug)]
pub enum Error {
    /// A required static image is not present on disk.
    MissingAsset { asset: AssetKind, path: PathBuf },
    InvalidAsset(String),
    InvalidFieldMap(String),
    Io(std::io::Error),
    Pdf(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingAsset { asset, path } => {
                write!(f, "missing {} image: {}", asset, path.display())
            }
            Error::InvalidAsset(msg) => write!(f, "invalid image asset: {msg}"),
            Error::InvalidFieldMap(msg) => write!(f, "invalid field map: {msg}"),
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::Pdf(msg) => write!(f, "PDF error: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::InvalidFieldMap(e.to_string())
    }
}
