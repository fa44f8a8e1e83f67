//! All error types for the xamldict crate.
//!
//! These are returned from all fallible operations (parsing, serialization, loading, saving).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid data: {0}")]
    DataMismatch(String),

    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("unknown locale `{0}`")]
    UnknownLocale(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = Error::Io(io_error);
        assert!(error.to_string().contains("I/O error"));
    }

    #[test]
    fn test_invalid_document_error() {
        let error = Error::InvalidDocument("missing 'x:Key'".to_string());
        assert_eq!(error.to_string(), "invalid document: missing 'x:Key'");
    }

    #[test]
    fn test_unknown_locale_error() {
        let error = Error::UnknownLocale("xx".to_string());
        assert_eq!(error.to_string(), "unknown locale `xx`");
    }

    #[test]
    fn test_error_debug() {
        let error = Error::DataMismatch("test".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("DataMismatch"));
        assert!(debug.contains("test"));
    }
}
