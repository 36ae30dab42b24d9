use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    OpenError(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for PDF text extraction backends.
///
/// Implementors provide the low-level text extraction step; flattening and
/// pattern matching live in [`crate::ReportParser`].
pub trait PdfBackend: Send + Sync {
    /// Extract the text of every page of a PDF file, in page order.
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReportParser;

    struct FixedPages(Vec<String>);

    impl PdfBackend for FixedPages {
        fn extract_pages(&self, _path: &Path) -> Result<Vec<String>, BackendError> {
            Ok(self.0.clone())
        }
    }

    struct Unreadable;

    impl PdfBackend for Unreadable {
        fn extract_pages(&self, path: &Path) -> Result<Vec<String>, BackendError> {
            Err(BackendError::OpenError(path.display().to_string()))
        }
    }

    #[test]
    fn test_records_via_backend() {
        let backend = FixedPages(vec![
            "Nuevos casos:\n- Salta 3 | 10".to_string(),
            "(2) en Chaco".to_string(),
        ]);
        let records = ReportParser::new()
            .extract_records_via_backend(Path::new("01-04-20.pdf"), &backend)
            .unwrap();
        let regions: Vec<&str> = records.iter().map(|r| r.region.as_str()).collect();
        assert_eq!(regions, vec!["Chaco", "Salta"]);
    }

    #[test]
    fn test_backend_error_propagates() {
        let result = ReportParser::new().extract_records_via_backend(Path::new("x.pdf"), &Unreadable);
        assert!(matches!(result, Err(BackendError::OpenError(_))));
    }
}
