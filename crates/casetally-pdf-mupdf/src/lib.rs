use std::path::Path;

use mupdf::{Document, TextPageFlags};

use casetally_core::{BackendError, PdfBackend};

/// MuPDF-based implementation of [`PdfBackend`].
///
/// This crate is the sole AGPL island: it isolates the mupdf dependency so
/// that the parsing crates do not transitively depend on it.
///
/// Each page is returned as its text lines joined with `\n`, in the
/// block/line order MuPDF reports. No layout analysis is attempted; the
/// report parser works on flat text.
#[derive(Debug, Default)]
pub struct MupdfBackend {
    /// Stop after this many pages. `None` reads the whole document.
    max_pages: Option<usize>,
}

impl MupdfBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only read the first `max_pages` pages. Pass `0` to read all pages.
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = if max_pages > 0 { Some(max_pages) } else { None };
        self
    }
}

impl PdfBackend for MupdfBackend {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, BackendError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| BackendError::OpenError("invalid path encoding".into()))?;

        let document =
            Document::open(path_str).map_err(|e| BackendError::OpenError(e.to_string()))?;

        let limit = self.max_pages.unwrap_or(usize::MAX);
        let mut pages_text = Vec::new();

        for page_result in document
            .pages()
            .map_err(|e| BackendError::ExtractionError(e.to_string()))?
            .take(limit)
        {
            let page = page_result.map_err(|e| BackendError::ExtractionError(e.to_string()))?;
            let text_page = page
                .to_text_page(TextPageFlags::empty())
                .map_err(|e| BackendError::ExtractionError(e.to_string()))?;

            let mut page_text = String::new();
            for block in text_page.blocks() {
                for line in block.lines() {
                    let line_text: String = line
                        .chars()
                        .map(|c| c.char().unwrap_or('\u{FFFD}'))
                        .collect();
                    page_text.push_str(&line_text);
                    page_text.push('\n');
                }
            }
            pages_text.push(page_text);
        }

        tracing::debug!(path = %path.display(), pages = pages_text.len(), "extracted PDF text");
        Ok(pages_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_open_error() {
        let result = MupdfBackend::new().extract_pages(Path::new("/nonexistent/01-04-20.pdf"));
        assert!(matches!(result, Err(BackendError::OpenError(_))));
    }

    #[test]
    fn test_max_pages_zero_reads_all() {
        let backend = MupdfBackend::new().with_max_pages(0);
        assert_eq!(backend.max_pages, None);
        let backend = MupdfBackend::new().with_max_pages(2);
        assert_eq!(backend.max_pages, Some(2));
    }
}
