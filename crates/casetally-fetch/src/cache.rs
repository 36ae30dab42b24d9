use std::path::{Path, PathBuf};

use casetally_core::report_date::file_name;

use crate::FetchError;

/// Directory of downloaded reports, keyed by the final segment of each link.
///
/// A report already on disk is never downloaded again.
#[derive(Debug, Clone)]
pub struct DocumentCache {
    dir: PathBuf,
}

impl DocumentCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where `link` is (or would be) cached.
    pub fn path_for(&self, link: &str) -> Result<PathBuf, FetchError> {
        let without_query = link.split(['?', '#']).next().unwrap_or(link);
        let name = file_name(without_query);
        if name.is_empty() || name == "." || name == ".." {
            return Err(FetchError::InvalidUrl(link.to_string()));
        }
        Ok(self.dir.join(name))
    }

    pub fn contains(&self, link: &str) -> bool {
        self.path_for(link).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Return the cached copy of `link`, downloading it first if needed.
    pub async fn fetch(&self, client: &reqwest::Client, link: &str) -> Result<PathBuf, FetchError> {
        let path = self.path_for(link)?;
        if tokio::fs::try_exists(&path).await? {
            tracing::debug!(path = %path.display(), "cache hit");
            return Ok(path);
        }

        tokio::fs::create_dir_all(&self.dir).await?;

        let resp = client.get(link).send().await?;
        if !resp.status().is_success() {
            return Err(FetchError::Status {
                url: link.to_string(),
                status: resp.status(),
            });
        }
        let bytes = resp.bytes().await?;

        // Write then rename so an interrupted download never looks cached.
        let partial = path.with_extension("part");
        tokio::fs::write(&partial, &bytes).await?;
        tokio::fs::rename(&partial, &path).await?;

        tracing::info!(link, path = %path.display(), bytes = bytes.len(), "downloaded report");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_for_uses_last_segment() {
        let cache = DocumentCache::new("/tmp/reports");
        let path = cache
            .path_for("https://example.org/files/02-04-20-reporte.pdf?download=1")
            .unwrap();
        assert_eq!(path, PathBuf::from("/tmp/reports/02-04-20-reporte.pdf"));
    }

    #[test]
    fn test_path_for_rejects_directory_links() {
        let cache = DocumentCache::new("/tmp/reports");
        assert!(matches!(
            cache.path_for("https://example.org/files/"),
            Err(FetchError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_cached_file_is_not_downloaded() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DocumentCache::new(dir.path());
        let link = "https://unreachable.invalid/files/01-04-20.pdf";
        std::fs::write(dir.path().join("01-04-20.pdf"), b"%PDF-1.4").unwrap();

        assert!(cache.contains(link));
        let path = cache.fetch(&reqwest::Client::new(), link).await.unwrap();
        assert_eq!(path, dir.path().join("01-04-20.pdf"));
    }

    #[test]
    fn test_missing_file_not_contained() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DocumentCache::new(dir.path().join("missing"));
        assert!(!cache.contains("https://example.org/02-04-20.pdf"));
    }
}
