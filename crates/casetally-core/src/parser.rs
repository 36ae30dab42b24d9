use std::path::Path;

use crate::backend::{BackendError, PdfBackend};
use crate::config::ParserConfig;
use crate::normalize::strip_separated_accents;
use crate::resolver::RegionResolver;
use crate::{ExtractionMatch, ResolvedRecord};

/// Separator placed between flattened pages.
pub const PAGE_SEPARATOR: &str = "\n\n";

/// Best-effort extraction of `(count, place)` records from report text.
///
/// Holds a [`ParserConfig`] and the resolver built from its region set.
/// Parsing never fails: text that matches nothing yields no records.
#[derive(Debug, Clone)]
pub struct ReportParser {
    config: ParserConfig,
    resolver: RegionResolver,
}

impl Default for ReportParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportParser {
    /// Create a parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
            resolver: RegionResolver::default(),
        }
    }

    /// Create a parser with a custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        let resolver = RegionResolver::new(config.regions().clone());
        Self { config, resolver }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn resolver(&self) -> &RegionResolver {
        &self.resolver
    }

    /// Remove filler words from one page, put it on a single line and drop
    /// separated accent glyphs so place names are not cut at them.
    pub fn clean_page(&self, page: &str) -> String {
        let mut text = page.to_string();
        for word in &self.config.filler_words {
            text = text.replace(word.as_str(), "");
        }
        strip_separated_accents(&text.replace('\n', " "))
    }

    /// Flatten extracted pages into the single text the patterns run over.
    pub fn flatten_pages<S: AsRef<str>>(&self, pages: &[S]) -> String {
        pages
            .iter()
            .map(|p| self.clean_page(p.as_ref()))
            .collect::<Vec<_>>()
            .join(PAGE_SEPARATOR)
    }

    /// Run every structural pattern over `text`.
    ///
    /// Results are grouped by pattern in configuration order. The same
    /// fact printed in two layouts is reported twice.
    pub fn parse(&self, text: &str) -> Vec<ExtractionMatch> {
        let mut matches = Vec::new();
        for pattern in &self.config.patterns {
            let before = matches.len();
            for raw in pattern.captures(text) {
                if self.is_noise(raw.place) {
                    continue;
                }
                // Digit runs too long for u64 are noise as well.
                let Ok(count) = raw.num.parse::<u64>() else {
                    continue;
                };
                if count == 0 {
                    continue;
                }
                matches.push(ExtractionMatch {
                    count,
                    place: raw.place.to_string(),
                    cumulative: raw.acum.and_then(|a| a.parse().ok()),
                    pattern: pattern.name().to_string(),
                });
            }
            tracing::debug!(
                pattern = pattern.name(),
                matches = matches.len() - before,
                "applied structural pattern"
            );
        }
        matches
    }

    /// Attach the canonical region to a match.
    pub fn resolve(&self, m: ExtractionMatch) -> ResolvedRecord {
        let resolution = self.resolver.resolve(&m.place);
        ResolvedRecord {
            region: resolution.region,
            confidence: resolution.confidence,
            extraction: m,
        }
    }

    /// [`parse`](Self::parse) then [`resolve`](Self::resolve) every match.
    pub fn parse_resolved(&self, text: &str) -> Vec<ResolvedRecord> {
        self.parse(text)
            .into_iter()
            .map(|m| self.resolve(m))
            .collect()
    }

    /// Extract a PDF's pages through `backend`, flatten them and parse.
    pub fn extract_records_via_backend(
        &self,
        path: &Path,
        backend: &dyn PdfBackend,
    ) -> Result<Vec<ResolvedRecord>, BackendError> {
        let pages = backend.extract_pages(path)?;
        let text = self.flatten_pages(&pages);
        let records = self.parse_resolved(&text);
        tracing::info!(
            path = %path.display(),
            pages = pages.len(),
            records = records.len(),
            "parsed report"
        );
        Ok(records)
    }

    fn is_noise(&self, place: &str) -> bool {
        let lower = place.to_lowercase();
        self.config
            .noise_tokens
            .iter()
            .any(|token| lower.contains(token.as_str()))
    }
}
