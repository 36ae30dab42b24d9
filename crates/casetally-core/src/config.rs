use crate::CoreError;
use crate::patterns::{StructuralPattern, default_patterns};
use crate::regions::RegionSet;

/// Place-name substrings that mark a match as header or footer noise.
pub const DEFAULT_NOISE_TOKENS: &[&str] = &["argentina", "covid", "informe"];

/// Filler words removed from page text before matching. Report tables put
/// "personas" between the count and the place name.
pub const DEFAULT_FILLER_WORDS: &[&str] = &["personas"];

/// Controls how a list of patterns/values is overridden from its defaults.
#[derive(Debug, Clone, Default)]
pub enum ListOverride<T> {
    /// Use the built-in defaults.
    #[default]
    Default,
    /// Completely replace the defaults with these values.
    Replace(Vec<T>),
    /// Append these values to the defaults.
    Extend(Vec<T>),
}

impl<T: Clone> ListOverride<T> {
    /// Resolve this override against the given defaults.
    pub fn resolve(&self, defaults: &[T]) -> Vec<T> {
        match self {
            ListOverride::Default => defaults.to_vec(),
            ListOverride::Replace(v) => v.clone(),
            ListOverride::Extend(v) => {
                let mut result = defaults.to_vec();
                result.extend(v.iter().cloned());
                result
            }
        }
    }
}

/// Configuration for the report parser.
///
/// Lists are resolved against their defaults when the config is built, so a
/// `ParserConfig` is ready to use and never changes afterwards. Use
/// [`ParserConfigBuilder`] to construct with string patterns.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Structural patterns, applied in order.
    pub(crate) patterns: Vec<StructuralPattern>,
    /// Lowercase substrings that reject a place name.
    pub(crate) noise_tokens: Vec<String>,
    /// Words deleted from page text before matching.
    pub(crate) filler_words: Vec<String>,
    /// Canonical regions matches are resolved against.
    pub(crate) regions: RegionSet,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            patterns: default_patterns().to_vec(),
            noise_tokens: DEFAULT_NOISE_TOKENS.iter().map(|s| s.to_string()).collect(),
            filler_words: DEFAULT_FILLER_WORDS.iter().map(|s| s.to_string()).collect(),
            regions: RegionSet::default(),
        }
    }
}

impl ParserConfig {
    pub fn patterns(&self) -> &[StructuralPattern] {
        &self.patterns
    }

    pub fn noise_tokens(&self) -> &[String] {
        &self.noise_tokens
    }

    pub fn filler_words(&self) -> &[String] {
        &self.filler_words
    }

    pub fn regions(&self) -> &RegionSet {
        &self.regions
    }
}

/// Builder for [`ParserConfig`].
///
/// Accepts string patterns that are compiled in [`build()`](Self::build).
/// Fails fast if any pattern is invalid or lacks the `num`/`place` groups.
#[derive(Debug, Clone, Default)]
pub struct ParserConfigBuilder {
    patterns: ListOverride<(String, String)>,
    noise_tokens: ListOverride<String>,
    filler_words: ListOverride<String>,
    regions: Option<Vec<String>>,
}

impl ParserConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Structural patterns ──

    pub fn set_patterns(mut self, patterns: Vec<(String, String)>) -> Self {
        self.patterns = ListOverride::Replace(patterns);
        self
    }

    pub fn add_pattern(mut self, name: &str, pattern: &str) -> Self {
        let entry = (name.to_string(), pattern.to_string());
        match &mut self.patterns {
            ListOverride::Extend(v) => v.push(entry),
            _ => self.patterns = ListOverride::Extend(vec![entry]),
        }
        self
    }

    // ── Noise tokens ──

    pub fn set_noise_tokens(mut self, tokens: Vec<String>) -> Self {
        self.noise_tokens = ListOverride::Replace(tokens);
        self
    }

    pub fn add_noise_token(mut self, token: String) -> Self {
        match &mut self.noise_tokens {
            ListOverride::Extend(v) => v.push(token),
            _ => self.noise_tokens = ListOverride::Extend(vec![token]),
        }
        self
    }

    // ── Filler words ──

    pub fn set_filler_words(mut self, words: Vec<String>) -> Self {
        self.filler_words = ListOverride::Replace(words);
        self
    }

    // ── Regions ──

    pub fn regions(mut self, labels: Vec<String>) -> Self {
        self.regions = Some(labels);
        self
    }

    /// Compile all patterns and produce a [`ParserConfig`].
    pub fn build(self) -> Result<ParserConfig, CoreError> {
        let patterns = match self.patterns {
            ListOverride::Default => default_patterns().to_vec(),
            ListOverride::Replace(custom) => compile_patterns(&custom)?,
            ListOverride::Extend(custom) => {
                let mut all = default_patterns().to_vec();
                all.extend(compile_patterns(&custom)?);
                all
            }
        };

        let default_noise: Vec<String> =
            DEFAULT_NOISE_TOKENS.iter().map(|s| s.to_string()).collect();
        let noise_tokens = self
            .noise_tokens
            .resolve(&default_noise)
            .into_iter()
            .map(|t| t.to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        let default_filler: Vec<String> =
            DEFAULT_FILLER_WORDS.iter().map(|s| s.to_string()).collect();
        let filler_words = self
            .filler_words
            .resolve(&default_filler)
            .into_iter()
            .filter(|w| !w.is_empty())
            .collect();

        let regions = match self.regions {
            Some(labels) => RegionSet::new(labels)?,
            None => RegionSet::default(),
        };

        Ok(ParserConfig {
            patterns,
            noise_tokens,
            filler_words,
            regions,
        })
    }
}

fn compile_patterns(specs: &[(String, String)]) -> Result<Vec<StructuralPattern>, CoreError> {
    specs
        .iter()
        .map(|(name, pattern)| StructuralPattern::new(name, pattern))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ParserConfig::default();
        assert_eq!(config.patterns().len(), 3);
        assert_eq!(config.noise_tokens(), &["argentina", "covid", "informe"]);
        assert_eq!(config.filler_words(), &["personas"]);
        assert_eq!(config.regions().len(), 24);
    }

    #[test]
    fn test_builder_defaults_match_default() {
        let built = ParserConfigBuilder::new().build().unwrap();
        let default = ParserConfig::default();
        assert_eq!(built.noise_tokens(), default.noise_tokens());
        assert_eq!(built.patterns().len(), default.patterns().len());
    }

    #[test]
    fn test_builder_extends_noise_tokens_lowercased() {
        let config = ParserConfigBuilder::new()
            .add_noise_token("Ministerio".to_string())
            .add_noise_token("Salud".to_string())
            .build()
            .unwrap();
        assert_eq!(
            config.noise_tokens(),
            &["argentina", "covid", "informe", "ministerio", "salud"]
        );
    }

    #[test]
    fn test_builder_replaces_noise_tokens() {
        let config = ParserConfigBuilder::new()
            .set_noise_tokens(vec!["reporte".to_string(), String::new()])
            .build()
            .unwrap();
        assert_eq!(config.noise_tokens(), &["reporte"]);
    }

    #[test]
    fn test_builder_adds_pattern_after_defaults() {
        let config = ParserConfigBuilder::new()
            .add_pattern("colon", r"(?P<place>[A-Z]\w+):\s*(?P<num>\d+)")
            .build()
            .unwrap();
        let names: Vec<&str> = config.patterns().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["inline", "parenthesised", "summary_row", "colon"]);
    }

    #[test]
    fn test_builder_invalid_pattern() {
        let result = ParserConfigBuilder::new()
            .add_pattern("broken", r"(?P<num>\d+")
            .build();
        assert!(matches!(result, Err(CoreError::Pattern(_))));
    }

    #[test]
    fn test_builder_empty_regions_rejected() {
        let result = ParserConfigBuilder::new().regions(vec![]).build();
        assert!(matches!(result, Err(CoreError::EmptyRegionSet)));
    }

    #[test]
    fn test_list_override_resolve() {
        let defaults = vec!["a".to_string(), "b".to_string()];

        let d: ListOverride<String> = ListOverride::Default;
        assert_eq!(d.resolve(&defaults), defaults);

        let r: ListOverride<String> = ListOverride::Replace(vec!["x".to_string()]);
        assert_eq!(r.resolve(&defaults), vec!["x".to_string()]);

        let e: ListOverride<String> = ListOverride::Extend(vec!["c".to_string()]);
        assert_eq!(
            e.resolve(&defaults),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }
}
