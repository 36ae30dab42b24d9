use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub source: Option<SourceConfig>,
    pub parsing: Option<ParsingConfig>,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Page listing the daily report PDFs.
    pub index_url: Option<String>,
    /// Directory downloaded reports are cached in.
    pub cache_dir: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsingConfig {
    /// Appended to the built-in noise tokens.
    pub extra_noise_tokens: Option<Vec<String>>,
    /// Records resolved below this confidence are dropped by the pipeline.
    pub min_confidence: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// `csv` or `json`.
    pub format: Option<String>,
    pub path: Option<String>,
}

/// Platform config directory path: `<config_dir>/casetally/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("casetally").join("config.toml"))
}

/// Load config by cascading CWD `.casetally.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".casetally.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let base_source = base.source.unwrap_or_default();
    let base_parsing = base.parsing.unwrap_or_default();
    let base_output = base.output.unwrap_or_default();
    let source = overlay.source.unwrap_or_default();
    let parsing = overlay.parsing.unwrap_or_default();
    let output = overlay.output.unwrap_or_default();

    ConfigFile {
        source: Some(SourceConfig {
            index_url: source.index_url.or(base_source.index_url),
            cache_dir: source.cache_dir.or(base_source.cache_dir),
            user_agent: source.user_agent.or(base_source.user_agent),
        }),
        parsing: Some(ParsingConfig {
            extra_noise_tokens: parsing
                .extra_noise_tokens
                .or(base_parsing.extra_noise_tokens),
            min_confidence: parsing.min_confidence.or(base_parsing.min_confidence),
        }),
        output: Some(OutputConfig {
            format: output.format.or(base_output.format),
            path: output.path.or(base_output.path),
        }),
    }
}

/// Save the current config to the platform config directory.
pub fn save_config(config: &ConfigFile) -> Result<PathBuf, String> {
    let path = config_path().ok_or_else(|| "Could not determine config directory".to_string())?;
    save_to_path(config, &path)?;
    Ok(path)
}

/// Write `config` as TOML to `path`, creating parent directories.
pub fn save_to_path(config: &ConfigFile, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }
    let content =
        toml::to_string_pretty(config).map_err(|e| format!("Failed to serialize config: {}", e))?;
    std::fs::write(path, content).map_err(|e| format!("Failed to write config: {}", e))
}
