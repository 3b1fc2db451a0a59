/// Configuration schema and defaults for carbonlens.
///
/// Defines the TOML-serializable configuration with sections `[general]`,
/// `[data]` and `[logging]`. Every field has a built-in default; users only
/// set the values they want to override.
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level carbonlens configuration.
///
/// Maps directly to `~/.carbonlens/config.toml` and `.carbonlens.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarbonConfig {
    pub general: GeneralConfig,
    pub data: DataConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [general]
// ---------------------------------------------------------------------------

/// Output format for analytics commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    /// Parse a format name; unknown names yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Some(Self::Table),
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// User analysed when a command is run without `--user`.
    pub default_user: String,
    /// Default output format: `table`, `json` or `csv`.
    pub format: OutputFormat,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_user: "demo_alexa".to_string(),
            format: OutputFormat::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// [data]
// ---------------------------------------------------------------------------

/// Dataset source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Path to a JSON dataset file. Empty means the built-in demo dataset.
    /// `~` is expanded to the home directory.
    pub path: String,
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

/// Query event logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Whether query events are appended to the event log.
    pub enabled: bool,
    /// Path to the JSONL event log. `~` is expanded to the home directory.
    pub path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "~/.carbonlens/events.jsonl".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Annotated default file
// ---------------------------------------------------------------------------

impl CarbonConfig {
    /// The annotated default config written by `carbonlens config init`.
    pub fn default_toml() -> String {
        r#"# carbonlens Configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (CARBONLENS_*)
#   2. Project config (.carbonlens.toml in current directory)
#   3. User global config (~/.carbonlens/config.toml)
#   4. Built-in defaults

[general]
default_user = "demo_alexa"
format = "table"              # table | json | csv

[data]
path = ""                     # JSON dataset file; empty = built-in demo data

[logging]
enabled = true
path = "~/.carbonlens/events.jsonl"
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_toml_parses_back() {
        let config: CarbonConfig = toml::from_str(&CarbonConfig::default_toml()).unwrap();
        assert_eq!(config, CarbonConfig::default());
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: CarbonConfig = toml::from_str("[general]\nformat = \"json\"\n").unwrap();
        assert_eq!(config.general.format, OutputFormat::Json);
        assert_eq!(config.general.default_user, "demo_alexa");
        assert!(config.logging.enabled);
        assert!(config.data.path.is_empty());
    }

    #[test]
    fn rejects_unknown_format() {
        let result: Result<CarbonConfig, _> = toml::from_str("[general]\nformat = \"xml\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn output_format_parsing() {
        assert_eq!(OutputFormat::parse("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("csv"), Some(OutputFormat::Csv));
        assert_eq!(OutputFormat::parse("table"), Some(OutputFormat::Table));
        assert_eq!(OutputFormat::parse("xml"), None);
    }
}
