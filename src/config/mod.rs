/// Configuration system for carbonlens.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults** - [`schema::CarbonConfig::default()`]
/// 2. **User global config** - `~/.carbonlens/config.toml`
/// 3. **Project local config** - `.carbonlens.toml` in the current directory
/// 4. **Environment variables** - `CARBONLENS_*` overrides (highest precedence)
///
/// Missing sections in a TOML file fall back to built-in defaults.
///
/// # Usage
///
/// ```rust,ignore
/// use carbonlens::config;
///
/// let cfg = config::load();
/// let store = config::open_dataset(&cfg)?;
/// ```
pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::data::{Dataset, demo};

pub use schema::{CarbonConfig, OutputFormat};

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars.
pub fn load() -> CarbonConfig {
    let mut config = load_layers(&[global_config_path(), project_config_path()]);
    apply_env_overrides(&mut config);
    config
}

/// Merge TOML files in order, later files overriding only the keys they set.
///
/// Keys no file sets keep their built-in defaults.
fn load_layers(paths: &[Option<PathBuf>]) -> CarbonConfig {
    let mut merged = toml::Table::new();
    for path in paths.iter().flatten() {
        if let Some(layer) = load_toml_table(path) {
            merge_tables(&mut merged, layer);
        }
    }

    toml::Value::Table(merged).try_into().unwrap_or_default()
}

/// Read one config file as a raw TOML table.
///
/// Returns `None` if the file doesn't exist, is not valid TOML, or holds a
/// value the schema rejects. A broken config file never stops an analytics
/// run, and never masks the layers around it.
fn load_toml_table(path: &Path) -> Option<toml::Table> {
    let content = fs::read_to_string(path).ok()?;
    let table: toml::Table = toml::from_str(&content).ok()?;
    toml::Value::Table(table.clone())
        .try_into::<CarbonConfig>()
        .ok()?;
    Some(table)
}

/// Recursively merge `overlay` into `base`. Nested tables merge key by key;
/// any other value replaces the base value.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match value {
            toml::Value::Table(overlay_table) => {
                if let Some(toml::Value::Table(base_table)) = base.get_mut(&key) {
                    merge_tables(base_table, overlay_table);
                } else {
                    base.insert(key, toml::Value::Table(overlay_table));
                }
            }
            other => {
                base.insert(key, other);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".carbonlens").join("config.toml"))
}

fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".carbonlens.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

/// Expand a leading `~` to the home directory.
///
/// Returns `None` for an empty path or when the home directory is unknown.
pub fn expand_path(raw: &str) -> Option<PathBuf> {
    if raw.is_empty() {
        return None;
    }
    match raw.strip_prefix("~/") {
        Some(rest) => dirs::home_dir().map(|home| home.join(rest)),
        None if raw == "~" => dirs::home_dir(),
        None => Some(PathBuf::from(raw)),
    }
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `CARBONLENS_USER` - default user id
/// - `CARBONLENS_FORMAT` - output format (`table`, `json`, `csv`)
/// - `CARBONLENS_DATA` - dataset JSON path
/// - `CARBONLENS_LOGGING` - event logging (`1`/`true`/`yes`/`on`)
fn apply_env_overrides(config: &mut CarbonConfig) {
    if let Ok(val) = std::env::var("CARBONLENS_USER")
        && !val.is_empty()
    {
        config.general.default_user = val;
    }
    if let Ok(val) = std::env::var("CARBONLENS_FORMAT")
        && let Some(format) = OutputFormat::parse(&val)
    {
        config.general.format = format;
    }
    if let Ok(val) = std::env::var("CARBONLENS_DATA") {
        config.data.path = val;
    }
    if let Ok(val) = std::env::var("CARBONLENS_LOGGING") {
        config.logging.enabled = is_truthy(&val);
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// Open the dataset named by `[data] path`, or the built-in demo dataset
/// when no path is configured.
pub fn open_dataset(config: &CarbonConfig) -> Result<Dataset> {
    match expand_path(&config.data.path) {
        Some(path) => Dataset::load(&path),
        None => Ok(demo::dataset()),
    }
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.carbonlens/config.toml`.
///
/// Returns an error if the file already exists, unless `force` is set.
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.carbonlens/ directory")?;
    }

    fs::write(&path, CarbonConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set a single config key (dotted, e.g. `general.format`) in the global
/// config file, creating it from defaults if needed.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;

    let content = if path.exists() {
        fs::read_to_string(&path).context("failed to read config file")?
    } else {
        toml::to_string_pretty(&CarbonConfig::default())
            .context("failed to serialize default config")?
    };

    let mut root: toml::Value =
        toml::from_str(&content).context("failed to parse config as TOML value")?;
    set_toml_value(&mut root, key, value)?;

    // Reject values the schema cannot load, e.g. `general.format = "xml"`.
    let output = toml::to_string_pretty(&root).context("failed to serialize updated config")?;
    toml::from_str::<CarbonConfig>(&output)
        .with_context(|| format!("invalid value '{value}' for '{key}'"))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, output).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path, keeping the
/// existing value's type.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    let Some((leaf, sections)) = parts.split_last() else {
        anyhow::bail!("empty config key");
    };

    let mut current = root;
    for &part in sections {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let table = current.as_table_mut().with_context(|| {
        format!(
            "expected table at '{}'",
            key.rsplit_once('.').map(|(s, _)| s).unwrap_or("")
        )
    })?;

    let new_value = match table.get(*leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::String(_)) => toml::Value::String(raw_value.to_string()),
        _ => anyhow::bail!("unknown config key '{key}'"),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_truthy_accepts_variants() {
        assert!(is_truthy("1"));
        assert!(is_truthy("TRUE"));
        assert!(is_truthy("yes"));
        assert!(is_truthy("on"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("off"));
        assert!(!is_truthy(""));
    }

    #[test]
    fn expand_path_handles_tilde_and_empty() {
        assert_eq!(expand_path(""), None);
        assert_eq!(
            expand_path("/tmp/data.json"),
            Some(PathBuf::from("/tmp/data.json"))
        );
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path("~/x.json"), Some(home.join("x.json")));
        }
    }

    #[test]
    fn open_dataset_defaults_to_demo() {
        let config = CarbonConfig::default();
        let dataset = open_dataset(&config).unwrap();
        assert_eq!(dataset, demo::dataset());
    }

    #[test]
    fn open_dataset_reports_missing_file() {
        let mut config = CarbonConfig::default();
        config.data.path = "/nonexistent/carbonlens/dataset.json".to_string();
        assert!(open_dataset(&config).is_err());
    }

    #[test]
    fn set_toml_value_updates_string() {
        let mut root: toml::Value = toml::from_str("[general]\nformat = \"table\"\n").unwrap();
        set_toml_value(&mut root, "general.format", "json").unwrap();
        assert_eq!(root["general"]["format"].as_str(), Some("json"));
    }

    #[test]
    fn set_toml_value_updates_bool() {
        let mut root: toml::Value = toml::from_str("[logging]\nenabled = true\n").unwrap();
        set_toml_value(&mut root, "logging.enabled", "off").unwrap();
        assert_eq!(root["logging"]["enabled"].as_bool(), Some(false));
    }

    #[test]
    fn set_toml_value_rejects_invalid_key() {
        let mut root: toml::Value = toml::from_str("[general]\nformat = \"table\"\n").unwrap();
        assert!(set_toml_value(&mut root, "nonexistent.key", "value").is_err());
        assert!(set_toml_value(&mut root, "general.missing", "value").is_err());
    }

    fn write_layer(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "carbonlens-{name}-{}.toml",
            std::process::id()
        ));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn project_layer_keeps_global_only_keys() {
        let global = write_layer(
            "layer-global",
            "[data]\npath = \"/srv/household.json\"\n\n[logging]\nenabled = false\n",
        );
        let project = write_layer("layer-project", "[general]\nformat = \"json\"\n");

        let config = load_layers(&[Some(global.clone()), Some(project.clone())]);
        assert_eq!(config.data.path, "/srv/household.json");
        assert!(!config.logging.enabled);
        assert_eq!(config.general.format, OutputFormat::Json);
        assert_eq!(config.general.default_user, "demo_alexa");

        let _ = fs::remove_file(global);
        let _ = fs::remove_file(project);
    }

    #[test]
    fn later_layer_overrides_same_key() {
        let global = write_layer(
            "override-global",
            "[general]\ndefault_user = \"demo_ben\"\nformat = \"csv\"\n",
        );
        let project = write_layer("override-project", "[general]\nformat = \"json\"\n");

        let config = load_layers(&[Some(global.clone()), Some(project.clone())]);
        assert_eq!(config.general.default_user, "demo_ben");
        assert_eq!(config.general.format, OutputFormat::Json);

        let _ = fs::remove_file(global);
        let _ = fs::remove_file(project);
    }

    #[test]
    fn invalid_layer_is_skipped() {
        let global = write_layer("skip-global", "[data]\npath = \"/srv/household.json\"\n");
        let project = write_layer("skip-project", "[general]\nformat = \"xml\"\n");

        let config = load_layers(&[Some(global.clone()), Some(project.clone()), None]);
        assert_eq!(config.data.path, "/srv/household.json");
        assert_eq!(config.general.format, OutputFormat::Table);

        let _ = fs::remove_file(global);
        let _ = fs::remove_file(project);
    }

    #[test]
    fn set_toml_value_rejects_non_scalar_target() {
        let mut root: toml::Value = toml::from_str("[general]\nformat = \"table\"\n").unwrap();
        assert!(set_toml_value(&mut root, "general", "json").is_err());
    }

    #[test]
    fn show_effective_config_returns_toml() {
        let toml_str = show_effective_config().unwrap();
        let _: CarbonConfig = toml::from_str(&toml_str).unwrap();
    }
}
