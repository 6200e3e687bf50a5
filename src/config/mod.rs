/// Configuration system for spotpanel.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults** — [`schema::PanelConfig::default()`]
/// 2. **User global config** — `~/.spotpanel/config.toml`
/// 3. **Project local config** — `.spotpanel.toml` in the current directory
/// 4. **Environment variables** — `SPOTPANEL_*` overrides (highest precedence)
///
/// # Usage
///
/// ```rust,ignore
/// use spotpanel::config;
///
/// let cfg = config::load();
/// let api = HttpSpotApi::from_config(&cfg.api);
/// ```
pub mod schema;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub use schema::PanelConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration.
///
/// Merges defaults → global TOML → project TOML → env vars. File layers merge
/// key by key: a project file that only sets `[api] timeout_ms` keeps every
/// other value from the global file.
pub fn load() -> PanelConfig {
    let layers = [global_config_path(), project_config_path()]
        .into_iter()
        .filter_map(load_toml_file);

    let mut config = merge_layers(layers);
    apply_env_overrides(&mut config);

    config
}

/// Read a TOML config file as a raw table (if it exists).
///
/// Malformed files, and files whose values don't fit the schema, are ignored
/// so a broken config never blocks the panel.
fn load_toml_file(path: Option<PathBuf>) -> Option<toml::Table> {
    let path = path?;
    let content = fs::read_to_string(&path).ok()?;
    toml::from_str(&content).ok()
}

/// Overlay raw TOML layers onto the defaults, later layers winning per key.
fn merge_layers(layers: impl IntoIterator<Item = toml::Table>) -> PanelConfig {
    let mut merged = toml::Table::new();
    for layer in layers {
        if fits_schema(&layer) {
            merge_table(&mut merged, layer);
        }
    }

    toml::Value::Table(merged).try_into().unwrap_or_default()
}

fn fits_schema(layer: &toml::Table) -> bool {
    let parsed: Result<PanelConfig, _> = toml::Value::Table(layer.clone()).try_into();
    parsed.is_ok()
}

/// Recursively merge `overlay` into `base`. Nested tables merge; any other
/// value replaces the one in `base`.
fn merge_table(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_table(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.spotpanel/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".spotpanel").join("config.toml"))
}

/// Path to the project local config: `.spotpanel.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".spotpanel.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Expand a leading `~/` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `SPOTPANEL_BASE_URL` — backend base URL
/// - `SPOTPANEL_TIMEOUT_MS` — request timeout (`0` = transport default)
/// - `SPOTPANEL_SESSION_COOKIE` — forwarded `Cookie` header
/// - `SPOTPANEL_WEB_ADDR` — listen address for `spotpanel serve`
/// - `SPOTPANEL_LOGGING` — event log switch (`1`/`true`/`yes`/`on`)
fn apply_env_overrides(config: &mut PanelConfig) {
    if let Ok(val) = std::env::var("SPOTPANEL_BASE_URL")
        && !val.is_empty()
    {
        config.api.base_url = val;
    }
    if let Ok(val) = std::env::var("SPOTPANEL_TIMEOUT_MS")
        && let Ok(ms) = val.parse::<u64>()
    {
        config.api.timeout_ms = ms;
    }
    if let Ok(val) = std::env::var("SPOTPANEL_SESSION_COOKIE") {
        config.api.session_cookie = val;
    }
    if let Ok(val) = std::env::var("SPOTPANEL_WEB_ADDR")
        && !val.is_empty()
    {
        config.web.addr = val;
    }
    if let Ok(val) = std::env::var("SPOTPANEL_LOGGING") {
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
// Config init / show
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.spotpanel/config.toml`.
///
/// Returns an error if the file already exists and `force` is not set.
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.spotpanel/ directory")?;
    }

    fs::write(&path, PanelConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
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
    fn expand_home_leaves_plain_paths_alone() {
        assert_eq!(expand_home("/var/log/x.jsonl"), PathBuf::from("/var/log/x.jsonl"));
        assert_eq!(expand_home("events.jsonl"), PathBuf::from("events.jsonl"));
    }

    #[test]
    fn expand_home_resolves_tilde() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/.spotpanel/e.jsonl"), home.join(".spotpanel/e.jsonl"));
        }
    }

    fn table(src: &str) -> toml::Table {
        toml::from_str(src).unwrap()
    }

    #[test]
    fn later_layers_override_per_key() {
        let global = table(
            r#"
            [api]
            base_url = "http://parking.internal:5000"
            session_cookie = "session=abc"

            [panel]
            currency_symbol = "$"
            "#,
        );
        let project = table(
            r#"
            [api]
            timeout_ms = 2500
            "#,
        );

        let cfg = merge_layers([global, project]);
        assert_eq!(cfg.api.base_url, "http://parking.internal:5000");
        assert_eq!(cfg.api.session_cookie, "session=abc");
        assert_eq!(cfg.api.timeout_ms, 2500);
        assert_eq!(cfg.panel.currency_symbol, "$");
        assert_eq!(cfg.web.addr, PanelConfig::default().web.addr);
    }

    #[test]
    fn project_value_wins_over_global_value() {
        let global = table("[panel]\ncurrency_symbol = \"$\"\n");
        let project = table("[panel]\ncurrency_symbol = \"EUR \"\n");

        assert_eq!(merge_layers([global, project]).panel.currency_symbol, "EUR ");
    }

    #[test]
    fn layer_with_wrong_types_is_skipped() {
        let global = table("[api]\nbase_url = \"http://parking.internal:5000\"\n");
        let broken = table("[api]\ntimeout_ms = \"soon\"\nbase_url = \"http://elsewhere\"\n");

        let cfg = merge_layers([global, broken]);
        assert_eq!(cfg.api.base_url, "http://parking.internal:5000");
        assert_eq!(cfg.api.timeout_ms, 0);
    }

    #[test]
    fn no_layers_gives_defaults() {
        let cfg = merge_layers(Vec::<toml::Table>::new());
        assert_eq!(cfg.api.base_url, PanelConfig::default().api.base_url);
        assert!(cfg.logging.enabled);
    }

    #[test]
    fn show_effective_config_returns_toml() {
        let toml_str = show_effective_config().unwrap();
        let _: PanelConfig = toml::from_str(&toml_str).unwrap();
    }
}
