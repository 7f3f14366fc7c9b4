//! Toggle configuration.
//!
//! Handles loading, validating, and merging `toggles.toml`. Stock defaults
//! reproduce the stock documentation theme; a user file overrides only the
//! keys it names.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [cookies]
//! lifetime_days = 2             # How long a stored preference lives (1-3650)
//!
//! [privacy]
//! query_param = "private"       # ?private=1 shows private API for one load
//! show_label = "Show Private API"
//! hide_label = "Hide Private API"
//!
//! [sidebar]
//! show_label = "Show Sidebar"
//! hide_label = "Hide Sidebar"
//! expand_glyph = "»"            # Shown while collapsed
//! collapse_glyph = "«"          # Shown while expanded
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::store::{DEFAULT_LIFETIME_DAYS, MAX_LIFETIME_DAYS, lifetime};

/// File name looked up in the config directory.
pub const CONFIG_FILENAME: &str = "toggles.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `toggles.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToggleConfig {
    /// Persistence settings shared by both toggles.
    pub cookies: CookieConfig,
    /// Private API toggle: override parameter and button labels.
    pub privacy: PrivacyConfig,
    /// Sidebar toggle: labels and arrow glyphs.
    pub sidebar: SidebarConfig,
}

impl ToggleConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let days = self.cookies.lifetime_days;
        if !(1..=MAX_LIFETIME_DAYS).contains(&days) {
            return Err(ConfigError::Validation(format!(
                "cookies.lifetime_days must be between 1 and {MAX_LIFETIME_DAYS}, got {days}"
            )));
        }
        let param = &self.privacy.query_param;
        if param.is_empty()
            || !param
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ConfigError::Validation(format!(
                "privacy.query_param must be non-empty and use only [A-Za-z0-9_-], got {param:?}"
            )));
        }
        let texts = [
            ("privacy.show_label", &self.privacy.show_label),
            ("privacy.hide_label", &self.privacy.hide_label),
            ("sidebar.show_label", &self.sidebar.show_label),
            ("sidebar.hide_label", &self.sidebar.hide_label),
            ("sidebar.expand_glyph", &self.sidebar.expand_glyph),
            ("sidebar.collapse_glyph", &self.sidebar.collapse_glyph),
        ];
        if let Some((key, _)) = texts.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(ConfigError::Validation(format!("{key} must not be empty")));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CookieConfig {
    /// Days a written preference stays valid.
    pub lifetime_days: u32,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            lifetime_days: DEFAULT_LIFETIME_DAYS,
        }
    }
}

impl CookieConfig {
    pub fn ttl(&self) -> Duration {
        lifetime(self.lifetime_days)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PrivacyConfig {
    /// Query parameter that forces private entries visible for one load.
    pub query_param: String,
    /// Button text while private entries are hidden.
    pub show_label: String,
    /// Button text while private entries are shown.
    pub hide_label: String,
}

impl Default for PrivacyConfig {
    fn default() -> Self {
        Self {
            query_param: "private".to_string(),
            show_label: "Show Private API".to_string(),
            hide_label: "Hide Private API".to_string(),
        }
    }
}

impl PrivacyConfig {
    /// Label for the action the button performs next.
    pub fn label(&self, hidden: bool) -> &str {
        if hidden { &self.show_label } else { &self.hide_label }
    }

    /// Canonical query written to the address bar while private entries are shown.
    pub fn query_marker(&self) -> String {
        format!("{}=1", self.query_param)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SidebarConfig {
    /// Label text while collapsed.
    pub show_label: String,
    /// Label text while expanded.
    pub hide_label: String,
    /// Arrow shown while collapsed.
    pub expand_glyph: String,
    /// Arrow shown while expanded.
    pub collapse_glyph: String,
}

impl Default for SidebarConfig {
    fn default() -> Self {
        Self {
            show_label: "Show Sidebar".to_string(),
            hide_label: "Hide Sidebar".to_string(),
            expand_glyph: "»".to_string(),
            collapse_glyph: "«".to_string(),
        }
    }
}

impl SidebarConfig {
    pub fn label(&self, collapsed: bool) -> &str {
        if collapsed { &self.show_label } else { &self.hide_label }
    }

    pub fn glyph(&self, collapsed: bool) -> &str {
        if collapsed { &self.expand_glyph } else { &self.collapse_glyph }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// [`ToggleConfig::default`] as a TOML table, the base every `toggles.toml`
/// is laid over.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ToggleConfig::default()).expect("default config must serialize")
}

/// Lay a user's `toggles.toml` over the stock table.
///
/// There is only ever one overlay: a file that sets `[privacy] show_label`
/// keeps the stock `hide_label` and `query_param` beside it. Any non-table
/// value in the file replaces the stock one outright.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read `toggles.toml` from the `--config-dir` directory, or `Ok(None)` when
/// the site ships without one.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge, deserialize, then [`validate`](ToggleConfig::validate). Errors name
/// the offending key so `load` can report it before touching the jar.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ToggleConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ToggleConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// The config every CLI command runs with.
pub fn load_config(dir: &Path) -> Result<ToggleConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(dir)?)
}

/// Returns a fully-commented stock `toggles.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# apidoc-toggles configuration
# ============================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Preference cookies
# ---------------------------------------------------------------------------
[cookies]
# Days a stored preference (private-hidden, sidebar-collapsed) stays valid,
# between 1 and 3650. Every toggle click and every first-visit default
# rewrites it.
lifetime_days = 2

# ---------------------------------------------------------------------------
# Private API toggle
# ---------------------------------------------------------------------------
[privacy]
# ?private=1 shows private entries for a single load without touching
# the stored preference. Any value starting with a non-zero integer counts.
query_param = "private"

# Button text, describing what a click will do.
show_label = "Show Private API"
hide_label = "Hide Private API"

# ---------------------------------------------------------------------------
# Sidebar toggle
# ---------------------------------------------------------------------------
[sidebar]
show_label = "Show Sidebar"
hide_label = "Hide Sidebar"

# Arrow shown while collapsed / expanded.
expand_glyph = "»"
collapse_glyph = "«"
"##
}
