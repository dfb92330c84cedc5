use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level fwcheck configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FwConfig {
    pub tools: ToolsConfig,
    pub reference: ReferenceConfig,
    pub lookup: LookupConfig,
    pub logging: LoggingConfig,
}

/// Locations of the external programs that are invoked.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub system_profiler: PathBuf,
    pub softwareupdate: PathBuf,
    pub curl: PathBuf,
    /// Flags passed to curl before the URL: follow redirects, skip TLS
    /// verification, silent.
    pub curl_flags: Vec<String>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            system_profiler: PathBuf::from("/usr/sbin/system_profiler"),
            softwareupdate: PathBuf::from("/usr/sbin/softwareupdate"),
            curl: PathBuf::from("/usr/bin/curl"),
            curl_flags: vec!["-Lks".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    /// Support article holding the firmware table.
    pub url: String,
    /// Line that immediately precedes the table markup.
    pub marker: String,
    /// Remove interior whitespace from scraped model identifiers.
    pub compact_model_ids: bool,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            url: "http://support.apple.com/en-us/HT201518".to_string(),
            marker: r#"<div id="sections" itemprop="articleBody">"#.to_string(),
            compact_model_ids: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupStyle {
    /// Product registration page, name on a `productname` line.
    RegisterProduct,
    /// Warranty check results, name inside a `displayProductInfo` call.
    WarrantyCheck,
}

impl std::fmt::Display for LookupStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupStyle::RegisterProduct => write!(f, "register_product"),
            LookupStyle::WarrantyCheck => write!(f, "warranty_check"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    pub style: LookupStyle,
    /// URL template, `{serial}` is replaced by the serial number.
    pub register_product_url: String,
    /// URL template, `{serial}` is replaced by the serial number.
    pub warranty_check_url: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            style: LookupStyle::RegisterProduct,
            register_product_url:
                "https://selfsolve.apple.com/RegisterProduct.do?productRegister=Y&country=USA&id={serial}"
                    .to_string(),
            warranty_check_url:
                "https://selfsolve.apple.com/wcResults.do?sn={serial}&Continue=Continue&num=0"
                    .to_string(),
        }
    }
}

impl LookupConfig {
    /// URL template for the selected lookup style.
    pub fn url_template(&self) -> &str {
        match self.style {
            LookupStyle::RegisterProduct => self.register_product_url.as_str(),
            LookupStyle::WarrantyCheck => self.warranty_check_url.as_str(),
        }
    }

    pub fn url_for(&self, serial: &str) -> String {
        self.url_template().replace("{serial}", serial)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Also append log lines to a file.
    pub enabled: bool,
    /// Log at DEBUG instead of INFO.
    pub verbose: bool,
    /// Log file location. Derived from the effective user when unset.
    pub path: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            verbose: false,
            path: None,
        }
    }
}

impl FwConfig {
    /// Reject configurations the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.reference.url.trim().is_empty() {
            return Err(Error::Config("reference.url is empty".to_string()));
        }
        if self.reference.marker.is_empty() {
            return Err(Error::Config("reference.marker is empty".to_string()));
        }
        if !self.lookup.url_template().contains("{serial}") {
            return Err(Error::Config(format!(
                "lookup URL for style {} has no {{serial}} placeholder",
                self.lookup.style
            )));
        }
        Ok(())
    }
}

const SYSTEM_CONFIG: &str = "/etc/fwcheck/config.toml";

/// Load the system config file if it exists.
fn load_system() -> Option<toml::Value> {
    let content = std::fs::read_to_string(Path::new(SYSTEM_CONFIG)).ok()?;
    toml::from_str(&content).ok()
}

/// Load the user config file (~/.config/fwcheck/config.toml or the
/// platform equivalent) if it exists.
fn load_user() -> Option<toml::Value> {
    let dir = dirs::config_dir()?;
    let path = dir.join("fwcheck").join("config.toml");
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Recursively merge two TOML values. Tables are merged key-by-key;
/// all other types in `overlay` replace `base`.
fn merge_values(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_values(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load config from a specific path, ignoring system/user files.
fn load_from_path(path: &Path) -> FwConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
            eprintln!(
                "warning: failed to parse config at {}: {}",
                path.display(),
                e
            );
            FwConfig::default()
        }),
        Err(e) => {
            eprintln!(
                "warning: failed to read config at {}: {}",
                path.display(),
                e
            );
            FwConfig::default()
        }
    }
}

/// Load the merged config: system defaults, then user overrides.
/// If `override_path` is provided, use only that file instead.
pub fn load(override_path: Option<&Path>) -> FwConfig {
    if let Some(path) = override_path {
        return load_from_path(path);
    }

    let merged = match (load_system(), load_user()) {
        (Some(s), Some(u)) => Some(merge_values(s, u)),
        (Some(v), None) | (None, Some(v)) => Some(v),
        (None, None) => None,
    };

    match merged {
        Some(value) => value.try_into().unwrap_or_else(|e| {
            eprintln!("warning: failed to deserialize config: {}", e);
            FwConfig::default()
        }),
        None => FwConfig::default(),
    }
}
