/// Config file loading and creation for the knockout CLI.
///
/// Config lives at ~/.config/knockout/config.toml.
/// All fields are optional; CLI flags override config values.
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::bail;

#[derive(Deserialize, Default)]
pub struct KnockoutConfig {
    pub service_url: Option<String>,
    pub service_key: Option<String>,
}

const DEFAULT_CONFIG_TEMPLATE: &str = "\
# knockout configuration
# All values here can be overridden by CLI flags.

# Tournament service base URL
# service_url = \"https://your-project.supabase.co\"

# Publishable anon key, sent as the apikey header on every request
# service_key = \"eyJ...\"

# Admin access token: use the KNOCKOUT_ACCESS_TOKEN env var or the
# --access-token flag (not stored in config). Without one, the CLI runs
# as a read-only viewer.
";

/// Returns the default config path: ~/.config/knockout/config.toml
pub fn config_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| bail("HOME environment variable not set"));
    PathBuf::from(home).join(".config").join("knockout").join("config.toml")
}

/// Load config from a file path. Returns default (all None) if file doesn't exist.
pub fn load_config(path: &Path) -> KnockoutConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content)
            .unwrap_or_else(|e| bail(format!("Failed to parse config at {}: {e}", path.display()))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => KnockoutConfig::default(),
        Err(e) => bail(format!("Failed to read config at {}: {e}", path.display())),
    }
}

/// Create the default config file. Errors if it already exists.
pub fn create_default_config() -> PathBuf {
    let path = config_path();

    if path.exists() {
        bail(format!("Config file already exists at {}", path.display()));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .unwrap_or_else(|e| bail(format!("Failed to create directory {}: {e}", parent.display())));
    }

    std::fs::write(&path, DEFAULT_CONFIG_TEMPLATE)
        .unwrap_or_else(|e| bail(format!("Failed to write config to {}: {e}", path.display())));

    path
}
