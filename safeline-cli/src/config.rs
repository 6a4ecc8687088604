//! Configuration loading for the Safeline CLI.
//!
//! Handles loading runtime options from a JSON file in the home directory.

use std::path::Path;

use safeline::SafelineOptions;
use tracing::warn;

const CONFIG_FILE_JSON: &str = "config.json";

/// Load [`SafelineOptions`] from configuration files in the given home
/// directory.
///
/// Returns options with defaults if no config file is found.
pub fn load_config(home_dir: &Path) -> SafelineOptions {
    let mut options = SafelineOptions {
        home_dir: home_dir.to_path_buf(),
        ..SafelineOptions::default()
    };

    if let Some(config) = try_load_json(home_dir) {
        // Merge loaded config into defaults; the home dir itself always
        // comes from the flag/env, not the file.
        options.db_file = config.db_file;
        options.country_code = config.country_code;
    }

    options
}

fn try_load_json(home_dir: &Path) -> Option<SafelineOptions> {
    let config_path = home_dir.join(CONFIG_FILE_JSON);
    if !config_path.exists() {
        return None;
    }

    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(e) => {
            warn!(
                "Failed to read config file {}: {}",
                config_path.display(),
                e
            );
            return None;
        }
    };

    match serde_json::from_str::<SafelineOptions>(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!(
                "Failed to parse config file {}: {}",
                config_path.display(),
                e
            );
            None
        }
    }
}
