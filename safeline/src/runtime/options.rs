//! Configuration for Safeline.

use std::path::PathBuf;

use dirs::home_dir;
use serde::{Deserialize, Serialize};

use safeline_shared::errors::{SafelineError, SafelineResult};

/// Environment variable overriding the home directory.
pub const SAFELINE_HOME_ENV: &str = "SAFELINE_HOME";

/// Directory under the user's home used when no override is given.
pub const SAFELINE_DIR: &str = ".safeline";

fn default_home_dir() -> PathBuf {
    std::env::var(SAFELINE_HOME_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = home_dir().unwrap_or_else(|| PathBuf::from("."));
            path.push(SAFELINE_DIR);
            path
        })
}

fn default_db_file() -> String {
    "safeline.db".to_string()
}

fn default_country_code() -> String {
    "+91".to_string()
}

/// Configuration options for [`SafelineRuntime`].
///
/// Users can create it with defaults and modify fields as needed.
///
/// [`SafelineRuntime`]: crate::runtime::SafelineRuntime
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SafelineOptions {
    /// Directory holding the contact database.
    #[serde(default = "default_home_dir")]
    pub home_dir: PathBuf,

    /// Contact database file name within `home_dir`.
    ///
    /// Point this at an existing data file to adopt it; the `Contacts`
    /// schema is unchanged from earlier releases.
    #[serde(default = "default_db_file")]
    pub db_file: String,

    /// Country-code prefix prepended to every stored mobile number at
    /// dispatch time.
    #[serde(default = "default_country_code")]
    pub country_code: String,
}

impl Default for SafelineOptions {
    fn default() -> Self {
        Self {
            home_dir: default_home_dir(),
            db_file: default_db_file(),
            country_code: default_country_code(),
        }
    }
}

impl SafelineOptions {
    /// Full path of the contact database file.
    pub fn db_path(&self) -> PathBuf {
        self.home_dir.join(&self.db_file)
    }

    /// Sanitize and validate options.
    pub fn sanitize(&self) -> SafelineResult<()> {
        if self.db_file.trim().is_empty() {
            return Err(SafelineError::Config(
                "db_file must not be empty".to_string(),
            ));
        }

        if !self.country_code.starts_with('+') || self.country_code.len() < 2 {
            return Err(SafelineError::Config(format!(
                "country_code must be a '+'-prefixed dialing code, got '{}'",
                self.country_code
            )));
        }

        Ok(())
    }
}
