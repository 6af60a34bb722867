use std::path::Path;
use thiserror::Error;

pub const ICLOUD_EMAIL: &str = "ICLOUD_EMAIL";
pub const ICLOUD_APP_PASSWORD: &str = "ICLOUD_APP_PASSWORD";
pub const INSTAPAPER_EMAIL: &str = "INSTAPAPER_EMAIL";

/// Directory name under the user's config dir that may hold a `.env` file.
const CONFIG_DIR_NAME: &str = "hn-to-instapaper";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
}

impl ConfigError {
    pub fn missing(&self) -> &[&'static str] {
        match self {
            ConfigError::Missing(names) => names,
        }
    }
}

/// Credentials and addresses needed to forward stories by email.
#[derive(Debug, Clone)]
pub struct Config {
    /// Sender mailbox, also used as the SMTP login.
    pub icloud_email: String,
    /// App-specific password, not the account password.
    pub icloud_app_password: String,
    /// Instapaper save-by-email address.
    pub instapaper_email: String,
}

impl Config {
    /// Builds the config from an arbitrary lookup, reporting every missing
    /// name at once. Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut require = |name: &'static str| match lookup(name) {
            Some(value) if !value.is_empty() => value,
            _ => {
                missing.push(name);
                String::new()
            }
        };

        let icloud_email = require(ICLOUD_EMAIL);
        let icloud_app_password = require(ICLOUD_APP_PASSWORD);
        let instapaper_email = require(INSTAPAPER_EMAIL);

        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        Ok(Self {
            icloud_email,
            icloud_app_password,
            instapaper_email,
        })
    }

    /// Human-readable list of places a `.env` file is looked up.
    pub fn dotenv_locations() -> Vec<String> {
        let mut locations = vec!["./.env".to_string()];
        if let Some(config_dir) = dirs::config_dir() {
            locations.push(
                config_dir
                    .join(CONFIG_DIR_NAME)
                    .join(".env")
                    .display()
                    .to_string(),
            );
        }
        if let Some(home_dir) = dirs::home_dir() {
            locations.push(home_dir.join(".env").display().to_string());
        }
        locations
    }

    /// Loads the first `.env` found: current directory, then
    /// `~/.config/hn-to-instapaper/.env`, then `~/.env`.
    pub fn load_dotenv() {
        // 1. Current directory (for development)
        match dotenvy::dotenv() {
            Ok(_) => return,
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!(path = "./.env", error = %e, "ignoring malformed .env file"),
        }

        // 2. ~/.config/hn-to-instapaper/.env
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join(CONFIG_DIR_NAME).join(".env");
            if config_path.exists() && load_dotenv_file(&config_path) {
                return;
            }
        }

        // 3. ~/.env
        if let Some(home_dir) = dirs::home_dir() {
            let home_path = home_dir.join(".env");
            if home_path.exists() {
                load_dotenv_file(&home_path);
            }
        }

        // Nothing found is fine, the variables may be set in the shell
    }
}

/// Returns whether the file was loaded. Parse errors are logged, not fatal.
fn load_dotenv_file(path: &Path) -> bool {
    match dotenvy::from_path(path) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed .env file");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_all_present() {
        let config = Config::from_lookup(lookup_from(&[
            (ICLOUD_EMAIL, "me@icloud.com"),
            (ICLOUD_APP_PASSWORD, "abcd-efgh"),
            (INSTAPAPER_EMAIL, "save@instapaper.com"),
        ]))
        .unwrap();

        assert_eq!(config.icloud_email, "me@icloud.com");
        assert_eq!(config.icloud_app_password, "abcd-efgh");
        assert_eq!(config.instapaper_email, "save@instapaper.com");
    }

    #[test]
    fn test_all_missing() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert_eq!(
            err.missing(),
            &[ICLOUD_EMAIL, ICLOUD_APP_PASSWORD, INSTAPAPER_EMAIL]
        );
    }

    #[test]
    fn test_reports_only_absent_names() {
        let err = Config::from_lookup(lookup_from(&[(ICLOUD_APP_PASSWORD, "secret")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::Missing(vec![ICLOUD_EMAIL, INSTAPAPER_EMAIL]));
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let err = Config::from_lookup(lookup_from(&[
            (ICLOUD_EMAIL, "me@icloud.com"),
            (ICLOUD_APP_PASSWORD, ""),
            (INSTAPAPER_EMAIL, "save@instapaper.com"),
        ]))
        .unwrap_err();
        assert_eq!(err.missing(), &[ICLOUD_APP_PASSWORD]);
    }

    fn scratch_file(name: &str, contents: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("hn-to-instapaper-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_malformed_dotenv_is_reported_not_loaded() {
        let path = scratch_file("malformed.env", "this is not valid\n");
        assert!(!load_dotenv_file(&path));
    }

    #[test]
    fn test_valid_dotenv_is_loaded() {
        let path = scratch_file("valid.env", "HN_TO_INSTAPAPER_DOTENV_CHECK=loaded\n");
        assert!(load_dotenv_file(&path));
        assert_eq!(
            std::env::var("HN_TO_INSTAPAPER_DOTENV_CHECK").as_deref(),
            Ok("loaded")
        );
    }

    #[test]
    fn test_missing_dotenv_file_is_not_loaded() {
        let path = std::env::temp_dir().join("hn-to-instapaper-does-not-exist.env");
        assert!(!load_dotenv_file(&path));
    }

    #[test]
    fn test_error_message_lists_names() {
        let err = ConfigError::Missing(vec![ICLOUD_EMAIL, INSTAPAPER_EMAIL]);
        assert_eq!(
            err.to_string(),
            "missing required environment variables: ICLOUD_EMAIL, INSTAPAPER_EMAIL"
        );
    }
}
