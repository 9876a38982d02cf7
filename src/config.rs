// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fs::read_to_string;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::Fallible;
use crate::error::fail;
use crate::i18n::Language;

pub const DEFAULT_CONFIG_PATH: &str = "cardfront.toml";

/// Front-end configuration, read from a TOML file. Every key is optional.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base URL of the REST backend.
    pub backend_url: String,
    /// Local port the front end listens on.
    pub port: u16,
    /// UI language.
    pub language: Language,
    /// Number of materials requested per page.
    pub page_size: usize,
    /// Path to the local storage database.
    pub storage: PathBuf,
    /// Whether to open the browser once the server is up.
    pub open_browser: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8080".to_string(),
            port: 8000,
            language: Language::De,
            page_size: 50,
            storage: PathBuf::from("cardfront.db"),
            open_browser: true,
        }
    }
}

impl Config {
    /// Load the configuration. With no explicit path, a missing default file
    /// means all defaults; an explicit path must exist.
    pub fn load(path: Option<&Path>) -> Fallible<Self> {
        let config = match path {
            Some(path) => {
                if !path.exists() {
                    return fail(format!("config file {} does not exist.", path.display()));
                }
                Self::parse(&read_to_string(path)?)?
            }
            None => {
                let path = Path::new(DEFAULT_CONFIG_PATH);
                if path.exists() {
                    log::debug!("Reading configuration from {DEFAULT_CONFIG_PATH}");
                    Self::parse(&read_to_string(path)?)?
                } else {
                    log::debug!("No configuration file, using defaults.");
                    Self::default()
                }
            }
        };
        Ok(config)
    }

    pub fn parse(content: &str) -> Fallible<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Fallible<()> {
        if self.page_size == 0 {
            return fail("page_size must be positive.");
        }
        if !(self.backend_url.starts_with("http://") || self.backend_url.starts_with("https://")) {
            return fail("backend_url must be an http or https URL.");
        }
        Ok(())
    }

    /// The backend URL without a trailing slash.
    pub fn backend_base(&self) -> &str {
        self.backend_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() -> Fallible<()> {
        let config = Config::parse("")?;
        assert_eq!(config, Config::default());
        assert_eq!(config.page_size, 50);
        Ok(())
    }

    #[test]
    fn test_overrides() -> Fallible<()> {
        let config = Config::parse(
            "backend_url = \"https://cards.example.com/\"\nport = 9000\nlanguage = \"en\"\n",
        )?;
        assert_eq!(config.port, 9000);
        assert_eq!(config.language, Language::En);
        assert_eq!(config.backend_base(), "https://cards.example.com");
        Ok(())
    }

    #[test]
    fn test_zero_page_size() {
        assert!(Config::parse("page_size = 0").is_err());
    }

    #[test]
    fn test_bad_url() {
        assert!(Config::parse("backend_url = \"ftp://x\"").is_err());
    }

    #[test]
    fn test_unknown_key() {
        assert!(Config::parse("colour = \"blue\"").is_err());
    }

    #[test]
    fn test_missing_explicit_path() {
        assert!(Config::load(Some(Path::new("./derpherp.toml"))).is_err());
    }
}
