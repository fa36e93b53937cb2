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

mod directory;
mod http;
mod parse;

use std::fmt::Display;
use std::fmt::Formatter;
use std::future::Future;

pub use directory::DirectoryLoader;
pub use http::HttpLoader;
pub use parse::parse_json;
pub use parse::parse_toml;

use crate::types::config::CardConfiguration;

/// Why a configuration could not be resolved. Both kinds lead to the same
/// fallback; the distinction only matters for diagnostics.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// The resource could not be obtained.
    Load(String),
    /// The resource was obtained, but is not a usable configuration.
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Load(reason) => write!(f, "load error: {reason}"),
            ConfigError::Invalid(reason) => write!(f, "invalid configuration: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Resolves a named configuration. Single attempt, no retry.
pub trait ConfigLoader {
    fn resolve(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<CardConfiguration, ConfigError>> + Send;
}

/// The configuration sources the server can be pointed at.
pub enum Source {
    Directory(DirectoryLoader),
    Http(HttpLoader),
}

impl ConfigLoader for Source {
    async fn resolve(&self, name: &str) -> Result<CardConfiguration, ConfigError> {
        match self {
            Source::Directory(loader) => loader.resolve(name).await,
            Source::Http(loader) => loader.resolve(name).await,
        }
    }
}

/// Configuration names address files and URLs, so they are restricted to a
/// conservative character set.
pub fn validate_name(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::Load("empty configuration name".to_string()));
    }
    if name.contains("..") {
        return Err(ConfigError::Load(format!("invalid configuration name: {name}")));
    }
    let valid = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.');
    if !valid {
        return Err(ConfigError::Load(format!("invalid configuration name: {name}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("birthday").is_ok());
        assert!(validate_name("new-year_2026").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("../secret").is_err());
        assert!(validate_name("a/b").is_err());
        assert!(validate_name("a\\b").is_err());
    }

    #[test]
    fn test_display() {
        let load = ConfigError::Load("Failed to load x.config.toml".to_string());
        assert_eq!(load.to_string(), "load error: Failed to load x.config.toml");
        let invalid = ConfigError::Invalid("missing images".to_string());
        assert_eq!(invalid.to_string(), "invalid configuration: missing images");
    }
}
